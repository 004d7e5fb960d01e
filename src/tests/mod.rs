//! Crate-level behaviour tests: frame round-trips, projection scenarios,
//! and the calibration/data-layer contracts, exercised through the public
//! API.

pub mod adapter;
pub mod bpf;
pub mod earth_orientation;
pub mod geodesy;
pub mod l0r;

use std::sync::Arc;

use crate::attitude::{AttitudeModel, AttitudeSample};
use crate::ephemeris::{EphemerisModel, EphemerisSample};
use crate::sensor::{BandSensorModel, ScaModel, SensorFrame, SensorModel};
use crate::spacecraft::{AcquisitionType, SpacecraftModel};
use crate::time::Epoch;
use crate::vector::{Vector3, IDENTITY};
use crate::{EarthCharacteristics, LosModel};

/// A circular-orbit-free test model: constant spacecraft state at
/// `(7000 km, 0, 0)` moving along +Y, zero attitude, a single SCA with
/// nadir-pointing detectors. Good enough to exercise the projection
/// chain end to end with hand-checkable geometry.
pub fn nadir_model(acquisition_type: AcquisitionType, epoch_offset_seconds: f64) -> LosModel {
    let ephemeris_epoch = Epoch::new(2015, 100.0, 3600.0).unwrap();
    let band_epoch = ephemeris_epoch.add_seconds(epoch_offset_seconds).unwrap();

    let samples: Vec<EphemerisSample> = (0..30)
        .map(|i| {
            let t = i as f64;
            EphemerisSample {
                seconds_from_epoch: t,
                ecef_position: Vector3::new(7.0e6, 0.0, 0.0),
                ecef_velocity: Vector3::new(0.0, 7500.0, 0.0),
                // The inertial samples ramp with time so epoch-delta
                // handling is observable for stellar/lunar collects.
                eci_position: Vector3::new(7.0e6 + t, 0.0, 0.0),
                eci_velocity: Vector3::new(1.0, 7500.0, 0.0),
            }
        })
        .collect();
    let ephemeris = EphemerisModel::new(ephemeris_epoch, 1.0, samples).unwrap();

    let attitude_samples: Vec<AttitudeSample> = (0..600)
        .map(|i| AttitudeSample {
            seconds_from_epoch: i as f64 * 0.05,
            roll: 0.0,
            pitch: 0.0,
            yaw: 0.0,
        })
        .collect();
    let attitude = AttitudeModel::new(ephemeris_epoch, 0.05, attitude_samples).unwrap();

    let detectors = 16;
    let frame_period = 4.2e-3;
    let sca = ScaModel {
        frame_seconds: (0..200).map(|i| i as f64 * frame_period).collect(),
        detector_offsets: vec![0.0; detectors],
        los_nominal: vec![Vector3::new(0.0, 0.0, 1.0); detectors],
        los_actual: vec![Vector3::new(0.0, 0.0, 1.0); detectors],
    };
    let frame = Arc::new(SensorFrame {
        sensor_to_acs: IDENTITY,
        center_mass_to_sensor_offset: Vector3::ZERO,
    });
    let band =
        BandSensorModel::new(0, band_epoch, detectors, frame_period, vec![sca], frame).unwrap();

    LosModel::new(
        33,
        42,
        acquisition_type,
        SpacecraftModel {
            ephemeris,
            attitude,
        },
        SensorModel { bands: vec![band] },
        EarthCharacteristics::default(),
    )
}
