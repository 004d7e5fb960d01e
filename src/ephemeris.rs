//! Spacecraft ephemeris interpolation.
//!
//! The ephemeris is a time-ordered sequence of state-vector samples at a
//! nominal cadence (1 Hz for the ACS stream). Positions and velocities at
//! arbitrary times come from classical Lagrange interpolation over a
//! window of [`LAGRANGE_POINTS`] samples centred on the query, applied
//! component-wise and clamped at both ends of the data.
//!
//! Every sample carries both the Earth-fixed and the inertial J2000 state;
//! the acquisition type selects which pair the interpolation reads.

use log::error;

use crate::error::{LosError, Result};
use crate::frames;
use crate::spacecraft::AcquisitionType;
use crate::time::Epoch;
use crate::vector::Vector3;

/// Number of samples in a Lagrange interpolation window.
pub const LAGRANGE_POINTS: usize = 9;

/// One ephemeris sample: spacecraft state in both frames at a time offset
/// from the ephemeris epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EphemerisSample {
    pub seconds_from_epoch: f64,
    pub ecef_position: Vector3,
    pub ecef_velocity: Vector3,
    pub eci_position: Vector3,
    pub eci_velocity: Vector3,
}

/// Time-ordered ephemeris with its UTC epoch.
#[derive(Debug, Clone)]
pub struct EphemerisModel {
    pub utc_epoch_time: Epoch,
    /// Nominal spacing of the samples (s); drives window selection.
    pub nominal_sample_time: f64,
    samples: Vec<EphemerisSample>,
}

impl EphemerisModel {
    /// Build a model from samples, which must number at least
    /// [`LAGRANGE_POINTS`] and ascend strictly in time.
    pub fn new(
        utc_epoch_time: Epoch,
        nominal_sample_time: f64,
        samples: Vec<EphemerisSample>,
    ) -> Result<EphemerisModel> {
        if samples.len() < LAGRANGE_POINTS {
            error!(
                "ephemeris needs at least {LAGRANGE_POINTS} samples, got {}",
                samples.len()
            );
            return Err(LosError::InvalidInput {
                reason: format!(
                    "ephemeris needs at least {LAGRANGE_POINTS} samples, got {}",
                    samples.len()
                ),
            });
        }
        if nominal_sample_time <= 0.0 {
            return Err(LosError::InvalidInput {
                reason: "ephemeris nominal sample time must be positive".to_string(),
            });
        }
        for pair in samples.windows(2) {
            if pair[1].seconds_from_epoch <= pair[0].seconds_from_epoch {
                error!(
                    "ephemeris samples out of order at t={}",
                    pair[1].seconds_from_epoch
                );
                return Err(LosError::InvalidInput {
                    reason: "ephemeris samples must ascend strictly in time".to_string(),
                });
            }
        }
        Ok(EphemerisModel {
            utc_epoch_time,
            nominal_sample_time,
            samples,
        })
    }

    /// Build a model from Earth-fixed samples alone, deriving the inertial
    /// J2000 state of each sample through the earth-orientation chain.
    ///
    /// `ecef_samples` are `(seconds_from_epoch, position, velocity)`
    /// tuples; `xp`/`yp` are arc-seconds of pole wander and `ut1_utc` the
    /// UT1−UTC correction for the collect.
    pub fn from_ecef_samples(
        utc_epoch_time: Epoch,
        nominal_sample_time: f64,
        ecef_samples: &[(f64, Vector3, Vector3)],
        xp: f64,
        yp: f64,
        ut1_utc: f64,
    ) -> Result<EphemerisModel> {
        let mut samples = Vec::with_capacity(ecef_samples.len());
        for &(seconds, ecef_position, ecef_velocity) in ecef_samples {
            let sample_epoch = utc_epoch_time.add_seconds(seconds)?;
            let (eci_position, eci_velocity) = frames::ecef2j2k(
                xp,
                yp,
                ut1_utc,
                &ecef_position,
                &ecef_velocity,
                &sample_epoch,
            )?;
            samples.push(EphemerisSample {
                seconds_from_epoch: seconds,
                ecef_position,
                ecef_velocity,
                eci_position,
                eci_velocity,
            });
        }
        EphemerisModel::new(utc_epoch_time, nominal_sample_time, samples)
    }

    pub fn samples(&self) -> &[EphemerisSample] {
        &self.samples
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Interpolate the spacecraft position and velocity at a delta time
    /// from the ephemeris epoch. Earth acquisitions read the Earth-fixed
    /// samples, stellar and lunar the inertial ones.
    ///
    /// The interpolation window starts at
    /// `floor(t / nominal) − LAGRANGE_POINTS/2`, clamped so a query before
    /// the first sample uses the first window and a query past the last
    /// sample uses the last.
    pub fn position_velocity_at(
        &self,
        acquisition_type: AcquisitionType,
        eph_time: f64,
    ) -> (Vector3, Vector3) {
        let half_window = (LAGRANGE_POINTS / 2) as isize;
        let mut index = (eph_time / self.nominal_sample_time).floor() as isize - half_window;
        let max_start = (self.samples.len() - LAGRANGE_POINTS) as isize;
        index = index.clamp(0, max_start);
        let window = &self.samples[index as usize..index as usize + LAGRANGE_POINTS];

        let mut times = [0.0; LAGRANGE_POINTS];
        let mut positions = [Vector3::ZERO; LAGRANGE_POINTS];
        let mut velocities = [Vector3::ZERO; LAGRANGE_POINTS];
        for (i, sample) in window.iter().enumerate() {
            times[i] = sample.seconds_from_epoch;
            if acquisition_type == AcquisitionType::Earth {
                positions[i] = sample.ecef_position;
                velocities[i] = sample.ecef_velocity;
            } else {
                positions[i] = sample.eci_position;
                velocities[i] = sample.eci_velocity;
            }
        }
        lagrange_interpolate(&times, &positions, &velocities, eph_time)
    }
}

/// Classical Lagrange interpolation of position and velocity vectors,
/// component-wise, at `delta_time` on the common `seconds_from_ref` grid.
pub fn lagrange_interpolate(
    seconds_from_ref: &[f64],
    positions: &[Vector3],
    velocities: &[Vector3],
    delta_time: f64,
) -> (Vector3, Vector3) {
    let mut pos_sum = Vector3::ZERO;
    let mut vel_sum = Vector3::ZERO;
    for i in 0..seconds_from_ref.len() {
        let mut weight = 1.0;
        for j in 0..seconds_from_ref.len() {
            if j != i {
                weight *= (delta_time - seconds_from_ref[j])
                    / (seconds_from_ref[i] - seconds_from_ref[j]);
            }
        }
        pos_sum = pos_sum.add(&positions[i].scale(weight));
        vel_sum = vel_sum.add(&velocities[i].scale(weight));
    }
    (pos_sum, vel_sum)
}

/// Lagrange interpolation of a scalar series.
pub fn lagrange_interpolate_scalar(
    seconds_from_ref: &[f64],
    values: &[f64],
    delta_time: f64,
) -> f64 {
    let mut sum = 0.0;
    for i in 0..seconds_from_ref.len() {
        let mut term = values[i];
        for j in 0..seconds_from_ref.len() {
            if j != i {
                term *= (delta_time - seconds_from_ref[j])
                    / (seconds_from_ref[i] - seconds_from_ref[j]);
            }
        }
        sum += term;
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn linear_model() -> EphemerisModel {
        let epoch = Epoch::new(2015, 100.0, 0.0).unwrap();
        let samples = (0..12)
            .map(|i| {
                let t = i as f64;
                EphemerisSample {
                    seconds_from_epoch: t,
                    ecef_position: Vector3::new(t, 2.0 * t, 3.0 * t),
                    ecef_velocity: Vector3::new(1.0, 2.0, 3.0),
                    eci_position: Vector3::new(-t, -2.0 * t, -3.0 * t),
                    eci_velocity: Vector3::new(-1.0, -2.0, -3.0),
                }
            })
            .collect();
        EphemerisModel::new(epoch, 1.0, samples).unwrap()
    }

    #[test]
    fn test_too_few_samples_rejected() {
        let epoch = Epoch::new(2015, 100.0, 0.0).unwrap();
        let samples: Vec<_> = (0..LAGRANGE_POINTS - 1)
            .map(|i| EphemerisSample {
                seconds_from_epoch: i as f64,
                ecef_position: Vector3::ZERO,
                ecef_velocity: Vector3::ZERO,
                eci_position: Vector3::ZERO,
                eci_velocity: Vector3::ZERO,
            })
            .collect();
        assert!(EphemerisModel::new(epoch, 1.0, samples).is_err());
    }

    #[test]
    fn test_unsorted_samples_rejected() {
        let epoch = Epoch::new(2015, 100.0, 0.0).unwrap();
        let mut samples: Vec<_> = (0..10)
            .map(|i| EphemerisSample {
                seconds_from_epoch: i as f64,
                ecef_position: Vector3::ZERO,
                ecef_velocity: Vector3::ZERO,
                eci_position: Vector3::ZERO,
                eci_velocity: Vector3::ZERO,
            })
            .collect();
        samples.swap(3, 4);
        assert!(EphemerisModel::new(epoch, 1.0, samples).is_err());
    }

    #[test]
    fn test_lagrange_exact_recall_linear() {
        let model = linear_model();
        let (pos, vel) = model.position_velocity_at(AcquisitionType::Earth, 4.0);
        assert_abs_diff_eq!(pos.x, 4.0, epsilon = 1e-9);
        assert_abs_diff_eq!(pos.y, 8.0, epsilon = 1e-9);
        assert_abs_diff_eq!(pos.z, 12.0, epsilon = 1e-9);
        assert_abs_diff_eq!(vel.x, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(vel.y, 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(vel.z, 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_lagrange_exact_at_sample_time() {
        let model = linear_model();
        let (pos, _) = model.position_velocity_at(AcquisitionType::Earth, 7.0);
        assert_abs_diff_eq!(pos.x, 7.0, epsilon = 1e-9);
    }

    #[test]
    fn test_acquisition_type_selects_frame() {
        let model = linear_model();
        let (pos_earth, _) = model.position_velocity_at(AcquisitionType::Earth, 2.0);
        let (pos_lunar, _) = model.position_velocity_at(AcquisitionType::Lunar, 2.0);
        assert_abs_diff_eq!(pos_earth.x, 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(pos_lunar.x, -2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_window_clamps_at_ends() {
        let model = linear_model();
        // Queries outside the data still evaluate using the end windows
        // and, for linear data, still land on the line.
        let (pos_low, _) = model.position_velocity_at(AcquisitionType::Earth, 0.0);
        assert_abs_diff_eq!(pos_low.x, 0.0, epsilon = 1e-9);
        let (pos_high, _) = model.position_velocity_at(AcquisitionType::Earth, 11.0);
        assert_abs_diff_eq!(pos_high.x, 11.0, epsilon = 1e-9);
    }

    #[test]
    fn test_scalar_lagrange_quadratic() {
        let times: Vec<f64> = (0..9).map(|i| i as f64).collect();
        let values: Vec<f64> = times.iter().map(|t| t * t).collect();
        let v = lagrange_interpolate_scalar(&times, &values, 2.5);
        assert_abs_diff_eq!(v, 6.25, epsilon = 1e-9);
    }
}
