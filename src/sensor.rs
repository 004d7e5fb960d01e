//! Sensor model: detector geometry and frame timing per band and SCA.
//!
//! Each imaging band carries, per SCA, the frame-time table (seconds from
//! the band's UTC epoch for every image line) and the detector tables: a
//! unit line-of-sight vector in the sensor frame for every detector, in
//! both the nominal (evenly-spaced) and actual (as-built) detector
//! location models, plus the along-track timing offset of each detector in
//! fractional frames.
//!
//! The shared [`SensorFrame`] holds the sensor→ACS alignment rotation and
//! the spacecraft centre-of-mass to sensor offset, common to all bands of
//! an instrument.

use std::sync::Arc;

use log::error;

use crate::error::{validate_index, LosError, Result};
use crate::time::Epoch;
use crate::vector::{Matrix3, Vector3};

/// Which detector-location model addresses a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorType {
    /// Nominal detector locations with whole-frame timing fill
    Nominal,
    /// As-built detector locations and timing offsets
    Actual,
    /// Nominal locations at the band's maximum detector offset
    Maximum,
    /// As-built locations with no timing offset applied
    Exact,
}

/// Instrument-level alignment shared by the bands of one sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorFrame {
    /// Rotation from the sensor frame to the attitude-control frame
    pub sensor_to_acs: Matrix3,
    /// Offset from the spacecraft centre of mass to the sensor origin, in
    /// the spacecraft body frame (m)
    pub center_mass_to_sensor_offset: Vector3,
}

/// Per-SCA detector and timing tables.
#[derive(Debug, Clone)]
pub struct ScaModel {
    /// Seconds from the band epoch for each image frame (line)
    pub frame_seconds: Vec<f64>,
    /// Along-track timing offset of each detector, in fractional frames
    pub detector_offsets: Vec<f64>,
    /// Unit LOS per detector, nominal detector locations (sensor frame)
    pub los_nominal: Vec<Vector3>,
    /// Unit LOS per detector, actual detector locations (sensor frame)
    pub los_actual: Vec<Vector3>,
}

/// Sensor model for one band.
#[derive(Debug, Clone)]
pub struct BandSensorModel {
    pub band_index: usize,
    pub band_present: bool,
    pub utc_epoch_time: Epoch,
    pub scas: usize,
    pub detectors_per_sca: usize,
    /// Nominal seconds per image frame
    pub frame_period: f64,
    pub sca_models: Vec<ScaModel>,
    pub frame: Arc<SensorFrame>,
}

impl BandSensorModel {
    /// Build a band model, checking the per-SCA table dimensions.
    pub fn new(
        band_index: usize,
        utc_epoch_time: Epoch,
        detectors_per_sca: usize,
        frame_period: f64,
        sca_models: Vec<ScaModel>,
        frame: Arc<SensorFrame>,
    ) -> Result<BandSensorModel> {
        if frame_period <= 0.0 {
            return Err(LosError::InvalidInput {
                reason: "frame period must be positive".to_string(),
            });
        }
        for (sca, model) in sca_models.iter().enumerate() {
            if model.frame_seconds.is_empty() {
                error!("band index {band_index} SCA {sca} has no frame times");
                return Err(LosError::InvalidInput {
                    reason: format!("band index {band_index} SCA {sca} has no frame times"),
                });
            }
            if model.detector_offsets.len() != detectors_per_sca
                || model.los_nominal.len() != detectors_per_sca
                || model.los_actual.len() != detectors_per_sca
            {
                error!("band index {band_index} SCA {sca} detector tables do not match {detectors_per_sca} detectors");
                return Err(LosError::InvalidInput {
                    reason: format!(
                        "band index {band_index} SCA {sca} detector tables do not match {detectors_per_sca} detectors"
                    ),
                });
            }
        }
        Ok(BandSensorModel {
            band_index,
            band_present: true,
            utc_epoch_time,
            scas: sca_models.len(),
            detectors_per_sca,
            frame_period,
            sca_models,
            frame,
        })
    }

    fn sca(&self, sca_index: usize) -> Result<&ScaModel> {
        self.sca_models
            .get(sca_index)
            .ok_or(LosError::InvalidIndex {
                name: "SCA",
                value: sca_index as i64,
                limit: self.scas,
            })
    }

    /// Seconds from the image start (band epoch) at which the detector
    /// addressed by `(line, sample)` was exposed, under the requested
    /// detector model.
    pub fn find_time(
        &self,
        line: f64,
        sample: f64,
        sca_index: usize,
        det_type: DetectorType,
    ) -> Result<f64> {
        let sca = self.sca(sca_index)?;
        if line < 0.0 || line > (sca.frame_seconds.len() - 1) as f64 {
            return Err(LosError::OutOfRange {
                parameter: "line",
                value: line,
                min: 0.0,
                max: (sca.frame_seconds.len() - 1) as f64,
            });
        }
        let line_index = line.floor() as usize;
        let line_frac = line - line_index as f64;

        // Sub-line interpolation between the bracketing frame times; the
        // last frame extends by the nominal period.
        let base = if line_index + 1 < sca.frame_seconds.len() {
            let t0 = sca.frame_seconds[line_index];
            let t1 = sca.frame_seconds[line_index + 1];
            t0 + line_frac * (t1 - t0)
        } else {
            sca.frame_seconds[line_index] + line_frac * self.frame_period
        };

        let detector = validate_index(sample.floor() as i64, self.detectors_per_sca, "detector")?;
        let offset_frames = match det_type {
            DetectorType::Nominal => sca.detector_offsets[detector].round(),
            DetectorType::Actual => sca.detector_offsets[detector],
            // Band-wide maximum: over every detector of every SCA.
            DetectorType::Maximum => self
                .sca_models
                .iter()
                .flat_map(|s| &s.detector_offsets)
                .fold(f64::MIN, |acc, &v| acc.max(v)),
            DetectorType::Exact => 0.0,
        };
        Ok(base + offset_frames * self.frame_period)
    }

    /// Unit sensor-frame LOS for the detector addressed by
    /// `(sca, sample)`. Sub-detector samples interpolate between the
    /// adjacent detector vectors and renormalise.
    pub fn find_los_vector(
        &self,
        sca_index: usize,
        sample: f64,
        det_type: DetectorType,
    ) -> Result<Vector3> {
        let sca = self.sca(sca_index)?;
        let detector = validate_index(sample.floor() as i64, self.detectors_per_sca, "detector")?;
        let frac = sample - detector as f64;

        let table = match det_type {
            DetectorType::Nominal | DetectorType::Maximum => &sca.los_nominal,
            DetectorType::Actual | DetectorType::Exact => &sca.los_actual,
        };

        let los = if frac == 0.0 {
            table[detector]
        } else {
            if detector + 1 >= self.detectors_per_sca {
                return Err(LosError::OutOfRange {
                    parameter: "sample",
                    value: sample,
                    min: 0.0,
                    max: (self.detectors_per_sca - 1) as f64,
                });
            }
            let a = table[detector];
            let b = table[detector + 1];
            a.scale(1.0 - frac).add(&b.scale(frac))
        };
        los.normalized()
    }
}

/// The sensor side of the LOS model: all bands of the collect.
#[derive(Debug, Clone)]
pub struct SensorModel {
    pub bands: Vec<BandSensorModel>,
}

impl SensorModel {
    /// Look up a band that is present in the collect.
    pub fn band(&self, band_index: usize) -> Result<&BandSensorModel> {
        let band = self.bands.get(band_index).ok_or(LosError::InvalidIndex {
            name: "band",
            value: band_index as i64,
            limit: self.bands.len(),
        })?;
        if !band.band_present {
            error!("band index {band_index} is not present in the collect");
            return Err(LosError::NotFound {
                kind: "band",
                name: format!("band index {band_index}"),
            });
        }
        Ok(band)
    }

    /// [`BandSensorModel::find_time`] addressed by band index.
    pub fn find_time(
        &self,
        line: f64,
        sample: f64,
        band_index: usize,
        sca_index: usize,
        det_type: DetectorType,
    ) -> Result<f64> {
        self.band(band_index)?
            .find_time(line, sample, sca_index, det_type)
    }

    /// [`BandSensorModel::find_los_vector`] addressed by band index.
    pub fn find_los_vector(
        &self,
        band_index: usize,
        sca_index: usize,
        sample: f64,
        det_type: DetectorType,
    ) -> Result<Vector3> {
        self.band(band_index)?
            .find_los_vector(sca_index, sample, det_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::IDENTITY;
    use approx::assert_abs_diff_eq;

    fn test_sca(detectors: usize, frame_period: f64, odd_offset: f64) -> ScaModel {
        let los_nominal: Vec<Vector3> = (0..detectors)
            .map(|d| {
                let across = (d as f64 - detectors as f64 / 2.0) * 1.0e-5;
                Vector3::new(across, 0.0, 1.0)
            })
            .collect();
        let los_actual: Vec<Vector3> = los_nominal
            .iter()
            .map(|v| Vector3::new(v.x + 1.0e-7, v.y, v.z))
            .collect();
        ScaModel {
            frame_seconds: (0..100).map(|i| i as f64 * frame_period).collect(),
            detector_offsets: (0..detectors)
                .map(|d| if d % 2 == 0 { 0.1 } else { odd_offset })
                .collect(),
            los_nominal,
            los_actual,
        }
    }

    fn test_band(detectors: usize) -> BandSensorModel {
        let epoch = Epoch::new(2015, 100.0, 3600.0).unwrap();
        let frame_period = 4.2e-3;
        let frame = Arc::new(SensorFrame {
            sensor_to_acs: IDENTITY,
            center_mass_to_sensor_offset: Vector3::new(1.5, -0.2, 0.8),
        });
        BandSensorModel::new(
            0,
            epoch,
            detectors,
            frame_period,
            vec![test_sca(detectors, frame_period, 0.9)],
            frame,
        )
        .unwrap()
    }

    #[test]
    fn test_find_time_interpolates_lines() {
        let band = test_band(10);
        let t0 = band.find_time(3.0, 0.0, 0, DetectorType::Exact).unwrap();
        let t_half = band.find_time(3.5, 0.0, 0, DetectorType::Exact).unwrap();
        assert_abs_diff_eq!(t0, 3.0 * band.frame_period, epsilon = 1e-12);
        assert_abs_diff_eq!(t_half, 3.5 * band.frame_period, epsilon = 1e-12);
    }

    #[test]
    fn test_find_time_detector_types() {
        let band = test_band(10);
        let nominal = band.find_time(3.0, 1.0, 0, DetectorType::Nominal).unwrap();
        let actual = band.find_time(3.0, 1.0, 0, DetectorType::Actual).unwrap();
        let maximum = band.find_time(3.0, 1.0, 0, DetectorType::Maximum).unwrap();
        let exact = band.find_time(3.0, 1.0, 0, DetectorType::Exact).unwrap();
        let base = 3.0 * band.frame_period;
        // Detector 1 offset is 0.9 frames: nominal rounds to 1.
        assert_abs_diff_eq!(nominal, base + band.frame_period, epsilon = 1e-12);
        assert_abs_diff_eq!(actual, base + 0.9 * band.frame_period, epsilon = 1e-12);
        assert_abs_diff_eq!(maximum, base + 0.9 * band.frame_period, epsilon = 1e-12);
        assert_abs_diff_eq!(exact, base, epsilon = 1e-12);
    }

    #[test]
    fn test_maximum_offset_spans_all_scas() {
        // The addressed SCA tops out at 0.9 frames, but a sibling SCA
        // carries a 1.4-frame detector: the maximum is band-wide.
        let epoch = Epoch::new(2015, 100.0, 3600.0).unwrap();
        let frame_period = 4.2e-3;
        let frame = Arc::new(SensorFrame {
            sensor_to_acs: IDENTITY,
            center_mass_to_sensor_offset: Vector3::ZERO,
        });
        let band = BandSensorModel::new(
            0,
            epoch,
            10,
            frame_period,
            vec![
                test_sca(10, frame_period, 0.9),
                test_sca(10, frame_period, 1.4),
            ],
            frame,
        )
        .unwrap();
        let maximum = band.find_time(3.0, 0.0, 0, DetectorType::Maximum).unwrap();
        let base = 3.0 * frame_period;
        assert_abs_diff_eq!(maximum, base + 1.4 * frame_period, epsilon = 1e-12);
    }

    #[test]
    fn test_find_los_interpolates_and_normalises() {
        let band = test_band(10);
        let a = band.find_los_vector(0, 4.0, DetectorType::Nominal).unwrap();
        let mid = band.find_los_vector(0, 4.5, DetectorType::Nominal).unwrap();
        let b = band.find_los_vector(0, 5.0, DetectorType::Nominal).unwrap();
        assert_abs_diff_eq!(a.length(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(mid.length(), 1.0, epsilon = 1e-12);
        assert!(mid.x > a.x && mid.x < b.x);
    }

    #[test]
    fn test_los_table_selection() {
        let band = test_band(10);
        let nominal = band.find_los_vector(0, 2.0, DetectorType::Nominal).unwrap();
        let actual = band.find_los_vector(0, 2.0, DetectorType::Actual).unwrap();
        assert!(actual.x > nominal.x);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let band = test_band(10);
        assert!(band.find_los_vector(0, 10.0, DetectorType::Nominal).is_err());
        assert!(band.find_los_vector(1, 0.0, DetectorType::Nominal).is_err());
        assert!(band.find_time(99.5, 0.0, 0, DetectorType::Exact).is_err());
        assert!(band.find_time(-0.5, 0.0, 0, DetectorType::Exact).is_err());
    }

    #[test]
    fn test_missing_band_rejected() {
        let mut band = test_band(10);
        band.band_present = false;
        let sensor = SensorModel { bands: vec![band] };
        assert!(sensor.find_time(0.0, 0.0, 0, 0, DetectorType::Exact).is_err());
        assert!(sensor.band(1).is_err());
    }
}
