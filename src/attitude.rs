//! Spacecraft attitude interpolation.
//!
//! Attitude is carried as roll/pitch/yaw perturbation angles relative to
//! the orbital reference frame, sampled on the ACS cadence. Lookups use
//! the same windowed Lagrange scheme as the ephemeris, applied to the
//! three angles as independent scalars.

use log::error;

use crate::ephemeris::{lagrange_interpolate_scalar, LAGRANGE_POINTS};
use crate::error::{LosError, Result};
use crate::time::Epoch;
use crate::vector::{Matrix3, Vector3};

/// One attitude sample: roll/pitch/yaw (radians) at a time offset from the
/// attitude epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttitudeSample {
    pub seconds_from_epoch: f64,
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

/// An attitude quaternion as delivered in the ancillary stream: vector
/// part plus scalar part.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion {
    pub vector: Vector3,
    pub scalar: f64,
}

impl Quaternion {
    /// Rotation matrix equivalent of this quaternion.
    ///
    /// # Errors
    /// Returns `LosError::Numeric` for a zero-norm quaternion.
    pub fn to_matrix(&self) -> Result<Matrix3> {
        let norm = (self.vector.dot(&self.vector) + self.scalar * self.scalar).sqrt();
        if norm == 0.0 {
            return Err(LosError::Numeric {
                operation: "quaternion to matrix conversion",
                reason: "zero norm",
            });
        }
        let x = self.vector.x / norm;
        let y = self.vector.y / norm;
        let z = self.vector.z / norm;
        let w = self.scalar / norm;
        Ok([
            [
                1.0 - 2.0 * (y * y + z * z),
                2.0 * (x * y - w * z),
                2.0 * (x * z + w * y),
            ],
            [
                2.0 * (x * y + w * z),
                1.0 - 2.0 * (x * x + z * z),
                2.0 * (y * z - w * x),
            ],
            [
                2.0 * (x * z - w * y),
                2.0 * (y * z + w * x),
                1.0 - 2.0 * (x * x + y * y),
            ],
        ])
    }
}

/// Extract roll/pitch/yaw from a perturbation matrix composed as
/// `R_yaw * R_pitch * R_roll` (the attitude-perturbation convention used
/// by the projection).
pub fn matrix_to_roll_pitch_yaw(m: &Matrix3) -> (f64, f64, f64) {
    let pitch = m[2][0].clamp(-1.0, 1.0).asin();
    let yaw = (-m[1][0]).atan2(m[0][0]);
    let roll = (-m[2][1]).atan2(m[2][2]);
    (roll, pitch, yaw)
}

/// Time-ordered attitude history with its UTC epoch.
#[derive(Debug, Clone)]
pub struct AttitudeModel {
    pub utc_epoch_time: Epoch,
    /// Nominal spacing of the samples (s); drives window selection.
    pub nominal_sample_time: f64,
    samples: Vec<AttitudeSample>,
}

impl AttitudeModel {
    /// Build a model from samples, which must number at least
    /// [`LAGRANGE_POINTS`] and ascend strictly in time.
    pub fn new(
        utc_epoch_time: Epoch,
        nominal_sample_time: f64,
        samples: Vec<AttitudeSample>,
    ) -> Result<AttitudeModel> {
        if samples.len() < LAGRANGE_POINTS {
            error!(
                "attitude needs at least {LAGRANGE_POINTS} samples, got {}",
                samples.len()
            );
            return Err(LosError::InvalidInput {
                reason: format!(
                    "attitude needs at least {LAGRANGE_POINTS} samples, got {}",
                    samples.len()
                ),
            });
        }
        if nominal_sample_time <= 0.0 {
            return Err(LosError::InvalidInput {
                reason: "attitude nominal sample time must be positive".to_string(),
            });
        }
        for pair in samples.windows(2) {
            if pair[1].seconds_from_epoch <= pair[0].seconds_from_epoch {
                error!(
                    "attitude samples out of order at t={}",
                    pair[1].seconds_from_epoch
                );
                return Err(LosError::InvalidInput {
                    reason: "attitude samples must ascend strictly in time".to_string(),
                });
            }
        }
        Ok(AttitudeModel {
            utc_epoch_time,
            nominal_sample_time,
            samples,
        })
    }

    /// Build a model from perturbation quaternions (body relative to the
    /// orbital reference, with the orbital rotation already composed out
    /// by the attitude processing), as `(seconds_from_epoch, quaternion)`
    /// pairs.
    pub fn from_perturbation_quaternions(
        utc_epoch_time: Epoch,
        nominal_sample_time: f64,
        quaternions: &[(f64, Quaternion)],
    ) -> Result<AttitudeModel> {
        let mut samples = Vec::with_capacity(quaternions.len());
        for &(seconds_from_epoch, quaternion) in quaternions {
            let matrix = quaternion.to_matrix()?;
            let (roll, pitch, yaw) = matrix_to_roll_pitch_yaw(&matrix);
            samples.push(AttitudeSample {
                seconds_from_epoch,
                roll,
                pitch,
                yaw,
            });
        }
        AttitudeModel::new(utc_epoch_time, nominal_sample_time, samples)
    }

    pub fn samples(&self) -> &[AttitudeSample] {
        &self.samples
    }

    /// Interpolate roll/pitch/yaw at a delta time from the attitude epoch.
    pub fn attitude_at(&self, att_time: f64) -> (f64, f64, f64) {
        let half_window = (LAGRANGE_POINTS / 2) as isize;
        let mut index = (att_time / self.nominal_sample_time).floor() as isize - half_window;
        let max_start = (self.samples.len() - LAGRANGE_POINTS) as isize;
        index = index.clamp(0, max_start);
        let window = &self.samples[index as usize..index as usize + LAGRANGE_POINTS];

        let mut times = [0.0; LAGRANGE_POINTS];
        let mut rolls = [0.0; LAGRANGE_POINTS];
        let mut pitches = [0.0; LAGRANGE_POINTS];
        let mut yaws = [0.0; LAGRANGE_POINTS];
        for (i, sample) in window.iter().enumerate() {
            times[i] = sample.seconds_from_epoch;
            rolls[i] = sample.roll;
            pitches[i] = sample.pitch;
            yaws[i] = sample.yaw;
        }
        (
            lagrange_interpolate_scalar(&times, &rolls, att_time),
            lagrange_interpolate_scalar(&times, &pitches, att_time),
            lagrange_interpolate_scalar(&times, &yaws, att_time),
        )
    }
}
