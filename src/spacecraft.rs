//! Spacecraft model: the ephemeris and attitude histories for a collect.

use crate::attitude::AttitudeModel;
use crate::ephemeris::EphemerisModel;

/// What the collect is imaging. The acquisition type selects which frame
/// the ephemeris is interpolated in (ECEF for Earth, ECI for stellar and
/// lunar), whether the centre-of-mass correction applies, and whether the
/// line of sight is intersected with the ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionType {
    Earth,
    Stellar,
    Lunar,
}

/// The spacecraft side of the LOS model.
#[derive(Debug, Clone)]
pub struct SpacecraftModel {
    pub ephemeris: EphemerisModel,
    pub attitude: AttitudeModel,
}
