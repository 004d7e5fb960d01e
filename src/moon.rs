//! Geocentric lunar position service.
//!
//! Uses the ELP2000-82 based `Moon98` ephemeris for the Moon's geocentric
//! position, rotated from the J2000 system into the true equator and
//! equinox of date, which is the frame the LOS model's lunar pipeline
//! expects.

use std::f64::consts::PI;

use crate::error::Result;
use crate::novas;
use crate::vector::{cart_to_sph, Vector3};

/// Kilometres per astronomical unit.
const KM_PER_AU: f64 = 149_597_870.7;

/// Geocentric position of the Moon at a Julian date (TT scale is
/// accurate enough for the ephemeris' own precision).
///
/// Returns `(right_ascension_hours, declination_degrees, distance_km)`
/// referred to the true equator and equinox of date.
pub fn geocentric_position(julian_date: f64) -> Result<(f64, f64, f64)> {
    let pv = erfars::ephemerides::Moon98(julian_date, 0.0);

    // J2000 equatorial position in AU.
    let moon_j2000 = Vector3::new(pv[0], pv[1], pv[2]);

    // Rotate into the true-of-date system.
    let moon_mod = novas::precession(crate::time::JD2000, &moon_j2000, julian_date)?;
    let moon_tod = novas::nutation(
        julian_date,
        novas::Direction::MeanToTrue,
        novas::Accuracy::Full,
        &moon_mod,
    );

    let (dec_rad, ra_rad, dist_au) = cart_to_sph(&moon_tod)?;
    let mut ra_hours = ra_rad * 12.0 / PI;
    if ra_hours < 0.0 {
        ra_hours += 24.0;
    }
    Ok((ra_hours, dec_rad.to_degrees(), dist_au * KM_PER_AU))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moon_distance_plausible() {
        // Perigee to apogee is roughly 356,500 - 406,700 km.
        let (_, _, dist) = geocentric_position(2457236.5).unwrap();
        assert!(dist > 350000.0 && dist < 410000.0);
    }

    #[test]
    fn test_moon_angles_in_range() {
        let (ra, dec, _) = geocentric_position(2457236.5).unwrap();
        assert!((0.0..24.0).contains(&ra));
        // The Moon stays within about 29 degrees of the equator.
        assert!(dec.abs() < 30.0);
    }
}
