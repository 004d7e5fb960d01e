//! Geocentric solar position service.
//!
//! The Sun's geocentric position is the negated Earth heliocentric
//! position from the `Epv00` ephemeris, rotated from J2000 into the true
//! equator and equinox of date.

use std::f64::consts::PI;

use crate::error::Result;
use crate::novas;
use crate::vector::{cart_to_sph, Vector3};

/// Geocentric position of the Sun at a Julian date.
///
/// Returns `(right_ascension_hours, declination_degrees, distance_au)`
/// referred to the true equator and equinox of date.
pub fn geocentric_position(julian_date: f64) -> Result<(f64, f64, f64)> {
    let (earth_h, _earth_b) = erfars::ephemerides::Epv00(julian_date, 0.0);

    // The Sun sits opposite the Earth's heliocentric position (AU, J2000).
    let sun_j2000 = Vector3::new(-earth_h[0], -earth_h[1], -earth_h[2]);

    let sun_mod = novas::precession(crate::time::JD2000, &sun_j2000, julian_date)?;
    let sun_tod = novas::nutation(
        julian_date,
        novas::Direction::MeanToTrue,
        novas::Accuracy::Full,
        &sun_mod,
    );

    let (dec_rad, ra_rad, dist_au) = cart_to_sph(&sun_tod)?;
    let mut ra_hours = ra_rad * 12.0 / PI;
    if ra_hours < 0.0 {
        ra_hours += 24.0;
    }
    Ok((ra_hours, dec_rad.to_degrees(), dist_au))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_sun_distance_near_one_au() {
        let (_, _, dist) = geocentric_position(2457236.5).unwrap();
        assert_abs_diff_eq!(dist, 1.0, epsilon = 0.02);
    }

    #[test]
    fn test_sun_declination_bounded_by_obliquity() {
        let (_, dec, _) = geocentric_position(2457236.5).unwrap();
        assert!(dec.abs() < 23.5);
    }
}
