//! Ellipsoid geometry and spherical conversion properties.

use approx::assert_abs_diff_eq;

use crate::earth::{find_target_position, EarthCharacteristics};
use crate::error::LosError;
use crate::vector::{cart_to_sph, sph_to_cart, Vector3};

#[test]
fn test_sph_cart_identity() {
    for &(lat, lon) in &[(0.0, 0.0), (0.7, -2.1), (-1.2, 3.0), (1.5, 0.1)] {
        let vec = sph_to_cart(lat, lon, 6.4e6);
        let (lat2, lon2, r2) = cart_to_sph(&vec).unwrap();
        assert_abs_diff_eq!(lat2, lat, epsilon = 1e-12);
        assert_abs_diff_eq!(lon2, lon, epsilon = 1e-12);
        assert_abs_diff_eq!(r2, 6.4e6, epsilon = 1e-3);
    }
}

#[test]
fn test_longitude_sign_ambiguity_at_pole() {
    // At the pole the longitude is arbitrary; latitude and radius are not.
    let vec = sph_to_cart(std::f64::consts::FRAC_PI_2, 1.0, 6.4e6);
    let (lat, _lon, r) = cart_to_sph(&vec).unwrap();
    assert_abs_diff_eq!(lat, std::f64::consts::FRAC_PI_2, epsilon = 1e-7);
    assert_abs_diff_eq!(r, 6.4e6, epsilon = 1e-3);
}

#[test]
fn test_geodetic_round_trip_zero_height() {
    let earth = EarthCharacteristics::default();
    for latd_deg in [-75.0, -30.0, 0.0, 15.0, 45.0, 89.0] {
        let latd: f64 = (latd_deg as f64).to_radians();
        let surface = earth.geodetic_to_cartesian(latd, 0.8, 0.0);
        let (latc, _lon, radius) = cart_to_sph(&surface).unwrap();
        let (latd_back, height) = earth.geocentric_to_geodetic(latc, radius).unwrap();
        let point_back = earth.geodetic_to_cartesian(latd_back, 0.8, height);
        assert!(
            point_back.sub(&surface).length() < 1e-3,
            "round trip missed at {latd_deg} degrees"
        );
        assert_abs_diff_eq!(height, 0.0, epsilon = 1e-3);
    }
}

#[test]
fn test_earth_radius_between_axes() {
    let earth = EarthCharacteristics::default();
    for latc_deg in [-90.0, -45.0, 0.0, 30.0, 60.0, 90.0] {
        let r = earth.radius_at_geocentric_latitude((latc_deg as f64).to_radians());
        assert!(r <= earth.semi_major_axis + 1e-6);
        assert!(r >= earth.semi_minor_axis - 1e-6);
    }
}

#[test]
fn test_horizontal_los_has_no_intersection() {
    let earth = EarthCharacteristics::default();
    let satpos = Vector3::new(7.0e6, 0.0, 0.0);
    let horizontal = Vector3::new(0.0, 0.6, 0.8);
    assert!(matches!(
        find_target_position(&satpos, &horizontal, &earth, 0.0),
        Err(LosError::NoIntersection { .. })
    ));
}

#[test]
fn test_negative_target_elevation() {
    let earth = EarthCharacteristics::default();
    let satpos = Vector3::new(7.0e6, 0.0, 0.0);
    let los = Vector3::new(-1.0, 0.0, 0.0);
    let target = find_target_position(&satpos, &los, &earth, -400.0).unwrap();
    assert_abs_diff_eq!(
        target.position.x,
        earth.semi_major_axis - 400.0,
        epsilon = 1e-6
    );
}

#[test]
fn test_oblique_intersection_on_inflated_surface() {
    let earth = EarthCharacteristics::default();
    let satpos = Vector3::new(7.0e6, 0.0, 0.0);
    let los = Vector3::new(-0.995, 0.05, 0.08).normalized().unwrap();
    let elev = 2500.0;
    let target = find_target_position(&satpos, &los, &earth, elev).unwrap();
    // The point sits on the inflated ellipsoid: radius at its latitude
    // plus the elevation, to first order.
    let surface = earth.radius_at_geocentric_latitude(target.latitude_c) + elev;
    assert_abs_diff_eq!(target.radius, surface, epsilon = 30.0);
}
