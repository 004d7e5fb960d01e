//! Round-trip properties of the celestial/terrestrial frame transforms.

use approx::assert_abs_diff_eq;

use crate::frames;
use crate::time::Epoch;
use crate::vector::Vector3;

const XP: f64 = 0.034;
const YP: f64 = 0.31;
const UT1_UTC: f64 = -0.42;

/// A polar-orbit state vector: mostly-Z velocity over the pole-to-pole
/// ground track.
fn polar_state() -> (Vector3, Vector3) {
    (
        Vector3::new(5.1e6, -4.8e6, 123.0),
        Vector3::new(900.0, 950.0, 7400.0),
    )
}

#[test]
fn test_eci2ecef_round_trip_polar_orbit_2015() {
    let (pos, vel) = polar_state();
    let epoch = Epoch::new(2015, 187.0, 33215.5).unwrap();

    let (p_ecf, v_ecf) = frames::eci2ecef(XP, YP, UT1_UTC, &pos, &vel, &epoch).unwrap();
    let (p_eci, v_eci) = frames::ecef2j2k(XP, YP, UT1_UTC, &p_ecf, &v_ecf, &epoch).unwrap();

    // Positions and velocities come back within a micrometre.
    assert_abs_diff_eq!(p_eci.x, pos.x, epsilon = 1.0e-6);
    assert_abs_diff_eq!(p_eci.y, pos.y, epsilon = 1.0e-6);
    assert_abs_diff_eq!(p_eci.z, pos.z, epsilon = 1.0e-6);
    assert_abs_diff_eq!(v_eci.x, vel.x, epsilon = 1.0e-6);
    assert_abs_diff_eq!(v_eci.y, vel.y, epsilon = 1.0e-6);
    assert_abs_diff_eq!(v_eci.z, vel.z, epsilon = 1.0e-6);
}

#[test]
fn test_round_trip_over_window() {
    let (pos, vel) = polar_state();
    let base = Epoch::new(2015, 187.0, 30000.0).unwrap();
    // Sample the window at 0, 2500, 5000, 7500, 10000 seconds.
    for step in 0..5 {
        let epoch = base.add_seconds(step as f64 * 2500.0).unwrap();
        let (p_ecf, v_ecf) = frames::eci2ecef(XP, YP, UT1_UTC, &pos, &vel, &epoch).unwrap();
        let (p_eci, _) = frames::ecef2j2k(XP, YP, UT1_UTC, &p_ecf, &v_ecf, &epoch).unwrap();
        let miss = p_eci.sub(&pos).length();
        assert!(miss < 1.0e-3, "round trip missed by {miss} m at step {step}");
    }
}

#[test]
fn test_rotation_preserves_magnitude() {
    let (pos, vel) = polar_state();
    let epoch = Epoch::new(2015, 187.0, 33215.5).unwrap();
    let (p_ecf, _v_ecf) = frames::eci2ecef(XP, YP, UT1_UTC, &pos, &vel, &epoch).unwrap();
    assert_abs_diff_eq!(p_ecf.length(), pos.length(), epsilon = 1.0e-6);
}

#[test]
fn test_precession_identity_ratio() {
    let vec = Vector3::new(-2.3e6, 6.4e6, 1.1e6);
    let jd_tdb = 2457123.25;
    let forward = frames::precession_j2k2mod(&vec, jd_tdb).unwrap();
    let back = frames::precession_mod2j2k(&forward, jd_tdb).unwrap();
    assert_abs_diff_eq!(back.length() / vec.length(), 1.0, epsilon = 1.0e-12);
    assert!(back.sub(&vec).length() / vec.length() < 1.0e-12);
}

#[test]
fn test_nutation_round_trip() {
    let vec = Vector3::new(7.1e6, -0.4e6, 0.9e6);
    let jd_tdb = 2457123.25;
    let tod = frames::nutation_mod2tod(&vec, jd_tdb);
    let back = frames::nutation_tod2mod(&tod, jd_tdb);
    assert_abs_diff_eq!(back.sub(&vec).length(), 0.0, epsilon = 1.0e-5);
}

#[test]
fn test_polar_motion_round_trip() {
    let vec = Vector3::new(7.1e6, -0.4e6, 0.9e6);
    let jd_tdb = 2457123.25;
    let mean = frames::polar_motion_true_pole_to_mean(&vec, XP, YP, jd_tdb);
    let back = frames::polar_motion_mean_pole_to_true(&mean, XP, YP, jd_tdb);
    assert_abs_diff_eq!(back.sub(&vec).length(), 0.0, epsilon = 1.0e-9);
    // The wobble is sub-arcsecond: displacements stay within metres.
    assert!(mean.sub(&vec).length() < 20.0);
}

#[test]
fn test_gast_matches_earth_rotation_over_a_day() {
    // GAST advances by about 2π + 2π/365.25 per solar day.
    let epoch = Epoch::new(2015, 187.0, 20000.0).unwrap();
    let (jd_ut1, _jd_tdb, jd_tt) = epoch.to_time_standards(UT1_UTC).unwrap();
    let g0 = frames::gast(jd_ut1, jd_tt).unwrap();
    let g1 = frames::gast(jd_ut1 + 1.0, jd_tt + 1.0).unwrap();
    let mut advance = g1 - g0;
    if advance < 0.0 {
        advance += std::f64::consts::TAU;
    }
    let expected = std::f64::consts::TAU / 365.25;
    assert_abs_diff_eq!(advance, expected, epsilon = 1.0e-4);
}
