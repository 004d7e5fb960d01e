//! Astronomical adapter lifecycle and contract checks.

use approx::assert_abs_diff_eq;

use crate::novas;
use crate::vector::Vector3;

#[test]
fn test_initialize_shutdown_once_per_process() {
    // The guards are process-wide; run the whole lifecycle in one test so
    // parallel test threads cannot interleave with it.
    novas::initialize().unwrap();
    assert!(novas::initialize().is_err());
    novas::shutdown().unwrap();
    assert!(novas::shutdown().is_err());
    // A second init/shutdown pair would be a new "process" from the
    // guard's point of view; the adapter only rejects overlap.
    novas::initialize().unwrap();
    novas::shutdown().unwrap();
}

#[test]
fn test_direction_constants_invert_each_other() {
    let vec = Vector3::new(0.3, -0.5, 0.81);
    let jd = 2457200.5;
    let forward = novas::nutation(
        jd,
        novas::Direction::MeanToTrue,
        novas::Accuracy::Full,
        &vec,
    );
    let back = novas::nutation(
        jd,
        novas::Direction::TrueToMean,
        novas::Accuracy::Full,
        &forward,
    );
    assert_abs_diff_eq!(back.sub(&vec).length(), 0.0, epsilon = 1e-12);
}

#[test]
fn test_reduced_accuracy_accepted() {
    let vec = Vector3::new(1.0, 0.0, 0.0);
    let full = novas::nutation(
        2457200.5,
        novas::Direction::MeanToTrue,
        novas::Accuracy::Full,
        &vec,
    );
    let reduced = novas::nutation(
        2457200.5,
        novas::Direction::MeanToTrue,
        novas::Accuracy::Reduced,
        &vec,
    );
    assert_eq!(full, reduced);
}

#[test]
fn test_mean_vs_apparent_sidereal_time() {
    // The equation of the equinoxes keeps GAST within about 1.2 seconds
    // of GMST.
    let jd_ut1 = 2457200.5;
    let delta_t = 67.6;
    let gmst = novas::sidereal_time(
        jd_ut1,
        0.0,
        delta_t,
        novas::SiderealKind::Mean,
        novas::SiderealMethod::Equinox,
        novas::Accuracy::Full,
    )
    .unwrap();
    let gast = novas::sidereal_time(
        jd_ut1,
        0.0,
        delta_t,
        novas::SiderealKind::Apparent,
        novas::SiderealMethod::Equinox,
        novas::Accuracy::Full,
    )
    .unwrap();
    let diff_seconds = (gast - gmst).abs() * 3600.0;
    assert!(diff_seconds < 1.5, "equation of equinoxes was {diff_seconds} s");
}
