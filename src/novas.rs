//! Astronomical routine adapter.
//!
//! Thin facade over the `erfars` (Essential Routines for Fundamental
//! Astronomy) library, presenting the narrow contract the earth-orientation
//! transforms rely on: sidereal time, precession, nutation, polar-motion
//! wobble, and the TDB↔TT periodic difference. Keeping every `erfars` call
//! in this module makes it obvious where the external astronomical models
//! are consulted.
//!
//! The adapter carries process-wide initialise/shutdown guards: both must
//! be called exactly once per process and must not interleave with
//! transform calls. The underlying routines are themselves stateless, so
//! the transforms stay safe for concurrent use between the two calls.

use std::f64::consts::PI;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{LosError, Result};
use crate::time::JD2000;
use crate::vector::{
    matrix_multiply, matrix_times_vector, matrix_transpose, rotation_x, rotation_y, rotation_z,
    Matrix3, Vector3,
};

/// Transformation direction for [`nutation`] and [`wobble`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Mean system to true system (NOVAS direction constant 0).
    MeanToTrue,
    /// True system to mean system (NOVAS direction constant -1).
    TrueToMean,
}

/// Accuracy selector. The full IAU 2000A series is evaluated for both
/// settings; `Reduced` is accepted for contract compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accuracy {
    Full,
    Reduced,
}

/// Which sidereal time to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiderealKind {
    /// Greenwich mean sidereal time.
    Mean,
    /// Greenwich apparent sidereal time (includes the equation of the
    /// equinoxes).
    Apparent,
}

/// Sidereal-time computation method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiderealMethod {
    /// Equinox-based method (the only one the transforms use).
    Equinox,
    /// CIO-based method; not provided by this adapter.
    Cio,
}

static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Initialise the adapter. Must be called exactly once per process,
/// before any transform work.
pub fn initialize() -> Result<()> {
    if INITIALIZED.swap(true, Ordering::SeqCst) {
        log::error!("astronomical adapter initialised twice");
        return Err(LosError::Adapter {
            routine: "initialize",
            reason: "already initialised in this process".to_string(),
        });
    }
    Ok(())
}

/// Shut the adapter down. Must be called exactly once, after all
/// transform work.
pub fn shutdown() -> Result<()> {
    if !INITIALIZED.swap(false, Ordering::SeqCst) {
        log::error!("astronomical adapter shut down without initialisation");
        return Err(LosError::Adapter {
            routine: "shutdown",
            reason: "not initialised".to_string(),
        });
    }
    Ok(())
}

/// Periodic difference between Barycentric Dynamical Time and Terrestrial
/// Time. Returns `(jd_tt, secdiff)` where `secdiff = TDB − TT` in seconds.
///
/// The dominant annual term of the series is evaluated; the neglected
/// terms are below 50 µs.
pub fn tdb2tt(jd_tdb: f64) -> (f64, f64) {
    let t = (jd_tdb - JD2000) / 36525.0;
    let secdiff = 0.001657 * (628.3076 * t + 6.2401).sin();
    (jd_tdb - secdiff / 86400.0, secdiff)
}

/// IAU 2006 precession of a vector between J2000.0 and the mean equator
/// and equinox of date.
///
/// Exactly one of `jd_tdb_from` / `jd_tdb_to` must be the J2000 epoch
/// (2451545.0); the other selects the mean-of-date system.
///
/// # Errors
/// Returns `LosError::Adapter` when neither epoch is J2000.
pub fn precession(jd_tdb_from: f64, vec: &Vector3, jd_tdb_to: f64) -> Result<Vector3> {
    if jd_tdb_from == JD2000 {
        Ok(matrix_times_vector(&precession_matrix(jd_tdb_to), vec))
    } else if jd_tdb_to == JD2000 {
        let transposed = matrix_transpose(&precession_matrix(jd_tdb_from));
        Ok(matrix_times_vector(&transposed, vec))
    } else {
        log::error!(
            "precession requires one epoch at J2000, got {} -> {}",
            jd_tdb_from,
            jd_tdb_to
        );
        Err(LosError::Adapter {
            routine: "precession",
            reason: format!(
                "one of the epochs must be J2000 ({} -> {})",
                jd_tdb_from, jd_tdb_to
            ),
        })
    }
}

fn precession_matrix(jd: f64) -> Matrix3 {
    let mut rbp = [0.0; 9];
    erfars::precnutpolar::Pmat06(jd, 0.0, &mut rbp);
    [
        [rbp[0], rbp[1], rbp[2]],
        [rbp[3], rbp[4], rbp[5]],
        [rbp[6], rbp[7], rbp[8]],
    ]
}

/// IAU 2000A nutation of a vector between the mean and true equator and
/// equinox of date at the given TDB Julian date.
pub fn nutation(jd_tdb: f64, direction: Direction, _accuracy: Accuracy, vec: &Vector3) -> Vector3 {
    let (dpsi, deps) = erfars::precnutpolar::Nut00a(jd_tdb, 0.0);
    let eps_mean = erfars::precnutpolar::Obl06(jd_tdb, 0.0);
    let eps_true = eps_mean + deps;
    // r_true = R1(-eps_true) * R3(-dpsi) * R1(eps_mean) * r_mean
    let mean_to_true = matrix_multiply(
        &rotation_x(eps_true),
        &matrix_multiply(&rotation_z(dpsi), &rotation_x(-eps_mean)),
    );
    match direction {
        Direction::MeanToTrue => matrix_times_vector(&mean_to_true, vec),
        Direction::TrueToMean => matrix_times_vector(&matrix_transpose(&mean_to_true), vec),
    }
}

/// Polar-motion (wobble) rotation between the mean pole (CIO) system and
/// the true instantaneous pole system.
///
/// `xp`/`yp` are the pole offsets in arc-seconds, x toward the Greenwich
/// meridian, y toward 90° west.
pub fn wobble(_jd_tdb: f64, direction: Direction, xp: f64, yp: f64, vec: &Vector3) -> Vector3 {
    const ARCSEC_TO_RAD: f64 = PI / (180.0 * 3600.0);
    let xp_rad = xp * ARCSEC_TO_RAD;
    let yp_rad = yp * ARCSEC_TO_RAD;
    let mean_to_true = matrix_multiply(&rotation_y(-xp_rad), &rotation_x(-yp_rad));
    match direction {
        Direction::MeanToTrue => matrix_times_vector(&mean_to_true, vec),
        Direction::TrueToMean => matrix_times_vector(&matrix_transpose(&mean_to_true), vec),
    }
}

/// Greenwich sidereal time in fractional hours [0, 24).
///
/// `jd_ut1_high`/`jd_ut1_low` form a split UT1 Julian date; `delta_t` is
/// TT−UT1 in seconds. Only the equinox method is provided.
pub fn sidereal_time(
    jd_ut1_high: f64,
    jd_ut1_low: f64,
    delta_t: f64,
    kind: SiderealKind,
    method: SiderealMethod,
    _accuracy: Accuracy,
) -> Result<f64> {
    if method == SiderealMethod::Cio {
        log::error!("CIO sidereal time method requested but not provided");
        return Err(LosError::Adapter {
            routine: "sidereal_time",
            reason: "CIO method not provided".to_string(),
        });
    }
    let tt_low = jd_ut1_low + delta_t / 86400.0;
    let angle = match kind {
        SiderealKind::Mean => erfars::rotationtime::Gmst06(jd_ut1_high, jd_ut1_low, jd_ut1_high, tt_low),
        SiderealKind::Apparent => {
            erfars::rotationtime::Gst06a(jd_ut1_high, jd_ut1_low, jd_ut1_high, tt_low)
        }
    };
    let mut hours = angle * 12.0 / PI;
    hours %= 24.0;
    if hours < 0.0 {
        hours += 24.0;
    }
    Ok(hours)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_tdb2tt_bounds() {
        let (jd_tt, secdiff) = tdb2tt(2457000.5);
        assert!(secdiff.abs() < 0.002);
        assert_abs_diff_eq!(jd_tt, 2457000.5, epsilon = 0.002 / 86400.0);
    }

    #[test]
    fn test_precession_requires_j2000() {
        let v = Vector3::new(1.0, 0.0, 0.0);
        assert!(precession(2457000.5, &v, 2457001.5).is_err());
        assert!(precession(JD2000, &v, 2457000.5).is_ok());
        assert!(precession(2457000.5, &v, JD2000).is_ok());
    }

    #[test]
    fn test_precession_round_trip() {
        let v = Vector3::new(0.3, -0.4, 0.866);
        let jd = 2457123.5;
        let forward = precession(JD2000, &v, jd).unwrap();
        let back = precession(jd, &forward, JD2000).unwrap();
        assert_abs_diff_eq!(back.x, v.x, epsilon = 1e-12);
        assert_abs_diff_eq!(back.y, v.y, epsilon = 1e-12);
        assert_abs_diff_eq!(back.z, v.z, epsilon = 1e-12);
    }

    #[test]
    fn test_nutation_round_trip_and_magnitude() {
        let v = Vector3::new(7.0e6, 0.0, 100.0);
        let jd = 2457123.5;
        let t = nutation(jd, Direction::MeanToTrue, Accuracy::Full, &v);
        let back = nutation(jd, Direction::TrueToMean, Accuracy::Full, &t);
        assert_abs_diff_eq!(back.x, v.x, epsilon = 1e-5);
        assert_abs_diff_eq!(back.y, v.y, epsilon = 1e-5);
        assert_abs_diff_eq!(back.z, v.z, epsilon = 1e-5);
        assert_abs_diff_eq!(t.length(), v.length(), epsilon = 1e-6);
    }

    #[test]
    fn test_wobble_small_rotation() {
        let v = Vector3::new(0.0, 0.0, 7.0e6);
        let t = wobble(2457123.5, Direction::MeanToTrue, 0.1, 0.2, &v);
        // 0.1 arcsec on a 7000 km lever arm is a few metres.
        assert_abs_diff_eq!(t.x, v.x, epsilon = 10.0);
        assert_abs_diff_eq!(t.y, v.y, epsilon = 10.0);
        let back = wobble(2457123.5, Direction::TrueToMean, 0.1, 0.2, &t);
        assert_abs_diff_eq!(back.x, v.x, epsilon = 1e-9);
        assert_abs_diff_eq!(back.y, v.y, epsilon = 1e-9);
        assert_abs_diff_eq!(back.z, v.z, epsilon = 1e-9);
    }

    #[test]
    fn test_sidereal_time_range() {
        let hours = sidereal_time(
            2457123.5,
            0.0,
            67.184,
            SiderealKind::Apparent,
            SiderealMethod::Equinox,
            Accuracy::Full,
        )
        .unwrap();
        assert!((0.0..24.0).contains(&hours));
    }

    #[test]
    fn test_sidereal_cio_rejected() {
        assert!(sidereal_time(
            2457123.5,
            0.0,
            67.184,
            SiderealKind::Apparent,
            SiderealMethod::Cio,
            Accuracy::Full,
        )
        .is_err());
    }
}
