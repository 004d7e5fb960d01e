//! Earth-orientation transforms between celestial and terrestrial frames.
//!
//! The ephemeris arrives in ECI J2000; the projection works in ECEF. The
//! chain between them is precession (J2000 ↔ mean-of-date), nutation
//! (mean-of-date ↔ true-of-date), the sidereal rotation by Greenwich
//! apparent sidereal time (ECI-TOD ↔ ECEF-TOD), and polar motion
//! (true pole ↔ mean pole). Each link is available on its own, plus the
//! composite conversions the LOS model uses.
//!
//! Velocity transforms through the sidereal rotation pick up the cross
//! term `Ω* × r` from the frame's rotation rate; `Ω*` is obtained as a
//! 1-second finite difference of GAST. Both composite directions apply
//! the term, so position *and* velocity round-trip.

use crate::error::Result;
use crate::novas;
use crate::time::{Epoch, SECONDS_PER_DAY};
use crate::vector::Vector3;

/// Greenwich apparent sidereal time in radians for a UT1/TT Julian date
/// pair.
pub fn gast(jd_ut1: f64, jd_tt: f64) -> Result<f64> {
    let hours_to_radians = 15.0_f64.to_radians();
    let delta_t = (jd_tt - jd_ut1) * SECONDS_PER_DAY;
    let gast_hours = novas::sidereal_time(
        jd_ut1,
        0.0,
        delta_t,
        novas::SiderealKind::Apparent,
        novas::SiderealMethod::Equinox,
        novas::Accuracy::Full,
    )?;
    Ok(hours_to_radians * gast_hours)
}

/// GAST and the Earth rotation rate in the precessing frame (rad/s) at a
/// UTC epoch, the rate taken as a finite difference of GAST across one
/// second.
fn omega_star_and_gast(ut1_utc: f64, epoch: &Epoch) -> Result<(f64, f64)> {
    let delta = 1.0;
    let delta_days = delta / SECONDS_PER_DAY;
    let (jd_ut1, _jd_tdb, jd_tt) = epoch.to_time_standards(ut1_utc)?;
    let gast_now = gast(jd_ut1, jd_tt)?;
    let gast_later = gast(jd_ut1 + delta_days, jd_tt + delta_days)?;
    let omega_star = (gast_later - gast_now) / delta;
    Ok((omega_star, gast_now))
}

/// Precession from the J2000.0 system to the mean-of-date system.
pub fn precession_j2k2mod(vec: &Vector3, jd_tdb: f64) -> Result<Vector3> {
    novas::precession(crate::time::JD2000, vec, jd_tdb)
}

/// Precession from the mean-of-date system back to J2000.0.
pub fn precession_mod2j2k(vec: &Vector3, jd_tdb: f64) -> Result<Vector3> {
    novas::precession(jd_tdb, vec, crate::time::JD2000)
}

/// Nutation from the mean-of-date system to the true-of-date system.
pub fn nutation_mod2tod(vec: &Vector3, jd_tdb: f64) -> Vector3 {
    novas::nutation(
        jd_tdb,
        novas::Direction::MeanToTrue,
        novas::Accuracy::Full,
        vec,
    )
}

/// Nutation from the true-of-date system to the mean-of-date system.
pub fn nutation_tod2mod(vec: &Vector3, jd_tdb: f64) -> Vector3 {
    novas::nutation(
        jd_tdb,
        novas::Direction::TrueToMean,
        novas::Accuracy::Full,
        vec,
    )
}

/// Polar motion from the true instantaneous pole to the mean pole (CIO).
/// `xp`/`yp` are the true pole offsets in arc-seconds.
pub fn polar_motion_true_pole_to_mean(vec: &Vector3, xp: f64, yp: f64, jd_tdb: f64) -> Vector3 {
    novas::wobble(jd_tdb, novas::Direction::TrueToMean, xp, yp, vec)
}

/// Polar motion from the mean pole (CIO) to the true instantaneous pole.
pub fn polar_motion_mean_pole_to_true(vec: &Vector3, xp: f64, yp: f64, jd_tdb: f64) -> Vector3 {
    novas::wobble(jd_tdb, novas::Direction::MeanToTrue, xp, yp, vec)
}

/// Rotate an ECI true-of-date state into ECEF true-of-date at a UTC epoch
/// by applying Earth rotation, correcting the velocity for the rotating
/// frame.
pub fn sidereal_eci2ecef(
    craft_pos: &Vector3,
    craft_vel: &Vector3,
    ut1_utc: f64,
    epoch: &Epoch,
) -> Result<(Vector3, Vector3)> {
    let (omega_star, gast) = omega_star_and_gast(ut1_utc, epoch)?;
    Ok(rotate_eci2ecef(craft_pos, craft_vel, gast, omega_star))
}

/// Rotate an ECEF true-of-date state into ECI true-of-date at a UTC epoch.
pub fn sidereal_ecef2eci(
    craft_pos: &Vector3,
    craft_vel: &Vector3,
    ut1_utc: f64,
    epoch: &Epoch,
) -> Result<(Vector3, Vector3)> {
    let (omega_star, gast) = omega_star_and_gast(ut1_utc, epoch)?;
    Ok(rotate_ecef2eci(craft_pos, craft_vel, gast, omega_star))
}

/// ECI → ECEF sidereal rotation given GAST and the frame rotation rate.
/// A vector fixed on the Greenwich meridian sits at angle GAST east of the
/// equinox in ECI, so positions rotate by −GAST about +Z.
fn rotate_eci2ecef(pos: &Vector3, vel: &Vector3, gast: f64, omega_star: f64) -> (Vector3, Vector3) {
    let ecef_pos = pos.rotated_around_z(-gast);
    let mut ecef_vel = vel.rotated_around_z(-gast);
    let (sin_g, cos_g) = gast.sin_cos();
    // Rate-of-change of the rotating frame applied to the ECI position.
    ecef_vel.x += -omega_star * sin_g * pos.x + omega_star * cos_g * pos.y;
    ecef_vel.y += -omega_star * cos_g * pos.x - omega_star * sin_g * pos.y;
    (ecef_pos, ecef_vel)
}

/// Exact inverse of [`rotate_eci2ecef`].
fn rotate_ecef2eci(pos: &Vector3, vel: &Vector3, gast: f64, omega_star: f64) -> (Vector3, Vector3) {
    let eci_pos = pos.rotated_around_z(gast);
    let (sin_g, cos_g) = gast.sin_cos();
    let mut tod_vel = *vel;
    tod_vel.x -= -omega_star * sin_g * eci_pos.x + omega_star * cos_g * eci_pos.y;
    tod_vel.y -= -omega_star * cos_g * eci_pos.x - omega_star * sin_g * eci_pos.y;
    let eci_vel = tod_vel.rotated_around_z(gast);
    (eci_pos, eci_vel)
}

/// Transform an ECI J2000 state to mean-pole ECEF at a UTC epoch:
/// precession, nutation, sidereal rotation, polar motion.
pub fn eci2ecef(
    xp: f64,
    yp: f64,
    ut1_utc: f64,
    craft_pos: &Vector3,
    craft_vel: &Vector3,
    epoch: &Epoch,
) -> Result<(Vector3, Vector3)> {
    let (_jd_ut1, jd_tdb, _jd_tt) = epoch.to_time_standards(ut1_utc)?;
    let (omega_star, gast) = omega_star_and_gast(ut1_utc, epoch)?;

    let pos_tod = nutation_mod2tod(&precession_j2k2mod(craft_pos, jd_tdb)?, jd_tdb);
    let vel_tod = nutation_mod2tod(&precession_j2k2mod(craft_vel, jd_tdb)?, jd_tdb);

    let (pos_ecf_tod, vel_ecf_tod) = rotate_eci2ecef(&pos_tod, &vel_tod, gast, omega_star);

    let ecef_pos = polar_motion_true_pole_to_mean(&pos_ecf_tod, xp, yp, jd_tdb);
    let ecef_vel = polar_motion_true_pole_to_mean(&vel_ecf_tod, xp, yp, jd_tdb);
    Ok((ecef_pos, ecef_vel))
}

/// Transform a mean-pole ECEF state to ECI J2000 at a UTC epoch. Exact
/// inverse of [`eci2ecef`].
pub fn ecef2j2k(
    xp: f64,
    yp: f64,
    ut1_utc: f64,
    craft_pos: &Vector3,
    craft_vel: &Vector3,
    epoch: &Epoch,
) -> Result<(Vector3, Vector3)> {
    let (_jd_ut1, jd_tdb, _jd_tt) = epoch.to_time_standards(ut1_utc)?;
    let (omega_star, gast) = omega_star_and_gast(ut1_utc, epoch)?;

    let pos_ecf_tod = polar_motion_mean_pole_to_true(craft_pos, xp, yp, jd_tdb);
    let vel_ecf_tod = polar_motion_mean_pole_to_true(craft_vel, xp, yp, jd_tdb);

    let (pos_tod, vel_tod) = rotate_ecef2eci(&pos_ecf_tod, &vel_ecf_tod, gast, omega_star);

    let eci_pos = precession_mod2j2k(&nutation_tod2mod(&pos_tod, jd_tdb), jd_tdb)?;
    let eci_vel = precession_mod2j2k(&nutation_tod2mod(&vel_tod, jd_tdb), jd_tdb)?;
    Ok((eci_pos, eci_vel))
}

/// Convert an ECI J2000 position to ECI true-of-date.
pub fn j2k2tod(ut1_utc: f64, pos: &Vector3, epoch: &Epoch) -> Result<Vector3> {
    let (_jd_ut1, jd_tdb, _jd_tt) = epoch.to_time_standards(ut1_utc)?;
    Ok(nutation_mod2tod(&precession_j2k2mod(pos, jd_tdb)?, jd_tdb))
}

/// Convert an ECI true-of-date position to ECI J2000.
pub fn tod2j2k(ut1_utc: f64, pos: &Vector3, epoch: &Epoch) -> Result<Vector3> {
    let (_jd_ut1, jd_tdb, _jd_tt) = epoch.to_time_standards(ut1_utc)?;
    precession_mod2j2k(&nutation_tod2mod(pos, jd_tdb), jd_tdb)
}
