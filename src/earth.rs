//! Earth model: ellipsoid constants, earth-orientation parameters, and
//! ellipsoid geometry used by the projection.
//!
//! [`EarthCharacteristics`] carries the constants the projection needs
//! (ellipsoid shape, rotation rate, speed of light) together with the
//! time-varying corrections looked up from the calibration file for the
//! scene: pole wander and UT1−UTC.
//!
//! [`EopTable`] is the in-memory image of the calibration file's
//! earth-orientation group: one record per day, keyed on Modified Julian
//! Date.

use log::error;

use crate::error::{LosError, Result};
use crate::time::Epoch;
use crate::vector::{cart_to_sph, Vector3};

/// Earth constants and per-scene orientation corrections.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EarthCharacteristics {
    /// Ellipsoid semi-major axis (m)
    pub semi_major_axis: f64,
    /// Ellipsoid semi-minor axis (m)
    pub semi_minor_axis: f64,
    /// First eccentricity squared
    pub eccentricity_squared: f64,
    /// Gravitational constant GM (m³/s²)
    pub gravity_constant: f64,
    /// Earth rotation rate (rad/s)
    pub angular_velocity: f64,
    /// Speed of light (m/s)
    pub speed_of_light: f64,
    /// True pole offset from the mean pole, x toward Greenwich (arc-seconds)
    pub pole_wander_x: f64,
    /// True pole offset from the mean pole, y toward 90° west (arc-seconds)
    pub pole_wander_y: f64,
    /// UT1−UTC (seconds)
    pub ut1_utc_correction: f64,
}

impl Default for EarthCharacteristics {
    /// WGS84 ellipsoid with zero orientation corrections.
    fn default() -> Self {
        let semi_major: f64 = 6378137.0;
        let e2: f64 = 6.69437999014e-3;
        EarthCharacteristics {
            semi_major_axis: semi_major,
            semi_minor_axis: semi_major * (1.0 - e2).sqrt(),
            eccentricity_squared: e2,
            gravity_constant: 3.986004418e14,
            angular_velocity: 7.292115147e-5,
            speed_of_light: 299792458.0,
            pole_wander_x: 0.0,
            pole_wander_y: 0.0,
            ut1_utc_correction: 0.0,
        }
    }
}

impl EarthCharacteristics {
    /// Flattening `(a − b) / a`.
    pub fn flattening(&self) -> f64 {
        (self.semi_major_axis - self.semi_minor_axis) / self.semi_major_axis
    }

    /// Geocentric radius of the reference ellipsoid at a geocentric
    /// latitude (radians).
    pub fn radius_at_geocentric_latitude(&self, latc: f64) -> f64 {
        let (sin_lat, cos_lat) = latc.sin_cos();
        let a2 = self.semi_major_axis * self.semi_major_axis;
        let b2 = self.semi_minor_axis * self.semi_minor_axis;
        1.0 / (cos_lat * cos_lat / a2 + sin_lat * sin_lat / b2).sqrt()
    }

    /// Convert a geocentric latitude and radius to the geodetic latitude
    /// and height above the ellipsoid, both latitudes in radians.
    ///
    /// Iterative solution on the meridian ellipse; converges well below a
    /// millimetre in a handful of steps for any point from the centre of
    /// the Earth out past orbital altitudes.
    pub fn geocentric_to_geodetic(&self, latc: f64, radius: f64) -> Result<(f64, f64)> {
        if radius <= 0.0 {
            error!("geocentric to geodetic conversion with non-positive radius {radius}");
            return Err(LosError::Numeric {
                operation: "geocentric to geodetic conversion",
                reason: "non-positive radius",
            });
        }
        let s = radius * latc.cos();
        let z = radius * latc.sin();
        let e2 = self.eccentricity_squared;
        let a = self.semi_major_axis;

        // Near the poles the longitude-plane distance degenerates; the
        // geodetic latitude is the pole itself.
        if s.abs() < 1e-6 {
            let latd = if z >= 0.0 {
                std::f64::consts::FRAC_PI_2
            } else {
                -std::f64::consts::FRAC_PI_2
            };
            return Ok((latd, z.abs() - self.semi_minor_axis));
        }

        let mut latd = latc;
        let mut height = 0.0;
        for _ in 0..10 {
            let sin_lat = latd.sin();
            let n = a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
            height = s / latd.cos() - n;
            let next = (z / (s * (1.0 - e2 * n / (n + height)))).atan();
            if (next - latd).abs() < 1e-14 {
                latd = next;
                break;
            }
            latd = next;
        }
        Ok((latd, height))
    }

    /// Convert geodetic coordinates (radians, metres) to a Cartesian
    /// Earth-fixed vector.
    pub fn geodetic_to_cartesian(&self, latitude: f64, longitude: f64, height: f64) -> Vector3 {
        let (sin_lat, cos_lat) = latitude.sin_cos();
        let (sin_lon, cos_lon) = longitude.sin_cos();
        let e2 = self.eccentricity_squared;
        let n = self.semi_major_axis / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        Vector3 {
            x: (n + height) * cos_lat * cos_lon,
            y: (n + height) * cos_lat * sin_lon,
            z: (n * (1.0 - e2) + height) * sin_lat,
        }
    }
}

/// Where a line of sight meets the inflated ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetPosition {
    /// Cartesian Earth-fixed target vector (m)
    pub position: Vector3,
    /// Geocentric latitude of the target (radians)
    pub latitude_c: f64,
    /// Longitude of the target (radians)
    pub longitude: f64,
    /// Geocentric radius of the target (m)
    pub radius: f64,
}

/// Intersect a line of sight from the satellite with the reference
/// ellipsoid inflated by `target_elev` metres.
///
/// Solves the quadratic for the smallest positive distance along the LOS;
/// a LOS that misses the inflated ellipsoid, or meets it only behind the
/// sensor, is a numeric error.
pub fn find_target_position(
    satpos: &Vector3,
    los: &Vector3,
    earth: &EarthCharacteristics,
    target_elev: f64,
) -> Result<TargetPosition> {
    let a = earth.semi_major_axis + target_elev;
    let b = earth.semi_minor_axis + target_elev;
    let k = a / b;

    // Scale z so the inflated ellipsoid becomes a sphere of radius a.
    let p = Vector3::new(satpos.x, satpos.y, satpos.z * k);
    let l = Vector3::new(los.x, los.y, los.z * k);

    let qa = l.dot(&l);
    let qb = 2.0 * p.dot(&l);
    let qc = p.dot(&p) - a * a;
    let discriminant = qb * qb - 4.0 * qa * qc;
    if discriminant < 0.0 {
        error!("line of sight does not intersect the ellipsoid (target elevation {target_elev} m)");
        return Err(LosError::NoIntersection { target_elev });
    }

    let t = (-qb - discriminant.sqrt()) / (2.0 * qa);
    if t < 0.0 {
        error!("ellipsoid intersection lies behind the sensor");
        return Err(LosError::NoIntersection { target_elev });
    }

    let position = satpos.add(&los.scale(t));
    let (latitude_c, longitude, radius) = cart_to_sph(&position)?;
    Ok(TargetPosition {
        position,
        latitude_c,
        longitude,
        radius,
    })
}

/// One day of earth-orientation corrections, keyed on MJD.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EopRecord {
    /// Modified Julian Date at the start of the record's one-day bracket
    pub mjd: f64,
    /// Pole wander x (arc-seconds)
    pub pole_wander_x: f64,
    /// Pole wander y (arc-seconds)
    pub pole_wander_y: f64,
    /// UT1−UTC (seconds)
    pub ut1_utc: f64,
}

/// Earth-orientation parameter table from the calibration file, ordered by
/// MJD with one-day brackets.
#[derive(Debug, Clone, Default)]
pub struct EopTable {
    records: Vec<EopRecord>,
}

impl EopTable {
    /// Build a table from records, which must be sorted by strictly
    /// ascending MJD.
    pub fn new(records: Vec<EopRecord>) -> Result<EopTable> {
        for pair in records.windows(2) {
            if pair[1].mjd <= pair[0].mjd {
                error!(
                    "earth orientation records out of order: MJD {} then {}",
                    pair[0].mjd, pair[1].mjd
                );
                return Err(LosError::InvalidInput {
                    reason: "earth orientation records must ascend in MJD".to_string(),
                });
            }
        }
        Ok(EopTable { records })
    }

    /// Select the record whose one-day MJD bracket contains the query.
    pub fn find_mjd_coords(&self, mjd: f64) -> Result<&EopRecord> {
        let idx = self.records.partition_point(|r| r.mjd <= mjd);
        if idx == 0 {
            error!("MJD {mjd} precedes the earth orientation table");
            return Err(LosError::MjdNotFound { mjd });
        }
        let record = &self.records[idx - 1];
        if mjd < record.mjd + 1.0 {
            Ok(record)
        } else {
            error!("MJD {mjd} falls past the earth orientation table");
            Err(LosError::MjdNotFound { mjd })
        }
    }

    /// Compute the MJD of a UTC epoch and look up its corrections,
    /// returning `(mjd, pole_wander_x, pole_wander_y, ut1_utc)`.
    pub fn coords_at_epoch(&self, epoch: &Epoch) -> Result<(f64, f64, f64, f64)> {
        let mjd = epoch.modified_julian_date()?;
        let record = self.find_mjd_coords(mjd)?;
        Ok((
            mjd,
            record.pole_wander_x,
            record.pole_wander_y,
            record.ut1_utc,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn wgs84() -> EarthCharacteristics {
        EarthCharacteristics::default()
    }

    #[test]
    fn test_radius_at_equator_and_pole() {
        let earth = wgs84();
        assert_abs_diff_eq!(
            earth.radius_at_geocentric_latitude(0.0),
            earth.semi_major_axis,
            epsilon = 1e-6
        );
        let polar = earth.radius_at_geocentric_latitude(std::f64::consts::FRAC_PI_2);
        assert_abs_diff_eq!(polar, earth.semi_minor_axis, epsilon = 1e-6);
    }

    #[test]
    fn test_geodetic_round_trip_on_ellipsoid() {
        let earth = wgs84();
        let latd = 0.72;
        let surface = earth.geodetic_to_cartesian(latd, 0.3, 0.0);
        let (latc, _lon, radius) = cart_to_sph(&surface).unwrap();
        let (latd_back, height) = earth.geocentric_to_geodetic(latc, radius).unwrap();
        assert_abs_diff_eq!(latd_back, latd, epsilon = 1e-12);
        assert_abs_diff_eq!(height, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_target_position_nadir() {
        let earth = wgs84();
        let satpos = Vector3::new(7.0e6, 0.0, 0.0);
        let los = Vector3::new(-1.0, 0.0, 0.0);
        let target = find_target_position(&satpos, &los, &earth, 0.0).unwrap();
        assert_abs_diff_eq!(target.position.x, earth.semi_major_axis, epsilon = 1e-6);
        assert_abs_diff_eq!(target.latitude_c, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(target.longitude, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_target_position_misses() {
        let earth = wgs84();
        let satpos = Vector3::new(7.0e6, 0.0, 0.0);
        // Parallel to the local horizontal: never reaches the surface.
        let miss = Vector3::new(0.0, 1.0, 0.0);
        assert!(matches!(
            find_target_position(&satpos, &miss, &earth, 0.0),
            Err(LosError::NoIntersection { .. })
        ));
        // Pointing away from the Earth.
        let away = Vector3::new(1.0, 0.0, 0.0);
        assert!(find_target_position(&satpos, &away, &earth, 0.0).is_err());
    }

    #[test]
    fn test_target_elevation_inflates_surface() {
        let earth = wgs84();
        let satpos = Vector3::new(7.0e6, 0.0, 0.0);
        let los = Vector3::new(-1.0, 0.0, 0.0);
        let target = find_target_position(&satpos, &los, &earth, 1000.0).unwrap();
        assert_abs_diff_eq!(
            target.position.x,
            earth.semi_major_axis + 1000.0,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_eop_bracket_lookup() {
        let table = EopTable::new(vec![
            EopRecord {
                mjd: 57100.0,
                pole_wander_x: 0.03,
                pole_wander_y: 0.31,
                ut1_utc: -0.42,
            },
            EopRecord {
                mjd: 57101.0,
                pole_wander_x: 0.04,
                pole_wander_y: 0.32,
                ut1_utc: -0.43,
            },
        ])
        .unwrap();
        assert_eq!(table.find_mjd_coords(57100.5).unwrap().pole_wander_x, 0.03);
        assert_eq!(table.find_mjd_coords(57101.0).unwrap().pole_wander_x, 0.04);
        assert!(table.find_mjd_coords(57099.9).is_err());
        assert!(table.find_mjd_coords(57102.5).is_err());
    }
}
