//! The line-of-sight model and the forward projection.
//!
//! [`LosModel`] ties together the spacecraft ephemeris and attitude, the
//! per-band sensor geometry, and the Earth model for one collect. It is
//! assembled once per scene and then read by any number of projection
//! calls; every operation here is pure with respect to the model.
//!
//! The forward projection maps an image pixel to the geodetic coordinate
//! it observes: pixel time and sensor LOS, attitude and ephemeris at that
//! time, the sensor→ACS→orbit→Earth-fixed rotation chain, the
//! centre-of-mass offset, velocity aberration, the ellipsoid intersection
//! at the target elevation, the light-travel-time correction, and finally
//! the geocentric→geodetic conversion.

use log::error;

use crate::earth::{find_target_position, EarthCharacteristics, EopTable};
use crate::error::{LosError, Result};
use crate::frames;
use crate::sensor::{DetectorType, SensorModel};
use crate::spacecraft::{AcquisitionType, SpacecraftModel};
use crate::vector::{
    cart_to_sph, matrix_multiply, matrix_times_vector, sph_to_cart, Matrix3, Vector3,
};
use crate::{moon, sun};

/// Astronomical unit in metres.
const METERS_PER_AU: f64 = 1.495978707e11;

/// Spacecraft state at an image location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SatelliteState {
    /// Satellite position (m), ECEF for Earth collects, ECI otherwise
    pub position: Vector3,
    /// Satellite velocity (m/s) in the same frame
    pub velocity: Vector3,
    /// Roll/pitch/yaw at the image time (radians)
    pub attitude: Vector3,
    /// Seconds of day of the image time
    pub image_time_seconds_of_day: f64,
    /// Year of the image time
    pub year: i32,
    /// Day of year of the image time
    pub day: i32,
}

/// The assembled line-of-sight model for one collect.
#[derive(Debug, Clone)]
pub struct LosModel {
    pub wrs_path: i32,
    pub wrs_row: i32,
    pub acquisition_type: AcquisitionType,
    pub spacecraft: SpacecraftModel,
    pub sensor: SensorModel,
    pub earth: EarthCharacteristics,
}

/// Calculate the orbital-to-ECEF and attitude-perturbation matrices.
///
/// The orbital triad forms the matrix columns: Z along the geocentric
/// nadir (−p̂), Y along the negative angular momentum ((Z × v) normalised),
/// X completing the right-handed set (Y × Z). The perturbation matrix is
/// `R_yaw * R_pitch * R_roll`.
pub fn compute_orientation_matrices(
    satpos: &Vector3,
    satvel: &Vector3,
    roll: f64,
    pitch: f64,
    yaw: f64,
) -> Result<(Matrix3, Matrix3)> {
    let vector_z = satpos.scale(-1.0);
    let vector_y = vector_z.cross(satvel);
    let vector_x = vector_y.cross(&vector_z);

    let mag_x = vector_x.length();
    let mag_y = vector_y.length();
    let mag_z = vector_z.length();
    if mag_x == 0.0 || mag_y == 0.0 || mag_z == 0.0 {
        error!("degenerate orbital triad: position and velocity are parallel or zero");
        return Err(LosError::Numeric {
            operation: "orbital triad construction",
            reason: "zero-magnitude axis",
        });
    }

    let orb2ecf = [
        [vector_x.x / mag_x, vector_y.x / mag_y, vector_z.x / mag_z],
        [vector_x.y / mag_x, vector_y.y / mag_y, vector_z.y / mag_z],
        [vector_x.z / mag_x, vector_y.z / mag_y, vector_z.z / mag_z],
    ];

    let (roll_sin, roll_cos) = roll.sin_cos();
    let (pitch_sin, pitch_cos) = pitch.sin_cos();
    let (yaw_sin, yaw_cos) = yaw.sin_cos();
    let attpert = [
        [
            pitch_cos * yaw_cos,
            yaw_cos * roll_sin * pitch_sin + roll_cos * yaw_sin,
            roll_sin * yaw_sin - pitch_sin * roll_cos * yaw_cos,
        ],
        [
            -yaw_sin * pitch_cos,
            yaw_cos * roll_cos - yaw_sin * roll_sin * pitch_sin,
            pitch_sin * yaw_sin * roll_cos + yaw_cos * roll_sin,
        ],
        [pitch_sin, -roll_sin * pitch_cos, pitch_cos * roll_cos],
    ];

    Ok((orb2ecf, attpert))
}

/// Project a sensor-frame LOS into the frame the ephemeris is expressed
/// in (ECEF for Earth collects, ECI otherwise).
///
/// Returns the orientation matrices together with the perturbed LOS in
/// orbital coordinates and the fully rotated LOS.
pub fn convert_sensor_los_to_spacecraft(
    sensor_to_acs: &Matrix3,
    satpos: &Vector3,
    satvel: &Vector3,
    sensor_los: &Vector3,
    roll: f64,
    pitch: f64,
    yaw: f64,
) -> Result<(Matrix3, Matrix3, Vector3, Vector3)> {
    let (orb2ecf, attpert) = compute_orientation_matrices(satpos, satvel, roll, pitch, yaw)?;
    let acs_los = matrix_times_vector(sensor_to_acs, sensor_los);
    let pert_los = matrix_times_vector(&attpert, &acs_los);
    let new_los = matrix_times_vector(&orb2ecf, &pert_los);
    Ok((orb2ecf, attpert, pert_los, new_los))
}

/// Move the satellite position from the centre of mass to the sensor
/// origin: `pos + orb2ecf * attpert * cm_offset`.
pub fn correct_for_center_of_mass(
    cm_to_sensor: &Vector3,
    orb2ecf: &Matrix3,
    attpert: &Matrix3,
    position: &Vector3,
) -> Vector3 {
    let combined = matrix_multiply(orb2ecf, attpert);
    position.add(&matrix_times_vector(&combined, cm_to_sensor))
}

/// Correct a LOS for relativistic velocity aberration: the apparent
/// deflection from the relative velocity of the spacecraft and the target.
///
/// For Earth collects the ground velocity at the first-pass intersection
/// (at zero elevation) is subtracted from the spacecraft velocity; for
/// stellar and lunar collects the target is taken as fixed. The corrected
/// LOS is renormalised.
pub fn correct_for_velocity_aberration(
    satpos: &Vector3,
    satvel: &Vector3,
    acquisition_type: AcquisitionType,
    earth: &EarthCharacteristics,
    los: &Vector3,
) -> Result<Vector3> {
    let relative_velocity = if acquisition_type == AcquisitionType::Earth {
        let ground = find_target_position(satpos, los, earth, 0.0)?;
        let earth_spin = Vector3::new(0.0, 0.0, earth.angular_velocity);
        let ground_velocity = earth_spin.cross(&ground.position);
        satvel.sub(&ground_velocity)
    } else {
        *satvel
    };
    los.sub(&relative_velocity.scale(1.0 / earth.speed_of_light))
        .normalized()
}

/// Rotate a target vector for the Earth rotation that happens while the
/// light travels from the target to the sensor.
///
/// Returns the corrected vector and its spherical coordinates
/// `(latitude_c, longitude, radius)`.
pub fn correct_for_light_travel_time(
    satpos: &Vector3,
    earth: &EarthCharacteristics,
    target: &Vector3,
) -> Result<(Vector3, f64, f64, f64)> {
    let range = satpos.sub(target).length();
    let travel_time = range / earth.speed_of_light;
    let angle = travel_time * earth.angular_velocity;
    let corrected = target.rotated_around_z(angle);
    let (latitude_c, longitude, radius) = cart_to_sph(&corrected)?;
    Ok((corrected, latitude_c, longitude, radius))
}

impl LosModel {
    /// Assemble a model from its parts.
    pub fn new(
        wrs_path: i32,
        wrs_row: i32,
        acquisition_type: AcquisitionType,
        spacecraft: SpacecraftModel,
        sensor: SensorModel,
        earth: EarthCharacteristics,
    ) -> LosModel {
        LosModel {
            wrs_path,
            wrs_row,
            acquisition_type,
            spacecraft,
            sensor,
            earth,
        }
    }

    /// Fill in the scene's earth-orientation corrections (pole wander and
    /// UT1−UTC) from the calibration table, keyed on the epoch of the
    /// first band present in the collect.
    pub fn apply_earth_orientation(&mut self, eop: &EopTable) -> Result<()> {
        let band = self
            .sensor
            .bands
            .iter()
            .find(|b| b.band_present)
            .ok_or_else(|| {
                error!("no bands present in the model");
                LosError::NotFound {
                    kind: "band",
                    name: "any present band".to_string(),
                }
            })?;
        let (_mjd, xp, yp, ut1_utc) = eop.coords_at_epoch(&band.utc_epoch_time)?;
        self.earth.pole_wander_x = xp;
        self.earth.pole_wander_y = yp;
        self.earth.ut1_utc_correction = ut1_utc;
        Ok(())
    }

    /// Seconds between the band's image epoch and the ephemeris epoch.
    fn ephemeris_epoch_delta(&self, band_index: usize) -> Result<f64> {
        let band = self.sensor.band(band_index)?;
        band.utc_epoch_time
            .seconds_since(&self.spacecraft.ephemeris.utc_epoch_time)
    }

    /// Seconds between the band's image epoch and the attitude epoch.
    fn attitude_epoch_delta(&self, band_index: usize) -> Result<f64> {
        let band = self.sensor.band(band_index)?;
        band.utc_epoch_time
            .seconds_since(&self.spacecraft.attitude.utc_epoch_time)
    }

    /// Forward projection: geodetic latitude and longitude (radians)
    /// observed by the pixel at `(line, sample)` of the given band and
    /// SCA, for a target at `target_elev` metres above the ellipsoid.
    ///
    /// `attitude_variance` adds (roll, pitch, yaw) perturbations to the
    /// interpolated attitude, for jitter-sensitivity work; pass `None` to
    /// project with no variance.
    ///
    /// For stellar and lunar collects the returned pair is the
    /// (declination, right ascension) of the aberration-corrected
    /// inertial LOS, and no ellipsoid or light-travel work is done.
    pub fn project_to_geodetic(
        &self,
        line: f64,
        sample: f64,
        band_index: usize,
        sca_index: usize,
        target_elev: f64,
        det_type: DetectorType,
        attitude_variance: Option<Vector3>,
    ) -> Result<(f64, f64)> {
        let image_time = self
            .sensor
            .find_time(line, sample, band_index, sca_index, det_type)?;
        let sensor_los = self
            .sensor
            .find_los_vector(band_index, sca_index, sample, det_type)?;

        let attitude_time = self.attitude_epoch_delta(band_index)? + image_time;
        let (mut roll, mut pitch, mut yaw) = self.spacecraft.attitude.attitude_at(attitude_time);
        if let Some(variance) = attitude_variance {
            roll += variance.x;
            pitch += variance.y;
            yaw += variance.z;
        }

        let ephemeris_time = self.ephemeris_epoch_delta(band_index)? + image_time;
        let (mut satpos, satvel) = self
            .spacecraft
            .ephemeris
            .position_velocity_at(self.acquisition_type, ephemeris_time);

        let band = self.sensor.band(band_index)?;
        let (orb2ecf, attpert, _pert_los, new_los) = convert_sensor_los_to_spacecraft(
            &band.frame.sensor_to_acs,
            &satpos,
            &satvel,
            &sensor_los,
            roll,
            pitch,
            yaw,
        )?;

        if self.acquisition_type == AcquisitionType::Earth {
            satpos = correct_for_center_of_mass(
                &band.frame.center_mass_to_sensor_offset,
                &orb2ecf,
                &attpert,
                &satpos,
            );
        }

        let aberrated_los = correct_for_velocity_aberration(
            &satpos,
            &satvel,
            self.acquisition_type,
            &self.earth,
            &new_los,
        )?;

        if self.acquisition_type == AcquisitionType::Earth {
            let target =
                find_target_position(&satpos, &aberrated_los, &self.earth, target_elev)?;
            let (_corrected, latitude_c, longitude, radius) =
                correct_for_light_travel_time(&satpos, &self.earth, &target.position)?;
            let (latitude_d, _height) = self.earth.geocentric_to_geodetic(latitude_c, radius)?;
            Ok((latitude_d, longitude))
        } else {
            let (declination, right_ascension, _radius) = cart_to_sph(&aberrated_los)?;
            Ok((declination, right_ascension))
        }
    }

    /// Satellite position, velocity, attitude, and time at an image
    /// location, with the centre-of-mass adjustment applied for Earth
    /// collects.
    pub fn satellite_state_at_location(
        &self,
        line: f64,
        sample: f64,
        band_index: usize,
        sca_index: usize,
        det_type: DetectorType,
    ) -> Result<SatelliteState> {
        let image_time = self
            .sensor
            .find_time(line, sample, band_index, sca_index, det_type)?;

        let attitude_time = self.attitude_epoch_delta(band_index)? + image_time;
        let (roll, pitch, yaw) = self.spacecraft.attitude.attitude_at(attitude_time);

        let ephemeris_time = self.ephemeris_epoch_delta(band_index)? + image_time;
        let (mut position, velocity) = self
            .spacecraft
            .ephemeris
            .position_velocity_at(self.acquisition_type, ephemeris_time);

        let (orb2ecf, attpert) =
            compute_orientation_matrices(&position, &velocity, roll, pitch, yaw)?;

        let band = self.sensor.band(band_index)?;
        if self.acquisition_type == AcquisitionType::Earth {
            position = correct_for_center_of_mass(
                &band.frame.center_mass_to_sensor_offset,
                &orb2ecf,
                &attpert,
                &position,
            );
        }

        let image_epoch = band.utc_epoch_time.add_seconds(image_time)?;
        Ok(SatelliteState {
            position,
            velocity,
            attitude: Vector3::new(roll, pitch, yaw),
            image_time_seconds_of_day: image_epoch.seconds_of_day,
            year: image_epoch.year,
            day: image_epoch.day_of_year as i32,
        })
    }

    /// Right ascension, declination (radians) and distance (metres) of
    /// the Moon relative to the spacecraft at an image location.
    pub fn moon_position_at_location(
        &self,
        band_index: usize,
        sca_index: usize,
        line: f64,
        sample: f64,
        det_type: DetectorType,
    ) -> Result<(f64, f64, f64)> {
        self.body_position_at_location(band_index, sca_index, line, sample, det_type, Body::Moon)
    }

    /// Right ascension, declination (radians) and distance (metres) of
    /// the Sun relative to the spacecraft at an image location.
    pub fn sun_position_at_location(
        &self,
        band_index: usize,
        sca_index: usize,
        line: f64,
        sample: f64,
        det_type: DetectorType,
    ) -> Result<(f64, f64, f64)> {
        self.body_position_at_location(band_index, sca_index, line, sample, det_type, Body::Sun)
    }

    fn body_position_at_location(
        &self,
        band_index: usize,
        sca_index: usize,
        line: f64,
        sample: f64,
        det_type: DetectorType,
        body: Body,
    ) -> Result<(f64, f64, f64)> {
        let image_time = self
            .sensor
            .find_time(line, sample, band_index, sca_index, det_type)?;
        let band = self.sensor.band(band_index)?;
        let image_epoch = band.utc_epoch_time.add_seconds(image_time)?;
        let julian_date = image_epoch.julian_date()?;

        // Geocentric body position, true equator and equinox of date.
        let hours_to_radians = 15.0_f64.to_radians();
        let (ra_hours, dec_degrees, distance_m) = match body {
            Body::Moon => {
                let (ra, dec, km) = moon::geocentric_position(julian_date)?;
                (ra, dec, km * 1000.0)
            }
            Body::Sun => {
                let (ra, dec, au) = sun::geocentric_position(julian_date)?;
                (ra, dec, au * METERS_PER_AU)
            }
        };
        let body_tod = sph_to_cart(
            dec_degrees.to_radians(),
            ra_hours * hours_to_radians,
            distance_m,
        );

        // The geometric model works in inertial J2000; the body vector is
        // true-of-date with no sidereal or polar motion involved.
        let body_eci = frames::tod2j2k(self.earth.ut1_utc_correction, &body_tod, &image_epoch)?;

        let ephemeris_time = self.ephemeris_epoch_delta(band_index)? + image_time;
        let (satpos, _satvel) = self
            .spacecraft
            .ephemeris
            .position_velocity_at(self.acquisition_type, ephemeris_time);

        let body_from_satellite = body_eci.sub(&satpos);
        let (declination, right_ascension, distance) = cart_to_sph(&body_from_satellite)?;
        Ok((right_ascension, declination, distance))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Body {
    Moon,
    Sun,
}
