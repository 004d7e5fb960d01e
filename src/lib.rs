//! # LOS Model
//!
//! Line-of-sight geometric model core for Landsat-class OLI/TIRS ground
//! processing. Given an image pixel (line, sample) within a band and SCA
//! and a target elevation, the model computes the geodetic latitude and
//! longitude the pixel observes, accounting for spacecraft ephemeris and
//! attitude, sensor geometry, Earth rotation, precession, nutation, polar
//! motion, light travel time, velocity aberration, and the spacecraft
//! centre-of-mass offset.
//!
//! ## Layers
//!
//! ### Time and frames
//! - [`time`] — year/day-of-year/seconds epochs, Julian dates, time
//!   standards (UT1/TT/TDB)
//! - [`novas`] — facade over the astronomical routines (sidereal time,
//!   precession, nutation, polar wobble)
//! - [`frames`] — ECI↔ECEF, J2000↔true-of-date transforms with the frame
//!   rotation-rate velocity terms
//!
//! ### Spacecraft and sensor
//! - [`ephemeris`] — windowed Lagrange interpolation of the spacecraft
//!   state in both frames
//! - [`attitude`] — roll/pitch/yaw interpolation and quaternion handling
//! - [`sensor`] — per-band/SCA detector LOS tables and frame timing
//! - [`model`] — the assembled LOS model and the forward projection,
//!   satellite state, and Moon/Sun pointing services
//!
//! ### Earth and sky
//! - [`earth`] — ellipsoid constants, earth-orientation lookups,
//!   ellipsoid intersection, geodetic conversions
//! - [`moon`] / [`sun`] — geocentric true-of-date ephemeris services
//!
//! ### Calibration and data
//! - [`bpf`] — Bias Parameter File model with spectral-type-aware bias
//!   blocks and the ODL serialisation
//! - [`l0r`] — Level-0R ancillary table schemas, record codec, and band
//!   dataset semantics
//! - [`satellite`] — band attributes shared by the layers above
//! - [`projection`] — the map-projection transformation interface
//!
//! ## Example: projecting a pixel
//!
//! ```no_run
//! use los_model::{DetectorType, LosModel};
//! # fn model() -> LosModel { unimplemented!() }
//!
//! let model = model();
//! let (lat, lon) = model
//!     .project_to_geodetic(120.5, 247.0, 3, 6, 150.0, DetectorType::Actual, None)
//!     .unwrap();
//! println!("pixel sees {:.6}°N {:.6}°E", lat.to_degrees(), lon.to_degrees());
//! ```

pub mod attitude;
pub mod bpf;
pub mod earth;
pub mod ephemeris;
pub mod error;
pub mod frames;
pub mod l0r;
pub mod model;
pub mod moon;
pub mod novas;
pub mod projection;
pub mod satellite;
pub mod sensor;
pub mod spacecraft;
pub mod sun;
pub mod time;
pub mod vector;

pub use attitude::{AttitudeModel, AttitudeSample, Quaternion};
pub use earth::{EarthCharacteristics, EopRecord, EopTable, TargetPosition};
pub use ephemeris::{EphemerisModel, EphemerisSample, LAGRANGE_POINTS};
pub use error::{LosError, Result};
pub use model::{LosModel, SatelliteState};
pub use satellite::{SensorId, SpectralType};
pub use sensor::{BandSensorModel, DetectorType, SensorFrame, SensorModel};
pub use spacecraft::{AcquisitionType, SpacecraftModel};
pub use time::Epoch;
pub use vector::{Matrix3, Vector3};

#[cfg(test)]
pub mod tests;
