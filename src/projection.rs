//! Map-projection transformation interface.
//!
//! The model's outward coordinate interface mirrors the ground system's
//! projection engine: build a [`ProjTransformation`] between two
//! projection definitions, push `(x, y)` pairs through it, and drop it
//! when done. The heavyweight map-projection mathematics live in an
//! external engine outside this crate; what is built in natively is the
//! geographic unit conversion pair and same-projection passthrough, both
//! thread-safe.
//!
//! A process can be restricted to thread-safe transforms only with
//! [`only_allow_threadsafe_transforms`]; the flag is sticky and honoured
//! at transformation creation time.

use std::sync::atomic::{AtomicBool, Ordering};

use log::error;

use crate::error::{LosError, Result};

/// Number of projection parameters carried by a definition.
pub const PROJECTION_PARAMETERS: usize = 15;

/// Zone number used by all projections except UTM and State Plane.
pub const NULL_ZONE: i32 = 62;

/// Spheroid code of the WGS84 ellipsoid.
pub const WGS84_SPHEROID: i32 = 12;

/// Projection codes (the geographic one is the only code the core itself
/// produces coordinates in).
pub const GEOGRAPHIC_PROJECTION: i32 = 0;
pub const UTM_PROJECTION: i32 = 1;

/// Coordinate units of a projection definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionUnits {
    Radians,
    Degrees,
    Meters,
}

/// One projection definition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub code: i32,
    pub zone: i32,
    pub units: ProjectionUnits,
    pub spheroid: i32,
    pub parameters: [f64; PROJECTION_PARAMETERS],
}

impl Projection {
    /// A geographic (latitude/longitude) projection on WGS84.
    pub fn geographic(units: ProjectionUnits) -> Projection {
        Projection {
            code: GEOGRAPHIC_PROJECTION,
            zone: NULL_ZONE,
            units,
            spheroid: WGS84_SPHEROID,
            parameters: [0.0; PROJECTION_PARAMETERS],
        }
    }
}

static THREADSAFE_ONLY: AtomicBool = AtomicBool::new(false);

/// Restrict this process to thread-safe transformation backends. Sticky:
/// once set it stays set for the life of the process.
pub fn only_allow_threadsafe_transforms() {
    THREADSAFE_ONLY.store(true, Ordering::SeqCst);
}

#[cfg(test)]
pub(crate) fn reset_threadsafe_flag_for_tests() {
    THREADSAFE_ONLY.store(false, Ordering::SeqCst);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TransformKind {
    Passthrough,
    DegreesToRadians,
    RadiansToDegrees,
}

/// A prepared transformation between two projections.
#[derive(Debug, Clone)]
pub struct ProjTransformation {
    pub source: Projection,
    pub target: Projection,
    kind: TransformKind,
}

impl ProjTransformation {
    /// Prepare a transformation from `source` to `target`.
    ///
    /// Geographic-to-geographic unit conversions and identical
    /// projections are handled natively; any other pair needs the
    /// external map-projection engine, which is refused outright when the
    /// process is restricted to thread-safe transforms.
    pub fn new(source: &Projection, target: &Projection) -> Result<ProjTransformation> {
        let kind = if source == target {
            TransformKind::Passthrough
        } else if source.code == GEOGRAPHIC_PROJECTION && target.code == GEOGRAPHIC_PROJECTION {
            match (source.units, target.units) {
                (ProjectionUnits::Degrees, ProjectionUnits::Radians) => {
                    TransformKind::DegreesToRadians
                }
                (ProjectionUnits::Radians, ProjectionUnits::Degrees) => {
                    TransformKind::RadiansToDegrees
                }
                (a, b) if a == b => TransformKind::Passthrough,
                (a, b) => {
                    error!("geographic projections cannot carry {a:?}/{b:?} units");
                    return Err(LosError::InvalidInput {
                        reason: format!("geographic projections cannot carry {a:?}/{b:?} units"),
                    });
                }
            }
        } else {
            if THREADSAFE_ONLY.load(Ordering::SeqCst) {
                error!(
                    "projection pair {} -> {} needs the external engine, which is not thread-safe",
                    source.code, target.code
                );
                return Err(LosError::InvalidInput {
                    reason: format!(
                        "projection pair {} -> {} needs the external engine, which is not thread-safe",
                        source.code, target.code
                    ),
                });
            }
            error!(
                "projection pair {} -> {} is not available without the external engine",
                source.code, target.code
            );
            return Err(LosError::NotFound {
                kind: "projection transformation",
                name: format!("{} -> {}", source.code, target.code),
            });
        };
        Ok(ProjTransformation {
            source: *source,
            target: *target,
            kind,
        })
    }

    /// Transform a coordinate pair from the source to the target
    /// projection.
    pub fn transform(&self, in_x: f64, in_y: f64) -> Result<(f64, f64)> {
        match self.kind {
            TransformKind::Passthrough => Ok((in_x, in_y)),
            TransformKind::DegreesToRadians => Ok((in_x.to_radians(), in_y.to_radians())),
            TransformKind::RadiansToDegrees => Ok((in_x.to_degrees(), in_y.to_degrees())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_geographic_unit_conversion() {
        let deg = Projection::geographic(ProjectionUnits::Degrees);
        let rad = Projection::geographic(ProjectionUnits::Radians);
        let t = ProjTransformation::new(&deg, &rad).unwrap();
        let (x, y) = t.transform(180.0, -90.0).unwrap();
        assert_abs_diff_eq!(x, std::f64::consts::PI, epsilon = 1e-15);
        assert_abs_diff_eq!(y, -std::f64::consts::FRAC_PI_2, epsilon = 1e-15);

        let back = ProjTransformation::new(&rad, &deg).unwrap();
        let (x, y) = back.transform(x, y).unwrap();
        assert_abs_diff_eq!(x, 180.0, epsilon = 1e-12);
        assert_abs_diff_eq!(y, -90.0, epsilon = 1e-12);
    }

    #[test]
    fn test_identical_projection_passthrough() {
        let deg = Projection::geographic(ProjectionUnits::Degrees);
        let t = ProjTransformation::new(&deg, &deg).unwrap();
        assert_eq!(t.transform(12.5, -30.25).unwrap(), (12.5, -30.25));
    }

    #[test]
    fn test_external_pair_refused() {
        reset_threadsafe_flag_for_tests();
        let deg = Projection::geographic(ProjectionUnits::Degrees);
        let utm = Projection {
            code: UTM_PROJECTION,
            zone: 13,
            units: ProjectionUnits::Meters,
            spheroid: WGS84_SPHEROID,
            parameters: [0.0; PROJECTION_PARAMETERS],
        };
        assert!(ProjTransformation::new(&deg, &utm).is_err());
        only_allow_threadsafe_transforms();
        assert!(ProjTransformation::new(&deg, &utm).is_err());
        reset_threadsafe_flag_for_tests();
    }
}
