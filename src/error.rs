//! Error types for the LOS model library.
//!
//! All fallible operations return [`Result`]. Variants group into the
//! failure families the projection pipeline distinguishes:
//!
//! - **Invalid input**: out-of-range band/SCA/detector indices, malformed
//!   epochs, mismatched spectral types
//! - **Not found**: earth-orientation lookup misses, missing records
//! - **Backing store**: logical dataset/table open, read, or write failures
//! - **Adapter**: astronomical routine failures
//! - **Numeric**: zero-magnitude normalisation, no ellipsoid intersection
//!
//! Each layer logs once at the error site and returns the error to the
//! caller; the projection pipeline aborts the current pixel on the first
//! error.

use thiserror::Error;

/// Main error type for LOS model operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LosError {
    /// An index (band, SCA, detector, sample...) is outside its valid range
    #[error("Invalid {name} index {value} (valid range: 0..{limit})")]
    InvalidIndex {
        /// What the index addresses (e.g. "band", "SCA", "detector")
        name: &'static str,
        /// The offending value
        value: i64,
        /// Exclusive upper bound
        limit: usize,
    },

    /// An epoch tuple violates the day-of-year / seconds-of-day invariant
    #[error("Invalid epoch {year}/{day_of_year}/{seconds_of_day}: {reason}")]
    InvalidEpoch {
        year: i32,
        day_of_year: f64,
        seconds_of_day: f64,
        reason: &'static str,
    },

    /// A value is outside the range an operation accepts
    #[error("{parameter} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A bias-model access used the wrong spectral type for the band
    #[error("Band {band_number} holds a {found} bias model, not {expected}")]
    SpectralTypeMismatch {
        band_number: i32,
        expected: &'static str,
        found: &'static str,
    },

    /// General invalid-input condition with a specific reason
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// An earth-orientation record covering the queried MJD does not exist
    #[error("No earth orientation record brackets MJD {mjd}")]
    MjdNotFound { mjd: f64 },

    /// A requested record, table, or dataset does not exist
    #[error("{kind} '{name}' not found")]
    NotFound { kind: &'static str, name: String },

    /// The logical backing store rejected an operation
    #[error("Backing store error on '{name}': {reason}")]
    BackingStore { name: String, reason: String },

    /// An astronomical adapter routine reported failure
    #[error("Astronomical routine {routine} failed: {reason}")]
    Adapter {
        routine: &'static str,
        reason: String,
    },

    /// A numeric operation degenerated (zero magnitude, no real root...)
    #[error("Numeric error in {operation}: {reason}")]
    Numeric {
        operation: &'static str,
        reason: &'static str,
    },

    /// The line of sight does not intersect the target ellipsoid
    #[error("Line of sight does not intersect the ellipsoid (target elevation {target_elev} m)")]
    NoIntersection { target_elev: f64 },

    /// Text-format (ODL) parse failure
    #[error("ODL parse error at line {line}: {reason}")]
    OdlFormat { line: usize, reason: String },
}

/// Type alias for Results in this crate.
pub type Result<T> = std::result::Result<T, LosError>;

/// Validate that a 0-based index addresses fewer than `limit` entries.
#[inline]
pub fn validate_index(value: i64, limit: usize, name: &'static str) -> Result<usize> {
    if value < 0 || value as usize >= limit {
        Err(LosError::InvalidIndex { name, value, limit })
    } else {
        Ok(value as usize)
    }
}

/// Validate that a value lies within [min, max].
#[inline]
pub fn validate_range(value: f64, min: f64, max: f64, parameter: &'static str) -> Result<()> {
    if value < min || value > max {
        Err(LosError::OutOfRange {
            parameter,
            value,
            min,
            max,
        })
    } else {
        Ok(())
    }
}
