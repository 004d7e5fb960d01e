//! Satellite and band attributes for the OLI/TIRS instrument pair.
//!
//! Band numbering follows the flight convention: imaging bands 1–11
//! (OLI 1–9, TIRS 10–11), video-reference-pixel bands 12–22 paired
//! one-to-one with the imaging bands, the TIRS blind band 23 and its VRP
//! 24. The attribute lookups here centralise everything the BPF and L0R
//! layers need to agree on: spectral types, SCA counts, detector counts,
//! and which physical band file a VRP shares with its parent.

use crate::error::{LosError, Result};

/// Number of normal imaging bands (OLI + TIRS).
pub const NBANDS: usize = 11;

/// Maximum SCAs across the two instruments (OLI focal plane).
pub const MAX_NSCAS: usize = 14;

/// SCAs on the TIRS focal plane.
pub const TIRS_NSCAS: usize = 3;

/// Detectors per SCA for the OLI multispectral bands.
pub const MS_DETECTORS_PER_SCA: usize = 494;

/// Detectors per SCA for the OLI panchromatic band.
pub const PAN_DETECTORS_PER_SCA: usize = 988;

/// Detectors per SCA for the TIRS thermal bands.
pub const THERMAL_DETECTORS_PER_SCA: usize = 640;

/// First VRP band number; VRP band `n` pairs with imaging band `n - 11`.
const VRP_BAND_OFFSET: i32 = 11;

/// TIRS blind band and its VRP.
const BLIND_BAND_NUMBER: i32 = 23;
const BLIND_VRP_BAND_NUMBER: i32 = 24;

/// Which instrument a band (or a BPF) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorId {
    Oli,
    Tirs,
}

/// Spectral type of an imaging band; selects the bias-model layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpectralType {
    Vnir,
    Swir,
    Pan,
    Thermal,
}

impl SpectralType {
    /// Number of detector-specific model parameters for this type
    /// (pre/post averages plus, for OLI, the a1 and c1 coefficients).
    pub fn detector_param_count(&self) -> usize {
        match self {
            SpectralType::Thermal => 2,
            _ => 4,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SpectralType::Vnir => "VNIR",
            SpectralType::Swir => "SWIR",
            SpectralType::Pan => "PAN",
            SpectralType::Thermal => "THERMAL",
        }
    }

    pub fn from_name(name: &str) -> Result<SpectralType> {
        match name {
            "VNIR" => Ok(SpectralType::Vnir),
            "SWIR" => Ok(SpectralType::Swir),
            "PAN" => Ok(SpectralType::Pan),
            "THERMAL" => Ok(SpectralType::Thermal),
            other => Err(LosError::InvalidInput {
                reason: format!("unknown spectral type '{other}'"),
            }),
        }
    }
}

/// How a band number is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandClassification {
    /// A normal imaging band
    Normal,
    /// A video-reference-pixel band riding with an imaging band
    Vrp,
    /// The TIRS blind band
    Blind,
    /// The VRP of the blind band
    BlindVrp,
}

/// Static attributes of one band number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandAttributes {
    pub band_number: i32,
    /// 0-based index among the normal imaging bands (the paired imaging
    /// band's index for VRP/blind bands)
    pub band_index: usize,
    pub sensor: SensorId,
    pub spectral_type: SpectralType,
    pub classification: BandClassification,
    pub scas: usize,
    pub detectors_per_sca: usize,
    /// The imaging band whose physical file this band shares
    pub normal_band_number: i32,
    /// The VRP band associated with this band, if any
    pub vrp_band_number: Option<i32>,
}

/// Convert a 1-based normal imaging band number to its 0-based index.
pub fn band_number_to_index(band_number: i32) -> Result<usize> {
    if (1..=NBANDS as i32).contains(&band_number) {
        Ok((band_number - 1) as usize)
    } else {
        Err(LosError::InvalidInput {
            reason: format!("band number {band_number} is not a normal imaging band"),
        })
    }
}

/// Convert a 0-based band index back to its 1-based band number.
pub fn band_index_to_number(band_index: usize) -> Result<i32> {
    if band_index < NBANDS {
        Ok(band_index as i32 + 1)
    } else {
        Err(LosError::InvalidIndex {
            name: "band",
            value: band_index as i64,
            limit: NBANDS,
        })
    }
}

/// Spectral type of a normal imaging band.
pub fn spectral_type_for_band(band_number: i32) -> Result<SpectralType> {
    match band_number {
        1..=5 => Ok(SpectralType::Vnir),
        6 | 7 | 9 => Ok(SpectralType::Swir),
        8 => Ok(SpectralType::Pan),
        10 | 11 => Ok(SpectralType::Thermal),
        other => Err(LosError::InvalidInput {
            reason: format!("band number {other} is not a normal imaging band"),
        }),
    }
}

/// SCAs per band for a normal imaging band.
pub fn scas_per_band(band_number: i32) -> Result<usize> {
    match spectral_type_for_band(band_number)? {
        SpectralType::Thermal => Ok(TIRS_NSCAS),
        _ => Ok(MAX_NSCAS),
    }
}

/// Detectors per SCA for a normal imaging band.
pub fn detectors_per_sca(band_number: i32) -> Result<usize> {
    match spectral_type_for_band(band_number)? {
        SpectralType::Vnir | SpectralType::Swir => Ok(MS_DETECTORS_PER_SCA),
        SpectralType::Pan => Ok(PAN_DETECTORS_PER_SCA),
        SpectralType::Thermal => Ok(THERMAL_DETECTORS_PER_SCA),
    }
}

/// Full attribute record for any recognised band number (imaging, VRP,
/// blind).
pub fn band_attributes(band_number: i32) -> Result<BandAttributes> {
    let (classification, normal_band_number) = classify_band(band_number)?;
    let attrs_band = normal_band_number;
    let band_index = band_number_to_index(attrs_band)?;
    let spectral_type = spectral_type_for_band(attrs_band)?;
    let sensor = if attrs_band <= 9 {
        SensorId::Oli
    } else {
        SensorId::Tirs
    };
    let vrp_band_number = match classification {
        BandClassification::Normal => Some(band_number + VRP_BAND_OFFSET),
        BandClassification::Blind => Some(BLIND_VRP_BAND_NUMBER),
        _ => None,
    };
    Ok(BandAttributes {
        band_number,
        band_index,
        sensor,
        spectral_type,
        classification,
        scas: scas_per_band(attrs_band)?,
        detectors_per_sca: detectors_per_sca(attrs_band)?,
        normal_band_number,
        vrp_band_number,
    })
}

fn classify_band(band_number: i32) -> Result<(BandClassification, i32)> {
    match band_number {
        1..=11 => Ok((BandClassification::Normal, band_number)),
        12..=22 => Ok((BandClassification::Vrp, band_number - VRP_BAND_OFFSET)),
        n if n == BLIND_BAND_NUMBER => Ok((BandClassification::Blind, 10)),
        n if n == BLIND_VRP_BAND_NUMBER => Ok((BandClassification::BlindVrp, 10)),
        other => Err(LosError::InvalidInput {
            reason: format!("unknown band number {other}"),
        }),
    }
}
