//! Bias Parameter File data model.
//!
//! A BPF carries the detector bias calibration for one instrument: file
//! attributes, orbit parameters, and a per-band bias model whose layout
//! depends on the band's spectral type. VNIR and SWIR bands store four
//! detector parameters (pre/post acquisition averages, a1 slope, c1
//! intercept) plus a per-SCA a0 coefficient; the PAN band keeps separate
//! even- and odd-frame tables; the TIRS thermal bands store only the
//! pre/post averages.
//!
//! Mutation happens on a [`BpfBuilder`], either populated manually through
//! the strict setters or by the ODL file reader; [`BpfBuilder::build`]
//! validates the per-band invariants and seals the structure into an
//! immutable [`Bpf`], after which concurrent reads are safe.

pub mod odl;

pub use odl::read_path as read;

use log::error;
use ndarray::Array3;

use crate::error::{LosError, Result};
use crate::satellite::{
    band_number_to_index, scas_per_band, spectral_type_for_band, SensorId, SpectralType, MAX_NSCAS,
    MS_DETECTORS_PER_SCA, NBANDS, PAN_DETECTORS_PER_SCA, THERMAL_DETECTORS_PER_SCA, TIRS_NSCAS,
};
use crate::satellite::detectors_per_sca;

/// Detector parameter slots for the OLI spectral types.
pub const OLI_PARAM_COUNT: usize = 4;

/// Detector parameter slots for the TIRS thermal bands.
pub const THERMAL_PARAM_COUNT: usize = 2;

/// Positions of the detector-specific model parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorParam {
    PreAcquisitionAverage = 0,
    PostAcquisitionAverage = 1,
    A1 = 2,
    C1 = 3,
}

/// Even/odd frame selector for the PAN band tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanSide {
    Even,
    Odd,
}

/// FILE_ATTRIBUTES group. Dates are fixed-width ISO-8601
/// (`YYYY-MM-DDTHH:MM:SS.SSSSS`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileAttributes {
    pub effective_date_begin: String,
    pub effective_date_end: String,
    pub baseline_date: String,
    pub file_name: String,
    pub file_source: String,
    pub spacecraft_name: String,
    pub sensor_name: String,
    pub description: String,
    pub version: i32,
}

/// ORBIT_PARAMETERS group.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrbitParameters {
    pub begin_orbit_number: i32,
}

/// Bias block for a VNIR band.
#[derive(Debug, Clone, PartialEq)]
pub struct VnirBias {
    /// Indexed `[sca][detector][param]`
    pub det_params: Array3<f64>,
    pub a0_coefficient: [f64; MAX_NSCAS],
}

impl Default for VnirBias {
    fn default() -> Self {
        VnirBias {
            det_params: Array3::zeros((MAX_NSCAS, MS_DETECTORS_PER_SCA, OLI_PARAM_COUNT)),
            a0_coefficient: [0.0; MAX_NSCAS],
        }
    }
}

/// Bias block for a SWIR band.
#[derive(Debug, Clone, PartialEq)]
pub struct SwirBias {
    /// Indexed `[sca][detector][param]`
    pub det_params: Array3<f64>,
    pub a0_coefficient: [f64; MAX_NSCAS],
}

impl Default for SwirBias {
    fn default() -> Self {
        SwirBias {
            det_params: Array3::zeros((MAX_NSCAS, MS_DETECTORS_PER_SCA, OLI_PARAM_COUNT)),
            a0_coefficient: [0.0; MAX_NSCAS],
        }
    }
}

/// Bias block for the PAN band, split by even and odd frames.
#[derive(Debug, Clone, PartialEq)]
pub struct PanBias {
    pub det_params_even: Array3<f64>,
    pub a0_coefficient_even: [f64; MAX_NSCAS],
    pub det_params_odd: Array3<f64>,
    pub a0_coefficient_odd: [f64; MAX_NSCAS],
}

impl Default for PanBias {
    fn default() -> Self {
        PanBias {
            det_params_even: Array3::zeros((MAX_NSCAS, PAN_DETECTORS_PER_SCA, OLI_PARAM_COUNT)),
            a0_coefficient_even: [0.0; MAX_NSCAS],
            det_params_odd: Array3::zeros((MAX_NSCAS, PAN_DETECTORS_PER_SCA, OLI_PARAM_COUNT)),
            a0_coefficient_odd: [0.0; MAX_NSCAS],
        }
    }
}

/// Bias block for a TIRS thermal band.
#[derive(Debug, Clone, PartialEq)]
pub struct ThermalBias {
    /// Indexed `[sca][detector][param]`
    pub det_params: Array3<f64>,
}

impl Default for ThermalBias {
    fn default() -> Self {
        ThermalBias {
            det_params: Array3::zeros((TIRS_NSCAS, THERMAL_DETECTORS_PER_SCA, THERMAL_PARAM_COUNT)),
        }
    }
}

/// The spectral-type-specific bias block of one band. Exactly one variant
/// exists per populated band.
#[derive(Debug, Clone, PartialEq)]
pub enum BandBias {
    Vnir(VnirBias),
    Swir(SwirBias),
    Pan(PanBias),
    Thermal(ThermalBias),
}

impl BandBias {
    pub fn spectral_type(&self) -> SpectralType {
        match self {
            BandBias::Vnir(_) => SpectralType::Vnir,
            BandBias::Swir(_) => SpectralType::Swir,
            BandBias::Pan(_) => SpectralType::Pan,
            BandBias::Thermal(_) => SpectralType::Thermal,
        }
    }

    fn allocate(spectral_type: SpectralType) -> BandBias {
        match spectral_type {
            SpectralType::Vnir => BandBias::Vnir(VnirBias::default()),
            SpectralType::Swir => BandBias::Swir(SwirBias::default()),
            SpectralType::Pan => BandBias::Pan(PanBias::default()),
            SpectralType::Thermal => BandBias::Thermal(ThermalBias::default()),
        }
    }
}

/// Per-band bias model entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BiasModel {
    /// 1-based band number matching the entry's position
    pub band_number: i32,
    pub spectral_type: Option<SpectralType>,
    pub bias: Option<BandBias>,
}

/// A mutable BPF under construction, populated manually or by the file
/// reader.
#[derive(Debug, Clone, Default)]
pub struct BpfBuilder {
    file_attributes: FileAttributes,
    orbit_parameters: OrbitParameters,
    bias_model: Vec<BiasModel>,
}

impl BpfBuilder {
    /// An empty BPF intended for manual population.
    pub fn new() -> BpfBuilder {
        BpfBuilder {
            file_attributes: FileAttributes::default(),
            orbit_parameters: OrbitParameters::default(),
            bias_model: vec![BiasModel::default(); NBANDS],
        }
    }

    pub fn set_file_attributes_file_name(&mut self, file_name: &str) {
        self.file_attributes.file_name = file_name.to_string();
    }

    pub fn set_file_attributes_file_source(&mut self, file_source: &str) {
        self.file_attributes.file_source = file_source.to_string();
    }

    pub fn set_file_attributes_effective_date_begin(&mut self, date: &str) {
        self.file_attributes.effective_date_begin = date.to_string();
    }

    pub fn set_file_attributes_effective_date_end(&mut self, date: &str) {
        self.file_attributes.effective_date_end = date.to_string();
    }

    pub fn set_file_attributes_baseline_date(&mut self, date: &str) {
        self.file_attributes.baseline_date = date.to_string();
    }

    pub fn set_file_attributes_spacecraft_name(&mut self, name: &str) {
        self.file_attributes.spacecraft_name = name.to_string();
    }

    pub fn set_file_attributes_sensor_name(&mut self, name: &str) {
        self.file_attributes.sensor_name = name.to_string();
    }

    pub fn set_file_attributes_description(&mut self, description: &str) {
        self.file_attributes.description = description.to_string();
    }

    pub fn set_file_attributes_version(&mut self, version: i32) {
        self.file_attributes.version = version;
    }

    pub fn set_orbit_parameters_begin_orbit_number(&mut self, begin_orbit_number: i32) {
        self.orbit_parameters.begin_orbit_number = begin_orbit_number;
    }

    /// Record the band number of a bias-model entry. The number must be a
    /// normal imaging band and lands in the entry at its own index.
    pub fn set_bias_model_band_number(&mut self, band_number: i32) -> Result<()> {
        let band_index = band_number_to_index(band_number)?;
        self.bias_model[band_index].band_number = band_number;
        Ok(())
    }

    /// Record the spectral type of a band and allocate the matching bias
    /// block. The band number must have been set first.
    pub fn set_bias_model_spectral_type(
        &mut self,
        band_number: i32,
        spectral_type: SpectralType,
    ) -> Result<()> {
        let band_index = band_number_to_index(band_number)?;
        let entry = &mut self.bias_model[band_index];
        if entry.band_number != band_number {
            error!(
                "band number {band_number} does not match bias model entry {}",
                entry.band_number
            );
            return Err(LosError::InvalidInput {
                reason: format!(
                    "band number {band_number} does not match bias model entry {}",
                    entry.band_number
                ),
            });
        }
        entry.spectral_type = Some(spectral_type);
        entry.bias = Some(BandBias::allocate(spectral_type));
        Ok(())
    }

    /// Set the a0 model coefficient for a band and SCA. The PAN band
    /// routes through `pan_side`; thermal bands carry no a0.
    pub fn set_bias_model_a0_coefficient(
        &mut self,
        band_number: i32,
        sca_index: usize,
        pan_side: PanSide,
        a0_coefficient: f64,
    ) -> Result<()> {
        let band_index = self.checked_band_index(band_number)?;
        let number_of_scas = scas_per_band(band_number)?;
        if sca_index >= number_of_scas {
            error!("invalid SCA index {sca_index} for band number {band_number}");
            return Err(LosError::InvalidIndex {
                name: "SCA",
                value: sca_index as i64,
                limit: number_of_scas,
            });
        }
        match self.bias_model[band_index].bias.as_mut() {
            Some(BandBias::Pan(pan)) => {
                match pan_side {
                    PanSide::Even => pan.a0_coefficient_even[sca_index] = a0_coefficient,
                    PanSide::Odd => pan.a0_coefficient_odd[sca_index] = a0_coefficient,
                }
                Ok(())
            }
            Some(BandBias::Vnir(vnir)) => {
                vnir.a0_coefficient[sca_index] = a0_coefficient;
                Ok(())
            }
            Some(BandBias::Swir(swir)) => {
                swir.a0_coefficient[sca_index] = a0_coefficient;
                Ok(())
            }
            Some(BandBias::Thermal(_)) => {
                error!("thermal band {band_number} carries no a0 coefficient");
                Err(LosError::SpectralTypeMismatch {
                    band_number,
                    expected: "VNIR, SWIR, or PAN",
                    found: "THERMAL",
                })
            }
            None => Err(unallocated(band_number)),
        }
    }

    /// Set detector-specific parameter values for a band, SCA, and
    /// detector, in parameter order starting at the pre-acquisition
    /// average.
    pub fn set_bias_model_detector_coefficients(
        &mut self,
        band_number: i32,
        sca_index: usize,
        det_index: usize,
        pan_side: PanSide,
        params: &[f64],
    ) -> Result<()> {
        let band_index = self.checked_band_index(band_number)?;
        let number_of_scas = scas_per_band(band_number)?;
        let number_of_detectors = detectors_per_sca(band_number)?;
        if sca_index >= number_of_scas {
            error!("invalid SCA index {sca_index} for band number {band_number}");
            return Err(LosError::InvalidIndex {
                name: "SCA",
                value: sca_index as i64,
                limit: number_of_scas,
            });
        }
        if det_index >= number_of_detectors {
            error!("invalid detector index {det_index} for band number {band_number}");
            return Err(LosError::InvalidIndex {
                name: "detector",
                value: det_index as i64,
                limit: number_of_detectors,
            });
        }
        if params.is_empty() {
            return Err(LosError::InvalidInput {
                reason: "at least one detector parameter value must be set".to_string(),
            });
        }
        let entry = &mut self.bias_model[band_index];
        let table = match entry.bias.as_mut() {
            Some(BandBias::Pan(pan)) => match pan_side {
                PanSide::Even => &mut pan.det_params_even,
                PanSide::Odd => &mut pan.det_params_odd,
            },
            Some(BandBias::Vnir(vnir)) => &mut vnir.det_params,
            Some(BandBias::Swir(swir)) => &mut swir.det_params,
            Some(BandBias::Thermal(thermal)) => &mut thermal.det_params,
            None => return Err(unallocated(band_number)),
        };
        let param_slots = table.shape()[2];
        if params.len() > param_slots {
            error!(
                "band {band_number} accepts {param_slots} detector parameters, got {}",
                params.len()
            );
            return Err(LosError::InvalidInput {
                reason: format!(
                    "band {band_number} accepts {param_slots} detector parameters, got {}",
                    params.len()
                ),
            });
        }
        for (slot, &value) in params.iter().enumerate() {
            table[[sca_index, det_index, slot]] = value;
        }
        Ok(())
    }

    fn checked_band_index(&self, band_number: i32) -> Result<usize> {
        let band_index = band_number_to_index(band_number)?;
        if self.bias_model[band_index].band_number != band_number {
            error!(
                "band number {band_number} does not match bias model entry {}",
                self.bias_model[band_index].band_number
            );
            return Err(LosError::InvalidInput {
                reason: format!(
                    "band number {band_number} does not match bias model entry {}",
                    self.bias_model[band_index].band_number
                ),
            });
        }
        Ok(band_index)
    }

    /// Validate the per-band invariants and seal into an immutable
    /// [`Bpf`]: each populated band's number matches its index, its
    /// spectral type matches the satellite attribute table, and its
    /// variant matches its spectral type.
    pub fn build(self) -> Result<Bpf> {
        for (index, entry) in self.bias_model.iter().enumerate() {
            if entry.bias.is_none() {
                continue;
            }
            let expected_number = index as i32 + 1;
            if entry.band_number != expected_number {
                error!(
                    "bias model entry {index} carries band number {}",
                    entry.band_number
                );
                return Err(LosError::InvalidInput {
                    reason: format!(
                        "bias model entry {index} carries band number {}",
                        entry.band_number
                    ),
                });
            }
            let attribute_type = spectral_type_for_band(entry.band_number)?;
            let declared = entry.spectral_type.unwrap_or(attribute_type);
            let stored = entry.bias.as_ref().map(|b| b.spectral_type());
            if declared != attribute_type || stored != Some(attribute_type) {
                error!(
                    "band {} bias model spectral type disagrees with the satellite attributes",
                    entry.band_number
                );
                return Err(LosError::SpectralTypeMismatch {
                    band_number: entry.band_number,
                    expected: attribute_type.name(),
                    found: stored.map(|t| t.name()).unwrap_or("none"),
                });
            }
        }
        Ok(Bpf {
            file_attributes: self.file_attributes,
            orbit_parameters: self.orbit_parameters,
            bias_model: self.bias_model,
        })
    }
}

/// A sealed, immutable BPF.
#[derive(Debug, Clone)]
pub struct Bpf {
    file_attributes: FileAttributes,
    orbit_parameters: OrbitParameters,
    bias_model: Vec<BiasModel>,
}

impl Bpf {
    pub fn file_attributes(&self) -> &FileAttributes {
        &self.file_attributes
    }

    pub fn orbit_parameters(&self) -> &OrbitParameters {
        &self.orbit_parameters
    }

    pub fn bias_model(&self) -> &[BiasModel] {
        &self.bias_model
    }

    /// Bias model entry for a 1-based band number.
    pub fn band_bias_model(&self, band_number: i32) -> Result<&BiasModel> {
        let band_index = band_number_to_index(band_number)?;
        Ok(&self.bias_model[band_index])
    }

    /// Derive the sensor the BPF calibrates from the sensor name in its
    /// file attributes. The match is exact and case-sensitive.
    pub fn sensor_id(&self) -> Result<SensorId> {
        sensor_id_from_name(&self.file_attributes.sensor_name)
    }

    /// Serialise to the ODL text format.
    pub fn write(&self, path: &std::path::Path) -> Result<()> {
        odl::write_path(self, path)
    }
}

fn unallocated(band_number: i32) -> LosError {
    error!("no bias block allocated for band {band_number}; set the spectral type first");
    LosError::InvalidInput {
        reason: format!(
            "no bias block allocated for band {band_number}; set the spectral type first"
        ),
    }
}

/// Derive a sensor ID from a BPF sensor-name string. The accepted names
/// are exact, case-sensitive matches.
pub fn sensor_id_from_name(sensor_name: &str) -> Result<SensorId> {
    match sensor_name {
        "OLI" | "Operational Land Imager" => Ok(SensorId::Oli),
        "TIRS" | "Thermal Infrared Sensor" => Ok(SensorId::Tirs),
        other => {
            error!("invalid sensor name '{other}', cannot determine sensor ID");
            Err(LosError::InvalidInput {
                reason: format!("invalid sensor name '{other}'"),
            })
        }
    }
}

/// Fill detector-parameter arrays from a band's bias model.
///
/// `sca_number` is 1-based. `pre_average` and `post_average` receive the
/// first `num_detectors` values; the OLI-only outputs (`a1`, `c1`, `a0`)
/// are filled when provided and must be `None` for thermal bands.
#[allow(clippy::too_many_arguments)]
pub fn get_model_parameters(
    bias_model: &BiasModel,
    expected_spectral_type: SpectralType,
    band_number: i32,
    sca_number: usize,
    num_detectors: usize,
    pan_side: PanSide,
    pre_average: &mut [f64],
    post_average: &mut [f64],
    mut a1_coefficient: Option<&mut [f64]>,
    mut c1_coefficient: Option<&mut [f64]>,
    a0_coefficient: Option<&mut f64>,
) -> Result<()> {
    if bias_model.band_number != band_number {
        error!(
            "band number {band_number} does not match bias model entry {}",
            bias_model.band_number
        );
        return Err(LosError::InvalidInput {
            reason: format!(
                "band number {band_number} does not match bias model entry {}",
                bias_model.band_number
            ),
        });
    }
    let bias = bias_model.bias.as_ref().ok_or_else(|| {
        error!("band {band_number} has no bias block");
        LosError::NotFound {
            kind: "bias model",
            name: format!("band {band_number}"),
        }
    })?;
    if bias.spectral_type() != expected_spectral_type {
        error!(
            "band {band_number} bias model is {}, expected {}",
            bias.spectral_type().name(),
            expected_spectral_type.name()
        );
        return Err(LosError::SpectralTypeMismatch {
            band_number,
            expected: expected_spectral_type.name(),
            found: bias.spectral_type().name(),
        });
    }

    let (table, a0_value) = match bias {
        BandBias::Vnir(vnir) => (&vnir.det_params, Some(&vnir.a0_coefficient)),
        BandBias::Swir(swir) => (&swir.det_params, Some(&swir.a0_coefficient)),
        BandBias::Pan(pan) => match pan_side {
            PanSide::Even => (&pan.det_params_even, Some(&pan.a0_coefficient_even)),
            PanSide::Odd => (&pan.det_params_odd, Some(&pan.a0_coefficient_odd)),
        },
        BandBias::Thermal(thermal) => (&thermal.det_params, None),
    };

    let scas = table.shape()[0];
    if sca_number < 1 || sca_number > scas {
        error!("invalid SCA number {sca_number} for band {band_number}");
        return Err(LosError::InvalidIndex {
            name: "SCA",
            value: sca_number as i64 - 1,
            limit: scas,
        });
    }
    let sca_index = sca_number - 1;
    let detectors = table.shape()[1];
    if num_detectors > detectors
        || pre_average.len() < num_detectors
        || post_average.len() < num_detectors
    {
        error!("detector count {num_detectors} exceeds band {band_number} dimensions or buffers");
        return Err(LosError::InvalidInput {
            reason: format!(
                "detector count {num_detectors} exceeds band {band_number} dimensions or buffers"
            ),
        });
    }

    for det in 0..num_detectors {
        pre_average[det] = table[[sca_index, det, DetectorParam::PreAcquisitionAverage as usize]];
        post_average[det] = table[[sca_index, det, DetectorParam::PostAcquisitionAverage as usize]];
    }

    if bias.spectral_type() == SpectralType::Thermal {
        if a1_coefficient.is_some() || c1_coefficient.is_some() || a0_coefficient.is_some() {
            error!("thermal band {band_number} has no a1/c1/a0 outputs");
            return Err(LosError::InvalidInput {
                reason: format!("thermal band {band_number} has no a1/c1/a0 outputs"),
            });
        }
        return Ok(());
    }

    if let Some(a1) = a1_coefficient.as_deref_mut() {
        if a1.len() < num_detectors {
            return Err(LosError::InvalidInput {
                reason: "a1 output buffer is too small".to_string(),
            });
        }
        for det in 0..num_detectors {
            a1[det] = table[[sca_index, det, DetectorParam::A1 as usize]];
        }
    }
    if let Some(c1) = c1_coefficient.as_deref_mut() {
        if c1.len() < num_detectors {
            return Err(LosError::InvalidInput {
                reason: "c1 output buffer is too small".to_string(),
            });
        }
        for det in 0..num_detectors {
            c1[det] = table[[sca_index, det, DetectorParam::C1 as usize]];
        }
    }
    if let Some(a0) = a0_coefficient {
        // a0_value is always present for the OLI types.
        if let Some(values) = a0_value {
            *a0 = values[sca_index];
        }
    }
    Ok(())
}
