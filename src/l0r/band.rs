//! L0R front end: ancillary tables and band image datasets.
//!
//! One [`L0r`] instance manages the logical files of a collect, named
//! from the scene prefix: `<prefix>_ANC.h5` for ancillary tables,
//! `<prefix>_B<NN>.h5` per imaging band, `<prefix>_MTA.h5` for metadata.
//! A VRP band stores its `VRP` dataset inside its parent imaging band's
//! file, so opening either band resolves to the same reference-counted
//! handle.

use std::collections::HashMap;

use log::error;

use crate::error::{LosError, Result};
use crate::satellite::{band_attributes, BandClassification};

use super::store::{AccessMode, Dataset, MemoryStore, TableData};
use super::{AncillaryRecord, DATASET_NAME_DETECTOR_OFFSETS, DATASET_NAME_IMAGE, DATASET_NAME_VRP};

/// Whether band datasets are created with deflate + shuffle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandCompression {
    None,
    Deflate,
}

/// Access to the logical files of one L0R collect.
#[derive(Debug)]
pub struct L0r {
    prefix: String,
    compression: BandCompression,
    store: MemoryStore,
    ancillary_mode: Option<AccessMode>,
    metadata_mode: Option<AccessMode>,
    /// Band number -> the physical file its handle references
    open_bands: HashMap<i32, (String, AccessMode)>,
}

impl L0r {
    /// Create an interface for a collect named by `prefix`.
    pub fn new(prefix: &str, compression: BandCompression) -> L0r {
        L0r {
            prefix: prefix.to_string(),
            compression,
            store: MemoryStore::new(),
            ancillary_mode: None,
            metadata_mode: None,
            open_bands: HashMap::new(),
        }
    }

    /// Name of the ancillary file.
    pub fn ancillary_filename(&self) -> String {
        format!("{}_ANC.h5", self.prefix)
    }

    /// Name of the metadata file.
    pub fn metadata_filename(&self) -> String {
        format!("{}_MTA.h5", self.prefix)
    }

    /// Name of the physical file holding a band's datasets. VRP and blind
    /// bands resolve to their parent imaging band's file.
    pub fn band_filename(&self, band_number: i32) -> Result<String> {
        let attributes = band_attributes(band_number)?;
        Ok(format!(
            "{}_B{:02}.h5",
            self.prefix, attributes.normal_band_number
        ))
    }

    /// Open the ancillary file. One open per access mode.
    pub fn open_ancillary(&mut self, mode: AccessMode) -> Result<()> {
        if self.ancillary_mode.is_some() {
            error!("ancillary file is already open");
            return Err(LosError::BackingStore {
                name: self.ancillary_filename(),
                reason: "ancillary file is already open".to_string(),
            });
        }
        self.store
            .open(&self.ancillary_filename(), mode, mode.writable())?;
        self.ancillary_mode = Some(mode);
        Ok(())
    }

    /// Close the ancillary file, flushing pending writes.
    pub fn close_ancillary(&mut self) -> Result<()> {
        if self.ancillary_mode.take().is_none() {
            return Err(LosError::BackingStore {
                name: self.ancillary_filename(),
                reason: "ancillary file is not open".to_string(),
            });
        }
        self.store.close(&self.ancillary_filename())
    }

    /// Open the metadata file. One open per access mode.
    pub fn open_metadata(&mut self, mode: AccessMode) -> Result<()> {
        if self.metadata_mode.is_some() {
            return Err(LosError::BackingStore {
                name: self.metadata_filename(),
                reason: "metadata file is already open".to_string(),
            });
        }
        self.store
            .open(&self.metadata_filename(), mode, mode.writable())?;
        self.metadata_mode = Some(mode);
        Ok(())
    }

    /// Close the metadata file.
    pub fn close_metadata(&mut self) -> Result<()> {
        if self.metadata_mode.take().is_none() {
            return Err(LosError::BackingStore {
                name: self.metadata_filename(),
                reason: "metadata file is not open".to_string(),
            });
        }
        self.store.close(&self.metadata_filename())
    }

    fn table_path<R: AncillaryRecord>() -> String {
        format!("{}/{}", R::GROUP_PATH, R::TABLE_NAME)
    }

    /// Append records to an ancillary table, creating the table on first
    /// write.
    pub fn append_ancillary<R: AncillaryRecord>(&mut self, records: &[R]) -> Result<()> {
        if self.ancillary_mode.is_none() {
            return Err(LosError::BackingStore {
                name: self.ancillary_filename(),
                reason: "ancillary file is not open".to_string(),
            });
        }
        let path = Self::table_path::<R>();
        let record_size = R::schema().record_size;
        let file = self.store.file_mut(&self.ancillary_filename())?;
        let table = file.tables.entry(path).or_insert_with(|| TableData {
            record_size,
            rows: Vec::new(),
        });
        for record in records {
            table.rows.push(record.encode());
        }
        Ok(())
    }

    /// Number of records in an ancillary table.
    pub fn ancillary_record_count<R: AncillaryRecord>(&self) -> Result<usize> {
        let path = Self::table_path::<R>();
        let file = self.store.file(&self.ancillary_filename())?;
        let table = file.tables.get(&path).ok_or_else(|| {
            error!("ancillary table '{path}' not found");
            LosError::NotFound {
                kind: "ancillary table",
                name: path.clone(),
            }
        })?;
        Ok(table.rows.len())
    }

    /// Read a run of records from an ancillary table.
    pub fn read_ancillary<R: AncillaryRecord>(&self, start: usize, count: usize) -> Result<Vec<R>> {
        let path = Self::table_path::<R>();
        let file = self.store.file(&self.ancillary_filename())?;
        let table = file.tables.get(&path).ok_or_else(|| {
            error!("ancillary table '{path}' not found");
            LosError::NotFound {
                kind: "ancillary table",
                name: path.clone(),
            }
        })?;
        if start + count > table.rows.len() {
            return Err(LosError::OutOfRange {
                parameter: "record",
                value: (start + count) as f64,
                min: 0.0,
                max: table.rows.len() as f64,
            });
        }
        table.rows[start..start + count]
            .iter()
            .map(|row| R::decode(row))
            .collect()
    }

    /// Open a band's file, sharing the handle with any band that lives in
    /// the same physical file.
    pub fn open_band(&mut self, band_number: i32, mode: AccessMode) -> Result<()> {
        if self.open_bands.contains_key(&band_number) {
            error!("band {band_number} is already open");
            return Err(LosError::BackingStore {
                name: self.band_filename(band_number)?,
                reason: format!("band {band_number} is already open"),
            });
        }
        let filename = self.band_filename(band_number)?;
        self.store.open(&filename, mode, mode.writable())?;
        self.open_bands.insert(band_number, (filename, mode));
        Ok(())
    }

    /// Close a band, flushing the physical file when its last band handle
    /// closes.
    pub fn close_band(&mut self, band_number: i32) -> Result<()> {
        let (filename, _mode) = self.open_bands.remove(&band_number).ok_or_else(|| {
            error!("band {band_number} is not open");
            LosError::BackingStore {
                name: format!("band {band_number}"),
                reason: "band is not open".to_string(),
            }
        })?;
        self.store.close(&filename)
    }

    fn open_band_file(&self, band_number: i32) -> Result<&str> {
        self.open_bands
            .get(&band_number)
            .map(|(filename, _)| filename.as_str())
            .ok_or_else(|| LosError::BackingStore {
                name: format!("band {band_number}"),
                reason: "band is not open".to_string(),
            })
    }

    /// Image dataset name for a band: `VRP` for the reference-pixel
    /// bands, `Image` otherwise.
    fn image_dataset_name(band_number: i32) -> Result<&'static str> {
        let attributes = band_attributes(band_number)?;
        Ok(match attributes.classification {
            BandClassification::Vrp | BandClassification::BlindVrp => DATASET_NAME_VRP,
            _ => DATASET_NAME_IMAGE,
        })
    }

    fn image_dataset_mut(&mut self, band_number: i32) -> Result<&mut Dataset> {
        let attributes = band_attributes(band_number)?;
        let dataset_name = Self::image_dataset_name(band_number)?;
        let compressed = self.compression == BandCompression::Deflate;
        let filename = self.open_band_file(band_number)?.to_string();
        let file = self.store.file_mut(&filename)?;
        Ok(file
            .datasets
            .entry(dataset_name.to_string())
            .or_insert_with(|| {
                Dataset::create(
                    attributes.scas,
                    attributes.detectors_per_sca,
                    1,
                    None,
                    compressed,
                )
            }))
    }

    fn image_dataset(&self, band_number: i32) -> Result<&Dataset> {
        let dataset_name = Self::image_dataset_name(band_number)?;
        let filename = self.open_band_file(band_number)?;
        let file = self.store.file(filename)?;
        file.datasets.get(dataset_name).ok_or_else(|| {
            error!("dataset '{dataset_name}' not found for band {band_number}");
            LosError::NotFound {
                kind: "dataset",
                name: dataset_name.to_string(),
            }
        })
    }

    fn offsets_dataset_mut(&mut self, band_number: i32) -> Result<&mut Dataset> {
        let attributes = band_attributes(band_number)?;
        let compressed = self.compression == BandCompression::Deflate;
        let filename = self.open_band_file(band_number)?.to_string();
        let file = self.store.file_mut(&filename)?;
        Ok(file
            .datasets
            .entry(DATASET_NAME_DETECTOR_OFFSETS.to_string())
            .or_insert_with(|| {
                Dataset::create(
                    attributes.scas,
                    attributes.detectors_per_sca,
                    2,
                    Some(2),
                    compressed,
                )
            }))
    }

    fn offsets_dataset(&self, band_number: i32) -> Result<&Dataset> {
        let filename = self.open_band_file(band_number)?;
        let file = self.store.file(filename)?;
        file.datasets
            .get(DATASET_NAME_DETECTOR_OFFSETS)
            .ok_or_else(|| LosError::NotFound {
                kind: "dataset",
                name: DATASET_NAME_DETECTOR_OFFSETS.to_string(),
            })
    }

    /// Whether the band's image dataset exists in its file.
    pub fn band_present(&self, band_number: i32) -> Result<bool> {
        let dataset_name = Self::image_dataset_name(band_number)?;
        let filename = self.open_band_file(band_number)?;
        let file = self.store.file(filename)?;
        Ok(file.datasets.contains_key(dataset_name))
    }

    /// Current line extent of the band's image dataset.
    pub fn band_records_count(&self, band_number: i32) -> Result<usize> {
        Ok(self.image_dataset(band_number)?.lines())
    }

    /// Line extent of the band's detector-offset dataset (always 2).
    pub fn band_offset_records_count(&self, band_number: i32) -> Result<usize> {
        Ok(self.offsets_dataset(band_number)?.lines())
    }

    /// Write image lines across all SCAs, extending the line axis as
    /// needed. `data` is SCA-major `[sca][line][detector]`.
    pub fn write_band_lines(
        &mut self,
        band_number: i32,
        start_line: usize,
        line_count: usize,
        data: &[u16],
    ) -> Result<()> {
        self.image_dataset_mut(band_number)?
            .write_lines(start_line, line_count, data)
    }

    /// Write image lines for one SCA.
    pub fn write_band_lines_sca(
        &mut self,
        band_number: i32,
        sca_index: usize,
        start_line: usize,
        line_count: usize,
        data: &[u16],
    ) -> Result<()> {
        self.image_dataset_mut(band_number)?
            .write_lines_sca(sca_index, start_line, line_count, data)
    }

    /// Read image lines across all SCAs, SCA-major.
    pub fn read_band_lines(
        &self,
        band_number: i32,
        start_line: usize,
        line_count: usize,
    ) -> Result<Vec<u16>> {
        self.image_dataset(band_number)?
            .read_lines(start_line, line_count)
    }

    /// Read image lines for one SCA.
    pub fn read_band_lines_sca(
        &self,
        band_number: i32,
        sca_index: usize,
        start_line: usize,
        line_count: usize,
    ) -> Result<Vec<u16>> {
        self.image_dataset(band_number)?
            .read_lines_sca(sca_index, start_line, line_count)
    }

    /// Shrink the band's image line extent to the one-line minimum marker.
    pub fn truncate_band_lines(&mut self, band_number: i32) -> Result<()> {
        self.image_dataset_mut(band_number)?.truncate_lines();
        Ok(())
    }

    /// Write the top (leading) detector offsets: line 0 of the offset
    /// dataset. `data` is SCA-major, one value per detector.
    pub fn set_top_detector_offsets(&mut self, band_number: i32, data: &[u16]) -> Result<()> {
        self.offsets_dataset_mut(band_number)?
            .write_lines_stacked(0, data)
    }

    /// Write the bottom (trailing) detector offsets: line 1.
    pub fn set_bottom_detector_offsets(&mut self, band_number: i32, data: &[u16]) -> Result<()> {
        self.offsets_dataset_mut(band_number)?
            .write_lines_stacked(1, data)
    }

    /// Read the top detector offsets (line 0), SCA-major.
    pub fn get_top_detector_offsets(&self, band_number: i32) -> Result<Vec<u16>> {
        self.offsets_dataset(band_number)?.read_lines_stacked(0)
    }

    /// Read the bottom detector offsets (line 1), SCA-major.
    pub fn get_bottom_detector_offsets(&self, band_number: i32) -> Result<Vec<u16>> {
        self.offsets_dataset(band_number)?.read_lines_stacked(1)
    }

    /// Whether a physical file has been flushed by closing all handles.
    pub fn file_flushed(&self, filename: &str) -> bool {
        !self.store.is_open(filename) && self.store.exists(filename)
    }
}

impl Dataset {
    /// Write one line across all SCAs; `data` is one value per detector
    /// per SCA, SCA-major.
    fn write_lines_stacked(&mut self, line: usize, data: &[u16]) -> Result<()> {
        if data.len() != self.scas * self.detectors {
            return Err(LosError::InvalidInput {
                reason: format!(
                    "buffer holds {} values, one line across {} SCAs needs {}",
                    data.len(),
                    self.scas,
                    self.scas * self.detectors
                ),
            });
        }
        for sca_index in 0..self.scas {
            self.write_lines_sca(
                sca_index,
                line,
                1,
                &data[sca_index * self.detectors..(sca_index + 1) * self.detectors],
            )?;
        }
        Ok(())
    }

    /// Read one line across all SCAs, SCA-major.
    fn read_lines_stacked(&self, line: usize) -> Result<Vec<u16>> {
        let mut out = Vec::with_capacity(self.scas * self.detectors);
        for sca_index in 0..self.scas {
            out.extend(self.read_lines_sca(sca_index, line, 1)?);
        }
        Ok(out)
    }
}
