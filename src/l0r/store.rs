//! In-memory logical backing store.
//!
//! The physical container is a chunked hierarchical file format; this
//! store implements its logical contract — files opened once per access
//! mode with reference-counted handles (a VRP band and its parent imaging
//! band share one physical file), record tables keyed by group path, and
//! extensible 3-D datasets with the creation parameters the container
//! would be given (chunk shape, fill value, optional deflate + shuffle,
//! CLASS attribute). Flushing happens when a handle's reference count
//! drops to zero, which is what guarantees write-then-read ordering.

use std::collections::HashMap;

use log::error;

use crate::error::{LosError, Result};

use super::{IMAGE_CHUNK_LINES, IMAGE_CLASS_ATTRIBUTE, IMAGE_DEFLATE_LEVEL, IMAGE_FILL_VALUE};

/// How a file handle was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    Write,
    Update,
}

impl AccessMode {
    pub fn writable(&self) -> bool {
        matches!(self, AccessMode::Write | AccessMode::Update)
    }
}

/// One record table: packed rows of a fixed record size.
#[derive(Debug, Clone, Default)]
pub struct TableData {
    pub record_size: usize,
    pub rows: Vec<Vec<u8>>,
}

/// One 3-D `[SCA][LINE][DETECTOR]` dataset of 16-bit unsigned pixels.
///
/// The line axis is the only extensible one; `fixed_lines` pins it for
/// the detector-offset datasets.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub scas: usize,
    pub detectors: usize,
    lines: usize,
    pub fixed_lines: Option<usize>,
    pub chunk_dimensions: (usize, usize, usize),
    pub deflate_level: Option<u8>,
    pub shuffle: bool,
    pub fill_value: u16,
    pub class_attribute: &'static str,
    /// Pixel data per SCA, `lines * detectors` values each
    sca_data: Vec<Vec<u16>>,
}

impl Dataset {
    /// Create a dataset with the standard creation parameters.
    pub fn create(
        scas: usize,
        detectors: usize,
        initial_lines: usize,
        fixed_lines: Option<usize>,
        compressed: bool,
    ) -> Dataset {
        let mut dataset = Dataset {
            scas,
            detectors,
            lines: 0,
            fixed_lines,
            chunk_dimensions: (1, IMAGE_CHUNK_LINES, detectors),
            deflate_level: compressed.then_some(IMAGE_DEFLATE_LEVEL),
            shuffle: compressed,
            fill_value: IMAGE_FILL_VALUE,
            class_attribute: IMAGE_CLASS_ATTRIBUTE,
            sca_data: vec![Vec::new(); scas],
        };
        dataset.grow_lines(initial_lines);
        dataset
    }

    pub fn lines(&self) -> usize {
        self.lines
    }

    fn grow_lines(&mut self, extent: usize) {
        if extent <= self.lines {
            return;
        }
        for sca in &mut self.sca_data {
            sca.resize(extent * self.detectors, self.fill_value);
        }
        self.lines = extent;
    }

    fn check_extend(&mut self, start_line: usize, line_count: usize) -> Result<()> {
        let wanted = start_line + line_count;
        if let Some(fixed) = self.fixed_lines {
            if wanted > fixed {
                return Err(LosError::InvalidInput {
                    reason: format!("dataset line extent is fixed at {fixed}, write wants {wanted}"),
                });
            }
        }
        self.grow_lines(wanted);
        Ok(())
    }

    /// Write lines for one SCA; `data` is `line_count * detectors` values.
    pub fn write_lines_sca(
        &mut self,
        sca_index: usize,
        start_line: usize,
        line_count: usize,
        data: &[u16],
    ) -> Result<()> {
        if sca_index >= self.scas {
            return Err(LosError::InvalidIndex {
                name: "SCA",
                value: sca_index as i64,
                limit: self.scas,
            });
        }
        if data.len() != line_count * self.detectors {
            return Err(LosError::InvalidInput {
                reason: format!(
                    "buffer holds {} values, write of {line_count} lines needs {}",
                    data.len(),
                    line_count * self.detectors
                ),
            });
        }
        self.check_extend(start_line, line_count)?;
        let start = start_line * self.detectors;
        self.sca_data[sca_index][start..start + data.len()].copy_from_slice(data);
        Ok(())
    }

    /// Write lines across all SCAs; `data` is
    /// `scas * line_count * detectors` values, SCA-major.
    pub fn write_lines(&mut self, start_line: usize, line_count: usize, data: &[u16]) -> Result<()> {
        if data.len() != self.scas * line_count * self.detectors {
            return Err(LosError::InvalidInput {
                reason: format!(
                    "buffer holds {} values, write of {line_count} lines needs {}",
                    data.len(),
                    self.scas * line_count * self.detectors
                ),
            });
        }
        let stride = line_count * self.detectors;
        for sca_index in 0..self.scas {
            self.write_lines_sca(
                sca_index,
                start_line,
                line_count,
                &data[sca_index * stride..(sca_index + 1) * stride],
            )?;
        }
        Ok(())
    }

    /// Read lines for one SCA into a fresh buffer.
    pub fn read_lines_sca(
        &self,
        sca_index: usize,
        start_line: usize,
        line_count: usize,
    ) -> Result<Vec<u16>> {
        if sca_index >= self.scas {
            return Err(LosError::InvalidIndex {
                name: "SCA",
                value: sca_index as i64,
                limit: self.scas,
            });
        }
        if start_line + line_count > self.lines {
            return Err(LosError::OutOfRange {
                parameter: "line",
                value: (start_line + line_count) as f64,
                min: 0.0,
                max: self.lines as f64,
            });
        }
        let start = start_line * self.detectors;
        let end = start + line_count * self.detectors;
        Ok(self.sca_data[sca_index][start..end].to_vec())
    }

    /// Read lines across all SCAs, SCA-major.
    pub fn read_lines(&self, start_line: usize, line_count: usize) -> Result<Vec<u16>> {
        let mut out = Vec::with_capacity(self.scas * line_count * self.detectors);
        for sca_index in 0..self.scas {
            out.extend(self.read_lines_sca(sca_index, start_line, line_count)?);
        }
        Ok(out)
    }

    /// Shrink the line extent to the minimum of one line (the container
    /// disallows a zero extent). Data in the surviving line is kept.
    pub fn truncate_lines(&mut self) {
        self.lines = 1;
        for sca in &mut self.sca_data {
            sca.truncate(self.detectors);
        }
    }
}

/// The contents of one logical file.
#[derive(Debug, Clone, Default)]
pub struct StoreFile {
    pub tables: HashMap<String, TableData>,
    pub datasets: HashMap<String, Dataset>,
    /// Set when the file's last handle closed; cleared by new writes
    pub flushed: bool,
}

#[derive(Debug, Clone, Copy)]
struct OpenState {
    mode: AccessMode,
    refcount: usize,
}

/// Reference-counted logical file store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: HashMap<String, StoreFile>,
    open: HashMap<String, OpenState>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    /// Open a file handle. A file already open keeps its access mode and
    /// gains a reference; opening for read requires the file to exist
    /// unless `create_if_absent`.
    pub fn open(&mut self, filename: &str, mode: AccessMode, create_if_absent: bool) -> Result<()> {
        if let Some(state) = self.open.get_mut(filename) {
            if state.mode != mode {
                error!("file '{filename}' is already open in a different access mode");
                return Err(LosError::BackingStore {
                    name: filename.to_string(),
                    reason: "already open in a different access mode".to_string(),
                });
            }
            state.refcount += 1;
            return Ok(());
        }
        if !self.files.contains_key(filename) {
            if !create_if_absent {
                error!("file '{filename}' does not exist");
                return Err(LosError::BackingStore {
                    name: filename.to_string(),
                    reason: "file does not exist".to_string(),
                });
            }
            self.files.insert(filename.to_string(), StoreFile::default());
        }
        self.open
            .insert(filename.to_string(), OpenState { mode, refcount: 1 });
        Ok(())
    }

    /// Release a file handle, flushing when the last reference closes.
    pub fn close(&mut self, filename: &str) -> Result<()> {
        let state = self.open.get_mut(filename).ok_or_else(|| {
            error!("file '{filename}' is not open");
            LosError::BackingStore {
                name: filename.to_string(),
                reason: "file is not open".to_string(),
            }
        })?;
        state.refcount -= 1;
        if state.refcount == 0 {
            self.open.remove(filename);
            if let Some(file) = self.files.get_mut(filename) {
                file.flushed = true;
            }
        }
        Ok(())
    }

    pub fn is_open(&self, filename: &str) -> bool {
        self.open.contains_key(filename)
    }

    pub fn open_references(&self, filename: &str) -> usize {
        self.open.get(filename).map(|s| s.refcount).unwrap_or(0)
    }

    /// Access an open file for reading.
    pub fn file(&self, filename: &str) -> Result<&StoreFile> {
        if !self.is_open(filename) {
            return Err(LosError::BackingStore {
                name: filename.to_string(),
                reason: "file is not open".to_string(),
            });
        }
        self.files.get(filename).ok_or_else(|| LosError::NotFound {
            kind: "file",
            name: filename.to_string(),
        })
    }

    /// Access an open, writable file for mutation.
    pub fn file_mut(&mut self, filename: &str) -> Result<&mut StoreFile> {
        let state = self.open.get(filename).ok_or_else(|| LosError::BackingStore {
            name: filename.to_string(),
            reason: "file is not open".to_string(),
        })?;
        if !state.mode.writable() {
            error!("file '{filename}' is open read-only");
            return Err(LosError::BackingStore {
                name: filename.to_string(),
                reason: "file is open read-only".to_string(),
            });
        }
        let file = self.files.get_mut(filename).ok_or_else(|| LosError::NotFound {
            kind: "file",
            name: filename.to_string(),
        })?;
        file.flushed = false;
        Ok(file)
    }

    /// Whether a file exists in the store (open or not).
    pub fn exists(&self, filename: &str) -> bool {
        self.files.contains_key(filename)
    }
}
