//! Header file access
//!
//! The inventory never parses header bytes itself: it asks a [`HeaderReader`]
//! for a structured DICOM object and inspects tags through the helpers in
//! [`crate::extraction::tags`].

use crate::error::{Result, SdmError};
use dicom_dictionary_std::tags::PIXEL_DATA;
use dicom_object::{InMemDicomObject, OpenFileOptions};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Capability to open a header file as a tag-keyed record
///
/// Implementations must be shareable across worker threads, since exams
/// are inventoried in parallel.
pub trait HeaderReader: Sync {
    /// Reads the header at `path`
    ///
    /// # Errors
    ///
    /// Returns [`SdmError::HeaderRead`] if the file is unreadable or malformed
    fn read_header(&self, path: &Path) -> Result<InMemDicomObject>;
}

/// Reads DICOM headers from disk, stopping before any pixel data
#[derive(Debug, Clone, Copy, Default)]
pub struct DicomFileReader;

impl HeaderReader for DicomFileReader {
    fn read_header(&self, path: &Path) -> Result<InMemDicomObject> {
        OpenFileOptions::new()
            .read_until(PIXEL_DATA)
            .open_file(path)
            .map(|obj| obj.into_inner())
            .map_err(|e| SdmError::header_read(path, e))
    }
}

/// Header reader backed by a map of already-built objects
///
/// Useful for feeding synthetic headers through the inventory without
/// writing DICOM files.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHeaderReader {
    headers: HashMap<PathBuf, InMemDicomObject>,
}

impl InMemoryHeaderReader {
    /// Creates an empty reader
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the header returned for `path`
    pub fn insert(&mut self, path: impl Into<PathBuf>, header: InMemDicomObject) {
        self.headers.insert(path.into(), header);
    }

    /// Builder-style variant of [`insert`](Self::insert)
    pub fn with_header(mut self, path: impl Into<PathBuf>, header: InMemDicomObject) -> Self {
        self.insert(path, header);
        self
    }
}

impl HeaderReader for InMemoryHeaderReader {
    fn read_header(&self, path: &Path) -> Result<InMemDicomObject> {
        self.headers
            .get(path)
            .cloned()
            .ok_or_else(|| SdmError::header_read(path, "no header registered for this path"))
    }
}
