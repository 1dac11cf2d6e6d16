//! Core type definitions for the scan-data inventory
//!
//! This module provides the fundamental types used throughout the sdmscan library:
//! - [`ExamRecord`]: Exam-level metadata of one `PESI/p*/e*` directory
//! - [`SeriesRecord`] and [`SeriesIndex`]: The discovered series of an exam
//! - [`ListmodeCategory`]: What kind of data file a listmode placeholder header refers to
//! - [`ListmodeEntry`]: Classification of one placeholder header file
//! - [`MracReference`], [`MracStatus`], [`MracResult`]: MR attenuation-correction completeness
//! - [`InventoryConfig`]: Configuration of an inventory run

mod category;
mod config;
mod exam;
mod listmode;
mod series;

pub use category::{CalibrationKind, ListmodeCategory, CALIBRATION_TYPES};
pub use config::{InventoryConfig, DEFAULT_ARCHIVE_ROOT};
pub use exam::{normalize_dicom_date, ExamRecord, EXAM_TREE_DIR};
pub use listmode::{ListmodeEntry, MracReference, MracResult, MracStatus};
pub use series::{SeriesIndex, SeriesRecord, LISTMODE_MODALITY};
