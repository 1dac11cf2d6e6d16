//! Listmode placeholder classification
//!
//! - [`data_path`]: Resolves data-file references embedded in header tags
//! - [`mrac`]: Checks that the MRAC series a listmode header needs were acquired
//! - [`classifier`]: Classifies each header of a placeholder series

pub mod classifier;
pub mod data_path;
pub mod mrac;

pub use classifier::ListmodeClassifier;
pub use data_path::{data_root, resolve_data_file_path, DATA_ROOT_LEVELS};
pub use mrac::{extract_mrac_references, resolve_mrac};
