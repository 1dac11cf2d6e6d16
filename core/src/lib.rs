pub mod api;
pub mod cli;
pub mod error;
pub mod extraction;
pub mod header;
pub mod inventory;
pub mod listmode;
pub mod types;

pub use api::{inventory_archive, ExamInventory};
pub use cli::report::TextReport;
pub use error::{Result, SdmError};
pub use header::{DicomFileReader, HeaderReader, InMemoryHeaderReader};
pub use listmode::{resolve_data_file_path, resolve_mrac, ListmodeClassifier};
pub use types::*;
