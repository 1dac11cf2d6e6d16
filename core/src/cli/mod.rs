pub mod report;

use crate::types::{InventoryConfig, DEFAULT_ARCHIVE_ROOT};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments for sdmscan
#[derive(Parser, Debug)]
#[command(name = "sdmscan")]
#[command(about = "Inventory PET/MR exams on a GE scan data manager network drive")]
#[command(version)]
pub struct Cli {
    /// Subdirectory to parse (e.g. petmr_2107)
    #[arg(value_name = "SUBDIR")]
    pub subdirectory: PathBuf,

    /// Master (root) directory of the network drive
    #[arg(long = "mdir", value_name = "DIR", default_value = DEFAULT_ARCHIVE_ROOT)]
    pub archive_root: PathBuf,

    /// Additional exam tag by DICOM keyword (repeatable)
    #[arg(short, long = "tag", value_name = "KEYWORD")]
    pub tags: Vec<String>,

    /// Directory for CSV reports [default: <SUBDIR>_inventory]
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "csv")]
    pub format: OutputFormat,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Inventory configuration described by the arguments
    pub fn config(&self) -> InventoryConfig {
        InventoryConfig::new(&self.subdirectory)
            .with_archive_root(&self.archive_root)
            .with_extra_exam_tags(self.tags.clone())
    }

    /// Directory the CSV reports are written to
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| {
            let stem = self
                .subdirectory
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "sdm".to_string());
            PathBuf::from(format!("{}_inventory", stem))
        })
    }
}

/// Output format options
#[derive(Debug, Clone, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text on stdout
    Text,
    /// One CSV file per table in the output directory
    Csv,
    /// JSON on stdout
    Json,
}
