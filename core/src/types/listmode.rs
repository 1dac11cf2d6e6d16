use super::{CalibrationKind, ListmodeCategory};
use std::path::PathBuf;

/// Attenuation-correction series referenced by a listmode header
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct MracReference {
    pub series_number: i32,
    pub description: String,
}

/// An MRAC reference together with whether the exam contains it
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct MracStatus {
    pub reference: MracReference,
    pub exists: bool,
}

/// Completeness of the MRAC series referenced by one listmode header
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct MracResult {
    /// References in the order of the header's sequence
    pub references: Vec<MracStatus>,

    /// All references exist (true for an empty sequence)
    pub complete: bool,
}

impl MracResult {
    /// Builds the result, deriving `complete` from the per-reference flags
    pub fn new(references: Vec<MracStatus>) -> Self {
        let complete = references.iter().all(|r| r.exists);
        Self {
            references,
            complete,
        }
    }

    /// Referenced series numbers in sequence order
    pub fn series_numbers(&self) -> Vec<i32> {
        self.references
            .iter()
            .map(|r| r.reference.series_number)
            .collect()
    }

    /// Referenced series numbers that are missing from the exam
    pub fn missing_series_numbers(&self) -> Vec<i32> {
        self.references
            .iter()
            .filter(|r| !r.exists)
            .map(|r| r.reference.series_number)
            .collect()
    }
}

/// Classification of one header file of a listmode placeholder series
///
/// Construct through the category-specific constructors, which keep the
/// optional fields consistent with the category.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct ListmodeEntry {
    /// Directory name of the placeholder series
    pub series_directory_name: String,

    /// SeriesDescription read from the header itself
    pub series_description: String,

    /// File name of the inspected header
    pub header_file_name: String,

    /// Resolved data file; `None` for weight/count-correction and errors
    pub data_file_path: Option<PathBuf>,

    pub category: ListmodeCategory,

    pub data_file_exists: bool,

    /// Present only for raw listmode entries
    pub mrac: Option<MracResult>,

    /// Present only for error entries
    pub error: Option<String>,
}

impl ListmodeEntry {
    fn base(
        series_directory_name: impl Into<String>,
        series_description: impl Into<String>,
        header_file_name: impl Into<String>,
        category: ListmodeCategory,
    ) -> Self {
        Self {
            series_directory_name: series_directory_name.into(),
            series_description: series_description.into(),
            header_file_name: header_file_name.into(),
            data_file_path: None,
            category,
            data_file_exists: false,
            mrac: None,
            error: None,
        }
    }

    /// Entry for a header describing a raw listmode file
    pub fn raw_listmode(
        series_directory_name: impl Into<String>,
        series_description: impl Into<String>,
        header_file_name: impl Into<String>,
        data_file_path: PathBuf,
        data_file_exists: bool,
        mrac: MracResult,
    ) -> Self {
        Self {
            data_file_path: Some(data_file_path),
            data_file_exists,
            mrac: Some(mrac),
            ..Self::base(
                series_directory_name,
                series_description,
                header_file_name,
                ListmodeCategory::RawListmode,
            )
        }
    }

    /// Entry for a geometric-calibration or normalization header
    pub fn calibration(
        series_directory_name: impl Into<String>,
        series_description: impl Into<String>,
        header_file_name: impl Into<String>,
        kind: CalibrationKind,
        data_file_path: PathBuf,
        data_file_exists: bool,
    ) -> Self {
        Self {
            data_file_path: Some(data_file_path),
            data_file_exists,
            ..Self::base(
                series_directory_name,
                series_description,
                header_file_name,
                kind.into(),
            )
        }
    }

    /// Entry for a weight/count-correction header
    ///
    /// There is no external file to check, so the data file counts as present.
    pub fn weight_count_correction(
        series_directory_name: impl Into<String>,
        series_description: impl Into<String>,
        header_file_name: impl Into<String>,
    ) -> Self {
        Self {
            data_file_exists: true,
            ..Self::base(
                series_directory_name,
                series_description,
                header_file_name,
                ListmodeCategory::WeightCountCorrection,
            )
        }
    }

    /// Entry for a header that could not be classified
    pub fn failed(
        series_directory_name: impl Into<String>,
        series_description: impl Into<String>,
        header_file_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::base(
                series_directory_name,
                series_description,
                header_file_name,
                ListmodeCategory::Error,
            )
        }
    }

    pub fn mrac_complete(&self) -> Option<bool> {
        self.mrac.as_ref().map(|m| m.complete)
    }

    pub fn mrac_series_numbers(&self) -> Option<Vec<i32>> {
        self.mrac.as_ref().map(MracResult::series_numbers)
    }

    /// Whether the entry is classified, its data file exists and, for raw
    /// listmode, its MRAC series are complete
    pub fn is_complete(&self) -> bool {
        self.category != ListmodeCategory::Error
            && self.data_file_exists
            && self.mrac_complete().unwrap_or(true)
    }
}
