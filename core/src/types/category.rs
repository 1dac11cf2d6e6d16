use std::fmt;

/// Calibration type strings and the kind each one denotes
///
/// Any other calibration type is not classified.
pub const CALIBRATION_TYPES: &[(&str, CalibrationKind)] = &[
    ("3D Geometric Calibration", CalibrationKind::Geometric),
    ("PET 3D Normalization", CalibrationKind::Normalization),
];

/// Kind of sinogram a calibration header refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalibrationKind {
    Geometric,
    Normalization,
}

impl CalibrationKind {
    /// Maps a calibration type string to its kind
    ///
    /// Matching is exact; padding should be trimmed beforehand.
    pub fn from_calibration_type(calibration_type: &str) -> Option<Self> {
        CALIBRATION_TYPES
            .iter()
            .find(|(name, _)| *name == calibration_type)
            .map(|(_, kind)| *kind)
    }
}

impl From<CalibrationKind> for ListmodeCategory {
    fn from(kind: CalibrationKind) -> Self {
        match kind {
            CalibrationKind::Geometric => ListmodeCategory::GeometricCalibration,
            CalibrationKind::Normalization => ListmodeCategory::Normalization,
        }
    }
}

/// Category of the data file a listmode placeholder header refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "kebab-case"))]
pub enum ListmodeCategory {
    /// Raw listmode binary (BLF)
    RawListmode,
    /// Geometric calibration sinogram
    GeometricCalibration,
    /// Normalization sinogram
    Normalization,
    /// Weight/count-correction header without an external file
    WeightCountCorrection,
    /// The header could not be classified
    Error,
}

impl ListmodeCategory {
    /// Maps a calibration type string to its category
    ///
    /// See [`CalibrationKind::from_calibration_type`].
    pub fn from_calibration_type(calibration_type: &str) -> Option<Self> {
        CalibrationKind::from_calibration_type(calibration_type).map(Into::into)
    }

    /// Returns simple name for display
    pub fn simple_name(&self) -> &'static str {
        match self {
            ListmodeCategory::RawListmode => "BLF",
            ListmodeCategory::GeometricCalibration => "3D Geometric Calibration",
            ListmodeCategory::Normalization => "PET 3D Normalization",
            ListmodeCategory::WeightCountCorrection => "3D WCC",
            ListmodeCategory::Error => "error",
        }
    }

    /// Whether entries of this category reference an external data file
    pub fn has_data_file(&self) -> bool {
        matches!(
            self,
            ListmodeCategory::RawListmode
                | ListmodeCategory::GeometricCalibration
                | ListmodeCategory::Normalization
        )
    }
}

impl fmt::Display for ListmodeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.simple_name())
    }
}
