use super::series::LISTMODE_MODALITY;
use crate::error::{Result, SdmError};
use crate::extraction::tags::parse_tag_keyword;
use dicom_core::Tag;
use std::path::PathBuf;

/// Default mount point of the scan-data network drive
pub const DEFAULT_ARCHIVE_ROOT: &str = "/uz/data/Admin/ngepetmr";

/// Configuration of an archive inventory run
///
/// # Example
///
/// ```
/// use sdmscan_core::InventoryConfig;
/// use std::path::PathBuf;
///
/// let config = InventoryConfig::new("petmr_2107")
///     .with_archive_root("/mnt/sdm")
///     .with_extra_exam_tags(vec!["StudyDate".to_string()]);
///
/// assert_eq!(config.scan_root(), PathBuf::from("/mnt/sdm/petmr_2107"));
/// assert_eq!(config.extra_exam_tags.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct InventoryConfig {
    /// Root directory of the scan-data drive
    pub archive_root: PathBuf,

    /// Subdirectory of the root to inventory (e.g. `petmr_2107`)
    pub subdirectory: PathBuf,

    /// Additional exam-level tags, by DICOM keyword
    pub extra_exam_tags: Vec<String>,

    /// Modality identifying listmode placeholder series
    pub listmode_modality: String,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            archive_root: PathBuf::from(DEFAULT_ARCHIVE_ROOT),
            subdirectory: PathBuf::new(),
            extra_exam_tags: Vec::new(),
            listmode_modality: LISTMODE_MODALITY.to_string(),
        }
    }
}

impl InventoryConfig {
    /// Creates a configuration for a subdirectory of the default root
    pub fn new(subdirectory: impl Into<PathBuf>) -> Self {
        Self {
            subdirectory: subdirectory.into(),
            ..Self::default()
        }
    }

    /// Builder: Set the archive root
    pub fn with_archive_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.archive_root = root.into();
        self
    }

    /// Builder: Set additional exam tags
    pub fn with_extra_exam_tags(mut self, tags: Vec<String>) -> Self {
        self.extra_exam_tags = tags;
        self
    }

    /// Builder: Set the listmode placeholder modality
    pub fn with_listmode_modality(mut self, modality: impl Into<String>) -> Self {
        self.listmode_modality = modality.into();
        self
    }

    /// Directory that is actually scanned
    pub fn scan_root(&self) -> PathBuf {
        self.archive_root.join(&self.subdirectory)
    }

    /// Checks that the scan root exists
    pub fn validate_scan_root(&self) -> Result<PathBuf> {
        let root = self.scan_root();
        if root.is_dir() {
            Ok(root)
        } else {
            Err(SdmError::InvalidValue(format!(
                "{} is not a directory",
                root.display()
            )))
        }
    }

    /// Resolves the extra exam tag keywords
    ///
    /// # Errors
    ///
    /// Returns [`SdmError::InvalidValue`] for the first unknown keyword
    pub fn resolve_extra_exam_tags(&self) -> Result<Vec<(String, Tag)>> {
        self.extra_exam_tags
            .iter()
            .map(|keyword| {
                parse_tag_keyword(keyword)
                    .map(|tag| (keyword.clone(), tag))
                    .ok_or_else(|| {
                        SdmError::InvalidValue(format!("unknown DICOM keyword '{}'", keyword))
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = InventoryConfig::default();
        assert_eq!(config.archive_root, PathBuf::from(DEFAULT_ARCHIVE_ROOT));
        assert_eq!(config.listmode_modality, "GEMS PET LST");
        assert!(config.extra_exam_tags.is_empty());
    }

    #[test]
    fn test_builder_chain() {
        let config = InventoryConfig::new("petmr_2107")
            .with_archive_root("/mnt/sdm")
            .with_listmode_modality("PET LST");

        assert_eq!(config.scan_root(), PathBuf::from("/mnt/sdm/petmr_2107"));
        assert_eq!(config.listmode_modality, "PET LST");
    }

    #[test]
    fn test_resolve_extra_exam_tags() {
        let config = InventoryConfig::new("x")
            .with_extra_exam_tags(vec!["StudyDate".to_string(), "InstitutionName".to_string()]);
        let tags = config.resolve_extra_exam_tags().unwrap();
        assert_eq!(tags[0], ("StudyDate".to_string(), Tag(0x0008, 0x0020)));
        assert_eq!(tags[1].1, Tag(0x0008, 0x0080));
    }

    #[test]
    fn test_resolve_unknown_extra_exam_tag() {
        let config = InventoryConfig::new("x").with_extra_exam_tags(vec!["Bogus".to_string()]);
        let err = config.resolve_extra_exam_tags().unwrap_err();
        assert!(err.to_string().contains("Bogus"));
    }

    #[test]
    fn test_validate_scan_root() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir(temp_dir.path().join("petmr_2107")).unwrap();

        let config = InventoryConfig::new("petmr_2107").with_archive_root(temp_dir.path());
        assert!(config.validate_scan_root().is_ok());

        let config = InventoryConfig::new("missing").with_archive_root(temp_dir.path());
        assert!(config.validate_scan_root().is_err());
    }
}
