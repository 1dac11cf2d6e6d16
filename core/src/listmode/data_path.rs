use crate::error::{Result, SdmError};
use std::path::{Path, PathBuf};

/// Number of directory levels between a header's own directory and the
/// directory its data-file paths are relative to
///
/// Headers live in `<root>/PESI/p*/e*/s*/`, data files below `<root>`.
pub const DATA_ROOT_LEVELS: usize = 4;

/// Returns the directory that data-file paths of `header_file` are relative to
///
/// # Errors
///
/// Returns [`SdmError::PathResolution`] if the header has fewer than
/// [`DATA_ROOT_LEVELS`] ancestors above its own directory
pub fn data_root(header_file: &Path) -> Result<&Path> {
    // ancestors() starts with the file itself, then its directory
    header_file
        .ancestors()
        .nth(DATA_ROOT_LEVELS + 1)
        .ok_or_else(|| SdmError::PathResolution {
            path: header_file.to_path_buf(),
            levels: DATA_ROOT_LEVELS,
        })
}

/// Resolves a data-file reference stored in a header tag
///
/// The tag value starts with a one-byte marker that is not part of the
/// path; the remainder is a path relative to [`data_root`]. Trailing DICOM
/// padding is ignored. Existence is not checked.
///
/// # Errors
///
/// - [`SdmError::PathResolution`] if the header sits too shallow
/// - [`SdmError::InvalidValue`] if nothing is left after the marker byte
pub fn resolve_data_file_path(header_file: &Path, relative_value: &[u8]) -> Result<PathBuf> {
    let root = data_root(header_file)?;

    let fragment = relative_value.get(1..).unwrap_or_default();
    let fragment = String::from_utf8_lossy(fragment);
    let fragment = fragment
        .trim_end_matches(|c: char| c == '\0' || c == ' ')
        .trim_start_matches('/');

    if fragment.is_empty() {
        return Err(SdmError::InvalidValue(format!(
            "empty data file reference in {}",
            header_file.display()
        )));
    }

    Ok(root.join(fragment))
}
