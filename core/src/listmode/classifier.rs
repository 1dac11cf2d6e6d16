use super::data_path::resolve_data_file_path;
use super::mrac::resolve_mrac;
use crate::error::{Result, SdmError};
use crate::extraction::tags::{
    get_bytes_value, get_string_value, get_text_value, has_tag, CALIBRATION_FILE_PATH,
    CALIBRATION_TYPE, LISTMODE_FILE_PATH, SERIES_DESCRIPTION,
};
use crate::header::HeaderReader;
use crate::types::{CalibrationKind, ListmodeEntry, SeriesIndex, SeriesRecord};
use dicom_core::Tag;
use dicom_object::InMemDicomObject;
use log::{debug, warn};
use std::path::{Path, PathBuf};

/// Kind of placeholder header, decided by which private tag it carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderKind {
    RawListmode,
    Calibration,
    WeightCountCorrection,
}

/// Marker tags checked in order; the first one present decides the kind
const HEADER_KIND_RULES: &[(Tag, HeaderKind)] = &[
    (LISTMODE_FILE_PATH, HeaderKind::RawListmode),
    (CALIBRATION_TYPE, HeaderKind::Calibration),
];

fn header_kind(dcm: &InMemDicomObject) -> HeaderKind {
    HEADER_KIND_RULES
        .iter()
        .find(|(tag, _)| has_tag(dcm, *tag))
        .map(|(_, kind)| *kind)
        .unwrap_or(HeaderKind::WeightCountCorrection)
}

/// Classifies the header files of listmode placeholder series
///
/// The placeholder headers do not hold event data; each one points at a
/// raw listmode file, a calibration sinogram, or nothing at all
/// (weight/count correction). The classifier works out which, checks the
/// referenced file exists and, for raw listmode, checks the MRAC series.
///
/// # Example
///
/// ```
/// use sdmscan_core::{InMemoryHeaderReader, ListmodeCategory, ListmodeClassifier};
/// use sdmscan_core::{SeriesIndex, SeriesRecord};
/// use dicom_object::InMemDicomObject;
/// use std::path::PathBuf;
///
/// let header = PathBuf::from("/sdm/PESI/p1/e1/s1000/3.dcm");
/// let reader = InMemoryHeaderReader::new().with_header(&header, InMemDicomObject::new_empty());
/// let series = SeriesRecord::new(1000, "LIST MODE", "GEMS PET LST", "s1000", 1);
///
/// let entries = ListmodeClassifier::new(&reader).classify(&series, &[header], &SeriesIndex::default());
///
/// assert_eq!(entries.len(), 1);
/// assert_eq!(entries[0].category, ListmodeCategory::WeightCountCorrection);
/// assert!(entries[0].data_file_exists);
/// ```
pub struct ListmodeClassifier<'a, R: HeaderReader + ?Sized> {
    reader: &'a R,
}

impl<'a, R: HeaderReader + ?Sized> ListmodeClassifier<'a, R> {
    /// Creates a classifier reading headers through `reader`
    pub fn new(reader: &'a R) -> Self {
        Self { reader }
    }

    /// Classifies every header file of a placeholder series, in file order
    ///
    /// Unreadable or unresolvable headers yield
    /// [`crate::types::ListmodeCategory::Error`] entries; headers with an unknown calibration type are skipped.
    pub fn classify(
        &self,
        placeholder_series: &SeriesRecord,
        header_files: &[PathBuf],
        known_series: &SeriesIndex,
    ) -> Vec<ListmodeEntry> {
        header_files
            .iter()
            .filter_map(|path| self.classify_header(placeholder_series, path, known_series))
            .collect()
    }

    /// Classifies a single header file
    ///
    /// Returns `None` when the header is deliberately skipped.
    pub fn classify_header(
        &self,
        placeholder_series: &SeriesRecord,
        header_file: &Path,
        known_series: &SeriesIndex,
    ) -> Option<ListmodeEntry> {
        let series_dir = placeholder_series.directory_name.as_str();
        let file_name = file_name(header_file);

        let dcm = match self.reader.read_header(header_file) {
            Ok(dcm) => dcm,
            Err(e) => {
                warn!("{}", e);
                return Some(ListmodeEntry::failed(
                    series_dir,
                    "",
                    file_name,
                    e.to_string(),
                ));
            }
        };

        let description = get_string_value(&dcm, SERIES_DESCRIPTION).unwrap_or_default();

        match classify_dicom(series_dir, &description, header_file, &dcm, known_series) {
            Ok(entry) => {
                debug!(
                    "{}: {} (exists: {})",
                    header_file.display(),
                    entry.category,
                    entry.data_file_exists
                );
                Some(entry)
            }
            Err(SdmError::UnknownCalibrationType(calibration_type)) => {
                warn!(
                    "Skipping {}: unknown calibration type '{}'",
                    header_file.display(),
                    calibration_type
                );
                None
            }
            Err(e) => {
                warn!("Failed to classify {}: {}", header_file.display(), e);
                Some(ListmodeEntry::failed(
                    series_dir,
                    description,
                    file_name,
                    e.to_string(),
                ))
            }
        }
    }
}

fn classify_dicom(
    series_dir: &str,
    description: &str,
    header_file: &Path,
    dcm: &InMemDicomObject,
    known_series: &SeriesIndex,
) -> Result<ListmodeEntry> {
    let file_name = file_name(header_file);

    match header_kind(dcm) {
        HeaderKind::RawListmode => {
            let value = get_bytes_value(dcm, LISTMODE_FILE_PATH).unwrap_or_default();
            let data_file = resolve_data_file_path(header_file, &value)?;
            let mrac = resolve_mrac(dcm, known_series)?;
            let exists = data_file.exists();

            Ok(ListmodeEntry::raw_listmode(
                series_dir,
                description,
                file_name,
                data_file,
                exists,
                mrac,
            ))
        }
        HeaderKind::Calibration => {
            let calibration_type = get_text_value(dcm, CALIBRATION_TYPE).unwrap_or_default();
            let kind = CalibrationKind::from_calibration_type(&calibration_type)
                .ok_or(SdmError::UnknownCalibrationType(calibration_type))?;

            let value = get_bytes_value(dcm, CALIBRATION_FILE_PATH).unwrap_or_default();
            let data_file = resolve_data_file_path(header_file, &value)?;
            let exists = data_file.exists();

            Ok(ListmodeEntry::calibration(
                series_dir,
                description,
                file_name,
                kind,
                data_file,
                exists,
            ))
        }
        HeaderKind::WeightCountCorrection => Ok(ListmodeEntry::weight_count_correction(
            series_dir,
            description,
            file_name,
        )),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
