use dicom_core::dictionary::DataDictionary;
use dicom_core::{Tag, VR};
use dicom_dictionary_std::StandardDataDictionary;
use dicom_object::InMemDicomObject;

// Exam Tags
pub use dicom_dictionary_std::tags::{
    ACQUISITION_DATE, PATIENT_ID, PATIENT_NAME, STUDY_DESCRIPTION, STUDY_ID,
};

// Series Tags
pub use dicom_dictionary_std::tags::{
    ACQUISITION_TIME, MODALITY, SERIES_DESCRIPTION, SERIES_NUMBER,
};

// GE Private Listmode Tags
pub const LISTMODE_FILE_PATH: Tag = Tag(0x0009, 0x10DA);

// GE Private Calibration Tags
pub const CALIBRATION_TYPE: Tag = Tag(0x0017, 0x1005);
pub const CALIBRATION_FILE_PATH: Tag = Tag(0x0017, 0x1007);

// GE Private MR Attenuation Correction Tags
pub const MRAC_SEQUENCE: Tag = Tag(0x0023, 0x1060);
pub const MRAC_SERIES_DESCRIPTION: Tag = Tag(0x0023, 0x1061);
pub const MRAC_SERIES_NUMBER: Tag = Tag(0x0023, 0x1062);

/// Checks whether a tag is present in the header
pub fn has_tag(dcm: &InMemDicomObject, tag: Tag) -> bool {
    dcm.element(tag).is_ok()
}

/// Helper to get string value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to string
pub fn get_string_value(dcm: &InMemDicomObject, tag: Tag) -> Option<String> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_str().ok())
        .map(|s| s.trim().to_string())
}

/// Helper to get integer value from DICOM tag
///
/// Private tags without a dictionary entry are often read back as untyped
/// bytes, so those are parsed from their decoded text instead.
pub fn get_int_value(dcm: &InMemDicomObject, tag: Tag) -> Option<i32> {
    let elem = dcm.element(tag).ok()?;
    match elem.vr() {
        VR::UN | VR::OB => get_text_value(dcm, tag).and_then(|s| s.parse().ok()),
        _ => elem.to_int::<i32>().ok(),
    }
}

/// Helper to get the raw bytes of a DICOM tag
pub fn get_bytes_value(dcm: &InMemDicomObject, tag: Tag) -> Option<Vec<u8>> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_bytes().ok())
        .map(|bytes| bytes.into_owned())
}

/// Helper to get a text value regardless of how it was encoded
///
/// Decodes the raw bytes as UTF-8 (lossy) and trims NUL and space padding.
pub fn get_text_value(dcm: &InMemDicomObject, tag: Tag) -> Option<String> {
    get_bytes_value(dcm, tag)
        .map(|bytes| trim_padding(&String::from_utf8_lossy(&bytes)).to_string())
}

/// Helper to get the items of a sequence tag
///
/// Returns `None` if the tag is absent or is not a sequence
pub fn get_sequence_items(dcm: &InMemDicomObject, tag: Tag) -> Option<&[InMemDicomObject]> {
    dcm.element(tag).ok().and_then(|elem| elem.items())
}

/// Resolves a standard attribute keyword (e.g. `"StudyDate"`) to its tag
///
/// Also accepts the `(gggg,eeee)` notation.
pub fn parse_tag_keyword(keyword: &str) -> Option<Tag> {
    StandardDataDictionary.parse_tag(keyword.trim())
}

pub(crate) fn trim_padding(s: &str) -> &str {
    s.trim_matches(|c: char| c == '\0' || c.is_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicom_core::{DataElement, PrimitiveValue};

    #[test]
    fn test_tag_values() {
        assert_eq!(LISTMODE_FILE_PATH, Tag(0x0009, 0x10DA));
        assert_eq!(CALIBRATION_TYPE, Tag(0x0017, 0x1005));
        assert_eq!(CALIBRATION_FILE_PATH, Tag(0x0017, 0x1007));
        assert_eq!(MRAC_SEQUENCE, Tag(0x0023, 0x1060));
        assert_eq!(SERIES_NUMBER, Tag(0x0020, 0x0011));
        assert_eq!(SERIES_DESCRIPTION, Tag(0x0008, 0x103E));
    }

    #[test]
    fn test_text_value_from_untyped_bytes() {
        let mut dcm = InMemDicomObject::new_empty();
        dcm.put(DataElement::new(
            CALIBRATION_TYPE,
            VR::UN,
            PrimitiveValue::from(b"PET 3D Normalization\0".to_vec()),
        ));

        assert_eq!(
            get_text_value(&dcm, CALIBRATION_TYPE).as_deref(),
            Some("PET 3D Normalization")
        );
    }

    #[test]
    fn test_int_value_from_untyped_bytes() {
        let mut dcm = InMemDicomObject::new_empty();
        dcm.put(DataElement::new(
            MRAC_SERIES_NUMBER,
            VR::UN,
            PrimitiveValue::from(b"12 ".to_vec()),
        ));

        assert_eq!(get_int_value(&dcm, MRAC_SERIES_NUMBER), Some(12));
    }

    #[test]
    fn test_missing_tags() {
        let dcm = InMemDicomObject::new_empty();
        assert!(!has_tag(&dcm, LISTMODE_FILE_PATH));
        assert_eq!(get_string_value(&dcm, SERIES_DESCRIPTION), None);
        assert_eq!(get_int_value(&dcm, SERIES_NUMBER), None);
        assert!(get_sequence_items(&dcm, MRAC_SEQUENCE).is_none());
    }

    #[test]
    fn test_parse_tag_keyword() {
        assert_eq!(parse_tag_keyword("StudyDate"), Some(Tag(0x0008, 0x0020)));
        assert_eq!(parse_tag_keyword("NotARealKeyword"), None);
    }
}
