use crate::error::{Result, SdmError};
use crate::extraction::tags::{
    get_int_value, get_sequence_items, get_text_value, has_tag, MRAC_SEQUENCE,
    MRAC_SERIES_DESCRIPTION, MRAC_SERIES_NUMBER,
};
use crate::types::{MracReference, MracResult, MracStatus, SeriesIndex};
use dicom_object::InMemDicomObject;
use log::debug;

/// Reads the MRAC series references of a listmode header
///
/// A header without the MRAC sequence has no references.
///
/// # Errors
///
/// Returns [`SdmError::TagNotFound`] if a sequence item has no series
/// number and [`SdmError::InvalidValue`] if it cannot be read as an integer
pub fn extract_mrac_references(header: &InMemDicomObject) -> Result<Vec<MracReference>> {
    let items = get_sequence_items(header, MRAC_SEQUENCE).unwrap_or_default();

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            if !has_tag(item, MRAC_SERIES_NUMBER) {
                return Err(SdmError::TagNotFound(format!(
                    "MRAC reference #{} has no series number",
                    i + 1
                )));
            }
            let series_number = get_int_value(item, MRAC_SERIES_NUMBER).ok_or_else(|| {
                SdmError::InvalidValue(format!("MRAC reference #{} series number", i + 1))
            })?;
            Ok(MracReference {
                series_number,
                description: get_text_value(item, MRAC_SERIES_DESCRIPTION).unwrap_or_default(),
            })
        })
        .collect()
}

/// Checks which referenced MRAC series were discovered for the exam
///
/// Reference order follows the header's sequence. With no references the
/// result is complete.
pub fn resolve_mrac(header: &InMemDicomObject, known_series: &SeriesIndex) -> Result<MracResult> {
    let references = extract_mrac_references(header)?
        .into_iter()
        .map(|reference| {
            let exists = known_series.contains_series_number(reference.series_number);
            if !exists {
                debug!(
                    "MRAC series {} ({}) not found",
                    reference.series_number, reference.description
                );
            }
            MracStatus { reference, exists }
        })
        .collect();

    Ok(MracResult::new(references))
}
