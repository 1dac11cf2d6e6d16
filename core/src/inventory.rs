//! Exam and series discovery on a scan-data tree
//!
//! The tree is laid out as `<root>/PESI/p*/e*/s*/<header files>`. Exam and
//! series metadata come from the first header file of the first (or each)
//! series directory.

use crate::error::Result;
use crate::extraction::tags::{
    get_int_value, get_string_value, ACQUISITION_DATE, ACQUISITION_TIME, MODALITY, PATIENT_ID,
    PATIENT_NAME, SERIES_DESCRIPTION, SERIES_NUMBER, STUDY_DESCRIPTION, STUDY_ID,
};
use crate::header::HeaderReader;
use crate::types::{normalize_dicom_date, ExamRecord, SeriesIndex, SeriesRecord, EXAM_TREE_DIR};
use dicom_core::Tag;
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Patient directory name prefix
pub const PATIENT_DIR_PREFIX: &str = "p";
/// Exam directory name prefix
pub const EXAM_DIR_PREFIX: &str = "e";
/// Series directory name prefix
pub const SERIES_DIR_PREFIX: &str = "s";

/// An exam record together with the directory it was found in
#[derive(Debug, Clone)]
pub struct DiscoveredExam {
    pub exam: ExamRecord,
    pub path: PathBuf,
}

/// Lists subdirectories whose name starts with `prefix`, sorted by name
pub fn subdirectories(dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() && dir_name(&path).starts_with(prefix) {
            dirs.push(path);
        }
    }

    dirs.sort();
    Ok(dirs)
}

/// Lists the header files of a series directory, sorted by name
pub fn header_files(series_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(series_dir)? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Discovers all exams below `<root>/PESI`
///
/// Exams without series or header files are skipped, as are exams whose
/// first header cannot be read. The result is sorted by StudyID, with
/// exams lacking one at the end.
pub fn discover_exams<R: HeaderReader + ?Sized>(
    root: &Path,
    reader: &R,
    extra_tags: &[(String, Tag)],
) -> Result<Vec<DiscoveredExam>> {
    let tree = root.join(EXAM_TREE_DIR);
    let mut exams = Vec::new();

    for patient_dir in subdirectories(&tree, PATIENT_DIR_PREFIX)? {
        for exam_dir in subdirectories(&patient_dir, EXAM_DIR_PREFIX)? {
            let Some(first_header) = first_exam_header(&exam_dir)? else {
                debug!("No header files in {}", exam_dir.display());
                continue;
            };

            match read_exam_record(reader, &first_header, extra_tags) {
                Ok(mut exam) => {
                    exam.patient_dir = dir_name(&patient_dir);
                    exam.exam_dir = dir_name(&exam_dir);
                    info!("Found {}", exam);
                    exams.push(DiscoveredExam {
                        exam,
                        path: exam_dir,
                    });
                }
                Err(e) => warn!("Skipping exam {}: {}", exam_dir.display(), e),
            }
        }
    }

    exams.sort_by(|a, b| {
        let key = |e: &DiscoveredExam| {
            (
                e.exam.study_id.is_none(),
                e.exam.study_id,
                e.exam.patient_dir.clone(),
                e.exam.exam_dir.clone(),
            )
        };
        key(a).cmp(&key(b))
    });

    Ok(exams)
}

/// Reads the exam-level tags of one header
///
/// Directory names are left empty for the caller to fill in.
pub fn read_exam_record<R: HeaderReader + ?Sized>(
    reader: &R,
    header_file: &Path,
    extra_tags: &[(String, Tag)],
) -> Result<ExamRecord> {
    let dcm = reader.read_header(header_file)?;

    Ok(ExamRecord {
        study_id: get_int_value(&dcm, STUDY_ID),
        patient_id: get_string_value(&dcm, PATIENT_ID),
        patient_name: get_string_value(&dcm, PATIENT_NAME),
        acquisition_date: get_string_value(&dcm, ACQUISITION_DATE)
            .map(|d| normalize_dicom_date(&d)),
        study_description: get_string_value(&dcm, STUDY_DESCRIPTION),
        extra: extra_tags
            .iter()
            .map(|(keyword, tag)| (keyword.clone(), get_string_value(&dcm, *tag)))
            .collect(),
        patient_dir: String::new(),
        exam_dir: String::new(),
    })
}

/// Discovers the series of one exam directory, in directory-name order
///
/// Empty series directories are skipped. Series whose first header is
/// unreadable or has no SeriesNumber are skipped with a warning.
pub fn discover_series<R: HeaderReader + ?Sized>(
    exam_dir: &Path,
    reader: &R,
) -> Result<SeriesIndex> {
    let mut series = Vec::new();

    for series_dir in subdirectories(exam_dir, SERIES_DIR_PREFIX)? {
        let files = header_files(&series_dir)?;
        let Some(first) = files.first() else {
            debug!("No header files in {}", series_dir.display());
            continue;
        };

        match read_series_record(reader, first, dir_name(&series_dir), files.len()) {
            Ok(Some(record)) => {
                debug!("Found series {}", record);
                series.push(record);
            }
            Ok(None) => warn!(
                "Skipping series {}: no SeriesNumber in {}",
                series_dir.display(),
                first.display()
            ),
            Err(e) => warn!("Skipping series {}: {}", series_dir.display(), e),
        }
    }

    Ok(SeriesIndex::new(series))
}

/// Reads the series-level tags of one header
///
/// Returns `None` if the header has no SeriesNumber.
pub fn read_series_record<R: HeaderReader + ?Sized>(
    reader: &R,
    header_file: &Path,
    directory_name: String,
    file_count: usize,
) -> Result<Option<SeriesRecord>> {
    let dcm = reader.read_header(header_file)?;

    Ok(get_int_value(&dcm, SERIES_NUMBER).map(|series_number| SeriesRecord {
        series_number,
        description: get_string_value(&dcm, SERIES_DESCRIPTION).unwrap_or_default(),
        modality: get_string_value(&dcm, MODALITY).unwrap_or_default(),
        directory_name,
        file_count,
        acquisition_time: get_string_value(&dcm, ACQUISITION_TIME),
    }))
}

fn first_exam_header(exam_dir: &Path) -> Result<Option<PathBuf>> {
    match subdirectories(exam_dir, SERIES_DIR_PREFIX)?.into_iter().next() {
        Some(first_series) => Ok(header_files(&first_series)?.into_iter().next()),
        None => Ok(None),
    }
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::InMemoryHeaderReader;
    use crate::types::LISTMODE_MODALITY;
    use dicom_core::{DataElement, PrimitiveValue, VR};
    use dicom_object::InMemDicomObject;
    use tempfile::TempDir;

    fn put_str(dcm: &mut InMemDicomObject, tag: Tag, vr: VR, value: &str) {
        dcm.put(DataElement::new(tag, vr, PrimitiveValue::from(value)));
    }

    fn header(study_id: &str, series_number: &str, modality: &str) -> InMemDicomObject {
        let mut dcm = InMemDicomObject::new_empty();
        put_str(&mut dcm, STUDY_ID, VR::SH, study_id);
        put_str(&mut dcm, PATIENT_ID, VR::LO, "PAT01");
        put_str(&mut dcm, PATIENT_NAME, VR::PN, "Doe^Jane");
        put_str(&mut dcm, ACQUISITION_DATE, VR::DA, "20210714");
        put_str(&mut dcm, STUDY_DESCRIPTION, VR::LO, "PET/MR WB");
        put_str(&mut dcm, SERIES_NUMBER, VR::IS, series_number);
        put_str(&mut dcm, MODALITY, VR::CS, modality);
        put_str(&mut dcm, SERIES_DESCRIPTION, VR::LO, "series");
        dcm
    }

    /// Creates `<root>/PESI/<patient>/<exam>/<series>/<file>` for each header
    fn build_tree(
        root: &Path,
        reader: &mut InMemoryHeaderReader,
        files: &[(&str, Option<InMemDicomObject>)],
    ) {
        for (relative, dcm) in files {
            let path = root.join(EXAM_TREE_DIR).join(relative);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, b"").unwrap();
            if let Some(dcm) = dcm {
                reader.insert(path, dcm.clone());
            }
        }
    }

    #[test]
    fn test_discover_exams_sorted_by_study_id() {
        let temp_dir = TempDir::new().unwrap();
        let mut reader = InMemoryHeaderReader::new();
        build_tree(
            temp_dir.path(),
            &mut reader,
            &[
                ("p1/e10/s1/1.dcm", Some(header("1402", "1", "MR"))),
                ("p2/e20/s1/1.dcm", Some(header("87", "1", "MR"))),
                ("p2/e21/s1/1.dcm", Some(header("", "1", "MR"))),
            ],
        );

        let exams = discover_exams(temp_dir.path(), &reader, &[]).unwrap();

        let ids: Vec<_> = exams.iter().map(|e| e.exam.study_id).collect();
        assert_eq!(ids, vec![Some(87), Some(1402), None]);
        assert_eq!(exams[0].exam.patient_dir, "p2");
        assert_eq!(exams[0].exam.exam_dir, "e20");
        assert_eq!(exams[0].path, temp_dir.path().join("PESI/p2/e20"));
        assert_eq!(exams[0].exam.acquisition_date.as_deref(), Some("2021-07-14"));
        assert_eq!(exams[0].exam.patient_name.as_deref(), Some("Doe^Jane"));
    }

    #[test]
    fn test_discover_exams_skips_empty_and_unreadable() {
        let temp_dir = TempDir::new().unwrap();
        let mut reader = InMemoryHeaderReader::new();
        build_tree(
            temp_dir.path(),
            &mut reader,
            &[
                ("p1/e10/s1/1.dcm", Some(header("10", "1", "MR"))),
                ("p1/e11/s1/1.dcm", None),
            ],
        );
        fs::create_dir_all(temp_dir.path().join("PESI/p1/e12")).unwrap();
        fs::create_dir_all(temp_dir.path().join("PESI/p1/e13/s1")).unwrap();
        fs::create_dir_all(temp_dir.path().join("PESI/x1/e14/s1")).unwrap();

        let exams = discover_exams(temp_dir.path(), &reader, &[]).unwrap();

        assert_eq!(exams.len(), 1);
        assert_eq!(exams[0].exam.exam_dir, "e10");
    }

    #[test]
    fn test_discover_exams_reads_extra_tags() {
        let temp_dir = TempDir::new().unwrap();
        let mut reader = InMemoryHeaderReader::new();
        let mut dcm = header("10", "1", "MR");
        put_str(&mut dcm, Tag(0x0008, 0x0080), VR::LO, "UZ Leuven");
        build_tree(temp_dir.path(), &mut reader, &[("p1/e10/s1/1.dcm", Some(dcm))]);

        let extra = vec![
            ("InstitutionName".to_string(), Tag(0x0008, 0x0080)),
            ("StudyDate".to_string(), Tag(0x0008, 0x0020)),
        ];
        let exams = discover_exams(temp_dir.path(), &reader, &extra).unwrap();

        let exam = &exams[0].exam;
        assert_eq!(
            exam.extra.get("InstitutionName"),
            Some(&Some("UZ Leuven".to_string()))
        );
        assert_eq!(exam.extra.get("StudyDate"), Some(&None));
    }

    #[test]
    fn test_discover_exams_missing_tree_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let reader = InMemoryHeaderReader::new();
        assert!(discover_exams(temp_dir.path(), &reader, &[]).is_err());
    }

    #[test]
    fn test_discover_series() {
        let temp_dir = TempDir::new().unwrap();
        let mut reader = InMemoryHeaderReader::new();
        let mut no_number = header("10", "1", "MR");
        no_number.remove_element(SERIES_NUMBER);
        build_tree(
            temp_dir.path(),
            &mut reader,
            &[
                ("p1/e10/s3/1.dcm", Some(header("10", "3", "MR"))),
                ("p1/e10/s3/2.dcm", Some(header("10", "3", "MR"))),
                ("p1/e10/s1000/1.dcm", Some(header("10", "1000", LISTMODE_MODALITY))),
                ("p1/e10/s5/1.dcm", Some(no_number)),
                ("p1/e10/s6/1.dcm", None),
            ],
        );
        fs::create_dir_all(temp_dir.path().join("PESI/p1/e10/s9")).unwrap();

        let index = discover_series(&temp_dir.path().join("PESI/p1/e10"), &reader).unwrap();

        let dirs: Vec<_> = index.iter().map(|s| s.directory_name.as_str()).collect();
        assert_eq!(dirs, vec!["s1000", "s3"]);
        assert_eq!(index.get(3).unwrap().file_count, 2);
        assert_eq!(index.listmode_series(LISTMODE_MODALITY).count(), 1);
    }

    #[test]
    fn test_header_files_sorted() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["3.dcm", "1.dcm", "2.dcm"] {
            fs::write(temp_dir.path().join(name), b"").unwrap();
        }
        fs::create_dir(temp_dir.path().join("nested")).unwrap();

        let files = header_files(temp_dir.path()).unwrap();

        let names: Vec<_> = files.iter().map(|p| dir_name(p)).collect();
        assert_eq!(names, vec!["1.dcm", "2.dcm", "3.dcm"]);
    }
}
