use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Directory holding the patient/exam tree below a scan-data root
pub const EXAM_TREE_DIR: &str = "PESI";

/// Exam-level metadata read from the first header of an exam
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct ExamRecord {
    /// StudyID as an integer
    pub study_id: Option<i32>,

    pub patient_id: Option<String>,

    pub patient_name: Option<String>,

    /// AcquisitionDate, formatted `YYYY-MM-DD` when it is a DICOM date
    pub acquisition_date: Option<String>,

    pub study_description: Option<String>,

    /// Extra tags requested by keyword
    pub extra: BTreeMap<String, Option<String>>,

    /// Patient directory name (e.g. `p3`)
    pub patient_dir: String,

    /// Exam directory name (e.g. `e1402`)
    pub exam_dir: String,
}

impl ExamRecord {
    /// Path of the exam directory relative to the scan-data root
    pub fn relative_path(&self) -> PathBuf {
        [EXAM_TREE_DIR, &self.patient_dir, &self.exam_dir]
            .iter()
            .collect()
    }

    /// Name used for this exam's report sheets
    ///
    /// The StudyID when known, otherwise the exam directory name.
    pub fn sheet_name(&self) -> String {
        match self.study_id {
            Some(id) => id.to_string(),
            None => self.exam_dir.clone(),
        }
    }
}

impl fmt::Display for ExamRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "exam {} ({}/{})",
            self.sheet_name(),
            self.patient_dir,
            self.exam_dir
        )
    }
}

/// Formats an 8-digit DICOM date (`YYYYMMDD`) as `YYYY-MM-DD`
///
/// Values in any other shape are returned trimmed but otherwise untouched.
pub fn normalize_dicom_date(s: &str) -> String {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    let re = REGEX.get_or_init(|| {
        Regex::new(r"^(\d{4})\.?(\d{2})\.?(\d{2})$").expect("Failed to compile regex")
    });

    let s = s.trim();
    match re.captures(s) {
        Some(caps) => format!("{}-{}-{}", &caps[1], &caps[2], &caps[3]),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("20210714", "2021-07-14")]
    #[case("2021.07.14", "2021-07-14")]
    #[case(" 20210714 ", "2021-07-14")]
    #[case("2021-07-14", "2021-07-14")]
    #[case("unknown", "unknown")]
    fn test_normalize_dicom_date(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_dicom_date(input), expected);
    }

    #[test]
    fn test_sheet_name() {
        let mut exam = ExamRecord {
            patient_dir: "p3".to_string(),
            exam_dir: "e1402".to_string(),
            ..Default::default()
        };
        assert_eq!(exam.sheet_name(), "e1402");

        exam.study_id = Some(1402);
        assert_eq!(exam.sheet_name(), "1402");
    }

    #[test]
    fn test_relative_path() {
        let exam = ExamRecord {
            patient_dir: "p3".to_string(),
            exam_dir: "e1402".to_string(),
            ..Default::default()
        };
        assert_eq!(exam.relative_path(), PathBuf::from("PESI/p3/e1402"));
    }
}
