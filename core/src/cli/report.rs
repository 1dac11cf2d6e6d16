use crate::api::ExamInventory;
use crate::error::Result;
use crate::types::{ExamRecord, ListmodeEntry, SeriesIndex};
use log::{info, warn};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Name of the exam overview table
pub const EXAMS_TABLE: &str = "exams";

const SERIES_HEADER: [&str; 6] = [
    "SeriesNumber",
    "Modality",
    "SeriesDescription",
    "AcquisitionTime",
    "s_dir",
    "n_files",
];

const LISTMODE_HEADER: [&str; 9] = [
    "s_dir",
    "SeriesDescription",
    "dcm_file",
    "data_file",
    "type",
    "data_file_exists",
    "MRAC_complete",
    "MRAC_series_nums",
    "error",
];

/// Text report formatter for one exam inventory
pub struct TextReport<'a> {
    inventory: &'a ExamInventory,
}

impl<'a> TextReport<'a> {
    /// Creates a new text report
    pub fn new(inventory: &'a ExamInventory) -> Self {
        Self { inventory }
    }
}

impl<'a> fmt::Display for TextReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let exam = &self.inventory.exam;
        let title = format!("Exam {}", exam.sheet_name());

        writeln!(f, "{}", title)?;
        writeln!(f, "{}", "=".repeat(title.len()))?;
        writeln!(f, "Directory:    {}", exam.relative_path().display())?;
        writeln!(f, "Patient ID:   {}", exam.patient_id.as_deref().unwrap_or("unknown"))?;
        writeln!(f, "Patient Name: {}", exam.patient_name.as_deref().unwrap_or("unknown"))?;
        writeln!(
            f,
            "Acquired:     {}",
            exam.acquisition_date.as_deref().unwrap_or("unknown")
        )?;
        writeln!(
            f,
            "Description:  {}",
            exam.study_description.as_deref().unwrap_or("")
        )?;
        for (keyword, value) in &exam.extra {
            writeln!(f, "{}: {}", keyword, value.as_deref().unwrap_or(""))?;
        }
        writeln!(f)?;

        writeln!(f, "Series")?;
        writeln!(f, "------")?;
        for series in &self.inventory.series {
            writeln!(
                f,
                "{:>6}  {:<14} {:<40} {:>5} files  {}",
                series.series_number,
                series.modality,
                series.description,
                series.file_count,
                series.directory_name
            )?;
        }
        writeln!(f)?;

        writeln!(f, "Listmode")?;
        writeln!(f, "--------")?;
        if self.inventory.listmode.is_empty() {
            writeln!(f, "No listmode series")?;
        }
        for entry in &self.inventory.listmode {
            write!(
                f,
                "{}/{}  {:<26} ",
                entry.series_directory_name, entry.header_file_name, entry.category
            )?;
            match &entry.data_file_path {
                Some(path) => write!(
                    f,
                    "{} ({})",
                    path.display(),
                    if entry.data_file_exists { "found" } else { "MISSING" }
                )?,
                None => write!(f, "-")?,
            }
            if let Some(mrac) = &entry.mrac {
                write!(
                    f,
                    "  MRAC [{}] {}",
                    join_numbers(&mrac.series_numbers()),
                    if mrac.complete { "complete" } else { "INCOMPLETE" }
                )?;
            }
            if let Some(error) = &entry.error {
                write!(f, "  error: {}", error)?;
            }
            writeln!(f)?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "Listmode complete: {}",
            self.inventory.listmode_complete()
        )?;

        Ok(())
    }
}

/// Writes the exam overview table
pub fn write_exams_csv<W: io::Write>(writer: W, exams: &[&ExamRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let extra_keys: Vec<&String> = exams
        .first()
        .map(|e| e.extra.keys().collect())
        .unwrap_or_default();

    let mut header = vec![
        "StudyID",
        "PatientID",
        "PatientName",
        "AcquisitionDate",
        "StudyDescription",
    ];
    header.extend(extra_keys.iter().map(|k| k.as_str()));
    header.extend(["p_dir", "e_dir"]);
    wtr.write_record(&header)?;

    for exam in exams {
        let mut record = vec![
            exam.study_id.map(|id| id.to_string()).unwrap_or_default(),
            exam.patient_id.clone().unwrap_or_default(),
            exam.patient_name.clone().unwrap_or_default(),
            exam.acquisition_date.clone().unwrap_or_default(),
            exam.study_description.clone().unwrap_or_default(),
        ];
        record.extend(
            extra_keys
                .iter()
                .map(|k| exam.extra.get(*k).cloned().flatten().unwrap_or_default()),
        );
        record.push(exam.patient_dir.clone());
        record.push(exam.exam_dir.clone());
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes the series table of one exam
pub fn write_series_csv<W: io::Write>(writer: W, series: &SeriesIndex) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(SERIES_HEADER)?;

    for s in series {
        wtr.write_record([
            s.series_number.to_string(),
            s.modality.clone(),
            s.description.clone(),
            s.acquisition_time.clone().unwrap_or_default(),
            s.directory_name.clone(),
            s.file_count.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes the listmode table of one exam
///
/// MRAC series numbers are joined with commas.
pub fn write_listmode_csv<W: io::Write>(writer: W, entries: &[ListmodeEntry]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(LISTMODE_HEADER)?;

    for entry in entries {
        wtr.write_record([
            entry.series_directory_name.clone(),
            entry.series_description.clone(),
            entry.header_file_name.clone(),
            entry
                .data_file_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            entry.category.to_string(),
            entry.data_file_exists.to_string(),
            entry
                .mrac_complete()
                .map(|c| c.to_string())
                .unwrap_or_default(),
            entry
                .mrac_series_numbers()
                .map(|n| join_numbers(&n))
                .unwrap_or_default(),
            entry.error.clone().unwrap_or_default(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes `exams.csv` plus a series and a listmode table per exam
///
/// Exams whose sheet name was already taken are written under
/// `<p_dir>_<e_dir>`, with a numeric suffix if that is taken too.
/// Returns the paths written.
pub fn write_csv_reports(
    inventories: &[ExamInventory],
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)?;
    let mut written = Vec::new();

    let exams_path = output_dir.join(format!("{}.csv", EXAMS_TABLE));
    let exams: Vec<&ExamRecord> = inventories.iter().map(|i| &i.exam).collect();
    write_exams_csv(fs::File::create(&exams_path)?, &exams)?;
    written.push(exams_path);

    let mut sheets = HashSet::new();
    for inventory in inventories {
        let sheet = unique_sheet_name(&inventory.exam, &mut sheets);

        let series_path = output_dir.join(format!("{}.csv", sheet));
        write_series_csv(fs::File::create(&series_path)?, &inventory.series)?;
        written.push(series_path);

        let listmode_path = output_dir.join(format!("{}_LM.csv", sheet));
        write_listmode_csv(fs::File::create(&listmode_path)?, &inventory.listmode)?;
        written.push(listmode_path);
    }

    info!("Wrote {} reports to {}", written.len(), output_dir.display());
    Ok(written)
}

fn unique_sheet_name(exam: &ExamRecord, taken: &mut HashSet<String>) -> String {
    let preferred = exam.sheet_name();
    if taken.insert(preferred.clone()) {
        return preferred;
    }

    let stem = format!("{}_{}", exam.patient_dir, exam.exam_dir);
    let mut sheet = stem.clone();
    let mut n = 2;
    while !taken.insert(sheet.clone()) {
        sheet = format!("{}_{}", stem, n);
        n += 1;
    }
    warn!(
        "{}: sheet name '{}' already used, writing as '{}'",
        exam, preferred, sheet
    );
    sheet
}

fn join_numbers(numbers: &[i32]) -> String {
    numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
