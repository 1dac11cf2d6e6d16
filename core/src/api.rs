use crate::error::Result;
use crate::header::HeaderReader;
use crate::inventory::{discover_exams, discover_series, header_files, DiscoveredExam};
use crate::listmode::ListmodeClassifier;
use crate::types::{ExamRecord, InventoryConfig, ListmodeEntry, SeriesIndex};
use log::{error, info, warn};
use rayon::prelude::*;
use std::path::Path;

/// Inventory of one exam: its series and its listmode classification
///
/// # Example
///
/// ```
/// use sdmscan_core::{ExamInventory, ExamRecord, ListmodeEntry, SeriesIndex};
///
/// let inventory = ExamInventory {
///     exam: ExamRecord::default(),
///     series: SeriesIndex::default(),
///     listmode: vec![ListmodeEntry::weight_count_correction("s1000", "LIST MODE", "3.dcm")],
/// };
///
/// assert!(inventory.listmode_complete());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct ExamInventory {
    pub exam: ExamRecord,
    pub series: SeriesIndex,
    pub listmode: Vec<ListmodeEntry>,
}

impl ExamInventory {
    /// Discovers the series of an exam and classifies its listmode headers
    ///
    /// # Errors
    ///
    /// Returns an error if the exam or one of its listmode series
    /// directories cannot be listed
    pub fn collect<R: HeaderReader + ?Sized>(
        exam: ExamRecord,
        exam_path: &Path,
        reader: &R,
        listmode_modality: &str,
    ) -> Result<Self> {
        let series = discover_series(exam_path, reader)?;
        let classifier = ListmodeClassifier::new(reader);

        let mut listmode = Vec::new();
        for placeholder in series.listmode_series(listmode_modality) {
            let files = header_files(&exam_path.join(&placeholder.directory_name))?;
            listmode.extend(classifier.classify(placeholder, &files, &series));
        }

        let inventory = Self {
            exam,
            series,
            listmode,
        };
        if !inventory.listmode_complete() {
            warn!("{}: listmode data incomplete", inventory.exam);
        }
        Ok(inventory)
    }

    /// Whether every listmode entry is classified and complete
    ///
    /// See [`ListmodeEntry::is_complete`].
    pub fn listmode_complete(&self) -> bool {
        self.listmode.iter().all(ListmodeEntry::is_complete)
    }

    /// Listmode entries that are not complete
    pub fn incomplete_listmode(&self) -> impl Iterator<Item = &ListmodeEntry> {
        self.listmode.iter().filter(|e| !e.is_complete())
    }
}

/// Inventories every exam below the configured scan root
///
/// Exams are processed in parallel; the result keeps the discovery order
/// (by StudyID). An exam that fails is logged and left out.
///
/// # Errors
///
/// Returns an error if the scan root is missing, an extra tag keyword is
/// unknown, or the exam tree cannot be listed
pub fn inventory_archive<R: HeaderReader + ?Sized>(
    config: &InventoryConfig,
    reader: &R,
) -> Result<Vec<ExamInventory>> {
    let extra_tags = config.resolve_extra_exam_tags()?;
    let root = config.validate_scan_root()?;
    info!("Scanning {}", root.display());

    let exams = discover_exams(&root, reader, &extra_tags)?;
    info!("Found {} exams", exams.len());

    let inventories = exams
        .into_par_iter()
        .filter_map(|DiscoveredExam { exam, path }| {
            let label = exam.to_string();
            match ExamInventory::collect(exam, &path, reader, &config.listmode_modality) {
                Ok(inventory) => {
                    info!(
                        "{}: {} series, {} listmode entries",
                        label,
                        inventory.series.len(),
                        inventory.listmode.len()
                    );
                    Some(inventory)
                }
                Err(e) => {
                    error!("{}: {}", label, e);
                    None
                }
            }
        })
        .collect();

    Ok(inventories)
}
