use std::fmt;

/// Modality reported by placeholder series that stand in for listmode data
pub const LISTMODE_MODALITY: &str = "GEMS PET LST";

/// One discovered series of an exam
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct SeriesRecord {
    /// SeriesNumber, unique within the exam
    pub series_number: i32,

    /// SeriesDescription
    pub description: String,

    /// Modality
    pub modality: String,

    /// Name of the series directory (e.g. `s12`)
    pub directory_name: String,

    /// Number of files in the series directory
    pub file_count: usize,

    /// AcquisitionTime of the first header, if present
    pub acquisition_time: Option<String>,
}

impl SeriesRecord {
    /// Creates a new SeriesRecord without acquisition time
    pub fn new(
        series_number: i32,
        description: impl Into<String>,
        modality: impl Into<String>,
        directory_name: impl Into<String>,
        file_count: usize,
    ) -> Self {
        Self {
            series_number,
            description: description.into(),
            modality: modality.into(),
            directory_name: directory_name.into(),
            file_count,
            acquisition_time: None,
        }
    }

    /// Checks if this series is a placeholder for the given listmode modality
    pub fn is_listmode_placeholder(&self, listmode_modality: &str) -> bool {
        self.modality == listmode_modality
    }
}

impl fmt::Display for SeriesRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) {} [{}]",
            self.series_number, self.modality, self.description, self.directory_name
        )
    }
}

/// Ordered collection of the series discovered for one exam
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(transparent))]
pub struct SeriesIndex {
    series: Vec<SeriesRecord>,
}

impl SeriesIndex {
    /// Creates an index preserving the given order
    pub fn new(series: Vec<SeriesRecord>) -> Self {
        Self { series }
    }

    /// Checks whether a series with this number was discovered
    pub fn contains_series_number(&self, series_number: i32) -> bool {
        self.series.iter().any(|s| s.series_number == series_number)
    }

    /// Looks up a series by number
    pub fn get(&self, series_number: i32) -> Option<&SeriesRecord> {
        self.series.iter().find(|s| s.series_number == series_number)
    }

    /// Placeholder series of the given listmode modality, in index order
    pub fn listmode_series<'a>(
        &'a self,
        listmode_modality: &'a str,
    ) -> impl Iterator<Item = &'a SeriesRecord> + 'a {
        self.series
            .iter()
            .filter(move |s| s.is_listmode_placeholder(listmode_modality))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SeriesRecord> {
        self.series.iter()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl FromIterator<SeriesRecord> for SeriesIndex {
    fn from_iter<T: IntoIterator<Item = SeriesRecord>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a SeriesIndex {
    type Item = &'a SeriesRecord;
    type IntoIter = std::slice::Iter<'a, SeriesRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_index() -> SeriesIndex {
        vec![
            SeriesRecord::new(3, "MRAC PET WB", "MR", "s3", 120),
            SeriesRecord::new(1000, "LIST MODE", LISTMODE_MODALITY, "s1000", 3),
            SeriesRecord::new(7, "PET WB", "PT", "s7", 400),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_contains_series_number() {
        let index = make_index();
        assert!(index.contains_series_number(3));
        assert!(index.contains_series_number(1000));
        assert!(!index.contains_series_number(4));
    }

    #[test]
    fn test_get() {
        let index = make_index();
        assert_eq!(index.get(7).map(|s| s.directory_name.as_str()), Some("s7"));
        assert!(index.get(8).is_none());
    }

    #[test]
    fn test_listmode_series() {
        let index = make_index();
        let listmode: Vec<_> = index.listmode_series(LISTMODE_MODALITY).collect();
        assert_eq!(listmode.len(), 1);
        assert_eq!(listmode[0].series_number, 1000);
    }

    #[test]
    fn test_preserves_order() {
        let index = make_index();
        let numbers: Vec<i32> = index.iter().map(|s| s.series_number).collect();
        assert_eq!(numbers, vec![3, 1000, 7]);
        assert_eq!(index.len(), 3);
        assert!(!index.is_empty());
    }
}
