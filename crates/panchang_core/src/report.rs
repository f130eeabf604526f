use serde::{Deserialize, Serialize};

use crate::DateSpec;

pub const INAUSPICIOUS_TIMINGS_HEADING: &str = "Inauspicious Timings";
pub const CHOGHADIYA_DAY_HEADING: &str = "Choghadiya (Day)";
pub const SUMMARY_COLUMNS: [&str; 2] = ["Category", "Details"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryEntry {
    pub category: String,
    pub details: String,
}

/// Labeled summary values in document order, unique by category.
///
/// Inserting a category that is already present replaces its details but
/// keeps the position of the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Summary {
    entries: Vec<SummaryEntry>,
}

impl Summary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when an existing category was overwritten.
    pub fn insert(&mut self, category: impl Into<String>, details: impl Into<String>) -> bool {
        let category = category.into();
        let details = details.into();
        if let Some(existing) = self.entries.iter_mut().find(|e| e.category == category) {
            existing.details = details;
            return true;
        }
        self.entries.push(SummaryEntry { category, details });
        false
    }

    pub fn get(&self, category: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.category == category)
            .map(|e| e.details.as_str())
    }

    pub fn entries(&self) -> &[SummaryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Two-column table view (`Category`, `Details`).
    pub fn to_table(&self, label: impl Into<String>) -> NamedTable {
        let mut table = NamedTable::new(label, SUMMARY_COLUMNS.iter().map(|c| c.to_string()).collect());
        for entry in &self.entries {
            table.push_row(vec![entry.category.clone(), entry.details.clone()]);
        }
        table
    }
}

/// How a row was fitted to the header arity by [`NamedTable::push_row`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowFit {
    Exact,
    Padded { missing: usize },
    Truncated { extra: usize },
    Skipped,
}

/// A heading label plus a header row and data rows.
///
/// When headers are present every stored row has exactly one cell per header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedTable {
    label: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl NamedTable {
    /// Table for an absent section: no headers, no rows.
    pub fn empty(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            headers: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn new(label: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            label: label.into(),
            headers,
            rows: Vec::new(),
        }
    }

    /// Stores a data row. Rows without cells are dropped; with headers
    /// present, short rows are padded with empty cells and long rows are
    /// truncated. Header-less tables keep rows as given.
    pub fn push_row(&mut self, mut cells: Vec<String>) -> RowFit {
        if cells.is_empty() {
            return RowFit::Skipped;
        }
        let width = self.headers.len();
        let fit = if width == 0 || cells.len() == width {
            RowFit::Exact
        } else if cells.len() < width {
            let missing = width - cells.len();
            cells.resize(width, String::new());
            RowFit::Padded { missing }
        } else {
            let extra = cells.len() - width;
            cells.truncate(width);
            RowFit::Truncated { extra }
        };
        self.rows.push(cells);
        fit
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.rows.is_empty()
    }
}

/// Everything extracted for one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanchangReport {
    pub date: DateSpec,
    /// The date as sent to the remote endpoint (`DD/MM/YYYY`).
    pub formatted_date: String,
    pub summary: Summary,
    pub inauspicious_timings: NamedTable,
    pub choghadiya_day: NamedTable,
}

impl PanchangReport {
    /// An empty report shell for `date`, filled in by the extractors.
    pub fn new(date: DateSpec) -> Self {
        Self {
            date,
            formatted_date: date.query_format(),
            summary: Summary::new(),
            inauspicious_timings: NamedTable::empty(INAUSPICIOUS_TIMINGS_HEADING),
            choghadiya_day: NamedTable::empty(CHOGHADIYA_DAY_HEADING),
        }
    }

    /// True when all three sections were found.
    pub fn is_complete(&self) -> bool {
        !self.summary.is_empty()
            && !self.inauspicious_timings.is_empty()
            && !self.choghadiya_day.is_empty()
    }
}
