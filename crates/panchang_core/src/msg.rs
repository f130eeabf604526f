use std::path::PathBuf;

use crate::{DateSpec, PanchangReport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked a date.
    DateSelected(DateSpec),
    /// User asked for the Panchang of the selected date.
    FetchClicked,
    /// Engine finished a fetch; the error is the user-facing message.
    FetchCompleted(Result<PanchangReport, String>),
    /// User asked for a spreadsheet of the current report.
    ExportClicked,
    /// Export finished.
    ExportCompleted(Result<PathBuf, String>),
}
