//! Panchang core: domain types, text cleanup and the pure session state machine.
mod date;
mod effect;
mod msg;
mod report;
mod state;
mod text;
mod update;
mod view_model;

pub use date::DateSpec;
pub use effect::Effect;
pub use msg::Msg;
pub use report::{
    NamedTable, PanchangReport, RowFit, Summary, SummaryEntry, CHOGHADIYA_DAY_HEADING,
    INAUSPICIOUS_TIMINGS_HEADING, SUMMARY_COLUMNS,
};
pub use state::{AppState, ExportOutcome, RequestStatus};
pub use text::normalize;
pub use update::update;
pub use view_model::{AppViewModel, Banner, TableView, SUMMARY_TITLE};
