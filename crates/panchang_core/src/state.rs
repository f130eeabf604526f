use std::path::PathBuf;

use crate::view_model::AppViewModel;
use crate::{DateSpec, PanchangReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestStatus {
    #[default]
    Idle,
    Fetching,
    Ready,
    Failed,
}

pub type ExportOutcome = Result<PathBuf, String>;

/// Request-scoped session state owned by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    selected_date: Option<DateSpec>,
    status: RequestStatus,
    report: Option<PanchangReport>,
    error: Option<String>,
    export: Option<ExportOutcome>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_date(&self) -> Option<DateSpec> {
        self.selected_date
    }

    pub fn status(&self) -> RequestStatus {
        self.status
    }

    pub fn report(&self) -> Option<&PanchangReport> {
        self.report.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn export(&self) -> Option<&ExportOutcome> {
        self.export.as_ref()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel::from_state(self)
    }

    pub(crate) fn select_date(&mut self, date: DateSpec) {
        self.selected_date = Some(date);
    }

    pub(crate) fn begin_fetch(&mut self) {
        self.status = RequestStatus::Fetching;
        self.export = None;
    }

    pub(crate) fn finish_fetch(&mut self, result: Result<PanchangReport, String>) {
        match result {
            Ok(report) => {
                self.status = RequestStatus::Ready;
                self.report = Some(report);
                self.error = None;
            }
            Err(message) => {
                self.status = RequestStatus::Failed;
                self.report = None;
                self.error = Some(message);
            }
        }
    }

    pub(crate) fn finish_export(&mut self, outcome: ExportOutcome) {
        self.export = Some(outcome);
    }
}
