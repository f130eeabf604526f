use crate::{AppState, RequestStatus, CHOGHADIYA_DAY_HEADING, INAUSPICIOUS_TIMINGS_HEADING};

pub const SUMMARY_TITLE: &str = "Panchang Summary";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    Success(String),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub selected_date: Option<String>,
    pub status: RequestStatus,
    pub banner: Option<Banner>,
    /// Summary, Inauspicious Timings and Choghadiya (Day), in that order.
    pub tables: Vec<TableView>,
    pub export_note: Option<Banner>,
    pub can_export: bool,
}

impl AppViewModel {
    pub(crate) fn from_state(state: &AppState) -> Self {
        let banner = match (state.status(), state.report(), state.error()) {
            (RequestStatus::Ready, Some(report), _) => Some(Banner::Success(format!(
                "Panchang for {}",
                report.date.long_format()
            ))),
            (RequestStatus::Failed, _, Some(message)) => Some(Banner::Error(message.to_string())),
            _ => None,
        };

        let tables: Vec<TableView> = state
            .report()
            .map(|report| {
                let summary = report.summary.to_table(SUMMARY_TITLE);
                [
                    (SUMMARY_TITLE, &summary),
                    (INAUSPICIOUS_TIMINGS_HEADING, &report.inauspicious_timings),
                    (CHOGHADIYA_DAY_HEADING, &report.choghadiya_day),
                ]
                .into_iter()
                .map(|(title, table)| TableView {
                    title: title.to_string(),
                    headers: table.headers().to_vec(),
                    rows: table.rows().to_vec(),
                })
                .collect()
            })
            .unwrap_or_default();

        let export_note = state.export().map(|outcome| match outcome {
            Ok(path) => Banner::Success(format!("Saved {}", path.display())),
            Err(message) => Banner::Error(message.clone()),
        });

        Self {
            selected_date: state.selected_date().map(|d| d.long_format()),
            status: state.status(),
            banner,
            tables,
            export_note,
            can_export: state.status() == RequestStatus::Ready,
        }
    }
}
