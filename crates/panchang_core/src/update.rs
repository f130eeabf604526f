use crate::{AppState, Effect, Msg, RequestStatus};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::DateSelected(date) => {
            state.select_date(date);
            Vec::new()
        }
        Msg::FetchClicked => match (state.selected_date(), state.status()) {
            // One request at a time; a second click while fetching is ignored.
            (_, RequestStatus::Fetching) | (None, _) => Vec::new(),
            (Some(date), _) => {
                state.begin_fetch();
                vec![Effect::FetchPanchang { date }]
            }
        },
        Msg::FetchCompleted(result) => {
            if state.status() == RequestStatus::Fetching {
                state.finish_fetch(result);
            }
            Vec::new()
        }
        Msg::ExportClicked => match state.report() {
            Some(report) if state.status() == RequestStatus::Ready => {
                vec![Effect::ExportWorkbook {
                    report: Box::new(report.clone()),
                }]
            }
            _ => Vec::new(),
        },
        Msg::ExportCompleted(outcome) => {
            state.finish_export(outcome);
            Vec::new()
        }
    };

    (state, effects)
}
