use std::path::PathBuf;
use std::sync::Once;

use panchang_core::{
    update, AppState, Banner, DateSpec, Effect, Msg, NamedTable, PanchangReport, RequestStatus,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(panchang_logging::initialize_for_tests);
}

fn date() -> DateSpec {
    DateSpec::from_ymd(2024, 1, 5).unwrap()
}

fn sample_report() -> PanchangReport {
    let mut report = PanchangReport::new(date());
    report.summary.insert("Sunrise", "07:15 AM");
    let mut table = NamedTable::new(
        "Choghadiya (Day)",
        vec!["Start".into(), "End".into(), "Name".into()],
    );
    table.push_row(vec!["07:15 AM".into(), "08:33 AM".into(), "Chara".into()]);
    report.choghadiya_day = table;
    report
}

fn fetching_state() -> AppState {
    let (state, _) = update(AppState::new(), Msg::DateSelected(date()));
    let (state, _) = update(state, Msg::FetchClicked);
    state
}

#[test]
fn fetch_without_date_is_ignored() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::FetchClicked);
    assert!(effects.is_empty());
    assert_eq!(state.status(), RequestStatus::Idle);
    assert_eq!(state.selected_date(), None);
}

#[test]
fn fetch_emits_effect_for_selected_date() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::DateSelected(date()));
    assert_eq!(state.selected_date(), Some(date()));
    let (state, effects2) = update(state, Msg::FetchClicked);

    assert!(effects.is_empty());
    assert_eq!(effects2, vec![Effect::FetchPanchang { date: date() }]);
    assert_eq!(state.status(), RequestStatus::Fetching);
}

#[test]
fn second_click_while_fetching_is_ignored() {
    init_logging();
    let (state, effects) = update(fetching_state(), Msg::FetchClicked);
    assert!(effects.is_empty());
    assert_eq!(state.status(), RequestStatus::Fetching);
}

#[test]
fn successful_fetch_renders_banner_and_three_tables() {
    init_logging();
    let (state, effects) = update(fetching_state(), Msg::FetchCompleted(Ok(sample_report())));
    assert!(effects.is_empty());

    let view = state.view();
    assert_eq!(view.status, RequestStatus::Ready);
    assert_eq!(
        view.banner,
        Some(Banner::Success("Panchang for 05 January 2024".to_string()))
    );
    let titles: Vec<_> = view.tables.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["Panchang Summary", "Inauspicious Timings", "Choghadiya (Day)"]
    );
    assert_eq!(view.tables[0].headers, vec!["Category", "Details"]);
    assert_eq!(view.tables[0].rows, vec![vec!["Sunrise", "07:15 AM"]]);
    assert!(view.tables[1].headers.is_empty());
    assert_eq!(view.tables[2].rows.len(), 1);
    assert!(view.can_export);
}

#[test]
fn failed_fetch_drops_previous_report() {
    init_logging();
    let (state, _) = update(fetching_state(), Msg::FetchCompleted(Ok(sample_report())));
    let (state, _) = update(state, Msg::FetchClicked);
    let message = "No internet connection. Please check your network.".to_string();
    let (state, _) = update(state, Msg::FetchCompleted(Err(message.clone())));

    assert!(state.report().is_none());
    let view = state.view();
    assert_eq!(view.banner, Some(Banner::Error(message)));
    assert!(view.tables.is_empty());
    assert!(!view.can_export);
}

#[test]
fn stale_completion_without_pending_fetch_is_ignored() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::FetchCompleted(Ok(sample_report())));
    assert_eq!(state.status(), RequestStatus::Idle);
    assert!(state.report().is_none());
}

#[test]
fn export_requires_a_report() {
    init_logging();
    let (state, effects) = update(fetching_state(), Msg::ExportClicked);
    assert!(effects.is_empty());

    let (state, _) = update(state, Msg::FetchCompleted(Ok(sample_report())));
    let (state, effects) = update(state, Msg::ExportClicked);
    assert_eq!(
        effects,
        vec![Effect::ExportWorkbook {
            report: Box::new(sample_report())
        }]
    );

    let path = PathBuf::from("out/panchang_data.xlsx");
    let (state, _) = update(state, Msg::ExportCompleted(Ok(path.clone())));
    assert_eq!(
        state.view().export_note,
        Some(Banner::Success(format!("Saved {}", path.display())))
    );
}

#[test]
fn new_fetch_clears_previous_export_note() {
    init_logging();
    let (state, _) = update(fetching_state(), Msg::FetchCompleted(Ok(sample_report())));
    let (state, _) = update(state, Msg::ExportCompleted(Err("disk full".into())));
    assert!(state.view().export_note.is_some());

    let (state, _) = update(state, Msg::FetchClicked);
    assert!(state.view().export_note.is_none());
}
