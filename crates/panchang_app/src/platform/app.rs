use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Local;
use clap::Parser;
use panchang_core::{update, AppState, DateSpec, Msg, RequestStatus};
use panchang_engine::PanchangEngine;
use panchang_logging::{panchang_error, panchang_info};

use super::config;
use super::effects::EffectRunner;
use super::logging::{self, LogDestination};
use super::render::render_view;

/// Fetch the daily Panchang for a date and show it as tables.
#[derive(Debug, Parser)]
#[command(name = "panchang", version)]
struct Cli {
    /// Date to fetch (YYYY-MM-DD); defaults to today.
    #[arg(long, value_name = "YYYY-MM-DD")]
    date: Option<DateSpec>,

    /// Also write the report as an .xlsx workbook.
    #[arg(long)]
    export: bool,

    /// Directory for the exported workbook (overrides the config file).
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Print the report as JSON instead of tables.
    #[arg(long)]
    json: bool,

    /// RON config file; defaults to ./panchang.ron when present.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LogDestination::Terminal)]
    log: LogDestination,

    /// Skip the connectivity probe before fetching.
    #[arg(long)]
    no_probe: bool,
}

pub fn run_app() -> ExitCode {
    let cli = Cli::parse();
    logging::initialize(cli.log, panchang_logging::default_level());

    let config = match config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            panchang_error!("{err}");
            eprintln!("{err}");
            return ExitCode::from(2);
        }
    };

    let mut fetch_settings = config.fetch_settings();
    if cli.no_probe {
        fetch_settings.probe.enabled = false;
    }
    let mut export_settings = config.export_settings();
    if let Some(dir) = cli.output_dir.clone() {
        export_settings.output_dir = dir;
    }

    let engine = match PanchangEngine::new(fetch_settings) {
        Ok(engine) => engine,
        Err(err) => {
            panchang_error!("Failed to start engine: {err}");
            eprintln!("Failed to start engine: {err}");
            return ExitCode::FAILURE;
        }
    };
    let runner = EffectRunner::new(engine, export_settings);

    let date = cli
        .date
        .unwrap_or_else(|| DateSpec::from(Local::now().date_naive()));
    panchang_info!("Requesting Panchang for {}", date);

    let mut inputs = vec![Msg::DateSelected(date), Msg::FetchClicked];
    if cli.export {
        inputs.push(Msg::ExportClicked);
    }

    let mut state = AppState::new();
    for msg in inputs {
        state = dispatch(state, msg, &runner);
    }

    if cli.json {
        print_json(&state);
    } else {
        print!("{}", render_view(&state.view()));
    }

    match (state.status(), state.export()) {
        (RequestStatus::Failed, _) | (_, Some(Err(_))) => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    }
}

/// Apply `msg`, then run every resulting effect to completion and feed its
/// outcome back before returning.
fn dispatch(state: AppState, msg: Msg, runner: &EffectRunner) -> AppState {
    let (mut state, effects) = update(state, msg);
    for effect in effects {
        let outcome = runner.run(effect);
        state = dispatch(state, outcome, runner);
    }
    state
}

fn print_json(state: &AppState) {
    let value = match (state.report(), state.error()) {
        (Some(report), _) => serde_json::to_value(report),
        (None, error) => Ok(serde_json::json!({ "error": error.unwrap_or("no report") })),
    };
    match value.and_then(|value| serde_json::to_string_pretty(&value)) {
        Ok(text) => println!("{text}"),
        Err(err) => eprintln!("Failed to serialize report: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panchang_core::Banner;
    use panchang_engine::{ExportSettings, FetchError, Fetcher, RawDocument};
    use tempfile::TempDir;

    const PAGE: &str = r#"<div id="dpTable"><p><strong>Sunrise:</strong> 06:12 AM</p></div>
        <h2>Choghadiya (Day)</h2>
        <table><tr><th>Start</th><th>End</th><th>Name</th></tr>
        <tr><td>06:12 AM</td><td>07:30 AM</td><td>Shubha</td></tr></table>"#;

    struct PageFetcher(Option<&'static str>);

    #[async_trait::async_trait]
    impl Fetcher for PageFetcher {
        async fn fetch_page(&self, _date: &DateSpec) -> Result<RawDocument, FetchError> {
            let html = self.0.ok_or_else(FetchError::no_connectivity)?;
            Ok(RawDocument {
                bytes: html.as_bytes().to_vec(),
                content_type: Some("text/html".to_string()),
                final_url: "http://panchang.test/".to_string(),
                attempts: 1,
            })
        }
    }

    fn runner(page: Option<&'static str>, temp: &TempDir) -> EffectRunner {
        let engine = PanchangEngine::with_fetcher(Box::new(PageFetcher(page))).unwrap();
        let export = ExportSettings {
            output_dir: temp.path().to_path_buf(),
            ..ExportSettings::default()
        };
        EffectRunner::new(engine, export)
    }

    fn run(runner: &EffectRunner, msgs: Vec<Msg>) -> AppState {
        msgs.into_iter()
            .fold(AppState::new(), |state, msg| dispatch(state, msg, runner))
    }

    #[test]
    fn fetch_then_export_writes_workbook() {
        let temp = TempDir::new().unwrap();
        let runner = runner(Some(PAGE), &temp);
        let date = DateSpec::from_ymd(2024, 1, 5).unwrap();

        let state = run(
            &runner,
            vec![Msg::DateSelected(date), Msg::FetchClicked, Msg::ExportClicked],
        );

        assert_eq!(state.status(), RequestStatus::Ready);
        let report = state.report().unwrap();
        assert_eq!(report.summary.get("Sunrise"), Some("06:12 AM"));
        assert_eq!(report.choghadiya_day.rows().len(), 1);
        assert!(temp.path().join("panchang_data.xlsx").is_file());

        let rendered = render_view(&state.view());
        assert!(rendered.starts_with("Panchang for 05 January 2024\n"));
        assert!(rendered.contains("== Inauspicious Timings ==\n(no data)\n"));
        assert!(rendered.contains("Saved "));
    }

    #[test]
    fn fetch_failure_skips_export() {
        let temp = TempDir::new().unwrap();
        let runner = runner(None, &temp);
        let date = DateSpec::from_ymd(2024, 1, 5).unwrap();

        let state = run(
            &runner,
            vec![Msg::DateSelected(date), Msg::FetchClicked, Msg::ExportClicked],
        );

        assert_eq!(state.status(), RequestStatus::Failed);
        assert_eq!(
            state.view().banner,
            Some(Banner::Error(
                "No internet connection. Please check your network.".to_string()
            ))
        );
        assert!(state.export().is_none());
        assert!(!temp.path().join("panchang_data.xlsx").exists());
    }
}
