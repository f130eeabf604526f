use panchang_core::{Effect, Msg};
use panchang_engine::{export_workbook, ExportSettings, PanchangEngine};
use panchang_logging::{panchang_info, panchang_warn};

/// Executes effects synchronously and turns their outcome into messages.
pub struct EffectRunner {
    engine: PanchangEngine,
    export: ExportSettings,
}

impl EffectRunner {
    pub fn new(engine: PanchangEngine, export: ExportSettings) -> Self {
        Self { engine, export }
    }

    pub fn run(&self, effect: Effect) -> Msg {
        match effect {
            Effect::FetchPanchang { date } => {
                panchang_info!("FetchPanchang date={}", date);
                let result = self.engine.fetch(date).map_err(|err| {
                    panchang_warn!("Fetch for {} failed: {}", date, err.kind);
                    err.to_string()
                });
                Msg::FetchCompleted(result)
            }
            Effect::ExportWorkbook { report } => {
                let outcome = export_workbook(&report, &self.export).map_err(|err| {
                    panchang_warn!("Export failed: {}", err);
                    format!("Failed to export spreadsheet: {err}")
                });
                Msg::ExportCompleted(outcome)
            }
        }
    }
}
