use crate::{DateSpec, PanchangReport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchPanchang { date: DateSpec },
    ExportWorkbook { report: Box<PanchangReport> },
}
