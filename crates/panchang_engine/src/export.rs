use std::path::PathBuf;

use panchang_core::{NamedTable, PanchangReport};
use panchang_logging::panchang_info;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use crate::persist::{AtomicFileWriter, PersistError};

/// Sheet order of the exported workbook.
pub const SHEET_NAMES: [&str; 3] = ["Summary", "Inauspicious Timings", "Choghadiya Day"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSettings {
    pub output_dir: PathBuf,
    pub filename: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            filename: "panchang_data.xlsx".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("spreadsheet error: {0}")]
    Workbook(#[from] XlsxError),
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

/// Write the report as an `.xlsx` workbook with one sheet per structure.
pub fn export_workbook(
    report: &PanchangReport,
    settings: &ExportSettings,
) -> Result<PathBuf, ExportError> {
    let bytes = workbook_bytes(report)?;
    let writer = AtomicFileWriter::new(settings.output_dir.clone());
    let path = writer.write(&settings.filename, &bytes)?;
    panchang_info!("Exported Panchang {} to {}", report.formatted_date, path.display());
    Ok(path)
}

fn workbook_bytes(report: &PanchangReport) -> Result<Vec<u8>, XlsxError> {
    let summary = report.summary.to_table(SHEET_NAMES[0]);
    let tables = [&summary, &report.inauspicious_timings, &report.choghadiya_day];

    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    for (name, table) in SHEET_NAMES.iter().zip(tables) {
        let sheet = workbook.add_worksheet();
        sheet.set_name(*name)?;
        write_table(sheet, table, &header_format)?;
    }
    workbook.save_to_buffer()
}

fn write_table(sheet: &mut Worksheet, table: &NamedTable, header_format: &Format) -> Result<(), XlsxError> {
    for (col, header) in table.headers().iter().enumerate() {
        sheet.write_string_with_format(0, col_num(col), header, header_format)?;
    }
    let first_row = usize::from(!table.headers().is_empty());
    for (index, row) in table.rows().iter().enumerate() {
        let row_num = u32::try_from(first_row + index).unwrap_or(u32::MAX);
        for (col, cell) in row.iter().enumerate() {
            sheet.write_string(row_num, col_num(col), cell)?;
        }
    }
    Ok(())
}

// Out-of-range indices are rejected by the worksheet with a limit error.
fn col_num(index: usize) -> u16 {
    u16::try_from(index).unwrap_or(u16::MAX)
}
