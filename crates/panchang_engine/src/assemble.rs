use panchang_core::{DateSpec, PanchangReport, CHOGHADIYA_DAY_HEADING, INAUSPICIOUS_TIMINGS_HEADING};
use panchang_logging::panchang_info;

use crate::extract::PanchangDocument;
use crate::{FetchResult, Fetcher};

/// Fetch, decode and extract the report for `date`.
///
/// Fetch failures short-circuit. Undecodable bytes and missing sections
/// never fail the request.
pub async fn build_result(fetcher: &dyn Fetcher, date: DateSpec) -> FetchResult {
    let raw = fetcher.fetch_page(&date).await?;
    let decoded = raw.decode();
    Ok(assemble_report(date, &decoded.html))
}

/// Parse `html` once and run all three extractions against it.
pub fn assemble_report(date: DateSpec, html: &str) -> PanchangReport {
    let document = PanchangDocument::parse(html);
    let mut report = PanchangReport::new(date);
    report.summary = document.extract_summary();
    report.inauspicious_timings = document.extract_named_table(INAUSPICIOUS_TIMINGS_HEADING);
    report.choghadiya_day = document.extract_named_table(CHOGHADIYA_DAY_HEADING);
    panchang_info!(
        "Panchang {}: {} summary entries, {} inauspicious rows, {} choghadiya rows",
        report.formatted_date,
        report.summary.len(),
        report.inauspicious_timings.rows().len(),
        report.choghadiya_day.rows().len()
    );
    report
}
