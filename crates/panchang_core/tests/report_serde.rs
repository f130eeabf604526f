use panchang_core::{DateSpec, NamedTable, PanchangReport};
use serde_json::json;

#[test]
fn report_serializes_summary_as_ordered_entries() {
    let mut report = PanchangReport::new(DateSpec::from_ymd(2024, 1, 5).unwrap());
    report.summary.insert("Sunrise", "07:15 AM");
    report.summary.insert("Sunset", "05:58 PM");
    report.inauspicious_timings =
        NamedTable::new("Inauspicious Timings", vec!["Name".into(), "Time".into()]);

    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["date"], json!("2024-01-05"));
    assert_eq!(value["formatted_date"], json!("05/01/2024"));
    assert_eq!(
        value["summary"],
        json!([
            {"category": "Sunrise", "details": "07:15 AM"},
            {"category": "Sunset", "details": "05:58 PM"}
        ])
    );
    assert_eq!(value["inauspicious_timings"]["headers"], json!(["Name", "Time"]));
    assert_eq!(value["choghadiya_day"]["rows"], json!([]));

    let back: PanchangReport = serde_json::from_value(value).unwrap();
    assert_eq!(back, report);
}
