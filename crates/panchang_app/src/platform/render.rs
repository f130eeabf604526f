use std::fmt::Write;

use panchang_core::{AppViewModel, Banner, TableView};

/// Plain-text rendering of the view model.
pub fn render_view(view: &AppViewModel) -> String {
    let mut out = String::new();
    if let Some(banner) = &view.banner {
        push_banner(&mut out, banner);
    }
    for table in &view.tables {
        out.push('\n');
        render_table(&mut out, table);
    }
    if let Some(note) = &view.export_note {
        out.push('\n');
        push_banner(&mut out, note);
    }
    out
}

fn push_banner(out: &mut String, banner: &Banner) {
    let _ = match banner {
        Banner::Success(text) => writeln!(out, "{text}"),
        Banner::Error(text) => writeln!(out, "error: {text}"),
    };
}

fn render_table(out: &mut String, table: &TableView) {
    let _ = writeln!(out, "== {} ==", table.title);
    if table.headers.is_empty() && table.rows.is_empty() {
        out.push_str("(no data)\n");
        return;
    }

    let columns = table
        .rows
        .iter()
        .map(Vec::len)
        .chain([table.headers.len()])
        .max()
        .unwrap_or(0);
    let mut widths = vec![0usize; columns];
    for row in std::iter::once(&table.headers).chain(&table.rows) {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    if !table.headers.is_empty() {
        push_row(out, &table.headers, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        push_row(out, &rule, &widths);
    }
    for row in &table.rows {
        push_row(out, row, &widths);
    }
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect();
    let _ = writeln!(out, "{}", line.join(" | ").trim_end());
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn table_columns_are_aligned() {
        let view = AppViewModel {
            banner: Some(Banner::Success("Panchang for 05 January 2024".into())),
            tables: vec![TableView {
                title: "Inauspicious Timings".into(),
                headers: strings(&["Name", "Time"]),
                rows: vec![strings(&["Rahu Kalam", "11:10 AM to 12:29 PM"])],
            }],
            ..AppViewModel::default()
        };
        assert_eq!(
            render_view(&view),
            "Panchang for 05 January 2024\n\
             \n\
             == Inauspicious Timings ==\n\
             Name       | Time\n\
             ---------- | --------------------\n\
             Rahu Kalam | 11:10 AM to 12:29 PM\n"
        );
    }

    #[test]
    fn empty_table_and_error_banner() {
        let view = AppViewModel {
            banner: Some(Banner::Error("No internet connection. Please check your network.".into())),
            tables: vec![TableView {
                title: "Choghadiya (Day)".into(),
                headers: Vec::new(),
                rows: Vec::new(),
            }],
            ..AppViewModel::default()
        };
        let text = render_view(&view);
        assert!(text.starts_with("error: No internet connection."));
        assert!(text.ends_with("== Choghadiya (Day) ==\n(no data)\n"));
    }
}
