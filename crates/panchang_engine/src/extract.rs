use panchang_core::{normalize, NamedTable, RowFit, Summary};
use panchang_logging::{panchang_debug, panchang_trace};
use scraper::{ElementRef, Html, Selector};

/// Bold labels inside paragraphs of the summary container.
const SUMMARY_LABELS: &str = "div#dpTable p strong, div#dpTable p b";

/// A Panchang page parsed once and queried by the extractors.
///
/// Extraction never fails: a missing container, heading or table yields an
/// empty [`Summary`] or [`NamedTable`].
pub struct PanchangDocument {
    html: Html,
}

impl PanchangDocument {
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }

    /// Label/value pairs from the summary container, in document order.
    pub fn extract_summary(&self) -> Summary {
        let mut summary = Summary::new();
        let Some(labels) = selector(SUMMARY_LABELS) else {
            return summary;
        };

        for label in self.html.select(&labels) {
            let Some(paragraph) = enclosing_paragraph(label) else {
                continue;
            };
            let label_text = normalize(&element_text(label));
            let category = normalize(&label_text.replace(':', ""));
            if category.is_empty() {
                continue;
            }
            let full_text = normalize(&element_text(paragraph));
            let details = match full_text.find(&label_text) {
                Some(start) => normalize(&format!(
                    "{}{}",
                    &full_text[..start],
                    &full_text[start + label_text.len()..]
                )),
                None => full_text,
            };
            panchang_trace!("summary {category:?} = {details:?}");
            if summary.insert(category.clone(), details) {
                panchang_debug!("Duplicate summary category {category:?}; keeping the later value");
            }
        }
        summary
    }

    /// The first table following the `<h2>` whose text is exactly `heading_text`.
    ///
    /// The heading comparison is case- and whitespace-sensitive.
    pub fn extract_named_table(&self, heading_text: &str) -> NamedTable {
        let Some(heading) = self.find_heading(heading_text) else {
            panchang_debug!("No <h2> heading {heading_text:?}; returning empty table");
            return NamedTable::empty(heading_text);
        };
        let Some(table) = self.following_table(heading) else {
            panchang_debug!("Heading {heading_text:?} has no following table");
            return NamedTable::empty(heading_text);
        };
        read_table(heading_text, table)
    }

    fn find_heading(&self, heading_text: &str) -> Option<ElementRef<'_>> {
        let headings = selector("h2")?;
        self.html
            .select(&headings)
            .find(|heading| element_text(*heading) == heading_text)
    }

    /// Next `<table>` after `heading` in document order, including inside it.
    fn following_table<'a>(&'a self, heading: ElementRef<'a>) -> Option<ElementRef<'a>> {
        let heading_id = heading.id();
        self.html
            .tree
            .root()
            .descendants()
            .skip_while(|node| node.id() != heading_id)
            .skip(1)
            .filter_map(ElementRef::wrap)
            .find(|element| element.value().name() == "table")
    }
}

fn read_table(label: &str, table: ElementRef<'_>) -> NamedTable {
    let (Some(tr), Some(th), Some(td)) = (selector("tr"), selector("th"), selector("td")) else {
        return NamedTable::empty(label);
    };

    let mut rows = table.select(&tr).peekable();
    let headers = match rows.peek() {
        Some(first) => {
            let headers = cell_texts(*first, &th);
            if !headers.is_empty() {
                rows.next();
            }
            headers
        }
        None => Vec::new(),
    };

    let mut named = NamedTable::new(label, headers);
    for (index, row) in rows.enumerate() {
        match named.push_row(cell_texts(row, &td)) {
            RowFit::Exact => {}
            fit => panchang_debug!("{label:?} row {index}: {fit:?}"),
        }
    }
    named
}

fn cell_texts(row: ElementRef<'_>, cells: &Selector) -> Vec<String> {
    row.select(cells)
        .map(|cell| normalize(&element_text(cell)))
        .collect()
}

fn enclosing_paragraph(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| ancestor.value().name() == "p")
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}
