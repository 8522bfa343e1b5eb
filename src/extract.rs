// src/extract.rs
use scraper::{Html, Selector};

/// Extracts the data rows from an ANBIMA result page.
///
/// The page carries its price table as the first `<table>` with a `border`
/// attribute. Every `<tr>` is collected as trimmed `<td>` text; a row is
/// kept only if its first cell is a pure-digit SELIC code, which drops the
/// header and footer rows. Returns an empty vec when no qualifying table
/// exists.
pub fn extract_rows(html: &str) -> Vec<Vec<String>> {
    let table_selector =
        Selector::parse("table[border]").expect("CSS selector for bordered tables should be valid");
    let tr_selector = Selector::parse("tr").expect("CSS selector for rows should be valid");
    let td_selector = Selector::parse("td").expect("CSS selector for cells should be valid");

    let document = Html::parse_document(html);
    let Some(table) = document.select(&table_selector).next() else {
        return Vec::new();
    };

    let mut rows = Vec::new();
    for tr in table.select(&tr_selector) {
        let cells: Vec<String> = tr
            .select(&td_selector)
            .map(|td| td.text().collect::<String>().trim().to_string())
            .collect();
        if cells.is_empty() {
            continue;
        }
        let first = &cells[0];
        if !first.is_empty() && first.bytes().all(|b| b.is_ascii_digit()) {
            rows.push(cells);
        }
    }
    rows
}
