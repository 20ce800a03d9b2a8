// src/core/html.rs
use scraper::{ElementRef, Html, Selector};

use super::sanitize::normalize_ws;

fn sel(css: &'static str) -> Selector {
    Selector::parse(css).expect("static selector")
}

/// Visible text of an element, whitespace-normalized.
pub fn text_of(el: ElementRef<'_>) -> String {
    normalize_ws(&el.text().collect::<String>())
}

/// First `<table>` whose `<caption>` reads exactly `caption`
/// (after whitespace normalization; case-sensitive).
pub fn find_table_by_caption<'a>(doc: &'a Html, caption: &str) -> Option<ElementRef<'a>> {
    let caption_sel = sel("caption");
    doc.select(&caption_sel)
        .filter(|c| text_of(*c) == caption)
        .find_map(|c| {
            c.ancestors()
                .filter_map(ElementRef::wrap)
                .find(|e| e.value().name().eq_ignore_ascii_case("table"))
        })
}

/// Text of every `<td>` per `<tr>`. Header-only rows (`<th>` cells) are skipped.
pub fn data_rows(table: ElementRef<'_>) -> Vec<Vec<String>> {
    let tr_sel = sel("tr");
    let td_sel = sel("td");

    table
        .select(&tr_sel)
        .map(|tr| tr.select(&td_sel).map(text_of).collect::<Vec<_>>())
        .filter(|cells| !cells.is_empty())
        .collect()
}
