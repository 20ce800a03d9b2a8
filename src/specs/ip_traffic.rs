// src/specs/ip_traffic.rs
//
// "IP Traffic" table on the gateway's diagnostics page:
//
//   | (label)  | Bytes | Packets | Errors | % Errors |
//   | Transmit |  ...  |   ...   |  ...   |   ...    |
//   | Receive  |  ...  |   ...   |  ...   |   ...    |
//
// Column positions are fixed.

use scraper::Html;

use crate::config::consts::{ROW_MIN_CELLS, ROW_RX, ROW_TX, TABLE_CAPTION};
use crate::core::html::{data_rows, find_table_by_caption};
use crate::core::sanitize::{parse_count, parse_percent};
use crate::error::ScrapeError;
use crate::sample::FieldValue;

const COL_BYTES: usize = 1;
const COL_PKTS: usize = 2;
const COL_ERR: usize = 3;
const COL_ERR_PCT: usize = 4;

/// One direction's counters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Direction {
    pub bytes: u64,
    pub pkts: u64,
    pub err: u64,
    pub err_pct: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrafficStats {
    pub tx: Direction,
    pub rx: Direction,
}

impl Direction {
    fn fields(&self, prefix: &str) -> [(String, FieldValue); 4] {
        [
            (format!("{prefix}_bytes"), FieldValue::UInt(self.bytes)),
            (format!("{prefix}_pkts"), FieldValue::UInt(self.pkts)),
            (format!("{prefix}_err"), FieldValue::UInt(self.err)),
            (format!("{prefix}_err_pct"), FieldValue::Float(self.err_pct)),
        ]
    }
}

impl TrafficStats {
    /// The eight counters, tx first, in table column order.
    pub fn fields(&self) -> Vec<(String, FieldValue)> {
        let mut out = Vec::with_capacity(8);
        out.extend(self.tx.fields("tx"));
        out.extend(self.rx.fields("rx"));
        out
    }
}

/// Pull tx/rx counters out of the diagnostics page.
pub fn extract(html: &str) -> Result<TrafficStats, ScrapeError> {
    let doc = Html::parse_document(html);
    let table = find_table_by_caption(&doc, TABLE_CAPTION)
        .ok_or_else(|| ScrapeError::TableNotFound(s!(TABLE_CAPTION)))?;

    let rows = data_rows(table);
    let pick = |label: &'static str| -> Result<Direction, ScrapeError> {
        // A repeated label overwrites: the last row wins.
        let row = rows
            .iter()
            .rfind(|r| r.first().is_some_and(|c| c == label))
            .ok_or(ScrapeError::MissingRow(label))?;
        read_direction(label, row)
    };

    Ok(TrafficStats { tx: pick(ROW_TX)?, rx: pick(ROW_RX)? })
}

fn read_direction(label: &'static str, cells: &[String]) -> Result<Direction, ScrapeError> {
    if cells.len() < ROW_MIN_CELLS {
        return Err(ScrapeError::MalformedRow { row: label, cells: cells.len(), expected: ROW_MIN_CELLS });
    }

    let bad = |column: usize| ScrapeError::BadNumber { row: label, column, text: cells[column].clone() };
    let count = |column: usize| parse_count(&cells[column]).ok_or_else(|| bad(column));

    Ok(Direction {
        bytes: count(COL_BYTES)?,
        pkts: count(COL_PKTS)?,
        err: count(COL_ERR)?,
        err_pct: parse_percent(&cells[COL_ERR_PCT]).ok_or_else(|| bad(COL_ERR_PCT))?,
    })
}
