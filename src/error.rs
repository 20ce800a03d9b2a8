// src/error.rs
use std::time::Duration;

use thiserror::Error;

/// Everything that can stop a scrape cycle. Any of these aborts the run
/// before the database write.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("config: {0}")]
    Config(String),

    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("router returned HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    #[error("no table captioned {0:?} on the page")]
    TableNotFound(String),

    #[error("row {0:?} not found in the traffic table")]
    MissingRow(&'static str),

    #[error("row {row:?} has {cells} cells, expected at least {expected}")]
    MalformedRow { row: &'static str, cells: usize, expected: usize },

    #[error("row {row:?} column {column}: cannot read {text:?} as a number")]
    BadNumber { row: &'static str, column: usize, text: String },

    #[error("line protocol: {0}")]
    Encode(String),

    #[error("database rejected write (HTTP {status}): {body}")]
    WriteRejected { status: u16, body: String },

    #[error("database write failed after {attempts} attempts ({elapsed:?}): {last}")]
    WriteExhausted { attempts: u32, elapsed: Duration, last: String },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl ScrapeError {
    /// True for failures worth another attempt on the write path
    /// (transport errors and server-side 5xx).
    pub fn is_retryable(&self) -> bool {
        match self {
            ScrapeError::Http(e) => !e.is_builder(),
            ScrapeError::WriteRejected { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
