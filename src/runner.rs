// src/runner.rs
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{debug, info};

use crate::{
    config::AppOptions,
    core::PageSource,
    error::ScrapeError,
    influx::Sink,
    line_protocol,
    sample::{self, Timing},
    specs::ip_traffic,
};

/// What one cycle produced.
#[derive(Clone, Debug)]
pub struct RunSummary {
    pub line: String,
    pub field_count: usize,
    pub fetch: Duration,
}

/// One scrape cycle: fetch → extract → assemble → encode → write.
///
/// Every step before `sink.write` returns early on failure, so a bad router
/// response, a missing table or an unencodable point never reaches the database.
pub fn run_once(
    opts: &AppOptions,
    source: &dyn PageSource,
    sink: &mut dyn Sink,
) -> Result<RunSummary, ScrapeError> {
    let page = source.fetch()?;

    let parse_started = Instant::now();
    let stats = ip_traffic::extract(&page.body)?;
    let parse = parse_started.elapsed();
    debug!(?stats, ?parse, "extracted IP Traffic table");

    let timing = opts.timing.then_some(Timing { fetch: page.elapsed, parse });
    let mut point = sample::assemble(opts, &stats, timing);
    if opts.client_timestamp {
        if let Some(ns) = Utc::now().timestamp_nanos_opt() {
            point = point.timestamp(ns);
        }
    }

    let line = line_protocol::encode(&point)?;
    sink.write(&line)?;

    info!(
        tx_bytes = stats.tx.bytes,
        rx_bytes = stats.rx.bytes,
        fields = point.field_count(),
        fetch_ms = page.elapsed.as_millis() as u64,
        "point written"
    );

    Ok(RunSummary { line, field_count: point.field_count(), fetch: page.elapsed })
}
