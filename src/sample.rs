// src/sample.rs
//! One data point: measurement, tags, fields and an optional timestamp.

use std::time::Duration;

use crate::config::AppOptions;
use crate::specs::ip_traffic::TrafficStats;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldValue {
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl From<u64> for FieldValue {
    fn from(v: u64) -> Self { FieldValue::UInt(v) }
}
impl From<i64> for FieldValue {
    fn from(v: i64) -> Self { FieldValue::Int(v) }
}
impl From<f64> for FieldValue {
    fn from(v: f64) -> Self { FieldValue::Float(v) }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Point {
    measurement: String,
    tags: Vec<(String, String)>,
    fields: Vec<(String, FieldValue)>,
    /// Nanoseconds since the Unix epoch. None → server assigns.
    timestamp: Option<i64>,
}

impl Point {
    pub fn new(measurement: impl Into<String>) -> Self {
        Self { measurement: measurement.into(), tags: Vec::new(), fields: Vec::new(), timestamp: None }
    }

    /// Set a tag. An existing key keeps its position and takes the new value.
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        upsert(&mut self.tags, key.into(), value.into());
        self
    }

    pub fn field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        upsert(&mut self.fields, key.into(), value.into());
        self
    }

    pub fn with_fields<I>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (String, FieldValue)>,
    {
        for (k, v) in fields {
            upsert(&mut self.fields, k, v);
        }
        self
    }

    pub fn timestamp(mut self, nanos: i64) -> Self {
        self.timestamp = Some(nanos);
        self
    }

    pub fn measurement(&self) -> &str { &self.measurement }
    pub fn tags(&self) -> &[(String, String)] { &self.tags }
    pub fn fields(&self) -> &[(String, FieldValue)] { &self.fields }
    pub fn field_count(&self) -> usize { self.fields.len() }
    pub fn timestamp_ns(&self) -> Option<i64> { self.timestamp }

    pub fn field_value(&self, key: &str) -> Option<FieldValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }
}

fn upsert<V>(list: &mut Vec<(String, V)>, key: String, value: V) {
    match list.iter_mut().find(|(k, _)| *k == key) {
        Some(slot) => slot.1 = value,
        None => list.push((key, value)),
    }
}

/// Stopwatch readings for the optional `req_ms` / `parse_ms` fields.
#[derive(Clone, Copy, Debug)]
pub struct Timing {
    pub fetch: Duration,
    pub parse: Duration,
}

fn millis(d: Duration) -> f64 {
    d.as_nanos() as f64 / 1_000_000.0
}

/// Build the point for one scrape: configured measurement + host/region tags,
/// the eight counters, then timing if given.
pub fn assemble(opts: &AppOptions, stats: &TrafficStats, timing: Option<Timing>) -> Point {
    let mut point = Point::new(opts.influx.measurement.as_str())
        .tag("host", opts.tags.host.as_str())
        .tag("region", opts.tags.region.as_str())
        .with_fields(stats.fields());

    if let Some(t) = timing {
        point = point
            .field("req_ms", millis(t.fetch))
            .field("parse_ms", millis(t.parse));
    }
    point
}
