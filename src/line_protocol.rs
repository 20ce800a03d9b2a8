// src/line_protocol.rs
//! InfluxDB line protocol:
//!
//! ```text
//! measurement[,tag=value...] field=value[,field=value...] [timestamp]
//! ```

use std::fmt::Write;

use crate::error::ScrapeError;
use crate::sample::{FieldValue, Point};

/// Measurement names escape comma and space.
fn escape_measurement(s: &str) -> String {
    escape(s, &[',', ' '])
}

/// Tag keys, tag values and field keys escape comma, equals and space.
fn escape_key(s: &str) -> String {
    escape(s, &[',', '=', ' '])
}

fn escape(s: &str, special: &[char]) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        if special.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Line breaks would split the record; a trailing backslash would escape
/// the separator after it. Neither can be escaped, so both are refused.
fn check(what: &str, s: &str) -> Result<(), ScrapeError> {
    if s.contains(['\n', '\r']) {
        return Err(ScrapeError::Encode(format!("{what} {s:?} contains a line break")));
    }
    if s.ends_with('\\') {
        return Err(ScrapeError::Encode(format!("{what} {s:?} ends with a backslash")));
    }
    Ok(())
}

fn encode_value(key: &str, value: FieldValue) -> Result<String, ScrapeError> {
    match value {
        FieldValue::Int(v) => Ok(format!("{v}i")),
        FieldValue::UInt(v) => i64::try_from(v)
            .map(|v| format!("{v}i"))
            .map_err(|_| ScrapeError::Encode(format!("field {key:?}: {v} does not fit a signed integer"))),
        FieldValue::Float(v) if v.is_finite() => Ok(format!("{v}")),
        FieldValue::Float(v) => Err(ScrapeError::Encode(format!("field {key:?}: {v} is not finite"))),
    }
}

/// `k=v` pairs joined by commas: N fields → N pairs, no trailing comma.
pub fn encode_fields(fields: &[(String, FieldValue)]) -> Result<String, ScrapeError> {
    let pairs = fields
        .iter()
        .map(|(k, v)| {
            check("field key", k)?;
            Ok(format!("{}={}", escape_key(k), encode_value(k, *v)?))
        })
        .collect::<Result<Vec<String>, ScrapeError>>()?;
    Ok(pairs.join(","))
}

/// Serialize one point. Tags go out sorted by key; empty tag values are dropped.
pub fn encode(point: &Point) -> Result<String, ScrapeError> {
    if point.measurement().is_empty() {
        return Err(ScrapeError::Encode(s!("empty measurement name")));
    }
    if point.field_count() == 0 {
        return Err(ScrapeError::Encode(s!("point has no fields")));
    }

    check("measurement", point.measurement())?;
    let mut line = escape_measurement(point.measurement());

    let mut tags: Vec<&(String, String)> = point.tags().iter().filter(|(_, v)| !v.is_empty()).collect();
    tags.sort_by(|a, b| a.0.cmp(&b.0));
    for (k, v) in tags {
        check("tag key", k)?;
        check("tag value", v)?;
        let _ = write!(line, ",{}={}", escape_key(k), escape_key(v));
    }

    line.push(' ');
    line.push_str(&encode_fields(point.fields())?);

    if let Some(ts) = point.timestamp_ns() {
        let _ = write!(line, " {ts}");
    }
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_suffixes() {
        let f = fields![
            "a" => FieldValue::UInt(7),
            "b" => FieldValue::Int(-3),
            "c" => FieldValue::Float(0.25),
            "d" => FieldValue::Float(2.0),
        ];
        assert_eq!(encode_fields(&f).unwrap(), "a=7i,b=-3i,c=0.25,d=2");
    }

    #[test]
    fn empty_field_list_encodes_empty() {
        assert_eq!(encode_fields(&[]).unwrap(), "");
    }

    #[test]
    fn rejects_nan_and_huge_unsigned() {
        let nan = fields!["x" => FieldValue::Float(f64::NAN)];
        assert!(matches!(encode_fields(&nan), Err(ScrapeError::Encode(_))));

        let huge = fields!["x" => FieldValue::UInt(u64::MAX)];
        assert!(matches!(encode_fields(&huge), Err(ScrapeError::Encode(_))));
    }

    #[test]
    fn full_line_with_sorted_tags_and_timestamp() {
        let p = Point::new("net")
            .tag("region", "livingstone")
            .tag("host", "router")
            .field("tx_bytes", 10u64)
            .timestamp(1_695_513_600_000_000_000);
        assert_eq!(
            encode(&p).unwrap(),
            "net,host=router,region=livingstone tx_bytes=10i 1695513600000000000"
        );
    }

    #[test]
    fn escapes_special_characters() {
        let p = Point::new("my net,x")
            .tag("host name", "a=b,c")
            .field("rx bytes", 1u64);
        assert_eq!(encode(&p).unwrap(), r"my\ net\,x,host\ name=a\=b\,c rx\ bytes=1i");
    }

    #[test]
    fn drops_empty_tag_values() {
        let p = Point::new("net").tag("host", "").tag("region", "home").field("v", 1.5);
        assert_eq!(encode(&p).unwrap(), "net,region=home v=1.5");
    }

    #[test]
    fn no_fields_is_an_error() {
        let p = Point::new("net").tag("host", "router");
        assert!(matches!(encode(&p), Err(ScrapeError::Encode(_))));
    }

    #[test]
    fn line_breaks_are_refused_everywhere() {
        let in_tag = Point::new("net").tag("host", "rou\nter").field("v", 1u64);
        assert!(matches!(encode(&in_tag), Err(ScrapeError::Encode(_))));

        let in_measurement = Point::new("net\r").field("v", 1u64);
        assert!(matches!(encode(&in_measurement), Err(ScrapeError::Encode(_))));

        let in_tag_key = Point::new("net").tag("ho\nst", "router").field("v", 1u64);
        assert!(matches!(encode(&in_tag_key), Err(ScrapeError::Encode(_))));

        let in_field_key = Point::new("net").field("v\n", 1u64);
        assert!(matches!(encode(&in_field_key), Err(ScrapeError::Encode(_))));
    }

    #[test]
    fn trailing_backslash_cannot_swallow_the_next_tag() {
        let p = Point::new("net").tag("host", "a\\").tag("region", "home").field("v", 1u64);
        match encode(&p) {
            Err(ScrapeError::Encode(msg)) => assert!(msg.contains("backslash")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn inner_backslash_passes_through() {
        let p = Point::new("net").tag("host", r"a\b").field("v", 1u64);
        assert_eq!(encode(&p).unwrap(), r"net,host=a\b v=1i");
    }
}
