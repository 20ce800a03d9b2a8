// src/config/options.rs
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use super::consts::*;

#[derive(Clone, Debug, PartialEq)]
pub struct AppOptions {
    pub router: RouterOptions,
    pub tags: TagOptions,
    pub influx: InfluxOptions,
    /// Add `req_ms` / `parse_ms` to the point.
    pub timing: bool,
    /// Stamp the point locally instead of letting the database do it.
    pub client_timestamp: bool,
    /// Print the line instead of writing it.
    pub dry_run: bool,
    pub log_file: Option<PathBuf>,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            router: RouterOptions::default(),
            tags: TagOptions::default(),
            influx: InfluxOptions::default(),
            timing: true,
            client_timestamp: false,
            dry_run: false,
            log_file: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouterOptions {
    /// Host or host:port, no scheme.
    pub addr: String,
    pub path: String,
    pub timeout: Duration,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            addr: s!(ROUTER_ADDR),
            path: s!(ROUTER_PATH),
            timeout: Duration::from_secs(ROUTER_TIMEOUT_SECS),
        }
    }
}

impl RouterOptions {
    pub fn url(&self) -> String {
        let addr = self.addr.trim_end_matches('/');
        if self.path.starts_with('/') {
            format!("http://{}{}", addr, self.path)
        } else {
            format!("http://{}/{}", addr, self.path)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagOptions {
    pub host: String,
    pub region: String,
}

impl Default for TagOptions {
    fn default() -> Self {
        Self { host: s!(TAG_HOST), region: s!(TAG_REGION) }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum InfluxApi {
    /// `/write?db=` with optional basic auth
    V1 { database: String, username: Option<String>, password: Option<String> },
    /// `/api/v2/write?org=&bucket=` with token auth
    V2 { org: String, bucket: String, token: String },
}

// Keep credentials out of logs and error reports.
impl fmt::Debug for InfluxApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InfluxApi::V1 { database, username, .. } => f
                .debug_struct("V1")
                .field("database", database)
                .field("username", username)
                .finish_non_exhaustive(),
            InfluxApi::V2 { org, bucket, .. } => f
                .debug_struct("V2")
                .field("org", org)
                .field("bucket", bucket)
                .finish_non_exhaustive(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InfluxOptions {
    pub url: String,
    pub api: InfluxApi,
    pub measurement: String,
    /// Extra attempts after the first failed write.
    pub retries: u32,
    pub timeout: Duration,
}

impl Default for InfluxOptions {
    fn default() -> Self {
        Self {
            url: s!(INFLUX_URL),
            api: InfluxApi::V2 { org: s!(), bucket: s!(), token: s!() },
            measurement: s!(MEASUREMENT),
            retries: INFLUX_RETRIES,
            timeout: Duration::from_secs(INFLUX_TIMEOUT_SECS),
        }
    }
}

impl InfluxOptions {
    /// Full write endpoint, including the query string.
    pub fn write_url(&self) -> String {
        let base = self.url.trim_end_matches('/');
        match &self.api {
            InfluxApi::V1 { database, .. } => {
                format!("{}/write?db={}&precision=ns", base, query_escape(database))
            }
            InfluxApi::V2 { org, bucket, .. } => format!(
                "{}/api/v2/write?org={}&bucket={}&precision=ns",
                base,
                query_escape(org),
                query_escape(bucket)
            ),
        }
    }
}

/// Percent-encode a query value (RFC 3986 unreserved set passes through).
fn query_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => out.push(b as char),
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}
