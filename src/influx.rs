// src/influx.rs

// Database side: take one encoded line and get it into InfluxDB.

use std::{thread, time::{Duration, Instant}};

use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use tracing::{debug, warn};

use crate::config::{consts::{RETRY_PAUSE_MS, USER_AGENT}, InfluxApi, InfluxOptions};
use crate::error::ScrapeError;

/// Anything that accepts a line-protocol record.
pub trait Sink {
    fn write(&mut self, line: &str) -> Result<(), ScrapeError>;
}

/// HTTP writer for the v1 (`/write`) and v2 (`/api/v2/write`) endpoints.
pub struct InfluxWriter {
    client: Client,
    url: String,
    api: InfluxApi,
    retries: u32,
    pause: Duration,
}

impl InfluxWriter {
    pub fn new(opts: &InfluxOptions) -> Result<Self, ScrapeError> {
        validate(&opts.api)?;
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(opts.timeout)
            .build()?;
        Ok(Self {
            client,
            url: opts.write_url(),
            api: opts.api.clone(),
            retries: opts.retries,
            pause: Duration::from_millis(RETRY_PAUSE_MS),
        })
    }

    /// Override the pause between attempts.
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    fn attempt(&self, line: &str) -> Result<(), ScrapeError> {
        let mut req = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(s!(line));

        req = match &self.api {
            InfluxApi::V2 { token, .. } => req.header(AUTHORIZATION, format!("Token {token}")),
            InfluxApi::V1 { username: Some(user), password, .. } => req.basic_auth(user, password.as_deref()),
            InfluxApi::V1 { .. } => req,
        };

        let resp = req.send()?;
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        let body = resp.text().unwrap_or_default();
        Err(ScrapeError::WriteRejected { status: status.as_u16(), body: body.trim().to_string() })
    }
}

impl Sink for InfluxWriter {
    fn write(&mut self, line: &str) -> Result<(), ScrapeError> {
        let started = Instant::now();
        let attempts = self.retries.saturating_add(1);
        let mut n: u32 = 1;

        loop {
            let e = match self.attempt(line) {
                Ok(()) => {
                    debug!(attempt = n, "write accepted");
                    return Ok(());
                }
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) => e,
            };
            if n >= attempts {
                return Err(ScrapeError::WriteExhausted {
                    attempts: n,
                    elapsed: started.elapsed(),
                    last: e.to_string(),
                });
            }
            warn!(attempt = n, of = attempts, error = %e, "write failed, retrying");
            thread::sleep(self.pause);
            n += 1;
        }
    }
}

fn validate(api: &InfluxApi) -> Result<(), ScrapeError> {
    let missing = |name: &str| -> Result<(), ScrapeError> {
        Err(ScrapeError::Config(format!("{name} is required")))
    };
    match api {
        InfluxApi::V2 { org, .. } if org.is_empty() => missing("INFLUX_ORG"),
        InfluxApi::V2 { bucket, .. } if bucket.is_empty() => missing("INFLUX_BUCKET"),
        InfluxApi::V2 { token, .. } if token.is_empty() => missing("INFLUX_TOKEN"),
        InfluxApi::V1 { database, .. } if database.is_empty() => missing("INFLUX_DATABASE"),
        _ => Ok(()),
    }
}

/// Dry-run sink: the line goes to stdout.
pub struct StdoutSink;

impl Sink for StdoutSink {
    fn write(&mut self, line: &str) -> Result<(), ScrapeError> {
        println!("{line}");
        Ok(())
    }
}
