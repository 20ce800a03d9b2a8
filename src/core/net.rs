// src/core/net.rs

// One HTTP GET against the router's diagnostics page (blocking).

use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use tracing::debug;

use crate::config::{consts::USER_AGENT, RouterOptions};
use crate::error::ScrapeError;

/// A fetched page and how long the round-trip took.
#[derive(Clone, Debug)]
pub struct Page {
    pub body: String,
    pub elapsed: Duration,
}

/// Where the HTML comes from. The router in production, fixtures in tests.
pub trait PageSource {
    fn fetch(&self) -> Result<Page, ScrapeError>;
}

pub struct RouterClient {
    client: Client,
    url: String,
}

impl RouterClient {
    pub fn new(opts: &RouterOptions) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(opts.timeout)
            .connect_timeout(opts.timeout)
            .build()?;
        Ok(Self { client, url: opts.url() })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl PageSource for RouterClient {
    fn fetch(&self) -> Result<Page, ScrapeError> {
        let started = Instant::now();
        let resp = self.client.get(&self.url).send()?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ScrapeError::HttpStatus { status: status.as_u16(), url: self.url.clone() });
        }

        let body = resp.text()?;
        let elapsed = started.elapsed();
        debug!(url = %self.url, bytes = body.len(), ?elapsed, "fetched router page");
        Ok(Page { body, elapsed })
    }
}
