// src/cli.rs
use std::{ffi::OsString, path::{Path, PathBuf}, time::Duration};

use clap::{ArgAction, Parser, ValueEnum};
use tracing::error;

use crate::{
    config::{consts, AppOptions, InfluxApi, InfluxOptions, RouterOptions, TagOptions},
    core::RouterClient,
    error::ScrapeError,
    influx::{InfluxWriter, StdoutSink},
    runner::{self, RunSummary},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ApiVersion {
    V1,
    V2,
}

/// Scrape the router's IP Traffic table and write one point to InfluxDB.
///
/// Every option falls back to an environment variable; a dotenv-style config
/// file (default `router_bw.env`) is loaded into the environment first.
#[derive(Parser, Debug)]
#[command(name = "router_bw", version, about)]
pub struct Cli {
    /// Config file (KEY=value lines). Real environment variables win over it.
    #[arg(long, env = "ROUTER_BW_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "ROUTER_ADDR", default_value = consts::ROUTER_ADDR)]
    pub router_addr: String,

    #[arg(long, env = "ROUTER_PATH", default_value = consts::ROUTER_PATH)]
    pub router_path: String,

    #[arg(long, env = "ROUTER_TIMEOUT_SECS", default_value_t = consts::ROUTER_TIMEOUT_SECS)]
    pub router_timeout_secs: u64,

    #[arg(long, env = "TAG_HOST", default_value = consts::TAG_HOST)]
    pub tag_host: String,

    #[arg(long, env = "TAG_REGION", default_value = consts::TAG_REGION)]
    pub tag_region: String,

    #[arg(long, env = "INFLUX_URL", default_value = consts::INFLUX_URL)]
    pub influx_url: String,

    #[arg(long, env = "INFLUX_API", value_enum, default_value_t = ApiVersion::V2)]
    pub influx_api: ApiVersion,

    #[arg(long, env = "INFLUX_ORG")]
    pub influx_org: Option<String>,

    #[arg(long, env = "INFLUX_BUCKET")]
    pub influx_bucket: Option<String>,

    #[arg(long, env = "INFLUX_TOKEN", hide_env_values = true)]
    pub influx_token: Option<String>,

    #[arg(long, env = "INFLUX_DATABASE")]
    pub influx_database: Option<String>,

    #[arg(long, env = "INFLUX_USERNAME")]
    pub influx_username: Option<String>,

    #[arg(long, env = "INFLUX_PASSWORD", hide_env_values = true)]
    pub influx_password: Option<String>,

    #[arg(long, env = "INFLUX_MEASUREMENT", default_value = consts::MEASUREMENT)]
    pub measurement: String,

    /// Extra write attempts after a transport error or 5xx.
    #[arg(long, env = "INFLUX_RETRIES", default_value_t = consts::INFLUX_RETRIES)]
    pub retries: u32,

    /// Add req_ms / parse_ms fields.
    #[arg(long, env = "SCRAPE_TIMING", default_value_t = true, action = ArgAction::Set)]
    pub timing: bool,

    /// Stamp the point here instead of on the server.
    #[arg(long, env = "CLIENT_TIMESTAMP")]
    pub client_timestamp: bool,

    /// Print the line to stdout instead of writing it.
    #[arg(long, env = "DRY_RUN")]
    pub dry_run: bool,

    /// tracing filter directive, e.g. `info` or `router_bw=debug`.
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Append logs here instead of stderr.
    #[arg(long, env = "LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn into_options(self) -> Result<AppOptions, ScrapeError> {
        if self.router_timeout_secs == 0 {
            return Err(ScrapeError::Config(s!("ROUTER_TIMEOUT_SECS must be > 0")));
        }

        let api = match self.influx_api {
            ApiVersion::V2 => InfluxApi::V2 {
                org: self.influx_org.unwrap_or_default(),
                bucket: self.influx_bucket.unwrap_or_default(),
                token: self.influx_token.unwrap_or_default(),
            },
            ApiVersion::V1 => InfluxApi::V1 {
                database: self.influx_database.unwrap_or_default(),
                username: self.influx_username.filter(|u| !u.is_empty()),
                password: self.influx_password,
            },
        };

        Ok(AppOptions {
            router: RouterOptions {
                addr: self.router_addr,
                path: self.router_path,
                timeout: Duration::from_secs(self.router_timeout_secs),
            },
            tags: TagOptions { host: self.tag_host, region: self.tag_region },
            influx: InfluxOptions {
                url: self.influx_url,
                api,
                measurement: self.measurement,
                retries: self.retries,
                ..InfluxOptions::default()
            },
            timing: self.timing,
            client_timestamp: self.client_timestamp,
            dry_run: self.dry_run,
            log_file: self.log_file,
        })
    }
}

/// `--config` has to be known before clap reads the environment,
/// so pull it out of argv by hand.
fn config_arg(args: &[OsString]) -> Option<PathBuf> {
    let mut it = args.iter().skip(1);
    while let Some(a) = it.next() {
        let a = a.to_string_lossy();
        if a == "--config" {
            return it.next().map(PathBuf::from);
        }
        if let Some(v) = a.strip_prefix("--config=") {
            return Some(PathBuf::from(v));
        }
    }
    None
}

/// Load the config file into the environment. An explicit path must exist;
/// the default file is optional.
pub fn load_config_file(explicit: Option<&Path>) -> Result<(), ScrapeError> {
    match explicit {
        Some(path) => dotenvy::from_path(path)
            .map_err(|e| ScrapeError::Config(format!("{}: {}", path.display(), e))),
        None => {
            let default = Path::new(consts::CONFIG_FILE);
            if default.exists() {
                dotenvy::from_path(default)
                    .map_err(|e| ScrapeError::Config(format!("{}: {}", default.display(), e)))?;
            }
            Ok(())
        }
    }
}

pub fn run() -> Result<RunSummary, ScrapeError> {
    run_from(std::env::args_os().collect())
}

pub fn run_from(args: Vec<OsString>) -> Result<RunSummary, ScrapeError> {
    let explicit = config_arg(&args)
        .or_else(|| std::env::var_os("ROUTER_BW_CONFIG").map(PathBuf::from));
    load_config_file(explicit.as_deref())?;

    let cli = Cli::parse_from(&args);
    let log_level = cli.log_level.clone();
    let opts = cli.into_options()?;
    crate::log::init(&log_level, opts.log_file.as_deref())?;

    let result = scrape(&opts);
    if let Err(e) = &result {
        error!(error = %e, "scrape failed; nothing written");
    }
    result
}

fn scrape(opts: &AppOptions) -> Result<RunSummary, ScrapeError> {
    let source = RouterClient::new(&opts.router)?;
    if opts.dry_run {
        return runner::run_once(opts, &source, &mut StdoutSink);
    }
    // Build (and validate) the writer before touching the router.
    let mut writer = InfluxWriter::new(&opts.influx)?;
    runner::run_once(opts, &source, &mut writer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(a: &[&str]) -> Vec<OsString> {
        a.iter().map(OsString::from).collect()
    }

    #[test]
    fn config_arg_forms() {
        assert_eq!(config_arg(&argv(&["bin", "--config", "a.env"])), Some(PathBuf::from("a.env")));
        assert_eq!(config_arg(&argv(&["bin", "--dry-run", "--config=b.env"])), Some(PathBuf::from("b.env")));
        assert_eq!(config_arg(&argv(&["bin", "--dry-run"])), None);
    }

    #[test]
    fn flags_map_onto_options() {
        let cli = Cli::try_parse_from([
            "router_bw",
            "--router-addr", "10.0.0.1",
            "--tag-region", "livingstone",
            "--influx-api", "v1",
            "--influx-database", "telegraf",
            "--influx-username", "u",
            "--timing", "false",
            "--retries", "0",
        ])
        .unwrap();
        let opts = cli.into_options().unwrap();

        assert_eq!(opts.router.url(), "http://10.0.0.1/xslt?PAGE=C_1_0");
        assert_eq!(opts.tags.region, "livingstone");
        assert_eq!(opts.influx.retries, 0);
        assert!(!opts.timing);
        assert_eq!(
            opts.influx.api,
            InfluxApi::V1 { database: s!("telegraf"), username: Some(s!("u")), password: None }
        );
    }

    #[test]
    fn zero_timeout_rejected() {
        let cli = Cli::try_parse_from(["router_bw", "--router-timeout-secs", "0"]).unwrap();
        assert!(matches!(cli.into_options(), Err(ScrapeError::Config(_))));
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let missing = Path::new("/definitely/not/here/router_bw.env");
        assert!(matches!(load_config_file(Some(missing)), Err(ScrapeError::Config(_))));
    }
}
