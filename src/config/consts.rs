// src/config/consts.rs

// Router
pub const ROUTER_ADDR: &str = "192.168.1.254";
pub const ROUTER_PATH: &str = "/xslt?PAGE=C_1_0";
pub const ROUTER_TIMEOUT_SECS: u64 = 15;
pub const USER_AGENT: &str = concat!("router_bw/", env!("CARGO_PKG_VERSION"));

// Page layout (hardcoded; the page never changes shape)
pub const TABLE_CAPTION: &str = "IP Traffic";
pub const ROW_TX: &str = "Transmit";
pub const ROW_RX: &str = "Receive";
pub const ROW_MIN_CELLS: usize = 5; // label, bytes, pkts, errors, error %

// Point
pub const MEASUREMENT: &str = "net";
pub const TAG_HOST: &str = "router";
pub const TAG_REGION: &str = "home";

// InfluxDB
pub const INFLUX_URL: &str = "http://localhost:8086";
pub const INFLUX_RETRIES: u32 = 3;
pub const INFLUX_TIMEOUT_SECS: u64 = 10;
pub const RETRY_PAUSE_MS: u64 = 500;

// Config file, loaded if present
pub const CONFIG_FILE: &str = "router_bw.env";
