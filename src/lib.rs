// src/lib.rs

#[macro_use]
pub mod macros;

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod influx;
pub mod line_protocol;
pub mod log;
pub mod runner;
pub mod sample;
pub mod specs;

pub use error::ScrapeError;
