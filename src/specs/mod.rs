// src/specs/mod.rs
//! # Page extractors
//!
//! Each page module knows **where the numbers live** on one router page and how to pull
//! them out. Page modules are pure: HTML string in, typed stats out. No HTTP, no
//! database, no config.
//!
//! ## Conventions & invariants
//! - Tables are located by their `<caption>` text, never by position in the document.
//! - Rows are picked by the label in their first cell; columns are fixed per page.
//! - Cell text is whitespace-normalized before parsing (`core::sanitize`).
//! - Anything missing or unparsable is an error; nothing is ever filled in with zeros.
//!
//! ## Typical call chain
//! ```text
//! runner::run_once → PageSource::fetch → specs::<page>::extract
//!                                      ↘ sample::assemble → line_protocol::encode
//! ```
//!
//! ## Testing notes
//! Page modules are tested offline against saved pages under `tests/fixtures/`.
pub mod ip_traffic;
