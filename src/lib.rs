//! # Wordcluster Library
//!
//! Semantic word grouping: embeds short texts with a multilingual E5 model,
//! groups them by cosine distance and publishes per-item group weights to a
//! derived collection whenever the input changes.

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod processing;
pub mod runtime;
pub mod storage;
pub mod ui;

pub use error::{GroupingError, Result};
