//! # Command Implementations
//!
//! Each submodule handles one CLI command (run, group, matrix).

pub mod group;
pub mod matrix;
pub mod run;

use anyhow::Result;
use std::time::Instant;

use crate::cli::{ModelArgs, Provider};
use crate::models::E5Embedder;
use crate::ui;

/// Loads the embedding model, timing the load like every command does
fn load_embedder(model: &ModelArgs, provider: Provider) -> Result<E5Embedder> {
	ui::info(&format!("Loading embedding model {}...", model.model));
	let start = Instant::now();
	let embedder = E5Embedder::load(model.models_dir.as_deref(), &model.model, provider)?;
	ui::success(&format!("Model ready in {:.2}s", start.elapsed().as_secs_f32()));
	Ok(embedder)
}
