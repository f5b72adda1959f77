//! Model loading and the `Embedder` implementation backed by ONNX Runtime

use anyhow::{Context, Result};
use std::path::Path;

use crate::config::{self, ModelPaths};
use crate::core::Embedding;
use crate::error::GroupingError;
use crate::runtime::Provider;

use super::text::TextModel;
use super::Embedder;

/// Multilingual E5 encoder, loaded once and reused for every cycle
pub struct E5Embedder {
	model: TextModel,
}

impl E5Embedder {
	/// Loads `<models_dir>/<model_id>/`. Missing files are reported up front.
	pub fn load(models_dir: Option<&Path>, model_id: &str, provider: Provider) -> Result<Self> {
		let dir = config::models_dir(models_dir).context(format!(
			"Models directory not found. Pass --models-dir or set {}",
			config::MODELS_DIR_ENV
		))?;
		let paths = ModelPaths::resolve(&dir, model_id);

		if !paths.model.exists() {
			anyhow::bail!("Text model file does not exist: {}", paths.model.display());
		}
		if !paths.tokenizer.exists() {
			anyhow::bail!("Tokenizer file does not exist: {}", paths.tokenizer.display());
		}

		crate::ui::debug(&format!("Loading text model: {}", paths.model.display()));
		let model = TextModel::load(&paths.model, &paths.tokenizer, provider)?;
		crate::ui::success(&format!("Text model loaded ({} on {})", model_id, model.provider()));

		Ok(Self { model })
	}
}

impl Embedder for E5Embedder {
	fn embed(&mut self, text: &str) -> crate::error::Result<Embedding> {
		self.model
			.encode(text)
			.map_err(|e| GroupingError::embedding(format!("{:#}", e)))
	}
}
