//! Application configuration and constants

use std::path::{Path, PathBuf};

// === Model Files ===
pub const DEFAULT_MODEL: &str = "multilingual-e5-large";
pub const MODEL_FILE: &str = "model.onnx";
pub const TOKENIZER: &str = "tokenizer.json";
pub const MODELS_DIR_ENV: &str = "WORDCLUSTER_MODELS_DIR";

// === Model Parameters ===
/// E5 models expect queries to carry this prefix
pub const QUERY_PREFIX: &str = "query: ";
pub const MAX_TOKENS: usize = 512;

// === Store ===
pub const DEFAULT_STORE_DIR: &str = "data";
pub const DEFAULT_DATABASE: &str = "db_slaido";
pub const INPUT_COLLECTION: &str = "messages";
pub const OUTPUT_COLLECTION: &str = "correlations";
pub const COLLECTION_EXT: &str = "json";

// === Polling ===
pub const POLL_INTERVAL_SECS: u64 = 5;
pub const RETRY_DELAY_SECS: u64 = 5;

// === Clustering Defaults ===
/// Separates fruit from vegetables with multilingual-e5-large
pub const DEFAULT_THRESHOLD: f32 = 0.168;
pub const DEFAULT_EPS: f32 = 0.3;
pub const DEFAULT_MIN_PTS: usize = 1;

/// Resolve the models directory: explicit path, then WORDCLUSTER_MODELS_DIR,
/// then `models/` next to the executable.
pub fn models_dir(custom: Option<&Path>) -> Option<PathBuf> {
	if let Some(custom) = custom {
		crate::ui::debug(&format!("Using custom model dir: {}", custom.display()));
		return Some(custom.to_path_buf());
	}

	if let Ok(env_path) = std::env::var(MODELS_DIR_ENV) {
		let path = PathBuf::from(&env_path);
		if path.is_dir() {
			crate::ui::debug(&format!("Using {}: {}", MODELS_DIR_ENV, env_path));
			return Some(path);
		}
	}

	if let Ok(exe) = std::env::current_exe() {
		if let Some(dir) = exe.parent() {
			let models = dir.join("models");
			if models.is_dir() {
				crate::ui::debug(&format!("Found models at: {}", models.display()));
				return Some(models);
			}
		}
	}

	None
}

/// Files that make up one cached model
#[derive(Debug, Clone)]
pub struct ModelPaths {
	pub model: PathBuf,
	pub tokenizer: PathBuf,
}

impl ModelPaths {
	/// `<models_dir>/<model_id>/{model.onnx, tokenizer.json}`; a model id
	/// like `intfloat/multilingual-e5-large` keeps only its last segment.
	pub fn resolve(models_dir: &Path, model_id: &str) -> Self {
		let name = model_id.rsplit('/').next().unwrap_or(model_id);
		let dir = models_dir.join(name);
		Self {
			model: dir.join(MODEL_FILE),
			tokenizer: dir.join(TOKENIZER),
		}
	}
}
