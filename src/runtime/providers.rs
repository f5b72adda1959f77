//! Execution provider selection

use anyhow::{Context, Result};
use ort::session::builder::{GraphOptimizationLevel, SessionBuilder};
use ort::session::Session;
use std::path::Path;

use crate::ui;

pub use crate::cli::Provider;

/// Providers to attempt, in order, before settling on CPU
fn candidates(provider: Provider) -> Vec<Provider> {
	match provider {
		Provider::Auto if cfg!(target_os = "macos") => vec![Provider::Coreml, Provider::Xnnpack],
		Provider::Auto => vec![Provider::Tensorrt, Provider::Cuda, Provider::Xnnpack],
		Provider::Cpu => Vec::new(),
		explicit => vec![explicit],
	}
}

/// Builds an ONNX session for the embedding model. Returns the session and
/// the name of the provider it runs on; an unavailable provider falls back
/// to CPU.
pub fn create_session(model_path: &Path, provider: Provider) -> Result<(Session, &'static str)> {
	let mut builder = Session::builder().context("Failed to create session builder")?;

	let mut selected = "CPU";
	for candidate in candidates(provider) {
		if register(&mut builder, candidate) {
			selected = name(candidate);
			break;
		}
		if !matches!(provider, Provider::Auto) {
			ui::error(&format!("{} requested but unavailable, falling back to CPU", name(candidate)));
		}
	}

	if selected == "CPU" {
		ui::info("Using CPU execution provider");
	}

	let session = builder
		.with_optimization_level(GraphOptimizationLevel::Level3)?
		.with_intra_threads(4)?
		.commit_from_file(model_path)
		.context("Failed to load model")?;

	Ok((session, selected))
}

fn name(provider: Provider) -> &'static str {
	match provider {
		Provider::Auto | Provider::Cpu => "CPU",
		Provider::Cuda => "CUDA",
		Provider::Tensorrt => "TensorRT",
		Provider::Coreml => "CoreML",
		Provider::Xnnpack => "XNNPACK",
	}
}

macro_rules! try_provider {
	($builder:expr, $provider_type:ty, $name:expr) => {{
		use ort::ep::ExecutionProvider;

		crate::ui::debug(&format!("Trying provider: {}", $name));

		let provider = <$provider_type>::default();
		if !provider.is_available().unwrap_or(false) {
			crate::ui::debug(&format!("{} not available", $name));
			false
		} else {
			match provider.register($builder) {
				Ok(_) => {
					crate::ui::success(&format!("Using {} execution provider", $name));
					true
				}
				Err(e) => {
					crate::ui::debug(&format!("{} registration failed: {}", $name, e));
					false
				}
			}
		}
	}};
}

fn register(builder: &mut SessionBuilder, provider: Provider) -> bool {
	match provider {
		Provider::Auto | Provider::Cpu => false,
		Provider::Cuda => try_provider!(builder, ort::ep::CUDA, "CUDA"),
		Provider::Tensorrt => try_provider!(builder, ort::ep::TensorRT, "TensorRT"),
		#[cfg(target_os = "macos")]
		Provider::Coreml => try_provider!(builder, ort::ep::CoreML, "CoreML"),
		#[cfg(not(target_os = "macos"))]
		Provider::Coreml => {
			ui::debug("CoreML only available on macOS");
			false
		}
		Provider::Xnnpack => try_provider!(builder, ort::ep::XNNPACK, "XNNPACK"),
	}
}
