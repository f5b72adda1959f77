//! # Embedding Models
//!
//! The `Embedder` seam plus the ONNX-backed E5 text encoder.

pub mod manager;
pub mod text;

pub use manager::E5Embedder;

use std::collections::HashMap;

use crate::core::Embedding;
use crate::error::Result;

/// Turns text into unit-length vectors. Must be deterministic for a fixed
/// model and input.
pub trait Embedder {
	fn embed(&mut self, text: &str) -> Result<Embedding>;

	fn embed_batch(&mut self, texts: &[&str]) -> Result<Vec<Embedding>> {
		texts.iter().map(|text| self.embed(text)).collect()
	}
}

/// Embeds each distinct word once and fans the vectors back out, one per input.
pub fn embed_dedup<E: Embedder + ?Sized>(embedder: &mut E, words: &[&str]) -> Result<Vec<Embedding>> {
	let mut distinct: Vec<&str> = Vec::new();
	let mut slot: HashMap<&str, usize> = HashMap::new();
	for &word in words {
		slot.entry(word).or_insert_with(|| {
			distinct.push(word);
			distinct.len() - 1
		});
	}

	let vectors = embedder.embed_batch(&distinct)?;
	Ok(words.iter().map(|w| vectors[slot[w]].clone()).collect())
}
