//! Matrix command - print pairwise similarities for threshold tuning

use anyhow::{Context, Result};
use colored::*;

use crate::cli::{ModelArgs, Provider};
use crate::models::embed_dedup;
use crate::processing::DistanceMatrix;
use crate::ui;

const CELL: usize = 8;

pub fn run(words: &[String], distance: bool, threshold: f32, model: &ModelArgs, provider: Provider) -> Result<()> {
	let mut embedder = super::load_embedder(model, provider)?;

	let refs: Vec<&str> = words.iter().map(String::as_str).collect();
	let embeddings = embed_dedup(&mut embedder, &refs).context("Failed to embed words")?;
	let matrix = DistanceMatrix::build(&embeddings);

	ui::header(if distance { "Cosine Distance" } else { "Cosine Similarity" });

	for (i, word) in refs.iter().enumerate() {
		println!("  {} {}", format!("[{}]", i).dimmed(), word);
	}
	println!();

	let mut head = format!("{:>6}", "");
	for j in 0..matrix.len() {
		head.push_str(&format!("{:>width$}", format!("[{}]", j), width = CELL));
	}
	println!("{}", head.dimmed());

	for i in 0..matrix.len() {
		let mut line = format!("{}", format!("{:>6}", format!("[{}]", i)).dimmed());
		for j in 0..matrix.len() {
			let d = matrix.get(i, j);
			let value = if distance { d } else { matrix.similarity(i, j) };
			let cell = format!("{:>width$.3}", value, width = CELL);
			// Pairs that would merge directly at this threshold
			if i != j && d < threshold {
				line.push_str(&cell.bright_green().to_string());
			} else {
				line.push_str(&cell);
			}
		}
		println!("{}", line);
	}

	println!();
	println!(
		"{} distance < {} (similarity > {:.3}) highlighted",
		"Threshold:".bright_white().bold(),
		threshold.to_string().bright_blue(),
		1.0 - threshold
	);
	Ok(())
}
