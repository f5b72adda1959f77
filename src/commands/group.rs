//! Group command - run one grouping cycle over words given on the command line

use anyhow::{Context, Result};
use colored::*;

use crate::cli::{ClusterArgs, ModelArgs, Provider};
use crate::core::TextItem;
use crate::pipeline::{CycleOutcome, GroupingPipeline};
use crate::processing::{Clusterer, OutputMode};
use crate::storage::{MemoryStore, PublishMode, Publisher};
use crate::ui;

pub fn run(words: &[String], clustering: &ClusterArgs, model: &ModelArgs, provider: Provider) -> Result<()> {
	let clusterer = Clusterer::new(clustering.strategy()).context("Invalid clustering parameters")?;
	ui::info(&format!("Strategy: {}", clusterer.strategy().describe()));

	let embedder = super::load_embedder(model, provider)?;

	let items: Vec<TextItem> = words
		.iter()
		.enumerate()
		.map(|(i, word)| TextItem::new((i + 1).to_string(), word.as_str()))
		.collect();
	let store = MemoryStore::with_items(items);
	let publisher = Publisher::new(store.clone(), PublishMode::ShadowSwap);
	let mut pipeline = GroupingPipeline::new(embedder, store.clone(), publisher, clusterer, OutputMode::Weighted);

	let CycleOutcome::Published(report) = pipeline.cycle().context("Grouping failed")? else {
		// A fresh pipeline has never published, so the first cycle always does
		return Ok(());
	};

	ui::header("Weights");
	let width = words.iter().map(|w| w.chars().count()).max().unwrap_or(0);
	for record in store.output() {
		let weight = record.weight().unwrap_or(0);
		let padding = width.saturating_sub(record.word().chars().count());
		println!(
			"  {}{}  {}",
			record.word(),
			" ".repeat(padding),
			weight.to_string().bright_blue()
		);
	}

	println!();
	println!(
		"{} {} groups from {} words {}",
		"Total:".bright_white().bold(),
		report.groups.to_string().bright_blue(),
		report.items.to_string().bright_blue(),
		format!("(fingerprint {})", report.fingerprint.short()).dimmed()
	);

	Ok(())
}
