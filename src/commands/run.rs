//! Run command - the polling daemon

use anyhow::{Context, Result};
use std::time::Duration;

use crate::cli::{ClusterArgs, ModelArgs, ModeArg, Provider, PublishArg, StoreArgs};
use crate::models::E5Embedder;
use crate::pipeline::{GroupingPipeline, RunStats, Scheduler, Shutdown};
use crate::processing::{Clusterer, OutputMode};
use crate::storage::{FileStore, InputCollection, MongoStore, OutputCollection, PublishMode, Publisher};
use crate::ui;

#[allow(clippy::too_many_arguments)]
pub fn run(
	store: &StoreArgs,
	clustering: &ClusterArgs,
	model: &ModelArgs,
	provider: Provider,
	interval: u64,
	retry_delay: u64,
	mode: ModeArg,
	publish: PublishArg,
) -> Result<()> {
	ui::print_logo();

	let mode = OutputMode::from(mode);
	let publish = PublishMode::from(publish);
	let strategy = clustering.strategy();
	let clusterer = Clusterer::new(strategy).context("Invalid clustering parameters")?;

	ui::debug(&format!(
		"Config: store={}, db={}, mode={:?}, publish={:?}, {}",
		if store.uri.is_some() { "mongodb".to_string() } else { store.root.display().to_string() },
		store.database,
		mode,
		publish,
		strategy.describe()
	));

	if !mode.needs_clustering() {
		ui::warn("Paired mode groups by position; clustering options are ignored");
	}

	// A missing model is fatal; store and clustering errors are retried per cycle
	let embedder = super::load_embedder(model, provider)?;

	let scheduler = Scheduler::new(Duration::from_secs(interval), Duration::from_secs(retry_delay));
	let shutdown = Shutdown::new();
	shutdown.on_interrupt().context("Failed to install Ctrl-C handler")?;

	let stats = match &store.uri {
		Some(uri) => {
			let mongo = MongoStore::connect(uri, &store.database)
				.context("Failed to open MongoDB store")?
				.with_collections(&store.input, &store.output);
			ui::info(&format!(
				"Watching {} -> {}",
				mongo.describe(mongo.input_name()),
				mongo.describe(mongo.output_name())
			));
			watch(embedder, mongo, clusterer, mode, publish, &scheduler, &shutdown)
		}
		None => {
			let files = FileStore::open(&store.root, &store.database)
				.context("Failed to open document store")?
				.with_collections(&store.input, &store.output);
			ui::info(&format!(
				"Watching {} -> {}",
				files.describe(files.input_name()),
				files.describe(files.output_name())
			));
			watch(embedder, files, clusterer, mode, publish, &scheduler, &shutdown)
		}
	};

	ui::info(&format!(
		"Stopped: {} cycles, {} published, {} failed",
		stats.cycles, stats.published, stats.failed
	));
	Ok(())
}

/// One store serves as both the input and the derived collection
fn watch<S>(
	embedder: E5Embedder,
	store: S,
	clusterer: Clusterer,
	mode: OutputMode,
	publish: PublishMode,
	scheduler: &Scheduler,
	shutdown: &Shutdown,
) -> RunStats
where
	S: InputCollection + OutputCollection + Clone,
{
	let publisher = Publisher::new(store.clone(), publish);
	let mut pipeline = GroupingPipeline::new(embedder, store, publisher, clusterer, mode);
	scheduler.run(&mut pipeline, shutdown)
}
