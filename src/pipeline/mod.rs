//! # Grouping Pipeline
//!
//! One cycle: fetch the input snapshot, skip if its fingerprint is unchanged,
//! otherwise embed, cluster, assign weights and publish.

pub mod scheduler;

pub use scheduler::{RunStats, Scheduler, Shutdown};

use std::time::Instant;

use crate::core::cluster::{is_partition, sizes};
use crate::core::{Cluster, Fingerprint, TextItem};
use crate::error::{GroupingError, Result};
use crate::models::{embed_dedup, Embedder};
use crate::processing::{assign_weights, pair_consecutive, Clusterer, OutputMode};
use crate::storage::{InputCollection, OutputCollection, Publisher};
use crate::ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
	Idle,
	Fetching,
	Embedding,
	Clustering,
	Publishing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
	pub items: usize,
	pub groups: usize,
	pub records: usize,
	pub fingerprint: Fingerprint,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
	/// Snapshot matches the last published one
	Unchanged,
	Published(CycleReport),
}

/// Everything one cycle needs, built once at startup and owned by the loop.
pub struct GroupingPipeline<E, I, O>
where
	E: Embedder,
	I: InputCollection,
	O: OutputCollection,
{
	embedder: E,
	input: I,
	publisher: Publisher<O>,
	clusterer: Clusterer,
	mode: OutputMode,
	last_published: Option<Fingerprint>,
	state: CycleState,
}

impl<E, I, O> GroupingPipeline<E, I, O>
where
	E: Embedder,
	I: InputCollection,
	O: OutputCollection,
{
	pub fn new(embedder: E, input: I, publisher: Publisher<O>, clusterer: Clusterer, mode: OutputMode) -> Self {
		Self {
			embedder,
			input,
			publisher,
			clusterer,
			mode,
			last_published: None,
			state: CycleState::Idle,
		}
	}

	pub fn state(&self) -> CycleState {
		self.state
	}

	pub fn last_published(&self) -> Option<Fingerprint> {
		self.last_published
	}

	/// Runs one cycle and always returns to `Idle`. A failed cycle publishes
	/// nothing and leaves the last fingerprint untouched, so the next cycle
	/// retries in full.
	pub fn cycle(&mut self) -> Result<CycleOutcome> {
		let result = self.run_cycle();
		self.state = CycleState::Idle;
		result
	}

	fn run_cycle(&mut self) -> Result<CycleOutcome> {
		self.state = CycleState::Fetching;
		let items = self.input.find_all()?;
		let fingerprint = Fingerprint::of(&items);

		if self.last_published == Some(fingerprint) {
			ui::debug(&format!("No change ({})", fingerprint.short()));
			return Ok(CycleOutcome::Unchanged);
		}

		ui::info(&format!(
			"Detected change in input ({} items, {})",
			items.len(),
			fingerprint.short()
		));

		let (records, groups) = if items.is_empty() {
			ui::info("No messages found, clearing derived collection");
			(Vec::new(), 0)
		} else {
			match self.mode {
				OutputMode::Weighted => {
					let clusters = self.group(&items)?;
					log_groups(&items, &clusters);
					(assign_weights(&items, &clusters), clusters.len())
				}
				OutputMode::Paired => (pair_consecutive(&items), items.len().div_ceil(2)),
			}
		};

		self.state = CycleState::Publishing;
		self.publisher.replace(&records)?;
		self.last_published = Some(fingerprint);

		ui::success(&format!(
			"Published {} documents in {} groups from {} items",
			records.len(),
			groups,
			items.len()
		));

		Ok(CycleOutcome::Published(CycleReport {
			items: items.len(),
			groups,
			records: records.len(),
			fingerprint,
		}))
	}

	fn group(&mut self, items: &[TextItem]) -> Result<Vec<Cluster>> {
		self.state = CycleState::Embedding;
		let start = Instant::now();
		let words: Vec<&str> = items.iter().map(|item| item.word.as_str()).collect();
		let embeddings = embed_dedup(&mut self.embedder, &words)?;
		ui::debug(&format!(
			"Embedded {} items in {}ms",
			embeddings.len(),
			start.elapsed().as_millis()
		));

		self.state = CycleState::Clustering;
		let clusters = self.clusterer.cluster(&embeddings)?;

		if !is_partition(&clusters, items.len()) {
			return Err(GroupingError::Clustering(format!(
				"{} groups do not partition {} items",
				clusters.len(),
				items.len()
			)));
		}

		Ok(clusters)
	}
}

fn log_groups(items: &[TextItem], clusters: &[Cluster]) {
	ui::header("Grouping Results");
	for (i, cluster) in clusters.iter().enumerate() {
		let words: Vec<&str> = cluster.members().iter().map(|&idx| items[idx].word.as_str()).collect();
		ui::group(i + 1, &words);
		for &idx in cluster.members() {
			ui::debug(&format!("{}, {}, {}", items[idx].id, items[idx].word, cluster.len()));
		}
	}
	println!();
	ui::debug(&format!("Group sizes: {:?}", sizes(clusters)));
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::core::Embedding;
	use crate::processing::Strategy;
	use crate::storage::{MemoryStore, PublishMode};
	use std::cell::Cell;
	use std::rc::Rc;

	/// Words sharing a first character point the same way
	struct InitialEmbedder {
		calls: Rc<Cell<usize>>,
		fail: bool,
	}

	impl Embedder for InitialEmbedder {
		fn embed(&mut self, text: &str) -> Result<Embedding> {
			if self.fail {
				return Err(GroupingError::embedding("model offline"));
			}
			self.calls.set(self.calls.get() + 1);
			let c = text.chars().next().map_or(0, |c| c as u32);
			let angle = (c % 360) as f32 * std::f32::consts::PI / 180.0;
			Ok(Embedding::new(vec![angle.cos(), angle.sin()]))
		}
	}

	fn pipeline(
		store: &MemoryStore,
		mode: OutputMode,
	) -> (GroupingPipeline<InitialEmbedder, MemoryStore, MemoryStore>, Rc<Cell<usize>>) {
		let calls = Rc::new(Cell::new(0));
		let embedder = InitialEmbedder {
			calls: calls.clone(),
			fail: false,
		};
		let p = GroupingPipeline::new(
			embedder,
			store.clone(),
			Publisher::new(store.clone(), PublishMode::ShadowSwap),
			Clusterer::new(Strategy::threshold(0.01)).unwrap(),
			mode,
		);
		(p, calls)
	}

	fn items(pairs: &[(&str, &str)]) -> Vec<TextItem> {
		pairs.iter().map(|(id, w)| TextItem::new(*id, *w)).collect()
	}

	#[test]
	fn test_unchanged_snapshot_is_skipped() {
		let store = MemoryStore::with_items(items(&[("1", "apple"), ("2", "avocado"), ("3", "kiwi")]));
		let (mut p, calls) = pipeline(&store, OutputMode::Weighted);

		let first = p.cycle().unwrap();
		assert!(matches!(first, CycleOutcome::Published(ref r) if r.groups == 2 && r.records == 3));
		assert_eq!(calls.get(), 3);

		assert_eq!(p.cycle().unwrap(), CycleOutcome::Unchanged);
		assert_eq!(calls.get(), 3);
		assert_eq!(p.state(), CycleState::Idle);
	}

	#[test]
	fn test_reordered_snapshot_is_skipped() {
		let store = MemoryStore::with_items(items(&[("1", "apple"), ("2", "kiwi")]));
		let (mut p, _) = pipeline(&store, OutputMode::Weighted);
		p.cycle().unwrap();

		store.set_items(items(&[("2", "kiwi"), ("1", "apple")]));
		assert_eq!(p.cycle().unwrap(), CycleOutcome::Unchanged);
	}

	#[test]
	fn test_change_triggers_recompute() {
		let store = MemoryStore::with_items(items(&[("1", "apple")]));
		let (mut p, _) = pipeline(&store, OutputMode::Weighted);
		p.cycle().unwrap();

		store.push_item(TextItem::new("2", "avocado"));
		let outcome = p.cycle().unwrap();
		assert!(matches!(outcome, CycleOutcome::Published(ref r) if r.groups == 1 && r.records == 2));
		assert!(store.output().iter().all(|r| r.weight() == Some(2)));
	}

	#[test]
	fn test_empty_input_clears_output() {
		let store = MemoryStore::new();
		store.swap_all(&assign_weights(&items(&[("1", "stale")]), &[Cluster::singleton(0)])).unwrap();

		let (mut p, calls) = pipeline(&store, OutputMode::Weighted);
		let outcome = p.cycle().unwrap();

		assert!(matches!(outcome, CycleOutcome::Published(ref r) if r.records == 0 && r.groups == 0));
		assert!(store.output().is_empty());
		assert_eq!(calls.get(), 0);
	}

	#[test]
	fn test_failed_cycle_is_retried() {
		let store = MemoryStore::with_items(items(&[("1", "apple"), ("2", "kiwi")]));
		let mut p = GroupingPipeline::new(
			InitialEmbedder {
				calls: Rc::new(Cell::new(0)),
				fail: true,
			},
			store.clone(),
			Publisher::new(store.clone(), PublishMode::ShadowSwap),
			Clusterer::new(Strategy::threshold(0.01)).unwrap(),
			OutputMode::Weighted,
		);

		assert!(matches!(p.cycle(), Err(GroupingError::Embedding(_))));
		assert_eq!(p.state(), CycleState::Idle);
		assert!(p.last_published().is_none());
		assert!(store.observed_lengths().is_empty());

		p.embedder.fail = false;
		assert!(matches!(p.cycle().unwrap(), CycleOutcome::Published(_)));
	}

	#[test]
	fn test_paired_mode_skips_embedding() {
		let store = MemoryStore::with_items(items(&[("1", "a"), ("2", "b"), ("3", "c")]));
		let (mut p, calls) = pipeline(&store, OutputMode::Paired);

		let outcome = p.cycle().unwrap();
		assert!(matches!(outcome, CycleOutcome::Published(ref r) if r.groups == 2 && r.records == 3));
		assert_eq!(calls.get(), 0);
		assert!(store.output().iter().all(|r| r.weight().is_none()));
	}
}
