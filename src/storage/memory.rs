//! In-memory document store, shared between clones

use std::sync::{Arc, RwLock};

use crate::core::{OutputRecord, TextItem};
use crate::error::{GroupingError, Result};

use super::{InputCollection, OutputCollection};

#[derive(Default)]
struct Collections {
	input: Vec<TextItem>,
	output: Vec<OutputRecord>,
	/// Output length after every write, in order
	observed: Vec<usize>,
}

/// Both collections behind one lock. Clones share the same data, so a test
/// can keep a handle while the pipeline owns another.
#[derive(Clone, Default)]
pub struct MemoryStore {
	inner: Arc<RwLock<Collections>>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_items(items: Vec<TextItem>) -> Self {
		let store = Self::new();
		store.set_items(items);
		store
	}

	pub fn set_items(&self, items: Vec<TextItem>) {
		if let Ok(mut c) = self.inner.write() {
			c.input = items;
		}
	}

	pub fn push_item(&self, item: TextItem) {
		if let Ok(mut c) = self.inner.write() {
			c.input.push(item);
		}
	}

	pub fn output(&self) -> Vec<OutputRecord> {
		self.inner.read().map(|c| c.output.clone()).unwrap_or_default()
	}

	/// Output sizes a reader could have seen, one entry per write
	pub fn observed_lengths(&self) -> Vec<usize> {
		self.inner.read().map(|c| c.observed.clone()).unwrap_or_default()
	}

	fn write<F: FnOnce(&mut Collections)>(&self, f: F) -> Result<()> {
		let mut c = self
			.inner
			.write()
			.map_err(|_| GroupingError::store("memory store lock poisoned"))?;
		f(&mut *c);
		let len = c.output.len();
		c.observed.push(len);
		Ok(())
	}
}

impl InputCollection for MemoryStore {
	fn find_all(&self) -> Result<Vec<TextItem>> {
		self.inner
			.read()
			.map(|c| c.input.clone())
			.map_err(|_| GroupingError::store("memory store lock poisoned"))
	}
}

impl OutputCollection for MemoryStore {
	fn find_all(&self) -> Result<Vec<OutputRecord>> {
		self.inner
			.read()
			.map(|c| c.output.clone())
			.map_err(|_| GroupingError::store("memory store lock poisoned"))
	}

	fn delete_all(&self) -> Result<()> {
		self.write(|c| c.output.clear())
	}

	fn insert_many(&self, records: &[OutputRecord]) -> Result<()> {
		self.write(|c| c.output.extend_from_slice(records))
	}

	fn swap_all(&self, records: &[OutputRecord]) -> Result<()> {
		self.write(|c| c.output = records.to_vec())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::core::CorrelationRecord;

	fn record(word: &str, weight: u32) -> OutputRecord {
		OutputRecord::Weighted(CorrelationRecord {
			word: word.into(),
			weight,
		})
	}

	#[test]
	fn test_clones_share_state() {
		let store = MemoryStore::with_items(vec![TextItem::new("1", "大根")]);
		let handle = store.clone();
		handle.push_item(TextItem::new("2", "人参"));

		assert_eq!(InputCollection::find_all(&store).unwrap().len(), 2);
	}

	#[test]
	fn test_output_writes() {
		let store = MemoryStore::new();
		store.insert_many(&[record("a", 1)]).unwrap();
		store.insert_many(&[record("b", 1)]).unwrap();
		assert_eq!(store.output().len(), 2);

		store.swap_all(&[record("c", 3)]).unwrap();
		assert_eq!(store.output(), vec![record("c", 3)]);

		store.delete_all().unwrap();
		assert!(OutputCollection::find_all(&store).unwrap().is_empty());
		assert_eq!(store.observed_lengths(), vec![1, 2, 1, 0]);
	}
}
