//! JSON-file document store
//!
//! A database is a directory; each collection is one JSON array file inside
//! it (`<root>/<database>/<collection>.json`).

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::{COLLECTION_EXT, INPUT_COLLECTION, OUTPUT_COLLECTION};
use crate::core::{OutputRecord, TextItem};
use crate::error::{GroupingError, Result};

use super::{InputCollection, OutputCollection};

#[derive(Debug, Clone)]
pub struct FileStore {
	dir: PathBuf,
	input: String,
	output: String,
}

impl FileStore {
	/// Opens (creating if needed) the database directory
	pub fn open(root: &Path, database: &str) -> Result<Self> {
		let dir = root.join(database);
		fs::create_dir_all(&dir)
			.map_err(|e| GroupingError::store(format!("cannot create {}: {}", dir.display(), e)))?;

		Ok(Self {
			dir,
			input: INPUT_COLLECTION.to_string(),
			output: OUTPUT_COLLECTION.to_string(),
		})
	}

	pub fn with_collections(mut self, input: &str, output: &str) -> Self {
		self.input = input.to_string();
		self.output = output.to_string();
		self
	}

	pub fn input_path(&self) -> PathBuf {
		self.collection_path(&self.input)
	}

	pub fn output_path(&self) -> PathBuf {
		self.collection_path(&self.output)
	}

	pub fn describe(&self, collection: &str) -> String {
		let db = self.dir.file_name().and_then(|n| n.to_str()).unwrap_or("?");
		format!("{}.{}", db, collection)
	}

	pub fn input_name(&self) -> &str {
		&self.input
	}

	pub fn output_name(&self) -> &str {
		&self.output
	}

	fn collection_path(&self, name: &str) -> PathBuf {
		self.dir.join(format!("{}.{}", name, COLLECTION_EXT))
	}
}

/// Missing file reads as an empty collection
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
	if !path.exists() {
		return Ok(Vec::new());
	}
	let bytes = fs::read(path)
		.map_err(|e| GroupingError::store(format!("cannot read {}: {}", path.display(), e)))?;
	if bytes.iter().all(u8::is_ascii_whitespace) {
		return Ok(Vec::new());
	}
	serde_json::from_slice(&bytes)
		.map_err(|e| GroupingError::store(format!("invalid JSON in {}: {}", path.display(), e)))
}

fn write_json<T: Serialize>(path: &Path, docs: &[T]) -> Result<()> {
	let bytes = serde_json::to_vec_pretty(docs)
		.map_err(|e| GroupingError::store(format!("cannot serialize documents: {}", e)))?;
	fs::write(path, bytes)
		.map_err(|e| GroupingError::store(format!("cannot write {}: {}", path.display(), e)))
}

impl InputCollection for FileStore {
	fn find_all(&self) -> Result<Vec<TextItem>> {
		read_json(&self.input_path())
	}
}

impl OutputCollection for FileStore {
	fn find_all(&self) -> Result<Vec<OutputRecord>> {
		read_json(&self.output_path())
	}

	fn delete_all(&self) -> Result<()> {
		write_json::<OutputRecord>(&self.output_path(), &[])
	}

	fn insert_many(&self, records: &[OutputRecord]) -> Result<()> {
		let path = self.output_path();
		let mut docs: Vec<OutputRecord> = read_json(&path)?;
		docs.extend_from_slice(records);
		write_json(&path, &docs)
	}

	/// Writes a shadow file next to the collection and renames it over the
	/// original; rename is atomic on the same filesystem.
	fn swap_all(&self, records: &[OutputRecord]) -> Result<()> {
		let path = self.output_path();
		let shadow = self.dir.join(format!(".{}.{}.tmp", self.output, COLLECTION_EXT));
		write_json(&shadow, records)?;
		fs::rename(&shadow, &path).map_err(|e| {
			GroupingError::store(format!("cannot swap {} into place: {}", path.display(), e))
		})
	}
}
