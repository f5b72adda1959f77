//! MongoDB document store (blocking driver)
//!
//! Input documents are read as raw BSON so `_id` keeps its type. The derived
//! collection is written through serde.

use mongodb::bson::{doc, Bson, Document};
use mongodb::options::FindOptions;
use mongodb::sync::{Client, Collection, Database};

use crate::config::{INPUT_COLLECTION, OUTPUT_COLLECTION};
use crate::core::{ItemId, OutputRecord, TextItem};
use crate::error::{GroupingError, Result};

use super::{InputCollection, OutputCollection};

/// Suffix of the collection a shadow swap is staged in
const SHADOW_SUFFIX: &str = "_shadow";

#[derive(Clone)]
pub struct MongoStore {
	client: Client,
	db: Database,
	input: String,
	output: String,
}

impl MongoStore {
	/// Parses `uri` and selects `database`. The driver connects lazily, so an
	/// unreachable server surfaces as a store failure on the first cycle.
	pub fn connect(uri: &str, database: &str) -> Result<Self> {
		let client = Client::with_uri_str(uri).map_err(|e| GroupingError::store(format!("invalid MongoDB URI: {}", e)))?;
		let db = client.database(database);

		Ok(Self {
			client,
			db,
			input: INPUT_COLLECTION.to_string(),
			output: OUTPUT_COLLECTION.to_string(),
		})
	}

	pub fn with_collections(mut self, input: &str, output: &str) -> Self {
		self.input = input.to_string();
		self.output = output.to_string();
		self
	}

	pub fn describe(&self, collection: &str) -> String {
		format!("{}.{}", self.db.name(), collection)
	}

	pub fn input_name(&self) -> &str {
		&self.input
	}

	pub fn output_name(&self) -> &str {
		&self.output
	}

	fn shadow_name(&self) -> String {
		format!("{}{}", self.output, SHADOW_SUFFIX)
	}

	fn records(&self, name: &str) -> Collection<OutputRecord> {
		self.db.collection(name)
	}
}

/// Converts one input document. `_id` keeps its BSON type; a missing or
/// non-string `word` fails the snapshot.
pub fn item_from_document(doc: &Document) -> Result<TextItem> {
	let id = match doc.get("_id") {
		Some(Bson::ObjectId(oid)) => ItemId::ObjectId(oid.to_hex()),
		Some(Bson::String(s)) => ItemId::Text(s.clone()),
		Some(Bson::Int32(n)) => ItemId::Int(i64::from(*n)),
		Some(Bson::Int64(n)) => ItemId::Int(*n),
		Some(other) => ItemId::Other(other.to_string()),
		None => return Err(GroupingError::store("input document without _id")),
	};

	let word = doc
		.get_str("word")
		.map_err(|e| GroupingError::store(format!("document {} has no usable word: {}", id, e)))?;

	Ok(TextItem::new(id, word))
}

impl InputCollection for MongoStore {
	fn find_all(&self) -> Result<Vec<TextItem>> {
		let options = FindOptions::builder().projection(doc! { "_id": 1, "word": 1 }).build();
		let cursor = self
			.db
			.collection::<Document>(&self.input)
			.find(None, options)
			.map_err(|e| GroupingError::store(format!("find on {} failed: {}", self.describe(&self.input), e)))?;

		cursor
			.map(|doc| {
				let doc = doc.map_err(|e| GroupingError::store(format!("cursor on {} failed: {}", self.input, e)))?;
				item_from_document(&doc)
			})
			.collect()
	}
}

impl OutputCollection for MongoStore {
	fn find_all(&self) -> Result<Vec<OutputRecord>> {
		let cursor = self
			.records(&self.output)
			.find(None, None)
			.map_err(|e| GroupingError::store(format!("find on {} failed: {}", self.describe(&self.output), e)))?;

		cursor
			.map(|r| r.map_err(|e| GroupingError::store(format!("cursor on {} failed: {}", self.output, e))))
			.collect()
	}

	fn delete_all(&self) -> Result<()> {
		self.records(&self.output)
			.delete_many(doc! {}, None)
			.map(|_| ())
			.map_err(|e| GroupingError::store(format!("delete_many on {} failed: {}", self.describe(&self.output), e)))
	}

	fn insert_many(&self, records: &[OutputRecord]) -> Result<()> {
		// The driver rejects an empty batch
		if records.is_empty() {
			return Ok(());
		}
		self.records(&self.output)
			.insert_many(records, None)
			.map(|_| ())
			.map_err(|e| GroupingError::store(format!("insert_many on {} failed: {}", self.describe(&self.output), e)))
	}

	/// Stages `records` in a shadow collection, then renames it over the
	/// derived collection with `dropTarget`. An empty set has nothing to
	/// rename, so the target is cleared instead.
	fn swap_all(&self, records: &[OutputRecord]) -> Result<()> {
		if records.is_empty() {
			return self.delete_all();
		}

		let shadow = self.shadow_name();
		let staged = self.records(&shadow);
		staged
			.drop(None)
			.map_err(|e| GroupingError::store(format!("cannot reset {}: {}", self.describe(&shadow), e)))?;
		staged
			.insert_many(records, None)
			.map_err(|e| GroupingError::store(format!("cannot stage {}: {}", self.describe(&shadow), e)))?;

		let rename = doc! {
			"renameCollection": self.describe(&shadow),
			"to": self.describe(&self.output),
			"dropTarget": true,
		};
		self.client
			.database("admin")
			.run_command(rename, None)
			.map(|_| ())
			.map_err(|e| GroupingError::store(format!("cannot swap {} into place: {}", self.describe(&self.output), e)))
	}
}
