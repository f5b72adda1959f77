//! Document store access: input snapshot, derived collection, publishing

pub mod file;
pub mod memory;
pub mod mongo;
pub mod publisher;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use mongo::MongoStore;
pub use publisher::{PublishMode, Publisher};

use crate::core::{OutputRecord, TextItem};
use crate::error::Result;

/// The collection of labels to group. Read in full every cycle.
pub trait InputCollection {
	fn find_all(&self) -> Result<Vec<TextItem>>;
}

/// The derived collection, rebuilt from scratch on every change.
pub trait OutputCollection {
	fn find_all(&self) -> Result<Vec<OutputRecord>>;

	fn delete_all(&self) -> Result<()>;

	fn insert_many(&self, records: &[OutputRecord]) -> Result<()>;

	/// Replace the whole collection in one step, with no empty window
	/// visible to readers.
	fn swap_all(&self, records: &[OutputRecord]) -> Result<()>;
}
