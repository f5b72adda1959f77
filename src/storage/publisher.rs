//! Replacing the derived collection with a freshly computed record set

use serde::{Deserialize, Serialize};

use crate::core::OutputRecord;
use crate::error::Result;
use crate::ui;

use super::OutputCollection;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishMode {
	/// Build the new collection aside and swap it in
	#[default]
	ShadowSwap,
	/// Delete everything, then insert. Readers can observe an empty
	/// collection between the two steps.
	ClearThenInsert,
}

pub struct Publisher<O: OutputCollection> {
	output: O,
	mode: PublishMode,
}

impl<O: OutputCollection> Publisher<O> {
	pub fn new(output: O, mode: PublishMode) -> Self {
		Self { output, mode }
	}

	/// Overwrites the derived collection with `records`. An empty slice
	/// leaves the collection empty.
	pub fn replace(&self, records: &[OutputRecord]) -> Result<()> {
		match self.mode {
			PublishMode::ShadowSwap => {
				ui::debug(&format!("Swapping in {} documents", records.len()));
				self.output.swap_all(records)
			}
			PublishMode::ClearThenInsert => {
				ui::debug("Clearing derived collection");
				self.output.delete_all()?;
				if !records.is_empty() {
					ui::debug(&format!("Inserting {} documents", records.len()));
					self.output.insert_many(records)?;
				}
				Ok(())
			}
		}
	}
}
