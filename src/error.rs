//! Error taxonomy for the grouping engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GroupingError {
	/// Clustering parameter outside its valid range
	#[error("invalid parameter: {0}")]
	InvalidParameter(String),

	/// Embedding model unavailable or inference failed
	#[error("embedding failed: {0}")]
	Embedding(String),

	/// Document store unreachable, unreadable or rejected a write
	#[error("store failure: {0}")]
	Store(String),

	/// Numeric routine failed on otherwise well-formed input
	#[error("clustering failed: {0}")]
	Clustering(String),
}

impl GroupingError {
	pub fn invalid(msg: impl Into<String>) -> Self {
		Self::InvalidParameter(msg.into())
	}

	pub fn store(msg: impl std::fmt::Display) -> Self {
		Self::Store(msg.to_string())
	}

	pub fn embedding(msg: impl std::fmt::Display) -> Self {
		Self::Embedding(msg.to_string())
	}

	/// Fatal errors need operator action; the rest are retried next cycle.
	pub fn is_fatal(&self) -> bool {
		matches!(self, Self::InvalidParameter(_) | Self::Embedding(_))
	}
}

pub type Result<T> = std::result::Result<T, GroupingError>;
