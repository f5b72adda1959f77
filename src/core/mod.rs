//! Core domain types

pub mod cluster;
pub mod embedding;
pub mod hash;
pub mod item;

pub use cluster::Cluster;
pub use embedding::Embedding;
pub use hash::Fingerprint;
pub use item::{CorrelationRecord, GroupRecord, ItemId, OutputRecord, TextItem};
