//! Content fingerprint of an input snapshot

use xxhash_rust::xxh3::xxh3_128;

use super::TextItem;

/// Order-independent digest of all `(id, word)` pairs in a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(u128);

impl Fingerprint {
	/// Sorts `(id type, id, word)` triples canonically, serializes them as
	/// JSON and hashes the bytes. Duplicates are kept, so the digest tracks
	/// the multiset.
	pub fn of(items: &[TextItem]) -> Self {
		let mut triples: Vec<(&str, String, &str)> = items
			.iter()
			.map(|item| (item.id.kind(), item.id.to_string(), item.word.as_str()))
			.collect();
		triples.sort_unstable();

		// Serializing a Vec of string tuples cannot fail
		let canonical = serde_json::to_vec(&triples).unwrap_or_default();
		Self(xxh3_128(&canonical))
	}

	pub fn short(&self) -> String {
		format!("{:032x}", self.0)[..8].to_string()
	}
}

impl std::fmt::Display for Fingerprint {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:032x}", self.0)
	}
}
