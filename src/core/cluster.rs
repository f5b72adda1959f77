//! Cluster data structures shared by both clustering strategies

use serde::{Deserialize, Serialize};

/// A non-empty group of input indices, ascending
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
	members: Vec<usize>,
}

impl Cluster {
	/// Members are sorted so output follows input order.
	pub fn new(mut members: Vec<usize>) -> Self {
		members.sort_unstable();
		Self { members }
	}

	pub fn singleton(index: usize) -> Self {
		Self { members: vec![index] }
	}

	pub fn members(&self) -> &[usize] {
		&self.members
	}

	pub fn len(&self) -> usize {
		self.members.len()
	}

	pub fn is_empty(&self) -> bool {
		self.members.is_empty()
	}
}

/// True when `clusters` cover `0..n` exactly once with no empty cluster
pub fn is_partition(clusters: &[Cluster], n: usize) -> bool {
	let mut seen = vec![false; n];
	for cluster in clusters {
		if cluster.is_empty() {
			return false;
		}
		for &idx in cluster.members() {
			if idx >= n || seen[idx] {
				return false;
			}
			seen[idx] = true;
		}
	}
	seen.into_iter().all(|s| s)
}

/// Group sizes, largest first
pub fn sizes(clusters: &[Cluster]) -> Vec<usize> {
	let mut sizes: Vec<usize> = clusters.iter().map(Cluster::len).collect();
	sizes.sort_unstable_by(|a, b| b.cmp(a));
	sizes
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_members_sorted() {
		let c = Cluster::new(vec![4, 1, 3]);
		assert_eq!(c.members(), &[1, 3, 4]);
	}

	#[test]
	fn test_partition_check() {
		let ok = vec![Cluster::new(vec![0, 2]), Cluster::singleton(1)];
		assert!(is_partition(&ok, 3));

		let overlap = vec![Cluster::new(vec![0, 1]), Cluster::new(vec![1, 2])];
		assert!(!is_partition(&overlap, 3));

		let missing = vec![Cluster::new(vec![0, 1])];
		assert!(!is_partition(&missing, 3));

		let empty = vec![Cluster::new(vec![0, 1, 2]), Cluster::new(vec![])];
		assert!(!is_partition(&empty, 3));

		assert!(is_partition(&[], 0));
	}

	#[test]
	fn test_sizes_descending() {
		let clusters = vec![
			Cluster::singleton(5),
			Cluster::new(vec![0, 1, 2, 3, 4]),
		];
		assert_eq!(sizes(&clusters), vec![5, 1]);
	}
}
