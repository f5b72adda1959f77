//! Cluster membership to derived records

use serde::{Deserialize, Serialize};

use crate::core::{Cluster, CorrelationRecord, GroupRecord, OutputRecord, TextItem};

/// Shape of the derived collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
	/// `{word, weight}` with weight = group size
	#[default]
	Weighted,
	/// Legacy `{word, group_number}`, consecutive items paired two at a time
	Paired,
}

impl OutputMode {
	/// Paired output ignores the clustering result entirely.
	pub fn needs_clustering(&self) -> bool {
		matches!(self, Self::Weighted)
	}
}

/// One record per item, weight = size of the cluster holding it.
/// Records follow cluster order, then item order within each cluster.
pub fn assign_weights(items: &[TextItem], clusters: &[Cluster]) -> Vec<OutputRecord> {
	clusters
		.iter()
		.flat_map(|cluster| {
			let weight = cluster.len() as u32;
			cluster.members().iter().map(move |&idx| {
				OutputRecord::Weighted(CorrelationRecord {
					word: items[idx].word.clone(),
					weight,
				})
			})
		})
		.collect()
}

/// Items 0 and 1 get group 1, items 2 and 3 get group 2, and so on.
pub fn pair_consecutive(items: &[TextItem]) -> Vec<OutputRecord> {
	items
		.iter()
		.enumerate()
		.map(|(i, item)| {
			OutputRecord::Numbered(GroupRecord {
				word: item.word.clone(),
				group_number: (i / 2 + 1) as u32,
			})
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn items(words: &[&str]) -> Vec<TextItem> {
		words
			.iter()
			.enumerate()
			.map(|(i, w)| TextItem::new(i.to_string(), *w))
			.collect()
	}

	#[test]
	fn test_weight_is_group_size() {
		let items = items(&["大根", "りんご", "人参"]);
		let clusters = vec![Cluster::new(vec![0, 2]), Cluster::singleton(1)];
		let records = assign_weights(&items, &clusters);

		let pairs: Vec<(&str, Option<u32>)> = records.iter().map(|r| (r.word(), r.weight())).collect();
		assert_eq!(pairs, vec![("大根", Some(2)), ("人参", Some(2)), ("りんご", Some(1))]);
	}

	#[test]
	fn test_duplicate_words_fan_out() {
		let items = items(&["野菜", "野菜"]);
		let records = assign_weights(&items, &[Cluster::new(vec![0, 1])]);
		assert_eq!(records.len(), 2);
		assert!(records.iter().all(|r| r.word() == "野菜" && r.weight() == Some(2)));
	}

	#[test]
	fn test_no_clusters_no_records() {
		assert!(assign_weights(&[], &[]).is_empty());
	}

	#[test]
	fn test_pairing() {
		let records = pair_consecutive(&items(&["a", "b", "c", "d", "e"]));
		let numbers: Vec<u32> = records
			.iter()
			.map(|r| match r {
				OutputRecord::Numbered(g) => g.group_number,
				OutputRecord::Weighted(_) => unreachable!(),
			})
			.collect();
		assert_eq!(numbers, vec![1, 1, 2, 2, 3]);
		assert!(!OutputMode::Paired.needs_clustering());
		assert!(OutputMode::default().needs_clustering());
	}
}
