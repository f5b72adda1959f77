//! Agglomerative clustering with average linkage
//!
//! Starts from singletons and repeatedly merges the two closest clusters,
//! where cluster distance is the mean pairwise distance between members.
//! Linkage distances are maintained with the Lance-Williams update, so each
//! merge costs O(n) and the whole run O(n^3) in the worst case, which is fine
//! for label sets of a few hundred entries.

use crate::core::Cluster;

use super::distance::DistanceMatrix;

/// When to stop merging
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Criterion {
	/// Merge while the closest pair is at or below this distance
	Threshold(f32),
	/// Merge until exactly this many clusters remain
	Clusters(usize),
}

/// Runs average-linkage merging over `matrix` until `criterion` stops it.
///
/// Slots are indexed by their lowest member and a merge always folds the
/// higher slot into the lower one, so scanning pairs in ascending order and
/// keeping the first strict minimum breaks ties on the lowest index pair.
pub fn average_linkage(matrix: &DistanceMatrix, criterion: Criterion) -> Vec<Cluster> {
	let n = matrix.len();
	let mut dist: Vec<f64> = matrix.view().iter().map(|&d| d as f64).collect();
	let mut members: Vec<Vec<usize>> = (0..n).map(|i| vec![i]).collect();
	let mut active = vec![true; n];
	let mut remaining = n;

	while remaining > 1 {
		if let Criterion::Clusters(k) = criterion {
			if remaining <= k {
				break;
			}
		}

		let Some((a, b, d)) = closest_pair(&dist, &active, n) else {
			break;
		};

		if let Criterion::Threshold(t) = criterion {
			if d > t as f64 {
				break;
			}
		}

		let size_a = members[a].len() as f64;
		let size_b = members[b].len() as f64;
		for k in 0..n {
			if !active[k] || k == a || k == b {
				continue;
			}
			let merged = (size_a * dist[a * n + k] + size_b * dist[b * n + k]) / (size_a + size_b);
			dist[a * n + k] = merged;
			dist[k * n + a] = merged;
		}

		let absorbed = std::mem::take(&mut members[b]);
		members[a].extend(absorbed);
		active[b] = false;
		remaining -= 1;
	}

	members
		.into_iter()
		.zip(active)
		.filter_map(|(m, alive)| alive.then(|| Cluster::new(m)))
		.collect()
}

fn closest_pair(dist: &[f64], active: &[bool], n: usize) -> Option<(usize, usize, f64)> {
	let mut best: Option<(usize, usize, f64)> = None;
	for i in 0..n {
		if !active[i] {
			continue;
		}
		for j in (i + 1)..n {
			if !active[j] {
				continue;
			}
			let d = dist[i * n + j];
			if best.map_or(true, |(_, _, bd)| d < bd) {
				best = Some((i, j, d));
			}
		}
	}
	best
}
