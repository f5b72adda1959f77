//! DBSCAN over unit vectors, with noise promoted to singletons

use std::collections::VecDeque;

use linfa::traits::Transformer;
use linfa_clustering::Dbscan;
use ndarray::Array2;

use crate::core::{Cluster, Embedding};
use crate::error::{GroupingError, Result};

use super::distance::DistanceMatrix;

/// linfa rejects a zero tolerance; exact duplicates still fall inside this
const MIN_TOLERANCE: f64 = 1e-6;

/// L2 radius matching cosine distance `eps` on unit vectors (|a - b|² = 2·d)
pub fn l2_tolerance(eps: f32) -> f64 {
	(2.0 * eps as f64).sqrt().max(MIN_TOLERANCE)
}

/// Raw DBSCAN labels: `Some(cluster)` for dense members, `None` for noise.
///
/// A point's neighbourhood includes itself; a point is core when its
/// neighbourhood within `eps` holds at least `min_pts` points. With
/// `min_pts == 1` every point is core and clusters are the connected
/// components of the `eps` graph.
pub fn dbscan_labels(embeddings: &[Embedding], eps: f32, min_pts: usize) -> Result<Vec<Option<usize>>> {
	if embeddings.is_empty() {
		return Ok(Vec::new());
	}
	if min_pts <= 1 {
		return Ok(connected_components(&DistanceMatrix::build(embeddings), eps));
	}

	let points = observations(embeddings)?;
	let labels = Dbscan::params(min_pts)
		.tolerance(l2_tolerance(eps))
		.transform(&points)
		.map_err(|e| GroupingError::Clustering(format!("DBSCAN failed: {}", e)))?;

	Ok(labels.iter().copied().collect())
}

/// Dense clusters in discovery order, then one singleton per noise point.
pub fn dbscan(embeddings: &[Embedding], eps: f32, min_pts: usize) -> Result<Vec<Cluster>> {
	let labels = dbscan_labels(embeddings, eps, min_pts)?;
	let dense_count = labels.iter().flatten().max().map_or(0, |&c| c + 1);

	let mut dense: Vec<Vec<usize>> = vec![Vec::new(); dense_count];
	let mut outliers = Vec::new();
	for (idx, label) in labels.into_iter().enumerate() {
		match label {
			Some(c) => dense[c].push(idx),
			None => outliers.push(idx),
		}
	}

	Ok(dense
		.into_iter()
		.filter(|members| !members.is_empty())
		.map(Cluster::new)
		.chain(outliers.into_iter().map(Cluster::singleton))
		.collect())
}

fn observations(embeddings: &[Embedding]) -> Result<Array2<f64>> {
	let dim = embeddings[0].dim();
	if embeddings.iter().any(|e| e.dim() != dim) {
		return Err(GroupingError::Clustering(format!(
			"embedding dimension mismatch (expected {}D)",
			dim
		)));
	}

	let flat: Vec<f64> = embeddings
		.iter()
		.flat_map(|e| e.as_slice().iter().map(|&x| x as f64))
		.collect();
	Array2::from_shape_vec((embeddings.len(), dim), flat)
		.map_err(|e| GroupingError::Clustering(format!("cannot shape embeddings: {}", e)))
}

/// Breadth-first components where an edge is a distance of at most `eps`
fn connected_components(matrix: &DistanceMatrix, eps: f32) -> Vec<Option<usize>> {
	let n = matrix.len();
	let mut labels: Vec<Option<usize>> = vec![None; n];
	let mut next = 0;

	for start in 0..n {
		if labels[start].is_some() {
			continue;
		}
		labels[start] = Some(next);
		let mut queue = VecDeque::from([start]);
		while let Some(p) = queue.pop_front() {
			for q in 0..n {
				if labels[q].is_none() && matrix.get(p, q) <= eps {
					labels[q] = Some(next);
					queue.push_back(q);
				}
			}
		}
		next += 1;
	}

	labels
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::core::cluster::is_partition;

	fn at(degrees: f32) -> Embedding {
		let r = degrees.to_radians();
		Embedding::new(vec![r.cos(), r.sin()])
	}

	/// 0-1-2 form a chain 20° apart (distance ~0.06), 3 sits 35° past 2
	/// (~0.18), 4 points the other way
	fn points() -> Vec<Embedding> {
		vec![at(0.0), at(20.0), at(40.0), at(75.0), at(180.0)]
	}

	fn members(clusters: &[Cluster]) -> Vec<Vec<usize>> {
		clusters.iter().map(|c| c.members().to_vec()).collect()
	}

	#[test]
	fn test_tolerance_matches_cosine_distance() {
		let (a, b) = (at(0.0), at(60.0));
		let l2: f32 = a
			.as_slice()
			.iter()
			.zip(b.as_slice())
			.map(|(x, y)| (x - y) * (x - y))
			.sum::<f32>()
			.sqrt();
		assert!((l2 as f64 - l2_tolerance(a.distance(&b))).abs() < 1e-5);
		assert!((l2_tolerance(0.5) - 1.0).abs() < 1e-12);
		assert_eq!(l2_tolerance(0.0), MIN_TOLERANCE);
	}

	#[test]
	fn test_min_pts_one_links_chains() {
		let clusters = dbscan(&points(), 0.1, 1).unwrap();
		assert_eq!(members(&clusters), vec![vec![0, 1, 2], vec![3], vec![4]]);

		let wider = dbscan(&points(), 0.2, 1).unwrap();
		assert_eq!(members(&wider), vec![vec![0, 1, 2, 3], vec![4]]);
	}

	#[test]
	fn test_chain_expands_through_core_points() {
		let clusters = dbscan(&points(), 0.1, 2).unwrap();
		assert_eq!(members(&clusters), vec![vec![0, 1, 2], vec![3], vec![4]]);
		assert!(is_partition(&clusters, 5));
	}

	#[test]
	fn test_border_points_join_without_expanding() {
		// min_pts 3: only 1 is core ({0,1,2}); 0 and 2 are border points
		let labels = dbscan_labels(&points(), 0.1, 3).unwrap();
		assert_eq!(labels, vec![Some(0), Some(0), Some(0), None, None]);
	}

	#[test]
	fn test_noise_promoted_to_singletons() {
		let labels = dbscan_labels(&points(), 0.01, 2).unwrap();
		assert!(labels.iter().all(Option::is_none));

		let clusters = dbscan(&points(), 0.01, 2).unwrap();
		assert_eq!(clusters.len(), 5);
		assert!(clusters.iter().all(|c| c.len() == 1));
		assert!(is_partition(&clusters, 5));
	}

	#[test]
	fn test_noise_follows_dense_clusters() {
		let clusters = dbscan(&points(), 0.1, 3).unwrap();
		assert_eq!(members(&clusters), vec![vec![0, 1, 2], vec![3], vec![4]]);
	}

	#[test]
	fn test_zero_eps_groups_duplicates() {
		let embeddings = vec![at(10.0), at(90.0), at(10.0)];
		let clusters = dbscan(&embeddings, 0.0, 2).unwrap();
		assert_eq!(members(&clusters), vec![vec![0, 2], vec![1]]);

		let components = dbscan(&embeddings, 0.0, 1).unwrap();
		assert_eq!(members(&components), vec![vec![0, 2], vec![1]]);
	}

	#[test]
	fn test_empty_input() {
		assert!(dbscan(&[], 0.3, 2).unwrap().is_empty());
	}
}
