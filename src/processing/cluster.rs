//! Clustering strategy selection and dispatch

use serde::{Deserialize, Serialize};

use crate::core::{Cluster, Embedding};
use crate::error::{GroupingError, Result};

use super::density::dbscan;
use super::distance::DistanceMatrix;
use super::hierarchical::{average_linkage, Criterion};

/// Upper bound of cosine distance
pub const MAX_DISTANCE: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Strategy {
	/// Average-linkage agglomerative clustering
	Hierarchical {
		threshold: Option<f32>,
		clusters: Option<usize>,
	},
	/// DBSCAN, noise promoted to singleton groups
	Density { eps: f32, min_pts: usize },
}

impl Strategy {
	pub fn threshold(t: f32) -> Self {
		Self::Hierarchical {
			threshold: Some(t),
			clusters: None,
		}
	}

	pub fn clusters(k: usize) -> Self {
		Self::Hierarchical {
			threshold: None,
			clusters: Some(k),
		}
	}

	pub fn density(eps: f32, min_pts: usize) -> Self {
		Self::Density { eps, min_pts }
	}

	/// Checks every parameter against its valid range
	pub fn validate(&self) -> Result<()> {
		match *self {
			Self::Hierarchical { threshold, clusters } => {
				self.criterion()?;
				if let Some(t) = threshold {
					check_distance("threshold", t)?;
				}
				if clusters == Some(0) {
					return Err(GroupingError::invalid("cluster count must be at least 1"));
				}
				Ok(())
			}
			Self::Density { eps, min_pts } => {
				check_distance("eps", eps)?;
				if min_pts == 0 {
					return Err(GroupingError::invalid("min_pts must be at least 1"));
				}
				Ok(())
			}
		}
	}

	fn criterion(&self) -> Result<Criterion> {
		match *self {
			// An explicit count wins over the threshold
			Self::Hierarchical { clusters: Some(k), .. } => Ok(Criterion::Clusters(k)),
			Self::Hierarchical { threshold: Some(t), .. } => Ok(Criterion::Threshold(t)),
			Self::Hierarchical { .. } => Err(GroupingError::invalid(
				"hierarchical clustering needs a threshold or a cluster count",
			)),
			Self::Density { .. } => Err(GroupingError::invalid("density strategy has no linkage criterion")),
		}
	}

	pub fn describe(&self) -> String {
		match *self {
			Self::Hierarchical { clusters: Some(k), .. } => format!("Hierarchical Clustering (n_clusters: {})", k),
			Self::Hierarchical { threshold, .. } => format!(
				"Hierarchical Clustering (distance_threshold: {})",
				threshold.unwrap_or_default()
			),
			Self::Density { eps, min_pts } => format!("DBSCAN Clustering (eps: {}, min_pts: {})", eps, min_pts),
		}
	}
}

fn check_distance(name: &str, value: f32) -> Result<()> {
	if (0.0..=MAX_DISTANCE).contains(&value) {
		Ok(())
	} else {
		Err(GroupingError::invalid(format!(
			"{} must be within [0, {}], got {}",
			name, MAX_DISTANCE, value
		)))
	}
}

/// Partitions items into groups under a fixed strategy
#[derive(Debug, Clone)]
pub struct Clusterer {
	strategy: Strategy,
}

impl Clusterer {
	pub fn new(strategy: Strategy) -> Result<Self> {
		strategy.validate()?;
		Ok(Self { strategy })
	}

	pub fn strategy(&self) -> &Strategy {
		&self.strategy
	}

	/// Every index of `embeddings` lands in exactly one returned cluster.
	pub fn cluster(&self, embeddings: &[Embedding]) -> Result<Vec<Cluster>> {
		match embeddings.len() {
			0 => return Ok(Vec::new()),
			1 => return Ok(vec![Cluster::singleton(0)]),
			_ => {}
		}

		if embeddings.iter().any(|e| e.as_slice().iter().any(|x| x.is_nan())) {
			return Err(GroupingError::Clustering("embedding contains NaN".into()));
		}

		match self.strategy {
			Strategy::Hierarchical { .. } => Ok(average_linkage(
				&DistanceMatrix::build(embeddings),
				self.strategy.criterion()?,
			)),
			Strategy::Density { eps, min_pts } => dbscan(embeddings, eps, min_pts),
		}
	}
}
