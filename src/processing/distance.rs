//! Pairwise cosine distance matrix

use ndarray::{Array2, ArrayView2};
use rayon::prelude::*;

use crate::core::Embedding;

/// Square, symmetric matrix of `1 - cos(v_i, v_j)` clipped to [0, 2]
#[derive(Debug, Clone)]
pub struct DistanceMatrix(Array2<f32>);

impl DistanceMatrix {
	/// Build from unit vectors. Panics if the vectors differ in dimension.
	pub fn build(embeddings: &[Embedding]) -> Self {
		let n = embeddings.len();
		if let Some(first) = embeddings.first() {
			let dim = first.dim();
			assert!(
				embeddings.iter().all(|e| e.dim() == dim),
				"embedding dimension mismatch (expected {}D)",
				dim
			);
		}

		// Upper triangle only; each row is independent
		let rows: Vec<Vec<f32>> = (0..n)
			.into_par_iter()
			.map(|i| {
				((i + 1)..n)
					.map(|j| embeddings[i].distance(&embeddings[j]))
					.collect()
			})
			.collect();

		let mut matrix = Array2::<f32>::zeros((n, n));
		for (i, row) in rows.into_iter().enumerate() {
			for (offset, d) in row.into_iter().enumerate() {
				let j = i + 1 + offset;
				matrix[[i, j]] = d;
				matrix[[j, i]] = d;
			}
		}

		Self(matrix)
	}

	/// Wrap a precomputed matrix. Returns None unless it is square.
	pub fn from_array(matrix: Array2<f32>) -> Option<Self> {
		let (rows, cols) = matrix.dim();
		(rows == cols).then_some(Self(matrix))
	}

	pub fn len(&self) -> usize {
		self.0.nrows()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn get(&self, i: usize, j: usize) -> f32 {
		self.0[[i, j]]
	}

	pub fn similarity(&self, i: usize, j: usize) -> f32 {
		1.0 - self.get(i, j)
	}

	pub fn view(&self) -> ArrayView2<'_, f32> {
		self.0.view()
	}
}
