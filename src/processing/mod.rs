//! Distance computation, clustering and weight assignment

pub mod cluster;
pub mod density;
pub mod distance;
pub mod hierarchical;
pub mod weights;

pub use cluster::{Clusterer, Strategy};
pub use distance::DistanceMatrix;
pub use weights::{assign_weights, pair_consecutive, OutputMode};
