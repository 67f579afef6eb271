//! Clustering widgets: k-means, DBSCAN and agglomerative clustering.

pub mod dbscan;
pub mod hierarchical;
pub mod kmeans;

pub use dbscan::Dbscan;
pub use hierarchical::Agglomerative;
pub use kmeans::KMeans;
