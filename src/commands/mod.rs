//! Pipeline stages for PET clustering.

pub mod cluster;
pub mod pipeline;
pub mod preprocess;
pub mod select;
pub mod sort;

pub use cluster::{ClusterCommand, ClusterStats};
pub use pipeline::{ClusterPetsCommand, ClusterPetsStats};
pub use preprocess::{PreprocessCommand, PreprocessStats};
pub use select::SelectCommand;
pub use sort::{is_sorted, SortCommand};
