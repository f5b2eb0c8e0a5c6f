//! cluster-pets: chromatin-interaction PET clustering
//!
//! Consolidates paired-end tags (PETs) into interaction clusters with
//! aggregated support counts.
//!
//! # Pipeline
//!
//! - **Sort** by `(chrom1, start1, end1, chrom2, start2, end2)`
//! - **Preprocess**: drop anomalies, self-ligation pairs and low-count PETs,
//!   then pad every anchor
//! - **Cluster**: sweep-line merge of PETs whose anchors overlap on both sides,
//!   sharded by chromosome with Rayon
//! - **Select** clusters whose total count reaches the cutoff
//!
//! # Example
//!
//! ```rust,no_run
//! use cluster_pets::{commands::ClusterPetsCommand, ClusterConfig};
//!
//! let config = ClusterConfig::new().with_extension(500).with_cluster_cutoff(4);
//! let cmd = ClusterPetsCommand::new(config);
//!
//! let stats = cmd.run("pets.bedpe", std::io::stdout().lock()).unwrap();
//! eprintln!("{}", stats);
//! ```

pub mod bedpe;
pub mod commands;
pub mod config;
pub mod output;
pub mod parallel;
pub mod parsing;
pub mod pet;

// Re-export commonly used types
pub use bedpe::{parse_pets, read_pets, BedpeError};
pub use config::{ClusterConfig, OverlapMode};
pub use pet::{Anchor, FilterReason, PetRecord, Status};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bedpe::{parse_pets, read_pets, BedpeError};
    pub use crate::commands::{
        ClusterCommand, ClusterPetsCommand, PreprocessCommand, SelectCommand, SortCommand,
    };
    pub use crate::config::{ClusterConfig, OverlapMode};
    pub use crate::pet::{Anchor, PetRecord, Status};
}
