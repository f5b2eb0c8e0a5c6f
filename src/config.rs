//! Run configuration for PET clustering.
//!
//! Holds the filtering thresholds, anchor extension and clustering options
//! consumed by the preprocessing, clustering and output stages.

use thiserror::Error;

/// Default minimum anchor gap; closer pairs are treated as self-ligation.
pub const DEFAULT_SELF_LIGATION: i64 = 8000;
/// Default per-anchor padding in base pairs.
pub const DEFAULT_EXTENSION: i64 = 500;
/// Default minimum count for an individual PET.
pub const DEFAULT_PET_CUTOFF: i64 = 2;
/// Default minimum total count for an emitted cluster.
pub const DEFAULT_CLUSTER_CUTOFF: i64 = 4;

/// Errors in a run configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("extension must be non-negative, got {0}")]
    NegativeExtension(i64),

    #[error("max records must be at least 1")]
    ZeroRecordLimit,
}

/// Which bounds the anchor-1 overlap test compares a candidate against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlapMode {
    /// The seed's anchor 1 as it was when the seed was picked.
    #[default]
    FixedSeed,
    /// The cluster's anchor 1 as it widens during the scan.
    Growing,
}

/// Clustering run configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterConfig {
    /// Minimum `start2 - end1` for a PET to survive the self-ligation filter
    pub self_ligation: i64,
    /// Symmetric padding added to every anchor after filtering
    pub extension: i64,
    /// Minimum individual PET count
    pub pet_cutoff: i64,
    /// Minimum aggregated cluster count for output
    pub cluster_cutoff: i64,
    /// Anchor-1 overlap reference
    pub overlap_mode: OverlapMode,
    /// Repeat sort + clustering until a pass performs no merge
    pub iterate: bool,
    /// Read at most this many records
    pub max_records: Option<usize>,
    /// Abort on malformed input instead of keeping the recovered prefix
    pub strict: bool,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ClusterConfig {
    pub fn new() -> Self {
        Self {
            self_ligation: DEFAULT_SELF_LIGATION,
            extension: DEFAULT_EXTENSION,
            pet_cutoff: DEFAULT_PET_CUTOFF,
            cluster_cutoff: DEFAULT_CLUSTER_CUTOFF,
            overlap_mode: OverlapMode::FixedSeed,
            iterate: false,
            max_records: None,
            strict: false,
        }
    }

    pub fn with_self_ligation(mut self, span: i64) -> Self {
        self.self_ligation = span;
        self
    }

    pub fn with_extension(mut self, bp: i64) -> Self {
        self.extension = bp;
        self
    }

    pub fn with_pet_cutoff(mut self, cutoff: i64) -> Self {
        self.pet_cutoff = cutoff;
        self
    }

    pub fn with_cluster_cutoff(mut self, cutoff: i64) -> Self {
        self.cluster_cutoff = cutoff;
        self
    }

    pub fn with_overlap_mode(mut self, mode: OverlapMode) -> Self {
        self.overlap_mode = mode;
        self
    }

    pub fn with_iterate(mut self, iterate: bool) -> Self {
        self.iterate = iterate;
        self
    }

    pub fn with_max_records(mut self, limit: Option<usize>) -> Self {
        self.max_records = limit;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Check the configuration before any processing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.extension < 0 {
            return Err(ConfigError::NegativeExtension(self.extension));
        }
        if self.max_records == Some(0) {
            return Err(ConfigError::ZeroRecordLimit);
        }
        Ok(())
    }
}
