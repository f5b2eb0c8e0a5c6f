//! PET clustering: sweep-line merge of records with overlapping anchor pairs.
//!
//! Uses a single forward pass over records sorted by
//! `(chrom1, start1, end1, ...)`. Each active record seeds a cluster and scans
//! forward until a candidate starts past the cluster's first anchor or moves to
//! another chromosome. Candidates whose anchors both overlap the cluster are
//! absorbed: bounds widen to the union and the count moves into the cluster.
//!
//! Memory: in place, no allocation in the sweep.

use crate::config::{ClusterConfig, OverlapMode};
use crate::commands::sort::is_sorted;
use crate::parallel::{process_shards, ShardStats};
use crate::pet::PetRecord;
use std::fmt;

/// Cluster command configuration.
#[derive(Debug, Clone, Default)]
pub struct ClusterCommand {
    /// Anchor-1 overlap reference
    pub overlap_mode: OverlapMode,
    /// Re-sort and re-sweep until a pass merges nothing
    pub iterate: bool,
}

/// Statistics from clustering.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ClusterStats {
    /// Chromosome shards processed
    pub shards: usize,
    /// Largest number of sweeps any shard needed
    pub passes: usize,
    /// Records absorbed into a cluster
    pub merges: usize,
    /// Active records left after clustering
    pub clusters: usize,
}

impl ClusterStats {
    fn merge(self, other: Self) -> Self {
        Self {
            shards: self.shards + other.shards,
            passes: self.passes.max(other.passes),
            merges: self.merges + other.merges,
            clusters: self.clusters + other.clusters,
        }
    }
}

impl fmt::Display for ClusterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Shards: {}, Passes: {}, Merges: {}, Clusters: {}",
            self.shards, self.passes, self.merges, self.clusters
        )
    }
}

impl ClusterCommand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ClusterConfig) -> Self {
        Self {
            overlap_mode: config.overlap_mode,
            iterate: config.iterate,
        }
    }

    pub fn with_overlap_mode(mut self, mode: OverlapMode) -> Self {
        self.overlap_mode = mode;
        self
    }

    pub fn with_iterate(mut self, iterate: bool) -> Self {
        self.iterate = iterate;
        self
    }

    /// Cluster a sorted, preprocessed buffer in place.
    ///
    /// The buffer is split at `chrom1` boundaries and each shard is swept
    /// independently, in parallel for large inputs.
    pub fn cluster(&self, records: &mut [PetRecord]) -> ClusterStats {
        debug_assert!(is_sorted(records), "cluster input must be sorted");

        if log::log_enabled!(log::Level::Debug) {
            let shard_stats = ShardStats::from_records(records);
            log::debug!(
                "{} PETs across {} chromosome shards",
                shard_stats.total_records,
                shard_stats.num_chromosomes
            );
            for (chrom, total, active) in &shard_stats.records_per_chrom {
                log::debug!("Shard {}: {} PETs ({} active)", chrom, total, active);
            }
        }

        process_shards(records, |shard| self.cluster_shard(shard))
            .into_iter()
            .fold(ClusterStats::default(), ClusterStats::merge)
    }

    /// Cluster one chromosome shard.
    pub fn cluster_shard(&self, shard: &mut [PetRecord]) -> ClusterStats {
        let mut stats = ClusterStats {
            shards: 1,
            ..Default::default()
        };

        loop {
            if stats.passes > 0 {
                // Bounds have widened since the last sort
                shard.sort_by(|a, b| a.cmp_anchors(b));
            }
            let merges = self.sweep(shard);
            stats.passes += 1;
            stats.merges += merges;
            if !self.iterate || merges == 0 {
                break;
            }
        }

        stats.clusters = shard.iter().filter(|r| r.is_active()).count();
        stats
    }

    /// One clustering pass. Returns the number of records absorbed.
    ///
    /// Records must be sorted by anchor coordinates.
    pub fn sweep(&self, records: &mut [PetRecord]) -> usize {
        let growing = self.overlap_mode == OverlapMode::Growing;
        let mut merges = 0;

        for i in 0..records.len() {
            if !records[i].is_active() {
                continue;
            }

            let (head, tail) = records.split_at_mut(i + 1);
            let cluster = &mut head[i];
            let seed_anchor1 = cluster.anchor1;

            for candidate in tail.iter_mut() {
                if candidate.anchor1.start > cluster.anchor1.end
                    || candidate.chrom1 != cluster.chrom1
                {
                    break;
                }
                if !candidate.is_active() {
                    continue;
                }

                let reference1 = if growing {
                    cluster.anchor1
                } else {
                    seed_anchor1
                };

                if reference1.touches(&candidate.anchor1)
                    && cluster.anchor2.touches(&candidate.anchor2)
                {
                    cluster.absorb(candidate);
                    merges += 1;
                }
            }
        }

        merges
    }
}
