//! Per-record validation, filtering and anchor extension.
//!
//! Steps run in a fixed order because the self-ligation test must see the
//! un-extended anchors:
//! 1. integrity check (same chromosome, ordered anchors)
//! 2. self-ligation filter (`start2 - end1 < span`)
//! 3. PET count cutoff
//! 4. symmetric extension of both anchors, applied to every record
//!
//! Filtered records stay in the buffer with their original count.

use crate::config::ClusterConfig;
use crate::parallel::PARALLEL_THRESHOLD;
use crate::pet::{FilterReason, PetRecord};
use rayon::prelude::*;
use std::fmt;

/// Preprocessing thresholds.
#[derive(Debug, Clone)]
pub struct PreprocessCommand {
    /// Minimum anchor gap; pairs closer than this are self-ligation noise
    pub self_ligation: i64,
    /// Padding added to both sides of each anchor
    pub extension: i64,
    /// Minimum count for an individual PET
    pub pet_cutoff: i64,
}

/// Counts of records neutralized per reason.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PreprocessStats {
    pub records: usize,
    pub anomalies: usize,
    pub self_ligation: usize,
    pub low_support: usize,
    /// Sum of counts carried by filtered records, saturating at the `i64` bounds
    pub filtered_count: i64,
}

impl PreprocessStats {
    /// Records still active after preprocessing.
    pub fn retained(&self) -> usize {
        self.records - self.filtered()
    }

    pub fn filtered(&self) -> usize {
        self.anomalies + self.self_ligation + self.low_support
    }

    fn record(mut self, outcome: Option<(FilterReason, i64)>) -> Self {
        self.records += 1;
        if let Some((reason, count)) = outcome {
            match reason {
                FilterReason::Anomaly => self.anomalies += 1,
                FilterReason::SelfLigation => self.self_ligation += 1,
                FilterReason::LowSupport => self.low_support += 1,
            }
            self.filtered_count = self.filtered_count.saturating_add(count);
        }
        self
    }

    fn merge(self, other: Self) -> Self {
        Self {
            records: self.records + other.records,
            anomalies: self.anomalies + other.anomalies,
            self_ligation: self.self_ligation + other.self_ligation,
            low_support: self.low_support + other.low_support,
            filtered_count: self.filtered_count.saturating_add(other.filtered_count),
        }
    }
}

impl fmt::Display for PreprocessStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Records: {}, Retained: {}, Anomalies: {}, Self-ligation: {}, Low support: {}",
            self.records,
            self.retained(),
            self.anomalies,
            self.self_ligation,
            self.low_support
        )
    }
}

impl Default for PreprocessCommand {
    fn default() -> Self {
        Self::from_config(&ClusterConfig::default())
    }
}

impl PreprocessCommand {
    pub fn from_config(config: &ClusterConfig) -> Self {
        Self {
            self_ligation: config.self_ligation,
            extension: config.extension,
            pet_cutoff: config.pet_cutoff,
        }
    }

    /// Preprocess every record in place.
    pub fn preprocess(&self, records: &mut [PetRecord]) -> PreprocessStats {
        if records.len() >= PARALLEL_THRESHOLD {
            records
                .par_iter_mut()
                .fold(PreprocessStats::default, |stats, record| {
                    stats.record(self.preprocess_record(record))
                })
                .reduce(PreprocessStats::default, PreprocessStats::merge)
        } else {
            records
                .iter_mut()
                .fold(PreprocessStats::default(), |stats, record| {
                    stats.record(self.preprocess_record(record))
                })
        }
    }

    /// Filter and extend one record.
    ///
    /// Returns the reason and count if the record was neutralized.
    pub fn preprocess_record(&self, record: &mut PetRecord) -> Option<(FilterReason, i64)> {
        let reason = self.check(record);
        if let Some(reason) = reason {
            record.filter(reason);
        }

        record.anchor1.extend(self.extension);
        record.anchor2.extend(self.extension);

        reason.map(|r| (r, record.count))
    }

    fn check(&self, record: &PetRecord) -> Option<FilterReason> {
        if !record.is_active() {
            return None;
        }
        if !record.is_valid() {
            log::warn!(
                "Inter-chromosomal or misordered PET ignored: #{} {}",
                record.source_index + 1,
                record
            );
            return Some(FilterReason::Anomaly);
        }
        if record.gap() < self.self_ligation {
            return Some(FilterReason::SelfLigation);
        }
        if record.count < self.pet_cutoff {
            return Some(FilterReason::LowSupport);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pet::{Anchor, Status};

    fn command(self_ligation: i64, extension: i64, pet_cutoff: i64) -> PreprocessCommand {
        PreprocessCommand {
            self_ligation,
            extension,
            pet_cutoff,
        }
    }

    #[test]
    fn test_self_ligation_boundary() {
        let cmd = command(1000, 0, 1);

        // gap == threshold is kept
        let mut kept = PetRecord::new("chr1", 100, 200, "chr1", 1200, 1300, 5);
        assert_eq!(cmd.preprocess_record(&mut kept), None);
        assert!(kept.is_active());

        // gap == threshold - 1 is filtered
        let mut dropped = PetRecord::new("chr1", 100, 200, "chr1", 1199, 1300, 5);
        assert_eq!(
            cmd.preprocess_record(&mut dropped),
            Some((FilterReason::SelfLigation, 5))
        );
        assert_eq!(dropped.status, Status::Filtered(FilterReason::SelfLigation));
        assert_eq!(dropped.count, 5);
    }

    #[test]
    fn test_pet_cutoff() {
        let cmd = command(0, 0, 3);
        let mut low = PetRecord::new("chr1", 100, 200, "chr1", 5000, 5100, 2);
        let mut ok = PetRecord::new("chr1", 100, 200, "chr1", 5000, 5100, 3);

        assert_eq!(
            cmd.preprocess_record(&mut low),
            Some((FilterReason::LowSupport, 2))
        );
        assert_eq!(cmd.preprocess_record(&mut ok), None);
    }

    #[test]
    fn test_anomalies() {
        let cmd = command(0, 0, 1);
        let mut inter = PetRecord::new("chr1", 100, 200, "chr2", 5000, 5100, 9);
        let mut misordered = PetRecord::new("chr1", 300, 200, "chr1", 5000, 5100, 9);

        assert_eq!(
            cmd.preprocess_record(&mut inter).map(|(r, _)| r),
            Some(FilterReason::Anomaly)
        );
        assert_eq!(
            cmd.preprocess_record(&mut misordered).map(|(r, _)| r),
            Some(FilterReason::Anomaly)
        );
    }

    #[test]
    fn test_first_reason_wins() {
        // Inter-chromosomal and low count: reported as anomaly
        let cmd = command(8000, 0, 10);
        let mut pet = PetRecord::new("chr1", 100, 200, "chr2", 300, 400, 1);
        assert_eq!(
            cmd.preprocess_record(&mut pet).map(|(r, _)| r),
            Some(FilterReason::Anomaly)
        );
    }

    #[test]
    fn test_extension_applies_to_filtered_records() {
        let cmd = command(8000, 500, 2);
        let mut pet = PetRecord::new("chr1", 100, 200, "chr1", 1000, 1100, 1);
        cmd.preprocess_record(&mut pet);

        assert!(!pet.is_active());
        assert_eq!(pet.anchor1, Anchor::new(0, 700));
        assert_eq!(pet.anchor2, Anchor::new(500, 1600));
    }

    #[test]
    fn test_self_ligation_uses_unextended_bounds() {
        // Raw gap 1000 passes; after a 600bp extension the anchors would overlap
        let cmd = command(1000, 600, 1);
        let mut pet = PetRecord::new("chr1", 1000, 2000, "chr1", 3000, 4000, 4);
        assert_eq!(cmd.preprocess_record(&mut pet), None);
        assert_eq!(pet.anchor1, Anchor::new(400, 2600));
        assert_eq!(pet.anchor2, Anchor::new(2400, 4600));
    }

    #[test]
    fn test_preprocess_stats() {
        let cmd = command(1000, 0, 2);
        let mut records = vec![
            PetRecord::new("chr1", 100, 200, "chr1", 5000, 5100, 3),
            PetRecord::new("chr1", 100, 200, "chr1", 500, 600, 4),
            PetRecord::new("chr1", 100, 200, "chr1", 5000, 5100, 1),
            PetRecord::new("chr1", 100, 200, "chrX", 5000, 5100, 6),
        ];

        let stats = cmd.preprocess(&mut records);

        assert_eq!(stats.records, 4);
        assert_eq!(stats.retained(), 1);
        assert_eq!(stats.self_ligation, 1);
        assert_eq!(stats.low_support, 1);
        assert_eq!(stats.anomalies, 1);
        assert_eq!(stats.filtered_count, 4 + 1 + 6);
    }

    #[test]
    fn test_filtered_count_saturates() {
        let cmd = command(0, 0, i64::MAX);
        let mut records = vec![
            PetRecord::new("chr1", 100, 200, "chr1", 5000, 5100, i64::MAX - 1),
            PetRecord::new("chr1", 100, 200, "chr1", 5000, 5100, i64::MAX - 1),
        ];

        let stats = cmd.preprocess(&mut records);
        assert_eq!(stats.low_support, 2);
        assert_eq!(stats.filtered_count, i64::MAX);
    }

    #[test]
    fn test_parallel_stats_match_sequential() {
        let cmd = command(1000, 50, 3);
        let records: Vec<PetRecord> = (0..PARALLEL_THRESHOLD + 17)
            .map(|i| {
                let i = i as i64;
                PetRecord::new("chr1", i, i + 10, "chr1", i + 500 + (i % 1500), i + 2000, i % 6)
            })
            .collect();

        let mut parallel = records.clone();
        let parallel_stats = cmd.preprocess(&mut parallel);

        let mut sequential = records;
        let sequential_stats = sequential
            .iter_mut()
            .fold(PreprocessStats::default(), |s, r| {
                s.record(cmd.preprocess_record(r))
            });

        assert_eq!(parallel_stats, sequential_stats);
        assert_eq!(parallel, sequential);
    }
}
