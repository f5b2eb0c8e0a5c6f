//! Parallel processing utilities using Rayon.
//!
//! Records on different `chrom1` never interact during clustering, so a sorted
//! record buffer is split at chromosome boundaries into disjoint mutable shards
//! that can be processed independently.

use crate::pet::PetRecord;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::ops::Range;

/// Minimum number of records before enabling parallelization.
/// Below this threshold, sequential processing is faster due to
/// thread spawn overhead.
pub const PARALLEL_THRESHOLD: usize = 10_000;

/// Contiguous index ranges of records sharing `chrom1`.
///
/// Records must be sorted (or at least grouped) by `chrom1`.
pub fn chrom_ranges(records: &[PetRecord]) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = 0;

    for i in 1..=records.len() {
        if i == records.len() || records[i].chrom1 != records[start].chrom1 {
            ranges.push(start..i);
            start = i;
        }
    }

    ranges
}

/// Split a grouped buffer into one mutable shard per chromosome.
pub fn chrom_shards_mut(records: &mut [PetRecord]) -> Vec<&mut [PetRecord]> {
    let ranges = chrom_ranges(records);
    let mut shards = Vec::with_capacity(ranges.len());
    let mut rest = records;

    for range in ranges {
        let (shard, tail) = std::mem::take(&mut rest).split_at_mut(range.len());
        shards.push(shard);
        rest = tail;
    }

    shards
}

/// Run `f` on every chromosome shard, in parallel when the buffer is large.
///
/// Results come back in shard order.
pub fn process_shards<F, T>(records: &mut [PetRecord], f: F) -> Vec<T>
where
    F: Fn(&mut [PetRecord]) -> T + Sync + Send,
    T: Send,
{
    let parallel = records.len() >= PARALLEL_THRESHOLD;
    let shards = chrom_shards_mut(records);

    if parallel && shards.len() > 1 {
        shards.into_par_iter().map(&f).collect()
    } else {
        shards.into_iter().map(f).collect()
    }
}

/// Per-chromosome summary of a record buffer.
#[derive(Debug, Clone)]
pub struct ShardStats {
    pub total_records: usize,
    pub num_chromosomes: usize,
    /// `(chrom1, records, active records)`, largest first
    pub records_per_chrom: Vec<(String, usize, usize)>,
}

impl ShardStats {
    pub fn from_records(records: &[PetRecord]) -> Self {
        let mut counts: FxHashMap<&str, (usize, usize)> = FxHashMap::default();
        for record in records {
            let entry = counts.entry(record.chrom1.as_str()).or_default();
            entry.0 += 1;
            if record.is_active() {
                entry.1 += 1;
            }
        }

        let mut records_per_chrom: Vec<(String, usize, usize)> = counts
            .into_iter()
            .map(|(chrom, (total, active))| (chrom.to_string(), total, active))
            .collect();
        records_per_chrom.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Self {
            total_records: records.len(),
            num_chromosomes: records_per_chrom.len(),
            records_per_chrom,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pet(chrom: &str, start: i64) -> PetRecord {
        PetRecord::new(chrom, start, start + 10, chrom, start + 10_000, start + 10_010, 2)
    }

    #[test]
    fn test_chrom_ranges() {
        let records = vec![
            pet("chr1", 100),
            pet("chr1", 300),
            pet("chr2", 100),
            pet("chr3", 50),
            pet("chr3", 60),
        ];

        assert_eq!(chrom_ranges(&records), vec![0..2, 2..3, 3..5]);
        assert!(chrom_ranges(&[]).is_empty());
    }

    #[test]
    fn test_chrom_shards_mut() {
        let mut records = vec![pet("chr1", 100), pet("chr2", 100), pet("chr2", 300)];
        let shards = chrom_shards_mut(&mut records);

        assert_eq!(shards.len(), 2);
        assert_eq!(shards[0].len(), 1);
        assert_eq!(shards[1].len(), 2);
        assert!(shards[1].iter().all(|r| r.chrom1 == "chr2"));
    }

    #[test]
    fn test_process_shards_mutates_in_place() {
        let mut records = vec![pet("chr1", 100), pet("chr1", 200), pet("chr2", 100)];
        let sizes = process_shards(&mut records, |shard| {
            for r in shard.iter_mut() {
                r.count += 1;
            }
            shard.len()
        });

        assert_eq!(sizes, vec![2, 1]);
        assert!(records.iter().all(|r| r.count == 3));
    }

    #[test]
    fn test_shard_stats() {
        let mut records = vec![pet("chr1", 100), pet("chr2", 100), pet("chr2", 300)];
        records[2].status = crate::pet::Status::Absorbed;
        let stats = ShardStats::from_records(&records);

        assert_eq!(stats.total_records, 3);
        assert_eq!(stats.num_chromosomes, 2);
        assert_eq!(stats.records_per_chrom[0], ("chr2".to_string(), 2, 1));
        assert_eq!(stats.records_per_chrom[1], ("chr1".to_string(), 1, 1));
    }
}
