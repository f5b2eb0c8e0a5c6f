//! Total ordering of PET records.
//!
//! Sort order:
//! 1. chrom1 (lexicographic)
//! 2. start1, end1 (ascending, numeric)
//! 3. chrom2 (lexicographic)
//! 4. start2, end2 (ascending, numeric)
//! 5. Ties: input order preserved (stable sort)
//!
//! Count and liveness do not take part in the comparison. The cluster sweep
//! relies on this order to stop scanning once a candidate starts past the
//! cluster's first anchor.

use crate::parallel::PARALLEL_THRESHOLD;
use crate::pet::PetRecord;
use rayon::prelude::*;
use std::cmp::Ordering;

/// Sort command for PET records.
#[derive(Debug, Clone, Copy, Default)]
pub struct SortCommand;

impl SortCommand {
    pub fn new() -> Self {
        Self
    }

    /// Sort records in place by anchor coordinates.
    pub fn sort(&self, records: &mut [PetRecord]) {
        if records.len() < 2 {
            return;
        }

        // par_sort_by is stable, par_sort_unstable_by is not
        if records.len() >= PARALLEL_THRESHOLD {
            records.par_sort_by(Self::compare);
        } else {
            records.sort_by(Self::compare);
        }
    }

    /// Sort an owned buffer and return it.
    pub fn sorted(&self, mut records: Vec<PetRecord>) -> Vec<PetRecord> {
        self.sort(&mut records);
        records
    }

    #[inline]
    fn compare(a: &PetRecord, b: &PetRecord) -> Ordering {
        a.cmp_anchors(b)
    }
}

/// Check that records are in anchor order.
pub fn is_sorted(records: &[PetRecord]) -> bool {
    records
        .windows(2)
        .all(|w| w[0].cmp_anchors(&w[1]) != Ordering::Greater)
}
