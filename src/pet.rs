//! Core PET (paired-end tag) types.

use std::cmp::Ordering;
use std::fmt;

/// One anchor interval of a PET. Bounds are closed: `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Anchor {
    pub start: i64,
    pub end: i64,
}

impl Anchor {
    #[inline]
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// True if `start <= end`.
    #[inline]
    pub fn is_ordered(&self) -> bool {
        self.start <= self.end
    }

    /// Check whether a position falls inside the closed interval.
    #[inline]
    pub fn contains(&self, pos: i64) -> bool {
        self.start <= pos && pos <= self.end
    }

    /// Endpoint-containment overlap: either endpoint of `other` lies within `self`.
    ///
    /// Touching endpoints count as overlapping. The test is not symmetric: an
    /// `other` that strictly contains `self` does not overlap it.
    #[inline]
    pub fn touches(&self, other: &Anchor) -> bool {
        self.contains(other.start) || self.contains(other.end)
    }

    /// Widen to the union of both intervals.
    #[inline]
    pub fn union_with(&mut self, other: &Anchor) {
        self.start = self.start.min(other.start);
        self.end = self.end.max(other.end);
    }

    /// Pad both sides by `by`, clamping the start at zero.
    #[inline]
    pub fn extend(&mut self, by: i64) {
        self.start = self.start.saturating_sub(by).max(0);
        self.end = self.end.saturating_add(by);
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Why a record was neutralized during preprocessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterReason {
    /// Inter-chromosomal pair, or an anchor with start > end.
    Anomaly,
    /// Anchors closer than the self-ligation span.
    SelfLigation,
    /// Count below the PET cutoff.
    LowSupport,
}

impl fmt::Display for FilterReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterReason::Anomaly => write!(f, "anomaly"),
            FilterReason::SelfLigation => write!(f, "self-ligation"),
            FilterReason::LowSupport => write!(f, "low-support"),
        }
    }
}

/// Liveness of a record within the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    /// Independent candidate: may seed a cluster or be absorbed into one.
    #[default]
    Active,
    /// Merged into an earlier cluster; its count now lives there.
    Absorbed,
    /// Removed by preprocessing; keeps its original count.
    Filtered(FilterReason),
}

/// A paired-end tag: two anchors and a supporting count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetRecord {
    pub chrom1: String,
    pub anchor1: Anchor,
    pub chrom2: String,
    pub anchor2: Anchor,
    pub count: i64,
    pub status: Status,
    /// Zero-based position of the record in the input.
    pub source_index: usize,
}

impl PetRecord {
    /// Create an active record.
    pub fn new(
        chrom1: impl Into<String>,
        start1: i64,
        end1: i64,
        chrom2: impl Into<String>,
        start2: i64,
        end2: i64,
        count: i64,
    ) -> Self {
        Self {
            chrom1: chrom1.into(),
            anchor1: Anchor::new(start1, end1),
            chrom2: chrom2.into(),
            anchor2: Anchor::new(start2, end2),
            count,
            status: Status::Active,
            source_index: 0,
        }
    }

    /// Set the input ordinal.
    pub fn with_source_index(mut self, index: usize) -> Self {
        self.source_index = index;
        self
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == Status::Active
    }

    /// Both anchors on one chromosome and both correctly ordered.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.chrom1 == self.chrom2 && self.anchor1.is_ordered() && self.anchor2.is_ordered()
    }

    /// Distance from the end of anchor 1 to the start of anchor 2.
    #[inline]
    pub fn gap(&self) -> i64 {
        self.anchor2.start.saturating_sub(self.anchor1.end)
    }

    /// Compare by `(chrom1, start1, end1, chrom2, start2, end2)`.
    ///
    /// Count, status and source index do not participate.
    #[inline]
    pub fn cmp_anchors(&self, other: &Self) -> Ordering {
        self.chrom1
            .cmp(&other.chrom1)
            .then(self.anchor1.start.cmp(&other.anchor1.start))
            .then(self.anchor1.end.cmp(&other.anchor1.end))
            .then_with(|| self.chrom2.cmp(&other.chrom2))
            .then(self.anchor2.start.cmp(&other.anchor2.start))
            .then(self.anchor2.end.cmp(&other.anchor2.end))
    }

    /// Mark as filtered. The count is kept.
    #[inline]
    pub fn filter(&mut self, reason: FilterReason) {
        self.status = Status::Filtered(reason);
    }

    /// Merge `other` into this cluster: widen both anchors, take over its count.
    ///
    /// The count saturates at the `i64` bounds.
    #[inline]
    pub fn absorb(&mut self, other: &mut PetRecord) {
        self.anchor1.union_with(&other.anchor1);
        self.anchor2.union_with(&other.anchor2);
        self.count = self.count.saturating_add(other.count);
        other.count = 0;
        other.status = Status::Absorbed;
    }
}

impl fmt::Display for PetRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} {}:{} ({})",
            self.chrom1, self.anchor1, self.chrom2, self.anchor2, self.count
        )
    }
}
