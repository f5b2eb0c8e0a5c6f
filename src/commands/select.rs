//! Cluster selection: keep active clusters whose total count reaches the cutoff.

use crate::bedpe::BedpeError;
use crate::output::BedpeWriter;
use crate::pet::PetRecord;
use std::io::Write;

/// Output selector configuration.
#[derive(Debug, Clone, Copy)]
pub struct SelectCommand {
    /// Minimum aggregated count for a cluster to be emitted
    pub cluster_cutoff: i64,
}

impl SelectCommand {
    pub fn new(cluster_cutoff: i64) -> Self {
        Self { cluster_cutoff }
    }

    #[inline]
    pub fn is_selected(&self, record: &PetRecord) -> bool {
        record.is_active() && record.count >= self.cluster_cutoff
    }

    /// Iterate over emitted clusters in buffer order.
    pub fn select<'a>(&'a self, records: &'a [PetRecord]) -> impl Iterator<Item = &'a PetRecord> {
        records.iter().filter(move |r| self.is_selected(r))
    }

    /// Write emitted clusters and return how many rows were written.
    pub fn write<W: Write>(
        &self,
        records: &[PetRecord],
        writer: &mut BedpeWriter<W>,
    ) -> Result<usize, BedpeError> {
        let before = writer.rows_written();
        for record in self.select(records) {
            writer.write_pet(record)?;
        }
        Ok(writer.rows_written() - before)
    }
}
