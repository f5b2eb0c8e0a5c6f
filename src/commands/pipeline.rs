//! End-to-end PET clustering run.
//!
//! Algorithm:
//! 1. Read all PETs (stopping at the first malformed row)
//! 2. Sort by anchor coordinates
//! 3. Filter and extend each PET
//! 4. Sweep-line clustering per chromosome
//! 5. Write clusters that reach the cluster cutoff

use crate::bedpe::{read_pets, read_pets_from_reader, BedpeError, Recovered};
use crate::commands::cluster::{ClusterCommand, ClusterStats};
use crate::commands::preprocess::{PreprocessCommand, PreprocessStats};
use crate::commands::select::SelectCommand;
use crate::commands::sort::SortCommand;
use crate::config::ClusterConfig;
use crate::output::BedpeWriter;
use crate::pet::PetRecord;
use std::fmt;
use std::io::{Read, Write};
use std::path::Path;

/// Statistics from a full clustering run.
#[derive(Debug, Default, Clone)]
pub struct ClusterPetsStats {
    pub records_read: usize,
    /// Ingestion stopped at a malformed row
    pub truncated: bool,
    pub preprocess: PreprocessStats,
    pub cluster: ClusterStats,
    pub clusters_written: usize,
}

impl fmt::Display for ClusterPetsStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PETs: {}{}, {}, {}, Written: {}",
            self.records_read,
            if self.truncated { " (truncated)" } else { "" },
            self.preprocess,
            self.cluster,
            self.clusters_written
        )
    }
}

/// PET clustering pipeline.
#[derive(Debug, Clone)]
pub struct ClusterPetsCommand {
    pub config: ClusterConfig,
}

impl Default for ClusterPetsCommand {
    fn default() -> Self {
        Self::new(ClusterConfig::default())
    }
}

impl ClusterPetsCommand {
    pub fn new(config: ClusterConfig) -> Self {
        Self { config }
    }

    /// Run on a BEDPE file.
    pub fn run<P: AsRef<Path>, W: Write>(
        &self,
        input: P,
        output: W,
    ) -> Result<ClusterPetsStats, BedpeError> {
        let recovered = self.read(input)?;
        self.write_clusters(recovered, output)
    }

    /// Run on any readable BEDPE source (e.g. stdin).
    pub fn run_reader<R: Read, W: Write>(
        &self,
        reader: R,
        output: W,
    ) -> Result<ClusterPetsStats, BedpeError> {
        let recovered = self.read_reader(reader)?;
        self.write_clusters(recovered, output)
    }

    /// Validate the configuration and read PETs from a BEDPE file.
    ///
    /// Nothing is written, so callers can read before creating the output.
    pub fn read<P: AsRef<Path>>(&self, input: P) -> Result<Recovered, BedpeError> {
        self.config.validate()?;
        let path = input.as_ref();
        log::info!("Reading PETs from {}", path.display());
        self.check_recovered(read_pets(path, self.config.max_records)?)
    }

    /// Validate the configuration and read PETs from any readable source.
    pub fn read_reader<R: Read>(&self, reader: R) -> Result<Recovered, BedpeError> {
        self.config.validate()?;
        self.check_recovered(read_pets_from_reader(reader, self.config.max_records)?)
    }

    /// Apply the malformed-input policy: an error in strict mode, a warning otherwise.
    fn check_recovered(&self, recovered: Recovered) -> Result<Recovered, BedpeError> {
        if self.config.strict {
            let records = recovered.into_strict()?;
            return Ok(Recovered {
                records,
                failure: None,
            });
        }
        if let Some(ref failure) = recovered.failure {
            log::warn!(
                "Failed after {} PETs, continuing with the partial set: {}",
                recovered.records.len(),
                failure
            );
        }
        Ok(recovered)
    }

    /// Cluster PETs returned by `read`/`read_reader` and write the selected clusters.
    pub fn write_clusters<W: Write>(
        &self,
        recovered: Recovered,
        output: W,
    ) -> Result<ClusterPetsStats, BedpeError> {
        let truncated = !recovered.is_complete();
        let records = recovered.records;
        log::info!("Parsed {} PETs", records.len());

        let records_read = records.len();
        let (records, preprocess, cluster) = self.process(records);

        log::info!(
            "Saving clusters (cluster cutoff: {})",
            self.config.cluster_cutoff
        );
        let mut writer = BedpeWriter::new(output);
        let clusters_written =
            SelectCommand::new(self.config.cluster_cutoff).write(&records, &mut writer)?;
        writer.flush()?;
        log::info!("Saved {} clusters", clusters_written);

        Ok(ClusterPetsStats {
            records_read,
            truncated,
            preprocess,
            cluster,
            clusters_written,
        })
    }

    /// Sort, preprocess and cluster an in-memory record set.
    ///
    /// Returns the full buffer (filtered and absorbed records included) in
    /// sorted order.
    pub fn process(
        &self,
        mut records: Vec<PetRecord>,
    ) -> (Vec<PetRecord>, PreprocessStats, ClusterStats) {
        log::info!("Sorting {} PETs", records.len());
        SortCommand::new().sort(&mut records);

        log::info!(
            "Preprocessing (extension: {}bp, self-ligation span: {}bp, PET cutoff: {})",
            self.config.extension,
            self.config.self_ligation,
            self.config.pet_cutoff
        );
        let preprocess = PreprocessCommand::from_config(&self.config).preprocess(&mut records);
        log::info!("{}", preprocess);

        log::info!("Clustering {} PETs", preprocess.retained());
        let cluster = ClusterCommand::from_config(&self.config).cluster(&mut records);
        log::info!("{}", cluster);

        (records, preprocess, cluster)
    }

    /// Process an in-memory record set and return the emitted clusters.
    pub fn clusters(&self, records: Vec<PetRecord>) -> Vec<PetRecord> {
        let (records, _, _) = self.process(records);
        let selector = SelectCommand::new(self.config.cluster_cutoff);
        records
            .into_iter()
            .filter(|r| selector.is_selected(r))
            .collect()
    }
}
