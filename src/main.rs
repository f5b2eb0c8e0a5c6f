//! cluster-pets: cluster chromatin-interaction paired-end tags
//!
//! Usage: cluster-pets -i <PETS> [-o <CLUSTERS>] [OPTIONS]

use clap::Parser;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process;

use cluster_pets::bedpe::BedpeError;
use cluster_pets::commands::{ClusterPetsCommand, ClusterPetsStats};
use cluster_pets::config::{
    ClusterConfig, OverlapMode, DEFAULT_CLUSTER_CUTOFF, DEFAULT_EXTENSION, DEFAULT_PET_CUTOFF,
    DEFAULT_SELF_LIGATION,
};

#[derive(Parser)]
#[command(name = "cluster-pets")]
#[command(version)]
#[command(about = "Cluster chromatin-interaction paired-end tags (PETs) into interaction clusters", long_about = None)]
struct Cli {
    /// Input .bedpe file with raw PETs, no header (use - for stdin)
    #[arg(short, long)]
    input: PathBuf,

    /// Output .bedpe file for clustered PETs (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Self-ligation genomic span: PETs with a smaller anchor gap are dropped
    #[arg(short = 's', long, alias = "self_ligation", default_value_t = DEFAULT_SELF_LIGATION, allow_negative_numbers = true)]
    self_ligation: i64,

    /// Number of base pairs to extend both ends of each anchor
    #[arg(short = 'e', long, default_value_t = DEFAULT_EXTENSION)]
    extension: i64,

    /// Minimum PET count to take a PET into consideration
    #[arg(short = 'p', long, alias = "pet_cutoff", default_value_t = DEFAULT_PET_CUTOFF, allow_negative_numbers = true)]
    pet_cutoff: i64,

    /// Minimum total count for a cluster to be reported
    #[arg(short = 'c', long, alias = "cluster_cutoff", default_value_t = DEFAULT_CLUSTER_CUTOFF, allow_negative_numbers = true)]
    cluster_cutoff: i64,

    /// Test first-anchor overlap against the growing cluster instead of the seed
    #[arg(long)]
    growing_bounds: bool,

    /// Re-sort and re-cluster until no more PETs merge
    #[arg(long)]
    iterate: bool,

    /// Read at most this many PETs
    #[arg(short = 'n', long, alias = "nrows")]
    max_records: Option<usize>,

    /// Fail on malformed input instead of clustering the PETs read before it
    #[arg(long)]
    strict: bool,

    /// Print run statistics to stderr
    #[arg(long)]
    stats: bool,

    /// Number of threads to use (default: number of CPUs)
    #[arg(long, short = 't')]
    threads: Option<usize>,

    /// Increase logging verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn config(&self) -> ClusterConfig {
        ClusterConfig::new()
            .with_self_ligation(self.self_ligation)
            .with_extension(self.extension)
            .with_pet_cutoff(self.pet_cutoff)
            .with_cluster_cutoff(self.cluster_cutoff)
            .with_overlap_mode(if self.growing_bounds {
                OverlapMode::Growing
            } else {
                OverlapMode::FixedSeed
            })
            .with_iterate(self.iterate)
            .with_max_records(self.max_records)
            .with_strict(self.strict)
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Configure thread pool if --threads specified
    if let Some(n) = cli.threads {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
        {
            eprintln!("Error: failed to initialize thread pool: {}", e);
            process::exit(1);
        }
    }

    let result = run(&cli);

    match result {
        Ok(stats) => {
            if cli.stats {
                eprintln!("Cluster stats: {}", stats);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<ClusterPetsStats, BedpeError> {
    let cmd = ClusterPetsCommand::new(cli.config());

    // The output file is created only once the input has been read and validated
    let recovered = if cli.input.to_string_lossy() == "-" {
        cmd.read_reader(io::stdin().lock())?
    } else {
        cmd.read(&cli.input)?
    };

    match cli.output.as_ref().filter(|p| p.to_string_lossy() != "-") {
        Some(path) => cmd.write_clusters(recovered, File::create(path)?),
        None => cmd.write_clusters(recovered, io::stdout().lock()),
    }
}
