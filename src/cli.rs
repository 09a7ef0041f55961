use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::{NullModel, SphereConfig};
use crate::signal::SignalKind;

#[derive(Debug, Parser)]
#[command(
    name = "sphere-test",
    version,
    about = "Spatial permutation test for signals clustered in a 3-D genome model"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sample spheres, test them and cluster the significant ones.
    Run(RunArgs),
    /// Load and check the input without sampling.
    Validate(ValidateArgs),
    /// List the available signals.
    Signals,
    /// Pack a gene1/gene2/score table into the binary coexpression matrix.
    PackCoex(PackCoexArgs),
}

#[derive(Debug, Args)]
pub struct InputArgs {
    #[arg(long, help = "Entity TSV (name, x, y, z, payload...); .gz accepted")]
    pub input: PathBuf,

    #[arg(long, value_enum)]
    pub signal: SignalArg,

    #[arg(long, help = "Packed coexpression matrix (coexpression signal only)")]
    pub coex: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[arg(long)]
    pub out: PathBuf,

    #[arg(long, help = "JSON file with run parameters")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: ConfigOverrides,

    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[arg(long, default_value_t = false)]
    pub tsv: bool,

    #[arg(long, help = "Field name for the cluster table (default per signal)")]
    pub table_name: Option<String>,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[arg(long, help = "JSON file with run parameters")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Args)]
pub struct PackCoexArgs {
    #[arg(long, help = "gene1<TAB>gene2<TAB>score table; .gz accepted")]
    pub input: PathBuf,

    #[arg(long)]
    pub out: PathBuf,
}

#[derive(Debug, Clone, Default, Args)]
pub struct ConfigOverrides {
    #[arg(long)]
    pub radius: Option<f64>,

    #[arg(long)]
    pub min_genes: Option<usize>,

    #[arg(long, allow_negative_numbers = true)]
    pub box_min: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub box_max: Option<f64>,

    #[arg(long, help = "Accepted spheres to test")]
    pub samples: Option<usize>,

    #[arg(long, help = "Random draws per p-value")]
    pub random_samples: Option<usize>,

    #[arg(long)]
    pub p_adj: Option<f64>,

    #[arg(long)]
    pub overlap: Option<f64>,

    #[arg(long)]
    pub max_rejected: Option<usize>,

    #[arg(long, value_enum)]
    pub null_model: Option<NullModelArg>,

    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, help = "Number of threads (0 = auto)")]
    pub threads: Option<usize>,

    #[arg(long, help = "Replication timing: minimum genome-order jump per sphere")]
    pub min_index_jump: Option<usize>,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut SphereConfig) {
        if let Some(v) = self.radius {
            config.sphere_radius = v;
        }
        if let Some(v) = self.min_genes {
            config.minimum_gene_count = v;
        }
        if let Some(v) = self.box_min {
            config.box_min = v;
        }
        if let Some(v) = self.box_max {
            config.box_max = v;
        }
        if let Some(v) = self.samples {
            config.sample_count = v;
        }
        if let Some(v) = self.random_samples {
            config.random_sample_count = v;
        }
        if let Some(v) = self.p_adj {
            config.p_adj_threshold = v;
        }
        if let Some(v) = self.overlap {
            config.overlap_threshold = v;
        }
        if let Some(v) = self.max_rejected {
            config.max_rejected_draws = v;
        }
        if let Some(v) = self.null_model {
            config.null_model = v.into();
        }
        if let Some(v) = self.seed {
            config.seed = Some(v);
        }
        if let Some(v) = self.threads {
            config.threads = v;
        }
        if let Some(v) = self.min_index_jump {
            config.min_index_jump = v;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SignalArg {
    Histone,
    MotifDistance,
    MotifIndex,
    Taxon,
    Species,
    Coexpression,
    ReplicationTiming,
}

impl From<SignalArg> for SignalKind {
    fn from(arg: SignalArg) -> Self {
        match arg {
            SignalArg::Histone => SignalKind::Histone,
            SignalArg::MotifDistance => SignalKind::MotifDistance,
            SignalArg::MotifIndex => SignalKind::MotifIndex,
            SignalArg::Taxon => SignalKind::Taxon,
            SignalArg::Species => SignalKind::Species,
            SignalArg::Coexpression => SignalKind::Coexpression,
            SignalArg::ReplicationTiming => SignalKind::ReplicationTiming,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NullModelArg {
    PerSize,
    PerTrial,
}

impl From<NullModelArg> for NullModel {
    fn from(arg: NullModelArg) -> Self {
        match arg {
            NullModelArg::PerSize => NullModel::PerSize,
            NullModelArg::PerTrial => NullModel::PerTrial,
        }
    }
}
