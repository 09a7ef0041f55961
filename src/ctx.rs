use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::cluster::Cluster;
use crate::config::SphereConfig;
use crate::entity::Entity;
use crate::schema::v1::SphereReportV1;
use crate::signal::Signal;
use crate::trial::{NullCache, Trial};

#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub out_dir: PathBuf,
    pub trials_path: PathBuf,
    pub pvalues_path: PathBuf,
    pub clusters_path: PathBuf,
    pub json_path: PathBuf,
}

impl OutputPaths {
    pub fn new(out_dir: PathBuf) -> Self {
        Self {
            trials_path: out_dir.join("trials.tsv"),
            pvalues_path: out_dir.join("pvalues.tsv"),
            clusters_path: out_dir.join("clusters.tsv"),
            json_path: out_dir.join("report.json"),
            out_dir,
        }
    }
}

pub struct Ctx<S: Signal> {
    pub input: PathBuf,
    pub signal: S,
    pub config: SphereConfig,
    pub seed: u64,
    pub table_name: String,
    pub write_json: bool,
    pub write_tsv: bool,
    pub population: Vec<Entity<S::Payload>>,
    pub outside_box: usize,
    pub warnings: Vec<String>,
    pub trials: Vec<Trial>,
    pub rejected_draws: usize,
    pub average_genes_per_sphere: f64,
    pub distinct_sizes: usize,
    pub null_cache: Option<NullCache>,
    pub significant: Vec<usize>,
    pub significant_genes: BTreeSet<String>,
    pub clusters: Vec<Cluster>,
    pub cluster_merges: usize,
    pub max_overlap_ratio: f64,
    pub genome_statistic: Option<f64>,
    pub output: OutputPaths,
    pub report: Option<SphereReportV1>,
}

impl<S: Signal> Ctx<S> {
    pub fn new(
        input: PathBuf,
        out_dir: PathBuf,
        signal: S,
        population: Vec<Entity<S::Payload>>,
        config: SphereConfig,
        seed: u64,
    ) -> Self {
        let table_name = signal.kind().table_name().to_string();
        Self {
            input,
            signal,
            config,
            seed,
            table_name,
            write_json: false,
            write_tsv: false,
            population,
            outside_box: 0,
            warnings: Vec::new(),
            trials: Vec::new(),
            rejected_draws: 0,
            average_genes_per_sphere: 0.0,
            distinct_sizes: 0,
            null_cache: None,
            significant: Vec::new(),
            significant_genes: BTreeSet::new(),
            clusters: Vec::new(),
            cluster_merges: 0,
            max_overlap_ratio: 0.0,
            genome_statistic: None,
            output: OutputPaths::new(out_dir),
            report: None,
        }
    }

    pub fn best_trial(&self) -> Option<&Trial> {
        self.significant.first().map(|&idx| &self.trials[idx])
    }
}
