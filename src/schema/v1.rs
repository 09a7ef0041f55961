use serde::{Deserialize, Serialize};

use crate::config::SphereConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalInfo {
    pub id: String,
    pub description: String,
    pub tail: String,
    pub table_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputMeta {
    pub path: String,
    pub entities: u64,
    pub outside_box: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sampling {
    pub accepted_spheres: u64,
    pub rejected_draws: u64,
    pub average_genes_per_sphere: f64,
    pub distinct_sizes: u64,
    pub null_model: String,
    pub random_sample_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BestTrial {
    pub trial_id: u64,
    pub p_value: f64,
    pub adjusted_p_value: f64,
    pub genes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Significance {
    pub p_adj_threshold: f64,
    pub significant_trials: u64,
    pub significant_genes: u64,
    pub best_trial: Option<BestTrial>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub label: String,
    pub size: u64,
    pub statistic: Option<f64>,
    pub genes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clustering {
    pub overlap_threshold: f64,
    pub input_sets: u64,
    pub merges: u64,
    pub max_overlap_ratio: f64,
    pub clusters: Vec<ClusterSummary>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputFiles {
    pub trials_tsv: Option<String>,
    pub pvalues_tsv: Option<String>,
    pub clusters_tsv: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SphereReportV1 {
    pub tool: String,
    pub version: String,
    pub schema_version: String,
    pub seed: u64,
    pub signal: SignalInfo,
    pub config: SphereConfig,
    pub input_meta: InputMeta,
    pub sampling: Sampling,
    pub significance: Significance,
    pub clustering: Clustering,
    pub genome_statistic: Option<f64>,
    pub outputs: OutputFiles,
    pub warnings: Vec<String>,
}
