use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::signal::replication::DEFAULT_MIN_INDEX_JUMP;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NullModel {
    PerSize,
    PerTrial,
}

impl NullModel {
    pub fn as_str(self) -> &'static str {
        match self {
            NullModel::PerSize => "per-size",
            NullModel::PerTrial => "per-trial",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SphereConfig {
    pub sphere_radius: f64,
    pub minimum_gene_count: usize,
    pub box_min: f64,
    pub box_max: f64,
    pub sample_count: usize,
    pub random_sample_count: usize,
    pub p_adj_threshold: f64,
    pub overlap_threshold: f64,
    pub max_rejected_draws: usize,
    pub null_model: NullModel,
    pub seed: Option<u64>,
    /// Worker threads (0 = auto).
    pub threads: usize,
    pub min_index_jump: usize,
}

impl Default for SphereConfig {
    fn default() -> Self {
        Self {
            sphere_radius: 15.0,
            minimum_gene_count: 50,
            box_min: 0.0,
            box_max: 210.0,
            sample_count: 10_000,
            random_sample_count: 10_000,
            p_adj_threshold: 0.05,
            overlap_threshold: 0.05,
            max_rejected_draws: 1_000_000,
            null_model: NullModel::PerSize,
            seed: None,
            threads: 0,
            min_index_jump: DEFAULT_MIN_INDEX_JUMP,
        }
    }
}

impl SphereConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: SphereConfig = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.sphere_radius.is_finite() || self.sphere_radius <= 0.0 {
            bail!("sphere_radius must be a positive number, got {}", self.sphere_radius);
        }
        if !self.box_min.is_finite() || !self.box_max.is_finite() {
            bail!("sampling box bounds must be finite");
        }
        if self.box_min >= self.box_max {
            bail!(
                "box_min ({}) must be below box_max ({})",
                self.box_min,
                self.box_max
            );
        }
        if self.minimum_gene_count == 0 {
            bail!("minimum_gene_count must be at least 1");
        }
        if self.sample_count == 0 {
            bail!("sample_count must be at least 1");
        }
        if self.random_sample_count == 0 {
            bail!("random_sample_count must be at least 1");
        }
        check_unit("p_adj_threshold", self.p_adj_threshold)?;
        check_unit("overlap_threshold", self.overlap_threshold)?;
        Ok(())
    }
}

fn check_unit(name: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        bail!("{} must lie in [0, 1], got {}", name, value);
    }
    Ok(())
}
