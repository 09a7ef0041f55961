use std::collections::HashMap;

use anyhow::Result;
use tracing::{info, warn};

use crate::cluster::{GeneSet, cluster_gene_sets};
use crate::ctx::Ctx;
use crate::entity::{name_set, resolve};
use crate::pipeline::Stage;
use crate::signal::Signal;

pub struct Stage7Cluster;

impl Stage7Cluster {
    pub fn new() -> Self {
        Self
    }
}

impl<S: Signal> Stage<S> for Stage7Cluster {
    fn name(&self) -> &'static str {
        "stage7_cluster"
    }

    fn run(&self, ctx: &mut Ctx<S>) -> Result<()> {
        let sets: Vec<GeneSet> = ctx
            .significant
            .iter()
            .map(|&idx| name_set(&ctx.population, &ctx.trials[idx].members))
            .collect();
        let mut outcome = cluster_gene_sets(sets, ctx.config.overlap_threshold);

        let index: HashMap<&str, usize> = ctx
            .population
            .iter()
            .enumerate()
            .map(|(idx, e)| (e.name.as_str(), idx))
            .collect();
        let mut warnings = Vec::new();
        for cluster in &mut outcome.clusters {
            let members: Vec<usize> = cluster
                .genes
                .iter()
                .filter_map(|g| index.get(g.as_str()).copied())
                .collect();
            match ctx.signal.statistic(&resolve(&ctx.population, &members)) {
                Ok(value) => cluster.statistic = Some(value),
                Err(err) => {
                    warn!(cluster = %cluster.label, error = %err, "cluster_statistic_skipped");
                    warnings.push(format!("cluster {}: no statistic ({})", cluster.label, err));
                }
            }
        }

        let all: Vec<usize> = (0..ctx.population.len()).collect();
        ctx.genome_statistic = match ctx.signal.statistic(&resolve(&ctx.population, &all)) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(error = %err, "genome_statistic_skipped");
                warnings.push(format!("genome statistic unavailable ({})", err));
                None
            }
        };
        ctx.warnings.extend(warnings);

        info!(
            input_sets = outcome.input_sets,
            merges = outcome.merges,
            clusters = outcome.clusters.len(),
            max_overlap_ratio = outcome.max_overlap_ratio,
            "clusters_ready"
        );
        for cluster in &outcome.clusters {
            info!(cluster = %cluster.label, genes = cluster.genes.len(), "cluster");
        }

        ctx.clusters = outcome.clusters;
        ctx.cluster_merges = outcome.merges;
        ctx.max_overlap_ratio = outcome.max_overlap_ratio;
        Ok(())
    }
}
