use std::path::Path;

use anyhow::{Context, Result};

use crate::ctx::Ctx;
use crate::schema::v1::{
    BestTrial, ClusterSummary, Clustering, InputMeta, OutputFiles, Sampling, Significance,
    SignalInfo, SphereReportV1,
};
use crate::signal::Signal;

pub fn build_report<S: Signal>(ctx: &Ctx<S>) -> Result<SphereReportV1> {
    let kind = ctx.signal.kind();
    let signal = SignalInfo {
        id: kind.id().to_string(),
        description: kind.description().to_string(),
        tail: ctx.signal.tail().as_str().to_string(),
        table_name: ctx.table_name.clone(),
    };

    let input_meta = InputMeta {
        path: ctx.input.display().to_string(),
        entities: ctx.population.len() as u64,
        outside_box: ctx.outside_box as u64,
    };

    let sampling = Sampling {
        accepted_spheres: ctx.trials.len() as u64,
        rejected_draws: ctx.rejected_draws as u64,
        average_genes_per_sphere: ctx.average_genes_per_sphere,
        distinct_sizes: ctx.distinct_sizes as u64,
        null_model: ctx.config.null_model.as_str().to_string(),
        random_sample_count: ctx.config.random_sample_count as u64,
    };

    let best_trial = ctx.best_trial().map(|t| BestTrial {
        trial_id: t.id as u64,
        p_value: t.p_value,
        adjusted_p_value: t.adjusted_p_value,
        genes: t
            .members
            .iter()
            .map(|&idx| ctx.population[idx].name.clone())
            .collect(),
    });
    let significance = Significance {
        p_adj_threshold: ctx.config.p_adj_threshold,
        significant_trials: ctx.significant.len() as u64,
        significant_genes: ctx.significant_genes.len() as u64,
        best_trial,
    };

    let clustering = Clustering {
        overlap_threshold: ctx.config.overlap_threshold,
        input_sets: ctx.significant.len() as u64,
        merges: ctx.cluster_merges as u64,
        max_overlap_ratio: ctx.max_overlap_ratio,
        clusters: ctx
            .clusters
            .iter()
            .map(|c| ClusterSummary {
                label: c.label.clone(),
                size: c.genes.len() as u64,
                statistic: c.statistic,
                genes: c.genes.clone(),
            })
            .collect(),
    };

    let outputs = if ctx.write_tsv {
        OutputFiles {
            trials_tsv: file_name(&ctx.output.trials_path),
            pvalues_tsv: file_name(&ctx.output.pvalues_path),
            clusters_tsv: if ctx.clusters.is_empty() {
                None
            } else {
                file_name(&ctx.output.clusters_path)
            },
        }
    } else {
        OutputFiles::default()
    };

    Ok(SphereReportV1 {
        tool: "sphere-test".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        schema_version: "v1".to_string(),
        seed: ctx.seed,
        signal,
        config: ctx.config.clone(),
        input_meta,
        sampling,
        significance,
        clustering,
        genome_statistic: ctx.genome_statistic,
        outputs,
        warnings: ctx.warnings.clone(),
    })
}

pub fn write_json(path: &Path, report: &SphereReportV1) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let writer = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|s| s.to_string_lossy().to_string())
}
