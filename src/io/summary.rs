use std::fmt::Write;

use anyhow::Result;

use crate::ctx::Ctx;
use crate::signal::Signal;

const MAX_LISTED_GENES: usize = 20;

pub fn format_summary<S: Signal>(ctx: &Ctx<S>) -> Result<String> {
    let version = env!("CARGO_PKG_VERSION");
    let kind = ctx.signal.kind();
    let config = &ctx.config;

    let mut out = String::new();
    writeln!(out, "sphere-test v{}", version)?;
    writeln!(
        out,
        "Signal: {} ({}), tail={}",
        kind.id(),
        ctx.table_name,
        ctx.signal.tail().as_str()
    )?;
    writeln!(
        out,
        "Input: {} entities, seed={}",
        ctx.population.len(),
        ctx.seed
    )?;
    writeln!(
        out,
        "Spheres: {} accepted, {} rejected, {:.1} genes on average (radius {})",
        ctx.trials.len(),
        ctx.rejected_draws,
        ctx.average_genes_per_sphere,
        config.sphere_radius
    )?;
    writeln!(
        out,
        "Null model: {}, {} random draws per p-value",
        config.null_model.as_str(),
        config.random_sample_count
    )?;
    writeln!(
        out,
        "Significant: {} spheres (p_adj <= {}), {} genes",
        ctx.significant.len(),
        config.p_adj_threshold,
        ctx.significant_genes.len()
    )?;

    match ctx.best_trial() {
        Some(best) => {
            let names: Vec<&str> = best
                .members
                .iter()
                .take(MAX_LISTED_GENES)
                .map(|&idx| ctx.population[idx].name.as_str())
                .collect();
            let more = best.size().saturating_sub(names.len());
            write!(
                out,
                "Best sphere: p={:.6} p_adj={:.6} genes: {}",
                best.p_value,
                best.adjusted_p_value,
                names.join(" ")
            )?;
            if more > 0 {
                write!(out, " (+{} more)", more)?;
            }
            writeln!(out)?;
        }
        None => writeln!(out, "Best sphere: none")?,
    }

    writeln!(
        out,
        "Clusters: {} (stopped at {:.2}% maximum gene overlap)",
        ctx.clusters.len(),
        ctx.max_overlap_ratio * 100.0
    )?;
    for cluster in &ctx.clusters {
        match cluster.statistic {
            Some(value) => writeln!(
                out,
                "  {}: {} genes, statistic={:.6}",
                cluster.label,
                cluster.genes.len(),
                value
            )?,
            None => writeln!(out, "  {}: {} genes", cluster.label, cluster.genes.len())?,
        }
    }
    match ctx.genome_statistic {
        Some(value) => writeln!(out, "Genome statistic: {:.6}", value)?,
        None => writeln!(out, "Genome statistic: n/a")?,
    }

    Ok(out)
}
