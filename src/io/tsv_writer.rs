use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::ctx::Ctx;
use crate::signal::Signal;
use crate::trial::Trial;

pub fn write_trials<S: Signal>(path: &Path, ctx: &Ctx<S>) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);

    let mut trials: Vec<&Trial> = ctx.trials.iter().collect();
    trials.sort_by_key(|t| t.id);

    writeln!(
        w,
        "trial_id\tgene_count\tstatistic_in_sphere\tstatistic_in_random\tnull_mean\tnull_median\tchance_wins\tdraws"
    )?;
    for trial in trials {
        ensure_len(trial.draws, ctx.config.random_sample_count, "draws")?;
        writeln!(
            w,
            "{}\t{}\t{:.6}\t{:.6}\t{:.6}\t{:.6}\t{}\t{}",
            trial.id,
            trial.size(),
            trial.statistic_in_sphere,
            trial.statistic_in_random,
            trial.null_mean,
            trial.null_median,
            trial.chance_wins,
            trial.draws
        )?;
    }
    w.flush()?;
    Ok(())
}

pub fn write_pvalues<S: Signal>(path: &Path, ctx: &Ctx<S>) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);

    writeln!(w, "rank\ttrial_id\tp_value\tadjusted_p_value")?;
    for trial in &ctx.trials {
        if trial.rank == 0 {
            bail!("trial {} has no rank; p-values were not adjusted", trial.id);
        }
        writeln!(
            w,
            "{}\t{}\t{:.8}\t{:.8}",
            trial.rank, trial.id, trial.p_value, trial.adjusted_p_value
        )?;
    }
    w.flush()?;
    Ok(())
}

pub fn write_clusters<S: Signal>(path: &Path, ctx: &Ctx<S>) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);

    writeln!(w, "gene\t{}", ctx.table_name)?;
    for cluster in &ctx.clusters {
        for gene in &cluster.genes {
            writeln!(w, "{}\t{}", gene, cluster.label)?;
        }
    }
    w.flush()?;
    Ok(())
}

fn ensure_len(got: usize, expected: usize, name: &str) -> Result<()> {
    if got != expected {
        bail!("{} length mismatch: {} != {}", name, got, expected);
    }
    Ok(())
}
