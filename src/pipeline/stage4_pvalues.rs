use anyhow::{Result, bail};
use tracing::info;

use crate::config::NullModel;
use crate::ctx::Ctx;
use crate::pipeline::Stage;
use crate::signal::Signal;
use crate::trial::evaluate_trials;

pub struct Stage4Pvalues;

impl Stage4Pvalues {
    pub fn new() -> Self {
        Self
    }
}

impl<S: Signal> Stage<S> for Stage4Pvalues {
    fn name(&self) -> &'static str {
        "stage4_pvalues"
    }

    fn run(&self, ctx: &mut Ctx<S>) -> Result<()> {
        if ctx.config.null_model == NullModel::PerSize && ctx.null_cache.is_none() {
            bail!("per-size null model selected but no null cache was built");
        }

        evaluate_trials(
            &mut ctx.trials,
            &ctx.signal,
            &ctx.population,
            ctx.null_cache.as_ref(),
            ctx.config.random_sample_count,
            ctx.seed,
            ctx.config.threads,
        )?;

        let floored = ctx.trials.iter().filter(|t| t.chance_wins == 0).count();
        info!(
            trials = ctx.trials.len(),
            floored,
            "pvalues_ready"
        );
        Ok(())
    }
}
