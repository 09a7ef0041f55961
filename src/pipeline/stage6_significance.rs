use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::entity::name_set;
use crate::pipeline::Stage;
use crate::signal::Signal;

pub struct Stage6Significance;

impl Stage6Significance {
    pub fn new() -> Self {
        Self
    }
}

impl<S: Signal> Stage<S> for Stage6Significance {
    fn name(&self) -> &'static str {
        "stage6_significance"
    }

    fn run(&self, ctx: &mut Ctx<S>) -> Result<()> {
        let threshold = ctx.config.p_adj_threshold;
        ctx.significant = ctx
            .trials
            .iter()
            .enumerate()
            .filter(|(_, t)| t.adjusted_p_value <= threshold)
            .map(|(idx, _)| idx)
            .collect();

        ctx.significant_genes.clear();
        for &idx in &ctx.significant {
            let names = name_set(&ctx.population, &ctx.trials[idx].members);
            ctx.significant_genes.extend(names);
        }

        match ctx.best_trial() {
            Some(best) => info!(
                significant = ctx.significant.len(),
                genes = ctx.significant_genes.len(),
                best_trial = best.id,
                best_p = best.p_value,
                best_adjusted_p = best.adjusted_p_value,
                "significance_ready"
            ),
            None => info!(p_adj_threshold = threshold, "no significant spheres"),
        }
        Ok(())
    }
}
