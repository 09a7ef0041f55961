use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::fdr::benjamini_hochberg;
use crate::pipeline::Stage;
use crate::signal::Signal;

pub struct Stage5Fdr;

impl Stage5Fdr {
    pub fn new() -> Self {
        Self
    }
}

impl<S: Signal> Stage<S> for Stage5Fdr {
    fn name(&self) -> &'static str {
        "stage5_fdr"
    }

    fn run(&self, ctx: &mut Ctx<S>) -> Result<()> {
        benjamini_hochberg(&mut ctx.trials);
        let best = ctx.trials.first().map(|t| t.adjusted_p_value);
        info!(
            trials = ctx.trials.len(),
            best_adjusted_p = best.unwrap_or(1.0),
            "pvalues_adjusted"
        );
        Ok(())
    }
}
