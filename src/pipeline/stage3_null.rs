use anyhow::Result;
use tracing::info;

use crate::config::NullModel;
use crate::ctx::Ctx;
use crate::pipeline::Stage;
use crate::signal::Signal;
use crate::trial::{NullCache, distinct_sizes};

pub struct Stage3Null;

impl Stage3Null {
    pub fn new() -> Self {
        Self
    }
}

impl<S: Signal> Stage<S> for Stage3Null {
    fn name(&self) -> &'static str {
        "stage3_null"
    }

    fn run(&self, ctx: &mut Ctx<S>) -> Result<()> {
        if ctx.config.null_model == NullModel::PerTrial {
            ctx.null_cache = None;
            info!(null_model = NullModel::PerTrial.as_str(), "null_cache_skipped");
            return Ok(());
        }

        let sizes = distinct_sizes(&ctx.trials);
        let cache = NullCache::build(
            &ctx.signal,
            &ctx.population,
            &sizes,
            ctx.config.random_sample_count,
            ctx.seed,
            ctx.config.threads,
        )?;
        info!(
            sizes = cache.len(),
            draws_per_size = ctx.config.random_sample_count,
            "null_cache_ready"
        );
        ctx.null_cache = Some(cache);
        Ok(())
    }
}
