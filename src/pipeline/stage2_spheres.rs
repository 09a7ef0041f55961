use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::pipeline::Stage;
use crate::sampler::{SPHERE_STREAM, SphereSampler, draw_accepted_samples, stream_rng};
use crate::signal::Signal;
use crate::trial::{Trial, distinct_sizes};

pub struct Stage2Spheres;

impl Stage2Spheres {
    pub fn new() -> Self {
        Self
    }
}

impl<S: Signal> Stage<S> for Stage2Spheres {
    fn name(&self) -> &'static str {
        "stage2_spheres"
    }

    fn run(&self, ctx: &mut Ctx<S>) -> Result<()> {
        let rng = stream_rng(ctx.seed, SPHERE_STREAM);
        let mut sampler = SphereSampler::new(
            &ctx.population,
            ctx.config.box_min,
            ctx.config.box_max,
            rng,
        )?;
        let draws = draw_accepted_samples(&mut sampler, &ctx.population, &ctx.signal, &ctx.config)?;

        ctx.rejected_draws = draws.rejected;
        ctx.average_genes_per_sphere = draws.average_size();
        ctx.trials = draws
            .samples
            .into_iter()
            .enumerate()
            .map(|(id, members)| Trial::new(id, members))
            .collect();
        ctx.distinct_sizes = distinct_sizes(&ctx.trials).len();

        info!(
            accepted = ctx.trials.len(),
            rejected = ctx.rejected_draws,
            average_genes = ctx.average_genes_per_sphere,
            distinct_sizes = ctx.distinct_sizes,
            "spheres_ready"
        );
        Ok(())
    }
}
