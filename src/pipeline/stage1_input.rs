use std::collections::HashMap;

use anyhow::{Result, bail};
use tracing::{info, warn};

use crate::ctx::Ctx;
use crate::pipeline::Stage;
use crate::signal::Signal;

pub struct Stage1Input;

impl Stage1Input {
    pub fn new() -> Self {
        Self
    }
}

impl<S: Signal> Stage<S> for Stage1Input {
    fn name(&self) -> &'static str {
        "stage1_input"
    }

    fn run(&self, ctx: &mut Ctx<S>) -> Result<()> {
        ctx.config.validate()?;
        let min_len = ctx.signal.min_sample_len();
        if ctx.config.minimum_gene_count < min_len {
            bail!(
                "minimum_gene_count {} is too small for the {} signal, which needs at least {} genes per sphere",
                ctx.config.minimum_gene_count,
                ctx.signal.kind().id(),
                min_len
            );
        }

        if ctx.population.is_empty() {
            bail!("no entities loaded from {}", ctx.input.display());
        }

        let mut seen: HashMap<&str, usize> = HashMap::with_capacity(ctx.population.len());
        let mut outside_box = 0usize;
        for (idx, entity) in ctx.population.iter().enumerate() {
            if let Some(first) = seen.insert(entity.name.as_str(), idx) {
                bail!(
                    "duplicate entity name '{}' (entities {} and {})",
                    entity.name,
                    first,
                    idx
                );
            }
            if !entity.position.is_finite() {
                bail!("entity '{}' has a non-finite position", entity.name);
            }
            if !entity
                .position
                .within_box(ctx.config.box_min, ctx.config.box_max)
            {
                outside_box += 1;
            }
        }

        if ctx.population.len() < ctx.config.minimum_gene_count {
            bail!(
                "population of {} entities is smaller than minimum_gene_count {}",
                ctx.population.len(),
                ctx.config.minimum_gene_count
            );
        }

        if outside_box > 0 {
            let message = format!(
                "{} entities lie outside the sampling box [{}, {}] and can only be reached near its faces",
                outside_box, ctx.config.box_min, ctx.config.box_max
            );
            warn!(outside_box, "entities_outside_box");
            ctx.warnings.push(message);
        }
        ctx.outside_box = outside_box;

        info!(
            input = %ctx.input.display(),
            entities = ctx.population.len(),
            outside_box,
            "population_ready"
        );
        Ok(())
    }
}
