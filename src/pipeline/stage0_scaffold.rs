use anyhow::{Context, Result};
use std::fs;
use tracing::info;

use crate::ctx::Ctx;
use crate::pipeline::Stage;
use crate::signal::Signal;

pub struct Stage0Scaffold;

impl Stage0Scaffold {
    pub fn new() -> Self {
        Self
    }
}

impl<S: Signal> Stage<S> for Stage0Scaffold {
    fn name(&self) -> &'static str {
        "stage0_scaffold"
    }

    fn run(&self, ctx: &mut Ctx<S>) -> Result<()> {
        fs::create_dir_all(&ctx.output.out_dir).with_context(|| {
            format!(
                "failed to create output directory {}",
                ctx.output.out_dir.display()
            )
        })?;
        info!(
            out_dir = %ctx.output.out_dir.display(),
            json = ctx.write_json,
            tsv = ctx.write_tsv,
            "output_dir_ready"
        );
        Ok(())
    }
}
