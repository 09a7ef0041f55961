use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::io::{json_writer, tsv_writer};
use crate::pipeline::Stage;
use crate::signal::Signal;

pub struct Stage8Output;

impl Stage8Output {
    pub fn new() -> Self {
        Self
    }
}

impl<S: Signal> Stage<S> for Stage8Output {
    fn name(&self) -> &'static str {
        "stage8_output"
    }

    fn run(&self, ctx: &mut Ctx<S>) -> Result<()> {
        if ctx.write_tsv {
            tsv_writer::write_trials(&ctx.output.trials_path, ctx)?;
            tsv_writer::write_pvalues(&ctx.output.pvalues_path, ctx)?;
            if ctx.clusters.is_empty() {
                info!("no clusters found - clusters table not written");
            } else {
                tsv_writer::write_clusters(&ctx.output.clusters_path, ctx)?;
            }
        }

        let report = json_writer::build_report(ctx)?;
        if ctx.write_json {
            json_writer::write_json(&ctx.output.json_path, &report)?;
        }
        ctx.report = Some(report);

        info!("stage8_output_ready");
        Ok(())
    }
}
