use anyhow::Result;
use std::time::Instant;
use tracing::{info, warn};

use crate::ctx::Ctx;
use crate::parallel;
use crate::signal::Signal;

pub mod stage0_scaffold;
pub mod stage1_input;
pub mod stage2_spheres;
pub mod stage3_null;
pub mod stage4_pvalues;
pub mod stage5_fdr;
pub mod stage6_significance;
pub mod stage7_cluster;
pub mod stage8_output;

use stage0_scaffold::Stage0Scaffold;
use stage1_input::Stage1Input;
use stage2_spheres::Stage2Spheres;
use stage3_null::Stage3Null;
use stage4_pvalues::Stage4Pvalues;
use stage5_fdr::Stage5Fdr;
use stage6_significance::Stage6Significance;
use stage7_cluster::Stage7Cluster;
use stage8_output::Stage8Output;

pub trait Stage<S: Signal> {
    fn name(&self) -> &'static str;
    fn run(&self, ctx: &mut Ctx<S>) -> Result<()>;
}

pub struct Pipeline<S: Signal> {
    stages: Vec<Box<dyn Stage<S>>>,
}

impl<S: Signal> Pipeline<S> {
    pub fn new(stages: Vec<Box<dyn Stage<S>>>) -> Self {
        Self { stages }
    }

    pub fn sphere_test() -> Self {
        Self::new(vec![
            Box::new(Stage0Scaffold::new()),
            Box::new(Stage1Input::new()),
            Box::new(Stage2Spheres::new()),
            Box::new(Stage3Null::new()),
            Box::new(Stage4Pvalues::new()),
            Box::new(Stage5Fdr::new()),
            Box::new(Stage6Significance::new()),
            Box::new(Stage7Cluster::new()),
            Box::new(Stage8Output::new()),
        ])
    }

    pub fn validation() -> Self {
        Self::new(vec![Box::new(Stage1Input::new())])
    }

    pub fn run(&self, ctx: &mut Ctx<S>) -> Result<()> {
        info!(
            signal = ctx.signal.kind().id(),
            tail = ctx.signal.tail().as_str(),
            seed = ctx.seed,
            workers = parallel::worker_count(ctx.config.threads),
            "sphere test configured"
        );
        for stage in &self.stages {
            let start = Instant::now();
            info!(stage = stage.name(), "stage started");
            if let Err(err) = stage.run(ctx) {
                let elapsed_ms = start.elapsed().as_millis();
                warn!(
                    stage = stage.name(),
                    elapsed_ms = elapsed_ms as u64,
                    "stage failed"
                );
                return Err(err);
            }
            let elapsed_ms = start.elapsed().as_millis();
            info!(
                stage = stage.name(),
                elapsed_ms = elapsed_ms as u64,
                "stage finished"
            );
        }
        Ok(())
    }
}
