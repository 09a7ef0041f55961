use anyhow::{Context, Result, bail};

use crate::entity::{Entity, FromColumns};
use crate::math::stats::population_stdev;
use crate::signal::{Signal, SignalKind, Tail, require_members};

pub const DEFAULT_MIN_INDEX_JUMP: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplicationTiming {
    pub timing: f64,
    pub order: usize,
}

impl FromColumns for ReplicationTiming {
    fn from_columns(row: usize, columns: &[&str]) -> Result<Self> {
        if columns.len() != 1 {
            bail!(
                "replication timing payload needs exactly 1 column, got {}",
                columns.len()
            );
        }
        let timing = columns[0]
            .trim()
            .parse::<f64>()
            .with_context(|| format!("invalid replication timing '{}'", columns[0]))?;
        Ok(Self { timing, order: row })
    }
}

/// Replication timing is smooth along the chromosome, so a sphere is only
/// accepted when it spans a jump of at least `min_index_jump` genes in genome
/// order (several chromosomes, or distant parts of one).
#[derive(Debug, Clone, Copy)]
pub struct ReplicationSpread {
    pub min_index_jump: usize,
}

impl Default for ReplicationSpread {
    fn default() -> Self {
        Self {
            min_index_jump: DEFAULT_MIN_INDEX_JUMP,
        }
    }
}

impl Signal for ReplicationSpread {
    type Payload = ReplicationTiming;

    fn kind(&self) -> SignalKind {
        SignalKind::ReplicationTiming
    }

    fn tail(&self) -> Tail {
        Tail::Upper
    }

    fn statistic(&self, sample: &[&Entity<ReplicationTiming>]) -> Result<f64> {
        require_members(sample)?;
        let timings: Vec<f64> = sample.iter().map(|e| e.payload.timing).collect();
        Ok(population_stdev(&timings))
    }

    fn accept_sample(&self, sample: &[&Entity<ReplicationTiming>]) -> bool {
        let mut orders: Vec<usize> = sample.iter().map(|e| e.payload.order).collect();
        orders.sort_unstable();
        orders
            .windows(2)
            .any(|w| w[1] - w[0] >= self.min_index_jump)
    }
}
