use anyhow::{Context, Result, bail};

use crate::entity::{Entity, FromColumns};
use crate::math::stats::root_sum_sq_dev;
use crate::signal::{Signal, SignalKind, Tail, require_members};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeciesCount(pub u32);

impl FromColumns for SpeciesCount {
    fn from_columns(_row: usize, columns: &[&str]) -> Result<Self> {
        if columns.len() != 1 {
            bail!(
                "species payload needs exactly 1 column, got {}",
                columns.len()
            );
        }
        let count = columns[0]
            .trim()
            .parse::<u32>()
            .with_context(|| format!("invalid species count '{}'", columns[0]))?;
        Ok(Self(count))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SpeciesSpread;

impl Signal for SpeciesSpread {
    type Payload = SpeciesCount;

    fn kind(&self) -> SignalKind {
        SignalKind::Species
    }

    fn tail(&self) -> Tail {
        Tail::Lower
    }

    fn statistic(&self, sample: &[&Entity<SpeciesCount>]) -> Result<f64> {
        require_members(sample)?;
        let counts: Vec<f64> = sample.iter().map(|e| e.payload.0 as f64).collect();
        Ok(root_sum_sq_dev(&counts))
    }
}
