use anyhow::{Context, Result, bail};

use crate::entity::{Entity, FromColumns};
use crate::math::stats::pairwise_mean;
use crate::signal::{Signal, SignalKind, Tail};

#[derive(Debug, Clone, PartialEq)]
pub struct HistoneProfile {
    pub marks: Vec<f64>,
}

impl FromColumns for HistoneProfile {
    fn from_columns(_row: usize, columns: &[&str]) -> Result<Self> {
        if columns.is_empty() {
            bail!("histone profile needs at least one mark column");
        }
        let marks = columns
            .iter()
            .enumerate()
            .map(|(idx, raw)| {
                raw.trim()
                    .parse::<f64>()
                    .with_context(|| format!("invalid histone mark {} '{}'", idx + 1, raw))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { marks })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HistoneDistance;

impl HistoneDistance {
    pub fn distance(a: &Entity<HistoneProfile>, b: &Entity<HistoneProfile>) -> Result<f64> {
        let (ma, mb) = (&a.payload.marks, &b.payload.marks);
        if ma.len() != mb.len() {
            bail!(
                "histone count mismatch: gene {}({}) - gene {}({})",
                a.name,
                ma.len(),
                b.name,
                mb.len()
            );
        }
        let sq: f64 = ma
            .iter()
            .zip(mb)
            .map(|(x, y)| {
                let d = y - x;
                d * d
            })
            .sum();
        Ok(sq.sqrt())
    }
}

impl Signal for HistoneDistance {
    type Payload = HistoneProfile;

    fn kind(&self) -> SignalKind {
        SignalKind::Histone
    }

    fn tail(&self) -> Tail {
        Tail::Lower
    }

    fn min_sample_len(&self) -> usize {
        2
    }

    fn statistic(&self, sample: &[&Entity<HistoneProfile>]) -> Result<f64> {
        pairwise_mean(sample, |a, b| Self::distance(a, b))
    }
}
