use anyhow::{Context, Result, bail};

use crate::entity::{Entity, FromColumns};
use crate::math::stats::pairwise_mean;
use crate::signal::{Signal, SignalKind, Tail};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotifSet {
    words: Vec<u64>,
    len: usize,
}

impl MotifSet {
    pub fn from_flags(flags: &[bool]) -> Self {
        let mut words = vec![0u64; flags.len().div_ceil(64)];
        for (idx, &present) in flags.iter().enumerate() {
            if present {
                words[idx / 64] |= 1u64 << (idx % 64);
            }
        }
        Self {
            words,
            len: flags.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn count(&self) -> u32 {
        self.words.iter().map(|w| w.count_ones()).sum()
    }

    fn combine(&self, other: &MotifSet, op: impl Fn(u64, u64) -> u64) -> u32 {
        self.words
            .iter()
            .zip(&other.words)
            .map(|(a, b)| op(*a, *b).count_ones())
            .sum()
    }

    pub fn intersection_count(&self, other: &MotifSet) -> u32 {
        self.combine(other, |a, b| a & b)
    }

    pub fn union_count(&self, other: &MotifSet) -> u32 {
        self.combine(other, |a, b| a | b)
    }

    pub fn difference_count(&self, other: &MotifSet) -> u32 {
        self.combine(other, |a, b| a ^ b)
    }
}

impl FromColumns for MotifSet {
    fn from_columns(_row: usize, columns: &[&str]) -> Result<Self> {
        if columns.is_empty() {
            bail!("motif set needs at least one motif column");
        }
        let flags = columns
            .iter()
            .enumerate()
            .map(|(idx, raw)| {
                raw.trim()
                    .parse::<i64>()
                    .map(|v| v != 0)
                    .with_context(|| format!("invalid motif flag {} '{}'", idx + 1, raw))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_flags(&flags))
    }
}

fn check_width(a: &Entity<MotifSet>, b: &Entity<MotifSet>) -> Result<()> {
    if a.payload.len() != b.payload.len() {
        bail!(
            "motif count mismatch: gene {}({}) - gene {}({})",
            a.name,
            a.payload.len(),
            b.name,
            b.payload.len()
        );
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MotifDistance;

impl Signal for MotifDistance {
    type Payload = MotifSet;

    fn kind(&self) -> SignalKind {
        SignalKind::MotifDistance
    }

    fn tail(&self) -> Tail {
        Tail::TwoSided
    }

    fn min_sample_len(&self) -> usize {
        2
    }

    fn statistic(&self, sample: &[&Entity<MotifSet>]) -> Result<f64> {
        pairwise_mean(sample, |a, b| {
            check_width(a, b)?;
            Ok(a.payload.difference_count(&b.payload) as f64)
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MotifIndex;

impl MotifIndex {
    pub fn jaccard(a: &MotifSet, b: &MotifSet) -> f64 {
        let union = a.union_count(b);
        if union == 0 {
            return 0.0;
        }
        a.intersection_count(b) as f64 / union as f64
    }
}

impl Signal for MotifIndex {
    type Payload = MotifSet;

    fn kind(&self) -> SignalKind {
        SignalKind::MotifIndex
    }

    fn tail(&self) -> Tail {
        Tail::Upper
    }

    fn min_sample_len(&self) -> usize {
        2
    }

    fn statistic(&self, sample: &[&Entity<MotifSet>]) -> Result<f64> {
        pairwise_mean(sample, |a, b| {
            check_width(a, b)?;
            Ok(Self::jaccard(&a.payload, &b.payload))
        })
    }
}
