use anyhow::Result;
use serde::Serialize;

use crate::entity::Entity;

pub mod coexpression;
pub mod histone;
pub mod motif;
pub mod replication;
pub mod species;
pub mod taxon;

pub use coexpression::{CoexIndex, CoexpressionScore};
pub use histone::{HistoneDistance, HistoneProfile};
pub use motif::{MotifDistance, MotifIndex, MotifSet};
pub use replication::{ReplicationSpread, ReplicationTiming};
pub use species::{SpeciesCount, SpeciesSpread};
pub use taxon::{Taxon, TaxonEnrichment};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tail {
    Lower,
    Upper,
    /// Counted like `Lower`, then folded with `2 * min(p, 1 - p)`.
    TwoSided,
}

impl Tail {
    pub fn is_more_extreme(self, random: f64, observed: f64) -> bool {
        match self {
            Tail::Lower | Tail::TwoSided => random <= observed,
            Tail::Upper => random >= observed,
        }
    }

    pub fn p_value(self, wins: usize, total: usize) -> f64 {
        let p = wins as f64 / total as f64;
        match self {
            Tail::TwoSided => 2.0 * p.min(1.0 - p),
            Tail::Lower | Tail::Upper => p,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tail::Lower => "lower",
            Tail::Upper => "upper",
            Tail::TwoSided => "two_sided",
        }
    }
}

pub trait Signal: Send + Sync {
    type Payload: Send + Sync;

    fn kind(&self) -> SignalKind;

    fn tail(&self) -> Tail;

    fn statistic(&self, sample: &[&Entity<Self::Payload>]) -> Result<f64>;

    fn is_more_extreme(&self, random: f64, observed: f64) -> bool {
        self.tail().is_more_extreme(random, observed)
    }

    fn p_value(&self, wins: usize, total: usize) -> f64 {
        self.tail().p_value(wins, total)
    }

    /// Smallest group the statistic is defined for.
    fn min_sample_len(&self) -> usize {
        1
    }

    /// Extra acceptance rule for spatial samples, checked after the minimum
    /// gene count.
    fn accept_sample(&self, _sample: &[&Entity<Self::Payload>]) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignalKind {
    Histone,
    MotifDistance,
    MotifIndex,
    Taxon,
    Species,
    Coexpression,
    ReplicationTiming,
}

impl SignalKind {
    pub const ALL: [SignalKind; 7] = [
        SignalKind::Histone,
        SignalKind::MotifDistance,
        SignalKind::MotifIndex,
        SignalKind::Taxon,
        SignalKind::Species,
        SignalKind::Coexpression,
        SignalKind::ReplicationTiming,
    ];

    pub fn id(self) -> &'static str {
        match self {
            SignalKind::Histone => "histone",
            SignalKind::MotifDistance => "motif-distance",
            SignalKind::MotifIndex => "motif-index",
            SignalKind::Taxon => "taxon",
            SignalKind::Species => "species",
            SignalKind::Coexpression => "coexpression",
            SignalKind::ReplicationTiming => "replication-timing",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SignalKind::Histone => {
                "Average gene Euclidean distance of the group, in histone space."
            }
            SignalKind::MotifDistance => {
                "Average count of differing TF motifs between gene pairs of the group."
            }
            SignalKind::MotifIndex => {
                "Average Jaccard index of the group, in the binary space of TF motif presence."
            }
            SignalKind::Taxon => {
                "Strongest absolute log-enrichment of a conservation taxon in the group."
            }
            SignalKind::Species => "Spread of conserved species count within the group.",
            SignalKind::Coexpression => "Average pairwise coexpression score of the group.",
            SignalKind::ReplicationTiming => {
                "Standard deviation of replication timing within the group."
            }
        }
    }

    pub fn table_name(self) -> &'static str {
        match self {
            SignalKind::Histone => "PromoterFields",
            SignalKind::MotifDistance => "MotifFields",
            SignalKind::MotifIndex => "JaccardIndexMotifFields",
            SignalKind::Taxon => "TaxonFields",
            SignalKind::Species => "ConservationFields",
            SignalKind::Coexpression => "CoexpressionFields",
            SignalKind::ReplicationTiming => "ReplicationTimingFields",
        }
    }
}

pub(crate) fn require_members<P>(sample: &[&Entity<P>]) -> Result<()> {
    if sample.is_empty() {
        anyhow::bail!("statistic requested for an empty gene list");
    }
    Ok(())
}
