use std::collections::{BTreeMap, HashMap};

use anyhow::{Result, bail};

use crate::entity::{Entity, FromColumns};
use crate::signal::{Signal, SignalKind, Tail, require_members};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taxon(pub String);

impl FromColumns for Taxon {
    fn from_columns(_row: usize, columns: &[&str]) -> Result<Self> {
        if columns.len() != 1 {
            bail!("taxon payload needs exactly 1 column, got {}", columns.len());
        }
        let taxon = columns[0].trim();
        if taxon.is_empty() {
            bail!("empty taxon");
        }
        Ok(Self(taxon.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct TaxonEnrichment {
    genome_frequency: HashMap<String, f64>,
}

impl TaxonEnrichment {
    pub fn from_population(population: &[Entity<Taxon>]) -> Result<Self> {
        if population.is_empty() {
            bail!("cannot derive taxon frequencies from an empty population");
        }
        let mut counts: HashMap<String, f64> = HashMap::new();
        for entity in population {
            *counts.entry(entity.payload.0.clone()).or_insert(0.0) += 1.0;
        }
        let total = population.len() as f64;
        for v in counts.values_mut() {
            *v /= total;
        }
        Ok(Self {
            genome_frequency: counts,
        })
    }

    pub fn genome_frequency(&self, taxon: &str) -> Option<f64> {
        self.genome_frequency.get(taxon).copied()
    }
}

impl Signal for TaxonEnrichment {
    type Payload = Taxon;

    fn kind(&self) -> SignalKind {
        SignalKind::Taxon
    }

    fn tail(&self) -> Tail {
        Tail::Upper
    }

    fn statistic(&self, sample: &[&Entity<Taxon>]) -> Result<f64> {
        require_members(sample)?;
        let mut group: BTreeMap<&str, f64> = BTreeMap::new();
        for entity in sample {
            *group.entry(entity.payload.0.as_str()).or_insert(0.0) += 1.0;
        }
        let n = sample.len() as f64;
        let mut best = 0.0f64;
        for (taxon, count) in group {
            let Some(genome) = self.genome_frequency(taxon) else {
                bail!("taxon '{}' missing from genome frequencies", taxon);
            };
            let enrichment = (count / n) / genome;
            best = best.max(enrichment.ln().abs());
        }
        Ok(best)
    }
}
