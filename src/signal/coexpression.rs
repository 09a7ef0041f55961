use std::sync::Arc;

use anyhow::{Result, bail};
use tracing::debug;

use crate::entity::Entity;
use crate::io::coex::CoexMatrix;
use crate::math::stats::pairwise_mean;
use crate::signal::{Signal, SignalKind, Tail};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoexIndex(pub usize);

#[derive(Debug, Clone)]
pub struct CoexpressionScore {
    matrix: Arc<CoexMatrix>,
}

impl CoexpressionScore {
    pub fn new(matrix: Arc<CoexMatrix>) -> Self {
        Self { matrix }
    }
}

impl Signal for CoexpressionScore {
    type Payload = CoexIndex;

    fn kind(&self) -> SignalKind {
        SignalKind::Coexpression
    }

    fn tail(&self) -> Tail {
        Tail::Upper
    }

    fn min_sample_len(&self) -> usize {
        2
    }

    fn statistic(&self, sample: &[&Entity<CoexIndex>]) -> Result<f64> {
        pairwise_mean(sample, |a, b| {
            self.matrix
                .score(a.payload.0, b.payload.0)
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "coexpression index out of range for {} - {}",
                        a.name,
                        b.name
                    )
                })
        })
    }
}

/// Binds entities to their matrix row. Entities the matrix does not know are
/// left out and returned by name.
pub fn attach_coex_indices(
    entities: Vec<Entity<()>>,
    matrix: &CoexMatrix,
) -> Result<(Vec<Entity<CoexIndex>>, Vec<String>)> {
    let mut bound = Vec::with_capacity(entities.len());
    let mut skipped = Vec::new();
    for entity in entities {
        match matrix.index_of(&entity.name) {
            Some(idx) => bound.push(Entity {
                name: entity.name,
                position: entity.position,
                payload: CoexIndex(idx),
            }),
            None => skipped.push(entity.name),
        }
    }
    if bound.is_empty() {
        bail!("no entity has a coexpression row");
    }
    debug!(
        bound = bound.len(),
        skipped = skipped.len(),
        "coexpression_indices_attached"
    );
    Ok((bound, skipped))
}
