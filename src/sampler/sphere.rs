use anyhow::{Result, bail};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rstar::primitives::GeomWithData;
use rstar::{AABB, RTree};
use tracing::debug;

use crate::config::SphereConfig;
use crate::entity::{Entity, Vec3, resolve};
use crate::signal::Signal;

type IndexedPoint = GeomWithData<[f64; 3], usize>;

pub struct SphereSampler {
    tree: RTree<IndexedPoint>,
    box_min: f64,
    box_max: f64,
    rng: ChaCha8Rng,
}

impl SphereSampler {
    pub fn new<P>(
        population: &[Entity<P>],
        box_min: f64,
        box_max: f64,
        rng: ChaCha8Rng,
    ) -> Result<Self> {
        if box_min.is_nan() || box_max.is_nan() || box_min >= box_max {
            bail!("sampling box is empty: [{}, {}]", box_min, box_max);
        }
        let mut points = Vec::with_capacity(population.len());
        for (idx, entity) in population.iter().enumerate() {
            if !entity.position.is_finite() {
                bail!("entity '{}' has a non-finite position", entity.name);
            }
            points.push(GeomWithData::new(entity.position.to_array(), idx));
        }
        Ok(Self {
            tree: RTree::bulk_load(points),
            box_min,
            box_max,
            rng,
        })
    }

    /// Population indices within `radius` of `center` (boundary included),
    /// ascending.
    pub fn sample_at(&self, center: Vec3, radius: f64) -> Vec<usize> {
        let c = center.to_array();
        let envelope = AABB::from_corners(
            [c[0] - radius, c[1] - radius, c[2] - radius],
            [c[0] + radius, c[1] + radius, c[2] + radius],
        );
        let r_sq = radius * radius;
        let mut members: Vec<usize> = self
            .tree
            .locate_in_envelope(&envelope)
            .filter(|p| {
                let q = p.geom();
                let (dx, dy, dz) = (q[0] - c[0], q[1] - c[1], q[2] - c[2]);
                dx * dx + dy * dy + dz * dz <= r_sq
            })
            .map(|p| p.data)
            .collect();
        members.sort_unstable();
        members
    }

    pub fn draw_center(&mut self) -> Vec3 {
        Vec3::new(
            self.rng.gen_range(self.box_min..self.box_max),
            self.rng.gen_range(self.box_min..self.box_max),
            self.rng.gen_range(self.box_min..self.box_max),
        )
    }

    pub fn sample(&mut self, radius: f64) -> Vec<usize> {
        let center = self.draw_center();
        self.sample_at(center, radius)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SphereDraws {
    pub samples: Vec<Vec<usize>>,
    pub rejected: usize,
}

impl SphereDraws {
    pub fn average_size(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let total: usize = self.samples.iter().map(|s| s.len()).sum();
        total as f64 / self.samples.len() as f64
    }
}

pub fn accept<S: Signal>(
    signal: &S,
    population: &[Entity<S::Payload>],
    members: &[usize],
    minimum_gene_count: usize,
) -> bool {
    if members.len() < minimum_gene_count {
        return false;
    }
    signal.accept_sample(&resolve(population, members))
}

/// Rejected draws do not count toward the total. More than
/// `max_rejected_draws` rejections abort the run: the radius, box and minimum
/// count cannot be satisfied often enough.
pub fn draw_accepted_samples<S: Signal>(
    sampler: &mut SphereSampler,
    population: &[Entity<S::Payload>],
    signal: &S,
    config: &SphereConfig,
) -> Result<SphereDraws> {
    let mut draws = SphereDraws {
        samples: Vec::with_capacity(config.sample_count),
        rejected: 0,
    };
    while draws.samples.len() < config.sample_count {
        let members = sampler.sample(config.sphere_radius);
        if accept(signal, population, &members, config.minimum_gene_count) {
            draws.samples.push(members);
            continue;
        }
        draws.rejected += 1;
        if draws.rejected > config.max_rejected_draws {
            bail!(
                "spatial sampling gave up after {} rejected draws with {} of {} spheres accepted: \
                 radius {} in box [{}, {}] rarely yields an acceptable sample of at least {} genes",
                draws.rejected,
                draws.samples.len(),
                config.sample_count,
                config.sphere_radius,
                config.box_min,
                config.box_max,
                config.minimum_gene_count
            );
        }
    }
    debug!(
        accepted = draws.samples.len(),
        rejected = draws.rejected,
        "sphere_sampling_done"
    );
    Ok(draws)
}
