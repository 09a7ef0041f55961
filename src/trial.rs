use std::collections::{BTreeMap, BTreeSet};

use anyhow::{Context, Result, bail};
use rand_chacha::ChaCha8Rng;

#[cfg(feature = "mt")]
use rayon::prelude::*;

use crate::entity::{Entity, resolve};
use crate::math::stats::{mean, median};
use crate::parallel;
use crate::sampler::{NULL_STREAM_BASE, PopulationSampler, stream_rng};
use crate::signal::Signal;

#[derive(Debug, Clone, PartialEq)]
pub struct Trial {
    pub id: usize,
    pub members: Vec<usize>,
    pub statistic_in_sphere: f64,
    /// Last random statistic compared against this sphere.
    pub statistic_in_random: f64,
    pub null_mean: f64,
    pub null_median: f64,
    pub chance_wins: usize,
    pub draws: usize,
    pub p_value: f64,
    /// 1-based, assigned by the Benjamini-Hochberg pass.
    pub rank: usize,
    pub adjusted_p_value: f64,
}

impl Trial {
    pub fn new(id: usize, members: Vec<usize>) -> Self {
        Self {
            id,
            members,
            statistic_in_sphere: 0.0,
            statistic_in_random: 0.0,
            null_mean: 0.0,
            null_median: 0.0,
            chance_wins: 0,
            draws: 0,
            p_value: 1.0,
            rank: 0,
            adjusted_p_value: 1.0,
        }
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn evaluate_against<S: Signal>(
        &mut self,
        signal: &S,
        population: &[Entity<S::Payload>],
        null: &NullDistribution,
    ) -> Result<()> {
        self.statistic_in_sphere = signal.statistic(&resolve(population, &self.members))?;
        let (wins, p) = p_value_from_null(signal, self.statistic_in_sphere, &null.statistics)?;
        self.chance_wins = wins;
        self.draws = null.statistics.len();
        self.p_value = p;
        self.statistic_in_random = null.statistics.last().copied().unwrap_or(0.0);
        self.null_mean = null.mean;
        self.null_median = null.median;
        Ok(())
    }

    pub fn evaluate_with_draws<S: Signal>(
        &mut self,
        signal: &S,
        population: &[Entity<S::Payload>],
        draws: usize,
        rng: ChaCha8Rng,
    ) -> Result<()> {
        let null = NullDistribution::sample(signal, population, self.size(), draws, rng)?;
        self.evaluate_against(signal, population, &null)
    }
}

/// With `draws` random samples nothing below `1 / draws` can be claimed, so a
/// literal zero is never reported.
pub fn floor_p_value(p: f64, draws: usize) -> f64 {
    p.max(1.0 / draws as f64)
}

pub fn p_value_from_null<S: Signal + ?Sized>(
    signal: &S,
    observed: f64,
    null: &[f64],
) -> Result<(usize, f64)> {
    if null.is_empty() {
        bail!("null distribution is empty");
    }
    let wins = null
        .iter()
        .filter(|&&random| signal.is_more_extreme(random, observed))
        .count();
    let p = floor_p_value(signal.p_value(wins, null.len()), null.len());
    Ok((wins, p))
}

#[derive(Debug, Clone, PartialEq)]
pub struct NullDistribution {
    pub size: usize,
    pub statistics: Vec<f64>,
    pub mean: f64,
    pub median: f64,
}

impl NullDistribution {
    pub fn sample<S: Signal>(
        signal: &S,
        population: &[Entity<S::Payload>],
        size: usize,
        draws: usize,
        rng: ChaCha8Rng,
    ) -> Result<Self> {
        let mut sampler = PopulationSampler::new(population.len(), rng)?;
        let mut members = Vec::with_capacity(size);
        let mut statistics = Vec::with_capacity(draws);
        for _ in 0..draws {
            sampler.sample_into(size, &mut members);
            let value = signal
                .statistic(&resolve(population, &members))
                .with_context(|| format!("random sample of {} genes", size))?;
            statistics.push(value);
        }
        Ok(Self::from_statistics(size, statistics))
    }

    pub fn from_statistics(size: usize, statistics: Vec<f64>) -> Self {
        let mut scratch = statistics.clone();
        Self {
            size,
            mean: mean(&statistics),
            median: median(&mut scratch),
            statistics,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NullCache {
    by_size: BTreeMap<usize, NullDistribution>,
}

impl NullCache {
    pub fn build<S: Signal>(
        signal: &S,
        population: &[Entity<S::Payload>],
        sizes: &BTreeSet<usize>,
        draws: usize,
        seed: u64,
        threads: usize,
    ) -> Result<Self> {
        let sizes: Vec<usize> = sizes.iter().copied().collect();
        let sample_one = |size: usize| {
            let rng = stream_rng(seed, NULL_STREAM_BASE + size as u64);
            NullDistribution::sample(signal, population, size, draws, rng)
        };

        #[cfg(feature = "mt")]
        let built: Vec<NullDistribution> = parallel::install(threads, || {
            sizes
                .par_iter()
                .map(|&size| sample_one(size))
                .collect::<Result<Vec<_>>>()
        })??;

        #[cfg(not(feature = "mt"))]
        let built: Vec<NullDistribution> = parallel::install(threads, || {
            sizes
                .iter()
                .map(|&size| sample_one(size))
                .collect::<Result<Vec<_>>>()
        })??;

        Ok(Self {
            by_size: built.into_iter().map(|d| (d.size, d)).collect(),
        })
    }

    pub fn get(&self, size: usize) -> Option<&NullDistribution> {
        self.by_size.get(&size)
    }

    pub fn len(&self) -> usize {
        self.by_size.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_size.is_empty()
    }

    pub fn sizes(&self) -> impl Iterator<Item = usize> + '_ {
        self.by_size.keys().copied()
    }
}

pub fn distinct_sizes(trials: &[Trial]) -> BTreeSet<usize> {
    trials.iter().map(Trial::size).collect()
}

/// With a cache, trials read their size's shared null distribution; without
/// one, trial `id` draws its own from stream `id` of `seed`.
pub fn evaluate_trials<S: Signal>(
    trials: &mut [Trial],
    signal: &S,
    population: &[Entity<S::Payload>],
    cache: Option<&NullCache>,
    draws: usize,
    seed: u64,
    threads: usize,
) -> Result<()> {
    let evaluate_one = |trial: &mut Trial| -> Result<()> {
        match cache {
            Some(cache) => {
                let null = cache.get(trial.size()).ok_or_else(|| {
                    anyhow::anyhow!("no null distribution cached for size {}", trial.size())
                })?;
                trial.evaluate_against(signal, population, null)
            }
            None => {
                let rng = stream_rng(seed, trial.id as u64);
                trial.evaluate_with_draws(signal, population, draws, rng)
            }
        }
        .with_context(|| format!("trial {} ({} genes)", trial.id, trial.size()))
    };

    #[cfg(feature = "mt")]
    parallel::install(threads, || trials.par_iter_mut().try_for_each(evaluate_one))??;

    #[cfg(not(feature = "mt"))]
    parallel::install(threads, || trials.iter_mut().try_for_each(evaluate_one))??;

    Ok(())
}
