use anyhow::{Result, bail};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Each of the `k` picks is an independent uniform draw, so one sample may
/// hold the same entity more than once.
pub struct PopulationSampler {
    population_len: usize,
    rng: ChaCha8Rng,
}

impl PopulationSampler {
    pub fn new(population_len: usize, rng: ChaCha8Rng) -> Result<Self> {
        if population_len == 0 {
            bail!("cannot draw random samples from an empty population");
        }
        Ok(Self {
            population_len,
            rng,
        })
    }

    pub fn sample_into(&mut self, k: usize, out: &mut Vec<usize>) {
        out.clear();
        out.extend((0..k).map(|_| self.rng.gen_range(0..self.population_len)));
    }

    pub fn sample(&mut self, k: usize) -> Vec<usize> {
        let mut out = Vec::with_capacity(k);
        self.sample_into(k, &mut out);
        out
    }
}
