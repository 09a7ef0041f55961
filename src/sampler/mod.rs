use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub mod population;
pub mod sphere;

pub use population::PopulationSampler;
pub use sphere::{SphereDraws, SphereSampler, draw_accepted_samples};

pub const SPHERE_STREAM: u64 = u64::MAX;
pub const NULL_STREAM_BASE: u64 = 1 << 40;

/// Every consumer gets its own ChaCha stream of the run seed, so results do
/// not depend on how work is scheduled across threads.
pub fn stream_rng(seed: u64, stream: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(stream);
    rng
}
