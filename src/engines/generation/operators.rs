use crate::engines::generation::genome::Genome;
use crate::types::GeneBounds;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// How the mutation perturbation is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MutationDelta {
    /// Uniform in `[min, max]` regardless of the gene.
    Absolute { min: f64, max: f64 },
    /// Uniform in `±fraction × (gene max − gene min)`.
    Relative { fraction: f64 },
}

impl Default for MutationDelta {
    fn default() -> Self {
        MutationDelta::Absolute { min: -2.0, max: 2.0 }
    }
}

impl MutationDelta {
    pub fn sample(&self, bounds: &GeneBounds, rng: &mut dyn RngCore) -> f64 {
        match *self {
            MutationDelta::Absolute { min, max } => rand_float(min, max, rng),
            MutationDelta::Relative { fraction } => {
                let half_width = bounds.span() * fraction;
                rand_float(-half_width, half_width, rng)
            }
        }
    }
}

/// Uniform sample in `[min, max)`; returns `min` for an empty range.
pub fn rand_float(min: f64, max: f64, rng: &mut dyn RngCore) -> f64 {
    if max <= min {
        return min;
    }
    rng.gen_range(min..max)
}

/// Generate a genome with every gene drawn uniformly from its bounds
pub fn random_genome(constraints: &[GeneBounds], rng: &mut dyn RngCore) -> Genome {
    constraints
        .iter()
        .map(|bounds| rand_float(bounds.min, bounds.max, rng))
        .collect::<Vec<_>>()
        .into()
}

/// Clamp every gene into its declared bounds.
pub fn clamp_genes(genes: &mut [f64], constraints: &[GeneBounds]) {
    for (gene, bounds) in genes.iter_mut().zip(constraints) {
        *gene = bounds.clamp(*gene);
    }
}

/// Add a random perturbation to one randomly chosen gene, then clamp it.
pub fn mutate(
    genome: &mut Genome,
    constraints: &[GeneBounds],
    delta: &MutationDelta,
    rng: &mut dyn RngCore,
) {
    if genome.is_empty() {
        return;
    }
    let index = rng.gen_range(0..genome.len());
    let bounds = &constraints[index];
    genome.genes[index] = bounds.clamp(genome.genes[index] + delta.sample(bounds, rng));
}

/// Pick `count` elements uniformly at random without replacement.
///
/// Partial Fisher-Yates shuffle over the first `count` slots. Returns the
/// whole pool when it holds fewer than `count` elements.
pub fn pick_random_elements<T>(mut pool: Vec<T>, count: usize, rng: &mut dyn RngCore) -> Vec<T> {
    let count = count.min(pool.len());
    for i in 0..count {
        let j = rng.gen_range(i..pool.len());
        pool.swap(i, j);
    }
    pool.truncate(count);
    pool
}
