use crate::engines::generation::genome::Genome;
use crate::engines::generation::operators::clamp_genes;
use crate::types::GeneBounds;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// Produces one child from the population.
///
/// `parent_index` is the position of the primary parent in the current
/// (fitness-sorted) population. Implementations draw any further parents from
/// `population` themselves. The returned genes must already be clamped into
/// `constraints`.
pub trait VariationStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn create_child(
        &self,
        parent_index: usize,
        population: &[Genome],
        constraints: &[GeneBounds],
        rng: &mut dyn RngCore,
    ) -> Vec<f64>;
}

/// Classic GA: first half of parent A followed by the second half of a random parent B.
#[derive(Debug, Clone, Copy, Default)]
pub struct SinglePointCrossover;

impl SinglePointCrossover {
    pub fn crossover(&self, parent_a: &[f64], parent_b: &[f64]) -> Vec<f64> {
        let mid = parent_a.len() / 2;
        let mut child = parent_a[..mid].to_vec();
        child.extend_from_slice(&parent_b[mid..]);
        child
    }
}

impl VariationStrategy for SinglePointCrossover {
    fn name(&self) -> &'static str {
        "single_point"
    }

    fn create_child(
        &self,
        parent_index: usize,
        population: &[Genome],
        constraints: &[GeneBounds],
        rng: &mut dyn RngCore,
    ) -> Vec<f64> {
        let parent_a = &population[parent_index];
        let parent_b = &population[rng.gen_range(0..population.len())];

        let mut child = self.crossover(&parent_a.genes, &parent_b.genes);
        clamp_genes(&mut child, constraints);
        child
    }
}

/// Differential evolution.
///
/// Every gene of parent A is, with probability `cr`, replaced by
/// `a[i] + scaling_factor * (b[i] - c[i])`, where B and C are drawn uniformly
/// from the population (they may coincide with each other or with A).
#[derive(Debug, Clone, Copy)]
pub struct DifferentialMutation {
    pub cr: f64,
    pub scaling_factor: f64,
}

impl DifferentialMutation {
    pub fn new(cr: f64, scaling_factor: f64) -> Self {
        Self { cr, scaling_factor }
    }

    pub fn crossover(
        &self,
        parent_a: &[f64],
        parent_b: &[f64],
        parent_c: &[f64],
        constraints: &[GeneBounds],
        rng: &mut dyn RngCore,
    ) -> Vec<f64> {
        parent_a
            .iter()
            .zip(parent_b.iter().zip(parent_c))
            .zip(constraints)
            .map(|((&a, (&b, &c)), bounds)| {
                let gene = if rng.gen::<f64>() < self.cr {
                    a + self.scaling_factor * (b - c)
                } else {
                    a
                };
                bounds.clamp(gene)
            })
            .collect()
    }
}

impl Default for DifferentialMutation {
    fn default() -> Self {
        Self::new(0.9, 0.4)
    }
}

impl VariationStrategy for DifferentialMutation {
    fn name(&self) -> &'static str {
        "differential"
    }

    fn create_child(
        &self,
        parent_index: usize,
        population: &[Genome],
        constraints: &[GeneBounds],
        rng: &mut dyn RngCore,
    ) -> Vec<f64> {
        let parent_a = &population[parent_index];
        let parent_b = &population[rng.gen_range(0..population.len())];
        let parent_c = &population[rng.gen_range(0..population.len())];

        self.crossover(&parent_a.genes, &parent_b.genes, &parent_c.genes, constraints, rng)
    }
}

/// Serializable selection of the variation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VariationKind {
    SinglePoint,
    Differential { cr: f64, scaling_factor: f64 },
}

impl Default for VariationKind {
    fn default() -> Self {
        VariationKind::Differential {
            cr: 0.9,
            scaling_factor: 0.4,
        }
    }
}

impl VariationKind {
    pub fn build(&self) -> Box<dyn VariationStrategy> {
        match *self {
            VariationKind::SinglePoint => Box::new(SinglePointCrossover),
            VariationKind::Differential { cr, scaling_factor } => {
                Box::new(DifferentialMutation::new(cr, scaling_factor))
            }
        }
    }
}
