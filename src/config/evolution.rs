use super::traits::{ensure_fraction, ensure_positive, ConfigSection};
use crate::engines::generation::{
    evolution_engine::EvolutionConfig as EngineEvolutionConfig, MutationDelta, VariationKind,
};
use crate::error::TrajectoryError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub max_generations: usize,
    pub population_size: usize,
    /// Population used when the caller asks for higher accuracy.
    pub accurate_population_size: usize,
    pub mutation_rate: f64,
    pub mutation_delta: MutationDelta,
    pub best_survive_percent: f64,
    pub elite: f64,
    pub variation: VariationKind,
    pub convergence: ConvergenceConfig,
    pub hall_of_fame_size: usize,
    pub parallel_evaluation: bool,
    pub seed: Option<u64>,
    pub generation_delay_ms: Option<u64>,
}

/// Early stop once the best fitness stops improving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvergenceConfig {
    pub enabled: bool,
    /// Minimum per-generation improvement of the best fitness (km).
    pub threshold: f64,
    /// Consecutive generations below the threshold before stopping.
    pub patience: usize,
}

impl Default for ConvergenceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: 0.001,
            patience: 20,
        }
    }
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            max_generations: 80,
            population_size: 80,
            accurate_population_size: 200,
            mutation_rate: 0.96,
            mutation_delta: MutationDelta::default(),
            best_survive_percent: 0.9,
            elite: 0.1,
            variation: VariationKind::default(),
            convergence: ConvergenceConfig::default(),
            hall_of_fame_size: 10,
            parallel_evaluation: true,
            seed: None,
            generation_delay_ms: None,
        }
    }
}

impl EvolutionConfig {
    /// Engine settings for a genome of `genome_length` genes.
    pub fn to_engine_config(&self, genome_length: usize, increase_accuracy: bool) -> EngineEvolutionConfig {
        let population_size = if increase_accuracy {
            self.accurate_population_size
        } else {
            self.population_size
        };

        EngineEvolutionConfig {
            max_generations: self.max_generations,
            population_size,
            genome_length,
            mutation_rate: self.mutation_rate,
            mutation_delta: self.mutation_delta,
            elite: self.elite,
            best_survive_percent: self.best_survive_percent,
            hall_of_fame_size: self.hall_of_fame_size,
            parallel_evaluation: self.parallel_evaluation,
            generation_delay: self.generation_delay_ms.map(Duration::from_millis),
            seed: self.seed,
        }
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), TrajectoryError> {
        let section = Self::section_name();

        if self.population_size < 2 || self.accurate_population_size < 2 {
            return Err(TrajectoryError::Configuration(
                "Population size must be at least 2".to_string(),
            ));
        }
        ensure_fraction(section, "mutation_rate", self.mutation_rate)?;
        ensure_fraction(section, "best_survive_percent", self.best_survive_percent)?;
        ensure_fraction(section, "elite", self.elite)?;

        match self.variation {
            VariationKind::Differential { cr, scaling_factor } => {
                ensure_fraction(section, "variation.cr", cr)?;
                ensure_positive(section, "variation.scaling_factor", scaling_factor)?;
            }
            VariationKind::SinglePoint => {}
        }

        match self.mutation_delta {
            MutationDelta::Absolute { min, max } if min > max => {
                return Err(TrajectoryError::Configuration(format!(
                    "{}.mutation_delta min {} is greater than max {}",
                    section, min, max
                )));
            }
            MutationDelta::Relative { fraction } => {
                ensure_positive(section, "mutation_delta.fraction", fraction)?;
            }
            _ => {}
        }

        if self.convergence.enabled && self.convergence.threshold < 0.0 {
            return Err(TrajectoryError::Configuration(
                "Convergence threshold must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}
