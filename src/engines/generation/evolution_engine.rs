use crate::engines::generation::{
    genome::Genome,
    hall_of_fame::HallOfFame,
    operators::{mutate, pick_random_elements, random_genome, MutationDelta},
    termination::{CancellationToken, TerminationCondition},
    variation::VariationStrategy,
};
use crate::error::{Result, TrajectoryError};
use crate::types::GeneBounds;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct EvolutionConfig {
    pub max_generations: usize,
    pub population_size: usize,
    pub genome_length: usize,
    pub mutation_rate: f64,
    pub mutation_delta: MutationDelta,
    pub elite: f64,                // fraction copied unchanged
    pub best_survive_percent: f64, // fraction kept by rank in selection
    pub hall_of_fame_size: usize,
    pub parallel_evaluation: bool,
    pub generation_delay: Option<Duration>,
    pub seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            max_generations: 80,
            population_size: 80,
            genome_length: 6,
            mutation_rate: 0.96,
            mutation_delta: MutationDelta::default(),
            elite: 0.1,
            best_survive_percent: 0.9,
            hall_of_fame_size: 10,
            parallel_evaluation: true,
            generation_delay: None,
            seed: None,
        }
    }
}

/// Scores a gene vector. Lower is better.
///
/// Evaluations may run concurrently on the rayon pool, hence `Sync`.
pub trait FitnessFunction: Sync {
    fn evaluate(&self, genes: &[f64]) -> f64;
}

impl<F> FitnessFunction for F
where
    F: Fn(&[f64]) -> f64 + Sync,
{
    fn evaluate(&self, genes: &[f64]) -> f64 {
        self(genes)
    }
}

pub trait ProgressCallback: Send {
    fn on_generation_start(&mut self, generation: usize);
    /// `best` is the current population's best genome.
    fn on_generation_complete(&mut self, generation: usize, best: &Genome, percent: f64);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizerState {
    Uninitialized,
    Running,
    Converged,
    Exhausted,
    Cancelled,
}

/// How a run ended.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// A termination condition fired before the generation cap.
    Converged(Genome),
    /// All generations ran.
    Exhausted(Genome),
    /// The cancellation token was observed at the top of `generation`.
    Cancelled { generation: usize },
}

impl RunOutcome {
    pub fn best(&self) -> Option<&Genome> {
        match self {
            RunOutcome::Converged(genome) | RunOutcome::Exhausted(genome) => Some(genome),
            RunOutcome::Cancelled { .. } => None,
        }
    }

    pub fn state(&self) -> OptimizerState {
        match self {
            RunOutcome::Converged(_) => OptimizerState::Converged,
            RunOutcome::Exhausted(_) => OptimizerState::Exhausted,
            RunOutcome::Cancelled { .. } => OptimizerState::Cancelled,
        }
    }
}

/// Population-based minimizer over bounded real-valued genomes.
///
/// Each generation appends one offspring per parent (elites are copied
/// verbatim), then `selection` evaluates, sorts and culls the doubled
/// population back to `population_size`. How a child is produced is
/// delegated to a [`VariationStrategy`].
pub struct GeneticOptimizer<F: FitnessFunction> {
    config: EvolutionConfig,
    constraints: Vec<GeneBounds>,
    fitness: F,
    variation: Box<dyn VariationStrategy>,
    termination: Vec<Box<dyn TerminationCondition>>,
    population: Vec<Genome>,
    hall_of_fame: HallOfFame,
    cancel: CancellationToken,
    state: OptimizerState,
    generation: usize,
    rng: StdRng,
}

impl<F: FitnessFunction> GeneticOptimizer<F> {
    pub fn new(
        config: EvolutionConfig,
        constraints: Vec<GeneBounds>,
        fitness: F,
        variation: Box<dyn VariationStrategy>,
    ) -> Result<Self> {
        validate_setup(&config, &constraints)?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let hall_of_fame = HallOfFame::new(config.hall_of_fame_size);

        Ok(Self {
            config,
            constraints,
            fitness,
            variation,
            termination: Vec::new(),
            population: Vec::new(),
            hall_of_fame,
            cancel: CancellationToken::new(),
            state: OptimizerState::Uninitialized,
            generation: 0,
            rng,
        })
    }

    pub fn with_termination<T: TerminationCondition + 'static>(mut self, condition: T) -> Self {
        self.termination.push(Box::new(condition));
        self
    }

    /// Share an externally owned cancel flag instead of the internal one.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Fill the population with genomes drawn uniformly from the constraints,
    /// then evaluate and rank them.
    pub fn create_initial_population(&mut self) {
        self.population = (0..self.config.population_size)
            .map(|_| random_genome(&self.constraints, &mut self.rng))
            .collect();

        self.calc_fitness();
        self.sort_population();
        self.record_hall_of_fame();
    }

    /// Evaluate every genome that has no fitness yet.
    pub fn calc_fitness(&mut self) {
        let fitness = &self.fitness;
        let evaluate = |genome: &mut Genome| {
            let value = fitness.evaluate(&genome.genes);
            genome.set_fitness(if value.is_nan() { f64::INFINITY } else { value });
        };

        if self.config.parallel_evaluation {
            self.population
                .par_iter_mut()
                .filter(|genome| !genome.is_evaluated())
                .for_each(evaluate);
        } else {
            self.population
                .iter_mut()
                .filter(|genome| !genome.is_evaluated())
                .for_each(evaluate);
        }
    }

    /// Rank the population and cull it to `population_size`.
    ///
    /// The best `best_survive_percent` survive unconditionally; the remaining
    /// slots are filled by sampling the discarded tail uniformly without
    /// replacement, which keeps some weaker genomes around for diversity.
    pub fn selection(&mut self, best_survive_percent: f64, population_size: usize) {
        self.calc_fitness();
        self.sort_population();

        let best_count = ((population_size as f64 * best_survive_percent).floor() as usize)
            .min(population_size)
            .min(self.population.len());
        let rest_count = population_size - best_count;

        let mut survivors = std::mem::take(&mut self.population);
        let rest = survivors.split_off(best_count);
        survivors.extend(pick_random_elements(rest, rest_count, &mut self.rng));

        self.population = survivors;
        self.sort_population();
    }

    /// Append one offspring per current genome.
    ///
    /// Genomes inside the elite fraction are copied unchanged; every other
    /// position produces a child through the variation strategy, mutated with
    /// probability `mutation_rate`. The population is doubled until the next
    /// `selection` call.
    pub fn add_new_population(&mut self) {
        let parents_len = self.population.len();
        let elite_size = self.config.elite * parents_len as f64;
        let mut new_population = Vec::with_capacity(parents_len);

        for j in 0..parents_len {
            if (j as f64) < elite_size {
                new_population.push(self.population[j].clone());
                continue;
            }

            let genes = self.variation.create_child(
                j,
                &self.population,
                &self.constraints,
                &mut self.rng,
            );
            let mut child = Genome::new(genes);

            if self.rng.gen::<f64>() < self.config.mutation_rate {
                mutate(
                    &mut child,
                    &self.constraints,
                    &self.config.mutation_delta,
                    &mut self.rng,
                );
            }

            new_population.push(child);
        }

        self.population.extend(new_population);
    }

    /// Perturb one random gene of `genome` and clamp it back into bounds.
    pub fn mutate(&mut self, genome: &mut Genome) {
        mutate(genome, &self.constraints, &self.config.mutation_delta, &mut self.rng);
    }

    /// Run the evolution process
    pub fn run<C: ProgressCallback + ?Sized>(&mut self, callback: &mut C) -> RunOutcome {
        self.state = OptimizerState::Running;
        self.generation = 0;
        self.hall_of_fame.clear();
        for condition in self.termination.iter_mut() {
            condition.reset();
        }

        self.create_initial_population();

        let max_generations = self.config.max_generations;
        for generation in 0..max_generations {
            if self.cancel.is_cancelled() {
                log::warn!("Optimizer cancelled before generation {}", generation + 1);
                self.state = OptimizerState::Cancelled;
                return RunOutcome::Cancelled { generation };
            }

            // Yield point for a host that polls progress
            if let Some(delay) = self.config.generation_delay {
                std::thread::sleep(delay);
            }

            callback.on_generation_start(generation);

            self.add_new_population();
            self.selection(self.config.best_survive_percent, self.config.population_size);
            self.generation = generation + 1;
            self.record_hall_of_fame();

            let best = &self.population[0];
            let percent = (generation + 1) as f64 * 100.0 / max_generations as f64;
            callback.on_generation_complete(generation, best, percent);

            log::debug!(
                "Generation {}/{}: best fitness {:.6}, strategy {}",
                generation + 1,
                max_generations,
                best.fitness,
                self.variation.name()
            );

            let mut converged = false;
            for condition in self.termination.iter_mut() {
                converged |= condition.should_terminate(generation, best);
            }
            if converged {
                self.state = OptimizerState::Converged;
                return RunOutcome::Converged(self.best_so_far());
            }
        }

        self.state = OptimizerState::Exhausted;
        RunOutcome::Exhausted(self.best_so_far())
    }

    /// Request a cooperative stop; observed at the top of the next generation.
    pub fn terminate(&self) {
        self.cancel.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn population(&self) -> &[Genome] {
        &self.population
    }

    /// Best genome of the current population.
    pub fn best(&self) -> Option<&Genome> {
        self.population.first()
    }

    /// Best genome seen at any point of the run.
    pub fn best_ever(&self) -> Option<&Genome> {
        self.hall_of_fame.best()
    }

    pub fn hall_of_fame(&self) -> &HallOfFame {
        &self.hall_of_fame
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn state(&self) -> OptimizerState {
        self.state
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    pub fn constraints(&self) -> &[GeneBounds] {
        &self.constraints
    }

    fn best_so_far(&self) -> Genome {
        self.hall_of_fame
            .best()
            .or_else(|| self.population.first())
            .cloned()
            .unwrap_or_else(|| Genome::new(Vec::new()))
    }

    fn sort_population(&mut self) {
        self.population
            .sort_by(|a, b| a.fitness.total_cmp(&b.fitness));
    }

    fn record_hall_of_fame(&mut self) {
        for genome in &self.population {
            self.hall_of_fame.try_add(genome);
        }
    }
}

fn validate_setup(config: &EvolutionConfig, constraints: &[GeneBounds]) -> Result<()> {
    if constraints.len() != config.genome_length {
        return Err(TrajectoryError::GenomeLength {
            constraints: constraints.len(),
            genome_length: config.genome_length,
        });
    }
    if config.population_size == 0 {
        return Err(TrajectoryError::Configuration(
            "Population size must be positive".to_string(),
        ));
    }
    for (name, rate) in [
        ("Mutation rate", config.mutation_rate),
        ("Elite fraction", config.elite),
        ("Best survive percent", config.best_survive_percent),
    ] {
        if !(0.0..=1.0).contains(&rate) {
            return Err(TrajectoryError::Configuration(format!(
                "{} must be between 0 and 1",
                name
            )));
        }
    }
    for (index, bounds) in constraints.iter().enumerate() {
        if !bounds.min.is_finite() || !bounds.max.is_finite() || bounds.min > bounds.max {
            return Err(TrajectoryError::InvalidBounds {
                index,
                min: bounds.min,
                max: bounds.max,
            });
        }
    }
    Ok(())
}
