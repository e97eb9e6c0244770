pub mod evolution_engine;
pub mod genome;
pub mod hall_of_fame;
pub mod operators;
pub mod progress;
pub mod termination;
pub mod variation;

pub use evolution_engine::{
    EvolutionConfig, FitnessFunction, GeneticOptimizer, OptimizerState, ProgressCallback,
    RunOutcome,
};
pub use genome::Genome;
pub use hall_of_fame::HallOfFame;
pub use operators::MutationDelta;
pub use progress::{LogProgressCallback, NoopProgressCallback};
pub use termination::{CancellationToken, PlateauDetector, TerminationCondition};
pub use variation::{DifferentialMutation, SinglePointCrossover, VariationKind, VariationStrategy};
