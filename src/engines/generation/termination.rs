use crate::engines::generation::genome::Genome;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancel flag shared between the optimizer and whoever drives it.
///
/// The optimizer only looks at the flag at the top of each generation, never
/// in the middle of one.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Extra stop rule evaluated after every generation.
pub trait TerminationCondition: Send {
    /// Returns true once the run should stop as converged.
    fn should_terminate(&mut self, generation: usize, best: &Genome) -> bool;

    fn reset(&mut self) {}
}

/// Stops when the best fitness has improved by less than `threshold` for
/// `patience` consecutive generations.
#[derive(Debug, Clone)]
pub struct PlateauDetector {
    threshold: f64,
    patience: usize,
    last_best: Option<f64>,
    stalled_generations: usize,
}

impl PlateauDetector {
    pub fn new(threshold: f64, patience: usize) -> Self {
        Self {
            threshold,
            patience,
            last_best: None,
            stalled_generations: 0,
        }
    }

    pub fn stalled_generations(&self) -> usize {
        self.stalled_generations
    }
}

impl TerminationCondition for PlateauDetector {
    fn should_terminate(&mut self, _generation: usize, best: &Genome) -> bool {
        let fitness = best.fitness;

        if let Some(previous) = self.last_best {
            // Selection may reintroduce worse genomes, so only a real gain counts
            let improvement = previous - fitness;
            if improvement < self.threshold {
                self.stalled_generations += 1;
            } else {
                self.stalled_generations = 0;
            }
        }

        self.last_best = Some(match self.last_best {
            Some(previous) => previous.min(fitness),
            None => fitness,
        });

        self.patience > 0 && self.stalled_generations >= self.patience
    }

    fn reset(&mut self) {
        self.last_best = None;
        self.stalled_generations = 0;
    }
}
