use super::evolution_engine::ProgressCallback;
use super::genome::Genome;

/// Logs a line per generation through the `log` facade.
pub struct LogProgressCallback {
    every: usize,
}

impl LogProgressCallback {
    pub fn new() -> Self {
        Self { every: 1 }
    }

    /// Only log every `every`-th generation (the final one is always logged).
    pub fn every(every: usize) -> Self {
        Self { every: every.max(1) }
    }
}

impl Default for LogProgressCallback {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressCallback for LogProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        log::debug!("Generation {} starting...", generation + 1);
    }

    fn on_generation_complete(&mut self, generation: usize, best: &Genome, percent: f64) {
        if (generation + 1) % self.every == 0 || percent >= 100.0 {
            log::info!(
                "Generation {} complete ({:.0}%). Best fitness: {:.4}",
                generation + 1,
                percent,
                best.fitness
            );
        }
    }
}

/// Does nothing. Handy for tests and batch solves.
pub struct NoopProgressCallback;

impl ProgressCallback for NoopProgressCallback {
    fn on_generation_start(&mut self, _generation: usize) {}

    fn on_generation_complete(&mut self, _generation: usize, _best: &Genome, _percent: f64) {}
}
