use crate::engines::generation::{CancellationToken, Genome, ProgressCallback};
use crate::engines::trajectory::{TrajectorySolution, TrajectorySolver};
use crate::error::{Result, TrajectoryError};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Progress update from the solver thread
#[derive(Clone, Debug)]
pub struct ProgressUpdate {
    pub generation: usize,
    pub total_generations: usize,
    pub best_fitness: f64,
    pub percent: f64,
    /// Current population best; `None` on generation start.
    pub best: Option<Genome>,
    pub status: String,
}

pub type SolveResult = Result<TrajectorySolution>;

/// Progress callback that sends updates through channel
struct RunnerProgressCallback {
    progress_tx: Sender<ProgressUpdate>,
    total_generations: usize,
}

impl ProgressCallback for RunnerProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        let _ = self.progress_tx.send(ProgressUpdate {
            generation,
            total_generations: self.total_generations,
            best_fitness: f64::INFINITY,
            percent: generation as f64 * 100.0 / self.total_generations.max(1) as f64,
            best: None,
            status: format!("Generation {}/{} starting...", generation + 1, self.total_generations),
        });
    }

    fn on_generation_complete(&mut self, generation: usize, best: &Genome, percent: f64) {
        let _ = self.progress_tx.send(ProgressUpdate {
            generation: generation + 1,
            total_generations: self.total_generations,
            best_fitness: best.fitness,
            percent,
            best: Some(best.clone()),
            status: format!(
                "Generation {}/{} - Best: {:.3} km",
                generation + 1,
                self.total_generations,
                best.fitness
            ),
        });
    }
}

/// Runs one solve on a background thread.
pub struct TrajectoryRunner {
    handle: Option<JoinHandle<SolveResult>>,
    progress_rx: Receiver<ProgressUpdate>,
    cancel: CancellationToken,
}

impl TrajectoryRunner {
    /// Start solving in a background thread
    pub fn start(solver: TrajectorySolver, delay: Option<Duration>) -> Result<Self> {
        let (progress_tx, progress_rx) = channel();
        let cancel = CancellationToken::new();
        let thread_cancel = cancel.clone();

        let handle = thread::Builder::new()
            .name("trajectory-solver".to_string())
            .spawn(move || Self::run_solver(solver, delay, progress_tx, thread_cancel))?;

        Ok(Self {
            handle: Some(handle),
            progress_rx,
            cancel,
        })
    }

    /// Poll for progress updates (non-blocking)
    pub fn poll_progress(&self) -> Option<ProgressUpdate> {
        self.progress_rx.try_recv().ok()
    }

    /// Everything queued since the last poll.
    pub fn drain_progress(&self) -> Vec<ProgressUpdate> {
        self.progress_rx.try_iter().collect()
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Check if the solve is complete and get results
    pub fn try_get_results(&mut self) -> Option<SolveResult> {
        let handle = self.handle.take()?;
        if handle.is_finished() {
            Some(Self::join(handle))
        } else {
            // Not finished yet, put handle back
            self.handle = Some(handle);
            None
        }
    }

    /// Block until the solver thread ends.
    pub fn wait(mut self) -> SolveResult {
        match self.handle.take() {
            Some(handle) => Self::join(handle),
            None => Err(TrajectoryError::Runner(
                "Results were already collected".to_string(),
            )),
        }
    }

    /// Cancel the running solve
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    fn join(handle: JoinHandle<SolveResult>) -> SolveResult {
        handle
            .join()
            .unwrap_or_else(|_| Err(TrajectoryError::Runner("Solver thread panicked".to_string())))
    }

    /// Run the solve (called in background thread)
    fn run_solver(
        solver: TrajectorySolver,
        delay: Option<Duration>,
        progress_tx: Sender<ProgressUpdate>,
        cancel: CancellationToken,
    ) -> SolveResult {
        let total_generations = solver.evolution().max_generations;
        log::debug!("Solver thread started, {} generations", total_generations);

        let mut callback = RunnerProgressCallback {
            progress_tx: progress_tx.clone(),
            total_generations,
        };

        match solver.calc_trajectory(delay, &mut callback, &cancel) {
            Ok(solution) => {
                let _ = progress_tx.send(ProgressUpdate {
                    generation: solution.generations,
                    total_generations,
                    best_fitness: solution.best.fitness,
                    percent: 100.0,
                    best: Some(solution.best.clone()),
                    status: format!("Complete ({:?})", solution.status),
                });
                Ok(solution)
            }
            Err(e) => {
                let _ = progress_tx.send(ProgressUpdate {
                    generation: 0,
                    total_generations,
                    best_fitness: f64::INFINITY,
                    percent: 0.0,
                    best: None,
                    status: format!("Error: {}", e),
                });
                Err(e)
            }
        }
    }
}

impl Drop for TrajectoryRunner {
    fn drop(&mut self) {
        self.cancel();
    }
}
