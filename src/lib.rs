//! Rocket trajectory search: a genetic / differential-evolution optimizer
//! driving a point-mass flight integrator over a spherical earth.

pub mod config;
pub mod engines;
pub mod error;
pub mod services;
pub mod types;
pub mod utils;

pub use engines::generation::{CancellationToken, GeneticOptimizer, Genome, RunOutcome};
pub use engines::simulation::{Earth, Rocket, RocketParams};
pub use engines::trajectory::{FlightReport, TrajectorySolution, TrajectorySolver};
pub use error::{Result, TrajectoryError};
