pub mod trajectory_runner;

pub use trajectory_runner::{ProgressUpdate, SolveResult, TrajectoryRunner};
