pub mod encoding;
pub mod report;
pub mod solver;

pub use encoding::{decode, encode, genome_constraints, Gene, GENOME_LENGTH};
pub use report::FlightReport;
pub use solver::{TrajectorySolution, TrajectorySolver};
