use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrajectoryError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Genome constraints length {constraints} must be equal to genome length {genome_length}")]
    GenomeLength { constraints: usize, genome_length: usize },

    #[error("Invalid bounds for gene {index}: min {min} is greater than max {max}")]
    InvalidBounds { index: usize, min: f64, max: f64 },

    #[error("Start position must be set before calculating the trajectory")]
    MissingStartPosition,

    #[error("Target position must be set before calculating the trajectory")]
    MissingTargetPosition,

    #[error("Solver thread error: {0}")]
    Runner(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config source error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TrajectoryError>;
