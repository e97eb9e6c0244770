pub mod evolution;
pub mod flight;
pub mod manager;
pub mod rocket;
pub mod traits;

pub use evolution::{ConvergenceConfig, EvolutionConfig};
pub use flight::{FlightConstraints, ScenarioConfig, SolverOptions};
pub use manager::{AppConfig, ConfigManager};
pub use rocket::RocketConstraints;
pub use traits::ConfigSection;
