pub mod earth;
pub mod flight;
pub mod rocket;

pub use earth::{Earth, GravityField, EARTH_RADIUS_KM};
pub use flight::{simulate_flight, FlightLimits, StopReason, MAX_FLIGHT_STEPS};
pub use rocket::{Rocket, RocketParams, DEFAULT_PAYLOAD_MASS_KG};
