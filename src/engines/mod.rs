pub mod generation;
pub mod simulation;
pub mod trajectory;
