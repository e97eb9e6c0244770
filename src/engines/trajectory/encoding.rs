use crate::config::RocketConstraints;
use crate::engines::simulation::RocketParams;
use crate::types::GeneBounds;

pub const GENOME_LENGTH: usize = 6;

/// Position of each rocket parameter inside a genome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gene {
    StartInclineAfterDistance = 0,
    ThrustInclineMaxDuration = 1,
    ThrustInclineVelocity = 2,
    FuelMass = 3,
    ExhaustVelocity = 4,
    MassFlowRate = 5,
}

impl Gene {
    pub const ALL: [Gene; GENOME_LENGTH] = [
        Gene::StartInclineAfterDistance,
        Gene::ThrustInclineMaxDuration,
        Gene::ThrustInclineVelocity,
        Gene::FuelMass,
        Gene::ExhaustVelocity,
        Gene::MassFlowRate,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Gene::StartInclineAfterDistance => "start_incline_after_distance",
            Gene::ThrustInclineMaxDuration => "thrust_incline_max_duration",
            Gene::ThrustInclineVelocity => "thrust_incline_velocity",
            Gene::FuelMass => "fuel_mass",
            Gene::ExhaustVelocity => "exhaust_velocity",
            Gene::MassFlowRate => "mass_flow_rate",
        }
    }
}

/// Per-gene bounds in genome order. The turn rate is in rad/s.
pub fn genome_constraints(rocket: &RocketConstraints) -> Vec<GeneBounds> {
    Gene::ALL
        .iter()
        .map(|gene| match gene {
            Gene::StartInclineAfterDistance => rocket.start_incline_after_distance,
            Gene::ThrustInclineMaxDuration => rocket.thrust_incline_max_duration,
            Gene::ThrustInclineVelocity => rocket.thrust_incline_velocity(),
            Gene::FuelMass => rocket.fuel_mass,
            Gene::ExhaustVelocity => rocket.exhaust_velocity,
            Gene::MassFlowRate => rocket.mass_flow_rate,
        })
        .collect()
}

/// Rocket described by `genes`, or `None` if the slice has the wrong length.
pub fn decode(genes: &[f64], payload_mass: f64) -> Option<RocketParams> {
    let &[start_incline_after_distance, thrust_incline_max_duration, thrust_incline_velocity, fuel_mass, exhaust_velocity, mass_flow_rate] =
        genes
    else {
        return None;
    };

    Some(RocketParams {
        start_incline_after_distance,
        thrust_incline_max_duration,
        thrust_incline_velocity,
        fuel_mass,
        exhaust_velocity,
        mass_flow_rate,
        payload_mass,
    })
}

pub fn encode(params: &RocketParams) -> Vec<f64> {
    vec![
        params.start_incline_after_distance,
        params.thrust_incline_max_duration,
        params.thrust_incline_velocity,
        params.fuel_mass,
        params.exhaust_velocity,
        params.mass_flow_rate,
    ]
}
