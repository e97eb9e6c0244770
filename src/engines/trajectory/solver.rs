use super::encoding::{decode, genome_constraints, GENOME_LENGTH};
use super::report::FlightReport;
use crate::config::{
    AppConfig, ConfigSection, EvolutionConfig, FlightConstraints, RocketConstraints, SolverOptions,
};
use crate::engines::generation::{
    CancellationToken, GeneticOptimizer, Genome, OptimizerState, PlateauDetector, ProgressCallback,
};
use crate::engines::simulation::{simulate_flight, Earth, FlightLimits, Rocket, RocketParams};
use crate::error::{Result, TrajectoryError};
use crate::types::Vec3;
use serde::Serialize;
use std::time::{Duration, Instant};

/// Best rocket found by one solve, with the diagnostics of its flight.
#[derive(Debug, Clone, Serialize)]
pub struct TrajectorySolution {
    pub status: OptimizerState,
    pub best: Genome,
    pub params: RocketParams,
    pub report: FlightReport,
    pub generations: usize,
    pub elapsed_seconds: f64,
}

impl TrajectorySolution {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Everything a single fitness evaluation needs. Shared read-only across
/// rayon workers; every call builds its own [`Rocket`].
struct FlightModel<'a> {
    earth: &'a Earth,
    start: Vec3,
    target: Vec3,
    direction: Vec3,
    limits: FlightLimits,
    payload_mass: f64,
    options: &'a SolverOptions,
}

impl<'a> FlightModel<'a> {
    fn new(
        earth: &'a Earth,
        start: Vec3,
        target: Vec3,
        flight: &FlightConstraints,
        payload_mass: f64,
        options: &'a SolverOptions,
    ) -> Self {
        let straight_line = (target - start).norm();

        Self {
            earth,
            start,
            target,
            direction: target - start,
            limits: FlightLimits {
                step_seconds: options.step_seconds,
                max_flight_time_seconds: flight.max_flight_time_seconds,
                max_distance: Some(flight.max_distance_factor * straight_line),
                max_altitude: flight.max_altitude,
            },
            payload_mass,
            options,
        }
    }

    fn aim_point(&self, flight_time: f64) -> Vec3 {
        if self.options.compensate_earth_rotation {
            self.earth.rotate_point(&self.target, flight_time)
        } else {
            self.target
        }
    }

    fn score(&self, miss_distance: f64, flight_time: f64) -> f64 {
        if self.options.minimize_flight_time {
            miss_distance + self.options.flight_time_weight * flight_time
        } else {
            miss_distance
        }
    }

    fn fitness(&self, genes: &[f64]) -> f64 {
        let Some(params) = decode(genes, self.payload_mass) else {
            return f64::INFINITY;
        };

        let mut rocket = Rocket::new(self.earth, self.start, self.direction, params);
        let stop = simulate_flight(&mut rocket, &self.limits);
        log::trace!("Flight stopped after {:.0}s: {:?}", rocket.flight_time, stop);

        let miss = (rocket.position - self.aim_point(rocket.flight_time)).norm();
        self.score(miss, rocket.flight_time)
    }

    fn report(&self, params: RocketParams) -> FlightReport {
        let mut rocket = Rocket::new(self.earth, self.start, self.direction, params);
        let stop = simulate_flight(&mut rocket, &self.limits);
        let aim_point = self.aim_point(rocket.flight_time);
        let final_geo = self.earth.position_to_geo(&rocket.position);

        FlightReport::from_rocket(&rocket, stop, aim_point, final_geo)
    }
}

/// Searches rocket parameters that carry the payload from `start` to `target`.
#[derive(Debug, Clone)]
pub struct TrajectorySolver {
    earth: Earth,
    start: Option<Vec3>,
    target: Option<Vec3>,
    rocket_constraints: RocketConstraints,
    flight_constraints: FlightConstraints,
    options: SolverOptions,
    evolution: EvolutionConfig,
}

impl TrajectorySolver {
    pub fn new(
        earth: Earth,
        rocket_constraints: RocketConstraints,
        flight_constraints: FlightConstraints,
        options: SolverOptions,
    ) -> Self {
        Self {
            earth,
            start: None,
            target: None,
            rocket_constraints,
            flight_constraints,
            options,
            evolution: EvolutionConfig::default(),
        }
    }

    /// Solver for the scenario described by `config`, start and target included.
    pub fn from_config(earth: Earth, config: &AppConfig) -> Self {
        let start = earth.geo_to_position(config.scenario.start);
        let target = earth.geo_to_position(config.scenario.target);

        let mut solver = Self::new(
            earth,
            config.rocket.clone(),
            config.flight.clone(),
            config.solver.clone(),
        )
        .with_evolution(config.evolution.clone());
        solver.set_start(start);
        solver.set_target(target);
        solver
    }

    pub fn with_evolution(mut self, evolution: EvolutionConfig) -> Self {
        self.evolution = evolution;
        self
    }

    pub fn set_start(&mut self, position: Vec3) {
        self.start = Some(position);
    }

    pub fn set_target(&mut self, position: Vec3) {
        self.target = Some(position);
    }

    pub fn start(&self) -> Option<Vec3> {
        self.start
    }

    pub fn target(&self) -> Option<Vec3> {
        self.target
    }

    pub fn earth(&self) -> &Earth {
        &self.earth
    }

    pub fn evolution(&self) -> &EvolutionConfig {
        &self.evolution
    }

    fn endpoints(&self) -> Result<(Vec3, Vec3)> {
        let start = self.start.ok_or(TrajectoryError::MissingStartPosition)?;
        let target = self.target.ok_or(TrajectoryError::MissingTargetPosition)?;
        Ok((start, target))
    }

    fn validate(&self) -> Result<()> {
        self.rocket_constraints.validate()?;
        self.flight_constraints.validate()?;
        self.options.validate()?;
        self.evolution.validate()?;
        Ok(())
    }

    fn model(&self, start: Vec3, target: Vec3) -> FlightModel<'_> {
        FlightModel::new(
            &self.earth,
            start,
            target,
            &self.flight_constraints,
            self.rocket_constraints.payload_mass,
            &self.options,
        )
    }

    /// Fitness of one gene vector, exactly as the optimizer sees it.
    pub fn evaluate(&self, genes: &[f64]) -> Result<f64> {
        let (start, target) = self.endpoints()?;
        Ok(self.model(start, target).fitness(genes))
    }

    /// Re-simulate `params` and report on the flight.
    pub fn simulate(&self, params: RocketParams) -> Result<FlightReport> {
        let (start, target) = self.endpoints()?;
        Ok(self.model(start, target).report(params))
    }

    /// Run the optimizer to completion, plateau or cancellation.
    ///
    /// `delay` overrides the configured pause between generations. A
    /// cancelled solve still returns the best genome seen so far.
    pub fn calc_trajectory<C: ProgressCallback + ?Sized>(
        &self,
        delay: Option<Duration>,
        progress: &mut C,
        cancel: &CancellationToken,
    ) -> Result<TrajectorySolution> {
        let (start, target) = self.endpoints()?;
        self.validate()?;

        let mut engine_config = self
            .evolution
            .to_engine_config(GENOME_LENGTH, self.options.increase_accuracy);
        if delay.is_some() {
            engine_config.generation_delay = delay;
        }
        let population_size = engine_config.population_size;
        let max_generations = engine_config.max_generations;

        let constraints = genome_constraints(&self.rocket_constraints);
        let model = self.model(start, target);
        let fitness = |genes: &[f64]| model.fitness(genes);

        let variation = self.evolution.variation.build();
        let variation_name = variation.name();

        let mut optimizer = GeneticOptimizer::new(engine_config, constraints, fitness, variation)?
            .with_cancellation(cancel.clone());
        if self.evolution.convergence.enabled {
            optimizer = optimizer.with_termination(PlateauDetector::new(
                self.evolution.convergence.threshold,
                self.evolution.convergence.patience,
            ));
        }

        log::info!(
            "Solving trajectory over {:.0} km: population {}, up to {} generations, {} variation",
            (target - start).norm(),
            population_size,
            max_generations,
            variation_name
        );

        let started = Instant::now();
        let outcome = optimizer.run(progress);
        let elapsed = started.elapsed();

        let best = match outcome.best() {
            Some(best) => best.clone(),
            None => optimizer
                .best_ever()
                .or_else(|| optimizer.best())
                .cloned()
                .ok_or_else(|| {
                    TrajectoryError::Configuration("Solve was cancelled before any evaluation".to_string())
                })?,
        };

        let params = decode(&best.genes, self.rocket_constraints.payload_mass).ok_or(
            TrajectoryError::GenomeLength {
                constraints: GENOME_LENGTH,
                genome_length: best.len(),
            },
        )?;
        let report = model.report(params);

        log::info!(
            "Solve finished ({:?}) after {} generations in {:.2}s, miss distance {:.3} km",
            outcome.state(),
            optimizer.generation(),
            elapsed.as_secs_f64(),
            report.miss_distance
        );

        Ok(TrajectorySolution {
            status: outcome.state(),
            best,
            params,
            report,
            generations: optimizer.generation(),
            elapsed_seconds: elapsed.as_secs_f64(),
        })
    }
}
