use missile_trajectory::config::{
    AppConfig, EvolutionConfig, FlightConstraints, RocketConstraints, SolverOptions,
};
use missile_trajectory::engines::generation::{
    CancellationToken, LogProgressCallback, NoopProgressCallback, OptimizerState,
};
use missile_trajectory::engines::simulation::{Earth, StopReason};
use missile_trajectory::engines::trajectory::{decode, genome_constraints, GENOME_LENGTH};
use missile_trajectory::services::TrajectoryRunner;
use missile_trajectory::types::GeoCoordinates;
use missile_trajectory::{TrajectoryError, TrajectorySolver};
use std::thread;
use std::time::Duration;

fn quick_evolution() -> EvolutionConfig {
    EvolutionConfig {
        max_generations: 3,
        population_size: 10,
        parallel_evaluation: false,
        seed: Some(11),
        ..EvolutionConfig::default()
    }
}

/// Equator to the antipode, the classic demo scenario.
fn antipodal_solver(options: SolverOptions, evolution: EvolutionConfig) -> TrajectorySolver {
    let earth = Earth::new();
    let start = earth.geo_to_position(GeoCoordinates::new(0.0, 0.0));
    let target = earth.geo_to_position(GeoCoordinates::new(0.0, 180.0));

    let mut solver = TrajectorySolver::new(
        earth,
        RocketConstraints::default(),
        FlightConstraints::default(),
        options,
    )
    .with_evolution(evolution);
    solver.set_start(start);
    solver.set_target(target);
    solver
}

/// Mid-range rocket inside the default bounds.
fn sample_genes() -> Vec<f64> {
    vec![2.0, 600.0, 1.5_f64.to_radians(), 20_000.0, 2.5, 40.0]
}

#[test]
fn test_missing_start_is_rejected() {
    let solver = TrajectorySolver::new(
        Earth::new(),
        RocketConstraints::default(),
        FlightConstraints::default(),
        SolverOptions::default(),
    );

    let result = solver.calc_trajectory(None, &mut NoopProgressCallback, &CancellationToken::new());

    assert!(matches!(result, Err(TrajectoryError::MissingStartPosition)));
}

#[test]
fn test_missing_target_is_rejected() {
    let mut solver = TrajectorySolver::new(
        Earth::new(),
        RocketConstraints::default(),
        FlightConstraints::default(),
        SolverOptions::default(),
    );
    solver.set_start(Earth::new().geo_to_position(GeoCoordinates::new(0.0, 0.0)));

    assert!(matches!(
        solver.evaluate(&sample_genes()),
        Err(TrajectoryError::MissingTargetPosition)
    ));
}

#[test]
fn test_invalid_options_fail_fast() {
    let options = SolverOptions {
        step_seconds: 0.0,
        ..SolverOptions::default()
    };
    let solver = antipodal_solver(options, quick_evolution());

    let result = solver.calc_trajectory(None, &mut NoopProgressCallback, &CancellationToken::new());

    assert!(matches!(result, Err(TrajectoryError::Configuration(_))));
}

#[test]
fn test_fitness_is_miss_distance_by_default() {
    let solver = antipodal_solver(SolverOptions::default(), quick_evolution());
    let genes = sample_genes();

    let fitness = solver.evaluate(&genes).unwrap();
    let report = solver.simulate(decode(&genes, 1000.0).unwrap()).unwrap();

    assert!(fitness.is_finite());
    assert!((fitness - report.miss_distance).abs() < 1e-9);
    assert_eq!(report.aim_point, solver.target().unwrap());
}

#[test]
fn test_flight_time_weight_is_added_to_fitness() {
    let genes = sample_genes();
    let plain = antipodal_solver(SolverOptions::default(), quick_evolution());
    let weighted = antipodal_solver(
        SolverOptions {
            minimize_flight_time: true,
            flight_time_weight: 0.01,
            ..SolverOptions::default()
        },
        quick_evolution(),
    );

    let report = plain.simulate(decode(&genes, 1000.0).unwrap()).unwrap();
    let expected = plain.evaluate(&genes).unwrap() + 0.01 * report.flight_time;

    assert!((weighted.evaluate(&genes).unwrap() - expected).abs() < 1e-9);
}

#[test]
fn test_earth_rotation_compensation_moves_aim_point() {
    let genes = sample_genes();
    let solver = antipodal_solver(
        SolverOptions {
            compensate_earth_rotation: true,
            ..SolverOptions::default()
        },
        quick_evolution(),
    );

    let report = solver.simulate(decode(&genes, 1000.0).unwrap()).unwrap();
    let target = solver.target().unwrap();
    let expected = solver.earth().rotate_point(&target, report.flight_time);

    assert!(report.flight_time > 0.0);
    assert!((report.aim_point - expected).norm() < 1e-9);
    assert!((report.aim_point - target).norm() > 1.0);
}

#[test]
fn test_small_solve_returns_consistent_solution() {
    let solver = antipodal_solver(SolverOptions::default(), quick_evolution());

    let solution = solver
        .calc_trajectory(None, &mut LogProgressCallback::new(), &CancellationToken::new())
        .unwrap();

    assert!(solution.generations <= 3);
    assert!(matches!(
        solution.status,
        OptimizerState::Exhausted | OptimizerState::Converged
    ));
    assert_eq!(solution.best.len(), GENOME_LENGTH);
    assert!(solution.best.fitness.is_finite());

    let constraints = genome_constraints(&RocketConstraints::default());
    for (gene, bounds) in solution.best.genes.iter().zip(&constraints) {
        assert!(bounds.contains(*gene));
    }

    // diagnostics come from re-running the winner
    assert!((solution.report.miss_distance - solution.best.fitness).abs() < 1e-9);
    assert_eq!(solution.params.payload_mass, 1000.0);
    assert!(solution.report.fuel_combustion_time > 0.0);

    let json = solution.to_json().unwrap();
    assert!(json.contains("\"stop_reason\""));
}

#[test]
fn test_seeded_solves_are_reproducible() {
    let first = antipodal_solver(SolverOptions::default(), quick_evolution())
        .calc_trajectory(None, &mut NoopProgressCallback, &CancellationToken::new())
        .unwrap();
    let second = antipodal_solver(SolverOptions::default(), quick_evolution())
        .calc_trajectory(None, &mut NoopProgressCallback, &CancellationToken::new())
        .unwrap();

    assert_eq!(first.best.genes, second.best.genes);
    assert_eq!(first.best.fitness, second.best.fitness);
}

#[test]
fn test_cancelled_solve_still_returns_best_so_far() {
    let solver = antipodal_solver(SolverOptions::default(), quick_evolution());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let solution = solver
        .calc_trajectory(None, &mut NoopProgressCallback, &cancel)
        .unwrap();

    assert_eq!(solution.status, OptimizerState::Cancelled);
    assert_eq!(solution.generations, 0);
    assert!(solution.best.fitness.is_finite());
}

#[test]
fn test_solver_from_config_uses_scenario() {
    let config = AppConfig::default();
    let solver = TrajectorySolver::from_config(Earth::new(), &config);

    let start = solver.start().unwrap();
    let target = solver.target().unwrap();
    assert!((start + target).norm() < 1e-9);
    assert_eq!(solver.evolution(), &config.evolution);
}

#[test]
fn test_runner_streams_progress_and_returns_solution() {
    let solver = antipodal_solver(SolverOptions::default(), quick_evolution());
    let mut runner = TrajectoryRunner::start(solver, None).unwrap();

    let result = loop {
        if let Some(result) = runner.try_get_results() {
            break result;
        }
        thread::sleep(Duration::from_millis(10));
    };
    let solution = result.unwrap();
    let updates = runner.drain_progress();

    let completed = updates.iter().filter(|u| u.best.is_some()).count();
    // one per generation plus the final summary
    assert_eq!(completed, solution.generations + 1);
    assert_eq!(updates.last().unwrap().percent, 100.0);
    assert!(!runner.is_running());
}

#[test]
fn test_runner_cancel_stops_long_solve() {
    let evolution = EvolutionConfig {
        max_generations: 10_000,
        ..quick_evolution()
    };
    let solver = antipodal_solver(SolverOptions::default(), evolution);
    let runner = TrajectoryRunner::start(solver, Some(Duration::from_millis(20))).unwrap();

    runner.cancel();
    let solution = runner.wait().unwrap();

    assert_eq!(solution.status, OptimizerState::Cancelled);
    assert!(solution.generations < 10_000);
}

#[test]
fn test_runner_propagates_solver_errors() {
    let solver = TrajectorySolver::new(
        Earth::new(),
        RocketConstraints::default(),
        FlightConstraints::default(),
        SolverOptions::default(),
    );
    let runner = TrajectoryRunner::start(solver, None).unwrap();

    assert!(matches!(runner.wait(), Err(TrajectoryError::MissingStartPosition)));
}

#[test]
fn test_antipodal_scenario_converges() {
    let evolution = EvolutionConfig {
        seed: Some(2024),
        ..EvolutionConfig::default()
    };
    let solver = antipodal_solver(SolverOptions::default(), evolution);

    let solution = solver
        .calc_trajectory(None, &mut LogProgressCallback::every(10), &CancellationToken::new())
        .unwrap();

    assert!(solution.generations <= 80);
    assert_eq!(solution.report.stop_reason, StopReason::Landed);
    assert!(solution.report.has_landed);
    assert!(
        solution.best.fitness < 50.0,
        "miss distance {} km",
        solution.best.fitness
    );
}
