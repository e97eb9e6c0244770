use anyhow::Context;
use clap::{Parser, ValueEnum};
use missile_trajectory::config::{AppConfig, ConfigManager};
use missile_trajectory::engines::generation::VariationKind;
use missile_trajectory::services::TrajectoryRunner;
use missile_trajectory::types::GeoCoordinates;
use missile_trajectory::{Earth, TrajectorySolution, TrajectorySolver};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Search rocket parameters that hit a target on a spherical earth"
)]
struct Cli {
    /// TOML config file; `MISSILE__*` environment variables override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Launch latitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    start_lat: Option<f64>,

    /// Launch longitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    start_lon: Option<f64>,

    /// Target latitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    target_lat: Option<f64>,

    /// Target longitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    target_lon: Option<f64>,

    /// Generation cap
    #[arg(long)]
    generations: Option<usize>,

    /// Use the larger population
    #[arg(long, default_value_t = false)]
    accurate: bool,

    /// Add the flight time to the miss distance
    #[arg(long, default_value_t = false)]
    minimize_time: bool,

    /// Variation strategy
    #[arg(long, value_enum)]
    variation: Option<VariationMode>,

    /// RNG seed for a reproducible solve
    #[arg(long)]
    seed: Option<u64>,

    /// Pause between generations in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Write the effective configuration to this file before solving
    #[arg(long)]
    save_config: Option<PathBuf>,

    /// Print the solution as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Copy, Clone, ValueEnum, Debug)]
enum VariationMode {
    SinglePoint,
    Differential,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let manager = ConfigManager::new();
    if let Some(path) = &cli.config {
        manager
            .load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?;
    }
    manager
        .update(|config| apply_overrides(&cli, config))
        .context("Invalid command line override")?;

    if let Some(path) = &cli.save_config {
        manager
            .save_to_file(path)
            .with_context(|| format!("Failed to save config to {}", path.display()))?;
        log::info!("Saved configuration to {}", path.display());
    }

    let config = manager.get()?;
    let solver = TrajectorySolver::from_config(Earth::new(), &config);
    let mut runner = TrajectoryRunner::start(solver, cli.delay_ms.map(Duration::from_millis))
        .context("Failed to start solver thread")?;

    let solution = loop {
        for update in runner.drain_progress() {
            if update.best.is_some() {
                log::info!("{} ({:.0}%)", update.status, update.percent);
            }
        }
        if let Some(result) = runner.try_get_results() {
            break result.context("Trajectory solve failed")?;
        }
        thread::sleep(Duration::from_millis(50));
    };

    if cli.json {
        println!("{}", solution.to_json()?);
    } else {
        print_solution(&config, &solution);
    }
    Ok(())
}

fn apply_overrides(cli: &Cli, config: &mut AppConfig) {
    let scenario = &mut config.scenario;
    scenario.start = GeoCoordinates::new(
        cli.start_lat.unwrap_or(scenario.start.latitude),
        cli.start_lon.unwrap_or(scenario.start.longitude),
    );
    scenario.target = GeoCoordinates::new(
        cli.target_lat.unwrap_or(scenario.target.latitude),
        cli.target_lon.unwrap_or(scenario.target.longitude),
    );

    if let Some(generations) = cli.generations {
        config.evolution.max_generations = generations;
    }
    if cli.seed.is_some() {
        config.evolution.seed = cli.seed;
    }
    match cli.variation {
        Some(VariationMode::SinglePoint) => config.evolution.variation = VariationKind::SinglePoint,
        Some(VariationMode::Differential) if config.evolution.variation == VariationKind::SinglePoint => {
            config.evolution.variation = VariationKind::default();
        }
        _ => {}
    }

    config.solver.increase_accuracy |= cli.accurate;
    config.solver.minimize_flight_time |= cli.minimize_time;
}

fn print_solution(config: &AppConfig, solution: &TrajectorySolution) {
    let params = &solution.params;

    println!(
        "\n=== Trajectory ({:.2},{:.2}) -> ({:.2},{:.2}) ===",
        config.scenario.start.latitude,
        config.scenario.start.longitude,
        config.scenario.target.latitude,
        config.scenario.target.longitude
    );
    println!(
        "Status: {:?} after {} generations in {:.2}s",
        solution.status, solution.generations, solution.elapsed_seconds
    );
    println!("Fitness: {:.4}", solution.best.fitness);

    println!("\nRocket:");
    println!("  Start incline after:   {:.3} km", params.start_incline_after_distance);
    println!("  Incline max duration:  {:.1} s", params.thrust_incline_max_duration);
    println!(
        "  Incline velocity:      {:.4} deg/s",
        params.thrust_incline_velocity.to_degrees()
    );
    println!("  Fuel mass:             {:.1} kg", params.fuel_mass);
    println!("  Exhaust velocity:      {:.3} km/s", params.exhaust_velocity);
    println!("  Mass flow rate:        {:.2} kg/s", params.mass_flow_rate);
    println!("  Payload mass:          {:.1} kg", params.payload_mass);
    println!("  Ideal delta-v:         {:.3} km/s", params.delta_v());

    println!("\nFlight:");
    for line in solution.report.to_string().lines() {
        println!("  {}", line);
    }
}
