use missile_trajectory::engines::simulation::{
    simulate_flight, Earth, FlightLimits, GravityField, Rocket, RocketParams, StopReason,
    EARTH_RADIUS_KM, MAX_FLIGHT_STEPS,
};
use missile_trajectory::types::{GeoCoordinates, Vec3};

fn launch_site(earth: &Earth) -> Vec3 {
    earth.geo_to_position(GeoCoordinates::new(0.0, 0.0))
}

fn antipode_direction(earth: &Earth) -> Vec3 {
    let start = launch_site(earth);
    earth.geo_to_position(GeoCoordinates::new(0.0, 180.0)) - start
}

/// 50 s burn, thrust-to-weight about 5 at liftoff.
fn strong_rocket() -> RocketParams {
    RocketParams {
        start_incline_after_distance: 2.0,
        thrust_incline_max_duration: 300.0,
        thrust_incline_velocity: 0.2_f64.to_radians(),
        fuel_mass: 5000.0,
        exhaust_velocity: 3.0,
        mass_flow_rate: 100.0,
        payload_mass: 1000.0,
    }
}

fn vertical_rocket() -> RocketParams {
    RocketParams {
        thrust_incline_velocity: 0.0,
        ..strong_rocket()
    }
}

#[test]
fn test_surface_gravity_is_about_one_g() {
    let earth = Earth::new();
    let site = launch_site(&earth);

    let gravity = earth.gravity_at(&site);

    assert!((gravity.norm() - 0.009_798).abs() < 1e-5, "{}", gravity.norm());
    // points at the centre
    assert!((gravity.normalize() + site.normalize()).norm() < 1e-12);
    assert!(earth.altitude_of(&site).abs() < 1e-9);
}

#[test]
fn test_geo_conversion_round_trip() {
    let earth = Earth::new();

    for (lat, lon) in [(0.0, 0.0), (45.0, 30.0), (-33.5, -120.25), (10.0, 179.0)] {
        let position = earth.geo_to_position(GeoCoordinates::new(lat, lon));
        assert!((position.norm() - EARTH_RADIUS_KM).abs() < 1e-9);

        let geo = earth.position_to_geo(&position);
        assert!((geo.latitude - lat).abs() < 1e-9, "lat {} -> {}", lat, geo.latitude);
        assert!((geo.longitude - lon).abs() < 1e-9, "lon {} -> {}", lon, geo.longitude);
    }
}

#[test]
fn test_half_turn_longitude_is_antipode() {
    let earth = Earth::new();
    let start = launch_site(&earth);
    let target = earth.geo_to_position(GeoCoordinates::new(0.0, 180.0));

    assert!((start + target).norm() < 1e-9);
    assert!(((target - start).norm() - 2.0 * EARTH_RADIUS_KM).abs() < 1e-9);
}

#[test]
fn test_integrator_is_deterministic() {
    let earth = Earth::new();
    let run = || {
        let mut rocket = Rocket::new(&earth, launch_site(&earth), antipode_direction(&earth), strong_rocket());
        let mut trace = Vec::new();
        for _ in 0..3000 {
            rocket.update(1.0);
            trace.push(rocket.position);
        }
        (trace, rocket.flight_time, rocket.has_landed)
    };

    assert_eq!(run(), run());
}

#[test]
fn test_thrust_is_zero_once_fuel_is_burned() {
    let earth = Earth::new();
    let params = strong_rocket();
    let mut rocket = Rocket::new(&earth, launch_site(&earth), antipode_direction(&earth), params);

    let mut burning_steps = 0;
    for _ in 0..400 {
        let elapsed = rocket.flight_time;
        rocket.update(1.0);

        if elapsed * params.mass_flow_rate >= params.fuel_mass {
            assert_eq!(rocket.thrust, Vec3::zeros(), "thrust at t={}", elapsed);
            assert_eq!(rocket.current_total_mass, params.payload_mass);
        } else {
            assert!(rocket.thrust.norm() > 0.0);
            burning_steps += 1;
        }
    }
    assert_eq!(burning_steps, 50);
    assert_eq!(rocket.remaining_fuel_mass(), 0.0);
}

#[test]
fn test_total_impulse_matches_rocket_equation_for_any_step() {
    let earth = Earth::new();
    let params = strong_rocket();
    let expected = params.exhaust_velocity * (params.initial_total_mass() / params.payload_mass).ln();
    assert!((params.delta_v() - expected).abs() < 1e-12);

    for tick in [1.0, 0.1, 0.25] {
        let mut rocket = Rocket::new(&earth, launch_site(&earth), antipode_direction(&earth), params);
        let mut impulse = 0.0;
        while rocket.flight_time < params.fuel_combustion_time() + 2.0 {
            rocket.update(tick);
            impulse += rocket.thrust.norm() * tick;
        }

        assert!(
            (impulse - expected).abs() < 1e-9 * expected,
            "step {}: impulse {} vs {}",
            tick,
            impulse,
            expected
        );
    }
}

#[test]
fn test_step_size_changes_trajectory_only_slightly_for_vertical_flight() {
    let earth = Earth::new();
    let max_altitude = |tick: f64| {
        let mut rocket = Rocket::new(&earth, launch_site(&earth), antipode_direction(&earth), vertical_rocket());
        let steps = (1000.0 / tick).round() as usize;
        for _ in 0..steps {
            rocket.update(tick);
        }
        rocket.max_altitude
    };

    let coarse = max_altitude(1.0);
    let fine = max_altitude(0.01);

    assert!(fine > 500.0, "apex {}", fine);
    let relative = (coarse - fine).abs() / fine;
    // bounded but not zero: the integrator is step-size sensitive
    assert!(relative < 0.02, "coarse {} fine {} ({:.4})", coarse, fine, relative);
}

#[test]
fn test_step_size_divergence_is_bounded_through_the_gravity_turn() {
    let earth = Earth::new();
    let fly = |tick: f64| {
        let mut rocket = Rocket::new(&earth, launch_site(&earth), antipode_direction(&earth), strong_rocket());
        let burn_steps = (50.0 / tick).round() as usize;
        for _ in 0..burn_steps {
            rocket.update(tick);
        }
        let burnout_speed = rocket.velocity.norm();
        let burnout_turn = rocket.thrust_incline_angle;

        let limits = FlightLimits {
            step_seconds: tick,
            ..FlightLimits::default()
        };
        let stop = simulate_flight(&mut rocket, &limits);
        (stop, burnout_speed, burnout_turn, rocket.displacement().norm())
    };

    let (coarse_stop, coarse_speed, coarse_turn, coarse_range) = fly(1.0);
    let (fine_stop, fine_speed, fine_turn, fine_range) = fly(0.01);

    assert_eq!(coarse_stop, StopReason::Landed);
    assert_eq!(fine_stop, StopReason::Landed);
    assert!(fine_turn > 5.0_f64.to_radians(), "turn {}", fine_turn.to_degrees());
    assert!(fine_range > 50.0, "range {}", fine_range);

    // The turn starts on the first step above the incline altitude, so a
    // coarse step shifts it by at most one step of turn rate.
    assert!((coarse_turn - fine_turn).abs() <= 0.25_f64.to_radians() + 1e-12);
    assert!((coarse_speed - fine_speed).abs() / fine_speed < 0.01);
    let relative = (coarse_range - fine_range).abs() / fine_range;
    assert!(relative < 0.10, "coarse {} fine {} ({:.4})", coarse_range, fine_range, relative);
}

#[test]
fn test_vertical_flight_stays_on_the_local_vertical() {
    let earth = Earth::new();
    let site = launch_site(&earth);
    let mut rocket = Rocket::new(&earth, site, antipode_direction(&earth), vertical_rocket());

    for _ in 0..200 {
        rocket.update(1.0);
    }

    let off_axis = rocket.position - site.normalize() * rocket.position.dot(&site.normalize());
    assert!(off_axis.norm() < 1e-6, "drifted {} km", off_axis.norm());
    assert_eq!(rocket.thrust_incline_angle, 0.0);
}

#[test]
fn test_gravity_turn_is_clamped_to_horizontal() {
    let earth = Earth::new();
    let params = RocketParams {
        thrust_incline_velocity: 5.0_f64.to_radians(),
        thrust_incline_max_duration: 1000.0,
        ..strong_rocket()
    };
    let mut rocket = Rocket::new(&earth, launch_site(&earth), antipode_direction(&earth), params);

    for _ in 0..45 {
        rocket.update(1.0);
    }

    assert!(rocket.current_thrust_incline_duration > 0.0);
    assert!(rocket.thrust_incline_angle <= std::f64::consts::FRAC_PI_2 + 1e-9);
}

#[test]
fn test_flight_loop_stops_on_altitude_limit() {
    let earth = Earth::new();
    let mut rocket = Rocket::new(&earth, launch_site(&earth), antipode_direction(&earth), vertical_rocket());
    let limits = FlightLimits {
        max_altitude: Some(100.0),
        ..FlightLimits::default()
    };

    let stop = simulate_flight(&mut rocket, &limits);

    assert_eq!(stop, StopReason::AltitudeExceeded);
    assert!(rocket.altitude > 100.0);
    assert!(!rocket.has_landed);
}

#[test]
fn test_flight_loop_stops_on_distance_limit() {
    let earth = Earth::new();
    let mut rocket = Rocket::new(&earth, launch_site(&earth), antipode_direction(&earth), vertical_rocket());
    let limits = FlightLimits {
        max_distance: Some(50.0),
        ..FlightLimits::default()
    };

    let stop = simulate_flight(&mut rocket, &limits);

    assert_eq!(stop, StopReason::DistanceExceeded);
    assert!(rocket.travelled_distance.norm() > 50.0);
}

#[test]
fn test_flight_loop_exhausts_time_budget() {
    let earth = Earth::new();
    let mut rocket = Rocket::new(&earth, launch_site(&earth), antipode_direction(&earth), strong_rocket());
    let limits = FlightLimits {
        max_flight_time_seconds: 10.0,
        ..FlightLimits::default()
    };

    let stop = simulate_flight(&mut rocket, &limits);

    assert_eq!(stop, StopReason::TimeBudgetExhausted);
    assert!((rocket.flight_time - 10.0).abs() < 1e-12);
}

#[test]
fn test_step_count_is_capped_for_huge_budgets() {
    let limits = FlightLimits {
        step_seconds: 1e-9,
        max_flight_time_seconds: 1e300,
        ..FlightLimits::default()
    };
    assert_eq!(limits.max_steps(), MAX_FLIGHT_STEPS);

    let unbounded = FlightLimits {
        max_flight_time_seconds: f64::INFINITY,
        ..FlightLimits::default()
    };
    assert_eq!(unbounded.max_steps(), MAX_FLIGHT_STEPS);

    assert_eq!(FlightLimits::default().max_steps(), 7200);
}

#[test]
fn test_rocket_lands_after_ballistic_arc() {
    let earth = Earth::new();
    let mut rocket = Rocket::new(&earth, launch_site(&earth), antipode_direction(&earth), strong_rocket());

    let stop = simulate_flight(&mut rocket, &FlightLimits::default());

    assert_eq!(stop, StopReason::Landed);
    assert!(rocket.has_landed);
    assert_eq!(rocket.velocity, Vec3::zeros());
    assert!(rocket.max_altitude > 10.0);
    assert!(rocket.displacement().norm() > 10.0);
}

#[test]
fn test_earth_rotation_moves_target_about_polar_axis() {
    let mut earth = Earth::new();
    let target = earth.geo_to_position(GeoCoordinates::new(30.0, 0.0));

    let day = std::f64::consts::TAU / earth.rotation_speed;
    let after_quarter = earth.rotate_point(&target, day / 4.0);

    // latitude is preserved, longitude moves by a quarter turn
    assert!((after_quarter.y - target.y).abs() < 1e-9);
    assert!((after_quarter.norm() - target.norm()).abs() < 1e-9);
    let geo = earth.position_to_geo(&after_quarter);
    assert!((geo.latitude - 30.0).abs() < 1e-9);
    assert!((geo.longitude.abs() - 90.0).abs() < 1e-6);

    earth.rotate(day);
    assert!(earth.rotation_angle.abs() < 1e-9 || (earth.rotation_angle - std::f64::consts::TAU).abs() < 1e-9);
}
