use approx::assert_relative_eq;

use glide_sim::error::{ConfigError, SimError};
use glide_sim::io::{csv, json, FlightSummary};
use glide_sim::sim::{simulate, simulate_with, Method, SimConfig, Termination};
use glide_sim::types::State;
use glide_sim::vehicle::{presets, VehicleParams};

fn launch() -> State {
    State::from_speed_gamma(0.0, 10.0, 70.0, 10f64.to_radians())
}

fn baseline_run(method: Method, t_max: f64) -> glide_sim::sim::SimResult {
    let config = VehicleParams::default().build().unwrap();
    let sim = SimConfig { t_max, dt: 0.02, ..Default::default() };
    simulate(&config, &launch(), &sim, method).unwrap()
}

// The baseline airframe zooms to about 141 m, then settles into a shallow
// glide sinking a little over 2 m/s; it is still airborne at 60 s.
#[test]
fn baseline_glide_is_airborne_at_one_minute() {
    for method in [Method::FixedStep, Method::Adaptive] {
        let r = baseline_run(method, 60.0);
        let (t_end, last) = r.trajectory.last().unwrap();

        assert_eq!(r.termination, Termination::HorizonReached, "{:?}", method);
        assert_relative_eq!(t_end, 60.0, epsilon = 1e-9);
        assert_relative_eq!(last.altitude(), 68.4815, epsilon = 0.01);
        assert!(r.trajectory.times().windows(2).all(|w| w[1] > w[0]));
        assert!(r.trajectory.iter().all(|(t, s)| t.is_finite() && s.is_finite()));

        let max_alt = r.trajectory.states().iter().map(|s| s.altitude()).fold(f64::MIN, f64::max);
        assert_relative_eq!(max_alt, 141.07, epsilon = 0.05);
    }
}

#[test]
fn baseline_glide_lands_within_three_minutes() {
    for method in [Method::FixedStep, Method::Adaptive] {
        let r = baseline_run(method, 180.0);
        let (t_end, last) = r.trajectory.last().unwrap();

        assert!(matches!(r.termination, Termination::Event { index: 0, .. }), "{:?}", method);
        assert!(t_end > 60.0 && t_end < 180.0);
        assert!(last.altitude() <= 0.0);
        assert!(r.trajectory.iter().all(|(t, s)| t.is_finite() && s.is_finite()));
    }
}

#[test]
fn baseline_fixed_step_stops_one_sample_past_contact() {
    let r = baseline_run(Method::FixedStep, 180.0);
    let states = r.trajectory.states();
    let n = states.len();
    assert!(n >= 2);
    assert!(states[n - 1].altitude() <= 0.0);
    assert!(states[n - 2].altitude() > 0.0);
}

#[test]
fn adaptive_contact_lands_on_the_floor() {
    let r = baseline_run(Method::Adaptive, 180.0);
    let (_, last) = r.trajectory.last().unwrap();
    assert_relative_eq!(last.altitude(), 0.0, epsilon = 1e-6);
}

#[test]
fn strategies_agree_on_contact_time() {
    let fixed = baseline_run(Method::FixedStep, 180.0);
    let adaptive = baseline_run(Method::Adaptive, 180.0);
    let (t_fixed, _) = fixed.trajectory.last().unwrap();
    let (t_adaptive, _) = adaptive.trajectory.last().unwrap();
    // Coarse termination lands within one step after the located crossing.
    assert!((t_fixed - t_adaptive).abs() <= 0.05, "{} vs {}", t_fixed, t_adaptive);
}

#[test]
fn repeated_runs_are_identical() {
    assert_eq!(baseline_run(Method::FixedStep, 60.0), baseline_run(Method::FixedStep, 60.0));
    assert_eq!(baseline_run(Method::Adaptive, 60.0), baseline_run(Method::Adaptive, 60.0));
}

#[test]
fn live_observer_matches_stored_trajectory() {
    let config = presets::baseline();
    let sim = SimConfig { t_max: 10.0, ..Default::default() };
    let mut seen = Vec::new();
    let mut obs = |t: f64, s: &State| seen.push((t, *s));
    let r = simulate_with(&config, &launch(), &sim, Method::FixedStep, &mut obs).unwrap();

    // The initial sample is not a step and is not reported.
    assert_eq!(seen.len(), r.trajectory.len() - 1);
    for ((t_obs, s_obs), (t, s)) in seen.iter().zip(r.trajectory.iter().skip(1)) {
        assert_eq!(*t_obs, t);
        assert_eq!(s_obs, s);
    }
}

#[test]
fn unknown_selectors_are_rejected() {
    let params = VehicleParams { atmosphere: "martian".into(), ..Default::default() };
    assert_eq!(params.build().unwrap_err(), ConfigError::UnknownAtmosphere("martian".into()));

    let params = VehicleParams { aero_model: "panel".into(), ..Default::default() };
    assert_eq!(params.build().unwrap_err(), ConfigError::UnknownAeroModel("panel".into()));
}

#[test]
fn zero_mass_never_integrates() {
    let config = glide_sim::vehicle::FlightConfig { mass: 0.0, ..presets::baseline() };
    let err = simulate(&config, &launch(), &SimConfig::default(), Method::Adaptive).unwrap_err();
    assert!(matches!(err, SimError::Config(ConfigError::NonPositive { name: "mass", .. })));
}

#[test]
fn simple_model_run_from_parameter_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("params.json");
    std::fs::write(&path, r#"{ "aero_model": "simple", "atmosphere": "exp", "cl_cmd": 0.3 }"#).unwrap();

    let config = VehicleParams::from_json_file(&path).unwrap().build().unwrap();
    let r = simulate(&config, &launch(), &SimConfig::default(), Method::Adaptive).unwrap();
    assert!(!r.trajectory.is_empty());
    assert!(r.trajectory.iter().all(|(_, s)| s.is_finite()));
}

#[test]
fn run_outputs_are_written() {
    let config = presets::baseline();
    let r = baseline_run(Method::Adaptive, 180.0);
    let summary = FlightSummary::from_trajectory(&r.trajectory, &config).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("baseline.csv");
    let meta_path = dir.path().join("baseline_meta.json");
    csv::write_trajectory_file(&csv_path, &r.trajectory).unwrap();
    json::write_summary_file(&meta_path, &r, &summary).unwrap();

    let text = std::fs::read_to_string(&csv_path).unwrap();
    assert_eq!(text.lines().next(), Some("t,x,y,vx,vy"));
    assert_eq!(text.lines().count(), r.trajectory.len() + 1);

    let meta: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&meta_path).unwrap()).unwrap();
    assert!(meta["kpis"]["range_m"].as_f64().unwrap() > 0.0);
    assert_eq!(meta["samples"].as_u64(), Some(r.trajectory.len() as u64));
    assert!(meta["final_aero"]["alpha_end_deg"].is_number());
}
