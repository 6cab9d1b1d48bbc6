use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use glide_sim::cli::FlightArgs;
use glide_sim::io::{csv, json, FlightSummary};
use glide_sim::sim::{self, Method, ProgressLogger};

#[derive(Parser, Debug)]
#[command(name = "glide-sim", version, about = "2D point-mass flight path simulation")]
struct Opts {
    #[command(flatten)]
    flight: FlightArgs,

    /// Fixed-step run with periodic progress output
    #[arg(long)]
    live: bool,

    /// Output directory
    #[arg(long, default_value = "data/runs")]
    out_dir: PathBuf,

    /// Figure directory for the speed and trajectory PNGs
    #[cfg(feature = "plots")]
    #[arg(long, default_value = "data/figures")]
    fig_dir: PathBuf,

    /// Output file stem
    #[arg(long, default_value = "baseline")]
    tag: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let opt = Opts::parse();

    let params = opt.flight.vehicle_params()?;
    let config = params.build().context("invalid vehicle configuration")?;
    let s0 = opt.flight.initial_state();
    let sim_config = opt.flight.sim_config();

    let result = if opt.live {
        let mut progress = ProgressLogger::new(1.0);
        sim::simulate_with(&config, &s0, &sim_config, Method::FixedStep, &mut progress)
    } else {
        sim::simulate(&config, &s0, &sim_config, Method::Adaptive)
    };
    let result = match result {
        Ok(result) => result,
        Err(err) => {
            if let Some(partial) = err.partial_trajectory() {
                log::warn!("run failed after {} samples", partial.len());
            }
            return Err(err).context("simulation failed");
        }
    };

    let summary = FlightSummary::from_trajectory(&result.trajectory, &config)
        .context("simulation produced no samples")?;

    fs::create_dir_all(&opt.out_dir)
        .with_context(|| format!("cannot create {}", opt.out_dir.display()))?;
    let csv_path = opt.out_dir.join(format!("{}.csv", opt.tag));
    let meta_path = opt.out_dir.join(format!("{}_meta.json", opt.tag));

    csv::write_trajectory_file(&csv_path, &result.trajectory)
        .with_context(|| format!("cannot write {}", csv_path.display()))?;
    json::write_summary_file(&meta_path, &result, &summary)
        .with_context(|| format!("cannot write {}", meta_path.display()))?;
    log::info!("wrote {} and {}", csv_path.display(), meta_path.display());

    #[cfg(feature = "plots")]
    {
        let (speed, traj) = glide_sim::io::plot::write_figures(&opt.fig_dir, &opt.tag, &result.trajectory)?;
        log::info!("wrote {} and {}", speed.display(), traj.display());
    }

    println!(
        "{} | model={} | pitch={:.1} deg",
        summary.headline(),
        params.aero_model,
        params.pitch_deg
    );
    Ok(())
}
