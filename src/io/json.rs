use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use crate::dynamics::aero_state;
use crate::physics::AeroKind;
use crate::sim::{SimResult, Termination, Trajectory};
use crate::vehicle::FlightConfig;

/// Performance figures computed from a finished trajectory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    pub range_m: f64,
    pub max_alt_m: f64,
    pub time_aloft_s: f64,
    /// End-of-run lift-to-drag ratio.
    #[serde(rename = "LD")]
    pub ld: f64,
    /// Lift-to-drag at the first sample, from the saturated CL the equations
    /// of motion use (not the raw linear lift-curve value).
    #[serde(rename = "LD_initial")]
    pub ld_initial: f64,
    /// Range over altitude lost; absent when no altitude was lost.
    pub glide_ratio: Option<f64>,
    /// Mechanical energy lost per metre of range, J/m.
    pub energy_per_m: f64,
}

/// Aerodynamic snapshot at the last sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalAero {
    /// Only meaningful for the angle-of-attack model.
    pub alpha_end_deg: Option<f64>,
    #[serde(rename = "CL_end")]
    pub cl_end: f64,
    #[serde(rename = "CD_eff_end")]
    pub cd_eff_end: f64,
    #[serde(rename = "q_end_Pa")]
    pub q_end_pa: f64,
}

/// Summary statistics computed from a flight trajectory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightSummary {
    pub kpis: Kpis,
    pub final_aero: FinalAero,
}

impl FlightSummary {
    /// Compute summary from trajectory data. `None` for an empty trajectory.
    pub fn from_trajectory(trajectory: &Trajectory, config: &FlightConfig) -> Option<Self> {
        let (_, first) = trajectory.first()?;
        let (t_end, last) = trajectory.last()?;

        let max_alt_m = trajectory
            .states()
            .iter()
            .map(|s| s.altitude())
            .fold(f64::NEG_INFINITY, f64::max);

        let range_m = last.pos.x - first.pos.x;
        let alt_drop = first.altitude() - last.altitude();
        let glide_ratio = (alt_drop > 1e-9).then(|| range_m / alt_drop);

        let d_ke = 0.5 * config.mass * (last.speed().powi(2) - first.speed().powi(2));
        let d_pe = config.mass * config.gravity * (last.altitude() - first.altitude());
        let energy_per_m = -(d_ke + d_pe) / range_m.max(1e-9);

        let start = aero_state(first, config);
        let end = aero_state(last, config);

        Some(FlightSummary {
            kpis: Kpis {
                range_m,
                max_alt_m,
                time_aloft_s: t_end,
                ld: end.lift_to_drag(),
                ld_initial: start.lift_to_drag(),
                glide_ratio,
                energy_per_m,
            },
            final_aero: FinalAero {
                alpha_end_deg: (config.aero.kind() == AeroKind::Polar).then(|| end.alpha.to_degrees()),
                cl_end: end.cl,
                cd_eff_end: end.cd,
                q_end_pa: end.dyn_pressure,
            },
        })
    }

    /// One-line console summary.
    pub fn headline(&self) -> String {
        let k = &self.kpis;
        format!(
            "range={:.0} m | max_alt={:.1} m | time_aloft={:.1} s | L/D={:.2} (init {:.2}) | glide={} | energy_per_m={:.0} J/m",
            k.range_m,
            k.max_alt_m,
            k.time_aloft_s,
            k.ld,
            k.ld_initial,
            k.glide_ratio.map_or_else(|| "n/a".to_string(), |g| format!("{:.2}", g)),
            k.energy_per_m,
        )
    }
}

#[derive(Serialize)]
struct RunMeta<'a> {
    termination: String,
    samples: usize,
    accepted_steps: u64,
    rejected_steps: u64,
    fn_evals: u64,
    #[serde(flatten)]
    summary: &'a FlightSummary,
}

/// Write run metadata and the flight summary as pretty JSON.
pub fn write_summary<W: Write>(writer: &mut W, result: &SimResult, summary: &FlightSummary) -> io::Result<()> {
    let termination = match result.termination {
        Termination::HorizonReached => "horizon".to_string(),
        Termination::Event { time, .. } => format!("ground contact at {:.3} s", time),
    };
    let meta = RunMeta {
        termination,
        samples: result.trajectory.len(),
        accepted_steps: result.stats.accepted_steps,
        rejected_steps: result.stats.rejected_steps,
        fn_evals: result.stats.fn_evals,
        summary,
    };
    serde_json::to_writer_pretty(&mut *writer, &meta)?;
    writeln!(writer)
}

/// Write flight summary JSON to a file.
pub fn write_summary_file(path: impl AsRef<Path>, result: &SimResult, summary: &FlightSummary) -> io::Result<()> {
    let mut file = io::BufWriter::new(std::fs::File::create(path)?);
    write_summary(&mut file, result, summary)?;
    file.flush()
}
