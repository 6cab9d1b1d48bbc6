use std::path::{Path, PathBuf};

use plotters::prelude::*;
use thiserror::Error;

use crate::sim::Trajectory;

const FONT: &str = "sans-serif";
const SIZE: (u32, u32) = (1200, 900);

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("nothing to plot: trajectory is empty")]
    Empty,

    #[error("cannot create {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("plot rendering failed: {0}")]
    Render(String),
}

fn render_err<E: std::fmt::Display>(e: E) -> PlotError {
    PlotError::Render(e.to_string())
}

/// Axis bounds with a 5 % pad; a flat series gets a unit-wide band.
fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let pad = if hi > lo { 0.05 * (hi - lo) } else { 0.5 };
    (lo - pad, hi + pad)
}

fn line_chart(
    path: &Path,
    caption: &str,
    x_desc: &str,
    y_desc: &str,
    points: &[(f64, f64)],
) -> Result<(), PlotError> {
    let x_range = bounds(points.iter().map(|p| p.0));
    let y_range = bounds(points.iter().map(|p| p.1));

    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, (FONT, SIZE.1 / 20).into_font())
        .margin(SIZE.1 / 30)
        .x_label_area_size(SIZE.1 / 15)
        .y_label_area_size(SIZE.1 / 12)
        .build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .axis_desc_style((FONT, SIZE.1 / 40).into_font())
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(LineSeries::new(points.iter().copied(), ShapeStyle::from(&BLUE).stroke_width(2)))
        .map_err(render_err)?;

    root.present().map_err(render_err)
}

/// Render `<tag>_speed.png` (speed vs time) and `<tag>_traj.png` (x-y path)
/// into `dir`, creating it if needed. Returns the two paths written.
pub fn write_figures(dir: impl AsRef<Path>, tag: &str, trajectory: &Trajectory) -> Result<(PathBuf, PathBuf), PlotError> {
    if trajectory.is_empty() {
        return Err(PlotError::Empty);
    }
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir).map_err(|source| PlotError::Io {
        path: dir.display().to_string(),
        source,
    })?;

    let speed_path = dir.join(format!("{}_speed.png", tag));
    let speed: Vec<(f64, f64)> = trajectory.iter().map(|(t, s)| (t, s.speed())).collect();
    line_chart(&speed_path, "Speed vs Time", "t [s]", "V [m/s]", &speed)?;

    let traj_path = dir.join(format!("{}_traj.png", tag));
    let path: Vec<(f64, f64)> = trajectory.states().iter().map(|s| (s.pos.x, s.pos.y)).collect();
    line_chart(&traj_path, "Trajectory", "x [m]", "y [m]", &path)?;

    Ok((speed_path, traj_path))
}
