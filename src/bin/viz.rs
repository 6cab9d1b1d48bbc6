use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use egui_plot::{Line, Plot, PlotPoints};

use glide_sim::cli::FlightArgs;
use glide_sim::sim::{self, Method, SimConfig};
use glide_sim::types::{FlightConfig, State};

#[derive(Parser, Debug)]
#[command(name = "glide-viz", version, about = "Live plot of a fixed-step glide-sim run")]
struct Opts {
    #[command(flatten)]
    flight: FlightArgs,
}

enum Msg {
    Sample { t: f64, x: f64, y: f64, speed: f64 },
    Finished(String),
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let opt = Opts::parse();

    let params = opt.flight.vehicle_params()?;
    let config = params.build().context("invalid vehicle configuration")?;
    let s0 = opt.flight.initial_state();
    let sim_config = opt.flight.sim_config();

    let (tx, rx) = crossbeam_channel::unbounded();
    thread::spawn(move || run_worker(tx, config, s0, sim_config));

    let app = LiveViz { rx, samples: Vec::new(), status: "running".into() };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native("Glide Flight Simulator", options, Box::new(|_| Ok(Box::new(app))))
        .map_err(|e| anyhow::anyhow!("window failed: {}", e))
}

/// Runs the fixed-step engine and streams every sample to the window,
/// paced at roughly real time.
fn run_worker(tx: Sender<Msg>, config: FlightConfig, s0: State, sim_config: SimConfig) {
    let pace = Duration::from_secs_f64(sim_config.dt);

    let mut forward = |t: f64, s: &State| {
        // Window closed: nothing left to draw into.
        let _ = tx.send(Msg::Sample { t, x: s.pos.x, y: s.pos.y, speed: s.speed() });
        thread::sleep(pace);
    };
    let status = match sim::simulate_with(&config, &s0, &sim_config, Method::FixedStep, &mut forward) {
        Ok(result) if result.hit_event() => format!("ground contact, {} samples", result.trajectory.len()),
        Ok(result) => format!("horizon reached, {} samples", result.trajectory.len()),
        Err(err) => {
            log::warn!("{}", err);
            format!("failed: {}", err)
        }
    };
    let _ = tx.send(Msg::Finished(status));
}

struct LiveViz {
    rx: Receiver<Msg>,
    samples: Vec<[f64; 4]>, // t, x, y, speed
    status: String,
}

impl eframe::App for LiveViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        for msg in self.rx.try_iter() {
            match msg {
                Msg::Sample { t, x, y, speed } => self.samples.push([t, x, y, speed]),
                Msg::Finished(status) => self.status = status,
            }
        }

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            let (t, speed, alt) = self.samples.last().map_or((0.0, 0.0, 0.0), |s| (s[0], s[3], s[2]));
            ui.label(format!(
                "t={:.2} s  |  V={:.1} m/s  |  y={:.1} m  |  {}",
                t, speed, alt, self.status
            ));
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let half_w = available.x / 2.0 - 8.0;

            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label("Speed (m/s)");
                    let points: PlotPoints = self.samples.iter().map(|s| [s[0], s[3]]).collect();
                    Plot::new("speed")
                        .width(half_w)
                        .height(available.y)
                        .x_axis_label("Time (s)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Speed", points));
                        });
                });

                ui.vertical(|ui| {
                    ui.label("Trajectory (m)");
                    let points: PlotPoints = self.samples.iter().map(|s| [s[1], s[2]]).collect();
                    Plot::new("trajectory")
                        .width(half_w)
                        .height(available.y)
                        .x_axis_label("x (m)")
                        .data_aspect(1.0)
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Path", points));
                        });
                });
            });
        });

        ctx.request_repaint_after(Duration::from_millis(30));
    }
}
