//! Top-level application state and main loop.
//!
//! `AppState` owns the [`Simulation`], the [`Framebuffer`] it draws into and
//! the [`LatestFrame`] holder fed by the capture thread. `run` opens the
//! window and drives one simulation frame per display refresh.

use std::sync::mpsc::Receiver;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use flow_core::{Frame, FrameStats, SimConfig, Simulation, Vec2};

use crate::canvas::Framebuffer;
use crate::capture::{spawn_frame_source, CaptureStatus, LatestFrame, SyntheticCamera};
use crate::visualizer::Visualizer;

/// How often (in frames) the loop logs a summary line.
const REPORT_EVERY: u64 = 300;

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Configuration for the full application.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub sim:        SimConfig,
    /// Initial window size.
    pub width:      usize,
    pub height:     usize,
    /// Cadence of the capture thread.
    pub camera_fps: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            sim:        SimConfig::default(),
            width:      1280,
            height:     720,
            camera_fps: 30,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    sim:    Simulation,
    canvas: Framebuffer,
    latest: LatestFrame,
    status: CaptureStatus,
}

impl AppState {
    pub fn new(cfg: &AppConfig) -> Self {
        let size = Vec2::new(cfg.width as f32, cfg.height as f32);
        Self::with_simulation(Simulation::new(cfg.sim.clone(), size), cfg.width, cfg.height)
    }

    pub fn with_simulation(sim: Simulation, width: usize, height: usize) -> Self {
        AppState {
            sim,
            canvas: Framebuffer::new(width, height),
            latest: LatestFrame::default(),
            status: CaptureStatus::Waiting,
        }
    }

    pub fn size(&self) -> (usize, usize) {
        (self.canvas.width(), self.canvas.height())
    }

    /// Follow a window resize. Zero-sized (minimised) windows are ignored.
    pub fn resize(&mut self, width: usize, height: usize) {
        if width == 0 || height == 0 || (width, height) == self.size() {
            return;
        }
        log::info!("window resized to {}x{}", width, height);
        self.canvas.resize(width, height);
        self.sim.resize(Vec2::new(width as f32, height as f32));
    }

    /// Pick up whatever the capture thread has delivered since last frame.
    pub fn poll_camera(&mut self, rx: &Receiver<Frame>) -> CaptureStatus {
        self.status = self.latest.poll(rx);
        self.status
    }

    /// Run one simulation frame into the framebuffer.
    pub fn tick(&mut self) -> FrameStats {
        self.sim.frame(self.latest.frame(), &mut self.canvas)
    }

    pub fn canvas(&self)     -> &Framebuffer   { &self.canvas }
    pub fn simulation(&self) -> &Simulation    { &self.sim }
    pub fn capture(&self)    -> CaptureStatus  { self.status }
}

// ════════════════════════════════════════════════════════════════════════════
// run(): the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application until the window closes.
///
/// Starts the capture thread, opens the window and renders one simulation
/// frame per refresh. Camera hiccups never stop the loop; only window
/// creation can fail.
pub fn run(cfg: AppConfig) -> Result<()> {
    let camera = SyntheticCamera::new(cfg.sim.source_width, cfg.sim.source_height, cfg.camera_fps);
    let frames = spawn_frame_source(camera);

    let mut vis = Visualizer::new(cfg.width, cfg.height)
        .map_err(|e| anyhow!(e))
        .context("failed to open visualizer window")?;

    let mut app = AppState::new(&cfg);
    let mut report_start = Instant::now();

    while vis.is_open() {
        if !vis.poll_input() { break; }

        let (w, h) = vis.size();
        app.resize(w, h);

        app.poll_camera(&frames);
        let stats = app.tick();

        if let Err(e) = vis.present(app.canvas()) {
            log::warn!("present failed: {}", e);
        }

        if stats.frame % REPORT_EVERY == 0 {
            let secs = report_start.elapsed().as_secs_f32().max(f32::EPSILON);
            log::debug!(
                "frame {}: {:.1} fps, {} particles, motion {:.2} ({}), camera {:?}",
                stats.frame,
                REPORT_EVERY as f32 / secs,
                stats.particles,
                stats.motion.intensity,
                if stats.motion.active { "active" } else { "idle" },
                app.capture(),
            );
            report_start = Instant::now();
        }
    }

    log::info!("window closed after {} frames", app.simulation().frame_count());
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn make_app() -> AppState {
        let cfg = AppConfig {
            sim: SimConfig { initial_particles: 200, max_particles: 400, seed: Some(7), ..SimConfig::default() },
            width: 320,
            height: 200,
            ..AppConfig::default()
        };
        AppState::new(&cfg)
    }

    #[test]
    fn tick_without_camera_runs_ambient() {
        let mut app = make_app();
        let stats = app.tick();
        assert!(!stats.motion.active);
        assert_eq!(stats.particles, 204);
        assert_eq!(app.capture(), CaptureStatus::Waiting);
    }

    #[test]
    fn particles_light_up_canvas() {
        let mut app = make_app();
        for _ in 0..3 { app.tick(); }
        assert!(app.canvas().pixels().iter().any(|&p| p != 0xFF00_0000));
    }

    #[test]
    fn synthetic_camera_triggers_bursts() {
        let mut app = make_app();
        let cam = SyntheticCamera::new(320, 240, 30);
        let (tx, rx) = mpsc::channel();

        tx.send(cam.frame_at(0)).unwrap();
        assert_eq!(app.poll_camera(&rx), CaptureStatus::Live);
        app.tick();

        tx.send(cam.frame_at(20)).unwrap();
        app.poll_camera(&rx);
        let stats = app.tick();
        assert!(stats.motion.active, "intensity {}", stats.motion.intensity);
        assert_eq!(stats.spawned, app.simulation().config().burst_spawn_count);
    }

    #[test]
    fn population_capped_over_many_frames() {
        let mut app = make_app();
        for _ in 0..100 {
            let stats = app.tick();
            assert!(stats.particles <= 400);
        }
    }

    #[test]
    fn resize_follows_window() {
        let mut app = make_app();
        app.resize(640, 480);
        assert_eq!(app.size(), (640, 480));
        assert_eq!(app.simulation().canvas(), Vec2::new(640.0, 480.0));
        app.resize(0, 0);
        assert_eq!(app.size(), (640, 480));
    }
}
