//! The frame compositor.
//!
//! [`Simulation`] owns every piece of mutable state (particles, flow field,
//! previous camera frame, palette, time) and runs one frame at a time:
//!
//! 1. fade (trails) or clear the background
//! 2. advance time
//! 3. sample motion against the previous camera frame
//! 4. rebuild the flow field
//! 5. switch to additive blending (glow)
//! 6. advect, wrap and draw every particle
//! 7. switch back to normal blending
//! 8. spawn a burst at the motion centroid, or an ambient trickle
//! 9. evict the oldest particles beyond the cap
//! 10. regenerate / rotate the palette on schedule

use glam::Vec2;

use crate::clock::{Clock, LocalClock};
use crate::color::Hsba;
use crate::config::SimConfig;
use crate::coords::SourceMapping;
use crate::flow_field::{FlowField, NoiseField, PerlinNoise};
use crate::frame::Frame;
use crate::motion::{MotionSample, MotionSampler};
use crate::palette::{Palette, PaletteUpdate};
use crate::particle::ParticleSystem;
use crate::random::{seeded_rng, RandomSource};
use crate::surface::{BlendMode, Surface};

/// Time advance per frame. The clock is `f64`; in `f32` it stops advancing
/// at 2¹⁸.
pub const TIME_STEP: f64 = 0.01;

// ════════════════════════════════════════════════════════════════════════════
// Collaborators
// ════════════════════════════════════════════════════════════════════════════

/// The external services a simulation draws on.
pub struct Collaborators {
    pub rng:   Box<dyn RandomSource>,
    pub noise: Box<dyn NoiseField>,
    pub clock: Box<dyn Clock>,
}

impl Collaborators {
    /// Seeded (or entropy-seeded) RNG, Perlin noise and the local clock.
    pub fn standard(seed: Option<u64>) -> Self {
        let mut rng = seeded_rng(seed);
        let noise_seed = match seed {
            Some(s) => noise_seed(s),
            None    => (rng.next_unit() * u32::MAX as f32) as u32,
        };
        Collaborators {
            rng:   Box::new(rng),
            noise: Box::new(PerlinNoise::new(noise_seed)),
            clock: Box::new(LocalClock),
        }
    }
}

/// Fold a 64-bit seed into the 32 bits Perlin takes, keeping both halves.
fn noise_seed(seed: u64) -> u32 {
    (seed ^ (seed >> 32)) as u32
}

// ════════════════════════════════════════════════════════════════════════════
// FrameStats
// ════════════════════════════════════════════════════════════════════════════

/// What happened during one call to [`Simulation::frame`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameStats {
    /// 1-based frame number.
    pub frame:     u64,
    pub motion:    MotionSample,
    pub spawned:   usize,
    pub evicted:   usize,
    pub particles: usize,
    pub palette:   PaletteUpdate,
}

// ════════════════════════════════════════════════════════════════════════════
// Simulation
// ════════════════════════════════════════════════════════════════════════════

pub struct Simulation {
    config:    SimConfig,
    canvas:    Vec2,
    particles: ParticleSystem,
    field:     FlowField,
    sampler:   MotionSampler,
    palette:   Palette,
    time:      f64,
    frame:     u64,
    rng:       Box<dyn RandomSource>,
    noise:     Box<dyn NoiseField>,
    clock:     Box<dyn Clock>,
}

impl Simulation {
    /// A simulation on a `canvas`-sized surface with the standard collaborators.
    pub fn new(config: SimConfig, canvas: Vec2) -> Self {
        let parts = Collaborators::standard(config.seed);
        Self::with_collaborators(config, canvas, parts)
    }

    /// A simulation with explicitly supplied randomness, noise and clock.
    ///
    /// Generates the first palette and places the initial ambient particles.
    pub fn with_collaborators(config: SimConfig, canvas: Vec2, parts: Collaborators) -> Self {
        let Collaborators { mut rng, noise, clock } = parts;

        let palette = Palette::generate(clock.hour());
        let field = FlowField::new(canvas, config.flow_field_resolution);
        let sampler = MotionSampler::new(
            config.motion_sample_step,
            config.motion_threshold,
            config.mirror_motion,
            (config.source_width, config.source_height),
        );

        let mut particles = ParticleSystem::new();
        let initial = config.initial_particles.min(config.max_particles);
        particles.spawn_ambient(initial, canvas, &palette, rng.as_mut());

        log::info!(
            "simulation ready: {}x{} canvas, {}x{} flow cells, {} particles, {:?} palette",
            canvas.x, canvas.y, field.cols(), field.rows(), particles.len(), palette.band()
        );

        Simulation {
            config,
            canvas,
            particles,
            field,
            sampler,
            palette,
            time: 0.0,
            frame: 0,
            rng,
            noise,
            clock,
        }
    }

    pub fn config(&self)    -> &SimConfig      { &self.config }
    pub fn canvas(&self)    -> Vec2            { self.canvas }
    pub fn particles(&self) -> &ParticleSystem { &self.particles }
    pub fn field(&self)     -> &FlowField      { &self.field }
    pub fn palette(&self)   -> &Palette        { &self.palette }
    pub fn time(&self)      -> f64             { self.time }
    pub fn frame_count(&self) -> u64           { self.frame }

    /// Mapping from the current camera frame size onto the canvas.
    pub fn mapping(&self) -> SourceMapping {
        let (w, h) = self.sampler.source_size();
        SourceMapping::new(Vec2::new(w as f32, h as f32), self.canvas)
    }

    /// React to a canvas resize: the flow grid is rebuilt from scratch.
    pub fn resize(&mut self, canvas: Vec2) {
        if canvas == self.canvas {
            return;
        }
        self.canvas = canvas;
        self.field.resize(canvas);
        let (w, h) = self.sampler.source_size();
        let mapping = self.mapping();
        self.field.update(self.noise.as_ref(), self.time, &MotionSample::idle(w, h), &mapping);
    }

    /// Render one frame from whatever camera frame is currently available.
    pub fn frame(&mut self, camera: Option<&Frame>, surface: &mut dyn Surface) -> FrameStats {
        self.sync_canvas(surface);
        self.draw_background(surface);
        self.time += TIME_STEP;
        let motion = self.sampler.sample(camera);
        self.render(motion, surface)
    }

    /// Like [`frame`](Self::frame) but with a motion sample supplied by the
    /// caller instead of measured from the camera.
    pub fn frame_with_motion(&mut self, motion: MotionSample, surface: &mut dyn Surface) -> FrameStats {
        self.sync_canvas(surface);
        self.draw_background(surface);
        self.time += TIME_STEP;
        self.render(motion, surface)
    }

    // ── per-frame steps ─────────────────────────────────────────────────────

    fn sync_canvas(&mut self, surface: &dyn Surface) {
        let size = surface.size();
        if size != self.canvas {
            self.resize(size);
        }
    }

    fn draw_background(&self, surface: &mut dyn Surface) {
        if self.config.enable_trails {
            let fade = Hsba::BLACK.with_alpha(self.config.trail_fade_strength as f32);
            surface.fill_rect(Vec2::ZERO, self.canvas, fade);
        } else {
            surface.clear(Hsba::BLACK);
        }
    }

    fn render(&mut self, motion: MotionSample, surface: &mut dyn Surface) -> FrameStats {
        self.frame += 1;
        let mapping = self.mapping();

        self.field.update(self.noise.as_ref(), self.time, &motion, &mapping);

        if self.config.use_additive_glow {
            surface.set_blend_mode(BlendMode::Additive);
        }
        self.particles.advance(&self.field, surface);
        if self.config.use_additive_glow {
            surface.set_blend_mode(BlendMode::Normal);
        }

        let spawned = if motion.active {
            let centre = mapping.to_canvas(motion.centroid());
            self.particles.spawn_burst(
                self.config.burst_spawn_count,
                centre,
                self.config.burst_jitter,
                &self.palette,
                self.rng.as_mut(),
            )
        } else {
            self.particles.spawn_ambient(
                self.config.ambient_spawn_rate,
                self.canvas,
                &self.palette,
                self.rng.as_mut(),
            )
        };

        let evicted = self.particles.trim(self.config.max_particles);
        let palette = self.palette.on_frame(self.frame, self.clock.as_ref());

        let stats = FrameStats {
            frame: self.frame,
            motion,
            spawned,
            evicted,
            particles: self.particles.len(),
            palette,
        };
        log::trace!("{:?}", stats);
        stats
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
