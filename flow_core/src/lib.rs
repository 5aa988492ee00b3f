//! # flow_core
//!
//! A motion-reactive flow-field particle simulation. Motion measured between
//! consecutive camera frames bends a noise-driven vector field; thousands of
//! particles drift through it and are drawn as short trail segments over a
//! slowly fading background.
//!
//! ## Per-frame pipeline
//!
//! | Step | Module |
//! |---|---|
//! | Fade or clear background | [`compositor`] |
//! | Compare camera frame to the previous one | [`motion`] |
//! | Rebuild the vector grid from noise + motion | [`flow_field`] |
//! | Advect, wrap and draw particles | [`particle`] |
//! | Spawn bursts / ambient trickle, cap population | [`particle`], [`compositor`] |
//! | Time-of-day palette schedule | [`palette`] |
//!
//! The crate never opens a window or a camera. Drawing goes through the
//! [`Surface`] trait; randomness, noise and wall-clock time are injected via
//! [`RandomSource`], [`NoiseField`] and [`Clock`].
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use flow_core::{RecordingSurface, SimConfig, Simulation, Vec2};
//!
//! let mut sim = Simulation::new(SimConfig::default(), Vec2::new(1280.0, 720.0));
//! let mut surface = RecordingSurface::new(1280.0, 720.0);
//! let stats = sim.frame(None, &mut surface);
//! assert!(stats.particles <= sim.config().max_particles);
//! ```

pub mod clock;
pub mod color;
pub mod compositor;
pub mod config;
pub mod coords;
pub mod error;
pub mod flow_field;
pub mod frame;
pub mod motion;
pub mod palette;
pub mod particle;
pub mod random;
pub mod surface;

pub use clock::{Clock, FixedClock, LocalClock};
pub use color::Hsba;
pub use compositor::{Collaborators, FrameStats, Simulation};
pub use config::SimConfig;
pub use coords::SourceMapping;
pub use error::ConfigError;
pub use flow_field::{ConstantNoise, FlowField, NoiseField, PerlinNoise};
pub use frame::Frame;
pub use motion::{MotionSample, MotionSampler};
pub use palette::Palette;
pub use particle::{Particle, ParticleKind, ParticleSystem};
pub use random::RandomSource;
pub use surface::{BlendMode, DrawCall, RecordingSurface, Surface};

pub use glam::Vec2;
