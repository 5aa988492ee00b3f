//! Simulation configuration.
//!
//! Loaded once at startup (from JSON, or [`SimConfig::default`]) and never
//! hot-reloaded. Every field is optional in the file; missing fields take
//! the defaults below.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

// ════════════════════════════════════════════════════════════════════════════
// SimConfig
// ════════════════════════════════════════════════════════════════════════════

/// Tunables for one simulation run.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// Ambient particles placed on the canvas at startup.
    pub initial_particles:     usize,
    /// Population cap; the oldest particles are evicted beyond this.
    pub max_particles:         usize,
    /// Flow-field cell size in canvas pixels.
    pub flow_field_resolution: u32,
    /// Per-pixel RGB distance a sampled pixel must exceed to count as motion.
    pub motion_threshold:      f32,
    /// Sampling stride over the camera frame, in pixels.
    pub motion_sample_step:    usize,
    /// Fade the previous frame with a translucent overlay instead of clearing.
    pub enable_trails:         bool,
    /// Alpha (0–255) of the fade overlay; higher clears faster.
    pub trail_fade_strength:   u8,
    /// Draw particles with additive blending.
    pub use_additive_glow:     bool,
    /// Ambient particles spawned per frame while no motion is detected.
    pub ambient_spawn_rate:    usize,
    /// Burst particles spawned per frame while motion is detected.
    pub burst_spawn_count:     usize,
    /// Maximum offset (canvas px, each axis) of a burst particle from the centroid.
    pub burst_jitter:          f32,
    /// Reflect the motion centroid horizontally.
    pub mirror_motion:         bool,
    /// Nominal camera frame width, used until a frame arrives.
    pub source_width:          usize,
    /// Nominal camera frame height, used until a frame arrives.
    pub source_height:         usize,
    /// Seed for randomness and noise; `None` seeds from entropy.
    pub seed:                  Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            initial_particles:     1200,
            max_particles:         2500,
            flow_field_resolution: 20,
            motion_threshold:      30.0,
            motion_sample_step:    5,
            enable_trails:         true,
            trail_fade_strength:   18,
            use_additive_glow:     true,
            ambient_spawn_rate:    4,
            burst_spawn_count:     10,
            burst_jitter:          40.0,
            mirror_motion:         false,
            source_width:          320,
            source_height:         240,
            seed:                  None,
        }
    }
}

impl SimConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg = Self::from_json(&text)?;
        log::info!("loaded config from {}", path.display());
        Ok(cfg)
    }

    /// Parse and validate a JSON config document.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let cfg: SimConfig = serde_json::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.flow_field_resolution == 0 {
            return Err(ConfigError::invalid("flow_field_resolution", "must be at least 1"));
        }
        if self.motion_sample_step == 0 {
            return Err(ConfigError::invalid("motion_sample_step", "must be at least 1"));
        }
        if self.max_particles == 0 {
            return Err(ConfigError::invalid("max_particles", "must be at least 1"));
        }
        if self.source_width == 0 || self.source_height == 0 {
            return Err(ConfigError::invalid(
                "source_width",
                format!("source size {}x{} has a zero side", self.source_width, self.source_height),
            ));
        }
        if !self.motion_threshold.is_finite() || self.motion_threshold < 0.0 {
            return Err(ConfigError::invalid(
                "motion_threshold",
                format!("{} is not a non-negative number", self.motion_threshold),
            ));
        }
        if !self.burst_jitter.is_finite() || self.burst_jitter < 0.0 {
            return Err(ConfigError::invalid(
                "burst_jitter",
                format!("{} is not a non-negative number", self.burst_jitter),
            ));
        }
        if self.initial_particles > self.max_particles {
            log::warn!(
                "initial_particles ({}) exceeds max_particles ({}); the initial fill will be capped",
                self.initial_particles, self.max_particles
            );
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = SimConfig::from_json(r#"{ "max_particles": 300, "enable_trails": false }"#)
            .unwrap();
        assert_eq!(cfg.max_particles, 300);
        assert!(!cfg.enable_trails);
        assert_eq!(cfg.flow_field_resolution, 20);
        assert_eq!(cfg.ambient_spawn_rate, 4);
    }

    #[test]
    fn zero_resolution_rejected() {
        let err = SimConfig::from_json(r#"{ "flow_field_resolution": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "flow_field_resolution", .. }));
    }

    #[test]
    fn zero_stride_rejected() {
        let cfg = SimConfig { motion_sample_step: 0, ..SimConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn negative_threshold_rejected() {
        let cfg = SimConfig { motion_threshold: -1.0, ..SimConfig::default() };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Invalid { field: "motion_threshold", .. })
        ));
    }

    #[test]
    fn unknown_field_is_a_parse_error() {
        let err = SimConfig::from_json(r#"{ "particle_count": 5 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = SimConfig::load("/nonexistent/flow_core/config.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
