//! The flow field: a grid of unit direction vectors steering the particles.
//!
//! The grid is rebuilt in full every frame. Each cell's angle comes from a
//! smooth `(x, y, t)` noise value spread over two full turns, and while
//! motion is active, cells within [`INFLUENCE_RADIUS`] of the motion
//! centroid get an extra oscillating twist that grows toward the centroid.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use noise::{NoiseFn, Perlin};

use crate::coords::{map_range, SourceMapping};
use crate::motion::MotionSample;

/// Noise-space step between neighbouring cells.
pub const NOISE_SCALE: f32 = 0.05;
/// Canvas-pixel radius of the motion perturbation.
pub const INFLUENCE_RADIUS: f32 = 200.0;

// ════════════════════════════════════════════════════════════════════════════
// NoiseField: the smooth noise collaborator
// ════════════════════════════════════════════════════════════════════════════

/// A deterministic, smooth noise function of `(x, y, t)` with values in `[0, 1)`.
///
/// `t` is the simulation clock, which grows without bound, so it stays `f64`.
pub trait NoiseField {
    fn noise(&self, x: f32, y: f32, t: f64) -> f32;
}

/// 3D Perlin noise rescaled from `[-1, 1]` into `[0, 1)`.
pub struct PerlinNoise {
    perlin: Perlin,
}

impl PerlinNoise {
    pub fn new(seed: u32) -> Self {
        PerlinNoise { perlin: Perlin::new(seed) }
    }
}

impl NoiseField for PerlinNoise {
    fn noise(&self, x: f32, y: f32, t: f64) -> f32 {
        let v = self.perlin.get([x as f64, y as f64, t]);
        (((v + 1.0) * 0.5) as f32).clamp(0.0, 0.999_999)
    }
}

/// Returns the same value everywhere. Useful for deterministic runs.
#[derive(Clone, Copy, Debug)]
pub struct ConstantNoise(pub f32);

impl NoiseField for ConstantNoise {
    fn noise(&self, _x: f32, _y: f32, _t: f64) -> f32 {
        self.0
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FlowField
// ════════════════════════════════════════════════════════════════════════════

/// `cols × rows` unit vectors, one per `resolution`-pixel cell, stored
/// row-major at `col + row * cols`.
#[derive(Clone, Debug)]
pub struct FlowField {
    cols:       usize,
    rows:       usize,
    resolution: u32,
    vectors:    Vec<Vec2>,
}

impl FlowField {
    /// Allocate a field covering a `canvas`-sized area. All cells start as +X.
    pub fn new(canvas: Vec2, resolution: u32) -> Self {
        let resolution = resolution.max(1);
        let (cols, rows) = grid_dims(canvas, resolution);
        FlowField {
            cols,
            rows,
            resolution,
            vectors: vec![Vec2::X; cols * rows],
        }
    }

    /// Reallocate for a new canvas size. Old cell indices are invalid after this.
    pub fn resize(&mut self, canvas: Vec2) {
        let (cols, rows) = grid_dims(canvas, self.resolution);
        log::info!(
            "flow field resized {}x{} -> {}x{} cells",
            self.cols, self.rows, cols, rows
        );
        self.cols = cols;
        self.rows = rows;
        self.vectors.clear();
        self.vectors.resize(cols * rows, Vec2::X);
    }

    pub fn cols(&self)       -> usize  { self.cols }
    pub fn rows(&self)       -> usize  { self.rows }
    pub fn resolution(&self) -> u32    { self.resolution }
    pub fn vectors(&self)    -> &[Vec2] { &self.vectors }

    pub fn get(&self, col: usize, row: usize) -> Option<Vec2> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.vectors.get(col + row * self.cols).copied()
    }

    /// Index of the cell containing canvas position `pos`, or `None` when
    /// `pos` falls outside the grid.
    pub fn cell_index(&self, pos: Vec2) -> Option<usize> {
        if !pos.is_finite() || pos.x < 0.0 || pos.y < 0.0 {
            return None;
        }
        let res = self.resolution as f32;
        let col = (pos.x / res).floor() as usize;
        let row = (pos.y / res).floor() as usize;
        if col >= self.cols || row >= self.rows {
            return None;
        }
        Some(col + row * self.cols)
    }

    /// The vector under canvas position `pos`, if any.
    pub fn lookup(&self, pos: Vec2) -> Option<Vec2> {
        self.cell_index(pos).and_then(|i| self.vectors.get(i).copied())
    }

    /// Recompute every cell for `time`, perturbed around the motion centroid
    /// when `motion` is active.
    pub fn update(
        &mut self,
        noise:   &dyn NoiseField,
        time:    f64,
        motion:  &MotionSample,
        mapping: &SourceMapping,
    ) {
        let res = self.resolution as f32;
        let centre = motion.active.then(|| mapping.to_canvas(motion.centroid()));
        let swing = (time * 2.0).sin() as f32;

        for row in 0..self.rows {
            for col in 0..self.cols {
                let n = noise.noise(col as f32 * NOISE_SCALE, row as f32 * NOISE_SCALE, time);
                let mut angle = n * TAU * 2.0;

                if let Some(c) = centre {
                    let d = Vec2::new(col as f32 * res, row as f32 * res).distance(c);
                    if d < INFLUENCE_RADIUS {
                        angle += map_range(d, 0.0, INFLUENCE_RADIUS, PI, 0.0) * swing;
                    }
                }

                let v = Vec2::new(angle.cos(), angle.sin());
                self.vectors[col + row * self.cols] = v.try_normalize().unwrap_or(Vec2::X);
            }
        }
    }
}

fn grid_dims(canvas: Vec2, resolution: u32) -> (usize, usize) {
    let res = resolution.max(1) as f32;
    let cols = (canvas.x.max(0.0) / res).floor() as usize + 1;
    let rows = (canvas.y.max(0.0) / res).floor() as usize + 1;
    (cols, rows)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
