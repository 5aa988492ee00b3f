//! Motion sampling: two consecutive camera frames → one coarse motion signal.
//!
//! The frame is scanned on a sparse grid (every `stride` pixels on both
//! axes). A sampled pixel counts as moving when the RGB distance to the same
//! pixel in the previous frame exceeds the threshold. Intensity is the summed
//! distance normalised by the *full* frame's pixel count over `stride²`, so
//! its unit does not depend on how many pixels passed the threshold.

use glam::Vec2;

use crate::frame::Frame;

/// Intensity above which motion counts as active.
pub const ACTIVE_INTENSITY: f32 = 0.5;

// ════════════════════════════════════════════════════════════════════════════
// MotionSample
// ════════════════════════════════════════════════════════════════════════════

/// The per-frame motion signal. Coordinates are in source-frame pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionSample {
    pub active:    bool,
    pub intensity: f32,
    pub x:         f32,
    pub y:         f32,
}

impl MotionSample {
    /// No motion, centred on a `width × height` frame.
    pub fn idle(width: usize, height: usize) -> Self {
        MotionSample {
            active:    false,
            intensity: 0.0,
            x:         width  as f32 / 2.0,
            y:         height as f32 / 2.0,
        }
    }

    pub fn centroid(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// MotionSampler
// ════════════════════════════════════════════════════════════════════════════

/// Compares each incoming frame against the previous one it saw.
///
/// The sampler owns the previous-frame buffer and is its only writer.
#[derive(Debug)]
pub struct MotionSampler {
    stride:    usize,
    threshold: f32,
    mirror:    bool,
    /// Size reported before any frame has arrived.
    nominal:   (usize, usize),
    previous:  Option<Frame>,
}

impl MotionSampler {
    pub fn new(stride: usize, threshold: f32, mirror: bool, nominal: (usize, usize)) -> Self {
        MotionSampler {
            stride: stride.max(1),
            threshold,
            mirror,
            nominal,
            previous: None,
        }
    }

    pub fn previous(&self) -> Option<&Frame> {
        self.previous.as_ref()
    }

    /// Size of the most recent frame seen, or the nominal size.
    pub fn source_size(&self) -> (usize, usize) {
        self.previous
            .as_ref()
            .map(|f| (f.width(), f.height()))
            .unwrap_or(self.nominal)
    }

    /// Sample motion between `current` and the previous frame, then make
    /// `current` the new previous frame.
    ///
    /// Never fails: with no current frame, an empty one, or no comparable
    /// previous frame, returns an inactive sample centred on the frame.
    pub fn sample(&mut self, current: Option<&Frame>) -> MotionSample {
        let current = match current {
            Some(f) if !f.is_empty() => f,
            _ => {
                let (w, h) = self.source_size();
                return MotionSample::idle(w, h);
            }
        };
        let (w, h) = (current.width(), current.height());

        let comparable = matches!(&self.previous, Some(prev) if prev.same_size(current));
        if !comparable {
            match self.previous.as_mut() {
                Some(prev) => {
                    log::warn!(
                        "camera frame size changed {}x{} -> {}x{}; resetting motion baseline",
                        prev.width(), prev.height(), w, h
                    );
                    prev.copy_from(current);
                }
                None => {
                    log::debug!("first camera frame {}x{}; seeding motion baseline", w, h);
                    self.previous = Some(current.clone());
                }
            }
            return MotionSample::idle(w, h);
        }
        let Some(previous) = self.previous.as_mut() else {
            return MotionSample::idle(w, h);
        };

        let mut total = 0.0f32;
        let mut sum_x = 0.0f64;
        let mut sum_y = 0.0f64;
        let mut count = 0usize;

        for y in (0..h).step_by(self.stride) {
            for x in (0..w).step_by(self.stride) {
                let d = rgb_distance(current.rgb(x, y), previous.rgb(x, y));
                if d > self.threshold {
                    total += d;
                    sum_x += x as f64;
                    sum_y += y as f64;
                    count += 1;
                }
            }
        }

        previous.copy_from(current);

        let samples_in_frame = (w * h) as f32 / (self.stride * self.stride) as f32;
        let intensity = if samples_in_frame > 0.0 { total / samples_in_frame } else { 0.0 };

        let (mut cx, cy) = if count > 0 {
            ((sum_x / count as f64) as f32, (sum_y / count as f64) as f32)
        } else {
            (w as f32 / 2.0, h as f32 / 2.0)
        };
        if self.mirror {
            cx = w as f32 - cx;
        }

        MotionSample {
            active: intensity > ACTIVE_INTENSITY,
            intensity,
            x: cx,
            y: cy,
        }
    }
}

/// Euclidean distance between two RGB triples.
fn rgb_distance(a: [u8; 3], b: [u8; 3]) -> f32 {
    let dr = a[0] as f32 - b[0] as f32;
    let dg = a[1] as f32 - b[1] as f32;
    let db = a[2] as f32 - b[2] as f32;
    (dr * dr + dg * dg + db * db).sqrt()
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
