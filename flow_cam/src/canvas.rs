//! Software framebuffer implementing [`Surface`].
//!
//! Pixels are packed `0xAARRGGBB` (alpha always `0xFF`), the layout
//! `minifb` presents directly. Strokes are rasterized as capsules: every
//! pixel whose centre lies within `weight / 2` of the segment is blended
//! once, so a short thick segment reads as a round dab.

use flow_core::{BlendMode, Hsba, Surface, Vec2};

const OPAQUE: u32 = 0xFF00_0000;

pub struct Framebuffer {
    width:  usize,
    height: usize,
    pixels: Vec<u32>,
    blend:  BlendMode,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Framebuffer {
            width,
            height,
            pixels: vec![OPAQUE; width * height],
            blend:  BlendMode::Normal,
        }
    }

    pub fn width(&self)  -> usize  { self.width }
    pub fn height(&self) -> usize  { self.height }
    pub fn pixels(&self) -> &[u32] { &self.pixels }
    pub fn blend_mode(&self) -> BlendMode { self.blend }

    /// Reallocate to a new size; contents are cleared to black.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width * height, OPAQUE);
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    fn put(&mut self, x: usize, y: usize, rgb: [u8; 3], opacity: f32) {
        let i = y * self.width + x;
        self.pixels[i] = match self.blend {
            BlendMode::Normal   => mix(self.pixels[i], rgb, opacity),
            BlendMode::Additive => add(self.pixels[i], rgb, opacity),
        };
    }

    /// Clip a float rectangle to pixel index ranges.
    fn clip(&self, x0: f32, y0: f32, x1: f32, y1: f32) -> (usize, usize, usize, usize) {
        let cx = |v: f32| v.clamp(0.0, self.width as f32) as usize;
        let cy = |v: f32| v.clamp(0.0, self.height as f32) as usize;
        (cx(x0.floor()), cy(y0.floor()), cx(x1.ceil()), cy(y1.ceil()))
    }
}

impl Surface for Framebuffer {
    fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Hsba) {
        let opacity = color.opacity();
        if opacity <= 0.0 {
            return;
        }
        let rgb = color.to_rgb();
        let end = origin + size;
        let (x0, y0, x1, y1) = self.clip(origin.x, origin.y, end.x, end.y);
        for y in y0..y1 {
            for x in x0..x1 {
                self.put(x, y, rgb, opacity);
            }
        }
    }

    fn clear(&mut self, color: Hsba) {
        let [r, g, b] = color.to_rgb();
        self.pixels.fill(pack(r as u32, g as u32, b as u32));
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Hsba, weight: f32) {
        let opacity = color.opacity();
        if opacity <= 0.0 || !from.is_finite() || !to.is_finite() {
            return;
        }
        let rgb = color.to_rgb();
        let r = (weight * 0.5).max(0.5);
        let lo = from.min(to) - Vec2::splat(r);
        let hi = from.max(to) + Vec2::splat(r);
        let (x0, y0, x1, y1) = self.clip(lo.x, lo.y, hi.x, hi.y);

        let seg = to - from;
        let len_sq = seg.length_squared();
        let r_sq = r * r;
        for y in y0..y1 {
            for x in x0..x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let t = if len_sq > 0.0 { ((p - from).dot(seg) / len_sq).clamp(0.0, 1.0) } else { 0.0 };
                if p.distance_squared(from + seg * t) <= r_sq {
                    self.put(x, y, rgb, opacity);
                }
            }
        }
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.blend = mode;
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pixel arithmetic
// ────────────────────────────────────────────────────────────────────────────

fn pack(r: u32, g: u32, b: u32) -> u32 {
    OPAQUE | (r.min(255) << 16) | (g.min(255) << 8) | b.min(255)
}

fn channels(c: u32) -> (u32, u32, u32) {
    ((c >> 16) & 0xFF, (c >> 8) & 0xFF, c & 0xFF)
}

/// Source-over: `t` = 0.0 → all `dst`, `t` = 1.0 → all `src`.
///
/// A channel that would round back to its old value still moves one step
/// toward `src`, so repeated faint fades converge instead of leaving a haze.
fn mix(dst: u32, src: [u8; 3], t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |d: u32, s: u8| {
        let s = s as u32;
        let v = (d as f32 * (1.0 - t) + s as f32 * t).round() as u32;
        match (v == d && t > 0.0, s.cmp(&d)) {
            (true, std::cmp::Ordering::Less)    => d - 1,
            (true, std::cmp::Ordering::Greater) => d + 1,
            _                                   => v,
        }
    };
    let (dr, dg, db) = channels(dst);
    pack(lerp(dr, src[0]), lerp(dg, src[1]), lerp(db, src[2]))
}

/// Additive: `dst + src * t`, saturating per channel.
fn add(dst: u32, src: [u8; 3], t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let sum = |d: u32, s: u8| d + (s as f32 * t).round() as u32;
    let (dr, dg, db) = channels(dst);
    pack(sum(dr, src[0]), sum(dg, src[1]), sum(db, src[2]))
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
