//! The rendering collaborator.
//!
//! The simulation never touches pixels itself; it asks a [`Surface`] for the
//! few primitives it needs. The host supplies a real framebuffer, tests use
//! [`RecordingSurface`].

use glam::Vec2;

use crate::color::Hsba;

/// How new strokes combine with what is already on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Source-over alpha compositing.
    #[default]
    Normal,
    /// Channels are summed (saturating), so overlapping strokes glow.
    Additive,
}

/// A 2D canvas the compositor draws onto.
pub trait Surface {
    /// Canvas size in pixels.
    fn size(&self) -> Vec2;

    /// Fill the axis-aligned rectangle at `origin` with `color`, honouring its alpha.
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Hsba);

    /// Replace every pixel with an opaque `color`.
    fn clear(&mut self, color: Hsba);

    /// Stroke a straight segment `weight` pixels thick.
    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Hsba, weight: f32);

    fn set_blend_mode(&mut self, mode: BlendMode);
}

// ════════════════════════════════════════════════════════════════════════════
// RecordingSurface
// ════════════════════════════════════════════════════════════════════════════

/// A draw call captured by [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    FillRect { origin: Vec2, size: Vec2, color: Hsba },
    Clear    { color: Hsba },
    Line     { from: Vec2, to: Vec2, color: Hsba, weight: f32 },
    Blend(BlendMode),
}

/// A headless surface that only records what was asked of it.
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    size:      Vec2,
    pub calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        RecordingSurface { size: Vec2::new(width, height), calls: Vec::new() }
    }

    pub fn set_size(&mut self, width: f32, height: f32) {
        self.size = Vec2::new(width, height);
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCall> {
        self.calls.iter().filter(|c| matches!(c, DrawCall::Line { .. }))
    }

    pub fn reset(&mut self) {
        self.calls.clear();
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Hsba) {
        self.calls.push(DrawCall::FillRect { origin, size, color });
    }

    fn clear(&mut self, color: Hsba) {
        self.calls.push(DrawCall::Clear { color });
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Hsba, weight: f32) {
        self.calls.push(DrawCall::Line { from, to, color, weight });
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.calls.push(DrawCall::Blend(mode));
    }
}
