//! Mapping between camera-frame space and canvas space.
//!
//! The motion centroid is measured in source-frame pixels; the flow-field
//! perturbation and the burst spawn point both need it in canvas pixels.
//! Both go through [`SourceMapping::to_canvas`] so the two can never drift.

use glam::Vec2;

/// Linearly remap `v` from `[from_lo, from_hi]` to `[to_lo, to_hi]`.
///
/// Values outside the input range extrapolate. A degenerate input range maps
/// everything to `to_lo`.
pub fn map_range(v: f32, from_lo: f32, from_hi: f32, to_lo: f32, to_hi: f32) -> f32 {
    let span = from_hi - from_lo;
    if span == 0.0 {
        return to_lo;
    }
    to_lo + (v - from_lo) / span * (to_hi - to_lo)
}

/// Linear rescale from a `source` frame size onto a `canvas` size.
///
/// Domain: `[0, source.x] × [0, source.y]`; range: `[0, canvas.x] × [0, canvas.y]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SourceMapping {
    pub source: Vec2,
    pub canvas: Vec2,
}

impl SourceMapping {
    pub fn new(source: Vec2, canvas: Vec2) -> Self {
        SourceMapping { source, canvas }
    }

    pub fn to_canvas(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            map_range(p.x, 0.0, self.source.x, 0.0, self.canvas.x),
            map_range(p.y, 0.0, self.source.y, 0.0, self.canvas.y),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_range_endpoints() {
        assert_eq!(map_range(0.0, 0.0, 200.0, 10.0, 0.0), 10.0);
        assert_eq!(map_range(200.0, 0.0, 200.0, 10.0, 0.0), 0.0);
        assert_eq!(map_range(50.0, 0.0, 200.0, 0.0, 4.0), 1.0);
    }

    #[test]
    fn degenerate_range() {
        assert_eq!(map_range(3.0, 1.0, 1.0, 7.0, 9.0), 7.0);
    }

    #[test]
    fn centre_maps_to_centre() {
        let m = SourceMapping::new(Vec2::new(320.0, 240.0), Vec2::new(1280.0, 720.0));
        assert_eq!(m.to_canvas(Vec2::new(160.0, 120.0)), Vec2::new(640.0, 360.0));
        assert_eq!(m.to_canvas(Vec2::ZERO), Vec2::ZERO);
    }
}
