//! Particles and the bounded population that carries them.
//!
//! A particle is a plain value: position, velocity, pending acceleration,
//! the position it was last drawn at, and a few visual attributes fixed at
//! creation. Each frame it picks up the flow vector under it, integrates,
//! wraps around the canvas edges and strokes the segment from its previous
//! to its current position. Those short segments, laid over a slowly fading
//! background, are what read as trails.

use std::collections::VecDeque;

use glam::Vec2;

use crate::color::Hsba;
use crate::flow_field::FlowField;
use crate::palette::Palette;
use crate::random::RandomSource;
use crate::surface::Surface;

pub const MIN_SPEED_LIMIT:  f32 = 2.0;
pub const MAX_SPEED_LIMIT:  f32 = 4.0;
pub const AMBIENT_SIZE:     (f32, f32) = (2.0, 8.0);
pub const BURST_SIZE:       (f32, f32) = (10.0, 20.0);
/// Starting lifespan of a burst particle; doubles as its stroke alpha.
pub const FULL_LIFESPAN:    f32 = 255.0;
pub const LIFESPAN_STEP:    f32 = 4.0;
pub const BURST_SHRINK:     f32 = 0.985;
/// Stroke alpha of ambient particles.
pub const AMBIENT_ALPHA:    f32 = 200.0;

// ════════════════════════════════════════════════════════════════════════════
// Particle
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParticleKind {
    /// Background trickle; never fades, only evicted by the population cap.
    Ambient,
    /// Spawned by motion; shrinks and fades out over ~64 frames.
    Burst,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub pos:       Vec2,
    pub vel:       Vec2,
    pub acc:       Vec2,
    /// Where the last trail segment ended.
    pub prev_pos:  Vec2,
    pub max_speed: f32,
    pub color:     Hsba,
    pub size:      f32,
    pub kind:      ParticleKind,
    /// Counts down from [`FULL_LIFESPAN`] for burst particles; unused for ambient ones.
    pub lifespan:  f32,
}

impl Particle {
    /// A particle at rest at `pos`, with speed limit, size and color drawn from `rng`.
    pub fn spawn(
        pos:     Vec2,
        kind:    ParticleKind,
        palette: &Palette,
        rng:     &mut dyn RandomSource,
    ) -> Self {
        let max_speed = rng.range(MIN_SPEED_LIMIT, MAX_SPEED_LIMIT);
        let color = palette.pick(rng);
        let (lo, hi) = match kind {
            ParticleKind::Ambient => AMBIENT_SIZE,
            ParticleKind::Burst   => BURST_SIZE,
        };
        let size = rng.range(lo, hi);
        Particle {
            pos,
            vel:      Vec2::ZERO,
            acc:      Vec2::ZERO,
            prev_pos: pos,
            max_speed,
            color,
            size,
            kind,
            lifespan: FULL_LIFESPAN,
        }
    }

    pub fn is_burst(&self) -> bool {
        self.kind == ParticleKind::Burst
    }

    pub fn apply_force(&mut self, force: Vec2) {
        self.acc += force;
    }

    /// Pick up the flow vector of the cell under the particle. Positions
    /// outside the grid get no force.
    pub fn follow(&mut self, field: &FlowField) {
        if let Some(force) = field.lookup(self.pos) {
            self.apply_force(force);
        }
    }

    /// Integrate one step. Speed never exceeds `max_speed` afterwards.
    pub fn update(&mut self) {
        self.vel = (self.vel + self.acc).clamp_length_max(self.max_speed);
        self.pos += self.vel;
        self.acc = Vec2::ZERO;
        if self.is_burst() {
            self.lifespan -= LIFESPAN_STEP;
            self.size *= BURST_SHRINK;
        }
    }

    /// Wrap to the opposite edge when outside `[0, bounds]`. The trail start
    /// moves with the particle so the wrap draws no segment across the canvas.
    pub fn edges(&mut self, bounds: Vec2) {
        if self.pos.x > bounds.x {
            self.pos.x = 0.0;
            self.prev_pos.x = 0.0;
        } else if self.pos.x < 0.0 {
            self.pos.x = bounds.x;
            self.prev_pos.x = bounds.x;
        }
        if self.pos.y > bounds.y {
            self.pos.y = 0.0;
            self.prev_pos.y = 0.0;
        } else if self.pos.y < 0.0 {
            self.pos.y = bounds.y;
            self.prev_pos.y = bounds.y;
        }
    }

    /// Stroke alpha for this frame (0–255).
    pub fn alpha(&self) -> f32 {
        match self.kind {
            ParticleKind::Ambient => AMBIENT_ALPHA,
            ParticleKind::Burst   => self.lifespan.clamp(0.0, FULL_LIFESPAN),
        }
    }

    /// Whether a burst particle has faded to nothing. It stays in the
    /// population until evicted.
    pub fn is_faded(&self) -> bool {
        self.is_burst() && self.lifespan <= 0.0
    }

    /// Draw the trail segment since the last call.
    pub fn show(&mut self, surface: &mut dyn Surface) {
        surface.draw_line(self.prev_pos, self.pos, self.color.with_alpha(self.alpha()), self.size);
        self.prev_pos = self.pos;
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ParticleSystem
// ════════════════════════════════════════════════════════════════════════════

/// The live population, kept in insertion order (oldest at the front) so
/// the cap always evicts the oldest particles first.
#[derive(Clone, Debug, Default)]
pub struct ParticleSystem {
    particles: VecDeque<Particle>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        ParticleSystem::default()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn push(&mut self, p: Particle) {
        self.particles.push_back(p);
    }

    /// Follow, integrate, wrap and draw every particle, oldest first.
    pub fn advance(&mut self, field: &FlowField, surface: &mut dyn Surface) {
        let bounds = surface.size();
        for p in &mut self.particles {
            p.follow(field);
            p.update();
            p.edges(bounds);
            p.show(surface);
        }
    }

    /// Add `count` ambient particles at uniformly random canvas positions.
    pub fn spawn_ambient(
        &mut self,
        count:   usize,
        canvas:  Vec2,
        palette: &Palette,
        rng:     &mut dyn RandomSource,
    ) -> usize {
        for _ in 0..count {
            let pos = Vec2::new(rng.range(0.0, canvas.x), rng.range(0.0, canvas.y));
            let p = Particle::spawn(pos, ParticleKind::Ambient, palette, rng);
            self.particles.push_back(p);
        }
        count
    }

    /// Add `count` burst particles scattered up to `jitter` pixels (per axis)
    /// around `centre`.
    pub fn spawn_burst(
        &mut self,
        count:   usize,
        centre:  Vec2,
        jitter:  f32,
        palette: &Palette,
        rng:     &mut dyn RandomSource,
    ) -> usize {
        for _ in 0..count {
            let offset = Vec2::new(rng.range(-jitter, jitter), rng.range(-jitter, jitter));
            let p = Particle::spawn(centre + offset, ParticleKind::Burst, palette, rng);
            self.particles.push_back(p);
        }
        count
    }

    /// Evict the oldest particles until at most `max` remain. Returns how
    /// many were removed.
    pub fn trim(&mut self, max: usize) -> usize {
        let excess = self.particles.len().saturating_sub(max);
        self.particles.drain(..excess);
        excess
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::seeded_rng;
    use crate::surface::{DrawCall, RecordingSurface};

    fn particle_at(x: f32, y: f32, kind: ParticleKind) -> Particle {
        let mut rng = seeded_rng(Some(11));
        Particle::spawn(Vec2::new(x, y), kind, &Palette::generate(8), &mut rng)
    }

    #[test]
    fn spawn_attributes_in_range() {
        let palette = Palette::generate(14);
        let mut rng = seeded_rng(Some(1));
        for _ in 0..200 {
            let a = Particle::spawn(Vec2::ZERO, ParticleKind::Ambient, &palette, &mut rng);
            assert!(a.max_speed >= 2.0 && a.max_speed < 4.0);
            assert!(a.size >= 2.0 && a.size < 8.0);
            assert!(palette.colors().contains(&a.color));
            let b = Particle::spawn(Vec2::ZERO, ParticleKind::Burst, &palette, &mut rng);
            assert!(b.size >= 10.0 && b.size < 20.0);
            assert_eq!(b.lifespan, FULL_LIFESPAN);
        }
    }

    #[test]
    fn speed_is_clamped_for_any_acceleration() {
        let mut p = particle_at(50.0, 50.0, ParticleKind::Ambient);
        let forces = [
            Vec2::new(1000.0, -3000.0),
            Vec2::new(0.1, 0.0),
            Vec2::new(-7.5, 2.5),
            Vec2::new(1e6, 1e6),
            Vec2::ZERO,
        ];
        for f in forces.iter().cycle().take(50) {
            p.apply_force(*f);
            p.update();
            assert!(p.vel.length() <= p.max_speed + 1e-4, "speed {}", p.vel.length());
            assert_eq!(p.acc, Vec2::ZERO);
        }
    }

    #[test]
    fn update_integrates_position() {
        let mut p = particle_at(10.0, 10.0, ParticleKind::Ambient);
        p.apply_force(Vec2::new(1.0, 0.0));
        p.update();
        assert_eq!(p.vel, Vec2::new(1.0, 0.0));
        assert_eq!(p.pos, Vec2::new(11.0, 10.0));
    }

    #[test]
    fn follow_out_of_grid_is_noop() {
        let field = FlowField::new(Vec2::new(100.0, 100.0), 20);
        let mut p = particle_at(-5.0, 50.0, ParticleKind::Ambient);
        p.follow(&field);
        assert_eq!(p.acc, Vec2::ZERO);
        p.pos = Vec2::new(50.0, 50.0);
        p.follow(&field);
        assert_eq!(p.acc, Vec2::X);
    }

    #[test]
    fn wraps_right_edge_with_trail() {
        let bounds = Vec2::new(200.0, 100.0);
        let mut p = particle_at(198.0, 40.0, ParticleKind::Ambient);
        p.pos.x = 201.0;
        p.edges(bounds);
        assert_eq!(p.pos.x, 0.0);
        assert_eq!(p.prev_pos.x, 0.0);
        assert_eq!(p.pos.y, 40.0);
    }

    #[test]
    fn wraps_left_edge_with_trail() {
        let bounds = Vec2::new(200.0, 100.0);
        let mut p = particle_at(1.0, 40.0, ParticleKind::Ambient);
        p.pos.x = -0.5;
        p.edges(bounds);
        assert_eq!(p.pos.x, 200.0);
        assert_eq!(p.prev_pos.x, 200.0);
    }

    #[test]
    fn wraps_bottom_edge_with_trail() {
        let bounds = Vec2::new(200.0, 100.0);
        let mut p = particle_at(50.0, 99.0, ParticleKind::Ambient);
        p.pos.y = 102.0;
        p.edges(bounds);
        assert_eq!(p.pos.y, 0.0);
        assert_eq!(p.prev_pos.y, 0.0);
    }

    #[test]
    fn wraps_top_edge_with_trail() {
        let bounds = Vec2::new(200.0, 100.0);
        let mut p = particle_at(50.0, 1.0, ParticleKind::Ambient);
        p.pos.y = -3.0;
        p.edges(bounds);
        assert_eq!(p.pos.y, 100.0);
        assert_eq!(p.prev_pos.y, 100.0);
    }

    #[test]
    fn inside_bounds_untouched() {
        let mut p = particle_at(50.0, 50.0, ParticleKind::Ambient);
        p.edges(Vec2::new(100.0, 100.0));
        assert_eq!(p.pos, Vec2::new(50.0, 50.0));
        assert_eq!(p.prev_pos, Vec2::new(50.0, 50.0));
    }

    #[test]
    fn burst_decays_monotonically() {
        let mut p = particle_at(50.0, 50.0, ParticleKind::Burst);
        let (mut life, mut size) = (p.lifespan, p.size);
        for _ in 0..100 {
            p.update();
            assert!(p.lifespan < life);
            assert!(p.size < size);
            life = p.lifespan;
            size = p.size;
        }
        assert!(p.is_faded());
        assert_eq!(p.alpha(), 0.0);
    }

    #[test]
    fn ambient_does_not_decay() {
        let mut p = particle_at(50.0, 50.0, ParticleKind::Ambient);
        let size = p.size;
        for _ in 0..100 {
            p.update();
        }
        assert_eq!(p.size, size);
        assert_eq!(p.alpha(), AMBIENT_ALPHA);
        assert!(!p.is_faded());
    }

    #[test]
    fn show_draws_segment_and_advances_trail() {
        let mut surface = RecordingSurface::new(100.0, 100.0);
        let mut p = particle_at(10.0, 10.0, ParticleKind::Burst);
        p.apply_force(Vec2::new(2.0, 0.0));
        p.update();
        p.show(&mut surface);
        match &surface.calls[0] {
            DrawCall::Line { from, to, color, weight } => {
                assert_eq!(*from, Vec2::new(10.0, 10.0));
                assert_eq!(*to, Vec2::new(12.0, 10.0));
                assert_eq!(color.alpha, FULL_LIFESPAN - LIFESPAN_STEP);
                assert_eq!(*weight, p.size);
            }
            other => panic!("unexpected call {:?}", other),
        }
        assert_eq!(p.prev_pos, p.pos);
    }

    #[test]
    fn trim_evicts_oldest_first() {
        let palette = Palette::generate(8);
        let mut rng = seeded_rng(Some(3));
        let mut sys = ParticleSystem::new();
        for i in 0..10 {
            sys.push(Particle::spawn(Vec2::new(i as f32, 0.0), ParticleKind::Ambient, &palette, &mut rng));
        }
        assert_eq!(sys.trim(6), 4);
        assert_eq!(sys.len(), 6);
        let xs: Vec<f32> = sys.iter().map(|p| p.pos.x).collect();
        assert_eq!(xs, vec![4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        assert_eq!(sys.trim(6), 0);
    }

    #[test]
    fn trim_on_empty_pool() {
        let mut sys = ParticleSystem::new();
        assert_eq!(sys.trim(10), 0);
        assert!(sys.is_empty());
    }

    #[test]
    fn burst_spawns_within_jitter() {
        let palette = Palette::generate(8);
        let mut rng = seeded_rng(Some(21));
        let mut sys = ParticleSystem::new();
        let centre = Vec2::new(300.0, 200.0);
        assert_eq!(sys.spawn_burst(50, centre, 40.0, &palette, &mut rng), 50);
        for p in sys.iter() {
            assert!(p.is_burst());
            assert!((p.pos.x - centre.x).abs() <= 40.0);
            assert!((p.pos.y - centre.y).abs() <= 40.0);
        }
    }

    #[test]
    fn ambient_spawns_on_canvas() {
        let palette = Palette::generate(8);
        let mut rng = seeded_rng(Some(22));
        let mut sys = ParticleSystem::new();
        sys.spawn_ambient(100, Vec2::new(64.0, 48.0), &palette, &mut rng);
        for p in sys.iter() {
            assert_eq!(p.kind, ParticleKind::Ambient);
            assert!(p.pos.x >= 0.0 && p.pos.x <= 64.0);
            assert!(p.pos.y >= 0.0 && p.pos.y <= 48.0);
        }
    }

    #[test]
    fn advance_draws_every_particle() {
        let palette = Palette::generate(8);
        let mut rng = seeded_rng(Some(4));
        let mut sys = ParticleSystem::new();
        sys.spawn_ambient(25, Vec2::new(100.0, 100.0), &palette, &mut rng);
        let field = FlowField::new(Vec2::new(100.0, 100.0), 20);
        let mut surface = RecordingSurface::new(100.0, 100.0);
        sys.advance(&field, &mut surface);
        assert_eq!(surface.lines().count(), 25);
        for p in sys.iter() {
            assert!(p.pos.x >= 0.0 && p.pos.x <= 100.0);
            assert!(p.vel.length() <= p.max_speed + 1e-4);
        }
    }
}
