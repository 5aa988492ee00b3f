//! Time-of-day palettes.
//!
//! Five vivid hues offset from a base hue picked by the hour: red in the
//! morning, gold around noon, blue in the evening. The palette is rebuilt
//! every [`REGENERATE_EVERY`] frames and, independently, every entry's hue
//! creeps forward by one degree every [`ROTATE_EVERY`] frames.

use crate::clock::Clock;
use crate::color::Hsba;
use crate::random::RandomSource;

pub const PALETTE_SIZE: usize = 5;
/// Hue offsets (degrees) from the base hue.
pub const PALETTE_OFFSETS: [f32; PALETTE_SIZE] = [0.0, 30.0, 180.0, 210.0, 330.0];
pub const REGENERATE_EVERY: u64 = 3600;
pub const ROTATE_EVERY:     u64 = 120;
/// Degrees added to every hue on each rotation.
pub const ROTATE_STEP:      f32 = 1.0;

// ════════════════════════════════════════════════════════════════════════════
// DayBand
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DayBand {
    /// 06:00–11:59
    Morning,
    /// 12:00–17:59
    Noon,
    /// Everything else.
    Evening,
}

impl DayBand {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=11  => DayBand::Morning,
            12..=17 => DayBand::Noon,
            _       => DayBand::Evening,
        }
    }

    pub fn base_hue(self) -> f32 {
        match self {
            DayBand::Morning => 0.0,
            DayBand::Noon    => 50.0,
            DayBand::Evening => 220.0,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Palette
// ════════════════════════════════════════════════════════════════════════════

/// What a call to [`Palette::on_frame`] changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PaletteUpdate {
    pub regenerated: bool,
    pub rotated:     bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    band:   DayBand,
    colors: [Hsba; PALETTE_SIZE],
}

impl Palette {
    /// Build the palette for `hour` (0–23).
    pub fn generate(hour: u32) -> Self {
        let band = DayBand::from_hour(hour);
        let base = band.base_hue();
        Palette {
            band,
            colors: PALETTE_OFFSETS.map(|off| Hsba::vivid(base + off)),
        }
    }

    pub fn band(&self)   -> DayBand { self.band }
    pub fn colors(&self) -> &[Hsba] { &self.colors }

    /// Advance every hue by `degrees`, wrapping mod 360.
    pub fn rotate(&mut self, degrees: f32) {
        for c in &mut self.colors {
            c.rotate_hue(degrees);
        }
    }

    /// A uniformly random entry. The returned color is a copy; later
    /// rotations do not affect it.
    pub fn pick(&self, rng: &mut dyn RandomSource) -> Hsba {
        self.colors[rng.index(self.colors.len())]
    }

    /// Apply the periodic schedule for the given (1-based) frame number.
    pub fn on_frame(&mut self, frame: u64, clock: &dyn Clock) -> PaletteUpdate {
        let mut update = PaletteUpdate::default();
        if frame == 0 {
            return update;
        }
        if frame % REGENERATE_EVERY == 0 {
            let hour = clock.hour();
            *self = Palette::generate(hour);
            log::debug!("palette regenerated for hour {} ({:?})", hour, self.band);
            update.regenerated = true;
        }
        if frame % ROTATE_EVERY == 0 {
            self.rotate(ROTATE_STEP);
            update.rotated = true;
        }
        update
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::random::seeded_rng;

    #[test]
    fn hour_bands() {
        assert_eq!(Palette::generate(8).band(),  DayBand::Morning);
        assert_eq!(Palette::generate(14).band(), DayBand::Noon);
        assert_eq!(Palette::generate(22).band(), DayBand::Evening);
        assert_eq!(Palette::generate(3).band(),  DayBand::Evening);
        assert_eq!(Palette::generate(6).band(),  DayBand::Morning);
        assert_eq!(Palette::generate(12).band(), DayBand::Noon);
        assert_eq!(Palette::generate(18).band(), DayBand::Evening);
    }

    #[test]
    fn morning_hues() {
        let hues: Vec<f32> = Palette::generate(8).colors().iter().map(|c| c.hue).collect();
        assert_eq!(hues, vec![0.0, 30.0, 180.0, 210.0, 330.0]);
    }

    #[test]
    fn evening_hues_wrap() {
        let hues: Vec<f32> = Palette::generate(22).colors().iter().map(|c| c.hue).collect();
        assert_eq!(hues, vec![220.0, 250.0, 40.0, 70.0, 190.0]);
    }

    #[test]
    fn entries_are_vivid() {
        for c in Palette::generate(14).colors() {
            assert_eq!((c.saturation, c.brightness, c.alpha), (100.0, 100.0, 255.0));
        }
    }

    #[test]
    fn rotation_on_schedule() {
        let clock = FixedClock(8);
        let mut p = Palette::generate(8);
        assert_eq!(p.on_frame(119, &clock), PaletteUpdate::default());
        let u = p.on_frame(120, &clock);
        assert!(u.rotated && !u.regenerated);
        assert_eq!(p.colors()[0].hue, 1.0);
        assert_eq!(p.colors()[4].hue, 331.0);
    }

    #[test]
    fn regeneration_resets_then_rotates() {
        let mut p = Palette::generate(8);
        p.rotate(17.0);
        let u = p.on_frame(REGENERATE_EVERY, &FixedClock(14));
        assert!(u.regenerated && u.rotated);
        assert_eq!(p.band(), DayBand::Noon);
        assert_eq!(p.colors()[0].hue, 51.0);
    }

    #[test]
    fn pick_draws_from_current_entries() {
        let mut p = Palette::generate(8);
        p.rotate(90.0);
        let mut rng = seeded_rng(Some(5));
        let mut seen = [false; PALETTE_SIZE];
        for _ in 0..200 {
            let c = p.pick(&mut rng);
            let i = p.colors().iter().position(|e| *e == c).unwrap();
            seen[i] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
