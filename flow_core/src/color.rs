//! HSB colors as used by the palette and the particle strokes.
//!
//! Channels use the ranges the palette is authored in: hue in degrees
//! `[0, 360)`, saturation and brightness in `[0, 100]`, alpha in `[0, 255]`.

/// A hue/saturation/brightness/alpha color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsba {
    pub hue:        f32,
    pub saturation: f32,
    pub brightness: f32,
    pub alpha:      f32,
}

impl Hsba {
    pub const BLACK: Hsba = Hsba { hue: 0.0, saturation: 0.0, brightness: 0.0, alpha: 255.0 };

    pub fn new(hue: f32, saturation: f32, brightness: f32, alpha: f32) -> Self {
        Hsba {
            hue: hue.rem_euclid(360.0),
            saturation: saturation.clamp(0.0, 100.0),
            brightness: brightness.clamp(0.0, 100.0),
            alpha: alpha.clamp(0.0, 255.0),
        }
    }

    /// Fully saturated, full brightness, opaque.
    pub fn vivid(hue: f32) -> Self {
        Hsba::new(hue, 100.0, 100.0, 255.0)
    }

    /// Same color with a different alpha (clamped to `[0, 255]`).
    pub fn with_alpha(self, alpha: f32) -> Self {
        Hsba { alpha: alpha.clamp(0.0, 255.0), ..self }
    }

    /// Shift the hue by `degrees`, wrapping mod 360.
    pub fn rotate_hue(&mut self, degrees: f32) {
        self.hue = (self.hue + degrees).rem_euclid(360.0);
    }

    /// Alpha normalised to `[0, 1]`.
    pub fn opacity(&self) -> f32 {
        self.alpha / 255.0
    }

    /// Convert to 8-bit RGB, ignoring alpha.
    pub fn to_rgb(&self) -> [u8; 3] {
        let s  = self.saturation / 100.0;
        let v  = self.brightness / 100.0;
        let h  = self.hue.rem_euclid(360.0);
        let hi = (h / 60.0) as u32;
        let f  = h / 60.0 - hi as f32;
        let p  = v * (1.0 - s);
        let q  = v * (1.0 - s * f);
        let t  = v * (1.0 - s * (1.0 - f));
        let (r, g, b) = match hi {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };
        let to_byte = |c: f32| (c * 255.0).round().clamp(0.0, 255.0) as u8;
        [to_byte(r), to_byte(g), to_byte(b)]
    }
}
