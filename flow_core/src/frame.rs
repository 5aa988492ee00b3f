//! Camera frames as RGBA pixel buffers.

/// One decoded video frame: `width × height` pixels, 4 bytes (RGBA) each,
/// row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    width:  usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Frame {
    /// Wrap an RGBA buffer. Returns `None` if the buffer length does not
    /// match `width * height * 4`.
    pub fn from_rgba(width: usize, height: usize, pixels: Vec<u8>) -> Option<Self> {
        if pixels.len() != width * height * 4 {
            return None;
        }
        Some(Frame { width, height, pixels })
    }

    /// A frame filled with a single opaque color.
    pub fn solid(width: usize, height: usize, rgb: [u8; 3]) -> Self {
        let mut pixels = Vec::with_capacity(width * height * 4);
        for _ in 0..width * height {
            pixels.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
        }
        Frame { width, height, pixels }
    }

    pub fn width(&self)  -> usize { self.width }
    pub fn height(&self) -> usize { self.height }
    pub fn pixels(&self) -> &[u8] { &self.pixels }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn same_size(&self, other: &Frame) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// RGB of the pixel at `(x, y)`. Out-of-bounds reads return black.
    pub fn rgb(&self, x: usize, y: usize) -> [u8; 3] {
        if x >= self.width || y >= self.height {
            return [0, 0, 0];
        }
        let i = (y * self.width + x) * 4;
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]]
    }

    /// Overwrite the pixel at `(x, y)`; out-of-bounds writes are ignored.
    pub fn set_rgb(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = (y * self.width + x) * 4;
        self.pixels[i..i + 3].copy_from_slice(&rgb);
        self.pixels[i + 3] = 255;
    }

    /// Copy `other`'s pixels into this frame, reusing the allocation.
    pub fn copy_from(&mut self, other: &Frame) {
        self.width  = other.width;
        self.height = other.height;
        self.pixels.clear();
        self.pixels.extend_from_slice(&other.pixels);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rgba_checks_length() {
        assert!(Frame::from_rgba(2, 2, vec![0; 16]).is_some());
        assert!(Frame::from_rgba(2, 2, vec![0; 15]).is_none());
    }

    #[test]
    fn set_and_read_pixel() {
        let mut f = Frame::solid(4, 3, [10, 20, 30]);
        f.set_rgb(3, 2, [200, 100, 50]);
        assert_eq!(f.rgb(3, 2), [200, 100, 50]);
        assert_eq!(f.rgb(0, 0), [10, 20, 30]);
        assert_eq!(f.rgb(9, 9), [0, 0, 0]);
    }

    #[test]
    fn copy_from_resizes() {
        let mut a = Frame::solid(1, 1, [0, 0, 0]);
        let b = Frame::solid(3, 2, [5, 5, 5]);
        a.copy_from(&b);
        assert_eq!(a, b);
    }
}
