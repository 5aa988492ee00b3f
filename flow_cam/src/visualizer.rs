//! The `minifb` window the framebuffer is presented in.

use minifb::{Key, KeyRepeat, Window, WindowOptions};

use crate::canvas::Framebuffer;

pub struct Visualizer {
    window: Window,
}

impl Visualizer {
    pub fn new(width: usize, height: usize) -> Result<Self, String> {
        let mut window = Window::new(
            "Flow Cam: motion-reactive flow field",
            width, height,
            WindowOptions {
                resize: true,
                ..WindowOptions::default()
            },
        ).map_err(|e| e.to_string())?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        Ok(Visualizer { window })
    }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Current client-area size in pixels.
    pub fn size(&self) -> (usize, usize) { self.window.get_size() }

    /// Poll keyboard input. Returns false when the user asked to quit.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() { return false; }
        let quit = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);
        !(quit(Key::Escape) || quit(Key::Q))
    }

    /// Show the framebuffer's contents.
    pub fn present(&mut self, canvas: &Framebuffer) -> Result<(), String> {
        self.window
            .update_with_buffer(canvas.pixels(), canvas.width(), canvas.height())
            .map_err(|e| e.to_string())
    }
}
