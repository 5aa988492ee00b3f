//! Camera capture: frames delivered from their own thread.
//!
//! The public interface is [`Frame`]s delivered over an `mpsc` channel at
//! whatever cadence the source runs. The render loop never waits on it: it
//! keeps the most recent frame in a [`LatestFrame`] and samples motion from
//! that, even if it is the same frame as last time.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use flow_core::Frame;

// ════════════════════════════════════════════════════════════════════════════
// FrameSource trait: unified interface for capture back-ends
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver camera [`Frame`]s over a channel.
pub trait FrameSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<Frame>);
}

/// Spawn a frame source on its own thread and return the receiving end.
pub fn spawn_frame_source<S: FrameSource>(source: S) -> Receiver<Frame> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// SyntheticCamera: a moving blob, for running without a capture device
// ════════════════════════════════════════════════════════════════════════════

/// Renders a bright blob drifting on a Lissajous path over a dim gradient.
///
/// The blob alternates between [`MOVE_TICKS`] ticks of movement and
/// [`REST_TICKS`] ticks standing still, so the visual cycles between motion
/// bursts and the ambient trickle.
pub struct SyntheticCamera {
    pub width:  usize,
    pub height: usize,
    pub fps:    u32,
    /// Stop after this many frames; `None` runs until the receiver hangs up.
    pub limit:  Option<u64>,
}

pub const MOVE_TICKS: u64 = 90;
pub const REST_TICKS: u64 = 60;
const BLOB_RADIUS: f32 = 22.0;

impl SyntheticCamera {
    pub fn new(width: usize, height: usize, fps: u32) -> Self {
        SyntheticCamera { width, height, fps: fps.max(1), limit: None }
    }

    /// The blob's centre at `tick`. Frozen during rest phases.
    pub fn blob_centre(&self, tick: u64) -> (f32, f32) {
        let cycle = MOVE_TICKS + REST_TICKS;
        let moving = (tick / cycle) * MOVE_TICKS + (tick % cycle).min(MOVE_TICKS);
        let t = moving as f32 / self.fps as f32;
        let (w, h) = (self.width as f32, self.height as f32);
        let x = w * 0.5 + w * 0.35 * (t * 1.3).sin();
        let y = h * 0.5 + h * 0.30 * (t * 0.9 + 0.7).sin();
        (x, y)
    }

    /// Render frame number `tick`.
    pub fn frame_at(&self, tick: u64) -> Frame {
        let (cx, cy) = self.blob_centre(tick);
        let mut pixels = Vec::with_capacity(self.width * self.height * 4);
        for y in 0..self.height {
            for x in 0..self.width {
                let dx = x as f32 - cx;
                let dy = y as f32 - cy;
                if dx * dx + dy * dy <= BLOB_RADIUS * BLOB_RADIUS {
                    pixels.extend_from_slice(&[240, 230, 210, 255]);
                } else {
                    let shade = (20 + 30 * y / self.height.max(1)) as u8;
                    pixels.extend_from_slice(&[shade, shade, shade + 10, 255]);
                }
            }
        }
        Frame::from_rgba(self.width, self.height, pixels)
            .unwrap_or_else(|| Frame::solid(self.width, self.height, [0, 0, 0]))
    }
}

impl FrameSource for SyntheticCamera {
    fn run(self: Box<Self>, tx: Sender<Frame>) {
        let period = Duration::from_secs_f64(1.0 / self.fps as f64);
        log::info!("synthetic camera {}x{} @ {} fps", self.width, self.height, self.fps);
        let mut tick = 0u64;
        loop {
            if self.limit.is_some_and(|n| tick >= n) {
                return;
            }
            if tx.send(self.frame_at(tick)).is_err() {
                log::debug!("frame receiver dropped; synthetic camera stopping");
                return;
            }
            tick += 1;
            thread::sleep(period);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LatestFrame: what the render loop samples from
// ════════════════════════════════════════════════════════════════════════════

/// Channel state after a [`LatestFrame::poll`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureStatus {
    /// No frame has arrived yet.
    Waiting,
    Live,
    /// The source has stopped; the last frame (if any) is kept.
    Disconnected,
}

/// Holds the most recent frame delivered by a capture source.
#[derive(Debug, Default)]
pub struct LatestFrame {
    frame:     Option<Frame>,
    received:  u64,
    hung_up:   bool,
}

impl LatestFrame {
    pub fn frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }

    /// Total frames received so far.
    pub fn received(&self) -> u64 {
        self.received
    }

    /// Drain everything queued on `rx`, keeping only the newest frame.
    pub fn poll(&mut self, rx: &Receiver<Frame>) -> CaptureStatus {
        loop {
            match rx.try_recv() {
                Ok(frame) => {
                    if self.received == 0 {
                        log::info!("camera ready: {}x{}", frame.width(), frame.height());
                    }
                    self.received += 1;
                    self.frame = Some(frame);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.hung_up {
                        log::warn!("camera source disconnected after {} frames", self.received);
                        self.hung_up = true;
                    }
                    return CaptureStatus::Disconnected;
                }
            }
        }
        if self.frame.is_some() { CaptureStatus::Live } else { CaptureStatus::Waiting }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_frames_have_requested_size() {
        let cam = SyntheticCamera::new(64, 48, 30);
        let f = cam.frame_at(0);
        assert_eq!((f.width(), f.height()), (64, 48));
        assert_eq!(f.pixels().len(), 64 * 48 * 4);
    }

    #[test]
    fn blob_moves_then_rests() {
        let cam = SyntheticCamera::new(320, 240, 30);
        assert_ne!(cam.blob_centre(10), cam.blob_centre(11));
        let rest = MOVE_TICKS + 5;
        assert_eq!(cam.blob_centre(rest), cam.blob_centre(rest + 1));
    }

    #[test]
    fn blob_pixel_is_bright() {
        let cam = SyntheticCamera::new(320, 240, 30);
        let (cx, cy) = cam.blob_centre(3);
        let f = cam.frame_at(3);
        assert_eq!(f.rgb(cx as usize, cy as usize), [240, 230, 210]);
    }

    #[test]
    fn latest_frame_keeps_newest() {
        let (tx, rx) = mpsc::channel();
        let mut latest = LatestFrame::default();
        assert_eq!(latest.poll(&rx), CaptureStatus::Waiting);

        tx.send(Frame::solid(2, 2, [1, 1, 1])).unwrap();
        tx.send(Frame::solid(2, 2, [9, 9, 9])).unwrap();
        assert_eq!(latest.poll(&rx), CaptureStatus::Live);
        assert_eq!(latest.received(), 2);
        assert_eq!(latest.frame().unwrap().rgb(0, 0), [9, 9, 9]);

        drop(tx);
        assert_eq!(latest.poll(&rx), CaptureStatus::Disconnected);
        assert!(latest.frame().is_some());
    }

    #[test]
    fn spawned_source_delivers_and_stops() {
        let cam = SyntheticCamera { limit: Some(3), ..SyntheticCamera::new(8, 8, 200) };
        let rx = spawn_frame_source(cam);
        let frames: Vec<Frame> = rx.iter().collect();
        assert_eq!(frames.len(), 3);
    }
}
