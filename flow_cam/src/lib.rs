//! # flow_cam
//!
//! Windowed front end for [`flow_core`]: camera frames arrive on a capture
//! thread, the simulation renders into a software framebuffer, and `minifb`
//! presents it.
//!
//! ## Threads
//!
//! | Thread | Work |
//! |---|---|
//! | capture | produces [`flow_core::Frame`]s at the camera's cadence |
//! | main | polls the newest frame, runs one simulation frame, presents |
//!
//! The main loop never blocks on the camera. Until the first frame arrives
//! (or after the source stops) the simulation runs with no motion and the
//! field keeps drifting on noise alone.
//!
//! ## Keys
//!
//! | Key | Action |
//! |---|---|
//! | `Escape` | Quit |
//! | `Q` | Quit |
//!
//! Resizing the window resizes the canvas and rebuilds the flow field.

pub mod app;
pub mod canvas;
pub mod capture;
pub mod visualizer;
