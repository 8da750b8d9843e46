//! Library exports for the rastermark editing engine.
//!
//! Hosts drive [`input::InputState`] with pointer and key events, render the
//! composited frame from [`editor::Editor`] and hand export snapshots to an
//! [`export::ExportManager`]. The `rastermark` binary uses the same pieces to
//! flatten annotation JSON onto an image from the command line.

pub mod config;
pub mod draw;
pub mod editor;
pub mod export;
pub mod history;
pub mod input;
pub mod raster;
pub mod util;

pub use config::Config;
