//! Brazier engine crate.
//!
//! Platform + GPU runtime for the duel scene: window loop with a fixed tick
//! cadence, input translation, shader registry, render surface and quad pass.

pub mod core;
pub mod device;
pub mod input;
pub mod time;
pub mod window;

pub mod coords;
pub mod logging;
pub mod paint;
pub mod render;
