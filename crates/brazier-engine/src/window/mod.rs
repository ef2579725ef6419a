//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the window, wires them to the GPU layer and
//! drives the app's fixed tick cadence.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
