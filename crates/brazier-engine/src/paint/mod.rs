//! Paint model shared between the scene and the quad renderer.
//!
//! Colors are straight (non-premultiplied) RGBA; the quad pipelines blend with
//! `SrcAlpha / OneMinusSrcAlpha`.

pub mod color;

pub use color::Color;
