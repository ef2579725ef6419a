//! Screen-space geometry shared by the runtime and the render surface.
//!
//! World-space math (positions, matrices) uses `glam` directly; this module
//! only carries the physical viewport the swapchain is configured with.

mod viewport;

pub use viewport::Viewport;
