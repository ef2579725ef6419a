//! GPU device + surface management.
//!
//! - creates the wgpu Adapter/Device/Queue for a window
//! - creates & configures the Surface (swapchain)
//! - acquires frames and hands out an encoder + view per frame

mod context;
mod error;
mod frame;
mod init;
mod surface;

pub use context::Gpu;
pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use init::GpuInit;
