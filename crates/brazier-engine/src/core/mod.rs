//! Core engine-facing contracts.
//!
//! The stable interface between the runtime (platform loop) and the
//! application: one [`App`] strategy object and a context per callback.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, InitCtx, TickCtx, WindowCtx};
