use crate::input::{InputEvent, InputState};

use super::ctx::{FrameCtx, InitCtx, TickCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by the host.
///
/// Callback order: `on_init` once after the GPU is ready, then any mix of
/// `on_resize`, `on_input`, `on_tick` (fixed cadence, only while ticks are
/// started) and `on_frame` (only when a redraw was requested).
pub trait App {
    /// GPU-dependent setup: shaders, textures, pipelines.
    ///
    /// An error aborts the runtime before the first tick.
    fn on_init(&mut self, ctx: &mut InitCtx<'_, '_>) -> anyhow::Result<()>;

    /// Drawable size changed (physical pixels). Also called once right after `on_init`.
    fn on_resize(&mut self, width: u32, height: u32) {
        let _ = (width, height);
    }

    /// A translated input event; `input` already reflects it.
    fn on_input(&mut self, event: &InputEvent, input: &InputState) -> AppControl {
        let _ = (event, input);
        AppControl::Continue
    }

    /// One fixed simulation step.
    fn on_tick(&mut self, ctx: &mut TickCtx<'_>) -> AppControl {
        let _ = ctx;
        AppControl::Continue
    }

    /// Draws one frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
