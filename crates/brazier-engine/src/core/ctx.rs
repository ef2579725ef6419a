use std::time::Duration;

use winit::window::{Window, WindowId};

use crate::coords::Viewport;
use crate::device::{Gpu, SurfaceErrorAction};
use crate::input::InputState;
use crate::paint::Color;
use crate::render::{RenderCtx, RenderTarget};
use crate::window::RuntimeCtx;

use super::app::AppControl;

/// Window handle and metadata.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

impl<'a> WindowCtx<'a> {
    pub fn set_title(&self, title: &str) {
        self.window.set_title(title);
    }
}

/// Context for [`App::on_init`](super::App::on_init).
pub struct InitCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a Gpu<'w>,
    pub runtime: &'a mut RuntimeCtx,
}

/// Context for [`App::on_tick`](super::App::on_tick).
pub struct TickCtx<'a> {
    pub input: &'a InputState,
    /// Configured tick period (nominal step length).
    pub period: Duration,
    /// 0-based index of this tick since ticks were last started.
    pub index: u64,
    pub runtime: &'a mut RuntimeCtx,
}

/// Per-frame context passed to [`App::on_frame`](super::App::on_frame).
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub input: &'a InputState,
    pub runtime: &'a mut RuntimeCtx,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Clears the surface with `clear`, calls `draw` with a ready [`RenderCtx`] and
    /// [`RenderTarget`], then presents the frame.
    ///
    /// A transient surface error skips the frame; a fatal one returns `Exit`.
    pub fn render<F>(&mut self, clear: Color, draw: F) -> AppControl
    where
        F: FnOnce(&RenderCtx<'_>, &mut RenderTarget<'_>),
    {
        let size = self.gpu.size();
        if size.width == 0 || size.height == 0 {
            return AppControl::Continue;
        }

        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                return match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => AppControl::Exit,
                    SurfaceErrorAction::Reconfigured => {
                        self.runtime.request_redraw();
                        AppControl::Continue
                    }
                    SurfaceErrorAction::SkipFrame => AppControl::Continue,
                };
            }
        };

        // Clear pass; dropped before the encoder is borrowed again.
        {
            let _rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("brazier clear"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }

        let rctx = RenderCtx::new(
            self.gpu.device(),
            self.gpu.queue(),
            self.gpu.surface_format(),
            Viewport::new(size.width, size.height),
        );

        // RenderTarget borrows frame.encoder; dropped before submit() takes frame.
        {
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);
            draw(&rctx, &mut target);
        }

        self.window.window.pre_present_notify();
        self.gpu.submit(frame);

        AppControl::Continue
    }
}
