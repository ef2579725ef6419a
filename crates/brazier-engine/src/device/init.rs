/// Initialization parameters for the GPU layer.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format when available.
    ///
    /// With `false` a linear (`*Unorm`) format is chosen when the surface
    /// offers one, so shader colors land on screen unconverted.
    pub prefer_srgb: bool,

    /// Present mode (swap behavior). FIFO is supported everywhere.
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference; an unsupported value falls back to the
    /// surface's first supported mode.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub required_features: wgpu::Features,
    pub required_limits: wgpu::Limits,

    /// Hint only; support depends on platform/backend.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}
