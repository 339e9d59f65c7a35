/// GPU setup options.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Pick an sRGB swapchain format when the surface offers one.
    pub prefer_srgb: bool,

    pub present_mode: wgpu::PresentMode,

    /// Falls back to the first supported mode when unsupported.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// A background animation has no use for the discrete GPU.
    pub power_preference: wgpu::PowerPreference,

    pub desired_maximum_frame_latency: u32,

    /// Cleared to before sprites are drawn. Premultiplied linear RGBA.
    pub clear_color: wgpu::Color,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            power_preference: wgpu::PowerPreference::LowPower,
            desired_maximum_frame_latency: 2,
            // slate-950
            clear_color: wgpu::Color { r: 0.0012, g: 0.0024, b: 0.0090, a: 1.0 },
        }
    }
}
