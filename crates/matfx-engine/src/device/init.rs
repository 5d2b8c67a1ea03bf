use anyhow::bail;

/// OpenGL profile requested for the window's context.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum GlProfile {
    Core,
    Compatibility,
}

/// Graphics-context request made when the window is created.
///
/// wgpu's GL backend only drives core-profile contexts of version 3.3 or newer
/// (GLES 3.0 on EGL platforms), which is also the default request.
#[derive(Debug, Clone)]
pub struct ContextRequest {
    /// Backends the wgpu instance may use.
    pub backends: wgpu::Backends,
    pub gl_major: u8,
    pub gl_minor: u8,
    pub gl_profile: GlProfile,
}

impl ContextRequest {
    /// Rejects requests the GL backend cannot satisfy.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.backends.is_empty() {
            bail!("context request enables no graphics backend");
        }

        if self.backends.contains(wgpu::Backends::GL) {
            if (self.gl_major, self.gl_minor) < (3, 3) {
                bail!(
                    "OpenGL {}.{} requested; the GL backend needs 3.3 or newer",
                    self.gl_major,
                    self.gl_minor
                );
            }
            if self.gl_profile != GlProfile::Core {
                bail!("OpenGL compatibility profile requested; only core is supported");
            }
        }

        Ok(())
    }
}

impl Default for ContextRequest {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::GL,
            gl_major: 3,
            gl_minor: 3,
            gl_profile: GlProfile::Core,
        }
    }
}

/// Initialization parameters for the wgpu device.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format when available.
    pub prefer_srgb: bool,

    /// Present mode (swap behavior). FIFO is available everywhere.
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference; falls back to a supported mode.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub power_preference: wgpu::PowerPreference,

    pub required_features: wgpu::Features,

    /// Baseline limits; resolution-dependent limits are raised to the adapter's.
    pub required_limits: wgpu::Limits,

    /// Hint only; support depends on platform/backend.
    pub desired_maximum_frame_latency: u32,

    /// Format backing `PixelFormat::Depth` attachments.
    pub depth_format: wgpu::TextureFormat,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            power_preference: wgpu::PowerPreference::HighPerformance,
            required_features: wgpu::Features::empty(),
            // GL adapters do not reach the default (WebGPU) limits.
            required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
            desired_maximum_frame_latency: 2,
            depth_format: wgpu::TextureFormat::Depth24Plus,
        }
    }
}
