//! The main rendering engine.

mod capture;
mod pipelines;
mod rendering;

use std::sync::Arc;

use crate::buffer;
use crate::error::{RenderError, RenderResult};

/// Depth buffer format shared by both pipelines.
pub(crate) const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Color format of headless targets.
pub(crate) const HEADLESS_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Initial size of the per-frame vertex buffer, in bytes.
const INITIAL_VERTEX_BYTES: u64 = 64 * 1024;

/// Number of batch uniform slots allocated up front.
const INITIAL_BATCH_SLOTS: u64 = 16;

/// Per-batch uniforms for GPU.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
#[allow(clippy::pub_underscore_fields)]
pub struct BatchUniforms {
    pub clip_from_local: [[f32; 4]; 4],
    /// Target size in pixels.
    pub viewport: [f32; 2],
    /// Point diameter or line width in pixels.
    pub size: f32,
    pub _padding: f32,
}

impl Default for BatchUniforms {
    fn default() -> Self {
        Self {
            clip_from_local: glam::Mat4::IDENTITY.to_cols_array_2d(),
            viewport: [1.0, 1.0],
            size: 1.0,
            _padding: 0.0,
        }
    }
}

/// The rendering engine backed by wgpu.
pub struct RenderEngine {
    /// The wgpu instance.
    pub instance: wgpu::Instance,
    /// The wgpu adapter.
    pub adapter: wgpu::Adapter,
    /// The wgpu device.
    pub device: wgpu::Device,
    /// The wgpu queue.
    pub queue: wgpu::Queue,
    /// The render surface (None for headless).
    pub surface: Option<wgpu::Surface<'static>>,
    /// Surface configuration. Headless engines keep one too, for the target format.
    pub surface_config: wgpu::SurfaceConfiguration,
    /// Depth texture.
    pub depth_texture: wgpu::Texture,
    /// Depth texture view.
    pub depth_view: wgpu::TextureView,
    /// Current viewport width.
    pub width: u32,
    /// Current viewport height.
    pub height: u32,
    pub(crate) point_pipeline: wgpu::RenderPipeline,
    pub(crate) line_pipeline: wgpu::RenderPipeline,
    pub(crate) batch_bind_group_layout: wgpu::BindGroupLayout,
    /// Batch uniforms, one slot of `uniform_stride` bytes per batch.
    pub(crate) uniform_buffer: wgpu::Buffer,
    pub(crate) uniform_bind_group: wgpu::BindGroup,
    pub(crate) uniform_stride: u64,
    /// Vertices of every batch of the current frame.
    pub(crate) vertex_buffer: wgpu::Buffer,
}

impl RenderEngine {
    /// Creates a new windowed render engine.
    pub async fn new_windowed(window: Arc<winit::window::Window>) -> RenderResult<Self> {
        let instance = Self::create_instance();
        let surface = instance.create_surface(window.clone())?;
        let adapter = Self::request_adapter(&instance, Some(&surface)).await?;

        let (device, queue) = adapter
            .request_device(&Self::device_descriptor(Some("mapview device")))
            .await?;

        let size = window.inner_size();
        let width = size.width.max(1);
        let height = size.height.max(1);

        // Colors are specified in display space, so a non-sRGB target keeps them as given.
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Rgba8Unorm
                )
            })
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(RenderError::SurfaceConfigurationFailed)?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        log::info!(
            "windowed engine on {} ({:?}), surface format {:?}",
            adapter.get_info().name,
            adapter.get_info().backend,
            surface_format
        );

        Ok(Self::from_parts(
            instance,
            adapter,
            device,
            queue,
            Some(surface),
            surface_config,
        ))
    }

    /// Creates a new headless render engine.
    pub async fn new_headless(width: u32, height: u32) -> RenderResult<Self> {
        let instance = Self::create_instance();
        let adapter = Self::request_adapter(&instance, None).await?;

        let (device, queue) = adapter
            .request_device(&Self::device_descriptor(Some("mapview device (headless)")))
            .await?;

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            format: HEADLESS_FORMAT,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        log::debug!(
            "headless engine on {} ({:?}), {}x{}",
            adapter.get_info().name,
            adapter.get_info().backend,
            surface_config.width,
            surface_config.height
        );

        Ok(Self::from_parts(
            instance,
            adapter,
            device,
            queue,
            None,
            surface_config,
        ))
    }

    fn create_instance() -> wgpu::Instance {
        wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..wgpu::InstanceDescriptor::default()
        })
    }

    async fn request_adapter(
        instance: &wgpu::Instance,
        surface: Option<&wgpu::Surface<'static>>,
    ) -> RenderResult<wgpu::Adapter> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: surface,
                force_fallback_adapter: false,
            })
            .await?;
        Ok(adapter)
    }

    fn device_descriptor(label: Option<&str>) -> wgpu::DeviceDescriptor<'_> {
        wgpu::DeviceDescriptor {
            label,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            memory_hints: wgpu::MemoryHints::default(),
            trace: wgpu::Trace::default(),
            experimental_features: wgpu::ExperimentalFeatures::default(),
        }
    }

    fn from_parts(
        instance: wgpu::Instance,
        adapter: wgpu::Adapter,
        device: wgpu::Device,
        queue: wgpu::Queue,
        surface: Option<wgpu::Surface<'static>>,
        surface_config: wgpu::SurfaceConfiguration,
    ) -> Self {
        let width = surface_config.width;
        let height = surface_config.height;
        let (depth_texture, depth_view) = Self::create_depth_texture(&device, width, height);

        let batch_bind_group_layout = pipelines::create_batch_bind_group_layout(&device);
        let point_pipeline =
            pipelines::create_point_pipeline(&device, &batch_bind_group_layout, surface_config.format);
        let line_pipeline =
            pipelines::create_line_pipeline(&device, &batch_bind_group_layout, surface_config.format);

        let uniform_stride = buffer::align_to(
            std::mem::size_of::<BatchUniforms>() as u64,
            u64::from(device.limits().min_uniform_buffer_offset_alignment),
        );
        let uniform_buffer = buffer::create_empty_buffer(
            &device,
            uniform_stride * INITIAL_BATCH_SLOTS,
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            Some("batch uniforms"),
        );
        let uniform_bind_group =
            pipelines::create_batch_bind_group(&device, &batch_bind_group_layout, &uniform_buffer);
        let vertex_buffer = buffer::create_empty_buffer(
            &device,
            INITIAL_VERTEX_BYTES,
            wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            Some("draw list vertices"),
        );

        Self {
            instance,
            adapter,
            device,
            queue,
            surface,
            surface_config,
            depth_texture,
            depth_view,
            width,
            height,
            point_pipeline,
            line_pipeline,
            batch_bind_group_layout,
            uniform_buffer,
            uniform_bind_group,
            uniform_stride,
            vertex_buffer,
        }
    }

    /// Resizes the render target.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.width = width;
        self.height = height;
        self.surface_config.width = width;
        self.surface_config.height = height;

        if let Some(ref surface) = self.surface {
            surface.configure(&self.device, &self.surface_config);
        }

        let (depth_texture, depth_view) = Self::create_depth_texture(&self.device, width, height);
        self.depth_texture = depth_texture;
        self.depth_view = depth_view;
        log::debug!("resized render target to {width}x{height}");
    }

    /// Color format the pipelines render into.
    #[must_use]
    pub fn color_format(&self) -> wgpu::TextureFormat {
        self.surface_config.format
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> (wgpu::Texture, wgpu::TextureView) {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        (texture, view)
    }
}
