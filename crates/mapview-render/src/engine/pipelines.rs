//! Pipeline creation for point and line batches.

use std::num::NonZeroU64;

use super::{BatchUniforms, DEPTH_FORMAT};
use crate::draw_list::Vertex;

const BATCH_UNIFORM_SIZE: u64 = std::mem::size_of::<BatchUniforms>() as u64;

/// Layout of group 0: one batch uniform slot selected with a dynamic offset.
pub(super) fn create_batch_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("batch bind group layout"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: true,
                min_binding_size: NonZeroU64::new(BATCH_UNIFORM_SIZE),
            },
            count: None,
        }],
    })
}

/// Binds the first slot of `buffer`; draws select their slot by offset.
pub(super) fn create_batch_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("batch bind group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer,
                offset: 0,
                size: NonZeroU64::new(BATCH_UNIFORM_SIZE),
            }),
        }],
    })
}

const POINT_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x4];

// Two consecutive vertices form one segment instance.
const LINE_ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
    0 => Float32x3,
    1 => Float32x4,
    2 => Float32x3,
    3 => Float32x4,
];

pub(super) const POINT_STRIDE: u64 = std::mem::size_of::<Vertex>() as u64;
pub(super) const LINE_STRIDE: u64 = 2 * POINT_STRIDE;

/// Creates the round point sprite pipeline.
pub(super) fn create_point_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("point sprite shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/point_sprite.wgsl").into()),
    });
    create_quad_pipeline(
        device,
        layout,
        format,
        &shader,
        "point sprite pipeline",
        wgpu::VertexBufferLayout {
            array_stride: POINT_STRIDE,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &POINT_ATTRIBUTES,
        },
    )
}

/// Creates the screen-space line pipeline.
pub(super) fn create_line_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("line quad shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/line_quad.wgsl").into()),
    });
    create_quad_pipeline(
        device,
        layout,
        format,
        &shader,
        "line quad pipeline",
        wgpu::VertexBufferLayout {
            array_stride: LINE_STRIDE,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &LINE_ATTRIBUTES,
        },
    )
}

fn create_quad_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    format: wgpu::TextureFormat,
    shader: &wgpu::ShaderModule,
    label: &str,
    instance_layout: wgpu::VertexBufferLayout<'_>,
) -> wgpu::RenderPipeline {
    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: &[layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[instance_layout],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None, // Quads flip with the segment direction
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_attributes_cover_two_vertices() {
        assert_eq!(POINT_STRIDE, 28);
        assert_eq!(LINE_STRIDE, 56);
        assert_eq!(LINE_ATTRIBUTES[2].offset, POINT_STRIDE);
        assert_eq!(LINE_ATTRIBUTES[3].offset, POINT_STRIDE + 12);
    }
}
