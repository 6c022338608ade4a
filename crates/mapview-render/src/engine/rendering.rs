//! Draw list upload and render pass recording.

use super::pipelines::{self, LINE_STRIDE, POINT_STRIDE};
use super::{BatchUniforms, RenderEngine};
use crate::buffer;
use crate::draw_list::{DrawList, Primitive, Vertex};
use crate::error::{RenderError, RenderResult};

/// Where one batch landed in the frame buffers.
#[derive(Debug, Clone, Copy)]
struct BatchSlot {
    primitive: Primitive,
    uniform_offset: u32,
    vertex_offset: u64,
    vertex_bytes: u64,
    instances: u32,
}

impl RenderEngine {
    /// Renders a draw list to the window surface and presents it.
    pub fn render(&mut self, list: &DrawList) -> RenderResult<()> {
        let output = self.acquire_frame()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render encoder"),
            });
        self.encode_draw_list(&mut encoder, &view, list);
        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    /// Acquires the next surface texture.
    ///
    /// A lost or outdated surface is reconfigured before the error is
    /// returned, so the caller can skip the frame and try again.
    pub fn acquire_frame(&mut self) -> RenderResult<wgpu::SurfaceTexture> {
        let surface = self.surface.as_ref().ok_or(RenderError::NoSurface)?;
        match surface.get_current_texture() {
            Ok(output) => Ok(output),
            Err(err) => {
                if matches!(
                    err,
                    wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated
                ) {
                    self.resize(self.width, self.height);
                }
                Err(err.into())
            }
        }
    }

    /// Uploads a draw list and records a render pass that clears `view` and
    /// draws every batch into it.
    pub fn encode_draw_list(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        list: &DrawList,
    ) {
        let slots = self.upload(list);

        let clear = wgpu::Color {
            r: f64::from(list.clear_color.x),
            g: f64::from(list.clear_color.y),
            b: f64::from(list.clear_color.z),
            a: 1.0,
        };

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("draw list pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            ..Default::default()
        });

        for slot in &slots {
            let pipeline = match slot.primitive {
                Primitive::Points => &self.point_pipeline,
                Primitive::Lines => &self.line_pipeline,
            };
            render_pass.set_pipeline(pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[slot.uniform_offset]);
            render_pass.set_vertex_buffer(
                0,
                self.vertex_buffer
                    .slice(slot.vertex_offset..slot.vertex_offset + slot.vertex_bytes),
            );
            render_pass.draw(0..6, 0..slot.instances);
        }
    }

    /// Writes the uniforms and vertices of every non-empty batch, growing the
    /// frame buffers when needed.
    fn upload(&mut self, list: &DrawList) -> Vec<BatchSlot> {
        let viewport = [self.width as f32, self.height as f32];
        let mut uniforms: Vec<u8> = Vec::new();
        let mut vertices: Vec<Vertex> = Vec::new();
        let mut slots = Vec::with_capacity(list.batches.len());

        for batch in list.batches.iter().filter(|b| !b.is_empty()) {
            let instances = batch.element_count();
            let (used, stride) = match batch.primitive {
                Primitive::Points => (instances, POINT_STRIDE),
                Primitive::Lines => (instances * 2, LINE_STRIDE),
            };

            let uniform_offset = uniforms.len() as u64;
            let batch_uniforms = BatchUniforms {
                clip_from_local: batch.clip_from_local().to_cols_array_2d(),
                viewport,
                size: batch.size,
                _padding: 0.0,
            };
            uniforms.extend_from_slice(bytemuck::bytes_of(&batch_uniforms));
            uniforms.resize((uniform_offset + self.uniform_stride) as usize, 0);

            let vertex_offset = (vertices.len() * std::mem::size_of::<Vertex>()) as u64;
            vertices.extend_from_slice(&batch.vertices[..used]);

            slots.push(BatchSlot {
                primitive: batch.primitive,
                uniform_offset: uniform_offset as u32,
                vertex_offset,
                vertex_bytes: instances as u64 * stride,
                instances: instances as u32,
            });
        }

        if slots.is_empty() {
            return slots;
        }

        let vertex_bytes: &[u8] = bytemuck::cast_slice(&vertices);
        buffer::ensure_capacity(
            &self.device,
            &mut self.vertex_buffer,
            vertex_bytes.len() as u64,
            wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            Some("draw list vertices"),
        );
        let uniforms_grew = buffer::ensure_capacity(
            &self.device,
            &mut self.uniform_buffer,
            uniforms.len() as u64,
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            Some("batch uniforms"),
        );
        if uniforms_grew {
            self.uniform_bind_group = pipelines::create_batch_bind_group(
                &self.device,
                &self.batch_bind_group_layout,
                &self.uniform_buffer,
            );
        }

        self.queue.write_buffer(&self.vertex_buffer, 0, vertex_bytes);
        self.queue.write_buffer(&self.uniform_buffer, 0, &uniforms);
        log::trace!(
            "uploaded {} batches, {} vertices",
            slots.len(),
            vertices.len()
        );
        slots
    }
}
