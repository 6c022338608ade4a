//! Offscreen rendering and pixel readback.

use super::RenderEngine;
use crate::draw_list::DrawList;
use crate::error::{RenderError, RenderResult};

/// Bytes per row with the padding wgpu requires for texture-to-buffer copies.
pub(crate) fn aligned_bytes_per_row(width: u32) -> u32 {
    let unaligned = width * 4;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unaligned.div_ceil(align) * align
}

/// Drops row padding and converts BGRA rows to RGBA.
pub(crate) fn unpad_rows(
    data: &[u8],
    width: u32,
    height: u32,
    padded_bytes_per_row: u32,
    swap_red_blue: bool,
) -> Vec<u8> {
    let row_bytes = (width * 4) as usize;
    let mut result = Vec::with_capacity(row_bytes * height as usize);
    for row in 0..height as usize {
        let start = row * padded_bytes_per_row as usize;
        result.extend_from_slice(&data[start..start + row_bytes]);
    }
    if swap_red_blue {
        for pixel in result.chunks_exact_mut(4) {
            pixel.swap(0, 2);
        }
    }
    result
}

impl RenderEngine {
    /// Renders a draw list into an offscreen texture and reads it back as
    /// tightly packed RGBA8 rows, top row first.
    pub fn capture(&mut self, list: &DrawList) -> RenderResult<Vec<u8>> {
        let (width, height) = (self.width, self.height);
        let format = self.color_format();
        let swap = match format {
            wgpu::TextureFormat::Rgba8Unorm | wgpu::TextureFormat::Rgba8UnormSrgb => false,
            wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb => true,
            other => {
                return Err(RenderError::ReadbackFailed(format!(
                    "unsupported capture format {other:?}"
                )))
            }
        };

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("capture texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let bytes_per_row = aligned_bytes_per_row(width);
        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("capture readback buffer"),
            size: u64::from(bytes_per_row) * u64::from(height),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("capture encoder"),
            });
        self.encode_draw_list(&mut encoder, &view, list);
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(bytes_per_row),
                    rows_per_image: Some(height),
                },
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        self.queue.submit(std::iter::once(encoder.finish()));

        let buffer_slice = buffer.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            // The receiver only goes away if this function already returned.
            let _ = tx.send(result);
        });
        let _ = self.device.poll(wgpu::PollType::wait_indefinitely());
        rx.recv()
            .map_err(|e| RenderError::ReadbackFailed(e.to_string()))?
            .map_err(|e| RenderError::ReadbackFailed(e.to_string()))?;

        let data = buffer_slice.get_mapped_range();
        let pixels = unpad_rows(&data, width, height, bytes_per_row, swap);
        drop(data);
        buffer.unmap();

        log::debug!("captured {width}x{height} frame");
        Ok(pixels)
    }
}
