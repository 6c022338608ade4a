//! GPU buffer management.

use wgpu::util::DeviceExt;

/// Creates a vertex buffer from data.
pub fn create_vertex_buffer<T: bytemuck::Pod>(
    device: &wgpu::Device,
    data: &[T],
    label: Option<&str>,
) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label,
        contents: bytemuck::cast_slice(data),
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
    })
}

/// Creates an empty buffer of `size` bytes.
pub fn create_empty_buffer(
    device: &wgpu::Device,
    size: u64,
    usage: wgpu::BufferUsages,
    label: Option<&str>,
) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label,
        size,
        usage,
        mapped_at_creation: false,
    })
}

/// Rounds `size` up to a multiple of `alignment`, which must be a power of two.
#[must_use]
pub fn align_to(size: u64, alignment: u64) -> u64 {
    debug_assert!(alignment.is_power_of_two());
    (size + alignment - 1) & !(alignment - 1)
}

/// Grows `buffer` so it holds at least `required` bytes.
///
/// Capacity doubles to amortize reallocation across frames. Returns `true`
/// when a new buffer was created, so bind groups referencing it are stale.
pub fn ensure_capacity(
    device: &wgpu::Device,
    buffer: &mut wgpu::Buffer,
    required: u64,
    usage: wgpu::BufferUsages,
    label: Option<&str>,
) -> bool {
    if buffer.size() >= required {
        return false;
    }
    let size = required.next_power_of_two().max(buffer.size() * 2);
    *buffer = create_empty_buffer(device, size, usage, label);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_to() {
        assert_eq!(align_to(0, 256), 0);
        assert_eq!(align_to(1, 256), 256);
        assert_eq!(align_to(80, 256), 256);
        assert_eq!(align_to(256, 256), 256);
        assert_eq!(align_to(257, 256), 512);
    }
}
