//! Saving rendered frames.

use image::{ImageBuffer, Rgba};
use std::path::Path;

/// Saves tightly packed RGBA pixel data to an image file.
///
/// The format follows the extension: `.png`, `.jpg` or `.jpeg`. JPEG drops
/// the alpha channel.
pub fn save_image(
    path: impl AsRef<Path>,
    data: &[u8],
    width: u32,
    height: u32,
) -> Result<(), ScreenshotError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let img = to_image(data, width, height)?;
    match extension.as_str() {
        "png" => img.save_with_format(path, image::ImageFormat::Png)?,
        "jpg" | "jpeg" => {
            let rgb_img = image::DynamicImage::ImageRgba8(img).to_rgb8();
            rgb_img.save_with_format(path, image::ImageFormat::Jpeg)?;
        }
        _ => return Err(ScreenshotError::UnsupportedFormat(extension)),
    }
    log::info!("saved screenshot to {}", path.display());
    Ok(())
}

/// Encodes tightly packed RGBA pixel data as PNG in memory.
pub fn encode_png(data: &[u8], width: u32, height: u32) -> Result<Vec<u8>, ScreenshotError> {
    let img = to_image(data, width, height)?;
    let mut buffer = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buffer, image::ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

// wgpu uses a top-left origin, so rows are already in image order.
fn to_image(
    data: &[u8],
    width: u32,
    height: u32,
) -> Result<ImageBuffer<Rgba<u8>, Vec<u8>>, ScreenshotError> {
    ImageBuffer::from_raw(width, height, data.to_vec()).ok_or(ScreenshotError::InvalidImageData)
}

/// Error type for screenshot operations.
#[derive(Debug, thiserror::Error)]
pub enum ScreenshotError {
    #[error("Failed to save image: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid image data")]
    InvalidImageData,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(width: u32, height: u32) -> Vec<u8> {
        (0..width * height)
            .flat_map(|i| if i % 2 == 0 { [255, 0, 0, 255] } else { [0, 0, 255, 255] })
            .collect()
    }

    #[test]
    fn test_encode_png_signature() {
        let png = encode_png(&checker(4, 3), 4, 3).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_short_buffer_rejected() {
        let err = encode_png(&[0u8; 10], 4, 3).unwrap_err();
        assert!(matches!(err, ScreenshotError::InvalidImageData));
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let path = std::env::temp_dir().join("mapview_screenshot_test.bmpx");
        let err = save_image(&path, &checker(2, 2), 2, 2).unwrap_err();
        assert!(matches!(err, ScreenshotError::UnsupportedFormat(ext) if ext == "bmpx"));
    }

    #[test]
    fn test_save_png_roundtrip() {
        let path = std::env::temp_dir().join(format!(
            "mapview_screenshot_{}.png",
            std::process::id()
        ));
        save_image(&path, &checker(4, 2), 4, 2).unwrap();
        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded.dimensions(), (4, 2));
        assert_eq!(loaded.get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(loaded.get_pixel(1, 0).0, [0, 0, 255, 255]);
        std::fs::remove_file(&path).unwrap();
    }
}
