use std::io::Cursor;

use image::{ImageFormat, ImageReader};

/// Allowed image formats for recipe photos.
pub const ALLOWED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

pub const THUMBNAIL_SIZE: u32 = 200;
pub const MAX_THUMBNAIL_SIZE: u32 = 800;

/// A validated upload, ready to hand to the media store.
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub content_type: String,
    pub thumbnail: Vec<u8>,
}

/// Process an image: detect format from magic bytes, validate it's allowed, and generate thumbnail.
pub fn process_image(data: &[u8]) -> Result<ProcessedImage, String> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| format!("Failed to read image: {}", e))?;

    let format = reader
        .format()
        .ok_or_else(|| "Could not detect image format".to_string())?;

    if !ALLOWED_FORMATS.contains(&format) {
        return Err(format!(
            "Unsupported image format: {:?}. Allowed: JPEG, PNG, GIF, WebP",
            format
        ));
    }

    let content_type = format.to_mime_type().to_string();

    let img = reader
        .decode()
        .map_err(|e| format!("Failed to decode image: {}", e))?;

    // thumbnail() preserves aspect ratio, fitting within the given dimensions
    let thumbnail_img = img.thumbnail(THUMBNAIL_SIZE, THUMBNAIL_SIZE);

    let mut thumbnail_buf = Cursor::new(Vec::new());
    thumbnail_img
        .to_rgb8()
        .write_to(&mut thumbnail_buf, ImageFormat::Jpeg)
        .map_err(|e| format!("Failed to encode thumbnail: {}", e))?;

    Ok(ProcessedImage {
        content_type,
        thumbnail: thumbnail_buf.into_inner(),
    })
}

/// Generate a thumbnail at a specific size from raw image data.
/// Returns JPEG bytes.
pub fn generate_thumbnail(data: &[u8], size: u32) -> Result<Vec<u8>, String> {
    let size = size.clamp(1, MAX_THUMBNAIL_SIZE);

    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| format!("Failed to read image: {}", e))?;

    let img = reader
        .decode()
        .map_err(|e| format!("Failed to decode image: {}", e))?;

    let thumbnail_img = img.thumbnail(size, size);

    let mut buf = Cursor::new(Vec::new());
    thumbnail_img
        .to_rgb8()
        .write_to(&mut buf, ImageFormat::Jpeg)
        .map_err(|e| format!("Failed to encode thumbnail: {}", e))?;

    Ok(buf.into_inner())
}

/// Encode a small solid-color PNG, for tests that need a real upload.
#[cfg(test)]
pub fn sample_png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 120, 40]));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)
        .expect("encode sample png");
    buf.into_inner()
}
