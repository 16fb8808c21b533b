use std::io::Cursor;

use image::{DynamicImage, ImageFormat};

use fragments_core::{FragmentError, SupportedType};

fn format_for(target: SupportedType) -> Option<ImageFormat> {
    match target {
        SupportedType::ImagePng => Some(ImageFormat::Png),
        SupportedType::ImageJpeg => Some(ImageFormat::Jpeg),
        SupportedType::ImageWebp => Some(ImageFormat::WebP),
        SupportedType::ImageGif => Some(ImageFormat::Gif),
        SupportedType::ImageAvif => Some(ImageFormat::Avif),
        _ => None,
    }
}

/// Decode `source` (container sniffed from its magic bytes) and encode it as
/// `target`. JPEG has no alpha channel, so it is flattened to RGB first.
pub(crate) fn reencode(source: &[u8], target: SupportedType) -> Result<Vec<u8>, FragmentError> {
    let format = format_for(target)
        .ok_or_else(|| FragmentError::Conversion(format!("{target} is not an image type")))?;

    let decoded = image::load_from_memory(source)
        .map_err(|e| FragmentError::Conversion(format!("failed to decode image: {e}")))?;

    let prepared = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(decoded.to_rgb8()),
        _ => DynamicImage::ImageRgba8(decoded.to_rgba8()),
    };

    let mut buf = Cursor::new(Vec::new());
    prepared
        .write_to(&mut buf, format)
        .map_err(|e| FragmentError::Conversion(format!("failed to encode {target}: {e}")))?;
    Ok(buf.into_inner())
}
