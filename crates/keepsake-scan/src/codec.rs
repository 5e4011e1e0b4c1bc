// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Codec bridge: moves frames in and out of the `image` crate so callers can
// decode captures and encode results. The pipeline itself never touches
// encoded data.

use image::{DynamicImage, ImageFormat, RgbaImage};
use keepsake_core::config::OutputFormat;
use keepsake_core::error::{KeepsakeError, Result};
use keepsake_core::FrameBuffer;
use tracing::{debug, info, instrument};

// -- Conversion ----------------------------------------------------------------

/// Take ownership of an RGBA image's samples.
pub fn from_rgba_image(image: RgbaImage) -> Result<FrameBuffer> {
    let (width, height) = image.dimensions();
    FrameBuffer::new(width, height, image.into_raw())
}

/// Convert any decoded image to an RGBA frame.
pub fn from_dynamic(image: &DynamicImage) -> Result<FrameBuffer> {
    from_rgba_image(image.to_rgba8())
}

/// Copy a frame into an `image::RgbaImage`.
pub fn to_rgba_image(frame: &FrameBuffer) -> Result<RgbaImage> {
    RgbaImage::from_raw(frame.width(), frame.height(), frame.pixels().to_vec()).ok_or_else(|| {
        KeepsakeError::ImageError(format!(
            "frame {}x{} does not fit an RGBA image",
            frame.width(),
            frame.height()
        ))
    })
}

// -- Decoding ------------------------------------------------------------------

/// Decode encoded image bytes (JPEG, PNG, etc.) into a frame.
#[instrument(skip(data), fields(data_len = data.len()))]
pub fn decode(data: &[u8]) -> Result<FrameBuffer> {
    let image = image::load_from_memory(data).map_err(|err| {
        KeepsakeError::ImageError(format!("failed to decode image: {}", err))
    })?;
    debug!(
        width = image.width(),
        height = image.height(),
        "Image decoded from bytes"
    );
    from_dynamic(&image)
}

/// Load an image file into a frame.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn open(path: impl AsRef<std::path::Path>) -> Result<FrameBuffer> {
    let image = image::open(path.as_ref()).map_err(|err| match err {
        image::ImageError::IoError(io) => KeepsakeError::Io(io),
        other => KeepsakeError::ImageError(format!(
            "failed to open {}: {}",
            path.as_ref().display(),
            other
        )),
    })?;
    info!(
        width = image.width(),
        height = image.height(),
        "Image loaded"
    );
    from_dynamic(&image)
}

// -- Encoding ------------------------------------------------------------------

/// Encode a frame. `jpeg_quality` (1-100) applies to JPEG only; JPEG drops
/// the alpha channel.
#[instrument(skip(frame), fields(width = frame.width(), height = frame.height()))]
pub fn encode(frame: &FrameBuffer, format: OutputFormat, jpeg_quality: u8) -> Result<Vec<u8>> {
    let image = DynamicImage::ImageRgba8(to_rgba_image(frame)?);
    let bytes = match format {
        OutputFormat::Png => encode_to_format(&image, ImageFormat::Png)?,
        OutputFormat::Jpeg => {
            let mut buffer = Vec::new();
            let rgb = image.to_rgb8();
            let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
                &mut buffer,
                jpeg_quality.clamp(1, 100),
            );
            rgb.write_with_encoder(encoder).map_err(|err| {
                KeepsakeError::ImageError(format!("JPEG encoding failed: {}", err))
            })?;
            buffer
        }
    };
    debug!(bytes = bytes.len(), ?format, "Frame encoded");
    Ok(bytes)
}

/// Encode a frame and write it to `path`.
pub fn save(
    frame: &FrameBuffer,
    path: impl AsRef<std::path::Path>,
    format: OutputFormat,
    jpeg_quality: u8,
) -> Result<()> {
    let bytes = encode(frame, format, jpeg_quality)?;
    std::fs::write(path.as_ref(), bytes)?;
    info!(path = %path.as_ref().display(), "Image saved");
    Ok(())
}

/// Encode a `DynamicImage` into the specified format, returning the raw bytes.
fn encode_to_format(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    image.write_to(&mut cursor, format).map_err(|err| {
        KeepsakeError::ImageError(format!("image encoding failed: {}", err))
    })?;
    Ok(buffer)
}
