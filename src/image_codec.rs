//! Pluggable image decoding and encoding.
//!
//! The compressor never touches a rendering surface or any global decoder
//! state. It works through an [`ImageCodec`], so tests (and alternative
//! platforms) can substitute their own pixel handling.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, codecs::jpeg::JpegEncoder, imageops::FilterType};

use crate::error::OcrError;

/// A decoded raster image.
#[derive(Debug)]
pub struct Raster {
    /// Width in pixels.
    pub width: u32,

    /// Height in pixels.
    pub height: u32,

    /// The pixel data itself.
    pub pixels: DynamicImage,
}

impl Raster {
    /// Wrap decoded pixels.
    pub fn new(pixels: DynamicImage) -> Self {
        Self {
            width: pixels.width(),
            height: pixels.height(),
            pixels,
        }
    }
}

/// Interface trait for image codecs.
pub trait ImageCodec: Send + Sync + 'static {
    /// Decode encoded image bytes (PNG, JPEG, etc) into pixels.
    fn decode(&self, bytes: &[u8]) -> Result<Raster, OcrError>;

    /// Scale an image to exactly `width` x `height`.
    fn scale(&self, raster: &Raster, width: u32, height: u32) -> Result<Raster, OcrError>;

    /// Encode pixels as JPEG at `quality` (1-100).
    fn encode_jpeg(&self, raster: &Raster, quality: u8) -> Result<Vec<u8>, OcrError>;
}

/// The default codec, backed by the pure-Rust `image` crate.
#[derive(Debug, Default)]
pub struct RasterCodec;

impl ImageCodec for RasterCodec {
    fn decode(&self, bytes: &[u8]) -> Result<Raster, OcrError> {
        let pixels = image::load_from_memory(bytes)
            .map_err(|err| OcrError::ImageDecode(err.to_string()))?;
        Ok(Raster::new(pixels))
    }

    fn scale(&self, raster: &Raster, width: u32, height: u32) -> Result<Raster, OcrError> {
        if width == 0 || height == 0 {
            return Err(OcrError::ImageProcessing(format!(
                "cannot scale to {width}x{height}"
            )));
        }
        // Triangle filtering is the closest match to what 2D canvas
        // implementations do when drawing an image into a smaller surface.
        let scaled = raster
            .pixels
            .resize_exact(width, height, FilterType::Triangle);
        Ok(Raster::new(scaled))
    }

    fn encode_jpeg(&self, raster: &Raster, quality: u8) -> Result<Vec<u8>, OcrError> {
        // JPEG has no alpha channel, so flatten first.
        let rgb = DynamicImage::ImageRgb8(raster.pixels.to_rgb8());
        let mut bytes = Vec::new();
        let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut bytes), quality);
        rgb.write_with_encoder(encoder)
            .map_err(|err| OcrError::ImageProcessing(err.to_string()))?;
        Ok(bytes)
    }
}

/// Encode pixels as PNG. Used by tests to build fixtures; the recognition
/// path itself only ever encodes JPEG.
pub fn encode_png(pixels: &DynamicImage) -> Result<Vec<u8>, OcrError> {
    let mut bytes = Vec::new();
    pixels
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|err| OcrError::ImageProcessing(err.to_string()))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use image::RgbImage;

    use super::*;

    fn solid_raster(width: u32, height: u32) -> Raster {
        Raster::new(DynamicImage::ImageRgb8(RgbImage::from_pixel(
            width,
            height,
            image::Rgb([200, 40, 40]),
        )))
    }

    #[test]
    fn decode_reports_dimensions() {
        let png = encode_png(&solid_raster(32, 16).pixels).unwrap();
        let raster = RasterCodec.decode(&png).unwrap();
        assert_eq!((raster.width, raster.height), (32, 16));
    }

    #[test]
    fn decode_rejects_garbage() {
        let err = RasterCodec.decode(b"not an image").unwrap_err();
        assert!(matches!(err, OcrError::ImageDecode(_)));
    }

    #[test]
    fn scale_changes_dimensions_exactly() {
        let scaled = RasterCodec.scale(&solid_raster(100, 50), 10, 5).unwrap();
        assert_eq!((scaled.width, scaled.height), (10, 5));
    }

    #[test]
    fn scale_rejects_zero_dimensions() {
        let err = RasterCodec.scale(&solid_raster(10, 10), 0, 5).unwrap_err();
        assert!(matches!(err, OcrError::ImageProcessing(_)));
    }

    #[test]
    fn encode_jpeg_produces_decodable_jpeg() {
        let bytes = RasterCodec.encode_jpeg(&solid_raster(20, 20), 80).unwrap();
        let decoded = RasterCodec.decode(&bytes).unwrap();
        assert_eq!((decoded.width, decoded.height), (20, 20));
    }
}
