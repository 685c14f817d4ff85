use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};

use super::orientation::{apply_orientation, read_orientation};
use crate::modules::normalize::model::ImageKind;
use crate::modules::normalize::ports::{EngineError, ImageEngine, Orientation};

/// In-process transform engine backed by the `image` crate.
#[derive(Clone, Copy, Default)]
pub struct ImagingEngine;

impl ImagingEngine {
    fn decode(bytes: &[u8]) -> Result<DynamicImage, EngineError> {
        image::load_from_memory(bytes).map_err(|e| EngineError::Decode(e.to_string()))
    }

    fn encode(img: &DynamicImage, kind: ImageKind) -> Result<Vec<u8>, EngineError> {
        let format = match kind {
            ImageKind::Jpg => ImageFormat::Jpeg,
            ImageKind::Png => ImageFormat::Png,
        };
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, format)
            .map_err(|e| EngineError::Decode(e.to_string()))?;
        Ok(out.into_inner())
    }
}

impl ImageEngine for ImagingEngine {
    fn orientation(&self, bytes: &[u8]) -> Result<Option<Orientation>, EngineError> {
        Ok(read_orientation(bytes))
    }

    fn auto_orient(&self, bytes: &[u8], kind: ImageKind) -> Result<Vec<u8>, EngineError> {
        let img = Self::decode(bytes)?;
        let orientation = read_orientation(bytes).unwrap_or(Orientation::Normal);
        let img = apply_orientation(img, orientation);
        Self::encode(&img, kind)
    }

    fn crop_resize(
        &self,
        bytes: &[u8],
        width: u32,
        height: u32,
        kind: ImageKind,
    ) -> Result<Vec<u8>, EngineError> {
        let img = Self::decode(bytes)?;
        // Cover-crop: scale to fully cover the target box, center-crop the
        // excess.
        let img = img.resize_to_fill(width, height, FilterType::Lanczos3);
        Self::encode(&img, kind)
    }

    fn dimensions(&self, bytes: &[u8]) -> Result<(u32, u32), EngineError> {
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| EngineError::Decode(e.to_string()))?;
        reader
            .into_dimensions()
            .map_err(|e| EngineError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::new_rgb8(width, height);
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn crop_resize_produces_exact_square() {
        let engine = ImagingEngine;
        let input = png_bytes(640, 480);
        let out = engine.crop_resize(&input, 300, 300, ImageKind::Png).unwrap();
        assert_eq!(engine.dimensions(&out).unwrap(), (300, 300));
    }

    #[test]
    fn dimensions_reports_pixel_size() {
        let engine = ImagingEngine;
        let input = png_bytes(123, 45);
        assert_eq!(engine.dimensions(&input).unwrap(), (123, 45));
    }

    #[test]
    fn auto_orient_without_exif_is_identity_on_size() {
        let engine = ImagingEngine;
        let input = png_bytes(60, 40);
        let out = engine.auto_orient(&input, ImageKind::Png).unwrap();
        assert_eq!(engine.dimensions(&out).unwrap(), (60, 40));
    }

    #[test]
    fn garbage_bytes_fail_with_decode_error() {
        let engine = ImagingEngine;
        let err = engine.dimensions(b"not an image").unwrap_err();
        assert!(matches!(err, EngineError::Decode(_)));
    }
}
