//! Still-image input: decodes an uploaded image once and serves it as a
//! single endless frame through the same sampler interface video uses.

use std::sync::Arc;

use framecut_core::{FramecutError, Result};
use framecut_timeline::MediaKind;

use crate::source::{FrameSampler, MediaInput, MediaMetadata, VideoSample, VideoTrack};

/// A decoded still image.
#[derive(Clone, Debug)]
pub struct ImageInput {
    width: u32,
    height: u32,
    /// RGBA8 pixels, shared between samplers.
    pixels: Arc<Vec<u8>>,
}

impl ImageInput {
    /// Decode an uploaded image (PNG, JPEG) from its container bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| FramecutError::UnsupportedFormat(format!("image decode: {}", e)))?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self {
            width,
            height,
            pixels: Arc::new(rgba.into_raw()),
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl MediaInput for ImageInput {
    fn metadata(&self) -> MediaMetadata {
        MediaMetadata {
            kind: MediaKind::Image,
            width: self.width,
            height: self.height,
            duration: None,
        }
    }

    fn primary_video(&self) -> Option<Box<dyn VideoTrack>> {
        Some(Box::new(self.clone()))
    }
}

impl VideoTrack for ImageInput {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn duration(&self) -> f64 {
        f64::INFINITY
    }

    fn sampler(&self) -> Result<Box<dyn FrameSampler>> {
        Ok(Box::new(self.clone()))
    }
}

impl FrameSampler for ImageInput {
    fn sample_at(&mut self, _timestamp: f64) -> Result<Option<VideoSample>> {
        Ok(Some(VideoSample {
            data: self.pixels.as_ref().clone(),
            width: self.width,
            height: self.height,
            timestamp: 0.0,
            duration: f64::INFINITY,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_2x1() -> Vec<u8> {
        // Encode a tiny image through the same crate we decode with.
        let img = image::RgbaImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                image::Rgba([255, 0, 0, 255])
            } else {
                image::Rgba([0, 0, 255, 255])
            }
        });
        let mut bytes = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .unwrap();
        bytes
    }

    #[test]
    fn test_decode_and_sample() {
        let input = ImageInput::from_bytes(&png_2x1()).unwrap();
        assert_eq!(input.dimensions(), (2, 1));
        assert_eq!(input.metadata().duration, None);

        let mut sampler = VideoTrack::sampler(&input).unwrap();
        let a = sampler.sample_at(0.0).unwrap().unwrap();
        let b = sampler.sample_at(1e9).unwrap().unwrap();
        assert_eq!(a.data, b.data);
        assert_eq!(&a.data[0..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        let err = ImageInput::from_bytes(&[0, 1, 2, 3]).unwrap_err();
        assert!(matches!(err, FramecutError::UnsupportedFormat(_)));
    }
}
