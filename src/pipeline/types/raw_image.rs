use crate::error::AnalysisError;
use image::{DynamicImage, GrayAlphaImage, GrayImage, RgbImage, RgbaImage};

/// A decoded pixel buffer with explicit geometry, as handed over by whatever
/// acquired the photograph.
///
/// `pixels` is row-major, `channels` interleaved bytes per pixel. Supported
/// layouts are gray (1), gray+alpha (2), RGB (3) and RGBA (4).
#[derive(Debug, Clone, PartialEq)]
pub struct RawImage {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub pixels: Vec<u8>,
}

impl RawImage {
    pub fn new(width: u32, height: u32, channels: u8, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            channels,
            pixels,
        }
    }

    fn expected_len(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(self.channels as usize)
    }

    /// Wrap the buffer in the matching `image` buffer type.
    ///
    /// Zero dimensions are accepted here; the feature extractor is the one
    /// that rejects an empty grid.
    pub fn into_dynamic(self) -> Result<DynamicImage, AnalysisError> {
        let expected = self.expected_len().ok_or_else(|| {
            AnalysisError::InvalidImage(format!(
                "{}x{}x{} overflows the addressable size",
                self.width, self.height, self.channels
            ))
        })?;

        if self.pixels.len() != expected {
            return Err(AnalysisError::InvalidImage(format!(
                "expected {} bytes for {}x{} with {} channels, got {}",
                expected,
                self.width,
                self.height,
                self.channels,
                self.pixels.len()
            )));
        }

        let (width, height) = (self.width, self.height);
        let image = match self.channels {
            1 => GrayImage::from_raw(width, height, self.pixels).map(DynamicImage::ImageLuma8),
            2 => GrayAlphaImage::from_raw(width, height, self.pixels)
                .map(DynamicImage::ImageLumaA8),
            3 => RgbImage::from_raw(width, height, self.pixels).map(DynamicImage::ImageRgb8),
            4 => RgbaImage::from_raw(width, height, self.pixels).map(DynamicImage::ImageRgba8),
            other => {
                return Err(AnalysisError::InvalidImage(format!(
                    "unsupported channel count {}",
                    other
                )))
            }
        };

        image.ok_or_else(|| AnalysisError::InvalidImage("pixel buffer too small".to_string()))
    }
}

impl TryFrom<RawImage> for DynamicImage {
    type Error = AnalysisError;

    fn try_from(raw: RawImage) -> Result<Self, Self::Error> {
        raw.into_dynamic()
    }
}
