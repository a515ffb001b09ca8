use crate::error::AnalysisError;
use crate::pipeline::types::FeatureVector;
use image::{DynamicImage, RgbImage};
use tracing::debug;

/// Guards the dominance ratios against an all-black image.
pub const DOMINANCE_EPSILON: f64 = 0.001;

/// Turns a decoded photograph into a [`FeatureVector`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureExtractor;

impl FeatureExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Alpha is dropped and gray images are replicated into three channels
    /// before any statistic is taken.
    pub fn extract(&self, image: &DynamicImage) -> Result<FeatureVector, AnalysisError> {
        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 {
            return Err(AnalysisError::InvalidImage(format!(
                "image has no pixels ({}x{})",
                width, height
            )));
        }

        let rgb = image.to_rgb8();
        let features = self.extract_rgb(&rgb);

        debug!(
            "Extracted features from {}x{} image: brightness={:.2}, contrast={:.2}, edge_density={:.2}",
            width, height, features.brightness, features.contrast, features.edge_density
        );

        Ok(features)
    }

    fn extract_rgb(&self, image: &RgbImage) -> FeatureVector {
        let (width, height) = image.dimensions();
        let pixel_count = (width as f64) * (height as f64);

        let mut sums = [0.0f64; 3];
        let mut luma = Vec::with_capacity(width as usize * height as usize);
        for pixel in image.pixels() {
            let [r, g, b] = pixel.0;
            sums[0] += r as f64;
            sums[1] += g as f64;
            sums[2] += b as f64;
            luma.push(self.rgb_to_luma(r, g, b));
        }

        let avg_r = sums[0] / pixel_count;
        let avg_g = sums[1] / pixel_count;
        let avg_b = sums[2] / pixel_count;

        let brightness = luma.iter().sum::<f64>() / pixel_count;
        let texture_variance = luma
            .iter()
            .map(|v| (v - brightness) * (v - brightness))
            .sum::<f64>()
            / pixel_count;
        let contrast = texture_variance.sqrt();

        let channel_mean = (avg_r + avg_g + avg_b) / 3.0;
        let denominator = channel_mean + DOMINANCE_EPSILON;

        FeatureVector {
            avg_r,
            avg_g,
            avg_b,
            brightness,
            contrast,
            aspect_ratio: height as f64 / width as f64,
            edge_density: self.edge_density(&luma, width as usize, height as usize),
            texture_variance,
            r_dominance: avg_r / denominator,
            g_dominance: avg_g / denominator,
            b_dominance: avg_b / denominator,
        }
    }

    fn rgb_to_luma(&self, r: u8, g: u8, b: u8) -> f64 {
        // ITU-R BT.601 luma
        0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64
    }

    /// Mean of the average horizontal and average vertical neighbour
    /// difference. A difference map with no entries averages to zero.
    fn edge_density(&self, luma: &[f64], width: usize, height: usize) -> f64 {
        let mut horizontal = 0.0;
        for row in luma.chunks_exact(width) {
            for pair in row.windows(2) {
                horizontal += (pair[1] - pair[0]).abs();
            }
        }

        let mut vertical = 0.0;
        for y in 1..height {
            let above = &luma[(y - 1) * width..y * width];
            let current = &luma[y * width..(y + 1) * width];
            for (a, c) in above.iter().zip(current) {
                vertical += (c - a).abs();
            }
        }

        let horizontal_mean = mean_or_zero(horizontal, height * (width - 1));
        let vertical_mean = mean_or_zero(vertical, (height - 1) * width);

        (horizontal_mean + vertical_mean) / 2.0
    }
}

fn mean_or_zero(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Luma, LumaA, Rgb, Rgba};

    fn solid(width: u32, height: u32, color: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgb8(ImageBuffer::<Rgb<u8>, Vec<u8>>::from_pixel(
            width,
            height,
            Rgb(color),
        ))
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn white_image_is_bright_and_flat() {
        let features = FeatureExtractor::new().extract(&solid(8, 8, [255, 255, 255])).unwrap();

        assert_close(features.brightness, 255.0);
        assert_close(features.contrast, 0.0);
        assert_close(features.texture_variance, 0.0);
        assert_close(features.edge_density, 0.0);
        assert_close(features.avg_r, 255.0);
        assert_close(features.aspect_ratio, 1.0);
        assert!((features.r_dominance - 1.0).abs() < 1e-5);
    }

    #[test]
    fn black_image_has_zero_dominance() {
        let features = FeatureExtractor::new().extract(&solid(4, 2, [0, 0, 0])).unwrap();

        assert_eq!(features.r_dominance, 0.0);
        assert_eq!(features.g_dominance, 0.0);
        assert_eq!(features.b_dominance, 0.0);
        assert_close(features.aspect_ratio, 0.5);
    }

    #[test]
    fn luma_uses_bt601_weights() {
        let features = FeatureExtractor::new().extract(&solid(3, 3, [100, 50, 200])).unwrap();
        assert_close(features.brightness, 0.299 * 100.0 + 0.587 * 50.0 + 0.114 * 200.0);

        let mean = (100.0 + 50.0 + 200.0) / 3.0;
        assert_close(features.r_dominance, 100.0 / (mean + DOMINANCE_EPSILON));
        assert_close(features.b_dominance, 200.0 / (mean + DOMINANCE_EPSILON));
    }

    #[test]
    fn single_pixel_has_no_edges() {
        let features = FeatureExtractor::new().extract(&solid(1, 1, [12, 200, 40])).unwrap();
        assert_eq!(features.edge_density, 0.0);
        assert_eq!(features.contrast, 0.0);
        assert_close(features.aspect_ratio, 1.0);
    }

    #[test]
    fn vertical_stripes_only_produce_horizontal_edges() {
        // Columns alternate black/white: every horizontal step changes by 255,
        // no vertical step changes at all.
        let image = ImageBuffer::from_fn(4, 3, |x, _| {
            if x % 2 == 0 {
                Luma([0u8])
            } else {
                Luma([255u8])
            }
        });
        let features = FeatureExtractor::new()
            .extract(&DynamicImage::ImageLuma8(image))
            .unwrap();

        assert_close(features.edge_density, 255.0 / 2.0);
        assert_close(features.brightness, 127.5);
        assert_close(features.contrast, 127.5);
        assert_close(features.texture_variance, 127.5 * 127.5);
    }

    #[test]
    fn single_column_uses_only_vertical_edges() {
        let image = ImageBuffer::from_fn(1, 3, |_, y| Luma([(y * 10) as u8]));
        let features = FeatureExtractor::new()
            .extract(&DynamicImage::ImageLuma8(image))
            .unwrap();

        // Horizontal map is empty (0); vertical map averages to 10.
        assert!((features.edge_density - 5.0).abs() < 1e-6);
        assert_close(features.aspect_ratio, 3.0);
    }

    #[test]
    fn alpha_channel_is_ignored() {
        let opaque = solid(2, 2, [30, 60, 90]);
        let translucent = DynamicImage::ImageRgba8(ImageBuffer::from_pixel(
            2,
            2,
            Rgba([30u8, 60, 90, 7]),
        ));

        let extractor = FeatureExtractor::new();
        assert_eq!(
            extractor.extract(&opaque).unwrap(),
            extractor.extract(&translucent).unwrap()
        );
    }

    #[test]
    fn gray_alpha_matches_replicated_rgb() {
        let gray = DynamicImage::ImageLumaA8(ImageBuffer::from_pixel(3, 2, LumaA([90u8, 0])));
        let rgb = solid(3, 2, [90, 90, 90]);

        let extractor = FeatureExtractor::new();
        assert_eq!(extractor.extract(&gray).unwrap(), extractor.extract(&rgb).unwrap());
    }

    #[test]
    fn empty_image_is_invalid() {
        let extractor = FeatureExtractor::new();
        for (width, height) in [(0, 0), (0, 5), (5, 0)] {
            let image = DynamicImage::ImageRgb8(RgbImage::new(width, height));
            assert!(matches!(
                extractor.extract(&image),
                Err(AnalysisError::InvalidImage(_))
            ));
        }
    }
}
