use super::extraction::FeatureExtractor;
use super::scoring::{RuleTable, ScoringEngine};
use crate::error::AnalysisError;
use crate::pipeline::types::{
    validate_threshold, ClassificationResult, DetectionReport, FeatureVector, RawImage,
};
use image::DynamicImage;
use serde::Serialize;
use std::time::Instant;
use tracing::{info, warn};

/// Features and classification of one photograph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub features: FeatureVector,
    pub result: ClassificationResult,
    pub processing_time_us: u64,
}

/// Runs feature extraction followed by rule scoring.
///
/// Holds no per-call state, so one instance can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct MonumentClassifier {
    extractor: FeatureExtractor,
    engine: ScoringEngine,
}

impl MonumentClassifier {
    pub fn new(engine: ScoringEngine) -> Self {
        Self {
            extractor: FeatureExtractor::new(),
            engine,
        }
    }

    pub fn with_rules(table: RuleTable) -> Result<Self, AnalysisError> {
        Ok(Self::new(ScoringEngine::new(table)?))
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    pub fn analyze(&self, image: &DynamicImage) -> Result<Analysis, AnalysisError> {
        let start = Instant::now();

        let features = self.extractor.extract(image)?;
        let result = self.engine.classify(&features);
        let processing_time_us = start.elapsed().as_micros() as u64;

        info!(
            "Classified {}x{} image as {} ({:.2}) in {}us",
            image.width(),
            image.height(),
            result.predicted,
            result.confidence,
            processing_time_us
        );

        Ok(Analysis {
            features,
            result,
            processing_time_us,
        })
    }

    pub fn classify(&self, image: &DynamicImage) -> Result<ClassificationResult, AnalysisError> {
        self.analyze(image).map(|analysis| analysis.result)
    }

    pub fn classify_raw(&self, raw: RawImage) -> Result<ClassificationResult, AnalysisError> {
        self.classify(&raw.into_dynamic()?)
    }

    /// Classify and filter through `threshold`. The threshold is checked
    /// before any pixel is read.
    pub fn detect(
        &self,
        image: &DynamicImage,
        threshold: f64,
    ) -> Result<DetectionReport, AnalysisError> {
        validate_threshold(threshold)?;

        let start = Instant::now();
        let report = DetectionReport::new(self.classify(image)?, threshold)?.with_timing(start);
        if !report.is_detection() {
            warn!(
                "Best match {} ({:.2}) is below threshold {:.2}",
                report.result.predicted, report.result.confidence, threshold
            );
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::MonumentClass;
    use image::{ImageBuffer, Rgb, RgbImage};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn solid(width: u32, height: u32, color: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgb8(ImageBuffer::from_pixel(width, height, Rgb(color)))
    }

    fn random_image(rng: &mut StdRng) -> DynamicImage {
        let width = rng.random_range(1..=24);
        let height = rng.random_range(1..=24);
        let image = RgbImage::from_fn(width, height, |_, _| {
            Rgb([rng.random::<u8>(), rng.random::<u8>(), rng.random::<u8>()])
        });
        DynamicImage::ImageRgb8(image)
    }

    #[test]
    fn white_image_is_the_taj_mahal() {
        let analysis = MonumentClassifier::default()
            .analyze(&solid(16, 16, [255, 255, 255]))
            .unwrap();

        assert!((analysis.features.brightness - 255.0).abs() < 1e-6);
        assert!(analysis.features.contrast.abs() < 1e-6);
        assert_eq!(analysis.result.predicted, MonumentClass::TajMahal);
        let taj = analysis.result.scores.get(MonumentClass::TajMahal);
        for (_, score) in analysis.result.scores.iter() {
            assert!(taj >= score);
        }
    }

    #[test]
    fn single_pixel_yields_a_complete_score_map() {
        let result = MonumentClassifier::default()
            .classify(&solid(1, 1, [90, 60, 30]))
            .unwrap();

        assert_eq!(result.scores.len(), MonumentClass::ALL.len());
        for (_, score) in result.scores.iter() {
            assert!((0.0..=1.0).contains(&score));
        }
    }

    #[test]
    fn empty_image_is_rejected_without_scores() {
        let classifier = MonumentClassifier::default();
        let empty = DynamicImage::ImageRgb8(RgbImage::new(0, 10));
        assert!(matches!(
            classifier.classify(&empty),
            Err(AnalysisError::InvalidImage(_))
        ));
        assert!(matches!(
            classifier.detect(&empty, 0.5),
            Err(AnalysisError::InvalidImage(_))
        ));
    }

    #[test]
    fn raw_rgba_buffer_classifies_like_rgb() {
        let classifier = MonumentClassifier::default();
        let rgba = RawImage::new(2, 3, 4, [200u8, 80, 40, 128].repeat(6));
        let rgb = RawImage::new(2, 3, 3, [200u8, 80, 40].repeat(6));

        assert_eq!(
            classifier.classify_raw(rgba).unwrap(),
            classifier.classify_raw(rgb).unwrap()
        );
    }

    #[test]
    fn random_images_respect_score_invariants() {
        let classifier = MonumentClassifier::default();
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for _ in 0..64 {
            let image = random_image(&mut rng);
            let first = classifier.analyze(&image).unwrap();
            let second = classifier.analyze(&image).unwrap();

            // bit-identical on repeat
            assert_eq!(first.features, second.features);
            assert_eq!(first.result, second.result);

            let result = &first.result;
            assert_eq!(result.confidence, result.scores.get(result.predicted));
            for (class, score) in result.scores.iter() {
                assert!((0.0..=1.0).contains(&score));
                assert!(score <= result.confidence);
                if score == result.confidence {
                    assert!(result.predicted.index() <= class.index());
                }
            }
        }
    }

    #[test]
    fn detect_applies_the_threshold() {
        let classifier = MonumentClassifier::default();
        let white = solid(4, 4, [255, 255, 255]);

        let report = classifier.detect(&white, 0.5).unwrap();
        assert_eq!(report.detected, Some(MonumentClass::TajMahal));

        let report = classifier.detect(&white, 1.0).unwrap();
        assert_eq!(report.result.predicted, MonumentClass::TajMahal);

        assert!(matches!(
            classifier.detect(&white, 1.5),
            Err(AnalysisError::InvalidThreshold(_))
        ));
    }
}
