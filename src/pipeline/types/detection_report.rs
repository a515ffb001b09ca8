use super::{ClassificationResult, MonumentClass};
use crate::error::AnalysisError;
use serde::Serialize;
use std::time::Instant;

/// A classification filtered through a confidence threshold.
///
/// The unfiltered result is kept alongside so a caller can show every score
/// even when nothing clears the threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionReport {
    pub threshold: f64,
    /// The predicted class, present only when its score reaches the threshold.
    pub detected: Option<MonumentClass>,
    /// Every class at or above the threshold, highest score first.
    pub reported: Vec<(MonumentClass, f64)>,
    pub result: ClassificationResult,
    /// Wall-clock time spent producing the report; zero unless timed.
    pub processing_time_us: u64,
}

impl DetectionReport {
    pub fn new(result: ClassificationResult, threshold: f64) -> Result<Self, AnalysisError> {
        validate_threshold(threshold)?;

        let detected = (result.confidence >= threshold).then_some(result.predicted);
        let reported = result.scores.at_or_above(threshold);

        Ok(Self {
            threshold,
            detected,
            reported,
            result,
            processing_time_us: 0,
        })
    }

    pub fn with_timing(mut self, start_time: Instant) -> Self {
        self.processing_time_us = start_time.elapsed().as_micros() as u64;
        self
    }

    pub fn is_detection(&self) -> bool {
        self.detected.is_some()
    }

    pub fn is_reported(&self, class: MonumentClass) -> bool {
        self.reported.iter().any(|(reported, _)| *reported == class)
    }
}

pub fn validate_threshold(threshold: f64) -> Result<(), AnalysisError> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(())
    } else {
        Err(AnalysisError::InvalidThreshold(threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::ScoreMap;

    fn result(values: [f64; 5]) -> ClassificationResult {
        ClassificationResult::from_scores(ScoreMap::from_fn(|class| values[class.index()]))
    }

    #[test]
    fn prediction_above_threshold_is_detected() {
        let report = DetectionReport::new(result([0.1, 0.8, 0.55, 0.0, 0.2]), 0.5).unwrap();
        assert_eq!(report.detected, Some(MonumentClass::TajMahal));
        assert_eq!(
            report.reported,
            vec![(MonumentClass::TajMahal, 0.8), (MonumentClass::HawaMahal, 0.55)]
        );
        assert!(report.is_reported(MonumentClass::HawaMahal));
        assert!(!report.is_reported(MonumentClass::Gateway));
    }

    #[test]
    fn prediction_below_threshold_keeps_full_scores() {
        let report = DetectionReport::new(result([0.1, 0.3, 0.2, 0.0, 0.2]), 0.5).unwrap();
        assert!(!report.is_detection());
        assert!(report.reported.is_empty());
        assert_eq!(report.result.scores.len(), 5);
        assert_eq!(report.result.predicted, MonumentClass::TajMahal);
    }

    #[test]
    fn score_equal_to_threshold_counts() {
        let report = DetectionReport::new(result([0.5, 0.0, 0.0, 0.0, 0.0]), 0.5).unwrap();
        assert_eq!(report.detected, Some(MonumentClass::Gateway));
    }

    #[test]
    fn higher_threshold_reports_a_subset() {
        let base = result([0.35, 0.6, 0.25, 0.9, 0.45]);
        let thresholds = [0.0, 0.05, 0.25, 0.3, 0.45, 0.5, 0.6, 0.9, 0.95, 1.0];
        for pair in thresholds.windows(2) {
            let low = DetectionReport::new(base.clone(), pair[0]).unwrap();
            let high = DetectionReport::new(base.clone(), pair[1]).unwrap();
            for (class, _) in &high.reported {
                assert!(low.is_reported(*class), "{class} missing at {}", pair[0]);
            }
        }
    }

    #[test]
    fn timing_is_opt_in() {
        let start = Instant::now();
        let report = DetectionReport::new(result([0.2; 5]), 0.1).unwrap();
        assert_eq!(report.processing_time_us, 0);

        std::thread::sleep(std::time::Duration::from_millis(2));
        let report = report.with_timing(start);
        assert!(report.processing_time_us >= 2_000);
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        for threshold in [-0.1, 1.01, f64::NAN] {
            assert!(matches!(
                DetectionReport::new(result([0.0; 5]), threshold),
                Err(AnalysisError::InvalidThreshold(_))
            ));
        }
    }
}
