pub mod services;
pub mod types;

pub use services::{
    Analysis, ClassificationRequest, ClassificationService, FeatureExtractor, MonumentClassifier,
    RuleTable, ScoringEngine,
};
pub use types::{
    ClassificationResult, DetectionReport, Feature, FeatureVector, MonumentClass, RawImage,
    ScoreMap,
};
