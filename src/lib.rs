pub mod catalog;
pub mod config;
pub mod error;
pub mod pipeline;

pub use catalog::{MonumentCatalog, MonumentInfo};
pub use crate::config::Settings;
pub use error::{AnalysisError, AppError};
pub use pipeline::{
    ClassificationResult, ClassificationService, DetectionReport, FeatureExtractor, FeatureVector,
    MonumentClass, MonumentClassifier, RawImage, RuleTable, ScoreMap, ScoringEngine,
};
