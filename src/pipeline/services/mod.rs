pub mod classification_service;
pub mod classifier;
pub mod extraction;
pub mod scoring;

pub use classification_service::{ClassificationRequest, ClassificationService};
pub use classifier::{Analysis, MonumentClassifier};
pub use extraction::FeatureExtractor;
pub use scoring::{RuleTable, ScoringEngine};
