use std::path::PathBuf;
use thiserror::Error;

// Main Application Error Type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Analysis Error: {0}")]
    Analysis(#[from] AnalysisError),
    #[error("Configuration Error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Failed to decode image {1}: {0}")]
    Decode(image::ImageError, PathBuf),
    #[error("Invalid settings: {0}")]
    Settings(String),
}

// Classification Error Type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Invalid image: {0}")]
    InvalidImage(String),
    #[error("Confidence threshold {0} is outside [0, 1]")]
    InvalidThreshold(f64),
    #[error("Invalid rule table: {0}")]
    InvalidRuleTable(String),
    #[error("Invalid scores: {0}")]
    InvalidScores(String),
}
