mod classification;
mod detection_report;
mod feature_vector;
mod monument;
mod raw_image;

pub use classification::{ClassificationResult, ScoreMap};
pub use detection_report::{validate_threshold, DetectionReport};
pub use feature_vector::{Feature, FeatureVector};
pub use monument::MonumentClass;
pub use raw_image::RawImage;
