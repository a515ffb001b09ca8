pub mod feature_extractor;

pub use feature_extractor::{FeatureExtractor, DOMINANCE_EPSILON};
