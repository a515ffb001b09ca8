use super::classifier::MonumentClassifier;
use crate::error::AnalysisError;
use crate::pipeline::types::DetectionReport;
use futures::future::{ready, Ready};
use image::DynamicImage;
use std::{
    sync::Arc,
    task::{Context, Poll},
};
use tower::Service;

/// A photograph plus the confidence threshold the caller wants applied.
#[derive(Debug, Clone)]
pub struct ClassificationRequest {
    pub image: Arc<DynamicImage>,
    pub threshold: f64,
}

impl ClassificationRequest {
    pub fn new(image: DynamicImage, threshold: f64) -> Self {
        Self {
            image: Arc::new(image),
            threshold,
        }
    }
}

/// Exposes a [`MonumentClassifier`] as a tower service. Always ready; the
/// response future is already resolved when returned.
#[derive(Debug, Clone, Default)]
pub struct ClassificationService {
    classifier: Arc<MonumentClassifier>,
}

impl ClassificationService {
    pub fn new(classifier: MonumentClassifier) -> Self {
        Self {
            classifier: Arc::new(classifier),
        }
    }
}

impl Service<ClassificationRequest> for ClassificationService {
    type Response = DetectionReport;
    type Error = AnalysisError;
    type Future = Ready<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), AnalysisError>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: ClassificationRequest) -> Self::Future {
        ready(self.classifier.detect(&request.image, request.threshold))
    }
}
