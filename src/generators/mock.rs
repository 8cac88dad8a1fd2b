use std::time::Duration;

use crate::error::Result;
use crate::generators::ImageGenerator;
use crate::models::generation::{GenerationOutcome, GenerationRequest};

/// Resolves every request with a fixed image after a delay, without any
/// network traffic.
#[derive(Clone, Debug)]
pub struct MockGenerator {
    delay: Duration,
    image_url: String,
}

impl MockGenerator {
    pub fn new(delay: Duration, image_url: impl Into<String>) -> Self {
        Self {
            delay,
            image_url: image_url.into(),
        }
    }
}

impl ImageGenerator for MockGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationOutcome> {
        tracing::debug!(request_id = %request.id, "Mock generation, waiting {:?}", self.delay);
        tokio::time::sleep(self.delay).await;
        Ok(GenerationOutcome::Success {
            image_url: self.image_url.clone(),
        })
    }
}
