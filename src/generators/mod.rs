//! Backends that turn a [`GenerationRequest`] into a [`GenerationOutcome`].

use std::future::Future;

use crate::config::{Config, GenerateMode};
use crate::error::Result;
use crate::models::generation::{GenerationOutcome, GenerationRequest};

pub mod http;
pub mod mock;

pub use http::{HttpGenerator, RequestBody};
pub use mock::MockGenerator;

/// Produces a styled room image for a request.
///
/// `Ok` carries the decoded outcome, including server-side failures. `Err` is
/// reserved for transport problems; callers treat both as a failed request.
pub trait ImageGenerator: Send + Sync {
    fn generate(
        &self,
        request: &GenerationRequest,
    ) -> impl Future<Output = Result<GenerationOutcome>> + Send;
}

/// The generator selected by configuration.
#[derive(Clone, Debug)]
pub enum Generator {
    Http(HttpGenerator),
    Mock(MockGenerator),
}

impl Generator {
    pub fn from_config(config: &Config) -> Result<Self> {
        let generator = match config.generate_mode {
            GenerateMode::Json => Generator::Http(HttpGenerator::new(
                &config.generate_endpoint,
                RequestBody::Json,
                config.request_timeout,
            )?),
            GenerateMode::Multipart => Generator::Http(HttpGenerator::new(
                &config.generate_endpoint,
                RequestBody::Multipart,
                config.request_timeout,
            )?),
            GenerateMode::Mock => Generator::Mock(MockGenerator::new(
                config.mock_delay,
                config.mock_image_url.clone(),
            )),
        };
        tracing::info!("✅ Generator ready: {:?}", config.generate_mode);
        Ok(generator)
    }
}

impl ImageGenerator for Generator {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationOutcome> {
        match self {
            Generator::Http(g) => g.generate(request).await,
            Generator::Mock(g) => g.generate(request).await,
        }
    }
}
