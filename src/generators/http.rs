use std::time::Duration;

use reqwest::multipart::{Form, Part};

use crate::error::{AppError, Result};
use crate::generators::ImageGenerator;
use crate::models::generation::{GeneratePromptBody, GenerationOutcome, GenerationRequest};

/// How the request body is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestBody {
    /// `{"prompt": "..."}`; the image and style are not sent.
    Json,
    /// Multipart fields `image`, `prompt` and, when selected, `style`.
    Multipart,
}

/// Posts generation requests to an HTTP endpoint.
#[derive(Clone, Debug)]
pub struct HttpGenerator {
    client: reqwest::Client,
    endpoint: String,
    body: RequestBody,
}

impl HttpGenerator {
    /// Creates a generator for `endpoint`.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - The URL requests are posted to.
    /// * `body` - The body encoding.
    /// * `timeout` - Upper bound for a whole request, `None` for no limit.
    pub fn new(endpoint: &str, body: RequestBody, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AppError::Internal(format!("HTTP client build failed: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            body,
        })
    }

    fn multipart_form(request: &GenerationRequest) -> Result<Form> {
        let extension = request
            .image_mime
            .strip_prefix("image/")
            .unwrap_or("bin");

        let image = Part::bytes(request.image_data.clone())
            .file_name(format!("room.{}", extension))
            .mime_str(&request.image_mime)?;

        let mut form = Form::new()
            .part("image", image)
            .text("prompt", request.prompt_text.clone());

        if let Some(style) = &request.style_label {
            form = form.text("style", style.clone());
        }

        Ok(form)
    }
}

impl ImageGenerator for HttpGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationOutcome> {
        tracing::debug!(
            request_id = %request.id,
            "📤 POST {} ({:?}, {} image bytes)",
            self.endpoint,
            self.body,
            request.image_data.len()
        );

        let builder = self
            .client
            .post(&self.endpoint)
            .header("x-request-id", request.id.to_string());

        let builder = match self.body {
            RequestBody::Json => {
                let body = sonic_rs::to_string(&GeneratePromptBody {
                    prompt: &request.prompt_text,
                })?;
                builder
                    .header(reqwest::header::CONTENT_TYPE, "application/json")
                    .body(body)
            }
            RequestBody::Multipart => builder.multipart(Self::multipart_form(request)?),
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        tracing::debug!(request_id = %request.id, "📥 {} ({} bytes)", status, body.len());
        Ok(GenerationOutcome::from_response(status, &body))
    }
}
