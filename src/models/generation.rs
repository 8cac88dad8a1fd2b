use serde::Serialize;
use sonic_rs::{JsonValueTrait, Value};
use uuid::Uuid;

use crate::error::ValidationError;

/// What the UI holds at the moment the generate trigger fires.
#[derive(Debug, Clone, Default)]
pub struct GenerationInput {
    /// The attached room photo, if any.
    pub image: Option<Vec<u8>>,
    /// The prompt text as typed.
    pub prompt: String,
}

impl GenerationInput {
    pub fn new(image: Option<Vec<u8>>, prompt: impl Into<String>) -> Self {
        Self {
            image,
            prompt: prompt.into(),
        }
    }
}

/// One validated generation attempt. Never persisted.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Correlates log lines and the `x-request-id` header.
    pub id: Uuid,
    /// The room photo bytes.
    pub image_data: Vec<u8>,
    /// The sniffed mime type of `image_data`, always `image/*`.
    pub image_mime: String,
    /// The trimmed, non-empty prompt.
    pub prompt_text: String,
    /// The style selected before the trigger, if any.
    pub style_label: Option<String>,
}

/// The field of a generation response that carries the image URL.
pub const IMAGE_URL_FIELD: &str = "imageUrl";

/// The JSON body of a JSON-mode generation request.
#[derive(Debug, Serialize)]
pub struct GeneratePromptBody<'a> {
    pub prompt: &'a str,
}

/// The result of one generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Success { image_url: String },
    Failure { reason: String },
}

impl GenerationOutcome {
    /// Decodes an HTTP response into an outcome.
    ///
    /// A non-2xx status, a body that is not JSON, and a missing or empty
    /// `imageUrl` all decode to `Failure`.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        if !(200..300).contains(&status) {
            return GenerationOutcome::Failure {
                reason: format!("server responded with status {}", status),
            };
        }

        let body = match sonic_rs::from_slice::<Value>(body) {
            Ok(body) if body.is_object() => body,
            Ok(_) => {
                return GenerationOutcome::Failure {
                    reason: "malformed response: body is not a JSON object".to_string(),
                };
            }
            Err(e) => {
                return GenerationOutcome::Failure {
                    reason: format!("malformed response: {}", e),
                };
            }
        };

        match body.get(IMAGE_URL_FIELD).and_then(|url| url.as_str()) {
            Some(url) if !url.trim().is_empty() => GenerationOutcome::Success {
                image_url: url.to_string(),
            },
            _ => GenerationOutcome::Failure {
                reason: "no image returned".to_string(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, GenerationOutcome::Success { .. })
    }
}

/// The states of the generation controller.
///
/// `Validating`, `Succeeded` and `Failed` are passed through inside a single
/// step and are only visible in logs; callers observe `Idle` or `InFlight`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Validating,
    InFlight,
    Succeeded,
    Failed,
}

/// What a single trigger of the generate action did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerResult {
    /// No session is current; the user has to sign in first.
    SignInRequired,
    /// An input precondition failed; nothing was sent.
    Rejected(ValidationError),
    /// A request was already in flight; the trigger was ignored.
    Busy,
    /// The request settled with this outcome.
    Completed(GenerationOutcome),
    /// The request was cancelled before it settled.
    Cancelled,
}
