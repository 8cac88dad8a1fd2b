use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::{
    error::{AppError, GENERIC_FAILURE_MESSAGE},
    generators::ImageGenerator,
    models::{
        generation::{
            ControllerState, GenerationInput, GenerationOutcome, GenerationRequest, TriggerResult,
        },
        session::Session,
    },
    ui::UiSurface,
    validation::generation::build_request,
};

/// The failure reason reported when a request is cancelled.
pub const CANCELLED_REASON: &str = "cancelled";

struct Inner {
    state: ControllerState,
    cancel: Option<CancellationToken>,
}

/// Drives the generate action: validates input, keeps at most one request in
/// flight, and reports how it ended.
pub struct GenerationController<G> {
    generator: G,
    ui: Arc<dyn UiSurface>,
    inner: Mutex<Inner>,
    shutdown: CancellationToken,
    timeout: Option<Duration>,
}

/// Returns the controller to `Idle` when dropped. Runs once per in-flight
/// request whether it settled, was cancelled, or its future was dropped.
struct InFlightGuard<'a, G> {
    controller: &'a GenerationController<G>,
}

impl<G> Drop for InFlightGuard<'_, G> {
    fn drop(&mut self) {
        {
            let mut inner = self.controller.lock();
            inner.state = ControllerState::Idle;
            inner.cancel = None;
        }
        self.controller.ui.on_generation_settled();
    }
}

impl<G> GenerationController<G> {
    /// Creates an idle controller.
    ///
    /// # Arguments
    ///
    /// * `generator` - The backend requests are sent to.
    /// * `ui` - Receives started/succeeded/failed/settled notifications.
    /// * `shutdown` - Cancelling it cancels any in-flight request.
    /// * `timeout` - Upper bound for one request; `None` waits for ever.
    pub fn new(
        generator: G,
        ui: Arc<dyn UiSurface>,
        shutdown: CancellationToken,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            generator,
            ui,
            inner: Mutex::new(Inner {
                state: ControllerState::Idle,
                cancel: None,
            }),
            shutdown,
            timeout,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> ControllerState {
        self.lock().state
    }

    pub fn is_busy(&self) -> bool {
        self.state() == ControllerState::InFlight
    }

    /// Cancels the in-flight request. Returns `false` when idle.
    pub fn cancel(&self) -> bool {
        match &self.lock().cancel {
            Some(token) => {
                tracing::info!("🛑 Cancelling in-flight generation");
                token.cancel();
                true
            }
            None => false,
        }
    }
}

impl<G: ImageGenerator> GenerationController<G> {
    /// Handles one press of the generate trigger.
    ///
    /// Ignored while a request is in flight. Otherwise checks, in order, that
    /// a session is current, an image is attached and the prompt is not
    /// blank, then sends the request and waits for it to settle.
    pub async fn trigger(
        &self,
        session: Option<&Session>,
        input: &GenerationInput,
        style_label: Option<String>,
    ) -> TriggerResult {
        let (request, cancel) = {
            let mut inner = self.lock();
            if inner.state == ControllerState::InFlight {
                tracing::debug!("Generate trigger ignored, a request is in flight");
                return TriggerResult::Busy;
            }
            inner.state = ControllerState::Validating;

            if session.is_none() {
                inner.state = ControllerState::Idle;
                drop(inner);
                tracing::info!("🔒 Generate trigger without a session");
                self.ui.on_sign_in_required();
                return TriggerResult::SignInRequired;
            }

            let request = match build_request(input, style_label) {
                Ok(request) => request,
                Err(e) => {
                    inner.state = ControllerState::Idle;
                    drop(inner);
                    tracing::debug!("Generate trigger rejected: {}", e);
                    self.ui.on_validation_failed(&e);
                    return TriggerResult::Rejected(e);
                }
            };

            let cancel = self.shutdown.child_token();
            inner.state = ControllerState::InFlight;
            inner.cancel = Some(cancel.clone());
            (request, cancel)
        };

        let _guard = InFlightGuard { controller: self };
        tracing::info!(
            request_id = %request.id,
            style = request.style_label.as_deref().unwrap_or("-"),
            "🚀 Generation started"
        );
        self.ui.on_generation_started();

        let settled = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            outcome = self.send(&request) => Some(outcome),
        };

        match settled {
            None => {
                self.lock().state = ControllerState::Failed;
                tracing::warn!(request_id = %request.id, "Generation cancelled");
                self.ui.on_generation_failed(CANCELLED_REASON);
                TriggerResult::Cancelled
            }
            Some(GenerationOutcome::Success { image_url }) => {
                self.lock().state = ControllerState::Succeeded;
                tracing::info!(request_id = %request.id, "✅ Generation succeeded: {}", image_url);
                self.ui.on_generation_succeeded(&image_url);
                TriggerResult::Completed(GenerationOutcome::Success { image_url })
            }
            Some(GenerationOutcome::Failure { reason }) => {
                self.lock().state = ControllerState::Failed;
                tracing::error!(request_id = %request.id, "❌ Generation failed: {}", reason);
                self.ui.on_generation_failed(GENERIC_FAILURE_MESSAGE);
                TriggerResult::Completed(GenerationOutcome::Failure { reason })
            }
        }
    }

    /// Sends `request`, folding transport errors and timeouts into `Failure`.
    ///
    /// The failure reason keeps the details for logs and the caller; the UI
    /// only ever sees [`GENERIC_FAILURE_MESSAGE`].
    async fn send(&self, request: &GenerationRequest) -> GenerationOutcome {
        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.generator.generate(request))
                .await
                .unwrap_or_else(|_| {
                    Err(AppError::Network(format!("request timed out after {:?}", limit)))
                }),
            None => self.generator.generate(request).await,
        };

        result.unwrap_or_else(|e| GenerationOutcome::Failure {
            reason: e.to_string(),
        })
    }
}
