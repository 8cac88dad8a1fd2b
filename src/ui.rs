//! The notifications the core sends to whatever renders the page.

use std::sync::{Arc, Mutex};

use crate::error::ValidationError;
use crate::models::session::Session;

/// The label of the generate trigger while idle.
pub const GENERATE_LABEL: &str = "Generate AI Design";
/// The label of the generate trigger while a request is in flight.
pub const GENERATING_LABEL: &str = "Generating...";

/// Receives state changes from the session manager and the generation
/// controller. Every method has a no-op default.
pub trait UiSurface: Send + Sync {
    /// A session became current (sign-in or restore).
    fn on_signed_in(&self, _session: &Session) {}

    /// The session was cleared.
    fn on_signed_out(&self) {}

    /// Generation was triggered without a session.
    fn on_sign_in_required(&self) {}

    /// Generation was triggered with invalid input.
    fn on_validation_failed(&self, _error: &ValidationError) {}

    /// A request went in flight: disable the trigger, show [`GENERATING_LABEL`].
    fn on_generation_started(&self) {}

    fn on_generation_succeeded(&self, _image_url: &str) {}

    fn on_generation_failed(&self, _reason: &str) {}

    /// The in-flight request settled: re-enable the trigger, show
    /// [`GENERATE_LABEL`]. Called exactly once per started request.
    fn on_generation_settled(&self) {}
}

/// Ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSurface;

impl UiSurface for NoopSurface {}

/// Logs every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSurface;

impl UiSurface for TracingSurface {
    fn on_signed_in(&self, session: &Session) {
        tracing::info!("👤 Signed in as {} [{}]", session.email, session.initial());
    }

    fn on_signed_out(&self) {
        tracing::info!("👋 Signed out");
    }

    fn on_sign_in_required(&self) {
        tracing::warn!("🔒 Sign in to generate a design");
    }

    fn on_validation_failed(&self, error: &ValidationError) {
        tracing::warn!("⚠️ {}", error);
    }

    fn on_generation_started(&self) {
        tracing::info!("⏳ {}", GENERATING_LABEL);
    }

    fn on_generation_succeeded(&self, image_url: &str) {
        tracing::info!("🎉 Your AI design is ready: {}", image_url);
    }

    fn on_generation_failed(&self, reason: &str) {
        tracing::error!("❌ Generation failed: {}", reason);
    }

    fn on_generation_settled(&self) {
        tracing::debug!("Trigger reset to {:?}", GENERATE_LABEL);
    }
}

/// A notification captured by [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    SignedIn(String),
    SignedOut,
    SignInRequired,
    ValidationFailed(ValidationError),
    GenerationStarted,
    GenerationSucceeded(String),
    GenerationFailed(String),
    GenerationSettled,
}

/// Keeps every notification in order, for headless embedding and tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    events: Arc<Mutex<Vec<UiEvent>>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, event: UiEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    /// A snapshot of the recorded events.
    pub fn events(&self) -> Vec<UiEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// How many recorded events satisfy `pred`.
    pub fn count(&self, pred: impl Fn(&UiEvent) -> bool) -> usize {
        self.events().iter().filter(|e| pred(e)).count()
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }
}

impl UiSurface for RecordingSurface {
    fn on_signed_in(&self, session: &Session) {
        self.push(UiEvent::SignedIn(session.email.clone()));
    }

    fn on_signed_out(&self) {
        self.push(UiEvent::SignedOut);
    }

    fn on_sign_in_required(&self) {
        self.push(UiEvent::SignInRequired);
    }

    fn on_validation_failed(&self, error: &ValidationError) {
        self.push(UiEvent::ValidationFailed(error.clone()));
    }

    fn on_generation_started(&self) {
        self.push(UiEvent::GenerationStarted);
    }

    fn on_generation_succeeded(&self, image_url: &str) {
        self.push(UiEvent::GenerationSucceeded(image_url.to_string()));
    }

    fn on_generation_failed(&self, reason: &str) {
        self.push(UiEvent::GenerationFailed(reason.to_string()));
    }

    fn on_generation_settled(&self) {
        self.push(UiEvent::GenerationSettled);
    }
}
