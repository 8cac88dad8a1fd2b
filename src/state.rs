use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::{
    config::Config,
    error::Result,
    generators::{Generator, ImageGenerator},
    models::{
        generation::{GenerationInput, TriggerResult},
        session::Session,
    },
    services::{generation::GenerationController, session::SessionManager, style::StylePicker},
    store::{KeyValueStore, Store},
    ui::UiSurface,
};

/// The application's state.
///
/// Built once at startup and passed by reference to whatever handles user
/// actions; dropping it discards the in-memory state while the persisted
/// copies survive.
pub struct AppContext<S = Store, G = Generator> {
    /// The application's configuration.
    pub config: Config,
    /// The signed-in state.
    pub sessions: SessionManager<S>,
    /// The selected design style.
    pub styles: StylePicker<S>,
    /// The generate action.
    pub generation: GenerationController<G>,
    /// Cancelled on shutdown; in-flight requests hang off it.
    pub shutdown: CancellationToken,
}

impl AppContext {
    /// Creates a new `AppContext` with the store and generator named by
    /// `config`.
    pub async fn new(config: &Config, ui: Arc<dyn UiSurface>) -> Result<Self> {
        let store = Store::open(config).await?;
        let generator = Generator::from_config(config)?;
        Ok(Self::with_parts(config.clone(), store, generator, ui))
    }
}

impl<S, G> AppContext<S, G>
where
    S: KeyValueStore + Clone,
    G: ImageGenerator,
{
    /// Assembles a context from explicit parts.
    pub fn with_parts(config: Config, store: S, generator: G, ui: Arc<dyn UiSurface>) -> Self {
        let shutdown = CancellationToken::new();

        let sessions = SessionManager::new(store.clone(), config.session_key.clone(), ui.clone());
        let styles = StylePicker::new(store);
        let generation =
            GenerationController::new(generator, ui, shutdown.clone(), config.request_timeout);
        tracing::debug!("AppContext assembled");

        Self {
            config,
            sessions,
            styles,
            generation,
            shutdown,
        }
    }

    /// Restores the persisted session and style selection.
    pub async fn restore(&self) -> Option<Session> {
        let style = self.styles.restore().await;
        if let Some(style) = &style {
            tracing::debug!("Restored style: {}", style);
        }
        self.sessions.restore().await
    }

    /// Handles a press of the generate trigger with the current session and
    /// selected style.
    pub async fn generate(&self, input: &GenerationInput) -> TriggerResult {
        let session = self.sessions.current().await;
        let style = self.styles.selected().await;
        self.generation.trigger(session.as_ref(), input, style).await
    }

    /// Cancels any in-flight request; later requests end as cancelled.
    pub fn shutdown(&self) {
        tracing::info!("🛑 Shutting down");
        self.shutdown.cancel();
    }
}
