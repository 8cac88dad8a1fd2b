use tokio::sync::RwLock;

use crate::{
    error::Result,
    repositories::style as style_repo,
    store::KeyValueStore,
    validation::style::{STYLE_CATALOG, validate_style},
};

/// Tracks the selected design style and persists it.
pub struct StylePicker<S> {
    store: S,
    selected: RwLock<Option<String>>,
}

impl<S: KeyValueStore> StylePicker<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            selected: RwLock::new(None),
        }
    }

    /// The styles that can be selected.
    pub fn catalog(&self) -> &'static [&'static str] {
        &STYLE_CATALOG
    }

    /// Loads the persisted selection. Labels no longer in the catalog are
    /// removed.
    pub async fn restore(&self) -> Option<String> {
        let mut selected = self.selected.write().await;

        let stored = match style_repo::load_style(&self.store).await {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!("❌ Could not read selected style: {}", e);
                return None;
            }
        };

        *selected = match stored.as_deref().map(validate_style) {
            Some(Ok(style)) => Some(style.to_string()),
            Some(Err(e)) => {
                tracing::warn!("🧹 Dropping stored style: {}", e);
                if let Err(e) = style_repo::delete_style(&self.store).await {
                    tracing::error!("❌ Failed to delete stored style: {}", e);
                }
                None
            }
            None => None,
        };

        selected.clone()
    }

    /// Selects and persists a catalog style.
    pub async fn select(&self, label: &str) -> Result<String> {
        let style = validate_style(label)?;

        let mut selected = self.selected.write().await;
        style_repo::save_style(&self.store, style).await?;
        *selected = Some(style.to_string());

        tracing::info!("🎨 Selected style: {}", style);
        Ok(style.to_string())
    }

    /// Forgets the selection.
    pub async fn clear(&self) -> Result<()> {
        let mut selected = self.selected.write().await;
        style_repo::delete_style(&self.store).await?;
        *selected = None;
        Ok(())
    }

    pub async fn selected(&self) -> Option<String> {
        self.selected.read().await.clone()
    }
}

/// The prompt text suggested after picking `style`.
pub fn prompt_hint(style: &str) -> String {
    format!("You selected the {} style for your room", style)
}
