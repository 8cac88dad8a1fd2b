use crate::{error::Result, store::KeyValueStore};

/// The key the selected style label is stored under.
pub const STYLE_KEY: &str = "selectedStyle";

/// Reads the stored style label, if any.
pub async fn load_style<S: KeyValueStore>(store: &S) -> Result<Option<String>> {
    store.get(STYLE_KEY).await
}

/// Stores `label` as the selected style.
pub async fn save_style<S: KeyValueStore>(store: &S, label: &str) -> Result<()> {
    store.set(STYLE_KEY, label).await
}

/// Forgets the selected style.
pub async fn delete_style<S: KeyValueStore>(store: &S) -> Result<()> {
    store.remove(STYLE_KEY).await
}
