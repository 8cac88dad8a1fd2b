use std::sync::Arc;

use garde::Validate;
use tokio::sync::RwLock;

use crate::{
    crypto::token,
    error::{AppError, Result},
    models::session::Session,
    repositories::session::{self as session_repo, StoredSession},
    store::KeyValueStore,
    ui::UiSurface,
};

/// Owns the signed-in state and its persisted copy.
///
/// Mutations hold the write lock across the store call, so the persisted
/// record and `current` are never observed out of step.
pub struct SessionManager<S> {
    store: S,
    key: String,
    current: RwLock<Option<Session>>,
    ui: Arc<dyn UiSurface>,
}

impl<S: KeyValueStore> SessionManager<S> {
    /// Creates a manager with no current session. Call [`restore`](Self::restore)
    /// to pick up a persisted one.
    pub fn new(store: S, key: impl Into<String>, ui: Arc<dyn UiSurface>) -> Self {
        Self {
            store,
            key: key.into(),
            current: RwLock::new(None),
            ui,
        }
    }

    /// Restores the persisted session.
    ///
    /// A malformed record is deleted. Store failures are logged and treated as
    /// "no session"; nothing here returns an error.
    pub async fn restore(&self) -> Option<Session> {
        let mut current = self.current.write().await;

        match session_repo::load_session(&self.store, &self.key).await {
            Ok(StoredSession::Valid(session)) => {
                tracing::info!("✅ Session restored for {}", session.email);
                *current = Some(session.clone());
                drop(current);
                self.ui.on_signed_in(&session);
                Some(session)
            }
            Ok(StoredSession::Missing) => {
                tracing::debug!("No persisted session");
                *current = None;
                None
            }
            Ok(StoredSession::Malformed(reason)) => {
                tracing::warn!("🧹 Discarding malformed session record: {}", reason);
                if let Err(e) = session_repo::delete_session(&self.store, &self.key).await {
                    tracing::error!("❌ Failed to delete malformed session record: {}", e);
                }
                *current = None;
                None
            }
            Err(e) => {
                tracing::warn!("❌ Session store unavailable, starting signed out: {}", e);
                *current = None;
                None
            }
        }
    }

    /// Signs in with a compact identity token.
    ///
    /// Undecodable tokens and missing claims become empty fields; only a
    /// token without an email is refused, since a session needs one.
    pub async fn sign_in(&self, identity_token: &str) -> Result<Session> {
        let session = token::session_from_token(identity_token);
        if session.validate().is_err() {
            tracing::warn!("❌ Identity token carries no email");
            return Err(AppError::SessionDecode(
                "identity token carries no email".to_string(),
            ));
        }

        let mut current = self.current.write().await;
        session_repo::save_session(&self.store, &self.key, &session).await?;
        *current = Some(session.clone());
        drop(current);

        tracing::info!("✅ Signed in: {}", session.email);
        self.ui.on_signed_in(&session);
        Ok(session)
    }

    /// Clears the persisted record and the current session.
    pub async fn sign_out(&self) -> Result<()> {
        let mut current = self.current.write().await;
        session_repo::delete_session(&self.store, &self.key).await?;
        let previous = current.take();
        drop(current);

        match previous {
            Some(session) => tracing::info!("👋 Signed out: {}", session.email),
            None => tracing::debug!("Sign-out without a current session"),
        }
        self.ui.on_signed_out();
        Ok(())
    }

    /// The current session, if any.
    pub async fn current(&self) -> Option<Session> {
        self.current.read().await.clone()
    }

    pub async fn is_signed_in(&self) -> bool {
        self.current.read().await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::ui::{RecordingSurface, UiEvent};
    use base64::{Engine as _, engine::general_purpose};

    fn token(payload: &str) -> String {
        format!("h.{}.s", general_purpose::URL_SAFE_NO_PAD.encode(payload))
    }

    fn manager(store: MemoryStore) -> (SessionManager<MemoryStore>, RecordingSurface) {
        let ui = RecordingSurface::new();
        (SessionManager::new(store, "user", Arc::new(ui.clone())), ui)
    }

    /// A store whose writes and deletes always fail.
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(AppError::Internal("store offline".to_string()))
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(AppError::Internal("store offline".to_string()))
        }

        async fn remove(&self, _key: &str) -> Result<()> {
            Err(AppError::Internal("store offline".to_string()))
        }
    }

    #[tokio::test]
    async fn sign_in_persists_and_sets_current() {
        let store = MemoryStore::new();
        let (sessions, ui) = manager(store.clone());

        let session = sessions
            .sign_in(&token(r#"{"sub":"7","name":"Ada","email":"ada@example.com"}"#))
            .await
            .unwrap();

        assert_eq!(session.picture_url, "");
        assert_eq!(sessions.current().await, Some(session.clone()));
        assert!(store.contains("user"));
        assert_eq!(ui.events(), vec![UiEvent::SignedIn("ada@example.com".to_string())]);

        let (fresh, _) = manager(store);
        assert_eq!(fresh.restore().await, Some(session));
    }

    #[tokio::test]
    async fn sign_in_without_email_changes_nothing() {
        let store = MemoryStore::new();
        let (sessions, ui) = manager(store.clone());

        let err = sessions.sign_in("not-a-token").await.unwrap_err();
        assert!(matches!(err, AppError::SessionDecode(_)));
        assert_eq!(sessions.current().await, None);
        assert!(!store.contains("user"));
        assert!(ui.events().is_empty());
    }

    #[tokio::test]
    async fn restore_discards_malformed_records() {
        let store = MemoryStore::new();
        let (sessions, _) = manager(store.clone());

        for raw in ["{oops", "null", r#"{"name":"no email"}"#, "[]"] {
            store.set("user", raw).await.unwrap();
            assert_eq!(sessions.restore().await, None, "{raw}");
            assert!(!store.contains("user"), "{raw}");
        }
    }

    #[tokio::test]
    async fn restore_with_nothing_stored_is_signed_out() {
        let (sessions, ui) = manager(MemoryStore::new());
        assert_eq!(sessions.restore().await, None);
        assert!(!sessions.is_signed_in().await);
        assert!(ui.events().is_empty());
    }

    #[tokio::test]
    async fn sign_out_clears_both_copies() {
        let store = MemoryStore::new();
        let (sessions, ui) = manager(store.clone());
        sessions.sign_in(&token(r#"{"email":"ada@example.com"}"#)).await.unwrap();

        sessions.sign_out().await.unwrap();

        assert_eq!(sessions.current().await, None);
        assert!(!store.contains("user"));
        assert_eq!(ui.events().last(), Some(&UiEvent::SignedOut));
    }

    #[tokio::test]
    async fn failed_writes_leave_state_untouched() {
        let ui = RecordingSurface::new();
        let sessions = SessionManager::new(BrokenStore, "user", Arc::new(ui.clone()));

        assert_eq!(sessions.restore().await, None);
        assert!(sessions.sign_in(&token(r#"{"email":"ada@example.com"}"#)).await.is_err());
        assert_eq!(sessions.current().await, None);
        assert!(ui.events().is_empty());
    }
}
