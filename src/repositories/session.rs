use garde::Validate;
use sonic_rs::{JsonValueTrait, Value};

use crate::{
    error::Result,
    models::session::Session,
    store::KeyValueStore,
};

/// What was found under the session key.
#[derive(Debug, PartialEq, Eq)]
pub enum StoredSession {
    /// Nothing is stored.
    Missing,
    /// A well-formed record.
    Valid(Session),
    /// Something is stored but it is not a usable session.
    Malformed(String),
}

/// Reads and decodes the session record stored under `key`.
///
/// Invalid JSON, anything but an object, and records without an email decode to
/// [`StoredSession::Malformed`].
pub async fn load_session<S: KeyValueStore>(store: &S, key: &str) -> Result<StoredSession> {
    let Some(raw) = store.get(key).await? else {
        return Ok(StoredSession::Missing);
    };

    match sonic_rs::from_str::<Value>(&raw) {
        Ok(value) if value.is_null() => {
            return Ok(StoredSession::Malformed("record is null".to_string()));
        }
        Ok(value) if !value.is_object() => {
            return Ok(StoredSession::Malformed("record is not a JSON object".to_string()));
        }
        Ok(_) => {}
        Err(e) => return Ok(StoredSession::Malformed(format!("invalid JSON: {}", e))),
    }

    let session = match sonic_rs::from_str::<Session>(&raw) {
        Ok(session) => session,
        Err(e) => return Ok(StoredSession::Malformed(format!("invalid record: {}", e))),
    };

    if let Err(report) = session.validate() {
        return Ok(StoredSession::Malformed(format!("invalid record: {}", report)));
    }

    Ok(StoredSession::Valid(session))
}

/// Serializes `session` and stores it under `key`.
pub async fn save_session<S: KeyValueStore>(store: &S, key: &str, session: &Session) -> Result<()> {
    let session_json = sonic_rs::to_string(session)?;
    store.set(key, &session_json).await?;
    tracing::debug!("Session record saved under {:?}", key);
    Ok(())
}

/// Removes the session record stored under `key`.
pub async fn delete_session<S: KeyValueStore>(store: &S, key: &str) -> Result<()> {
    store.remove(key).await?;
    tracing::debug!("Session record removed from {:?}", key);
    Ok(())
}
