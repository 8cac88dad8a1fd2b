use garde::Validate;
use serde::{Deserialize, Serialize};

/// Represents a signed-in identity.
///
/// Persisted as `{"id","name","email","picture"}`. A session without an
/// email is never held or stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Session {
    /// The subject identifier of the identity token.
    #[garde(skip)]
    #[serde(default)]
    pub id: String,
    /// The display name.
    #[garde(skip)]
    #[serde(default)]
    pub name: String,
    /// The email address. Never empty.
    #[garde(length(min = 1))]
    #[serde(default)]
    pub email: String,
    /// The avatar URL.
    #[garde(skip)]
    #[serde(rename = "picture", default)]
    pub picture_url: String,
}

impl Session {
    /// The profile badge letter: first letter of the name, else of the
    /// email, else `U`.
    pub fn initial(&self) -> char {
        self.name
            .chars()
            .next()
            .or_else(|| self.email.chars().next())
            .unwrap_or('U')
            .to_uppercase()
            .next()
            .unwrap_or('U')
    }
}
