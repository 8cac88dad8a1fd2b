use base64::{
    Engine as _,
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
use sonic_rs::{JsonContainerTrait, JsonValueTrait, Value};
use zeroize::Zeroize;

use crate::error::{AppError, Result};
use crate::models::session::Session;

const LENIENT_PADDING: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);

/// URL-safe base64 that accepts payload segments with or without padding.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT_PADDING);

/// Fallback for payloads written with the standard `+` and `/` alphabet.
const STANDARD_PAYLOAD_ENGINE: GeneralPurpose =
    GeneralPurpose::new(&alphabet::STANDARD, LENIENT_PADDING);

/// Decodes the payload segment of a compact `header.payload.signature` token.
///
/// The signature is not verified. Any failure yields an empty object.
pub fn decode_payload(token: &str) -> Value {
    match try_decode_payload(token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!("Identity token payload not decodable: {}", e);
            Value::new_object()
        }
    }
}

fn try_decode_payload(token: &str) -> Result<Value> {
    let segment = token
        .split('.')
        .nth(1)
        .ok_or_else(|| AppError::SessionDecode("token has no payload segment".to_string()))?;

    let mut bytes = PAYLOAD_ENGINE
        .decode(segment)
        .or_else(|_| STANDARD_PAYLOAD_ENGINE.decode(segment))
        .map_err(|e| AppError::SessionDecode(format!("payload is not base64url: {}", e)))?;

    let parsed = sonic_rs::from_slice::<Value>(&bytes);
    bytes.zeroize();

    let claims = parsed.map_err(|e| AppError::SessionDecode(format!("payload is not JSON: {}", e)))?;
    if !claims.is_object() {
        return Err(AppError::SessionDecode("payload is not a JSON object".to_string()));
    }

    Ok(claims)
}

/// Reads a claim as a string. Numbers are rendered, anything else is `""`.
fn claim(claims: &Value, key: &str) -> String {
    match claims.get(key) {
        Some(v) if v.is_str() => v.as_str().unwrap_or_default().to_string(),
        Some(v) if v.is_number() => sonic_rs::to_string(v).unwrap_or_default(),
        _ => String::new(),
    }
}

/// Builds a session from the claims of an identity token.
///
/// Missing `sub`, `name`, `email` or `picture` claims become empty strings.
pub fn session_from_token(token: &str) -> Session {
    let claims = decode_payload(token);
    tracing::debug!("Decoded identity token with {} claims", claims.as_object().map_or(0, |o| o.len()));

    Session {
        id: claim(&claims, "sub"),
        name: claim(&claims, "name"),
        email: claim(&claims, "email"),
        picture_url: claim(&claims, "picture"),
    }
}
