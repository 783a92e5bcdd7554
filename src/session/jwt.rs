use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;

use super::{SessionError, SessionResult};

/// The claims the dashboard cares about. Signatures are never checked here;
/// the API is the authority.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub iat: Option<i64>,
    #[serde(default, alias = "userId", alias = "id")]
    pub sub: Option<String>,
}

pub fn decode_claims(token: &str) -> SessionResult<Claims> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| SessionError::MalformedToken("missing payload segment".to_string()))?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| SessionError::MalformedToken(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| SessionError::MalformedToken(e.to_string()))
}

/// Expiry as unix seconds, if the token carries one.
pub fn token_expiry(token: &str) -> Option<i64> {
    decode_claims(token).ok()?.exp
}

/// A token without a readable expiry is treated as live and left for the API
/// to reject.
pub fn is_expired(token: &str, now_unix: i64) -> bool {
    token_expiry(token).is_some_and(|exp| exp <= now_unix)
}
