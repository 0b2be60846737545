//! Non-authoritative JWT inspection.
//!
//! The backend signs its tokens; the client never verifies signatures. The
//! helpers here only decode the payload to probe expiry and extract an id
//! for UX purposes (hiding stale sessions, prefilling forms). They MUST
//! NOT gate any security decision: every authenticated request carries the
//! raw token and the backend re-checks it.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use serde_json::Value;

/// Claim names probed for a user id, in priority order.
const USER_ID_CLAIMS: [&str; 4] = ["owner_id", "userId", "sub", "id"];

/// Information extracted from a decoded token payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    /// The id claim carried by the token.
    pub user_id: String,
}

/// Returns `true` if `token` looks like a JWT whose `exp` claim lies in
/// the future.
///
/// Any structural problem (wrong segment count, undecodable payload,
/// missing or non-numeric `exp`) yields `false` — a malformed token is an
/// absent session, never a surfaced error.
pub fn is_token_valid(token: &str) -> bool {
    if token.is_empty() {
        return false;
    }

    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        tracing::debug!("Token rejected: expected 3 segments, got {}", parts.len());
        return false;
    }

    let Some(payload) = decode_payload(parts[1]) else {
        tracing::debug!("Token rejected: undecodable payload");
        return false;
    };

    match payload.get("exp").and_then(Value::as_i64) {
        Some(exp) => exp > Utc::now().timestamp(),
        None => false,
    }
}

/// Extracts the user id from a token payload, trying `owner_id`,
/// `userId`, `sub` and `id` in that order.
///
/// Returns `None` when the payload cannot be decoded or carries none of
/// the known claims.
pub fn token_info(token: &str) -> Option<TokenInfo> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return None;
    }
    let payload = decode_payload(parts[1])?;

    for claim in USER_ID_CLAIMS {
        match payload.get(claim) {
            Some(Value::String(s)) if !s.is_empty() => {
                return Some(TokenInfo { user_id: s.clone() });
            }
            Some(Value::Number(n)) => {
                return Some(TokenInfo {
                    user_id: n.to_string(),
                });
            }
            _ => {}
        }
    }

    tracing::debug!("Token payload carries no user id claim");
    None
}

fn decode_payload(segment: &str) -> Option<Value> {
    let bytes = URL_SAFE_NO_PAD.decode(segment).ok()?;
    serde_json::from_slice(&bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_token(payload: Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload.to_string().as_bytes());
        format!("{}.{}.signature", header, body)
    }

    #[test]
    fn future_exp_is_valid() {
        let token = make_token(json!({ "exp": Utc::now().timestamp() + 3600, "sub": "abc" }));
        assert!(is_token_valid(&token));
    }

    #[test]
    fn past_exp_is_invalid() {
        let token = make_token(json!({ "exp": Utc::now().timestamp() - 3600 }));
        assert!(!is_token_valid(&token));
    }

    #[test]
    fn missing_exp_is_invalid() {
        let token = make_token(json!({ "sub": "abc" }));
        assert!(!is_token_valid(&token));
    }

    #[test]
    fn wrong_segment_count_is_invalid() {
        assert!(!is_token_valid(""));
        assert!(!is_token_valid("only-one-segment"));
        assert!(!is_token_valid("two.segments"));
        assert!(!is_token_valid("a.b.c.d"));
    }

    #[test]
    fn garbage_payload_is_invalid() {
        assert!(!is_token_valid("aGVhZGVy.!!!not-base64!!!.sig"));
    }

    #[test]
    fn token_info_prefers_owner_id() {
        let token = make_token(json!({ "owner_id": "o-1", "sub": "s-1", "id": "i-1" }));
        assert_eq!(token_info(&token).unwrap().user_id, "o-1");
    }

    #[test]
    fn token_info_falls_back_to_sub() {
        let token = make_token(json!({ "sub": "s-1", "exp": 0 }));
        assert_eq!(token_info(&token).unwrap().user_id, "s-1");
    }

    #[test]
    fn token_info_without_id_claims_is_none() {
        let token = make_token(json!({ "exp": 123 }));
        assert!(token_info(&token).is_none());
        assert!(token_info("garbage").is_none());
    }
}
