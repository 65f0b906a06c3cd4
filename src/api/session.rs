//! Session State
//!
//! Bearer-token storage and the authentication/admin predicates. The token
//! payload is decoded without signature verification and is only ever used
//! for display and UI gating; authorization happens server-side.

use wasm_bindgen::JsCast;

/// Local-storage key holding the bearer token.
pub const TOKEN_KEY: &str = "authToken";

/// Cookie set by the backend on cookie-based sessions.
pub const AUTH_COOKIE: &str = "auth_token";

/// Claims we read out of the token payload for display purposes.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct TokenClaims {
    pub email: String,
    #[serde(default, alias = "Name", alias = "fullname")]
    pub name: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
}

impl TokenClaims {
    /// Whether the `exp` claim lies in the past. Tokens without one are
    /// treated as unexpired.
    pub fn is_expired(&self) -> bool {
        let Some(exp) = self.exp else {
            return false;
        };
        let now_secs = (js_sys::Date::now() / 1000.0) as i64;
        exp < now_secs
    }
}

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

/// Read the stored bearer token, if any.
pub fn token() -> Option<String> {
    local_storage()?.get_item(TOKEN_KEY).ok()?
}

/// Persist a bearer token.
pub fn set_token(token: &str) {
    if let Some(storage) = local_storage() {
        let _ = storage.set_item(TOKEN_KEY, token);
    }
}

/// Drop the stored bearer token.
pub fn clear_token() {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(TOKEN_KEY);
    }
}

/// Whether a session exists: a stored token or an `auth_token` cookie.
pub fn is_authenticated() -> bool {
    token().is_some() || auth_cookie_present()
}

fn auth_cookie_present() -> bool {
    let cookies = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.dyn_into::<web_sys::HtmlDocument>().ok())
        .and_then(|d| d.cookie().ok())
        .unwrap_or_default();
    cookies
        .split(';')
        .any(|c| c.trim_start().starts_with(&format!("{}=", AUTH_COOKIE)))
}

/// Decode the payload segment of the stored token.
///
/// Malformed or expired tokens are treated as absent and removed from
/// storage so a stale session cannot wedge the UI.
pub fn current_user() -> Option<TokenClaims> {
    let token = token()?;
    match decode_claims(&token) {
        Some(claims) if claims.is_expired() => {
            web_sys::console::warn_1(&"Token expired, clearing session".into());
            clear_token();
            None
        }
        Some(claims) => Some(claims),
        None => {
            web_sys::console::error_1(&"Invalid token, clearing session".into());
            clear_token();
            None
        }
    }
}

/// Parse the middle (payload) segment of a JWT-shaped token.
pub fn decode_claims(token: &str) -> Option<TokenClaims> {
    let payload = token.split('.').nth(1)?;
    let bytes = base64url_decode(payload)?;
    serde_json::from_slice(&bytes).ok()
}

/// Base64url decode without padding requirements.
fn base64url_decode(input: &str) -> Option<Vec<u8>> {
    fn value(c: u8) -> Option<u32> {
        match c {
            b'A'..=b'Z' => Some((c - b'A') as u32),
            b'a'..=b'z' => Some((c - b'a') as u32 + 26),
            b'0'..=b'9' => Some((c - b'0') as u32 + 52),
            b'+' | b'-' => Some(62),
            b'/' | b'_' => Some(63),
            _ => None,
        }
    }

    let input = input.trim_end_matches('=');
    let mut out = Vec::with_capacity(input.len() * 3 / 4);
    let mut buffer = 0u32;
    let mut bits = 0u32;
    for &byte in input.as_bytes() {
        let v = value(byte)?;
        buffer = (buffer << 6) | v;
        bits += 6;
        if bits >= 8 {
            bits -= 8;
            out.push((buffer >> bits) as u8);
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_segment(json: &str) -> String {
        const ALPHABET: &[u8] =
            b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";
        let data = json.as_bytes();
        let mut result = String::new();
        for chunk in data.chunks(3) {
            let b0 = chunk[0] as usize;
            let b1 = chunk.get(1).copied().unwrap_or(0) as usize;
            let b2 = chunk.get(2).copied().unwrap_or(0) as usize;
            result.push(ALPHABET[b0 >> 2] as char);
            result.push(ALPHABET[((b0 & 0x03) << 4) | (b1 >> 4)] as char);
            if chunk.len() > 1 {
                result.push(ALPHABET[((b1 & 0x0f) << 2) | (b2 >> 6)] as char);
            }
            if chunk.len() > 2 {
                result.push(ALPHABET[b2 & 0x3f] as char);
            }
        }
        result
    }

    #[test]
    fn decodes_claims_from_payload_segment() {
        let payload = encode_segment(r#"{"email":"rc@school.edu","name":"R. Crusoe"}"#);
        let token = format!("header.{}.signature", payload);
        let claims = decode_claims(&token).expect("claims");
        assert_eq!(claims.email, "rc@school.edu");
        assert_eq!(claims.name.as_deref(), Some("R. Crusoe"));
    }

    #[test]
    fn rejects_malformed_tokens() {
        assert!(decode_claims("not-a-jwt").is_none());
        assert!(decode_claims("a.!!!.c").is_none());
        let not_json = format!("h.{}.s", encode_segment("plain text"));
        assert!(decode_claims(&not_json).is_none());
    }

    #[test]
    fn base64url_roundtrip() {
        let encoded = encode_segment("hello, world");
        assert_eq!(base64url_decode(&encoded).unwrap(), b"hello, world");
    }
}
