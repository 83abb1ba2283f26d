//! One-shot notices carried across redirects
//!
//! Pending notices travel in a cookie holding `payload.signature`, where the
//! payload is the URL-safe base64 JSON list of notices and the signature is an
//! HMAC-SHA256 of the payload keyed by the configured secret. A cookie whose
//! signature does not verify is ignored.

use crate::error::{Result, SupportLabError};
use axum::http::{HeaderMap, HeaderValue, header};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const FLASH_COOKIE: &str = "supportlab_flash";
const MAX_TOKEN_LEN: usize = 4096;

/// Severity of a notice; serialized as the matching alert style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Info,
    Warning,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn new(level: FlashLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Warning, message)
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Danger, message)
    }
}

/// Signs and verifies the flash cookie
#[derive(Clone)]
pub struct FlashSigner {
    mac: HmacSha256,
}

impl std::fmt::Debug for FlashSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlashSigner").finish_non_exhaustive()
    }
}

impl FlashSigner {
    pub fn new(secret: &str) -> Result<Self> {
        let mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| SupportLabError::custom(format!("Invalid flash signing key: {e}")))?;
        Ok(Self { mac })
    }

    fn signature(&self, payload_part: &str) -> HmacSha256 {
        let mut mac = self.mac.clone();
        mac.update(payload_part.as_bytes());
        mac
    }

    /// Encode notices into a signed token
    pub fn encode(&self, flashes: &[Flash]) -> Result<String> {
        let payload_part = URL_SAFE_NO_PAD.encode(serde_json::to_vec(flashes)?);
        let sig = self.signature(&payload_part).finalize().into_bytes();
        Ok(format!("{payload_part}.{}", URL_SAFE_NO_PAD.encode(sig)))
    }

    /// Decode a token, returning `None` when it is malformed or forged
    pub fn decode(&self, token: &str) -> Option<Vec<Flash>> {
        if token.len() > MAX_TOKEN_LEN {
            return None;
        }
        let (payload_part, sig_part) = token.split_once('.')?;
        let sig = URL_SAFE_NO_PAD.decode(sig_part).ok()?;
        self.signature(payload_part).verify_slice(&sig).ok()?;

        let payload = URL_SAFE_NO_PAD.decode(payload_part).ok()?;
        serde_json::from_slice(&payload).ok()
    }

    /// Notices pending in the request's flash cookie
    pub fn read(&self, headers: &HeaderMap) -> Vec<Flash> {
        match cookie_value(headers, FLASH_COOKIE) {
            Some(token) => self.decode(token).unwrap_or_else(|| {
                tracing::warn!("Ignoring flash cookie with an invalid signature");
                Vec::new()
            }),
            None => Vec::new(),
        }
    }

    /// `Set-Cookie` value storing the given notices
    pub fn set_cookie(&self, flashes: &[Flash]) -> Result<HeaderValue> {
        let token = self.encode(flashes)?;
        HeaderValue::from_str(&format!(
            "{FLASH_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax"
        ))
        .map_err(|e| SupportLabError::custom(format!("Invalid flash cookie: {e}")))
    }
}

/// `Set-Cookie` value expiring the flash cookie
pub fn clear_cookie() -> HeaderValue {
    HeaderValue::from_static("supportlab_flash=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax")
}

/// Whether the request carries a flash cookie at all
pub fn has_flash_cookie(headers: &HeaderMap) -> bool {
    cookie_value(headers, FLASH_COOKIE).is_some()
}

fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(_, value)| value)
}
