//! One-shot notifications carried across a redirect in a cookie.

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, HeaderMap};
use serde::Serialize;
use std::convert::Infallible;
use url::form_urlencoded;

const COOKIE_NAME: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Info,
    Danger,
}

impl FlashKind {
    fn as_str(self) -> &'static str {
        match self {
            FlashKind::Success => "success",
            FlashKind::Info => "info",
            FlashKind::Danger => "danger",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "success" => Some(FlashKind::Success),
            "info" => Some(FlashKind::Info),
            "danger" => Some(FlashKind::Danger),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn new(kind: FlashKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(FlashKind::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(FlashKind::Info, message)
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self::new(FlashKind::Danger, message)
    }

    /// `Set-Cookie` value storing this flash until the next page render.
    pub fn set_cookie(&self) -> String {
        let value = form_urlencoded::Serializer::new(String::new())
            .append_pair("kind", self.kind.as_str())
            .append_pair("message", &self.message)
            .finish();
        format!("{}={}; Path=/; HttpOnly; SameSite=Lax", COOKIE_NAME, value)
    }

    /// `Set-Cookie` value that discards a consumed flash.
    pub fn clear_cookie() -> &'static str {
        "flash=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax"
    }

    fn decode(value: &str) -> Option<Self> {
        let mut kind = None;
        let mut message = None;
        for (key, val) in form_urlencoded::parse(value.as_bytes()) {
            match key.as_ref() {
                "kind" => kind = FlashKind::parse(&val),
                "message" => message = Some(val.into_owned()),
                _ => {}
            }
        }
        Some(Flash::new(kind?, message?))
    }

    fn from_headers(headers: &HeaderMap) -> Option<Self> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|cookies| cookies.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, value)| *name == COOKIE_NAME && !value.is_empty())
            .and_then(|(_, value)| Flash::decode(value))
    }
}

/// Flash left by the previous response, if any.
#[derive(Debug, Clone, Default)]
pub struct PendingFlash(pub Option<Flash>);

impl<S> FromRequestParts<S> for PendingFlash
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(PendingFlash(Flash::from_headers(&parts.headers)))
    }
}
