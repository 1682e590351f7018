//! Request payloads with a fixed shape, plus the plain-text fallback wrapper.
//!
//! Response bodies are not typed: every endpoint answers with whatever JSON
//! the server sends, surfaced as `serde_json::Value`. Payloads the caller
//! owns entirely (space updates, item create/update) are taken as any
//! `Serialize` value instead of a struct here.

use serde::{Deserialize, Serialize};

/// Body of `createSpace`. `img` is always sent, as `null` when absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateSpace {
    pub name: String,
    pub is_public: bool,
    pub img: Option<String>,
}

/// Body of `createList`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateList {
    pub space_id: String,
    pub name: String,
    pub color: String,
}

/// Body of `updateList`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateList {
    pub name: String,
    pub color: String,
}

/// Body of `uploadImage`. `base64` is the encoded image data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadImage {
    pub base64: String,
    pub name: String,
}

/// What a 2xx response turns into when its body is not valid JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageFallback {
    pub message: String,
}
