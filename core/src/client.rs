//! Stateless request builder and response parser for the hero.page v1 API.
//!
//! # Design
//! `HeroClient` holds the bearer token and the API base URL and nothing else.
//! Every endpoint has a `build_*` method producing an `HttpRequest`; all
//! endpoints share one `parse_response`, because the service does not declare
//! response shapes and every answer is surfaced as a `serde_json::Value`.
//! The caller (usually `HeroApi`) executes the round-trip in between.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreateList, CreateSpace, UpdateList, UploadImage};

/// Base URL of the production API.
pub const DEFAULT_BASE_URL: &str = "https://hero.page/api/v1";

/// Synchronous, stateless client for the hero.page API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. Identifiers are interpolated into paths verbatim;
/// escaping reserved characters is the caller's job.
#[derive(Clone)]
pub struct HeroClient {
    token: String,
    base_url: String,
}

impl fmt::Debug for HeroClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeroClient")
            .field("token", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl HeroClient {
    pub fn new(token: &str) -> Self {
        Self::with_base_url(token, DEFAULT_BASE_URL)
    }

    /// Point the client at a different API root, e.g. a local mock server.
    pub fn with_base_url(token: &str, base_url: &str) -> Self {
        Self {
            token: token.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request half of a JSON round-trip against an arbitrary URL.
    ///
    /// Always sets the bearer token and a JSON content type, even without a
    /// body. A `None` or JSON `null` body sends nothing.
    pub fn build_request(&self, url: String, method: HttpMethod, body: Option<&Value>) -> HttpRequest {
        HttpRequest {
            method,
            path: url,
            headers: vec![
                ("authorization".to_string(), format!("Bearer {}", self.token)),
                ("content-type".to_string(), "application/json".to_string()),
            ],
            body: body.filter(|b| !b.is_null()).map(Value::to_string),
        }
    }

    /// Response half of a JSON round-trip.
    ///
    /// A non-2xx status fails without looking at the body. A 2xx body that
    /// is not JSON (including an empty one) comes back as
    /// `{"message": <raw text>}`.
    pub fn parse_response(&self, response: HttpResponse) -> Result<Value, ApiError> {
        if !response.is_success() {
            return Err(ApiError::Http { status: response.status });
        }
        match serde_json::from_str(&response.body) {
            Ok(value) => Ok(value),
            Err(_) => Ok(message_fallback(response.body)),
        }
    }

    // --- spaces ---

    pub fn build_create_space(&self, name: &str, is_public: bool, img: Option<&str>) -> Result<HttpRequest, ApiError> {
        let body = to_body(&CreateSpace {
            name: name.to_string(),
            is_public,
            img: img.map(str::to_string),
        })?;
        Ok(self.post("createSpace", Some(&body)))
    }

    pub fn build_get_space(&self, space_id: &str) -> HttpRequest {
        self.get(&format!("getSpace/{space_id}"))
    }

    pub fn build_update_space<B: Serialize + ?Sized>(&self, space_id: &str, body: &B) -> Result<HttpRequest, ApiError> {
        let body = to_body(body)?;
        Ok(self.post(&format!("updateSpace/{space_id}"), Some(&body)))
    }

    pub fn build_list_spaces(&self) -> HttpRequest {
        self.get("listSpaces")
    }

    pub fn build_delete_space(&self, space_id: &str) -> HttpRequest {
        self.post(&format!("deleteSpace/{space_id}"), None)
    }

    // --- lists ---

    pub fn build_create_list(&self, space_id: &str, name: &str, color: &str) -> Result<HttpRequest, ApiError> {
        let body = to_body(&CreateList {
            space_id: space_id.to_string(),
            name: name.to_string(),
            color: color.to_string(),
        })?;
        Ok(self.post("createList", Some(&body)))
    }

    pub fn build_get_list(&self, space_id: &str, list_id: &str) -> HttpRequest {
        self.get(&format!("getList/{space_id}/{list_id}"))
    }

    pub fn build_update_list(&self, space_id: &str, list_id: &str, name: &str, color: &str) -> Result<HttpRequest, ApiError> {
        let body = to_body(&UpdateList {
            name: name.to_string(),
            color: color.to_string(),
        })?;
        Ok(self.post(&format!("updateList/{space_id}/{list_id}"), Some(&body)))
    }

    pub fn build_delete_list(&self, space_id: &str, list_id: &str) -> HttpRequest {
        self.post(&format!("deleteList/{space_id}/{list_id}"), None)
    }

    pub fn build_list_lists(&self, space_id: &str) -> HttpRequest {
        self.get(&format!("listLists/{space_id}"))
    }

    // --- items ---

    pub fn build_create_item<B: Serialize + ?Sized>(&self, space_id: &str, body: &B) -> Result<HttpRequest, ApiError> {
        let body = to_body(body)?;
        Ok(self.post(&format!("createItem/{space_id}"), Some(&body)))
    }

    pub fn build_update_item<B: Serialize + ?Sized>(&self, space_id: &str, item_id: &str, body: &B) -> Result<HttpRequest, ApiError> {
        let body = to_body(body)?;
        Ok(self.post(&format!("updateItem/{space_id}/{item_id}"), Some(&body)))
    }

    pub fn build_get_item(&self, space_id: &str, item_id: &str) -> HttpRequest {
        self.get(&format!("getItem/{space_id}/{item_id}"))
    }

    pub fn build_list_items(&self, space_id: &str, list_id: &str) -> HttpRequest {
        self.get(&format!("listItems/{space_id}/{list_id}"))
    }

    pub fn build_delete_item(&self, space_id: &str, item_id: &str) -> HttpRequest {
        self.post(&format!("deleteItem/{space_id}/{item_id}"), None)
    }

    // --- images ---

    pub fn build_upload_image(&self, base64: &str, name: &str) -> Result<HttpRequest, ApiError> {
        let body = to_body(&UploadImage {
            base64: base64.to_string(),
            name: name.to_string(),
        })?;
        Ok(self.post("uploadImage", Some(&body)))
    }

    fn get(&self, endpoint: &str) -> HttpRequest {
        self.build_request(self.url(endpoint), HttpMethod::Get, None)
    }

    fn post(&self, endpoint: &str, body: Option<&Value>) -> HttpRequest {
        self.build_request(self.url(endpoint), HttpMethod::Post, body)
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.base_url)
    }
}

fn to_body<B: Serialize + ?Sized>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::Serialization(e.to_string()))
}

/// Same shape as `MessageFallback`.
fn message_fallback(text: String) -> Value {
    serde_json::json!({ "message": text })
}
