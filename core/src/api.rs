//! Async executor that performs the round-trip for `HeroClient`.
//!
//! Each method builds a request, sends it once with `reqwest`, reads the
//! whole body as text and hands it to `HeroClient::parse_response`. There is
//! no retry, no timeout of our own and no shared mutable state, so a single
//! `HeroApi` can be cloned freely and used from many tasks at once.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::client::HeroClient;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

#[derive(Debug, Clone)]
pub struct HeroApi {
    client: HeroClient,
    http: reqwest::Client,
}

impl HeroApi {
    pub fn new(token: &str) -> Self {
        Self::from_parts(HeroClient::new(token), reqwest::Client::new())
    }

    pub fn with_base_url(token: &str, base_url: &str) -> Self {
        Self::from_parts(HeroClient::with_base_url(token, base_url), reqwest::Client::new())
    }

    /// Use a preconfigured `reqwest::Client`, e.g. one with a timeout.
    pub fn from_parts(client: HeroClient, http: reqwest::Client) -> Self {
        Self { client, http }
    }

    pub fn client(&self) -> &HeroClient {
        &self.client
    }

    /// Send one JSON request to `url` and parse the answer.
    pub async fn fetch_json(&self, url: &str, method: HttpMethod, body: Option<&Value>) -> Result<Value, ApiError> {
        let request = self.client.build_request(url.to_string(), method, body);
        self.execute(request).await
    }

    /// Send a prebuilt request and parse the answer.
    pub async fn execute(&self, request: HttpRequest) -> Result<Value, ApiError> {
        let response = self.send(request).await?;
        if !response.is_success() {
            warn!(status = response.status, "hero.page request failed");
        }
        self.client.parse_response(response)
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = request.method.as_str(), url = %request.path, "sending hero.page request");

        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        };
        let mut builder = self
            .http
            .request(method, request.path.as_str())
            .headers(header_map(&request.headers)?);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
            .collect();
        let body = response.text().await?;
        debug!(status, bytes = body.len(), "hero.page response received");

        Ok(HttpResponse { status, headers, body })
    }

    // --- spaces ---

    pub async fn create_space(&self, name: &str, is_public: bool, img: Option<&str>) -> Result<Value, ApiError> {
        self.execute(self.client.build_create_space(name, is_public, img)?).await
    }

    pub async fn get_space(&self, space_id: &str) -> Result<Value, ApiError> {
        self.execute(self.client.build_get_space(space_id)).await
    }

    pub async fn update_space<B: Serialize + ?Sized>(&self, space_id: &str, body: &B) -> Result<Value, ApiError> {
        self.execute(self.client.build_update_space(space_id, body)?).await
    }

    pub async fn list_spaces(&self) -> Result<Value, ApiError> {
        self.execute(self.client.build_list_spaces()).await
    }

    pub async fn delete_space(&self, space_id: &str) -> Result<Value, ApiError> {
        self.execute(self.client.build_delete_space(space_id)).await
    }

    // --- lists ---

    pub async fn create_list(&self, space_id: &str, name: &str, color: &str) -> Result<Value, ApiError> {
        self.execute(self.client.build_create_list(space_id, name, color)?).await
    }

    pub async fn get_list(&self, space_id: &str, list_id: &str) -> Result<Value, ApiError> {
        self.execute(self.client.build_get_list(space_id, list_id)).await
    }

    pub async fn update_list(&self, space_id: &str, list_id: &str, name: &str, color: &str) -> Result<Value, ApiError> {
        self.execute(self.client.build_update_list(space_id, list_id, name, color)?).await
    }

    pub async fn delete_list(&self, space_id: &str, list_id: &str) -> Result<Value, ApiError> {
        self.execute(self.client.build_delete_list(space_id, list_id)).await
    }

    pub async fn list_lists(&self, space_id: &str) -> Result<Value, ApiError> {
        self.execute(self.client.build_list_lists(space_id)).await
    }

    // --- items ---

    pub async fn create_item<B: Serialize + ?Sized>(&self, space_id: &str, body: &B) -> Result<Value, ApiError> {
        self.execute(self.client.build_create_item(space_id, body)?).await
    }

    pub async fn update_item<B: Serialize + ?Sized>(&self, space_id: &str, item_id: &str, body: &B) -> Result<Value, ApiError> {
        self.execute(self.client.build_update_item(space_id, item_id, body)?).await
    }

    pub async fn get_item(&self, space_id: &str, item_id: &str) -> Result<Value, ApiError> {
        self.execute(self.client.build_get_item(space_id, item_id)).await
    }

    pub async fn list_items(&self, space_id: &str, list_id: &str) -> Result<Value, ApiError> {
        self.execute(self.client.build_list_items(space_id, list_id)).await
    }

    pub async fn delete_item(&self, space_id: &str, item_id: &str) -> Result<Value, ApiError> {
        self.execute(self.client.build_delete_item(space_id, item_id)).await
    }

    // --- images ---

    pub async fn upload_image(&self, base64: &str, name: &str) -> Result<Value, ApiError> {
        self.execute(self.client.build_upload_image(base64, name)?).await
    }
}

/// Fails on the first header that is not valid HTTP; the error names the
/// header but never echoes its value.
fn header_map(headers: &[(String, String)]) -> Result<HeaderMap, ApiError> {
    headers
        .iter()
        .map(|(k, v)| {
            let invalid = || ApiError::InvalidHeader { name: k.clone() };
            let name = HeaderName::from_bytes(k.as_bytes()).map_err(|_| invalid())?;
            let value = HeaderValue::from_str(v).map_err(|_| invalid())?;
            Ok((name, value))
        })
        .collect()
}
