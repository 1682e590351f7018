//! Client for the hero.page v1 task/note API.
//!
//! # Overview
//! `HeroClient` builds `HttpRequest` values and parses `HttpResponse` values
//! without touching the network. `HeroApi` wraps it with a `reqwest` client
//! and exposes one async method per endpoint. Both sides of the split are
//! public so hosts that bring their own HTTP stack (see the `hero-ffi` crate)
//! can use the builder alone.
//!
//! # Design
//! - The client holds only the bearer token and the base URL; nothing is
//!   cached or retried.
//! - Responses are `serde_json::Value` because the service publishes no
//!   schemas. A 2xx body that is not JSON becomes `{"message": <text>}`.
//! - Any non-2xx status is `ApiError::Http` carrying the status code.

pub mod api;
pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use api::HeroApi;
pub use client::{HeroClient, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{CreateList, CreateSpace, MessageFallback, UpdateList, UploadImage};
