use std::{collections::HashMap, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Space {
    pub id: String,
    pub name: String,
    pub is_public: bool,
    pub img: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub id: String,
    pub space_id: String,
    pub name: String,
    pub color: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Image {
    pub url: String,
    pub name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSpace {
    pub name: String,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub img: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateList {
    pub space_id: String,
    pub name: String,
    pub color: String,
}

#[derive(Deserialize)]
pub struct UpdateList {
    pub name: String,
    pub color: String,
}

#[derive(Deserialize)]
pub struct UploadImage {
    pub base64: String,
    pub name: String,
}

/// Everything stored under one space. Items are free-form JSON objects.
#[derive(Debug)]
struct SpaceEntry {
    space: Space,
    lists: HashMap<String, List>,
    items: HashMap<String, Map<String, Value>>,
}

#[derive(Debug, Default)]
pub struct Store {
    spaces: HashMap<String, SpaceEntry>,
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Clone)]
pub struct AppState {
    token: Arc<str>,
    db: Db,
}

/// Router serving the hero.page v1 endpoints under `/api/v1`. Every route
/// requires `Authorization: Bearer <token>`.
pub fn app(token: &str) -> Router {
    let state = AppState {
        token: Arc::from(token),
        db: Db::default(),
    };
    let api = Router::new()
        .route("/createSpace", post(create_space))
        .route("/getSpace/{space_id}", get(get_space))
        .route("/updateSpace/{space_id}", post(update_space))
        .route("/listSpaces", get(list_spaces))
        .route("/deleteSpace/{space_id}", post(delete_space))
        .route("/createList", post(create_list))
        .route("/getList/{space_id}/{list_id}", get(get_list))
        .route("/updateList/{space_id}/{list_id}", post(update_list))
        .route("/deleteList/{space_id}/{list_id}", post(delete_list))
        .route("/listLists/{space_id}", get(list_lists))
        .route("/createItem/{space_id}", post(create_item))
        .route("/updateItem/{space_id}/{item_id}", post(update_item))
        .route("/getItem/{space_id}/{item_id}", get(get_item))
        .route("/listItems/{space_id}/{list_id}", get(list_items))
        .route("/deleteItem/{space_id}/{item_id}", post(delete_item))
        .route("/uploadImage", post(upload_image))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer))
        .with_state(state);
    Router::new().nest("/api/v1", api)
}

pub async fn run(listener: TcpListener, token: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(token)).await
}

async fn require_bearer(State(state): State<AppState>, request: Request, next: Next) -> Result<Response, StatusCode> {
    let expected = format!("Bearer {}", state.token);
    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    if presented != Some(expected.as_str()) {
        warn!(uri = %request.uri(), "rejecting request without valid bearer token");
        return Err(StatusCode::UNAUTHORIZED);
    }
    debug!(method = %request.method(), uri = %request.uri(), "authorized");
    Ok(next.run(request).await)
}

/// Parse an optional JSON object body. An empty body is an empty object.
fn json_object(body: &[u8]) -> Result<Map<String, Value>, StatusCode> {
    if body.is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_slice(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(Value::Null) => Ok(Map::new()),
        _ => Err(StatusCode::BAD_REQUEST),
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

// --- spaces ---

async fn create_space(State(state): State<AppState>, Json(input): Json<CreateSpace>) -> Json<Space> {
    let space = Space {
        id: new_id(),
        name: input.name,
        is_public: input.is_public,
        img: input.img,
    };
    let entry = SpaceEntry {
        space: space.clone(),
        lists: HashMap::new(),
        items: HashMap::new(),
    };
    state.db.write().await.spaces.insert(space.id.clone(), entry);
    Json(space)
}

async fn get_space(State(state): State<AppState>, Path(space_id): Path<String>) -> Result<Json<Space>, StatusCode> {
    let store = state.db.read().await;
    store
        .spaces
        .get(&space_id)
        .map(|e| Json(e.space.clone()))
        .ok_or(StatusCode::NOT_FOUND)
}

async fn update_space(
    State(state): State<AppState>,
    Path(space_id): Path<String>,
    body: Bytes,
) -> Result<Json<Space>, StatusCode> {
    let patch = json_object(&body)?;
    let mut store = state.db.write().await;
    let space = &mut store.spaces.get_mut(&space_id).ok_or(StatusCode::NOT_FOUND)?.space;
    if let Some(name) = patch.get("name").and_then(Value::as_str) {
        space.name = name.to_string();
    }
    if let Some(is_public) = patch.get("isPublic").and_then(Value::as_bool) {
        space.is_public = is_public;
    }
    if let Some(img) = patch.get("img") {
        space.img = img.as_str().map(str::to_string);
    }
    Ok(Json(space.clone()))
}

async fn list_spaces(State(state): State<AppState>) -> Json<Vec<Space>> {
    let store = state.db.read().await;
    Json(store.spaces.values().map(|e| e.space.clone()).collect())
}

async fn delete_space(State(state): State<AppState>, Path(space_id): Path<String>) -> Result<&'static str, StatusCode> {
    let mut store = state.db.write().await;
    store
        .spaces
        .remove(&space_id)
        .map(|_| "Space deleted")
        .ok_or(StatusCode::NOT_FOUND)
}

// --- lists ---

async fn create_list(State(state): State<AppState>, Json(input): Json<CreateList>) -> Result<Json<List>, StatusCode> {
    let mut store = state.db.write().await;
    let entry = store.spaces.get_mut(&input.space_id).ok_or(StatusCode::NOT_FOUND)?;
    let list = List {
        id: new_id(),
        space_id: input.space_id,
        name: input.name,
        color: input.color,
    };
    entry.lists.insert(list.id.clone(), list.clone());
    Ok(Json(list))
}

async fn get_list(
    State(state): State<AppState>,
    Path((space_id, list_id)): Path<(String, String)>,
) -> Result<Json<List>, StatusCode> {
    let store = state.db.read().await;
    store
        .spaces
        .get(&space_id)
        .and_then(|e| e.lists.get(&list_id))
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn update_list(
    State(state): State<AppState>,
    Path((space_id, list_id)): Path<(String, String)>,
    Json(input): Json<UpdateList>,
) -> Result<Json<List>, StatusCode> {
    let mut store = state.db.write().await;
    let list = store
        .spaces
        .get_mut(&space_id)
        .and_then(|e| e.lists.get_mut(&list_id))
        .ok_or(StatusCode::NOT_FOUND)?;
    list.name = input.name;
    list.color = input.color;
    Ok(Json(list.clone()))
}

async fn delete_list(
    State(state): State<AppState>,
    Path((space_id, list_id)): Path<(String, String)>,
) -> Result<&'static str, StatusCode> {
    let mut store = state.db.write().await;
    store
        .spaces
        .get_mut(&space_id)
        .and_then(|e| e.lists.remove(&list_id))
        .map(|_| "List deleted")
        .ok_or(StatusCode::NOT_FOUND)
}

async fn list_lists(State(state): State<AppState>, Path(space_id): Path<String>) -> Result<Json<Vec<List>>, StatusCode> {
    let store = state.db.read().await;
    let entry = store.spaces.get(&space_id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(entry.lists.values().cloned().collect()))
}

// --- items ---

async fn create_item(
    State(state): State<AppState>,
    Path(space_id): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, StatusCode> {
    let mut item = json_object(&body)?;
    let mut store = state.db.write().await;
    let entry = store.spaces.get_mut(&space_id).ok_or(StatusCode::NOT_FOUND)?;
    let id = new_id();
    item.insert("id".to_string(), Value::String(id.clone()));
    item.insert("spaceId".to_string(), Value::String(space_id));
    entry.items.insert(id, item.clone());
    Ok(Json(Value::Object(item)))
}

async fn update_item(
    State(state): State<AppState>,
    Path((space_id, item_id)): Path<(String, String)>,
    body: Bytes,
) -> Result<Json<Value>, StatusCode> {
    let patch = json_object(&body)?;
    let mut store = state.db.write().await;
    let item = store
        .spaces
        .get_mut(&space_id)
        .and_then(|e| e.items.get_mut(&item_id))
        .ok_or(StatusCode::NOT_FOUND)?;
    for (key, value) in patch {
        if key != "id" && key != "spaceId" {
            item.insert(key, value);
        }
    }
    Ok(Json(Value::Object(item.clone())))
}

async fn get_item(
    State(state): State<AppState>,
    Path((space_id, item_id)): Path<(String, String)>,
) -> Result<Json<Value>, StatusCode> {
    let store = state.db.read().await;
    store
        .spaces
        .get(&space_id)
        .and_then(|e| e.items.get(&item_id))
        .map(|item| Json(Value::Object(item.clone())))
        .ok_or(StatusCode::NOT_FOUND)
}

async fn list_items(
    State(state): State<AppState>,
    Path((space_id, list_id)): Path<(String, String)>,
) -> Result<Json<Vec<Value>>, StatusCode> {
    let store = state.db.read().await;
    let entry = store.spaces.get(&space_id).ok_or(StatusCode::NOT_FOUND)?;
    if !entry.lists.contains_key(&list_id) {
        return Err(StatusCode::NOT_FOUND);
    }
    let items = entry
        .items
        .values()
        .filter(|item| item.get("listId").and_then(Value::as_str) == Some(list_id.as_str()))
        .map(|item| Value::Object(item.clone()))
        .collect();
    Ok(Json(items))
}

async fn delete_item(
    State(state): State<AppState>,
    Path((space_id, item_id)): Path<(String, String)>,
) -> Result<StatusCode, StatusCode> {
    let mut store = state.db.write().await;
    store
        .spaces
        .get_mut(&space_id)
        .and_then(|e| e.items.remove(&item_id))
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(StatusCode::NOT_FOUND)
}

// --- images ---

/// Images are not stored; the answer only echoes a URL the real service
/// would serve the upload from.
async fn upload_image(Json(input): Json<UploadImage>) -> Result<Json<Image>, StatusCode> {
    if input.base64.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let image = Image {
        url: format!("https://hero.page/images/{}/{}", new_id(), input.name),
        name: input.name,
    };
    Ok(Json(image))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn space_serializes_camel_case() {
        let space = Space {
            id: "s1".to_string(),
            name: "Home".to_string(),
            is_public: true,
            img: None,
        };
        let json = serde_json::to_value(&space).unwrap();
        assert_eq!(json["isPublic"], true);
        assert!(json["img"].is_null());
        assert!(json.get("is_public").is_none());
    }

    #[test]
    fn create_space_defaults_optional_fields() {
        let input: CreateSpace = serde_json::from_str(r#"{"name":"Home"}"#).unwrap();
        assert_eq!(input.name, "Home");
        assert!(!input.is_public);
        assert!(input.img.is_none());
    }

    #[test]
    fn create_list_requires_space_id() {
        let result: Result<CreateList, _> = serde_json::from_str(r#"{"name":"a","color":"b"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn json_object_accepts_empty_and_null() {
        assert!(json_object(b"").unwrap().is_empty());
        assert!(json_object(b"null").unwrap().is_empty());
    }

    #[test]
    fn json_object_rejects_non_objects() {
        assert_eq!(json_object(b"[1]").unwrap_err(), StatusCode::BAD_REQUEST);
        assert_eq!(json_object(b"{oops").unwrap_err(), StatusCode::BAD_REQUEST);
    }
}
