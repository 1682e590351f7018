//! C-ABI wrapper around `hero-core`.
//!
//! # Overview
//! Exposes every hero.page endpoint through `extern "C"` functions so any
//! language with a C FFI can build requests and parse responses while doing
//! the HTTP round-trip with its own stack.
//!
//! # Design
//! - Every `extern "C"` function runs inside `catch_unwind` so panics never
//!   cross the FFI boundary.
//! - One `hero_build_*` per endpoint; a single `hero_parse_response` because
//!   every endpoint answers with free-form JSON.
//! - Caller-shaped bodies (space update, item create/update) are passed as
//!   JSON text. A null body pointer means "no body".
//! - The C caller owns all returned pointers and must release them with the
//!   matching `hero_free_*` function.

pub mod types;

use std::ffi::CStr;
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use hero_core::http::{HttpRequest, HttpResponse};
use hero_core::HeroClient;
use serde_json::Value;

use types::*;

/// Read a C string argument. Null yields `None`; invalid UTF-8 is replaced.
fn str_arg(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
}

/// Read an optional JSON text argument. Null is JSON `null` (no body);
/// malformed JSON yields `None`.
fn json_arg(ptr: *const c_char) -> Option<Value> {
    match str_arg(ptr) {
        None => Some(Value::Null),
        Some(text) => serde_json::from_str(&text).ok(),
    }
}

/// Shared body of every `hero_build_*` function.
fn build(client: *const FfiHeroClient, f: impl FnOnce(&HeroClient) -> Option<HttpRequest>) -> *mut FfiHttpRequest {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        match f(&client.inner) {
            Some(req) => FfiHttpRequest::from_core(req),
            None => std::ptr::null_mut(),
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a client holding `token`. `base_url` may be null to use the
/// production API.
///
/// Returns null if `token` is null. Free with `hero_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn hero_client_new(token: *const c_char, base_url: *const c_char) -> *mut FfiHeroClient {
    catch_unwind(|| {
        let Some(token) = str_arg(token) else {
            return std::ptr::null_mut();
        };
        let inner = match str_arg(base_url) {
            Some(base) => HeroClient::with_base_url(&token, &base),
            None => HeroClient::new(&token),
        };
        Box::into_raw(Box::new(FfiHeroClient { inner }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `hero_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn hero_client_free(client: *mut FfiHeroClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Spaces
// ---------------------------------------------------------------------------

/// `img` may be null.
#[unsafe(no_mangle)]
pub extern "C" fn hero_build_create_space(
    client: *const FfiHeroClient,
    name: *const c_char,
    is_public: bool,
    img: *const c_char,
) -> *mut FfiHttpRequest {
    build(client, |c| {
        let img = str_arg(img);
        c.build_create_space(&str_arg(name)?, is_public, img.as_deref()).ok()
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn hero_build_get_space(client: *const FfiHeroClient, space_id: *const c_char) -> *mut FfiHttpRequest {
    build(client, |c| Some(c.build_get_space(&str_arg(space_id)?)))
}

/// `body_json` is sent as-is; returns null if it is not valid JSON.
#[unsafe(no_mangle)]
pub extern "C" fn hero_build_update_space(
    client: *const FfiHeroClient,
    space_id: *const c_char,
    body_json: *const c_char,
) -> *mut FfiHttpRequest {
    build(client, |c| c.build_update_space(&str_arg(space_id)?, &json_arg(body_json)?).ok())
}

#[unsafe(no_mangle)]
pub extern "C" fn hero_build_list_spaces(client: *const FfiHeroClient) -> *mut FfiHttpRequest {
    build(client, |c| Some(c.build_list_spaces()))
}

#[unsafe(no_mangle)]
pub extern "C" fn hero_build_delete_space(client: *const FfiHeroClient, space_id: *const c_char) -> *mut FfiHttpRequest {
    build(client, |c| Some(c.build_delete_space(&str_arg(space_id)?)))
}

// ---------------------------------------------------------------------------
// Lists
// ---------------------------------------------------------------------------

#[unsafe(no_mangle)]
pub extern "C" fn hero_build_create_list(
    client: *const FfiHeroClient,
    space_id: *const c_char,
    name: *const c_char,
    color: *const c_char,
) -> *mut FfiHttpRequest {
    build(client, |c| {
        c.build_create_list(&str_arg(space_id)?, &str_arg(name)?, &str_arg(color)?)
            .ok()
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn hero_build_get_list(
    client: *const FfiHeroClient,
    space_id: *const c_char,
    list_id: *const c_char,
) -> *mut FfiHttpRequest {
    build(client, |c| Some(c.build_get_list(&str_arg(space_id)?, &str_arg(list_id)?)))
}

#[unsafe(no_mangle)]
pub extern "C" fn hero_build_update_list(
    client: *const FfiHeroClient,
    space_id: *const c_char,
    list_id: *const c_char,
    name: *const c_char,
    color: *const c_char,
) -> *mut FfiHttpRequest {
    build(client, |c| {
        c.build_update_list(&str_arg(space_id)?, &str_arg(list_id)?, &str_arg(name)?, &str_arg(color)?)
            .ok()
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn hero_build_delete_list(
    client: *const FfiHeroClient,
    space_id: *const c_char,
    list_id: *const c_char,
) -> *mut FfiHttpRequest {
    build(client, |c| Some(c.build_delete_list(&str_arg(space_id)?, &str_arg(list_id)?)))
}

#[unsafe(no_mangle)]
pub extern "C" fn hero_build_list_lists(client: *const FfiHeroClient, space_id: *const c_char) -> *mut FfiHttpRequest {
    build(client, |c| Some(c.build_list_lists(&str_arg(space_id)?)))
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

#[unsafe(no_mangle)]
pub extern "C" fn hero_build_create_item(
    client: *const FfiHeroClient,
    space_id: *const c_char,
    body_json: *const c_char,
) -> *mut FfiHttpRequest {
    build(client, |c| c.build_create_item(&str_arg(space_id)?, &json_arg(body_json)?).ok())
}

#[unsafe(no_mangle)]
pub extern "C" fn hero_build_update_item(
    client: *const FfiHeroClient,
    space_id: *const c_char,
    item_id: *const c_char,
    body_json: *const c_char,
) -> *mut FfiHttpRequest {
    build(client, |c| {
        c.build_update_item(&str_arg(space_id)?, &str_arg(item_id)?, &json_arg(body_json)?)
            .ok()
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn hero_build_get_item(
    client: *const FfiHeroClient,
    space_id: *const c_char,
    item_id: *const c_char,
) -> *mut FfiHttpRequest {
    build(client, |c| Some(c.build_get_item(&str_arg(space_id)?, &str_arg(item_id)?)))
}

#[unsafe(no_mangle)]
pub extern "C" fn hero_build_list_items(
    client: *const FfiHeroClient,
    space_id: *const c_char,
    list_id: *const c_char,
) -> *mut FfiHttpRequest {
    build(client, |c| Some(c.build_list_items(&str_arg(space_id)?, &str_arg(list_id)?)))
}

#[unsafe(no_mangle)]
pub extern "C" fn hero_build_delete_item(
    client: *const FfiHeroClient,
    space_id: *const c_char,
    item_id: *const c_char,
) -> *mut FfiHttpRequest {
    build(client, |c| Some(c.build_delete_item(&str_arg(space_id)?, &str_arg(item_id)?)))
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

#[unsafe(no_mangle)]
pub extern "C" fn hero_build_upload_image(
    client: *const FfiHeroClient,
    base64: *const c_char,
    name: *const c_char,
) -> *mut FfiHttpRequest {
    build(client, |c| c.build_upload_image(&str_arg(base64)?, &str_arg(name)?).ok())
}

// ---------------------------------------------------------------------------
// Parse
// ---------------------------------------------------------------------------

/// Parse the response to any `hero_build_*` request.
///
/// Free the result with `hero_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn hero_parse_response(
    client: *const FfiHeroClient,
    response: *const FfiHttpResponse,
) -> *mut FfiHeroResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiHeroResult::null_arg("client");
        }
        if response.is_null() {
            return FfiHeroResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        let core_resp = HttpResponse {
            status: resp.status,
            headers: Vec::new(),
            body: str_arg(resp.body).unwrap_or_default(),
        };
        match client.inner.parse_response(core_resp) {
            Ok(value) => FfiHeroResult::ok(value),
            Err(e) => FfiHeroResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiHeroResult::panic("panic in hero_parse_response"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

unsafe fn free_c_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(unsafe { std::ffi::CString::from_raw(ptr) });
    }
}

/// Free a request returned by any `hero_build_*` function. Safe with null.
#[unsafe(no_mangle)]
pub extern "C" fn hero_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| unsafe {
        let req = Box::from_raw(req);
        free_c_string(req.url);
        free_c_string(req.body);
        if !req.headers.is_null() {
            let headers = Box::from_raw(std::ptr::slice_from_raw_parts_mut(req.headers, req.headers_len as usize));
            for h in headers.iter() {
                free_c_string(h.key);
                free_c_string(h.value);
            }
        }
    });
}

/// Free a result returned by `hero_parse_response`. Safe with null.
#[unsafe(no_mangle)]
pub extern "C" fn hero_free_result(result: *mut FfiHeroResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| unsafe {
        let result = Box::from_raw(result);
        free_c_string(result.error_message);
        free_c_string(result.json);
    });
}

/// Free a single string handed out by this library. Safe with null.
#[unsafe(no_mangle)]
pub extern "C" fn hero_free_string(s: *mut c_char) {
    let _ = catch_unwind(|| unsafe { free_c_string(s) });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    fn new_client() -> *mut FfiHeroClient {
        let token = CString::new("T").unwrap();
        hero_client_new(token.as_ptr(), std::ptr::null())
    }

    fn read(ptr: *const c_char) -> String {
        unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_string()
    }

    fn parse(client: *const FfiHeroClient, status: u16, body: &str) -> *mut FfiHeroResult {
        let body = CString::new(body).unwrap();
        let resp = FfiHttpResponse {
            status,
            body: body.as_ptr(),
        };
        hero_parse_response(client, &resp)
    }

    #[test]
    fn client_new_null_token_returns_null() {
        assert!(hero_client_new(std::ptr::null(), std::ptr::null()).is_null());
    }

    #[test]
    fn client_new_with_base_url() {
        let token = CString::new("T").unwrap();
        let base = CString::new("http://localhost:3000/api/v1/").unwrap();
        let client = hero_client_new(token.as_ptr(), base.as_ptr());
        let req = hero_build_list_spaces(client);
        assert_eq!(read(unsafe { &*req }.url), "http://localhost:3000/api/v1/listSpaces");

        hero_free_request(req);
        hero_client_free(client);
    }

    #[test]
    fn client_free_null_is_safe() {
        hero_client_free(std::ptr::null_mut());
    }

    #[test]
    fn build_get_item_has_headers_and_no_body() {
        let client = new_client();
        let sid = CString::new("s1").unwrap();
        let iid = CString::new("i1").unwrap();
        let req = hero_build_get_item(client, sid.as_ptr(), iid.as_ptr());
        assert!(!req.is_null());

        let r = unsafe { &*req };
        assert!(matches!(r.method, FfiHttpMethod::Get));
        assert_eq!(read(r.url), "https://hero.page/api/v1/getItem/s1/i1");
        assert!(r.body.is_null());
        assert_eq!(r.headers_len, 2);
        let headers = unsafe { std::slice::from_raw_parts(r.headers, r.headers_len as usize) };
        assert_eq!(read(headers[0].key), "authorization");
        assert_eq!(read(headers[0].value), "Bearer T");
        assert_eq!(read(headers[1].value), "application/json");

        hero_free_request(req);
        hero_client_free(client);
    }

    #[test]
    fn build_create_space_null_img() {
        let client = new_client();
        let name = CString::new("Home").unwrap();
        let req = hero_build_create_space(client, name.as_ptr(), true, std::ptr::null());
        let r = unsafe { &*req };
        assert!(matches!(r.method, FfiHttpMethod::Post));
        let body: Value = serde_json::from_str(&read(r.body)).unwrap();
        assert_eq!(body, serde_json::json!({"name": "Home", "isPublic": true, "img": null}));

        hero_free_request(req);
        hero_client_free(client);
    }

    #[test]
    fn build_create_item_passes_json_through() {
        let client = new_client();
        let sid = CString::new("s1").unwrap();
        let body = CString::new(r#"{"title":"Milk"}"#).unwrap();
        let req = hero_build_create_item(client, sid.as_ptr(), body.as_ptr());
        let r = unsafe { &*req };
        assert_eq!(read(r.url), "https://hero.page/api/v1/createItem/s1");
        assert_eq!(read(r.body), r#"{"title":"Milk"}"#);

        hero_free_request(req);
        hero_client_free(client);
    }

    #[test]
    fn build_update_space_null_body_sends_none() {
        let client = new_client();
        let sid = CString::new("s1").unwrap();
        let req = hero_build_update_space(client, sid.as_ptr(), std::ptr::null());
        assert!(unsafe { &*req }.body.is_null());

        hero_free_request(req);
        hero_client_free(client);
    }

    #[test]
    fn build_with_malformed_json_returns_null() {
        let client = new_client();
        let sid = CString::new("s1").unwrap();
        let body = CString::new("{oops").unwrap();
        assert!(hero_build_create_item(client, sid.as_ptr(), body.as_ptr()).is_null());
        hero_client_free(client);
    }

    #[test]
    fn build_with_null_id_returns_null() {
        let client = new_client();
        assert!(hero_build_get_space(client, std::ptr::null()).is_null());
        assert!(hero_build_list_spaces(std::ptr::null()).is_null());
        hero_client_free(client);
    }

    #[test]
    fn parse_json_body() {
        let client = new_client();
        let result = parse(client, 200, r#"{"a": 1}"#);
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Ok);
        assert!(r.error_message.is_null());
        assert_eq!(read(r.json), r#"{"a":1}"#);

        hero_free_result(result);
        hero_client_free(client);
    }

    #[test]
    fn parse_plain_text_body() {
        let client = new_client();
        let result = parse(client, 200, "Space deleted");
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Ok);
        assert_eq!(read(r.json), r#"{"message":"Space deleted"}"#);

        hero_free_result(result);
        hero_client_free(client);
    }

    #[test]
    fn parse_null_body_is_empty_message() {
        let client = new_client();
        let resp = FfiHttpResponse {
            status: 204,
            body: std::ptr::null(),
        };
        let result = hero_parse_response(client, &resp);
        assert_eq!(read(unsafe { &*result }.json), r#"{"message":""}"#);

        hero_free_result(result);
        hero_client_free(client);
    }

    #[test]
    fn parse_not_found() {
        let client = new_client();
        let result = parse(client, 404, "{}");
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Http);
        assert_eq!(r.http_status, 404);
        assert!(r.json.is_null());
        assert_eq!(read(r.error_message), "Request failed with status 404");

        hero_free_result(result);
        hero_client_free(client);
    }

    #[test]
    fn parse_null_args() {
        let client = new_client();
        let result = hero_parse_response(client, std::ptr::null());
        assert_eq!(unsafe { &*result }.error_code, FfiErrorCode::NullArg);
        hero_free_result(result);

        let resp = FfiHttpResponse {
            status: 200,
            body: std::ptr::null(),
        };
        let result = hero_parse_response(std::ptr::null(), &resp);
        assert_eq!(unsafe { &*result }.error_code, FfiErrorCode::NullArg);
        hero_free_result(result);

        hero_client_free(client);
    }

    #[test]
    fn free_functions_accept_null() {
        hero_free_request(std::ptr::null_mut());
        hero_free_result(std::ptr::null_mut());
        hero_free_string(std::ptr::null_mut());
    }
}
