//! Verify request building and response parsing against the JSON vectors in
//! `test-vectors/`.
//!
//! Bodies are compared as parsed JSON rather than raw strings so field order
//! never causes a false negative.

use std::collections::BTreeSet;

use hero_core::{ApiError, HeroClient, HttpMethod, HttpRequest, HttpResponse};
use serde_json::Value;

const BASE_URL: &str = "https://hero.page/api/v1";

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        other => panic!("unknown method: {other}"),
    }
}

fn arg<'a>(args: &'a Value, key: &str) -> &'a str {
    args[key].as_str().unwrap_or_else(|| panic!("missing string arg {key}"))
}

/// Dispatch a vector's `op` to the matching builder.
fn build(c: &HeroClient, op: &str, args: &Value) -> HttpRequest {
    match op {
        "createSpace" => c
            .build_create_space(arg(args, "name"), args["isPublic"].as_bool().unwrap(), args["img"].as_str())
            .unwrap(),
        "getSpace" => c.build_get_space(arg(args, "spaceId")),
        "updateSpace" => c.build_update_space(arg(args, "spaceId"), &args["body"]).unwrap(),
        "listSpaces" => c.build_list_spaces(),
        "deleteSpace" => c.build_delete_space(arg(args, "spaceId")),
        "createList" => c
            .build_create_list(arg(args, "spaceId"), arg(args, "name"), arg(args, "color"))
            .unwrap(),
        "getList" => c.build_get_list(arg(args, "spaceId"), arg(args, "listId")),
        "updateList" => c
            .build_update_list(arg(args, "spaceId"), arg(args, "listId"), arg(args, "name"), arg(args, "color"))
            .unwrap(),
        "deleteList" => c.build_delete_list(arg(args, "spaceId"), arg(args, "listId")),
        "listLists" => c.build_list_lists(arg(args, "spaceId")),
        "createItem" => c.build_create_item(arg(args, "spaceId"), &args["body"]).unwrap(),
        "updateItem" => c
            .build_update_item(arg(args, "spaceId"), arg(args, "itemId"), &args["body"])
            .unwrap(),
        "getItem" => c.build_get_item(arg(args, "spaceId"), arg(args, "itemId")),
        "listItems" => c.build_list_items(arg(args, "spaceId"), arg(args, "listId")),
        "deleteItem" => c.build_delete_item(arg(args, "spaceId"), arg(args, "itemId")),
        "uploadImage" => c.build_upload_image(arg(args, "base64"), arg(args, "name")).unwrap(),
        other => panic!("unknown op: {other}"),
    }
}

#[test]
fn endpoint_test_vectors() {
    let raw = include_str!("../../test-vectors/endpoints.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = HeroClient::new(vectors["token"].as_str().unwrap());
    let expected_headers: Vec<(String, String)> = serde_json::from_value(vectors["expected_headers"].clone()).unwrap();

    let cases = vectors["cases"].as_array().unwrap();
    let ops: BTreeSet<&str> = cases.iter().map(|case| case["op"].as_str().unwrap()).collect();
    assert_eq!(ops.len(), 16, "every endpoint has a vector");

    for case in cases {
        let name = case["name"].as_str().unwrap();
        let expected_req = &case["expected_request"];

        let req = build(&c, case["op"].as_str().unwrap(), &case["args"]);
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.path, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: path");
        assert_eq!(req.headers, expected_headers, "{name}: headers");

        match &expected_req["body"] {
            Value::Null => assert!(req.body.is_none(), "{name}: body should be None"),
            expected => {
                let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
                assert_eq!(&body, expected, "{name}: body");
            }
        }
    }
}

#[test]
fn response_test_vectors() {
    let raw = include_str!("../../test-vectors/responses.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = HeroClient::new("T");
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let sim = &case["simulated_response"];
        let response = HttpResponse {
            status: sim["status"].as_u64().unwrap() as u16,
            headers: Vec::new(),
            body: sim["body"].as_str().unwrap().to_string(),
        };
        let result = c.parse_response(response);

        if let Some(status) = case.get("expected_error_status") {
            let err = result.unwrap_err();
            assert!(
                matches!(err, ApiError::Http { status: s } if u64::from(s) == status.as_u64().unwrap()),
                "{name}: expected HTTP error, got {err:?}"
            );
        } else {
            assert_eq!(result.unwrap(), case["expected_result"], "{name}: parsed result");
        }
    }
}
