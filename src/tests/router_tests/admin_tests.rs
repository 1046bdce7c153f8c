// Admin routes: login/logout and the authenticated mutation flows.

use http::Method;
use serde_json::json;

use crate::tests::utils::{dispatch, init_test_app, json_request, login_as_admin, read_json, request};

fn valid_payload() -> serde_json::Value {
    json!({
        "title": "푸꾸옥 리조트 빌라",
        "description": "푸꾸옥 해변 리조트 단지 내 빌라입니다.",
        "price": 3_200_000_000i64,
        "area": 180,
        "region": "푸꾸옥",
        "transaction_type": "sale",
        "property_type": "House_Villa",
        "images": ["https://example.com/resort.jpg"]
    })
}

#[test]
fn login_requires_both_fields() {
    let app = init_test_app();

    let resp = dispatch(
        &app,
        json_request(Method::POST, "/admin/login", None, &json!({ "username": "admin" })),
    );
    let (status, body) = read_json(resp);
    assert_eq!(status, 400);
    assert_eq!(body["success"], false);
}

#[test]
fn login_rejects_wrong_credentials() {
    let app = init_test_app();

    let resp = dispatch(
        &app,
        json_request(
            Method::POST,
            "/admin/login",
            None,
            &json!({ "username": "admin", "password": "guess" }),
        ),
    );
    let (status, body) = read_json(resp);
    assert_eq!(status, 401);
    assert_eq!(body["success"], false);
}

#[test]
fn login_issues_an_opaque_token() {
    let app = init_test_app();
    let token = login_as_admin(&app);
    assert!(token.len() >= 40);
}

#[test]
fn mutations_require_a_session() {
    let app = init_test_app();

    let resp = dispatch(
        &app,
        json_request(Method::POST, "/listings", None, &valid_payload()),
    );
    let (status, body) = read_json(resp);
    assert_eq!(status, 401);
    assert_eq!(body["success"], false);

    // A made-up token is just as unauthenticated as none.
    let resp = dispatch(
        &app,
        json_request(Method::POST, "/listings", Some("forged-token"), &valid_payload()),
    );
    let (status, _) = read_json(resp);
    assert_eq!(status, 401);
}

#[test]
fn create_returns_the_new_listing() {
    let app = init_test_app();
    let token = login_as_admin(&app);

    let resp = dispatch(
        &app,
        json_request(Method::POST, "/listings", Some(&token), &valid_payload()),
    );

    assert_eq!(
        resp.headers().get("Cache-Control").and_then(|v| v.to_str().ok()),
        Some("no-store")
    );

    let (status, body) = read_json(resp);
    assert_eq!(status, 201);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["title"], "푸꾸옥 리조트 빌라");
    assert_eq!(body["data"]["created_at"], body["data"]["updated_at"]);

    // And it is now served by the catalog.
    let id = body["data"]["id"].as_str().unwrap();
    let resp = dispatch(&app, request(Method::GET, &format!("/listings/{id}"), None));
    let (status, _) = read_json(resp);
    assert_eq!(status, 200);
}

#[test]
fn create_rejects_zero_price_naming_the_field() {
    let app = init_test_app();
    let token = login_as_admin(&app);

    let mut payload = valid_payload();
    payload["price"] = json!(0);

    let resp = dispatch(
        &app,
        json_request(Method::POST, "/listings", Some(&token), &payload),
    );
    let (status, body) = read_json(resp);

    assert_eq!(status, 400);
    assert_eq!(body["success"], false);
    assert!(
        body["error"].as_str().unwrap().contains("price"),
        "error should name the invalid field: {body}"
    );
}

#[test]
fn create_normalizes_the_payload_before_persisting() {
    let app = init_test_app();
    let token = login_as_admin(&app);

    let mut payload = valid_payload();
    payload["region"] = json!("호치민시");
    payload["property_type"] = json!("Shop");
    payload["images"] = json!([
        "blob:http://localhost:3000/71aa-0c2e",
        "data:image/jpeg;base64,/9j/4AAQ"
    ]);

    let resp = dispatch(
        &app,
        json_request(Method::POST, "/listings", Some(&token), &payload),
    );
    let (status, body) = read_json(resp);

    assert_eq!(status, 201);
    assert_eq!(body["data"]["region"], "호치민");
    assert_eq!(body["data"]["property_type"], "Office_Shop");
    assert_eq!(
        body["data"]["images"],
        json!(["data:image/jpeg;base64,/9j/4AAQ"])
    );
}

#[test]
fn update_replaces_fields_and_refreshes_updated_at() {
    let app = init_test_app();
    let token = login_as_admin(&app);

    let resp = dispatch(
        &app,
        json_request(Method::POST, "/listings", Some(&token), &valid_payload()),
    );
    let (_, body) = read_json(resp);
    let id = body["data"]["id"].as_str().unwrap().to_string();
    let created_at = body["data"]["created_at"].as_str().unwrap().to_string();

    let mut payload = valid_payload();
    payload["title"] = json!("푸꾸옥 리조트 빌라 (가격 인하)");
    payload["price"] = json!(2_900_000_000i64);

    let resp = dispatch(
        &app,
        json_request(Method::PUT, &format!("/listings/{id}"), Some(&token), &payload),
    );
    let (status, body) = read_json(resp);

    assert_eq!(status, 200);
    assert_eq!(body["data"]["title"], "푸꾸옥 리조트 빌라 (가격 인하)");
    assert_eq!(body["data"]["price"], 2_900_000_000i64);
    assert_eq!(body["data"]["created_at"], created_at.as_str());

    let created: chrono::DateTime<chrono::Utc> = created_at.parse().unwrap();
    let updated: chrono::DateTime<chrono::Utc> =
        body["data"]["updated_at"].as_str().unwrap().parse().unwrap();
    assert!(updated >= created);
}

#[test]
fn update_unknown_id_is_404() {
    let app = init_test_app();
    let token = login_as_admin(&app);

    let resp = dispatch(
        &app,
        json_request(
            Method::PUT,
            "/listings/does-not-exist",
            Some(&token),
            &valid_payload(),
        ),
    );
    let (status, _) = read_json(resp);
    assert_eq!(status, 404);
}

#[test]
fn delete_then_get_is_404_and_repeat_delete_fails() {
    let app = init_test_app();
    let token = login_as_admin(&app);

    let resp = dispatch(
        &app,
        json_request(Method::POST, "/listings", Some(&token), &valid_payload()),
    );
    let (_, body) = read_json(resp);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let resp = dispatch(
        &app,
        request(Method::DELETE, &format!("/listings/{id}"), Some(&token)),
    );
    let (status, body) = read_json(resp);
    assert_eq!(status, 200);
    assert_eq!(body["message"], "Property deleted successfully");

    let resp = dispatch(&app, request(Method::GET, &format!("/listings/{id}"), None));
    let (status, _) = read_json(resp);
    assert_eq!(status, 404);

    let resp = dispatch(
        &app,
        request(Method::DELETE, &format!("/listings/{id}"), Some(&token)),
    );
    let (status, _) = read_json(resp);
    assert_eq!(status, 404);
}

#[test]
fn logout_revokes_the_session() {
    let app = init_test_app();
    let token = login_as_admin(&app);

    let resp = dispatch(&app, request(Method::POST, "/admin/logout", Some(&token)));
    let (status, _) = read_json(resp);
    assert_eq!(status, 200);

    let resp = dispatch(
        &app,
        json_request(Method::POST, "/listings", Some(&token), &valid_payload()),
    );
    let (status, _) = read_json(resp);
    assert_eq!(status, 401);
}

#[test]
fn malformed_json_body_is_a_400() {
    let app = init_test_app();
    let token = login_as_admin(&app);

    let req = http::Request::builder()
        .method(Method::POST)
        .uri("/listings")
        .header("Authorization", format!("Bearer {token}"))
        .body(astra::Body::from("{not json".to_string()))
        .unwrap();

    let resp = dispatch(&app, req);
    let (status, body) = read_json(resp);
    assert_eq!(status, 400);
    assert_eq!(body["success"], false);
}
