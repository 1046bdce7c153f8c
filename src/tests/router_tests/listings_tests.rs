// Public catalog routes: listing search/filter, detail view, and the
// read-time normalization of legacy-shaped records.

use http::Method;

use crate::db::listings::{insert_listing, seed_demo_listings};
use crate::domain::listing::{Listing, TransactionType};
use crate::tests::utils::{dispatch, init_test_app, read_json, request};
use chrono::{TimeZone, Utc};

fn seeded_app() -> crate::router::App {
    let app = init_test_app();
    app.db
        .with_conn(|conn| seed_demo_listings(conn))
        .expect("seeding failed");
    app
}

#[test]
fn listings_come_back_newest_first() {
    let app = seeded_app();

    let resp = dispatch(&app, request(Method::GET, "/listings", None));
    let (status, body) = read_json(resp);

    assert_eq!(status, 200);
    assert_eq!(body["success"], true);

    let ids: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["3", "2", "1"]);
}

#[test]
fn read_normalization_migrates_legacy_property_types() {
    let app = seeded_app();

    let resp = dispatch(&app, request(Method::GET, "/listings", None));
    let (_, body) = read_json(resp);
    let data = body["data"].as_array().unwrap();

    // Seeds carry the legacy fine-grained types "Office" and "Villa".
    let office = data.iter().find(|l| l["id"] == "2").unwrap();
    assert_eq!(office["property_type"], "Office_Shop");

    let villa = data.iter().find(|l| l["id"] == "3").unwrap();
    assert_eq!(villa["property_type"], "House_Villa");
}

#[test]
fn sale_filter_with_min_price_returns_only_the_office_building() {
    let app = seeded_app();

    let resp = dispatch(
        &app,
        request(
            Method::GET,
            "/listings?transaction_type=sale&minPrice=3000000000",
            None,
        ),
    );
    let (status, body) = read_json(resp);

    assert_eq!(status, 200);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["id"], "2");
    assert_eq!(data[0]["price"], 5_000_000_000i64);
}

#[test]
fn search_matches_either_field_case_insensitively() {
    let app = seeded_app();

    // "villa" only appears in the description of listing 3 ("Luxury Villa").
    let resp = dispatch(&app, request(Method::GET, "/listings?search=villa", None));
    let (_, body) = read_json(resp);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["id"], "3");

    // "빌라" (percent-encoded) appears in the title of the same listing.
    let resp = dispatch(
        &app,
        request(Method::GET, "/listings?search=%EB%B9%8C%EB%9D%BC", None),
    );
    let (_, body) = read_json(resp);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["id"], "3");
}

#[test]
fn unknown_transaction_type_returns_an_empty_result() {
    let app = seeded_app();

    let resp = dispatch(
        &app,
        request(Method::GET, "/listings?transaction_type=lease", None),
    );
    let (status, body) = read_json(resp);

    // Exact-match equality on the raw value, so "lease" excludes every
    // listing instead of being ignored.
    assert_eq!(status, 200);
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[test]
fn malformed_numeric_filters_fail_open() {
    let app = seeded_app();

    let resp = dispatch(
        &app,
        request(Method::GET, "/listings?minPrice=abc&maxArea=", None),
    );
    let (status, body) = read_json(resp);

    assert_eq!(status, 200);
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
}

#[test]
fn detail_view_returns_the_listing_or_404() {
    let app = seeded_app();

    let resp = dispatch(&app, request(Method::GET, "/listings/1", None));
    let (status, body) = read_json(resp);
    assert_eq!(status, 200);
    assert_eq!(body["data"]["title"], "호치민 1구역 럭셔리 아파트");

    let resp = dispatch(&app, request(Method::GET, "/listings/does-not-exist", None));
    let (status, body) = read_json(resp);
    assert_eq!(status, 404);
    assert_eq!(body["success"], false);
}

#[test]
fn legacy_region_and_blob_images_are_normalized_on_read() {
    let app = init_test_app();

    // A record written under the old schema: deprecated region label and
    // a transient blob reference alongside a real URL.
    let created = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
    let legacy = Listing {
        id: "legacy-1".to_string(),
        title: "호치민 구도심 주택".to_string(),
        description: "구도심의 전통 주택입니다.".to_string(),
        price: 900_000_000,
        area: 120,
        region: "호치민시".to_string(),
        transaction_type: TransactionType::Sale,
        property_type: "House".to_string(),
        images: vec![
            "blob:http://localhost:3000/91b2-4a77".to_string(),
            "https://example.com/house.jpg".to_string(),
        ],
        created_at: created,
        updated_at: created,
    };
    app.db
        .with_conn(|conn| insert_listing(conn, &legacy))
        .unwrap();

    let resp = dispatch(&app, request(Method::GET, "/listings/legacy-1", None));
    let (status, body) = read_json(resp);

    assert_eq!(status, 200);
    assert_eq!(body["data"]["region"], "호치민");
    assert_eq!(body["data"]["property_type"], "House_Villa");
    assert_eq!(
        body["data"]["images"],
        serde_json::json!(["https://example.com/house.jpg"])
    );
}

#[test]
fn unknown_routes_get_a_404_envelope() {
    let app = seeded_app();

    let resp = dispatch(&app, request(Method::GET, "/nope", None));
    let (status, body) = read_json(resp);
    assert_eq!(status, 404);
    assert_eq!(body["success"], false);
}
