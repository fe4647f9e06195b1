use axum::http::StatusCode;
use axum_test::TestServer;
use promo_axum::{config::AxumConfig, router};
use promo_sqlite::{Db, config::SqliteConfig};
use rstest::rstest;
use serde_json::{Value, json};
use time::format_description::well_known::Rfc3339;

mod app;
use app::TestApp;

/// A token granting read access only.
const VIEWER: &str = "view";
/// A token granting read and write access.
const ADMIN: &str = "view,manage";

async fn server() -> TestServer {
    let db = Db::open(&SqliteConfig::default()).await.unwrap();
    TestServer::new(router(TestApp(db), AxumConfig::default())).unwrap()
}

/// Create a product through the API and return its id.
async fn seed_product(server: &TestServer, name: &str, base_price: f64) -> String {
    let response = server
        .post("/products")
        .authorization_bearer(ADMIN)
        .json(&json!({ "name": name, "base_price": base_price }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()["id"].as_str().unwrap().to_owned()
}

fn bundle_body(name: &str, product_ids: &[&str], rule: Value, start: &str, end: &str) -> Value {
    json!({
        "name": name,
        "items": product_ids
            .iter()
            .map(|id| json!({ "product_id": id, "rule": rule }))
            .collect::<Vec<_>>(),
        "start": start,
        "end": end,
    })
}

#[tokio::test]
async fn test_health() {
    let server = server().await;
    let response = server.get("/health").await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_catalog_permissions() {
    let server = server().await;

    // A viewer may not create products.
    let response = server
        .post("/products")
        .authorization_bearer(VIEWER)
        .json(&json!({ "name": "Laptop", "base_price": 100.0 }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    // A nonsense token may not read them.
    let response = server
        .get("/products")
        .authorization_bearer("intruder")
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    // A viewer may.
    let response = server.get("/products").authorization_bearer(VIEWER).await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_catalog_crud() {
    let server = server().await;

    // Negative prices are rejected up front.
    let response = server
        .post("/products")
        .authorization_bearer(ADMIN)
        .json(&json!({ "name": "Broken", "base_price": -1.0 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let laptop = seed_product(&server, "Laptop", 749.99).await;

    let response = server
        .get(&format!("/products/{laptop}"))
        .authorization_bearer(VIEWER)
        .await;
    response.assert_status_ok();
    let fetched = response.json::<Value>();
    assert_eq!(fetched["data"]["name"], "Laptop");
    assert_eq!(fetched["data"]["base_price"], 749.99);

    let response = server
        .get(&format!("/products/{}", uuid::Uuid::new_v4()))
        .authorization_bearer(VIEWER)
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let response = server.get("/products").authorization_bearer(VIEWER).await;
    assert_eq!(response.json::<Value>().as_array().unwrap().len(), 1);
}

#[rstest]
#[case::overlapping("2024-01-05T00:00:00Z", "2024-01-15T00:00:00Z", StatusCode::CONFLICT)]
#[case::touching("2024-01-10T00:00:00Z", "2024-01-20T00:00:00Z", StatusCode::CREATED)]
#[case::disjoint("2024-02-01T00:00:00Z", "2024-02-10T00:00:00Z", StatusCode::CREATED)]
#[tokio::test]
async fn test_second_bundle_on_same_product(
    #[case] start: &str,
    #[case] end: &str,
    #[case] expected: StatusCode,
) {
    let server = server().await;
    let laptop = seed_product(&server, "Laptop", 100.0).await;

    let response = server
        .post("/bundles")
        .authorization_bearer(ADMIN)
        .json(&bundle_body(
            "January Week One",
            &[&laptop],
            json!({ "kind": "fixed", "amount": 30.0 }),
            "2024-01-01T00:00:00Z",
            "2024-01-10T00:00:00Z",
        ))
        .await;
    response.assert_status(StatusCode::CREATED);

    let response = server
        .post("/bundles")
        .authorization_bearer(ADMIN)
        .json(&bundle_body(
            "Second",
            &[&laptop],
            json!({ "kind": "percentage", "percent": 10.0 }),
            start,
            end,
        ))
        .await;
    response.assert_status(expected);

    if expected == StatusCode::CONFLICT {
        // The error payload names the conflicting bundle and product.
        let message = response.text();
        assert!(message.contains("January Week One"), "got: {message}");
        assert!(message.contains("Laptop"), "got: {message}");
    }
}

#[tokio::test]
async fn test_invalid_bundles_rejected() {
    let server = server().await;
    let laptop = seed_product(&server, "Laptop", 100.0).await;

    // No items.
    let response = server
        .post("/bundles")
        .authorization_bearer(ADMIN)
        .json(&bundle_body(
            "Empty",
            &[],
            json!(null),
            "2024-01-01T00:00:00Z",
            "2024-01-10T00:00:00Z",
        ))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    // Inverted window.
    let response = server
        .post("/bundles")
        .authorization_bearer(ADMIN)
        .json(&bundle_body(
            "Inverted",
            &[&laptop],
            json!({ "kind": "fixed", "amount": 1.0 }),
            "2024-01-10T00:00:00Z",
            "2024-01-01T00:00:00Z",
        ))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    // Duplicate product.
    let response = server
        .post("/bundles")
        .authorization_bearer(ADMIN)
        .json(&bundle_body(
            "Twice",
            &[&laptop, &laptop],
            json!({ "kind": "fixed", "amount": 1.0 }),
            "2024-01-01T00:00:00Z",
            "2024-01-10T00:00:00Z",
        ))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    // A viewer may not create bundles at all.
    let response = server
        .post("/bundles")
        .authorization_bearer(VIEWER)
        .json(&bundle_body(
            "Sneaky",
            &[&laptop],
            json!({ "kind": "fixed", "amount": 1.0 }),
            "2024-01-01T00:00:00Z",
            "2024-01-10T00:00:00Z",
        ))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_update_bundle() {
    let server = server().await;
    let laptop = seed_product(&server, "Laptop", 100.0).await;

    let response = server
        .post("/bundles")
        .authorization_bearer(ADMIN)
        .json(&bundle_body(
            "January",
            &[&laptop],
            json!({ "kind": "fixed", "amount": 30.0 }),
            "2024-01-01T00:00:00Z",
            "2024-01-10T00:00:00Z",
        ))
        .await;
    response.assert_status(StatusCode::CREATED);
    let created = response.json::<Value>();
    let bundle_id = created["id"].as_str().unwrap().to_owned();

    // Stretching the bundle's own window does not conflict with itself.
    let response = server
        .put(&format!("/bundles/{bundle_id}"))
        .authorization_bearer(ADMIN)
        .json(&bundle_body(
            "January, extended",
            &[&laptop],
            json!({ "kind": "fixed", "amount": 30.0 }),
            "2024-01-01T00:00:00Z",
            "2024-01-15T00:00:00Z",
        ))
        .await;
    response.assert_status_ok();
    let updated = response.json::<Value>();
    assert_eq!(updated["data"]["name"], "January, extended");
    // created_at survives the update.
    assert_eq!(updated["created_at"], created["created_at"]);

    // Unknown ids are distinguished from validation failures.
    let response = server
        .put(&format!("/bundles/{}", uuid::Uuid::new_v4()))
        .authorization_bearer(ADMIN)
        .json(&bundle_body(
            "Ghost",
            &[&laptop],
            json!({ "kind": "fixed", "amount": 30.0 }),
            "2024-03-01T00:00:00Z",
            "2024-03-10T00:00:00Z",
        ))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_bundles_enriched() {
    let server = server().await;
    let laptop = seed_product(&server, "Laptop", 100.0).await;
    let monitor = seed_product(&server, "Monitor", 200.0).await;

    // A window straddling the present, so the bundle reads as active.
    let now = time::OffsetDateTime::now_utc();
    let start = (now - time::Duration::hours(1)).format(&Rfc3339).unwrap();
    let end = (now + time::Duration::hours(1)).format(&Rfc3339).unwrap();

    let response = server
        .post("/bundles")
        .authorization_bearer(ADMIN)
        .json(&json!({
            "name": "Flash Sale",
            "description": "Two hours only",
            "items": [
                { "product_id": laptop, "rule": { "kind": "fixed", "amount": 30.0 } },
                { "product_id": monitor, "rule": { "kind": "percentage", "percent": 50.0 } },
            ],
            "start": start,
            "end": end,
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let bundle_id = response.json::<Value>()["id"].as_str().unwrap().to_owned();

    let response = server.get("/bundles").authorization_bearer(VIEWER).await;
    response.assert_status_ok();
    let bundles = response.json::<Value>();
    let listed = &bundles.as_array().unwrap()[0];

    assert_eq!(listed["status"], "active");
    assert_eq!(listed["items"][0]["product"]["data"]["name"], "Laptop");
    assert_eq!(listed["items"][0]["final_price"], 70.0);
    assert_eq!(listed["items"][1]["final_price"], 100.0);
    assert_eq!(listed["summary"]["regular_total"], 300.0);
    assert_eq!(listed["summary"]["promo_total"], 170.0);
    assert_eq!(listed["summary"]["total_savings"], 130.0);

    // The individual read returns the same enrichment.
    let response = server
        .get(&format!("/bundles/{bundle_id}"))
        .authorization_bearer(VIEWER)
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "active");

    let response = server
        .get(&format!("/bundles/{}", uuid::Uuid::new_v4()))
        .authorization_bearer(VIEWER)
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_check_probe() {
    let server = server().await;
    let laptop = seed_product(&server, "Laptop", 100.0).await;

    let response = server
        .post("/bundles")
        .authorization_bearer(ADMIN)
        .json(&bundle_body(
            "January",
            &[&laptop],
            json!({ "kind": "fixed", "amount": 30.0 }),
            "2024-01-01T00:00:00Z",
            "2024-01-10T00:00:00Z",
        ))
        .await;
    response.assert_status(StatusCode::CREATED);
    let bundle_id = response.json::<Value>()["id"].as_str().unwrap().to_owned();

    // An overlapping candidate reports the conflict without persisting.
    let candidate = bundle_body(
        "Probe",
        &[&laptop],
        json!({ "kind": "percentage", "percent": 10.0 }),
        "2024-01-05T00:00:00Z",
        "2024-01-15T00:00:00Z",
    );
    let response = server
        .post("/bundles/check")
        .authorization_bearer(VIEWER)
        .json(&json!({ "bundle": candidate }))
        .await;
    response.assert_status_ok();
    let probed = response.json::<Value>();
    assert!(probed["conflict"].as_str().unwrap().contains("January"));

    // Excluding the bundle being edited clears the conflict.
    let response = server
        .post("/bundles/check")
        .authorization_bearer(VIEWER)
        .json(&json!({ "bundle": candidate, "exclude": bundle_id }))
        .await;
    response.assert_status_ok();
    assert!(response.json::<Value>()["conflict"].is_null());

    // Nothing was persisted by any probe.
    let response = server.get("/bundles").authorization_bearer(VIEWER).await;
    assert_eq!(response.json::<Value>().as_array().unwrap().len(), 1);
}
