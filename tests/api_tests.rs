//! API integration tests against a running server (or gateway)
//!
//! Point `SHAREIT_TEST_URL` at the instance to test; defaults to the local server.

use chrono::{Duration, Local, Utc};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const USER_HEADER: &str = "X-Sharer-User-Id";

fn base_url() -> String {
    std::env::var("SHAREIT_TEST_URL").unwrap_or_else(|_| "http://localhost:9090".to_string())
}

fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, Utc::now().timestamp_nanos_opt().unwrap_or_default())
}

async fn create_user(client: &Client, name: &str) -> i64 {
    let response = client
        .post(format!("{}/users", base_url()))
        .json(&json!({
            "name": name,
            "email": format!("{}@example.com", unique(name)),
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_i64().expect("No id in response")
}

async fn create_item(client: &Client, owner: i64) -> i64 {
    add_item(client, owner, "Drill", "Cordless drill with two batteries", true).await
}

async fn add_item(
    client: &Client,
    owner: i64,
    name: &str,
    description: &str,
    available: bool,
) -> i64 {
    let response = client
        .post(format!("{}/items", base_url()))
        .header(USER_HEADER, owner)
        .json(&json!({
            "name": name,
            "description": description,
            "available": available,
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_i64().expect("No id in response")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", base_url()))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_duplicate_email_conflicts() {
    let client = Client::new();
    let email = format!("{}@example.com", unique("dup"));

    let first = client
        .post(format!("{}/users", base_url()))
        .json(&json!({"name": "First", "email": email}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = client
        .post(format!("{}/users", base_url()))
        .json(&json!({"name": "Second", "email": email.to_uppercase()}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore]
async fn test_booking_lifecycle() {
    let client = Client::new();
    let owner = create_user(&client, "owner").await;
    let booker = create_user(&client, "booker").await;
    let item = create_item(&client, owner).await;

    let now = Local::now().naive_local();
    let response = client
        .post(format!("{}/bookings", base_url()))
        .header(USER_HEADER, booker)
        .json(&json!({
            "itemId": item,
            "start": now + Duration::days(1),
            "end": now + Duration::days(2),
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let booking: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(booking["status"], "WAITING");
    let id = booking["id"].as_i64().expect("No id in response");

    let approved: Value = client
        .patch(format!("{}/bookings/{}?approved=true", base_url(), id))
        .header(USER_HEADER, owner)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(approved["status"], "APPROVED");

    let cancelled: Value = client
        .put(format!("{}/bookings/{}", base_url(), id))
        .header(USER_HEADER, booker)
        .json(&json!({"status": "CANCELLED"}))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(cancelled["status"], "CANCELLED");

    let future: Vec<Value> = client
        .get(format!("{}/bookings?state=future", base_url()))
        .header(USER_HEADER, booker)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert!(future.iter().any(|b| b["id"] == id));
}

#[tokio::test]
#[ignore]
async fn test_non_owner_cannot_update_item() {
    let client = Client::new();
    let owner = create_user(&client, "owner").await;
    let stranger = create_user(&client, "stranger").await;
    let item = create_item(&client, owner).await;

    let response = client
        .patch(format!("{}/items/{}", base_url(), item))
        .header(USER_HEADER, stranger)
        .json(&json!({"available": false}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore]
async fn test_comment_requires_completed_booking() {
    let client = Client::new();
    let owner = create_user(&client, "owner").await;
    let author = create_user(&client, "author").await;
    let item = create_item(&client, owner).await;

    let response = client
        .post(format!("{}/items/{}/comment", base_url(), item))
        .header(USER_HEADER, author)
        .json(&json!({"text": "Great drill"}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn test_search_blank_text_is_empty() {
    let client = Client::new();

    let items: Vec<Value> = client
        .get(format!("{}/items/search?text=", base_url()))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    assert!(items.is_empty());
}

#[tokio::test]
#[ignore]
async fn test_search_is_case_insensitive_and_skips_unavailable() {
    let client = Client::new();
    let owner = create_user(&client, "owner").await;
    let description = unique("shelf");

    let available = add_item(&client, owner, "Cordless DRILL", &description, true).await;
    let unavailable = add_item(&client, owner, "Cordless DRILL", &description, false).await;

    let items: Vec<Value> = client
        .get(format!("{}/items/search", base_url()))
        .query(&[("text", "drill")])
        .header(USER_HEADER, owner)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    assert!(items.iter().any(|i| i["id"] == available));
    assert!(items.iter().all(|i| i["id"] != unavailable));
    assert!(items.iter().all(|i| i["available"] == true));
}
