//! API integration tests
//!
//! These run against a live server with a migrated database:
//! `cargo run` in one terminal, then `cargo test -- --ignored`.

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Create a member with a unique email, return its id
async fn create_member(client: &Client) -> i64 {
    let email = format!(
        "reader-{}@example.org",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    );

    let response = client
        .post(format!("{}/members", BASE_URL))
        .json(&json!({ "name": "Test Reader", "email": email }))
        .send()
        .await
        .expect("Failed to create member");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse member");
    body["id"].as_i64().expect("No member ID")
}

/// Create a book, return its id
async fn create_book(client: &Client, title: &str) -> i64 {
    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({ "title": title, "author": "Test Author" }))
        .send()
        .await
        .expect("Failed to create book");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse book");
    body["id"].as_i64().expect("No book ID")
}

async fn get_book(client: &Client, id: i64) -> Value {
    client
        .get(format!("{}/books/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to fetch book")
        .json()
        .await
        .expect("Failed to parse book")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_list_books() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body.is_array());
}

#[tokio::test]
#[ignore]
async fn test_create_member_duplicate_email_conflicts() {
    let client = Client::new();

    let email = format!(
        "dup-{}@example.org",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    );

    let response = client
        .post(format!("{}/members", BASE_URL))
        .json(&json!({ "name": "First", "email": email }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/members", BASE_URL))
        .json(&json!({ "name": "Second", "email": email }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_create_member_invalid_email_rejected() {
    let client = Client::new();

    let response = client
        .post(format!("{}/members", BASE_URL))
        .json(&json!({ "name": "Bad Email", "email": "not-an-email" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_borrow_and_return_cycle() {
    let client = Client::new();
    let member_id = create_member(&client).await;
    let book_id = create_book(&client, "Borrow Cycle").await;

    // New book is available
    let book = get_book(&client, book_id).await;
    assert_eq!(book["available"], true);

    // Borrow it
    let response = client
        .post(format!("{}/borrowings", BASE_URL))
        .json(&json!({ "member_id": member_id, "book_id": book_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    let borrowing = &body["borrowing"];
    let borrow_id = borrowing["id"].as_i64().expect("No borrowing ID");
    assert_eq!(borrowing["book_id"].as_i64(), Some(book_id));
    assert_eq!(borrowing["member_id"].as_i64(), Some(member_id));
    assert!(borrowing["return_date"].is_null());

    // Availability flipped
    let book = get_book(&client, book_id).await;
    assert_eq!(book["available"], false);

    // Return it
    let response = client
        .post(format!("{}/borrowings/{}/return", BASE_URL, borrow_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "returned");
    assert!(body["borrowing"]["return_date"].is_string());

    // Availability restored
    let book = get_book(&client, book_id).await;
    assert_eq!(book["available"], true);
}

#[tokio::test]
#[ignore]
async fn test_borrow_unavailable_book_rejected() {
    let client = Client::new();
    let member_id = create_member(&client).await;
    let book_id = create_book(&client, "Already Out").await;

    let response = client
        .post(format!("{}/borrowings", BASE_URL))
        .json(&json!({ "member_id": member_id, "book_id": book_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    // Second borrow of the same book is rejected, state untouched
    let response = client
        .post(format!("{}/borrowings", BASE_URL))
        .json(&json!({ "member_id": member_id, "book_id": book_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["reason"], "unavailable");

    let book = get_book(&client, book_id).await;
    assert_eq!(book["available"], false);
}

#[tokio::test]
#[ignore]
async fn test_borrow_nonexistent_book_rejected() {
    let client = Client::new();
    let member_id = create_member(&client).await;

    let response = client
        .post(format!("{}/borrowings", BASE_URL))
        .json(&json!({ "member_id": member_id, "book_id": 999_999_999 }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["reason"], "not_found");
}

#[tokio::test]
#[ignore]
async fn test_return_twice_rejected() {
    let client = Client::new();
    let member_id = create_member(&client).await;
    let book_id = create_book(&client, "Returned Twice").await;

    let response = client
        .post(format!("{}/borrowings", BASE_URL))
        .json(&json!({ "member_id": member_id, "book_id": book_id }))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    let borrow_id = body["borrowing"]["id"].as_i64().expect("No borrowing ID");

    let response = client
        .post(format!("{}/borrowings/{}/return", BASE_URL, borrow_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let response = client
        .post(format!("{}/borrowings/{}/return", BASE_URL, borrow_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["reason"], "already_returned");

    // Closed borrowing stays closed, book stays available
    let book = get_book(&client, book_id).await;
    assert_eq!(book["available"], true);
}

#[tokio::test]
#[ignore]
async fn test_return_nonexistent_borrowing_rejected() {
    let client = Client::new();

    let response = client
        .post(format!("{}/borrowings/{}/return", BASE_URL, 999_999_999))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["reason"], "not_found");
}

#[tokio::test]
#[ignore]
async fn test_concurrent_borrows_exactly_one_wins() {
    let client = Client::new();
    let member_a = create_member(&client).await;
    let member_b = create_member(&client).await;
    let book_id = create_book(&client, "Contended").await;

    let first = client
        .post(format!("{}/borrowings", BASE_URL))
        .json(&json!({ "member_id": member_a, "book_id": book_id }))
        .send();
    let second = client
        .post(format!("{}/borrowings", BASE_URL))
        .json(&json!({ "member_id": member_b, "book_id": book_id }))
        .send();

    let (first, second) = tokio::join!(first, second);
    let statuses = [
        first.expect("First request failed").status(),
        second.expect("Second request failed").status(),
    ];

    let wins = statuses.iter().filter(|s| s.as_u16() == 201).count();
    let rejections = statuses.iter().filter(|s| s.as_u16() == 400).count();
    assert_eq!(wins, 1, "exactly one borrow should win, got {:?}", statuses);
    assert_eq!(rejections, 1);

    let book = get_book(&client, book_id).await;
    assert_eq!(book["available"], false);
}

#[tokio::test]
#[ignore]
async fn test_member_borrowings_listing() {
    let client = Client::new();
    let member_id = create_member(&client).await;
    let book_id = create_book(&client, "Listed").await;

    let response = client
        .post(format!("{}/borrowings", BASE_URL))
        .json(&json!({ "member_id": member_id, "book_id": book_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let response = client
        .get(format!("{}/members/{}/borrowings", BASE_URL, member_id))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let borrowings = body.as_array().expect("Expected array");
    assert_eq!(borrowings.len(), 1);
    assert_eq!(borrowings[0]["book_id"].as_i64(), Some(book_id));
}

#[tokio::test]
#[ignore]
async fn test_delete_member_with_open_borrowing_refused() {
    let client = Client::new();
    let member_id = create_member(&client).await;
    let book_id = create_book(&client, "Held On Delete").await;

    let response = client
        .post(format!("{}/borrowings", BASE_URL))
        .json(&json!({ "member_id": member_id, "book_id": book_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let borrow_id = body["borrowing"]["id"].as_i64().expect("No borrowing ID");

    let response = client
        .delete(format!("{}/members/{}", BASE_URL, member_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    // After returning, deletion goes through
    let response = client
        .post(format!("{}/borrowings/{}/return", BASE_URL, borrow_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let response = client
        .delete(format!("{}/members/{}", BASE_URL, member_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);
}
