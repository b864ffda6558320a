//! API integration tests against a running server

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api";

/// Suffix keeping emails unique across runs against the same database
fn unique() -> i64 {
    chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
}

async fn post(client: &Client, path: &str, body: Value) -> Value {
    let response = client
        .post(format!("{}/{}", BASE_URL, path))
        .json(&body)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK, "POST {}", path);
    response.json().await.expect("Failed to parse response")
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
async fn test_ready() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore]
async fn test_lending_flow() {
    let client = Client::new();

    let author = post(&client, "Authors", json!({"name": "Orwell", "nationality": "UK"})).await;
    let genre = post(&client, "Genres", json!({"genreName": "Dystopian"})).await;
    let book = post(
        &client,
        "Books",
        json!({
            "name": "1984",
            "authorId": author["authorId"],
            "genreId": genre["genreId"]
        }),
    )
    .await;
    assert_eq!(book["author"]["name"], "Orwell");

    let member = post(
        &client,
        "Members",
        json!({
            "name": "Alice",
            "email": format!("alice{}@example.org", unique()),
            "phoneNumber": "555-0100",
            "birthDate": "1990-05-17",
            "address": "1 Main St"
        }),
    )
    .await;

    let borrow = post(
        &client,
        "Borrows",
        json!({"memberId": member["memberId"], "bookId": book["bookId"]}),
    )
    .await;
    assert_eq!(borrow["isReturned"], false);

    let borrow_url = format!("{}/Borrows/{}", BASE_URL, borrow["borrowId"]);
    for _ in 0..2 {
        let response = client
            .put(&borrow_url)
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = response.json().await.expect("Failed to parse response");
        assert_eq!(body["isReturned"], true);
    }

    let response = client
        .delete(format!("{}/Authors/{}", BASE_URL, author["authorId"]))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore]
async fn test_signup_and_login() {
    let client = Client::new();
    let credentials = json!({
        "email": format!("librarian{}@example.org", unique()),
        "password": "open sesame"
    });

    post(&client, "Users/signup", credentials.clone()).await;

    let duplicate = client
        .post(format!("{}/Users/signup", BASE_URL))
        .json(&credentials)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    let login = post(&client, "Users/login", credentials).await;
    assert!(login["token"].is_string());
    assert_eq!(login["tokenType"], "Bearer");

    let token = login["token"].as_str().expect("No token in response");
    let me = client
        .get(format!("{}/Users/me", BASE_URL))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(me.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore]
async fn test_wrong_password_is_not_found() {
    let client = Client::new();

    let response = client
        .post(format!("{}/Users/login", BASE_URL))
        .json(&json!({"email": "nobody@example.org", "password": "wrong"}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_missing_member_is_not_found() {
    let client = Client::new();

    let response = client
        .get(format!("{}/Members/{}", BASE_URL, i32::MAX))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response.text().await.expect("Failed to read body");
    assert!(body.is_empty());
}
