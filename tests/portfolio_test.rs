mod common;

use common::spawn_app;
use serde_json::{json, Value};

const AUTH: &str = "Bearer anything";

async fn create_item(app: &common::TestApp, body: Value) -> reqwest::Response {
    app.client
        .post(app.url("/api/portfolio/items"))
        .header("Authorization", AUTH)
        .json(&body)
        .send()
        .await
        .unwrap()
}

async fn list_items(app: &common::TestApp) -> Vec<Value> {
    let body: Value = app
        .client
        .get(app.url("/api/portfolio/items"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    body["items"].as_array().unwrap().clone()
}

#[tokio::test]
async fn items_are_listed_by_display_order() {
    let app = spawn_app().await;
    for (title, order) in [("Back Yard", 2), ("Front Yard", 0), ("Side Yard", 1)] {
        let response = create_item(
            &app,
            json!({ "title": title, "image_url": "/api/images/serve/x.png", "display_order": order }),
        )
        .await;
        assert_eq!(response.status(), 201);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["success"], true);
        assert!(body["item"]["id"].as_str().is_some());
    }

    let titles: Vec<String> = list_items(&app)
        .await
        .iter()
        .map(|item| item["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["Front Yard", "Side Yard", "Back Yard"]);
}

#[tokio::test]
async fn camel_case_fields_are_accepted() {
    let app = spawn_app().await;
    let response = create_item(
        &app,
        json!({ "title": "Hedges", "subtitle": "Trimmed", "imageUrl": "/h.png", "displayOrder": 3 }),
    )
    .await;
    assert_eq!(response.status(), 201);

    let items = list_items(&app).await;
    assert_eq!(items[0]["imageUrl"], "/h.png");
    assert_eq!(items[0]["subtitle"], "Trimmed");
    assert_eq!(items[0]["displayOrder"], 3);
}

#[tokio::test]
async fn title_and_image_are_required() {
    let app = spawn_app().await;
    for body in [
        json!({ "image_url": "/x.png" }),
        json!({ "title": "No Image" }),
        json!({ "title": "  ", "image_url": "/x.png" }),
    ] {
        let response = create_item(&app, body).await;
        assert_eq!(response.status(), 400);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Title and image_url are required");
    }
    assert_eq!(app.count("portfolio_items").await, 0);
}

#[tokio::test]
async fn delete_removes_item_and_requires_id() {
    let app = spawn_app().await;
    let body: Value = create_item(&app, json!({ "title": "Lawn", "image_url": "/l.png" }))
        .await
        .json()
        .await
        .unwrap();
    let id = body["item"]["id"].as_str().unwrap().to_string();

    let response = app
        .client
        .delete(app.url("/api/portfolio/items"))
        .header("Authorization", AUTH)
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "ID is required");

    let response = app
        .client
        .delete(app.url("/api/portfolio/items"))
        .header("Authorization", AUTH)
        .json(&json!({ "id": id }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert!(list_items(&app).await.is_empty());

    // Deleting again is still a success.
    let response = app
        .client
        .delete(app.url("/api/portfolio/items"))
        .header("Authorization", AUTH)
        .json(&json!({ "id": id }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}
