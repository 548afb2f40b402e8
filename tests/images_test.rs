mod common;

use common::spawn_app;
use greenline::blob_store::BlobStore;
use serde_json::{json, Value};

const AUTH: &str = "Bearer anything";
const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 1, 2, 3];

async fn upload_png(app: &common::TestApp) -> String {
    let response = app
        .upload(Some(AUTH), PNG_BYTES, "Front Yard.PNG", "image/png", None)
        .await;
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.unwrap();
    body["fileName"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn uploaded_image_is_served_back_unchanged() {
    let app = spawn_app().await;

    let response = app
        .upload(Some(AUTH), PNG_BYTES, "Front Yard.PNG", "image/png", None)
        .await;
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    let file_name = body["fileName"].as_str().unwrap();
    assert!(file_name.ends_with(".png"));
    assert_eq!(
        body["imageUrl"].as_str().unwrap(),
        format!("/api/images/serve/{file_name}")
    );

    let response = app
        .client
        .get(app.url(&format!("/api/images/serve/{file_name}")))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["content-type"], "image/png");
    assert_eq!(
        response.headers()["cache-control"],
        "public, max-age=31536000"
    );
    assert_eq!(response.bytes().await.unwrap().as_ref(), PNG_BYTES);
}

#[tokio::test]
async fn upload_without_image_field_is_rejected() {
    let app = spawn_app().await;
    let form = reqwest::multipart::Form::new().text("caption", "nothing attached");
    let response = app
        .client
        .post(app.url("/api/images/upload"))
        .header("Authorization", AUTH)
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "No image provided" }));
    assert!(app.blobs.is_empty().await);
}

#[tokio::test]
async fn upload_for_unknown_post_stores_nothing() {
    let app = spawn_app().await;
    let response = app
        .upload(Some(AUTH), PNG_BYTES, "a.png", "image/png", Some("no-such-post"))
        .await;
    assert_eq!(response.status(), 404);
    assert!(app.blobs.is_empty().await);
    assert_eq!(app.count("uploaded_images").await, 0);
    assert_eq!(app.count("blog_images").await, 0);
}

#[tokio::test]
async fn listed_images_carry_metadata() {
    let app = spawn_app().await;
    let file_name = upload_png(&app).await;

    let response = app
        .client
        .get(app.url("/api/images/list"))
        .header("Authorization", AUTH)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    let images = body["images"].as_array().unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0]["filename"], file_name.as_str());
    assert_eq!(images[0]["contentType"], "image/png");
    assert_eq!(images[0]["size"], PNG_BYTES.len());
    assert_eq!(
        images[0]["url"].as_str().unwrap(),
        format!("/api/images/serve/{file_name}")
    );
}

#[tokio::test]
async fn missing_image_is_not_found() {
    let app = spawn_app().await;
    let response = app
        .client
        .get(app.url("/api/images/serve/nope.png"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
    assert_eq!(response.text().await.unwrap(), "Image not found");
}

#[tokio::test]
async fn deleting_an_image_removes_blob_and_rows() {
    let app = spawn_app().await;
    let (post_id, slug) = app.seed_post("Patio", true).await;
    let response = app
        .upload(Some(AUTH), PNG_BYTES, "patio.png", "image/png", Some(&post_id))
        .await;
    let body: Value = response.json().await.unwrap();
    let file_name = body["fileName"].as_str().unwrap().to_string();
    assert_eq!(app.count("blog_images").await, 1);

    let response = app
        .client
        .delete(app.url(&format!("/api/images/delete/{file_name}")))
        .header("Authorization", AUTH)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    assert!(!app
        .blobs
        .exists(&format!("images/{file_name}"))
        .await
        .unwrap());
    assert_eq!(app.count("uploaded_images").await, 0);
    assert_eq!(app.count("blog_images").await, 0);

    let body: Value = app
        .client
        .get(app.url(&format!("/api/blog/{slug}")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["images"], json!([]));

    let response = app
        .client
        .get(app.url(&format!("/api/images/serve/{file_name}")))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn deleting_with_a_path_like_name_is_rejected() {
    let app = spawn_app().await;
    let response = app
        .client
        .delete(app.url("/api/images/delete/..%2Fsecret"))
        .header("Authorization", AUTH)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn align_requires_both_names() {
    let app = spawn_app().await;
    let response = app
        .client
        .post(app.url("/api/images/align"))
        .header("Authorization", AUTH)
        .json(&json!({ "beforeImageName": "a.png" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Both image names are required");
}

#[tokio::test]
async fn align_with_missing_blob_is_not_found() {
    let app = spawn_app().await;
    let before = upload_png(&app).await;
    let response = app
        .client
        .post(app.url("/api/images/align"))
        .header("Authorization", AUTH)
        .json(&json!({ "beforeImageName": before, "afterImageName": "gone.png" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn align_returns_urls_and_dimensions() {
    let app = spawn_app().await;
    let before = upload_png(&app).await;
    let after = upload_png(&app).await;

    let response = app
        .client
        .post(app.url("/api/images/align"))
        .header("Authorization", AUTH)
        .json(&json!({ "beforeImageName": before, "afterImageName": after, "width": 640 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["recommendedDimensions"], json!({ "width": 640, "height": 800 }));
    assert_eq!(body["beforeImage"]["filename"], before.as_str());
    assert!(body["beforeImage"]["url"]
        .as_str()
        .unwrap()
        .ends_with(&format!("/api/images/serve/{before}")));
    assert!(body["afterImage"]["url"]
        .as_str()
        .unwrap()
        .starts_with("http://127.0.0.1:"));
    assert_eq!(body["instructions"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn align_urls_follow_the_forwarded_scheme() {
    let app = spawn_app().await;
    let before = upload_png(&app).await;
    let after = upload_png(&app).await;

    let body: Value = app
        .client
        .post(app.url("/api/images/align"))
        .header("Authorization", AUTH)
        .header("Host", "greenline.example")
        .header("X-Forwarded-Proto", "https")
        .json(&json!({ "beforeImageName": before, "afterImageName": after }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        body["beforeImage"]["url"].as_str().unwrap(),
        format!("https://greenline.example/api/images/serve/{before}")
    );
    assert_eq!(
        body["recommendedDimensions"],
        json!({ "width": 1200, "height": 800 })
    );
}
