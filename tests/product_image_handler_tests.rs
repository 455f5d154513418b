
use std::sync::Arc;

use actix_web::{http::StatusCode, test};
use ecommerce_backend::constants::MAX_UPLOAD_SIZE;
use serde_json::Value;
use test_utils::*;

#[actix_rt::test]
async fn upload_stores_the_file_and_returns_a_static_url() {
    let ctx = TestApp::new(InMemoryProductRepo::default());
    let app = init_app(ctx.state()).await;

    let resp = test::call_service(&app, png_upload("/api/v1/products/upload-image", b"png bytes")).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Image uploaded successfully");

    let url = body["image_url"].as_str().unwrap();
    assert!(url.starts_with("/static/"));
    assert!(url.ends_with(".png"));
    assert_eq!(std::fs::read(ctx.upload_path(url)).unwrap(), b"png bytes");
}

#[actix_rt::test]
async fn upload_ignores_other_form_fields() {
    let ctx = TestApp::new(InMemoryProductRepo::default());
    let app = init_app(ctx.state()).await;

    let body = multipart_body(vec![
        text_part("name", "Trail Runner"),
        file_part("thumbnail", "thumb.png", "image/png", b"thumb"),
        file_part("image", "shoe.JPG", "image/jpeg", b"jpeg bytes"),
    ]);
    let resp = test::call_service(&app, multipart_request("/api/v1/products/upload-image", body)).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let url = body["image_url"].as_str().unwrap();
    assert!(url.ends_with(".jpg"));
    assert_eq!(std::fs::read(ctx.upload_path(url)).unwrap(), b"jpeg bytes");
    assert_eq!(ctx.stored_files(), 1);
}

#[actix_rt::test]
async fn upload_rejects_unsupported_extension() {
    let ctx = TestApp::new(InMemoryProductRepo::default());
    let app = init_app(ctx.state()).await;

    let body = multipart_body(vec![file_part("image", "shoe.bmp", "image/png", b"bmp")]);
    let resp = test::call_service(&app, multipart_request("/api/v1/products/upload-image", body)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().starts_with("Invalid image"));
    assert_eq!(ctx.stored_files(), 0);
}

#[actix_rt::test]
async fn upload_rejects_unsupported_content_type() {
    let ctx = TestApp::new(InMemoryProductRepo::default());
    let app = init_app(ctx.state()).await;

    let body = multipart_body(vec![file_part("image", "shoe.png", "text/plain", b"text")]);
    let resp = test::call_service(&app, multipart_request("/api/v1/products/upload-image", body)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(ctx.stored_files(), 0);
}

#[actix_rt::test]
async fn upload_without_image_field_is_a_bad_form() {
    let ctx = TestApp::new(InMemoryProductRepo::default());
    let app = init_app(ctx.state()).await;

    let body = multipart_body(vec![text_part("name", "Trail Runner")]);
    let resp = test::call_service(&app, multipart_request("/api/v1/products/upload-image", body)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid form data");
}

#[actix_rt::test]
async fn upload_rejects_bodies_over_the_limit() {
    let ctx = TestApp::new(InMemoryProductRepo::default());
    let app = init_app(ctx.state()).await;

    let oversized = vec![0u8; MAX_UPLOAD_SIZE + 1];
    let resp = test::call_service(&app, png_upload("/api/v1/products/upload-image", &oversized)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid form data");
    assert_eq!(ctx.stored_files(), 0);
}

#[actix_rt::test]
async fn update_replaces_the_image_and_removes_the_old_file() {
    let ctx = TestApp::new(InMemoryProductRepo::default());
    std::fs::create_dir_all(&ctx.upload_dir).unwrap();
    std::fs::write(ctx.upload_dir.join("old_1.png"), b"old").unwrap();
    ctx.repo.insert(PRODUCT_ID, Some("/static/old_1.png"));
    let app = init_app(ctx.state()).await;

    let uri = format!("/api/v1/products/{PRODUCT_ID}/image");
    let resp = test::call_service(&app, png_upload(&uri, b"new bytes")).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Product image updated successfully");

    let url = body["image_url"].as_str().unwrap();
    assert_eq!(ctx.repo.image_url(PRODUCT_ID).as_deref(), Some(url));
    assert_eq!(std::fs::read(ctx.upload_path(url)).unwrap(), b"new bytes");
    assert!(!exists(&ctx.upload_dir.join("old_1.png")));
}

#[actix_rt::test]
async fn update_succeeds_when_the_old_image_is_already_gone() {
    let ctx = TestApp::new(InMemoryProductRepo::default());
    ctx.repo.insert(PRODUCT_ID, Some("https://cdn.example.com/legacy.png"));
    let app = init_app(ctx.state()).await;

    let uri = format!("/api/v1/products/{PRODUCT_ID}/image");
    let resp = test::call_service(&app, png_upload(&uri, b"new")).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let stored = ctx.repo.image_url(PRODUCT_ID).unwrap();
    assert!(stored.starts_with("/static/"));
}

#[actix_rt::test]
async fn update_of_unknown_product_is_not_found() {
    let ctx = TestApp::new(InMemoryProductRepo::default());
    let app = init_app(ctx.state()).await;

    let uri = format!("/api/v1/products/{PRODUCT_ID}/image");
    let resp = test::call_service(&app, png_upload(&uri, b"new")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Product not found");
    assert_eq!(ctx.stored_files(), 0);
}

#[actix_rt::test]
async fn update_with_invalid_image_leaves_the_product_alone() {
    let ctx = TestApp::new(InMemoryProductRepo::default());
    ctx.repo.insert(PRODUCT_ID, Some("/static/old_1.png"));
    let app = init_app(ctx.state()).await;

    let uri = format!("/api/v1/products/{PRODUCT_ID}/image");
    let body = multipart_body(vec![file_part("image", "shoe.tiff", "image/tiff", b"tiff")]);
    let resp = test::call_service(&app, multipart_request(&uri, body)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(ctx.repo.image_url(PRODUCT_ID).as_deref(), Some("/static/old_1.png"));
}

#[actix_rt::test]
async fn update_without_product_id_is_a_bad_request() {
    let ctx = TestApp::new(InMemoryProductRepo::default());
    ctx.repo.insert(PRODUCT_ID, None);
    let state = ctx.state().with_route_params(Arc::new(NoRouteParams));
    let app = init_app(state).await;

    let uri = format!("/api/v1/products/{PRODUCT_ID}/image");
    let resp = test::call_service(&app, png_upload(&uri, b"new")).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Product ID is required");
    assert_eq!(ctx.repo.image_url(PRODUCT_ID), None);
}

#[actix_rt::test]
async fn s3_routes_fail_when_s3_is_not_configured() {
    let ctx = TestApp::new(InMemoryProductRepo::default());
    let app = init_app(ctx.state()).await;

    let resp = test::call_service(&app, png_upload("/api/v1/s3/products/upload-image", b"x")).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Internal server error");
}

#[actix_rt::test]
async fn health_reports_database_status() {
    let ctx = TestApp::new(InMemoryProductRepo::default());
    let app = init_app(ctx.state()).await;

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["s3_storage"], "Not configured");

    let ctx = TestApp::new(InMemoryProductRepo::offline());
    let app = init_app(ctx.state()).await;

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}
