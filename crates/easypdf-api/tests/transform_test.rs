//! Transformation endpoint integration tests.
//!
//! Run with: `cargo test -p easypdf-api --test transform_test`

mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestResponse;
use bytes::Bytes;
use easypdf_processing::PageSelection;
use helpers::fixtures::{
    create_test_gif, create_test_jpeg, create_test_pdf, create_test_png, pdf_page_count,
};
use helpers::{setup_test_app, setup_test_app_with};
use image::{GenericImageView, ImageFormat};
use serde_json::{json, Value};

fn file_part(data: Vec<u8>, file_name: &str, mime_type: &str) -> Part {
    Part::bytes(Bytes::from(data))
        .file_name(file_name)
        .mime_type(mime_type)
}

fn single_file(field: &str, data: Vec<u8>, file_name: &str, mime_type: &str) -> MultipartForm {
    MultipartForm::new().add_part(field, file_part(data, file_name, mime_type))
}

/// Assert HTTP 200 with a success envelope and return its downloadUrl.
fn expect_success(response: &TestResponse) -> String {
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["success"], json!(true), "unexpected body: {}", body);
    body["downloadUrl"]
        .as_str()
        .expect("downloadUrl must be a string")
        .to_string()
}

/// Assert HTTP 200 with exactly `{"success":false}`.
fn expect_failure(response: &TestResponse) {
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body, json!({ "success": false }));
}

#[tokio::test]
async fn test_compress_image_writes_jpeg_and_removes_upload() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/image-compress")
        .multipart(single_file(
            "image",
            create_test_png(120, 80),
            "photo.png",
            "image/png",
        ))
        .await;

    let url = expect_success(&response);
    assert!(url.starts_with("/download/img-compress-"));
    assert!(url.ends_with(".jpg"));

    let artifact = app.read_artifact(&url);
    assert_eq!(image::guess_format(&artifact).unwrap(), ImageFormat::Jpeg);
    assert_eq!(image::load_from_memory(&artifact).unwrap().dimensions(), (120, 80));

    assert_eq!(app.output_files().len(), 1);
    assert!(app.staged_files().is_empty());
}

#[tokio::test]
async fn test_resize_keeps_aspect_ratio() {
    let app = setup_test_app().await;

    let form = single_file("image", create_test_jpeg(2000, 1000), "wide.jpg", "image/jpeg")
        .add_text("width", "500");
    let response = app.client().post("/api/image-resize").multipart(form).await;

    let url = expect_success(&response);
    assert!(url.starts_with("/download/img-resize-"));
    let resized = image::load_from_memory(&app.read_artifact(&url)).unwrap();
    assert_eq!(resized.dimensions(), (500, 250));
}

#[tokio::test]
async fn test_resize_rejects_bad_width() {
    let app = setup_test_app().await;

    for width in ["0", "abc", "-10"] {
        let form = single_file("image", create_test_jpeg(40, 20), "a.jpg", "image/jpeg")
            .add_text("width", width);
        let response = app.client().post("/api/image-resize").multipart(form).await;
        expect_failure(&response);
    }

    let response = app
        .client()
        .post("/api/image-resize")
        .multipart(single_file("image", create_test_jpeg(40, 20), "a.jpg", "image/jpeg"))
        .await;
    expect_failure(&response);

    assert!(app.output_files().is_empty());
}

#[tokio::test]
async fn test_resize_rejects_width_over_pixel_budget() {
    let app = setup_test_app().await;

    let form = single_file("image", create_test_png(2, 1), "tiny.png", "image/png")
        .add_text("width", "60000");
    let response = app.client().post("/api/image-resize").multipart(form).await;

    expect_failure(&response);
    assert!(app.output_files().is_empty());
}

#[tokio::test]
async fn test_unsafe_filename_fails() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/image-compress")
        .multipart(single_file("image", create_test_png(10, 10), "../evil.png", "image/png"))
        .await;

    expect_failure(&response);
    assert!(app.output_files().is_empty());
    assert!(app.staged_files().is_empty());
}

#[tokio::test]
async fn test_convert_png_to_jpg() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/jpg-png")
        .multipart(single_file("image", create_test_png(30, 20), "logo.PNG", "image/png"))
        .await;

    let url = expect_success(&response);
    assert!(url.starts_with("/download/png-to-jpg-"));
    assert!(url.ends_with(".jpg"));
    let artifact = app.read_artifact(&url);
    assert_eq!(image::guess_format(&artifact).unwrap(), ImageFormat::Jpeg);
}

#[tokio::test]
async fn test_convert_jpg_to_png() {
    let app = setup_test_app().await;

    for name in ["scan.jpg", "scan.jpeg"] {
        let response = app
            .client()
            .post("/api/jpg-png")
            .multipart(single_file("image", create_test_jpeg(30, 20), name, "image/jpeg"))
            .await;

        let url = expect_success(&response);
        assert!(url.starts_with("/download/jpg-to-png-"));
        assert!(url.ends_with(".png"));
        let artifact = app.read_artifact(&url);
        assert_eq!(image::guess_format(&artifact).unwrap(), ImageFormat::Png);
    }
}

#[tokio::test]
async fn test_convert_rejects_other_extensions() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/jpg-png")
        .multipart(single_file("image", create_test_gif(10, 10), "anim.gif", "image/gif"))
        .await;

    expect_failure(&response);
    assert!(app.output_files().is_empty());
}

#[tokio::test]
async fn test_wrong_field_name_fails() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/image-compress")
        .multipart(single_file("file", create_test_png(10, 10), "a.png", "image/png"))
        .await;
    expect_failure(&response);

    let response = app
        .client()
        .post("/api/pdf-to-jpg")
        .multipart(single_file("image", create_test_pdf(1), "doc.pdf", "application/pdf"))
        .await;
    expect_failure(&response);

    assert!(app.output_files().is_empty());
    assert!(app.staged_files().is_empty());
}

#[tokio::test]
async fn test_non_multipart_body_fails() {
    let app = setup_test_app().await;

    let response = app.client().post("/api/image-compress").text("hello").await;

    expect_failure(&response);
}

#[tokio::test]
async fn test_undecodable_image_fails_and_keeps_upload() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/image-compress")
        .multipart(single_file(
            "image",
            b"not really a png".to_vec(),
            "broken.png",
            "image/png",
        ))
        .await;

    expect_failure(&response);
    assert!(app.output_files().is_empty());
    assert_eq!(app.staged_files().len(), 1);
}

#[tokio::test]
async fn test_failed_upload_removed_when_not_retained() {
    let app = setup_test_app_with(|config| config.retain_failed_uploads = false).await;

    let response = app
        .client()
        .post("/api/image-compress")
        .multipart(single_file(
            "image",
            b"not really a png".to_vec(),
            "broken.png",
            "image/png",
        ))
        .await;

    expect_failure(&response);
    assert!(app.staged_files().is_empty());
}

#[tokio::test]
async fn test_image_to_pdf_has_one_page() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/jpg-to-pdf")
        .multipart(single_file("image", create_test_jpeg(800, 600), "p.jpg", "image/jpeg"))
        .await;

    let url = expect_success(&response);
    assert!(url.starts_with("/download/jpg2pdf-"));
    assert!(url.ends_with(".pdf"));
    assert_eq!(pdf_page_count(&app.read_artifact(&url)), 1);
}

#[tokio::test]
async fn test_pdf_to_jpg_renders_only_first_page() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/pdf-to-jpg")
        .multipart(single_file("pdf", create_test_pdf(3), "doc.pdf", "application/pdf"))
        .await;

    let url = expect_success(&response);
    assert!(url.starts_with("/download/pdf2jpg-"));
    let artifact = app.read_artifact(&url);
    assert_eq!(image::guess_format(&artifact).unwrap(), ImageFormat::Jpeg);

    let calls = app.rasterizer.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].selection, PageSelection::First);
    assert_eq!(calls[0].rendered, 1);
    assert!((calls[0].scale - 2.0).abs() < f32::EPSILON);
}

#[tokio::test]
async fn test_pdf_to_jpg_rejects_non_pdf() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/pdf-to-jpg")
        .multipart(single_file("pdf", create_test_png(10, 10), "fake.pdf", "application/pdf"))
        .await;

    expect_failure(&response);
    assert!(app.output_files().is_empty());
    assert!(app.rasterizer.calls().is_empty());
}

#[tokio::test]
async fn test_codec_panic_becomes_failure() {
    let app = setup_test_app().await;
    app.rasterizer.set_panics(true);

    let response = app
        .client()
        .post("/api/pdf-to-jpg")
        .multipart(single_file("pdf", create_test_pdf(1), "doc.pdf", "application/pdf"))
        .await;
    expect_failure(&response);
    assert!(app.output_files().is_empty());

    // The server keeps serving after the crashed task.
    app.rasterizer.set_panics(false);
    let response = app
        .client()
        .post("/api/pdf-to-jpg")
        .multipart(single_file("pdf", create_test_pdf(1), "doc.pdf", "application/pdf"))
        .await;
    expect_success(&response);
}

#[tokio::test]
async fn test_compress_pdf_keeps_page_count() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/compress-pdf")
        .multipart(single_file("pdf", create_test_pdf(4), "big.pdf", "application/pdf"))
        .await;

    let url = expect_success(&response);
    assert!(url.starts_with("/download/compressed-"));
    assert!(url.ends_with(".pdf"));
    assert_eq!(pdf_page_count(&app.read_artifact(&url)), 4);

    let calls = app.rasterizer.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].selection, PageSelection::All);
    assert!((calls[0].scale - 1.0).abs() < f32::EPSILON);
}

#[tokio::test]
async fn test_oversized_upload_fails() {
    let app = setup_test_app_with(|config| config.max_upload_size_bytes = 1024).await;

    let response = app
        .client()
        .post("/api/image-compress")
        .multipart(single_file("image", vec![0u8; 4096], "big.png", "image/png"))
        .await;

    expect_failure(&response);
    assert!(app.output_files().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_get_unique_artifacts() {
    let app = setup_test_app().await;
    let client = app.client();

    let requests = (0..8).map(|_| async move {
        client
            .post("/api/image-compress")
            .multipart(single_file("image", create_test_png(16, 16), "a.png", "image/png"))
            .await
    });
    let responses = futures::future::join_all(requests).await;

    let mut urls: Vec<String> = responses.iter().map(expect_success).collect();
    urls.sort();
    urls.dedup();
    assert_eq!(urls.len(), 8);
    assert_eq!(app.output_files().len(), 8);
    assert!(app.staged_files().is_empty());
}
