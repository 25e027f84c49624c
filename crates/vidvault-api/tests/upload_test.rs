//! Video and thumbnail upload integration tests.
//!
//! Run with: `cargo test -p vidvault-api --test upload_test`

mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use helpers::auth::bearer;
use helpers::fixtures::{minimal_png, sample_video};
use helpers::toolkit::{FakeToolkit, FASTSTART_MARKER};
use helpers::{api_path, setup_test_app, setup_test_app_with, TestApp, MEDIA_BASE_URL};
use uuid::Uuid;
use vidvault_core::models::{AspectLabel, VideoAsset};
use vidvault_db::VideoRepository;

async fn upload_mp4(app: &TestApp, video_id: Uuid, user_id: Uuid) -> axum_test::TestResponse {
    upload_video(app, video_id, user_id, video_form(sample_video(), "video/mp4")).await
}

fn video_form(data: Vec<u8>, mime_type: &str) -> MultipartForm {
    let part = Part::bytes(bytes::Bytes::from(data))
        .file_name("clip.mp4")
        .mime_type(mime_type);
    MultipartForm::new().add_part("video", part)
}

async fn upload_video(
    app: &TestApp,
    video_id: Uuid,
    user_id: Uuid,
    form: MultipartForm,
) -> axum_test::TestResponse {
    app.client()
        .post(&api_path(&format!("/video_upload/{}", video_id)))
        .add_header("Authorization", bearer(user_id))
        .multipart(form)
        .await
}

#[tokio::test]
async fn test_landscape_upload_is_remuxed_stored_and_recorded() {
    let app = setup_test_app().await;
    let owner = Uuid::new_v4();
    let video = app.seed_video(owner).await;

    let response = upload_mp4(&app, video.id, owner).await;

    assert_eq!(response.status_code(), 200);
    let updated: VideoAsset = response.json();
    assert_eq!(updated.aspect_label, Some(AspectLabel::Landscape16x9));

    let key = updated.storage_key.clone().expect("storage key recorded");
    assert!(key.starts_with("landscape/"));
    assert!(key.ends_with(".mp4"));
    assert_eq!(
        updated.video_url.as_deref(),
        Some(format!("{}/{}", MEDIA_BASE_URL, key).as_str())
    );

    // The stored object is the remuxed copy, not the raw upload.
    let stored = std::fs::read(app.stored_path(&key)).expect("object stored");
    assert!(stored.starts_with(FASTSTART_MARKER));
    assert_eq!(&stored[FASTSTART_MARKER.len()..], sample_video().as_slice());

    let persisted = app.repository.get_video(video.id).await.unwrap().unwrap();
    assert_eq!(persisted, updated);
    assert!(app.leftover_uploads().is_empty());
}

#[tokio::test]
async fn test_portrait_and_other_orientations() {
    for (width, height, label, segment) in [
        (1080, 1920, AspectLabel::Portrait9x16, "portrait/"),
        (1000, 1000, AspectLabel::Other, "other/"),
    ] {
        let app = setup_test_app_with(FakeToolkit::with_geometry(width, height)).await;
        let owner = Uuid::new_v4();
        let video = app.seed_video(owner).await;

        let response = upload_mp4(&app, video.id, owner).await;

        assert_eq!(response.status_code(), 200);
        let updated: VideoAsset = response.json();
        assert_eq!(updated.aspect_label, Some(label));
        assert!(updated.storage_key.unwrap().starts_with(segment));
    }
}

#[tokio::test]
async fn test_media_type_parameters_are_ignored() {
    let app = setup_test_app().await;
    let owner = Uuid::new_v4();
    let video = app.seed_video(owner).await;

    let response = upload_video(
        &app,
        video.id,
        owner,
        video_form(sample_video(), "video/mp4; codecs=\"avc1.42E01E\""),
    )
    .await;

    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn test_wrong_media_type_rejected_before_processing() {
    let app = setup_test_app().await;
    let owner = Uuid::new_v4();
    let video = app.seed_video(owner).await;

    let response =
        upload_video(&app, video.id, owner, video_form(sample_video(), "video/quicktime")).await;

    assert_eq!(response.status_code(), 415);
    assert_eq!(app.toolkit.probe_count(), 0);
    let persisted = app.repository.get_video(video.id).await.unwrap().unwrap();
    assert!(persisted.video_url.is_none());
}

#[tokio::test]
async fn test_missing_video_field_is_bad_request() {
    let app = setup_test_app().await;
    let owner = Uuid::new_v4();
    let video = app.seed_video(owner).await;

    let form = MultipartForm::new().add_text("title", "no file here");
    let response = upload_video(&app, video.id, owner, form).await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_upload_requires_ownership_and_existing_record() {
    let app = setup_test_app().await;
    let owner = Uuid::new_v4();
    let video = app.seed_video(owner).await;

    let forbidden = upload_video(
        &app,
        video.id,
        Uuid::new_v4(),
        video_form(sample_video(), "video/mp4"),
    )
    .await;
    assert_eq!(forbidden.status_code(), 403);

    let missing = upload_video(
        &app,
        Uuid::new_v4(),
        owner,
        video_form(sample_video(), "video/mp4"),
    )
    .await;
    assert_eq!(missing.status_code(), 404);

    assert_eq!(app.toolkit.probe_count(), 0);
}

#[tokio::test]
async fn test_oversized_upload_rejected() {
    let app = setup_test_app().await;
    let owner = Uuid::new_v4();
    let video = app.seed_video(owner).await;

    // One byte over the configured 1 MB cap.
    let data = vec![0u8; 1024 * 1024 + 1];
    let response = upload_video(&app, video.id, owner, video_form(data, "video/mp4")).await;

    assert_eq!(response.status_code(), 413);
    assert_eq!(app.toolkit.probe_count(), 0);
    assert!(app.leftover_uploads().is_empty());
}

#[tokio::test]
async fn test_probe_failure_leaves_record_and_temp_dir_untouched() {
    let app = setup_test_app_with(FakeToolkit::without_streams()).await;
    let owner = Uuid::new_v4();
    let video = app.seed_video(owner).await;

    let response = upload_mp4(&app, video.id, owner).await;

    assert_eq!(response.status_code(), 500);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "MEDIA_TOOL_ERROR");

    let persisted = app.repository.get_video(video.id).await.unwrap().unwrap();
    assert_eq!(persisted, video);
    assert!(app.leftover_uploads().is_empty());
}

#[tokio::test]
async fn test_remux_failure_cleans_partial_output() {
    let app = setup_test_app_with(FakeToolkit::failing_remux(1920, 1080)).await;
    let owner = Uuid::new_v4();
    let video = app.seed_video(owner).await;

    let response = upload_mp4(&app, video.id, owner).await;

    assert_eq!(response.status_code(), 500);
    assert!(app.leftover_uploads().is_empty());
    let persisted = app.repository.get_video(video.id).await.unwrap().unwrap();
    assert!(persisted.storage_key.is_none());
}

#[tokio::test]
async fn test_thumbnail_upload_then_delete_removes_objects() {
    let app = setup_test_app().await;
    let owner = Uuid::new_v4();
    let video = app.seed_video(owner).await;

    let uploaded = upload_mp4(&app, video.id, owner).await;
    assert_eq!(uploaded.status_code(), 200);
    let video_key = uploaded.json::<VideoAsset>().storage_key.unwrap();

    let part = Part::bytes(bytes::Bytes::from(minimal_png()))
        .file_name("poster.png")
        .mime_type("image/png");
    let response = app
        .client()
        .post(&api_path(&format!("/thumbnail_upload/{}", video.id)))
        .add_header("Authorization", bearer(owner))
        .multipart(MultipartForm::new().add_part("thumbnail", part))
        .await;

    assert_eq!(response.status_code(), 200);
    let updated: VideoAsset = response.json();
    assert_eq!(updated.storage_key.as_deref(), Some(video_key.as_str()));
    let thumbnail_url = updated.thumbnail_url.expect("thumbnail url recorded");
    let thumbnail_key = thumbnail_url
        .strip_prefix(&format!("{}/", MEDIA_BASE_URL))
        .expect("url under media base")
        .to_string();
    assert!(thumbnail_key.starts_with("thumbnails/"));
    assert!(thumbnail_key.ends_with(".png"));
    assert_eq!(
        std::fs::read(app.stored_path(&thumbnail_key)).unwrap(),
        minimal_png()
    );

    let deleted = app
        .client()
        .delete(&api_path(&format!("/videos/{}", video.id)))
        .add_header("Authorization", bearer(owner))
        .await;
    assert_eq!(deleted.status_code(), 204);
    assert!(!app.stored_path(&video_key).exists());
    assert!(!app.stored_path(&thumbnail_key).exists());
}

#[tokio::test]
async fn test_thumbnail_rejects_non_image() {
    let app = setup_test_app().await;
    let owner = Uuid::new_v4();
    let video = app.seed_video(owner).await;

    let part = Part::bytes(bytes::Bytes::from(sample_video()))
        .file_name("clip.mp4")
        .mime_type("video/mp4");
    let response = app
        .client()
        .post(&api_path(&format!("/thumbnail_upload/{}", video.id)))
        .add_header("Authorization", bearer(owner))
        .multipart(MultipartForm::new().add_part("thumbnail", part))
        .await;

    assert_eq!(response.status_code(), 415);
}
