//! Test helpers: build the application around in-memory metadata, local storage
//! in a temp dir and a fake media toolkit.
//!
//! Run from workspace root: `cargo test -p vidvault-api`.

#![allow(dead_code)]

pub mod auth;
pub mod fixtures;
pub mod toolkit;

use axum_test::TestServer;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use uuid::Uuid;
use vidvault_api::constants;
use vidvault_api::setup::{routes, services};
use vidvault_core::models::VideoAsset;
use vidvault_core::{Config, ServiceConfig};
use vidvault_db::{InMemoryVideoRepository, VideoRepository};
use vidvault_storage::{LocalStorage, Storage};

use toolkit::FakeToolkit;

pub const MEDIA_BASE_URL: &str = "http://localhost:8091/media";

/// API path prefix for tests (e.g. `/api/videos`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Test application: server plus the collaborators behind it.
pub struct TestApp {
    pub server: TestServer,
    pub repository: Arc<InMemoryVideoRepository>,
    pub toolkit: Arc<FakeToolkit>,
    pub storage_dir: TempDir,
    pub upload_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Absolute path of a stored object.
    pub fn stored_path(&self, key: &str) -> PathBuf {
        self.storage_dir.path().join(key)
    }

    /// Entries left behind in the upload temp dir.
    pub fn leftover_uploads(&self) -> Vec<PathBuf> {
        std::fs::read_dir(self.upload_dir.path())
            .expect("Failed to read upload dir")
            .map(|entry| entry.expect("Failed to read dir entry").path())
            .collect()
    }

    /// Insert a bare record owned by `user_id` directly into the store.
    pub async fn seed_video(&self, user_id: Uuid) -> VideoAsset {
        let video = VideoAsset::new(user_id, "Seeded".to_string(), None);
        self.repository
            .create_video(&video)
            .await
            .expect("Failed to seed video");
        video
    }
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(FakeToolkit::with_geometry(1920, 1080)).await
}

/// Setup test app with a caller-supplied toolkit.
pub async fn setup_test_app_with(toolkit: FakeToolkit) -> TestApp {
    let storage_dir = tempfile::tempdir().expect("Failed to create storage dir");
    let upload_dir = tempfile::tempdir().expect("Failed to create upload dir");

    let config = create_test_config(&storage_dir, &upload_dir);

    let storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(storage_dir.path(), MEDIA_BASE_URL.to_string())
            .await
            .expect("Failed to create local storage"),
    );
    let repository = Arc::new(InMemoryVideoRepository::new());
    let toolkit = Arc::new(toolkit);

    let state = services::build_state(&config, repository.clone(), storage, toolkit.clone());
    let app = routes::setup_routes(&config, state).expect("Failed to setup routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        repository,
        toolkit,
        storage_dir,
        upload_dir,
    }
}

fn create_test_config(storage_dir: &TempDir, upload_dir: &TempDir) -> Config {
    let storage_path = storage_dir.path().to_string_lossy().into_owned();
    let upload_path = upload_dir.path().to_string_lossy().into_owned();
    let vars = [
        ("JWT_SECRET", auth::TEST_JWT_SECRET.to_string()),
        ("STORAGE_BACKEND", "local".to_string()),
        ("LOCAL_STORAGE_PATH", storage_path),
        ("LOCAL_STORAGE_BASE_URL", MEDIA_BASE_URL.to_string()),
        ("MAX_VIDEO_SIZE_MB", "1".to_string()),
        ("MAX_THUMBNAIL_SIZE_MB", "1".to_string()),
        ("UPLOAD_TEMP_DIR", upload_path),
    ];

    let service = ServiceConfig::from_lookup(|key: &str| {
        vars.iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.clone())
    })
    .expect("Failed to build test config");
    service.validate().expect("Test config must be valid");

    Config(Box::new(service))
}
