//! Shared key generation for storage backends.
//!
//! Keys are built from 32 bytes of OS randomness, encoded as unpadded base64url,
//! so they never collide in practice and never expose sequential identifiers.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use vidvault_core::constants::STORAGE_KEY_BYTES;
use vidvault_core::models::AspectLabel;

use crate::traits::{StorageError, StorageResult};

pub const THUMBNAIL_PREFIX: &str = "thumbnails";

/// A fresh random key component (43 URL-safe characters).
pub fn random_key() -> String {
    let mut bytes = [0u8; STORAGE_KEY_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Key for a processed video: `{segment}/{random}.mp4`.
pub fn video_key(label: AspectLabel) -> String {
    format!("{}/{}.mp4", label.key_segment(), random_key())
}

/// Key for a thumbnail image: `thumbnails/{random}.{extension}`.
pub fn thumbnail_key(extension: &str) -> String {
    format!("{}/{}.{}", THUMBNAIL_PREFIX, random_key(), extension)
}

/// Reject keys that could escape a backend's namespace.
pub fn validate_key(storage_key: &str) -> StorageResult<()> {
    if storage_key.is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }
    if storage_key.contains("..") || storage_key.starts_with('/') || storage_key.contains('\\') {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_keys_are_url_safe_and_unique() {
        let a = random_key();
        let b = random_key();
        assert_eq!(a.len(), 43);
        assert_ne!(a, b);
        assert!(a
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn video_key_is_prefixed_by_orientation() {
        let key = video_key(AspectLabel::Landscape16x9);
        assert!(key.starts_with("landscape/"));
        assert!(key.ends_with(".mp4"));
        assert!(video_key(AspectLabel::Portrait9x16).starts_with("portrait/"));
        assert!(video_key(AspectLabel::Other).starts_with("other/"));
    }

    #[test]
    fn thumbnail_key_carries_extension() {
        let key = thumbnail_key("png");
        assert!(key.starts_with("thumbnails/"));
        assert!(key.ends_with(".png"));
        assert!(validate_key(&key).is_ok());
    }

    #[test]
    fn traversal_keys_rejected() {
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("/absolute").is_err());
        assert!(validate_key("").is_err());
    }
}
