//! Application-wide constants.

/// Multipart field carrying the video payload.
pub const VIDEO_FORM_FIELD: &str = "video";

/// Multipart field carrying the thumbnail payload.
pub const THUMBNAIL_FORM_FIELD: &str = "thumbnail";

/// The only media type accepted by the video ingestion pipeline.
pub const VIDEO_MP4: &str = "video/mp4";

/// Suffix appended to a buffered upload to name its fast-start remux output.
pub const REMUX_SUFFIX: &str = ".processing";

/// Number of random bytes behind every generated storage key.
pub const STORAGE_KEY_BYTES: usize = 32;

pub const BYTES_PER_MB: usize = 1024 * 1024;
