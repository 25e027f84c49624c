use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use vidvault_core::models::StreamGeometry;

use super::{probe, remux};
use crate::error::{ProbeError, RemuxError};

/// External media tool capability used by the ingestion pipeline.
///
/// Production uses [`FfmpegToolkit`]; tests substitute deterministic fakes.
#[async_trait]
pub trait MediaToolkit: Send + Sync {
    /// Geometry of the first stream in `path`.
    async fn probe(&self, path: &Path) -> Result<StreamGeometry, ProbeError>;

    /// Write a fast-start copy of `path` and return the new file's path.
    async fn remux(&self, path: &Path) -> Result<PathBuf, RemuxError>;
}

/// Validate that a tool path doesn't contain shell metacharacters
fn validate_tool_path(path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(anyhow!("Tool path is empty"));
    }

    let dangerous_chars = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];
    if path.chars().any(|c| dangerous_chars.contains(&c)) {
        return Err(anyhow!("Path contains dangerous characters: {}", path));
    }

    Ok(())
}

/// ffprobe/ffmpeg executed as child processes.
#[derive(Debug, Clone)]
pub struct FfmpegToolkit {
    ffmpeg_path: String,
    ffprobe_path: String,
}

impl FfmpegToolkit {
    pub fn new(ffmpeg_path: impl Into<String>, ffprobe_path: impl Into<String>) -> Result<Self> {
        let ffmpeg_path = ffmpeg_path.into();
        let ffprobe_path = ffprobe_path.into();
        validate_tool_path(&ffmpeg_path).context("Invalid FFMPEG_PATH")?;
        validate_tool_path(&ffprobe_path).context("Invalid FFPROBE_PATH")?;

        Ok(Self {
            ffmpeg_path,
            ffprobe_path,
        })
    }
}

#[async_trait]
impl MediaToolkit for FfmpegToolkit {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffprobe",
        process.executable.path = %self.ffprobe_path,
        ffmpeg.operation = "probe"
    ))]
    async fn probe(&self, path: &Path) -> Result<StreamGeometry, ProbeError> {
        probe::probe_stream_geometry(&self.ffprobe_path, path).await
    }

    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffmpeg",
        process.executable.path = %self.ffmpeg_path,
        ffmpeg.operation = "remux_faststart"
    ))]
    async fn remux(&self, path: &Path) -> Result<PathBuf, RemuxError> {
        remux::remux_faststart(&self.ffmpeg_path, path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_shell_metacharacters() {
        assert!(FfmpegToolkit::new("ffmpeg; rm -rf /", "ffprobe").is_err());
        assert!(FfmpegToolkit::new("ffmpeg", "$(ffprobe)").is_err());
        assert!(FfmpegToolkit::new("", "ffprobe").is_err());
    }

    #[test]
    fn accepts_plain_and_absolute_paths() {
        assert!(FfmpegToolkit::new("ffmpeg", "ffprobe").is_ok());
        assert!(FfmpegToolkit::new("/usr/bin/ffmpeg", "/usr/local/bin/ffprobe").is_ok());
    }
}
