//! Stream geometry extraction with ffprobe.

use serde::Deserialize;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use vidvault_core::models::StreamGeometry;

use crate::error::ProbeError;

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<i64>,
    height: Option<i64>,
}

/// `ffprobe -v error -print_format json -show_streams <path>`
pub async fn probe_stream_geometry(
    ffprobe_path: &str,
    path: &Path,
) -> Result<StreamGeometry, ProbeError> {
    let start = std::time::Instant::now();

    let output = Command::new(ffprobe_path)
        .args(["-v", "error", "-print_format", "json", "-show_streams"])
        .arg(path)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(ProbeError::Execution)?;

    if !output.status.success() {
        return Err(ProbeError::NonZeroExit {
            status: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let geometry = parse_probe_output(&output.stdout)?;

    tracing::info!(
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        width = geometry.width,
        height = geometry.height,
        "Video probe completed"
    );

    Ok(geometry)
}

/// Parse ffprobe's JSON and return the first stream's geometry.
pub fn parse_probe_output(stdout: &[u8]) -> Result<StreamGeometry, ProbeError> {
    let parsed: ProbeOutput = serde_json::from_slice(stdout).map_err(ProbeError::Parse)?;

    let first = parsed.streams.first().ok_or(ProbeError::NoStreamData)?;

    let (width, height) = match (first.width, first.height) {
        (Some(w), Some(h)) => (w, h),
        _ => {
            return Err(ProbeError::InvalidGeometry(
                "first stream reports no width/height".to_string(),
            ))
        }
    };

    let width = u32::try_from(width)
        .ok()
        .filter(|w| *w > 0)
        .ok_or_else(|| ProbeError::InvalidGeometry(format!("width {}", width)))?;
    let height = u32::try_from(height)
        .ok()
        .filter(|h| *h > 0)
        .ok_or_else(|| ProbeError::InvalidGeometry(format!("height {}", height)))?;

    Ok(StreamGeometry::new(width, height))
}
