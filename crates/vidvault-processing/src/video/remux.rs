//! Fast-start remuxing with ffmpeg.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use vidvault_core::constants::REMUX_SUFFIX;

use crate::error::RemuxError;

/// `<source>.processing`
pub fn remux_output_path(source: &Path) -> PathBuf {
    let mut name = source.as_os_str().to_owned();
    name.push(REMUX_SUFFIX);
    PathBuf::from(name)
}

/// `ffmpeg -i <source> -c copy -movflags faststart -f mp4 <source>.processing`
///
/// Streams are copied, never re-encoded. The source file is left in place; the
/// caller owns cleanup of both files, including a partial output on failure.
pub async fn remux_faststart(ffmpeg_path: &str, source: &Path) -> Result<PathBuf, RemuxError> {
    let start = std::time::Instant::now();
    let output_path = remux_output_path(source);

    let output = Command::new(ffmpeg_path)
        .arg("-i")
        .arg(source)
        .args(["-c", "copy", "-movflags", "faststart", "-f", "mp4"])
        .arg(&output_path)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(RemuxError::Execution)?;

    if !output.status.success() {
        return Err(RemuxError::NonZeroExit {
            status: output.status.code(),
            stderr: last_lines(&String::from_utf8_lossy(&output.stderr), 20),
        });
    }

    tracing::info!(
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        output = %output_path.display(),
        "Fast-start remux completed"
    );

    Ok(output_path)
}

// ffmpeg prints its banner first; the failure reason is at the end.
fn last_lines(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.trim().lines().collect();
    let skip = lines.len().saturating_sub(n);
    lines[skip..].join("\n")
}
