use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use vidvault_core::models::StreamGeometry;
use vidvault_processing::video::remux_output_path;
use vidvault_processing::{MediaToolkit, ProbeError, RemuxError};

/// Prefix the fake remuxer writes before the original bytes.
pub const FASTSTART_MARKER: &[u8] = b"faststart:";

/// Deterministic stand-in for ffprobe/ffmpeg.
pub struct FakeToolkit {
    geometry: Option<StreamGeometry>,
    remux_fails: bool,
    pub probe_calls: AtomicUsize,
}

impl FakeToolkit {
    pub fn with_geometry(width: u32, height: u32) -> Self {
        Self {
            geometry: Some(StreamGeometry::new(width, height)),
            remux_fails: false,
            probe_calls: AtomicUsize::new(0),
        }
    }

    /// Probe reports no usable stream.
    pub fn without_streams() -> Self {
        Self {
            geometry: None,
            remux_fails: false,
            probe_calls: AtomicUsize::new(0),
        }
    }

    /// Remux leaves a partial output behind and fails.
    pub fn failing_remux(width: u32, height: u32) -> Self {
        Self {
            remux_fails: true,
            ..Self::with_geometry(width, height)
        }
    }

    pub fn probe_count(&self) -> usize {
        self.probe_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaToolkit for FakeToolkit {
    async fn probe(&self, _path: &Path) -> Result<StreamGeometry, ProbeError> {
        self.probe_calls.fetch_add(1, Ordering::SeqCst);
        self.geometry.ok_or(ProbeError::NoStreamData)
    }

    async fn remux(&self, path: &Path) -> Result<PathBuf, RemuxError> {
        let output = remux_output_path(path);
        if self.remux_fails {
            std::fs::write(&output, b"partial").expect("Failed to write partial output");
            return Err(RemuxError::NonZeroExit {
                status: Some(1),
                stderr: "moov atom not found".to_string(),
            });
        }
        let mut data = FASTSTART_MARKER.to_vec();
        data.extend(std::fs::read(path).expect("Failed to read buffered upload"));
        std::fs::write(&output, data).expect("Failed to write remuxed output");
        Ok(output)
    }
}
