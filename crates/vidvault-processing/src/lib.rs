//! vidvault processing
//!
//! Everything between "bytes arrived" and "record updated":
//!
//! - [`video::probe`] runs ffprobe and extracts the first stream's geometry
//! - [`video::aspect`] maps geometry to an orientation label
//! - [`video::remux`] rewrites the container for fast start with ffmpeg
//! - [`ingest`] drives uploads through buffering, processing, storage and the metadata commit

pub mod error;
pub mod ingest;
pub mod validator;
pub mod video;

pub use error::{IngestError, ProbeError, RemuxError};
pub use ingest::{ThumbnailIngest, UploadRequest, VideoIngestPipeline};
pub use validator::{normalize_media_type, MediaValidator, ValidationError};
pub use video::{FfmpegToolkit, MediaToolkit};
