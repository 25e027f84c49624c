//! Video stream inspection and container rewriting

pub mod aspect;
pub mod probe;
pub mod remux;
pub mod toolkit;

pub use aspect::classify;
pub use probe::parse_probe_output;
pub use remux::remux_output_path;
pub use toolkit::{FfmpegToolkit, MediaToolkit};
