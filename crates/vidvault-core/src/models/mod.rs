pub mod video;

pub use video::{AspectLabel, CreateVideoRequest, StreamGeometry, VideoAsset};
