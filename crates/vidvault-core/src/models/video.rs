use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// Width and height of the first media stream reported by the prober.
///
/// Both dimensions are guaranteed positive once constructed through the prober.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StreamGeometry {
    pub width: u32,
    pub height: u32,
}

impl StreamGeometry {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

/// Orientation label derived from stream geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum AspectLabel {
    #[serde(rename = "16:9")]
    Landscape16x9,
    #[serde(rename = "9:16")]
    Portrait9x16,
    #[serde(rename = "other")]
    Other,
}

impl AspectLabel {
    /// Storage key segment that groups objects by orientation.
    pub fn key_segment(&self) -> &'static str {
        match self {
            AspectLabel::Landscape16x9 => "landscape",
            AspectLabel::Portrait9x16 => "portrait",
            AspectLabel::Other => "other",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AspectLabel::Landscape16x9 => "16:9",
            AspectLabel::Portrait9x16 => "9:16",
            AspectLabel::Other => "other",
        }
    }
}

impl Display for AspectLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectLabel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "16:9" => Ok(AspectLabel::Landscape16x9),
            "9:16" => Ok(AspectLabel::Portrait9x16),
            "other" => Ok(AspectLabel::Other),
            _ => Err(anyhow::anyhow!("Invalid aspect label: {}", s)),
        }
    }
}

/// Video metadata record.
///
/// Created bare by `POST /api/videos`, then populated by the ingestion pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct VideoAsset {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    pub storage_key: Option<String>,
    pub aspect_label: Option<AspectLabel>,
}

impl VideoAsset {
    pub fn new(user_id: Uuid, title: String, description: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title,
            description,
            created_at: now,
            updated_at: now,
            thumbnail_url: None,
            video_url: None,
            storage_key: None,
            aspect_label: None,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateVideoRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}
