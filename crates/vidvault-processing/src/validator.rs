use vidvault_core::AppError;

/// Upload admission failures.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Upload exceeds the maximum size of {max} bytes")]
    FileTooLarge { max: usize },

    #[error("Unsupported media type: {content_type} (allowed: {allowed:?})")]
    UnsupportedMediaType {
        content_type: String,
        allowed: Vec<String>,
    },

    #[error("Missing media type on uploaded file")]
    MissingMediaType,

    #[error("Empty file")]
    EmptyFile,
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::FileTooLarge { .. } => AppError::PayloadTooLarge(err.to_string()),
            ValidationError::UnsupportedMediaType { .. } | ValidationError::MissingMediaType => {
                AppError::UnsupportedMediaType(err.to_string())
            }
            ValidationError::EmptyFile => AppError::InvalidInput(err.to_string()),
        }
    }
}

/// Strip parameters and normalize case: `"Video/MP4; codecs=avc1"` → `"video/mp4"`.
pub fn normalize_media_type(raw: &str) -> String {
    raw.split(';').next().unwrap_or("").trim().to_lowercase()
}

/// Size and media type admission rules for one kind of upload.
#[derive(Debug, Clone)]
pub struct MediaValidator {
    max_file_size: usize,
    allowed_content_types: Vec<String>,
}

impl MediaValidator {
    pub fn new(max_file_size: usize, allowed_content_types: Vec<String>) -> Self {
        Self {
            max_file_size,
            allowed_content_types: allowed_content_types
                .iter()
                .map(|t| normalize_media_type(t))
                .collect(),
        }
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    /// Validate the media type declared on the file part and return it normalized.
    pub fn validate_content_type(&self, declared: Option<&str>) -> Result<String, ValidationError> {
        let declared = declared.ok_or(ValidationError::MissingMediaType)?;
        let content_type = normalize_media_type(declared);
        if content_type.is_empty() {
            return Err(ValidationError::MissingMediaType);
        }

        if !self.allowed_content_types.contains(&content_type) {
            return Err(ValidationError::UnsupportedMediaType {
                content_type,
                allowed: self.allowed_content_types.clone(),
            });
        }

        Ok(content_type)
    }

    /// Validate a running byte count against the cap.
    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                max: self.max_file_size,
            });
        }
        Ok(())
    }

    /// Reject a finished upload that carried no bytes.
    pub fn validate_not_empty(&self, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }
        Ok(())
    }
}
