use thiserror::Error;

#[derive(Debug, Error)]
pub enum PosterError {
    #[error("Decode error: {0}")]
    DecodeError(String),
    #[error("Missing required form field '{field}'")]
    MissingFieldError { field: &'static str },
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("Generation error: {0}")]
    GenerationError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl PosterError {
    /// Stable identifier returned to callers in the `errorKind` field.
    pub fn kind(&self) -> &'static str {
        match self {
            PosterError::DecodeError(_) => "DecodeError",
            PosterError::MissingFieldError { .. } => "MissingFieldError",
            PosterError::StorageError(_) => "StorageError",
            PosterError::GenerationError(_) => "GenerationError",
            PosterError::ConfigError(_) => "ConfigError",
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            PosterError::DecodeError(_) | PosterError::MissingFieldError { .. } => 400,
            PosterError::StorageError(_) | PosterError::GenerationError(_) => 502,
            PosterError::ConfigError(_) => 500,
        }
    }

    pub fn is_client_fault(&self) -> bool {
        self.status_code() < 500
    }

    /// Message safe to hand back to the caller. Collaborator faults keep
    /// their detail in the logs only.
    pub fn public_message(&self) -> String {
        match self {
            PosterError::DecodeError(_) | PosterError::MissingFieldError { .. } => {
                self.to_string()
            }
            PosterError::StorageError(_) => "Object storage request failed".to_string(),
            PosterError::GenerationError(_) => "Image generation failed".to_string(),
            PosterError::ConfigError(_) => "Function is misconfigured".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PosterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_faults_map_to_400() {
        let err = PosterError::MissingFieldError { field: "img" };
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.kind(), "MissingFieldError");
        assert!(err.is_client_fault());
        assert_eq!(err.public_message(), "Missing required form field 'img'");

        let err = PosterError::DecodeError("Invalid byte 42, offset 0.".into());
        assert_eq!(err.status_code(), 400);
        assert!(err.public_message().contains("Invalid byte"));
    }

    #[test]
    fn test_collaborator_faults_hide_detail() {
        let err = PosterError::StorageError("AccessDenied: arn:aws:s3:::private".into());
        assert_eq!(err.status_code(), 502);
        assert!(!err.is_client_fault());
        assert!(!err.public_message().contains("arn:aws"));

        let err = PosterError::GenerationError("ValidationException".into());
        assert_eq!(err.status_code(), 502);
        assert_eq!(err.kind(), "GenerationError");
        assert!(!err.public_message().contains("ValidationException"));
    }
}
