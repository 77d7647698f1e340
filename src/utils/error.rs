use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown frontmatter field: {name}")]
    UnknownFrontmatterField { name: String },

    #[error("Translation metadata error: {message}")]
    TranslationError { message: String },

    #[error("Invalid image URL: {url}")]
    InvalidImageUrl { url: String },

    #[error("Unexpected response status {status} for {url}")]
    HttpStatusError { url: String, status: u16 },
}

impl ExportError {
    /// Configuration contract violations abort the whole run; everything else
    /// is scoped to a single post or image.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ExportError::ConfigError { .. }
                | ExportError::MissingConfigError { .. }
                | ExportError::InvalidConfigValueError { .. }
                | ExportError::UnknownFrontmatterField { .. }
                | ExportError::TomlError(_)
        )
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ExportError::HttpError(_) | ExportError::HttpStatusError { .. } => {
                "Check the image URL is reachable, or re-run to retry missing images"
            }
            ExportError::IoError(_) => "Check that the output directory is writable",
            ExportError::SerializationError(_) => "Check that the input file is a valid export document",
            ExportError::TomlError(_) => "Check the configuration file syntax",
            ExportError::ConfigError { .. }
            | ExportError::MissingConfigError { .. }
            | ExportError::InvalidConfigValueError { .. } => "Fix the configuration value and re-run",
            ExportError::UnknownFrontmatterField { .. } => {
                "Remove the field or use one of the supported frontmatter field names"
            }
            ExportError::TranslationError { .. } => {
                "The post will be exported without its translations"
            }
            ExportError::InvalidImageUrl { .. } => "Only http and https image URLs can be downloaded",
        }
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_fatal() {
        let err = ExportError::UnknownFrontmatterField {
            name: "colour".to_string(),
        };
        assert!(err.is_fatal());
        assert_eq!(err.to_string(), "Unknown frontmatter field: colour");
    }

    #[test]
    fn test_item_errors_are_not_fatal() {
        let err = ExportError::HttpStatusError {
            url: "https://example.com/a.png".to_string(),
            status: 404,
        };
        assert!(!err.is_fatal());

        let io = ExportError::from(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
        assert!(!io.is_fatal());
    }
}
