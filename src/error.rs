//! Error types for E2E testing

use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("Storefront unreachable at {url} after {attempts} attempts")]
    StoreUnreachable { url: String, attempts: usize },

    #[error("Playwright not found. Install with: npx playwright install")]
    PlaywrightNotFound,

    #[error("Playwright error: {0}")]
    Playwright(String),

    #[error("Test spec parse error: {0}")]
    SpecParse(String),

    #[error("Invalid test spec '{spec}': {reason}")]
    InvalidSpec { spec: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type E2eResult<T> = Result<T, E2eError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreachable_display_names_url() {
        let err = E2eError::StoreUnreachable {
            url: "http://127.0.0.1:9292".to_string(),
            attempts: 40,
        };
        let msg = err.to_string();
        assert!(msg.contains("http://127.0.0.1:9292"));
        assert!(msg.contains("40"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: E2eError = io.into();
        assert!(matches!(err, E2eError::Io(_)));
    }
}
