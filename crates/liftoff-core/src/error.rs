use thiserror::Error;

#[derive(Debug, Error)]
pub enum LiftoffError {
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LiftoffError {
    /// Short error code string, logged as the `code` field when the binary
    /// falls back to default configuration.
    pub fn code(&self) -> &'static str {
        match self {
            LiftoffError::Config(_) => "CONFIG_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, LiftoffError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_code_is_stable() {
        assert_eq!(LiftoffError::Config("x".into()).code(), "CONFIG_ERROR");
    }

    #[test]
    fn display_includes_detail() {
        let err = LiftoffError::Config("missing [countdown]".into());
        assert_eq!(err.to_string(), "Configuration error: missing [countdown]");
    }
}
