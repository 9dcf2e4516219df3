use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Fatal errors mean the file exists but cannot be trusted to tune hardware.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ConfigError::Parse(_) | ConfigError::Invalid(_))
    }
}
