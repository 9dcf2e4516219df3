use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("cannot open capture file {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("capture write failed: {0}")]
    Write(#[from] std::io::Error),
    #[error("writer already stopped")]
    Stopped,
}
