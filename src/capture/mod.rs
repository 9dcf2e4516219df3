pub mod cf32;
mod error;
mod path;
mod writer;

pub use error::CaptureError;
pub use path::{capture_path, CAPTURE_EXTENSION};
pub use writer::{IqWriter, BYTES_PER_SAMPLE};
