//! Error types for the artifact-cleaner crate.
//!
//! Only real I/O and codec failures are errors. "No artifact found" and
//! "nothing passed filtering" are ordinary outcomes carried by
//! [`crate::CleanOutcome`], since a batch run expects plenty of clean images.

use std::path::PathBuf;

/// Errors that can occur while loading, saving, or enumerating images.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The image could not be decoded or encoded.
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// The output format is not supported.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// The input folder does not exist.
    #[error("input path does not exist: {0}")]
    InputPathMissing(PathBuf),

    /// The input folder contains no images with a supported extension.
    #[error("no image files found in {0}")]
    NoImagesFound(PathBuf),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let io_err = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(io_err.to_string().contains("gone"));

        let unsupported = Error::UnsupportedFormat(String::from("tiff"));
        assert!(unsupported.to_string().contains("tiff"));

        let missing = Error::InputPathMissing(PathBuf::from("/no/such/dir"));
        assert!(missing.to_string().contains("/no/such/dir"));

        let empty = Error::NoImagesFound(PathBuf::from("/tmp/empty"));
        assert!(empty.to_string().contains("/tmp/empty"));
    }
}
