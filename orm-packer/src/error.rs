/// Error types for texture packing operations.
use crate::channels::ChannelRole;
use std::path::PathBuf;

#[derive(Debug)]
pub enum PackerError {
    IoError(std::io::Error),
    ImageError(image::ImageError),
    ReportError(serde_json::Error),
    /// Input maps of one texture set do not share a resolution.
    DimensionMismatch {
        role: ChannelRole,
        expected: (u32, u32),
        found: (u32, u32),
    },
    /// A discovered file has no directory component.
    MissingParentDirectory(PathBuf),
    /// No search path was given.
    NoSearchPath,
    /// Search path does not exist and was not created.
    SearchPathDeclined(PathBuf),
    ThreadPool(String),
}

impl From<std::io::Error> for PackerError {
    fn from(err: std::io::Error) -> Self {
        PackerError::IoError(err)
    }
}

impl From<image::ImageError> for PackerError {
    fn from(err: image::ImageError) -> Self {
        PackerError::ImageError(err)
    }
}

impl From<serde_json::Error> for PackerError {
    fn from(err: serde_json::Error) -> Self {
        PackerError::ReportError(err)
    }
}

impl std::fmt::Display for PackerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PackerError::IoError(e) => write!(f, "IO error: {}", e),
            PackerError::ImageError(e) => write!(f, "Image error: {}", e),
            PackerError::ReportError(e) => write!(f, "Report error: {}", e),
            PackerError::DimensionMismatch {
                role,
                expected,
                found,
            } => write!(
                f,
                "{} map is {}x{} but the texture set is {}x{}",
                role,
                found.0,
                found.1,
                expected.0,
                expected.1
            ),
            PackerError::MissingParentDirectory(path) => {
                write!(f, "The file directory should not be empty: {}", path.display())
            }
            PackerError::NoSearchPath => write!(f, "You need to enter a valid path"),
            PackerError::SearchPathDeclined(path) => write!(
                f,
                "The directory '{}' does not exist. Restart with a valid directory path",
                path.display()
            ),
            PackerError::ThreadPool(msg) => write!(f, "Failed to configure thread pool: {}", msg),
        }
    }
}

impl std::error::Error for PackerError {}
