//! Error taxonomy shared by the decoder and compositor.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Integer outcome codes understood by framebuffer tools.
///
/// The numeric values are stable and may be handed across process or FFI
/// boundaries unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ErrorCode {
    /// No error occurred.
    Ok = 0,
    /// Read/access error.
    File = 1,
    /// File format error.
    Format = 2,
}

impl ErrorCode {
    /// The raw integer value of this code.
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl From<ErrorCode> for i32 {
    fn from(code: ErrorCode) -> Self {
        code.as_i32()
    }
}

/// Reasons an input was rejected as malformed or unsupported.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The stream does not start with the PNG signature (or is too short to hold one).
    #[error("missing or invalid PNG signature")]
    Signature,

    /// The codec rejected the header or image data.
    #[error("PNG decode failed: {0}")]
    Codec(String),

    /// The image exceeds the configured decode limits.
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// The codec produced a sample layout the normalizer cannot turn into RGBA8.
    #[error("unsupported sample layout: {0}")]
    UnsupportedLayout(String),
}

impl From<png::DecodingError> for FormatError {
    fn from(err: png::DecodingError) -> Self {
        FormatError::Codec(err.to_string())
    }
}

/// Error returned by every decoder entry point.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The path could not be opened or read.
    #[error("cannot read {}: {source}", .path.display())]
    File {
        /// The path that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The stream is not a decodable PNG.
    #[error(transparent)]
    Format(#[from] FormatError),
}

impl LoadError {
    /// Collapse this error into its integer outcome code.
    pub fn code(&self) -> ErrorCode {
        match self {
            LoadError::File { .. } => ErrorCode::File,
            LoadError::Format(_) => ErrorCode::Format,
        }
    }

    pub(crate) fn file(path: impl Into<PathBuf>, source: io::Error) -> Self {
        LoadError::File {
            path: path.into(),
            source,
        }
    }
}

impl From<&LoadError> for ErrorCode {
    fn from(err: &LoadError) -> Self {
        err.code()
    }
}

impl<T> From<&Result<T, LoadError>> for ErrorCode {
    fn from(result: &Result<T, LoadError>) -> Self {
        match result {
            Ok(_) => ErrorCode::Ok,
            Err(err) => err.code(),
        }
    }
}

/// Errors raised while describing a destination framebuffer.
#[derive(Debug, Error)]
pub enum CompositeError {
    /// The geometry does not fit the supplied buffer or uses an unsupported pixel depth.
    #[error("invalid framebuffer geometry: {0}")]
    Geometry(String),
}
