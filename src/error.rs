//! Error types for jni-cppgen

use std::io;

/// Result type alias for code generation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while generating JNI C++ code
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The class model is missing a name or carries an unusable one
    #[error("Invalid class model: {0}")]
    InvalidInput(String),

    /// A type reached the encoder that has no JVM or JNI representation
    #[error("Unsupported type {kind} in `{member}`")]
    UnsupportedType {
        /// Signature of the member that carries the type
        member: String,
        /// The offending type kind
        kind: String,
    },

    /// Malformed descriptor, Java type name or fusion file content
    #[error("Failed to parse: {0}")]
    Parse(String),

    /// Error parsing a class file with cafebabe
    #[error("Failed to parse class file: {0}")]
    ParseClass(String),

    /// Malformed symbolic class model
    #[error("Failed to read class model: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error reading inputs or writing generated files
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl From<cafebabe::ParseError> for Error {
    fn from(err: cafebabe::ParseError) -> Self {
        Error::ParseClass(err.to_string())
    }
}

impl Error {
    /// Attach the signature of the member being processed to an
    /// [`Error::UnsupportedType`] raised without one.
    pub(crate) fn in_member(self, member: impl FnOnce() -> String) -> Self {
        match self {
            Error::UnsupportedType { member: m, kind } if m.is_empty() => Error::UnsupportedType {
                member: member(),
                kind,
            },
            other => other,
        }
    }
}
