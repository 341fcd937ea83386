//! Error types for loading and querying configuration trees.

use std::path::PathBuf;

/// Result type alias for tagconf operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or querying a configuration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configuration source could not be read.
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// A closing tag does not match the section that is currently open.
    #[error("closing tag </{found}> does not match open section <{expected}> at byte {position}")]
    MismatchedEndTag {
        /// Name of the innermost open section.
        expected: String,
        /// Name found in the closing tag.
        found: String,
        /// Byte offset of the closing tag.
        position: u64,
    },

    /// A closing tag appeared while no section was open.
    #[error("closing tag </{found}> has no open section at byte {position}")]
    UnexpectedEndTag {
        /// Name found in the closing tag.
        found: String,
        /// Byte offset of the closing tag.
        position: u64,
    },

    /// The tokenizer rejected the input.
    #[error("malformed config at byte {position}: {message}")]
    Syntax {
        /// What the tokenizer rejected.
        message: String,
        /// Byte offset where the error was detected.
        position: u64,
    },

    /// A path segment does not exist in the tree.
    #[error("path segment `{segment}` not found while resolving `{path}`")]
    NotFound {
        /// The first segment that could not be found.
        segment: String,
        /// The full path as given by the caller.
        path: String,
    },
}

impl Error {
    /// Returns true for structural errors in the configuration text.
    pub fn is_format(&self) -> bool {
        matches!(
            self,
            Error::MismatchedEndTag { .. } | Error::UnexpectedEndTag { .. } | Error::Syntax { .. }
        )
    }

    /// Returns true when a path lookup failed.
    pub fn is_lookup(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let format = Error::Syntax {
            message: "bad".to_string(),
            position: 3,
        };
        assert!(format.is_format());
        assert!(!format.is_lookup());

        let lookup = Error::NotFound {
            segment: "B".to_string(),
            path: "/A/B".to_string(),
        };
        assert!(lookup.is_lookup());
        assert!(!lookup.is_format());
    }

    #[test]
    fn test_error_display() {
        let err = Error::MismatchedEndTag {
            expected: "A".to_string(),
            found: "B".to_string(),
            position: 10,
        };
        assert_eq!(
            err.to_string(),
            "closing tag </B> does not match open section <A> at byte 10"
        );

        let err = Error::NotFound {
            segment: "x".to_string(),
            path: "/A/x".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "path segment `x` not found while resolving `/A/x`"
        );
    }

    #[test]
    fn test_io_error_is_neither_format_nor_lookup() {
        let err = Error::Io {
            path: PathBuf::from("/nowhere.conf"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(!err.is_format());
        assert!(!err.is_lookup());
        assert!(err.to_string().starts_with("failed to read config file /nowhere.conf"));
    }
}
