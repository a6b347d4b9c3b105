//! Error types for esri_metadata
//!
//! This module defines all error types used throughout the library.
//! `InvalidValue`, `InvalidStructure` and `UnboundElement` are the failures
//! that describe the state of the document or of a handle; the remaining
//! variants report local usage errors and I/O around the document.

use thiserror::Error;

/// Result type alias using esri_metadata Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for metadata operations
#[derive(Error, Debug)]
pub enum Error {
    /// Raw text does not conform to the literal grammar of a value type
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// The document violates a cardinality assumption of the schema
    #[error("invalid structure: {0}")]
    InvalidStructure(String),

    /// An operation needing a document position was called on a detached handle
    #[error("unbound element: {0}")]
    UnboundElement(String),

    /// A handle or scalar of the wrong type was supplied
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Expected type name
        expected: String,
        /// Type name actually supplied
        found: String,
    },

    /// The schema declares no field with this name
    #[error("field '{field}' not found in '{container}'")]
    FieldNotFound {
        /// Requested field name
        field: String,
        /// Name of the container that was searched
        container: String,
    },

    /// List index outside of `0..len`
    #[error("index {index} out of range for list '{name}' of length {len}")]
    IndexOutOfRange {
        /// List name
        name: String,
        /// Requested index
        index: usize,
        /// Current list length
        len: usize,
    },

    /// The position does not exist in the document
    #[error("'{0}' is not present in the document")]
    NotPresent(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// XML parsing or writing error
    #[error("XML error: {0}")]
    Xml(String),

    /// The external format converter failed
    #[error("conversion failed: {0}")]
    Conversion(String),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),

    /// Name error (invalid XML name)
    #[error("name error: {0}")]
    Name(String),
}

impl Error {
    /// Returns true for bad scalar literals
    pub fn is_invalid_value(&self) -> bool {
        matches!(self, Error::InvalidValue(_))
    }

    /// Returns true for duplicate or mixed-content violations
    pub fn is_invalid_structure(&self) -> bool {
        matches!(self, Error::InvalidStructure(_))
    }

    /// Returns true when a detached handle was asked to touch the document
    pub fn is_unbound(&self) -> bool {
        matches!(self, Error::UnboundElement(_))
    }

    pub(crate) fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Error::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::FieldNotFound {
            field: "resTitel".to_string(),
            container: "idCitation".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "field 'resTitel' not found in 'idCitation'"
        );

        let err = Error::IndexOutOfRange {
            name: "tpCat".to_string(),
            index: 3,
            len: 2,
        };
        assert!(err.to_string().contains("length 2"));
    }

    #[test]
    fn test_error_predicates() {
        assert!(Error::InvalidValue("x".into()).is_invalid_value());
        assert!(Error::InvalidStructure("x".into()).is_invalid_structure());
        assert!(Error::UnboundElement("x".into()).is_unbound());
        assert!(!Error::NotPresent("x".into()).is_unbound());
    }

    #[test]
    fn test_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
