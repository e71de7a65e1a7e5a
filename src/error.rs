//! Error types for mybind.

use thiserror::Error;

use crate::types::{Kind, WireType};

/// The main error type for binding and encoding operations.
#[derive(Debug, Error)]
pub enum BindError {
    /// The value's type has no wire mapping, or it sits behind more than one indirection.
    #[error("Unsupported type: '{type_name}'")]
    UnsupportedType { type_name: &'static str },

    /// The descriptor's wire type cannot carry the supplied value.
    #[error("Descriptor mismatch: wire type {wire_type} cannot encode a {kind} value")]
    Mismatch { wire_type: WireType, kind: Kind },

    /// Failed to parse a typed literal.
    #[error("Literal error at position {position}: {message}")]
    Literal { position: usize, message: String },

    /// A value cannot be represented on the wire.
    #[error("Value out of range: {0}")]
    OutOfRange(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BindError {
    /// Create an unsupported-type error for `T`.
    pub fn unsupported<T: ?Sized>() -> Self {
        Self::UnsupportedType {
            type_name: std::any::type_name::<T>(),
        }
    }

    pub fn out_of_range(message: impl Into<String>) -> Self {
        Self::OutOfRange(message.into())
    }

    /// Create a literal parse error at the given position.
    pub fn literal(position: usize, message: impl Into<String>) -> Self {
        Self::Literal {
            position,
            message: message.into(),
        }
    }
}

/// Result type alias for binding operations.
pub type BindResult<T> = Result<T, BindError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BindError::literal(4, "unknown type tag");
        assert_eq!(err.to_string(), "Literal error at position 4: unknown type tag");
    }

    #[test]
    fn test_unsupported_names_type() {
        let err = BindError::unsupported::<bool>();
        assert_eq!(err.to_string(), "Unsupported type: 'bool'");
    }

    #[test]
    fn test_mismatch_display() {
        let err = BindError::Mismatch {
            wire_type: WireType::LONG,
            kind: Kind::Text,
        };
        assert_eq!(
            err.to_string(),
            "Descriptor mismatch: wire type LONG cannot encode a text value"
        );
    }
}
