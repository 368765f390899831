//! Core error types for objgraph-core.
//!
//! Uses `thiserror` for structured, matchable error variants.

use thiserror::Error;

/// Errors produced by the core data model.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A value shape the link model cannot represent (e.g. `null`).
    #[error("unsupported value type: {found}; only string, number, boolean, object and array are supported")]
    UnsupportedValue { found: String },

    /// An object was required (e.g. as the conversion root) but the value is
    /// some other shape.
    #[error("expected an object value, got {found}")]
    NotAnObject { found: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_shape() {
        let err = CoreError::UnsupportedValue {
            found: "null".into(),
        };
        assert!(err.to_string().contains("null"));

        let err = CoreError::NotAnObject {
            found: "Array".into(),
        };
        assert!(err.to_string().contains("Array"));
    }
}
