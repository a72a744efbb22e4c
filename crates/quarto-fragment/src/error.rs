/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for fragment insertion.

use crate::mode::TemplateMode;
use thiserror::Error;

/// Errors that can occur while resolving and inserting a fragment.
///
/// Every variant except [`FragmentError::MalformedSignature`] aborts the
/// current render pass. Malformed signatures are downgraded to a warning by
/// the signature binder and only surface from
/// [`parse_signature`](crate::signature::parse_signature) itself.
#[derive(Debug, Error)]
pub enum FragmentError {
    /// The directive could not be evaluated into a fragment.
    #[error("Could not parse as fragment selection: \"{directive}\" (attribute {attribute})")]
    UnparsableDirective { attribute: String, directive: String },

    /// Include-contents-only insertion of a fragment in another template mode.
    #[error(
        "Template being processed uses template mode {host_mode}, inserted fragment \"{directive}\" \
         uses template mode {fragment_mode}. Cross-template-mode fragment insertion is not allowed \
         using the {attribute} attribute. Use insert or replace instead, which do not remove the \
         container element from the fragment being inserted."
    )]
    CrossModeDisallowed {
        attribute: String,
        directive: String,
        host_mode: TemplateMode,
        fragment_mode: TemplateMode,
    },

    /// Parameterized cross-mode insertion on a context without local variables.
    #[error(
        "Parameterized fragment insertion of \"{directive}\" (attribute {attribute}) is not \
         supported because local variable support is not available in the current template \
         context"
    )]
    MissingLocalVariableCapability { attribute: String, directive: String },

    /// A fragment signature attribute could not be parsed.
    #[error("Malformed fragment signature \"{spec}\": {message}")]
    MalformedSignature { spec: String, message: String },

    /// Nested fragment insertion went deeper than the configured limit.
    #[error("Fragment insertion nested deeper than {max_depth} levels: \"{directive}\"")]
    RecursionLimit { directive: String, max_depth: usize },

    /// The nested render of a cross-mode fragment failed.
    #[error("Nested render failed: {message}")]
    Render { message: String },
}

/// Result type for fragment operations.
pub type FragmentResult<T> = Result<T, FragmentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross_mode_message_names_both_modes() {
        let err = FragmentError::CrossModeDisallowed {
            attribute: "th:include".to_string(),
            directive: "mail::body".to_string(),
            host_mode: TemplateMode::Html,
            fragment_mode: TemplateMode::Text,
        };
        let message = err.to_string();
        assert!(message.contains("HTML"));
        assert!(message.contains("TEXT"));
        assert!(message.contains("\"mail::body\""));
        assert!(message.contains("th:include"));
    }

    #[test]
    fn test_missing_capability_message_names_attribute() {
        let err = FragmentError::MissingLocalVariableCapability {
            attribute: "th:replace".to_string(),
            directive: "mail :: greeting('Ada')".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("\"mail :: greeting('Ada')\""));
        assert!(message.contains("(attribute th:replace)"));
    }

    #[test]
    fn test_unparsable_message() {
        let err = FragmentError::UnparsableDirective {
            attribute: "th:insert".to_string(),
            directive: "???".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Could not parse as fragment selection: \"???\" (attribute th:insert)"
        );
    }
}
