//! Request-independent rules: account registration, recipe ownership and the
//! favorite toggle. Handlers parse input, call in here, and render the result.

pub mod accounts;
pub mod favorites;
pub mod recipes;

/// Treat absent and whitespace-only form values the same way.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
