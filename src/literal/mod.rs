//! The compact object-literal notation used for client-side rule payloads.
//!
//! Payloads are JSON with two relaxations: simple keys are unquoted and
//! simple strings use single quotes. [`normalize`] produces that form from
//! JSON; [`parse`] and [`parse_payload`] read it back.

mod error;
mod grammar;
mod normalize;

pub use error::ParseError;
pub use normalize::normalize;

use crate::Value;

/// Parse a single object-literal value.
///
/// # Errors
///
/// Returns [`ParseError`] if the input is not a valid literal.
pub fn parse(input: &str) -> Result<Value, ParseError> {
    use winnow::Parser;
    grammar::literal
        .parse(input)
        .map_err(ParseError::from)
}

/// Parse the output of [`export_rules`](crate::export_rules), which is a
/// list with its outer brackets stripped.
///
/// # Errors
///
/// Returns [`ParseError`] if the input is not a valid payload.
pub fn parse_payload(input: &str) -> Result<Vec<Value>, ParseError> {
    use winnow::Parser;
    grammar::items
        .parse(input)
        .map_err(ParseError::from)
}
