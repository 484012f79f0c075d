use std::fmt;

use thiserror::Error;

use crate::{
    lexer::{SyntaxError, TokenKind},
    schema::Kind,
};

/// A terminal decoding failure, located at the byte offset where the faulting
/// token began.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason} at offset {offset}")]
pub struct DecodeError {
    pub(crate) reason: ErrorReason,
    pub(crate) offset: usize,
}

impl DecodeError {
    pub(crate) fn new(reason: ErrorReason, offset: usize) -> Self {
        Self { reason, offset }
    }

    /// Byte offset of the token that triggered the error.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The detailed reason for the failure.
    #[must_use]
    pub fn reason(&self) -> &ErrorReason {
        &self.reason
    }

    /// The data-less classification of the failure.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.reason.kind()
    }
}

/// Why decoding failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorReason {
    #[error("unexpected {found}, expected {expected}")]
    UnexpectedTokenKind { expected: Expected, found: TokenKind },
    #[error("duplicate field `{0}`")]
    DuplicateField(String),
    #[error("unknown field `{0}`")]
    UnknownField(String),
    #[error("missing field `{0}`")]
    MissingField(String),
    #[error("number {lexeme} out of range for {target}")]
    NumberOutOfRange { lexeme: String, target: Kind },
    #[error("unexpected end of input")]
    PrematureEndOfInput,
    #[error("trailing data after value")]
    TrailingData,
    #[error("syntax error: {0}")]
    TokenizationFailure(#[from] SyntaxError),
    #[error("recursion limit exceeded")]
    RecursionLimitExceeded,
}

impl ErrorReason {
    /// The data-less classification of this reason.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            ErrorReason::UnexpectedTokenKind { .. } => ErrorKind::UnexpectedTokenKind,
            ErrorReason::DuplicateField(_) => ErrorKind::DuplicateField,
            ErrorReason::UnknownField(_) => ErrorKind::UnknownField,
            ErrorReason::MissingField(_) => ErrorKind::MissingField,
            ErrorReason::NumberOutOfRange { .. } => ErrorKind::NumberOutOfRange,
            ErrorReason::PrematureEndOfInput => ErrorKind::PrematureEndOfInput,
            ErrorReason::TrailingData => ErrorKind::TrailingData,
            ErrorReason::TokenizationFailure(_) => ErrorKind::TokenizationFailure,
            ErrorReason::RecursionLimitExceeded => ErrorKind::RecursionLimitExceeded,
        }
    }
}

/// Classification of a [`DecodeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnexpectedTokenKind,
    DuplicateField,
    UnknownField,
    MissingField,
    NumberOutOfRange,
    PrematureEndOfInput,
    TrailingData,
    TokenizationFailure,
    RecursionLimitExceeded,
}

/// What the decoder was looking for when it met an unexpected token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    Object,
    Array,
    String,
    Bool,
    Number,
    /// A member name or the end of the object.
    Key,
    /// Any JSON value.
    Value,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Expected::Object => "'{'",
            Expected::Array => "'['",
            Expected::String => "string",
            Expected::Bool => "boolean",
            Expected::Number => "number",
            Expected::Key => "string or '}'",
            Expected::Value => "value",
        })
    }
}
