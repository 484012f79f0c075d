use thiserror::Error;

/// A lexical failure reported by the [`Lexer`](super::Lexer).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{error} at offset {offset}")]
pub struct LexError {
    /// What went wrong.
    pub error: SyntaxError,
    /// Byte offset of the offending input byte.
    pub offset: usize,
}

/// Reasons the token source can fail to lex its input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("invalid character '{}'", .0.escape_debug())]
    InvalidCharacter(char),
    #[error("invalid UTF-8 in string")]
    InvalidUtf8,
    #[error("control character U+{0:04X} in string")]
    ControlCharacter(u32),
    #[error("invalid escape character '{}'", .0.escape_debug())]
    InvalidEscape(char),
    #[error("invalid unicode escape sequence at character: '{}'", .0.escape_debug())]
    InvalidUnicodeEscapeChar(char),
    #[error("invalid unicode escape sequence \\u{0:04X}")]
    InvalidUnicodeEscapeSequence(u32),
    #[error("mismatched closing '{0}'")]
    MismatchedClose(char),
    #[error("trailing comma")]
    TrailingComma,
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
}
