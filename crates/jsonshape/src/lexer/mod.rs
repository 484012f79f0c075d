//! Token source: a forward-only JSON tokenizer over a complete byte buffer.
//!
//! The lexer turns RFC 8259 text into a flat sequence of [`Token`]s, each
//! tagged with the byte offset at which it begins. Separators (`:` and `,`)
//! are validated but never emitted, so consumers only ever see structural
//! open/close tokens and scalars.
//!
//! Structure tracking
//! - A small container stack plus a [`ParseState`] decide which bytes are
//!   legal next: a `:` after every member name, a `,` between members and
//!   elements, no trailing commas.
//! - A closing bracket found where a *value* belongs is still emitted as a
//!   token. Rejecting it is the consumer's job, which lets the decoder report
//!   a precise token-kind mismatch instead of a generic syntax error.
//! - After one complete top-level value the lexer starts over, so any further
//!   content surfaces as the next token (or syntax error) rather than being
//!   silently ignored.
//!
//! Strings are handed out borrowed from the input whenever they contain no
//! escapes. Numbers are handed out as their raw lexeme; interpreting the
//! value is left to the consumer.

mod error;
mod escape_buffer;
mod literal_buffer;


use std::{borrow::Cow, fmt};

pub use error::{LexError, SyntaxError};
use escape_buffer::{UnicodeEscapeBuffer, combine_surrogates, is_high_surrogate};
use literal_buffer::{ExpectedLiteralBuffer, Step};

/// A primitive JSON token.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'src> {
    ObjectBegin,
    ObjectEnd,
    ArrayBegin,
    ArrayEnd,
    /// Decoded string contents; borrowed when the literal had no escapes.
    String(Cow<'src, str>),
    /// The raw number lexeme, e.g. `-12.5e3`.
    Number(&'src str),
    Bool(bool),
    Null,
}

impl Token<'_> {
    /// Returns the data-less kind of this token.
    #[must_use]
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::ObjectBegin => TokenKind::ObjectBegin,
            Token::ObjectEnd => TokenKind::ObjectEnd,
            Token::ArrayBegin => TokenKind::ArrayBegin,
            Token::ArrayEnd => TokenKind::ArrayEnd,
            Token::String(_) => TokenKind::String,
            Token::Number(_) => TokenKind::Number,
            Token::Bool(_) => TokenKind::Bool,
            Token::Null => TokenKind::Null,
        }
    }
}

/// The kind of a [`Token`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    ObjectBegin,
    ObjectEnd,
    ArrayBegin,
    ArrayEnd,
    String,
    Number,
    Bool,
    Null,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TokenKind::ObjectBegin => "'{'",
            TokenKind::ObjectEnd => "'}'",
            TokenKind::ArrayBegin => "'['",
            TokenKind::ArrayEnd => "']'",
            TokenKind::String => "string",
            TokenKind::Number => "number",
            TokenKind::Bool => "boolean",
            TokenKind::Null => "null",
        })
    }
}

/// A value tagged with the byte offset at which it begins.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub value: T,
    pub offset: usize,
}

/// A forward-only producer of tokens.
///
/// Implementations must never re-deliver a token once returned. `Ok(None)`
/// means the input is exhausted.
pub trait TokenSource<'src> {
    /// Reads the next token.
    ///
    /// # Errors
    ///
    /// Returns a [`LexError`] when the input cannot be tokenized.
    fn next_token(&mut self) -> Result<Option<Spanned<Token<'src>>>, LexError>;

    /// Current byte position; used to locate end-of-input conditions.
    fn offset(&self) -> usize;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Object,
    Array,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    Start,
    BeforePropertyName { after_comma: bool },
    AfterPropertyName,
    BeforePropertyValue,
    AfterPropertyValue,
    BeforeArrayValue { after_comma: bool },
    AfterArrayValue,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberState {
    Start,
    Sign,
    Zero,
    DecimalInteger,
    DecimalPoint,
    DecimalFraction,
    DecimalExponent,
    DecimalExponentSign,
    DecimalExponentInteger,
}

/// A [`TokenSource`] over an in-memory buffer.
///
/// # Examples
///
/// ```rust
/// use jsonshape::{Lexer, Token, TokenSource};
///
/// let mut lexer = Lexer::new(br#"{"id": 7}"#);
/// let mut kinds = Vec::new();
/// while let Some(token) = lexer.next_token().unwrap() {
///     kinds.push((token.offset, token.value));
/// }
/// assert_eq!(kinds[1], (1, Token::String("id".into())));
/// assert_eq!(kinds[2], (7, Token::Number("7")));
/// ```
#[derive(Debug)]
pub struct Lexer<'src> {
    input: &'src [u8],
    pos: usize,
    state: ParseState,
    containers: Vec<Container>,
    unicode_escape_buffer: UnicodeEscapeBuffer,
}

impl<'src> Lexer<'src> {
    /// Creates a lexer positioned at the start of `input`.
    #[must_use]
    pub fn new(input: &'src [u8]) -> Self {
        Self {
            input,
            pos: 0,
            state: ParseState::Start,
            containers: Vec::with_capacity(16),
            unicode_escape_buffer: UnicodeEscapeBuffer::new(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.pos += 1;
        }
    }

    fn lex(&mut self) -> Result<Option<Spanned<Token<'src>>>, LexError> {
        loop {
            self.skip_whitespace();
            let start = self.pos;
            let Some(b) = self.peek() else {
                return Ok(None);
            };

            let token = match self.state {
                ParseState::Start | ParseState::BeforePropertyValue => self.lex_value(b)?,
                ParseState::End => {
                    self.state = ParseState::Start;
                    continue;
                }
                ParseState::BeforePropertyName { after_comma } => match b {
                    b'"' => {
                        let name = self.lex_string()?;
                        self.state = ParseState::AfterPropertyName;
                        Token::String(name)
                    }
                    b'}' if after_comma => return Err(self.error(SyntaxError::TrailingComma, start)),
                    b'}' => self.close(Container::Object)?,
                    _ => self.lex_value(b)?,
                },
                ParseState::AfterPropertyName => {
                    if b != b':' {
                        return Err(self.invalid_char(start));
                    }
                    self.pos += 1;
                    self.state = ParseState::BeforePropertyValue;
                    continue;
                }
                ParseState::AfterPropertyValue => match b {
                    b',' => {
                        self.pos += 1;
                        self.state = ParseState::BeforePropertyName { after_comma: true };
                        continue;
                    }
                    b'}' => self.close(Container::Object)?,
                    b']' => return Err(self.error(SyntaxError::MismatchedClose(']'), start)),
                    _ => return Err(self.invalid_char(start)),
                },
                ParseState::BeforeArrayValue { after_comma } => match b {
                    b']' if after_comma => return Err(self.error(SyntaxError::TrailingComma, start)),
                    b']' => self.close(Container::Array)?,
                    _ => self.lex_value(b)?,
                },
                ParseState::AfterArrayValue => match b {
                    b',' => {
                        self.pos += 1;
                        self.state = ParseState::BeforeArrayValue { after_comma: true };
                        continue;
                    }
                    b']' => self.close(Container::Array)?,
                    b'}' => return Err(self.error(SyntaxError::MismatchedClose('}'), start)),
                    _ => return Err(self.invalid_char(start)),
                },
            };

            return Ok(Some(Spanned {
                value: token,
                offset: start,
            }));
        }
    }

    fn lex_value(&mut self, b: u8) -> Result<Token<'src>, LexError> {
        match b {
            b'{' => {
                self.pos += 1;
                self.containers.push(Container::Object);
                self.state = ParseState::BeforePropertyName { after_comma: false };
                Ok(Token::ObjectBegin)
            }
            b'[' => {
                self.pos += 1;
                self.containers.push(Container::Array);
                self.state = ParseState::BeforeArrayValue { after_comma: false };
                Ok(Token::ArrayBegin)
            }
            // A close where a value belongs: hand it out and let the consumer
            // reject it.
            b'}' | b']' => {
                self.pos += 1;
                self.state = ParseState::End;
                Ok(if b == b'}' {
                    Token::ObjectEnd
                } else {
                    Token::ArrayEnd
                })
            }
            b'"' => {
                let s = self.lex_string()?;
                self.after_value();
                Ok(Token::String(s))
            }
            b'-' | b'0'..=b'9' => {
                let n = self.lex_number()?;
                self.after_value();
                Ok(Token::Number(n))
            }
            b't' | b'f' | b'n' => {
                let literal = self.lex_literal(b)?;
                self.after_value();
                Ok(literal)
            }
            _ => Err(self.invalid_char(self.pos)),
        }
    }

    fn close(&mut self, container: Container) -> Result<Token<'src>, LexError> {
        let start = self.pos;
        match self.containers.pop() {
            Some(open) if open == container => {
                self.pos += 1;
                self.after_value();
                Ok(match container {
                    Container::Object => Token::ObjectEnd,
                    Container::Array => Token::ArrayEnd,
                })
            }
            _ => {
                let ch = match container {
                    Container::Object => '}',
                    Container::Array => ']',
                };
                Err(self.error(SyntaxError::MismatchedClose(ch), start))
            }
        }
    }

    fn after_value(&mut self) {
        self.state = match self.containers.last() {
            None => ParseState::End,
            Some(Container::Object) => ParseState::AfterPropertyValue,
            Some(Container::Array) => ParseState::AfterArrayValue,
        };
    }

    fn lex_literal(&mut self, first: u8) -> Result<Token<'src>, LexError> {
        self.pos += 1;
        let mut expected = ExpectedLiteralBuffer::new(first);
        loop {
            let Some(b) = self.peek() else {
                return Err(self.error(SyntaxError::UnexpectedEndOfInput, self.pos));
            };
            match expected.step(b) {
                Step::NeedMore => self.pos += 1,
                Step::Done(token) => {
                    self.pos += 1;
                    return Ok(token);
                }
                Step::Reject => return Err(self.invalid_char(self.pos)),
            }
        }
    }

    fn lex_number(&mut self) -> Result<&'src str, LexError> {
        use NumberState::*;

        let input: &'src [u8] = self.input;
        let start = self.pos;
        let mut state = Start;
        loop {
            state = match (state, self.peek()) {
                (Start, Some(b'-')) => Sign,
                (Start | Sign, Some(b'0')) => Zero,
                (Start | Sign, Some(b'1'..=b'9')) | (DecimalInteger, Some(b'0'..=b'9')) => {
                    DecimalInteger
                }
                (Zero | DecimalInteger, Some(b'.')) => DecimalPoint,
                (DecimalPoint | DecimalFraction, Some(b'0'..=b'9')) => DecimalFraction,
                (Zero | DecimalInteger | DecimalFraction, Some(b'e' | b'E')) => DecimalExponent,
                (DecimalExponent, Some(b'+' | b'-')) => DecimalExponentSign,
                (
                    DecimalExponent | DecimalExponentSign | DecimalExponentInteger,
                    Some(b'0'..=b'9'),
                ) => DecimalExponentInteger,
                (Zero | DecimalInteger | DecimalFraction | DecimalExponentInteger, _) => break,
                (_, None) => {
                    return Err(self.error(SyntaxError::UnexpectedEndOfInput, self.pos));
                }
                (_, Some(_)) => return Err(self.invalid_char(self.pos)),
            };
            self.pos += 1;
        }

        // Number lexemes are pure ASCII.
        std::str::from_utf8(&input[start..self.pos])
            .map_err(|_| self.error(SyntaxError::InvalidUtf8, start))
    }

    fn lex_string(&mut self) -> Result<Cow<'src, str>, LexError> {
        // opening quote
        self.pos += 1;
        let mut owned: Option<String> = None;
        let mut run_start = self.pos;

        loop {
            let Some(b) = self.peek() else {
                return Err(self.error(SyntaxError::UnexpectedEndOfInput, self.pos));
            };
            match b {
                b'"' => {
                    let run = self.utf8_run(run_start)?;
                    self.pos += 1;
                    return Ok(match owned {
                        Some(mut s) => {
                            s.push_str(run);
                            Cow::Owned(s)
                        }
                        None => Cow::Borrowed(run),
                    });
                }
                b'\\' => {
                    let run = self.utf8_run(run_start)?;
                    let buf = owned.get_or_insert_with(String::new);
                    buf.push_str(run);
                    self.lex_escape(buf)?;
                    run_start = self.pos;
                }
                0x00..=0x1F => {
                    return Err(self.error(SyntaxError::ControlCharacter(u32::from(b)), self.pos));
                }
                _ => self.pos += 1,
            }
        }
    }

    /// Validates `input[from..pos]` as UTF-8 and borrows it.
    fn utf8_run(&self, from: usize) -> Result<&'src str, LexError> {
        let input: &'src [u8] = self.input;
        std::str::from_utf8(&input[from..self.pos])
            .map_err(|err| self.error(SyntaxError::InvalidUtf8, from + err.valid_up_to()))
    }

    fn lex_escape(&mut self, buf: &mut String) -> Result<(), LexError> {
        let escape_start = self.pos;
        // backslash
        self.pos += 1;
        let Some(b) = self.peek() else {
            return Err(self.error(SyntaxError::UnexpectedEndOfInput, self.pos));
        };
        self.pos += 1;

        let ch = match b {
            b'"' => '"',
            b'\\' => '\\',
            b'/' => '/',
            b'b' => '\u{0008}',
            b'f' => '\u{000C}',
            b'n' => '\n',
            b'r' => '\r',
            b't' => '\t',
            b'u' => {
                let unit = self.lex_unicode_escape()?;
                if is_high_surrogate(unit) {
                    if !self.input[self.pos..].starts_with(b"\\u") {
                        return Err(self.error(
                            SyntaxError::InvalidUnicodeEscapeSequence(u32::from(unit)),
                            escape_start,
                        ));
                    }
                    self.pos += 2;
                    let low = self.lex_unicode_escape()?;
                    combine_surrogates(unit, low).ok_or_else(|| {
                        self.error(
                            SyntaxError::InvalidUnicodeEscapeSequence(u32::from(low)),
                            escape_start,
                        )
                    })?
                } else {
                    // A lone low surrogate is not a scalar value.
                    char::from_u32(u32::from(unit)).ok_or_else(|| {
                        self.error(
                            SyntaxError::InvalidUnicodeEscapeSequence(u32::from(unit)),
                            escape_start,
                        )
                    })?
                }
            }
            _ => {
                let offset = self.pos - 1;
                return Err(self.error(SyntaxError::InvalidEscape(self.char_at(offset)), offset));
            }
        };

        buf.push(ch);
        Ok(())
    }

    fn lex_unicode_escape(&mut self) -> Result<u16, LexError> {
        self.unicode_escape_buffer.reset();
        loop {
            let Some(b) = self.peek() else {
                return Err(self.error(SyntaxError::UnexpectedEndOfInput, self.pos));
            };
            let offset = self.pos;
            self.pos += 1;
            let fed = self.unicode_escape_buffer.feed(b);
            match fed {
                Ok(Some(unit)) => return Ok(unit),
                Ok(None) => {}
                Err(SyntaxError::InvalidUnicodeEscapeChar(_)) => {
                    return Err(self.error(
                        SyntaxError::InvalidUnicodeEscapeChar(self.char_at(offset)),
                        offset,
                    ));
                }
                Err(error) => return Err(self.error(error, offset)),
            }
        }
    }

    // ------------------------------------------------------------------------------------------------
    // Errors
    // ------------------------------------------------------------------------------------------------

    fn char_at(&self, offset: usize) -> char {
        let (ch, _) = bstr::decode_utf8(&self.input[offset..]);
        ch.unwrap_or(char::REPLACEMENT_CHARACTER)
    }

    fn invalid_char(&self, offset: usize) -> LexError {
        self.error(SyntaxError::InvalidCharacter(self.char_at(offset)), offset)
    }

    #[allow(clippy::unused_self)]
    fn error(&self, error: SyntaxError, offset: usize) -> LexError {
        LexError { error, offset }
    }
}

impl<'src> TokenSource<'src> for Lexer<'src> {
    fn next_token(&mut self) -> Result<Option<Spanned<Token<'src>>>, LexError> {
        self.lex()
    }

    fn offset(&self) -> usize {
        self.pos
    }
}
