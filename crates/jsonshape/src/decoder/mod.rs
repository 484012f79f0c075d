//! The schema-driven decoder.
//!
//! A [`Decoder`] owns a [`TokenSource`] and walks it forward exactly once.
//! Typed targets drive it through the [`Decode`] and [`Record`] traits;
//! [`decode_value`] drives the same engine from a [`RecordSchema`] alone.
//!
//! The decoder holds at most one token beyond the current one (the peek slot
//! used to detect the end of an array) and one [`PresenceSet`] per object
//! that is currently open.

mod presence;

use std::borrow::Cow;

pub(crate) use presence::PresenceSet;

use crate::{
    decode::Record,
    error::{DecodeError, ErrorReason, Expected},
    lexer::{LexError, Lexer, Spanned, SyntaxError, Token, TokenKind, TokenSource},
    options::{DecoderOptions, MissingFieldPolicy},
    schema::{FloatPrecision, Kind, RecordSchema, Shape, UnknownFieldPolicy},
    value::{Map, Value},
};

/// Decodes values of known shape from a [`TokenSource`].
#[derive(Debug)]
pub struct Decoder<'src, S> {
    source: S,
    peeked: Option<Spanned<Token<'src>>>,
    depth: usize,
    options: DecoderOptions,
}

impl<'src> Decoder<'src, Lexer<'src>> {
    /// Creates a decoder over a complete JSON buffer.
    #[must_use]
    pub fn from_slice(input: &'src [u8], options: DecoderOptions) -> Self {
        Self::with_options(Lexer::new(input), options)
    }
}

impl<'src, S: TokenSource<'src>> Decoder<'src, S> {
    /// Creates a decoder with default options.
    pub fn new(source: S) -> Self {
        Self::with_options(source, DecoderOptions::default())
    }

    /// Creates a decoder that applies `options` to every record it reads.
    pub fn with_options(source: S, options: DecoderOptions) -> Self {
        Self {
            source,
            peeked: None,
            depth: 0,
            options,
        }
    }

    /// The options this decoder was created with.
    #[must_use]
    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    // ------------------------------------------------------------------------------------------------
    // Token access
    // ------------------------------------------------------------------------------------------------

    fn next(&mut self) -> Result<Spanned<Token<'src>>, DecodeError> {
        if let Some(token) = self.peeked.take() {
            return Ok(token);
        }
        match self.source.next_token() {
            Ok(Some(token)) => Ok(token),
            Ok(None) => Err(DecodeError::new(
                ErrorReason::PrematureEndOfInput,
                self.source.offset(),
            )),
            Err(err) => Err(lex_error(err)),
        }
    }

    fn peek_kind(&mut self) -> Result<TokenKind, DecodeError> {
        if let Some(token) = &self.peeked {
            return Ok(token.value.kind());
        }
        let token = self.next()?;
        let kind = token.value.kind();
        self.peeked = Some(token);
        Ok(kind)
    }

    fn enter(&mut self, offset: usize) -> Result<(), DecodeError> {
        if self.depth >= self.options.max_depth {
            return Err(DecodeError::new(
                ErrorReason::RecursionLimitExceeded,
                offset,
            ));
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Requires that the token source is exhausted.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::TrailingData`](crate::ErrorKind::TrailingData) at the
    /// offset of whatever follows, token or not.
    pub fn end(&mut self) -> Result<(), DecodeError> {
        let offset = match self.peeked.take() {
            Some(token) => token.offset,
            None => match self.source.next_token() {
                Ok(None) => return Ok(()),
                Ok(Some(token)) => token.offset,
                Err(err) => err.offset,
            },
        };
        Err(DecodeError::new(ErrorReason::TrailingData, offset))
    }

    // ------------------------------------------------------------------------------------------------
    // Scalars
    // ------------------------------------------------------------------------------------------------

    /// Reads a string token.
    ///
    /// # Errors
    ///
    /// Fails on any other token kind.
    pub fn decode_str(&mut self) -> Result<Cow<'src, str>, DecodeError> {
        let token = self.next()?;
        match token.value {
            Token::String(s) => Ok(s),
            other => Err(unexpected(Expected::String, &other, token.offset)),
        }
    }

    /// Reads a boolean token.
    ///
    /// # Errors
    ///
    /// Fails on any other token kind.
    pub fn decode_bool(&mut self) -> Result<bool, DecodeError> {
        let token = self.next()?;
        match token.value {
            Token::Bool(b) => Ok(b),
            other => Err(unexpected(Expected::Bool, &other, token.offset)),
        }
    }

    /// Reads a number token as an integer of kind `kind`, range-checked
    /// against the kind's width.
    ///
    /// # Errors
    ///
    /// Fails on a non-number token, or with
    /// [`ErrorKind::NumberOutOfRange`](crate::ErrorKind::NumberOutOfRange)
    /// when the lexeme has a fraction or exponent or does not fit.
    pub fn decode_integer<T: TryFrom<i128>>(&mut self, kind: Kind) -> Result<T, DecodeError> {
        let (lexeme, offset) = self.number()?;
        let out_of_range = || {
            DecodeError::new(
                ErrorReason::NumberOutOfRange {
                    lexeme: lexeme.to_owned(),
                    target: kind,
                },
                offset,
            )
        };

        if lexeme.contains(['.', 'e', 'E']) {
            return Err(out_of_range());
        }
        let (min, max) = kind.integer_bounds().ok_or_else(out_of_range)?;
        match lexeme.parse::<i128>() {
            Ok(value) if (min..=max).contains(&value) => {
                T::try_from(value).map_err(|_| out_of_range())
            }
            _ => Err(out_of_range()),
        }
    }

    /// Reads a number token as a float of the given precision. Any lexeme the
    /// tokenizer accepts is accepted; magnitudes beyond the precision
    /// saturate to infinity.
    ///
    /// # Errors
    ///
    /// Fails on a non-number token.
    pub fn decode_float(&mut self, precision: FloatPrecision) -> Result<f64, DecodeError> {
        let (lexeme, offset) = self.number()?;
        let parsed = match precision {
            FloatPrecision::Single => lexeme.parse::<f32>().map(f64::from),
            FloatPrecision::Double => lexeme.parse::<f64>(),
        };
        parsed.map_err(|_| {
            DecodeError::new(
                ErrorReason::NumberOutOfRange {
                    lexeme: lexeme.to_owned(),
                    target: Kind::Float(precision),
                },
                offset,
            )
        })
    }

    fn number(&mut self) -> Result<(&'src str, usize), DecodeError> {
        let token = self.next()?;
        match token.value {
            Token::Number(lexeme) => Ok((lexeme, token.offset)),
            other => Err(unexpected(Expected::Number, &other, token.offset)),
        }
    }

    // ------------------------------------------------------------------------------------------------
    // Composites
    // ------------------------------------------------------------------------------------------------

    /// Reads an array, calling `element` once per element in input order.
    ///
    /// # Errors
    ///
    /// Fails if the next token is not `[`, or with the first error returned
    /// by `element`.
    pub fn decode_sequence<F>(&mut self, mut element: F) -> Result<(), DecodeError>
    where
        F: FnMut(&mut Self) -> Result<(), DecodeError>,
    {
        let open = self.next()?;
        if !matches!(open.value, Token::ArrayBegin) {
            return Err(unexpected(Expected::Array, &open.value, open.offset));
        }
        self.enter(open.offset)?;
        while self.peek_kind()? != TokenKind::ArrayEnd {
            element(self)?;
        }
        self.peeked = None;
        self.leave();
        Ok(())
    }

    /// Reads an optional value: `null` yields `false` without calling
    /// `present`, anything else is handed to `present`.
    ///
    /// # Errors
    ///
    /// Whatever `present` returns.
    pub fn decode_optional<F>(&mut self, present: F) -> Result<bool, DecodeError>
    where
        F: FnOnce(&mut Self) -> Result<(), DecodeError>,
    {
        if self.peek_kind()? == TokenKind::Null {
            self.peeked = None;
            return Ok(false);
        }
        present(self)?;
        Ok(true)
    }

    /// Decodes an object into a typed record.
    ///
    /// # Errors
    ///
    /// See [`Decoder::decode_object`].
    pub fn decode_record<R: Record>(&mut self, target: &mut R) -> Result<(), DecodeError> {
        self.decode_object(R::schema(), |de, index| target.decode_field(index, de))
    }

    /// Reads one object against `schema`.
    ///
    /// Each key is looked up in the schema's name table. A declared key is
    /// marked present and its value handed to `field` with the field's index;
    /// an undeclared key is skipped or rejected according to the unknown-field
    /// policy in effect.
    ///
    /// # Errors
    ///
    /// - [`UnexpectedTokenKind`](crate::ErrorKind::UnexpectedTokenKind) if the
    ///   value is not an object or a key is not a string.
    /// - [`DuplicateField`](crate::ErrorKind::DuplicateField) at the second
    ///   occurrence of a declared key.
    /// - [`UnknownField`](crate::ErrorKind::UnknownField) at an undeclared key
    ///   when unknown fields are rejected.
    /// - [`MissingField`](crate::ErrorKind::MissingField) at the closing brace
    ///   when missing fields are rejected.
    /// - Anything `field` returns.
    pub fn decode_object<F>(&mut self, schema: &RecordSchema, mut field: F) -> Result<(), DecodeError>
    where
        F: FnMut(&mut Self, usize) -> Result<(), DecodeError>,
    {
        let open = self.next()?;
        if !matches!(open.value, Token::ObjectBegin) {
            return Err(unexpected(Expected::Object, &open.value, open.offset));
        }
        self.enter(open.offset)?;

        let unknown_fields = self
            .options
            .unknown_fields
            .unwrap_or_else(|| schema.unknown_fields());
        let mut present = PresenceSet::with_capacity(schema.len());

        loop {
            let key = self.next()?;
            let name = match key.value {
                Token::String(name) => name,
                Token::ObjectEnd => {
                    self.check_missing(schema, &present, key.offset)?;
                    break;
                }
                other => return Err(unexpected(Expected::Key, &other, key.offset)),
            };

            match schema.field_index(&name) {
                Some(index) => {
                    if !present.insert(index) {
                        return Err(DecodeError::new(
                            ErrorReason::DuplicateField(name.into_owned()),
                            key.offset,
                        ));
                    }
                    field(self, index)?;
                }
                None if unknown_fields == UnknownFieldPolicy::Reject => {
                    return Err(DecodeError::new(
                        ErrorReason::UnknownField(name.into_owned()),
                        key.offset,
                    ));
                }
                None => self.skip_value()?,
            }
        }

        self.leave();
        Ok(())
    }

    fn check_missing(
        &self,
        schema: &RecordSchema,
        present: &PresenceSet,
        offset: usize,
    ) -> Result<(), DecodeError> {
        if self.options.missing_fields == MissingFieldPolicy::Ignore {
            return Ok(());
        }
        let missing = schema
            .fields()
            .iter()
            .enumerate()
            .find(|(index, field)| field.shape().is_required() && !present.contains(*index));
        match missing {
            Some((_, field)) => Err(DecodeError::new(
                ErrorReason::MissingField(field.wire_name().to_owned()),
                offset,
            )),
            None => Ok(()),
        }
    }

    // ------------------------------------------------------------------------------------------------
    // Untyped values
    // ------------------------------------------------------------------------------------------------

    /// Consumes one complete value of any shape without storing it.
    ///
    /// # Errors
    ///
    /// Fails on a stray closing token, on end of input before the value is
    /// complete, or when nesting exceeds the recursion limit.
    pub fn skip_value(&mut self) -> Result<(), DecodeError> {
        let token = self.next()?;
        match token.value {
            Token::ObjectBegin => {
                self.enter(token.offset)?;
                loop {
                    let key = self.next()?;
                    match key.value {
                        Token::ObjectEnd => break,
                        Token::String(_) => self.skip_value()?,
                        other => return Err(unexpected(Expected::Key, &other, key.offset)),
                    }
                }
                self.leave();
            }
            Token::ArrayBegin => {
                self.enter(token.offset)?;
                while self.peek_kind()? != TokenKind::ArrayEnd {
                    self.skip_value()?;
                }
                self.peeked = None;
                self.leave();
            }
            Token::ObjectEnd | Token::ArrayEnd => {
                return Err(unexpected(Expected::Value, &token.value, token.offset));
            }
            Token::String(_) | Token::Number(_) | Token::Bool(_) | Token::Null => {}
        }
        Ok(())
    }

    /// Consumes one complete value of any shape into a [`Value`].
    ///
    /// Integers that fit `i64` become [`Value::Integer`], larger positive
    /// ones that fit `u64` become [`Value::Unsigned`], everything else
    /// becomes [`Value::Float`]. Repeated keys keep the last value.
    ///
    /// # Errors
    ///
    /// As for [`Decoder::skip_value`].
    pub fn capture_value(&mut self) -> Result<Value, DecodeError> {
        let token = self.next()?;
        Ok(match token.value {
            Token::ObjectBegin => {
                self.enter(token.offset)?;
                let mut map = Map::new();
                loop {
                    let key = self.next()?;
                    match key.value {
                        Token::ObjectEnd => break,
                        Token::String(name) => {
                            let value = self.capture_value()?;
                            map.insert(name.into_owned(), value);
                        }
                        other => return Err(unexpected(Expected::Key, &other, key.offset)),
                    }
                }
                self.leave();
                Value::Object(map)
            }
            Token::ArrayBegin => {
                self.enter(token.offset)?;
                let mut items = Vec::new();
                while self.peek_kind()? != TokenKind::ArrayEnd {
                    items.push(self.capture_value()?);
                }
                self.peeked = None;
                self.leave();
                Value::Array(items)
            }
            Token::ObjectEnd | Token::ArrayEnd => {
                return Err(unexpected(Expected::Value, &token.value, token.offset));
            }
            Token::String(s) => Value::String(s.into_owned()),
            Token::Number(lexeme) => number_value(lexeme),
            Token::Bool(b) => Value::Boolean(b),
            Token::Null => Value::Null,
        })
    }

    // ------------------------------------------------------------------------------------------------
    // Schema interpreter
    // ------------------------------------------------------------------------------------------------

    /// Decodes one value of the given shape into a [`Value`].
    ///
    /// `Dynamic` values are skipped and reported as [`Value::Null`];
    /// `Optional` values read as `null` are [`Value::Null`] too.
    ///
    /// # Errors
    ///
    /// The same errors typed decoding of an equivalent target would raise.
    pub fn decode_shape(&mut self, shape: &Shape) -> Result<Value, DecodeError> {
        Ok(match shape {
            Shape::Scalar(kind) => self.decode_scalar(*kind)?,
            Shape::Optional(inner) => {
                let mut value = Value::Null;
                self.decode_optional(|de| {
                    value = de.decode_shape(inner)?;
                    Ok(())
                })?;
                value
            }
            Shape::Sequence(inner) => {
                let mut items = Vec::new();
                self.decode_sequence(|de| {
                    items.push(de.decode_shape(inner)?);
                    Ok(())
                })?;
                Value::Array(items)
            }
            Shape::Record(schema) => self.decode_record_value(schema.get())?,
            Shape::Dynamic => {
                self.skip_value()?;
                Value::Null
            }
            Shape::Any => self.capture_value()?,
        })
    }

    /// Decodes one object against `schema` into a [`Value::Object`] keyed by
    /// wire name. Absent and `Dynamic` fields do not appear in the map.
    ///
    /// # Errors
    ///
    /// See [`Decoder::decode_object`].
    pub fn decode_record_value(&mut self, schema: &RecordSchema) -> Result<Value, DecodeError> {
        let mut map = Map::new();
        self.decode_object(schema, |de, index| {
            let Some(field) = schema.fields().get(index) else {
                return de.skip_value();
            };
            let value = de.decode_shape(field.shape())?;
            if !matches!(field.shape(), Shape::Dynamic) {
                map.insert(field.wire_name().to_owned(), value);
            }
            Ok(())
        })?;
        Ok(Value::Object(map))
    }

    fn decode_scalar(&mut self, kind: Kind) -> Result<Value, DecodeError> {
        Ok(match kind {
            Kind::String => Value::String(self.decode_str()?.into_owned()),
            Kind::Bool => Value::Boolean(self.decode_bool()?),
            Kind::SignedInteger(_) => Value::Integer(self.decode_integer(kind)?),
            Kind::UnsignedInteger(_) => Value::Unsigned(self.decode_integer(kind)?),
            Kind::Float(precision) => Value::Float(self.decode_float(precision)?),
        })
    }
}

fn number_value(lexeme: &str) -> Value {
    if !lexeme.contains(['.', 'e', 'E']) {
        if let Ok(n) = lexeme.parse::<i64>() {
            // `-0` keeps its sign, which only a float can carry.
            if n == 0 && lexeme.starts_with('-') {
                return Value::Float(-0.0);
            }
            return Value::Integer(n);
        }
        if let Ok(n) = lexeme.parse::<u64>() {
            return Value::Unsigned(n);
        }
    }
    // The tokenizer only hands out lexemes in the JSON number grammar, which
    // `f64::from_str` always accepts.
    Value::Float(lexeme.parse().unwrap_or(f64::NAN))
}

fn unexpected(expected: Expected, found: &Token<'_>, offset: usize) -> DecodeError {
    DecodeError::new(
        ErrorReason::UnexpectedTokenKind {
            expected,
            found: found.kind(),
        },
        offset,
    )
}

fn lex_error(err: LexError) -> DecodeError {
    let reason = match err.error {
        SyntaxError::UnexpectedEndOfInput => ErrorReason::PrematureEndOfInput,
        error => ErrorReason::TokenizationFailure(error),
    };
    DecodeError::new(reason, err.offset)
}

// ------------------------------------------------------------------------------------------------
// Entry points
// ------------------------------------------------------------------------------------------------

/// Decodes a complete JSON buffer into a new `R`.
///
/// # Errors
///
/// Any [`DecodeError`]; the buffer must hold exactly one object.
///
/// # Examples
///
/// ```rust
/// jsonshape::record! {
///     #[derive(Debug, Default, PartialEq)]
///     struct Example {
///         foo: String,
///         bar: i64,
///     }
/// }
///
/// let value: Example = jsonshape::from_slice(br#"{"foo":"hello","bar":42}"#).unwrap();
/// assert_eq!(value, Example { foo: "hello".into(), bar: 42 });
///
/// let err = jsonshape::from_slice::<Example>(br#"{"foo":"hello","bar":42,"bar":7}"#).unwrap_err();
/// assert_eq!(err.to_string(), "duplicate field `bar` at offset 24");
/// ```
pub fn from_slice<R: Record>(input: &[u8]) -> Result<R, DecodeError> {
    from_slice_with_options(input, DecoderOptions::default())
}

/// Like [`from_slice`], with explicit options.
///
/// # Errors
///
/// Any [`DecodeError`].
pub fn from_slice_with_options<R: Record>(
    input: &[u8],
    options: DecoderOptions,
) -> Result<R, DecodeError> {
    let mut target = R::default();
    decode_into_with_options(&mut target, input, options)?;
    Ok(target)
}

/// Decodes a JSON string into a new `R`.
///
/// # Errors
///
/// Any [`DecodeError`].
pub fn from_str<R: Record>(input: &str) -> Result<R, DecodeError> {
    from_slice(input.as_bytes())
}

/// Decodes into an existing target. Fields absent from the input keep their
/// current values.
///
/// On error the target may have been partially written and must not be
/// relied upon.
///
/// # Errors
///
/// Any [`DecodeError`].
pub fn decode_into<R: Record>(target: &mut R, input: &[u8]) -> Result<(), DecodeError> {
    decode_into_with_options(target, input, DecoderOptions::default())
}

/// Like [`decode_into`], with explicit options.
///
/// # Errors
///
/// Any [`DecodeError`].
#[tracing::instrument(
    level = "trace",
    name = "decode",
    skip_all,
    fields(record = R::schema().name(), len = input.len())
)]
pub fn decode_into_with_options<R: Record>(
    target: &mut R,
    input: &[u8],
    options: DecoderOptions,
) -> Result<(), DecodeError> {
    let mut de = Decoder::from_slice(input, options);
    de.decode_record(target)?;
    de.end()
}

/// Decodes a complete JSON buffer against a schema description alone.
///
/// # Errors
///
/// Any [`DecodeError`].
pub fn decode_value(schema: &RecordSchema, input: &[u8]) -> Result<Value, DecodeError> {
    decode_value_with_options(schema, input, DecoderOptions::default())
}

/// Like [`decode_value`], with explicit options.
///
/// # Errors
///
/// Any [`DecodeError`].
#[tracing::instrument(
    level = "trace",
    name = "decode_value",
    skip_all,
    fields(record = schema.name(), len = input.len())
)]
pub fn decode_value_with_options(
    schema: &RecordSchema,
    input: &[u8],
    options: DecoderOptions,
) -> Result<Value, DecodeError> {
    let mut de = Decoder::from_slice(input, options);
    let value = de.decode_record_value(schema)?;
    de.end()?;
    Ok(value)
}
