//! Typed decoding targets.
//!
//! [`Decode`] is implemented for the scalar and container types a record
//! field may have; [`Record`] is implemented (through [`record!`](crate::record))
//! for structs decoded from JSON objects.

use crate::{
    decoder::Decoder,
    error::DecodeError,
    lexer::TokenSource,
    schema::{FloatPrecision, IntWidth, Kind, RecordSchema, Shape},
    value::Value,
};

/// A type that can be filled in place from a [`Decoder`].
///
/// Targets start from [`Default`]; decoding overwrites what the input
/// supplies.
pub trait Decode: Default {
    /// The schema shape this type decodes from.
    fn shape() -> Shape;

    /// Decodes one value into `self`.
    ///
    /// # Errors
    ///
    /// Any [`DecodeError`] raised while reading the value.
    fn decode<'src, S: TokenSource<'src>>(
        &mut self,
        de: &mut Decoder<'src, S>,
    ) -> Result<(), DecodeError>;
}

/// A struct decoded from a JSON object with a fixed set of fields.
///
/// Usually implemented with [`record!`](crate::record).
pub trait Record: Decode {
    /// The record's schema, built once and shared by every decode call.
    fn schema() -> &'static RecordSchema;

    /// Decodes the value for the field at `index` in
    /// [`schema().fields()`](RecordSchema::fields).
    ///
    /// # Errors
    ///
    /// Any [`DecodeError`] raised while reading the value.
    fn decode_field<'src, S: TokenSource<'src>>(
        &mut self,
        index: usize,
        de: &mut Decoder<'src, S>,
    ) -> Result<(), DecodeError>;
}

/// A field that accepts any JSON value and keeps nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Ignored;

impl Decode for Ignored {
    fn shape() -> Shape {
        Shape::Dynamic
    }

    fn decode<'src, S: TokenSource<'src>>(
        &mut self,
        de: &mut Decoder<'src, S>,
    ) -> Result<(), DecodeError> {
        de.skip_value()
    }
}

impl Decode for Value {
    fn shape() -> Shape {
        Shape::Any
    }

    fn decode<'src, S: TokenSource<'src>>(
        &mut self,
        de: &mut Decoder<'src, S>,
    ) -> Result<(), DecodeError> {
        *self = de.capture_value()?;
        Ok(())
    }
}

impl Decode for String {
    fn shape() -> Shape {
        Shape::Scalar(Kind::String)
    }

    fn decode<'src, S: TokenSource<'src>>(
        &mut self,
        de: &mut Decoder<'src, S>,
    ) -> Result<(), DecodeError> {
        let s = de.decode_str()?;
        self.clear();
        self.push_str(&s);
        Ok(())
    }
}

impl Decode for bool {
    fn shape() -> Shape {
        Shape::Scalar(Kind::Bool)
    }

    fn decode<'src, S: TokenSource<'src>>(
        &mut self,
        de: &mut Decoder<'src, S>,
    ) -> Result<(), DecodeError> {
        *self = de.decode_bool()?;
        Ok(())
    }
}

macro_rules! impl_integer {
    ($($ty:ty => $kind:expr),* $(,)?) => {
        $(
            impl Decode for $ty {
                fn shape() -> Shape {
                    Shape::Scalar($kind)
                }

                fn decode<'src, S: TokenSource<'src>>(
                    &mut self,
                    de: &mut Decoder<'src, S>,
                ) -> Result<(), DecodeError> {
                    *self = de.decode_integer($kind)?;
                    Ok(())
                }
            }
        )*
    };
}

impl_integer! {
    i8 => Kind::SignedInteger(IntWidth::W8),
    i16 => Kind::SignedInteger(IntWidth::W16),
    i32 => Kind::SignedInteger(IntWidth::W32),
    i64 => Kind::SignedInteger(IntWidth::W64),
    isize => Kind::SignedInteger(IntWidth::POINTER),
    u8 => Kind::UnsignedInteger(IntWidth::W8),
    u16 => Kind::UnsignedInteger(IntWidth::W16),
    u32 => Kind::UnsignedInteger(IntWidth::W32),
    u64 => Kind::UnsignedInteger(IntWidth::W64),
    usize => Kind::UnsignedInteger(IntWidth::POINTER),
}

impl Decode for f64 {
    fn shape() -> Shape {
        Shape::Scalar(Kind::Float(FloatPrecision::Double))
    }

    fn decode<'src, S: TokenSource<'src>>(
        &mut self,
        de: &mut Decoder<'src, S>,
    ) -> Result<(), DecodeError> {
        *self = de.decode_float(FloatPrecision::Double)?;
        Ok(())
    }
}

impl Decode for f32 {
    fn shape() -> Shape {
        Shape::Scalar(Kind::Float(FloatPrecision::Single))
    }

    #[allow(clippy::cast_possible_truncation)]
    fn decode<'src, S: TokenSource<'src>>(
        &mut self,
        de: &mut Decoder<'src, S>,
    ) -> Result<(), DecodeError> {
        // Parsed as f32 and widened, so narrowing back is exact.
        *self = de.decode_float(FloatPrecision::Single)? as f32;
        Ok(())
    }
}

impl<T: Decode> Decode for Option<T> {
    fn shape() -> Shape {
        Shape::optional(T::shape())
    }

    fn decode<'src, S: TokenSource<'src>>(
        &mut self,
        de: &mut Decoder<'src, S>,
    ) -> Result<(), DecodeError> {
        let mut value = self.take().unwrap_or_default();
        if de.decode_optional(|de| value.decode(de))? {
            *self = Some(value);
        }
        Ok(())
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn shape() -> Shape {
        Shape::sequence(T::shape())
    }

    fn decode<'src, S: TokenSource<'src>>(
        &mut self,
        de: &mut Decoder<'src, S>,
    ) -> Result<(), DecodeError> {
        self.clear();
        de.decode_sequence(|de| {
            let mut item = T::default();
            item.decode(de)?;
            self.push(item);
            Ok(())
        })
    }
}

impl<T: Decode> Decode for Box<T> {
    fn shape() -> Shape {
        T::shape()
    }

    fn decode<'src, S: TokenSource<'src>>(
        &mut self,
        de: &mut Decoder<'src, S>,
    ) -> Result<(), DecodeError> {
        (**self).decode(de)
    }
}
