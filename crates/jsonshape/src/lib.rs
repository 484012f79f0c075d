//! Schema-driven JSON decoding into statically known record shapes.
//!
//! Each record type carries a [`RecordSchema`] built once on first use. A
//! decode call walks the input's tokens forward exactly once, dispatching
//! every object key through the schema's name table to the matching field's
//! decoder, and fails with a [`DecodeError`] that names the byte offset of
//! the offending token.
//!
//! ```rust
//! use jsonshape::{ErrorKind, record};
//!
//! record! {
//!     #[derive(Debug, Default, PartialEq)]
//!     pub struct Point {
//!         pub x: i32,
//!         pub y: i32,
//!         pub label: Option<String> => "name",
//!     }
//! }
//!
//! let p: Point = jsonshape::from_str(r#"{"x":1,"y":-2,"name":"origin"}"#).unwrap();
//! assert_eq!(p.label.as_deref(), Some("origin"));
//!
//! let err = jsonshape::from_str::<Point>(r#"{"x":1}   {}"#).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::TrailingData);
//! assert_eq!(err.offset(), 10);
//! ```
#![allow(missing_docs)]

mod decode;
mod decoder;
mod error;
mod lexer;
mod options;
mod schema;
mod value;

#[cfg(test)]
mod tests;

pub use decode::{Decode, Ignored, Record};
pub use decoder::{
    Decoder, decode_into, decode_into_with_options, decode_value, decode_value_with_options,
    from_slice, from_slice_with_options, from_str,
};
pub use error::{DecodeError, ErrorKind, ErrorReason, Expected};
pub use lexer::{LexError, Lexer, Spanned, SyntaxError, Token, TokenKind, TokenSource};
pub use options::{DecoderOptions, MissingFieldPolicy};
pub use schema::{
    FieldNode, FloatPrecision, IntWidth, Kind, RecordSchema, RecordSchemaBuilder, SchemaError,
    SchemaRef, Shape, UnknownFieldPolicy,
};
pub use value::{Array, Map, Value};

/// Declares a struct decoded from a JSON object.
///
/// The struct is emitted as written; on top of it the macro implements
/// [`Decode`] and [`Record`], with a schema built once per process.
///
/// Per-field wire names:
/// - `field: Ty` is read from the key `"field"`;
/// - `field: Ty => "key"` is read from `"key"`;
/// - `field: Ty => _` is never read and keeps its [`Default`] value. `Ty`
///   need not implement [`Decode`].
///
/// A leading `#![deny_unknown_fields]` makes keys that match no field an
/// error instead of being skipped.
///
/// The struct must implement [`Default`].
///
/// ```rust
/// jsonshape::record! {
///     #![deny_unknown_fields]
///     #[derive(Debug, Default)]
///     struct Strict {
///         id: u32,
///         cache: std::cell::Cell<u8> => _,
///     }
/// }
///
/// let err = jsonshape::from_slice::<Strict>(br#"{"id":1,"cache":2}"#).unwrap_err();
/// assert_eq!(err.to_string(), "unknown field `cache` at offset 8");
/// ```
///
/// # Panics
///
/// The first use of the record panics if two fields share a wire name.
#[macro_export]
macro_rules! record {
    (
        #![deny_unknown_fields]
        $($rest:tt)*
    ) => {
        $crate::__record! { [deny_unknown_fields] $($rest)* }
    };
    ($($rest:tt)*) => {
        $crate::__record! { [] $($rest)* }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record {
    (
        [$($policy:ident)?]
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $ty:ty $(=> $wire:tt)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $ty,
            )*
        }

        impl $crate::Decode for $name {
            fn shape() -> $crate::Shape {
                $crate::Shape::record::<Self>()
            }

            fn decode<'src, S: $crate::TokenSource<'src>>(
                &mut self,
                de: &mut $crate::Decoder<'src, S>,
            ) -> ::core::result::Result<(), $crate::DecodeError> {
                de.decode_record(self)
            }
        }

        impl $crate::Record for $name {
            fn schema() -> &'static $crate::RecordSchema {
                static SCHEMA: ::std::sync::OnceLock<$crate::RecordSchema> =
                    ::std::sync::OnceLock::new();
                SCHEMA.get_or_init(|| {
                    let builder = $crate::RecordSchema::builder(::core::stringify!($name));
                    $(
                        let builder = $crate::__record_field!(builder, $field, $ty $(, $wire)?);
                    )*
                    $(
                        let builder = $crate::__record_policy!(builder, $policy);
                    )?
                    match builder.build() {
                        ::core::result::Result::Ok(schema) => schema,
                        ::core::result::Result::Err(err) => ::core::panic!("{err}"),
                    }
                })
            }

            #[allow(unused_mut, unused_assignments, unused_variables)]
            fn decode_field<'src, S: $crate::TokenSource<'src>>(
                &mut self,
                index: usize,
                de: &mut $crate::Decoder<'src, S>,
            ) -> ::core::result::Result<(), $crate::DecodeError> {
                let mut slot = 0usize;
                $(
                    $crate::__record_dispatch!(self, de, index, slot, $field $(, $wire)?);
                )*
                de.skip_value()
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_field {
    ($builder:ident, $field:ident, $ty:ty, _) => {
        $builder.ignored(::core::stringify!($field))
    };
    ($builder:ident, $field:ident, $ty:ty, $wire:literal) => {
        $builder.field($wire, <$ty as $crate::Decode>::shape())
    };
    ($builder:ident, $field:ident, $ty:ty) => {
        $builder.field(::core::stringify!($field), <$ty as $crate::Decode>::shape())
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_policy {
    ($builder:ident, deny_unknown_fields) => {
        $builder.deny_unknown_fields()
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_dispatch {
    ($this:ident, $de:ident, $index:ident, $slot:ident, $field:ident, _) => {};
    ($this:ident, $de:ident, $index:ident, $slot:ident, $field:ident $(, $wire:literal)?) => {
        if $slot == $index {
            return $crate::Decode::decode(&mut $this.$field, $de);
        }
        $slot += 1;
    };
}
