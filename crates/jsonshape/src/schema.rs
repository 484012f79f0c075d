//! Declarative description of record shapes.
//!
//! A [`RecordSchema`] is an ordered list of [`FieldNode`]s, each pairing the
//! key expected on the wire with the [`Shape`] of its value. Schemas are built
//! once per record type and reused by every decode call; nothing in them is
//! mutated while decoding.

use std::{collections::HashMap, fmt, ptr};

use thiserror::Error;

use crate::decode::Record;

/// Bit width of an integer target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntWidth {
    /// `i8`/`u8`.
    W8,
    /// `i16`/`u16`.
    W16,
    /// `i32`/`u32`.
    W32,
    /// `i64`/`u64`.
    W64,
}

impl IntWidth {
    /// Width of `isize`/`usize` on the current target.
    #[cfg(target_pointer_width = "16")]
    pub const POINTER: IntWidth = IntWidth::W16;
    /// Width of `isize`/`usize` on the current target.
    #[cfg(target_pointer_width = "32")]
    pub const POINTER: IntWidth = IntWidth::W32;
    /// Width of `isize`/`usize` on the current target.
    #[cfg(target_pointer_width = "64")]
    pub const POINTER: IntWidth = IntWidth::W64;

    /// Number of bits.
    #[must_use]
    pub fn bits(self) -> u32 {
        match self {
            IntWidth::W8 => 8,
            IntWidth::W16 => 16,
            IntWidth::W32 => 32,
            IntWidth::W64 => 64,
        }
    }

    /// Inclusive `[-2^(W-1), 2^(W-1)-1]`.
    #[must_use]
    pub fn signed_bounds(self) -> (i128, i128) {
        let half = 1i128 << (self.bits() - 1);
        (-half, half - 1)
    }

    /// Inclusive `[0, 2^W-1]`.
    #[must_use]
    pub fn unsigned_bounds(self) -> (i128, i128) {
        (0, (1i128 << self.bits()) - 1)
    }
}

/// Precision of a floating-point target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatPrecision {
    /// `f32`; overflow saturates to an `f32` infinity.
    Single,
    /// `f64`.
    Double,
}

/// A scalar leaf type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// A JSON string, unescaped.
    String,
    /// `true` or `false`.
    Bool,
    /// A number without fraction or exponent, within the signed bounds.
    SignedInteger(IntWidth),
    /// A number without fraction or exponent, within the unsigned bounds.
    UnsignedInteger(IntWidth),
    /// Any number.
    Float(FloatPrecision),
}

impl Kind {
    /// Inclusive bounds for integer kinds, `None` for everything else.
    #[must_use]
    pub fn integer_bounds(self) -> Option<(i128, i128)> {
        match self {
            Kind::SignedInteger(width) => Some(width.signed_bounds()),
            Kind::UnsignedInteger(width) => Some(width.unsigned_bounds()),
            Kind::String | Kind::Bool | Kind::Float(_) => None,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::String => f.write_str("string"),
            Kind::Bool => f.write_str("bool"),
            Kind::SignedInteger(width) => write!(f, "i{}", width.bits()),
            Kind::UnsignedInteger(width) => write!(f, "u{}", width.bits()),
            Kind::Float(FloatPrecision::Single) => f.write_str("f32"),
            Kind::Float(FloatPrecision::Double) => f.write_str("f64"),
        }
    }
}

/// A reference to a nested record's schema.
///
/// The lazy form defers to the record type's own `schema()` so that
/// self-referential records (`struct Node { children: Vec<Node> }`) can be
/// described without recursing while their schema is being built.
#[derive(Clone, Copy)]
pub enum SchemaRef {
    Static(&'static RecordSchema),
    Lazy(fn() -> &'static RecordSchema),
}

impl SchemaRef {
    /// Resolves the referenced schema.
    #[must_use]
    pub fn get(self) -> &'static RecordSchema {
        match self {
            SchemaRef::Static(schema) => schema,
            SchemaRef::Lazy(schema) => schema(),
        }
    }
}

impl PartialEq for SchemaRef {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.get(), other.get())
    }
}

impl fmt::Debug for SchemaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Only the name: nested schemas may refer back to their parent.
        f.debug_tuple("SchemaRef").field(&self.get().name()).finish()
    }
}

/// The shape of a field's value.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// A single token of the given kind.
    Scalar(Kind),
    /// Either absent (key missing or `null`) or a value of the inner shape.
    Optional(Box<Shape>),
    /// A homogeneous JSON array.
    Sequence(Box<Shape>),
    /// A nested JSON object with its own schema.
    Record(SchemaRef),
    /// Accept any value and discard it.
    Dynamic,
    /// Accept any value and keep it as a [`Value`](crate::Value).
    Any,
}

impl Shape {
    /// Wraps `inner` in [`Shape::Optional`].
    #[must_use]
    pub fn optional(inner: Shape) -> Self {
        Shape::Optional(Box::new(inner))
    }

    /// Wraps `inner` in [`Shape::Sequence`].
    #[must_use]
    pub fn sequence(inner: Shape) -> Self {
        Shape::Sequence(Box::new(inner))
    }

    /// The shape of record type `R`, resolved lazily.
    #[must_use]
    pub fn record<R: Record>() -> Self {
        Shape::Record(SchemaRef::Lazy(R::schema))
    }

    /// Whether an object must supply this field under
    /// [`MissingFieldPolicy::Reject`](crate::MissingFieldPolicy::Reject).
    #[must_use]
    pub fn is_required(&self) -> bool {
        !matches!(self, Shape::Optional(_) | Shape::Dynamic | Shape::Any)
    }
}

/// One declared field of a record.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldNode {
    wire_name: String,
    shape: Shape,
}

impl FieldNode {
    /// The key expected in JSON.
    #[must_use]
    pub fn wire_name(&self) -> &str {
        &self.wire_name
    }

    /// The shape its value must have.
    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }
}

/// How a record treats keys that match no declared field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownFieldPolicy {
    /// Skip the key and its (arbitrarily nested) value.
    #[default]
    Skip,
    /// Fail with [`ErrorKind::UnknownField`](crate::ErrorKind::UnknownField).
    Reject,
}

/// Errors raised while building a [`RecordSchema`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("record `{record}` declares wire name `{wire_name}` more than once")]
    DuplicateWireName { record: String, wire_name: String },
    #[error("record `{record}` declares an empty wire name")]
    EmptyWireName { record: String },
}

/// The declared shape of one record type.
///
/// # Examples
///
/// ```rust
/// use jsonshape::{IntWidth, Kind, RecordSchema, Shape};
///
/// let schema = RecordSchema::builder("Example")
///     .field("foo", Shape::Scalar(Kind::String))
///     .field("bar", Shape::Scalar(Kind::SignedInteger(IntWidth::W64)))
///     .build()
///     .unwrap();
/// assert_eq!(schema.field_index("bar"), Some(1));
/// assert_eq!(schema.field_index("Bar"), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSchema {
    name: String,
    fields: Vec<FieldNode>,
    names: HashMap<String, usize>,
    ignored: Vec<String>,
    unknown_fields: UnknownFieldPolicy,
}

impl RecordSchema {
    /// Starts describing a record called `name`.
    pub fn builder(name: impl Into<String>) -> RecordSchemaBuilder {
        RecordSchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
            ignored: Vec::new(),
            unknown_fields: UnknownFieldPolicy::Skip,
        }
    }

    /// The record's name, used in logs.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared fields, in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldNode] {
        &self.fields
    }

    /// Number of declared fields. Ignored fields are not counted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Exact, case-sensitive lookup of a wire name.
    #[must_use]
    pub fn field_index(&self, wire_name: &str) -> Option<usize> {
        self.names.get(wire_name).copied()
    }

    /// Names of declared-but-ignored fields. These never match a key.
    #[must_use]
    pub fn ignored_fields(&self) -> &[String] {
        &self.ignored
    }

    /// What to do with keys that match no declared field.
    #[must_use]
    pub fn unknown_fields(&self) -> UnknownFieldPolicy {
        self.unknown_fields
    }
}

/// Builder for [`RecordSchema`]; see [`RecordSchema::builder`].
#[derive(Debug)]
#[must_use]
pub struct RecordSchemaBuilder {
    name: String,
    fields: Vec<FieldNode>,
    ignored: Vec<String>,
    unknown_fields: UnknownFieldPolicy,
}

impl RecordSchemaBuilder {
    /// Declares a field expected under `wire_name`.
    pub fn field(mut self, wire_name: impl Into<String>, shape: Shape) -> Self {
        self.fields.push(FieldNode {
            wire_name: wire_name.into(),
            shape,
        });
        self
    }

    /// Records a field that exists on the target but is never decoded.
    pub fn ignored(mut self, name: impl Into<String>) -> Self {
        self.ignored.push(name.into());
        self
    }

    /// Sets the policy for keys that match no declared field.
    pub fn unknown_fields(mut self, policy: UnknownFieldPolicy) -> Self {
        self.unknown_fields = policy;
        self
    }

    /// Shorthand for `.unknown_fields(UnknownFieldPolicy::Reject)`.
    pub fn deny_unknown_fields(self) -> Self {
        self.unknown_fields(UnknownFieldPolicy::Reject)
    }

    /// Validates the declaration and builds the name table.
    ///
    /// # Errors
    ///
    /// Fails when two fields share a wire name or a wire name is empty.
    pub fn build(self) -> Result<RecordSchema, SchemaError> {
        let mut names = HashMap::with_capacity(self.fields.len());
        for (index, field) in self.fields.iter().enumerate() {
            if field.wire_name.is_empty() {
                return Err(SchemaError::EmptyWireName { record: self.name });
            }
            if names.insert(field.wire_name.clone(), index).is_some() {
                return Err(SchemaError::DuplicateWireName {
                    wire_name: field.wire_name.clone(),
                    record: self.name,
                });
            }
        }

        tracing::debug!(
            record = %self.name,
            fields = self.fields.len(),
            ignored = self.ignored.len(),
            "built record schema"
        );

        Ok(RecordSchema {
            name: self.name,
            fields: self.fields,
            names,
            ignored: self.ignored,
            unknown_fields: self.unknown_fields,
        })
    }
}
