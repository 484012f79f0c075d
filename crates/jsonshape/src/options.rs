use crate::schema::UnknownFieldPolicy;

/// What to do when an object closes without supplying every required field.
///
/// A field is required unless its shape is optional, dynamic, or any-value
/// (see [`Shape::is_required`](crate::Shape::is_required)).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingFieldPolicy {
    /// Absent fields keep whatever value the target already held.
    #[default]
    Ignore,
    /// Absent required fields fail with
    /// [`ErrorKind::MissingField`](crate::ErrorKind::MissingField) at the
    /// closing brace.
    Reject,
}

/// Configuration options for a decode call.
///
/// # Examples
///
/// ```rust
/// use jsonshape::{DecoderOptions, MissingFieldPolicy, UnknownFieldPolicy};
///
/// let options = DecoderOptions {
///     unknown_fields: Some(UnknownFieldPolicy::Reject),
///     missing_fields: MissingFieldPolicy::Reject,
///     ..Default::default()
/// };
/// assert_eq!(options.max_depth, 128);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderOptions {
    /// Overrides the unknown-field policy of every record in the call.
    ///
    /// When `None`, each record uses the policy declared in its schema.
    ///
    /// # Default
    ///
    /// `None`
    pub unknown_fields: Option<UnknownFieldPolicy>,

    /// Whether absent required fields are an error.
    ///
    /// # Default
    ///
    /// [`MissingFieldPolicy::Ignore`]
    pub missing_fields: MissingFieldPolicy,

    /// Maximum container nesting, counting both declared records and
    /// sequences and values that are being skipped.
    ///
    /// # Default
    ///
    /// `128`
    pub max_depth: usize,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            unknown_fields: None,
            missing_fields: MissingFieldPolicy::Ignore,
            max_depth: 128,
        }
    }
}
