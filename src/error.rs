//! The two failure kinds the codec surfaces: invalid wire format during
//! decoding, and missing required fields at build/encode time.

use std::any::Any;
use std::fmt;

/// Diagnostic detail attached to a [`DecodeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecodeErrorKind {
    #[error("unexpected end of buffer")]
    Truncated,
    #[error("varint exceeds ten bytes")]
    InvalidVarint,
    #[error("field number is out of range")]
    InvalidFieldNumber,
    #[error("unsupported wire type {0}")]
    InvalidWireType(u32),
    #[error("string field is not valid UTF-8")]
    InvalidUtf8,
    #[error("message nesting exceeds {limit} levels", limit = crate::wire::DEPTH_LIMIT)]
    DepthLimit,
}

/// Object-safe view of a partially decoded message.
trait ErasedPartial: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn fmt_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl<T: Any + fmt::Debug + Send + Sync> ErasedPartial for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn fmt_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A byte stream could not be decoded as a message.
///
/// All wire-level failures collapse into this one error. The fields decoded
/// before the failure are carried along for diagnostics and can be recovered
/// with [`DecodeError::partial_message`].
pub struct DecodeError {
    kind: DecodeErrorKind,
    partial: Option<Box<dyn ErasedPartial>>,
}

impl DecodeError {
    pub(crate) fn with_partial<M>(kind: DecodeErrorKind, partial: M) -> Self
    where
        M: Any + fmt::Debug + Send + Sync,
    {
        DecodeError { kind, partial: Some(Box::new(partial)) }
    }

    pub fn kind(&self) -> DecodeErrorKind {
        self.kind
    }

    /// The fields that decoded successfully before the failure, if the
    /// failure site attached them.
    pub fn partial_message<M: Any>(&self) -> Option<&M> {
        self.partial.as_ref()?.as_any().downcast_ref::<M>()
    }
}

impl From<DecodeErrorKind> for DecodeError {
    fn from(kind: DecodeErrorKind) -> Self {
        DecodeError { kind, partial: None }
    }
}

impl fmt::Debug for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct Partial<'a>(&'a dyn ErasedPartial);
        impl fmt::Debug for Partial<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt_debug(f)
            }
        }

        let mut out = f.debug_struct("DecodeError");
        out.field("kind", &self.kind);
        if let Some(partial) = &self.partial {
            out.field("partial", &Partial(partial.as_ref()));
        }
        out.finish()
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid wire format: {}", self.kind)
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

/// A message was built or serialized while required fields were missing.
///
/// Paths are dotted and indexed the way the feed nests, e.g.
/// `entity[0].trip_update.trip`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("message is missing required fields: {}", .missing.join(", "))]
pub struct UninitializedError {
    missing: Vec<String>,
}

impl UninitializedError {
    pub(crate) fn new(missing: Vec<String>) -> Self {
        UninitializedError { missing }
    }

    pub fn missing_fields(&self) -> &[String] {
        &self.missing
    }
}
