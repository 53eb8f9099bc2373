//! The codec contract shared by every message in the feed schema.

use std::fmt;

use tracing::debug;

use crate::builder::Builder;
use crate::error::{DecodeError, DecodeErrorKind, UninitializedError};
use crate::wire::{Reader, WireType};

/// A message in the GTFS-Realtime schema.
///
/// Decoding follows protobuf merge semantics: duplicate scalars take the
/// last value, repeated fields append, sub-messages merge recursively.
/// Missing required fields never fail a decode; they are reported by
/// [`is_initialized`](Message::is_initialized) and enforced when the
/// message is serialized or [built](crate::Builder::build).
pub trait Message: Default + Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Merges one `(field, wire)` occurrence from the reader into `self`.
    ///
    /// Field numbers and wire-type/field-number combinations the schema
    /// does not recognize are captured in the message's unknown fields.
    fn merge_field(
        &mut self,
        field: u32,
        wire: WireType,
        reader: &mut Reader<'_>,
    ) -> Result<(), DecodeErrorKind>;

    /// Writes every present field in ascending field-number order, then any
    /// retained unknown fields, without validating initialization.
    fn encode_raw(&self, buf: &mut Vec<u8>);

    /// Serialized size in bytes. Recomputed on every call.
    fn encoded_len(&self) -> usize;

    /// Field-by-field overlay from `other`: present scalars overwrite,
    /// repeated fields append, sub-messages merge recursively.
    fn merge(&mut self, other: &Self);

    /// Appends the dotted path of every unset required field, transitively.
    ///
    /// Messages whose type (transitively) declares no required fields keep
    /// the default no-op.
    fn missing_required(&self, prefix: &str, missing: &mut Vec<String>) {
        let _ = (prefix, missing);
    }

    /// Resets every field, including unknown fields.
    fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether every required field is set, transitively.
    fn is_initialized(&self) -> bool {
        self.check_initialized().is_ok()
    }

    /// Like [`is_initialized`](Message::is_initialized), but reports which
    /// field paths are missing.
    fn check_initialized(&self) -> Result<(), UninitializedError> {
        let mut missing = Vec::new();
        self.missing_required("", &mut missing);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(UninitializedError::new(missing))
        }
    }

    /// Decodes a message from `bytes`.
    ///
    /// # Errors
    ///
    /// Fails only on malformed wire data. The error carries whatever fields
    /// decoded before the failure; see [`DecodeError::partial_message`].
    fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut message = Self::default();
        let mut reader = Reader::new(bytes);
        match merge_fields(&mut message, &mut reader) {
            Ok(()) => Ok(message),
            Err(kind) => {
                debug!(%kind, "wire decode failed");
                Err(DecodeError::with_partial(kind, message))
            }
        }
    }

    /// Overlays wire data onto `self` with the same merge semantics as
    /// decoding, e.g. to apply a DIFFERENTIAL feed on top of a full one.
    fn merge_from_bytes(&mut self, bytes: &[u8]) -> Result<(), DecodeError> {
        let mut reader = Reader::new(bytes);
        merge_fields(self, &mut reader).map_err(DecodeError::from)
    }

    /// Serializes into `buf`.
    ///
    /// # Errors
    ///
    /// Fails if any required field is unset, transitively.
    fn encode(&self, buf: &mut Vec<u8>) -> Result<(), UninitializedError> {
        self.check_initialized()?;
        buf.reserve(self.encoded_len());
        self.encode_raw(buf);
        Ok(())
    }

    /// Serializes into a fresh buffer.
    ///
    /// # Errors
    ///
    /// Fails if any required field is unset, transitively.
    fn encode_to_vec(&self) -> Result<Vec<u8>, UninitializedError> {
        self.check_initialized()?;
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.encode_raw(&mut buf);
        Ok(buf)
    }

    /// Starts a [`Builder`] staging a fresh message.
    fn builder() -> Builder<Self> {
        Builder::new()
    }
}

/// Runs the tag dispatch loop until the reader is exhausted.
pub(crate) fn merge_fields<M: Message>(
    message: &mut M,
    reader: &mut Reader<'_>,
) -> Result<(), DecodeErrorKind> {
    while reader.has_remaining() {
        let (field, wire) = reader.read_tag()?;
        message.merge_field(field, wire, reader)?;
    }
    Ok(())
}

pub(crate) fn join_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{prefix}.{field}")
    }
}

/// An enum field, carried as an int32 varint on the wire.
///
/// `Default` is the schema-declared default value, which for some of the
/// alert enums is not the first constant.
pub trait ProtoEnum: Copy + Clone + PartialEq + Eq + fmt::Debug + Default {
    fn from_i32(value: i32) -> Option<Self>;
    fn as_i32(self) -> i32;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::FeedHeader;

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("", "header"), "header");
        assert_eq!(join_path("entity[2]", "id"), "entity[2].id");
    }

    #[test]
    fn test_decode_empty_bytes_is_default() {
        // An empty buffer is a valid encoding of an all-default message
        let header = FeedHeader::decode(&[]).unwrap();
        assert_eq!(header, FeedHeader::default());
        assert!(!header.is_initialized());
    }

    #[test]
    fn test_encode_uninitialized_fails() {
        let header = FeedHeader::default();
        let err = header.encode_to_vec().unwrap_err();
        assert_eq!(err.missing_fields(), ["gtfs_realtime_version"]);
    }

    #[test]
    fn test_clear_resets_to_default() {
        let mut header = FeedHeader {
            gtfs_realtime_version: Some("2.0".to_string()),
            timestamp: Some(1),
            ..Default::default()
        };
        header.clear();
        assert_eq!(header, FeedHeader::default());
    }
}
