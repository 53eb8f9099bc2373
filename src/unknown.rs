//! Retention of wire data the current schema does not recognize.
//!
//! A feed produced against a newer schema revision may carry field numbers,
//! wire types, or enum values this crate knows nothing about. Those values
//! are captured here instead of dropped, and re-emitted verbatim when the
//! message is serialized again.

use bytes::Bytes;
use tracing::trace;

use crate::error::DecodeErrorKind;
use crate::wire::{self, Reader, WireType};

/// A single unrecognized wire value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnknownValue {
    Varint(u64),
    Fixed32(u32),
    Fixed64(u64),
    LengthDelimited(Bytes),
}

impl UnknownValue {
    pub fn wire_type(&self) -> WireType {
        match self {
            UnknownValue::Varint(_) => WireType::Varint,
            UnknownValue::Fixed32(_) => WireType::Fixed32,
            UnknownValue::Fixed64(_) => WireType::Fixed64,
            UnknownValue::LengthDelimited(_) => WireType::LengthDelimited,
        }
    }
}

/// An unrecognized field number paired with the value it carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownField {
    pub number: u32,
    pub value: UnknownValue,
}

/// Unrecognized fields in wire arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnknownFieldSet {
    fields: Vec<UnknownField>,
}

impl UnknownFieldSet {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UnknownField> {
        self.fields.iter()
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }

    pub fn push(&mut self, number: u32, value: UnknownValue) {
        self.fields.push(UnknownField { number, value });
    }

    /// Captures the wire value of field `number` from the reader.
    pub fn read_value(
        &mut self,
        number: u32,
        wire: WireType,
        reader: &mut Reader<'_>,
    ) -> Result<(), DecodeErrorKind> {
        let value = match wire {
            WireType::Varint => UnknownValue::Varint(reader.read_varint()?),
            WireType::Fixed32 => UnknownValue::Fixed32(reader.read_fixed32()?),
            WireType::Fixed64 => UnknownValue::Fixed64(reader.read_fixed64()?),
            WireType::LengthDelimited => {
                UnknownValue::LengthDelimited(Bytes::copy_from_slice(reader.read_length_delimited()?))
            }
        };
        trace!(field = number, wire_type = ?wire, "retaining unrecognized field");
        self.push(number, value);
        Ok(())
    }

    /// Appends the other set's fields, preserving both arrival orders.
    pub fn merge(&mut self, other: &UnknownFieldSet) {
        self.fields.extend(other.fields.iter().cloned());
    }

    pub(crate) fn encode(&self, buf: &mut Vec<u8>) {
        for field in &self.fields {
            wire::put_key(buf, field.number, field.value.wire_type());
            match &field.value {
                UnknownValue::Varint(v) => wire::put_varint(buf, *v),
                UnknownValue::Fixed32(v) => wire::put_fixed32(buf, *v),
                UnknownValue::Fixed64(v) => wire::put_fixed64(buf, *v),
                UnknownValue::LengthDelimited(bytes) => {
                    wire::put_varint(buf, bytes.len() as u64);
                    buf.extend_from_slice(bytes);
                }
            }
        }
    }

    pub(crate) fn encoded_len(&self) -> usize {
        self.fields
            .iter()
            .map(|field| {
                wire::key_len(field.number)
                    + match &field.value {
                        UnknownValue::Varint(v) => wire::varint_len(*v),
                        UnknownValue::Fixed32(_) => 4,
                        UnknownValue::Fixed64(_) => 8,
                        UnknownValue::LengthDelimited(bytes) => {
                            wire::varint_len(bytes.len() as u64) + bytes.len()
                        }
                    }
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Field 9 varint 5, field 12 fixed32, field 12 fixed64, field 15 "abc"
    const RAW: &[u8] = &[
        0x48, 0x05, //
        0x65, 0x01, 0x00, 0x00, 0x00, //
        0x61, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
        0x7a, 0x03, b'a', b'b', b'c',
    ];

    fn capture(raw: &[u8]) -> UnknownFieldSet {
        let mut set = UnknownFieldSet::default();
        let mut reader = Reader::new(raw);
        while reader.has_remaining() {
            let (number, wire) = reader.read_tag().unwrap();
            set.read_value(number, wire, &mut reader).unwrap();
        }
        set
    }

    #[test]
    fn test_capture_every_wire_type() {
        let set = capture(RAW);
        let values: Vec<_> = set.iter().map(|f| (f.number, f.value.clone())).collect();
        assert_eq!(
            values,
            vec![
                (9, UnknownValue::Varint(5)),
                (12, UnknownValue::Fixed32(1)),
                (12, UnknownValue::Fixed64(2)),
                (15, UnknownValue::LengthDelimited(Bytes::from_static(b"abc"))),
            ]
        );
    }

    #[test]
    fn test_reencodes_byte_for_byte() {
        let set = capture(RAW);
        let mut buf = Vec::new();
        set.encode(&mut buf);
        assert_eq!(buf, RAW);
        assert_eq!(set.encoded_len(), RAW.len());
    }

    #[test]
    fn test_merge_concatenates_in_order() {
        let mut first = capture(&RAW[..2]);
        let second = capture(&RAW[2..7]);
        first.merge(&second);
        assert_eq!(first.len(), 2);
        assert_eq!(first.iter().last().unwrap().number, 12);
    }

    #[test]
    fn test_truncated_value_is_an_error() {
        let mut set = UnknownFieldSet::default();
        let mut reader = Reader::new(&[0x48]);
        let (number, wire) = reader.read_tag().unwrap();
        assert_eq!(
            set.read_value(number, wire, &mut reader),
            Err(DecodeErrorKind::Truncated)
        );
        assert!(set.is_empty());
    }
}
