//! Per-field-type read, write, size, and merge helpers shared by the
//! message implementations.

use tracing::trace;

use crate::error::DecodeErrorKind;
use crate::message::{self, Message, ProtoEnum};
use crate::unknown::{UnknownFieldSet, UnknownValue};
use crate::wire::{self, Reader, WireType};

pub(crate) fn read_string(reader: &mut Reader<'_>) -> Result<String, DecodeErrorKind> {
    let bytes = reader.read_length_delimited()?;
    String::from_utf8(bytes.to_vec()).map_err(|_| DecodeErrorKind::InvalidUtf8)
}

pub(crate) fn read_uint32(reader: &mut Reader<'_>) -> Result<u32, DecodeErrorKind> {
    Ok(reader.read_varint()? as u32)
}

// Negative int32 values arrive sign-extended to ten bytes; the low 32 bits
// carry the value.
pub(crate) fn read_int32(reader: &mut Reader<'_>) -> Result<i32, DecodeErrorKind> {
    Ok(reader.read_varint()? as i32)
}

pub(crate) fn read_int64(reader: &mut Reader<'_>) -> Result<i64, DecodeErrorKind> {
    Ok(reader.read_varint()? as i64)
}

pub(crate) fn read_bool(reader: &mut Reader<'_>) -> Result<bool, DecodeErrorKind> {
    Ok(reader.read_varint()? != 0)
}

pub(crate) fn read_float(reader: &mut Reader<'_>) -> Result<f32, DecodeErrorKind> {
    Ok(f32::from_bits(reader.read_fixed32()?))
}

pub(crate) fn read_double(reader: &mut Reader<'_>) -> Result<f64, DecodeErrorKind> {
    Ok(f64::from_bits(reader.read_fixed64()?))
}

/// Merges one wire occurrence of a singular sub-message field into `slot`.
pub(crate) fn merge_message<M: Message>(
    slot: &mut Option<M>,
    reader: &mut Reader<'_>,
) -> Result<(), DecodeErrorKind> {
    let bytes = reader.read_length_delimited()?;
    let mut nested = reader.nested(bytes)?;
    message::merge_fields(slot.get_or_insert_with(M::default), &mut nested)
}

/// Decodes one wire occurrence of a repeated sub-message field.
pub(crate) fn push_message<M: Message>(
    list: &mut Vec<M>,
    reader: &mut Reader<'_>,
) -> Result<(), DecodeErrorKind> {
    let bytes = reader.read_length_delimited()?;
    let mut nested = reader.nested(bytes)?;
    let mut item = M::default();
    message::merge_fields(&mut item, &mut nested)?;
    list.push(item);
    Ok(())
}

/// Reads an enum value, keeping out-of-range values as unknown fields.
pub(crate) fn read_enum<E: ProtoEnum>(
    slot: &mut Option<E>,
    field: u32,
    reader: &mut Reader<'_>,
    unknown: &mut UnknownFieldSet,
) -> Result<(), DecodeErrorKind> {
    let raw = reader.read_varint()?;
    match E::from_i32(raw as i32) {
        Some(value) => *slot = Some(value),
        None => {
            trace!(field, value = raw, "retaining out-of-range enum value");
            unknown.push(field, UnknownValue::Varint(raw));
        }
    }
    Ok(())
}

pub(crate) fn put_string(buf: &mut Vec<u8>, field: u32, value: &str) {
    wire::put_key(buf, field, WireType::LengthDelimited);
    wire::put_varint(buf, value.len() as u64);
    buf.extend_from_slice(value.as_bytes());
}

pub(crate) fn put_uint64(buf: &mut Vec<u8>, field: u32, value: u64) {
    wire::put_key(buf, field, WireType::Varint);
    wire::put_varint(buf, value);
}

pub(crate) fn put_uint32(buf: &mut Vec<u8>, field: u32, value: u32) {
    put_uint64(buf, field, u64::from(value));
}

pub(crate) fn put_int64(buf: &mut Vec<u8>, field: u32, value: i64) {
    put_uint64(buf, field, value as u64);
}

pub(crate) fn put_int32(buf: &mut Vec<u8>, field: u32, value: i32) {
    put_int64(buf, field, i64::from(value));
}

pub(crate) fn put_bool(buf: &mut Vec<u8>, field: u32, value: bool) {
    put_uint64(buf, field, u64::from(value));
}

pub(crate) fn put_float(buf: &mut Vec<u8>, field: u32, value: f32) {
    wire::put_key(buf, field, WireType::Fixed32);
    wire::put_fixed32(buf, value.to_bits());
}

pub(crate) fn put_double(buf: &mut Vec<u8>, field: u32, value: f64) {
    wire::put_key(buf, field, WireType::Fixed64);
    wire::put_fixed64(buf, value.to_bits());
}

pub(crate) fn put_enum<E: ProtoEnum>(buf: &mut Vec<u8>, field: u32, value: E) {
    put_int32(buf, field, value.as_i32());
}

pub(crate) fn put_message<M: Message>(buf: &mut Vec<u8>, field: u32, message: &M) {
    wire::put_key(buf, field, WireType::LengthDelimited);
    wire::put_varint(buf, message.encoded_len() as u64);
    message.encode_raw(buf);
}

pub(crate) fn string_len(field: u32, value: &str) -> usize {
    wire::key_len(field) + wire::varint_len(value.len() as u64) + value.len()
}

pub(crate) fn uint64_len(field: u32, value: u64) -> usize {
    wire::key_len(field) + wire::varint_len(value)
}

pub(crate) fn uint32_len(field: u32, value: u32) -> usize {
    uint64_len(field, u64::from(value))
}

pub(crate) fn int64_len(field: u32, value: i64) -> usize {
    uint64_len(field, value as u64)
}

pub(crate) fn int32_len(field: u32, value: i32) -> usize {
    int64_len(field, i64::from(value))
}

pub(crate) fn bool_len(field: u32) -> usize {
    wire::key_len(field) + 1
}

pub(crate) fn float_len(field: u32) -> usize {
    wire::key_len(field) + 4
}

pub(crate) fn double_len(field: u32) -> usize {
    wire::key_len(field) + 8
}

pub(crate) fn enum_len<E: ProtoEnum>(field: u32, value: E) -> usize {
    int32_len(field, value.as_i32())
}

pub(crate) fn message_len<M: Message>(field: u32, message: &M) -> usize {
    let len = message.encoded_len();
    wire::key_len(field) + wire::varint_len(len as u64) + len
}

/// Overlay for singular scalar fields: a present source value overwrites.
pub(crate) fn merge_optional<T: Clone>(dst: &mut Option<T>, src: &Option<T>) {
    if src.is_some() {
        dst.clone_from(src);
    }
}

/// Overlay for singular sub-message fields: recursive merge.
pub(crate) fn merge_optional_message<M: Message>(dst: &mut Option<M>, src: &Option<M>) {
    if let Some(src) = src {
        dst.get_or_insert_with(M::default).merge(src);
    }
}
