//! The feed envelope: `FeedMessage`, its header, and per-record entities.

use serde::Serialize;

use crate::alert::Alert;
use crate::codec;
use crate::error::DecodeErrorKind;
use crate::message::{Message, ProtoEnum, join_path};
use crate::trip::TripUpdate;
use crate::unknown::UnknownFieldSet;
use crate::vehicle::VehiclePosition;
use crate::wire::{Reader, WireType};

/// Whether the feed is a complete snapshot or an incremental overlay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i32)]
pub enum Incrementality {
    #[default]
    FullDataset = 0,
    Differential = 1,
}

impl ProtoEnum for Incrementality {
    fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Incrementality::FullDataset),
            1 => Some(Incrementality::Differential),
            _ => None,
        }
    }

    fn as_i32(self) -> i32 {
        self as i32
    }
}

/// Metadata about a feed, included in every feed message.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedHeader {
    /// Version of the feed specification. Required; currently "2.0".
    pub gtfs_realtime_version: Option<String>,
    pub incrementality: Option<Incrementality>,
    /// Moment this dataset was generated, in POSIX seconds.
    pub timestamp: Option<u64>,
    #[serde(skip)]
    pub unknown_fields: UnknownFieldSet,
}

impl FeedHeader {
    pub fn gtfs_realtime_version(&self) -> &str {
        self.gtfs_realtime_version.as_deref().unwrap_or("")
    }

    /// The set incrementality, or `FULL_DATASET` when absent.
    pub fn incrementality(&self) -> Incrementality {
        self.incrementality.unwrap_or_default()
    }
}

impl Message for FeedHeader {
    fn merge_field(
        &mut self,
        field: u32,
        wire: WireType,
        reader: &mut Reader<'_>,
    ) -> Result<(), DecodeErrorKind> {
        match (field, wire) {
            (1, WireType::LengthDelimited) => {
                self.gtfs_realtime_version = Some(codec::read_string(reader)?);
            }
            (2, WireType::Varint) => {
                codec::read_enum(&mut self.incrementality, 2, reader, &mut self.unknown_fields)?;
            }
            (3, WireType::Varint) => self.timestamp = Some(reader.read_varint()?),
            _ => self.unknown_fields.read_value(field, wire, reader)?,
        }
        Ok(())
    }

    fn encode_raw(&self, buf: &mut Vec<u8>) {
        if let Some(version) = &self.gtfs_realtime_version {
            codec::put_string(buf, 1, version);
        }
        if let Some(incrementality) = self.incrementality {
            codec::put_enum(buf, 2, incrementality);
        }
        if let Some(timestamp) = self.timestamp {
            codec::put_uint64(buf, 3, timestamp);
        }
        self.unknown_fields.encode(buf);
    }

    fn encoded_len(&self) -> usize {
        self.gtfs_realtime_version
            .as_deref()
            .map_or(0, |v| codec::string_len(1, v))
            + self.incrementality.map_or(0, |v| codec::enum_len(2, v))
            + self.timestamp.map_or(0, |v| codec::uint64_len(3, v))
            + self.unknown_fields.encoded_len()
    }

    fn merge(&mut self, other: &Self) {
        codec::merge_optional(&mut self.gtfs_realtime_version, &other.gtfs_realtime_version);
        codec::merge_optional(&mut self.incrementality, &other.incrementality);
        codec::merge_optional(&mut self.timestamp, &other.timestamp);
        self.unknown_fields.merge(&other.unknown_fields);
    }

    fn missing_required(&self, prefix: &str, missing: &mut Vec<String>) {
        if self.gtfs_realtime_version.is_none() {
            missing.push(join_path(prefix, "gtfs_realtime_version"));
        }
    }
}

/// One record in a feed: an identifier plus at most one payload.
///
/// The schema does not enforce payload exclusivity or presence; an entity
/// with no payload at all is well-formed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedEntity {
    /// Feed-unique identifier. Required.
    pub id: Option<String>,
    /// Marks the entity as deleted in a DIFFERENTIAL feed. Defaults to false.
    pub is_deleted: Option<bool>,
    pub trip_update: Option<TripUpdate>,
    pub vehicle: Option<VehiclePosition>,
    pub alert: Option<Alert>,
    #[serde(skip)]
    pub unknown_fields: UnknownFieldSet,
}

impl FeedEntity {
    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or("")
    }

    pub fn is_deleted(&self) -> bool {
        self.is_deleted.unwrap_or(false)
    }
}

impl Message for FeedEntity {
    fn merge_field(
        &mut self,
        field: u32,
        wire: WireType,
        reader: &mut Reader<'_>,
    ) -> Result<(), DecodeErrorKind> {
        match (field, wire) {
            (1, WireType::LengthDelimited) => self.id = Some(codec::read_string(reader)?),
            (2, WireType::Varint) => self.is_deleted = Some(codec::read_bool(reader)?),
            (3, WireType::LengthDelimited) => codec::merge_message(&mut self.trip_update, reader)?,
            (4, WireType::LengthDelimited) => codec::merge_message(&mut self.vehicle, reader)?,
            (5, WireType::LengthDelimited) => codec::merge_message(&mut self.alert, reader)?,
            _ => self.unknown_fields.read_value(field, wire, reader)?,
        }
        Ok(())
    }

    fn encode_raw(&self, buf: &mut Vec<u8>) {
        if let Some(id) = &self.id {
            codec::put_string(buf, 1, id);
        }
        if let Some(is_deleted) = self.is_deleted {
            codec::put_bool(buf, 2, is_deleted);
        }
        if let Some(trip_update) = &self.trip_update {
            codec::put_message(buf, 3, trip_update);
        }
        if let Some(vehicle) = &self.vehicle {
            codec::put_message(buf, 4, vehicle);
        }
        if let Some(alert) = &self.alert {
            codec::put_message(buf, 5, alert);
        }
        self.unknown_fields.encode(buf);
    }

    fn encoded_len(&self) -> usize {
        self.id.as_deref().map_or(0, |v| codec::string_len(1, v))
            + self.is_deleted.map_or(0, |_| codec::bool_len(2))
            + self.trip_update.as_ref().map_or(0, |m| codec::message_len(3, m))
            + self.vehicle.as_ref().map_or(0, |m| codec::message_len(4, m))
            + self.alert.as_ref().map_or(0, |m| codec::message_len(5, m))
            + self.unknown_fields.encoded_len()
    }

    fn merge(&mut self, other: &Self) {
        codec::merge_optional(&mut self.id, &other.id);
        codec::merge_optional(&mut self.is_deleted, &other.is_deleted);
        codec::merge_optional_message(&mut self.trip_update, &other.trip_update);
        codec::merge_optional_message(&mut self.vehicle, &other.vehicle);
        codec::merge_optional_message(&mut self.alert, &other.alert);
        self.unknown_fields.merge(&other.unknown_fields);
    }

    fn missing_required(&self, prefix: &str, missing: &mut Vec<String>) {
        if self.id.is_none() {
            missing.push(join_path(prefix, "id"));
        }
        if let Some(trip_update) = &self.trip_update {
            trip_update.missing_required(&join_path(prefix, "trip_update"), missing);
        }
        if let Some(vehicle) = &self.vehicle {
            vehicle.missing_required(&join_path(prefix, "vehicle"), missing);
        }
        if let Some(alert) = &self.alert {
            alert.missing_required(&join_path(prefix, "alert"), missing);
        }
    }
}

/// The unit of exchange: a header plus any number of entities.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedMessage {
    /// Feed metadata. Required.
    pub header: Option<FeedHeader>,
    pub entity: Vec<FeedEntity>,
    #[serde(skip)]
    pub unknown_fields: UnknownFieldSet,
}

impl Message for FeedMessage {
    fn merge_field(
        &mut self,
        field: u32,
        wire: WireType,
        reader: &mut Reader<'_>,
    ) -> Result<(), DecodeErrorKind> {
        match (field, wire) {
            (1, WireType::LengthDelimited) => codec::merge_message(&mut self.header, reader)?,
            (2, WireType::LengthDelimited) => codec::push_message(&mut self.entity, reader)?,
            _ => self.unknown_fields.read_value(field, wire, reader)?,
        }
        Ok(())
    }

    fn encode_raw(&self, buf: &mut Vec<u8>) {
        if let Some(header) = &self.header {
            codec::put_message(buf, 1, header);
        }
        for entity in &self.entity {
            codec::put_message(buf, 2, entity);
        }
        self.unknown_fields.encode(buf);
    }

    fn encoded_len(&self) -> usize {
        self.header.as_ref().map_or(0, |m| codec::message_len(1, m))
            + self
                .entity
                .iter()
                .map(|m| codec::message_len(2, m))
                .sum::<usize>()
            + self.unknown_fields.encoded_len()
    }

    fn merge(&mut self, other: &Self) {
        codec::merge_optional_message(&mut self.header, &other.header);
        self.entity.extend(other.entity.iter().cloned());
        self.unknown_fields.merge(&other.unknown_fields);
    }

    fn missing_required(&self, prefix: &str, missing: &mut Vec<String>) {
        match &self.header {
            Some(header) => header.missing_required(&join_path(prefix, "header"), missing),
            None => missing.push(join_path(prefix, "header")),
        }
        for (index, entity) in self.entity.iter().enumerate() {
            let path = format!("{}[{index}]", join_path(prefix, "entity"));
            entity.missing_required(&path, missing);
        }
    }
}
