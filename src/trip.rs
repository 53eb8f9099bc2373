//! Trip delay predictions: `TripUpdate` and its stop-time records.

use serde::Serialize;

use crate::codec;
use crate::descriptor::{TripDescriptor, VehicleDescriptor};
use crate::error::DecodeErrorKind;
use crate::message::{Message, ProtoEnum, join_path};
use crate::unknown::UnknownFieldSet;
use crate::wire::{Reader, WireType};

/// Timing of a single arrival or departure event.
///
/// Either `delay` or `time` should be set; `time` wins when both are.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopTimeEvent {
    /// Deviation from schedule in seconds; negative means early.
    pub delay: Option<i32>,
    /// Absolute event time, POSIX seconds.
    pub time: Option<i64>,
    /// Expected error of the prediction in seconds.
    pub uncertainty: Option<i32>,
    #[serde(skip)]
    pub unknown_fields: UnknownFieldSet,
}

impl Message for StopTimeEvent {
    fn merge_field(
        &mut self,
        field: u32,
        wire: WireType,
        reader: &mut Reader<'_>,
    ) -> Result<(), DecodeErrorKind> {
        match (field, wire) {
            (1, WireType::Varint) => self.delay = Some(codec::read_int32(reader)?),
            (2, WireType::Varint) => self.time = Some(codec::read_int64(reader)?),
            (3, WireType::Varint) => self.uncertainty = Some(codec::read_int32(reader)?),
            _ => self.unknown_fields.read_value(field, wire, reader)?,
        }
        Ok(())
    }

    fn encode_raw(&self, buf: &mut Vec<u8>) {
        if let Some(delay) = self.delay {
            codec::put_int32(buf, 1, delay);
        }
        if let Some(time) = self.time {
            codec::put_int64(buf, 2, time);
        }
        if let Some(uncertainty) = self.uncertainty {
            codec::put_int32(buf, 3, uncertainty);
        }
        self.unknown_fields.encode(buf);
    }

    fn encoded_len(&self) -> usize {
        self.delay.map_or(0, |v| codec::int32_len(1, v))
            + self.time.map_or(0, |v| codec::int64_len(2, v))
            + self.uncertainty.map_or(0, |v| codec::int32_len(3, v))
            + self.unknown_fields.encoded_len()
    }

    fn merge(&mut self, other: &Self) {
        codec::merge_optional(&mut self.delay, &other.delay);
        codec::merge_optional(&mut self.time, &other.time);
        codec::merge_optional(&mut self.uncertainty, &other.uncertainty);
        self.unknown_fields.merge(&other.unknown_fields);
    }
}

/// How a stop-time record relates to the static schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i32)]
pub enum StopTimeScheduleRelationship {
    #[default]
    Scheduled = 0,
    Skipped = 1,
    NoData = 2,
}

impl ProtoEnum for StopTimeScheduleRelationship {
    fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(StopTimeScheduleRelationship::Scheduled),
            1 => Some(StopTimeScheduleRelationship::Skipped),
            2 => Some(StopTimeScheduleRelationship::NoData),
            _ => None,
        }
    }

    fn as_i32(self) -> i32 {
        self as i32
    }
}

/// Predicted arrival and departure for one stop of a trip.
///
/// The stop is identified by `stop_sequence`, `stop_id`, or both.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopTimeUpdate {
    pub stop_sequence: Option<u32>,
    pub stop_id: Option<String>,
    pub arrival: Option<StopTimeEvent>,
    pub departure: Option<StopTimeEvent>,
    pub schedule_relationship: Option<StopTimeScheduleRelationship>,
    #[serde(skip)]
    pub unknown_fields: UnknownFieldSet,
}

impl StopTimeUpdate {
    /// The set relationship, or `SCHEDULED` when absent.
    pub fn schedule_relationship(&self) -> StopTimeScheduleRelationship {
        self.schedule_relationship.unwrap_or_default()
    }
}

impl Message for StopTimeUpdate {
    fn merge_field(
        &mut self,
        field: u32,
        wire: WireType,
        reader: &mut Reader<'_>,
    ) -> Result<(), DecodeErrorKind> {
        match (field, wire) {
            (1, WireType::Varint) => self.stop_sequence = Some(codec::read_uint32(reader)?),
            (2, WireType::LengthDelimited) => codec::merge_message(&mut self.arrival, reader)?,
            (3, WireType::LengthDelimited) => codec::merge_message(&mut self.departure, reader)?,
            (4, WireType::LengthDelimited) => self.stop_id = Some(codec::read_string(reader)?),
            (5, WireType::Varint) => codec::read_enum(
                &mut self.schedule_relationship,
                5,
                reader,
                &mut self.unknown_fields,
            )?,
            _ => self.unknown_fields.read_value(field, wire, reader)?,
        }
        Ok(())
    }

    fn encode_raw(&self, buf: &mut Vec<u8>) {
        if let Some(stop_sequence) = self.stop_sequence {
            codec::put_uint32(buf, 1, stop_sequence);
        }
        if let Some(arrival) = &self.arrival {
            codec::put_message(buf, 2, arrival);
        }
        if let Some(departure) = &self.departure {
            codec::put_message(buf, 3, departure);
        }
        if let Some(stop_id) = &self.stop_id {
            codec::put_string(buf, 4, stop_id);
        }
        if let Some(relationship) = self.schedule_relationship {
            codec::put_enum(buf, 5, relationship);
        }
        self.unknown_fields.encode(buf);
    }

    fn encoded_len(&self) -> usize {
        self.stop_sequence.map_or(0, |v| codec::uint32_len(1, v))
            + self.arrival.as_ref().map_or(0, |m| codec::message_len(2, m))
            + self.departure.as_ref().map_or(0, |m| codec::message_len(3, m))
            + self.stop_id.as_deref().map_or(0, |v| codec::string_len(4, v))
            + self
                .schedule_relationship
                .map_or(0, |v| codec::enum_len(5, v))
            + self.unknown_fields.encoded_len()
    }

    fn merge(&mut self, other: &Self) {
        codec::merge_optional(&mut self.stop_sequence, &other.stop_sequence);
        codec::merge_optional(&mut self.stop_id, &other.stop_id);
        codec::merge_optional_message(&mut self.arrival, &other.arrival);
        codec::merge_optional_message(&mut self.departure, &other.departure);
        codec::merge_optional(&mut self.schedule_relationship, &other.schedule_relationship);
        self.unknown_fields.merge(&other.unknown_fields);
    }
}

/// Realtime progress of a trip against its schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripUpdate {
    /// The trip this update applies to. Required.
    pub trip: Option<TripDescriptor>,
    pub vehicle: Option<VehicleDescriptor>,
    /// Updates ordered by stop_sequence; producers should keep them sorted,
    /// the codec does not enforce it.
    pub stop_time_update: Vec<StopTimeUpdate>,
    /// Moment the realtime progress was measured, POSIX seconds.
    pub timestamp: Option<u64>,
    /// Current schedule deviation in seconds; superseded by any
    /// stop_time_update.
    pub delay: Option<i32>,
    #[serde(skip)]
    pub unknown_fields: UnknownFieldSet,
}

impl Message for TripUpdate {
    fn merge_field(
        &mut self,
        field: u32,
        wire: WireType,
        reader: &mut Reader<'_>,
    ) -> Result<(), DecodeErrorKind> {
        match (field, wire) {
            (1, WireType::LengthDelimited) => codec::merge_message(&mut self.trip, reader)?,
            (2, WireType::LengthDelimited) => {
                codec::push_message(&mut self.stop_time_update, reader)?;
            }
            (3, WireType::LengthDelimited) => codec::merge_message(&mut self.vehicle, reader)?,
            (4, WireType::Varint) => self.timestamp = Some(reader.read_varint()?),
            (5, WireType::Varint) => self.delay = Some(codec::read_int32(reader)?),
            _ => self.unknown_fields.read_value(field, wire, reader)?,
        }
        Ok(())
    }

    fn encode_raw(&self, buf: &mut Vec<u8>) {
        if let Some(trip) = &self.trip {
            codec::put_message(buf, 1, trip);
        }
        for update in &self.stop_time_update {
            codec::put_message(buf, 2, update);
        }
        if let Some(vehicle) = &self.vehicle {
            codec::put_message(buf, 3, vehicle);
        }
        if let Some(timestamp) = self.timestamp {
            codec::put_uint64(buf, 4, timestamp);
        }
        if let Some(delay) = self.delay {
            codec::put_int32(buf, 5, delay);
        }
        self.unknown_fields.encode(buf);
    }

    fn encoded_len(&self) -> usize {
        self.trip.as_ref().map_or(0, |m| codec::message_len(1, m))
            + self
                .stop_time_update
                .iter()
                .map(|m| codec::message_len(2, m))
                .sum::<usize>()
            + self.vehicle.as_ref().map_or(0, |m| codec::message_len(3, m))
            + self.timestamp.map_or(0, |v| codec::uint64_len(4, v))
            + self.delay.map_or(0, |v| codec::int32_len(5, v))
            + self.unknown_fields.encoded_len()
    }

    fn merge(&mut self, other: &Self) {
        codec::merge_optional_message(&mut self.trip, &other.trip);
        codec::merge_optional_message(&mut self.vehicle, &other.vehicle);
        self.stop_time_update
            .extend(other.stop_time_update.iter().cloned());
        codec::merge_optional(&mut self.timestamp, &other.timestamp);
        codec::merge_optional(&mut self.delay, &other.delay);
        self.unknown_fields.merge(&other.unknown_fields);
    }

    fn missing_required(&self, prefix: &str, missing: &mut Vec<String>) {
        if self.trip.is_none() {
            missing.push(join_path(prefix, "trip"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update_at(stop_sequence: u32) -> StopTimeUpdate {
        StopTimeUpdate {
            stop_sequence: Some(stop_sequence),
            arrival: Some(StopTimeEvent {
                delay: Some(-30),
                uncertainty: Some(60),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_trip_update_roundtrip() {
        let update = TripUpdate {
            trip: Some(TripDescriptor {
                trip_id: Some("t-17".to_string()),
                route_id: Some("Red".to_string()),
                ..Default::default()
            }),
            stop_time_update: vec![update_at(3), update_at(4)],
            timestamp: Some(1_700_000_100),
            delay: Some(-30),
            ..Default::default()
        };
        let bytes = update.encode_to_vec().unwrap();
        assert_eq!(bytes.len(), update.encoded_len());
        assert_eq!(TripUpdate::decode(&bytes).unwrap(), update);
    }

    #[test]
    fn test_merge_appends_stop_time_updates() {
        let mut first = TripUpdate {
            trip: Some(TripDescriptor::default()),
            stop_time_update: vec![update_at(1)],
            ..Default::default()
        };
        let second = TripUpdate {
            stop_time_update: vec![update_at(2), update_at(3)],
            ..Default::default()
        };
        first.merge(&second);
        let sequences: Vec<_> = first
            .stop_time_update
            .iter()
            .map(|u| u.stop_sequence)
            .collect();
        assert_eq!(sequences, [Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn test_trip_update_requires_trip() {
        let update = TripUpdate {
            stop_time_update: vec![update_at(1)],
            ..Default::default()
        };
        let err = update.check_initialized().unwrap_err();
        assert_eq!(err.missing_fields(), ["trip"]);
    }

    #[test]
    fn test_schedule_relationship_defaults_on_access() {
        let update = StopTimeUpdate::default();
        assert_eq!(update.schedule_relationship, None);
        assert_eq!(
            update.schedule_relationship(),
            StopTimeScheduleRelationship::Scheduled
        );
    }

    #[test]
    fn test_negative_delay_survives_roundtrip() {
        let event = StopTimeEvent {
            delay: Some(-300),
            time: Some(-1),
            ..Default::default()
        };
        let bytes = event.encode_to_vec().unwrap();
        assert_eq!(StopTimeEvent::decode(&bytes).unwrap(), event);
    }
}
