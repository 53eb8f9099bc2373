//! Selector and descriptor types shared across the feed payloads.

use serde::Serialize;

use crate::codec;
use crate::error::DecodeErrorKind;
use crate::message::{Message, ProtoEnum, join_path};
use crate::unknown::UnknownFieldSet;
use crate::wire::{Reader, WireType};

/// How a trip relates to the static schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i32)]
pub enum TripScheduleRelationship {
    #[default]
    Scheduled = 0,
    Added = 1,
    Unscheduled = 2,
    Canceled = 3,
    Modified = 5,
}

impl ProtoEnum for TripScheduleRelationship {
    fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(TripScheduleRelationship::Scheduled),
            1 => Some(TripScheduleRelationship::Added),
            2 => Some(TripScheduleRelationship::Unscheduled),
            3 => Some(TripScheduleRelationship::Canceled),
            5 => Some(TripScheduleRelationship::Modified),
            _ => None,
        }
    }

    fn as_i32(self) -> i32 {
        self as i32
    }
}

/// Identifies a single trip instance.
///
/// A trip_id alone suffices for scheduled trips; frequency-based trips also
/// need start_time and start_date to pin down the instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripDescriptor {
    pub trip_id: Option<String>,
    pub route_id: Option<String>,
    pub direction_id: Option<u32>,
    /// Scheduled start of the instance, `HH:MM:SS` (may exceed 24h).
    pub start_time: Option<String>,
    /// Service date of the instance, `YYYYMMDD`.
    pub start_date: Option<String>,
    pub schedule_relationship: Option<TripScheduleRelationship>,
    #[serde(skip)]
    pub unknown_fields: UnknownFieldSet,
}

impl TripDescriptor {
    /// The set relationship, or `SCHEDULED` when absent.
    pub fn schedule_relationship(&self) -> TripScheduleRelationship {
        self.schedule_relationship.unwrap_or_default()
    }
}

impl Message for TripDescriptor {
    fn merge_field(
        &mut self,
        field: u32,
        wire: WireType,
        reader: &mut Reader<'_>,
    ) -> Result<(), DecodeErrorKind> {
        match (field, wire) {
            (1, WireType::LengthDelimited) => self.trip_id = Some(codec::read_string(reader)?),
            (2, WireType::LengthDelimited) => self.start_time = Some(codec::read_string(reader)?),
            (3, WireType::LengthDelimited) => self.start_date = Some(codec::read_string(reader)?),
            (4, WireType::Varint) => codec::read_enum(
                &mut self.schedule_relationship,
                4,
                reader,
                &mut self.unknown_fields,
            )?,
            (5, WireType::LengthDelimited) => self.route_id = Some(codec::read_string(reader)?),
            (6, WireType::Varint) => self.direction_id = Some(codec::read_uint32(reader)?),
            _ => self.unknown_fields.read_value(field, wire, reader)?,
        }
        Ok(())
    }

    fn encode_raw(&self, buf: &mut Vec<u8>) {
        if let Some(trip_id) = &self.trip_id {
            codec::put_string(buf, 1, trip_id);
        }
        if let Some(start_time) = &self.start_time {
            codec::put_string(buf, 2, start_time);
        }
        if let Some(start_date) = &self.start_date {
            codec::put_string(buf, 3, start_date);
        }
        if let Some(relationship) = self.schedule_relationship {
            codec::put_enum(buf, 4, relationship);
        }
        if let Some(route_id) = &self.route_id {
            codec::put_string(buf, 5, route_id);
        }
        if let Some(direction_id) = self.direction_id {
            codec::put_uint32(buf, 6, direction_id);
        }
        self.unknown_fields.encode(buf);
    }

    fn encoded_len(&self) -> usize {
        self.trip_id.as_deref().map_or(0, |v| codec::string_len(1, v))
            + self.start_time.as_deref().map_or(0, |v| codec::string_len(2, v))
            + self.start_date.as_deref().map_or(0, |v| codec::string_len(3, v))
            + self
                .schedule_relationship
                .map_or(0, |v| codec::enum_len(4, v))
            + self.route_id.as_deref().map_or(0, |v| codec::string_len(5, v))
            + self.direction_id.map_or(0, |v| codec::uint32_len(6, v))
            + self.unknown_fields.encoded_len()
    }

    fn merge(&mut self, other: &Self) {
        codec::merge_optional(&mut self.trip_id, &other.trip_id);
        codec::merge_optional(&mut self.route_id, &other.route_id);
        codec::merge_optional(&mut self.direction_id, &other.direction_id);
        codec::merge_optional(&mut self.start_time, &other.start_time);
        codec::merge_optional(&mut self.start_date, &other.start_date);
        codec::merge_optional(&mut self.schedule_relationship, &other.schedule_relationship);
        self.unknown_fields.merge(&other.unknown_fields);
    }
}

/// Identifies a physical vehicle.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDescriptor {
    /// Internal, stable identifier.
    pub id: Option<String>,
    /// Rider-visible label, e.g. the headsign or run number.
    pub label: Option<String>,
    pub license_plate: Option<String>,
    #[serde(skip)]
    pub unknown_fields: UnknownFieldSet,
}

impl Message for VehicleDescriptor {
    fn merge_field(
        &mut self,
        field: u32,
        wire: WireType,
        reader: &mut Reader<'_>,
    ) -> Result<(), DecodeErrorKind> {
        match (field, wire) {
            (1, WireType::LengthDelimited) => self.id = Some(codec::read_string(reader)?),
            (2, WireType::LengthDelimited) => self.label = Some(codec::read_string(reader)?),
            (3, WireType::LengthDelimited) => {
                self.license_plate = Some(codec::read_string(reader)?);
            }
            _ => self.unknown_fields.read_value(field, wire, reader)?,
        }
        Ok(())
    }

    fn encode_raw(&self, buf: &mut Vec<u8>) {
        if let Some(id) = &self.id {
            codec::put_string(buf, 1, id);
        }
        if let Some(label) = &self.label {
            codec::put_string(buf, 2, label);
        }
        if let Some(license_plate) = &self.license_plate {
            codec::put_string(buf, 3, license_plate);
        }
        self.unknown_fields.encode(buf);
    }

    fn encoded_len(&self) -> usize {
        self.id.as_deref().map_or(0, |v| codec::string_len(1, v))
            + self.label.as_deref().map_or(0, |v| codec::string_len(2, v))
            + self
                .license_plate
                .as_deref()
                .map_or(0, |v| codec::string_len(3, v))
            + self.unknown_fields.encoded_len()
    }

    fn merge(&mut self, other: &Self) {
        codec::merge_optional(&mut self.id, &other.id);
        codec::merge_optional(&mut self.label, &other.label);
        codec::merge_optional(&mut self.license_plate, &other.license_plate);
        self.unknown_fields.merge(&other.unknown_fields);
    }
}

/// A geographic position with optional motion data.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    /// Degrees North, WGS-84. Required.
    pub latitude: Option<f32>,
    /// Degrees East, WGS-84. Required.
    pub longitude: Option<f32>,
    /// Degrees clockwise from true North.
    pub bearing: Option<f32>,
    /// Meters travelled.
    pub odometer: Option<f64>,
    /// Meters per second.
    pub speed: Option<f32>,
    #[serde(skip)]
    pub unknown_fields: UnknownFieldSet,
}

impl Position {
    pub fn latitude(&self) -> f32 {
        self.latitude.unwrap_or_default()
    }

    pub fn longitude(&self) -> f32 {
        self.longitude.unwrap_or_default()
    }
}

impl Message for Position {
    fn merge_field(
        &mut self,
        field: u32,
        wire: WireType,
        reader: &mut Reader<'_>,
    ) -> Result<(), DecodeErrorKind> {
        match (field, wire) {
            (1, WireType::Fixed32) => self.latitude = Some(codec::read_float(reader)?),
            (2, WireType::Fixed32) => self.longitude = Some(codec::read_float(reader)?),
            (3, WireType::Fixed32) => self.bearing = Some(codec::read_float(reader)?),
            (4, WireType::Fixed64) => self.odometer = Some(codec::read_double(reader)?),
            (5, WireType::Fixed32) => self.speed = Some(codec::read_float(reader)?),
            _ => self.unknown_fields.read_value(field, wire, reader)?,
        }
        Ok(())
    }

    fn encode_raw(&self, buf: &mut Vec<u8>) {
        if let Some(latitude) = self.latitude {
            codec::put_float(buf, 1, latitude);
        }
        if let Some(longitude) = self.longitude {
            codec::put_float(buf, 2, longitude);
        }
        if let Some(bearing) = self.bearing {
            codec::put_float(buf, 3, bearing);
        }
        if let Some(odometer) = self.odometer {
            codec::put_double(buf, 4, odometer);
        }
        if let Some(speed) = self.speed {
            codec::put_float(buf, 5, speed);
        }
        self.unknown_fields.encode(buf);
    }

    fn encoded_len(&self) -> usize {
        self.latitude.map_or(0, |_| codec::float_len(1))
            + self.longitude.map_or(0, |_| codec::float_len(2))
            + self.bearing.map_or(0, |_| codec::float_len(3))
            + self.odometer.map_or(0, |_| codec::double_len(4))
            + self.speed.map_or(0, |_| codec::float_len(5))
            + self.unknown_fields.encoded_len()
    }

    fn merge(&mut self, other: &Self) {
        codec::merge_optional(&mut self.latitude, &other.latitude);
        codec::merge_optional(&mut self.longitude, &other.longitude);
        codec::merge_optional(&mut self.bearing, &other.bearing);
        codec::merge_optional(&mut self.odometer, &other.odometer);
        codec::merge_optional(&mut self.speed, &other.speed);
        self.unknown_fields.merge(&other.unknown_fields);
    }

    fn missing_required(&self, prefix: &str, missing: &mut Vec<String>) {
        if self.latitude.is_none() {
            missing.push(join_path(prefix, "latitude"));
        }
        if self.longitude.is_none() {
            missing.push(join_path(prefix, "longitude"));
        }
    }
}

/// Selects the transit objects an alert applies to.
///
/// At least one specifier should be set; the schema leaves that a
/// convention.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySelector {
    pub agency_id: Option<String>,
    pub route_id: Option<String>,
    /// GTFS route_type, e.g. 1 for subway.
    pub route_type: Option<i32>,
    pub trip: Option<TripDescriptor>,
    pub stop_id: Option<String>,
    #[serde(skip)]
    pub unknown_fields: UnknownFieldSet,
}

impl Message for EntitySelector {
    fn merge_field(
        &mut self,
        field: u32,
        wire: WireType,
        reader: &mut Reader<'_>,
    ) -> Result<(), DecodeErrorKind> {
        match (field, wire) {
            (1, WireType::LengthDelimited) => self.agency_id = Some(codec::read_string(reader)?),
            (2, WireType::LengthDelimited) => self.route_id = Some(codec::read_string(reader)?),
            (3, WireType::Varint) => self.route_type = Some(codec::read_int32(reader)?),
            (4, WireType::LengthDelimited) => codec::merge_message(&mut self.trip, reader)?,
            (5, WireType::LengthDelimited) => self.stop_id = Some(codec::read_string(reader)?),
            _ => self.unknown_fields.read_value(field, wire, reader)?,
        }
        Ok(())
    }

    fn encode_raw(&self, buf: &mut Vec<u8>) {
        if let Some(agency_id) = &self.agency_id {
            codec::put_string(buf, 1, agency_id);
        }
        if let Some(route_id) = &self.route_id {
            codec::put_string(buf, 2, route_id);
        }
        if let Some(route_type) = self.route_type {
            codec::put_int32(buf, 3, route_type);
        }
        if let Some(trip) = &self.trip {
            codec::put_message(buf, 4, trip);
        }
        if let Some(stop_id) = &self.stop_id {
            codec::put_string(buf, 5, stop_id);
        }
        self.unknown_fields.encode(buf);
    }

    fn encoded_len(&self) -> usize {
        self.agency_id.as_deref().map_or(0, |v| codec::string_len(1, v))
            + self.route_id.as_deref().map_or(0, |v| codec::string_len(2, v))
            + self.route_type.map_or(0, |v| codec::int32_len(3, v))
            + self.trip.as_ref().map_or(0, |m| codec::message_len(4, m))
            + self.stop_id.as_deref().map_or(0, |v| codec::string_len(5, v))
            + self.unknown_fields.encoded_len()
    }

    fn merge(&mut self, other: &Self) {
        codec::merge_optional(&mut self.agency_id, &other.agency_id);
        codec::merge_optional(&mut self.route_id, &other.route_id);
        codec::merge_optional(&mut self.route_type, &other.route_type);
        codec::merge_optional_message(&mut self.trip, &other.trip);
        codec::merge_optional(&mut self.stop_id, &other.stop_id);
        self.unknown_fields.merge(&other.unknown_fields);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_requires_both_coordinates() {
        let err = Position::default().check_initialized().unwrap_err();
        assert_eq!(err.missing_fields(), ["latitude", "longitude"]);

        let position = Position {
            latitude: Some(48.8566),
            longitude: Some(2.3522),
            ..Default::default()
        };
        assert!(position.is_initialized());
    }

    #[test]
    fn test_position_roundtrip_is_bit_exact() {
        let position = Position {
            latitude: Some(48.8566),
            longitude: Some(2.3522),
            odometer: Some(123_456.75),
            ..Default::default()
        };
        let bytes = position.encode_to_vec().unwrap();
        // 2 floats + 1 double with their one-byte keys
        assert_eq!(bytes.len(), 5 + 5 + 9);
        assert_eq!(Position::decode(&bytes).unwrap(), position);
    }

    #[test]
    fn test_trip_descriptor_roundtrip() {
        let trip = TripDescriptor {
            trip_id: Some("t-42".to_string()),
            route_id: Some("57".to_string()),
            direction_id: Some(1),
            start_time: Some("25:10:00".to_string()),
            start_date: Some("20260805".to_string()),
            schedule_relationship: Some(TripScheduleRelationship::Canceled),
            ..Default::default()
        };
        let bytes = trip.encode_to_vec().unwrap();
        assert_eq!(bytes.len(), trip.encoded_len());
        assert_eq!(TripDescriptor::decode(&bytes).unwrap(), trip);
    }

    #[test]
    fn test_trip_descriptor_wire_type_mismatch_goes_unknown() {
        // Field 1 as a varint instead of a string
        let trip = TripDescriptor::decode(&[0x08, 0x2a]).unwrap();
        assert_eq!(trip.trip_id, None);
        assert_eq!(trip.unknown_fields.len(), 1);
        let mut buf = Vec::new();
        trip.encode_raw(&mut buf);
        assert_eq!(buf, [0x08, 0x2a]);
    }

    #[test]
    fn test_entity_selector_with_no_specifier_still_builds() {
        // "At least one specifier" is a convention the schema does not enforce
        let selector = EntitySelector::default();
        assert!(selector.is_initialized());
    }
}
