//! Realtime vehicle state: `VehiclePosition` and its status enums.

use serde::Serialize;

use crate::codec;
use crate::descriptor::{Position, TripDescriptor, VehicleDescriptor};
use crate::error::DecodeErrorKind;
use crate::message::{Message, ProtoEnum, join_path};
use crate::unknown::UnknownFieldSet;
use crate::wire::{Reader, WireType};

/// Where the vehicle is relative to the current stop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i32)]
pub enum VehicleStopStatus {
    IncomingAt = 0,
    StoppedAt = 1,
    #[default]
    InTransitTo = 2,
}

impl ProtoEnum for VehicleStopStatus {
    fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(VehicleStopStatus::IncomingAt),
            1 => Some(VehicleStopStatus::StoppedAt),
            2 => Some(VehicleStopStatus::InTransitTo),
            _ => None,
        }
    }

    fn as_i32(self) -> i32 {
        self as i32
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i32)]
pub enum CongestionLevel {
    #[default]
    UnknownCongestionLevel = 0,
    RunningSmoothly = 1,
    StopAndGo = 2,
    Congestion = 3,
    SevereCongestion = 4,
}

impl ProtoEnum for CongestionLevel {
    fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(CongestionLevel::UnknownCongestionLevel),
            1 => Some(CongestionLevel::RunningSmoothly),
            2 => Some(CongestionLevel::StopAndGo),
            3 => Some(CongestionLevel::Congestion),
            4 => Some(CongestionLevel::SevereCongestion),
            _ => None,
        }
    }

    fn as_i32(self) -> i32 {
        self as i32
    }
}

/// How full the vehicle is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i32)]
pub enum OccupancyStatus {
    #[default]
    Empty = 0,
    ManySeatsAvailable = 1,
    FewSeatsAvailable = 2,
    StandingRoomOnly = 3,
    CrushedStandingRoomOnly = 4,
    Full = 5,
    NotAcceptingPassengers = 6,
}

impl ProtoEnum for OccupancyStatus {
    fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(OccupancyStatus::Empty),
            1 => Some(OccupancyStatus::ManySeatsAvailable),
            2 => Some(OccupancyStatus::FewSeatsAvailable),
            3 => Some(OccupancyStatus::StandingRoomOnly),
            4 => Some(OccupancyStatus::CrushedStandingRoomOnly),
            5 => Some(OccupancyStatus::Full),
            6 => Some(OccupancyStatus::NotAcceptingPassengers),
            _ => None,
        }
    }

    fn as_i32(self) -> i32 {
        self as i32
    }
}

/// Realtime position report for one vehicle.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehiclePosition {
    pub trip: Option<TripDescriptor>,
    pub vehicle: Option<VehicleDescriptor>,
    pub position: Option<Position>,
    /// Index of the stop the status below refers to.
    pub current_stop_sequence: Option<u32>,
    pub stop_id: Option<String>,
    pub current_status: Option<VehicleStopStatus>,
    /// Moment the position was measured, POSIX seconds.
    pub timestamp: Option<u64>,
    pub congestion_level: Option<CongestionLevel>,
    pub occupancy_status: Option<OccupancyStatus>,
    #[serde(skip)]
    pub unknown_fields: UnknownFieldSet,
}

impl VehiclePosition {
    /// The set status, or `IN_TRANSIT_TO` when absent.
    pub fn current_status(&self) -> VehicleStopStatus {
        self.current_status.unwrap_or_default()
    }

    pub fn congestion_level(&self) -> CongestionLevel {
        self.congestion_level.unwrap_or_default()
    }

    pub fn occupancy_status(&self) -> OccupancyStatus {
        self.occupancy_status.unwrap_or_default()
    }
}

impl Message for VehiclePosition {
    fn merge_field(
        &mut self,
        field: u32,
        wire: WireType,
        reader: &mut Reader<'_>,
    ) -> Result<(), DecodeErrorKind> {
        match (field, wire) {
            (1, WireType::LengthDelimited) => codec::merge_message(&mut self.trip, reader)?,
            (2, WireType::LengthDelimited) => codec::merge_message(&mut self.position, reader)?,
            (3, WireType::Varint) => {
                self.current_stop_sequence = Some(codec::read_uint32(reader)?);
            }
            (4, WireType::Varint) => codec::read_enum(
                &mut self.current_status,
                4,
                reader,
                &mut self.unknown_fields,
            )?,
            (5, WireType::Varint) => self.timestamp = Some(reader.read_varint()?),
            (6, WireType::Varint) => codec::read_enum(
                &mut self.congestion_level,
                6,
                reader,
                &mut self.unknown_fields,
            )?,
            (7, WireType::LengthDelimited) => self.stop_id = Some(codec::read_string(reader)?),
            (8, WireType::LengthDelimited) => codec::merge_message(&mut self.vehicle, reader)?,
            (9, WireType::Varint) => codec::read_enum(
                &mut self.occupancy_status,
                9,
                reader,
                &mut self.unknown_fields,
            )?,
            _ => self.unknown_fields.read_value(field, wire, reader)?,
        }
        Ok(())
    }

    fn encode_raw(&self, buf: &mut Vec<u8>) {
        if let Some(trip) = &self.trip {
            codec::put_message(buf, 1, trip);
        }
        if let Some(position) = &self.position {
            codec::put_message(buf, 2, position);
        }
        if let Some(sequence) = self.current_stop_sequence {
            codec::put_uint32(buf, 3, sequence);
        }
        if let Some(status) = self.current_status {
            codec::put_enum(buf, 4, status);
        }
        if let Some(timestamp) = self.timestamp {
            codec::put_uint64(buf, 5, timestamp);
        }
        if let Some(level) = self.congestion_level {
            codec::put_enum(buf, 6, level);
        }
        if let Some(stop_id) = &self.stop_id {
            codec::put_string(buf, 7, stop_id);
        }
        if let Some(vehicle) = &self.vehicle {
            codec::put_message(buf, 8, vehicle);
        }
        if let Some(occupancy) = self.occupancy_status {
            codec::put_enum(buf, 9, occupancy);
        }
        self.unknown_fields.encode(buf);
    }

    fn encoded_len(&self) -> usize {
        self.trip.as_ref().map_or(0, |m| codec::message_len(1, m))
            + self.position.as_ref().map_or(0, |m| codec::message_len(2, m))
            + self
                .current_stop_sequence
                .map_or(0, |v| codec::uint32_len(3, v))
            + self.current_status.map_or(0, |v| codec::enum_len(4, v))
            + self.timestamp.map_or(0, |v| codec::uint64_len(5, v))
            + self.congestion_level.map_or(0, |v| codec::enum_len(6, v))
            + self.stop_id.as_deref().map_or(0, |v| codec::string_len(7, v))
            + self.vehicle.as_ref().map_or(0, |m| codec::message_len(8, m))
            + self.occupancy_status.map_or(0, |v| codec::enum_len(9, v))
            + self.unknown_fields.encoded_len()
    }

    fn merge(&mut self, other: &Self) {
        codec::merge_optional_message(&mut self.trip, &other.trip);
        codec::merge_optional_message(&mut self.vehicle, &other.vehicle);
        codec::merge_optional_message(&mut self.position, &other.position);
        codec::merge_optional(&mut self.current_stop_sequence, &other.current_stop_sequence);
        codec::merge_optional(&mut self.stop_id, &other.stop_id);
        codec::merge_optional(&mut self.current_status, &other.current_status);
        codec::merge_optional(&mut self.timestamp, &other.timestamp);
        codec::merge_optional(&mut self.congestion_level, &other.congestion_level);
        codec::merge_optional(&mut self.occupancy_status, &other.occupancy_status);
        self.unknown_fields.merge(&other.unknown_fields);
    }

    fn missing_required(&self, prefix: &str, missing: &mut Vec<String>) {
        if let Some(position) = &self.position {
            position.missing_required(&join_path(prefix, "position"), missing);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unknown::UnknownValue;

    fn sample_position() -> Position {
        Position {
            latitude: Some(42.3601),
            longitude: Some(-71.0589),
            bearing: Some(180.0),
            speed: Some(11.2),
            ..Default::default()
        }
    }

    #[test]
    fn test_vehicle_position_roundtrip() {
        let vehicle = VehiclePosition {
            trip: Some(TripDescriptor {
                trip_id: Some("t-9".to_string()),
                ..Default::default()
            }),
            vehicle: Some(VehicleDescriptor {
                id: Some("1714".to_string()),
                label: Some("Alewife".to_string()),
                ..Default::default()
            }),
            position: Some(sample_position()),
            current_stop_sequence: Some(12),
            stop_id: Some("70061".to_string()),
            current_status: Some(VehicleStopStatus::StoppedAt),
            timestamp: Some(1_700_000_200),
            congestion_level: Some(CongestionLevel::RunningSmoothly),
            occupancy_status: Some(OccupancyStatus::FewSeatsAvailable),
            ..Default::default()
        };
        let bytes = vehicle.encode_to_vec().unwrap();
        assert_eq!(bytes.len(), vehicle.encoded_len());
        assert_eq!(VehiclePosition::decode(&bytes).unwrap(), vehicle);
    }

    #[test]
    fn test_status_accessors_default_on_absence() {
        let vehicle = VehiclePosition::default();
        assert_eq!(vehicle.current_status, None);
        assert_eq!(vehicle.current_status(), VehicleStopStatus::InTransitTo);
        assert_eq!(vehicle.congestion_level(), CongestionLevel::UnknownCongestionLevel);
        assert_eq!(vehicle.occupancy_status(), OccupancyStatus::Empty);
    }

    #[test]
    fn test_out_of_range_occupancy_is_retained() {
        // Field 9 varint 11: beyond the known occupancy constants
        let vehicle = VehiclePosition::decode(&[0x48, 0x0b]).unwrap();
        assert_eq!(vehicle.occupancy_status, None);
        let retained: Vec<_> = vehicle
            .unknown_fields
            .iter()
            .map(|f| (f.number, f.value.clone()))
            .collect();
        assert_eq!(retained, vec![(9, UnknownValue::Varint(11))]);
        let mut buf = Vec::new();
        vehicle.encode_raw(&mut buf);
        assert_eq!(buf, [0x48, 0x0b]);
    }

    #[test]
    fn test_incomplete_position_reported_through_vehicle() {
        let vehicle = VehiclePosition {
            position: Some(Position {
                latitude: Some(42.0),
                ..Default::default()
            }),
            ..Default::default()
        };
        let err = vehicle.check_initialized().unwrap_err();
        assert_eq!(err.missing_fields(), ["position.longitude"]);
    }
}
