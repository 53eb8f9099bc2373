//! # transit-realtime
//!
//! A binary codec for the GTFS-Realtime message set: vehicle positions,
//! trip delay predictions, and service alerts exchanged between a transit
//! agency's backend and its consumers.
//!
//! The wire format is standard protocol buffer encoding with the field
//! numbers fixed by the GTFS-Realtime schema, so feeds produced by any
//! conforming agency decode here and messages encoded here are readable by
//! any conforming consumer. Field numbers, wire types, or enum values this
//! crate does not know are retained and re-emitted verbatim, so a feed from
//! a newer schema revision survives a decode/encode round trip intact.
//!
//! ```
//! use transit_realtime::{FeedHeader, FeedMessage, Message};
//!
//! let mut feed = FeedMessage::builder();
//! feed.header = Some(FeedHeader {
//!     gtfs_realtime_version: Some("2.0".to_string()),
//!     timestamp: Some(1_700_000_000),
//!     ..Default::default()
//! });
//! let feed = feed.build()?;
//!
//! let bytes = feed.encode_to_vec()?;
//! assert_eq!(FeedMessage::decode(&bytes)?, feed);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod alert;
mod builder;
mod codec;
mod descriptor;
mod error;
mod feed;
mod message;
mod trip;
mod unknown;
mod vehicle;
pub mod wire;

// Re-export the whole data model at the crate root; the module split keeps
// files reviewable but consumers shouldn't have to care about it.
pub use alert::{Alert, Cause, Effect, SeverityLevel, TimeRange, TranslatedString, Translation};
pub use builder::Builder;
pub use descriptor::{
    EntitySelector, Position, TripDescriptor, TripScheduleRelationship, VehicleDescriptor,
};
pub use error::{DecodeError, DecodeErrorKind, UninitializedError};
pub use feed::{FeedEntity, FeedHeader, FeedMessage, Incrementality};
pub use message::{Message, ProtoEnum};
pub use trip::{StopTimeEvent, StopTimeScheduleRelationship, StopTimeUpdate, TripUpdate};
pub use unknown::{UnknownField, UnknownFieldSet, UnknownValue};
pub use vehicle::{CongestionLevel, OccupancyStatus, VehiclePosition, VehicleStopStatus};
