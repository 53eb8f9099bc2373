use transit_realtime::{
    Alert, Cause, DecodeErrorKind, Effect, FeedEntity, FeedHeader, FeedMessage, Incrementality,
    Message, Position, ProtoEnum, StopTimeEvent, StopTimeUpdate, TranslatedString, TripDescriptor,
    TripUpdate, UnknownValue, VehicleDescriptor, VehiclePosition, VehicleStopStatus,
};

fn sample_feed() -> FeedMessage {
    FeedMessage {
        header: Some(FeedHeader {
            gtfs_realtime_version: Some("2.0".to_string()),
            incrementality: Some(Incrementality::FullDataset),
            timestamp: Some(1_700_000_000),
            ..Default::default()
        }),
        entity: vec![
            FeedEntity {
                id: Some("trip-1".to_string()),
                trip_update: Some(TripUpdate {
                    trip: Some(TripDescriptor {
                        trip_id: Some("t-17".to_string()),
                        route_id: Some("Red".to_string()),
                        ..Default::default()
                    }),
                    stop_time_update: vec![StopTimeUpdate {
                        stop_sequence: Some(5),
                        stop_id: Some("70063".to_string()),
                        arrival: Some(StopTimeEvent {
                            delay: Some(120),
                            uncertainty: Some(30),
                            ..Default::default()
                        }),
                        ..Default::default()
                    }],
                    timestamp: Some(1_700_000_000),
                    ..Default::default()
                }),
                ..Default::default()
            },
            FeedEntity {
                id: Some("vehicle-1".to_string()),
                vehicle: Some(VehiclePosition {
                    trip: Some(TripDescriptor {
                        trip_id: Some("t-17".to_string()),
                        ..Default::default()
                    }),
                    vehicle: Some(VehicleDescriptor {
                        id: Some("1714".to_string()),
                        ..Default::default()
                    }),
                    position: Some(Position {
                        latitude: Some(42.3601),
                        longitude: Some(-71.0589),
                        bearing: Some(93.5),
                        ..Default::default()
                    }),
                    current_status: Some(VehicleStopStatus::StoppedAt),
                    ..Default::default()
                }),
                ..Default::default()
            },
            FeedEntity {
                id: Some("alert-1".to_string()),
                alert: Some(Alert {
                    cause: Some(Cause::Maintenance),
                    effect: Some(Effect::Detour),
                    header_text: Some(TranslatedString::from_text("Buses replace trains")),
                    ..Default::default()
                }),
                ..Default::default()
            },
        ],
        ..Default::default()
    }
}

#[test]
fn test_full_feed_roundtrip() {
    let feed = sample_feed();
    let bytes = feed.encode_to_vec().expect("feed should be initialized");

    assert_eq!(bytes.len(), feed.encoded_len());

    let decoded = FeedMessage::decode(&bytes).expect("own encoding should decode");
    assert_eq!(decoded, feed);
    assert_eq!(decoded.entity.len(), 3);
    let status = decoded.entity[1].vehicle.as_ref().unwrap().current_status();
    assert_eq!(status.as_i32(), 1);
}

#[test]
fn test_unknown_fields_survive_reencoding_byte_for_byte() {
    let mut bytes = sample_feed().encode_to_vec().unwrap();
    // Append fields from an imaginary newer schema revision: field 99
    // varint, field 100 length-delimited
    let suffix: &[u8] = &[0x98, 0x06, 0x2a, 0xa2, 0x06, 0x04, b'n', b'e', b'x', b't'];
    bytes.extend_from_slice(suffix);

    let decoded = FeedMessage::decode(&bytes).unwrap();
    let retained: Vec<_> = decoded.unknown_fields.iter().map(|f| f.number).collect();
    assert_eq!(retained, [99, 100]);

    let reencoded = decoded.encode_to_vec().unwrap();
    assert_eq!(reencoded, bytes);
}

#[test]
fn test_unknown_enum_value_roundtrips() {
    // A header whose incrementality uses a constant this schema lacks
    let bytes = [0x0a, 0x03, b'2', b'.', b'0', 0x10, 0x07];
    let header = FeedHeader::decode(&bytes).unwrap();
    assert_eq!(header.incrementality, None);
    assert_eq!(header.incrementality(), Incrementality::FullDataset);
    assert_eq!(
        header.unknown_fields.iter().next().map(|f| f.value.clone()),
        Some(UnknownValue::Varint(7))
    );
    assert_eq!(header.encode_to_vec().unwrap(), bytes);
}

#[test]
fn test_differential_overlay_appends_entities() {
    let mut feed = sample_feed();
    let update = FeedMessage {
        header: Some(FeedHeader {
            gtfs_realtime_version: Some("2.0".to_string()),
            incrementality: Some(Incrementality::Differential),
            timestamp: Some(1_700_000_060),
            ..Default::default()
        }),
        entity: vec![FeedEntity {
            id: Some("vehicle-2".to_string()),
            is_deleted: Some(true),
            ..Default::default()
        }],
        ..Default::default()
    };

    feed.merge_from_bytes(&update.encode_to_vec().unwrap()).unwrap();

    let header = feed.header.as_ref().unwrap();
    assert_eq!(header.timestamp, Some(1_700_000_060));
    assert_eq!(header.incrementality(), Incrementality::Differential);
    assert_eq!(feed.entity.len(), 4);
    assert!(feed.entity[3].is_deleted());
}

#[test]
fn test_truncated_feed_carries_partial_message() {
    let bytes = sample_feed().encode_to_vec().unwrap();
    let err = FeedMessage::decode(&bytes[..bytes.len() - 1]).unwrap_err();
    assert_eq!(err.kind(), DecodeErrorKind::Truncated);

    // Everything before the cut entity already decoded
    let partial = err.partial_message::<FeedMessage>().unwrap();
    assert_eq!(
        partial.header.as_ref().unwrap().gtfs_realtime_version(),
        "2.0"
    );
    assert_eq!(partial.entity.len(), 2);
}

#[test]
fn test_garbage_bytes_are_rejected() {
    let result = FeedMessage::decode(&[0xff, 0xfe, 0x00, 0x01]);
    assert!(result.is_err());
}

#[test]
fn test_builder_reports_deep_missing_fields() {
    let mut builder = FeedMessage::builder();
    builder.header = Some(FeedHeader {
        gtfs_realtime_version: Some("2.0".to_string()),
        ..Default::default()
    });
    builder.entity.push(FeedEntity {
        id: Some("trip-1".to_string()),
        // A trip update with its required descriptor missing
        trip_update: Some(TripUpdate::default()),
        ..Default::default()
    });

    let err = builder.build().unwrap_err();
    assert_eq!(err.missing_fields(), ["entity[0].trip_update.trip"]);
}

#[test]
fn test_builder_staged_feed_builds_once_complete() {
    let mut builder = FeedMessage::builder();
    assert!(builder.clone().build().is_err());

    builder.merge_from(&sample_feed());
    let feed = builder.build().unwrap();
    assert_eq!(feed, sample_feed());
}

#[test]
fn test_json_view_uses_camel_case_and_hides_unknown_fields() {
    let mut bytes = sample_feed().encode_to_vec().unwrap();
    bytes.extend_from_slice(&[0x98, 0x06, 0x2a]); // unknown field 99

    let feed = FeedMessage::decode(&bytes).unwrap();
    let json = serde_json::to_value(&feed).unwrap();

    assert_eq!(json["header"]["gtfsRealtimeVersion"], "2.0");
    assert_eq!(json["header"]["incrementality"], "FULL_DATASET");
    assert_eq!(
        json["entity"][0]["tripUpdate"]["stopTimeUpdate"][0]["stopId"],
        "70063"
    );
    assert_eq!(json["entity"][2]["alert"]["effect"], "DETOUR");
    // Retained wire data is codec state, not feed content
    assert!(json.get("unknownFields").is_none());
    assert!(json["header"].get("unknownFields").is_none());
}
