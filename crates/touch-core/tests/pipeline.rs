//! Integration tests for the touch-core decoding pipeline.
//!
//! These tests push realistic byte streams through the public API,
//! exercising the frame reader, decoder, device state, and coordinate
//! mapper together.

use std::io::Cursor;

use touch_core::{
    map_point,
    protocol::frame::{ABS_PRESSURE, ABS_X, ABS_Y, EV_ABS},
    ByteOrder, DeviceState, FrameDecoder, FrameFields, FrameReader, RawFrame, Rectangle,
    DEVICE_SOURCE_RECT,
};

/// Serializes a sequence of field updates into one contiguous byte stream.
fn stream(order: ByteOrder, updates: &[FrameFields]) -> Vec<u8> {
    updates
        .iter()
        .flat_map(|f| *RawFrame::from_fields(*f, order).as_bytes())
        .collect()
}

/// Drains `bytes` through a reader + decoder and returns the final state.
fn replay(order: ByteOrder, bytes: Vec<u8>) -> DeviceState {
    let decoder = FrameDecoder::new(order);
    let mut state = DeviceState::new();
    for frame in FrameReader::new(Cursor::new(bytes)) {
        decoder.decode(&frame.expect("in-memory read cannot fail"), &mut state);
    }
    state
}

#[test]
fn test_stream_of_axis_updates_accumulates_latest_values() {
    // Arrange: two X updates, one Y, interleaved with SYN_REPORT frames
    let bytes = stream(
        ByteOrder::Native,
        &[
            FrameFields::abs(ABS_X, 100),
            FrameFields {
                event_type: 0,
                event_code: 0,
                value: 0,
            },
            FrameFields::abs(ABS_Y, 200),
            FrameFields::abs(ABS_X, 300),
        ],
    );

    // Act
    let state = replay(ByteOrder::Native, bytes);

    // Assert
    assert_eq!(state.x_raw, 300);
    assert_eq!(state.y_raw, 200);
    assert!(!state.contact);
}

#[test]
fn test_little_endian_device_stream_decodes_on_any_host() {
    // Arrange: a device that always writes little-endian records
    let bytes = stream(
        ByteOrder::Little,
        &[
            FrameFields::abs(ABS_X, 10_483),
            FrameFields::abs(ABS_Y, 7_862),
            FrameFields::abs(ABS_PRESSURE, 3_500),
        ],
    );

    // Act
    let state = replay(ByteOrder::Little, bytes);

    // Assert
    assert_eq!((state.x_raw, state.y_raw), (10_483, 7_862));
    assert!(state.contact && state.pressed);
}

#[test]
fn test_decoded_centre_maps_to_destination_centre() {
    // Arrange
    let bytes = stream(
        ByteOrder::Native,
        &[
            FrameFields::abs(ABS_X, 10_483),
            FrameFields::abs(ABS_Y, 7_862),
        ],
    );
    let dst = Rectangle::new(0, 0, 2000, 1000).unwrap();

    // Act
    let state = replay(ByteOrder::Native, bytes);
    let p = map_point(
        i64::from(state.x_raw),
        i64::from(state.y_raw),
        &DEVICE_SOURCE_RECT,
        &dst,
        false,
    )
    .unwrap();

    // Assert – within one pixel of the midpoint (division truncates)
    assert_eq!(p.x, 1000);
    assert!((499..=500).contains(&p.y), "got y={}", p.y);
}

#[test]
fn test_truncated_tail_does_not_disturb_decoded_state() {
    // Arrange: a pressure frame followed by half an X frame
    let mut bytes = stream(ByteOrder::Native, &[FrameFields::abs(ABS_PRESSURE, 2_000)]);
    let tail = RawFrame::from_fields(FrameFields::abs(ABS_X, 999), ByteOrder::Native);
    bytes.extend_from_slice(&tail.as_bytes()[..8]);

    // Act
    let state = replay(ByteOrder::Native, bytes);

    // Assert
    assert_eq!(state.x_raw, 0, "partial frame must never be applied");
    assert!(state.contact);
    assert!(!state.pressed);
}

#[test]
fn test_unknown_event_types_are_forward_compatible() {
    // Arrange: a burst of event types this decoder knows nothing about
    let mut updates: Vec<FrameFields> = (4u16..32)
        .map(|ty| FrameFields {
            event_type: ty,
            event_code: ABS_X,
            value: 42,
        })
        .collect();
    updates.push(FrameFields {
        event_type: EV_ABS,
        event_code: ABS_Y,
        value: 7,
    });

    // Act
    let state = replay(ByteOrder::Native, stream(ByteOrder::Native, &updates));

    // Assert
    assert_eq!(state.x_raw, 0);
    assert_eq!(state.y_raw, 7);
}
