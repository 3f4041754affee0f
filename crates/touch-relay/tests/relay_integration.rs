//! End-to-end tests: byte source → TouchRelay → recorded pointer calls.
//!
//! These tests wire real infrastructure (files, localhost TCP, region
//! providers) to the relay loop, with `MockPointerActuator` in place of the OS.

use std::io::{Cursor, Write};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use touch_core::protocol::frame::{ABS_PRESSURE, ABS_X, ABS_Y};
use touch_core::{ByteOrder, FrameFields, RawFrame, Rectangle};
use touch_relay::application::relay_touch::{
    ButtonTrigger, PointerActuator, RelayConfig, RelayError, TouchRelay,
};
use touch_relay::infrastructure::pointer::mock::{MockPointerActuator, PointerCall};
use touch_relay::infrastructure::region::{FixedRegion, MockRegionProvider, RegionProvider};
use touch_relay::infrastructure::transport::{accept_one, bind_with_fallback, open_file};
use uuid::Uuid;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn frames(updates: &[(u16, u32)]) -> Vec<u8> {
    updates
        .iter()
        .flat_map(|&(code, value)| {
            *RawFrame::from_fields(FrameFields::abs(code, value), ByteOrder::Native).as_bytes()
        })
        .collect()
}

fn unthrottled() -> RelayConfig {
    RelayConfig {
        interval: Duration::ZERO,
        rotate: false,
        ..RelayConfig::default()
    }
}

fn relay_with(
    config: RelayConfig,
    destination: Rectangle,
) -> (TouchRelay, Arc<MockPointerActuator>) {
    let actuator = Arc::new(MockPointerActuator::new());
    let relay = TouchRelay::new(
        config,
        destination,
        Arc::clone(&actuator) as Arc<dyn PointerActuator>,
    )
    .expect("valid relay configuration");
    (relay, actuator)
}

fn screen() -> Rectangle {
    Rectangle::new(0, 0, 1920, 1080).unwrap()
}

// ── In-memory source ──────────────────────────────────────────────────────────

#[test]
fn test_stroke_from_touch_down_to_lift_off() {
    // Arrange: hover, press at the centre, drag right, lift
    let (mut relay, actuator) = relay_with(unthrottled(), screen());
    let data = frames(&[
        (ABS_X, 10_483),
        (ABS_Y, 7_862),
        (ABS_PRESSURE, 3_500),
        (ABS_X, 20_966),
        (ABS_PRESSURE, 0),
    ]);

    // Act
    let outcome = relay.run(Cursor::new(data)).unwrap();

    // Assert
    assert_eq!(outcome.frames, 5);
    assert_eq!(actuator.moves(), vec![(960, 539), (1920, 539)]);
    assert_eq!(actuator.downs(), 2);
    assert_eq!(
        actuator.calls().last(),
        Some(&PointerCall::Up),
        "lift-off must release the button"
    );
}

#[test]
fn test_non_abs_events_do_not_disturb_the_stroke() {
    // Arrange: interleave EV_SYN / EV_KEY records between position updates
    let (mut relay, actuator) = relay_with(unthrottled(), screen());
    let mut data = frames(&[(ABS_X, 10_483), (ABS_Y, 7_862)]);
    for event_type in [0u16, 1, 2] {
        let fields = FrameFields {
            event_type,
            event_code: 0,
            value: 99_999,
        };
        data.extend_from_slice(RawFrame::from_fields(fields, ByteOrder::Native).as_bytes());
    }
    data.extend(frames(&[(ABS_PRESSURE, 2_000)]));

    // Act
    relay.run(Cursor::new(data)).unwrap();

    // Assert
    assert_eq!(actuator.moves(), vec![(960, 539)]);
}

#[test]
fn test_edge_triggered_stroke_sends_one_press_and_one_release() {
    // Arrange
    let config = RelayConfig {
        button_trigger: ButtonTrigger::Edge,
        ..unthrottled()
    };
    let (mut relay, actuator) = relay_with(config, screen());
    let data = frames(&[
        (ABS_PRESSURE, 4_000),
        (ABS_X, 100),
        (ABS_X, 200),
        (ABS_X, 300),
        (ABS_PRESSURE, 0),
        (ABS_X, 400),
    ]);

    // Act
    relay.run(Cursor::new(data)).unwrap();

    // Assert
    assert_eq!((actuator.downs(), actuator.ups()), (1, 1));
    assert_eq!(actuator.moves().len(), 4);
}

#[test]
fn test_failing_actuator_surfaces_as_relay_error() {
    let actuator = Arc::new(MockPointerActuator::failing());
    let mut relay = TouchRelay::new(unthrottled(), screen(), actuator).unwrap();

    let result = relay.run(Cursor::new(frames(&[(ABS_PRESSURE, 0)])));

    assert!(matches!(result, Err(RelayError::Actuation(_))));
}

// ── Region providers ──────────────────────────────────────────────────────────

#[test]
fn test_fixed_region_offsets_the_projection() {
    // Arrange: a region on a second monitor
    let region = FixedRegion(Rectangle::new(1920, 0, 3840, 1080).unwrap());
    let (mut relay, actuator) = relay_with(unthrottled(), region.destination().unwrap());

    // Act
    relay
        .run(Cursor::new(frames(&[(ABS_PRESSURE, 2_000)])))
        .unwrap();

    // Assert – device origin lands on the region's origin
    assert_eq!(actuator.moves(), vec![(1920, 0)]);
}

#[test]
fn test_mock_region_provider_feeds_relay() {
    let provider = MockRegionProvider::new(Rectangle::new(0, 0, 100, 100).unwrap());
    let (relay, _actuator) = relay_with(unthrottled(), provider.destination().unwrap());
    assert_eq!(relay.destination().x_max, 100);
}

// ── Capture file ──────────────────────────────────────────────────────────────

#[test]
fn test_capture_file_replay_with_truncated_tail() {
    // Arrange
    let path = std::env::temp_dir().join(format!("touch_relay_capture_{}.bin", Uuid::new_v4()));
    let mut data = frames(&[(ABS_X, 0), (ABS_Y, 0), (ABS_PRESSURE, 3_500)]);
    data.extend_from_slice(&[0xAB; 5]);
    std::fs::File::create(&path)
        .unwrap()
        .write_all(&data)
        .unwrap();
    let (mut relay, actuator) = relay_with(unthrottled(), screen());

    // Act
    let outcome = relay.run(open_file(&path).unwrap()).unwrap();

    // Assert
    assert_eq!(outcome.frames, 3);
    assert_eq!(outcome.truncated_bytes, 5);
    assert_eq!(actuator.moves(), vec![(0, 0)]);
    assert_eq!(actuator.downs(), 1);

    std::fs::remove_file(&path).ok();
}

// ── TCP ───────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_relay_over_localhost_tcp_until_peer_closes() {
    // Arrange: listener on an ephemeral port; a device thread writes and hangs up
    let listener = bind_with_fallback(SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0), 1)
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    let payload = frames(&[(ABS_X, 10_483), (ABS_Y, 7_862), (ABS_PRESSURE, 3_500)]);
    let device = std::thread::spawn(move || {
        let mut stream = std::net::TcpStream::connect(addr).unwrap();
        // Split a frame across writes to exercise reassembly.
        stream.write_all(&payload[..20]).unwrap();
        stream.flush().unwrap();
        stream.write_all(&payload[20..]).unwrap();
    });

    let (stream, _peer) = accept_one(&listener).await.unwrap();
    let (mut relay, actuator) = relay_with(unthrottled(), screen());

    // Act
    let outcome = tokio::task::spawn_blocking(move || relay.run(stream))
        .await
        .unwrap()
        .unwrap();
    device.join().unwrap();

    // Assert
    assert_eq!(outcome.frames, 3);
    assert_eq!(actuator.moves(), vec![(960, 539)]);
    assert_eq!(actuator.downs(), 1);
}
