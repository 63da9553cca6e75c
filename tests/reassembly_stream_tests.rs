use glasswire::frame::{Channel, RawPacket};
use glasswire::reassembly::{
    CompletedImage, ImageVerdict, StreamConfig, StreamController, StreamSignal,
};
use rand::seq::SliceRandom;

fn photo_packet(sequence: u16, payload: &[u8]) -> RawPacket {
    let mut bytes = sequence.to_le_bytes().to_vec();
    bytes.extend_from_slice(payload);
    RawPacket::new(Channel::Photo, bytes)
}

fn end_packet() -> RawPacket {
    RawPacket::new(Channel::Photo, vec![0xFF, 0xFF])
}

/// A synthetic JPEG-shaped body: valid structural markers around filler.
fn jpeg_body(len: usize) -> Vec<u8> {
    assert!(len >= 4);
    let mut body = vec![0xFF, 0xD8];
    body.extend(vec![0x42; len - 4]);
    body.extend_from_slice(&[0xFF, 0xD9]);
    body
}

fn images(signals: impl Iterator<Item = StreamSignal>) -> Vec<CompletedImage> {
    signals
        .filter_map(|signal| match signal {
            StreamSignal::ImageReady(image) => Some(image),
            _ => None,
        })
        .collect()
}

#[test]
fn in_order_delivery_reassembles_exact_bytes() {
    let mut controller = StreamController::new(StreamConfig::default());
    let body = jpeg_body(8_200);

    for (sequence, chunk) in body.chunks(200).enumerate() {
        let emitted = images(controller.handle_packet(&photo_packet(sequence as u16, chunk)));
        assert!(emitted.is_empty(), "no image may be emitted before the end marker");
    }

    let emitted = images(controller.handle_packet(&end_packet()));

    assert_eq!(emitted.len(), 1);
    assert_eq!(emitted[0].bytes, body);
    assert_eq!(emitted[0].verdict, ImageVerdict::Intact);
    assert!(emitted[0].transfer_id > 0);
}

#[test]
fn shuffled_delivery_after_opening_chunk_is_byte_identical() {
    let mut controller = StreamController::new(StreamConfig::default());
    let body = jpeg_body(9_000);

    let chunks: Vec<(u16, &[u8])> = body
        .chunks(250)
        .enumerate()
        .map(|(sequence, chunk)| (sequence as u16, chunk))
        .collect();

    // The opening chunk pins the expected sequence, so it goes first;
    // everything after it arrives in random order.
    let mut rest: Vec<(u16, &[u8])> = chunks[1..].to_vec();
    rest.shuffle(&mut rand::rng());

    let _ = controller.handle_packet(&photo_packet(chunks[0].0, chunks[0].1));
    for (sequence, chunk) in rest {
        // Gap-recovery signals may be produced along the way; without a
        // runtime acting on them, reordering alone must not corrupt
        // anything.
        let emitted = images(controller.handle_packet(&photo_packet(sequence, chunk)));
        assert!(emitted.is_empty());
    }

    let emitted = images(controller.handle_packet(&end_packet()));

    assert_eq!(emitted.len(), 1);
    assert_eq!(emitted[0].bytes, body);
}

#[test]
fn duplicate_chunk_is_a_noop() {
    let mut controller = StreamController::new(StreamConfig::default());
    let body = jpeg_body(8_400);

    let chunks: Vec<&[u8]> = body.chunks(400).collect();
    for (sequence, chunk) in chunks.iter().enumerate() {
        let _ = controller.handle_packet(&photo_packet(sequence as u16, chunk));
    }

    // Replay an already-consumed chunk; emitting it twice must produce
    // the same result as emitting it once.
    let _ = controller.handle_packet(&photo_packet(3, chunks[3]));

    let emitted = images(controller.handle_packet(&end_packet()));

    assert_eq!(emitted.len(), 1);
    assert_eq!(emitted[0].bytes, body);
}

#[test]
fn tiny_sequence_is_discarded_by_the_size_gate() {
    let mut controller = StreamController::new(StreamConfig::default());

    let _ = controller.handle_packet(&photo_packet(0, b"AB"));
    let _ = controller.handle_packet(&photo_packet(1, b"CD"));
    let emitted = images(controller.handle_packet(&end_packet()));

    assert!(emitted.is_empty());
    // The buffer resets to idle, ready for the next capture.
    assert_eq!(controller.expected_sequence(), None);
}

#[test]
fn size_gate_boundary() {
    // One byte under the default gate: discarded.
    let mut controller = StreamController::new(StreamConfig::default());
    let body = jpeg_body(7_999);
    for (sequence, chunk) in body.chunks(200).enumerate() {
        let _ = controller.handle_packet(&photo_packet(sequence as u16, chunk));
    }
    assert!(images(controller.handle_packet(&end_packet())).is_empty());

    // Exactly at the gate: emitted.
    let mut controller = StreamController::new(StreamConfig::default());
    let body = jpeg_body(8_000);
    for (sequence, chunk) in body.chunks(200).enumerate() {
        let _ = controller.handle_packet(&photo_packet(sequence as u16, chunk));
    }
    let emitted = images(controller.handle_packet(&end_packet()));
    assert_eq!(emitted.len(), 1);
    assert_eq!(emitted[0].bytes.len(), 8_000);
}

#[test]
fn size_gate_is_configurable() {
    let config = StreamConfig {
        min_image_size: 4,
        ..StreamConfig::default()
    };
    let mut controller = StreamController::new(config);
    let body = jpeg_body(32);

    for (sequence, chunk) in body.chunks(8).enumerate() {
        let _ = controller.handle_packet(&photo_packet(sequence as u16, chunk));
    }
    let emitted = images(controller.handle_packet(&end_packet()));

    assert_eq!(emitted.len(), 1);
    assert_eq!(emitted[0].bytes, body);
}

#[test]
fn end_marker_without_data_is_ignored() {
    let mut controller = StreamController::new(StreamConfig::default());

    let emitted = images(controller.handle_packet(&end_packet()));

    assert!(emitted.is_empty());
    assert_eq!(controller.expected_sequence(), None);
}

#[test]
fn consecutive_images_get_distinct_transfer_ids() {
    let mut controller = StreamController::new(StreamConfig::default());
    let body = jpeg_body(8_000);

    let mut ids = Vec::new();
    for _ in 0..2 {
        for (sequence, chunk) in body.chunks(500).enumerate() {
            let _ = controller.handle_packet(&photo_packet(sequence as u16, chunk));
        }
        let emitted = images(controller.handle_packet(&end_packet()));
        assert_eq!(emitted.len(), 1);
        ids.push(emitted[0].transfer_id);
    }

    assert!(ids[1] > ids[0]);
}

#[test]
fn transfers_can_start_at_a_nonzero_sequence() {
    // The expected sequence pins to whatever the opening chunk carries.
    let mut controller = StreamController::new(StreamConfig::default());
    let body = jpeg_body(8_200);

    for (i, chunk) in body.chunks(200).enumerate() {
        let _ = controller.handle_packet(&photo_packet(100 + i as u16, chunk));
    }
    let emitted = images(controller.handle_packet(&end_packet()));

    assert_eq!(emitted.len(), 1);
    assert_eq!(emitted[0].bytes, body);
}
