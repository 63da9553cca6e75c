use glasswire::frame::{Channel, RawPacket};
use glasswire::reassembly::{AudioFrameCollector, StreamConfig, StreamController};

fn audio_packet(frame_id: u16, payload: &[u8]) -> RawPacket {
    let mut bytes = frame_id.to_le_bytes().to_vec();
    bytes.push(0x00); // flags
    bytes.extend_from_slice(payload);
    RawPacket::new(Channel::Audio, bytes)
}

#[test]
fn capture_window_accumulates_in_arrival_order() {
    let mut controller = StreamController::new(StreamConfig::default());

    controller.start_audio_capture();
    for frame_id in 0..3u16 {
        let payload = vec![frame_id as u8; 18];
        let _ = controller.handle_packet(&audio_packet(frame_id, &payload));
    }
    let captured = controller.stop_audio_capture();

    assert_eq!(captured.len(), 54);

    let mut expected = vec![0u8; 18];
    expected.extend(vec![1u8; 18]);
    expected.extend(vec![2u8; 18]);
    assert_eq!(captured, expected);
}

#[test]
fn audio_outside_the_capture_window_is_dropped() {
    let mut controller = StreamController::new(StreamConfig::default());

    // Before the window opens.
    let _ = controller.handle_packet(&audio_packet(0, &[0xAA; 18]));

    controller.start_audio_capture();
    let _ = controller.handle_packet(&audio_packet(1, &[0xBB; 18]));
    let captured = controller.stop_audio_capture();

    assert_eq!(captured, vec![0xBB; 18]);

    // After the window closed.
    let _ = controller.handle_packet(&audio_packet(2, &[0xCC; 18]));
    assert_eq!(controller.stop_audio_capture(), Vec::<u8>::new());
}

#[test]
fn stop_without_data_returns_an_empty_buffer() {
    let mut collector = AudioFrameCollector::new();

    collector.start_capture();
    assert_eq!(collector.stop_capture(), Vec::<u8>::new());
}

#[test]
fn restarting_capture_discards_the_previous_window() {
    let mut collector = AudioFrameCollector::new();

    collector.start_capture();
    collector.append(&[0x01; 8]);
    collector.start_capture();
    collector.append(&[0x02; 8]);

    assert_eq!(collector.stop_capture(), vec![0x02; 8]);
}

#[test]
fn header_only_frames_pass_through_whole() {
    // A 3-byte notification has no payload to strip; the decoder hands
    // it over verbatim.
    let mut controller = StreamController::new(StreamConfig::default());

    controller.start_audio_capture();
    let _ = controller.handle_packet(&RawPacket::new(Channel::Audio, vec![0x01, 0x00, 0x80]));
    let captured = controller.stop_audio_capture();

    assert_eq!(captured, vec![0x01, 0x00, 0x80]);
}

#[test]
fn odd_length_payloads_are_still_appended() {
    let mut collector = AudioFrameCollector::new();

    collector.start_capture();
    collector.append(&[0x01, 0x02, 0x03]);

    assert_eq!(collector.stop_capture().len(), 3);
}

#[test]
fn audio_capture_is_independent_of_photo_reassembly() {
    let mut controller = StreamController::new(StreamConfig::default());

    controller.start_audio_capture();
    let _ = controller.handle_packet(&audio_packet(0, &[0xAA; 18]));

    // An interleaved photo chunk goes to the image path, not the
    // audio buffer.
    let mut photo = 0u16.to_le_bytes().to_vec();
    photo.extend_from_slice(&[0x42; 32]);
    let _ = controller.handle_packet(&RawPacket::new(Channel::Photo, photo));

    let _ = controller.handle_packet(&audio_packet(1, &[0xBB; 18]));
    let captured = controller.stop_audio_capture();

    assert_eq!(captured.len(), 36);
    assert_eq!(controller.expected_sequence(), Some(1));
}
