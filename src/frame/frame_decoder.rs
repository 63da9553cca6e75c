use crate::{
    constants::{AUDIO_HEADER_SIZE, IMAGE_END_MARKER, MIN_CHUNK_SIZE, SEQ_FIELD_SIZE},
    frame::{Channel, DecodedFrame, FrameDecodeError, RawPacket},
};

/// Classifies raw notification payloads into protocol frames.
///
/// The decoder is pure: it inspects one packet at a time, holds no state,
/// and performs no side effects. Classification rules per channel:
///
/// - **Photo**, length >= 2, first two bytes both `0xFF`: end-of-image
///   marker. Trailing bytes are ignored.
/// - **Photo**, length >= 3 otherwise: an image chunk whose first two
///   bytes are the little-endian sequence id and whose remainder is
///   image payload.
/// - **Photo**, anything shorter: malformed, rejected.
/// - **Audio**: an audio frame. The 3-byte frame header is stripped when
///   present; shorter packets pass through whole.
///
/// Whether a frame is *used* (e.g. audio outside a capture window) is the
/// controller's decision, not the decoder's.
pub struct FrameDecoder;

impl FrameDecoder {
    pub fn decode(packet: &RawPacket) -> Result<DecodedFrame, FrameDecodeError> {
        match packet.channel {
            Channel::Photo => Self::decode_photo(&packet.bytes),
            Channel::Audio => Ok(Self::decode_audio(&packet.bytes)),
        }
    }

    fn decode_photo(bytes: &[u8]) -> Result<DecodedFrame, FrameDecodeError> {
        if bytes.len() >= IMAGE_END_MARKER.len() && bytes[..2] == IMAGE_END_MARKER {
            return Ok(DecodedFrame::ImageEnd);
        }

        if bytes.len() < MIN_CHUNK_SIZE {
            return Err(FrameDecodeError::TruncatedChunk { len: bytes.len() });
        }

        let sequence = u16::from_le_bytes([bytes[0], bytes[1]]);

        Ok(DecodedFrame::ImageChunk {
            sequence,
            payload: bytes[SEQ_FIELD_SIZE..].to_vec(),
        })
    }

    fn decode_audio(bytes: &[u8]) -> DecodedFrame {
        // Frames no larger than the header are passed through whole; the
        // peripheral occasionally emits bare keep-alive frames.
        let payload = if bytes.len() > AUDIO_HEADER_SIZE {
            bytes[AUDIO_HEADER_SIZE..].to_vec()
        } else {
            bytes.to_vec()
        };

        DecodedFrame::AudioChunk { payload }
    }
}
