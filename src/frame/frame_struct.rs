/// Identifies the logical notification channel a packet arrived on.
///
/// The peripheral exposes one characteristic per stream; the transport
/// layer tags each notification with the channel it was delivered on
/// before handing it to the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Fragmented JPEG transfer: sequenced chunks closed by an end marker.
    Photo,
    /// Raw PCM frames, each prefixed with a small frame header.
    Audio,
}

/// A single raw notification payload as delivered by the transport.
///
/// Packets are ephemeral: the decoder classifies them into a
/// [`DecodedFrame`](crate::frame::DecodedFrame) and the raw bytes are not
/// retained past that point. The transport is expected to deliver packets
/// serially, in the order the stack received them, which may not match
/// the sequence order the peripheral sent them in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPacket {
    pub channel: Channel,
    pub bytes: Vec<u8>,
}

impl RawPacket {
    pub fn new(channel: Channel, bytes: Vec<u8>) -> Self {
        Self { channel, bytes }
    }
}

/// A classified packet, produced by [`FrameDecoder`](crate::frame::FrameDecoder).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedFrame {
    /// One sequenced fragment of an in-progress image transfer.
    ///
    /// The sequence id is a 16-bit little-endian counter identifying the
    /// chunk's position within a single image transfer; the payload is
    /// the raw image bytes with the sequence header stripped.
    ImageChunk { sequence: u16, payload: Vec<u8> },

    /// The end-of-image sentinel closing the current transfer.
    ImageEnd,

    /// One audio frame with its header stripped.
    ///
    /// Audio frames carry no reconstruction state; they are appended in
    /// arrival order while a capture window is open and dropped
    /// otherwise.
    AudioChunk { payload: Vec<u8> },
}
