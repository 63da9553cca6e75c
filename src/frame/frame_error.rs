#[derive(Debug, Clone, PartialEq)]
pub enum FrameDecodeError {
    /// A photo-channel packet too short to carry a sequence header and
    /// not recognizable as an end marker. Dropped by the caller.
    TruncatedChunk { len: usize },
}
