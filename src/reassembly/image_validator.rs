use crate::constants::{JPEG_EOI, JPEG_SOI, TRAILER_SCAN_WINDOW};
use std::borrow::Cow;
use tracing::warn;

/// What the validator did to a completed buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageVerdict {
    /// Both structural markers present; buffer returned unchanged.
    Intact,
    /// The real end-of-image marker was buried under trailing noise;
    /// `removed` bytes were cut after it.
    TrimmedTrailer { removed: usize },
    /// No end-of-image marker found near the tail; a synthetic one was
    /// appended to force structural validity.
    AppendedTrailer,
    /// No start-of-image marker at all; buffer passed through unchanged
    /// and downstream decoding may fail.
    MissingMarkers,
}

/// Checks a completed byte buffer for JPEG container markers and patches
/// the trailer when it can.
///
/// This is a boundary-marker heuristic, not a codec-level fix: internal
/// bitstream damage is never touched. The input is never mutated; the
/// result is the original slice, a truncated view of it, or an extended
/// copy.
pub fn repair_image(bytes: &[u8]) -> (Cow<'_, [u8]>, ImageVerdict) {
    if bytes.len() < JPEG_SOI.len() || bytes[..JPEG_SOI.len()] != JPEG_SOI {
        warn!(
            len = bytes.len(),
            "image has no start-of-image marker, passing through unrepaired"
        );
        return (Cow::Borrowed(bytes), ImageVerdict::MissingMarkers);
    }

    if bytes[bytes.len() - JPEG_EOI.len()..] == JPEG_EOI {
        return (Cow::Borrowed(bytes), ImageVerdict::Intact);
    }

    // The trailer is wrong. The capture may still have ended cleanly with
    // noise bytes appended after the real marker, so scan the tail window
    // backward for an embedded end-of-image pair.
    let floor = bytes.len().saturating_sub(TRAILER_SCAN_WINDOW);
    for i in (floor..=bytes.len() - JPEG_EOI.len()).rev() {
        if bytes[i..i + JPEG_EOI.len()] == JPEG_EOI {
            let end = i + JPEG_EOI.len();
            let removed = bytes.len() - end;
            warn!(at = i, removed, "trimming noise after embedded end-of-image marker");
            return (
                Cow::Borrowed(&bytes[..end]),
                ImageVerdict::TrimmedTrailer { removed },
            );
        }
    }

    warn!(
        len = bytes.len(),
        "no end-of-image marker near tail, appending synthetic one"
    );
    let mut extended = bytes.to_vec();
    extended.extend_from_slice(&JPEG_EOI);

    (Cow::Owned(extended), ImageVerdict::AppendedTrailer)
}
