use std::time::Duration;

// Photo channel wire constants
pub const SEQ_FIELD_SIZE: usize = 2;
pub const MIN_CHUNK_SIZE: usize = 3;

/// Sentinel packet prefix signaling end-of-image on the photo channel.
/// Any trailing bytes after the two marker bytes are ignored.
pub const IMAGE_END_MARKER: [u8; 2] = [0xFF, 0xFF];

/// Size of the per-notification audio frame header: a 2-byte frame id
/// followed by a 1-byte flags field. Stripped before accumulation.
pub const AUDIO_HEADER_SIZE: usize = 3;

// JPEG structural markers checked by the image validator
pub const JPEG_SOI: [u8; 2] = [0xFF, 0xD8];
pub const JPEG_EOI: [u8; 2] = [0xFF, 0xD9];

/// How far back from the end of a completed buffer the validator scans
/// for an embedded end-of-image marker before appending a synthetic one.
pub const TRAILER_SCAN_WINDOW: usize = 10;

/// Completed buffers smaller than this are treated as truncated captures
/// and discarded. Tuned for this device's chunk size; override through
/// `StreamConfig` for other capture resolutions.
pub const MIN_IMAGE_SIZE: usize = 8_000;

/// Missing-id count above which a retransmission request is scheduled.
pub const RETRANSMIT_MISSING_THRESHOLD: usize = 20;

/// Missing-id count above which the gap timer is replaced with an
/// immediate forced skip.
pub const FORCED_SKIP_MISSING_THRESHOLD: usize = 30;

/// Pending-cache size above which the gap timer is replaced with an
/// immediate forced skip.
pub const FORCED_SKIP_PENDING_THRESHOLD: usize = 20;

/// Pending-cache size above which entries lagging behind the expected
/// sequence are evicted.
pub const MAX_PENDING_CACHE: usize = 40;

/// Entries this far behind the expected sequence are eligible for
/// eviction once the cache overflows.
pub const PENDING_EVICTION_LAG: u16 = 10;

/// How long to wait for a gap to close before skipping past it.
pub const GAP_WAIT: Duration = Duration::from_millis(500);

/// Deadline used when heavy loss forces an immediate skip.
pub const FORCED_SKIP_DELAY: Duration = Duration::from_millis(10);

/// Quiet window between retransmission requests, preventing request
/// storms while loss is sustained.
pub const RETRANSMIT_DEBOUNCE: Duration = Duration::from_secs(2);
