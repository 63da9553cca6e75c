use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicU32, Ordering};

/// Counter behind transfer-id assignment. Starts at 0 so the first
/// transfer is tagged 1; 0 means "no transfer yet" in log output.
static TRANSFER_ID_COUNTER: Lazy<AtomicU32> = Lazy::new(|| AtomicU32::new(0));

/// Returns the next image-transfer id, used to correlate log lines and
/// emitted artifacts across one reassembly.
#[inline]
pub fn increment_transfer_id() -> u32 {
    TRANSFER_ID_COUNTER.fetch_add(1, Ordering::Relaxed).wrapping_add(1)
}
