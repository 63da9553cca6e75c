use crate::constants::{
    FORCED_SKIP_DELAY, FORCED_SKIP_MISSING_THRESHOLD, FORCED_SKIP_PENDING_THRESHOLD, GAP_WAIT,
    MAX_PENDING_CACHE, MIN_IMAGE_SIZE, PENDING_EVICTION_LAG, RETRANSMIT_DEBOUNCE,
    RETRANSMIT_MISSING_THRESHOLD,
};
use std::time::Duration;

/// Tunables for the reassembly state machine.
///
/// Defaults come from `constants` and match the device the protocol was
/// built against. The minimum image size in particular is a heuristic for
/// that device's chunk size and capture resolution; it does not
/// necessarily generalize.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Completed images smaller than this are discarded as truncated.
    pub min_image_size: usize,
    /// Missing-id count that schedules a retransmission request.
    pub retransmit_missing_threshold: usize,
    /// Missing-id count that forces an immediate skip.
    pub forced_skip_missing_threshold: usize,
    /// Pending-cache size that forces an immediate skip.
    pub forced_skip_pending_threshold: usize,
    /// Pending-cache size that triggers eviction of lagging entries.
    pub max_pending_cache: usize,
    /// How far behind the expected sequence an entry must lag to be
    /// evicted on overflow.
    pub pending_eviction_lag: u16,
    /// How long to wait for a gap to close before skipping it.
    pub gap_wait: Duration,
    /// Deadline for the forced-skip path.
    pub forced_skip_delay: Duration,
    /// Quiet window between retransmission requests.
    pub retransmit_debounce: Duration,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            min_image_size: MIN_IMAGE_SIZE,
            retransmit_missing_threshold: RETRANSMIT_MISSING_THRESHOLD,
            forced_skip_missing_threshold: FORCED_SKIP_MISSING_THRESHOLD,
            forced_skip_pending_threshold: FORCED_SKIP_PENDING_THRESHOLD,
            max_pending_cache: MAX_PENDING_CACHE,
            pending_eviction_lag: PENDING_EVICTION_LAG,
            gap_wait: GAP_WAIT,
            forced_skip_delay: FORCED_SKIP_DELAY,
            retransmit_debounce: RETRANSMIT_DEBOUNCE,
        }
    }
}
