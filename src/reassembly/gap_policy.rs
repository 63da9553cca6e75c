use crate::reassembly::StreamConfig;
use std::time::Duration;

/// Timer work requested by the policy in response to an out-of-order
/// arrival. Arming replaces any timer of the same kind already running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapDirective {
    ArmGapTimer(Duration),
    ArmRetransmitTimer(Duration),
}

/// Decides how to react to gaps in the chunk sequence.
///
/// Three escalation levels, mirroring the loss behavior observed on the
/// device: a short wait for late packets to close the gap on their own, a
/// debounced retransmission request once too many ids are outstanding,
/// and an immediate forced skip when loss is heavy enough that waiting
/// out the full window would stall the transfer.
///
/// The policy owns only scheduling state (which timers are armed); the
/// sequence bookkeeping stays in the reassembly buffer, and actually
/// running timers is the caller's concern.
#[derive(Debug)]
pub struct GapRecoveryPolicy {
    retransmit_missing_threshold: usize,
    forced_skip_missing_threshold: usize,
    forced_skip_pending_threshold: usize,
    gap_wait: Duration,
    forced_skip_delay: Duration,
    retransmit_debounce: Duration,
    gap_timer_armed: bool,
    retransmit_scheduled: bool,
}

impl GapRecoveryPolicy {
    pub fn new(config: &StreamConfig) -> Self {
        Self {
            retransmit_missing_threshold: config.retransmit_missing_threshold,
            forced_skip_missing_threshold: config.forced_skip_missing_threshold,
            forced_skip_pending_threshold: config.forced_skip_pending_threshold,
            gap_wait: config.gap_wait,
            forced_skip_delay: config.forced_skip_delay,
            retransmit_debounce: config.retransmit_debounce,
            gap_timer_armed: false,
            retransmit_scheduled: false,
        }
    }

    /// Assesses the buffer after an out-of-order chunk was cached.
    pub fn on_out_of_order(&mut self, missing: usize, pending: usize) -> Vec<GapDirective> {
        let mut directives = Vec::new();

        if missing > self.retransmit_missing_threshold && !self.retransmit_scheduled {
            self.retransmit_scheduled = true;
            directives.push(GapDirective::ArmRetransmitTimer(self.retransmit_debounce));
        }

        if !self.gap_timer_armed {
            self.gap_timer_armed = true;
            directives.push(GapDirective::ArmGapTimer(self.gap_wait));
        }

        // Severe gap: don't sit out the full wait, skip almost immediately.
        if missing > self.forced_skip_missing_threshold
            || pending > self.forced_skip_pending_threshold
        {
            self.gap_timer_armed = true;
            directives.push(GapDirective::ArmGapTimer(self.forced_skip_delay));
        }

        directives
    }

    /// The gap the timers were waiting on closed before they fired.
    /// Returns which timers were armed and must now be cancelled.
    pub fn on_gap_closed(&mut self) -> (bool, bool) {
        (
            std::mem::take(&mut self.gap_timer_armed),
            std::mem::take(&mut self.retransmit_scheduled),
        )
    }

    pub fn on_gap_timer_fired(&mut self) {
        self.gap_timer_armed = false;
    }

    /// Returns whether a request was actually outstanding, guarding
    /// against a fire that raced a cancellation.
    pub fn on_retransmit_timer_fired(&mut self) -> bool {
        std::mem::take(&mut self.retransmit_scheduled)
    }

    /// Clears all scheduling state (end of image, disconnect). Returns
    /// which timers were armed and must be cancelled, as `on_gap_closed`.
    pub fn reset(&mut self) -> (bool, bool) {
        self.on_gap_closed()
    }

    pub fn gap_timer_armed(&self) -> bool {
        self.gap_timer_armed
    }

    pub fn retransmit_scheduled(&self) -> bool {
        self.retransmit_scheduled
    }
}
