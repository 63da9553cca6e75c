use crate::frame::{ControlCommand, DecodedFrame, FrameDecodeError, FrameDecoder, RawPacket};
use crate::reassembly::{
    AudioFrameCollector, ChunkOutcome, GapDirective, GapRecoveryPolicy, ImageVerdict,
    ReassemblyBuffer, StreamConfig, repair_image,
};
use crate::utils::increment_transfer_id;
use std::collections::VecDeque;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// A fully reassembled, size-validated image ready for the consumer.
///
/// Ownership of the bytes transfers with the value; the reassembly state
/// is already cleared by the time this is emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedImage {
    /// Correlates the artifact with this transfer's log lines.
    pub transfer_id: u32,
    pub bytes: Vec<u8>,
    /// What the validator did to the buffer before emission.
    pub verdict: ImageVerdict,
}

/// Work requested from the driving runtime by one controller step.
///
/// Timer signals carry replace semantics: arming a timer supersedes any
/// timer of the same kind still running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamSignal {
    /// Hand a completed artifact to the consumer.
    ImageReady(CompletedImage),
    ArmGapTimer(Duration),
    CancelGapTimer,
    ArmRetransmitTimer(Duration),
    CancelRetransmitTimer,
    /// Write a single-byte opcode to the peripheral's control
    /// characteristic.
    WriteControl(ControlCommand),
}

/// Signal queue produced by one controller entry point.
pub struct StreamSignals {
    queue: VecDeque<StreamSignal>,
}

impl Iterator for StreamSignals {
    type Item = StreamSignal;

    fn next(&mut self) -> Option<Self::Item> {
        self.queue.pop_front()
    }
}

/// Orchestrates the reassembly state machine.
///
/// The controller is the single owner and mutation point of all
/// reassembly state: the transport's serialized notification stream and
/// the timer fires must all be routed through one instance, one call at
/// a time. Each entry point runs one transition and returns the queue of
/// side effects for the runtime to carry out; nothing here blocks or
/// calls back into the consumer.
///
/// Recoverable protocol conditions (malformed packets, stale chunks,
/// gaps, undersized captures) are handled internally and surface only as
/// log lines. Silence is the only failure signal the consumer sees.
pub struct StreamController {
    config: StreamConfig,
    buffer: ReassemblyBuffer,
    policy: GapRecoveryPolicy,
    audio: AudioFrameCollector,
    transfer_id: u32,
}

impl StreamController {
    pub fn new(config: StreamConfig) -> Self {
        let buffer = ReassemblyBuffer::new(config.max_pending_cache, config.pending_eviction_lag);
        let policy = GapRecoveryPolicy::new(&config);

        Self {
            config,
            buffer,
            policy,
            audio: AudioFrameCollector::new(),
            transfer_id: 0,
        }
    }

    /// Processes one transport notification.
    pub fn handle_packet(&mut self, packet: &RawPacket) -> StreamSignals {
        let mut queue = VecDeque::new();

        match FrameDecoder::decode(packet) {
            Ok(DecodedFrame::ImageChunk { sequence, payload }) => {
                self.on_image_chunk(sequence, payload, &mut queue);
            }
            Ok(DecodedFrame::ImageEnd) => {
                self.on_image_end(&mut queue);
            }
            Ok(DecodedFrame::AudioChunk { payload }) => {
                self.audio.append(&payload);
            }
            Err(FrameDecodeError::TruncatedChunk { len }) => {
                warn!(len, "dropping malformed photo packet");
            }
        }

        StreamSignals { queue }
    }

    /// The gap-wait deadline passed without the gap closing: abandon it
    /// and resume from the oldest cached chunk.
    pub fn on_gap_timeout(&mut self) -> StreamSignals {
        self.policy.on_gap_timer_fired();

        if let Some(skip) = self.buffer.skip_to_oldest_pending() {
            warn!(
                transfer_id = self.transfer_id,
                skipped = skip.skipped,
                resumed_at = skip.resumed_at,
                drained = skip.drained,
                "gap wait expired, skipping missing chunks"
            );
        }

        StreamSignals {
            queue: VecDeque::new(),
        }
    }

    /// The retransmission debounce window elapsed: issue the request.
    pub fn on_retransmit_timeout(&mut self) -> StreamSignals {
        let mut queue = VecDeque::new();

        if self.policy.on_retransmit_timer_fired() {
            debug!(
                transfer_id = self.transfer_id,
                "requesting retransmission of missing chunks"
            );
            queue.push_back(StreamSignal::WriteControl(ControlCommand::RequestRetransmit));
        }

        StreamSignals { queue }
    }

    /// Hard reset on transport disconnect: no partial image or audio
    /// survives, and all timers are cancelled.
    pub fn on_disconnect(&mut self) -> StreamSignals {
        let mut queue = VecDeque::new();

        let cancels = self.policy.reset();
        Self::push_timer_cancels(cancels, &mut queue);
        self.buffer.reset();
        self.audio.reset();

        debug!("transport disconnected, reassembly state cleared");

        StreamSignals { queue }
    }

    pub fn start_audio_capture(&mut self) {
        self.audio.start_capture();
    }

    pub fn stop_audio_capture(&mut self) -> Vec<u8> {
        self.audio.stop_capture()
    }

    pub fn is_capturing_audio(&self) -> bool {
        self.audio.is_capturing()
    }

    /// Asks the peripheral for a single capture.
    pub fn capture_photo(&self) -> StreamSignals {
        Self::control_signal(ControlCommand::CapturePhoto)
    }

    /// Starts periodic capture every `seconds`; rejects interval values
    /// that would alias a reserved opcode.
    pub fn set_capture_interval(&self, seconds: u8) -> Option<StreamSignals> {
        ControlCommand::set_capture_interval(seconds).map(Self::control_signal)
    }

    /// Stops periodic capture.
    pub fn stop_periodic_capture(&self) -> StreamSignals {
        Self::control_signal(ControlCommand::StopPeriodicCapture)
    }

    pub fn expected_sequence(&self) -> Option<u16> {
        self.buffer.expected_sequence()
    }

    pub fn pending_chunks(&self) -> usize {
        self.buffer.pending_len()
    }

    fn on_image_chunk(&mut self, sequence: u16, payload: Vec<u8>, queue: &mut VecDeque<StreamSignal>) {
        match self.buffer.accept(sequence, payload) {
            ChunkOutcome::Started { sequence } => {
                self.transfer_id = increment_transfer_id();
                debug!(
                    transfer_id = self.transfer_id,
                    sequence, "image transfer started"
                );
            }
            ChunkOutcome::Appended { drained, gap_closed } => {
                trace!(
                    transfer_id = self.transfer_id,
                    sequence,
                    drained,
                    accumulated = self.buffer.accumulated_len(),
                    "chunk appended"
                );
                if gap_closed {
                    let cancels = self.policy.on_gap_closed();
                    Self::push_timer_cancels(cancels, queue);
                }
            }
            ChunkOutcome::Stale { sequence } => {
                warn!(
                    transfer_id = self.transfer_id,
                    sequence,
                    expected = ?self.buffer.expected_sequence(),
                    "dropping duplicate or expired chunk"
                );
            }
            ChunkOutcome::Buffered {
                missing,
                pending,
                evicted,
            } => {
                warn!(
                    transfer_id = self.transfer_id,
                    sequence,
                    expected = ?self.buffer.expected_sequence(),
                    missing,
                    pending,
                    "out-of-order chunk cached"
                );
                if evicted > 0 {
                    warn!(
                        transfer_id = self.transfer_id,
                        evicted, "pending cache overflow, evicted lagging entries"
                    );
                }

                for directive in self.policy.on_out_of_order(missing, pending) {
                    queue.push_back(match directive {
                        GapDirective::ArmGapTimer(deadline) => StreamSignal::ArmGapTimer(deadline),
                        GapDirective::ArmRetransmitTimer(deadline) => {
                            StreamSignal::ArmRetransmitTimer(deadline)
                        }
                    });
                }
            }
        }
    }

    fn on_image_end(&mut self, queue: &mut VecDeque<StreamSignal>) {
        // Cached chunks still exactly contiguous with the expected
        // sequence belong to this image; anything beyond a gap does not.
        self.buffer.drain_contiguous();

        if self.buffer.accumulated_len() == 0 {
            warn!("image end marker with no accumulated data");
            return;
        }

        let cancels = self.policy.reset();
        Self::push_timer_cancels(cancels, queue);

        let transfer_id = self.transfer_id;
        let accumulated = self.buffer.take_accumulated();

        let (repaired, verdict) = repair_image(&accumulated);
        let bytes = repaired.into_owned();

        if bytes.len() < self.config.min_image_size {
            warn!(
                transfer_id,
                len = bytes.len(),
                min = self.config.min_image_size,
                "discarding undersized image as truncated capture"
            );
            return;
        }

        debug!(transfer_id, len = bytes.len(), ?verdict, "image completed");

        queue.push_back(StreamSignal::ImageReady(CompletedImage {
            transfer_id,
            bytes,
            verdict,
        }));
    }

    fn push_timer_cancels((gap, retransmit): (bool, bool), queue: &mut VecDeque<StreamSignal>) {
        if gap {
            queue.push_back(StreamSignal::CancelGapTimer);
        }
        if retransmit {
            queue.push_back(StreamSignal::CancelRetransmitTimer);
        }
    }

    fn control_signal(command: ControlCommand) -> StreamSignals {
        let mut queue = VecDeque::new();
        queue.push_back(StreamSignal::WriteControl(command));
        StreamSignals { queue }
    }
}
