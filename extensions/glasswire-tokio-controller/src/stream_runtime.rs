use bytes::Bytes;
use glasswire::frame::{Channel, ControlCommand, RawPacket};
use glasswire::reassembly::{CompletedImage, StreamConfig, StreamController, StreamSignal};
use std::time::Duration;
use tokio::sync::{
    mpsc::{UnboundedReceiver, UnboundedSender, WeakUnboundedSender, unbounded_channel},
    oneshot,
};
use tokio::task::JoinHandle;
use tracing::debug;

/// Inputs to the event loop. Timer fires join the same queue as packet
/// arrivals, so every state transition runs serially on one task.
enum RuntimeCommand {
    Packet(RawPacket),
    GapTimerFired { generation: u64 },
    RetransmitTimerFired { generation: u64 },
    Disconnected,
    StartAudioCapture,
    StopAudioCapture { reply: oneshot::Sender<Vec<u8>> },
    Control(ControlCommand),
}

/// Consumer-facing channels produced alongside a [`StreamRuntime`].
pub struct StreamRuntimeChannels {
    /// One message per successfully reassembled, size-validated image.
    pub images: UnboundedReceiver<CompletedImage>,
    /// Opcodes for the transport to write to the peripheral's control
    /// characteristic, in order.
    pub control_writes: UnboundedReceiver<ControlCommand>,
}

/// Tokio driver for the sans-I/O [`StreamController`].
///
/// Spawns a single event-loop task that exclusively owns the controller
/// state. The transport's notification callback feeds packets in with
/// [`push_packet`](Self::push_packet); gap and retransmission timers are
/// spawned sleep tasks that post back into the same queue, tagged with a
/// generation so a cancelled timer's late fire is ignored. Completed
/// images and outbound control writes are published on unbounded
/// channels, so packet ingestion never blocks on the consumer.
///
/// Dropping the runtime handle (and any packet sources) ends the loop.
pub struct StreamRuntime {
    command_tx: UnboundedSender<RuntimeCommand>,
}

impl StreamRuntime {
    /// Spawns the event loop; must be called from within a Tokio runtime.
    pub fn new(config: StreamConfig) -> (Self, StreamRuntimeChannels) {
        let (command_tx, command_rx) = unbounded_channel();
        let (image_tx, images) = unbounded_channel();
        let (control_tx, control_writes) = unbounded_channel();

        // The loop keeps only a weak handle to its own queue (for timer
        // tasks), so the channel closes once all external senders drop.
        let weak_tx = command_tx.downgrade();
        tokio::spawn(run_event_loop(
            config, command_rx, weak_tx, image_tx, control_tx,
        ));

        (
            Self { command_tx },
            StreamRuntimeChannels {
                images,
                control_writes,
            },
        )
    }

    /// Feeds one raw notification payload from the transport.
    pub fn push_packet(&self, channel: Channel, bytes: Bytes) {
        let _ = self
            .command_tx
            .send(RuntimeCommand::Packet(RawPacket::new(channel, bytes.to_vec())));
    }

    /// Signals a transport disconnect: all in-flight reassembly state is
    /// dropped and timers cancelled.
    pub fn notify_disconnected(&self) {
        let _ = self.command_tx.send(RuntimeCommand::Disconnected);
    }

    /// Opens the device-audio capture window.
    pub fn start_audio_capture(&self) {
        let _ = self.command_tx.send(RuntimeCommand::StartAudioCapture);
    }

    /// Closes the capture window and returns everything captured.
    pub async fn stop_audio_capture(&self) -> Vec<u8> {
        let (reply, rx) = oneshot::channel();

        if self
            .command_tx
            .send(RuntimeCommand::StopAudioCapture { reply })
            .is_err()
        {
            return Vec::new();
        }

        rx.await.unwrap_or_default()
    }

    /// Asks the peripheral for a single capture.
    pub fn capture_photo(&self) {
        let _ = self
            .command_tx
            .send(RuntimeCommand::Control(ControlCommand::CapturePhoto));
    }

    /// Starts periodic capture every `seconds`. Returns `false` for
    /// interval values that alias a reserved opcode.
    pub fn set_capture_interval(&self, seconds: u8) -> bool {
        match ControlCommand::set_capture_interval(seconds) {
            Some(command) => {
                let _ = self.command_tx.send(RuntimeCommand::Control(command));
                true
            }
            None => false,
        }
    }

    /// Stops periodic capture.
    pub fn stop_periodic_capture(&self) {
        let _ = self
            .command_tx
            .send(RuntimeCommand::Control(ControlCommand::StopPeriodicCapture));
    }
}

#[derive(Clone, Copy)]
enum TimerKind {
    Gap,
    Retransmit,
}

#[derive(Default)]
struct TimerSlot {
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

impl TimerSlot {
    /// Invalidates any outstanding fire, queued or not.
    fn cancel(&mut self) {
        self.generation += 1;
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// Replaces the running timer with one firing after `deadline`.
    fn arm(
        &mut self,
        deadline: Duration,
        kind: TimerKind,
        command_tx: &WeakUnboundedSender<RuntimeCommand>,
    ) {
        self.cancel();

        let generation = self.generation;
        let command_tx = command_tx.clone();

        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(deadline).await;

            if let Some(tx) = command_tx.upgrade() {
                let command = match kind {
                    TimerKind::Gap => RuntimeCommand::GapTimerFired { generation },
                    TimerKind::Retransmit => RuntimeCommand::RetransmitTimerFired { generation },
                };
                let _ = tx.send(command);
            }
        }));
    }
}

async fn run_event_loop(
    config: StreamConfig,
    mut command_rx: UnboundedReceiver<RuntimeCommand>,
    command_tx: WeakUnboundedSender<RuntimeCommand>,
    image_tx: UnboundedSender<CompletedImage>,
    control_tx: UnboundedSender<ControlCommand>,
) {
    let mut controller = StreamController::new(config);
    let mut gap_timer = TimerSlot::default();
    let mut retransmit_timer = TimerSlot::default();

    while let Some(command) = command_rx.recv().await {
        let signals = match command {
            RuntimeCommand::Packet(packet) => controller.handle_packet(&packet),
            RuntimeCommand::GapTimerFired { generation } => {
                if generation != gap_timer.generation {
                    continue; // cancelled after the fire was queued
                }
                gap_timer.handle = None;
                controller.on_gap_timeout()
            }
            RuntimeCommand::RetransmitTimerFired { generation } => {
                if generation != retransmit_timer.generation {
                    continue;
                }
                retransmit_timer.handle = None;
                controller.on_retransmit_timeout()
            }
            RuntimeCommand::Disconnected => controller.on_disconnect(),
            RuntimeCommand::StartAudioCapture => {
                controller.start_audio_capture();
                continue;
            }
            RuntimeCommand::StopAudioCapture { reply } => {
                let _ = reply.send(controller.stop_audio_capture());
                continue;
            }
            RuntimeCommand::Control(command) => {
                let _ = control_tx.send(command);
                continue;
            }
        };

        for signal in signals {
            match signal {
                StreamSignal::ImageReady(image) => {
                    let _ = image_tx.send(image);
                }
                StreamSignal::ArmGapTimer(deadline) => {
                    gap_timer.arm(deadline, TimerKind::Gap, &command_tx);
                }
                StreamSignal::CancelGapTimer => gap_timer.cancel(),
                StreamSignal::ArmRetransmitTimer(deadline) => {
                    retransmit_timer.arm(deadline, TimerKind::Retransmit, &command_tx);
                }
                StreamSignal::CancelRetransmitTimer => retransmit_timer.cancel(),
                StreamSignal::WriteControl(command) => {
                    let _ = control_tx.send(command);
                }
            }
        }
    }

    gap_timer.cancel();
    retransmit_timer.cancel();
    debug!("stream runtime event loop ended");
}
