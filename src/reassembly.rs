mod audio_collector;
mod gap_policy;
mod image_validator;
mod reassembly_buffer;
mod stream_config;
mod stream_controller;

pub use audio_collector::AudioFrameCollector;
pub use gap_policy::{GapDirective, GapRecoveryPolicy};
pub use image_validator::{ImageVerdict, repair_image};
pub use reassembly_buffer::{ChunkOutcome, GapSkip, ReassemblyBuffer};
pub use stream_config::StreamConfig;
pub use stream_controller::{CompletedImage, StreamController, StreamSignal, StreamSignals};
