mod stream_runtime;

pub use stream_runtime::{StreamRuntime, StreamRuntimeChannels};
