use tracing::{debug, warn};

/// Accumulates raw audio payloads inside an explicit capture window.
///
/// Unlike the photo path there is no sequence reconstruction: frames are
/// small and loss-tolerant, so payloads are appended verbatim in arrival
/// order. The window is controlled by the host, not by protocol markers.
#[derive(Debug, Default)]
pub struct AudioFrameCollector {
    capturing: bool,
    buffer: Vec<u8>,
}

impl AudioFrameCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the capture window with a fresh accumulation buffer.
    pub fn start_capture(&mut self) {
        self.capturing = true;
        self.buffer = Vec::new();
        debug!("audio capture started");
    }

    /// Closes the capture window, returning everything captured
    /// (an empty buffer when nothing arrived).
    pub fn stop_capture(&mut self) -> Vec<u8> {
        self.capturing = false;
        let bytes = std::mem::take(&mut self.buffer);
        debug!(len = bytes.len(), "audio capture stopped");
        bytes
    }

    /// Appends one decoded audio payload; silently dropped while the
    /// window is closed.
    pub fn append(&mut self, payload: &[u8]) {
        if !self.capturing || payload.is_empty() {
            return;
        }

        // PCM16 frames should always be even-sized.
        if payload.len() % 2 != 0 {
            warn!(len = payload.len(), "audio payload length is odd");
        }

        self.buffer.extend_from_slice(payload);
    }

    pub fn is_capturing(&self) -> bool {
        self.capturing
    }

    pub fn captured_len(&self) -> usize {
        self.buffer.len()
    }

    /// Drops the window and any captured bytes (transport disconnect).
    pub fn reset(&mut self) {
        self.capturing = false;
        self.buffer.clear();
    }
}
