/// Outbound single-byte opcodes written to the peripheral's control
/// characteristic.
///
/// The interval opcode shares the byte space with the reserved commands,
/// so interval values are validated at construction: `0` would read as
/// stop, `0xFE`/`0xFF` as retransmit/capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    /// Take a single photo now.
    CapturePhoto,
    /// Ask the peripheral to retransmit missing packets. Best-effort:
    /// no acknowledgment is defined, and firmware support is optional.
    RequestRetransmit,
    /// Stop periodic capture.
    StopPeriodicCapture,
    /// Capture a photo every `n` seconds.
    SetCaptureInterval(u8),
}

pub const OPCODE_CAPTURE_PHOTO: u8 = 0xFF;
pub const OPCODE_REQUEST_RETRANSMIT: u8 = 0xFE;
pub const OPCODE_STOP_PERIODIC_CAPTURE: u8 = 0x00;

impl ControlCommand {
    /// Builds an interval command, rejecting values that would alias a
    /// reserved opcode.
    pub fn set_capture_interval(seconds: u8) -> Option<Self> {
        match seconds {
            OPCODE_STOP_PERIODIC_CAPTURE | OPCODE_REQUEST_RETRANSMIT | OPCODE_CAPTURE_PHOTO => None,
            _ => Some(Self::SetCaptureInterval(seconds)),
        }
    }

    /// The single byte written to the control characteristic.
    pub fn opcode(&self) -> u8 {
        match self {
            Self::CapturePhoto => OPCODE_CAPTURE_PHOTO,
            Self::RequestRetransmit => OPCODE_REQUEST_RETRANSMIT,
            Self::StopPeriodicCapture => OPCODE_STOP_PERIODIC_CAPTURE,
            Self::SetCaptureInterval(seconds) => *seconds,
        }
    }
}

impl TryFrom<u8> for ControlCommand {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            OPCODE_CAPTURE_PHOTO => Ok(Self::CapturePhoto),
            OPCODE_REQUEST_RETRANSMIT => Ok(Self::RequestRetransmit),
            OPCODE_STOP_PERIODIC_CAPTURE => Ok(Self::StopPeriodicCapture),
            seconds => Ok(Self::SetCaptureInterval(seconds)),
        }
    }
}
