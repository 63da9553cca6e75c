mod control_command;
mod frame_decoder;
mod frame_error;
mod frame_struct;

pub use control_command::{
    ControlCommand, OPCODE_CAPTURE_PHOTO, OPCODE_REQUEST_RETRANSMIT, OPCODE_STOP_PERIODIC_CAPTURE,
};
pub use frame_decoder::FrameDecoder;
pub use frame_error::FrameDecodeError;
pub use frame_struct::{Channel, DecodedFrame, RawPacket};
