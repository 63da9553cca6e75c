//! Reassembly toolkit for the fragmented BLE notification streams of a
//! wearable camera/microphone peripheral.
//!
//! The transport (GATT connection, MTU negotiation, notification
//! delivery) is out of scope: it is expected to hand over one opaque
//! payload per notification, tagged with the channel it arrived on, in
//! the order the stack received them. This crate classifies those
//! payloads, reconstructs complete JPEG images despite loss and
//! reordering, collects raw audio inside explicit capture windows, and
//! tells the caller which timers to run and which control opcodes to
//! write back.
//!
//! The core is sans-I/O; see the `glasswire-tokio-controller` extension
//! for a Tokio event-loop driver.

pub mod constants;
pub mod frame;
pub mod reassembly;
pub mod utils;
