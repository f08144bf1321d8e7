//! PN532 host-link protocol
//!
//! This crate defines the wire format spoken between the host controller
//! and the PN532 reader chip. The transport underneath is a plain two-wire
//! bus; everything here is byte layout, checksums and command identity.
//!
//! # Frame Overview
//!
//! Every command and response travels in the same envelope:
//! ```text
//! ┌──────────┬────────────┬─────┬─────┬──────────────────┬─────┬───────────┐
//! │ PREAMBLE │ START CODE │ LEN │ LCS │ PAYLOAD          │ DCS │ POSTAMBLE │
//! │ 00       │ 00 FF      │ 1B  │ 1B  │ TFI + op + data  │ 1B  │ 00        │
//! └──────────┴────────────┴─────┴─────┴──────────────────┴─────┴───────────┘
//! ```
//!
//! `LEN + LCS` and `sum(PAYLOAD) + DCS` are both zero modulo 256. The
//! payload's first byte is the frame identifier (0xD4 host→device,
//! 0xD5 device→host) followed by the command or response opcode.

#![no_std]
#![deny(unsafe_code)]

pub mod commands;
pub mod frame;

pub use commands::{Command, ISO14443A};
pub use frame::{decode, encode, FrameError, ACK, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE};
