//! PN532 contactless reader driver (I2C mode)
//!
//! The PN532 is an NFC controller with an I2C host interface. Commands
//! and responses travel in the framed format implemented by
//! taglight-protocol; on I2C the device additionally prefixes every read
//! with a ready-flag byte (0x01 when it has data to hand over).
//!
//! # Tick model
//!
//! The driver never blocks on the device. An outer loop calls [`Pn532::tick`]
//! repeatedly with a monotonic millisecond timestamp; each tick advances at
//! most one step of the command/response exchange:
//!
//! - `Ready`: issue the next command (SAM configuration, then RF
//!   configuration, then list-passive-target forever)
//! - `WaitingForAck`: read and match the fixed ACK sequence
//! - `WaitingForResponse`: read, validate and interpret the response frame
//!
//! A ladder of timeouts keeps the engine from wedging on a silent or stuck
//! device: a short post-issue delay before any read, an ACK timeout that
//! abandons the in-flight command, a no-card window that reports an empty
//! field while polling, and a long re-poll ceiling that forces a fresh
//! poll command no matter what. Every error inside a tick is swallowed at
//! the tick boundary; recovery is purely timeout-driven.

use taglight_core::tag::{CardId, PollOutcome};
use taglight_hal::I2cBus;
use taglight_protocol::commands::{Command, ISO14443A};
use taglight_protocol::frame::{self, FrameError, ACK, DEVICE_TO_HOST, FRAME_OVERHEAD};

/// Default I2C address of the PN532
pub const PN532_ADDRESS: u8 = 0x24;

/// Ready-flag byte prefixed to every I2C read
const READY_FLAG: u8 = 0x01;

/// SAMConfiguration parameters: normal mode, no timeout, use IRQ line
const SAM_NORMAL_MODE: [u8; 3] = [0x01, 0x00, 0x01];

/// RFConfiguration parameters: config item 0x01 (RF field), field on
const RF_FIELD_ON: [u8; 2] = [0x01, 0x01];

/// Longest supported card identifier in bytes
const MAX_ID_BYTES: usize = 7;

/// Response payload sizes (frame identifier and opcode included)
const CONFIG_RESPONSE_LEN: usize = 2;
const TARGET_RESPONSE_LEN: usize = 8 + MAX_ID_BYTES;

/// Index of the identifier-length byte in a list-passive-target response:
/// header (2), target count, target number, SENS_RES (2), SEL_RES
const ID_LENGTH_INDEX: usize = 7;

/// PN532 driver configuration
#[derive(Debug, Clone)]
pub struct Pn532Config {
    /// 7-bit I2C address
    pub address: u8,
    /// Modulation/baud selector passed to list-passive-target
    pub card_type: u8,
    /// Time the device needs to consume a command before any read (ms)
    pub command_delay_ms: u64,
    /// Give up on an unacknowledged command after this long (ms)
    pub ack_timeout_ms: u64,
    /// Poll window after which an unanswered poll means no card (ms)
    pub no_card_timeout_ms: u64,
    /// Ceiling after which the poll command is reissued regardless (ms)
    pub repoll_timeout_ms: u64,
}

impl Default for Pn532Config {
    fn default() -> Self {
        Self {
            address: PN532_ADDRESS,
            card_type: ISO14443A,
            command_delay_ms: 10,
            ack_timeout_ms: 1000,
            no_card_timeout_ms: 100,
            repoll_timeout_ms: 10_000,
        }
    }
}

/// PN532 communication errors
///
/// These never escape [`Pn532::tick`]; they steer the per-tick recovery
/// policy (keep waiting, or drop the exchange and repoll).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pn532Error {
    /// Bus transaction failed
    Bus,
    /// Ready flag not set; the device has nothing to hand over yet
    DeviceBusy,
    /// Response frame failed validation
    Frame(FrameError),
    /// Frame identifier or opcode did not match the issued command
    UnexpectedResponse,
    /// Poll response carried a card count other than one
    UnsupportedCardCount,
    /// Card identifier longer than the supported 7 bytes
    UnsupportedCardLength,
}

impl From<FrameError> for Pn532Error {
    fn from(err: FrameError) -> Self {
        Pn532Error::Frame(err)
    }
}

/// Exchange state of the host link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    /// No command in flight; next tick issues one
    Ready,
    /// Command written; waiting for the device to acknowledge it
    WaitingForAck,
    /// Command acknowledged; waiting for the response frame
    WaitingForResponse,
}

/// Non-blocking polling engine for the PN532
///
/// Owns the bus handle for the device; all state lives here and is only
/// mutated inside [`Pn532::tick`].
pub struct Pn532<B: I2cBus> {
    bus: B,
    config: Pn532Config,
    state: LinkState,
    /// Command the next `Ready` tick issues; advances only once the
    /// previous command completed its full ack+response cycle
    next_command: Command,
    last_command: Option<Command>,
    issued_at_ms: u64,
}

impl<B: I2cBus> Pn532<B> {
    /// Create a new driver over the given bus
    pub fn new(bus: B, config: Pn532Config) -> Self {
        Self {
            bus,
            config,
            state: LinkState::Ready,
            next_command: Command::SamConfiguration,
            last_command: None,
            issued_at_ms: 0,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Pn532Config {
        &self.config
    }

    /// Current exchange state
    pub fn state(&self) -> LinkState {
        self.state
    }

    /// The most recently issued command
    pub fn last_command(&self) -> Option<Command> {
        self.last_command
    }

    /// Give the bus handle back
    pub fn release(self) -> B {
        self.bus
    }

    /// Advance the exchange by at most one step
    ///
    /// `now_ms` is a monotonic millisecond reading taken once by the
    /// caller. Returns [`PollOutcome::Card`] when a poll response yields a
    /// card identifier, [`PollOutcome::NoCard`] when the poll window has
    /// lapsed without one, and [`PollOutcome::Pending`] otherwise. Never
    /// blocks and never fails: transport and format errors count as "no
    /// progress this tick".
    pub fn tick(&mut self, now_ms: u64) -> PollOutcome {
        let elapsed = now_ms.saturating_sub(self.issued_at_ms);

        // Give the device time to consume the previous command
        if elapsed < self.config.command_delay_ms {
            return PollOutcome::Pending;
        }

        // Poll-loop timeouts only apply once the poll command is in play
        let mut field_empty = false;
        if self.last_command == Some(Command::ListPassiveTarget) {
            if elapsed >= self.config.no_card_timeout_ms {
                field_empty = true;
            }
            if elapsed >= self.config.repoll_timeout_ms {
                self.state = LinkState::Ready;
            }
        }
        let idle = if field_empty {
            PollOutcome::NoCard
        } else {
            PollOutcome::Pending
        };

        if self.state != LinkState::Ready && !self.poll_ready() {
            if elapsed >= self.config.ack_timeout_ms {
                // Command lost; discard it and reissue on a later tick
                self.state = LinkState::Ready;
            }
            return idle;
        }

        match self.state {
            LinkState::Ready => {
                if let Ok(command) = self.issue_next() {
                    self.last_command = Some(command);
                    self.issued_at_ms = now_ms;
                    self.state = LinkState::WaitingForAck;
                }
                idle
            }
            LinkState::WaitingForAck => {
                if self.read_ack().unwrap_or(false) {
                    self.state = LinkState::WaitingForResponse;
                }
                idle
            }
            LinkState::WaitingForResponse => {
                // A command is always recorded before this state is reachable
                let Some(command) = self.last_command else {
                    self.state = LinkState::Ready;
                    return idle;
                };
                match self.read_response(command) {
                    Ok(outcome) => {
                        self.state = LinkState::Ready;
                        self.next_command = match command {
                            Command::SamConfiguration => Command::RfConfiguration,
                            Command::RfConfiguration | Command::ListPassiveTarget => {
                                Command::ListPassiveTarget
                            }
                        };
                        match outcome {
                            PollOutcome::Card(id) => PollOutcome::Card(id),
                            _ => idle,
                        }
                    }
                    Err(Pn532Error::Bus) | Err(Pn532Error::DeviceBusy) => {
                        // Transient transport condition; retry the read
                        idle
                    }
                    Err(_) => {
                        // Malformed or unsupported response; drop it and repoll
                        self.state = LinkState::Ready;
                        idle
                    }
                }
            }
        }
    }

    /// Write the next command in the configuration/poll sequence
    fn issue_next(&mut self) -> Result<Command, Pn532Error> {
        let next = self.next_command;

        let poll_params = [0x01, self.config.card_type];
        let params: &[u8] = match next {
            Command::SamConfiguration => &SAM_NORMAL_MODE,
            Command::RfConfiguration => &RF_FIELD_ON,
            Command::ListPassiveTarget => &poll_params,
        };

        let frame = frame::encode(next.opcode(), params)?;
        self.bus
            .write(self.config.address, &frame)
            .map_err(|_| Pn532Error::Bus)?;
        Ok(next)
    }

    /// Single-byte readiness poll
    ///
    /// A failed bus transaction counts as "not ready" so the ACK timeout
    /// keeps running against a dead bus.
    fn poll_ready(&mut self) -> bool {
        let mut status = [0u8; 1];
        match self.bus.read(self.config.address, &mut status) {
            Ok(()) => status[0] == READY_FLAG,
            Err(_) => false,
        }
    }

    /// Read `buf.len()` data bytes, stripping the leading ready flag
    fn read_data(&mut self, buf: &mut [u8]) -> Result<(), Pn532Error> {
        let mut raw = [0u8; TARGET_RESPONSE_LEN + FRAME_OVERHEAD + 1];
        let raw = &mut raw[..buf.len() + 1];
        self.bus
            .read(self.config.address, raw)
            .map_err(|_| Pn532Error::Bus)?;
        if raw[0] != READY_FLAG {
            return Err(Pn532Error::DeviceBusy);
        }
        buf.copy_from_slice(&raw[1..]);
        Ok(())
    }

    /// Read the fixed acknowledge sequence; false on mismatch
    fn read_ack(&mut self) -> Result<bool, Pn532Error> {
        let mut buf = [0u8; ACK.len()];
        self.read_data(&mut buf)?;
        Ok(buf == ACK)
    }

    /// Read and interpret the response frame for the in-flight command
    fn read_response(&mut self, command: Command) -> Result<PollOutcome, Pn532Error> {
        match command {
            Command::SamConfiguration | Command::RfConfiguration => {
                let mut buf = [0u8; CONFIG_RESPONSE_LEN + FRAME_OVERHEAD];
                self.read_data(&mut buf)?;
                let payload = frame::decode(&buf)?;
                check_response_header(payload, command)?;
                Ok(PollOutcome::Pending)
            }
            Command::ListPassiveTarget => {
                let mut buf = [0u8; TARGET_RESPONSE_LEN + FRAME_OVERHEAD];
                self.read_data(&mut buf)?;
                let payload = frame::decode(&buf)?;
                let id = parse_card_id(payload)?;
                Ok(PollOutcome::Card(id))
            }
        }
    }
}

/// Validate a response payload's frame identifier and opcode
fn check_response_header(payload: &[u8], command: Command) -> Result<(), Pn532Error> {
    if payload.len() < 2
        || payload[0] != DEVICE_TO_HOST
        || payload[1] != command.response_opcode()
    {
        return Err(Pn532Error::UnexpectedResponse);
    }
    Ok(())
}

/// Extract the card identifier from a list-passive-target response payload
///
/// Exactly one target is supported. The identifier length sits past the
/// target number, SENS_RES and SEL_RES fields; the identifier bytes are
/// folded into a single integer most significant byte first.
fn parse_card_id(payload: &[u8]) -> Result<CardId, Pn532Error> {
    check_response_header(payload, Command::ListPassiveTarget)?;

    let count = *payload.get(2).ok_or(Pn532Error::UnexpectedResponse)?;
    if count != 1 {
        return Err(Pn532Error::UnsupportedCardCount);
    }

    let len = *payload
        .get(ID_LENGTH_INDEX)
        .ok_or(Pn532Error::UnexpectedResponse)? as usize;
    if len > MAX_ID_BYTES {
        return Err(Pn532Error::UnsupportedCardLength);
    }

    let id_bytes = payload
        .get(ID_LENGTH_INDEX + 1..ID_LENGTH_INDEX + 1 + len)
        .ok_or(Pn532Error::UnexpectedResponse)?;

    let mut id: CardId = 0;
    for &byte in id_bytes {
        id = id << 8 | byte as CardId;
    }
    Ok(id)
}
