//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy
//! tasks. Uses embassy-sync primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use taglight_core::TagEvent;

/// Channel capacity for presence transitions
const TAG_EVENT_CHANNEL_SIZE: usize = 8;

/// Presence transitions from the reader task to the indicator loop
pub static TAG_EVENTS: Channel<CriticalSectionRawMutex, TagEvent, TAG_EVENT_CHANNEL_SIZE> =
    Channel::new();
