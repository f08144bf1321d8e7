//! Board-agnostic core logic for the Taglight card reader
//!
//! This crate contains the logic that does not depend on a specific bus
//! or board:
//!
//! - Card identity types and the per-tick poll outcome
//! - Tag tracker (deduplicates sightings into enter/exit events)
//! - Indicator color mapping and the output-device trait

#![no_std]
#![deny(unsafe_code)]

pub mod indicator;
pub mod tag;

pub use indicator::{card_pattern, indicator_pattern, IndicatorDriver, Rgb, LED_COUNT};
pub use tag::{CardId, PollOutcome, TagEvent, TagTracker};
