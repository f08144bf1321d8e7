//! Contactless reader drivers

pub mod pn532;

pub use pn532::{LinkState, Pn532, Pn532Config, Pn532Error};
