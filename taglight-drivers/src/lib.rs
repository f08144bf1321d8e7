//! Hardware driver implementations
//!
//! This crate provides the protocol engines that drive the reader
//! hardware through the traits defined in taglight-hal:
//!
//! - PN532 contactless reader (I2C mode, non-blocking tick engine)

#![no_std]
#![deny(unsafe_code)]

pub mod nfc;
