//! Embassy task modules

pub mod rfid;
