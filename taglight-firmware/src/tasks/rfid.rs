//! PN532 polling task
//!
//! Owns the reader engine and the tag tracker; ticks the engine with the
//! monotonic clock and publishes presence transitions on the tag-event
//! channel.

use defmt::*;
use embassy_rp::i2c::{Blocking, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_time::{Instant, Timer};

use taglight_core::{PollOutcome, TagEvent, TagTracker};
use taglight_drivers::nfc::{Pn532, Pn532Config};
use taglight_hal::I2cBus;

use crate::channels::TAG_EVENTS;

/// Tick cadence; the engine paces command issue via its own delays
const TICK_INTERVAL_MS: u64 = 1;

/// Adapts any embedded-hal I2C master to the taglight bus trait
pub struct BusAdapter<T>(pub T);

impl<T: embedded_hal::i2c::I2c> I2cBus for BusAdapter<T> {
    type Error = T::Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.0.write(address, data)
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.0.read(address, buf)
    }
}

/// Reader task - polls the PN532 and reports enter/exit transitions
#[embassy_executor::task]
pub async fn rfid_task(bus: BusAdapter<I2c<'static, I2C0, Blocking>>) {
    info!("RFID task started");

    let mut reader = Pn532::new(bus, Pn532Config::default());
    let mut tracker = TagTracker::new();

    loop {
        let now_ms = Instant::now().as_millis();
        let outcome = reader.tick(now_ms);
        if let PollOutcome::Card(id) = outcome {
            trace!("poll returned card {=u64:x}", id);
        }

        if let Some(event) = tracker.observe(outcome) {
            match event {
                TagEvent::Detected(id) => info!("card detected: {=u64:x}", id),
                TagEvent::Lost => info!("card removed"),
            }
            TAG_EVENTS.send(event).await;
        }

        Timer::after_millis(TICK_INTERVAL_MS).await;
    }
}
