//! Taglight - contactless card reader firmware
//!
//! Polls a PN532 reader over I2C and mirrors the identity of the card in
//! the field onto a WS2812 strip. All protocol and tracking logic lives
//! in the board-agnostic workspace crates; this binary only wires them to
//! RP2040 peripherals.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::PIO0;
use embassy_rp::pio::{InterruptHandler as PioInterruptHandler, Pio};
use embassy_rp::pio_programs::ws2812::{PioWs2812, PioWs2812Program};
use {defmt_rtt as _, panic_probe as _};

use taglight_core::{IndicatorDriver, TagEvent, LED_COUNT};
use taglight_hal::i2c::I2cConfig;

use crate::indicator::StripIndicator;
use crate::tasks::rfid::BusAdapter;

mod channels;
mod indicator;
mod tasks;

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => PioInterruptHandler<PIO0>;
});

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Taglight firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // PN532 on I2C0: GPIO4 = SDA, GPIO5 = SCL, fast mode
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = I2cConfig::FAST.frequency;
    let bus = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c_config);

    // WS2812 strip on GPIO16 via PIO0 + DMA
    let Pio {
        mut common, sm0, ..
    } = Pio::new(p.PIO0, Irqs);
    let program = PioWs2812Program::new(&mut common);
    let strip: PioWs2812<'_, PIO0, 0, LED_COUNT> =
        PioWs2812::new(&mut common, sm0, p.DMA_CH0, p.PIN_16, &program);
    let mut indicator = StripIndicator::new(strip);

    // Dark until the first detection
    let _ = indicator.show(None);

    unwrap!(spawner.spawn(tasks::rfid::rfid_task(BusAdapter(bus))));
    info!("Reader task spawned, entering indicator loop");

    loop {
        let event = channels::TAG_EVENTS.receive().await;
        let card = match event {
            TagEvent::Detected(id) => Some(id),
            TagEvent::Lost => None,
        };
        let _ = indicator.show(card);
    }
}
