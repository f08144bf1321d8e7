//! WS2812 strip output
//!
//! Implements the indicator trait over the PIO-driven WS2812 strip. The
//! color pattern itself comes from taglight-core so it stays bit-exact
//! and host-testable.

use core::convert::Infallible;

use embassy_rp::peripherals::PIO0;
use embassy_rp::pio_programs::ws2812::PioWs2812;
use smart_leds::RGB8;

use taglight_core::{indicator_pattern, CardId, IndicatorDriver, LED_COUNT};

/// Indicator strip driven through PIO0 state machine 0
pub struct StripIndicator<'d> {
    strip: PioWs2812<'d, PIO0, 0, LED_COUNT>,
}

impl<'d> StripIndicator<'d> {
    pub fn new(strip: PioWs2812<'d, PIO0, 0, LED_COUNT>) -> Self {
        Self { strip }
    }
}

impl IndicatorDriver for StripIndicator<'_> {
    type Error = Infallible;

    fn show(&mut self, card: Option<CardId>) -> Result<(), Infallible> {
        let pattern = indicator_pattern(card);
        let mut colors = [RGB8::default(); LED_COUNT];
        for (led, color) in colors.iter_mut().zip(pattern.iter()) {
            *led = RGB8::new(color.r, color.g, color.b);
        }

        // One short DMA transfer; run it to completion inline
        embassy_futures::block_on(self.strip.write(&colors));
        Ok(())
    }
}
