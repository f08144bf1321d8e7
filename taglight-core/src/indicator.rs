//! Indicator color mapping and output-device trait
//!
//! The strip shows a deterministic pattern derived from the card
//! identifier so the same card always lights the same colors. The mapping
//! is part of the device's external behavior and must stay bit-exact.

use crate::tag::CardId;

/// Number of elements on the indicator strip
pub const LED_COUNT: usize = 12;

/// Identifier bits consumed per strip element
const BITS_PER_ELEMENT: usize = 6;

/// One RGB color triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// All channels off
    pub const OFF: Self = Self { r: 0, g: 0, b: 0 };
}

/// Map a card identifier to the strip pattern
///
/// Element `i` takes the identifier's `i`-th 6-bit group, lowest group
/// first: bits 5-4 drive red, bits 3-2 green, bits 1-0 blue, each shifted
/// into the channel's most significant bits. Groups past the identifier's
/// top bit render dark.
pub fn card_pattern(id: CardId) -> [Rgb; LED_COUNT] {
    let mut pattern = [Rgb::OFF; LED_COUNT];
    for (i, element) in pattern.iter_mut().enumerate() {
        let shift = i * BITS_PER_ELEMENT;
        let group = if shift < 64 {
            ((id >> shift) & 0x3F) as u8
        } else {
            0
        };
        *element = Rgb {
            r: (group & 0x30) << 2,
            g: (group & 0x0C) << 4,
            b: (group & 0x03) << 6,
        };
    }
    pattern
}

/// Pattern for the current presence state: dark when no card is present
pub fn indicator_pattern(card: Option<CardId>) -> [Rgb; LED_COUNT] {
    match card {
        Some(id) => card_pattern(id),
        None => [Rgb::OFF; LED_COUNT],
    }
}

/// Output device consuming presence state
///
/// Implementations render the mapped pattern onto physical hardware and
/// flush it in one transaction.
pub trait IndicatorDriver {
    /// Error type for flush failures
    type Error;

    /// Render the pattern for `card` onto the strip
    fn show(&mut self, card: Option<CardId>) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_card_renders_dark() {
        assert_eq!(indicator_pattern(None), [Rgb::OFF; LED_COUNT]);
    }

    #[test]
    fn test_lowest_group_maps_first_element() {
        let pattern = card_pattern(0x3F);
        assert_eq!(pattern[0], Rgb { r: 0xC0, g: 0xC0, b: 0xC0 });
        assert!(pattern[1..].iter().all(|&c| c == Rgb::OFF));
    }

    #[test]
    fn test_channel_bit_positions() {
        // 0b010101: one bit per channel, each landing in the channel's MSBs
        let pattern = card_pattern(0x15);
        assert_eq!(pattern[0], Rgb { r: 0x40, g: 0x40, b: 0x40 });

        let pattern = card_pattern(0x30);
        assert_eq!(pattern[0], Rgb { r: 0xC0, g: 0x00, b: 0x00 });

        let pattern = card_pattern(0x03);
        assert_eq!(pattern[0], Rgb { r: 0x00, g: 0x00, b: 0xC0 });
    }

    #[test]
    fn test_groups_walk_up_the_strip() {
        let pattern = card_pattern(1 << 6);
        assert_eq!(pattern[0], Rgb::OFF);
        assert_eq!(pattern[1], Rgb { r: 0, g: 0, b: 0x40 });

        let pattern = card_pattern(0x3F << 54);
        assert_eq!(pattern[9], Rgb { r: 0xC0, g: 0xC0, b: 0xC0 });
    }

    #[test]
    fn test_elements_past_top_bit_render_dark() {
        // Element 10 sees only the identifier's top 4 bits; element 11 is
        // past bit 63 entirely
        let pattern = card_pattern(u64::MAX);
        assert_eq!(pattern[10], Rgb { r: 0x00, g: 0xC0, b: 0xC0 });
        assert_eq!(pattern[11], Rgb::OFF);
    }

    #[test]
    fn test_documented_example_id() {
        // 0x04AABBCC: low group 0b001100 -> green only
        let pattern = card_pattern(0x04AABBCC);
        assert_eq!(pattern[0], Rgb { r: 0x00, g: 0xC0, b: 0x00 });
    }
}
