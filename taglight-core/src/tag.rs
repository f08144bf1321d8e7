//! Card identity tracking
//!
//! The polling engine reports a raw outcome every tick; the tracker folds
//! consecutive outcomes into discrete enter/exit events so downstream
//! consumers only see transitions.

/// A card identifier folded MSB-first from the tag's id bytes.
///
/// Identifiers are at most 7 bytes on the wire, so at most 56 bits are
/// significant.
pub type CardId = u64;

/// Outcome of a single polling tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollOutcome {
    /// No new information this tick
    Pending,
    /// The reader returned a card identifier
    Card(CardId),
    /// The poll window closed with no card in the field
    NoCard,
}

/// Presence transition derived from successive poll outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TagEvent {
    /// A card entered the field, or a different card replaced the last one
    Detected(CardId),
    /// The card left the field
    Lost,
}

/// Deduplicates repeated sightings of the same card
///
/// Holds the most recently confirmed identifier; presence is implicit in
/// whether one is stored. The stored identifier is replaced wholesale on
/// change and cleared on loss, never partially mutated.
#[derive(Debug, Clone, Default)]
pub struct TagTracker {
    current: Option<CardId>,
}

impl TagTracker {
    /// Create a tracker with no card present
    pub fn new() -> Self {
        Self { current: None }
    }

    /// The most recently confirmed identifier, if a card is present
    pub fn current(&self) -> Option<CardId> {
        self.current
    }

    /// Whether a card is currently considered present
    pub fn is_present(&self) -> bool {
        self.current.is_some()
    }

    /// Fold one poll outcome into the tracked state
    ///
    /// Returns an event only on a transition: a fresh or changed
    /// identifier fires [`TagEvent::Detected`], the first `NoCard` while a
    /// card is present fires [`TagEvent::Lost`]. Repeats of an unchanged
    /// identifier never fire.
    pub fn observe(&mut self, outcome: PollOutcome) -> Option<TagEvent> {
        match outcome {
            PollOutcome::Pending => None,
            PollOutcome::Card(id) => {
                if self.current == Some(id) {
                    None
                } else {
                    self.current = Some(id);
                    Some(TagEvent::Detected(id))
                }
            }
            PollOutcome::NoCard => self.current.take().map(|_| TagEvent::Lost),
        }
    }
}
