//! Shape-negotiation and per-event input types shared with the host
//! pipeline.

/// Per-slot declaration returned to the host at configure time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotFlag {
    /// All values of this slot are consumed by evaluation.
    PassAll,
    /// No values are expected from evaluation; the slot is a selector.
    None,
    /// The slot may legitimately produce no value.
    Optional,
}

/// Negotiated stage shape: one flag per input slot plus the overall
/// output optionality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageShape {
    /// Per-slot flags, in slot order.
    pub slots: Vec<SlotFlag>,
    /// Whether an event may legitimately produce no overall output.
    pub output_optional: bool,
}

/// One event's input: an ordered sequence of zero or more scalar values
/// per slot (jagged; slots and events carry independent counts).
#[derive(Debug, Clone, Default)]
pub struct Event {
    slots: Vec<Vec<f64>>,
}

impl Event {
    /// Build an event from its per-slot value sequences.
    pub fn from_slots(slots: Vec<Vec<f64>>) -> Self {
        Self { slots }
    }

    /// Number of input slots carried by this event.
    #[inline]
    pub fn n_slots(&self) -> usize {
        self.slots.len()
    }

    /// Values of slot `i`, empty for an out-of-range index.
    #[inline]
    pub fn slot(&self, i: usize) -> &[f64] {
        self.slots.get(i).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate over the per-slot value sequences in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &[f64]> {
        self.slots.iter().map(Vec::as_slice)
    }
}

impl From<Vec<Vec<f64>>> for Event {
    fn from(slots: Vec<Vec<f64>>) -> Self {
        Self::from_slots(slots)
    }
}
