//! Category selection shared by the processing stages.
//!
//! A stage's calibration is a flat list with one entry per
//! (variable, category). The selector negotiates that list against the
//! number of input slots offered by the host, and per event picks the
//! contiguous calibration block addressed by the category value.

use std::ops::Range;

use mva_core::{Error, Result};
use tracing::{debug, trace};

use crate::shape::{Event, SlotFlag};

#[derive(Debug, Clone, Copy)]
struct SelectorState {
    n_inputs: usize,
    n_categories: usize,
    block_len: usize,
}

/// Shape negotiation and per-event calibration-block selection.
///
/// Built unconfigured; [`configure`] fixes the shape once, strictly before
/// any evaluation. An unconfigured selector rejects every event, keeping a
/// stage whose negotiation failed inert rather than faulting.
///
/// [`configure`]: CategorySelector::configure
#[derive(Debug, Clone)]
pub struct CategorySelector {
    category_idx: Option<usize>,
    state: Option<SelectorState>,
}

impl CategorySelector {
    /// Create an unconfigured selector.
    pub fn new(category_idx: Option<usize>) -> Self {
        Self { category_idx, state: None }
    }

    /// Negotiate the calibration list against the offered slot count.
    ///
    /// Without a category the list must match the slot count one-to-one.
    /// With a category at slot `k`, the remaining `n_inputs - 1` slots
    /// must evenly divide the list; the quotient is the category count.
    pub fn configure(&mut self, block_count: usize, n_inputs: usize) -> Result<()> {
        self.state = None;
        let state = match self.category_idx {
            None => {
                if n_inputs != block_count {
                    return Err(Error::Configuration(format!(
                        "expected {block_count} input slots, got {n_inputs}"
                    )));
                }
                SelectorState { n_inputs, n_categories: 1, block_len: block_count }
            }
            Some(k) => {
                if n_inputs < k + 1 {
                    return Err(Error::Configuration(format!(
                        "category slot {k} out of range for {n_inputs} input slots"
                    )));
                }
                let vars = n_inputs - 1;
                if vars == 0 || block_count % vars != 0 {
                    return Err(Error::Configuration(format!(
                        "calibration list of {block_count} does not divide over {vars} variables"
                    )));
                }
                SelectorState { n_inputs, n_categories: block_count / vars, block_len: vars }
            }
        };
        debug!(
            n_inputs = state.n_inputs,
            n_categories = state.n_categories,
            block_len = state.block_len,
            "category selector configured"
        );
        self.state = Some(state);
        Ok(())
    }

    /// Whether slot `i` is the category selector slot.
    #[inline]
    pub fn is_category_slot(&self, i: usize) -> bool {
        self.category_idx == Some(i)
    }

    /// Number of parallel calibration blocks (1 without a category).
    /// Zero while unconfigured.
    pub fn n_categories(&self) -> usize {
        self.state.map_or(0, |s| s.n_categories)
    }

    /// Number of non-category slots, i.e. declared outputs of a
    /// passthrough stage. Zero while unconfigured.
    pub fn n_variables(&self) -> usize {
        self.state.map_or(0, |s| s.block_len)
    }

    /// Per-slot flags for the negotiated shape: every slot passes all its
    /// values through except the category slot.
    pub fn slot_flags(&self) -> Vec<SlotFlag> {
        let Some(state) = self.state else { return Vec::new() };
        (0..state.n_inputs)
            .map(|i| if self.is_category_slot(i) { SlotFlag::None } else { SlotFlag::PassAll })
            .collect()
    }

    /// Select the calibration block for one event.
    ///
    /// Returns the index range into the flat calibration list, or `None`
    /// when the event is rejected: category value missing, non-finite, or
    /// outside `[0, n_categories)`; slot count differing from the
    /// negotiated shape; or an unconfigured selector.
    pub fn select(&self, event: &Event) -> Option<Range<usize>> {
        let state = self.state?;
        if event.n_slots() != state.n_inputs {
            trace!(
                expected = state.n_inputs,
                got = event.n_slots(),
                "event slot count mismatch, rejecting"
            );
            return None;
        }
        let Some(k) = self.category_idx else {
            return Some(0..state.block_len);
        };

        let values = event.slot(k);
        if values.len() != 1 || !values[0].is_finite() {
            trace!(slot = k, n_values = values.len(), "invalid category value, rejecting");
            return None;
        }
        let cat = values[0] as i64;
        if cat < 0 || cat >= state.n_categories as i64 {
            trace!(category = cat, n_categories = state.n_categories, "category out of range");
            return None;
        }
        let start = cat as usize * state.block_len;
        Some(start..start + state.block_len)
    }
}
