//! Quantile-normalizer stage.
//!
//! Remaps each input variable into an equalized `[0, 1]` domain: a range
//! normalization `(v - min) / width` followed by the calibrated cumulative
//! distribution, so equally probable inputs land on equal outputs.

use mva_core::{NormalizeCalib, Result};
use tracing::trace;

use crate::category::CategorySelector;
use crate::density::DensityModel;
use crate::shape::{Event, StageShape};

/// Quantile normalizer over a set of calibrated variables.
///
/// Arity-preserving per slot: `n` input values normalize to `n` output
/// values, in input order.
#[derive(Debug, Clone)]
pub struct NormalizeStage {
    maps: Vec<DensityModel>,
    selector: CategorySelector,
}

impl NormalizeStage {
    /// Compile the calibration into immutable cumulative maps.
    ///
    /// The equalizing map is the integral of a smoothed fit of each
    /// variable's distribution, so the spline backing is used throughout.
    pub fn from_calib(calib: &NormalizeCalib) -> Result<Self> {
        calib.validate()?;
        let maps = calib
            .distributions
            .iter()
            .map(|distr| DensityModel::from_calib(distr, true))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { maps, selector: CategorySelector::new(calib.category_idx) })
    }

    /// Negotiate the stage shape against `n_inputs` offered slots.
    ///
    /// Unlike the likelihood estimator, the output is not optional: once
    /// selection succeeds every non-category slot emits one value per
    /// input value.
    pub fn configure(&mut self, n_inputs: usize) -> Result<StageShape> {
        self.selector.configure(self.maps.len(), n_inputs)?;
        Ok(StageShape { slots: self.selector.slot_flags(), output_optional: false })
    }

    /// Evaluate one event into per-slot output sequences.
    ///
    /// The result holds one entry per non-category slot, in slot order:
    /// `Some(outputs)` with the same length as the slot's input sequence,
    /// or `None` for every slot when the event's category is rejected.
    /// Each slot's transform is independent and order-preserving.
    pub fn evaluate(&self, event: &Event) -> Vec<Option<Vec<f64>>> {
        let n_out = self.selector.n_variables();
        let Some(block) = self.selector.select(event) else {
            trace!(n_out, "category rejected, emitting absent per slot");
            return vec![None; n_out];
        };
        let mut maps = self.maps[block].iter();

        let mut outputs = Vec::with_capacity(n_out);
        for (i, values) in event.iter().enumerate() {
            if self.selector.is_category_slot(i) {
                continue;
            }
            let Some(map) = maps.next() else { break };
            outputs.push(Some(values.iter().map(|&v| map.cumulative(v)).collect()));
        }
        outputs
    }
}
