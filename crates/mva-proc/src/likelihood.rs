//! Likelihood-estimator stage.
//!
//! Reads 0..n values for each input variable and fuses the per-variable
//! signal/background density estimates into a single discriminant
//! `s / (s + b)` per event.

use mva_core::{LikelihoodCalib, Result};
use tracing::trace;

use crate::category::CategorySelector;
use crate::density::SigBkg;
use crate::shape::{Event, StageShape};

/// Minimum combined density below which a value is treated as
/// uninformative: the calibration cannot discriminate there, and dividing
/// by a vanishing sum would be unstable.
const MIN_COMBINED_DENSITY: f64 = 1.0e-30;

/// Likelihood estimator over a set of calibrated variables.
///
/// Constructed once from its calibration, configured once against the
/// host's slot count, then evaluated independently per event with no
/// state carried across events.
#[derive(Debug, Clone)]
pub struct LikelihoodStage {
    pairs: Vec<SigBkg>,
    selector: CategorySelector,
    bias: f64,
}

impl LikelihoodStage {
    /// Compile the calibration into immutable density-model pairs.
    pub fn from_calib(calib: &LikelihoodCalib) -> Result<Self> {
        calib.validate()?;
        let pairs = calib.pairs.iter().map(SigBkg::from_calib).collect::<Result<Vec<_>>>()?;
        Ok(Self { pairs, selector: CategorySelector::new(calib.category_idx), bias: calib.bias })
    }

    /// Negotiate the stage shape against `n_inputs` offered slots.
    ///
    /// The overall output is declared optional: an event may legitimately
    /// produce no discriminant.
    pub fn configure(&mut self, n_inputs: usize) -> Result<StageShape> {
        self.selector.configure(self.pairs.len(), n_inputs)?;
        Ok(StageShape { slots: self.selector.slot_flags(), output_optional: true })
    }

    /// Evaluate one event into a discriminant in `(0, 1)`, or `None` when
    /// the event is rejected (bad category, no contributing values, or a
    /// product underflowed past the meaningful threshold).
    pub fn evaluate(&self, event: &Event) -> Option<f64> {
        let block = self.selector.select(event)?;
        let mut pairs = self.pairs[block].iter();

        let mut signal = self.bias;
        let mut background = 1.0;
        let mut contributing = 0u32;

        for (i, values) in event.iter().enumerate() {
            if self.selector.is_category_slot(i) {
                continue;
            }
            let pair = pairs.next()?;
            for &value in values {
                let sp = pair.signal.density(value).max(0.0);
                let bp = pair.background.density(value).max(0.0);
                if sp + bp < MIN_COMBINED_DENSITY {
                    continue;
                }
                contributing += 1;
                signal *= sp;
                background *= bp;
            }
        }

        // The product of many sub-unity factors shrinks exponentially in
        // the factor count; below exp(-6v - 2) the quotient carries no
        // information, only floating-point noise.
        if contributing == 0 {
            trace!("no contributing values, emitting absent");
            return None;
        }
        let total = signal + background;
        if total < (-6.0 * f64::from(contributing) - 2.0).exp() {
            trace!(contributing, total, "signal+background underflow, emitting absent");
            return None;
        }
        Some(signal / total)
    }
}
