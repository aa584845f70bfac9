//! Calibration object model consumed by the processing stages.
//!
//! These are plain data objects: the host pipeline deserializes them from
//! its calibration store and hands them to the stage constructors, which
//! validate and compile them into immutable density models. With a
//! category variable, the flat per-variable lists hold `n_categories`
//! consecutive blocks of one entry per non-category input slot.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::histogram::HistogramCalib;

/// Signal/background calibration pair for one (variable, category).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigBkgCalib {
    /// Signal distribution of the variable.
    pub signal: HistogramCalib,
    /// Background distribution of the variable.
    pub background: HistogramCalib,
    /// Back both density models with a smoothed spline fit instead of the
    /// raw histogram lookup.
    #[serde(default)]
    pub use_splines: bool,
}

impl SigBkgCalib {
    /// Check both member histograms.
    pub fn validate(&self) -> Result<()> {
        self.signal.validate()?;
        self.background.validate()
    }
}

/// Calibration for the likelihood-estimator stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikelihoodCalib {
    /// Flat signal/background pair list, one entry per
    /// (variable, category).
    pub pairs: Vec<SigBkgCalib>,
    /// Input slot acting as the category selector, if any.
    #[serde(default)]
    pub category_idx: Option<usize>,
    /// Prior signal weight seeding the signal product.
    pub bias: f64,
}

impl LikelihoodCalib {
    /// Check the calibration invariants.
    pub fn validate(&self) -> Result<()> {
        if self.pairs.is_empty() {
            return Err(Error::Validation(
                "likelihood calibration needs at least one signal/background pair".into(),
            ));
        }
        if !self.bias.is_finite() || self.bias <= 0.0 {
            return Err(Error::Validation(format!(
                "likelihood bias must be finite and > 0, got {}",
                self.bias
            )));
        }
        for pair in &self.pairs {
            pair.validate()?;
        }
        Ok(())
    }
}

/// Calibration for the quantile-normalizer stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizeCalib {
    /// Flat per-variable distribution list, one entry per
    /// (variable, category).
    pub distributions: Vec<HistogramCalib>,
    /// Input slot acting as the category selector, if any.
    #[serde(default)]
    pub category_idx: Option<usize>,
}

impl NormalizeCalib {
    /// Check the calibration invariants.
    pub fn validate(&self) -> Result<()> {
        if self.distributions.is_empty() {
            return Err(Error::Validation(
                "normalize calibration needs at least one distribution".into(),
            ));
        }
        for distr in &self.distributions {
            distr.validate()?;
        }
        Ok(())
    }
}
