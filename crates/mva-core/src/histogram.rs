//! Calibrated histogram primitive with under/overflow accumulators.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Calibrated range of a histogram: the affine map from a raw variable
/// value to the normalized domain `x' = (x - min) / width`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramRange {
    /// Lower edge of the calibrated domain.
    pub min: f64,
    /// Domain width. Must be finite and `> 0`.
    pub width: f64,
}

impl HistogramRange {
    /// Map a raw value onto the normalized domain.
    #[inline]
    pub fn normalize(&self, x: f64) -> f64 {
        (x - self.min) / self.width
    }

    fn validate(&self) -> Result<()> {
        if !(self.min.is_finite() && self.width.is_finite() && self.width > 0.0) {
            return Err(Error::Validation(format!(
                "histogram range must be finite with width > 0, got min={}, width={}",
                self.min, self.width
            )));
        }
        Ok(())
    }
}

/// A calibrated 1D histogram as produced by the training side.
///
/// `values` holds the bin contents in calibration order: `values[0]` is the
/// underflow accumulator, `values[len-1]` the overflow accumulator, and the
/// entries in between are the interior bins covering `range`. Density
/// models are built from the interior bins only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramCalib {
    /// Bin contents including the under/overflow accumulators at the ends.
    pub values: Vec<f64>,
    /// Calibrated range covered by the interior bins.
    pub range: HistogramRange,
}

impl HistogramCalib {
    /// Create a calibrated histogram and validate it.
    pub fn new(values: Vec<f64>, range: HistogramRange) -> Result<Self> {
        let calib = Self { values, range };
        calib.validate()?;
        Ok(calib)
    }

    /// Check the calibration invariants.
    ///
    /// Calibration objects are plain data (they arrive deserialized from
    /// the host); stage constructors call this before building any density
    /// model, so evaluation-time lookups can stay infallible.
    pub fn validate(&self) -> Result<()> {
        self.range.validate()?;
        if self.values.len() < 3 {
            return Err(Error::Validation(format!(
                "histogram needs at least one interior bin (3 entries), got {}",
                self.values.len()
            )));
        }
        for (i, v) in self.values.iter().enumerate() {
            if !v.is_finite() || *v < 0.0 {
                return Err(Error::Validation(format!(
                    "histogram values[{i}] must be finite and >= 0, got {v}"
                )));
            }
        }
        Ok(())
    }

    /// Number of interior bins (under/overflow stripped).
    #[inline]
    pub fn n_bins(&self) -> usize {
        self.values.len().saturating_sub(2)
    }

    /// Interior bin contents (under/overflow stripped).
    #[inline]
    pub fn interior(&self) -> &[f64] {
        let n = self.values.len();
        if n < 3 { &[] } else { &self.values[1..n - 1] }
    }

    /// Total content of the interior bins.
    pub fn interior_sum(&self) -> f64 {
        self.interior().iter().sum()
    }

    /// Content of the interior bin containing `x`, divided by the total
    /// interior content.
    ///
    /// Out-of-domain values fall into the under/overflow accumulators and
    /// yield `0.0`, as does an empty histogram. The upper domain edge is
    /// inclusive (it belongs to the last interior bin).
    pub fn normalized_value(&self, x: f64) -> f64 {
        let n_bins = self.n_bins();
        if n_bins == 0 {
            return 0.0;
        }
        let t = self.range.normalize(x);
        if !t.is_finite() || t < 0.0 || t > 1.0 {
            return 0.0;
        }
        let total = self.interior_sum();
        if total <= 0.0 {
            return 0.0;
        }
        let idx = ((t * n_bins as f64) as usize).min(n_bins - 1);
        self.interior()[idx] / total
    }
}
