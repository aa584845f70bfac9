//! Density models: calibrated per-variable density and cumulative
//! evaluation, backed by a smoothed spline fit or a raw histogram lookup.

use mva_core::{Error, HistogramCalib, Result, SigBkgCalib};

use crate::spline::Spline;

/// A calibrated 1D density model.
///
/// Exactly two backings exist: a natural cubic spline fitted to the
/// interior bins, or the raw calibrated histogram. The backing is chosen
/// per calibration (`use_splines`); both variants read the same underlying
/// histogram and are immutable after construction.
#[derive(Debug, Clone)]
pub enum DensityModel {
    /// Smoothed spline fit of the interior bins.
    Spline {
        /// Lower edge of the calibrated domain.
        min: f64,
        /// Width of the calibrated domain.
        width: f64,
        /// Spline fitted to the interior bin contents.
        spline: Spline,
    },
    /// Raw histogram lookup.
    Histogram {
        /// The calibrated histogram, queried directly.
        calib: HistogramCalib,
    },
}

impl DensityModel {
    /// Build a density model from a calibrated histogram.
    ///
    /// The spline path fits the interior bins only (under/overflow
    /// accumulators stripped) and requires a nonzero total content, since
    /// its density estimate is scaled by `entries / area`.
    pub fn from_calib(calib: &HistogramCalib, use_splines: bool) -> Result<Self> {
        calib.validate()?;
        if use_splines {
            let spline = Spline::fit(calib.interior())?;
            if spline.area() <= 0.0 {
                return Err(Error::Validation(
                    "spline density model needs nonzero interior content".into(),
                ));
            }
            Ok(Self::Spline { min: calib.range.min, width: calib.range.width, spline })
        } else {
            Ok(Self::Histogram { calib: calib.clone() })
        }
    }

    /// Per-entry density estimate at raw value `x`. Never negative for
    /// in-domain queries of a valid calibration; never fails.
    ///
    /// - Spline backing: `spline((x - min) / width) * entries / area`.
    /// - Histogram backing: `normalized_value(x) * n_bins`.
    ///
    /// Both scalings put the two backings on the same per-entry scale, so
    /// discriminants built from mixed calibrations stay comparable across
    /// variables.
    pub fn density(&self, x: f64) -> f64 {
        match self {
            Self::Spline { min, width, spline } => {
                let t = (x - min) / width;
                spline.eval(t) * spline.entries() / spline.area()
            }
            Self::Histogram { calib } => calib.normalized_value(x) * calib.n_bins() as f64,
        }
    }

    /// Cumulative distribution at raw value `x`, in `[0, 1]`.
    ///
    /// Monotone nondecreasing in `x` for nonnegative calibrations; 0 below
    /// the calibrated domain and 1 above it.
    pub fn cumulative(&self, x: f64) -> f64 {
        match self {
            Self::Spline { min, width, spline } => spline.integral((x - min) / width),
            Self::Histogram { calib } => histogram_cumulative(calib, x),
        }
    }
}

/// Piecewise-linear CDF of the interior bins: full bins below `x` plus the
/// covered fraction of the bin containing `x`, over the total content.
fn histogram_cumulative(calib: &HistogramCalib, x: f64) -> f64 {
    let n_bins = calib.n_bins();
    let total = calib.interior_sum();
    if n_bins == 0 || total <= 0.0 {
        return 0.0;
    }
    let t = calib.range.normalize(x);
    if !t.is_finite() || t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let pos = t * n_bins as f64;
    let idx = (pos as usize).min(n_bins - 1);
    let frac = pos - idx as f64;
    let interior = calib.interior();
    let below: f64 = interior[..idx].iter().sum();
    ((below + interior[idx] * frac) / total).clamp(0.0, 1.0)
}

/// Signal/background density model pair for one (variable, category).
///
/// Both models are owned exclusively by value; nothing aliases them after
/// construction.
#[derive(Debug, Clone)]
pub struct SigBkg {
    /// Signal density model.
    pub signal: DensityModel,
    /// Background density model.
    pub background: DensityModel,
}

impl SigBkg {
    /// Build the pair from its calibration. Both members share the
    /// calibration's backing choice.
    pub fn from_calib(calib: &SigBkgCalib) -> Result<Self> {
        Ok(Self {
            signal: DensityModel::from_calib(&calib.signal, calib.use_splines)?,
            background: DensityModel::from_calib(&calib.background, calib.use_splines)?,
        })
    }
}
