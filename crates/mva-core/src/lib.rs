//! # mva-core
//!
//! Shared foundation for the mvastat variable-transformation engine:
//! - the crate-wide [`Error`] / [`Result`] types,
//! - the calibration object model consumed by the processing stages
//!   ([`LikelihoodCalib`], [`NormalizeCalib`]),
//! - the calibrated histogram primitive ([`HistogramCalib`]) with its
//!   under/overflow accumulator layout and normalized lookup.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod calib;
pub mod error;
pub mod histogram;

pub use calib::{LikelihoodCalib, NormalizeCalib, SigBkgCalib};
pub use error::{Error, Result};
pub use histogram::{HistogramCalib, HistogramRange};
