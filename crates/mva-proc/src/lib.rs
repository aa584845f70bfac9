//! # mva-proc
//!
//! Processing stages of the mvastat variable-transformation engine.
//!
//! This crate provides:
//! - Calibrated per-variable density models ([`DensityModel`]), backed by
//!   either a smoothed spline fit or a raw histogram lookup.
//! - The shared shape-negotiation and category-selection machinery
//!   ([`CategorySelector`]): jagged per-event input, a variable number of
//!   input slots, and an optional categorical selector picking among
//!   parallel calibration blocks.
//! - The two stages: a likelihood estimator ([`LikelihoodStage`]) fusing
//!   signal/background densities into one discriminant per event, and a
//!   quantile normalizer ([`NormalizeStage`]) remapping each variable into
//!   an equalized `[0, 1]` domain.
//!
//! Stages are configured once against the host pipeline's declared shape
//! and are pure afterwards: evaluation is a function of the immutable
//! calibration state and one event's values, with every per-event anomaly
//! degrading to an explicit absence result instead of an error.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod category;
pub mod density;
pub mod likelihood;
pub mod normalize;
pub mod shape;
pub mod spline;

pub use category::CategorySelector;
pub use density::{DensityModel, SigBkg};
pub use likelihood::LikelihoodStage;
pub use normalize::NormalizeStage;
pub use shape::{Event, SlotFlag, StageShape};
pub use spline::Spline;

#[cfg(test)]
mod tests;
