use crate::shape::{Event, SlotFlag};
use crate::{LikelihoodStage, NormalizeStage};
use approx::assert_relative_eq;
use mva_core::{HistogramCalib, HistogramRange, LikelihoodCalib, NormalizeCalib, SigBkgCalib};

fn histo(values: Vec<f64>, min: f64, width: f64) -> HistogramCalib {
    HistogramCalib::new(values, HistogramRange { min, width }).unwrap()
}

fn flat_pair(min: f64, width: f64) -> SigBkgCalib {
    SigBkgCalib {
        signal: histo(vec![0.0, 1.0, 1.0, 1.0, 0.0], min, width),
        background: histo(vec![0.0, 1.0, 1.0, 1.0, 0.0], min, width),
        use_splines: true,
    }
}

#[test]
fn test_likelihood_shape_negotiation_matrix() {
    // No category: slot count must match the pair list exactly.
    let calib =
        LikelihoodCalib { pairs: vec![flat_pair(0.0, 1.0); 3], category_idx: None, bias: 1.0 };
    let mut stage = LikelihoodStage::from_calib(&calib).unwrap();
    assert!(stage.configure(2).is_err());
    assert!(stage.configure(4).is_err());
    let shape = stage.configure(3).unwrap();
    assert_eq!(shape.slots, vec![SlotFlag::PassAll; 3]);
    assert!(shape.output_optional);

    // Category at slot 1: 6 pairs over (n-1) variables.
    let calib =
        LikelihoodCalib { pairs: vec![flat_pair(0.0, 1.0); 6], category_idx: Some(1), bias: 1.0 };
    let mut stage = LikelihoodStage::from_calib(&calib).unwrap();
    // n = 5 -> 6 % 4 != 0.
    assert!(stage.configure(5).is_err());
    // n = 1 -> category slot out of range.
    assert!(stage.configure(1).is_err());
    // n = 4 -> 2 categories of 3 variables.
    let shape = stage.configure(4).unwrap();
    assert_eq!(
        shape.slots,
        vec![SlotFlag::PassAll, SlotFlag::None, SlotFlag::PassAll, SlotFlag::PassAll]
    );
}

#[test]
fn test_normalize_shape_is_not_optional() {
    let calib = NormalizeCalib {
        distributions: vec![histo(vec![0.0, 1.0, 2.0, 1.0, 0.0], 0.0, 1.0); 2],
        category_idx: None,
    };
    let mut stage = NormalizeStage::from_calib(&calib).unwrap();
    let shape = stage.configure(2).unwrap();
    assert!(!shape.output_optional);
    assert_eq!(shape.slots, vec![SlotFlag::PassAll; 2]);
}

#[test]
fn test_spline_backed_discriminant() {
    // Flat calibrations make the spline path exactly computable: a
    // constant fit has area equal to the bin content, so the density is
    // `content * entries / content = entries`.
    let p = SigBkgCalib {
        signal: histo(vec![0.0, 2.0, 2.0, 0.0], 0.0, 1.0),
        background: histo(vec![0.0, 3.0, 3.0, 0.0], 0.0, 1.0),
        use_splines: true,
    };
    let calib = LikelihoodCalib { pairs: vec![p], category_idx: None, bias: 1.0 };
    let mut stage = LikelihoodStage::from_calib(&calib).unwrap();
    stage.configure(1).unwrap();
    // sp = 4 (signal entries), bp = 6 (background entries).
    let out = stage.evaluate(&Event::from_slots(vec![vec![0.5]])).unwrap();
    assert_relative_eq!(out, 0.4, epsilon = 1e-9);
}

#[test]
fn test_category_rejection_end_to_end() {
    // Category index 0, two categories, two non-category variables per
    // block; the category value 2 is out of range for both stages.
    let lk = LikelihoodCalib {
        pairs: vec![flat_pair(0.0, 1.0); 4],
        category_idx: Some(0),
        bias: 1.0,
    };
    let mut likelihood = LikelihoodStage::from_calib(&lk).unwrap();
    likelihood.configure(3).unwrap();
    let rejected = Event::from_slots(vec![vec![2.0], vec![0.5], vec![0.5]]);
    assert_eq!(likelihood.evaluate(&rejected), None);

    let nm = NormalizeCalib {
        distributions: vec![histo(vec![0.0, 1.0, 1.0, 0.0], 0.0, 1.0); 4],
        category_idx: Some(0),
    };
    let mut normalize = NormalizeStage::from_calib(&nm).unwrap();
    normalize.configure(3).unwrap();
    assert_eq!(normalize.evaluate(&rejected), vec![None, None]);

    // The same event with a valid category flows through both stages.
    let accepted = Event::from_slots(vec![vec![1.0], vec![0.5], vec![0.5]]);
    assert!(likelihood.evaluate(&accepted).is_some());
    assert!(normalize.evaluate(&accepted).iter().all(Option::is_some));
}

#[test]
fn test_jagged_multiplicity_contributes_per_value() {
    // Two values in one slot, none in the other: both values of the first
    // variable multiply into the products.
    let calib = LikelihoodCalib {
        pairs: vec![
            SigBkgCalib {
                signal: histo(vec![0.0, 0.8, 0.0], 0.0, 1.0),
                background: histo(vec![0.0, 0.4, 0.0], 0.0, 1.0),
                use_splines: false,
            },
            flat_pair(0.0, 1.0),
        ],
        category_idx: None,
        bias: 1.0,
    };
    let mut stage = LikelihoodStage::from_calib(&calib).unwrap();
    stage.configure(2).unwrap();
    // Single-bin histograms normalize to density 1.0 regardless of weight,
    // so with two contributing unit-density values the result stays 0.5.
    let out = stage.evaluate(&Event::from_slots(vec![vec![0.2, 0.7], vec![]])).unwrap();
    assert_relative_eq!(out, 0.5, epsilon = 1e-12);
}

#[test]
fn test_calibration_json_to_evaluation() {
    // Calibrations arrive deserialized from the host's store; exercise the
    // full path from JSON to a discriminant.
    let json = r#"{
        "pairs": [{
            "signal": {"values": [0.0, 0.4, 0.6, 0.0], "range": {"min": 0.0, "width": 1.0}},
            "background": {"values": [0.0, 0.9, 0.1, 0.0], "range": {"min": 0.0, "width": 1.0}}
        }],
        "bias": 1.0
    }"#;
    let calib: LikelihoodCalib = serde_json::from_str(json).unwrap();
    assert_eq!(calib.category_idx, None);
    let mut stage = LikelihoodStage::from_calib(&calib).unwrap();
    stage.configure(1).unwrap();
    // Value in the first bin: sp = 0.8, bp = 1.8.
    let out = stage.evaluate(&Event::from_slots(vec![vec![0.25]])).unwrap();
    assert_relative_eq!(out, 0.8 / (0.8 + 1.8), epsilon = 1e-12);
}

#[test]
fn test_underflow_guard_scales_with_contributing_values() {
    // A calibration whose signal and background are tiny in the queried
    // bin: each value multiplies in densities of ~1e-3, so a handful of
    // values pushes the products below exp(-6 v - 2).
    let tiny = SigBkgCalib {
        // Two bins: the queried bin carries 1e-4 of the content, giving a
        // density of ~2e-4 on both sides.
        signal: histo(vec![0.0, 1e-4, 0.999, 0.0], 0.0, 1.0),
        background: histo(vec![0.0, 1e-4, 0.999, 0.0], 0.0, 1.0),
        use_splines: false,
    };
    let calib = LikelihoodCalib { pairs: vec![tiny], category_idx: None, bias: 1.0 };
    let mut stage = LikelihoodStage::from_calib(&calib).unwrap();
    stage.configure(1).unwrap();

    // One value: s + b ~ 4e-4, above exp(-8) ~ 3.4e-4.
    let few = Event::from_slots(vec![vec![0.25]]);
    assert!(stage.evaluate(&few).is_some());

    // Five values: s + b ~ 2 * (2e-4)^5 ~ 6e-19, below exp(-32) ~ 1.3e-14.
    let many = Event::from_slots(vec![vec![0.25; 5]]);
    assert_eq!(stage.evaluate(&many), None);
}
