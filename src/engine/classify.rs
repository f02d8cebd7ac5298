//! Change classification against per-metric band edges.
//!
//! The null-guarded percent change here is a contract, not a
//! convenience: downstream rendering suppresses lines with an undefined
//! comparison instead of erroring, so partial reports still render.

use crate::models::{ChangeResult, Classification};

/// Signed percent change from `baseline` to `current`.
///
/// `None` when the comparison is undefined: a zero or NaN baseline, or
/// a NaN current value.
pub fn percent_change(current: f64, baseline: f64) -> Option<f64> {
    if baseline == 0.0 || baseline.is_nan() || current.is_nan() {
        return None;
    }
    Some((current - baseline) / baseline * 100.0)
}

/// Classify `current` against `baseline` with a symmetric band edge.
///
/// `edge_pct` is in percentage points and is metric-specific; yield,
/// volume, downtime, OTIF, lead time and margins all move at different
/// natural scales, so one global edge would misclassify the quiet ones.
/// When `higher_is_better` is false the improved/degraded mapping is
/// inverted; `stable` and `unknown` are unaffected by direction sense.
pub fn classify(
    current: Option<f64>,
    baseline: Option<f64>,
    edge_pct: f64,
    higher_is_better: bool,
) -> ChangeResult {
    let delta_pct = match (current, baseline) {
        (Some(cur), Some(base)) => percent_change(cur, base),
        _ => None,
    };

    let classification = match delta_pct {
        None => Classification::Unknown,
        Some(delta) if delta > edge_pct => {
            if higher_is_better {
                Classification::Improved
            } else {
                Classification::Degraded
            }
        }
        Some(delta) if delta < -edge_pct => {
            if higher_is_better {
                Classification::Degraded
            } else {
                Classification::Improved
            }
        }
        Some(_) => Classification::Stable,
    };

    ChangeResult {
        delta_pct,
        classification,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_change_basic() {
        assert!((percent_change(110.0, 100.0).unwrap() - 10.0).abs() < 1e-12);
        assert!((percent_change(90.0, 100.0).unwrap() + 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_percent_change_undefined_baselines() {
        assert_eq!(percent_change(1.0, 0.0), None);
        assert_eq!(percent_change(1.0, f64::NAN), None);
        assert_eq!(percent_change(f64::NAN, 1.0), None);
    }

    #[test]
    fn test_classify_unknown_on_missing_or_zero_baseline() {
        for baseline in [None, Some(0.0), Some(f64::NAN)] {
            let result = classify(Some(1.0), baseline, 2.0, true);
            assert_eq!(result.classification, Classification::Unknown);
            assert_eq!(result.delta_pct, None);
        }
    }

    #[test]
    fn test_classify_unknown_on_missing_current() {
        let result = classify(None, Some(1.0), 2.0, true);
        assert_eq!(result.classification, Classification::Unknown);
        assert_eq!(result.delta_pct, None);
    }

    #[test]
    fn test_classify_bands() {
        // Edge is exclusive: a delta exactly on the edge is stable.
        let up = classify(Some(103.1), Some(100.0), 3.0, true);
        assert_eq!(up.classification, Classification::Improved);

        let down = classify(Some(96.8), Some(100.0), 3.0, true);
        assert_eq!(down.classification, Classification::Degraded);

        let on_edge = classify(Some(103.0), Some(100.0), 3.0, true);
        assert_eq!(on_edge.classification, Classification::Stable);

        let inside = classify(Some(101.0), Some(100.0), 3.0, true);
        assert_eq!(inside.classification, Classification::Stable);
    }

    #[test]
    fn test_classify_direction_antisymmetry() {
        // Swapping higher_is_better swaps improved/degraded and leaves
        // stable/unknown untouched.
        let cases = [
            (Some(120.0), Some(100.0)),
            (Some(80.0), Some(100.0)),
            (Some(101.0), Some(100.0)),
            (Some(1.0), Some(0.0)),
        ];
        for (current, baseline) in cases {
            let a = classify(current, baseline, 5.0, true);
            let b = classify(current, baseline, 5.0, false);
            let expected = match a.classification {
                Classification::Improved => Classification::Degraded,
                Classification::Degraded => Classification::Improved,
                other => other,
            };
            assert_eq!(b.classification, expected);
            assert_eq!(a.delta_pct, b.delta_pct);
        }
    }

    #[test]
    fn test_classify_otif_drop() {
        // 0.95 -> 0.90 is a -5.26% move, past the +-3 OTIF edge.
        let result = classify(Some(0.90), Some(0.95), 3.0, true);
        assert_eq!(result.classification, Classification::Degraded);
        assert!((result.delta_pct.unwrap() + 5.263157894736842).abs() < 1e-9);
    }

    #[test]
    fn test_classify_lower_is_better_metrics() {
        // More downtime is a degradation even though the delta is positive.
        let worse = classify(Some(5.5), Some(4.0), 10.0, false);
        assert_eq!(worse.classification, Classification::Degraded);

        let better = classify(Some(3.0), Some(4.0), 10.0, false);
        assert_eq!(better.classification, Classification::Improved);
    }
}
