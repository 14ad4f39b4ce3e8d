//! Composite cross-metric stress index
//!
//! Normalizes every metric over the currently visible window and sums
//! the normalized values into a single stress series. Normalization is
//! window-relative so the signal adapts to the current magnitude regime
//! instead of relying on hardcoded global bounds. The danger flag
//! catches "nothing is individually critical but everything is
//! elevated" situations that per-metric thresholds miss.

use crate::models::{MetricName, MetricSample, METRIC_COUNT};
use serde::{Deserialize, Serialize};

/// Smoothed stress at or above this level triggers the danger flag
/// (7 of a possible 10: most metrics simultaneously near their peak)
pub const DANGER_THRESHOLD: f64 = 7.0;

/// Trailing window for the moving average
pub const SMOOTHING_WINDOW: usize = 5;

/// Stress at one history index
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StressPoint {
    pub index: usize,
    /// Sum of the per-metric normalized values, in `0..=10`
    pub stress: f64,
    /// Trailing moving average of `stress` over up to 5 points
    pub smoothed: f64,
}

/// Compute the stress series for the visible window
pub fn compute_stress(history: &[MetricSample]) -> Vec<StressPoint> {
    if history.is_empty() {
        return Vec::new();
    }

    // Window-relative min/max per metric
    let mut min = [f64::INFINITY; METRIC_COUNT];
    let mut max = [f64::NEG_INFINITY; METRIC_COUNT];
    for sample in history {
        for metric in MetricName::ALL {
            let i = metric.index();
            let v = sample.get(metric);
            min[i] = min[i].min(v);
            max[i] = max[i].max(v);
        }
    }

    let raw: Vec<f64> = history
        .iter()
        .map(|sample| {
            MetricName::ALL
                .iter()
                .map(|&metric| {
                    let i = metric.index();
                    if max[i] > min[i] {
                        (sample.get(metric) - min[i]) / (max[i] - min[i])
                    } else {
                        // No variance in the window: neither low nor high
                        0.5
                    }
                })
                .sum::<f64>()
        })
        .collect();

    raw.iter()
        .enumerate()
        .map(|(index, &stress)| {
            let start = index + 1 - SMOOTHING_WINDOW.min(index + 1);
            let window = &raw[start..=index];
            let smoothed = window.iter().sum::<f64>() / window.len() as f64;
            StressPoint {
                index,
                stress,
                smoothed,
            }
        })
        .collect()
}

/// True if any smoothed value in the window crosses the danger line
pub fn has_danger(points: &[StressPoint]) -> bool {
    points.iter().any(|p| p.smoothed >= DANGER_THRESHOLD)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(values: [f64; METRIC_COUNT]) -> MetricSample {
        MetricSample::new(values)
    }

    fn uniform(v: f64) -> MetricSample {
        sample([v; METRIC_COUNT])
    }

    #[test]
    fn test_empty_history_yields_empty_series() {
        assert!(compute_stress(&[]).is_empty());
        assert!(!has_danger(&[]));
    }

    #[test]
    fn test_stress_within_bounds() {
        let history: Vec<MetricSample> = (0..20)
            .map(|i| {
                let mut values = [0.0; METRIC_COUNT];
                for (j, v) in values.iter_mut().enumerate() {
                    *v = (i * (j + 1)) as f64;
                }
                sample(values)
            })
            .collect();

        let points = compute_stress(&history);
        assert_eq!(points.len(), 20);
        for p in &points {
            assert!(p.stress >= 0.0 && p.stress <= METRIC_COUNT as f64);
            assert!(p.smoothed >= 0.0 && p.smoothed <= METRIC_COUNT as f64);
        }
    }

    #[test]
    fn test_constant_field_contributes_half() {
        // Every field constant, so every point sums 10 * 0.5
        let history = vec![uniform(42.0), uniform(42.0), uniform(42.0)];
        let points = compute_stress(&history);
        for p in points {
            assert!((p.stress - 5.0).abs() < 1e-9);
            assert!((p.smoothed - 5.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_extremes_of_the_window() {
        // Two samples: the first is the window minimum for every field,
        // the second the maximum, so stress is 0 then 10.
        let history = vec![uniform(0.0), uniform(100.0)];
        let points = compute_stress(&history);
        assert!((points[0].stress - 0.0).abs() < 1e-9);
        assert!((points[1].stress - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_moving_average_trails_up_to_five_points() {
        let history = vec![
            uniform(0.0),
            uniform(100.0),
            uniform(0.0),
            uniform(100.0),
            uniform(0.0),
            uniform(100.0),
            uniform(0.0),
        ];
        let points = compute_stress(&history);

        // stress alternates 0, 10, 0, 10, ...
        assert!((points[0].smoothed - 0.0).abs() < 1e-9);
        assert!((points[1].smoothed - 5.0).abs() < 1e-9);
        assert!((points[2].smoothed - 10.0 / 3.0).abs() < 1e-9);
        // from index 4 on, the window holds exactly five points
        assert!((points[4].smoothed - 20.0 / 5.0).abs() < 1e-9);
        assert!((points[6].smoothed - 20.0 / 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_danger_flag_on_smoothed_series() {
        // Sustained maximum after a quiet start pushes the moving
        // average past the threshold.
        let mut history = vec![uniform(0.0)];
        history.extend(std::iter::repeat(uniform(100.0)).take(6));
        let points = compute_stress(&history);
        assert!(has_danger(&points));

        // A single spike in a long quiet window is smoothed away.
        let mut quiet = vec![uniform(0.0); 6];
        quiet.insert(3, uniform(100.0));
        let spiky = compute_stress(&quiet);
        assert!(!has_danger(&spiky));
    }
}
