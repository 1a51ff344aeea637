//! Summary metrics over conservation score arrays. All statistics ignore NaN.

use super::tracker::RegionScores;
use std::collections::BTreeMap;

pub const DEFAULT_WINDOW_SIZE: usize = 30;

/// Number of leading values averaged into `<prefix>_start`.
pub const START_VALUES: usize = 15;

/// Metric name (e.g. `phylop_mean`) to value.
pub type Metrics = BTreeMap<String, f64>;

#[derive(Debug, Clone, Copy)]
pub struct ConservationAnalyzer {
    pub window_size: usize,
}

impl Default for ConservationAnalyzer {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
        }
    }
}

impl ConservationAnalyzer {
    pub fn new(window_size: usize) -> Self {
        Self {
            window_size: window_size.max(1),
        }
    }

    /// Metrics for every PhyloCSF frame (`phylocsf_frame<N>_*`) and PhyloP (`phylop_*`).
    pub fn calculate_metrics(&self, scores: &RegionScores) -> Metrics {
        let mut metrics = Metrics::new();
        for (frame, values) in &scores.phylocsf {
            metrics.extend(self.analyze(values, &format!("phylocsf_frame{}", frame)));
        }
        if let Some(values) = &scores.phylop {
            metrics.extend(self.analyze(values, "phylop"));
        }
        metrics
    }

    /// Metrics for one score array; empty input yields no metrics.
    pub fn analyze(&self, scores: &[f64], prefix: &str) -> Metrics {
        let mut m = Metrics::new();
        if scores.is_empty() {
            return m;
        }
        let key = |name: &str| format!("{}_{}", prefix, name);

        m.insert(key("mean"), nan_mean(scores));
        m.insert(key("median"), nan_percentile(scores, 50.0));
        m.insert(key("max"), nan_max(scores.iter().copied()));
        m.insert(key("q75"), nan_percentile(scores, 75.0));
        m.insert(key("start"), nan_mean(&scores[..scores.len().min(START_VALUES)]));
        m.insert(
            key("max_window"),
            nan_max(self.window_means(scores).into_iter()),
        );
        m.insert(
            key("longest_positive_run"),
            longest_positive_run(scores) as f64,
        );
        m
    }

    /// Mean of every full window; a single whole-array mean when the array is shorter.
    pub fn window_means(&self, scores: &[f64]) -> Vec<f64> {
        let w = self.window_size.max(1);
        if scores.len() < w {
            return vec![nan_mean(scores)];
        }

        scores.windows(w).map(nan_mean).collect()
    }
}

fn nan_mean(values: &[f64]) -> f64 {
    let (sum, n) = values
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        f64::NAN
    } else {
        sum / n as f64
    }
}

fn nan_max(values: impl Iterator<Item = f64>) -> f64 {
    values
        .filter(|v| !v.is_nan())
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
        .unwrap_or(f64::NAN)
}

/// Percentile with linear interpolation between closest ranks.
fn nan_percentile(values: &[f64], pct: f64) -> f64 {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return f64::NAN;
    }
    sorted.sort_by(|a, b| a.total_cmp(b));
    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
}

/// Longest stretch of consecutive values > 0 (NaN breaks a run).
fn longest_positive_run(values: &[f64]) -> usize {
    let mut current = 0;
    let mut best = 0;
    for &v in values {
        if v > 0.0 {
            current += 1;
            best = best.max(current);
        } else {
            current = 0;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn basic_statistics() {
        let a = ConservationAnalyzer::new(2);
        let m = a.analyze(&[1.0, 2.0, 3.0, 4.0], "phylop");
        assert!(close(m["phylop_mean"], 2.5));
        assert!(close(m["phylop_median"], 2.5));
        assert!(close(m["phylop_max"], 4.0));
        assert!(close(m["phylop_q75"], 3.25));
        assert!(close(m["phylop_start"], 2.5));
        assert!(close(m["phylop_max_window"], 3.5));
        assert!(close(m["phylop_longest_positive_run"], 4.0));
        assert_eq!(m.len(), 7);
    }

    #[test]
    fn nan_values_ignored() {
        let a = ConservationAnalyzer::new(2);
        let m = a.analyze(&[f64::NAN, 2.0, 4.0, f64::NAN], "x");
        assert!(close(m["x_mean"], 3.0));
        assert!(close(m["x_median"], 3.0));
        assert!(close(m["x_max"], 4.0));
        // windows: [NaN,2]=2, [2,4]=3, [4,NaN]=4
        assert!(close(m["x_max_window"], 4.0));
        assert!(close(m["x_longest_positive_run"], 2.0));
    }

    #[test]
    fn all_nan_gives_nan_stats() {
        let a = ConservationAnalyzer::default();
        let m = a.analyze(&[f64::NAN, f64::NAN], "x");
        assert!(m["x_mean"].is_nan());
        assert!(m["x_median"].is_nan());
        assert!(m["x_max_window"].is_nan());
        assert!(close(m["x_longest_positive_run"], 0.0));
    }

    #[test]
    fn empty_scores_no_metrics() {
        assert!(ConservationAnalyzer::default().analyze(&[], "x").is_empty());
    }

    #[test]
    fn short_array_single_window() {
        let a = ConservationAnalyzer::default();
        assert_eq!(a.window_means(&[1.0, 3.0]), vec![2.0]);
    }

    #[test]
    fn window_means_slide() {
        let a = ConservationAnalyzer::new(3);
        let w = a.window_means(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(w.len(), 3);
        assert!(close(w[0], 2.0) && close(w[1], 3.0) && close(w[2], 4.0));
    }

    #[test]
    fn infinite_value_only_affects_its_windows() {
        let a = ConservationAnalyzer::new(2);
        let w = a.window_means(&[f64::NEG_INFINITY, 1.0, 1.0, 1.0]);
        assert_eq!(w, vec![f64::NEG_INFINITY, 1.0, 1.0]);
        let m = a.analyze(&[f64::NEG_INFINITY, 1.0, 1.0, 1.0], "x");
        assert_eq!(m["x_max_window"], 1.0);
    }

    #[test]
    fn large_values_do_not_leak_into_later_windows() {
        let w = ConservationAnalyzer::new(2).window_means(&[1e17, 1.0, 1.0, 3.0]);
        assert_eq!(w, vec![5e16, 1.0, 2.0]);
    }

    #[test]
    fn start_uses_first_fifteen() {
        let mut scores = vec![1.0; START_VALUES];
        scores.extend(vec![100.0; 10]);
        let m = ConservationAnalyzer::default().analyze(&scores, "p");
        assert!(close(m["p_start"], 1.0));
    }

    #[test]
    fn positive_run_broken_by_zero_and_negative() {
        assert_eq!(longest_positive_run(&[1.0, 2.0, 0.0, 1.0, 1.0, 1.0, -1.0, 5.0]), 3);
    }

    #[test]
    fn region_metrics_prefixes() {
        let mut scores = RegionScores::default();
        scores.phylocsf.insert(1, vec![1.0, -1.0]);
        scores.phylocsf.insert(3, vec![2.0]);
        scores.phylop = Some(vec![0.5]);
        let m = ConservationAnalyzer::default().calculate_metrics(&scores);
        assert!(m.contains_key("phylocsf_frame1_mean"));
        assert!(m.contains_key("phylocsf_frame3_q75"));
        assert!(!m.contains_key("phylocsf_frame2_mean"));
        assert!(close(m["phylop_max"], 0.5));
        assert_eq!(m.len(), 21);
    }
}
