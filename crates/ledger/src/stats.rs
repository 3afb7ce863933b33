use serde::Serialize;

const FENCE_FACTOR: f64 = 1.5;

/// Linear-interpolated quantile of already sorted values.
///
/// Uses `index = p * (n - 1)` and interpolates between the two neighbouring
/// order statistics. Returns `None` for an empty slice.
pub fn quantile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let p = p.clamp(0.0, 1.0);
    let pos = p * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

pub fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Tukey fences around the interquartile range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IqrFence {
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower: f64,
    pub upper: f64,
}

impl IqrFence {
    /// `None` with fewer than two values: a single amount cannot sit outside
    /// its own range.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.len() < 2 {
            return None;
        }
        let sorted = sorted_copy(values);
        let q1 = quantile(&sorted, 0.25)?;
        let q3 = quantile(&sorted, 0.75)?;
        let iqr = q3 - q1;
        Some(Self {
            q1,
            q3,
            iqr,
            lower: q1 - FENCE_FACTOR * iqr,
            upper: q3 + FENCE_FACTOR * iqr,
        })
    }

    pub fn is_outlier(&self, value: f64) -> bool {
        value < self.lower || value > self.upper
    }
}

/// Box-plot statistics. Whiskers end at the most extreme values still
/// inside the fences.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FiveNumberSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
}

impl FiveNumberSummary {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let sorted = sorted_copy(values);
        let min = *sorted.first()?;
        let max = *sorted.last()?;
        let q1 = quantile(&sorted, 0.25)?;
        let median = quantile(&sorted, 0.5)?;
        let q3 = quantile(&sorted, 0.75)?;

        let (lower_whisker, upper_whisker) = match IqrFence::from_values(&sorted) {
            Some(fence) => {
                let lower = sorted
                    .iter()
                    .copied()
                    .find(|v| *v >= fence.lower)
                    .unwrap_or(min);
                let upper = sorted
                    .iter()
                    .rev()
                    .copied()
                    .find(|v| *v <= fence.upper)
                    .unwrap_or(max);
                (lower, upper)
            }
            None => (min, max),
        };

        Some(Self {
            min,
            q1,
            median,
            q3,
            max,
            lower_whisker,
            upper_whisker,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantile_linear_interpolation() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&v, 0.25), Some(1.75));
        assert_eq!(quantile(&v, 0.5), Some(2.5));
        assert_eq!(quantile(&v, 0.75), Some(3.25));
        assert_eq!(quantile(&v, 0.0), Some(1.0));
        assert_eq!(quantile(&v, 1.0), Some(4.0));
        assert_eq!(quantile(&[], 0.5), None);
    }

    #[test]
    fn test_quantile_exact_order_statistic() {
        let v = [10.0, 20.0, 30.0, 40.0, 50.0];
        assert_eq!(quantile(&v, 0.25), Some(20.0));
        assert_eq!(quantile(&v, 0.75), Some(40.0));
    }

    #[test]
    fn test_fence_bounds() {
        let fence = IqrFence::from_values(&[40.0, 10.0, 30.0, 20.0, 50.0]).unwrap();
        assert_eq!(fence.q1, 20.0);
        assert_eq!(fence.q3, 40.0);
        assert_eq!(fence.iqr, 20.0);
        assert_eq!(fence.lower, -10.0);
        assert_eq!(fence.upper, 70.0);
        assert!(fence.is_outlier(70.5));
        assert!(!fence.is_outlier(70.0));
    }

    #[test]
    fn test_fence_needs_two_values() {
        assert!(IqrFence::from_values(&[]).is_none());
        assert!(IqrFence::from_values(&[5.0]).is_none());
    }

    #[test]
    fn test_five_number_summary_whiskers() {
        let s = FiveNumberSummary::from_values(&[1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 100.0);
        assert_eq!(s.median, 3.0);
        assert_eq!(s.lower_whisker, 1.0);
        assert_eq!(s.upper_whisker, 4.0);
    }

    #[test]
    fn test_five_number_summary_single_value() {
        let s = FiveNumberSummary::from_values(&[7.0]).unwrap();
        assert_eq!(s.lower_whisker, 7.0);
        assert_eq!(s.upper_whisker, 7.0);
        assert!(FiveNumberSummary::from_values(&[]).is_none());
    }
}
