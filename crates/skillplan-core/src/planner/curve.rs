//! Curve math for spreading minutes over active days.
//!
//! Weights are `exp(k * t)` with `t` running from 0 on the first active day
//! to 1 on the last, and `k = intensity * max_steepness`. At intensity 0
//! every weight is 1, which is the linear split. Steepness is clamped to
//! [`MAX_STEEPNESS`] so the weights stay finite.

use super::MAX_STEEPNESS;

/// Per-day weights for `days` active days.
pub fn weights(days: usize, intensity: f64, max_steepness: f64) -> Vec<f64> {
    let k = intensity.clamp(0.0, 1.0) * max_steepness.clamp(0.0, MAX_STEEPNESS);
    match days {
        0 => Vec::new(),
        1 => vec![1.0],
        n => {
            let span = (n - 1) as f64;
            (0..n).map(|i| (k * i as f64 / span).exp()).collect()
        }
    }
}

/// Unrounded minutes per day: `total * w_i / sum(w)`.
pub fn ideal_shares(total: u32, weights: &[f64]) -> Vec<f64> {
    let sum: f64 = weights.iter().sum();
    if sum <= 0.0 || !sum.is_finite() {
        return vec![0.0; weights.len()];
    }
    weights
        .iter()
        .map(|w| f64::from(total) * w / sum)
        .collect()
}

/// Round shares to whole minutes so that they add up to `total` exactly.
///
/// Each day is rounded against the running total of the shares before it,
/// and the last day receives whatever is left. No day goes negative and no
/// day is off its share by a full minute.
pub fn whole_minutes(total: u32, shares: &[f64]) -> Vec<u32> {
    let Some(last) = shares.len().checked_sub(1) else {
        return Vec::new();
    };

    let mut minutes = Vec::with_capacity(shares.len());
    let mut cumulative = 0.0_f64;
    let mut assigned: u32 = 0;

    for share in &shares[..last] {
        cumulative += share.max(0.0);
        let target = (cumulative.round() as u32).min(total);
        let today = target.saturating_sub(assigned);
        minutes.push(today);
        assigned += today;
    }
    minutes.push(total - assigned);
    minutes
}

/// Weights, shares and rounding in one step.
pub fn allocate(total: u32, days: usize, intensity: f64, max_steepness: f64) -> Vec<u32> {
    let weights = weights(days, intensity, max_steepness);
    let shares = ideal_shares(total, &weights);
    whole_minutes(total, &shares)
}
