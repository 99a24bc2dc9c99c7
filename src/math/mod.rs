//! Distribution arithmetic shared across the engine.
//!
//! Everything here operates on plain probability slices so it stays easy to
//! test in isolation from the domain types.

/// Shannon entropy in nats, treating zero entries as contributing nothing.
pub fn entropy(probs: &[f64]) -> f64 {
    let mut h = 0.0;
    for &p in probs {
        if p > 0.0 {
            h -= p * p.ln();
        }
    }
    h
}

/// Clamp negatives to zero and rescale to sum 1.
///
/// An all-zero (or all-negative) input comes back all-zero rather than NaN.
pub fn normalize<const N: usize>(probs: &[f64; N]) -> [f64; N] {
    let mut out = [0.0; N];
    let mut sum = 0.0;
    for (o, &p) in out.iter_mut().zip(probs.iter()) {
        *o = p.max(0.0);
        sum += *o;
    }
    if sum <= 0.0 {
        return [0.0; N];
    }
    for o in out.iter_mut() {
        *o /= sum;
    }
    out
}

/// Rescale arbitrary non-negative weights to sum 1 (all-zero stays all-zero).
pub fn normalize_weights(weights: &mut [f64]) {
    let sum: f64 = weights.iter().sum();
    if sum <= 0.0 {
        for w in weights.iter_mut() {
            *w = 0.0;
        }
        return;
    }
    for w in weights.iter_mut() {
        *w /= sum;
    }
}

/// Shortest contiguous index interval `[lo, hi]` whose summed probability is
/// at least `mass`.
///
/// Ties break toward the narrower interval first, then the lower-indexed
/// one. Falls back to the full range if no interval reaches `mass` (only
/// possible for unnormalized input).
pub fn credible_interval(probs: &[f64], mass: f64) -> (usize, usize) {
    let n = probs.len();
    let mut best: Option<(usize, usize, usize)> = None; // (width, lo, hi)
    for lo in 0..n {
        let mut s = 0.0;
        for hi in lo..n {
            s += probs[hi];
            if s >= mass {
                let cand = (hi - lo, lo, hi);
                if best.is_none_or(|b| cand < b) {
                    best = Some(cand);
                }
                break;
            }
        }
    }
    match best {
        Some((_, lo, hi)) => (lo, hi),
        None => (0, n.saturating_sub(1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entropy_of_point_mass_is_zero() {
        assert_eq!(entropy(&[0.0, 1.0, 0.0]), 0.0);
    }

    #[test]
    fn entropy_of_uniform_is_ln_n() {
        let h = entropy(&[0.25; 4]);
        assert!((h - 4.0f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn normalize_clamps_and_rescales() {
        let out = normalize(&[0.2, -0.1, 0.6]);
        assert!((out.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert_eq!(out[1], 0.0);
        assert!((out[0] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn normalize_all_zero_stays_zero() {
        let out = normalize(&[0.0, 0.0]);
        assert_eq!(out, [0.0, 0.0]);
    }

    #[test]
    fn credible_interval_picks_shortest_run() {
        // 0.8 is reachable with the middle two bins.
        let (lo, hi) = credible_interval(&[0.1, 0.4, 0.4, 0.1], 0.8);
        assert_eq!((lo, hi), (1, 2));
    }

    #[test]
    fn credible_interval_ties_break_low() {
        // Both [0,2] and [1,3] reach 0.8 with width 2; the lower wins.
        let (lo, hi) = credible_interval(&[0.2, 0.3, 0.3, 0.2], 0.8);
        assert_eq!((lo, hi), (0, 2));
    }

    #[test]
    fn credible_interval_point_mass_is_single_bin() {
        let (lo, hi) = credible_interval(&[0.0, 0.0, 1.0, 0.0, 0.0, 0.0], 0.8);
        assert_eq!((lo, hi), (2, 2));
    }
}
