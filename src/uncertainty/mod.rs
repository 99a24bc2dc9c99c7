//! Confidence scoring and uncertainty diagnostics.
//!
//! The final confidence is the candidate-weighted type confidence,
//! discounted by how spread-out the type-candidate distribution is
//! (normalized entropy, weighted by a configurable alpha) and by the
//! product of all fired modifier penalties, clamped to [0, 1].

use crate::config::EngineConfig;
use crate::domain::{AttributeSet, Flag, TypeCandidate, UncertaintyReport, VcDistribution};
use crate::math;

/// Shannon entropy of the candidate weights, plus its normalization by
/// `ln(n)`. A single candidate is fully certain, so both are 0.
pub fn type_entropy(candidates: &[TypeCandidate]) -> (f64, f64) {
    let weights: Vec<f64> = candidates.iter().map(|c| c.weight).collect();
    let entropy = math::entropy(&weights);
    let n = candidates.len().max(2);
    (entropy, entropy / (n as f64).ln())
}

/// Candidate-weighted average of per-rule confidences.
pub fn weighted_type_confidence(candidates: &[TypeCandidate]) -> f64 {
    candidates.iter().map(|c| c.weight * c.confidence).sum()
}

/// Weight gap between the two best candidates; 1.0 for a single candidate.
pub fn top1_margin(candidates: &[TypeCandidate]) -> f64 {
    match candidates {
        [first, second, ..] => first.weight - second.weight,
        _ => 1.0,
    }
}

pub fn final_confidence(
    cfg: &EngineConfig,
    type_confidence: f64,
    normalized_entropy: f64,
    modifier_penalty: f64,
) -> f64 {
    let raw = type_confidence * (1.0 - cfg.tuning.entropy_alpha * normalized_entropy)
        * modifier_penalty;
    raw.clamp(0.0, 1.0)
}

/// Core attributes the rubric cares about that this input lacked.
pub fn missing_attributes(attrs: &AttributeSet) -> Vec<String> {
    let mut missing = Vec::new();
    if attrs.material.is_none() {
        missing.push("material".to_string());
    }
    if attrs.system.is_none() {
        missing.push("system".to_string());
    }
    if attrs.height_bin.is_none() {
        missing.push("height".to_string());
    }
    if attrs.ductility_token.is_none() {
        missing.push("ductility".to_string());
    }
    missing
}

/// Diagnostic flags for the non-override path.
pub fn collect_flags(
    attrs: &AttributeSet,
    fallback_used: bool,
    unknown_substituted: bool,
    modifiers_fired: bool,
) -> Vec<Flag> {
    let mut flags = Vec::new();
    if fallback_used {
        flags.push(Flag::FallbackAssignment);
    }
    if unknown_substituted {
        flags.push(Flag::UnknownTypeSubstituted);
    }
    if attrs.ductility_token.is_none() {
        flags.push(Flag::ErdDefaulted);
    }
    if attrs.system.is_none() {
        flags.push(Flag::SystemMissing);
    }
    if attrs.height_bin.is_none() {
        flags.push(Flag::HeightMissing);
    }
    if modifiers_fired {
        flags.push(Flag::ModifierApplied);
    }
    flags
}

/// Assemble the full uncertainty block.
pub fn build_report(
    attrs: &AttributeSet,
    candidates: &[TypeCandidate],
    vc_base: &VcDistribution,
    vc_final: &VcDistribution,
    modifier_penalty: f64,
    flags: Vec<Flag>,
) -> UncertaintyReport {
    let (entropy, _) = type_entropy(candidates);
    UncertaintyReport {
        missing_attributes: missing_attributes(attrs),
        type_entropy: entropy,
        vc_entropy: vc_final.entropy(),
        vc_entropy_base: vc_base.entropy(),
        top1_margin: top1_margin(candidates),
        modifier_penalty,
        flags,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(label: &str, weight: f64, confidence: f64) -> TypeCandidate {
        TypeCandidate {
            label: label.to_string(),
            weight,
            confidence,
            rule_id: "TEST".to_string(),
            distributed: false,
        }
    }

    #[test]
    fn single_candidate_has_zero_entropy_and_full_margin() {
        let cands = vec![candidate("RC1-L", 1.0, 0.9)];
        let (h, h_norm) = type_entropy(&cands);
        assert_eq!(h, 0.0);
        assert_eq!(h_norm, 0.0);
        assert_eq!(top1_margin(&cands), 1.0);
    }

    #[test]
    fn two_even_candidates_have_maximal_normalized_entropy() {
        let cands = vec![candidate("M5", 0.5, 0.8), candidate("M6", 0.5, 0.8)];
        let (_, h_norm) = type_entropy(&cands);
        assert!((h_norm - 1.0).abs() < 1e-12);
        assert!(top1_margin(&cands).abs() < 1e-12);
    }

    #[test]
    fn weighted_confidence_mixes_by_weight() {
        let cands = vec![candidate("M5", 0.6, 0.8), candidate("M6", 0.4, 0.5)];
        let conf = weighted_type_confidence(&cands);
        assert!((conf - (0.6 * 0.8 + 0.4 * 0.5)).abs() < 1e-12);
    }

    #[test]
    fn final_confidence_clamps_to_unit_interval() {
        let cfg = EngineConfig::builtin();
        assert_eq!(final_confidence(&cfg, 2.0, 0.0, 1.0), 1.0);
        assert_eq!(final_confidence(&cfg, -0.5, 0.0, 1.0), 0.0);
        let c = final_confidence(&cfg, 0.8, 0.5, 0.9);
        assert!((c - 0.8 * (1.0 - 0.25 * 0.5) * 0.9).abs() < 1e-12);
    }

    #[test]
    fn missing_attributes_track_absent_fields() {
        let attrs = AttributeSet::default();
        assert_eq!(
            missing_attributes(&attrs),
            vec!["material", "system", "height", "ductility"]
        );
        let flags = collect_flags(&attrs, true, false, false);
        assert!(flags.contains(&Flag::ErdDefaulted));
        assert!(flags.contains(&Flag::SystemMissing));
        assert!(flags.contains(&Flag::HeightMissing));
        assert!(flags.contains(&Flag::FallbackAssignment));
        assert!(!flags.contains(&Flag::ModifierApplied));
    }
}
