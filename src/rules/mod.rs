//! Type assignment: the priority-ordered first-match decision list.
//!
//! Evaluation runs in two passes over the same rule table. The first pass
//! considers only family-assignment rules and derives the structural
//! family; the second pass considers the remaining rules with the family
//! available and stops at the first match. The validated configuration
//! guarantees the unconditional failsafe rule terminates the list, so
//! every attribute set receives at least one candidate.
//!
//! Condition evaluation never fails: a predicate over an absent attribute
//! is false, not an error.

use crate::config::{AttrKey, EngineConfig, RuleCondition, RuleOutput, TypeRule};
use crate::domain::{AttributeSet, TypeCandidate};

/// Everything the decision list produced for one input.
#[derive(Debug)]
pub struct AssignmentOutcome {
    /// Ranked candidates, best (highest weight) first.
    pub candidates: Vec<TypeCandidate>,
    pub warnings: Vec<String>,
    /// A weighted fallback group or the failsafe rule was used.
    pub fallback_used: bool,
    /// A rule produced a label outside the vocabulary.
    pub unknown_substituted: bool,
}

impl AssignmentOutcome {
    /// Label of the top-weighted candidate. The list is never empty.
    pub fn best_label(&self) -> &str {
        &self.candidates[0].label
    }
}

/// Run the decision list. Fills in `attrs.family` as a side effect of the
/// family pass; everything else is read-only.
pub fn assign_types(cfg: &EngineConfig, attrs: &mut AttributeSet) -> AssignmentOutcome {
    let mut warnings = Vec::new();

    // Pass 1: derive the structural family.
    for rule in &cfg.type_rules {
        let RuleOutput::Family(family) = &rule.output else { continue };
        if condition_matches(&rule.condition, attrs) {
            attrs.family = Some(*family);
            break;
        }
    }

    let base_conf = completeness_confidence(cfg, attrs);

    // Pass 2: first matching non-family rule wins.
    let mut candidates = Vec::new();
    let mut fallback_used = false;
    let mut unknown_substituted = false;

    for rule in &cfg.type_rules {
        if matches!(rule.output, RuleOutput::Family(_)) {
            continue;
        }
        if !condition_matches(&rule.condition, attrs) {
            continue;
        }
        let mut confidence = base_conf * rule.confidence_penalty;
        match &rule.output {
            RuleOutput::Family(_) => unreachable!(),
            RuleOutput::Label(label) => {
                let label = vocab_checked(
                    cfg,
                    label,
                    rule,
                    &mut confidence,
                    &mut warnings,
                    &mut unknown_substituted,
                );
                if rule.condition.is_empty() {
                    // The failsafe fired: nothing better than a guess.
                    fallback_used = true;
                    warnings.push("no assignment rule matched; failsafe type used".to_string());
                }
                candidates.push(TypeCandidate {
                    label,
                    weight: 1.0,
                    confidence,
                    rule_id: rule.id.clone(),
                    distributed: false,
                });
            }
            RuleOutput::Template(pattern) => {
                let erd = attrs.erd_or_default();
                let label = pattern.replace("{erd}", erd.letter());
                let label = vocab_checked(
                    cfg,
                    &label,
                    rule,
                    &mut confidence,
                    &mut warnings,
                    &mut unknown_substituted,
                );
                candidates.push(TypeCandidate {
                    label,
                    weight: 1.0,
                    confidence,
                    rule_id: rule.id.clone(),
                    distributed: false,
                });
            }
            RuleOutput::Fallback(name) => {
                // validate() guarantees the group exists and is non-empty.
                let Some(group) = cfg.fallback_group(name) else { continue };
                fallback_used = true;
                let total: f64 = group.members.iter().map(|(_, w)| w).sum();
                for (label, weight) in &group.members {
                    candidates.push(TypeCandidate {
                        label: label.clone(),
                        weight: weight / total,
                        confidence,
                        rule_id: rule.id.clone(),
                        distributed: true,
                    });
                }
            }
        }
        break;
    }

    if candidates.is_empty() {
        fallback_used = true;
        warnings.push("no assignment rule matched; failsafe type used".to_string());
        candidates.push(TypeCandidate {
            label: cfg.tuning.failsafe_label.clone(),
            weight: 1.0,
            confidence: base_conf * 0.2,
            rule_id: "FAILSAFE".to_string(),
            distributed: false,
        });
    }

    candidates.sort_by(|a, b| b.weight.total_cmp(&a.weight));

    AssignmentOutcome {
        candidates,
        warnings,
        fallback_used,
        unknown_substituted,
    }
}

/// Confidence ceiling for a candidate whose label had to be substituted.
const SUBSTITUTED_CONFIDENCE_CAP: f64 = 0.30;

fn vocab_checked(
    cfg: &EngineConfig,
    label: &str,
    rule: &TypeRule,
    confidence: &mut f64,
    warnings: &mut Vec<String>,
    unknown_substituted: &mut bool,
) -> String {
    if cfg.vocabulary.contains(label) {
        label.to_string()
    } else {
        *unknown_substituted = true;
        *confidence = confidence.min(SUBSTITUTED_CONFIDENCE_CAP);
        warnings.push(format!(
            "rule '{}' produced unknown type '{label}'; substituting '{}'",
            rule.id, cfg.tuning.failsafe_label
        ));
        cfg.tuning.failsafe_label.clone()
    }
}

/// AND across present fields, OR within each list field.
fn condition_matches(cond: &RuleCondition, attrs: &AttributeSet) -> bool {
    if let Some(any) = &cond.material_any {
        let in_any = |t: &String| any.contains(t);
        let hit = attrs.material.as_ref().is_some_and(|m| any.contains(m))
            || attrs.material_l2.iter().any(in_any)
            || attrs.material_all.iter().any(in_any);
        if !hit {
            return false;
        }
    }
    if let Some(any) = &cond.material_l2_any {
        if !attrs.material_l2.iter().any(|t| any.contains(t)) {
            return false;
        }
    }
    if let Some(any) = &cond.system_any {
        if !attrs.system.as_ref().is_some_and(|s| any.contains(s)) {
            return false;
        }
    }
    if let Some(family) = cond.family_is {
        if attrs.family != Some(family) {
            return false;
        }
    }
    if let Some(keys) = &cond.missing_any {
        let missing = |k: &AttrKey| match k {
            AttrKey::Material => attrs.material.is_none(),
            AttrKey::System => attrs.system.is_none(),
            AttrKey::Height => attrs.storeys.is_none(),
            AttrKey::Ductility => attrs.ductility_token.is_none(),
        };
        if !keys.iter().any(missing) {
            return false;
        }
    }
    true
}

/// Base confidence from the attribute-completeness rubric.
pub fn completeness_confidence(cfg: &EngineConfig, attrs: &AttributeSet) -> f64 {
    let r = &cfg.rubric;
    let has_mat = attrs.material.is_some();
    let has_sys = attrs.system.is_some();
    let has_h = attrs.height_bin.is_some();
    let has_erd = attrs.erd.is_some() && attrs.ductility_token.is_some();
    match (has_mat, has_sys, has_h, has_erd) {
        (true, true, true, true) => r.material_system_height_erd,
        (true, true, true, false) => r.material_system_height,
        (true, _, true, _) => r.material_height,
        (true, _, _, _) => r.material_only,
        _ => r.partial,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Family;
    use crate::parser::GemParser;

    fn assign(input: &str) -> (AssignmentOutcome, AttributeSet) {
        let cfg = EngineConfig::builtin();
        let (mut attrs, _) = GemParser::new(&cfg).parse(input);
        let outcome = assign_types(&cfg, &mut attrs);
        (outcome, attrs)
    }

    #[test]
    fn rc_frame_templates_by_erd() {
        let (o, a) = assign("CR/LFM+CDL+DUL/H:2/RES");
        assert_eq!(a.family, Some(Family::Rc));
        assert_eq!(o.best_label(), "RC1-L");

        let (o, _) = assign("CR/LFM+CDM+DUM/H:2/RES");
        assert_eq!(o.best_label(), "RC1-M");

        let (o, _) = assign("CR/LFM+DUC/H:2/RES");
        assert_eq!(o.best_label(), "RC1-H");
    }

    #[test]
    fn rc_wall_and_dual_and_flatslab() {
        assert_eq!(assign("CR/LWAL+CDM+DUM/H:5/IND").0.best_label(), "RC2-M");
        assert_eq!(assign("CR/LDUAL+CDL+DUL/H:5").0.best_label(), "RC3-L");
        assert_eq!(assign("CR/LFLS/H:5").0.best_label(), "RC4");
    }

    #[test]
    fn precast_material_selects_precast_types() {
        assert_eq!(assign("CR+PC/LFM+CDL+DUL/H:1/IND").0.best_label(), "RC5-L");
        assert_eq!(assign("CR+PC/LWAL+CDM+DUM/H:3/IND").0.best_label(), "RC6-M");
    }

    #[test]
    fn masonry_unit_rules() {
        assert_eq!(assign("MUR+STRUB/LWAL+DNO/H:2/IND").0.best_label(), "M1");
        assert_eq!(assign("MUR+ADO/LWAL/H:1").0.best_label(), "M2");
        assert_eq!(assign("MCF/LWAL/H:2").0.best_label(), "M7");
    }

    #[test]
    fn brick_masonry_spreads_over_m5_m6() {
        let (o, _) = assign("MUR+CL99/LWAL/H:2");
        assert!(o.fallback_used);
        assert_eq!(o.candidates.len(), 2);
        assert_eq!(o.best_label(), "M5");
        assert!((o.candidates[0].weight - 0.60).abs() < 1e-9);
        assert!((o.candidates[1].weight - 0.40).abs() < 1e-9);
        let total: f64 = o.candidates.iter().map(|c| c.weight).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn concrete_block_spreads_over_m5_m6_m7() {
        let (o, _) = assign("MUR+CBH/LWAL+DNO/H:4/IND");
        assert!(o.fallback_used);
        let labels: Vec<&str> = o.candidates.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["M5", "M6", "M7"]);
    }

    #[test]
    fn steel_and_timber_families() {
        let (o, a) = assign("S/LFBR/H:3");
        assert_eq!(a.family, Some(Family::Steel));
        assert!(o.fallback_used);
        assert_eq!(o.best_label(), "S-M/H");

        let (o, _) = assign("SL/LFM/H:1");
        assert_eq!(o.best_label(), "S-L");

        let (o, a) = assign("W+WLI/LWAL/H:2");
        assert_eq!(a.family, Some(Family::Timber));
        assert_eq!(o.best_label(), "T2-M/H");
    }

    #[test]
    fn rc_with_missing_system_uses_fallback_group() {
        let (o, _) = assign("CR/H:5");
        assert!(o.fallback_used);
        assert_eq!(o.best_label(), "RC1-L");
        assert_eq!(o.candidates.len(), 3);
    }

    #[test]
    fn out_of_vocabulary_template_substitutes_failsafe() {
        // No RC5-H entry exists, so the high-ductility precast template
        // resolves to a label outside the vocabulary.
        let (o, _) = assign("CR+PC/LFM+DUC/H:3");
        assert!(o.unknown_substituted);
        assert_eq!(o.best_label(), "M4");
        assert!(o.candidates[0].confidence <= 0.30);
        assert!(o.warnings.iter().any(|w| w.contains("RC5-H")));
    }

    #[test]
    fn unmatched_input_hits_the_failsafe() {
        let (o, a) = assign("XX/FOO");
        assert_eq!(a.family, None);
        assert_eq!(o.best_label(), "M4");
        assert!(o.fallback_used);
        assert!(!o.warnings.is_empty());
    }

    #[test]
    fn completeness_rubric_tiers() {
        let cfg = EngineConfig::builtin();
        let parse = |s: &str| GemParser::new(&cfg).parse(s).0;
        assert!(
            (completeness_confidence(&cfg, &parse("CR/LWAL+CDM+DUM/H:5")) - 0.95).abs() < 1e-12
        );
        assert!((completeness_confidence(&cfg, &parse("CR/LWAL/H:5")) - 0.80).abs() < 1e-12);
        assert!((completeness_confidence(&cfg, &parse("CR/H:5")) - 0.60).abs() < 1e-12);
        assert!((completeness_confidence(&cfg, &parse("CR")) - 0.40).abs() < 1e-12);
        assert!((completeness_confidence(&cfg, &parse("")) - 0.20).abs() < 1e-12);
    }
}
