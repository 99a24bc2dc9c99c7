//! Translation orchestration.
//!
//! [`Translator`] owns a validated [`EngineConfig`] and exposes the two
//! entry points: [`Translator::translate_one`] for a single taxonomy
//! string and [`Translator::translate_batch`] for a slice of them.
//! Translation is a pure function of the input string and the immutable
//! configuration, so batches run embarrassingly parallel on the rayon
//! pool with per-string results identical to sequential runs.
//!
//! Per-string translation never fails: parse problems degrade to
//! warnings and the failsafe type, never to an error. The only fallible
//! step is construction, which rejects invalid configuration tables.

use rayon::prelude::*;

use crate::config::{EngineConfig, ExactOverride};
use crate::domain::{
    Flag, ResultSummary, TranslationResult, TypeCandidate, UncertaintyReport, VcDistribution,
};
use crate::error::ConfigError;
use crate::modifiers;
use crate::parser::GemParser;
use crate::rules;
use crate::uncertainty;

/// Stateless translation engine over one immutable configuration.
pub struct Translator {
    cfg: EngineConfig,
}

impl Translator {
    /// Validate the configuration and build a translator. Table-authoring
    /// defects surface here, once, instead of during translation.
    pub fn new(mut cfg: EngineConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    /// Translate one taxonomy string. Never fails: every input, however
    /// malformed, yields a complete result.
    pub fn translate_one(&self, input: &str) -> TranslationResult {
        let input = input.trim();

        if let Some(ov) = self.cfg.override_for(input) {
            return self.apply_override(ov, input);
        }

        let (mut attrs, mut warnings) = GemParser::new(&self.cfg).parse(input);
        let assignment = rules::assign_types(&self.cfg, &mut attrs);
        warnings.extend(assignment.warnings);

        let vc_base = mix_base_distribution(&self.cfg, &assignment.candidates);
        let governing = assignment.candidates[0].label.clone();

        let shifted = modifiers::apply_modifiers(&self.cfg, &attrs, vc_base, &governing);

        let (_, normalized_entropy) = uncertainty::type_entropy(&assignment.candidates);
        let type_confidence = uncertainty::weighted_type_confidence(&assignment.candidates);
        let confidence = uncertainty::final_confidence(
            &self.cfg,
            type_confidence,
            normalized_entropy,
            shifted.penalty_product,
        );

        let flags = uncertainty::collect_flags(
            &attrs,
            assignment.fallback_used,
            assignment.unknown_substituted,
            !shifted.fired.is_empty(),
        );

        let mass = self.cfg.tuning.credible_mass;
        let summary = ResultSummary {
            best_type: governing,
            best_type_weight: assignment.candidates[0].weight,
            modal_class: shifted.distribution.mode(),
            modal_class_base: vc_base.mode(),
            credible_range_80: shifted.distribution.credible_range(mass),
            credible_range_80_base: vc_base.credible_range(mass),
            exact_override: false,
            modifiers_fired: shifted.fired.len(),
            cumulative_shift: shifted.cumulative_shift,
        };
        let report = uncertainty::build_report(
            &attrs,
            &assignment.candidates,
            &vc_base,
            &shifted.distribution,
            shifted.penalty_product,
            flags,
        );

        TranslationResult {
            input: input.to_string(),
            attributes: attrs,
            candidates: assignment.candidates,
            vc_probs: shifted.distribution,
            vc_probs_base: vc_base,
            vc_class: shifted.distribution.mode(),
            vc_class_base: vc_base.mode(),
            vc_class_int: shifted.distribution.mode().number(),
            vc_class_base_int: vc_base.mode().number(),
            fired_modifiers: shifted.fired,
            confidence,
            warnings,
            summary,
            uncertainty: report,
        }
    }

    /// Translate a batch in parallel; output order matches input order.
    pub fn translate_batch<S>(&self, inputs: &[S]) -> Vec<TranslationResult>
    where
        S: AsRef<str> + Sync,
    {
        inputs
            .par_iter()
            .map(|s| self.translate_one(s.as_ref()))
            .collect()
    }

    /// Verified input: bypass rules and modifiers entirely.
    fn apply_override(&self, ov: &ExactOverride, input: &str) -> TranslationResult {
        let (attrs, _) = GemParser::new(&self.cfg).parse(input);

        // validate() guarantees the label is in the vocabulary.
        let prior = self
            .cfg
            .vocabulary
            .get(&ov.label)
            .map(|e| e.prior.normalized())
            .unwrap_or_else(|| VcDistribution::uniform_in(0, 5));
        let vc_final = match ov.vc_class {
            Some(class) => VcDistribution::point_mass(class),
            None => prior,
        };

        let candidates = vec![TypeCandidate {
            label: ov.label.clone(),
            weight: 1.0,
            confidence: ov.confidence,
            rule_id: "EXACT_OVERRIDE".to_string(),
            distributed: false,
        }];

        let mass = self.cfg.tuning.credible_mass;
        let summary = ResultSummary {
            best_type: ov.label.clone(),
            best_type_weight: 1.0,
            modal_class: vc_final.mode(),
            modal_class_base: prior.mode(),
            credible_range_80: vc_final.credible_range(mass),
            credible_range_80_base: prior.credible_range(mass),
            exact_override: true,
            modifiers_fired: 0,
            cumulative_shift: 0.0,
        };
        let report = UncertaintyReport {
            missing_attributes: Vec::new(),
            type_entropy: 0.0,
            vc_entropy: vc_final.entropy(),
            vc_entropy_base: prior.entropy(),
            top1_margin: 1.0,
            modifier_penalty: 1.0,
            flags: vec![Flag::ExactOverride],
        };

        TranslationResult {
            input: input.to_string(),
            attributes: attrs,
            candidates,
            vc_probs: vc_final,
            vc_probs_base: prior,
            vc_class: vc_final.mode(),
            vc_class_base: prior.mode(),
            vc_class_int: vc_final.mode().number(),
            vc_class_base_int: prior.mode().number(),
            fired_modifiers: Vec::new(),
            confidence: ov.confidence,
            warnings: Vec::new(),
            summary,
            uncertainty: report,
        }
    }
}

/// Mix candidate priors into one base distribution:
/// `p_base(vc) = sum over candidates of weight * prior(vc | type)`.
fn mix_base_distribution(cfg: &EngineConfig, candidates: &[TypeCandidate]) -> VcDistribution {
    let mut mixed = VcDistribution::zero();
    for c in candidates {
        if let Some(entry) = cfg.vocabulary.get(&c.label) {
            for (slot, p) in mixed.0.iter_mut().zip(entry.prior.0.iter()) {
                *slot += c.weight * p;
            }
        }
    }
    mixed.normalized()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::VcClass;

    fn translator() -> Translator {
        Translator::new(EngineConfig::builtin()).unwrap()
    }

    #[test]
    fn infilled_rc_frame_scenario() {
        let t = translator();
        let r = t.translate_one("CR/LFINF(MUR+CBH)+CDL+DUL/H:3/IND");

        assert_eq!(r.summary.best_type, "RC1-L");
        assert_eq!(r.fired_modifiers.len(), 1);
        assert_eq!(r.fired_modifiers[0].id, "INFILL_MASONRY_FROM_LFINF");
        assert!((r.summary.cumulative_shift - 0.25).abs() < 1e-12);
        // 0.95 rubric x 0.95 rule penalty x 0.92 modifier penalty.
        assert!((r.confidence - 0.8303).abs() < 1e-4);
        assert!(r.confidence > 0.75 && r.confidence < 0.90);
        // The quarter-step toward A lowers the mean class.
        assert!(r.vc_probs.mean_class_number() < r.vc_probs_base.mean_class_number());
        assert!(r.uncertainty.flags.contains(&Flag::ModifierApplied));
    }

    #[test]
    fn rc_wall_without_modifiers() {
        let t = translator();
        let r = t.translate_one("CR/LWAL+CDM+DUM/H:5/IND");
        assert_eq!(r.summary.best_type, "RC2-M");
        assert_eq!(r.vc_class, VcClass::D);
        assert!(r.fired_modifiers.is_empty());
        assert!((r.confidence - 0.9025).abs() < 1e-4);
        assert_eq!(r.vc_probs, r.vc_probs_base);
    }

    #[test]
    fn rubble_masonry_pins_to_class_a() {
        let t = translator();
        let r = t.translate_one("MUR+STRUB/LWAL+DNO/H:2/IND");
        assert_eq!(r.summary.best_type, "M1");
        assert_eq!(r.vc_class, VcClass::A);
        assert_eq!(r.summary.credible_range_80.low, VcClass::A);
        assert_eq!(r.summary.credible_range_80.high, VcClass::A);
        assert!((r.confidence - 0.7695).abs() < 1e-4);
    }

    #[test]
    fn concrete_block_fallback_mixes_three_priors() {
        let t = translator();
        let r = t.translate_one("MUR+CBH/LWAL+DNO/H:4/IND");
        assert_eq!(r.summary.best_type, "M5");
        assert_eq!(r.candidates.len(), 3);
        // 0.55*M5 + 0.30*M6 + 0.15*M7 priors.
        let expected = [0.1375, 0.35, 0.325, 0.15, 0.0375, 0.0];
        for (got, want) in r.vc_probs_base.0.iter().zip(expected) {
            assert!((got - want).abs() < 1e-9);
        }
        assert!((r.confidence - 0.5323).abs() < 1e-3);
        assert!(r.uncertainty.flags.contains(&Flag::FallbackAssignment));
        assert!(r.uncertainty.flags.contains(&Flag::ModifierApplied));
        assert_eq!(r.vc_class, VcClass::B);
    }

    #[test]
    fn garbage_input_degrades_to_failsafe() {
        let t = translator();
        let r = t.translate_one("XX/FOO");
        assert_eq!(r.summary.best_type, "M4");
        assert!((r.confidence - 0.04).abs() < 1e-9);
        assert!(!r.warnings.is_empty());
        for flag in [
            Flag::FallbackAssignment,
            Flag::ErdDefaulted,
            Flag::SystemMissing,
            Flag::HeightMissing,
        ] {
            assert!(r.uncertainty.flags.contains(&flag), "missing {flag:?}");
        }
        assert_eq!(
            r.uncertainty.missing_attributes,
            vec!["material", "system", "height", "ductility"]
        );
        assert!(r.confidence < 0.5);
    }

    #[test]
    fn empty_input_still_produces_a_result() {
        let t = translator();
        let r = t.translate_one("");
        assert_eq!(r.summary.best_type, "M4");
        assert_eq!(r.vc_class, VcClass::C);
        assert!(r.candidates.len() == 1);
        assert!((r.vc_probs.sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn distributions_always_sum_to_one_and_respect_bounds() {
        let t = translator();
        let inputs = [
            "CR/LFINF(MUR+CBH)+CDL+DUL/H:3/IND",
            "CR/LWAL+CDM+DUM/H:5/IND",
            "MUR+STRUB/LWAL+DNO/H:2/IND",
            "MUR+CBH/LWAL+DNO/H:4/IND",
            "S/LFBR/H:12",
            "W+WLI/LWAL/H:2/YEX:1900",
            "XX/FOO",
            "",
        ];
        for input in inputs {
            let r = t.translate_one(input);
            assert!((r.vc_probs.sum() - 1.0).abs() < 1e-6, "{input}");
            assert!((r.vc_probs_base.sum() - 1.0).abs() < 1e-6, "{input}");
            assert!(r.vc_probs.0.iter().all(|&p| p >= 0.0), "{input}");
            assert!(
                r.summary.cumulative_shift.abs()
                    <= t.config().tuning.max_cumulative_shift + 1e-12,
                "{input}"
            );
            let entry = t.config().vocabulary.get(&r.summary.best_type).unwrap();
            let (lo, hi) = (entry.range_min.index(), entry.range_max.index());
            for (i, &p) in r.vc_probs.0.iter().enumerate() {
                if i < lo || i > hi {
                    assert_eq!(p, 0.0, "{input} leaks mass outside bounds");
                }
            }
        }
    }

    #[test]
    fn translation_is_deterministic() {
        let t = translator();
        let input = "MUR+CBH/LWAL+DNO/H:4/YEX:1950/BP3/IND";
        let a = t.translate_one(input);
        let b = t.translate_one(input);
        assert_eq!(a.vc_probs, b.vc_probs);
        assert_eq!(a.confidence, b.confidence);
        assert_eq!(a.summary.cumulative_shift, b.summary.cumulative_shift);
    }

    #[test]
    fn batch_matches_sequential_and_preserves_order() {
        let t = translator();
        let inputs: Vec<String> = [
            "CR/LFM+CDL+DUL/H:2",
            "MUR+ADO/LWAL/H:1",
            "S/LFBR/H:12",
            "XX/FOO",
            "CR/LWAL+CDM+DUM/H:5/IND",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let batch = t.translate_batch(&inputs);
        assert_eq!(batch.len(), inputs.len());
        for (input, result) in inputs.iter().zip(&batch) {
            let solo = t.translate_one(input);
            assert_eq!(result.input, input.trim());
            assert_eq!(result.summary.best_type, solo.summary.best_type);
            assert_eq!(result.vc_probs, solo.vc_probs);
            assert_eq!(result.confidence, solo.confidence);
        }
    }

    #[test]
    fn exact_override_bypasses_rules_and_modifiers() {
        let mut cfg = EngineConfig::builtin();
        cfg.overrides.push(ExactOverride {
            input: "CR/LWAL+DNO/H:5/IND".to_string(),
            label: "RC2-M".to_string(),
            vc_class: Some(VcClass::D),
            confidence: 0.99,
            doc: "Field-verified tower block series.".to_string(),
        });
        let t = Translator::new(cfg).unwrap();

        let r = t.translate_one("CR/LWAL+DNO/H:5/IND");
        assert!(r.summary.exact_override);
        assert_eq!(r.summary.best_type, "RC2-M");
        assert_eq!(r.vc_class, VcClass::D);
        assert_eq!(r.vc_probs, VcDistribution::point_mass(VcClass::D));
        assert!(r.fired_modifiers.is_empty());
        assert_eq!(r.confidence, 0.99);
        assert_eq!(r.uncertainty.flags, vec![Flag::ExactOverride]);

        // The same attributes without the override do fire DNO.
        let plain = translator().translate_one("CR/LWAL+DNO/H:5/RES");
        assert!(!plain.fired_modifiers.is_empty());
    }

    #[test]
    fn invalid_config_is_rejected_at_construction() {
        let mut cfg = EngineConfig::builtin();
        cfg.type_rules.retain(|r| !r.condition.is_empty());
        assert!(Translator::new(cfg).is_err());
    }

    #[test]
    fn unknown_template_label_is_substituted_and_flagged() {
        // The high-ductility precast template has no vocabulary entry.
        let t = translator();
        let r = t.translate_one("CR+PC/LFM+DUC/H:3");
        assert_eq!(r.summary.best_type, "M4");
        assert!(r.uncertainty.flags.contains(&Flag::UnknownTypeSubstituted));
        assert!(r.warnings.iter().any(|w| w.contains("RC5-H")));
        assert!(r.confidence <= 0.30);
    }

    #[test]
    fn results_serialize_to_json() {
        let t = translator();
        let r = t.translate_one("CR/LFINF(MUR+CBH)+CDL+DUL/H:3/IND");
        let json = serde_json::to_string(&r).unwrap();
        let back: TranslationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.summary.best_type, r.summary.best_type);
        assert_eq!(back.vc_probs, r.vc_probs);
        assert!(json.contains("\"RC1-L\""));
        // Modal classes carry both the letter and the 1..=6 scale value.
        assert_eq!(r.vc_class_int, r.vc_class.number());
        assert!(json.contains("\"vc_class_int\""));
        assert!(json.contains("\"vc_class_base_int\""));
    }
}
