//! Immutable engine configuration.
//!
//! Everything the engine interprets at translation time lives here as plain
//! read-only data: the EMS type vocabulary, the ductility mapping, material
//! aliases, the ordered type-assignment rules, fallback prior groups, exact
//! overrides, the modifier rules, and tuning constants. The tables are
//! externally-authored domain knowledge; the engine treats them as opaque.
//!
//! [`EngineConfig::validate`] catches authoring defects once, at
//! construction time, so per-string translation never has to.

mod builtin;

use std::collections::HashMap;

use crate::domain::{ErdLevel, Family, VcClass, VcDistribution};
use crate::error::ConfigError;

/// One EMS/IMS building type with its VC prior and admissible class range.
#[derive(Debug, Clone)]
pub struct TypeEntry {
    pub label: String,
    pub family: Family,
    pub description: String,
    /// Prior VC distribution; must sum to 1 and stay inside the range.
    pub prior: VcDistribution,
    pub most_likely: VcClass,
    /// Hard lower bound (most vulnerable admissible class).
    pub range_min: VcClass,
    /// Hard upper bound (least vulnerable admissible class).
    pub range_max: VcClass,
}

/// Static table of all EMS types, looked up by label.
#[derive(Debug, Clone, Default)]
pub struct TypeVocabulary {
    pub entries: Vec<TypeEntry>,
}

impl TypeVocabulary {
    pub fn new(entries: Vec<TypeEntry>) -> Self {
        Self { entries }
    }

    pub fn get(&self, label: &str) -> Option<&TypeEntry> {
        self.entries.iter().find(|e| e.label == label)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeEntry> {
        self.entries.iter()
    }
}

/// One (code level, ductility token) pair resolved to an ERD level/score.
#[derive(Debug, Clone)]
pub struct DuctilityEntry {
    pub code_level: Option<String>,
    pub ductility: Option<String>,
    pub erd: ErdLevel,
    pub score: f64,
}

/// Attribute referenced by a `missing_any` rule condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrKey {
    Material,
    System,
    Height,
    Ductility,
}

impl AttrKey {
    pub fn as_str(self) -> &'static str {
        match self {
            AttrKey::Material => "material",
            AttrKey::System => "system",
            AttrKey::Height => "height",
            AttrKey::Ductility => "ductility",
        }
    }
}

/// Condition of a type-assignment rule. Absent fields are vacuously true;
/// all present fields must hold (AND); list fields mean "any of" (OR).
#[derive(Debug, Clone, Default)]
pub struct RuleCondition {
    /// Material L1, L2 or secondary-material token any-of.
    pub material_any: Option<Vec<String>>,
    /// Material L2 token any-of.
    pub material_l2_any: Option<Vec<String>>,
    /// System L1 token any-of.
    pub system_any: Option<Vec<String>>,
    /// Derived family equals.
    pub family_is: Option<Family>,
    /// At least one of these attributes is absent.
    pub missing_any: Option<Vec<AttrKey>>,
}

impl RuleCondition {
    /// True when no field constrains anything (the failsafe shape).
    pub fn is_empty(&self) -> bool {
        self.material_any.is_none()
            && self.material_l2_any.is_none()
            && self.system_any.is_none()
            && self.family_is.is_none()
            && self.missing_any.is_none()
    }
}

/// What a type-assignment rule produces when it fires.
#[derive(Debug, Clone)]
pub enum RuleOutput {
    /// Sets the derived structural family (first evaluation pass only).
    Family(Family),
    /// A single deterministic EMS type label.
    Label(String),
    /// A label pattern with `{erd}` substituted from the derived ERD level.
    Template(String),
    /// A named weighted-candidate group from the fallback priors.
    Fallback(String),
}

/// One entry of the ordered type-assignment decision list.
#[derive(Debug, Clone)]
pub struct TypeRule {
    pub id: String,
    /// Lower evaluates first.
    pub priority: u32,
    pub condition: RuleCondition,
    pub output: RuleOutput,
    /// Multiplied into the completeness confidence when the rule fires.
    pub confidence_penalty: f64,
    pub doc: String,
}

/// Named weighted group of EMS types used by `RuleOutput::Fallback`.
#[derive(Debug, Clone)]
pub struct FallbackGroup {
    pub name: String,
    /// (label, weight) pairs; weights are normalized at use.
    pub members: Vec<(String, f64)>,
}

/// Verified input string that bypasses the whole rule pipeline.
#[derive(Debug, Clone)]
pub struct ExactOverride {
    pub input: String,
    pub label: String,
    /// When set, the final distribution is a point mass on this class.
    pub vc_class: Option<VcClass>,
    pub confidence: f64,
    pub doc: String,
}

/// Condition of a modifier rule. Same AND/OR convention as
/// [`RuleCondition`]; the two irregularity lists additionally accept
/// `Some(vec![])` meaning "no irregularity of that kind was parsed".
#[derive(Debug, Clone, Default)]
pub struct ModifierCondition {
    pub family_any: Option<Vec<Family>>,
    pub material_any: Option<Vec<String>>,
    pub material_l2_any: Option<Vec<String>>,
    pub material_l3_any: Option<Vec<String>>,
    pub system_any: Option<Vec<String>>,
    pub infill_any: Option<Vec<String>>,
    pub erd_is: Option<ErdLevel>,
    pub erd_score_below: Option<f64>,
    pub erd_score_at_least: Option<f64>,
    pub ductility_any: Option<Vec<String>>,
    pub code_level_is: Option<String>,
    pub height_bin_any: Option<Vec<crate::domain::HeightBin>>,
    pub storeys_above: Option<u32>,
    pub year_known: Option<bool>,
    pub year_before: Option<i32>,
    pub year_from: Option<i32>,
    pub occupancy_is: Option<String>,
    pub occupancy_detail_any: Option<Vec<String>>,
    pub position_any: Option<Vec<String>>,
    pub plan_shape_any: Option<Vec<String>>,
    pub irregularity_l1_is: Option<String>,
    pub irregularity_plan_any: Option<Vec<String>>,
    pub irregularity_vertical_any: Option<Vec<String>>,
    pub roof_covering_any: Option<Vec<String>>,
    /// Prefix match against the roof system-material token.
    pub roof_system_prefix_any: Option<Vec<String>>,
    pub roof_connection_any: Option<Vec<String>>,
    /// Prefix match against the floor-material token.
    pub floor_material_prefix_any: Option<Vec<String>>,
    pub floor_connection_is: Option<String>,
    pub foundation_any: Option<Vec<String>>,
    pub exterior_wall_any: Option<Vec<String>>,
    /// Matches against the assigned (top-weighted) EMS type label.
    pub assigned_type_any: Option<Vec<String>>,
}

/// One conditional reshaping rule for the VC distribution.
#[derive(Debug, Clone)]
pub struct ModifierRule {
    pub id: String,
    pub condition: ModifierCondition,
    /// Positive = more vulnerable (toward A); negative = toward F.
    pub shift: f64,
    /// Multiplied into the final confidence when the rule fires; in (0, 1].
    pub confidence_penalty: f64,
    /// Optional cap on this rule's contribution to the cumulative shift.
    pub max_contribution: Option<f64>,
    pub doc: String,
}

/// Base confidence by attribute completeness, before rule penalties.
#[derive(Debug, Clone, Copy)]
pub struct CompletenessRubric {
    pub material_system_height_erd: f64,
    pub material_system_height: f64,
    pub material_height: f64,
    pub material_only: f64,
    pub partial: f64,
}

/// Global tuning constants.
#[derive(Debug, Clone)]
pub struct Tuning {
    /// Cap on |cumulative shift| across all fired modifiers.
    pub max_cumulative_shift: f64,
    /// How strongly type-candidate entropy penalizes confidence.
    pub entropy_alpha: f64,
    /// Probability mass the credible range must cover.
    pub credible_mass: f64,
    /// Label substituted for out-of-vocabulary outputs and used by the
    /// failsafe rule.
    pub failsafe_label: String,
}

/// The complete immutable configuration handed to the engine.
///
/// Construct via [`EngineConfig::builtin`] or assemble custom tables and run
/// [`EngineConfig::validate`] through `Translator::new`. Multiple engines
/// with different configurations can coexist without interference.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub vocabulary: TypeVocabulary,
    pub ductility_map: Vec<DuctilityEntry>,
    pub material_aliases: HashMap<String, String>,
    /// Sorted ascending by priority in `validate`.
    pub type_rules: Vec<TypeRule>,
    pub fallback_groups: Vec<FallbackGroup>,
    pub overrides: Vec<ExactOverride>,
    pub modifiers: Vec<ModifierRule>,
    pub rubric: CompletenessRubric,
    pub tuning: Tuning,
}

impl EngineConfig {
    /// The built-in tables distilled from the EMS-98/IMS documentation.
    pub fn builtin() -> Self {
        builtin::build()
    }

    /// Resolve a material shorthand through the alias table.
    pub fn resolve_alias<'a>(&'a self, token: &'a str) -> &'a str {
        match self.material_aliases.get(token) {
            Some(target) => target.as_str(),
            None => token,
        }
    }

    /// ERD lookup with the documented fallback order:
    /// (code, ductility) -> (code, None) -> (None, ductility) -> (None, None).
    pub fn resolve_erd(
        &self,
        code_level: Option<&str>,
        ductility: Option<&str>,
    ) -> (ErdLevel, f64) {
        let find = |c: Option<&str>, d: Option<&str>| {
            self.ductility_map
                .iter()
                .find(|e| e.code_level.as_deref() == c && e.ductility.as_deref() == d)
        };
        let entry = find(code_level, ductility)
            .or_else(|| find(code_level, None))
            .or_else(|| find(None, ductility))
            .or_else(|| find(None, None));
        match entry {
            Some(e) => (e.erd, e.score),
            // validate() guarantees a (None, None) entry; stay safe anyway.
            None => (ErdLevel::L, 0.10),
        }
    }

    pub fn fallback_group(&self, name: &str) -> Option<&FallbackGroup> {
        self.fallback_groups.iter().find(|g| g.name == name)
    }

    pub fn override_for(&self, input: &str) -> Option<&ExactOverride> {
        self.overrides.iter().find(|o| o.input == input)
    }

    /// Check authoring invariants and sort the rule list by priority.
    ///
    /// Violations here are configuration defects, not runtime conditions;
    /// they surface once, when the engine is constructed.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        for entry in self.vocabulary.iter() {
            let sum = entry.prior.sum();
            if (sum - 1.0).abs() > 1e-6 {
                return Err(ConfigError::new(format!(
                    "vocabulary prior for '{}' sums to {sum}, expected 1",
                    entry.label
                )));
            }
            let lo = entry.range_min.index();
            let hi = entry.range_max.index();
            if lo > hi {
                return Err(ConfigError::new(format!(
                    "vocabulary range for '{}' is inverted",
                    entry.label
                )));
            }
            for (i, &p) in entry.prior.0.iter().enumerate() {
                if p < 0.0 {
                    return Err(ConfigError::new(format!(
                        "vocabulary prior for '{}' has a negative entry",
                        entry.label
                    )));
                }
                if (i < lo || i > hi) && p > 0.0 {
                    return Err(ConfigError::new(format!(
                        "vocabulary prior for '{}' has mass outside its admissible range",
                        entry.label
                    )));
                }
            }
        }

        if !self.vocabulary.contains(&self.tuning.failsafe_label) {
            return Err(ConfigError::new(format!(
                "failsafe label '{}' is not in the vocabulary",
                self.tuning.failsafe_label
            )));
        }

        self.type_rules.sort_by_key(|r| r.priority);
        let failsafe_ok = self.type_rules.last().is_some_and(|r| {
            r.condition.is_empty() && matches!(&r.output, RuleOutput::Label(l) if self.vocabulary.contains(l))
        });
        if !failsafe_ok {
            return Err(ConfigError::new(
                "type rules must end with an unconditional failsafe rule \
                 producing a vocabulary label",
            ));
        }

        for rule in &self.type_rules {
            if !(rule.confidence_penalty > 0.0 && rule.confidence_penalty <= 1.0) {
                return Err(ConfigError::new(format!(
                    "type rule '{}' has confidence penalty outside (0, 1]",
                    rule.id
                )));
            }
            if let RuleOutput::Fallback(name) = &rule.output {
                if self.fallback_group(name).is_none() {
                    return Err(ConfigError::new(format!(
                        "type rule '{}' references unknown fallback group '{name}'",
                        rule.id
                    )));
                }
            }
        }

        for group in &self.fallback_groups {
            if group.members.is_empty() {
                return Err(ConfigError::new(format!(
                    "fallback group '{}' is empty",
                    group.name
                )));
            }
            for (label, weight) in &group.members {
                if !self.vocabulary.contains(label) {
                    return Err(ConfigError::new(format!(
                        "fallback group '{}' member '{label}' is not in the vocabulary",
                        group.name
                    )));
                }
                if *weight <= 0.0 {
                    return Err(ConfigError::new(format!(
                        "fallback group '{}' member '{label}' has non-positive weight",
                        group.name
                    )));
                }
            }
        }

        for ov in &self.overrides {
            if !self.vocabulary.contains(&ov.label) {
                return Err(ConfigError::new(format!(
                    "exact override for '{}' names unknown type '{}'",
                    ov.input, ov.label
                )));
            }
        }

        for m in &self.modifiers {
            if !(m.confidence_penalty > 0.0 && m.confidence_penalty <= 1.0) {
                return Err(ConfigError::new(format!(
                    "modifier '{}' has confidence penalty outside (0, 1]",
                    m.id
                )));
            }
            if m.max_contribution.is_some_and(|c| c <= 0.0) {
                return Err(ConfigError::new(format!(
                    "modifier '{}' has non-positive max_contribution",
                    m.id
                )));
            }
        }

        let has_default_erd = self
            .ductility_map
            .iter()
            .any(|e| e.code_level.is_none() && e.ductility.is_none());
        if !has_default_erd {
            return Err(ConfigError::new(
                "ductility map is missing the (none, none) default entry",
            ));
        }

        if self.tuning.max_cumulative_shift <= 0.0 {
            return Err(ConfigError::new("max_cumulative_shift must be positive"));
        }
        if !(0.0..=1.0).contains(&self.tuning.entropy_alpha) {
            return Err(ConfigError::new("entropy_alpha must lie in [0, 1]"));
        }
        if !(0.0 < self.tuning.credible_mass && self.tuning.credible_mass <= 1.0) {
            return Err(ConfigError::new("credible_mass must lie in (0, 1]"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_config_validates() {
        let mut cfg = EngineConfig::builtin();
        cfg.validate().unwrap();
    }

    #[test]
    fn validate_rejects_bad_prior() {
        let mut cfg = EngineConfig::builtin();
        cfg.vocabulary.entries[0].prior = VcDistribution([0.5; 6]);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_missing_failsafe() {
        let mut cfg = EngineConfig::builtin();
        cfg.type_rules.retain(|r| !r.condition.is_empty());
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_unknown_fallback_member() {
        let mut cfg = EngineConfig::builtin();
        cfg.fallback_groups[0]
            .members
            .push(("NOT_A_TYPE".to_string(), 0.5));
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn erd_resolution_falls_back_in_order() {
        let cfg = EngineConfig::builtin();
        // Exact pair.
        let (erd, score) = cfg.resolve_erd(Some("CDL"), Some("DUL"));
        assert_eq!(erd, ErdLevel::L);
        assert!((score - 0.10).abs() < 1e-12);
        // Unknown pair falls back to ductility-only.
        let (erd, score) = cfg.resolve_erd(Some("CDH"), Some("DUC"));
        assert_eq!(erd, ErdLevel::H);
        assert!((score - 0.90).abs() < 1e-12);
        // Nothing known defaults to low.
        let (erd, score) = cfg.resolve_erd(None, None);
        assert_eq!(erd, ErdLevel::L);
        assert!((score - 0.10).abs() < 1e-12);
    }

    #[test]
    fn aliases_resolve_shorthands() {
        let cfg = EngineConfig::builtin();
        assert_eq!(cfg.resolve_alias("UNK"), "MAT99");
        assert_eq!(cfg.resolve_alias("ST"), "ST99");
        assert_eq!(cfg.resolve_alias("CR"), "CR");
    }
}
