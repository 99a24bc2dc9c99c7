//! Modifier engine: conditional, bounded reshaping of the base VC
//! distribution.
//!
//! Every modifier rule is evaluated (no early exit); each fired rule adds
//! its signed shift, capped per rule by `max_contribution`, into one
//! cumulative shift and multiplies its penalty into one penalty product.
//! The cumulative shift is clamped to the configured maximum and realized
//! once against the base distribution as a smooth move: whole bin-steps
//! plus a linear interpolation of the fractional remainder. Positive
//! shift moves mass toward class A (more vulnerable), negative toward F.
//!
//! The governing type's admissible class range is a hard wall: after the
//! shift, mass outside the range is discarded and the distribution
//! renormalized. If everything was discarded the distribution falls back
//! to uniform over the admissible range.

use crate::config::{EngineConfig, ModifierCondition};
use crate::domain::{AttributeSet, FiredModifier, VcDistribution};

/// Result of one modifier pass.
#[derive(Debug)]
pub struct ModifierOutcome {
    pub distribution: VcDistribution,
    pub fired: Vec<FiredModifier>,
    /// Realized total shift, after the cumulative clamp.
    pub cumulative_shift: f64,
    /// Product of fired rules' confidence penalties.
    pub penalty_product: f64,
}

/// Apply all modifier rules to `base`. `governing` is the top-weighted
/// candidate's label; its admissible range bounds the final distribution.
pub fn apply_modifiers(
    cfg: &EngineConfig,
    attrs: &AttributeSet,
    base: VcDistribution,
    governing: &str,
) -> ModifierOutcome {
    let mut fired = Vec::new();
    let mut total = 0.0;
    let mut penalty_product = 1.0;

    for rule in &cfg.modifiers {
        if !condition_matches(&rule.condition, attrs, governing) {
            continue;
        }
        let contrib = match rule.max_contribution {
            Some(cap) => rule.shift.clamp(-cap, cap),
            None => rule.shift,
        };
        total += contrib;
        penalty_product *= rule.confidence_penalty;
        fired.push(FiredModifier {
            id: rule.id.clone(),
            shift: contrib,
            confidence_penalty: rule.confidence_penalty,
        });
    }

    let cap = cfg.tuning.max_cumulative_shift;
    let total = total.clamp(-cap, cap);

    let (lo, hi) = match cfg.vocabulary.get(governing) {
        Some(entry) => (entry.range_min.index(), entry.range_max.index()),
        None => (0, 5),
    };
    let distribution = shift_distribution(base, total, lo, hi);

    ModifierOutcome {
        distribution,
        fired,
        cumulative_shift: total,
        penalty_product,
    }
}

/// Smooth bounded shift of a six-bin distribution.
///
/// `shift > 0` moves mass toward A (index 0); `shift < 0` toward F.
/// Boundary bins absorb mass that would leave the array, so the shift
/// itself conserves probability; only the hard-range cut discards mass.
pub fn shift_distribution(
    base: VcDistribution,
    shift: f64,
    lo: usize,
    hi: usize,
) -> VcDistribution {
    let toward_a = shift > 0.0;
    let magnitude = shift.abs();
    let full_steps = magnitude.floor() as usize;
    let frac = magnitude - magnitude.floor();

    let mut arr = base.0;
    for _ in 0..full_steps {
        arr = step_once(arr, toward_a);
    }
    if frac > 0.0 {
        let stepped = step_once(arr, toward_a);
        for i in 0..6 {
            arr[i] = arr[i] * (1.0 - frac) + stepped[i] * frac;
        }
    }

    for (i, p) in arr.iter_mut().enumerate() {
        if i < lo || i > hi {
            *p = 0.0;
        }
    }

    let sum: f64 = arr.iter().sum();
    if sum <= 0.0 {
        return VcDistribution::uniform_in(lo, hi);
    }
    for p in &mut arr {
        *p /= sum;
    }
    VcDistribution(arr)
}

/// Move all mass one whole bin-step; boundary bins keep what cannot move.
fn step_once(a: [f64; 6], toward_a: bool) -> [f64; 6] {
    let mut out = [0.0; 6];
    for (i, &p) in a.iter().enumerate() {
        let j = if toward_a { i.saturating_sub(1) } else { (i + 1).min(5) };
        out[j] += p;
    }
    out
}

/// AND across present fields, OR within each list field. A predicate over
/// an absent attribute is false. The two irregularity list fields accept
/// an empty list meaning "no such irregularity parsed".
fn condition_matches(cond: &ModifierCondition, attrs: &AttributeSet, governing: &str) -> bool {
    fn any_hit(list: &Option<Vec<String>>, pool: &[String]) -> bool {
        match list {
            Some(vals) if !vals.is_empty() => pool.iter().any(|t| vals.contains(t)),
            _ => true,
        }
    }
    fn scalar_in(list: &Option<Vec<String>>, value: Option<&str>) -> bool {
        match list {
            Some(vals) if !vals.is_empty() => {
                value.is_some_and(|v| vals.iter().any(|x| x == v))
            }
            _ => true,
        }
    }

    if let Some(families) = &cond.family_any {
        if !families.is_empty() && !attrs.family.is_some_and(|f| families.contains(&f)) {
            return false;
        }
    }
    if let Some(vals) = &cond.material_any {
        if !vals.is_empty() {
            let hit = attrs.material.as_ref().is_some_and(|m| vals.contains(m))
                || attrs.material_l2.iter().any(|t| vals.contains(t))
                || attrs.material_all.iter().any(|t| vals.contains(t));
            if !hit {
                return false;
            }
        }
    }
    if !any_hit(&cond.material_l2_any, &attrs.material_l2) {
        return false;
    }
    if !any_hit(&cond.material_l3_any, &attrs.material_l3) {
        return false;
    }
    if !scalar_in(&cond.system_any, attrs.system.as_deref()) {
        return false;
    }
    if !any_hit(&cond.infill_any, &attrs.infill_material) {
        return false;
    }
    if let Some(level) = cond.erd_is {
        if attrs.erd_or_default() != level {
            return false;
        }
    }
    if let Some(limit) = cond.erd_score_below {
        if attrs.erd_score >= limit {
            return false;
        }
    }
    if let Some(limit) = cond.erd_score_at_least {
        if attrs.erd_score < limit {
            return false;
        }
    }
    if !scalar_in(&cond.ductility_any, attrs.ductility_token.as_deref()) {
        return false;
    }
    if let Some(level) = &cond.code_level_is {
        if attrs.code_level.as_deref() != Some(level.as_str()) {
            return false;
        }
    }
    if let Some(bins) = &cond.height_bin_any {
        if !bins.is_empty() && !attrs.height_bin.is_some_and(|b| bins.contains(&b)) {
            return false;
        }
    }
    if let Some(limit) = cond.storeys_above {
        if !attrs.storeys.is_some_and(|s| s > limit) {
            return false;
        }
    }
    if let Some(wanted) = cond.year_known {
        if attrs.year_value.is_some() != wanted {
            return false;
        }
    }
    if let Some(year) = cond.year_before {
        if !attrs.year_value.is_some_and(|y| y < year) {
            return false;
        }
    }
    if let Some(year) = cond.year_from {
        if !attrs.year_value.is_some_and(|y| y >= year) {
            return false;
        }
    }
    if let Some(occ) = &cond.occupancy_is {
        if attrs.occupancy.as_deref() != Some(occ.as_str()) {
            return false;
        }
    }
    if !scalar_in(&cond.occupancy_detail_any, attrs.occupancy_detail.as_deref()) {
        return false;
    }
    if !scalar_in(&cond.position_any, attrs.position.as_deref()) {
        return false;
    }
    if !scalar_in(&cond.plan_shape_any, attrs.plan_shape.as_deref()) {
        return false;
    }
    if let Some(l1) = &cond.irregularity_l1_is {
        if attrs.irregularity_l1.as_deref() != Some(l1.as_str()) {
            return false;
        }
    }
    if let Some(vals) = &cond.irregularity_plan_any {
        if vals.is_empty() {
            if !attrs.irregularity_plan.is_empty() {
                return false;
            }
        } else if !attrs.irregularity_plan.iter().any(|t| vals.contains(t)) {
            return false;
        }
    }
    if let Some(vals) = &cond.irregularity_vertical_any {
        if vals.is_empty() {
            if !attrs.irregularity_vertical.is_empty() {
                return false;
            }
        } else if !attrs.irregularity_vertical.iter().any(|t| vals.contains(t)) {
            return false;
        }
    }
    if !scalar_in(&cond.roof_covering_any, attrs.roof_covering.as_deref()) {
        return false;
    }
    if let Some(prefixes) = &cond.roof_system_prefix_any {
        if !prefixes.is_empty() {
            let hit = attrs
                .roof_system
                .as_deref()
                .is_some_and(|r| prefixes.iter().any(|p| r.starts_with(p.as_str())));
            if !hit {
                return false;
            }
        }
    }
    if !any_hit(&cond.roof_connection_any, &attrs.roof_connections) {
        return false;
    }
    if let Some(prefixes) = &cond.floor_material_prefix_any {
        if !prefixes.is_empty() {
            let hit = attrs
                .floor_material
                .as_deref()
                .is_some_and(|f| prefixes.iter().any(|p| f.starts_with(p.as_str())));
            if !hit {
                return false;
            }
        }
    }
    if let Some(conn) = &cond.floor_connection_is {
        if attrs.floor_connection.as_deref() != Some(conn.as_str()) {
            return false;
        }
    }
    if !scalar_in(&cond.foundation_any, attrs.foundation.as_deref()) {
        return false;
    }
    if !any_hit(&cond.exterior_wall_any, &attrs.exterior_walls) {
        return false;
    }
    if let Some(labels) = &cond.assigned_type_any {
        if !labels.is_empty() && !labels.iter().any(|l| l == governing) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::VcClass;
    use crate::parser::GemParser;
    use crate::rules::assign_types;

    fn run(input: &str, base: VcDistribution, governing: &str) -> ModifierOutcome {
        let cfg = EngineConfig::builtin();
        let (mut attrs, _) = GemParser::new(&cfg).parse(input);
        assign_types(&cfg, &mut attrs);
        apply_modifiers(&cfg, &attrs, base, governing)
    }

    #[test]
    fn infill_modifier_fires_on_lfinf_with_masonry() {
        let base = VcDistribution([0.133, 0.267, 0.400, 0.200, 0.0, 0.0]);
        let o = run("CR/LFINF(MUR+CBH)+CDL+DUL/H:3/IND", base, "RC1-L");
        assert_eq!(o.fired.len(), 1);
        assert_eq!(o.fired[0].id, "INFILL_MASONRY_FROM_LFINF");
        assert!((o.cumulative_shift - 0.25).abs() < 1e-12);
        // Quarter-step toward A conserves mass and moves the mean down.
        let d = o.distribution;
        assert!((d.sum() - 1.0).abs() < 1e-9);
        assert!((d.0[0] - 0.19975).abs() < 1e-9);
        assert!((d.0[1] - 0.30025).abs() < 1e-9);
        assert!((d.0[2] - 0.350).abs() < 1e-9);
        assert!((d.0[3] - 0.150).abs() < 1e-9);
        assert!(d.mean_class_number() < base.mean_class_number());
    }

    #[test]
    fn no_modifier_fires_without_secondary_attributes() {
        let base = VcDistribution([0.0, 0.0, 0.25, 0.50, 0.25, 0.0]);
        let o = run("CR/LWAL+CDM+DUM/H:5/IND", base, "RC2-M");
        assert!(o.fired.is_empty());
        assert_eq!(o.cumulative_shift, 0.0);
        assert_eq!(o.distribution, base);
    }

    #[test]
    fn point_mass_at_the_boundary_stays_put() {
        // M1 admits only class A; DNO's +0.5 has nowhere to move mass.
        let base = VcDistribution::point_mass(VcClass::A);
        let o = run("MUR+STRUB/LWAL+DNO/H:2/IND", base, "M1");
        assert!(o.fired.iter().any(|f| f.id == "DUCTILITY_DNO"));
        assert_eq!(o.distribution, base);
    }

    #[test]
    fn hard_range_cut_discards_and_renormalizes() {
        // Mixed concrete-block base; governing M5 admits A..C only.
        let base = VcDistribution([0.1375, 0.35, 0.325, 0.15, 0.0375, 0.0]);
        let o = run("MUR+CBH/LWAL+DNO/H:4/IND", base, "M5");
        let d = o.distribution;
        assert!((d.sum() - 1.0).abs() < 1e-9);
        assert_eq!(d.0[3], 0.0);
        assert_eq!(d.0[4], 0.0);
        assert_eq!(d.0[5], 0.0);
        assert_eq!(d.mode(), VcClass::B);
    }

    #[test]
    fn cumulative_shift_clamps_at_the_cap() {
        // Pre-1920 masonry with earthen roof, soft storey, mud mortar:
        // nominal shift far exceeds 2.0.
        let base = VcDistribution([0.0, 0.25, 0.5, 0.25, 0.0, 0.0]);
        let o = run(
            "MUR+MOM/LWAL+DNO/H:2/YEX:1900/RSH2+RMT9+RWO2/IRIR+SOS",
            base,
            "M4",
        );
        assert!(o.fired.len() >= 4);
        assert!((o.cumulative_shift - 2.0).abs() < 1e-12);
        let raw: f64 = o.fired.iter().map(|f| f.shift).sum();
        assert!(raw > 2.0);
    }

    #[test]
    fn negative_shift_moves_mass_toward_f() {
        let base = VcDistribution([0.0, 0.133, 0.267, 0.400, 0.200, 0.0]);
        // DUC plus post-2010 construction: strong benefit.
        let o = run("CR/LFM+DUC/H:5/YEX:2015", base, "RC1-M");
        assert!(o.cumulative_shift < 0.0);
        let d = o.distribution;
        assert!((d.sum() - 1.0).abs() < 1e-9);
        assert!(d.mean_class_number() > base.mean_class_number());
    }

    #[test]
    fn generic_irregularity_yields_to_specific_types() {
        let cfg = EngineConfig::builtin();
        let base = VcDistribution([0.133, 0.267, 0.400, 0.200, 0.0, 0.0]);

        let (mut a, _) = GemParser::new(&cfg).parse("CR/LFM/H:3/IRIR");
        assign_types(&cfg, &mut a);
        let o = apply_modifiers(&cfg, &a, base, "RC1-L");
        assert!(o.fired.iter().any(|f| f.id == "IRREG_GENERIC"));

        let (mut a, _) = GemParser::new(&cfg).parse("CR/LFM/H:3/IRIR+SOS");
        assign_types(&cfg, &mut a);
        let o = apply_modifiers(&cfg, &a, base, "RC1-L");
        assert!(o.fired.iter().any(|f| f.id == "IRREG_SOFT_STOREY"));
        assert!(!o.fired.iter().any(|f| f.id == "IRREG_GENERIC"));
    }

    #[test]
    fn only_one_age_bracket_fires() {
        let cfg = EngineConfig::builtin();
        let base = VcDistribution([0.133, 0.267, 0.400, 0.200, 0.0, 0.0]);
        for (year, expect) in [
            ("YEX:1900", "AGE_PRE1920"),
            ("YEX:1930", "AGE_1920_1945"),
            ("YEX:1950", "AGE_1945_1970"),
            ("YEX:1980", "AGE_1970_1990"),
            ("YEX:2005", "AGE_POST2000"),
        ] {
            let (mut a, _) = GemParser::new(&cfg).parse(&format!("CR/LFM/H:3/{year}"));
            assign_types(&cfg, &mut a);
            let o = apply_modifiers(&cfg, &a, base, "RC1-L");
            let age_rules: Vec<&str> = o
                .fired
                .iter()
                .filter(|f| f.id.starts_with("AGE_"))
                .map(|f| f.id.as_str())
                .collect();
            assert_eq!(age_rules, vec![expect], "year block {year}");
        }
    }

    #[test]
    fn penalties_compound_by_product() {
        let base = VcDistribution([0.25, 0.5, 0.25, 0.0, 0.0, 0.0]);
        // DNO (0.90) and corner position (0.92).
        let o = run("MUR+CL99/LWAL+DNO/H:2/BP3", base, "M5");
        assert_eq!(o.fired.len(), 2);
        assert!((o.penalty_product - 0.90 * 0.92).abs() < 1e-12);
    }

    #[test]
    fn precast_modifier_keys_on_assigned_type() {
        let base = VcDistribution([0.133, 0.267, 0.400, 0.200, 0.0, 0.0]);
        let o = run("CR+PC/LFM/H:3", base, "RC5-L");
        assert!(o.fired.iter().any(|f| f.id == "PRECAST_NO_DUCTILITY_INFO"));

        let o = run("CR/LFM/H:3", base, "RC1-L");
        assert!(!o.fired.iter().any(|f| f.id == "PRECAST_NO_DUCTILITY_INFO"));
    }

    #[test]
    fn full_step_shift_relocates_whole_bins() {
        let base = VcDistribution([0.0, 0.0, 1.0, 0.0, 0.0, 0.0]);
        let shifted = shift_distribution(base, 1.0, 0, 5);
        assert!((shifted.0[1] - 1.0).abs() < 1e-12);
        let shifted = shift_distribution(base, -2.0, 0, 5);
        assert!((shifted.0[4] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn all_mass_cut_falls_back_to_uniform_in_range() {
        let base = VcDistribution([0.0, 0.0, 0.0, 0.0, 0.5, 0.5]);
        let d = shift_distribution(base, 0.0, 0, 2);
        assert!((d.sum() - 1.0).abs() < 1e-12);
        for i in 0..3 {
            assert!((d.0[i] - 1.0 / 3.0).abs() < 1e-12);
        }
    }
}
