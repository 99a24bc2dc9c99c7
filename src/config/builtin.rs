//! Built-in configuration tables.
//!
//! Content distilled from the EMS-98 vocabulary, IMS class ranges, GEM v2.0
//! token conventions, and post-earthquake survey experience. These tables
//! are data, not logic: the engine interprets them generically.

use std::collections::HashMap;

use crate::domain::{ErdLevel, Family, HeightBin, VcClass, VcDistribution};

use super::{
    AttrKey, CompletenessRubric, DuctilityEntry, EngineConfig, ExactOverride, FallbackGroup,
    ModifierCondition, ModifierRule, RuleCondition, RuleOutput, Tuning, TypeEntry, TypeRule,
    TypeVocabulary,
};

fn list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn some_list(items: &[&str]) -> Option<Vec<String>> {
    Some(list(items))
}

#[allow(clippy::too_many_arguments)]
fn ty(
    label: &str,
    family: Family,
    description: &str,
    prior: [f64; 6],
    most_likely: VcClass,
    range_min: VcClass,
    range_max: VcClass,
) -> TypeEntry {
    TypeEntry {
        label: label.to_string(),
        family,
        description: description.to_string(),
        prior: VcDistribution(prior),
        most_likely,
        range_min,
        range_max,
    }
}

fn vocabulary() -> TypeVocabulary {
    use Family::*;
    use VcClass::*;
    TypeVocabulary::new(vec![
        // Masonry.
        ty("M1", Masonry, "Rubble stone / fieldstone masonry",
            [1.0, 0.0, 0.0, 0.0, 0.0, 0.0], A, A, A),
        ty("M2", Masonry, "Adobe / earth brick masonry",
            [0.667, 0.333, 0.0, 0.0, 0.0, 0.0], A, A, B),
        ty("M3", Masonry, "Simple stone masonry",
            [0.333, 0.667, 0.0, 0.0, 0.0, 0.0], B, A, B),
        ty("M4", Masonry, "Massive stone masonry",
            [0.0, 0.25, 0.5, 0.25, 0.0, 0.0], C, B, D),
        ty("M5", Masonry, "Manufactured stone units with timber floors",
            [0.25, 0.5, 0.25, 0.0, 0.0, 0.0], B, A, C),
        ty("M6", Masonry, "Manufactured stone units with RC floors",
            [0.0, 0.25, 0.5, 0.25, 0.0, 0.0], C, B, D),
        ty("M7", Masonry, "Reinforced or confined masonry with RC floors",
            [0.0, 0.0, 0.25, 0.5, 0.25, 0.0], D, C, E),
        // RC, cast in situ.
        ty("RC1-L", Rc, "RC moment/braced frame, low ERD",
            [0.133, 0.267, 0.4, 0.2, 0.0, 0.0], C, A, D),
        ty("RC1-M", Rc, "RC moment/braced frame, moderate ERD",
            [0.0, 0.133, 0.267, 0.4, 0.2, 0.0], D, B, E),
        ty("RC1-H", Rc, "RC moment/braced frame, high ERD",
            [0.0, 0.0, 0.133, 0.267, 0.4, 0.2], E, C, F),
        ty("RC2-L", Rc, "RC shear wall, low ERD",
            [0.0, 0.25, 0.5, 0.25, 0.0, 0.0], C, B, D),
        ty("RC2-M", Rc, "RC shear wall, moderate ERD",
            [0.0, 0.0, 0.25, 0.5, 0.25, 0.0], D, C, E),
        ty("RC2-H", Rc, "RC shear wall, high ERD",
            [0.0, 0.0, 0.0, 0.25, 0.5, 0.25], E, D, F),
        ty("RC3-L", Rc, "RC dual frame-wall system, low ERD",
            [0.0, 0.25, 0.5, 0.25, 0.0, 0.0], C, B, D),
        ty("RC3-M", Rc, "RC dual frame-wall system, moderate ERD",
            [0.0, 0.0, 0.25, 0.5, 0.25, 0.0], D, C, E),
        ty("RC3-H", Rc, "RC dual frame-wall system, high ERD",
            [0.0, 0.0, 0.0, 0.25, 0.5, 0.25], E, D, F),
        ty("RC4", Rc, "RC flat slab / waffle slab",
            [0.2, 0.4, 0.267, 0.133, 0.0, 0.0], B, A, D),
        // RC, precast.
        ty("RC5-L", Rc, "Precast RC frame, low ERD",
            [0.133, 0.267, 0.4, 0.2, 0.0, 0.0], C, A, D),
        ty("RC5-M", Rc, "Precast RC frame, moderate ERD",
            [0.0, 0.133, 0.267, 0.4, 0.2, 0.0], D, B, E),
        ty("RC6-L", Rc, "Precast RC wall or dual system, low ERD",
            [0.0, 0.25, 0.5, 0.25, 0.0, 0.0], C, B, D),
        ty("RC6-M", Rc, "Precast RC wall or dual system, moderate ERD",
            [0.0, 0.0, 0.25, 0.5, 0.25, 0.0], D, C, E),
        // Steel.
        ty("S-L", Steel, "Steel frame, low ERD / no seismic design",
            [0.0, 0.0, 0.2, 0.4, 0.267, 0.133], D, C, F),
        ty("S-M/H", Steel, "Steel frame, moderate or high ERD",
            [0.0, 0.0, 0.0, 0.25, 0.5, 0.25], E, D, F),
        // Timber.
        ty("T1", Timber, "Traditional / heavy timber",
            [0.0, 0.25, 0.5, 0.25, 0.0, 0.0], C, B, D),
        ty("T2-L", Timber, "Light timber frame, low ERD",
            [0.0, 0.133, 0.267, 0.4, 0.2, 0.0], D, B, E),
        ty("T2-M/H", Timber, "Light timber frame, moderate or high ERD",
            [0.0, 0.0, 0.0, 0.25, 0.5, 0.25], E, D, F),
    ])
}

fn ductility_map() -> Vec<DuctilityEntry> {
    fn entry(code: Option<&str>, duct: Option<&str>, erd: ErdLevel, score: f64) -> DuctilityEntry {
        DuctilityEntry {
            code_level: code.map(|s| s.to_string()),
            ductility: duct.map(|s| s.to_string()),
            erd,
            score,
        }
    }
    use ErdLevel::*;
    vec![
        // Combined code level + ductility pairs carry the most information.
        entry(Some("CDL"), Some("DUL"), L, 0.10),
        entry(Some("CDL"), Some("DUM"), L, 0.25),
        entry(Some("CDL"), Some("DNO"), L, 0.05),
        entry(Some("CDM"), Some("DUL"), M, 0.40),
        entry(Some("CDM"), Some("DUM"), M, 0.55),
        entry(Some("CDM"), Some("DNO"), L, 0.20),
        // Code level only.
        entry(Some("CDL"), None, L, 0.15),
        entry(Some("CDM"), None, M, 0.50),
        // Standard GEM ductility tokens.
        entry(None, Some("DNO"), L, 0.05),
        entry(None, Some("DUC"), H, 0.90),
        entry(None, Some("DBD"), H, 1.00),
        entry(None, Some("DU99"), L, 0.10),
        // Nothing known.
        entry(None, None, L, 0.10),
    ]
}

fn material_aliases() -> HashMap<String, String> {
    [("ST", "ST99"), ("CL", "CL99"), ("UNK", "MAT99"), ("MATO", "MATO")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn rule(
    id: &str,
    priority: u32,
    condition: RuleCondition,
    output: RuleOutput,
    confidence_penalty: f64,
    doc: &str,
) -> TypeRule {
    TypeRule {
        id: id.to_string(),
        priority,
        condition,
        output,
        confidence_penalty,
        doc: doc.to_string(),
    }
}

fn type_rules() -> Vec<TypeRule> {
    use RuleOutput::*;
    vec![
        // Family assignment (priority band 10-12).
        rule("MAT_RC", 10,
            RuleCondition { material_any: some_list(&["CR", "SRC"]), ..Default::default() },
            Family(self::Family::Rc), 1.00,
            "Reinforced concrete and composite materials."),
        rule("MAT_RC_UNCERTAIN", 11,
            RuleCondition { material_any: some_list(&["C99", "CU"]), ..Default::default() },
            Family(self::Family::Rc), 0.75,
            "Concrete with unknown or no reinforcement, lower confidence."),
        rule("MAT_MASONRY", 10,
            RuleCondition {
                material_any: some_list(&["MUR", "MR", "MCF", "M99", "MUN99"]),
                ..Default::default()
            },
            Family(self::Family::Masonry), 1.00,
            "Standard masonry material tokens."),
        rule("MAT_EARTH", 10,
            RuleCondition {
                material_any: some_list(&["EU", "ER", "E99", "ET99", "ETR", "ETC", "ETO"]),
                ..Default::default()
            },
            Family(self::Family::Masonry), 0.85,
            "Earth construction is handled as masonry (maps to M2)."),
        rule("MAT_STEEL", 10,
            RuleCondition {
                material_any: some_list(&["S", "S99", "SL", "SR", "SO", "ME", "ME99", "MEIR", "MEO"]),
                ..Default::default()
            },
            Family(self::Family::Steel), 1.00,
            "Steel and metal tokens."),
        rule("MAT_TIMBER", 10,
            RuleCondition {
                material_any: some_list(&["W", "W99", "WHE", "WLI", "WS", "WWD", "WBB", "WO"]),
                ..Default::default()
            },
            Family(self::Family::Timber), 1.00,
            "Wood material tokens."),
        rule("MAT_OTHER", 12,
            RuleCondition { material_any: some_list(&["MATO"]), ..Default::default() },
            Family(self::Family::Rc), 0.50,
            "Other material, conservative RC fallback."),
        // Masonry sub-types (15-24).
        rule("MAS_REINF_OR_CONFINED", 15,
            RuleCondition {
                family_is: Some(self::Family::Masonry),
                material_any: some_list(&["MR", "MCF"]),
                ..Default::default()
            },
            Label("M7".into()), 0.95,
            "Reinforced or confined masonry."),
        rule("MAS_ADOBE", 16,
            RuleCondition {
                family_is: Some(self::Family::Masonry),
                material_l2_any: some_list(&["ADO"]),
                ..Default::default()
            },
            Label("M2".into()), 0.95,
            "Adobe blocks."),
        rule("MAS_EARTH", 17,
            RuleCondition {
                family_is: Some(self::Family::Masonry),
                material_any: some_list(&["EU", "ER", "E99", "ET99", "ETR", "ETC", "ETO"]),
                ..Default::default()
            },
            Fallback("EARTH_MASONRY".into()), 0.80,
            "Rammed earth and cob spread over M2/M5."),
        rule("MAS_RUBBLE", 20,
            RuleCondition {
                family_is: Some(self::Family::Masonry),
                material_l2_any: some_list(&["STRUB"]),
                ..Default::default()
            },
            Label("M1".into()), 0.90,
            "Rubble or fieldstone."),
        rule("MAS_DRESSED_STONE", 21,
            RuleCondition {
                family_is: Some(self::Family::Masonry),
                material_l2_any: some_list(&["STDRE"]),
                ..Default::default()
            },
            Fallback("STONE_DRESSED".into()), 0.85,
            "Dressed stone spread over M3/M4."),
        rule("MAS_STONE_UNKNOWN", 22,
            RuleCondition {
                family_is: Some(self::Family::Masonry),
                material_l2_any: some_list(&[
                    "ST99", "SP99", "SPO", "SPLI", "SPSA", "SPTU", "SPSL", "SPGR", "SPBA",
                ]),
                ..Default::default()
            },
            Fallback("STONE_UNKNOWN".into()), 0.80,
            "Stone of unknown dressing spread over M1/M3/M4."),
        rule("MAS_BRICK", 23,
            RuleCondition {
                family_is: Some(self::Family::Masonry),
                material_l2_any: some_list(&["CL99", "CLBRS", "CLBRH", "CLBLH"]),
                ..Default::default()
            },
            Fallback("BRICK_MASONRY".into()), 0.85,
            "Fired clay brick or block spread over M5/M6."),
        rule("MAS_CONCRETE_BLOCK", 24,
            RuleCondition {
                family_is: Some(self::Family::Masonry),
                material_l2_any: some_list(&["CB99", "CBS", "CBH"]),
                ..Default::default()
            },
            Fallback("CONCRETE_BLOCK_MASONRY".into()), 0.80,
            "Concrete block masonry spread over M5/M6/M7."),
        // RC system rules (28-33).
        rule("RC_PRECAST_FRAME", 28,
            RuleCondition {
                family_is: Some(self::Family::Rc),
                material_l2_any: some_list(&["PC", "PCPS"]),
                system_any: some_list(&["LFM", "LFINF", "LFBR", "LPB", "LDUAL", "LH", "L99"]),
                ..Default::default()
            },
            Template("RC5-{erd}".into()), 0.88,
            "Precast RC with a frame system."),
        rule("RC_PRECAST_WALL", 29,
            RuleCondition {
                family_is: Some(self::Family::Rc),
                material_l2_any: some_list(&["PC", "PCPS"]),
                system_any: some_list(&["LWAL", "LFLS", "LFLSINF"]),
                ..Default::default()
            },
            Template("RC6-{erd}".into()), 0.88,
            "Precast RC with a wall or slab system."),
        rule("RC_FLATSLAB", 30,
            RuleCondition {
                family_is: Some(self::Family::Rc),
                system_any: some_list(&["LFLS", "LFLSINF"]),
                ..Default::default()
            },
            Label("RC4".into()), 0.90,
            "Flat slab or waffle slab, punch-through risk."),
        rule("RC_FRAME", 31,
            RuleCondition {
                family_is: Some(self::Family::Rc),
                system_any: some_list(&["LFM", "LFINF", "LFBR", "LPB"]),
                ..Default::default()
            },
            Template("RC1-{erd}".into()), 0.95,
            "RC moment, infilled, braced or post-and-beam frame."),
        rule("RC_WALL", 32,
            RuleCondition {
                family_is: Some(self::Family::Rc),
                system_any: some_list(&["LWAL"]),
                ..Default::default()
            },
            Template("RC2-{erd}".into()), 0.95,
            "RC wall system."),
        rule("RC_DUAL", 33,
            RuleCondition {
                family_is: Some(self::Family::Rc),
                system_any: some_list(&["LDUAL"]),
                ..Default::default()
            },
            Template("RC3-{erd}".into()), 0.95,
            "RC dual frame-wall system."),
        rule("RC_NO_SYSTEM", 70,
            RuleCondition {
                family_is: Some(self::Family::Rc),
                missing_any: Some(vec![AttrKey::System]),
                ..Default::default()
            },
            Fallback("RC_MISSING_SYSTEM".into()), 0.75,
            "RC material known but lateral system unknown."),
        rule("RC_UNCERTAIN_MATERIAL", 75,
            RuleCondition {
                family_is: Some(self::Family::Rc),
                material_any: some_list(&["C99", "CU", "MATO"]),
                ..Default::default()
            },
            Fallback("RC_UNCERTAIN_MATERIAL".into()), 0.65,
            "Concrete with unknown reinforcement."),
        // Steel (50s, 80).
        rule("STEEL_LIGHT", 50,
            RuleCondition {
                family_is: Some(self::Family::Steel),
                material_any: some_list(&["SL"]),
                ..Default::default()
            },
            Fallback("STEEL_LIGHT".into()), 0.80,
            "Cold-formed or light steel members."),
        rule("STEEL_HEAVY", 51,
            RuleCondition {
                family_is: Some(self::Family::Steel),
                material_any: some_list(&["SR"]),
                ..Default::default()
            },
            Fallback("STEEL_HEAVY".into()), 0.85,
            "Hot-rolled steel members."),
        rule("STEEL_DEFAULT", 80,
            RuleCondition { family_is: Some(self::Family::Steel), ..Default::default() },
            Fallback("STEEL_DEFAULT".into()), 0.70,
            "Steel family fallback when member type unknown."),
        // Timber (60s, 81).
        rule("TIMBER_WATTLE", 60,
            RuleCondition {
                family_is: Some(self::Family::Timber),
                material_any: some_list(&["WWD", "WBB"]),
                ..Default::default()
            },
            Fallback("TIMBER_TRADITIONAL".into()), 0.80,
            "Wattle-and-daub or bamboo."),
        rule("TIMBER_LIGHT", 61,
            RuleCondition {
                family_is: Some(self::Family::Timber),
                material_any: some_list(&["WLI"]),
                ..Default::default()
            },
            Fallback("TIMBER_MODERN".into()), 0.85,
            "Light wood members."),
        rule("TIMBER_HEAVY", 62,
            RuleCondition {
                family_is: Some(self::Family::Timber),
                material_any: some_list(&["WHE", "WS"]),
                ..Default::default()
            },
            Fallback("TIMBER_TRADITIONAL".into()), 0.85,
            "Heavy or solid wood."),
        rule("TIMBER_DEFAULT", 81,
            RuleCondition { family_is: Some(self::Family::Timber), ..Default::default() },
            Fallback("TIMBER_DEFAULT".into()), 0.70,
            "Timber family fallback."),
        // Masonry family fallback.
        rule("MAS_DEFAULT", 85,
            RuleCondition { family_is: Some(self::Family::Masonry), ..Default::default() },
            Fallback("MASONRY_DEFAULT".into()), 0.65,
            "Masonry with unknown unit type and reinforcement."),
        // Global failsafe. Never remove: it terminates the decision list.
        rule("FAILSAFE", 999,
            RuleCondition::default(),
            Label("M4".into()), 0.20,
            "No rule matched; conservative stone masonry."),
    ]
}

fn fallback_groups() -> Vec<FallbackGroup> {
    fn group(name: &str, members: &[(&str, f64)]) -> FallbackGroup {
        FallbackGroup {
            name: name.to_string(),
            members: members.iter().map(|(l, w)| (l.to_string(), *w)).collect(),
        }
    }
    vec![
        group("MASONRY_DEFAULT", &[("M3", 0.35), ("M4", 0.35), ("M5", 0.30)]),
        group("STONE_UNKNOWN", &[("M1", 0.40), ("M3", 0.40), ("M4", 0.20)]),
        group("STONE_DRESSED", &[("M3", 0.70), ("M4", 0.30)]),
        group("BRICK_MASONRY", &[("M5", 0.60), ("M6", 0.40)]),
        group("CONCRETE_BLOCK_MASONRY", &[("M5", 0.55), ("M6", 0.30), ("M7", 0.15)]),
        group("EARTH_MASONRY", &[("M2", 0.80), ("M5", 0.20)]),
        group("RC_MISSING_SYSTEM", &[("RC1-L", 0.45), ("RC2-L", 0.35), ("RC3-L", 0.20)]),
        group("RC_UNCERTAIN_MATERIAL", &[("RC1-L", 0.40), ("RC2-L", 0.35), ("RC3-L", 0.25)]),
        group("STEEL_DEFAULT", &[("S-L", 0.40), ("S-M/H", 0.60)]),
        group("STEEL_LIGHT", &[("S-L", 0.70), ("S-M/H", 0.30)]),
        group("STEEL_HEAVY", &[("S-L", 0.30), ("S-M/H", 0.70)]),
        group("TIMBER_DEFAULT", &[("T1", 0.10), ("T2-L", 0.40), ("T2-M/H", 0.50)]),
        group("TIMBER_TRADITIONAL", &[("T1", 0.60), ("T2-L", 0.25), ("T2-M/H", 0.15)]),
        group("TIMBER_MODERN", &[("T2-L", 0.45), ("T2-M/H", 0.55)]),
    ]
}

fn modifier(
    id: &str,
    condition: ModifierCondition,
    shift: f64,
    confidence_penalty: f64,
    doc: &str,
) -> ModifierRule {
    ModifierRule {
        id: id.to_string(),
        condition,
        shift,
        confidence_penalty,
        max_contribution: None,
        doc: doc.to_string(),
    }
}

fn capped(mut rule: ModifierRule, cap: f64) -> ModifierRule {
    rule.max_contribution = Some(cap);
    rule
}

fn modifiers() -> Vec<ModifierRule> {
    use Family::*;
    vec![
        // Structural irregularity.
        modifier("IRREG_SOFT_STOREY",
            ModifierCondition {
                irregularity_vertical_any: some_list(&["SOS"]),
                ..Default::default()
            },
            1.00, 0.88,
            "Soft storey concentrates inter-storey drift."),
        modifier("IRREG_SHORT_COLUMN",
            ModifierCondition {
                irregularity_vertical_any: some_list(&["SHC"]),
                ..Default::default()
            },
            0.75, 0.88,
            "Short columns fail in brittle shear."),
        modifier("IRREG_CRIPPLE_WALL",
            ModifierCondition {
                irregularity_vertical_any: some_list(&["CRW"]),
                ..Default::default()
            },
            0.75, 0.88,
            "Cripple wall: low lateral stiffness at ground level."),
        modifier("IRREG_LARGE_OVERHANG",
            ModifierCondition {
                irregularity_vertical_any: some_list(&["CHV"]),
                ..Default::default()
            },
            0.50, 0.90,
            "Large overhang / change in vertical structure."),
        modifier("IRREG_POUNDING",
            ModifierCondition {
                irregularity_vertical_any: some_list(&["POP"]),
                ..Default::default()
            },
            0.50, 0.90,
            "Floor-level mismatch with adjacent buildings."),
        modifier("IRREG_SETBACK",
            ModifierCondition {
                irregularity_vertical_any: some_list(&["SET"]),
                ..Default::default()
            },
            0.25, 0.93,
            "Load-path discontinuity at the setback level."),
        modifier("IRREG_TORSION",
            ModifierCondition {
                irregularity_plan_any: some_list(&["TOR"]),
                ..Default::default()
            },
            0.50, 0.90,
            "Torsion eccentricity in plan."),
        modifier("IRREG_REENTRANT_CORNER",
            ModifierCondition {
                irregularity_plan_any: some_list(&["REC"]),
                ..Default::default()
            },
            0.25, 0.93,
            "Stress concentration at a re-entrant corner."),
        modifier("IRREG_GENERIC",
            ModifierCondition {
                irregularity_l1_is: Some("IRIR".into()),
                // Fires only when no specific irregularity type is known.
                irregularity_plan_any: Some(vec![]),
                irregularity_vertical_any: Some(vec![]),
                ..Default::default()
            },
            0.25, 0.93,
            "Flagged irregular without a named irregularity type."),
        // Plan shape.
        modifier("PLAN_COMPLEX_SHAPE",
            ModifierCondition {
                plan_shape_any: some_list(&[
                    "PLFL", "PLFE", "PLFH", "PLFS", "PLFT", "PLFU", "PLFX", "PLFY", "PLFI",
                    "PLFD", "PLFDO", "PLFP", "PLFPO", "PLFC", "PLFCO",
                ]),
                ..Default::default()
            },
            0.25, 0.93,
            "Non-rectangular plan increases torsional eccentricity."),
        modifier("PLAN_WITH_OPENING",
            ModifierCondition {
                plan_shape_any: some_list(&["PLFSQO", "PLFRO"]),
                ..Default::default()
            },
            0.25, 0.93,
            "Interior opening leaves a partial diaphragm."),
        modifier("PLAN_REGULAR_BONUS",
            ModifierCondition {
                plan_shape_any: some_list(&["PLFSQ", "PLFR"]),
                ..Default::default()
            },
            -0.25, 1.00,
            "Simple square or rectangular plan."),
        // Age brackets. Baseline is 1990-1999 (no rule). Only one fires.
        capped(modifier("AGE_PRE1920",
            ModifierCondition {
                year_known: Some(true),
                year_before: Some(1920),
                ..Default::default()
            },
            1.25, 0.85,
            "Pre-seismic-code era."), 1.25),
        capped(modifier("AGE_1920_1945",
            ModifierCondition {
                year_known: Some(true),
                year_from: Some(1920),
                year_before: Some(1945),
                ..Default::default()
            },
            0.75, 0.88,
            "Very early codes, mostly unreinforced construction."), 0.75),
        capped(modifier("AGE_1945_1970",
            ModifierCondition {
                year_known: Some(true),
                year_from: Some(1945),
                year_before: Some(1970),
                ..Default::default()
            },
            0.50, 0.90,
            "Post-war reconstruction, codes inconsistently applied."), 0.50),
        capped(modifier("AGE_1970_1990",
            ModifierCondition {
                year_known: Some(true),
                year_from: Some(1970),
                year_before: Some(1990),
                ..Default::default()
            },
            0.25, 0.92,
            "Modern codes emerging, variable enforcement."), 0.25),
        capped(modifier("AGE_POST2000",
            ModifierCondition {
                year_known: Some(true),
                year_from: Some(2000),
                ..Default::default()
            },
            -0.25, 1.00,
            "Post-2000 codes generally better enforced."), 0.25),
        capped(modifier("AGE_POST2010_DUCTILE",
            ModifierCondition {
                year_known: Some(true),
                year_from: Some(2010),
                ductility_any: some_list(&["DUC", "DBD"]),
                ..Default::default()
            },
            -0.75, 1.00,
            "Recent construction with confirmed ductile detailing."), 0.75),
        // Ductility / ERD.
        modifier("DUCTILITY_DNO",
            ModifierCondition { ductility_any: some_list(&["DNO"]), ..Default::default() },
            0.50, 0.90,
            "Confirmed non-ductile system."),
        modifier("DUCTILITY_DUC",
            ModifierCondition { ductility_any: some_list(&["DUC"]), ..Default::default() },
            -0.75, 1.00,
            "Confirmed ductile capacity design."),
        modifier("DUCTILITY_DBD",
            ModifierCondition { ductility_any: some_list(&["DBD"]), ..Default::default() },
            -1.25, 1.00,
            "Base isolation or energy dissipation devices."),
        modifier("HIGH_RISE_UNKNOWN_DUCTILITY",
            ModifierCondition {
                height_bin_any: Some(vec![HeightBin::High]),
                ductility_any: some_list(&["DU99"]),
                erd_score_below: Some(0.30),
                ..Default::default()
            },
            0.50, 0.88,
            "High rise with no ductility information."),
        // Roof system.
        modifier("ROOF_EARTHEN_ON_MASONRY",
            ModifierCondition {
                roof_covering_any: some_list(&["RMT9"]),
                family_any: Some(vec![Masonry]),
                ..Default::default()
            },
            1.50, 0.88,
            "Earthen roof on masonry, a primary collapse cause."),
        modifier("ROOF_EARTHEN_ON_TIMBER",
            ModifierCondition {
                roof_covering_any: some_list(&["RMT9"]),
                family_any: Some(vec![Timber]),
                ..Default::default()
            },
            1.00, 0.88,
            "Earthen roof on a timber frame, mass mismatch."),
        modifier("ROOF_STONE_SLAB_ON_MASONRY",
            ModifierCondition {
                roof_covering_any: some_list(&["RMT5"]),
                family_any: Some(vec![Masonry]),
                ..Default::default()
            },
            1.00, 0.88,
            "Stone slab roof, extremely heavy mass."),
        modifier("ROOF_MASONRY_VAULT",
            ModifierCondition {
                roof_system_prefix_any: some_list(&["RM1", "RM2"]),
                family_any: Some(vec![Masonry]),
                ..Default::default()
            },
            0.75, 0.90,
            "Vaulted or arched masonry roof thrusts on walls."),
        modifier("ROOF_HEAVY_WOOD_ON_MASONRY",
            ModifierCondition {
                roof_system_prefix_any: some_list(&["RWO2"]),
                family_any: Some(vec![Masonry]),
                ..Default::default()
            },
            0.50, 0.90,
            "Heavy wooden roof on masonry."),
        modifier("ROOF_THATCH_OR_BAMBOO",
            ModifierCondition {
                roof_system_prefix_any: some_list(&["RWO5"]),
                ..Default::default()
            },
            0.50, 0.90,
            "Thatch or bamboo roof, fragile connections."),
        modifier("ROOF_LIGHT_BENEFIT",
            ModifierCondition {
                roof_covering_any: some_list(&["RMT6", "RMT7"]),
                roof_system_prefix_any: some_list(&["RWO1", "RWO4"]),
                ..Default::default()
            },
            -0.25, 1.00,
            "Light covering on a light wood roof reduces inertial load."),
        modifier("ROOF_NO_TIEDOWN",
            ModifierCondition {
                roof_connection_any: some_list(&["RWCN"]),
                ..Default::default()
            },
            0.25, 0.92,
            "Roof-wall connection not provided."),
        modifier("ROOF_TIEDOWN_PRESENT",
            ModifierCondition {
                roof_connection_any: some_list(&["RTDP"]),
                ..Default::default()
            },
            -0.25, 1.00,
            "Roof tie-down anchors the roof to the walls."),
        // Floor diaphragm.
        modifier("FLOOR_WOOD_ON_MASONRY",
            ModifierCondition {
                floor_material_prefix_any: some_list(&["FW"]),
                family_any: Some(vec![Masonry]),
                ..Default::default()
            },
            0.75, 0.90,
            "Flexible wood diaphragm in a masonry building."),
        modifier("FLOOR_EARTHEN",
            ModifierCondition {
                floor_material_prefix_any: some_list(&["FE"]),
                ..Default::default()
            },
            0.50, 0.90,
            "Earthen floor: flexible, heavy, poor load distribution."),
        modifier("FLOOR_PRECAST_NO_TOPPING",
            ModifierCondition {
                floor_material_prefix_any: some_list(&["FC4"]),
                ..Default::default()
            },
            0.25, 0.92,
            "Precast floor without RC topping."),
        modifier("FLOOR_NOT_CONNECTED",
            ModifierCondition {
                floor_connection_is: Some("FWCN".into()),
                ..Default::default()
            },
            0.50, 0.88,
            "Floor-wall connection not provided."),
        modifier("FLOOR_WELL_CONNECTED",
            ModifierCondition {
                floor_connection_is: Some("FWCP".into()),
                ..Default::default()
            },
            -0.25, 1.00,
            "Floor-wall connection present."),
        modifier("FLOOR_RC_RIGID",
            ModifierCondition {
                floor_material_prefix_any: some_list(&["FC1", "FC2"]),
                ..Default::default()
            },
            -0.25, 1.00,
            "Rigid cast-in-place RC diaphragm."),
        // Masonry material quality.
        modifier("MORTAR_NONE",
            ModifierCondition { material_l3_any: some_list(&["MON"]), ..Default::default() },
            0.75, 0.90,
            "Dry-stacked masonry has zero tensile bond."),
        modifier("MORTAR_MUD",
            ModifierCondition { material_l3_any: some_list(&["MOM"]), ..Default::default() },
            0.50, 0.90,
            "Mud mortar weakens under cyclic loading."),
        modifier("MORTAR_CEMENT",
            ModifierCondition {
                material_l3_any: some_list(&["MOC", "MOCL"]),
                ..Default::default()
            },
            -0.25, 1.00,
            "Cement or cement-lime mortar bonds well."),
        modifier("MASONRY_REINF_RC_BANDS",
            ModifierCondition { material_l2_any: some_list(&["RCB"]), ..Default::default() },
            -0.75, 1.00,
            "RC tie beams prevent storey collapse."),
        modifier("MASONRY_REINF_STEEL",
            ModifierCondition { material_l2_any: some_list(&["RS"]), ..Default::default() },
            -0.50, 1.00,
            "Steel reinforcement in masonry."),
        modifier("MASONRY_REINF_BAMBOO",
            ModifierCondition { material_l2_any: some_list(&["RB"]), ..Default::default() },
            -0.25, 1.00,
            "Bamboo reinforcement, limited improvement."),
        // Building position (pounding).
        modifier("POSITION_CORNER",
            ModifierCondition { position_any: some_list(&["BP3"]), ..Default::default() },
            0.50, 0.92,
            "Adjoining on three sides: pounding from two directions."),
        modifier("POSITION_END_ROW",
            ModifierCondition { position_any: some_list(&["BP1"]), ..Default::default() },
            0.25, 0.93,
            "End-of-row building, pounding on one side."),
        modifier("POSITION_DETACHED",
            ModifierCondition { position_any: some_list(&["BPD"]), ..Default::default() },
            -0.25, 1.00,
            "Detached building, no pounding risk."),
        // Occupancy.
        modifier("OCC_CRITICAL_FACILITY",
            ModifierCondition {
                occupancy_detail_any: some_list(&["COM4", "GOV2"]),
                ..Default::default()
            },
            0.50, 0.95,
            "Critical post-earthquake function, conservative class."),
        modifier("OCC_SCHOOL",
            ModifierCondition {
                occupancy_detail_any: some_list(&["EDU2", "EDU3", "EDU4"]),
                ..Default::default()
            },
            0.50, 0.95,
            "High daytime occupancy."),
        modifier("OCC_LARGE_ASSEMBLY",
            ModifierCondition {
                occupancy_detail_any: some_list(&["ASS2", "ASS3"]),
                ..Default::default()
            },
            0.25, 0.95,
            "High peak occupancy events."),
        modifier("OCC_INFORMAL_HOUSING",
            ModifierCondition {
                occupancy_detail_any: some_list(&["RES6"]),
                ..Default::default()
            },
            0.50, 0.90,
            "Informal housing, typically non-engineered."),
        // Foundation.
        modifier("FOUND_DEEP_NO_LATERAL",
            ModifierCondition { foundation_any: some_list(&["FOSDN"]), ..Default::default() },
            0.50, 0.90,
            "Deep foundation without lateral capacity."),
        modifier("FOUND_SHALLOW_NO_LATERAL",
            ModifierCondition { foundation_any: some_list(&["FOSN"]), ..Default::default() },
            0.25, 0.92,
            "Shallow foundation without lateral capacity."),
        modifier("FOUND_SHALLOW_WITH_LATERAL",
            ModifierCondition { foundation_any: some_list(&["FOSSL"]), ..Default::default() },
            -0.25, 1.00,
            "Shallow foundation with lateral capacity."),
        // Exterior walls and infill.
        modifier("INFILL_MASONRY_ON_RC",
            ModifierCondition {
                exterior_wall_any: some_list(&["EWMA"]),
                family_any: Some(vec![Rc]),
                ..Default::default()
            },
            0.25, 0.92,
            "Masonry infill in an RC frame: short column potential."),
        modifier("INFILL_MASONRY_FROM_LFINF",
            ModifierCondition {
                system_any: some_list(&["LFINF"]),
                infill_any: some_list(&["MUR", "ADO", "CBH", "CBS", "CLBRS", "CLBRH"]),
                family_any: Some(vec![Rc]),
                ..Default::default()
            },
            0.25, 0.92,
            "Infilled RC frame with masonry infill coded on the system."),
        modifier("INFILL_EARTHEN_ON_RC",
            ModifierCondition {
                exterior_wall_any: some_list(&["EWE"]),
                family_any: Some(vec![Rc]),
                ..Default::default()
            },
            0.50, 0.90,
            "Earthen infill: large stiffness discontinuity."),
        modifier("WALL_CONCRETE_ON_RC",
            ModifierCondition {
                exterior_wall_any: some_list(&["EWC"]),
                family_any: Some(vec![Rc]),
                ..Default::default()
            },
            -0.25, 1.00,
            "Concrete exterior walls add lateral stiffness."),
        // Precast RC.
        modifier("PRECAST_NO_DUCTILITY_INFO",
            ModifierCondition {
                assigned_type_any: some_list(&["RC5-L", "RC5-M", "RC6-L", "RC6-M"]),
                erd_score_below: Some(0.30),
                ..Default::default()
            },
            0.50, 0.88,
            "Precast RC with historically variable connection quality."),
    ]
}

pub(super) fn build() -> EngineConfig {
    EngineConfig {
        vocabulary: vocabulary(),
        ductility_map: ductility_map(),
        material_aliases: material_aliases(),
        type_rules: type_rules(),
        fallback_groups: fallback_groups(),
        overrides: Vec::<ExactOverride>::new(),
        modifiers: modifiers(),
        rubric: CompletenessRubric {
            material_system_height_erd: 0.95,
            material_system_height: 0.80,
            material_height: 0.60,
            material_only: 0.40,
            partial: 0.20,
        },
        tuning: Tuning {
            max_cumulative_shift: 2.0,
            entropy_alpha: 0.25,
            credible_mass: 0.80,
            failsafe_label: "M4".to_string(),
        },
    }
}
