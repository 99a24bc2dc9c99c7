//! GEM v2.0 taxonomy string parser.
//!
//! A taxonomy string is a `/`-separated sequence of attribute blocks, each
//! block a `+`-separated sequence of tokens, e.g.
//! `CR/LFINF(MUR+CBH)+CDL+DUL/H:3/IND`. Blocks may appear in any order;
//! this parser routes each block by its head token rather than by
//! position, which tolerates the column reordering seen in real exposure
//! datasets.
//!
//! Parsing never fails. Tokens that match no known vocabulary are kept
//! verbatim in `AttributeSet::unrecognized` and reported as warnings, so
//! a typo degrades one attribute instead of the whole record.

pub mod tokens;

use crate::config::EngineConfig;
use crate::domain::{AttributeSet, HeightBin, YearTokenKind};

/// Stateless parser borrowing the alias and ductility tables.
pub struct GemParser<'a> {
    cfg: &'a EngineConfig,
}

impl<'a> GemParser<'a> {
    pub fn new(cfg: &'a EngineConfig) -> Self {
        Self { cfg }
    }

    /// Parse one taxonomy string into attributes plus parse warnings.
    pub fn parse(&self, input: &str) -> (AttributeSet, Vec<String>) {
        let mut out = AttributeSet::default();
        let mut warnings = Vec::new();

        for block in input.trim().split('/') {
            let block = block.trim();
            if block.is_empty() {
                continue;
            }
            out.raw_blocks.push(block.to_string());
            self.parse_block(block, &mut out, &mut warnings);
        }

        let (erd, score) =
            self.cfg.resolve_erd(out.code_level.as_deref(), out.ductility_token.as_deref());
        // The derived level is only meaningful when some token justified it.
        if out.code_level.is_some() || out.ductility_token.is_some() {
            out.erd = Some(erd);
        }
        out.erd_score = score;

        out.height_bin = out.storeys.and_then(HeightBin::from_storeys);

        (out, warnings)
    }

    /// Route one block to the attribute its head token belongs to.
    fn parse_block(&self, block: &str, out: &mut AttributeSet, warnings: &mut Vec<String>) {
        // Infilled frame with parenthetical infill: LFINF(MUR+CBH)+CDL+DUL.
        if let Some((system_tok, infill_raw, rest)) = split_infill(block) {
            if out.system.is_none() {
                out.system = Some(system_tok.to_string());
            }
            for tok in infill_raw.split('+').map(str::trim).filter(|t| !t.is_empty()) {
                out.infill_material.push(self.cfg.resolve_alias(tok).to_string());
            }
            let rest = rest.trim_start_matches('+');
            if !rest.is_empty() {
                self.absorb_level_tokens(rest.split('+'), out);
            }
            return;
        }

        if matches!(block, "DX" | "DY" | "D99") {
            out.directions.push(block.to_string());
            return;
        }

        let parts: Vec<&str> = block.split('+').map(str::trim).filter(|p| !p.is_empty()).collect();
        let Some(&head) = parts.first() else { return };

        if head.contains(':') {
            self.parse_numeric(head, out);
            return;
        }

        if tokens::IRREG_L1.contains(&head) {
            out.irregularity_l1 = Some(head.to_string());
            self.parse_irregularity(&parts[1..], out);
            return;
        }

        if tokens::PLAN_SHAPE.contains(&head) {
            out.plan_shape = Some(head.to_string());
            return;
        }

        if tokens::POSITION.contains(&head) {
            out.position = Some(head.to_string());
            return;
        }

        if tokens::EXTERIOR_WALL.contains(&head) {
            out.exterior_walls.push(head.to_string());
            return;
        }

        if tokens::FOUNDATION.contains(&head) {
            out.foundation = Some(head.to_string());
            return;
        }

        if tokens::FLOOR_CONN.contains(&head) {
            out.floor_connection = Some(head.to_string());
            return;
        }

        if tokens::ROOF_CONN.contains(&head) {
            out.roof_connections.push(head.to_string());
            return;
        }

        if tokens::ROOF_SHAPE.contains(&head) {
            out.roof_shape = Some(head.to_string());
            for p in &parts[1..] {
                self.classify_roof_token(p, out);
            }
            return;
        }

        if tokens::ROOF_COVERING.contains(&head) {
            out.roof_covering = Some(head.to_string());
            return;
        }

        // Occupancy must be checked before the roof-system stems: RES would
        // otherwise match the RE (earthen roof) prefix and be misrouted.
        if is_occupancy(head) {
            parse_occupancy(head, out);
            return;
        }

        if tokens::matches_stem(tokens::ROOF_SYSTEM_PREFIXES, head)
            && !tokens::MATERIAL_L1.contains(&head)
        {
            self.classify_roof_token(head, out);
            for p in &parts[1..] {
                self.classify_roof_token(p, out);
            }
            return;
        }

        if tokens::matches_stem(tokens::FLOOR_PREFIXES, head)
            && !tokens::MATERIAL_L1.contains(&head)
        {
            if out.floor_material.is_none() {
                out.floor_material = Some(head.to_string());
            }
            for p in &parts[1..] {
                if tokens::FLOOR_CONN.contains(p) {
                    out.floor_connection = Some(p.to_string());
                }
            }
            return;
        }

        let resolved = self.cfg.resolve_alias(head);
        if tokens::MATERIAL_L1.contains(&resolved) {
            self.parse_material(resolved, &parts[1..], out, warnings);
            return;
        }

        if tokens::SYSTEM_L1.contains(&head) {
            if out.system.is_none() {
                out.system = Some(head.to_string());
            }
            out.system_l2.extend(parts[1..].iter().map(|p| p.to_string()));
            self.absorb_level_tokens(parts[1..].iter().copied(), out);
            return;
        }

        // Unrouted block: salvage ductility/code tokens, keep the rest.
        for tok in parts {
            if tokens::CODE_LEVEL.contains(&tok) {
                set_code_level(tok, out);
            } else if tokens::DUCTILITY.contains(&tok) {
                set_ductility(tok, out);
            } else {
                warnings.push(format!("unrecognized token '{tok}'"));
                out.unrecognized.push(tok.to_string());
            }
        }
    }

    fn parse_numeric(&self, head: &str, out: &mut AttributeSet) {
        let Some((key, val)) = head.split_once(':') else { return };
        if tokens::HEIGHT_KEYS.contains(&key) {
            if out.storeys.is_none() {
                out.storeys = parse_height_value(val);
            }
        } else if tokens::YEAR_KEYS.contains(&key) && out.year_value.is_none() {
            out.year_kind = Some(year_kind(key));
            out.year_value = parse_year_value(val);
        }
    }

    fn parse_material(
        &self,
        token: &str,
        rest: &[&str],
        out: &mut AttributeSet,
        warnings: &mut Vec<String>,
    ) {
        if out.material.is_none() {
            out.material = Some(token.to_string());
        }
        out.material_all.push(token.to_string());

        for raw in rest {
            let tok = self.cfg.resolve_alias(raw);
            if tokens::MASONRY_UNIT.contains(&tok)
                || tokens::MASONRY_REINF.contains(&tok)
                || tokens::CONCRETE_TECH.contains(&tok)
            {
                out.material_l2.push(tok.to_string());
            } else if tokens::MORTAR.contains(&tok) || tokens::STONE_TYPE.contains(&tok) {
                out.material_l3.push(tok.to_string());
            } else if tokens::DUCTILITY.contains(&tok) {
                set_ductility(tok, out);
            } else if tokens::CODE_LEVEL.contains(&tok) {
                set_code_level(tok, out);
            } else if tokens::MATERIAL_L1.contains(&tok) {
                // Secondary material, e.g. CR+PC for precast.
                out.material_l2.push(tok.to_string());
                out.material_all.push(tok.to_string());
            } else {
                warnings.push(format!("unrecognized token '{tok}' in material block"));
                out.unrecognized.push(tok.to_string());
            }
        }
    }

    fn parse_irregularity(&self, detail: &[&str], out: &mut AttributeSet) {
        for tok in detail {
            if tokens::IRREG_PLAN.contains(tok) {
                out.irregularity_plan.push(tok.to_string());
            } else if tokens::IRREG_VERTICAL.contains(tok) {
                out.irregularity_vertical.push(tok.to_string());
            }
        }
    }

    fn classify_roof_token(&self, tok: &str, out: &mut AttributeSet) {
        if tokens::ROOF_COVERING.contains(&tok) {
            out.roof_covering = Some(tok.to_string());
        } else if tokens::ROOF_CONN.contains(&tok) {
            out.roof_connections.push(tok.to_string());
        } else if tokens::matches_stem(tokens::ROOF_SYSTEM_PREFIXES, tok)
            && out.roof_system.is_none()
        {
            out.roof_system = Some(tok.to_string());
        }
    }

    fn absorb_level_tokens<'t>(
        &self,
        toks: impl Iterator<Item = &'t str>,
        out: &mut AttributeSet,
    ) {
        for tok in toks {
            let tok = tok.trim();
            if tokens::CODE_LEVEL.contains(&tok) {
                set_code_level(tok, out);
            } else if tokens::DUCTILITY.contains(&tok) {
                set_ductility(tok, out);
            }
        }
    }
}

fn set_code_level(tok: &str, out: &mut AttributeSet) {
    if out.code_level.is_none() {
        out.code_level = Some(tok.to_string());
    }
}

fn set_ductility(tok: &str, out: &mut AttributeSet) {
    if out.ductility_token.is_none() {
        out.ductility_token = Some(tok.to_string());
    }
}

/// `LFINF(MUR+CBH)+CDL` -> (LFINF, MUR+CBH, +CDL).
fn split_infill(block: &str) -> Option<(&str, &str, &str)> {
    let open = block.find('(')?;
    let system_tok = &block[..open];
    if !matches!(system_tok, "LFINF" | "LFLSINF") {
        return None;
    }
    let close = block[open..].find(')')? + open;
    Some((system_tok, &block[open + 1..close], &block[close + 1..]))
}

fn is_occupancy(token: &str) -> bool {
    tokens::OCCUPANCY_L1.contains(&token)
        || tokens::OCCUPANCY_L1
            .iter()
            .any(|p| token.starts_with(p) && token.len() > p.len())
}

fn parse_occupancy(token: &str, out: &mut AttributeSet) {
    // Longest prefix wins so OC99 is not shadowed by a shorter stem.
    let mut prefixes: Vec<&str> = tokens::OCCUPANCY_L1.to_vec();
    prefixes.sort_by_key(|p| std::cmp::Reverse(p.len()));
    for p in prefixes {
        if token.starts_with(p) {
            out.occupancy = Some(p.to_string());
            out.occupancy_detail =
                (token.len() > p.len()).then(|| token.to_string());
            return;
        }
    }
    out.occupancy = Some(token.to_string());
}

/// Height values: `3`, `7-9` (upper), `10+` (lower), `9,7` (first),
/// `UNK` and friends (none).
fn parse_height_value(val: &str) -> Option<u32> {
    let val = val.trim();
    if matches!(val.to_ascii_uppercase().as_str(), "UNK" | "UNKN" | "?" | "") {
        return None;
    }
    if let Some((a, b)) = val.split_once(['-', '\u{2013}']) {
        if a.trim().parse::<u32>().is_ok() {
            if let Ok(upper) = b.trim().parse() {
                return Some(upper);
            }
        }
    }
    if let Some(lower) = val.strip_suffix('+') {
        if let Ok(n) = lower.parse() {
            return Some(n);
        }
    }
    if let Some((first, _)) = val.split_once(',') {
        return first.trim().parse().ok();
    }
    val.parse().ok()
}

/// Year values: plain integer, or `YBET:upper,lower` resolved to the midpoint.
fn parse_year_value(val: &str) -> Option<i32> {
    let val = val.trim();
    if let Some((a, b)) = val.split_once(',') {
        let a: i32 = a.trim().parse().ok()?;
        let b: i32 = b.trim().parse().ok()?;
        return Some((a + b) / 2);
    }
    val.parse().ok()
}

fn year_kind(key: &str) -> YearTokenKind {
    match key {
        "YEX" => YearTokenKind::Exact,
        "YBET" => YearTokenKind::Range,
        "YPRE" => YearTokenKind::Before,
        "YAPP" => YearTokenKind::Approximate,
        _ => YearTokenKind::Unknown,
    }
}
