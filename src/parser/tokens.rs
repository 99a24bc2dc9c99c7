//! GEM v2.0 token vocabularies used to route blocks during parsing.
//!
//! Sets follow the GEM Building Taxonomy v2.0 appendix tables. Prefix
//! arrays are for attribute groups the taxonomy encodes as families of
//! tokens sharing a stem (roof system materials, floor materials).

/// Material L1 tokens (Table 2).
pub const MATERIAL_L1: &[&str] = &[
    "MAT99", "C99", "CU", "CR", "SRC",
    "S", "S99", "SL", "SR", "SO",
    "ME", "ME99", "MEIR", "MEO",
    "M99", "MUR", "MCF", "MR", "MO",
    "E99", "EU", "ER",
    "W", "W99", "WHE", "WLI", "WS", "WWD", "WBB", "WO",
    "MATO",
];

/// Masonry unit technology tokens (L2).
pub const MASONRY_UNIT: &[&str] = &[
    "MUN99", "ADO",
    "ST99", "STRUB", "STDRE",
    "CL99", "CLBRS", "CLBRH", "CLBLH",
    "CB99", "CBS", "CBH",
    "MO",
];

/// Masonry reinforcement tokens (L2).
pub const MASONRY_REINF: &[&str] = &["MR99", "RS", "RW", "RB", "RCM", "RCB"];

/// Concrete technology tokens (L2). PC/PCPS select the precast type rules.
pub const CONCRETE_TECH: &[&str] = &["CT99", "CIP", "PC", "PCPS"];

/// Mortar tokens (L3).
pub const MORTAR: &[&str] = &["MO99", "MON", "MOM", "MOL", "MOC", "MOCL"];

/// Stone type tokens (L3).
pub const STONE_TYPE: &[&str] = &[
    "SP99", "SPLI", "SPSA", "SPTU", "SPSL", "SPGR", "SPBA", "SPO",
];

/// Lateral load-resisting system L1 tokens (Table 3).
pub const SYSTEM_L1: &[&str] = &[
    "L99", "LN", "LFM", "LFINF", "LFBR", "LPB",
    "LWAL", "LDUAL", "LFLS", "LFLSINF", "LH", "LO",
];

pub const CODE_LEVEL: &[&str] = &["CDL", "CDM", "CDH"];
pub const DUCTILITY: &[&str] = &["DUL", "DUM", "DNO", "DUC", "DBD", "DU99"];

pub const IRREG_L1: &[&str] = &["IR99", "IRRE", "IRIR"];
/// Irregularity detail tokens that describe the plan.
pub const IRREG_PLAN: &[&str] = &["TOR", "REC", "IRHO"];
/// Irregularity detail tokens that describe the vertical configuration.
pub const IRREG_VERTICAL: &[&str] = &["SOS", "CRW", "SHC", "POP", "SET", "CHV", "IRVO"];

pub const OCCUPANCY_L1: &[&str] = &[
    "OC99", "RES", "COM", "MIX", "IND", "AGR", "ASS", "GOV", "EDU", "OCO",
];

pub const POSITION: &[&str] = &["BP99", "BPD", "BP1", "BP2", "BP3"];

pub const PLAN_SHAPE: &[&str] = &[
    "PLF99", "PLFSQ", "PLFSQO", "PLFR", "PLFRO", "PLFL", "PLFC", "PLFCO",
    "PLFD", "PLFDO", "PLFP", "PLFPO", "PLFE", "PLFH", "PLFS", "PLFT",
    "PLFU", "PLFX", "PLFY", "PLFI",
];

pub const EXTERIOR_WALL: &[&str] = &[
    "EW99", "EWC", "EWG", "EWE", "EWMA", "EWME", "EWV", "EWW", "EWSL", "EWPL", "EWCB", "EWO",
];

pub const ROOF_SHAPE: &[&str] = &[
    "RSH99", "RSH1", "RSH2", "RSH3", "RSH4", "RSH5", "RSH6", "RSH7", "RSH8", "RSH9", "RSHO",
];

pub const ROOF_COVERING: &[&str] = &[
    "RMT99", "RMN", "RMT1", "RMT2", "RMT3", "RMT4", "RMT5", "RMT6",
    "RMT7", "RMT8", "RMT9", "RMT10", "RMT11", "RMTO",
];

/// Roof system-material token stems (matched by prefix).
pub const ROOF_SYSTEM_PREFIXES: &[&str] = &["RM", "RE", "RC", "RME", "RWO", "RFA", "RO", "R99"];

/// Floor material token stems (matched by prefix).
pub const FLOOR_PREFIXES: &[&str] = &["FM", "FE", "FC", "FME", "FW", "FO", "FN", "F99"];
pub const FLOOR_CONN: &[&str] = &["FWC99", "FWCN", "FWCP"];

pub const ROOF_CONN: &[&str] = &["RWC99", "RWCN", "RWCP", "RTD99", "RTDN", "RTDP"];

pub const FOUNDATION: &[&str] = &["FOS99", "FOSSL", "FOSN", "FOSDL", "FOSDN", "FOSO"];

/// Key halves of `key:value` height blocks.
pub const HEIGHT_KEYS: &[&str] = &["H", "HBET", "HEX", "HAPP"];
/// Key halves of `key:value` year blocks.
pub const YEAR_KEYS: &[&str] = &["YEX", "YBET", "YPRE", "YAPP", "Y99"];

/// A token belongs to a stem family when it is the bare stem or the stem
/// followed by a numeric variant, e.g. `FW`, `FC2`, `RWO2`. Anything else
/// (such as `FOO`) is not a member and must stay unrouted.
pub fn matches_stem(stems: &[&str], token: &str) -> bool {
    stems.iter().any(|s| match token.strip_prefix(s) {
        Some(rest) => rest.is_empty() || rest.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    })
}
