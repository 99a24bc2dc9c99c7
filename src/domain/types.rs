//! Core domain types for taxonomy translation.

use serde::{Deserialize, Serialize};

use crate::math;

/// EMS-98 vulnerability class, ordered from most (A) to least (F) vulnerable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VcClass {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl VcClass {
    pub const ALL: [VcClass; 6] = [
        VcClass::A,
        VcClass::B,
        VcClass::C,
        VcClass::D,
        VcClass::E,
        VcClass::F,
    ];

    /// Zero-based position (A=0 .. F=5).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Conventional one-based integer (A=1 .. F=6).
    pub fn number(self) -> u8 {
        self as u8 + 1
    }

    pub fn letter(self) -> char {
        match self {
            VcClass::A => 'A',
            VcClass::B => 'B',
            VcClass::C => 'C',
            VcClass::D => 'D',
            VcClass::E => 'E',
            VcClass::F => 'F',
        }
    }

    pub fn from_index(i: usize) -> Option<VcClass> {
        VcClass::ALL.get(i).copied()
    }

    pub fn from_letter(c: char) -> Option<VcClass> {
        match c.to_ascii_uppercase() {
            'A' => Some(VcClass::A),
            'B' => Some(VcClass::B),
            'C' => Some(VcClass::C),
            'D' => Some(VcClass::D),
            'E' => Some(VcClass::E),
            'F' => Some(VcClass::F),
            _ => None,
        }
    }
}

impl std::fmt::Display for VcClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Probability distribution over the six vulnerability classes, ordered A..F.
///
/// Invariant (after construction through the engine): entries are
/// non-negative and sum to 1 within 1e-6, with zero mass outside the
/// admissible class range of the governing type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VcDistribution(pub [f64; 6]);

impl VcDistribution {
    pub fn zero() -> Self {
        VcDistribution([0.0; 6])
    }

    /// Single-point mass on one class.
    pub fn point_mass(class: VcClass) -> Self {
        let mut d = VcDistribution::zero();
        d.0[class.index()] = 1.0;
        d
    }

    /// Uniform mass over the inclusive index range `lo..=hi`.
    pub fn uniform_in(lo: usize, hi: usize) -> Self {
        let mut d = VcDistribution::zero();
        let n = hi.saturating_sub(lo) + 1;
        for p in d.0.iter_mut().take(hi + 1).skip(lo) {
            *p = 1.0 / n as f64;
        }
        d
    }

    pub fn get(&self, class: VcClass) -> f64 {
        self.0[class.index()]
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Clamp negatives to zero and rescale to sum 1 (all-zero stays all-zero).
    pub fn normalized(&self) -> Self {
        VcDistribution(math::normalize(&self.0))
    }

    /// Modal class; ties break toward the more vulnerable (lower) class.
    pub fn mode(&self) -> VcClass {
        let mut best = 0;
        for (i, &p) in self.0.iter().enumerate() {
            if p > self.0[best] {
                best = i;
            }
        }
        VcClass::ALL[best]
    }

    /// Shannon entropy in nats.
    pub fn entropy(&self) -> f64 {
        math::entropy(&self.0)
    }

    /// Shortest contiguous class interval covering at least `mass`.
    pub fn credible_range(&self, mass: f64) -> CredibleRange {
        let (lo, hi) = math::credible_interval(&self.0, mass);
        CredibleRange {
            low: VcClass::ALL[lo],
            high: VcClass::ALL[hi],
        }
    }

    /// Probability-weighted mean class number (A=1 .. F=6).
    pub fn mean_class_number(&self) -> f64 {
        self.0
            .iter()
            .enumerate()
            .map(|(i, &p)| (i + 1) as f64 * p)
            .sum()
    }
}

/// Contiguous vulnerability-class interval (inclusive on both ends).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredibleRange {
    pub low: VcClass,
    pub high: VcClass,
}

impl std::fmt::Display for CredibleRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

/// Structural material family derived from the material token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Family {
    Rc,
    Masonry,
    Steel,
    Timber,
}

/// Earthquake-resistant design level derived from code-level and ductility
/// tokens. The letter feeds type templates like `RC1-{erd}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErdLevel {
    L,
    M,
    H,
}

impl ErdLevel {
    pub fn letter(self) -> &'static str {
        match self {
            ErdLevel::L => "L",
            ErdLevel::M => "M",
            ErdLevel::H => "H",
        }
    }
}

/// Ordinal height bin from the resolved storey count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeightBin {
    /// 1-3 storeys.
    Low,
    /// 4-7 storeys.
    Mid,
    /// 8+ storeys.
    High,
}

impl HeightBin {
    pub fn from_storeys(storeys: u32) -> Option<HeightBin> {
        match storeys {
            1..=3 => Some(HeightBin::Low),
            4..=7 => Some(HeightBin::Mid),
            _ if storeys >= 8 => Some(HeightBin::High),
            _ => None,
        }
    }
}

/// Diagnostic flags raised during translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Flag {
    HeightMissing,
    ErdDefaulted,
    SystemMissing,
    /// A probabilistic (one-to-many) or failsafe type assignment was used.
    FallbackAssignment,
    ModifierApplied,
    ExactOverride,
    /// A rule produced a label absent from the vocabulary; the global
    /// failsafe label was substituted.
    UnknownTypeSubstituted,
}

/// Year token kind seen in the date block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum YearTokenKind {
    Exact,
    Range,
    Before,
    Approximate,
    Unknown,
}

/// All attributes parsed from one taxonomy string.
///
/// Created once per input by the parser; the assignment engine fills in
/// the derived `family` and nothing else is mutated afterwards.
/// Unrecognized tokens are preserved verbatim in `unrecognized`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttributeSet {
    // Material (L1/L2/L3).
    pub material: Option<String>,
    pub material_l2: Vec<String>,
    pub material_l3: Vec<String>,
    pub material_all: Vec<String>,

    // Lateral load-resisting system.
    pub system: Option<String>,
    pub system_l2: Vec<String>,
    pub infill_material: Vec<String>,

    // Ductility / code level, and the derived ERD pair.
    pub code_level: Option<String>,
    pub ductility_token: Option<String>,
    pub erd: Option<ErdLevel>,
    pub erd_score: f64,

    // Height.
    pub storeys: Option<u32>,
    pub height_bin: Option<HeightBin>,

    // Year.
    pub year_value: Option<i32>,
    pub year_kind: Option<YearTokenKind>,

    // Secondary attributes.
    pub occupancy: Option<String>,
    pub occupancy_detail: Option<String>,
    pub directions: Vec<String>,
    pub position: Option<String>,
    pub plan_shape: Option<String>,
    pub irregularity_l1: Option<String>,
    pub irregularity_plan: Vec<String>,
    pub irregularity_vertical: Vec<String>,
    pub exterior_walls: Vec<String>,
    pub roof_shape: Option<String>,
    pub roof_covering: Option<String>,
    pub roof_system: Option<String>,
    pub roof_connections: Vec<String>,
    pub floor_material: Option<String>,
    pub floor_connection: Option<String>,
    pub foundation: Option<String>,

    // Derived.
    pub family: Option<Family>,

    // Raw material for diagnostics.
    pub raw_blocks: Vec<String>,
    pub unrecognized: Vec<String>,
}

impl AttributeSet {
    /// ERD level with the documented default of L when nothing was parsed.
    pub fn erd_or_default(&self) -> ErdLevel {
        self.erd.unwrap_or(ErdLevel::L)
    }
}

/// One weighted EMS type candidate produced by the assignment engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeCandidate {
    pub label: String,
    pub weight: f64,
    /// Completeness rubric x rule confidence penalty.
    pub confidence: f64,
    pub rule_id: String,
    /// True when the candidate came from a weighted fallback group.
    pub distributed: bool,
}

/// One modifier rule that fired, with its realized contribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiredModifier {
    pub id: String,
    /// Signed contribution to the cumulative shift (after the per-rule cap).
    pub shift: f64,
    pub confidence_penalty: f64,
}

/// Headline summary of one translation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultSummary {
    pub best_type: String,
    pub best_type_weight: f64,
    pub modal_class: VcClass,
    pub modal_class_base: VcClass,
    pub credible_range_80: CredibleRange,
    pub credible_range_80_base: CredibleRange,
    pub exact_override: bool,
    pub modifiers_fired: usize,
    /// Total realized shift, after the cumulative cap.
    pub cumulative_shift: f64,
}

/// Uncertainty diagnostics for one translation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UncertaintyReport {
    pub missing_attributes: Vec<String>,
    /// Shannon entropy (nats) of the type-candidate distribution.
    pub type_entropy: f64,
    pub vc_entropy: f64,
    pub vc_entropy_base: f64,
    /// Weight gap between the top two type candidates (1.0 if single).
    pub top1_margin: f64,
    /// Product of all fired modifiers' confidence penalties.
    pub modifier_penalty: f64,
    pub flags: Vec<Flag>,
}

/// Complete output of translating one taxonomy string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationResult {
    pub input: String,
    pub attributes: AttributeSet,
    /// Ranked type candidates, best first.
    pub candidates: Vec<TypeCandidate>,
    /// Final VC distribution (after modifiers).
    pub vc_probs: VcDistribution,
    /// Base VC distribution (before modifiers).
    pub vc_probs_base: VcDistribution,
    pub vc_class: VcClass,
    pub vc_class_base: VcClass,
    /// Modal class as the 1..=6 scale value (A=1 .. F=6).
    pub vc_class_int: u8,
    pub vc_class_base_int: u8,
    pub fired_modifiers: Vec<FiredModifier>,
    pub confidence: f64,
    pub warnings: Vec<String>,
    pub summary: ResultSummary,
    pub uncertainty: UncertaintyReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vc_class_round_trips_through_index() {
        for c in VcClass::ALL {
            assert_eq!(VcClass::from_index(c.index()), Some(c));
            assert_eq!(VcClass::from_letter(c.letter()), Some(c));
        }
        assert_eq!(VcClass::A.number(), 1);
        assert_eq!(VcClass::F.number(), 6);
    }

    #[test]
    fn point_mass_has_zero_entropy_and_expected_mode() {
        let d = VcDistribution::point_mass(VcClass::D);
        assert_eq!(d.mode(), VcClass::D);
        assert!(d.entropy().abs() < 1e-12);
        assert!((d.sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn uniform_in_covers_only_the_range() {
        let d = VcDistribution::uniform_in(1, 3);
        assert!((d.sum() - 1.0).abs() < 1e-12);
        assert_eq!(d.get(VcClass::A), 0.0);
        assert!((d.get(VcClass::B) - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(d.get(VcClass::E), 0.0);
    }

    #[test]
    fn height_bins_follow_storey_cutoffs() {
        assert_eq!(HeightBin::from_storeys(1), Some(HeightBin::Low));
        assert_eq!(HeightBin::from_storeys(3), Some(HeightBin::Low));
        assert_eq!(HeightBin::from_storeys(4), Some(HeightBin::Mid));
        assert_eq!(HeightBin::from_storeys(7), Some(HeightBin::Mid));
        assert_eq!(HeightBin::from_storeys(8), Some(HeightBin::High));
        assert_eq!(HeightBin::from_storeys(0), None);
    }
}
