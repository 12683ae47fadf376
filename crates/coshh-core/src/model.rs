use crate::error::CoshhError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Normalize an H- or P-phrase for lookup: strip whitespace and uppercase.
///
/// "h301 + h311" -> "H301+H311"
pub fn normalize_phrase(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// The base code of a phrase (the first four characters, e.g. "H360" for "H360FD").
pub fn base_code(raw: &str) -> String {
    normalize_phrase(raw).chars().take(4).collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalWord {
    Danger,
    Warning,
    #[default]
    None,
}

impl SignalWord {
    /// Anything other than "danger" or "warning" (trimmed, any case) is `None`.
    pub fn from_str_loose(s: &str) -> SignalWord {
        match s.trim().to_lowercase().as_str() {
            "danger" => SignalWord::Danger,
            "warning" => SignalWord::Warning,
            _ => SignalWord::None,
        }
    }

    /// Severity implied by the signal word alone.
    pub fn severity_floor(self) -> u8 {
        match self {
            SignalWord::Danger => 3,
            SignalWord::Warning => 2,
            SignalWord::None => 1,
        }
    }
}

impl fmt::Display for SignalWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalWord::Danger => write!(f, "Danger"),
            SignalWord::Warning => write!(f, "Warning"),
            SignalWord::None => Ok(()),
        }
    }
}

/// Severity score, always within 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Severity(u8);

impl Severity {
    pub const MIN: Severity = Severity(1);
    pub const MAX: Severity = Severity(5);

    /// Clamp a raw score into the valid range.
    pub fn from_score(score: u8) -> Severity {
        Severity(score.clamp(Self::MIN.0, Self::MAX.0))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "µg")]
    Microgram,
    #[serde(rename = "mg")]
    Milligram,
    #[serde(rename = "g")]
    Gram,
    #[serde(rename = "kg")]
    Kilogram,
    #[serde(rename = "µL")]
    Microlitre,
    #[serde(rename = "mL")]
    Millilitre,
    #[serde(rename = "L")]
    Litre,
}

impl Unit {
    pub const ALL: [Unit; 7] = [
        Unit::Microgram,
        Unit::Milligram,
        Unit::Gram,
        Unit::Kilogram,
        Unit::Microlitre,
        Unit::Millilitre,
        Unit::Litre,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Unit::Microgram => "µg",
            Unit::Milligram => "mg",
            Unit::Gram => "g",
            Unit::Kilogram => "kg",
            Unit::Microlitre => "µL",
            Unit::Millilitre => "mL",
            Unit::Litre => "L",
        }
    }

    pub fn is_volume(self) -> bool {
        matches!(self, Unit::Microlitre | Unit::Millilitre | Unit::Litre)
    }

    /// Power of 1000 that takes a value onto the shared likelihood scale.
    ///
    /// mg and mL are the base. Mass and volume share one scale, and kg shares
    /// the multiplier of g and L.
    fn likelihood_exponent(self) -> i32 {
        match self {
            Unit::Microgram | Unit::Microlitre => -1,
            Unit::Milligram | Unit::Millilitre => 0,
            Unit::Gram | Unit::Kilogram | Unit::Litre => 1,
        }
    }

    /// Power of 1000 that takes a value to grams (mass) or millilitres (volume).
    fn physical_exponent(self) -> i32 {
        match self {
            Unit::Microgram => -2,
            Unit::Milligram | Unit::Microlitre => -1,
            Unit::Gram | Unit::Millilitre => 0,
            Unit::Kilogram | Unit::Litre => 1,
        }
    }
}

/// Scale by a power of 1000. Negative powers divide rather than multiply by
/// an inexact fraction.
fn rescale(value: f64, exponent: i32) -> f64 {
    let factor = 1000f64.powi(exponent.abs());
    if exponent < 0 {
        value / factor
    } else {
        value * factor
    }
}

impl FromStr for Unit {
    type Err = CoshhError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // The micro sign and Greek mu are both accepted for micro units.
        let micro = s.strip_prefix('µ').or_else(|| s.strip_prefix('μ'));
        match (s, micro) {
            (_, Some("g")) => Ok(Unit::Microgram),
            (_, Some("L")) => Ok(Unit::Microlitre),
            ("mg", None) => Ok(Unit::Milligram),
            ("g", None) => Ok(Unit::Gram),
            ("kg", None) => Ok(Unit::Kilogram),
            ("mL", None) => Ok(Unit::Millilitre),
            ("L", None) => Ok(Unit::Litre),
            _ => Err(CoshhError::InvalidArgument(format!(
                "unit must be one of [{}], got '{}'",
                Unit::ALL.map(Unit::symbol).join(", "),
                s
            ))),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A validated amount of substance handled in one task.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    value: f64,
    unit: Unit,
}

impl Quantity {
    /// Fails with `InvalidArgument` for NaN or infinite values and with
    /// `RangeViolation` for negative values.
    pub fn new(value: f64, unit: Unit) -> Result<Quantity, CoshhError> {
        if !value.is_finite() {
            return Err(CoshhError::InvalidArgument(format!(
                "quantity must be a finite number, got {value}"
            )));
        }
        if value < 0.0 {
            return Err(CoshhError::RangeViolation(format!(
                "quantity must be non-negative, got {value}"
            )));
        }
        Ok(Quantity { value, unit })
    }

    /// Parse the unit from a string, then validate as `new`.
    pub fn parse(value: f64, unit: &str) -> Result<Quantity, CoshhError> {
        Quantity::new(value, unit.parse()?)
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// Value on the shared likelihood scale, where mg and mL are the base.
    pub fn normalized(&self) -> f64 {
        rescale(self.value, self.unit.likelihood_exponent())
    }

    /// COSHH Essentials quantity band: grams/millilitres are small,
    /// kilograms/litres medium, tonnes/cubic metres large.
    pub fn quantity_group(&self) -> QuantityGroup {
        let physical = rescale(self.value, self.unit.physical_exponent());
        if physical < 1_000.0 {
            QuantityGroup::Small
        } else if physical < 1_000_000.0 {
            QuantityGroup::Medium
        } else {
            QuantityGroup::Large
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    #[default]
    Rare,
    Weekly,
    Daily,
    MultipleDaily,
}

impl Frequency {
    /// Unrecognized values fall to the lowest tier.
    pub fn from_str_loose(s: &str) -> Frequency {
        match s.trim() {
            "multiple_daily" => Frequency::MultipleDaily,
            "daily" => Frequency::Daily,
            "weekly" => Frequency::Weekly,
            _ => Frequency::Rare,
        }
    }

    pub fn score(self) -> u8 {
        match self {
            Frequency::MultipleDaily => 3,
            Frequency::Daily => 2,
            Frequency::Weekly => 1,
            Frequency::Rare => 0,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Rare => write!(f, "rare"),
            Frequency::Weekly => write!(f, "weekly"),
            Frequency::Daily => write!(f, "daily"),
            Frequency::MultipleDaily => write!(f, "multiple_daily"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Duration {
    #[default]
    Short,
    Medium,
    Long,
    VeryLong,
}

impl Duration {
    /// Unrecognized values fall to the lowest tier.
    pub fn from_str_loose(s: &str) -> Duration {
        match s.trim() {
            "very_long" => Duration::VeryLong,
            "long" => Duration::Long,
            "medium" => Duration::Medium,
            _ => Duration::Short,
        }
    }

    pub fn score(self) -> u8 {
        match self {
            Duration::VeryLong => 3,
            Duration::Long => 2,
            Duration::Medium => 1,
            Duration::Short => 0,
        }
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Duration::Short => write!(f, "short"),
            Duration::Medium => write!(f, "medium"),
            Duration::Long => write!(f, "long"),
            Duration::VeryLong => write!(f, "very_long"),
        }
    }
}

/// Interpretation of a likelihood score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LikelihoodBand {
    VeryLow,
    LowToModerate,
    High,
    VeryHigh,
}

impl LikelihoodBand {
    pub fn from_score(score: Decimal) -> LikelihoodBand {
        if score < Decimal::from(3) {
            LikelihoodBand::VeryLow
        } else if score < Decimal::from(6) {
            LikelihoodBand::LowToModerate
        } else if score < Decimal::from(9) {
            LikelihoodBand::High
        } else {
            LikelihoodBand::VeryHigh
        }
    }
}

impl fmt::Display for LikelihoodBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LikelihoodBand::VeryLow => write!(f, "very low"),
            LikelihoodBand::LowToModerate => write!(f, "low to moderate"),
            LikelihoodBand::High => write!(f, "high"),
            LikelihoodBand::VeryHigh => write!(f, "very high"),
        }
    }
}

/// COSHH Essentials hazard group, ordered from least to most demanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HazardGroup {
    A,
    B,
    C,
    D,
    E,
    S,
}

impl HazardGroup {
    /// Groups that always need a bespoke specialist assessment.
    pub fn is_specialist(self) -> bool {
        matches!(self, HazardGroup::E | HazardGroup::S)
    }

    pub fn description(self) -> &'static str {
        match self {
            HazardGroup::A => "Minimal hazard (no significant health hazards)",
            HazardGroup::B => "Low hazard (lesser hazards, flammability)",
            HazardGroup::C => "Moderate hazard (harmful, irritant)",
            HazardGroup::D => "High hazard (toxic, corrosive)",
            HazardGroup::E => "Extreme hazard (fatal toxicity, severe organ damage)",
            HazardGroup::S => "Specialist (carcinogens, mutagens, reproductive toxins, respiratory sensitisers)",
        }
    }
}

impl fmt::Display for HazardGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            HazardGroup::A => "A",
            HazardGroup::B => "B",
            HazardGroup::C => "C",
            HazardGroup::D => "D",
            HazardGroup::E => "E",
            HazardGroup::S => "S",
        };
        write!(f, "{letter}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantityGroup {
    Small,
    Medium,
    Large,
}

impl FromStr for QuantityGroup {
    type Err = CoshhError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "small" => Ok(QuantityGroup::Small),
            "medium" => Ok(QuantityGroup::Medium),
            "large" => Ok(QuantityGroup::Large),
            _ => Err(CoshhError::InvalidArgument(format!(
                "quantity group must be small, medium or large, got '{s}'"
            ))),
        }
    }
}

impl fmt::Display for QuantityGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuantityGroup::Small => write!(f, "Small"),
            QuantityGroup::Medium => write!(f, "Medium"),
            QuantityGroup::Large => write!(f, "Large"),
        }
    }
}

/// Dustiness (solids) or volatility (liquids) tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhysicalCharacteristics {
    Low,
    #[default]
    Medium,
    High,
}

impl PhysicalCharacteristics {
    /// Column index into a control-band matrix row.
    pub fn index(self) -> usize {
        match self {
            PhysicalCharacteristics::Low => 0,
            PhysicalCharacteristics::Medium => 1,
            PhysicalCharacteristics::High => 2,
        }
    }
}

impl FromStr for PhysicalCharacteristics {
    type Err = CoshhError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(PhysicalCharacteristics::Low),
            "medium" => Ok(PhysicalCharacteristics::Medium),
            "high" => Ok(PhysicalCharacteristics::High),
            _ => Err(CoshhError::InvalidArgument(format!(
                "physical characteristics must be low, medium or high, got '{s}'"
            ))),
        }
    }
}

impl fmt::Display for PhysicalCharacteristics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicalCharacteristics::Low => write!(f, "Low"),
            PhysicalCharacteristics::Medium => write!(f, "Medium"),
            PhysicalCharacteristics::High => write!(f, "High"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ControlBand {
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "S")]
    Specialist,
}

impl ControlBand {
    pub const ALL: [ControlBand; 5] = [
        ControlBand::One,
        ControlBand::Two,
        ControlBand::Three,
        ControlBand::Four,
        ControlBand::Specialist,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ControlBand::One => "1",
            ControlBand::Two => "2",
            ControlBand::Three => "3",
            ControlBand::Four => "4",
            ControlBand::Specialist => "S",
        }
    }

    pub fn approach(self) -> &'static str {
        match self {
            ControlBand::One => "General ventilation",
            ControlBand::Two => "Engineering control (LEV)",
            ControlBand::Three => "Containment",
            ControlBand::Four => "Special: seek specialist advice",
            ControlBand::Specialist => "Specialist assessment (CMR / sensitiser)",
        }
    }
}

impl FromStr for ControlBand {
    type Err = CoshhError;

    /// Accepts "1".."4" and "S", case-insensitive, with an optional "band" prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        // "band" must stand alone as a word before the label
        let key = match lower.strip_prefix("band") {
            Some(rest) if rest.starts_with(char::is_whitespace) => rest.trim(),
            _ => lower.as_str(),
        };
        match key {
            "1" => Ok(ControlBand::One),
            "2" => Ok(ControlBand::Two),
            "3" => Ok(ControlBand::Three),
            "4" => Ok(ControlBand::Four),
            "s" => Ok(ControlBand::Specialist),
            _ => Err(CoshhError::NotFound(format!("control band '{s}'"))),
        }
    }
}

impl fmt::Display for ControlBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExposureRoute {
    Inhalation,
    SkinContact,
    EyeContact,
    Ingestion,
}

impl fmt::Display for ExposureRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExposureRoute::Inhalation => write!(f, "Inhalation"),
            ExposureRoute::SkinContact => write!(f, "Skin contact"),
            ExposureRoute::EyeContact => write!(f, "Eye contact"),
            ExposureRoute::Ingestion => write!(f, "Ingestion"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::Low => write!(f, "low"),
            Confidence::Medium => write!(f, "medium"),
            Confidence::High => write!(f, "high"),
        }
    }
}

/// A best-effort extracted value. `value == None` means "not found" and
/// always carries `Confidence::Low`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extracted<T> {
    pub value: Option<T>,
    pub confidence: Confidence,
}

impl<T> Extracted<T> {
    pub fn found(value: T, confidence: Confidence) -> Self {
        Extracted {
            value: Some(value),
            confidence,
        }
    }

    pub fn not_found() -> Self {
        Extracted {
            value: None,
            confidence: Confidence::Low,
        }
    }

    pub fn is_found(&self) -> bool {
        self.value.is_some()
    }
}
