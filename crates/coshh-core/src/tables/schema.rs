use crate::error::CoshhError;
use crate::model::{
    normalize_phrase, ControlBand, ExposureRoute, HazardGroup, PhysicalCharacteristics,
    QuantityGroup,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fallback hazard groups for phrases the group table does not cover.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackGroups {
    /// Used when no supplied phrase matches the table (conservative default).
    pub unmapped: HazardGroup,
    /// Low-severity hazards that are not explicitly mapped.
    pub low_severity: HazardGroup,
    /// Substances with no significant health hazard.
    pub no_significant_hazard: HazardGroup,
}

impl FallbackGroups {
    /// Each fallback with a short label, in table order.
    pub fn entries(&self) -> [(&'static str, HazardGroup); 3] {
        [
            ("unmapped phrases", self.unmapped),
            ("low severity, not mapped", self.low_severity),
            ("no significant hazard", self.no_significant_hazard),
        ]
    }
}

/// H-phrase knowledge: severity, hazard group and GHS pictogram per base code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HazardTable {
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Severity for phrases that are present but match no entry.
    pub default_severity: u8,
    /// Base code (e.g. "H350") -> severity 1..=5.
    pub severity: BTreeMap<String, u8>,
    /// Base code -> COSHH Essentials hazard group.
    pub hazard_groups: BTreeMap<String, HazardGroup>,
    pub fallback_groups: FallbackGroups,
    /// Base code -> GHS pictogram code (e.g. "GHS08").
    #[serde(default)]
    pub pictograms: BTreeMap<String, String>,
}

/// Table entries whose key the normalized phrase starts with.
fn prefix_matches<'a, V>(
    map: &'a BTreeMap<String, V>,
    phrase: &str,
) -> impl Iterator<Item = (&'a String, &'a V)> + 'a {
    let normalized = normalize_phrase(phrase);
    map.iter()
        .filter(move |(key, _)| normalized.starts_with(key.as_str()))
}

impl HazardTable {
    /// Highest severity among the entries this phrase starts with.
    pub fn severity_of(&self, phrase: &str) -> Option<u8> {
        prefix_matches(&self.severity, phrase)
            .map(|(_, &sev)| sev)
            .max()
    }

    /// Highest-ranked hazard group among the entries this phrase starts with.
    pub fn group_of(&self, phrase: &str) -> Option<HazardGroup> {
        prefix_matches(&self.hazard_groups, phrase)
            .map(|(_, &group)| group)
            .max()
    }

    pub fn pictogram_of(&self, phrase: &str) -> Option<&str> {
        prefix_matches(&self.pictograms, phrase)
            .map(|(_, ghs)| ghs.as_str())
            .next()
    }
}

/// A laboratory procedure and its exposure characteristics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcedureProfile {
    /// Catalog key (filled in from the map key when loading).
    #[serde(default)]
    pub name: String,
    pub description: String,
    /// Default volume category for the procedure.
    pub volume_category: QuantityGroup,
    /// 0..=1, how much the procedure exposes the operator.
    pub exposure_factor: Decimal,
    /// 0..=1, aerosol generation potential.
    pub aerosol_factor: Decimal,
    #[serde(default)]
    pub routes: Vec<ExposureRoute>,
}

impl ProcedureProfile {
    /// A user-described procedure with explicit factors.
    pub fn custom(
        name: &str,
        exposure_factor: Decimal,
        aerosol_factor: Decimal,
    ) -> Result<ProcedureProfile, CoshhError> {
        let profile = ProcedureProfile {
            name: name.to_string(),
            description: name.to_string(),
            volume_category: QuantityGroup::Medium,
            exposure_factor,
            aerosol_factor,
            routes: vec![],
        };
        profile.check_factors().map_err(CoshhError::RangeViolation)?;
        Ok(profile)
    }

    pub(crate) fn check_factors(&self) -> Result<(), String> {
        for (label, factor) in [
            ("exposure_factor", self.exposure_factor),
            ("aerosol_factor", self.aerosol_factor),
        ] {
            if factor < Decimal::ZERO || factor > Decimal::ONE {
                return Err(format!(
                    "procedure '{}' has {} {} outside 0..=1",
                    self.name, label, factor
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcedureCatalog {
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
    pub procedures: BTreeMap<String, ProcedureProfile>,
}

impl ProcedureCatalog {
    /// Look up a procedure by catalog key.
    pub fn get(&self, name: &str) -> Result<&ProcedureProfile, CoshhError> {
        self.procedures
            .get(name.trim())
            .ok_or_else(|| CoshhError::NotFound(format!("procedure '{name}'")))
    }
}

/// Bands for one hazard group: one row per quantity group, one column per
/// physical-characteristics tier (low, medium, high).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BandRow {
    pub small: [ControlBand; 3],
    pub medium: [ControlBand; 3],
    pub large: [ControlBand; 3],
}

impl BandRow {
    pub fn band(&self, quantity: QuantityGroup, physical: PhysicalCharacteristics) -> ControlBand {
        let row = match quantity {
            QuantityGroup::Small => &self.small,
            QuantityGroup::Medium => &self.medium,
            QuantityGroup::Large => &self.large,
        };
        row[physical.index()]
    }
}

/// Control-band matrix for groups A to D. Groups E and S have no row: they
/// always resolve to the specialist band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlBandMatrix {
    #[serde(rename = "A")]
    pub a: BandRow,
    #[serde(rename = "B")]
    pub b: BandRow,
    #[serde(rename = "C")]
    pub c: BandRow,
    #[serde(rename = "D")]
    pub d: BandRow,
}

impl ControlBandMatrix {
    pub fn row(&self, group: HazardGroup) -> Option<&BandRow> {
        match group {
            HazardGroup::A => Some(&self.a),
            HazardGroup::B => Some(&self.b),
            HazardGroup::C => Some(&self.c),
            HazardGroup::D => Some(&self.d),
            HazardGroup::E | HazardGroup::S => None,
        }
    }
}

/// Recommended control measures for a control band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlBandProfile {
    /// General control measure identifier (e.g. "LEV200_201").
    pub general: String,
    /// PPE guidance sheet identifier.
    pub ppe_sheet: String,
    pub ppe_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlBandTable {
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
    pub matrix: ControlBandMatrix,
    pub profiles: BTreeMap<ControlBand, ControlBandProfile>,
}

impl ControlBandTable {
    pub fn profile(&self, band: ControlBand) -> Result<&ControlBandProfile, CoshhError> {
        self.profiles
            .get(&band)
            .ok_or_else(|| CoshhError::NotFound(format!("control band profile '{band}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn table() -> HazardTable {
        HazardTable {
            version: "test".into(),
            description: None,
            default_severity: 1,
            severity: BTreeMap::from([("H350".into(), 5), ("H315".into(), 3)]),
            hazard_groups: BTreeMap::from([("H350".into(), HazardGroup::S)]),
            fallback_groups: FallbackGroups {
                unmapped: HazardGroup::C,
                low_severity: HazardGroup::B,
                no_significant_hazard: HazardGroup::A,
            },
            pictograms: BTreeMap::from([("H350".into(), "GHS08".into())]),
        }
    }

    #[test]
    fn test_prefix_lookup() {
        let t = table();
        assert_eq!(t.severity_of("h350i"), Some(5));
        assert_eq!(t.severity_of("H315"), Some(3));
        assert_eq!(t.severity_of("H999"), None);
        assert_eq!(t.group_of("H350"), Some(HazardGroup::S));
        assert_eq!(t.group_of("H315"), None);
        assert_eq!(t.pictogram_of("H350 "), Some("GHS08"));
    }

    #[test]
    fn test_fallback_entries() {
        let groups: Vec<HazardGroup> = table()
            .fallback_groups
            .entries()
            .iter()
            .map(|&(_, g)| g)
            .collect();
        assert_eq!(groups, vec![HazardGroup::C, HazardGroup::B, HazardGroup::A]);
    }

    #[test]
    fn test_combined_code_uses_first_base() {
        let t = table();
        assert_eq!(t.severity_of("H315+H350"), Some(3));
    }

    #[test]
    fn test_custom_procedure_range() {
        assert!(ProcedureProfile::custom("x", dec!(0.5), dec!(1)).is_ok());
        assert!(matches!(
            ProcedureProfile::custom("x", dec!(1.5), dec!(0)),
            Err(CoshhError::RangeViolation(_))
        ));
    }

    #[test]
    fn test_band_row_lookup() {
        let row = BandRow {
            small: [ControlBand::One, ControlBand::Two, ControlBand::Two],
            medium: [ControlBand::Two, ControlBand::Three, ControlBand::Three],
            large: [ControlBand::Two, ControlBand::Four, ControlBand::Four],
        };
        assert_eq!(
            row.band(QuantityGroup::Large, PhysicalCharacteristics::High),
            ControlBand::Four
        );
        assert_eq!(
            row.band(QuantityGroup::Small, PhysicalCharacteristics::Low),
            ControlBand::One
        );
    }
}
