use crate::model::normalize_phrase;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad hazard classes used in assessment summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardClass {
    Flammable,
    AcutelyToxicFatal,
    AcutelyToxic,
    Corrosive,
    Irritant,
    Sensitiser,
    Carcinogen,
    Mutagen,
    ReproductiveToxin,
}

impl HazardClass {
    pub fn label(self) -> &'static str {
        match self {
            HazardClass::Flammable => "Flammable",
            HazardClass::AcutelyToxicFatal => "Acutely Toxic (Fatal)",
            HazardClass::AcutelyToxic => "Acutely Toxic",
            HazardClass::Corrosive => "Corrosive/Serious Eye Damage",
            HazardClass::Irritant => "Irritant (Skin/Eye)",
            HazardClass::Sensitiser => "Sensitiser",
            HazardClass::Carcinogen => "Carcinogen",
            HazardClass::Mutagen => "Mutagen",
            HazardClass::ReproductiveToxin => "Reproductive Toxin",
        }
    }
}

impl fmt::Display for HazardClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Hazard classes present in a set of H-phrases, in a fixed order.
///
/// Fatal toxicity supersedes plain acute toxicity and corrosion supersedes
/// irritation. Combined codes ("H301+H311") contribute every part.
pub fn hazard_classes<S: AsRef<str>>(h_phrases: &[S]) -> Vec<HazardClass> {
    let codes: Vec<String> = h_phrases
        .iter()
        .flat_map(|p| {
            normalize_phrase(p.as_ref())
                .split('+')
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect();
    let any = |prefixes: &[&str]| {
        codes
            .iter()
            .any(|c| prefixes.iter().any(|prefix| c.starts_with(prefix)))
    };

    let mut classes = Vec::new();
    if any(&["H22"]) {
        classes.push(HazardClass::Flammable);
    }
    if any(&["H300", "H310", "H330"]) {
        classes.push(HazardClass::AcutelyToxicFatal);
    } else if any(&["H301", "H311", "H331"]) {
        classes.push(HazardClass::AcutelyToxic);
    }
    if any(&["H314", "H318"]) {
        classes.push(HazardClass::Corrosive);
    } else if any(&["H315", "H319"]) {
        classes.push(HazardClass::Irritant);
    }
    if any(&["H317", "H334"]) {
        classes.push(HazardClass::Sensitiser);
    }
    if any(&["H350", "H351"]) {
        classes.push(HazardClass::Carcinogen);
    }
    if any(&["H340", "H341"]) {
        classes.push(HazardClass::Mutagen);
    }
    if any(&["H360", "H361"]) {
        classes.push(HazardClass::ReproductiveToxin);
    }
    classes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        assert!(hazard_classes::<&str>(&[]).is_empty());
        assert!(hazard_classes(&["H999"]).is_empty());
    }

    #[test]
    fn test_fatal_supersedes_toxic() {
        assert_eq!(
            hazard_classes(&["H301", "H330"]),
            vec![HazardClass::AcutelyToxicFatal]
        );
    }

    #[test]
    fn test_corrosive_supersedes_irritant() {
        assert_eq!(
            hazard_classes(&["H315", "H314"]),
            vec![HazardClass::Corrosive]
        );
    }

    #[test]
    fn test_order_is_fixed() {
        assert_eq!(
            hazard_classes(&["H360FD", "H350", "H225", "h317"]),
            vec![
                HazardClass::Flammable,
                HazardClass::Sensitiser,
                HazardClass::Carcinogen,
                HazardClass::ReproductiveToxin,
            ]
        );
    }

    #[test]
    fn test_combined_code_parts() {
        assert_eq!(
            hazard_classes(&["H302+H319"]),
            vec![HazardClass::Irritant]
        );
    }
}
