pub mod builtin;
pub mod schema;

use crate::error::CoshhError;
use crate::model::ControlBand;
use schema::{ControlBandTable, HazardTable, ProcedureCatalog};
use std::path::Path;

pub const HAZARD_TABLE_FILE: &str = "hazard-statements.json";
pub const PROCEDURE_TABLE_FILE: &str = "procedures.json";
pub const CONTROL_BAND_TABLE_FILE: &str = "control-bands.json";

/// The full set of reference tables an assessment runs against.
///
/// Immutable once built; pass it by reference to the calculators. Loading a
/// different directory swaps every table without touching any shared state.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    pub hazards: HazardTable,
    pub procedures: ProcedureCatalog,
    pub controls: ControlBandTable,
}

impl KnowledgeBase {
    /// Tables embedded in the crate.
    pub fn builtin() -> Result<KnowledgeBase, CoshhError> {
        Ok(KnowledgeBase {
            hazards: parse_hazard_table_str(builtin::HAZARD_STATEMENTS_JSON)?,
            procedures: parse_procedure_catalog_str(builtin::PROCEDURES_JSON)?,
            controls: parse_control_band_table_str(builtin::CONTROL_BANDS_JSON)?,
        })
    }

    /// Load all three tables from a directory using the standard file names.
    pub fn load_dir(dir: &Path) -> Result<KnowledgeBase, CoshhError> {
        let hazards = load_table(&dir.join(HAZARD_TABLE_FILE), parse_hazard_table_str)?;
        let procedures = load_table(&dir.join(PROCEDURE_TABLE_FILE), parse_procedure_catalog_str)?;
        let controls = load_table(
            &dir.join(CONTROL_BAND_TABLE_FILE),
            parse_control_band_table_str,
        )?;
        tracing::info!(
            dir = %dir.display(),
            hazards = %hazards.version,
            procedures = procedures.procedures.len(),
            "loaded knowledge tables"
        );
        Ok(KnowledgeBase {
            hazards,
            procedures,
            controls,
        })
    }
}

fn load_table<T>(
    path: &Path,
    parse: fn(&str) -> Result<T, CoshhError>,
) -> Result<T, CoshhError> {
    let content = std::fs::read_to_string(path).map_err(|e| CoshhError::TableLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse(&content).map_err(|e| CoshhError::TableLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Parse and validate an H-phrase table.
pub fn parse_hazard_table_str(json: &str) -> Result<HazardTable, CoshhError> {
    let table: HazardTable = serde_json::from_str(json)?;
    validate_hazard_table(&table)?;
    Ok(table)
}

/// Parse and validate a procedure catalog, filling each profile's name from its key.
pub fn parse_procedure_catalog_str(json: &str) -> Result<ProcedureCatalog, CoshhError> {
    let mut catalog: ProcedureCatalog = serde_json::from_str(json)?;
    for (key, profile) in catalog.procedures.iter_mut() {
        profile.name = key.clone();
    }
    validate_procedure_catalog(&catalog)?;
    Ok(catalog)
}

/// Parse and validate a control-band table.
pub fn parse_control_band_table_str(json: &str) -> Result<ControlBandTable, CoshhError> {
    let table: ControlBandTable = serde_json::from_str(json)?;
    validate_control_band_table(&table)?;
    Ok(table)
}

fn is_base_code(key: &str) -> bool {
    let bytes = key.as_bytes();
    bytes.len() == 4 && bytes[0] == b'H' && bytes[1..].iter().all(u8::is_ascii_digit)
}

fn is_pictogram_code(code: &str) -> bool {
    let bytes = code.as_bytes();
    bytes.len() == 5 && code.starts_with("GHS0") && (b'1'..=b'9').contains(&bytes[4])
}

pub fn validate_hazard_table(table: &HazardTable) -> Result<(), CoshhError> {
    if !(1..=5).contains(&table.default_severity) {
        return Err(CoshhError::TableInvalid(format!(
            "default_severity {} outside 1..=5",
            table.default_severity
        )));
    }

    if table.severity.is_empty() {
        return Err(CoshhError::TableInvalid(
            "severity table must not be empty".into(),
        ));
    }

    for (code, &sev) in &table.severity {
        if !is_base_code(code) {
            return Err(CoshhError::TableInvalid(format!(
                "severity key '{code}' is not a base H-code (expected e.g. 'H350')"
            )));
        }
        if !(1..=5).contains(&sev) {
            return Err(CoshhError::TableInvalid(format!(
                "severity for '{code}' is {sev}, expected 1..=5"
            )));
        }
    }

    for code in table.hazard_groups.keys() {
        if !is_base_code(code) {
            return Err(CoshhError::TableInvalid(format!(
                "hazard group key '{code}' is not a base H-code"
            )));
        }
    }

    for (code, ghs) in &table.pictograms {
        if !is_base_code(code) {
            return Err(CoshhError::TableInvalid(format!(
                "pictogram key '{code}' is not a base H-code"
            )));
        }
        if !is_pictogram_code(ghs) {
            return Err(CoshhError::TableInvalid(format!(
                "pictogram for '{code}' is '{ghs}', expected GHS01..GHS09"
            )));
        }
    }

    Ok(())
}

pub fn validate_procedure_catalog(catalog: &ProcedureCatalog) -> Result<(), CoshhError> {
    if catalog.procedures.is_empty() {
        return Err(CoshhError::TableInvalid(
            "procedure catalog must not be empty".into(),
        ));
    }

    for (key, profile) in &catalog.procedures {
        if key.trim().is_empty() {
            return Err(CoshhError::TableInvalid(
                "procedure name must not be empty".into(),
            ));
        }
        profile.check_factors().map_err(CoshhError::TableInvalid)?;
    }

    Ok(())
}

pub fn validate_control_band_table(table: &ControlBandTable) -> Result<(), CoshhError> {
    // Every band the resolver can produce needs control measures
    for band in ControlBand::ALL {
        if !table.profiles.contains_key(&band) {
            return Err(CoshhError::TableInvalid(format!(
                "control band {band} has no profile"
            )));
        }
    }

    for (band, profile) in &table.profiles {
        if profile.general.trim().is_empty() {
            return Err(CoshhError::TableInvalid(format!(
                "control band {band} has no general control measure"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ControlBand, HazardGroup};

    #[test]
    fn test_builtin_tables_load() {
        let kb = KnowledgeBase::builtin().unwrap();
        assert_eq!(kb.hazards.default_severity, 1);
        assert_eq!(kb.hazards.severity.get("H350"), Some(&5));
        assert_eq!(kb.hazards.hazard_groups.get("H334"), Some(&HazardGroup::S));
        assert_eq!(kb.procedures.procedures.len(), 19);
        assert_eq!(kb.controls.profiles.len(), 5);
    }

    #[test]
    fn test_procedure_names_filled() {
        let kb = KnowledgeBase::builtin().unwrap();
        let p = kb.procedures.get("vortexing_open").unwrap();
        assert_eq!(p.name, "vortexing_open");
        assert!(p.description.contains("aerosol"));
    }

    #[test]
    fn test_unknown_procedure_not_found() {
        let kb = KnowledgeBase::builtin().unwrap();
        assert!(matches!(
            kb.procedures.get("juggling"),
            Err(CoshhError::NotFound(_))
        ));
    }

    #[test]
    fn test_every_severity_code_has_consistent_group_rank() {
        // Every severity-5 code is either extreme or specialist.
        let kb = KnowledgeBase::builtin().unwrap();
        for (code, &sev) in &kb.hazards.severity {
            if sev == 5 {
                let group = kb.hazards.hazard_groups.get(code).copied();
                assert!(
                    matches!(group, Some(HazardGroup::E) | Some(HazardGroup::S)),
                    "{code} has severity 5 but group {group:?}"
                );
            }
        }
    }

    #[test]
    fn test_builtin_matrix_specialist_profile() {
        let kb = KnowledgeBase::builtin().unwrap();
        let s = kb.controls.profiles.get(&ControlBand::Specialist).unwrap();
        assert_eq!(s.general, "Specialist400");
    }

    #[test]
    fn test_bad_severity_rejected() {
        let json = r#"{
            "version": "1",
            "default_severity": 1,
            "severity": { "H350": 7 },
            "hazard_groups": {},
            "fallback_groups": { "unmapped": "C", "low_severity": "B", "no_significant_hazard": "A" }
        }"#;
        assert!(matches!(
            parse_hazard_table_str(json),
            Err(CoshhError::TableInvalid(_))
        ));
    }

    #[test]
    fn test_bad_key_rejected() {
        let json = r#"{
            "version": "1",
            "default_severity": 1,
            "severity": { "H35": 3 },
            "hazard_groups": {},
            "fallback_groups": { "unmapped": "C", "low_severity": "B", "no_significant_hazard": "A" }
        }"#;
        assert!(parse_hazard_table_str(json).is_err());
    }

    #[test]
    fn test_bad_pictogram_rejected() {
        let json = r#"{
            "version": "1",
            "default_severity": 1,
            "severity": { "H350": 5 },
            "hazard_groups": {},
            "fallback_groups": { "unmapped": "C", "low_severity": "B", "no_significant_hazard": "A" },
            "pictograms": { "H350": "GHS10" }
        }"#;
        assert!(parse_hazard_table_str(json).is_err());
    }

    #[test]
    fn test_factor_out_of_range_rejected() {
        let json = r#"{
            "version": "1",
            "procedures": {
                "bad": {
                    "description": "Bad",
                    "volume_category": "small",
                    "exposure_factor": "1.2",
                    "aerosol_factor": "0.1"
                }
            }
        }"#;
        assert!(matches!(
            parse_procedure_catalog_str(json),
            Err(CoshhError::TableInvalid(_))
        ));
    }

    fn control_bands_without(band: &str) -> String {
        let mut table: serde_json::Value =
            serde_json::from_str(builtin::CONTROL_BANDS_JSON).unwrap();
        table["profiles"].as_object_mut().unwrap().remove(band);
        table.to_string()
    }

    #[test]
    fn test_missing_band_profile_rejected() {
        for band in ["1", "4", "S"] {
            let err = parse_control_band_table_str(&control_bands_without(band)).unwrap_err();
            assert!(matches!(err, CoshhError::TableInvalid(_)), "band {band}: {err}");
        }
    }

    #[test]
    fn test_load_dir_missing_specialist_profile() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(HAZARD_TABLE_FILE), builtin::HAZARD_STATEMENTS_JSON)
            .unwrap();
        std::fs::write(dir.path().join(PROCEDURE_TABLE_FILE), builtin::PROCEDURES_JSON).unwrap();
        std::fs::write(
            dir.path().join(CONTROL_BAND_TABLE_FILE),
            control_bands_without("S"),
        )
        .unwrap();
        let err = KnowledgeBase::load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, CoshhError::TableLoad { .. }));
        assert!(err.to_string().contains("control band S has no profile"));
    }

    #[test]
    fn test_load_dir_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = KnowledgeBase::load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, CoshhError::TableLoad { .. }));
    }

    #[test]
    fn test_load_dir_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(HAZARD_TABLE_FILE), builtin::HAZARD_STATEMENTS_JSON)
            .unwrap();
        std::fs::write(dir.path().join(PROCEDURE_TABLE_FILE), builtin::PROCEDURES_JSON).unwrap();
        std::fs::write(
            dir.path().join(CONTROL_BAND_TABLE_FILE),
            builtin::CONTROL_BANDS_JSON,
        )
        .unwrap();
        let kb = KnowledgeBase::load_dir(dir.path()).unwrap();
        assert_eq!(kb.procedures.procedures.len(), 19);
    }
}
