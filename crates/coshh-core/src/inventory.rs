use crate::assess::{hazard_classes, resolve_hazard_group, severity_breakdown, HazardClass};
use crate::error::CoshhError;
use crate::model::{HazardGroup, Severity};
use crate::tables::KnowledgeBase;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One container from a chemical inventory export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InventoryRecord {
    pub name: String,
    pub cas_number: Option<String>,
    pub hazard_statements: Vec<String>,
    pub signal_word: Option<String>,
    pub supplier: Option<String>,
    pub location: Option<String>,
    pub sublocation: Option<String>,
    /// Container size as exported (number or text).
    pub size: Option<serde_json::Value>,
    pub units: Option<String>,
    /// GHS pictogram codes.
    pub hazards: Vec<String>,
}

/// Hazard summary for an inventory record, without any task information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HazardProfile {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cas_number: Option<String>,
    pub severity: Severity,
    pub hazard_group: HazardGroup,
    pub hazard_classes: Vec<HazardClass>,
}

impl InventoryRecord {
    pub fn hazard_profile(&self, kb: &KnowledgeBase) -> HazardProfile {
        let signal_word = self.signal_word.as_deref().unwrap_or_default();
        let severity = severity_breakdown(&kb.hazards, &self.hazard_statements, signal_word).severity;
        HazardProfile {
            name: self.name.clone(),
            cas_number: self.cas_number.clone(),
            severity,
            hazard_group: resolve_hazard_group(&kb.hazards, &self.hazard_statements),
            hazard_classes: hazard_classes(&self.hazard_statements),
        }
    }

    /// Case-insensitive match on name, CAS number and location.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        [
            Some(&self.name),
            self.cas_number.as_ref(),
            self.location.as_ref(),
            self.sublocation.as_ref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&term))
    }

    /// Size and units for display, e.g. "500 mL".
    pub fn size_label(&self) -> Option<String> {
        let size = match self.size.as_ref()? {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => return None,
            other => other.to_string(),
        };
        Some(match &self.units {
            Some(units) => format!("{size} {units}"),
            None => size,
        })
    }
}

/// Inventory exports are either a bare array or wrapped with metadata.
#[derive(Deserialize)]
#[serde(untagged)]
enum InventoryFile {
    Wrapped { inventory: Vec<InventoryRecord> },
    Bare(Vec<InventoryRecord>),
}

/// Parse inventory records from JSON.
pub fn parse_inventory_str(json: &str) -> Result<Vec<InventoryRecord>, CoshhError> {
    let file: InventoryFile = serde_json::from_str(json)?;
    Ok(match file {
        InventoryFile::Wrapped { inventory } => inventory,
        InventoryFile::Bare(records) => records,
    })
}

/// Load inventory records from a JSON file.
pub fn load_inventory(path: &Path) -> Result<Vec<InventoryRecord>, CoshhError> {
    let content = std::fs::read_to_string(path).map_err(|e| CoshhError::InventoryLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let records = parse_inventory_str(&content).map_err(|e| CoshhError::InventoryLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    tracing::info!(path = %path.display(), records = records.len(), "loaded inventory");
    Ok(records)
}
