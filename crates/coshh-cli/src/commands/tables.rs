use coshh_core::error::CoshhError;
use coshh_core::model::{ControlBand, HazardGroup, PhysicalCharacteristics, QuantityGroup};
use coshh_core::tables::{self, builtin, KnowledgeBase};
use std::path::Path;

use crate::commands::load_knowledge_base;

pub fn list(dir: Option<&Path>) -> Result<(), CoshhError> {
    let kb = load_knowledge_base(dir)?;
    let source = match dir {
        Some(dir) => dir.display().to_string(),
        None => "built-in".to_string(),
    };

    println!("Knowledge tables ({source}):\n");
    println!(
        "  {:<12} {} (v{}), {} severity entries, {} group entries",
        "hazards",
        tables::HAZARD_TABLE_FILE,
        kb.hazards.version,
        kb.hazards.severity.len(),
        kb.hazards.hazard_groups.len()
    );
    println!(
        "  {:<12} {} (v{}), {} procedures",
        "procedures",
        tables::PROCEDURE_TABLE_FILE,
        kb.procedures.version,
        kb.procedures.procedures.len()
    );
    println!(
        "  {:<12} {} (v{}), {} band profiles",
        "bands",
        tables::CONTROL_BAND_TABLE_FILE,
        kb.controls.version,
        kb.controls.profiles.len()
    );
    println!();
    Ok(())
}

pub fn explain(dir: Option<&Path>, table: &str) -> Result<(), CoshhError> {
    let kb = load_knowledge_base(dir)?;
    match table {
        "hazards" => explain_hazards(&kb),
        "procedures" => explain_procedures(&kb),
        "bands" => explain_bands(&kb),
        other => {
            return Err(CoshhError::NotFound(format!(
                "table '{other}' (expected one of: {})",
                builtin::TABLES.join(", ")
            )))
        }
    }
    Ok(())
}

fn explain_hazards(kb: &KnowledgeBase) {
    let h = &kb.hazards;
    println!("H-phrase table (version {})\n", h.version);
    if let Some(ref desc) = h.description {
        println!("{desc}\n");
    }
    println!("Severity runs from 1 (minimal) to 5 (extreme). A phrase matches every");
    println!("entry it starts with, so H360FD matches H360. The highest match wins,");
    println!("and the signal word sets a floor (Danger 3, Warning 2).\n");
    println!(
        "  Phrases that match no entry score {}.\n",
        h.default_severity
    );
    println!("  Fallback hazard groups:");
    for (label, group) in h.fallback_groups.entries() {
        println!("    {label:<26} {group}");
    }
    println!();

    println!("  {:<8}  {:<8}  {:<5}  Pictogram", "Code", "Severity", "Group");
    println!("  {}", "-".repeat(40));
    for (code, severity) in &h.severity {
        let group = h
            .hazard_groups
            .get(code)
            .map(HazardGroup::to_string)
            .unwrap_or_else(|| "-".into());
        let pictogram = h.pictograms.get(code).map(String::as_str).unwrap_or("-");
        println!("  {code:<8}  {severity:<8}  {group:<5}  {pictogram}");
    }
    println!();

    println!("Hazard groups:\n");
    for group in [
        HazardGroup::A,
        HazardGroup::B,
        HazardGroup::C,
        HazardGroup::D,
        HazardGroup::E,
        HazardGroup::S,
    ] {
        println!("  {group}  {}", group.description());
    }
    println!();
}

fn explain_procedures(kb: &KnowledgeBase) {
    let p = &kb.procedures;
    println!("Procedure catalog (version {})\n", p.version);
    if let Some(ref desc) = p.description {
        println!("{desc}\n");
    }
    println!("Procedure score = exposure factor x 3 + aerosol factor x 2.");
    println!("Without a procedure the score is 1.5.\n");

    let width = p.procedures.keys().map(String::len).max().unwrap_or(20);
    println!(
        "  {:<width$}  {:<8}  {:<7}  {:<7}  Description",
        "Key", "Exposure", "Aerosol", "Volume"
    );
    println!("  {}", "-".repeat(width + 40));
    for (key, profile) in &p.procedures {
        println!(
            "  {:<width$}  {:<8}  {:<7}  {:<7}  {}",
            key,
            profile.exposure_factor,
            profile.aerosol_factor,
            profile.volume_category.to_string(),
            profile.description
        );
        if !profile.routes.is_empty() {
            let routes: Vec<String> = profile.routes.iter().map(|r| r.to_string()).collect();
            println!("  {:<width$}  routes: {}", "", routes.join(", "));
        }
    }
    println!();
}

fn explain_bands(kb: &KnowledgeBase) {
    let c = &kb.controls;
    println!("Control-band table (version {})\n", c.version);
    if let Some(ref desc) = c.description {
        println!("{desc}\n");
    }
    println!("Columns are dustiness/volatility: low, medium, high.");
    println!("Groups E and S always need a specialist assessment (band S).\n");

    let physical = [
        PhysicalCharacteristics::Low,
        PhysicalCharacteristics::Medium,
        PhysicalCharacteristics::High,
    ];
    for group in [HazardGroup::A, HazardGroup::B, HazardGroup::C, HazardGroup::D] {
        let Some(row) = c.matrix.row(group) else {
            continue;
        };
        println!("  Group {group}");
        for quantity in [QuantityGroup::Small, QuantityGroup::Medium, QuantityGroup::Large] {
            let bands: Vec<&str> = physical
                .iter()
                .map(|&p| row.band(quantity, p).label())
                .collect();
            println!("    {:<7} {}", quantity.to_string(), bands.join("  "));
        }
        println!();
    }

    println!("Control measures:\n");
    for band in ControlBand::ALL {
        println!("  Band {band}: {}", band.approach());
        if let Some(profile) = c.profiles.get(&band) {
            println!("    General: {}  PPE sheet: {}", profile.general, profile.ppe_sheet);
            println!("    {}", profile.ppe_text);
        }
        println!();
    }
}

pub fn show(table: &str) -> Result<(), CoshhError> {
    let json = builtin::embedded(table).ok_or_else(|| {
        CoshhError::NotFound(format!(
            "table '{table}' (expected one of: {})",
            builtin::TABLES.join(", ")
        ))
    })?;
    print!("{json}");
    Ok(())
}

pub fn validate(dir: &Path) -> Result<(), CoshhError> {
    let kb = KnowledgeBase::load_dir(dir)?;

    println!("Tables in '{}' are valid.", dir.display());
    println!(
        "  Hazards: v{}, {} severity entries",
        kb.hazards.version,
        kb.hazards.severity.len()
    );
    println!(
        "  Procedures: v{}, {} procedures",
        kb.procedures.version,
        kb.procedures.procedures.len()
    );
    println!(
        "  Bands: v{}, {} profiles",
        kb.controls.version,
        kb.controls.profiles.len()
    );

    // Check for potential issues (warnings, not errors)
    let mut warnings = Vec::new();
    for code in kb.hazards.severity.keys() {
        if !kb.hazards.hazard_groups.contains_key(code) {
            warnings.push(format!(
                "phrase '{code}' has a severity but no hazard group (falls back to group {})",
                kb.hazards.fallback_groups.unmapped
            ));
        }
    }

    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {w}");
        }
    }

    Ok(())
}
