use coshh_core::error::CoshhError;
use coshh_core::inventory::{load_inventory, HazardProfile};
use std::path::Path;

use crate::commands::load_knowledge_base;
use crate::output;

pub fn run(
    tables: Option<&Path>,
    file: &Path,
    search: Option<&str>,
    output_format: &str,
) -> Result<(), CoshhError> {
    let kb = load_knowledge_base(tables)?;
    let records = load_inventory(file)?;

    let rows: Vec<_> = records
        .iter()
        .filter(|r| search.map_or(true, |term| r.matches(term)))
        .collect();
    let profiles: Vec<HazardProfile> = rows.iter().map(|r| r.hazard_profile(&kb)).collect();

    match output_format {
        "json" => output::json::print(&profiles)?,
        _ => output::table::print_inventory(&rows, &profiles),
    }

    Ok(())
}
