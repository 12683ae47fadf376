pub const HAZARD_STATEMENTS_JSON: &str = include_str!("../../../../tables/hazard-statements.json");
pub const PROCEDURES_JSON: &str = include_str!("../../../../tables/procedures.json");
pub const CONTROL_BANDS_JSON: &str = include_str!("../../../../tables/control-bands.json");

/// Names of the embedded tables, as accepted by `embedded`.
pub const TABLES: &[&str] = &["hazards", "procedures", "bands"];

/// Raw JSON of an embedded table by short name.
pub fn embedded(name: &str) -> Option<&'static str> {
    match name {
        "hazards" => Some(HAZARD_STATEMENTS_JSON),
        "procedures" => Some(PROCEDURES_JSON),
        "bands" => Some(CONTROL_BANDS_JSON),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_names() {
        for name in TABLES {
            assert!(embedded(name).is_some());
        }
        assert!(embedded("xyz").is_none());
    }
}
