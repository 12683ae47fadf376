use crate::error::CoshhError;
use crate::model::{ControlBand, HazardGroup, PhysicalCharacteristics, QuantityGroup};
use crate::tables::schema::{ControlBandMatrix, ControlBandProfile, ControlBandTable, HazardTable};

/// COSHH Essentials hazard group for a set of H-phrases.
///
/// The most demanding matched group wins (A < B < C < D < E < S). When no
/// phrase matches, including when the list is empty, the table's `unmapped`
/// fallback applies.
pub fn resolve_hazard_group<S: AsRef<str>>(table: &HazardTable, h_phrases: &[S]) -> HazardGroup {
    let matched = h_phrases
        .iter()
        .filter_map(|p| table.group_of(p.as_ref()))
        .max();

    match matched {
        Some(group) => {
            tracing::debug!(%group, "hazard group resolved");
            group
        }
        None => {
            let group = table.fallback_groups.unmapped;
            tracing::debug!(%group, phrases = h_phrases.len(), "no hazard group match, using fallback");
            group
        }
    }
}

/// Control band for a hazard group, amount handled and dustiness/volatility.
///
/// Groups E and S always resolve to the specialist band.
pub fn resolve_control_band(
    matrix: &ControlBandMatrix,
    group: HazardGroup,
    quantity: QuantityGroup,
    physical: PhysicalCharacteristics,
) -> ControlBand {
    let band = match matrix.row(group) {
        Some(row) => row.band(quantity, physical),
        None => ControlBand::Specialist,
    };
    tracing::debug!(%group, %quantity, %physical, %band, "control band resolved");
    band
}

pub fn control_band_profile(
    table: &ControlBandTable,
    band: ControlBand,
) -> Result<&ControlBandProfile, CoshhError> {
    table.profile(band)
}

/// Look up the control measures for an externally supplied band label
/// ("1".."4" or "S", optionally prefixed with "band").
pub fn get_control_band_profile<'a>(
    table: &'a ControlBandTable,
    band: &str,
) -> Result<&'a ControlBandProfile, CoshhError> {
    let band: ControlBand = band.parse()?;
    control_band_profile(table, band)
}
