use crate::error::CoshhError;
use crate::model::{Duration, Frequency, Quantity};
use crate::tables::schema::ProcedureProfile;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Base score used when no procedure is known.
pub const DEFAULT_PROCEDURE_BASE: Decimal = Decimal::from_parts(15, 0, 0, false, 1);

/// Likelihood scores never exceed this value.
pub const MAX_LIKELIHOOD: Decimal = Decimal::TEN;

/// The four additive components of a likelihood score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikelihoodBreakdown {
    pub procedure: Decimal,
    pub quantity: u8,
    pub frequency: u8,
    pub duration: u8,
    /// Sum of the components, capped at 10.
    pub total: Decimal,
}

/// Likelihood of exposure (0..=10) from loosely typed inputs.
///
/// The unit must be one of µg, mg, g, kg, µL, mL, L. Frequency and duration
/// strings that are not recognized score 0.
pub fn calculate_likelihood(
    procedure: Option<&ProcedureProfile>,
    quantity: f64,
    unit: &str,
    frequency: &str,
    duration: &str,
) -> Result<Decimal, CoshhError> {
    let quantity = Quantity::parse(quantity, unit)?;
    Ok(likelihood(
        procedure,
        &quantity,
        Frequency::from_str_loose(frequency),
        Duration::from_str_loose(duration),
    ))
}

pub fn likelihood(
    procedure: Option<&ProcedureProfile>,
    quantity: &Quantity,
    frequency: Frequency,
    duration: Duration,
) -> Decimal {
    likelihood_breakdown(procedure, quantity, frequency, duration).total
}

pub fn likelihood_breakdown(
    procedure: Option<&ProcedureProfile>,
    quantity: &Quantity,
    frequency: Frequency,
    duration: Duration,
) -> LikelihoodBreakdown {
    let procedure_score = match procedure {
        Some(p) => p.exposure_factor * Decimal::from(3) + p.aerosol_factor * Decimal::from(2),
        None => DEFAULT_PROCEDURE_BASE,
    };
    let quantity_score = quantity_score(quantity);
    let frequency_score = frequency.score();
    let duration_score = duration.score();

    let sum = procedure_score
        + Decimal::from(quantity_score)
        + Decimal::from(frequency_score)
        + Decimal::from(duration_score);
    let total = sum.min(MAX_LIKELIHOOD);

    tracing::debug!(
        procedure = procedure.map(|p| p.name.as_str()),
        %quantity,
        %procedure_score,
        quantity_score,
        frequency_score,
        duration_score,
        %total,
        "likelihood calculation complete"
    );

    LikelihoodBreakdown {
        procedure: procedure_score,
        quantity: quantity_score,
        frequency: frequency_score,
        duration: duration_score,
        total,
    }
}

/// Score for the amount handled, on the mg/mL scale.
pub fn quantity_score(quantity: &Quantity) -> u8 {
    let normalized = quantity.normalized();
    if normalized > 500.0 {
        3
    } else if normalized > 50.0 {
        2
    } else if normalized > 1.0 {
        1
    } else {
        0
    }
}
