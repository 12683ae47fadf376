pub mod banding;
pub mod hazard_class;
pub mod likelihood;
pub mod outcome;
pub mod severity;

pub use banding::{
    control_band_profile, get_control_band_profile, resolve_control_band, resolve_hazard_group,
};
pub use hazard_class::{hazard_classes, HazardClass};
pub use likelihood::{calculate_likelihood, likelihood, likelihood_breakdown, LikelihoodBreakdown};
pub use outcome::{Assessment, AssessmentInput, MsdsAssessment, TaskInput};
pub use severity::{calculate_severity, severity_breakdown, SeverityBreakdown};

use crate::error::CoshhError;
use crate::model::{Duration, Frequency, LikelihoodBand, Quantity, SignalWord};
use crate::tables::KnowledgeBase;

/// Run a complete assessment: severity, likelihood, hazard group, control
/// band and the recommended controls for that band.
pub fn assess(kb: &KnowledgeBase, input: &AssessmentInput) -> Result<Assessment, CoshhError> {
    let procedure = match input.procedure.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => Some(kb.procedures.get(name)?),
        _ => None,
    };
    let quantity = Quantity::parse(input.quantity, &input.unit)?;
    let frequency = Frequency::from_str_loose(&input.frequency);
    let duration = Duration::from_str_loose(&input.duration);

    let severity_detail = severity_breakdown(&kb.hazards, &input.h_phrases, &input.signal_word);
    let likelihood_detail = likelihood_breakdown(procedure, &quantity, frequency, duration);
    let likelihood_band = LikelihoodBand::from_score(likelihood_detail.total);

    let hazard_group = resolve_hazard_group(&kb.hazards, &input.h_phrases);
    let quantity_group = input
        .quantity_group
        .unwrap_or_else(|| quantity.quantity_group());
    let physical = input.physical_characteristics;
    let control_band =
        resolve_control_band(&kb.controls.matrix, hazard_group, quantity_group, physical);
    let controls = control_band_profile(&kb.controls, control_band)?.clone();

    let exposure_routes = match (&input.exposure_routes, procedure) {
        (Some(routes), _) => routes.clone(),
        (None, Some(p)) => p.routes.clone(),
        (None, None) => vec![],
    };

    let mut reasons = Vec::new();
    match &severity_detail.determining_phrase {
        Some(phrase) => reasons.push(format!(
            "Severity {}: highest H-phrase {} scores {}",
            severity_detail.severity,
            phrase,
            severity_detail.phrase_severity.unwrap_or_default()
        )),
        None if input.h_phrases.is_empty() => reasons.push(format!(
            "Severity {}: no H-phrases, signal word only",
            severity_detail.severity
        )),
        None => reasons.push(format!(
            "Severity {}: no H-phrase in the severity table, default {}",
            severity_detail.severity, kb.hazards.default_severity
        )),
    }
    if let Some(phrase_severity) = severity_detail.phrase_severity {
        if severity_detail.signal_severity > phrase_severity {
            let word = SignalWord::from_str_loose(&input.signal_word);
            reasons.push(format!(
                "Signal word {} raises severity to {}",
                word, severity_detail.signal_severity
            ));
        }
    }
    reasons.push(format!(
        "Likelihood {} ({}): procedure {}, quantity {}, frequency {}, duration {}",
        likelihood_detail.total,
        likelihood_band,
        likelihood_detail.procedure,
        likelihood_detail.quantity,
        likelihood_detail.frequency,
        likelihood_detail.duration
    ));
    reasons.push(format!(
        "Hazard group {}: {}",
        hazard_group,
        hazard_group.description()
    ));
    if hazard_group.is_specialist() {
        reasons.push(format!(
            "Hazard group {hazard_group} requires specialist assessment regardless of quantity"
        ));
    } else {
        reasons.push(format!(
            "Control band {} from group {}, {} quantity, {} dustiness/volatility",
            control_band, hazard_group, quantity_group, physical
        ));
    }

    tracing::info!(
        severity = severity_detail.severity.get(),
        likelihood = %likelihood_detail.total,
        %hazard_group,
        %control_band,
        "assessment complete"
    );

    Ok(Assessment {
        severity: severity_detail.severity,
        signal_word: SignalWord::from_str_loose(&input.signal_word),
        severity_detail,
        likelihood: likelihood_detail.total,
        likelihood_band,
        likelihood_detail,
        procedure: procedure.map(|p| p.name.clone()),
        quantity,
        hazard_group,
        quantity_group,
        physical_characteristics: physical,
        control_band,
        controls,
        hazard_classes: hazard_classes(&input.h_phrases),
        exposure_routes,
        reasons,
    })
}
