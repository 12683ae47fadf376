use crate::assess::hazard_class::HazardClass;
use crate::assess::likelihood::LikelihoodBreakdown;
use crate::assess::severity::SeverityBreakdown;
use crate::extraction::msds::HazardFacts;
use crate::model::{
    ControlBand, ExposureRoute, HazardGroup, LikelihoodBand, PhysicalCharacteristics, Quantity,
    QuantityGroup, Severity, SignalWord,
};
use crate::tables::schema::ControlBandProfile;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Everything needed to assess one task with one substance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssessmentInput {
    pub h_phrases: Vec<String>,
    pub signal_word: String,
    /// Procedure catalog key; `None` uses the default procedure base score.
    pub procedure: Option<String>,
    pub quantity: f64,
    pub unit: String,
    pub frequency: String,
    pub duration: String,
    /// Overrides the quantity group derived from `quantity`.
    pub quantity_group: Option<QuantityGroup>,
    pub physical_characteristics: PhysicalCharacteristics,
    /// Overrides the procedure's default exposure routes.
    pub exposure_routes: Option<Vec<ExposureRoute>>,
}

/// The task half of an input, for combining with extracted hazard facts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskInput {
    pub procedure: Option<String>,
    pub quantity: f64,
    pub unit: String,
    pub frequency: String,
    pub duration: String,
    pub quantity_group: Option<QuantityGroup>,
    pub physical_characteristics: PhysicalCharacteristics,
    pub exposure_routes: Option<Vec<ExposureRoute>>,
}

impl TaskInput {
    /// Attach hazard data to this task.
    pub fn with_hazards(&self, h_phrases: Vec<String>, signal_word: String) -> AssessmentInput {
        AssessmentInput {
            h_phrases,
            signal_word,
            procedure: self.procedure.clone(),
            quantity: self.quantity,
            unit: self.unit.clone(),
            frequency: self.frequency.clone(),
            duration: self.duration.clone(),
            quantity_group: self.quantity_group,
            physical_characteristics: self.physical_characteristics,
            exposure_routes: self.exposure_routes.clone(),
        }
    }
}

/// Full result of a COSHH risk assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    pub severity: Severity,
    pub severity_detail: SeverityBreakdown,
    pub signal_word: SignalWord,
    /// 0..=10.
    pub likelihood: Decimal,
    pub likelihood_band: LikelihoodBand,
    pub likelihood_detail: LikelihoodBreakdown,
    /// Procedure catalog key, if one was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub procedure: Option<String>,
    pub quantity: Quantity,
    pub hazard_group: HazardGroup,
    pub quantity_group: QuantityGroup,
    pub physical_characteristics: PhysicalCharacteristics,
    pub control_band: ControlBand,
    pub controls: ControlBandProfile,
    pub hazard_classes: Vec<HazardClass>,
    pub exposure_routes: Vec<ExposureRoute>,
    /// Human-readable explanation of each step.
    pub reasons: Vec<String>,
}

/// Hazard facts read from a safety data sheet and the assessment built on them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MsdsAssessment {
    pub facts: HazardFacts,
    pub assessment: Assessment,
}
