//! Integration tests for the assessment pipeline, from document text to
//! control band.
//!
//! Uses a MockExtractor that returns fixed text without invoking pdftotext,
//! so these tests run without poppler-utils.

use coshh_core::error::CoshhError;
use coshh_core::extraction::TextExtractor;
use coshh_core::model::{
    Confidence, ControlBand, HazardGroup, PhysicalCharacteristics, QuantityGroup, SignalWord,
};
use coshh_core::tables::{self, builtin, KnowledgeBase};
use coshh_core::{assess, assess_document, assess_msds_text, AssessmentInput, TaskInput};

struct MockExtractor {
    text: String,
}

impl TextExtractor for MockExtractor {
    fn extract_text(&self, _bytes: &[u8]) -> Result<String, CoshhError> {
        Ok(self.text.clone())
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

fn task(procedure: &str, quantity: f64, unit: &str) -> TaskInput {
    TaskInput {
        procedure: Some(procedure.into()),
        quantity,
        unit: unit.into(),
        frequency: "daily".into(),
        duration: "medium".into(),
        ..Default::default()
    }
}

const FORMALDEHYDE_SDS: &str = "\
SAFETY DATA SHEET
SECTION 1: Identification of the substance/mixture
Product name : Formaldehyde solution
CAS-No. : 50-00-0
SECTION 2: Hazards identification
Signal word Danger
H301 + H311 + H331 Toxic if swallowed, in contact with skin or if inhaled.
H314 Causes severe skin burns and eye damage.
H317 May cause an allergic skin reaction.
H341 Suspected of causing genetic defects.
H350 May cause cancer.
P201 Obtain special instructions before use.
SECTION 4: First aid measures
If inhaled: remove person to fresh air.
SECTION 5: Firefighting measures
SECTION 7: Handling and storage
Store in a cool place. Keep container tightly closed.
SECTION 8: Exposure controls/personal protection
SECTION 13: Disposal considerations
Waste must be disposed of in accordance with local regulations.
SECTION 14: Transport information
";

// ---------------------------------------------------------------------------
// Test 1: Carcinogen SDS goes straight to the specialist band
// ---------------------------------------------------------------------------
#[test]
fn carcinogen_document_is_specialist() {
    let kb = KnowledgeBase::builtin().unwrap();
    let extractor = MockExtractor {
        text: FORMALDEHYDE_SDS.into(),
    };

    let result =
        assess_document(&[], &extractor, &kb, &task("pipetting_small", 10.0, "mL")).unwrap();

    assert_eq!(
        result.facts.chemical_name.value.as_deref(),
        Some("Formaldehyde solution")
    );
    assert_eq!(result.facts.cas_number.value.as_deref(), Some("50-00-0"));
    assert_eq!(result.facts.signal_word.value, Some(SignalWord::Danger));
    assert_eq!(
        result.facts.h_phrase_codes(),
        vec!["H301+H311+H331", "H314", "H317", "H341", "H350"]
    );
    assert_eq!(result.facts.first_aid.confidence, Confidence::High);
    assert_eq!(result.facts.handling_and_storage.confidence, Confidence::High);
    assert_eq!(
        result.facts.disposal.value.as_deref(),
        Some("Waste must be disposed of in accordance with local regulations.")
    );

    let a = &result.assessment;
    assert_eq!(a.severity.get(), 5);
    assert_eq!(a.hazard_group, HazardGroup::S);
    assert_eq!(a.control_band, ControlBand::Specialist);
    assert_eq!(a.controls.general, "Specialist400");
}

// ---------------------------------------------------------------------------
// Test 2: Irritant solvent, small scale, general ventilation
// ---------------------------------------------------------------------------
#[test]
fn irritant_text_small_scale() {
    let kb = KnowledgeBase::builtin().unwrap();
    let text = "Product name: Ethyl acetate\n\
                Signal word: Warning\n\
                H319 Causes serious eye irritation.\n\
                H336 May cause drowsiness or dizziness.\n";
    let mut t = task("weighing_solid_open", 5.0, "g");
    t.physical_characteristics = PhysicalCharacteristics::Low;

    let result = assess_msds_text(&kb, text, &t).unwrap();

    assert_eq!(result.assessment.severity.get(), 3);
    assert_eq!(result.assessment.hazard_group, HazardGroup::C);
    assert_eq!(result.assessment.quantity_group, QuantityGroup::Small);
    assert_eq!(result.assessment.control_band, ControlBand::One);
}

// ---------------------------------------------------------------------------
// Test 3: Document with no hazard data falls back to conservative defaults
// ---------------------------------------------------------------------------
#[test]
fn empty_document_uses_defaults() {
    let kb = KnowledgeBase::builtin().unwrap();
    let extractor = MockExtractor {
        text: String::new(),
    };

    let result =
        assess_document(&[], &extractor, &kb, &task("weighing_solid_open", 1.0, "kg")).unwrap();

    assert!(!result.facts.h_phrases.is_found());
    assert_eq!(result.assessment.severity.get(), 1);
    // No phrase matched, so the conservative group C applies
    assert_eq!(result.assessment.hazard_group, HazardGroup::C);
    assert_eq!(result.assessment.quantity_group, QuantityGroup::Medium);
    assert_eq!(result.assessment.control_band, ControlBand::Three);
}

// ---------------------------------------------------------------------------
// Test 4: Extractor errors propagate
// ---------------------------------------------------------------------------
#[test]
fn extractor_error_propagates() {
    struct FailingExtractor;
    impl TextExtractor for FailingExtractor {
        fn extract_text(&self, _bytes: &[u8]) -> Result<String, CoshhError> {
            Err(CoshhError::PdftotextNotFound)
        }
        fn backend_name(&self) -> &str {
            "failing"
        }
    }

    let kb = KnowledgeBase::builtin().unwrap();
    let err = assess_document(&[], &FailingExtractor, &kb, &TaskInput::default()).unwrap_err();
    assert!(matches!(err, CoshhError::PdftotextNotFound));
}

// ---------------------------------------------------------------------------
// Test 5: Task validation errors surface from the document path
// ---------------------------------------------------------------------------
#[test]
fn bad_unit_rejected_after_extraction() {
    let kb = KnowledgeBase::builtin().unwrap();
    let err = assess_msds_text(&kb, FORMALDEHYDE_SDS, &task("pipetting_small", 1.0, "pints"))
        .unwrap_err();
    assert!(matches!(err, CoshhError::InvalidArgument(_)));
}

// ---------------------------------------------------------------------------
// Test 6: Swapped tables change results; the built-in set is untouched
// ---------------------------------------------------------------------------
#[test]
fn swapped_tables_change_results() {
    let builtin_kb = KnowledgeBase::builtin().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let hazards = builtin::HAZARD_STATEMENTS_JSON.replace("\"H319\": 3", "\"H319\": 5");
    std::fs::write(dir.path().join(tables::HAZARD_TABLE_FILE), hazards).unwrap();
    std::fs::write(
        dir.path().join(tables::PROCEDURE_TABLE_FILE),
        builtin::PROCEDURES_JSON,
    )
    .unwrap();
    std::fs::write(
        dir.path().join(tables::CONTROL_BAND_TABLE_FILE),
        builtin::CONTROL_BANDS_JSON,
    )
    .unwrap();
    let custom_kb = KnowledgeBase::load_dir(dir.path()).unwrap();

    let input = AssessmentInput {
        h_phrases: vec!["H319".into()],
        quantity: 1.0,
        unit: "mL".into(),
        ..Default::default()
    };
    assert_eq!(assess(&custom_kb, &input).unwrap().severity.get(), 5);
    assert_eq!(assess(&builtin_kb, &input).unwrap().severity.get(), 3);
    assert_eq!(
        assess(&KnowledgeBase::builtin().unwrap(), &input)
            .unwrap()
            .severity
            .get(),
        3
    );
}

// ---------------------------------------------------------------------------
// Test 7: Assessment input deserializes from JSON with defaults
// ---------------------------------------------------------------------------
#[test]
fn assessment_input_from_json() {
    let kb = KnowledgeBase::builtin().unwrap();
    let input: AssessmentInput = serde_json::from_str(
        r#"{
            "h_phrases": ["H314"],
            "signal_word": "Danger",
            "procedure": "heating_open_beaker",
            "quantity": 2,
            "unit": "L",
            "frequency": "weekly",
            "duration": "long",
            "physical_characteristics": "high"
        }"#,
    )
    .unwrap();

    let a = assess(&kb, &input).unwrap();
    assert_eq!(a.severity.get(), 4);
    assert_eq!(a.hazard_group, HazardGroup::D);
    assert_eq!(a.quantity_group, QuantityGroup::Medium);
    assert_eq!(a.control_band, ControlBand::Four);

    let json = serde_json::to_value(&a).unwrap();
    assert_eq!(json["control_band"], "4");
    assert_eq!(json["hazard_group"], "D");
}
