pub mod assess;
pub mod error;
pub mod extraction;
pub mod inventory;
pub mod model;
pub mod tables;

pub use assess::{assess, Assessment, AssessmentInput, MsdsAssessment, TaskInput};

use error::CoshhError;
use extraction::{extract_hazard_facts, TextExtractor};
use tables::KnowledgeBase;

/// Assess a task using the hazard data found in safety data sheet text.
///
/// The extracted H-phrases and signal word feed the assessment directly.
/// Callers who want to review or correct the facts first should call
/// `extract_hazard_facts` and `assess` separately.
pub fn assess_msds_text(
    kb: &KnowledgeBase,
    text: &str,
    task: &TaskInput,
) -> Result<MsdsAssessment, CoshhError> {
    let facts = extract_hazard_facts(text, &kb.hazards);
    if !facts.h_phrases.is_found() {
        tracing::warn!("no H-phrases found in document, severity depends on signal word only");
    }

    let input = task.with_hazards(
        facts.h_phrase_codes(),
        facts.signal_word_or_none().to_string(),
    );
    let assessment = assess(kb, &input)?;
    Ok(MsdsAssessment { facts, assessment })
}

/// Extract text from a document with the given backend, then assess it.
pub fn assess_document(
    bytes: &[u8],
    extractor: &dyn TextExtractor,
    kb: &KnowledgeBase,
    task: &TaskInput,
) -> Result<MsdsAssessment, CoshhError> {
    let text = extractor.extract_text(bytes)?;
    tracing::debug!(
        backend = extractor.backend_name(),
        chars = text.len(),
        "document text extracted"
    );
    assess_msds_text(kb, &text, task)
}
