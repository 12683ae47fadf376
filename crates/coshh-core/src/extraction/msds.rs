use crate::extraction::sections::{disposal_summary, extract_section, truncate_chars, SdsSection};
use crate::model::{normalize_phrase, Confidence, Extracted, SignalWord};
use crate::tables::schema::HazardTable;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Only this many leading characters are searched for an unlabelled CAS number.
pub const BARE_CAS_WINDOW: usize = 1500;

/// Hazard information read from safety data sheet text.
///
/// Every field is best effort. Callers are expected to review the values and
/// may replace any of them before running an assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardFacts {
    pub chemical_name: Extracted<String>,
    pub cas_number: Extracted<String>,
    pub signal_word: Extracted<SignalWord>,
    pub h_phrases: Extracted<Vec<String>>,
    pub p_phrases: Extracted<Vec<String>>,
    /// GHS pictogram codes ("GHS02", "GHS07", ...).
    pub pictograms: Extracted<Vec<String>>,
    pub first_aid: Extracted<String>,
    pub handling_and_storage: Extracted<String>,
    pub spillage: Extracted<String>,
    pub disposal: Extracted<String>,
}

impl HazardFacts {
    pub fn h_phrase_codes(&self) -> Vec<String> {
        self.h_phrases.value.clone().unwrap_or_default()
    }

    pub fn signal_word_or_none(&self) -> SignalWord {
        self.signal_word.value.unwrap_or_default()
    }
}

fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("MSDS regex is valid")
}

const NAME_LABELS: &str =
    r"(?:Product name|Substance name|Trade name|Chemical Name|Product Identifier)";

static LABELLED_NAME: LazyLock<Regex> = LazyLock::new(|| {
    pattern(&format!(
        r"(?im){NAME_LABELS}[:\s]+([^\n\r]+?)(?:\s*Product number|\s*Brand|\s*CAS No\.?|\s*EC No\.|\s*Index No\.|\s*Unique Formula|\s*REACH|\n\n|$)"
    ))
});
static SECTION3_NAME: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"(?is)SECTION 3.*?Chemical Name.*?(\w[\w\s\-(),.']+?)(?:\s+\d{2,7}-\d{2}-\d|\s+\d{3}-\d{3}-\d|\s+CAS|\s+EC|98-100|\z)")
});
static NAME_BEFORE_SECTION1: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"(?m)^\s*([A-Z][A-Za-z0-9\s\-(,).]+?)[\n\r]+\s*(?:1\.\d|SECTION 1|CAS|EC Number|Synonyms|Product number)")
});
static FIRST_CAPITALIZED: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?m)^\s*([A-Z][A-Za-z0-9 \t\-(),]{5,})"));
static NOT_A_NAME: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)^(?:[PH]\d{3}|\d+$|CAS\b|EC\b)"));
static NAME_LABEL_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| pattern(&format!(r"(?i)^{NAME_LABELS}\s*:\s*")));
static NOT_APPLICABLE_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)\s+(?:Not Applicable|N/A)$"));

static SECTION3_CAS: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?is)SECTION 3.*?CAS No.*?(\d{2,7}-\d{2}-\d)"));
static LABELLED_CAS: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)CAS\s*-?\s*No\.?\s*:?\s*(\d{2,7}-\d{2}-\d)"));
static LOOSE_CAS: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"(?i)(?:CAS\s*(?:–\s*No\.|Number|No\.?|-num|RN)\s*:?\s*|Chemical Abstracts Service number\s*:\s*)([\d\s–-]{4,12}\d)")
});
static CAS_SHAPE: LazyLock<Regex> = LazyLock::new(|| pattern(r"^\d{2,7}-\d{2}-\d$"));
static BARE_CAS: LazyLock<Regex> = LazyLock::new(|| pattern(r"\b(\d{2,7}-\d{2}-\d)\b"));

static SIGNAL_WORD: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)Signal Word\s*[:-]?\s*(Danger|Warning)"));
static H_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"(?i)\bH\d{3}[FDI]{0,2}(?:\s*\+\s*H\d{3}[FDI]{0,2})*\b")
});
static P_PHRASE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)\bP\d{3}(?:\s*\+\s*P\d{3})*\b"));
static GHS_CODE: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)\bGHS0[1-9]\b"));

/// Pull hazard facts out of safety data sheet text. Never fails: anything
/// that cannot be found is reported as not found with low confidence.
pub fn extract_hazard_facts(raw_text: &str, tables: &HazardTable) -> HazardFacts {
    let h_phrases = unique_codes(&H_PHRASE, raw_text);
    let facts = HazardFacts {
        chemical_name: chemical_name(raw_text),
        cas_number: cas_number(raw_text),
        signal_word: signal_word(raw_text),
        pictograms: pictograms(raw_text, &h_phrases, tables),
        h_phrases: found_or_low(h_phrases),
        p_phrases: found_or_low(unique_codes(&P_PHRASE, raw_text)),
        first_aid: extract_section(raw_text, SdsSection::FirstAid),
        handling_and_storage: extract_section(raw_text, SdsSection::HandlingAndStorage),
        spillage: extract_section(raw_text, SdsSection::AccidentalRelease),
        disposal: disposal_summary(raw_text),
    };

    tracing::debug!(
        chemical_name = ?facts.chemical_name.value,
        cas_number = ?facts.cas_number.value,
        h_phrases = ?facts.h_phrases.value,
        signal_word = ?facts.signal_word.value,
        "extracted hazard facts"
    );
    facts
}

fn found_or_low(values: Vec<String>) -> Extracted<Vec<String>> {
    if values.is_empty() {
        Extracted::not_found()
    } else {
        Extracted::found(values, Confidence::High)
    }
}

/// Every match, normalized, deduplicated in first-seen order.
fn unique_codes(re: &Regex, text: &str) -> Vec<String> {
    let mut codes: Vec<String> = Vec::new();
    for m in re.find_iter(text) {
        let code = normalize_phrase(m.as_str());
        if !codes.contains(&code) {
            codes.push(code);
        }
    }
    codes
}

fn capture_1<'t>(re: &Regex, text: &'t str) -> Option<&'t str> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
}

fn clean_name(raw: &str) -> Option<String> {
    let name = NAME_LABEL_PREFIX.replace(raw.trim(), "");
    let name = NOT_APPLICABLE_SUFFIX.replace(name.trim(), "");
    let name = name.trim();
    if name.is_empty() || NOT_A_NAME.is_match(name) {
        None
    } else {
        Some(name.to_string())
    }
}

fn chemical_name(text: &str) -> Extracted<String> {
    let candidates: [(&Regex, Confidence); 4] = [
        (&*LABELLED_NAME, Confidence::High),
        (&*SECTION3_NAME, Confidence::High),
        (&*NAME_BEFORE_SECTION1, Confidence::Medium),
        (&*FIRST_CAPITALIZED, Confidence::Low),
    ];
    for (re, confidence) in candidates {
        let Some(raw) = capture_1(re, text) else {
            continue;
        };
        let first_line = raw.lines().next().unwrap_or(raw);
        if let Some(name) = clean_name(first_line) {
            return Extracted::found(name, confidence);
        }
    }
    Extracted::not_found()
}

fn cas_number(text: &str) -> Extracted<String> {
    if let Some(cas) = capture_1(&SECTION3_CAS, text) {
        return Extracted::found(cas.to_string(), Confidence::High);
    }
    if let Some(cas) = capture_1(&LABELLED_CAS, text) {
        return Extracted::found(cas.to_string(), Confidence::High);
    }
    if let Some(raw) = capture_1(&LOOSE_CAS, text) {
        let cas: String = raw
            .replace('–', "-")
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        if CAS_SHAPE.is_match(&cas) {
            return Extracted::found(cas, Confidence::Medium);
        }
    }
    if let Some(cas) = capture_1(&BARE_CAS, truncate_chars(text, BARE_CAS_WINDOW)) {
        return Extracted::found(cas.to_string(), Confidence::Low);
    }
    Extracted::not_found()
}

fn signal_word(text: &str) -> Extracted<SignalWord> {
    match capture_1(&SIGNAL_WORD, text) {
        Some(word) => Extracted::found(SignalWord::from_str_loose(word), Confidence::High),
        None => Extracted::not_found(),
    }
}

fn pictograms(text: &str, h_phrases: &[String], tables: &HazardTable) -> Extracted<Vec<String>> {
    let explicit = unique_codes(&GHS_CODE, text);
    if !explicit.is_empty() {
        return Extracted::found(explicit, Confidence::High);
    }

    let mut inferred: Vec<String> = Vec::new();
    for part in h_phrases.iter().flat_map(|p| p.split('+')) {
        if let Some(ghs) = tables.pictogram_of(part) {
            if !inferred.iter().any(|g| g == ghs) {
                inferred.push(ghs.to_string());
            }
        }
    }
    if inferred.is_empty() {
        Extracted::not_found()
    } else {
        Extracted::found(inferred, Confidence::Medium)
    }
}
