use crate::model::{normalize_phrase, Severity, SignalWord};
use crate::tables::schema::HazardTable;
use serde::{Deserialize, Serialize};

/// How a severity score was reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityBreakdown {
    pub severity: Severity,
    /// Highest severity from matched phrases, the table default when phrases
    /// were given but none matched, or `None` when no phrases were given.
    pub phrase_severity: Option<u8>,
    /// Severity implied by the signal word alone.
    pub signal_severity: u8,
    /// The first phrase carrying the highest phrase severity.
    pub determining_phrase: Option<String>,
    /// Phrases with no table entry (normalized).
    pub unmatched_phrases: Vec<String>,
}

/// Overall severity (1..=5) from H-phrases and a GHS signal word.
///
/// Each phrase is matched by prefix against the table, so "H360FD" takes the
/// "H360" entry and "H301+H311" the "H301" entry. The highest match wins.
/// Phrases that match nothing score the table default, but only when at least
/// one phrase was supplied; with no phrases the signal word alone decides.
/// The signal word can raise the result, never lower it.
pub fn calculate_severity<S: AsRef<str>>(
    table: &HazardTable,
    h_phrases: &[S],
    signal_word: &str,
) -> Severity {
    severity_breakdown(table, h_phrases, signal_word).severity
}

pub fn severity_breakdown<S: AsRef<str>>(
    table: &HazardTable,
    h_phrases: &[S],
    signal_word: &str,
) -> SeverityBreakdown {
    let signal_severity = SignalWord::from_str_loose(signal_word).severity_floor();

    if h_phrases.is_empty() {
        tracing::debug!(signal_word, signal_severity, "no H-phrases, using signal word only");
        return SeverityBreakdown {
            severity: Severity::from_score(signal_severity),
            phrase_severity: None,
            signal_severity,
            determining_phrase: None,
            unmatched_phrases: vec![],
        };
    }

    let mut best: Option<(u8, String)> = None;
    let mut unmatched = Vec::new();

    for phrase in h_phrases {
        let normalized = normalize_phrase(phrase.as_ref());
        match table.severity_of(&normalized) {
            Some(sev) => {
                if best.as_ref().map_or(true, |(current, _)| sev > *current) {
                    best = Some((sev, normalized));
                }
            }
            None => unmatched.push(normalized),
        }
    }

    if !unmatched.is_empty() {
        tracing::warn!(
            unmatched = ?unmatched,
            default = table.default_severity,
            "H-phrases not in severity table"
        );
    }

    let (phrase_severity, determining_phrase) = match best {
        Some((sev, phrase)) => (sev, Some(phrase)),
        None => (table.default_severity, None),
    };

    let severity = Severity::from_score(phrase_severity.max(signal_severity));

    tracing::debug!(
        phrase_severity,
        signal_severity,
        severity = severity.get(),
        determining = ?determining_phrase,
        "severity calculation complete"
    );

    SeverityBreakdown {
        severity,
        phrase_severity: Some(phrase_severity),
        signal_severity,
        determining_phrase,
        unmatched_phrases: unmatched,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::KnowledgeBase;

    fn sev(phrases: &[&str], signal: &str) -> u8 {
        let kb = KnowledgeBase::builtin().unwrap();
        calculate_severity(&kb.hazards, phrases, signal).get()
    }

    #[test]
    fn test_carcinogen_is_five() {
        assert_eq!(sev(&["H350"], ""), 5);
    }

    #[test]
    fn test_corrosive_is_four() {
        assert_eq!(sev(&["H314"], ""), 4);
    }

    #[test]
    fn test_signal_word_only() {
        assert_eq!(sev(&[], "Danger"), 3);
        assert_eq!(sev(&[], "Warning"), 2);
        assert_eq!(sev(&[], ""), 1);
        assert_eq!(sev(&[], "danger"), 3);
    }

    #[test]
    fn test_max_wins() {
        assert_eq!(sev(&["H302", "H350", "H315"], ""), 5);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(sev(&["h350"], ""), sev(&["H350"], ""));
    }

    #[test]
    fn test_variant_matches_base() {
        assert_eq!(sev(&["H360F"], ""), 5);
        assert_eq!(sev(&["H360FD"], ""), 5);
        assert_eq!(sev(&["H350i"], ""), 5);
    }

    #[test]
    fn test_unknown_phrase_defaults() {
        assert_eq!(sev(&["H999"], ""), 1);
        assert_eq!(sev(&["H999"], "Warning"), 2);
    }

    #[test]
    fn test_phrase_dominates_signal_word() {
        assert_eq!(sev(&["H350"], "Danger"), 5);
    }

    #[test]
    fn test_signal_word_raises_low_phrase() {
        // H226 is severity 1, Danger floor is 3
        assert_eq!(sev(&["H226"], "Danger"), 3);
    }

    #[test]
    fn test_combined_code() {
        assert_eq!(sev(&["H301 + H311"], ""), 4);
    }

    #[test]
    fn test_breakdown_reports_unmatched() {
        let kb = KnowledgeBase::builtin().unwrap();
        let b = severity_breakdown(&kb.hazards, &["H999", "h315", "H350"], "Warning");
        assert_eq!(b.severity.get(), 5);
        assert_eq!(b.determining_phrase.as_deref(), Some("H350"));
        assert_eq!(b.unmatched_phrases, vec!["H999"]);
        assert_eq!(b.signal_severity, 2);
    }

    #[test]
    fn test_breakdown_empty_has_no_phrase_severity() {
        let kb = KnowledgeBase::builtin().unwrap();
        let b = severity_breakdown::<&str>(&kb.hazards, &[], "");
        assert_eq!(b.phrase_severity, None);
        assert_eq!(b.severity.get(), 1);
    }

    #[test]
    fn test_idempotent() {
        let kb = KnowledgeBase::builtin().unwrap();
        let phrases = ["H302", "H334"];
        let a = calculate_severity(&kb.hazards, &phrases, "Danger");
        let b = calculate_severity(&kb.hazards, &phrases, "Danger");
        assert_eq!(a, b);
    }
}
