use crate::model::{Confidence, Extracted};
use regex::Regex;
use std::sync::LazyLock;

/// Maximum characters kept when a section has no recognizable end.
pub const UNTERMINATED_SECTION_LIMIT: usize = 5000;

/// Maximum characters of the disposal summary before it is cut short.
pub const DISPOSAL_SUMMARY_LIMIT: usize = 300;

const DISPOSAL_FALLBACK: &str = "Refer to full Section 13 of the safety data sheet.";

/// Safety data sheet sections extracted as free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdsSection {
    FirstAid,
    AccidentalRelease,
    HandlingAndStorage,
    Disposal,
}

fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("section regex is valid")
}

static FIRST_AID_START: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?im)SECTION\s*4\b|4\.\s*First-?aid measures|First-?aid measures"));
static FIRST_AID_END: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?im)SECTION\s*5\b|5\.\s*Fire-?fighting measures"));
static RELEASE_START: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"(?im)SECTION\s*6\b|6\.\s*Accidental release measures|Accidental release measures")
});
static RELEASE_END: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?im)SECTION\s*7\b|7\.\s*Handling and storage"));
static HANDLING_START: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"(?im)SECTION\s*7\b|7\.\s*Handling and storage|Handling and storage")
});
static HANDLING_END: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?im)SECTION\s*8\b|8\.\s*Exposure controls"));
static DISPOSAL_START: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"(?im)SECTION\s*13\b|13\.\s*Disposal considerations|Disposal considerations")
});
static DISPOSAL_END: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?im)SECTION\s*14\b|14\.\s*Transport information"));

static LEADING_PUNCTUATION: LazyLock<Regex> = LazyLock::new(|| pattern(r"^[\s:\-.]+"));
static DISPOSAL_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"(?i)\b(dispose|disposal|waste|container|regulation|accordance|local|national|authority)\b")
});
static SUBSECTION_NUMBER: LazyLock<Regex> = LazyLock::new(|| pattern(r"^\d{1,2}\.\d{1,2}"));
static DISPOSAL_PRIORITY: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"(?i)must be disposed|in accordance with|handle .* like the product")
});

impl SdsSection {
    fn markers(self) -> (&'static Regex, &'static Regex) {
        match self {
            SdsSection::FirstAid => (&*FIRST_AID_START, &*FIRST_AID_END),
            SdsSection::AccidentalRelease => (&*RELEASE_START, &*RELEASE_END),
            SdsSection::HandlingAndStorage => (&*HANDLING_START, &*HANDLING_END),
            SdsSection::Disposal => (&*DISPOSAL_START, &*DISPOSAL_END),
        }
    }
}

/// The longest prefix of `s` with at most `max` characters.
pub(crate) fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Text of one section. High confidence when both the start and the end of the
/// section were found, medium when only the start was.
pub fn extract_section(text: &str, section: SdsSection) -> Extracted<String> {
    let (start, end) = section.markers();
    let Some(start_match) = start.find(text) else {
        return Extracted::not_found();
    };

    let rest = &text[start_match.end()..];
    let (body, confidence) = match end.find(rest) {
        Some(end_match) => (&rest[..end_match.start()], Confidence::High),
        None => (
            truncate_chars(rest, UNTERMINATED_SECTION_LIMIT),
            Confidence::Medium,
        ),
    };

    let cleaned = LEADING_PUNCTUATION.replace(body, "").trim().to_string();
    if cleaned.is_empty() {
        tracing::debug!(?section, "section marker found but section is empty");
        return Extracted::not_found();
    }
    Extracted::found(cleaned, confidence)
}

/// Up to three actionable lines from the disposal section.
pub fn disposal_summary(text: &str) -> Extracted<String> {
    let section = extract_section(text, SdsSection::Disposal);
    let Some(body) = section.value else {
        return Extracted::not_found();
    };

    let lines: Vec<&str> = body
        .lines()
        .map(str::trim)
        .filter(|l| l.chars().count() > 10)
        .collect();
    let relevant: Vec<&str> = lines
        .iter()
        .copied()
        .filter(|l| DISPOSAL_KEYWORD.is_match(l) && !SUBSECTION_NUMBER.is_match(l))
        .collect();
    let priority: Vec<&str> = relevant
        .iter()
        .copied()
        .filter(|l| DISPOSAL_PRIORITY.is_match(l))
        .collect();

    let summary = if !priority.is_empty() {
        priority.iter().take(3).copied().collect::<Vec<_>>().join(" ")
    } else if !relevant.is_empty() {
        relevant.iter().take(3).copied().collect::<Vec<_>>().join(" ")
    } else if !lines.is_empty() {
        lines.iter().take(2).copied().collect::<Vec<_>>().join(" ")
    } else {
        DISPOSAL_FALLBACK.to_string()
    };

    Extracted::found(cap_summary(summary), section.confidence)
}

fn cap_summary(summary: String) -> String {
    if summary.chars().count() > DISPOSAL_SUMMARY_LIMIT {
        format!(
            "{}... (see full section)",
            truncate_chars(&summary, DISPOSAL_SUMMARY_LIMIT)
        )
    } else {
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SDS: &str = "SECTION 4: First aid measures\n\
        If inhaled, move person into fresh air.\n\
        In case of skin contact wash off with soap.\n\
        SECTION 5: Firefighting measures\n\
        Use water spray.\n\
        SECTION 13: Disposal considerations\n\
        13.1 Waste treatment methods\n\
        Offer surplus solutions to a licensed disposal company.\n\
        Waste material must be disposed of in accordance with national regulations.\n\
        Contaminated packaging: dispose of as unused product.\n\
        SECTION 14: Transport information\n";

    #[test]
    fn test_section_with_end_is_high() {
        let s = extract_section(SDS, SdsSection::FirstAid);
        assert_eq!(s.confidence, Confidence::High);
        let v = s.value.unwrap();
        assert!(v.starts_with("First aid measures"));
        assert!(v.contains("fresh air"));
        assert!(!v.contains("water spray"));
    }

    #[test]
    fn test_section_without_end_is_medium() {
        let text = "6. Accidental release measures\nSweep up and shovel.";
        let s = extract_section(text, SdsSection::AccidentalRelease);
        assert_eq!(s.confidence, Confidence::Medium);
        assert_eq!(s.value.as_deref(), Some("Sweep up and shovel."));
    }

    #[test]
    fn test_missing_section_is_low() {
        let s = extract_section("nothing here", SdsSection::HandlingAndStorage);
        assert_eq!(s, Extracted::not_found());
    }

    #[test]
    fn test_unterminated_section_is_capped() {
        let text = format!("SECTION 7 {}", "é".repeat(6000));
        let s = extract_section(&text, SdsSection::HandlingAndStorage);
        assert_eq!(s.value.unwrap().chars().count(), UNTERMINATED_SECTION_LIMIT - 1);
    }

    #[test]
    fn test_disposal_prefers_priority_lines() {
        let d = disposal_summary(SDS);
        assert_eq!(d.confidence, Confidence::High);
        assert_eq!(
            d.value.as_deref(),
            Some("Waste material must be disposed of in accordance with national regulations.")
        );
    }

    #[test]
    fn test_disposal_relevant_lines() {
        let text = "SECTION 13\nContact a licensed waste disposal service.\nKeep in original container always.\nSECTION 14";
        let d = disposal_summary(text);
        assert_eq!(
            d.value.as_deref(),
            Some("Contact a licensed waste disposal service. Keep in original container always.")
        );
    }

    #[test]
    fn test_disposal_summary_capped() {
        let line = format!("Waste must be disposed of in accordance with {}", "x".repeat(400));
        let text = format!("SECTION 13\n{line}\nSECTION 14");
        let d = disposal_summary(&text).value.unwrap();
        assert!(d.ends_with("... (see full section)"));
        assert_eq!(
            d.chars().count(),
            DISPOSAL_SUMMARY_LIMIT + "... (see full section)".len()
        );
    }

    #[test]
    fn test_truncate_chars_boundary() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("hi", 10), "hi");
    }
}
