/// Name-finding strategies
///
/// Each strategy looks at the raw text (and the email hit, when there is one) and
/// either proposes a name or passes. The extractor runs them in order and keeps the
/// first proposal, so a later strategy never overrides an earlier one.

use crate::extractor::patterns::{
    overlaps_any, CAPITALIZED_PAIR_EXCLUSIONS, CAPITALIZED_RUN, CONTEXTUAL_NAME,
    CONTINUES_PHRASE, DOCUMENT_START_EXCLUSIONS, DOCUMENT_START_LINES, EMAIL_CONTEXT_CHARS,
    INSTITUTION_MARKERS, LABELED_NAME, LEADING_NAME,
};
use regex::Regex;
use std::fmt;

/// Location of the email address found in the text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmailHit<'a> {
    pub value: &'a str,
    /// Byte offset of the address within the text
    pub start: usize,
}

/// What every strategy gets to look at
#[derive(Debug, Clone, Copy)]
pub struct ScanInput<'a> {
    pub text: &'a str,
    pub email: Option<EmailHit<'a>>,
}

/// A single step of the name cascade
pub trait NameStrategy: Send + Sync + fmt::Debug {
    /// Short identifier used in logs
    fn label(&self) -> &'static str;

    /// Propose a name, or `None` to let the next strategy try
    fn find_name(&self, input: &ScanInput<'_>) -> Option<String>;
}

/// "named Jane Roe", "candidate named Jane Roe", "Dr. Jane Roe"
///
/// The label is dropped; candidates of three characters or fewer are ignored.
#[derive(Debug, Default)]
pub struct LabeledName;

impl NameStrategy for LabeledName {
    fn label(&self) -> &'static str {
        "labeled"
    }

    fn find_name(&self, input: &ScanInput<'_>) -> Option<String> {
        LABELED_NAME.iter().find_map(|pattern| {
            let name = pattern.captures(input.text)?.name("name")?.as_str().trim();
            (name.chars().count() > 3).then(|| name.to_string())
        })
    }
}

/// Literal names recognised anywhere in the text, case-insensitively
#[derive(Debug, Default)]
pub struct KnownNames {
    patterns: Vec<Regex>,
}

impl KnownNames {
    /// Compile the list. Words may be separated by any whitespace in the text.
    pub fn new<S: AsRef<str>>(names: &[S]) -> Self {
        let patterns = names
            .iter()
            .filter_map(|name| {
                let words: Vec<String> = name
                    .as_ref()
                    .split_whitespace()
                    .map(regex::escape)
                    .collect();
                if words.is_empty() {
                    return None;
                }
                match Regex::new(&format!(r"(?i){}", words.join(r"\s+"))) {
                    Ok(pattern) => Some(pattern),
                    Err(e) => {
                        tracing::warn!("Skipping known name '{}': {}", name.as_ref(), e);
                        None
                    }
                }
            })
            .collect();

        Self { patterns }
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl NameStrategy for KnownNames {
    fn label(&self) -> &'static str {
        "known-name"
    }

    /// Returns the text as it appears in the document, not the list entry
    fn find_name(&self, input: &ScanInput<'_>) -> Option<String> {
        self.patterns
            .iter()
            .find_map(|pattern| pattern.find(input.text))
            .map(|found| found.as_str().to_string())
    }
}

/// Resume-style header: the document opens with the person's name on its own
#[derive(Debug, Default)]
pub struct DocumentStart;

impl NameStrategy for DocumentStart {
    fn label(&self) -> &'static str {
        "document-start"
    }

    fn find_name(&self, input: &ScanInput<'_>) -> Option<String> {
        let window = leading_lines(input.text, DOCUMENT_START_LINES);
        let found = LEADING_NAME.captures(window)?.name("name")?;

        // "Contact John Smith at ..." is a sentence, not a header
        if CONTINUES_PHRASE.is_match(&window[found.end()..]) {
            return None;
        }

        let candidate = found.as_str().trim();
        if overlaps_any(candidate, &DOCUMENT_START_EXCLUSIONS) {
            return None;
        }
        Some(candidate.to_string())
    }
}

/// "... she Jane Roe ..." shortly before the email address
#[derive(Debug, Default)]
pub struct NearEmail;

impl NameStrategy for NearEmail {
    fn label(&self) -> &'static str {
        "near-email"
    }

    fn find_name(&self, input: &ScanInput<'_>) -> Option<String> {
        let email = input.email?;
        let window = trailing_chars(&input.text[..email.start], EMAIL_CONTEXT_CHARS);

        let last = CONTEXTUAL_NAME
            .captures_iter(window)
            .filter_map(|captures| captures.name("name"))
            .last()?;
        let candidate = last.as_str().trim();

        let lowered = candidate.to_lowercase();
        if INSTITUTION_MARKERS.iter().any(|marker| lowered.contains(marker)) {
            return None;
        }
        Some(candidate.to_string())
    }
}

/// Last resort: any two consecutive capitalized words not on the exclusion list
///
/// Each run of capitalized words is split into non-overlapping pairs from the left,
/// in text order. When an odd-length run opens the text or a sentence, its first
/// word is only capitalized by grammar ("Contact John Smith") and is skipped.
#[derive(Debug, Default)]
pub struct CapitalizedPair;

impl NameStrategy for CapitalizedPair {
    fn label(&self) -> &'static str {
        "capitalized-pair"
    }

    fn find_name(&self, input: &ScanInput<'_>) -> Option<String> {
        CAPITALIZED_RUN.find_iter(input.text).find_map(|run| {
            let mut words: Vec<&str> = run.as_str().split_whitespace().collect();
            if words.len() > 2 && words.len() % 2 == 1 && opens_sentence(input.text, run.start()) {
                words.remove(0);
            }
            words
                .chunks_exact(2)
                .map(|pair| format!("{} {}", pair[0], pair[1]))
                .find(|candidate| !overlaps_any(candidate, &CAPITALIZED_PAIR_EXCLUSIONS))
        })
    }
}

/// Whether byte offset `start` begins the text or follows sentence-ending punctuation
fn opens_sentence(text: &str, start: usize) -> bool {
    let before = text[..start].trim_end();
    before.is_empty() || before.ends_with(|c| matches!(c, '.' | '!' | '?'))
}

/// The built-in cascade, in evaluation order
pub fn default_strategies(known_names: KnownNames) -> Vec<Box<dyn NameStrategy>> {
    vec![
        Box::new(LabeledName),
        Box::new(known_names),
        Box::new(DocumentStart),
        Box::new(NearEmail),
        Box::new(CapitalizedPair),
    ]
}

/// The first `count` lines of `text`, newlines included
fn leading_lines(text: &str, count: usize) -> &str {
    match text.match_indices('\n').nth(count.saturating_sub(1)) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

/// At most the last `count` characters of `text`
fn trailing_chars(text: &str, count: usize) -> &str {
    if count == 0 {
        return "";
    }
    match text.char_indices().rev().nth(count - 1) {
        Some((index, _)) => &text[index..],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(text: &str) -> ScanInput<'_> {
        ScanInput { text, email: None }
    }

    fn scan_with_email<'a>(text: &'a str, email: &'a str) -> ScanInput<'a> {
        let start = text.find(email).unwrap();
        ScanInput {
            text,
            email: Some(EmailHit { value: email, start }),
        }
    }

    #[test]
    fn test_labeled_name_strips_label() {
        let input = scan("We met a candidate named Rohan Gupta last week.");
        assert_eq!(LabeledName.find_name(&input), Some("Rohan Gupta".to_string()));
    }

    #[test]
    fn test_labeled_name_title() {
        let input = scan("Attn: Mrs. Kavya Reddy, Sales");
        assert_eq!(LabeledName.find_name(&input), Some("Kavya Reddy".to_string()));
    }

    #[test]
    fn test_labeled_name_needs_two_words() {
        assert_eq!(LabeledName.find_name(&scan("a dog called Rex")), None);
    }

    #[test]
    fn test_known_names_keep_document_casing() {
        let known = KnownNames::new(&["John Doe"]);
        let input = scan("Resume of JOHN   DOE, engineer");
        assert_eq!(known.find_name(&input), Some("JOHN   DOE".to_string()));
    }

    #[test]
    fn test_known_names_empty_entries_skipped() {
        let known = KnownNames::new(&["", "  ", "Avula Mahendra"]);
        assert_eq!(known.len(), 1);
    }

    #[test]
    fn test_document_start_header() {
        let input = scan("Priya Sharma\nData Analyst\npriya@example.com");
        assert_eq!(DocumentStart.find_name(&input), Some("Priya Sharma".to_string()));
    }

    #[test]
    fn test_document_start_rejects_sentence() {
        assert_eq!(DocumentStart.find_name(&scan("Contact John Smith at noon")), None);
    }

    #[test]
    fn test_document_start_rejects_excluded_terms() {
        let input = scan("Computer Science\nB.Tech 2024");
        assert_eq!(DocumentStart.find_name(&input), None);
    }

    #[test]
    fn test_document_start_must_be_at_very_start() {
        assert_eq!(DocumentStart.find_name(&scan("\nPriya Sharma")), None);
    }

    #[test]
    fn test_near_email_takes_last_match() {
        let text = "Referred by named Amit Shah. We spoke with named Neha Kapoor; reach neha@corp.in";
        let input = scan_with_email(text, "neha@corp.in");
        assert_eq!(NearEmail.find_name(&input), Some("Neha Kapoor".to_string()));
    }

    #[test]
    fn test_near_email_rejects_institutions() {
        let text = "She studied at her Woxsen University campus: admissions@woxsen.edu.in";
        let input = scan_with_email(text, "admissions@woxsen.edu.in");
        assert_eq!(NearEmail.find_name(&input), None);
    }

    #[test]
    fn test_near_email_ignores_text_beyond_window() {
        let filler = "x".repeat(EMAIL_CONTEXT_CHARS);
        let text = format!("named Amit Shah {} amit@corp.in", filler);
        let input = scan_with_email(&text, "amit@corp.in");
        assert_eq!(NearEmail.find_name(&input), None);
    }

    #[test]
    fn test_near_email_requires_email() {
        assert_eq!(NearEmail.find_name(&scan("named Amit Shah")), None);
    }

    #[test]
    fn test_capitalized_pair_skips_sentence_opener() {
        let input = scan("Contact John Smith at john.smith@example.com");
        assert_eq!(CapitalizedPair.find_name(&input), Some("John Smith".to_string()));

        let input = scan("Thanks for applying. Meet Ravi Kumar tomorrow");
        assert_eq!(CapitalizedPair.find_name(&input), Some("Ravi Kumar".to_string()));
    }

    #[test]
    fn test_capitalized_pair_reads_left_to_right() {
        let input = scan("Resume: Anil Kumar Verma, anil@x.com");
        assert_eq!(CapitalizedPair.find_name(&input), Some("Anil Kumar".to_string()));

        let input = scan("Ravi Kumar Computer Science graduate");
        assert_eq!(CapitalizedPair.find_name(&input), Some("Ravi Kumar".to_string()));
    }

    #[test]
    fn test_opens_sentence() {
        let text = "Hello there. Contact Ravi";
        assert!(opens_sentence(text, 0));
        assert!(opens_sentence(text, text.find("Contact").unwrap()));
        assert!(!opens_sentence(text, text.find("Ravi").unwrap()));
    }

    #[test]
    fn test_capitalized_pair_skips_exclusions() {
        let input = scan("Machine Learning intern Ravi Kumar");
        assert_eq!(CapitalizedPair.find_name(&input), Some("Ravi Kumar".to_string()));
    }

    #[test]
    fn test_capitalized_pair_requires_three_letters() {
        assert_eq!(CapitalizedPair.find_name(&scan("Mr Al Bo")), None);
    }

    #[test]
    fn test_trailing_chars_respects_char_boundaries() {
        assert_eq!(trailing_chars("héllo", 3), "llo");
        assert_eq!(trailing_chars("hé", 10), "hé");
        assert_eq!(trailing_chars("abc", 0), "");
    }

    #[test]
    fn test_leading_lines() {
        assert_eq!(leading_lines("a\nb\nc\nd", 3), "a\nb\nc");
        assert_eq!(leading_lines("a\nb", 3), "a\nb");
    }
}
