/// Compiled patterns and word lists shared by the extraction strategies

use once_cell::sync::Lazy;
use regex::Regex;

/// Sentinel email used when no address was found
pub const EMAIL_NOT_FOUND: &str = "notfound@example.com";
/// Sentinel phone used when no number was found
pub const PHONE_NOT_FOUND: &str = "N/A";
/// Sentinel name used when no strategy produced a candidate
pub const NAME_UNKNOWN: &str = "Unknown";

/// Characters scanned before the email by the proximity strategy
pub const EMAIL_CONTEXT_CHARS: usize = 300;

/// Lines considered by the document-start strategy
pub const DOCUMENT_START_LINES: usize = 3;

pub(crate) static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z]{2,}\b").expect("email pattern")
});

/// Indian mobile number with optional +91 prefix
pub(crate) static PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\+91[\s-]?)?[6-9][0-9]{9}").expect("phone pattern"));

/// Label patterns tried in order; each captures the name in `name`
pub(crate) static LABELED_NAME: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\b(?i:named|called)\s+(?P<name>[A-Z][a-z]+(?:[ \t]+[A-Z][a-z]+)+)",
        r"\b(?i:individual|person|candidate|student)\s+(?i:named)\s+(?P<name>[A-Z][a-z]+(?:[ \t]+[A-Z][a-z]+)+)",
        r"\b(?i:mrs|mr|ms|dr)\.?\s+(?P<name>[A-Z][a-z]+(?:[ \t]+[A-Z][a-z]+)+)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("labeled name pattern"))
    .collect()
});

/// Capitalized words anchored at the very start of the text
pub(crate) static LEADING_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<name>[A-Z][a-z]+(?:[ \t]+[A-Z][a-z]+)+)").expect("leading name pattern")
});

/// A lowercase word continuing the same line, i.e. the capitalized run is part of a phrase
pub(crate) static CONTINUES_PHRASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[ \t]+[a-z]+(?:[\s,;:!?]|$)").expect("phrase continuation pattern")
});

/// Pronoun or label followed by exactly two capitalized words
pub(crate) static CONTEXTUAL_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?i:she|he|his|her|individual|person|named)\s+(?P<name>[A-Z][a-z]+[ \t]+[A-Z][a-z]+)")
        .expect("contextual name pattern")
});

/// Runs of two or more capitalized words of three or more letters
pub(crate) static CAPITALIZED_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z][a-z]{2,}(?:[ \t]+[A-Z][a-z]{2,})+\b").expect("capitalized run pattern")
});

/// Section headers and institution terms that are never a person's name at the top of a document
pub const DOCUMENT_START_EXCLUSIONS: [&str; 14] = [
    "SKILLS",
    "EDUCATION",
    "EXPERIENCE",
    "PROJECTS",
    "SUMMARY",
    "OBJECTIVE",
    "Computer Science",
    "Data Science",
    "Higher Secondary",
    "Public School",
    "Tech Stack",
    "Key Projects",
    "Professional Summary",
    "Innovation Hub",
];

/// Field-of-study and institution phrases rejected by the capitalized-pair fallback
pub const CAPITALIZED_PAIR_EXCLUSIONS: [&str; 16] = [
    "Computer Science",
    "Data Science",
    "Machine Learning",
    "Web Development",
    "Higher Secondary",
    "Public School",
    "Tech Stack",
    "Professional Summary",
    "Key Projects",
    "Plant Disease",
    "Disease Detection",
    "Innovation Hub",
    "Woxsen University",
    "Southwest Jiaotong",
    "Nanyang Technological",
    "Language Models",
];

/// Substrings that mark a contextual match as an institution
pub const INSTITUTION_MARKERS: [&str; 4] = ["university", "school", "college", "hub"];

/// Case-insensitive containment in either direction
pub fn overlaps_any(candidate: &str, terms: &[&str]) -> bool {
    let candidate = candidate.to_lowercase();
    terms.iter().any(|term| {
        let term = term.to_lowercase();
        term.contains(&candidate) || candidate.contains(&term)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_pattern_case_insensitive() {
        let found = EMAIL.find("Mail: Jane.Roe+crm@Mail.Example.ORG today").unwrap();
        assert_eq!(found.as_str(), "Jane.Roe+crm@Mail.Example.ORG");
    }

    #[test]
    fn test_phone_pattern() {
        assert_eq!(PHONE.find("call +91-9876543210 now").unwrap().as_str(), "+91-9876543210");
        assert_eq!(PHONE.find("call 8123456789").unwrap().as_str(), "8123456789");
        assert!(PHONE.find("call 5123456789").is_none());
    }

    #[test]
    fn test_overlaps_any_both_directions() {
        assert!(overlaps_any("Computer Science Department", &DOCUMENT_START_EXCLUSIONS));
        assert!(overlaps_any("tech", &DOCUMENT_START_EXCLUSIONS));
        assert!(!overlaps_any("Priya Sharma", &DOCUMENT_START_EXCLUSIONS));
    }
}
