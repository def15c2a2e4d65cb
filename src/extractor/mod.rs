/// Contact Extraction
///
/// Turns unstructured text (from a PDF text layer or an OCR engine) into a best-effort
/// name / email / phone triple. Email and phone are single regex lookups; the name comes
/// from an ordered cascade of strategies where the first proposal wins.
///
/// This is a heuristic tuned against resume-like documents, not a general NER system.

// Compiled patterns, sentinels and exclusion lists
pub mod patterns;

// The ordered name strategies
pub mod strategies;

// Raw document bytes to text, and the async processing entry point
pub mod document;

pub use document::{DocumentError, DocumentKind, DocumentProcessor, TextDecoder};
pub use patterns::{EMAIL_NOT_FOUND, NAME_UNKNOWN, PHONE_NOT_FOUND};
pub use strategies::{KnownNames, NameStrategy};

use crate::lead::{LeadSource, LeadStatus, NewLead};
use serde::{Deserialize, Serialize};
use strategies::{EmailHit, ScanInput};

/// Contact details recovered from a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedContact {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl ExtractedContact {
    /// Payload for a new lead sourced from a document
    pub fn into_new_lead(self) -> NewLead {
        NewLead {
            name: self.name,
            email: self.email,
            phone: Some(self.phone),
            status: Some(LeadStatus::New),
            source: Some(LeadSource::Document),
        }
    }
}

/// Pure, thread-safe contact extractor
#[derive(Debug)]
pub struct ContactExtractor {
    strategies: Vec<Box<dyn NameStrategy>>,
}

impl Default for ContactExtractor {
    fn default() -> Self {
        Self::new(&crate::config::DEFAULT_KNOWN_NAMES)
    }
}

impl ContactExtractor {
    /// Built-in cascade with the given known-name list
    pub fn new<S: AsRef<str>>(known_names: &[S]) -> Self {
        Self::from_strategies(strategies::default_strategies(KnownNames::new(known_names)))
    }

    /// Custom cascade, evaluated in the given order
    pub fn from_strategies(strategies: Vec<Box<dyn NameStrategy>>) -> Self {
        Self { strategies }
    }

    /// Strategy labels in evaluation order
    pub fn strategy_labels(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|strategy| strategy.label()).collect()
    }

    /// Extract a contact, or `None` when neither an email nor a name was recovered
    ///
    /// A result may still carry the phone, email or name sentinel.
    pub fn extract(&self, text: &str) -> Option<ExtractedContact> {
        let email_hit = patterns::EMAIL.find(text).map(|found| EmailHit {
            value: found.as_str(),
            start: found.start(),
        });
        let phone = patterns::PHONE
            .find(text)
            .map(|found| found.as_str().to_string())
            .unwrap_or_else(|| PHONE_NOT_FOUND.to_string());

        let input = ScanInput {
            text,
            email: email_hit,
        };
        let name = self.strategies.iter().find_map(|strategy| {
            let name = strategy.find_name(&input).filter(|name| !name.is_empty())?;
            tracing::debug!("Name '{}' found by {} strategy", name, strategy.label());
            Some(name)
        });

        match (email_hit, name) {
            (None, None) => {
                tracing::debug!("No email or name recovered from {} chars of text", text.len());
                None
            }
            (email, name) => Some(ExtractedContact {
                name: name.unwrap_or_else(|| NAME_UNKNOWN.to_string()),
                email: email
                    .map(|hit| hit.value.to_string())
                    .unwrap_or_else(|| EMAIL_NOT_FOUND.to_string()),
                phone,
            }),
        }
    }
}
