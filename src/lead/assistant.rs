/// Canned conversational replies about a single lead
///
/// Keyword-driven; there is no model behind it.

use crate::lead::types::Lead;

/// Greeting shown when a conversation about a lead starts
pub fn greeting(lead: &Lead) -> String {
    format!(
        "Hello! I'm here to help you with {}. Ask me about follow-up actions or details.",
        lead.name
    )
}

/// Reply to a user message about `lead`
pub fn reply(lead: &Lead, message: &str) -> String {
    let lowered = message.to_lowercase();
    if lowered.contains("follow-up") {
        format!("Email {} at {}.", lead.name, lead.email)
    } else if lowered.contains("details") {
        format!(
            "Name: {}, Email: {}, Status: {}.",
            lead.name, lead.email, lead.status
        )
    } else {
        "Ask about follow-up or details.".to_string()
    }
}
