/// Core lead type definitions
///
/// A lead is a prospective customer with contact details, a pipeline status and the
/// channel it came in through. Request payloads are validated into `NewLead` and
/// `LeadPatch` before they ever reach storage.

use crate::validation::{FieldError, FieldReader};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{fmt, str::FromStr};

/// Placeholder phone stored when none was supplied
pub const DEFAULT_PHONE: &str = "N/A";

/// A stored lead record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    /// Store-assigned identifier, never reused
    pub id: i64,
    pub name: String,
    /// Free-form email address, not re-validated by the server
    pub email: String,
    pub phone: String,
    pub status: LeadStatus,
    pub source: LeadSource,
    /// Creation time, immutable once assigned
    pub created_at: DateTime<Utc>,
}

/// Pipeline status of a lead
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
}

/// How the lead entered the system
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeadSource {
    #[default]
    Manual,
    Document,
}

/// Status filter used when listing leads
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LeadFilter {
    #[default]
    All,
    Status(LeadStatus),
}

/// Validated payload for creating a lead
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewLead {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub status: Option<LeadStatus>,
    pub source: Option<LeadSource>,
}

/// Validated partial update; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    /// `Some(None)` resets the phone to the placeholder
    pub phone: Option<Option<String>>,
    pub status: Option<LeadStatus>,
    pub source: Option<LeadSource>,
}

const STATUS_VALUES: [&str; 2] = ["New", "Contacted"];
const SOURCE_VALUES: [&str; 2] = ["Manual", "Document"];

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "New",
            LeadStatus::Contacted => "Contacted",
        }
    }
}

impl FromStr for LeadStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "New" => Ok(LeadStatus::New),
            "Contacted" => Ok(LeadStatus::Contacted),
            other => Err(format!("unknown lead status: {}", other)),
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl LeadSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadSource::Manual => "Manual",
            LeadSource::Document => "Document",
        }
    }
}

impl FromStr for LeadSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Manual" => Ok(LeadSource::Manual),
            "Document" => Ok(LeadSource::Document),
            other => Err(format!("unknown lead source: {}", other)),
        }
    }
}

impl fmt::Display for LeadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl LeadFilter {
    /// Parse the `status` query value; "All" (any case) disables filtering
    pub fn parse(raw: &str) -> Result<Self, FieldError> {
        if raw.eq_ignore_ascii_case("all") {
            return Ok(LeadFilter::All);
        }
        raw.parse::<LeadStatus>()
            .map(LeadFilter::Status)
            .map_err(|_| {
                FieldError::new("status", "Invalid enum value. Expected 'All' | 'New' | 'Contacted'")
            })
    }

    pub fn matches(&self, lead: &Lead) -> bool {
        match self {
            LeadFilter::All => true,
            LeadFilter::Status(status) => lead.status == *status,
        }
    }
}

impl NewLead {
    /// Validate a JSON request body into a creation payload
    pub fn from_json(body: &Value) -> Result<Self, Vec<FieldError>> {
        let mut reader = FieldReader::new(body)?;
        let name = reader.required_text("name");
        let email = reader.required_text("email");
        let phone = reader.nullable_string("phone").flatten();
        let status = reader.optional_enum("status", &STATUS_VALUES);
        let source = reader.optional_enum("source", &SOURCE_VALUES);

        reader.finish(|| {
            Some(NewLead {
                name: name?,
                email: email?,
                phone,
                status,
                source,
            })
        })
    }

    /// Build the stored record, applying field defaults
    pub fn into_lead(self, id: i64, created_at: DateTime<Utc>) -> Lead {
        Lead {
            id,
            name: self.name,
            email: self.email,
            phone: self
                .phone
                .filter(|phone| !phone.is_empty())
                .unwrap_or_else(|| DEFAULT_PHONE.to_string()),
            status: self.status.unwrap_or_default(),
            source: self.source.unwrap_or_default(),
            created_at,
        }
    }
}

impl LeadPatch {
    /// Validate a JSON request body into a partial update
    ///
    /// `id` and `createdAt` are not part of the schema and are ignored if sent.
    pub fn from_json(body: &Value) -> Result<Self, Vec<FieldError>> {
        let mut reader = FieldReader::new(body)?;
        let name = reader.optional_text("name");
        let email = reader.optional_text("email");
        let phone = reader.nullable_string("phone");
        let status = reader.optional_enum("status", &STATUS_VALUES);
        let source = reader.optional_enum("source", &SOURCE_VALUES);

        reader.finish(|| {
            Some(LeadPatch {
                name,
                email,
                phone,
                status,
                source,
            })
        })
    }

    pub fn is_empty(&self) -> bool {
        *self == LeadPatch::default()
    }
}

impl Lead {
    /// Merge a partial update in place. Identifier and creation time never change.
    pub fn apply(&mut self, patch: LeadPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone.unwrap_or_else(|| DEFAULT_PHONE.to_string());
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(source) = patch.source {
            self.source = source;
        }
    }
}
