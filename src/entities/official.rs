// 🏛️ Official Entity - one elected position holder from the address lookup
//
// Every attribute is populated at construction with an explicit default, so
// nothing about an Official can fail once it exists.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sentinel written for contact details the lookup did not provide
pub const UNAVAILABLE: &str = "Not available";

/// Name used when the lookup record carries no name at all
pub const UNKNOWN_NAME: &str = "Unknown";

// ============================================================================
// LEVEL
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    Federal,
    State,
    Local,
}

impl Level {
    /// Map a raw lookup level tag onto a tier.
    ///
    /// Closed set: `country`, `administrativeArea1`, `administrativeArea2`,
    /// `regional`. Anything else is unclassified.
    pub fn from_tag(tag: &str) -> Option<Level> {
        match tag {
            "country" => Some(Level::Federal),
            "administrativeArea1" => Some(Level::State),
            "administrativeArea2" => Some(Level::Local),
            "regional" => Some(Level::Local),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Federal => "Federal",
            Level::State => "State",
            Level::Local => "Local",
        }
    }

    /// Key of this tier in the output document
    pub fn bucket_key(&self) -> &'static str {
        match self {
            Level::Federal => "federal",
            Level::State => "state",
            Level::Local => "local",
        }
    }
}

// ============================================================================
// PARTY
// ============================================================================

/// Party affiliation: display label plus the short code used by the
/// candidate table ("D", "R", ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub label: String,
    pub code: Option<String>,
}

impl Party {
    pub fn new(label: &str, code: Option<&str>) -> Self {
        Party {
            label: label.trim().to_string(),
            code: code
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
        }
    }

    /// Build from a label alone, deriving the code from its initial
    ///
    /// "Democratic Party" → D, "Republican Party" → R. Nonpartisan and
    /// unknown labels get no code.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        let lowered = label.to_lowercase();
        let code = if lowered.is_empty() || lowered.starts_with("nonpartisan") || lowered == "unknown" {
            None
        } else {
            label
                .chars()
                .find(|c| c.is_ascii_alphabetic())
                .map(|c| c.to_ascii_uppercase().to_string())
        };

        Party {
            label: label.to_string(),
            code,
        }
    }

    /// Parse the raw `party` attribute: a plain label, or a
    /// `[label, code]` pair.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(label) if !label.trim().is_empty() => Some(Party::from_label(label)),
            Value::Array(parts) => {
                let label = parts.first().and_then(Value::as_str)?;
                match parts.get(1).and_then(Value::as_str) {
                    Some(code) => Some(Party::new(label, Some(code))),
                    None => Some(Party::from_label(label)),
                }
            }
            _ => None,
        }
    }
}

// ============================================================================
// CONTACT FIELD
// ============================================================================

/// A contact detail that is either listed or explicitly unavailable.
/// Serializes as a plain string, using [`UNAVAILABLE`] for the latter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContactField {
    Listed(String),
    Unavailable,
}

impl ContactField {
    pub fn from_option(value: Option<String>) -> Self {
        match value {
            Some(v) if !v.trim().is_empty() => ContactField::Listed(v.trim().to_string()),
            _ => ContactField::Unavailable,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, ContactField::Listed(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            ContactField::Listed(v) => v,
            ContactField::Unavailable => UNAVAILABLE,
        }
    }
}

impl From<String> for ContactField {
    fn from(value: String) -> Self {
        if value == UNAVAILABLE {
            ContactField::Unavailable
        } else {
            ContactField::from_option(Some(value))
        }
    }
}

impl From<ContactField> for String {
    fn from(value: ContactField) -> Self {
        match value {
            ContactField::Listed(v) => v,
            ContactField::Unavailable => UNAVAILABLE.to_string(),
        }
    }
}

// ============================================================================
// OFFICIAL
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Official {
    name: String,
    party: Option<Party>,
    role: String,
    level: Option<Level>,
    address: ContactField,
    phone: ContactField,
    website: ContactField,
}

impl Official {
    pub fn new(name: &str, party: Option<Party>, role: &str, level: Option<Level>) -> Self {
        let name = name.trim();
        Official {
            name: if name.is_empty() { UNKNOWN_NAME.to_string() } else { name.to_string() },
            party,
            role: role.trim().to_string(),
            level,
            address: ContactField::Unavailable,
            phone: ContactField::Unavailable,
            website: ContactField::Unavailable,
        }
    }

    /// Builder: set contact details
    pub fn with_contact(mut self, address: ContactField, phone: ContactField, website: ContactField) -> Self {
        self.address = address;
        self.phone = phone;
        self.website = website;
        self
    }

    /// Build from one raw `officials[i]` record of the lookup response
    pub fn from_raw(raw: &Value, role: &str, level_tag: Option<&str>) -> Self {
        let name = raw.get("name").and_then(Value::as_str).unwrap_or("");
        let party = raw.get("party").and_then(Party::from_value);
        let level = level_tag.and_then(Level::from_tag);

        let address = raw
            .get("address")
            .and_then(Value::as_array)
            .and_then(|list| list.first())
            .and_then(format_address);
        let phone = first_string(raw, "phones");
        let website = first_string(raw, "urls");

        Official::new(name, party, role, level).with_contact(
            ContactField::from_option(address),
            ContactField::from_option(phone),
            ContactField::from_option(website),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn party(&self) -> Option<&Party> {
        self.party.as_ref()
    }

    /// Party short code, if the lookup supplied or implied one
    pub fn party_code(&self) -> Option<&str> {
        self.party.as_ref().and_then(|p| p.code.as_deref())
    }

    pub fn party_label(&self) -> &str {
        self.party.as_ref().map(|p| p.label.as_str()).unwrap_or("Unknown")
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn level(&self) -> Option<Level> {
        self.level
    }

    pub fn is_federal(&self) -> bool {
        self.level == Some(Level::Federal)
    }

    /// President and Vice President sit in the federal tier but are not
    /// tracked in the candidate table.
    pub fn is_executive(&self) -> bool {
        self.role.contains("President")
    }

    pub fn address(&self) -> &ContactField {
        &self.address
    }

    pub fn phone(&self) -> &ContactField {
        &self.phone
    }

    pub fn website(&self) -> &ContactField {
        &self.website
    }
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Join the parts of a postal address in reading order
fn format_address(address: &Value) -> Option<String> {
    let parts: Vec<&str> = ["line1", "line2", "line3", "city", "state", "zip"]
        .iter()
        .filter_map(|key| address.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

fn first_string(raw: &Value, key: &str) -> Option<String> {
    raw.get(key)
        .and_then(Value::as_array)
        .and_then(|list| list.first())
        .and_then(Value::as_str)
        .map(str::to_string)
}

// ============================================================================
// TESTS
// ============================================================================
