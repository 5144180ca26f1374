// 🔤 Entity Normalizer - comparable name keys for both datasets
//
// Candidate table: "Surname, Given Middle"   (surname first)
// Lookup service:  "Given Middle Surname"    (surname last)
//
// Comparison is case-sensitive: "O'Brien" and "O'BRIEN" are different keys.

use crate::entities::{CandidateRecord, Official};

/// Comparable keys for one candidate row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateName {
    /// "Smith" from "Smith, John Q"
    pub surname: String,

    /// First given token: "John" from "Smith, John Q"
    pub given: Option<String>,

    /// Everything after the comma: "John Q"
    pub given_full: Option<String>,

    /// Text before the first comma, as written
    pub comma_prefix: String,

    /// Party code from the row
    pub party: String,
}

impl CandidateName {
    /// "Given Surname" using the first given token
    pub fn first_last(&self) -> Option<String> {
        self.given
            .as_ref()
            .map(|given| format!("{} {}", given, self.surname))
    }

    /// "Given Middle Surname" using the full given part
    pub fn full_first_last(&self) -> Option<String> {
        self.given_full
            .as_ref()
            .map(|given| format!("{} {}", given, self.surname))
    }
}

/// Comparable keys for one official
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfficialName {
    /// Display name as given by the lookup
    pub full: String,

    /// Last whitespace token of the display name
    pub surname: String,

    /// Party code, when known
    pub party: Option<String>,
}

/// Trim whitespace and trailing commas
pub fn clean_token(token: &str) -> &str {
    token.trim().trim_end_matches(',').trim()
}

/// Normalize a raw "Surname, Given Middle" string
pub fn normalize_candidate_name(raw: &str, party: &str) -> CandidateName {
    let comma_prefix = raw.split(',').next().unwrap_or("").trim().to_string();

    let (surname, given_full) = match raw.split_once(',') {
        Some((surname, rest)) => {
            let rest = clean_token(rest);
            (clean_token(surname).to_string(), non_empty(rest))
        }
        None => {
            // No comma: first token is the surname, the rest are given names
            let mut tokens = raw.split_whitespace();
            let surname = tokens.next().map(clean_token).unwrap_or("").to_string();
            let rest = tokens.map(clean_token).collect::<Vec<_>>().join(" ");
            (surname, non_empty(&rest))
        }
    };

    let given = given_full
        .as_deref()
        .and_then(|g| g.split_whitespace().next())
        .map(|g| clean_token(g).to_string());

    CandidateName {
        surname,
        given,
        given_full,
        comma_prefix,
        party: clean_token(party).to_string(),
    }
}

pub fn normalize_candidate(record: &CandidateRecord) -> CandidateName {
    normalize_candidate_name(&record.name, &record.party)
}

pub fn normalize_official(official: &Official) -> OfficialName {
    let full = official.name().trim().to_string();
    let surname = full
        .split_whitespace()
        .last()
        .map(clean_token)
        .unwrap_or("")
        .to_string();

    OfficialName {
        full,
        surname,
        party: official.party_code().map(|c| clean_token(c).to_string()),
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
