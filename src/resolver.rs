// 🔍 Resolver - pair a federal Official with a candidate table row
//
// Two strict passes over the table, each in file order, first hit wins:
//
//   Pass 1 (structural)
//     (a) official name == "Given Surname" rebuilt from the row, or
//     (b) surnames equal AND party codes equal
//   Pass 2 (fuzzy fallback, only when pass 1 found nothing)
//     surname == text before the row's first comma AND
//     similarity("full name", "Given Middle Surname") > 70
//
// No scoring across rows. No match is a normal outcome.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::entities::{CandidateRecord, CandidateTable, Official};
use crate::normalizer::{normalize_candidate, normalize_official, CandidateName, OfficialName};

/// Fuzzy scores must be strictly greater than this to match
pub const FUZZY_THRESHOLD: u8 = 70;

// ============================================================================
// MATCH PASS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPass {
    /// Pass 1 (a): exact "Given Surname" reconstruction
    ExactName,

    /// Pass 1 (b): same surname and same party code
    SurnameParty,

    /// Pass 2: surname prefix plus similarity score above the floor
    Fuzzy { score: u8 },
}

// ============================================================================
// RESOLUTION RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Matched candidate id
    pub candidate_id: String,

    /// Index of the matched row (header excluded)
    pub row: usize,

    /// Which rule produced the match
    pub pass: MatchPass,
}

// ============================================================================
// RESOLVER
// ============================================================================

pub struct Resolver<'a> {
    records: &'a [CandidateRecord],

    /// Normalized keys, parallel to `records`
    names: Vec<CandidateName>,

    /// Fuzzy floor (exclusive)
    pub fuzzy_threshold: u8,
}

impl<'a> Resolver<'a> {
    /// Normalize every row once up front
    pub fn new(table: &'a CandidateTable) -> Self {
        Self::from_records(table.records())
    }

    pub fn from_records(records: &'a [CandidateRecord]) -> Self {
        Resolver {
            records,
            names: records.iter().map(normalize_candidate).collect(),
            fuzzy_threshold: FUZZY_THRESHOLD,
        }
    }

    /// Find the candidate row for a federal official
    ///
    /// Non-federal officials are never paired and always return None.
    pub fn resolve(&self, official: &Official) -> Option<Resolution> {
        if !official.is_federal() {
            return None;
        }

        let name = normalize_official(official);

        if let Some(found) = self.structural_pass(&name) {
            return Some(found);
        }

        debug!("No structural match for '{}', trying fuzzy pass", name.full);

        let found = self.fuzzy_pass(&name);
        if found.is_none() {
            debug!("Could not resolve '{}'", name.full);
        }
        found
    }

    /// True when a fuzzy score clears the floor
    pub fn accepts_score(&self, score: u8) -> bool {
        score > self.fuzzy_threshold
    }

    fn structural_pass(&self, official: &OfficialName) -> Option<Resolution> {
        for (row, candidate) in self.names.iter().enumerate() {
            // Rule (a)
            if candidate.first_last().as_deref() == Some(official.full.as_str()) {
                return Some(self.resolution(row, MatchPass::ExactName));
            }

            // Rule (b)
            if official.surname == candidate.surname
                && official.party.as_deref() == Some(candidate.party.as_str())
            {
                return Some(self.resolution(row, MatchPass::SurnameParty));
            }
        }

        None
    }

    fn fuzzy_pass(&self, official: &OfficialName) -> Option<Resolution> {
        for (row, candidate) in self.names.iter().enumerate() {
            if official.surname != candidate.comma_prefix {
                continue;
            }

            let rebuilt = match candidate.full_first_last() {
                Some(rebuilt) => rebuilt,
                None => continue,
            };

            let score = similarity_ratio(&official.full, &rebuilt);
            if self.accepts_score(score) {
                debug!(
                    "Fuzzy match '{}' ≈ '{}' (score {})",
                    official.full, rebuilt, score
                );
                return Some(self.resolution(row, MatchPass::Fuzzy { score }));
            }
        }

        None
    }

    fn resolution(&self, row: usize, pass: MatchPass) -> Resolution {
        Resolution {
            candidate_id: self.records[row].id.clone(),
            row,
            pass,
        }
    }
}

// ============================================================================
// SIMILARITY
// ============================================================================

/// Matching-block similarity as a rounded percentage (0-100)
///
/// score = 2 * M / (len_a + len_b), where M is the total size of the
/// matching blocks: the longest common substring, then recursively the
/// longest ones to its left and right. Rounds half to even.
///
/// Example:
/// - similarity_ratio("Jon Smith", "Jonathan Smith") = 78
/// - similarity_ratio("Tim Walz", "Timothy Walz") = 80
pub fn similarity_ratio(a: &str, b: &str) -> u8 {
    if a == b {
        return 100;
    }

    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let matched = matching_chars(&a, &b, 0, a.len(), 0, b.len());
    let total = (a.len() + b.len()) as f64;
    let ratio = 200.0 * matched as f64 / total;
    ratio.round_ties_even().clamp(0.0, 100.0) as u8
}

/// Characters covered by matching blocks within a[alo..ahi] and b[blo..bhi]
fn matching_chars(a: &[char], b: &[char], alo: usize, ahi: usize, blo: usize, bhi: usize) -> usize {
    let (i, j, size) = longest_common_block(a, b, alo, ahi, blo, bhi);
    if size == 0 {
        return 0;
    }

    let mut matched = size;
    if alo < i && blo < j {
        matched += matching_chars(a, b, alo, i, blo, j);
    }
    if i + size < ahi && j + size < bhi {
        matched += matching_chars(a, b, i + size, ahi, j + size, bhi);
    }
    matched
}

/// Longest common substring as (start in a, start in b, length)
///
/// Ties go to the block starting earliest in `a`, then earliest in `b`.
fn longest_common_block(a: &[char], b: &[char], alo: usize, ahi: usize, blo: usize, bhi: usize) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);

    // curr[j + 1] = length of the common run ending at a[i], b[j]
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for i in alo..ahi {
        for j in blo..bhi {
            curr[j + 1] = if a[i] == b[j] { prev[j] + 1 } else { 0 };

            let k = curr[j + 1];
            if k > best_size {
                best_i = i + 1 - k;
                best_j = j + 1 - k;
                best_size = k;
            }
        }
        std::mem::swap(&mut prev, &mut curr);
        curr.iter_mut().for_each(|run| *run = 0);
    }

    (best_i, best_j, best_size)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Level, Party};

    fn federal(name: &str, label: &str, code: Option<&str>) -> Official {
        Official::new(
            name,
            Some(Party::new(label, code)),
            "U.S. Representative",
            Some(Level::Federal),
        )
    }

    fn table(rows: &[(&str, &str, &str)]) -> CandidateTable {
        CandidateTable::from_records(
            rows.iter()
                .map(|(id, name, party)| CandidateRecord::new(id, name, party))
                .collect(),
        )
    }

    #[test]
    fn test_exact_name_match() {
        let table = table(&[("S001", "Smith, John", "D")]);
        let resolver = Resolver::new(&table);

        let found = resolver
            .resolve(&federal("John Smith", "Democratic Party", Some("D")))
            .unwrap();

        assert_eq!(found.candidate_id, "S001");
        assert_eq!(found.pass, MatchPass::ExactName);
    }

    #[test]
    fn test_near_miss_is_no_match() {
        let table = table(&[("S001", "Smith, John", "D")]);
        let resolver = Resolver::new(&table);

        let found = resolver.resolve(&federal("Jon Smithe", "Democratic Party", Some("D")));
        assert!(found.is_none());
    }

    #[test]
    fn test_first_match_wins() {
        let table = table(&[
            ("S001", "Smith, John", "D"),
            ("S002", "Smith, John", "R"),
        ]);
        let resolver = Resolver::new(&table);

        let found = resolver
            .resolve(&federal("John Smith", "Republican Party", Some("R")))
            .unwrap();

        assert_eq!(found.candidate_id, "S001");
        assert_eq!(found.row, 0);
    }

    #[test]
    fn test_surname_and_party_match() {
        let table = table(&[
            ("S001", "Jones, Mary", "R"),
            ("S002", "Smith, Jonathan", "D"),
        ]);
        let resolver = Resolver::new(&table);

        // Name does not rebuild exactly, but surname + party agree
        let found = resolver
            .resolve(&federal("Jack Smith", "Democratic Party", Some("D")))
            .unwrap();

        assert_eq!(found.candidate_id, "S002");
        assert_eq!(found.pass, MatchPass::SurnameParty);
    }

    #[test]
    fn test_surname_party_needs_official_party_code() {
        let table = table(&[("S001", "Smith, Jonathan", "")]);
        let resolver = Resolver::new(&table);

        let official = Official::new("Jack Smith", None, "U.S. Senator", Some(Level::Federal));
        // Empty candidate party must not pair with a missing official party
        assert!(resolver.structural_pass(&normalize_official(&official)).is_none());
    }

    #[test]
    fn test_structural_pass_scans_whole_table_before_fuzzy() {
        let table = table(&[
            ("S001", "Smith, Jon", "R"),
            ("S002", "Smith, Jonathan", "D"),
        ]);
        let resolver = Resolver::new(&table);

        // Row 0 would fuzzy-match, but row 1 is a structural (b) hit
        let found = resolver
            .resolve(&federal("Jonny Smith", "Democratic Party", Some("D")))
            .unwrap();

        assert_eq!(found.candidate_id, "S002");
        assert_eq!(found.pass, MatchPass::SurnameParty);
    }

    #[test]
    fn test_fuzzy_match() {
        let table = table(&[("S001", "Smith, John", "D")]);
        let resolver = Resolver::new(&table);

        // Party differs, name off by one letter
        let found = resolver
            .resolve(&federal("Jon Smith", "Republican Party", Some("R")))
            .unwrap();

        assert_eq!(found.candidate_id, "S001");
        match found.pass {
            MatchPass::Fuzzy { score } => assert!(score > FUZZY_THRESHOLD),
            other => panic!("expected fuzzy match, got {:?}", other),
        }
    }

    #[test]
    fn test_fuzzy_uses_full_given_part() {
        let table = table(&[("S001", "Smith, John Paul", "D")]);
        let resolver = Resolver::new(&table);

        let found = resolver
            .resolve(&federal("John Paul Smith", "Republican Party", Some("R")))
            .unwrap();

        assert_eq!(found.pass, MatchPass::Fuzzy { score: 100 });
    }

    #[test]
    fn test_fuzzy_catches_short_given_name() {
        let table = table(&[("S001", "Smith, Jonathan", "R")]);
        let resolver = Resolver::new(&table);

        let found = resolver
            .resolve(&federal("Jon Smith", "Democratic Party", Some("D")))
            .unwrap();

        assert_eq!(found.candidate_id, "S001");
        assert_eq!(found.pass, MatchPass::Fuzzy { score: 78 });
    }

    #[test]
    fn test_fuzzy_catches_nickname() {
        let table = table(&[("W001", "Walz, Timothy", "D")]);
        let resolver = Resolver::new(&table);

        let found = resolver
            .resolve(&federal("Tim Walz", "Democratic-Farmer-Labor Party", Some("DFL")))
            .unwrap();

        assert_eq!(found.pass, MatchPass::Fuzzy { score: 80 });
    }

    #[test]
    fn test_fuzzy_floor_at_default_threshold() {
        let table = table(&[
            ("S001", "Smith, Axyz", "R"),
            ("L001", "Li, Abxy", "R"),
        ]);
        let resolver = Resolver::new(&table);

        // "Abcd Smith" vs "Axyz Smith": 14 matched of 20 → 70
        assert_eq!(similarity_ratio("Abcd Smith", "Axyz Smith"), 70);
        assert!(resolver
            .resolve(&federal("Abcd Smith", "Democratic Party", Some("D")))
            .is_none());

        // "Abcd Li" vs "Abxy Li": 10 matched of 14 → 71
        assert_eq!(similarity_ratio("Abcd Li", "Abxy Li"), 71);
        let found = resolver
            .resolve(&federal("Abcd Li", "Democratic Party", Some("D")))
            .unwrap();
        assert_eq!(found.candidate_id, "L001");
        assert_eq!(found.pass, MatchPass::Fuzzy { score: 71 });
    }

    #[test]
    fn test_fuzzy_rejects_dissimilar_names() {
        let table = table(&[("S001", "Smith, Bartholomew", "D")]);
        let resolver = Resolver::new(&table);

        let found = resolver.resolve(&federal("Al Smith", "Republican Party", Some("R")));
        assert!(found.is_none());
    }

    #[test]
    fn test_fuzzy_floor_is_strict() {
        let table = table(&[]);
        let resolver = Resolver::new(&table);

        assert!(!resolver.accepts_score(69));
        assert!(!resolver.accepts_score(70));
        assert!(resolver.accepts_score(71));
        assert!(resolver.accepts_score(100));
    }

    #[test]
    fn test_fuzzy_floor_applied_to_real_scores() {
        // "abcdefghij" vs "abcdefgxyz": 14 matched of 20 → 70
        assert_eq!(similarity_ratio("abcdefghij", "abcdefgxyz"), 70);
        assert_eq!(similarity_ratio("abcdefghij", "abcdefghxy"), 80);

        let table = table(&[("S001", "Smith, Abcd", "D")]);
        let mut resolver = Resolver::new(&table);
        resolver.fuzzy_threshold = 80;
        // "Abcx Smith" vs "Abcd Smith": 18 matched of 20 → 90
        let found = resolver.resolve(&federal("Abcx Smith", "Republican Party", Some("R")));
        assert!(found.is_some());

        resolver.fuzzy_threshold = 90;
        let found = resolver.resolve(&federal("Abcx Smith", "Republican Party", Some("R")));
        assert!(found.is_none(), "a score equal to the floor must not match");
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let table = table(&[("S001", "O'BRIEN, PAT", "D")]);
        let resolver = Resolver::new(&table);

        let found = resolver.resolve(&federal("Pat O'Brien", "Democratic Party", Some("D")));
        assert!(found.is_none());
    }

    #[test]
    fn test_non_federal_never_resolves() {
        let table = table(&[("S001", "Smith, John", "D")]);
        let resolver = Resolver::new(&table);

        let mayor = Official::new(
            "John Smith",
            Some(Party::new("Democratic Party", Some("D"))),
            "Mayor",
            Some(Level::Local),
        );
        assert!(resolver.resolve(&mayor).is_none());
    }

    #[test]
    fn test_similarity_ratio_bounds() {
        assert_eq!(similarity_ratio("", ""), 100);
        assert_eq!(similarity_ratio("abc", "abc"), 100);
        assert_eq!(similarity_ratio("abc", "xyz"), 0);
        assert_eq!(similarity_ratio("", "abc"), 0);
    }

    #[test]
    fn test_similarity_uses_matching_blocks() {
        // Longest block "abcd", then "xy" to its right: 12 matched of 16
        assert_eq!(similarity_ratio("abcdQxyR", "abcdxyST"), 75);
        // Blocks never cross: "ab" after "cd" in b cannot also match
        assert_eq!(similarity_ratio("abcd", "cdab"), 50);
        assert_eq!(similarity_ratio("Jon Smith", "Jonathan Smith"), 78);
    }
}
