// End-to-end runs against fake collaborators and real cache files

use civic_ledger::{
    read_tree, write_tree, AppConfig, CandidateRecord, CandidateTable, FetchError, FinanceSource,
    Ledger, LedgerError, OfficialsLookup, Representative, Stores,
};
use serde_json::{json, Value};
use std::cell::Cell;

struct FakeCivic {
    calls: Cell<usize>,
    fail: bool,
}

impl FakeCivic {
    fn new() -> Self {
        FakeCivic { calls: Cell::new(0), fail: false }
    }
}

impl OfficialsLookup for FakeCivic {
    fn lookup(&self, _address: &str) -> Result<Value, FetchError> {
        self.calls.set(self.calls.get() + 1);
        if self.fail {
            return Err(FetchError::Status { service: "civic-info".into(), status: 400 });
        }

        Ok(json!({
            "normalizedInput": {"line1": "1 Main St", "city": "Springfield", "state": "IL"},
            "offices": [
                {"name": "President of the United States", "levels": ["country"], "officialIndices": [0]},
                {"name": "U.S. Senator", "levels": ["country"], "officialIndices": [1, 2]},
                {"name": "Governor of Illinois", "levels": ["administrativeArea1"], "officialIndices": [3]},
                {"name": "Mayor of Springfield", "levels": ["locality"], "officialIndices": [4]}
            ],
            "officials": [
                {"name": "Pat Chief", "party": "Independent"},
                {"name": "John Smith", "party": "Democratic Party", "phones": ["(202) 555-0100"]},
                {"name": "Jon Smithe", "party": "Democratic Party"},
                {"name": "Gil Gov", "party": "Republican Party",
                 "address": [{"line1": "207 State House", "city": "Springfield", "state": "IL", "zip": "62706"}]},
                {"name": "Max Mayor"}
            ]
        }))
    }
}

struct FakeFinance {
    contributor_calls: Cell<usize>,
    industry_calls: Cell<usize>,
}

impl FakeFinance {
    fn new() -> Self {
        FakeFinance { contributor_calls: Cell::new(0), industry_calls: Cell::new(0) }
    }
}

impl FinanceSource for FakeFinance {
    fn contributors(&self, candidate_id: &str, _cycle: Option<&str>) -> Result<Value, FetchError> {
        self.contributor_calls.set(self.contributor_calls.get() + 1);
        Ok(json!({"response": {"contributors": {
            "@attributes": {"cid": candidate_id},
            "contributor": [
                {"@attributes": {"org_name": "Acme Corp", "total": "15000", "pacs": "10000", "indivs": "5000"}},
                {"@attributes": {"org_name": "Widgets Inc", "total": "9000", "pacs": "0", "indivs": "9000"}}
            ]
        }}}))
    }

    fn industries(&self, _candidate_id: &str, _cycle: Option<&str>) -> Result<Value, FetchError> {
        self.industry_calls.set(self.industry_calls.get() + 1);
        Ok(json!({"response": {"industries": {"industry": [
            {"@attributes": {"industry_code": "K01", "industry_name": "Lawyers/Law Firms", "indivs": "120500", "pacs": "3000", "total": "123500"}}
        ]}}}))
    }
}

fn candidates() -> CandidateTable {
    CandidateTable::from_records(vec![
        CandidateRecord::new("S001", "Smith, John", "D"),
        CandidateRecord::new("S002", "Jones, Mary", "R"),
    ])
}

#[test]
fn test_full_run_builds_augmented_tree() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::default().with_cache_dir(dir.path());
    let civic = FakeCivic::new();
    let finance = FakeFinance::new();
    let ledger = Ledger::new(&civic, &finance, "2020");
    let mut stores = Stores::load(&config);

    let (tree, summary) = ledger.run("1 Main St", &candidates(), &mut stores).unwrap();

    assert_eq!(tree.federal.len(), 3);
    assert_eq!(tree.state.len(), 1);
    assert!(tree.local.is_empty());
    assert_eq!(summary.unclassified, 1);
    assert_eq!(summary.promotion.tracked, 1);
    assert_eq!(summary.promotion.executive, 1);
    assert_eq!(summary.promotion.unmatched, 1);

    match &tree.federal[1] {
        Representative::Tracked(tracked) => {
            assert_eq!(tracked.candidate_id(), "S001");
            assert_eq!(tracked.contributors.as_ref().map(Vec::len), Some(2));
            assert_eq!(tracked.industries.as_ref().map(Vec::len), Some(1));
        }
        other => panic!("expected tracked senator, got {:?}", other),
    }
    assert!(matches!(tree.federal[2], Representative::Plain(_)), "Jon Smithe stays unmatched");

    // All three cache files written
    assert!(dir.path().join("final_cache.json").exists());
    assert!(dir.path().join("contributor_cache.json").exists());
    assert!(dir.path().join("industry_cache.json").exists());

    // The raw address never lands in the lookup cache
    let lookup_file = std::fs::read_to_string(dir.path().join("final_cache.json")).unwrap();
    assert!(!lookup_file.contains("1 Main St"));
    assert!(!lookup_file.contains("normalizedInput"));
}

#[test]
fn test_second_run_is_served_from_cache() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::default().with_cache_dir(dir.path());
    let civic = FakeCivic::new();
    let finance = FakeFinance::new();
    let ledger = Ledger::new(&civic, &finance, "2020");

    let mut first_stores = Stores::load(&config);
    let (first, _) = ledger.run("1 Main St", &candidates(), &mut first_stores).unwrap();
    drop(first_stores);

    // Fresh stores reloaded from disk, as a new process would
    let mut second_stores = Stores::load(&config);
    let (second, summary) = ledger.run("1 main st", &candidates(), &mut second_stores).unwrap();

    assert_eq!(civic.calls.get(), 1);
    assert_eq!(finance.contributor_calls.get(), 1);
    assert_eq!(finance.industry_calls.get(), 1);
    assert_eq!(summary.finance.cache_hits, 2);
    assert_eq!(summary.finance.fetched, 0);
    assert_eq!(first, second);
}

#[test]
fn test_lookup_failure_halts_run() {
    let civic = FakeCivic { calls: Cell::new(0), fail: true };
    let finance = FakeFinance::new();
    let ledger = Ledger::new(&civic, &finance, "2020");
    let mut stores = Stores::in_memory();

    let result = ledger.run("nowhere", &candidates(), &mut stores);

    assert!(matches!(result, Err(LedgerError::LookupUnavailable(_))));
    assert_eq!(finance.contributor_calls.get(), 0);
}

#[test]
fn test_output_document_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let civic = FakeCivic::new();
    let finance = FakeFinance::new();
    let ledger = Ledger::new(&civic, &finance, "2020");
    let mut stores = Stores::in_memory();

    let (tree, _) = ledger.run("1 Main St", &candidates(), &mut stores).unwrap();

    let path = dir.path().join("RepTree.json");
    write_tree(&path, &tree).unwrap();

    let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let keys: Vec<&String> = raw.as_object().unwrap().keys().collect();
    assert_eq!(keys.len(), 3);
    assert_eq!(raw["federal"][1]["candidate_id"], json!("S001"));
    assert_eq!(raw["state"][0]["address"], json!("207 State House Springfield IL 62706"));
    assert_eq!(raw["state"][0]["phone"], json!("Not available"));

    let back = read_tree(&path).unwrap();
    assert_eq!(back.federal, tree.federal);
    assert_eq!(back.state, tree.state);
    assert_eq!(back.local, tree.local);
}
