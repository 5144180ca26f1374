// 🪪 Candidate Table - rows of the campaign-finance identifier dataset
//
// Row layout: candidate_id, "Surname, Given Middle", party_code, ...
// The first row is a header and is never treated as a candidate.

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
    /// Candidate identifier used by the finance service
    pub id: String,

    /// Raw name, surname first: "Smith, John Q"
    pub name: String,

    /// Party code ("D", "R", ...); empty when the row has none
    pub party: String,

    /// Any columns after the party code, untouched
    pub extra: Vec<String>,
}

impl CandidateRecord {
    pub fn new(id: &str, name: &str, party: &str) -> Self {
        CandidateRecord {
            id: id.to_string(),
            name: name.to_string(),
            party: party.to_string(),
            extra: Vec::new(),
        }
    }
}

/// Ordered candidate rows, header excluded. Loaded once per run.
#[derive(Debug, Clone, Default)]
pub struct CandidateTable {
    records: Vec<CandidateRecord>,
}

impl CandidateTable {
    pub fn from_records(records: Vec<CandidateRecord>) -> Self {
        CandidateTable { records }
    }

    pub fn load_csv(csv_path: &Path) -> Result<Self> {
        let file = std::fs::File::open(csv_path)
            .with_context(|| format!("Failed to open candidate table {}", csv_path.display()))?;
        let table = Self::from_reader(file)?;
        info!(
            "Loaded {} candidate records from {}",
            table.len(),
            csv_path.display()
        );
        Ok(table)
    }

    /// Parse CSV from any reader. The header row is skipped; rows without
    /// at least an id and a name are skipped with a warning.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let mut records = Vec::new();

        for (index, result) in rdr.records().enumerate() {
            let row = result.context("Failed to read candidate row")?;
            // +2: one for the header, one for 1-based line numbers
            let line = index + 2;

            let id = row.get(0).map(str::trim).unwrap_or("");
            let name = row.get(1).unwrap_or("");
            if id.is_empty() || name.trim().is_empty() {
                warn!("Skipping candidate row {} without id or name", line);
                continue;
            }

            records.push(CandidateRecord {
                id: id.to_string(),
                name: name.to_string(),
                party: row.get(2).map(str::trim).unwrap_or("").to_string(),
                extra: row.iter().skip(3).map(str::to_string).collect(),
            });
        }

        Ok(CandidateTable { records })
    }

    pub fn records(&self) -> &[CandidateRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
CID,CRPName,Party,Office
N00007360,\"Pelosi, Nancy\",D,CA12
N00003535,\"Brown, Sherrod\",D,OHS1
N00030612,\"Smith, Adam\",D,WA09,extra-col
";

    #[test]
    fn test_header_row_is_skipped() {
        let table = CandidateTable::from_reader(SAMPLE.as_bytes()).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.records()[0].id, "N00007360");
        assert!(table.records().iter().all(|r| r.id != "CID"));
    }

    #[test]
    fn test_row_fields_and_order() {
        let table = CandidateTable::from_reader(SAMPLE.as_bytes()).unwrap();
        let smith = &table.records()[2];

        assert_eq!(smith.name, "Smith, Adam");
        assert_eq!(smith.party, "D");
        assert_eq!(smith.extra, vec!["WA09".to_string(), "extra-col".to_string()]);
    }

    #[test]
    fn test_short_rows() {
        let csv = "CID,CRPName,Party\nS001,\"Smith, John\"\n,\"Nobody, Here\",R\nS002\n";
        let table = CandidateTable::from_reader(csv.as_bytes()).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.records()[0].id, "S001");
        assert_eq!(table.records()[0].party, "");
    }

    #[test]
    fn test_load_csv_missing_file() {
        let result = CandidateTable::load_csv(Path::new("/definitely/not/here.csv"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("candidate table"));
    }

    #[test]
    fn test_load_csv_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("os_congress.csv");
        std::fs::write(&path, SAMPLE).unwrap();

        let table = CandidateTable::load_csv(&path).unwrap();
        assert_eq!(table.len(), 3);
    }
}
