// 🔗 Pipeline - address → tree → resolved → augmented → JSON document
//
// Strictly sequential: one official at a time, in bucket order. Each cache
// store is owned here and handed to the component that needs it.

use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cache::{CacheCategory, CacheStore, JsonFileCache, MemoryCache};
use crate::config::AppConfig;
use crate::entities::CandidateTable;
use crate::error::LedgerError;
use crate::finance::{AugmentSummary, FinanceAugmenter};
use crate::hierarchy::{PromotionSummary, RepresentativeTree};
use crate::resolver::Resolver;
use crate::sources::{lookup_officials, FinanceSource, OfficialsLookup};

// ============================================================================
// STORES
// ============================================================================

/// The three independent cache stores of a run
pub struct Stores {
    pub lookup: Box<dyn CacheStore>,
    pub contributors: Box<dyn CacheStore>,
    pub industries: Box<dyn CacheStore>,
}

impl Stores {
    /// Load all three from the configured cache directory
    pub fn load(config: &AppConfig) -> Self {
        let open = |category| -> Box<dyn CacheStore> {
            Box::new(JsonFileCache::load(category, &config.cache_path(category)))
        };

        Stores {
            lookup: open(CacheCategory::Lookup),
            contributors: open(CacheCategory::Contributor),
            industries: open(CacheCategory::Industry),
        }
    }

    /// Stores that never touch disk
    pub fn in_memory() -> Self {
        Stores {
            lookup: Box::new(MemoryCache::new(CacheCategory::Lookup)),
            contributors: Box::new(MemoryCache::new(CacheCategory::Contributor)),
            industries: Box::new(MemoryCache::new(CacheCategory::Industry)),
        }
    }
}

// ============================================================================
// LEDGER
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub classified: usize,
    pub unclassified: usize,
    pub promotion: PromotionSummary,
    pub finance: AugmentSummary,
}

pub struct Ledger<'a> {
    lookup: &'a dyn OfficialsLookup,
    finance: &'a dyn FinanceSource,
    fallback_cycle: String,
}

impl<'a> Ledger<'a> {
    pub fn new(lookup: &'a dyn OfficialsLookup, finance: &'a dyn FinanceSource, fallback_cycle: &str) -> Self {
        Ledger {
            lookup,
            finance,
            fallback_cycle: fallback_cycle.to_string(),
        }
    }

    /// Build the augmented tree for one address
    ///
    /// Only a failed address lookup is an error. Unmatched officials and
    /// failed finance fetches degrade to plain / unset fields.
    pub fn run(
        &self,
        address: &str,
        candidates: &CandidateTable,
        stores: &mut Stores,
    ) -> Result<(RepresentativeTree, RunSummary), LedgerError> {
        let response = lookup_officials(address, stores.lookup.as_mut(), self.lookup)?;

        let mut tree = RepresentativeTree::from_response(&response);

        let resolver = Resolver::new(candidates);
        let promotion = tree.promote_federal(&resolver);
        info!(
            "Federal officials: {} tracked, {} executive, {} unmatched",
            promotion.tracked, promotion.executive, promotion.unmatched
        );

        let augmenter = FinanceAugmenter::new(self.finance, &self.fallback_cycle);
        let finance = augmenter.augment_tree(
            &mut tree,
            stores.contributors.as_mut(),
            stores.industries.as_mut(),
        );

        let summary = RunSummary {
            classified: tree.len(),
            unclassified: tree.unclassified.len(),
            promotion,
            finance,
        };

        Ok((tree, summary))
    }
}

// ============================================================================
// OUTPUT DOCUMENT
// ============================================================================

/// Write the tree as pretty JSON (temp file + rename)
pub fn write_tree(path: &Path, tree: &RepresentativeTree) -> Result<()> {
    let encoded = serde_json::to_string_pretty(tree).context("Failed to encode representative tree")?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, encoded).with_context(|| format!("Failed to write {}", tmp.display()))?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e).with_context(|| format!("Failed to move output into {}", path.display()));
    }

    info!("Wrote representative tree to {}", path.display());
    Ok(())
}

pub fn read_tree(path: &Path) -> Result<RepresentativeTree> {
    let raw = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).context("Failed to parse representative tree")
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{ContactField, Level, Official, Party, Representative, TrackedOfficial};
    use crate::finance::FinanceLine;

    #[test]
    fn test_tree_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("RepTree.json");

        let senator = Official::new(
            "John Smith",
            Some(Party::new("Democratic Party", Some("D"))),
            "U.S. Senator",
            Some(Level::Federal),
        )
        .with_contact(
            ContactField::Listed("1 Capitol Way Washington DC 20510".into()),
            ContactField::Listed("(202) 555-0100".into()),
            ContactField::Unavailable,
        );
        let mut tracked = TrackedOfficial::new(senator, "S001").unwrap();
        tracked.contributors = Some(vec![FinanceLine::new("Acme", 100, 200).with_total(300)]);

        let tree = RepresentativeTree {
            federal: vec![
                Representative::Tracked(tracked),
                Representative::Plain(Official::new("Pat Chief", None, "President", Some(Level::Federal))),
            ],
            state: vec![Representative::Plain(Official::new(
                "Gil Gov",
                Some(Party::from_label("Republican Party")),
                "Governor",
                Some(Level::State),
            ))],
            local: vec![],
            unclassified: vec![],
        };

        write_tree(&path, &tree).unwrap();
        let back = read_tree(&path).unwrap();

        assert_eq!(back, tree);
        assert!(!dir.path().join("RepTree.json.tmp").exists());
    }

    #[test]
    fn test_failed_write_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // Target path is a non-empty directory, so the rename cannot succeed
        let path = dir.path().join("RepTree.json");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        let result = write_tree(&path, &RepresentativeTree::default());

        assert!(result.is_err());
        assert!(!dir.path().join("RepTree.json.tmp").exists());
    }

    #[test]
    fn test_read_tree_missing_file() {
        assert!(read_tree(Path::new("/no/such/RepTree.json")).is_err());
    }

    #[test]
    fn test_stores_load_from_cache_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("industry_cache.json"), r#"{"S001": []}"#).unwrap();
        let config = AppConfig::default().with_cache_dir(dir.path());

        let stores = Stores::load(&config);

        assert!(stores.lookup.is_empty());
        assert!(stores.contributors.is_empty());
        assert_eq!(stores.industries.len(), 1);
    }
}
