// Civic Ledger - Core Library
// Address → elected officials → candidate ids → campaign-finance breakdowns

pub mod error;
pub mod config;
pub mod cache;          // Cache Store - persisted key → value mapping per category
pub mod entities;       // Official, CandidateRecord, Representative
pub mod normalizer;     // Entity Normalizer - comparable name keys
pub mod resolver;       // Resolver - two-pass candidate matching
pub mod hierarchy;      // Representative Hierarchy - federal / state / local tree
pub mod finance;        // Finance Augmenter - contributor / industry breakdowns
pub mod sources;        // External collaborators (lookup, finance)
pub mod pipeline;       // End-to-end run + output document

// Re-export commonly used types
pub use error::{FetchError, LedgerError};
pub use config::{AppConfig, ConfigError};
pub use cache::{
    address_key, get_typed, CacheCategory, CacheStore, JsonFileCache, LoadOrigin, MemoryCache,
};
pub use entities::{
    CandidateRecord, CandidateTable, ContactField, Level, Official, Party, Representative,
    TrackedOfficial,
};
pub use normalizer::{normalize_candidate, normalize_official, CandidateName, OfficialName};
pub use resolver::{similarity_ratio, MatchPass, Resolution, Resolver, FUZZY_THRESHOLD};
pub use hierarchy::{LookupResponse, Office, PromotionSummary, RepresentativeTree};
pub use finance::{
    parse_finance_payload, AugmentSummary, FinanceAugmenter, FinanceKind, FinanceLine,
    FinanceOutcome,
};
pub use sources::{lookup_officials, FinanceSource, OfficialsLookup};
pub use pipeline::{read_tree, write_tree, Ledger, RunSummary, Stores};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
