// Entity Models
//
// - Official: raw elected-position record from the address lookup
// - CandidateRecord / CandidateTable: rows of the finance identifier dataset
// - Representative: an Official, plain or paired with a candidate id

pub mod official;
pub mod candidate;
pub mod representative;

pub use official::{ContactField, Level, Official, Party, UNAVAILABLE};
pub use candidate::{CandidateRecord, CandidateTable};
pub use representative::{Representative, TrackedOfficial, CONTRIBUTOR_NOTICE};
