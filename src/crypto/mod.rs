//! Building blocks for the hashing policy.
//!
//! Provides the long-password pre-hash transform and the cost policy.

pub mod cost;
pub mod prehash;

pub use cost::{Cost, validate_cost};
pub use prehash::prehash;
pub(crate) use prehash::{needs_prehash, with_prepared};

/// Recommended cost for new hashes.
pub const DEFAULT_COST: u32 = 14;
/// Lowest cost accepted when generating a hash.
pub const MIN_COST: u32 = 12;
/// Highest cost accepted when generating a hash (bcrypt's own ceiling).
pub const MAX_COST: u32 = 31;
/// Lowest cost bcrypt itself can encode. Only used when parsing hashes.
pub const ALGORITHM_MIN_COST: u32 = 4;
/// Number of password bytes bcrypt reads; anything past this is ignored by the algorithm.
pub const PASSWORD_LIMIT: usize = 72;
/// Length of the pre-hash digest (32 bytes / SHA-256).
pub const PREHASH_LEN: usize = 32;
