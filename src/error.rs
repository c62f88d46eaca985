//! Error type for hashing operations.
//!
//! Verification failures are reported as a single variant whatever the cause,
//! so callers cannot learn whether the password or the hash was at fault.

use thiserror::Error;

use crate::crypto::{MAX_COST, MIN_COST};

#[derive(Debug, Error)]
pub enum Error {
    #[error("cost {0} is below minimum allowed cost {min}", min = MIN_COST)]
    CostTooLow(u32),

    #[error("cost {0} exceeds maximum allowed cost {max}", max = MAX_COST)]
    CostTooHigh(u32),

    #[error("hash must not be empty")]
    HashEmpty,

    #[error("failed to generate hash")]
    GenerateFailed(#[source] bcrypt::BcryptError),

    #[error("password comparison failed")]
    CompareFailed,

    #[error("invalid hash: {0}")]
    InvalidHash(String),
}

pub type Result<T> = std::result::Result<T, Error>;
