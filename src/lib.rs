//! Hardened bcrypt password hashing.
//!
//! A thin layer over the [`bcrypt`] crate that
//!
//! - refuses costs outside [`MIN_COST`]..=[`MAX_COST`],
//! - pre-hashes passwords longer than [`PASSWORD_LIMIT`] bytes with SHA-256 so
//!   bcrypt never silently truncates them,
//! - reports every failed verification the same way,
//! - tells callers when a stored hash should be regenerated at a higher cost.
//!
//! Hashes are bcrypt's standard `$2b$<cost>$<salt+digest>` strings.
//!
//! ```no_run
//! let hash = bcrypt_guard::generate(b"password123", 12)?;
//! bcrypt_guard::compare(&hash, b"password123")?;
//! assert_eq!(bcrypt_guard::cost(&hash)?, 12);
//! assert!(bcrypt_guard::needs_rehash(&hash, 13));
//! # Ok::<(), bcrypt_guard::Error>(())
//! ```
//!
//! Pre-hashing is one convention applied to every candidate password: a hash
//! produced by plain bcrypt from a password longer than [`PASSWORD_LIMIT`]
//! will not verify here.

mod crypto;
mod error;

pub use crate::crypto::{
    ALGORITHM_MIN_COST, Cost, DEFAULT_COST, MAX_COST, MIN_COST, PASSWORD_LIMIT, PREHASH_LEN,
    prehash, validate_cost,
};
pub use crate::error::{Error, Result};

use crate::crypto::{needs_prehash, with_prepared};
use bcrypt::HashParts;
use log::{debug, warn};

/// Hashes `password` with bcrypt at `cost`, using a fresh random salt.
///
/// # Errors
///
/// [`Error::CostTooLow`] or [`Error::CostTooHigh`] when `cost` is outside the
/// policy, before any hashing work is done. [`Error::GenerateFailed`] if bcrypt
/// itself fails.
pub fn generate(password: &[u8], cost: u32) -> Result<String> {
    let prehashed = needs_prehash(password);
    let cost = validate_cost(cost)?;

    debug!("generating bcrypt hash (cost {cost}, prehashed: {prehashed})");
    with_prepared(password, |input| bcrypt::hash(input, cost)).map_err(Error::GenerateFailed)
}

/// Checks `password` against a hash produced by [`generate`].
///
/// Wrong passwords, corrupted hashes and unsupported formats all yield
/// [`Error::CompareFailed`].
///
/// # Errors
///
/// [`Error::HashEmpty`] if `hash` is empty, [`Error::CompareFailed`] otherwise
/// on any mismatch.
pub fn compare(hash: impl AsRef<[u8]>, password: &[u8]) -> Result<()> {
    let hash = hash.as_ref();
    if hash.is_empty() {
        return Err(Error::HashEmpty);
    }

    let Ok(hash) = std::str::from_utf8(hash) else {
        return Err(Error::CompareFailed);
    };

    match with_prepared(password, |input| bcrypt::verify(input, hash)) {
        Ok(true) => Ok(()),
        _ => {
            debug!("bcrypt comparison rejected");
            Err(Error::CompareFailed)
        }
    }
}

/// Returns the cost recorded in `hash`.
///
/// # Errors
///
/// [`Error::InvalidHash`] if `hash` is not a well-formed bcrypt hash.
pub fn cost(hash: impl AsRef<[u8]>) -> Result<u32> {
    let hash = std::str::from_utf8(hash.as_ref())
        .map_err(|_| Error::InvalidHash("hash is not valid UTF-8".into()))?;

    let parts: HashParts = hash
        .parse()
        .map_err(|e: bcrypt::BcryptError| Error::InvalidHash(e.to_string()))?;

    let cost = parts.get_cost();
    if !(ALGORITHM_MIN_COST..=MAX_COST).contains(&cost) {
        return Err(Error::InvalidHash(format!("cost {cost} is out of range")));
    }
    Ok(cost)
}

/// Reports whether `hash` should be regenerated to reach `target_cost`.
///
/// Hashes that cannot be parsed are reported as needing a rehash.
pub fn needs_rehash(hash: impl AsRef<[u8]>, target_cost: u32) -> bool {
    match cost(hash) {
        Ok(current) => {
            let stale = current < target_cost;
            debug!("hash cost {current}, target {target_cost}, rehash: {stale}");
            stale
        }
        Err(e) => {
            warn!("treating unparseable hash as stale: {e}");
            true
        }
    }
}

/// Hashes and verifies passwords at a fixed target cost.
///
/// Meant for login paths: [`Hasher::verify_and_upgrade`] hands back a fresh
/// hash whenever the stored one is weaker than the target.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hasher {
    cost: Cost,
}

impl Hasher {
    pub fn new(cost: u32) -> Result<Self> {
        Ok(Self {
            cost: Cost::new(cost)?,
        })
    }

    pub fn cost(&self) -> Cost {
        self.cost
    }

    pub fn hash(&self, password: &[u8]) -> Result<String> {
        generate(password, self.cost.get())
    }

    pub fn verify(&self, hash: impl AsRef<[u8]>, password: &[u8]) -> Result<()> {
        compare(hash, password)
    }

    pub fn needs_rehash(&self, hash: impl AsRef<[u8]>) -> bool {
        needs_rehash(hash, self.cost.get())
    }

    /// Verifies `password`, then rehashes it if `hash` is below the target cost.
    ///
    /// Returns `Ok(None)` when the stored hash is already good enough.
    pub fn verify_and_upgrade(
        &self,
        hash: impl AsRef<[u8]>,
        password: &[u8],
    ) -> Result<Option<String>> {
        let hash = hash.as_ref();
        self.verify(hash, password)?;

        if !self.needs_rehash(hash) {
            return Ok(None);
        }
        debug!("upgrading hash to cost {}", self.cost.get());
        self.hash(password).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_records_requested_cost() {
        let hash = generate(b"password123", MIN_COST).unwrap();

        assert!(hash.starts_with("$2b$12$"));
        assert_eq!(cost(&hash).unwrap(), MIN_COST);
    }

    #[test]
    fn generate_cost_too_low_fails() {
        let err = generate(b"password123", MIN_COST - 1).unwrap_err();
        assert!(matches!(err, Error::CostTooLow(11)));
    }

    #[test]
    fn generate_cost_too_high_fails() {
        let err = generate(b"password123", MAX_COST + 1).unwrap_err();
        assert!(matches!(err, Error::CostTooHigh(32)));
    }

    #[test]
    fn compare_match_and_mismatch() {
        let hash = generate(b"password123", 12).unwrap();

        assert_eq!(cost(&hash).unwrap(), 12);
        compare(&hash, b"password123").unwrap();
        assert!(matches!(
            compare(&hash, b"wrongpassword"),
            Err(Error::CompareFailed)
        ));
    }

    #[test]
    fn compare_empty_hash_fails_first() {
        assert!(matches!(compare(b"", b"password123"), Err(Error::HashEmpty)));
        assert!(matches!(compare("", &[b'a'; 200]), Err(Error::HashEmpty)));
    }

    #[test]
    fn compare_garbage_hash_is_a_plain_mismatch() {
        assert!(matches!(
            compare("not-a-bcrypt-hash", b"pw"),
            Err(Error::CompareFailed)
        ));
        assert!(matches!(
            compare([0xffu8, 0xfe, 0x00], b"pw"),
            Err(Error::CompareFailed)
        ));
    }

    #[test]
    fn empty_password_roundtrip() {
        let hash = generate(b"", MIN_COST).unwrap();
        compare(&hash, b"").unwrap();
        assert!(compare(&hash, b"x").is_err());
    }

    #[test]
    fn long_password_roundtrip() {
        let password = vec![b'a'; 100];
        let hash = generate(&password, MIN_COST).unwrap();

        compare(&hash, &password).unwrap();
        assert!(compare(&hash, &password[..99]).is_err());
    }

    #[test]
    fn passwords_differing_past_limit_do_not_cross_verify() {
        let at_limit = vec![b'a'; PASSWORD_LIMIT];
        let mut with_b = at_limit.clone();
        with_b.push(b'b');
        let mut with_c = at_limit.clone();
        with_c.push(b'c');

        let h_limit = generate(&at_limit, MIN_COST).unwrap();
        let h_b = generate(&with_b, MIN_COST).unwrap();

        compare(&h_limit, &at_limit).unwrap();
        compare(&h_b, &with_b).unwrap();
        assert!(compare(&h_limit, &with_b).is_err());
        assert!(compare(&h_b, &with_c).is_err());
        assert!(compare(&h_b, &at_limit).is_err());
    }

    #[test]
    fn plain_bcrypt_hash_verifies_for_short_passwords() {
        let hash = bcrypt::hash("short enough", 4).unwrap();
        compare(&hash, b"short enough").unwrap();
    }

    #[test]
    fn plain_bcrypt_hash_of_long_password_is_rejected() {
        // plain bcrypt only ever sees the first PASSWORD_LIMIT bytes
        let password = vec![b'z'; PASSWORD_LIMIT + 10];
        let hash = bcrypt::hash(&password[..PASSWORD_LIMIT], 4).unwrap();
        assert!(compare(&hash, &password).is_err());
    }

    #[test]
    fn prehashed_password_matches_manual_prehash() {
        let password = vec![b'q'; 150];
        let hash = generate(&password, MIN_COST).unwrap();
        let manual = bcrypt::verify(prehash(&password), &hash).unwrap();
        assert!(manual);
    }

    #[test]
    fn cost_of_invalid_hash_fails() {
        assert!(matches!(cost("invalid-hash"), Err(Error::InvalidHash(_))));
        assert!(matches!(cost(""), Err(Error::InvalidHash(_))));
        assert!(matches!(cost([0xffu8; 60]), Err(Error::InvalidHash(_))));
    }

    #[test]
    fn cost_of_bad_version_tag_fails() {
        let hash = generate(b"pw", MIN_COST).unwrap();
        let foreign = hash.replacen("$2b$", "$9z$", 1);
        assert!(matches!(cost(foreign), Err(Error::InvalidHash(_))));
    }

    #[test]
    fn cost_of_out_of_range_value_fails() {
        let hash = generate(b"pw", MIN_COST).unwrap();
        let tampered = hash.replacen("$12$", "$03$", 1);
        assert!(matches!(cost(tampered), Err(Error::InvalidHash(_))));

        let non_numeric = hash.replacen("$12$", "$xx$", 1);
        assert!(matches!(cost(non_numeric), Err(Error::InvalidHash(_))));
    }

    #[test]
    fn cost_reads_foreign_low_cost_hash() {
        let hash = bcrypt::hash("pw", 5).unwrap();
        assert_eq!(cost(&hash).unwrap(), 5);
        assert!(needs_rehash(&hash, MIN_COST));
    }

    #[test]
    fn needs_rehash_when_below_target() {
        let hash = generate(b"password123", MIN_COST).unwrap();
        assert!(needs_rehash(&hash, MIN_COST + 1));
    }

    #[test]
    fn needs_rehash_not_needed_at_or_above_target() {
        let hash = generate(b"password123", MIN_COST + 2).unwrap();
        assert!(!needs_rehash(&hash, MIN_COST + 2));
        assert!(!needs_rehash(&hash, MIN_COST + 1));
    }

    #[test]
    fn needs_rehash_fails_open() {
        assert!(needs_rehash("invalid", 14));
        assert!(needs_rehash(b"", 0));
        assert!(needs_rehash([0u8, 159, 146, 150], MIN_COST));
    }

    #[test]
    fn hasher_rejects_out_of_policy_cost() {
        assert!(matches!(Hasher::new(10), Err(Error::CostTooLow(10))));
        assert!(matches!(Hasher::new(32), Err(Error::CostTooHigh(32))));
        assert_eq!(Hasher::default().cost().get(), DEFAULT_COST);
    }

    #[test]
    fn hasher_upgrades_weak_hash() {
        let old = generate(b"pw", MIN_COST).unwrap();
        let hasher = Hasher::new(MIN_COST + 1).unwrap();

        let upgraded = hasher.verify_and_upgrade(&old, b"pw").unwrap().unwrap();
        assert_eq!(cost(&upgraded).unwrap(), MIN_COST + 1);
        hasher.verify(&upgraded, b"pw").unwrap();
        assert!(!hasher.needs_rehash(&upgraded));
    }

    #[test]
    fn hasher_keeps_current_hash() {
        let hasher = Hasher::new(MIN_COST).unwrap();
        let hash = hasher.hash(b"pw").unwrap();

        assert_eq!(hasher.verify_and_upgrade(&hash, b"pw").unwrap(), None);
    }

    #[test]
    fn hasher_does_not_upgrade_on_wrong_password() {
        let old = generate(b"pw", MIN_COST).unwrap();
        let hasher = Hasher::new(MIN_COST + 1).unwrap();

        assert!(matches!(
            hasher.verify_and_upgrade(&old, b"nope"),
            Err(Error::CompareFailed)
        ));
    }
}
