use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use super::{PASSWORD_LIMIT, PREHASH_LEN};

/// Returns the SHA-256 digest of `password`.
///
/// Passwords longer than [`PASSWORD_LIMIT`] are replaced by this digest before
/// they reach bcrypt, so bytes past the limit still count. Exposed for callers
/// that need to reproduce the transform themselves, e.g. migration tooling.
pub fn prehash(password: &[u8]) -> [u8; PREHASH_LEN] {
    Sha256::digest(password).into()
}

/// Reports whether `password` is too long to be fed to bcrypt as is.
pub(crate) fn needs_prehash(password: &[u8]) -> bool {
    password.len() > PASSWORD_LIMIT
}

/// Runs `f` with the bytes bcrypt should actually see for `password`.
///
/// Generation and verification both go through here so the threshold can
/// never differ between the two paths. The digest is wiped once `f` returns.
pub(crate) fn with_prepared<T>(password: &[u8], f: impl FnOnce(&[u8]) -> T) -> T {
    if needs_prehash(password) {
        let digest = Zeroizing::new(prehash(password));
        f(digest.as_slice())
    } else {
        f(password)
    }
}
