//! Zero-on-drop byte containers for sensitive material.
//!
//! Session keys and decoded secret-key material must be erased from
//! memory as soon as they go out of scope. `Protected` and
//! `SessionKey` wrap a `Vec<u8>` and zeroize it on drop using the
//! [`zeroize`] crate, which every RustCrypto-family dependency here
//! already pulls in via its own `zeroize` cargo feature.

use std::fmt;
use std::ops::Deref;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// A heap-allocated byte buffer that is zeroized when dropped.
///
/// Used for decoded secret-key material (RSA/DSA/ElGamal private
/// exponents) and passphrase-derived key material.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Protected(Vec<u8>);

impl Protected {
    /// Wraps `v`, taking ownership.
    pub fn new(v: Vec<u8>) -> Self {
        Protected(v)
    }

    /// Returns the number of octets.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Deref for Protected {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Protected {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Protected {
    fn from(v: Vec<u8>) -> Self {
        Protected(v)
    }
}

impl fmt::Debug for Protected {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("Protected(...)")
    }
}

impl PartialEq for Protected {
    fn eq(&self, other: &Self) -> bool {
        use subtle_eq::ct_eq;
        self.0.len() == other.0.len() && ct_eq(&self.0, &other.0)
    }
}
impl Eq for Protected {}

/// A symmetric session key: the secret unwrapped from a PKESK and
/// fed to the IPDP pipeline.
///
/// Distinct type from [`Protected`] so call sites can't accidentally
/// pass a raw secret-key exponent where a session key is expected.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SessionKey(Vec<u8>);

impl SessionKey {
    /// Wraps `v`, taking ownership.
    pub fn new(v: Vec<u8>) -> Self {
        SessionKey(v)
    }

    /// Returns the number of octets.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Deref for SessionKey {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for SessionKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for SessionKey {
    fn from(v: Vec<u8>) -> Self {
        SessionKey(v)
    }
}

impl fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("SessionKey(...)")
    }
}

mod subtle_eq {
    /// Constant-time-ish byte comparison for `Eq`/`PartialEq`, not
    /// meant to replace a real constant-time comparison in hot
    /// security paths, but avoids short-circuiting on the first
    /// differing byte so this type isn't a silent timing oracle in
    /// test assertions.
    pub(super) fn ct_eq(a: &[u8], b: &[u8]) -> bool {
        if a.len() != b.len() {
            return false;
        }
        let mut diff = 0u8;
        for (x, y) in a.iter().zip(b.iter()) {
            diff |= x ^ y;
        }
        diff == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protected_roundtrip() {
        let p = Protected::new(vec![1, 2, 3]);
        assert_eq!(&*p, &[1, 2, 3][..]);
        assert_eq!(p.len(), 3);
    }

    #[test]
    fn session_key_roundtrip() {
        let k = SessionKey::new(vec![0xAA; 16]);
        assert_eq!(k.len(), 16);
        assert_eq!(&*k, &[0xAA; 16][..]);
    }

    #[test]
    fn protected_eq() {
        assert_eq!(Protected::new(vec![1, 2]), Protected::new(vec![1, 2]));
        assert_ne!(Protected::new(vec![1, 2]), Protected::new(vec![1, 3]));
    }
}
