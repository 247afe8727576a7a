//! Pluggable cryptographic backend.
//!
//! Callers supply a fixed set of oracles this crate treats as
//! external: a CSPRNG, SHA-1, AES-CFB encrypt/decrypt, and a handful
//! of big-integer operations, all as trait methods on `Backend`. A
//! `DefaultBackend` is provided, built from the usual RustCrypto
//! family of pure-Rust crates.

use num_bigint_dig::{BigUint, RandBigInt};
use rand::RngCore;
use sha1collisiondetection::Sha1CD;

use crate::types::HashAlgorithm;
use crate::{Error, Result};

/// The set of cryptographic primitives this crate treats as external
/// oracles rather than implementing itself.
///
/// Implementations are expected to be thread-safe: callers may invoke
/// these methods from multiple threads concurrently.
pub trait Backend {
    /// Fills and returns `n` cryptographically random octets.
    fn rand_bytes(&self, n: usize) -> Result<Vec<u8>>;

    /// Returns the 20-octet SHA-1 digest of `data`.
    fn sha1(&self, data: &[u8]) -> [u8; 20];

    /// Encrypts `data` in place under AES-CFB with the given `key`
    /// and 16-octet `iv`. `key` must be 16, 24, or 32 octets. No
    /// resync: the CFB shift register runs continuously across the
    /// whole buffer, matching the behavior IPDP requires.
    /// Length-preserving.
    fn aes_cfb_encrypt(&self, key: &[u8], iv: &[u8; 16], data: &[u8]) -> Result<Vec<u8>>;

    /// The matching decrypt operation for [`Backend::aes_cfb_encrypt`].
    fn aes_cfb_decrypt(&self, key: &[u8], iv: &[u8; 16], data: &[u8]) -> Result<Vec<u8>>;

    /// Computes `base^exp mod modulus`.
    fn modpow(&self, base: &[u8], exp: &[u8], modulus: &[u8]) -> Vec<u8>;

    /// Computes `(a * b) mod modulus`.
    fn mulmod(&self, a: &[u8], b: &[u8], modulus: &[u8]) -> Vec<u8>;

    /// The byte length of `modulus`, i.e. `ceil(bits(modulus) / 8)`.
    fn byte_length(&self, modulus: &[u8]) -> usize;

    /// A uniformly random integer `x` with `2 <= x < upper`, encoded
    /// big-endian with no leading zero octets (besides representing
    /// zero itself, which cannot occur given the `2 <=` bound).
    fn random_in_range(&self, upper: &[u8]) -> Result<Vec<u8>>;

    /// Hashes `data` with the hash algorithm named by `algo`, for S2K
    /// derivation. The default implementation supports SHA-1
    /// only and reports every other id as `Error::Unsupported`, since
    /// SHA-1 is the only hash algorithm this crate's `DefaultBackend`
    /// wires up; a caller-supplied backend may support more.
    fn hash(&self, algo: HashAlgorithm, data: &[u8]) -> Result<Vec<u8>> {
        match algo {
            HashAlgorithm::SHA1 => Ok(self.sha1(data).to_vec()),
            other => Err(Error::Unsupported(format!(
                "hash algorithm {} not implemented by this backend",
                other
            ))),
        }
    }
}

/// The default, pure-Rust [`Backend`] implementation.
///
/// Built from the RustCrypto family: `aes` + `cfb-mode` + `cipher`
/// for the symmetric cipher, `sha1collisiondetection` for the hash
/// (SHA-1 with the SHAttered collision-detection counter-measure), and
/// `num-bigint-dig` + `rand` for the big-integer and RNG oracles.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultBackend;

impl Backend for DefaultBackend {
    fn rand_bytes(&self, n: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; n];
        rand::rngs::OsRng.fill_bytes(&mut buf);
        Ok(buf)
    }

    fn sha1(&self, data: &[u8]) -> [u8; 20] {
        let mut ctx = Sha1CD::default();
        use sha1collisiondetection::digest::Digest;
        ctx.update(data);
        let digest = ctx.finalize();
        let mut out = [0u8; 20];
        out.copy_from_slice(&digest[..20]);
        out
    }

    fn aes_cfb_encrypt(&self, key: &[u8], iv: &[u8; 16], data: &[u8]) -> Result<Vec<u8>> {
        aes_cfb(key, iv, data, true)
    }

    fn aes_cfb_decrypt(&self, key: &[u8], iv: &[u8; 16], data: &[u8]) -> Result<Vec<u8>> {
        aes_cfb(key, iv, data, false)
    }

    fn modpow(&self, base: &[u8], exp: &[u8], modulus: &[u8]) -> Vec<u8> {
        let base = BigUint::from_bytes_be(base);
        let exp = BigUint::from_bytes_be(exp);
        let modulus = BigUint::from_bytes_be(modulus);
        base.modpow(&exp, &modulus).to_bytes_be()
    }

    fn mulmod(&self, a: &[u8], b: &[u8], modulus: &[u8]) -> Vec<u8> {
        let a = BigUint::from_bytes_be(a);
        let b = BigUint::from_bytes_be(b);
        let modulus = BigUint::from_bytes_be(modulus);
        ((a * b) % modulus).to_bytes_be()
    }

    fn byte_length(&self, modulus: &[u8]) -> usize {
        let n = BigUint::from_bytes_be(modulus);
        (n.bits() as usize + 7) / 8
    }

    fn random_in_range(&self, upper: &[u8]) -> Result<Vec<u8>> {
        let upper = BigUint::from_bytes_be(upper);
        if upper <= BigUint::from(2u8) {
            return Err(Error::InvalidArgument(
                "random_in_range: upper bound must exceed 2".into(),
            ));
        }
        let mut rng = rand::thread_rng();
        let low = BigUint::from(2u8);
        let x = rng.gen_biguint_range(&low, &upper);
        Ok(x.to_bytes_be())
    }
}

fn aes_cfb(key: &[u8], iv: &[u8; 16], data: &[u8], encrypt: bool) -> Result<Vec<u8>> {
    use aes::cipher::KeyIvInit;
    use cfb_mode::cipher::AsyncStreamCipher;
    use cfb_mode::{Decryptor, Encryptor};

    match key.len() {
        16 => {
            let mut buf = data.to_vec();
            if encrypt {
                Encryptor::<aes::Aes128>::new(key.into(), iv.into()).encrypt(&mut buf);
            } else {
                Decryptor::<aes::Aes128>::new(key.into(), iv.into()).decrypt(&mut buf);
            }
            Ok(buf)
        }
        24 => {
            let mut buf = data.to_vec();
            if encrypt {
                Encryptor::<aes::Aes192>::new(key.into(), iv.into()).encrypt(&mut buf);
            } else {
                Decryptor::<aes::Aes192>::new(key.into(), iv.into()).decrypt(&mut buf);
            }
            Ok(buf)
        }
        32 => {
            let mut buf = data.to_vec();
            if encrypt {
                Encryptor::<aes::Aes256>::new(key.into(), iv.into()).encrypt(&mut buf);
            } else {
                Decryptor::<aes::Aes256>::new(key.into(), iv.into()).decrypt(&mut buf);
            }
            Ok(buf)
        }
        n => Err(Error::InvalidArgument(format!(
            "aes_cfb: unsupported key length {} (expected 16, 24, or 32)",
            n
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_aes128_cfb() {
        let backend = DefaultBackend;
        let key = [0x11u8; 16];
        let iv = [0u8; 16];
        let pt = b"hello integrity protected data packet world!!!!";
        let ct = backend.aes_cfb_encrypt(&key, &iv, pt).unwrap();
        assert_ne!(ct, pt);
        let back = backend.aes_cfb_decrypt(&key, &iv, &ct).unwrap();
        assert_eq!(back, pt);
    }

    #[test]
    fn sha1_known_vector() {
        let backend = DefaultBackend;
        let digest = backend.sha1(b"abc");
        assert_eq!(
            digest,
            [
                0xa9, 0x99, 0x3e, 0x36, 0x47, 0x06, 0x81, 0x6a, 0xba, 0x3e, 0x25, 0x71, 0x78,
                0x50, 0xc2, 0x6c, 0x9c, 0xd0, 0xd8, 0x9d
            ]
        );
    }

    #[test]
    fn modpow_small() {
        let backend = DefaultBackend;
        // 4^13 mod 497 = 445.
        let modulus = 497u32.to_be_bytes();
        let modulus = &modulus[2..];
        assert_eq!(
            num_bigint_dig::BigUint::from_bytes_be(&backend.modpow(&[4], &[13], modulus)),
            num_bigint_dig::BigUint::from(445u32)
        );
    }

    #[test]
    fn random_in_range_respects_bounds() {
        let backend = DefaultBackend;
        let upper = [0x10u8]; // 16
        for _ in 0..32 {
            let x = backend.random_in_range(&upper).unwrap();
            let v = num_bigint_dig::BigUint::from_bytes_be(&x);
            assert!(v >= num_bigint_dig::BigUint::from(2u8));
            assert!(v < num_bigint_dig::BigUint::from(16u8));
        }
    }
}
