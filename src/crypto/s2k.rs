//! S2K (string-to-key) specifier decode and key derivation
//! (RFC 4880 §3.7).

use crate::crypto::Backend;
use crate::types::HashAlgorithm;
use crate::{Error, Result};

/// A decoded S2K specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum S2K {
    /// Hash the passphrase directly.
    Simple {
        /// Hash algorithm to use.
        hash_algo: HashAlgorithm,
    },
    /// Hash `salt || passphrase`.
    Salted {
        /// Hash algorithm to use.
        hash_algo: HashAlgorithm,
        /// Eight octets of salt.
        salt: [u8; 8],
    },
    /// Hash `salt || passphrase`, repeated to `count` octets.
    IteratedSalted {
        /// Hash algorithm to use.
        hash_algo: HashAlgorithm,
        /// Eight octets of salt.
        salt: [u8; 8],
        /// Expanded iteration count, in octets of input fed to the
        /// hash (not a repetition count).
        count: u32,
    },
}

/// Expands an RFC 4880 octet-coded iteration count.
///
/// `(16 + (c & 15)) << ((c >> 4) + 6)`.
pub fn decode_count(c: u8) -> u32 {
    (16u32 + (c as u32 & 0x0F)) << ((c as u32 >> 4) + 6)
}

impl S2K {
    /// Decodes an S2K specifier from the front of `buf`, returning
    /// the value and the remaining bytes.
    pub fn decode(buf: &[u8]) -> Result<(S2K, &[u8])> {
        let (&kind, buf) = buf
            .split_first()
            .ok_or_else(|| Error::Malformed("S2K: truncated, missing type octet".into()))?;
        let (&algo_octet, buf) = buf
            .split_first()
            .ok_or_else(|| Error::Malformed("S2K: truncated, missing hash algorithm octet".into()))?;
        let hash_algo = HashAlgorithm::from(algo_octet);

        match kind {
            0 => Ok((S2K::Simple { hash_algo }, buf)),
            1 => {
                if buf.len() < 8 {
                    return Err(Error::Malformed("S2K: truncated salt".into()));
                }
                let mut salt = [0u8; 8];
                salt.copy_from_slice(&buf[..8]);
                Ok((S2K::Salted { hash_algo, salt }, &buf[8..]))
            }
            3 => {
                if buf.len() < 9 {
                    return Err(Error::Malformed("S2K: truncated salt/count".into()));
                }
                let mut salt = [0u8; 8];
                salt.copy_from_slice(&buf[..8]);
                let count = decode_count(buf[8]);
                Ok((S2K::IteratedSalted { hash_algo, salt, count }, &buf[9..]))
            }
            other => Err(Error::Malformed(format!("S2K: unknown type {}", other))),
        }
    }

    /// The hash algorithm this specifier uses.
    pub fn hash_algo(&self) -> HashAlgorithm {
        match self {
            S2K::Simple { hash_algo }
            | S2K::Salted { hash_algo, .. }
            | S2K::IteratedSalted { hash_algo, .. } => *hash_algo,
        }
    }

    /// Derives `key_len` octets of key material from `passphrase`.
    ///
    /// Concatenates as many parallel hash contexts as needed (each
    /// context `i` is primed with `i` leading zero octets per RFC
    /// 4880 §3.7.1.1), truncating the concatenation to `key_len`.
    pub fn derive(
        &self,
        backend: &dyn Backend,
        passphrase: &[u8],
        key_len: usize,
    ) -> Result<Vec<u8>> {
        let digest_size = self.hash_algo().digest_size().ok_or_else(|| {
            Error::Unsupported(format!(
                "hash algorithm {} has no known digest size",
                self.hash_algo()
            ))
        })?;
        if key_len == 0 {
            return Ok(Vec::new());
        }
        let contexts_needed = (key_len + digest_size - 1) / digest_size;

        let mut out = Vec::with_capacity(contexts_needed * digest_size);
        for i in 0..contexts_needed {
            let mut input = vec![0u8; i];
            input.extend(self.hash_input(passphrase));
            let digest = backend.hash(self.hash_algo(), &input)?;
            out.extend_from_slice(&digest);
        }
        out.truncate(key_len);
        Ok(out)
    }

    /// Builds the bytes fed to the hash for a single (unprefixed)
    /// context, applying the iterated-salted repeat/truncate rule
    /// when applicable.
    fn hash_input(&self, passphrase: &[u8]) -> Vec<u8> {
        match self {
            S2K::Simple { .. } => passphrase.to_vec(),
            S2K::Salted { salt, .. } => {
                let mut v = salt.to_vec();
                v.extend_from_slice(passphrase);
                v
            }
            S2K::IteratedSalted { salt, count, .. } => {
                let mut seed = salt.to_vec();
                seed.extend_from_slice(passphrase);
                let count = (*count as usize).max(seed.len());
                let mut input = Vec::with_capacity(count);
                while input.len() < count {
                    let take = (count - input.len()).min(seed.len());
                    input.extend_from_slice(&seed[..take]);
                }
                input
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::DefaultBackend;

    #[test]
    fn count_expansion_matches_formula() {
        // c = 0 -> (16 + 0) << 6 = 1024.
        assert_eq!(decode_count(0), 1024);
        // c = 0xFF -> (16 + 15) << (15 + 6) = 31 << 21.
        assert_eq!(decode_count(0xFF), 31u32 << 21);
    }

    #[test]
    fn simple_decode() {
        let buf = [0x00, 0x02]; // Simple, SHA1
        let (s2k, rest) = S2K::decode(&buf).unwrap();
        assert_eq!(s2k, S2K::Simple { hash_algo: HashAlgorithm::SHA1 });
        assert!(rest.is_empty());
    }

    #[test]
    fn salted_decode() {
        let mut buf = vec![0x01, 0x02];
        buf.extend_from_slice(&[0xAA; 8]);
        let (s2k, rest) = S2K::decode(&buf).unwrap();
        assert_eq!(
            s2k,
            S2K::Salted { hash_algo: HashAlgorithm::SHA1, salt: [0xAA; 8] }
        );
        assert!(rest.is_empty());
    }

    #[test]
    fn iterated_salted_decode() {
        let mut buf = vec![0x03, 0x02];
        buf.extend_from_slice(&[0xBB; 8]);
        buf.push(0x10); // c
        let (s2k, rest) = S2K::decode(&buf).unwrap();
        match s2k {
            S2K::IteratedSalted { hash_algo, salt, count } => {
                assert_eq!(hash_algo, HashAlgorithm::SHA1);
                assert_eq!(salt, [0xBB; 8]);
                assert_eq!(count, decode_count(0x10));
            }
            _ => panic!("wrong variant"),
        }
        assert!(rest.is_empty());
    }

    #[test]
    fn simple_derive_is_direct_hash() {
        let backend = DefaultBackend;
        let s2k = S2K::Simple { hash_algo: HashAlgorithm::SHA1 };
        let key = s2k.derive(&backend, b"passphrase", 20).unwrap();
        assert_eq!(key, backend.sha1(b"passphrase").to_vec());
    }

    #[test]
    fn derive_truncates_to_requested_length() {
        let backend = DefaultBackend;
        let s2k = S2K::Simple { hash_algo: HashAlgorithm::SHA1 };
        let key = s2k.derive(&backend, b"passphrase", 8).unwrap();
        assert_eq!(key.len(), 8);
        assert_eq!(&key[..], &backend.sha1(b"passphrase")[..8]);
    }

    #[test]
    fn derive_wider_than_digest_uses_multiple_contexts() {
        let backend = DefaultBackend;
        let s2k = S2K::Simple { hash_algo: HashAlgorithm::SHA1 };
        let key = s2k.derive(&backend, b"passphrase", 32).unwrap();
        assert_eq!(key.len(), 32);
        // second context is primed with one leading zero octet.
        let mut second_input = vec![0u8];
        second_input.extend_from_slice(b"passphrase");
        assert_eq!(&key[20..], &backend.sha1(&second_input)[..12]);
    }

    #[test]
    fn iterated_minimum_is_salt_plus_passphrase_len() {
        let s2k = S2K::IteratedSalted {
            hash_algo: HashAlgorithm::SHA1,
            salt: [1u8; 8],
            count: 1, // far below 8 + passphrase length
        };
        let input = s2k.hash_input(b"pw");
        assert_eq!(input.len(), 10);
    }
}
