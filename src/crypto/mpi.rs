//! Multiprecision integers and the public-key/secret-key material
//! types built from them.
//!
//! `PublicKey`, `SecretKeyMaterial`, and `Ciphertext` are narrowed to
//! the three algorithms this crate implements (RSA, DSA, ElGamal);
//! EdDSA/ECDSA/ECDH variants and curve-point decoding are out of
//! scope, and there is no `Signature` type since signature
//! verification isn't implemented.

use std::fmt;

use crate::crypto::mem::Protected;
use crate::types::PublicKeyAlgorithm;
use crate::{Error, Result};

/// A single multiprecision integer: a two-octet bit-length prefix
/// followed by a big-endian magnitude with no extra leading zero
/// octets (RFC 4880 §3.2).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct MPI {
    value: Box<[u8]>,
}

impl fmt::Debug for MPI {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MPI {{ {} bits }}", self.bits())
    }
}

impl From<Vec<u8>> for MPI {
    fn from(v: Vec<u8>) -> Self {
        Self::new(&v)
    }
}

impl MPI {
    /// Creates a new MPI, stripping any leading all-zero octets and
    /// leading zero bits so that `bits()` returns the position of the
    /// highest set bit.
    pub fn new(value: &[u8]) -> Self {
        let mut leading_zero_bytes = 0;
        for &b in value {
            if b != 0 {
                break;
            }
            leading_zero_bytes += 1;
        }
        let value = Vec::from(&value[leading_zero_bytes..]).into_boxed_slice();
        MPI { value }
    }

    /// The bit length: the position of the most significant 1-bit,
    /// counting from 1. Zero for an all-zero (empty) value.
    pub fn bits(&self) -> usize {
        match self.value.first() {
            None => 0,
            Some(&first) => self.value.len() * 8 - first.leading_zeros() as usize,
        }
    }

    /// The raw big-endian magnitude, without the bit-length prefix.
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Decodes one MPI from the front of `buf`, returning the value
    /// and the remaining, unconsumed bytes (I1).
    ///
    /// # Errors
    ///
    /// `Error::Malformed` if `buf` has fewer than two octets or is
    /// shorter than the declared length; if the leading octet of the
    /// magnitude has a bit set above the declared bit position within
    /// that octet.
    pub fn decode(buf: &[u8]) -> Result<(MPI, &[u8])> {
        if buf.len() < 2 {
            return Err(Error::Malformed("MPI: truncated length prefix".into()));
        }
        let bits = u16::from_be_bytes([buf[0], buf[1]]) as usize;
        let byte_len = (bits + 7) / 8;
        let rest = &buf[2..];
        if rest.len() < byte_len {
            return Err(Error::Malformed(format!(
                "MPI: declared {} octets but only {} remain",
                byte_len,
                rest.len()
            )));
        }
        let (magnitude, rest) = rest.split_at(byte_len);
        if byte_len > 0 {
            let used_bits_in_top_octet = bits - (byte_len - 1) * 8;
            if used_bits_in_top_octet < 8 {
                let mask = 0xFFu8 << used_bits_in_top_octet;
                if magnitude[0] & mask != 0 {
                    return Err(Error::Malformed(
                        "MPI: leading octet has bits set above declared length".into(),
                    ));
                }
            }
        }
        Ok((MPI { value: magnitude.into() }, rest))
    }

    /// Encodes this MPI as `u16(bits) || magnitude`, written to `out`.
    ///
    /// # Errors
    ///
    /// `Error::InvalidArgument` if the magnitude is longer than 65535
    /// octets (the maximum representable bit length).
    pub fn encode(&self, out: &mut Vec<u8>) -> Result<()> {
        if self.value.len() > u16::MAX as usize / 8 + 1 {
            return Err(Error::InvalidArgument(
                "MPI: magnitude exceeds 65535 octets".into(),
            ));
        }
        out.extend_from_slice(&(self.bits() as u16).to_be_bytes());
        out.extend_from_slice(&self.value);
        Ok(())
    }

    /// Convenience wrapper around [`MPI::encode`] returning a fresh
    /// `Vec<u8>`.
    pub fn to_vec(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.encode(&mut out)?;
        Ok(out)
    }
}

/// An MPI whose magnitude is sensitive (secret-key material) and
/// must be zeroed on drop.
#[derive(Clone)]
pub struct ProtectedMPI {
    value: Protected,
}

impl From<MPI> for ProtectedMPI {
    fn from(mpi: MPI) -> Self {
        ProtectedMPI { value: Protected::new(mpi.value.into_vec()) }
    }
}

impl ProtectedMPI {
    /// The bit length, as in [`MPI::bits`].
    pub fn bits(&self) -> usize {
        match self.value.first() {
            None => 0,
            Some(&first) => self.value.len() * 8 - first.leading_zeros() as usize,
        }
    }

    /// The raw big-endian magnitude.
    pub fn value(&self) -> &[u8] {
        &self.value
    }
}

/// Public-key material, keyed by algorithm.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum PublicKey {
    /// RSA public key: modulus `n`, exponent `e`.
    RSA {
        /// Public exponent.
        e: MPI,
        /// Public modulus.
        n: MPI,
    },
    /// DSA public key.
    DSA {
        /// Prime of Zp group.
        p: MPI,
        /// Order of the subgroup.
        q: MPI,
        /// Generator of the subgroup.
        g: MPI,
        /// Public key value `y = g^x mod p`.
        y: MPI,
    },
    /// ElGamal public key.
    ElGamal {
        /// Prime of Zp group.
        p: MPI,
        /// Generator of Zp group.
        g: MPI,
        /// Public key value `y = g^x mod p`.
        y: MPI,
    },
    /// A public key with an algorithm this crate does not implement.
    Unknown {
        /// The MPIs that were read, for byte-faithful re-emission.
        mpis: Box<[MPI]>,
        /// Any trailing bytes that follow the MPIs.
        rest: Box<[u8]>,
    },
}

impl PublicKey {
    /// The algorithm this key material belongs to.
    pub fn algo(&self) -> PublicKeyAlgorithm {
        match self {
            PublicKey::RSA { .. } => PublicKeyAlgorithm::RSA,
            PublicKey::DSA { .. } => PublicKeyAlgorithm::DSA,
            PublicKey::ElGamal { .. } => PublicKeyAlgorithm::ElGamal,
            PublicKey::Unknown { .. } => PublicKeyAlgorithm::Unknown(0),
        }
    }

    /// Serializes the algorithm-specific MPI sequence (not including
    /// the leading algorithm octet, which belongs to the containing
    /// packet).
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        match self {
            PublicKey::RSA { e, n } => {
                n.encode(&mut out)?;
                e.encode(&mut out)?;
            }
            PublicKey::DSA { p, q, g, y } => {
                p.encode(&mut out)?;
                q.encode(&mut out)?;
                g.encode(&mut out)?;
                y.encode(&mut out)?;
            }
            PublicKey::ElGamal { p, g, y } => {
                p.encode(&mut out)?;
                g.encode(&mut out)?;
                y.encode(&mut out)?;
            }
            PublicKey::Unknown { mpis, rest } => {
                for mpi in mpis.iter() {
                    mpi.encode(&mut out)?;
                }
                out.extend_from_slice(rest);
            }
        }
        Ok(out)
    }

    /// Parses the algorithm-specific MPI sequence for `algo` from the
    /// front of `buf`, returning the value and any unconsumed bytes.
    pub fn parse<'a>(algo: PublicKeyAlgorithm, buf: &'a [u8]) -> Result<(PublicKey, &'a [u8])> {
        match algo {
            PublicKeyAlgorithm::RSA
            | PublicKeyAlgorithm::RSAEncrypt
            | PublicKeyAlgorithm::RSASign => {
                let (n, buf) = MPI::decode(buf)?;
                let (e, buf) = MPI::decode(buf)?;
                Ok((PublicKey::RSA { e, n }, buf))
            }
            PublicKeyAlgorithm::DSA => {
                let (p, buf) = MPI::decode(buf)?;
                let (q, buf) = MPI::decode(buf)?;
                let (g, buf) = MPI::decode(buf)?;
                let (y, buf) = MPI::decode(buf)?;
                Ok((PublicKey::DSA { p, q, g, y }, buf))
            }
            PublicKeyAlgorithm::ElGamal => {
                let (p, buf) = MPI::decode(buf)?;
                let (g, buf) = MPI::decode(buf)?;
                let (y, buf) = MPI::decode(buf)?;
                Ok((PublicKey::ElGamal { p, g, y }, buf))
            }
            _ => Ok((
                PublicKey::Unknown { mpis: Box::new([]), rest: buf.into() },
                &buf[buf.len()..],
            )),
        }
    }
}

/// Secret-key material, mirroring [`PublicKey`]'s algorithm split.
#[derive(Clone)]
#[non_exhaustive]
pub enum SecretKeyMaterial {
    /// RSA secret key.
    RSA {
        /// Secret exponent.
        d: ProtectedMPI,
        /// Smaller secret prime.
        p: ProtectedMPI,
        /// Larger secret prime.
        q: ProtectedMPI,
        /// Inverse of `p mod q`.
        u: ProtectedMPI,
    },
    /// DSA secret key.
    DSA {
        /// Secret key value.
        x: ProtectedMPI,
    },
    /// ElGamal secret key.
    ElGamal {
        /// Secret key value.
        x: ProtectedMPI,
    },
    /// Secret-key material for an algorithm this crate does not
    /// implement.
    Unknown {
        /// The raw, still-(possibly-)encrypted bytes.
        bytes: Protected,
    },
}

impl fmt::Debug for SecretKeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SecretKeyMaterial::RSA { .. } => f.write_str("SecretKeyMaterial::RSA(..)"),
            SecretKeyMaterial::DSA { .. } => f.write_str("SecretKeyMaterial::DSA(..)"),
            SecretKeyMaterial::ElGamal { .. } => f.write_str("SecretKeyMaterial::ElGamal(..)"),
            SecretKeyMaterial::Unknown { .. } => f.write_str("SecretKeyMaterial::Unknown(..)"),
        }
    }
}

impl SecretKeyMaterial {
    /// Serializes the algorithm-specific secret MPI sequence, without
    /// any trailing checksum or hash (callers append that, since its
    /// form depends on `s2k_usage`).
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        match self {
            SecretKeyMaterial::RSA { d, p, q, u } => {
                MPI::new(d.value()).encode(&mut out)?;
                MPI::new(p.value()).encode(&mut out)?;
                MPI::new(q.value()).encode(&mut out)?;
                MPI::new(u.value()).encode(&mut out)?;
            }
            SecretKeyMaterial::DSA { x } | SecretKeyMaterial::ElGamal { x } => {
                MPI::new(x.value()).encode(&mut out)?;
            }
            SecretKeyMaterial::Unknown { bytes } => out.extend_from_slice(bytes),
        }
        Ok(out)
    }

    /// Parses the algorithm-specific secret MPI sequence for `algo`
    /// from the front of `buf`.
    pub fn parse<'a>(
        algo: PublicKeyAlgorithm,
        buf: &'a [u8],
    ) -> Result<(SecretKeyMaterial, &'a [u8])> {
        match algo {
            PublicKeyAlgorithm::RSA
            | PublicKeyAlgorithm::RSAEncrypt
            | PublicKeyAlgorithm::RSASign => {
                let (d, buf) = MPI::decode(buf)?;
                let (p, buf) = MPI::decode(buf)?;
                let (q, buf) = MPI::decode(buf)?;
                let (u, buf) = MPI::decode(buf)?;
                Ok((
                    SecretKeyMaterial::RSA {
                        d: d.into(),
                        p: p.into(),
                        q: q.into(),
                        u: u.into(),
                    },
                    buf,
                ))
            }
            PublicKeyAlgorithm::DSA => {
                let (x, buf) = MPI::decode(buf)?;
                Ok((SecretKeyMaterial::DSA { x: x.into() }, buf))
            }
            PublicKeyAlgorithm::ElGamal => {
                let (x, buf) = MPI::decode(buf)?;
                Ok((SecretKeyMaterial::ElGamal { x: x.into() }, buf))
            }
            _ => Ok((
                SecretKeyMaterial::Unknown { bytes: Protected::new(buf.to_vec()) },
                &buf[buf.len()..],
            )),
        }
    }
}

/// A public-key-encrypted payload: the MPI(s) carried by a PKESK
/// packet.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Ciphertext {
    /// RSA ciphertext.
    RSA {
        /// `m^e mod n`.
        c: MPI,
    },
    /// ElGamal ciphertext.
    ElGamal {
        /// `g^x mod p`.
        e: MPI,
        /// `m * y^x mod p`.
        c: MPI,
    },
    /// Ciphertext for an algorithm this crate does not implement.
    Unknown {
        /// The MPIs that were read, for byte-faithful re-emission.
        mpis: Box<[MPI]>,
    },
}

impl Ciphertext {
    /// The public-key algorithm this ciphertext was produced under.
    pub fn pk_algo(&self) -> PublicKeyAlgorithm {
        match self {
            Ciphertext::RSA { .. } => PublicKeyAlgorithm::RSA,
            Ciphertext::ElGamal { .. } => PublicKeyAlgorithm::ElGamal,
            Ciphertext::Unknown { .. } => PublicKeyAlgorithm::Unknown(0),
        }
    }

    /// Serializes the MPI sequence.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        match self {
            Ciphertext::RSA { c } => c.encode(&mut out)?,
            Ciphertext::ElGamal { e, c } => {
                e.encode(&mut out)?;
                c.encode(&mut out)?;
            }
            Ciphertext::Unknown { mpis } => {
                for mpi in mpis.iter() {
                    mpi.encode(&mut out)?;
                }
            }
        }
        Ok(out)
    }

    /// Parses the algorithm-specific MPI sequence for `algo`.
    pub fn parse<'a>(algo: PublicKeyAlgorithm, buf: &'a [u8]) -> Result<(Ciphertext, &'a [u8])> {
        match algo {
            PublicKeyAlgorithm::RSA
            | PublicKeyAlgorithm::RSAEncrypt
            | PublicKeyAlgorithm::RSASign => {
                let (c, buf) = MPI::decode(buf)?;
                Ok((Ciphertext::RSA { c }, buf))
            }
            PublicKeyAlgorithm::ElGamal => {
                let (e, buf) = MPI::decode(buf)?;
                let (c, buf) = MPI::decode(buf)?;
                Ok((Ciphertext::ElGamal { e, c }, buf))
            }
            _ => Ok((Ciphertext::Unknown { mpis: Box::new([]) }, buf)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concrete_decode_examples() {
        let (mpi, rest) = MPI::decode(&[0x00, 0x01, 0x01]).unwrap();
        assert_eq!(mpi.value(), &[0x01]);
        assert!(rest.is_empty());

        let (mpi, rest) = MPI::decode(&[0x00, 0x09, 0x01, 0xFF]).unwrap();
        assert_eq!(mpi.value(), &[0x01, 0xFF]);
        assert!(rest.is_empty());
    }

    #[test]
    fn concrete_encode_example() {
        let mpi = MPI::new(&[0x01, 0xFF]);
        assert_eq!(mpi.to_vec().unwrap(), vec![0x00, 0x09, 0x01, 0xFF]);
    }

    #[test]
    fn zero_length_mpi_decodes_to_empty() {
        let (mpi, rest) = MPI::decode(&[0x00, 0x00]).unwrap();
        assert_eq!(mpi.value(), &[] as &[u8]);
        assert_eq!(mpi.bits(), 0);
        assert!(rest.is_empty());
    }

    #[test]
    fn truncated_length_prefix_is_malformed() {
        assert!(matches!(MPI::decode(&[0x00]), Err(Error::Malformed(_))));
        assert!(matches!(MPI::decode(&[]), Err(Error::Malformed(_))));
    }

    #[test]
    fn truncated_body_is_malformed() {
        // declares 16 bits (2 octets) but only 1 remains.
        assert!(matches!(MPI::decode(&[0x00, 0x10, 0xFF]), Err(Error::Malformed(_))));
    }

    #[test]
    fn extra_high_bits_are_malformed() {
        // declares 1 bit, so only bit 0 of 0x01 may be set; 0x03 is not.
        assert!(matches!(MPI::decode(&[0x00, 0x01, 0x03]), Err(Error::Malformed(_))));
    }

    #[test]
    fn magnitude_too_long_is_invalid_argument() {
        let huge = MPI { value: vec![1u8; 70000].into_boxed_slice() };
        assert!(matches!(huge.encode(&mut Vec::new()), Err(Error::InvalidArgument(_))));
    }

    quickcheck::quickcheck! {
        fn mpi_roundtrip(value: Vec<u8>) -> bool {
            if value.len() > u16::MAX as usize / 8 + 1 {
                return true;
            }
            let mpi = MPI::new(&value);
            let encoded = mpi.to_vec().unwrap();
            let (decoded, rest) = MPI::decode(&encoded).unwrap();
            rest.is_empty() && decoded == mpi && decoded.bits() == mpi.bits()
        }
    }

    #[test]
    fn elgamal_public_key_roundtrip() {
        let key = PublicKey::ElGamal {
            p: MPI::new(&[0xAB, 0xCD]),
            g: MPI::new(&[0x02]),
            y: MPI::new(&[0x12, 0x34, 0x56]),
        };
        let bytes = key.serialize().unwrap();
        let (parsed, rest) = PublicKey::parse(PublicKeyAlgorithm::ElGamal, &bytes).unwrap();
        assert!(rest.is_empty());
        assert_eq!(parsed, key);
    }

    #[test]
    fn elgamal_ciphertext_roundtrip() {
        let ct = Ciphertext::ElGamal {
            e: MPI::new(&[0x01, 0x02]),
            c: MPI::new(&[0x03, 0x04, 0x05]),
        };
        let bytes = ct.serialize().unwrap();
        let (parsed, rest) = Ciphertext::parse(PublicKeyAlgorithm::ElGamal, &bytes).unwrap();
        assert!(rest.is_empty());
        assert_eq!(parsed, ct);
    }
}
