//! Algorithm identifiers.
//!
//! RFC 4880 §9 defines closed registries of numeric algorithm
//! identifiers.  We keep one immutable, process-wide enum per
//! registry, with a `From<u8>`/`Into<u8>` plus `is_supported()` shape
//! for each.  IDs in the private/experimental range (100..=110) decode
//! to a `Private` variant rather than erroring; anything else unknown
//! decodes to `Unknown`.

use std::fmt;

/// Public-key algorithm identifiers (RFC 4880 §9.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum PublicKeyAlgorithm {
    /// RSA (Encrypt or Sign).
    RSA,
    /// RSA Encrypt-Only.
    RSAEncrypt,
    /// RSA Sign-Only.
    RSASign,
    /// ElGamal (Encrypt-Only).
    ElGamal,
    /// DSA (Digital Signature Algorithm).
    DSA,
    /// Private or experimental algorithm.
    Private(u8),
    /// Unknown algorithm.
    Unknown(u8),
}

impl From<u8> for PublicKeyAlgorithm {
    fn from(u: u8) -> Self {
        use PublicKeyAlgorithm::*;
        match u {
            1 => RSA,
            2 => RSAEncrypt,
            3 => RSASign,
            16 => ElGamal,
            17 => DSA,
            100..=110 => Private(u),
            _ => Unknown(u),
        }
    }
}

impl From<PublicKeyAlgorithm> for u8 {
    fn from(a: PublicKeyAlgorithm) -> u8 {
        use PublicKeyAlgorithm::*;
        match a {
            RSA => 1,
            RSAEncrypt => 2,
            RSASign => 3,
            ElGamal => 16,
            DSA => 17,
            Private(u) | Unknown(u) => u,
        }
    }
}

impl fmt::Display for PublicKeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use PublicKeyAlgorithm::*;
        match self {
            RSA => write!(f, "RSA (Encrypt or Sign)"),
            RSAEncrypt => write!(f, "RSA (Encrypt-Only)"),
            RSASign => write!(f, "RSA (Sign-Only)"),
            ElGamal => write!(f, "ElGamal (Encrypt-Only)"),
            DSA => write!(f, "DSA"),
            Private(u) => write!(f, "Private/Experimental public-key algorithm {}", u),
            Unknown(u) => write!(f, "Unknown public-key algorithm {}", u),
        }
    }
}

impl PublicKeyAlgorithm {
    /// Whether this crate implements the session-key wrap for this
    /// algorithm (ElGamal only).
    pub fn supports_wrap(self) -> bool {
        matches!(self, PublicKeyAlgorithm::ElGamal)
    }
}

/// Symmetric-cipher algorithm identifiers (RFC 4880 §9.2).
///
/// Only AES-128/192/256 are implemented by this crate's cipher
/// operations. Other recognized ids decode without error but are
/// `Unsupported` for any operation this crate implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum SymmetricAlgorithm {
    /// Plaintext (no encryption).
    Plaintext,
    /// IDEA.
    IDEA,
    /// Triple-DES.
    TripleDES,
    /// CAST5.
    CAST5,
    /// Blowfish.
    Blowfish,
    /// AES with 128-bit key.
    AES128,
    /// AES with 192-bit key.
    AES192,
    /// AES with 256-bit key.
    AES256,
    /// Twofish with 256-bit key.
    Twofish,
    /// Private or experimental algorithm.
    Private(u8),
    /// Unknown algorithm.
    Unknown(u8),
}

impl From<u8> for SymmetricAlgorithm {
    fn from(u: u8) -> Self {
        use SymmetricAlgorithm::*;
        match u {
            0 => Plaintext,
            1 => IDEA,
            2 => TripleDES,
            3 => CAST5,
            4 => Blowfish,
            7 => AES128,
            8 => AES192,
            9 => AES256,
            10 => Twofish,
            100..=110 => Private(u),
            _ => Unknown(u),
        }
    }
}

impl From<SymmetricAlgorithm> for u8 {
    fn from(a: SymmetricAlgorithm) -> u8 {
        use SymmetricAlgorithm::*;
        match a {
            Plaintext => 0,
            IDEA => 1,
            TripleDES => 2,
            CAST5 => 3,
            Blowfish => 4,
            AES128 => 7,
            AES192 => 8,
            AES256 => 9,
            Twofish => 10,
            Private(u) | Unknown(u) => u,
        }
    }
}

impl fmt::Display for SymmetricAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use SymmetricAlgorithm::*;
        match self {
            Plaintext => write!(f, "Plaintext"),
            IDEA => write!(f, "IDEA"),
            TripleDES => write!(f, "TripleDES (EDE, 168 bit key derived from 192)"),
            CAST5 => write!(f, "CAST5"),
            Blowfish => write!(f, "Blowfish"),
            AES128 => write!(f, "AES with 128-bit key"),
            AES192 => write!(f, "AES with 192-bit key"),
            AES256 => write!(f, "AES with 256-bit key"),
            Twofish => write!(f, "Twofish with 256-bit key"),
            Private(u) => write!(f, "Private/Experimental symmetric algorithm {}", u),
            Unknown(u) => write!(f, "Unknown symmetric algorithm {}", u),
        }
    }
}

impl SymmetricAlgorithm {
    /// Whether this crate's AES-CFB pipeline supports this
    /// algorithm.
    pub fn is_supported(self) -> bool {
        matches!(
            self,
            SymmetricAlgorithm::AES128
                | SymmetricAlgorithm::AES192
                | SymmetricAlgorithm::AES256
        )
    }

    /// Key size in octets, if known.
    pub fn key_size(self) -> Option<usize> {
        use SymmetricAlgorithm::*;
        match self {
            AES128 => Some(16),
            AES192 => Some(24),
            AES256 => Some(32),
            IDEA | CAST5 | Blowfish => Some(16),
            TripleDES => Some(24),
            Twofish => Some(32),
            Plaintext | Private(_) | Unknown(_) => None,
        }
    }

    /// Block size in octets, if known.  All ciphers this crate's
    /// IPDP pipeline supports are 128-bit-block ciphers.
    pub fn block_size(self) -> Option<usize> {
        use SymmetricAlgorithm::*;
        match self {
            AES128 | AES192 | AES256 | Twofish => Some(16),
            IDEA | CAST5 | Blowfish | TripleDES => Some(8),
            Plaintext | Private(_) | Unknown(_) => None,
        }
    }
}

/// Hash algorithm identifiers (RFC 4880 §9.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum HashAlgorithm {
    /// SHA-1.
    SHA1,
    /// RIPE-MD/160.
    RipeMD,
    /// SHA-224.
    SHA224,
    /// SHA-256.
    SHA256,
    /// SHA-384.
    SHA384,
    /// SHA-512.
    SHA512,
    /// MD5.
    MD5,
    /// Private or experimental algorithm.
    Private(u8),
    /// Unknown algorithm.
    Unknown(u8),
}

impl From<u8> for HashAlgorithm {
    fn from(u: u8) -> Self {
        use HashAlgorithm::*;
        match u {
            1 => MD5,
            2 => SHA1,
            3 => RipeMD,
            8 => SHA256,
            9 => SHA384,
            10 => SHA512,
            11 => SHA224,
            100..=110 => Private(u),
            _ => Unknown(u),
        }
    }
}

impl From<HashAlgorithm> for u8 {
    fn from(a: HashAlgorithm) -> u8 {
        use HashAlgorithm::*;
        match a {
            MD5 => 1,
            SHA1 => 2,
            RipeMD => 3,
            SHA256 => 8,
            SHA384 => 9,
            SHA512 => 10,
            SHA224 => 11,
            Private(u) | Unknown(u) => u,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use HashAlgorithm::*;
        match self {
            SHA1 => write!(f, "SHA1"),
            RipeMD => write!(f, "RIPEMD160"),
            SHA224 => write!(f, "SHA224"),
            SHA256 => write!(f, "SHA256"),
            SHA384 => write!(f, "SHA384"),
            SHA512 => write!(f, "SHA512"),
            MD5 => write!(f, "MD5"),
            Private(u) => write!(f, "Private/Experimental hash algorithm {}", u),
            Unknown(u) => write!(f, "Unknown hash algorithm {}", u),
        }
    }
}

impl HashAlgorithm {
    /// Digest size in octets, if known. Used by S2K derivation to
    /// size parallel hash contexts.
    pub fn digest_size(self) -> Option<usize> {
        use HashAlgorithm::*;
        match self {
            MD5 => Some(16),
            SHA1 | RipeMD => Some(20),
            SHA224 => Some(28),
            SHA256 => Some(32),
            SHA384 => Some(48),
            SHA512 => Some(64),
            Private(_) | Unknown(_) => None,
        }
    }
}

/// Compression algorithm identifiers (RFC 4880 §9.3).
///
/// Named for completeness of the registry; decompression itself is
/// out of scope for this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum CompressionAlgorithm {
    /// No compression.
    Uncompressed,
    /// ZIP (RFC 1951).
    Zip,
    /// ZLIB (RFC 1950).
    Zlib,
    /// BZip2.
    BZip2,
    /// Private or experimental algorithm.
    Private(u8),
    /// Unknown algorithm.
    Unknown(u8),
}

impl From<u8> for CompressionAlgorithm {
    fn from(u: u8) -> Self {
        use CompressionAlgorithm::*;
        match u {
            0 => Uncompressed,
            1 => Zip,
            2 => Zlib,
            3 => BZip2,
            100..=110 => Private(u),
            _ => Unknown(u),
        }
    }
}

impl From<CompressionAlgorithm> for u8 {
    fn from(a: CompressionAlgorithm) -> u8 {
        use CompressionAlgorithm::*;
        match a {
            Uncompressed => 0,
            Zip => 1,
            Zlib => 2,
            BZip2 => 3,
            Private(u) | Unknown(u) => u,
        }
    }
}

impl fmt::Display for CompressionAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use CompressionAlgorithm::*;
        match self {
            Uncompressed => write!(f, "Uncompressed"),
            Zip => write!(f, "ZIP"),
            Zlib => write!(f, "ZLIB"),
            BZip2 => write!(f, "BZip2"),
            Private(u) => write!(f, "Private/Experimental compression algorithm {}", u),
            Unknown(u) => write!(f, "Unknown compression algorithm {}", u),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_key_algorithm_roundtrip() {
        for i in 0..=255u8 {
            let a = PublicKeyAlgorithm::from(i);
            assert_eq!(u8::from(a), i);
        }
    }

    #[test]
    fn symmetric_algorithm_supported_set() {
        assert!(SymmetricAlgorithm::AES128.is_supported());
        assert!(SymmetricAlgorithm::AES192.is_supported());
        assert!(SymmetricAlgorithm::AES256.is_supported());
        assert!(!SymmetricAlgorithm::IDEA.is_supported());
        assert!(!SymmetricAlgorithm::Unknown(200).is_supported());
    }

    #[test]
    fn private_range_decodes_without_error() {
        assert_eq!(PublicKeyAlgorithm::from(105), PublicKeyAlgorithm::Private(105));
        assert_eq!(SymmetricAlgorithm::from(110), SymmetricAlgorithm::Private(110));
        assert_eq!(HashAlgorithm::from(100), HashAlgorithm::Private(100));
    }

    #[test]
    fn elgamal_supports_wrap_rsa_does_not() {
        assert!(PublicKeyAlgorithm::ElGamal.supports_wrap());
        assert!(!PublicKeyAlgorithm::RSA.supports_wrap());
    }
}
