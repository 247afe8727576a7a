//! Integrity-Protected Data Packet (tag 18).
//!
//! This struct is the flat, raw-bytes packet representation; the
//! AES-CFB encrypt/decrypt pipeline over its `ciphertext` lives in
//! [`crate::crypto::seip`].

use crate::{Error, Result};

/// A version-1 IPDP packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IPDP {
    /// The AES-CFB ciphertext (prefix, payload, and MDC, all still
    /// encrypted).
    pub ciphertext: Vec<u8>,
}

impl IPDP {
    /// Decodes an IPDP packet body: `0x01 || ciphertext`.
    ///
    /// # Errors
    ///
    /// `Error::Malformed` if the version octet is not `1`.
    pub fn decode(body: &[u8]) -> Result<IPDP> {
        let (&version, rest) = body
            .split_first()
            .ok_or_else(|| Error::Malformed("IPDP: empty body".into()))?;
        if version != 1 {
            return Err(Error::Malformed(format!(
                "IPDP: unsupported version {}",
                version
            )));
        }
        Ok(IPDP { ciphertext: rest.to_vec() })
    }

    /// Encodes the packet body.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + self.ciphertext.len());
        out.push(1);
        out.extend_from_slice(&self.ciphertext);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let ipdp = IPDP { ciphertext: vec![1, 2, 3, 4] };
        let encoded = ipdp.encode();
        assert_eq!(encoded[0], 1);
        let decoded = IPDP::decode(&encoded).unwrap();
        assert_eq!(decoded, ipdp);
    }

    #[test]
    fn rejects_non_v1() {
        assert!(matches!(IPDP::decode(&[2, 1, 2]), Err(Error::Malformed(_))));
    }
}
