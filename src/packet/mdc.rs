//! Modification Detection Code packet (tag 19).

use crate::{Error, Result};

/// An MDC packet: always exactly 20 octets, with no length prefix
/// inside the body beyond what the packet-framing layer already stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MDC {
    /// The SHA-1 digest.
    pub digest: [u8; 20],
}

impl MDC {
    /// Decodes an MDC packet body.
    ///
    /// # Errors
    ///
    /// `Error::Malformed` if the body is not exactly 20 octets.
    pub fn decode(body: &[u8]) -> Result<MDC> {
        if body.len() != 20 {
            return Err(Error::Malformed(format!(
                "MDC: body must be exactly 20 octets, got {}",
                body.len()
            )));
        }
        let mut digest = [0u8; 20];
        digest.copy_from_slice(body);
        Ok(MDC { digest })
    }

    /// Encodes the packet body: the raw 20-octet digest.
    pub fn encode(&self) -> Vec<u8> {
        self.digest.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let mdc = MDC { digest: [7u8; 20] };
        let encoded = mdc.encode();
        assert_eq!(encoded.len(), 20);
        assert_eq!(MDC::decode(&encoded).unwrap(), mdc);
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(matches!(MDC::decode(&[0u8; 19]), Err(Error::Malformed(_))));
        assert!(matches!(MDC::decode(&[0u8; 21]), Err(Error::Malformed(_))));
    }
}
