//! Public-Key Encrypted Session Key packet (tag 1).

use crate::crypto::mpi::Ciphertext;
use crate::types::PublicKeyAlgorithm;
use crate::{Error, Result};

/// A version-3 PKESK packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PKESK {
    /// The recipient key's 8-octet key-ID.
    pub key_id: [u8; 8],
    /// The public-key algorithm the ciphertext was produced under.
    pub algo: PublicKeyAlgorithm,
    /// The algorithm-specific ciphertext MPIs (exactly two for
    /// ElGamal: `c1`, `c2`).
    pub ciphertext: Ciphertext,
}

impl PKESK {
    /// Decodes a PKESK packet body: `0x03 || key_id[8] || algo || MPIs`.
    ///
    /// # Errors
    ///
    /// `Error::Malformed` if the version octet is not `3`.
    pub fn decode(body: &[u8]) -> Result<PKESK> {
        if body.len() < 10 {
            return Err(Error::Malformed("PKESK: body too short".into()));
        }
        let version = body[0];
        if version != 3 {
            return Err(Error::Malformed(format!(
                "PKESK: unsupported version {}",
                version
            )));
        }
        let mut key_id = [0u8; 8];
        key_id.copy_from_slice(&body[1..9]);
        let algo = PublicKeyAlgorithm::from(body[9]);
        let (ciphertext, rest) = Ciphertext::parse(algo, &body[10..])?;
        if !rest.is_empty() {
            return Err(Error::Malformed("PKESK: trailing bytes after MPIs".into()));
        }
        Ok(PKESK { key_id, algo, ciphertext })
    }

    /// Encodes the packet body.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        out.push(3);
        out.extend_from_slice(&self.key_id);
        out.push(u8::from(self.algo));
        out.extend_from_slice(&self.ciphertext.serialize()?);
        Ok(out)
    }
}
