//! EME-PKCS1-v1_5 padding (RFC 2313 §8.1, reused by OpenPGP for the
//! ElGamal session-key wrap instead of RSA).

use crate::crypto::Backend;
use crate::{Error, Result};

/// Pads `message` to `k` octets: `0x00 0x02 PS 0x00 message`, where
/// `PS` is `k - len(message) - 3` non-zero random octets.
///
/// # Errors
///
/// `Error::InvalidArgument` if `message` is too long to leave room
/// for at least 8 octets of padding plus the 3 framing octets, i.e.
/// `len(message) > k - 11`.
pub fn pad(backend: &dyn Backend, message: &[u8], k: usize) -> Result<Vec<u8>> {
    if message.len() > k.saturating_sub(11) {
        return Err(Error::InvalidArgument(format!(
            "pkcs1: message of {} octets too long for a {}-octet modulus",
            message.len(),
            k
        )));
    }
    let ps_len = k - message.len() - 3;
    let ps = non_zero_random_octets(backend, ps_len)?;

    let mut out = Vec::with_capacity(k);
    out.push(0x00);
    out.push(0x02);
    out.extend_from_slice(&ps);
    out.push(0x00);
    out.extend_from_slice(message);
    Ok(out)
}

/// Reverses [`pad`], returning the original message.
///
/// # Errors
///
/// `Error::PaddingError` if the leading octets are not `0x00 0x02`,
/// if the padding string contains a zero octet, or if no `0x00`
/// separator is found. The same error is returned for every failure
/// mode so callers cannot distinguish *why* an encoding is invalid
/// (padding-oracle avoidance, per the error propagation policy).
pub fn unpad(encoded: &[u8]) -> Result<Vec<u8>> {
    if encoded.len() < 11 || encoded[0] != 0x00 || encoded[1] != 0x02 {
        return Err(Error::PaddingError);
    }
    let ps = &encoded[2..];
    let sep = match ps.iter().position(|&b| b == 0x00) {
        Some(pos) => pos,
        None => return Err(Error::PaddingError),
    };
    if sep < 8 {
        return Err(Error::PaddingError);
    }
    if ps[..sep].iter().any(|&b| b == 0x00) {
        return Err(Error::PaddingError);
    }
    Ok(ps[sep + 1..].to_vec())
}

fn non_zero_random_octets(backend: &dyn Backend, n: usize) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(n);
    while out.len() < n {
        let chunk = backend.rand_bytes(n - out.len())?;
        out.extend(chunk.into_iter().filter(|&b| b != 0));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::DefaultBackend;

    #[test]
    fn roundtrip() {
        let backend = DefaultBackend;
        let msg = b"a wrapped session key blob";
        let padded = pad(&backend, msg, 64).unwrap();
        assert_eq!(padded.len(), 64);
        assert_eq!(&padded[..2], &[0x00, 0x02]);
        let recovered = unpad(&padded).unwrap();
        assert_eq!(recovered, msg);
    }

    #[test]
    fn padding_string_never_contains_zero() {
        let backend = DefaultBackend;
        let padded = pad(&backend, b"x", 32).unwrap();
        let sep = padded[2..].iter().position(|&b| b == 0).unwrap();
        assert!(padded[2..2 + sep].iter().all(|&b| b != 0));
    }

    #[test]
    fn message_too_long_is_invalid_argument() {
        let backend = DefaultBackend;
        let msg = vec![0u8; 60];
        assert!(matches!(
            pad(&backend, &msg, 64),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn unpad_rejects_bad_prefix() {
        assert!(matches!(unpad(&[0x01, 0x02, 0x00]), Err(Error::PaddingError)));
    }

    #[test]
    fn unpad_rejects_zero_filled_padding() {
        // PS is all-zero instead of non-zero random octets: the first
        // zero octet after the prefix is (wrongly) taken as PS[0],
        // making PS empty and thus shorter than the mandatory 8
        // octets -- this must be rejected, not silently accepted.
        let mut encoded = vec![0x00, 0x02];
        encoded.extend_from_slice(&[0x00; 10]);
        encoded.extend_from_slice(b"msg");
        assert!(matches!(unpad(&encoded), Err(Error::PaddingError)));
    }

    #[test]
    fn unpad_rejects_missing_separator() {
        let mut encoded = vec![0x00, 0x02];
        encoded.extend_from_slice(&[0x11; 20]);
        assert!(matches!(unpad(&encoded), Err(Error::PaddingError)));
    }
}
