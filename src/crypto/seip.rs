//! AES-CFB Integrity-Protected Data pipeline.
//!
//! Named `seip` after the packet it produces/consumes (Symmetrically
//! Encrypted Integrity Protected data, tag 18); the packet's own flat
//! byte representation lives in [`crate::packet::ipdp`].

use crate::crypto::{Backend, SessionKey};
use crate::types::SymmetricAlgorithm;
use crate::{Error, Result};

const MDC_PREFIX: [u8; 2] = [0xD3, 0x14];
const MDC_LEN: usize = 22;

/// Encrypts `payload` under `key`/`algo` into an IPDP ciphertext
/// (the bytes that follow the `0x01` version octet in the packet
/// body).
///
/// No resync: unlike the general OpenPGP CFB mode, IPDP does not
/// re-synchronize the shift register after the prefix — it runs
/// continuously across the whole plaintext.
pub fn encrypt(
    backend: &dyn Backend,
    algo: SymmetricAlgorithm,
    key: &SessionKey,
    payload: &[u8],
) -> Result<Vec<u8>> {
    let bs = block_size(algo, key)?;

    let r = backend.rand_bytes(bs)?;
    let mut plaintext = Vec::with_capacity(bs + 2 + payload.len() + MDC_LEN);
    plaintext.extend_from_slice(&r);
    plaintext.push(r[bs - 2]);
    plaintext.push(r[bs - 1]);
    plaintext.extend_from_slice(payload);

    let mut mdc_input = plaintext.clone();
    mdc_input.extend_from_slice(&MDC_PREFIX);
    let digest = backend.sha1(&mdc_input);
    plaintext.extend_from_slice(&MDC_PREFIX);
    plaintext.extend_from_slice(&digest);

    let iv = [0u8; 16];
    backend.aes_cfb_encrypt(key, &iv, &plaintext)
}

/// Decrypts and verifies an IPDP ciphertext, returning the inner
/// payload bytes.
///
/// # Errors
///
/// `Error::IntegrityCheckFailed` if either the prefix-repeat
/// quick-check or the trailing MDC digest fails to verify; the two
/// failure modes are coalesced into one variant per the error
/// propagation policy (padding/integrity-oracle avoidance).
pub fn decrypt(
    backend: &dyn Backend,
    algo: SymmetricAlgorithm,
    key: &SessionKey,
    ciphertext: &[u8],
) -> Result<Vec<u8>> {
    let bs = block_size(algo, key)?;
    if ciphertext.len() < bs + 2 + MDC_LEN {
        return Err(Error::Malformed(
            "IPDP ciphertext shorter than the mandatory prefix and MDC".into(),
        ));
    }

    let iv = [0u8; 16];
    let plaintext = backend.aes_cfb_decrypt(key, &iv, ciphertext)?;

    if plaintext[bs - 2] != plaintext[bs] || plaintext[bs - 1] != plaintext[bs + 1] {
        return Err(Error::IntegrityCheckFailed);
    }

    let split = plaintext.len() - MDC_LEN;
    let (before, mdc) = plaintext.split_at(split);
    if mdc[0] != MDC_PREFIX[0] || mdc[1] != MDC_PREFIX[1] {
        return Err(Error::IntegrityCheckFailed);
    }
    let mut hashed = before.to_vec();
    hashed.extend_from_slice(&MDC_PREFIX);
    let expected = backend.sha1(&hashed);
    if expected != mdc[2..] {
        return Err(Error::IntegrityCheckFailed);
    }

    Ok(before[bs + 2..].to_vec())
}

fn block_size(algo: SymmetricAlgorithm, key: &SessionKey) -> Result<usize> {
    if !algo.is_supported() {
        return Err(Error::Unsupported(format!(
            "IPDP pipeline does not support symmetric algorithm {}",
            algo
        )));
    }
    let expected_key_len = algo.key_size().expect("is_supported() implies key_size()");
    if key.len() != expected_key_len {
        return Err(Error::InvalidArgument(format!(
            "session key is {} octets, expected {} for {}",
            key.len(),
            expected_key_len,
            algo
        )));
    }
    Ok(algo.block_size().expect("is_supported() implies block_size()"))
}
