//! ElGamal session-key wrap and unwrap.

use crate::crypto::checksum::checksum_bytes;
use crate::crypto::mpi::{Ciphertext, MPI, PublicKey};
use crate::crypto::pkcs1;
use crate::crypto::{Backend, SessionKey};
use crate::types::SymmetricAlgorithm;
use crate::{Error, Result};

/// Wraps session key `k` for `algo` under the ElGamal public key
/// `(p, g, y)`, returning the PKESK ciphertext MPIs `[c1, c2]`.
///
/// # Errors
///
/// `Error::Unsupported` if `recipient` is not [`PublicKey::ElGamal`]
/// or `algo` is not one of AES-128/192/256; `Error::InvalidArgument`
/// if the padded message does not fit the modulus.
pub fn wrap(
    backend: &dyn Backend,
    recipient: &PublicKey,
    algo: SymmetricAlgorithm,
    k: &SessionKey,
) -> Result<Ciphertext> {
    if !recipient.algo().supports_wrap() {
        return Err(Error::Unsupported(format!(
            "elgamal::wrap: public-key algorithm {} is not supported for session-key wrap",
            recipient.algo()
        )));
    }
    let (p, g, y) = match recipient {
        PublicKey::ElGamal { p, g, y } => (p, g, y),
        _ => unreachable!("supports_wrap() only returns true for PublicKey::ElGamal"),
    };
    if !algo.is_supported() {
        return Err(Error::Unsupported(format!(
            "elgamal::wrap: symmetric algorithm {} is not supported",
            algo
        )));
    }
    let expected_len = algo.key_size().expect("is_supported() implies key_size()");
    if k.len() != expected_len {
        return Err(Error::InvalidArgument(format!(
            "elgamal::wrap: session key is {} octets, expected {} for {}",
            k.len(),
            expected_len,
            algo
        )));
    }

    // Step 1: W = algo || K || checksum(K).
    let mut w = Vec::with_capacity(1 + k.len() + 2);
    w.push(u8::from(algo));
    w.extend_from_slice(k);
    w.extend_from_slice(&checksum_bytes(k));

    // Step 2: EME-PKCS1-v1_5 encode to the modulus byte length.
    let modulus = p.value();
    let key_octets = backend.byte_length(modulus);
    let m = pkcs1::pad(backend, &w, key_octets)?;

    // Step 3: ephemeral exponent and the two ElGamal ciphertext MPIs.
    let p_minus_one = decrement(modulus);
    let x = backend.random_in_range(&p_minus_one)?;
    let c1 = backend.modpow(g.value(), &x, modulus);
    let y_to_x = backend.modpow(y.value(), &x, modulus);
    let c2 = backend.mulmod(&m, &y_to_x, modulus);

    Ok(Ciphertext::ElGamal { e: MPI::new(&c1), c: MPI::new(&c2) })
}

/// Unwraps a PKESK ciphertext produced by [`wrap`], given the
/// ElGamal secret exponent `x` and the public modulus `p`.
///
/// Returns the recovered `(algorithm, session key)` pair.
pub fn unwrap(
    backend: &dyn Backend,
    p: &MPI,
    x_secret: &[u8],
    ciphertext: &Ciphertext,
) -> Result<(SymmetricAlgorithm, SessionKey)> {
    let (c1, c2) = match ciphertext {
        Ciphertext::ElGamal { e, c } => (e, c),
        other => {
            return Err(Error::InvalidArgument(format!(
                "elgamal::unwrap: ciphertext must be ElGamal, got {:?}",
                other.pk_algo()
            )))
        }
    };
    let modulus = p.value();
    // s = c1^x mod p; m = c2 * s^-1 mod p. Modular inverse is computed
    // as s^(p-2) mod p (Fermat's little theorem; p is prime).
    let s = backend.modpow(c1.value(), x_secret, modulus);
    let p_minus_two = decrement(&decrement(modulus));
    let s_inv = backend.modpow(&s, &p_minus_two, modulus);
    let m = backend.mulmod(c2.value(), &s_inv, modulus);

    let key_octets = backend.byte_length(modulus);
    let mut padded = vec![0u8; key_octets.saturating_sub(m.len())];
    padded.extend_from_slice(&m);
    let w = pkcs1::unpad(&padded)?;

    if w.len() < 3 {
        return Err(Error::Malformed("elgamal::unwrap: wrapped blob too short".into()));
    }
    let algo = SymmetricAlgorithm::from(w[0]);
    let key_len = algo
        .key_size()
        .ok_or_else(|| Error::Unsupported(format!("unsupported symmetric algorithm {}", algo)))?;
    if w.len() != 1 + key_len + 2 {
        return Err(Error::Malformed(
            "elgamal::unwrap: wrapped blob length does not match declared algorithm".into(),
        ));
    }
    let key = &w[1..1 + key_len];
    let declared_checksum = u16::from_be_bytes([w[1 + key_len], w[2 + key_len]]);
    if declared_checksum != crate::crypto::checksum::checksum(key) {
        return Err(Error::ChecksumMismatch(
            "elgamal::unwrap: session key checksum mismatch".into(),
        ));
    }
    Ok((algo, SessionKey::new(key.to_vec())))
}

/// Computes `n - 1` for a big-endian magnitude, without leading zero
/// stripping guarantees beyond what the caller needs (modulus-sized
/// inputs are always non-zero).
fn decrement(n: &[u8]) -> Vec<u8> {
    let mut out = n.to_vec();
    for byte in out.iter_mut().rev() {
        if *byte == 0 {
            *byte = 0xFF;
        } else {
            *byte -= 1;
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::DefaultBackend;

    // A toy ElGamal group large enough to leave room for PKCS#1 v1.5
    // padding of a wrapped AES-128 session key (19 octets needs a
    // modulus of at least 30 octets). p = 2^255 - 19, the Curve25519
    // field prime, chosen only because it's a convenient well-known
    // prime of the right size; it carries no elliptic-curve meaning
    // here, arithmetic is plain modular exponentiation mod p.
    fn toy_group() -> (MPI, MPI) {
        use num_bigint_dig::BigUint;
        let p = (BigUint::from(1u8) << 255) - BigUint::from(19u8);
        (MPI::new(&p.to_bytes_be()), MPI::new(&[2]))
    }

    #[test]
    fn wrap_then_unwrap_recovers_session_key() {
        let backend = DefaultBackend;
        let (p, g) = toy_group();
        // secret x = 5 (toy value); y = g^x mod p.
        let x = 5u32.to_be_bytes();
        let x = &x[3..];
        let y = backend.modpow(g.value(), x, p.value());

        let recipient = PublicKey::ElGamal { p: p.clone(), g: g.clone(), y: MPI::new(&y) };
        let k = SessionKey::new(vec![0x11; 16]);

        let ct = wrap(&backend, &recipient, SymmetricAlgorithm::AES128, &k).unwrap();
        let (algo, recovered) = unwrap(&backend, &p, x, &ct).unwrap();
        assert_eq!(algo, SymmetricAlgorithm::AES128);
        assert_eq!(&*recovered, &*k);
    }

    #[test]
    fn wrap_rejects_non_elgamal_key() {
        let backend = DefaultBackend;
        let rsa = PublicKey::RSA { e: MPI::new(&[3]), n: MPI::new(&[0xFF, 0xFF]) };
        let k = SessionKey::new(vec![0u8; 16]);
        assert!(matches!(
            wrap(&backend, &rsa, SymmetricAlgorithm::AES128, &k),
            Err(Error::Unsupported(_))
        ));
    }

    #[test]
    fn wrap_rejects_unsupported_symmetric_algorithm() {
        let backend = DefaultBackend;
        let (p, g) = toy_group();
        let recipient = PublicKey::ElGamal { p, g: g.clone(), y: g };
        let k = SessionKey::new(vec![0u8; 8]);
        assert!(matches!(
            wrap(&backend, &recipient, SymmetricAlgorithm::IDEA, &k),
            Err(Error::Unsupported(_))
        ));
    }

    #[test]
    fn decrement_handles_borrow_chain() {
        assert_eq!(decrement(&[0x01, 0x00, 0x00]), vec![0x00, 0xFF, 0xFF]);
    }
}
