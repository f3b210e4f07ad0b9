//! RSASSA-PSS signature padding (EMSA-PSS encoding/verification).
//!
//! See [RFC 8017 §8.1, §9.1](https://datatracker.ietf.org/doc/html/rfc8017#section-9.1).

use digest::{Digest, DynDigest, FixedOutputReset};
use rand_core::CryptoRngCore;
use subtle::{Choice, ConstantTimeEq};

use crate::algorithms::ct;
use crate::algorithms::mgf::{mgf1_xor, mgf1_xor_digest, MAX_HASH_LEN};
use crate::errors::{Error, Result};

/// Largest salt/digest this module's stack scratch can recover during
/// [`verify`]/[`verify_digest`].
const MAX_DIGEST_LEN: usize = MAX_HASH_LEN;

/// Byte length of the PSS-encoded message for a modulus of `n_bits` bits:
/// `emLen = ceil((n_bits - 1) / 8)`.
///
/// When `n_bits % 8 == 1`, the caller's encoded block (sized to the full
/// modulus, `k = ceil(n_bits / 8)`) is one byte longer than `em_len`; that
/// leading byte must be `0x00` on both apply and verify (see [`em_prefix`]).
pub fn em_len(n_bits: usize) -> usize {
    (n_bits - 1 + 7) / 8
}

/// Splits a caller's `k`-byte encoded block into the leading `0x00` byte
/// mandated when `n_bits % 8 == 1`, if any, and the `em_len(n_bits)`-byte
/// working region PSS actually operates on.
fn em_prefix_mut(em: &mut [u8], n_bits: usize) -> (&mut [u8], &mut [u8]) {
    let len = em_len(n_bits);
    let split_at = em.len() - len;
    em.split_at_mut(split_at)
}

/// Applies RSASSA-PSS signature padding.
///
/// `mg_digest` hashes both `M'` and drives MGF1; `em` must be exactly
/// `k = ceil(n_bits / 8)` bytes (the padding occupies the trailing
/// `em_len(n_bits)` of them; any leading byte is zeroed, matching the
/// `n_bits % 8 == 1` convention). `salt`, if given, is used as-is and must
/// be exactly `s_len` bytes; if `None`, `s_len` bytes are drawn from `rng`.
pub fn apply<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    m_hash: &[u8],
    digest: &mut dyn DynDigest,
    n_bits: usize,
    salt: Option<&[u8]>,
    s_len: usize,
    em: &mut [u8],
) -> Result<()> {
    let h_len = digest.output_size();
    if m_hash.len() != h_len {
        return Err(Error::InvalidArgument);
    }
    if let Some(salt) = salt {
        if salt.len() != s_len {
            return Err(Error::InvalidArgument);
        }
    }

    let em_len = em_len(n_bits);
    if em_len < h_len + s_len + 2 || em.len() < em_len {
        return Err(Error::InvalidArgument);
    }

    let (lead, em) = em_prefix_mut(em, n_bits);
    ct::wipe(lead);

    let (db, h_and_trailer) = em.split_at_mut(em_len - h_len - 1);
    let (h, trailer) = h_and_trailer.split_at_mut(h_len);

    // DB = 0x00^(emLen - sLen - hLen - 2) || 0x01 || salt
    let zeros = em_len - s_len - h_len - 2;
    let (fixed, salt_field) = db.split_at_mut(db.len() - s_len);
    match salt {
        Some(salt) => salt_field.copy_from_slice(salt),
        None => rng.try_fill_bytes(salt_field)?,
    }
    for b in &mut fixed[..zeros] {
        *b = 0;
    }
    fixed[zeros] = 0x01;

    // M' = 0x00^8 || mHash || salt ; H' = Hash(M')
    let prefix = [0u8; 8];
    digest.update(&prefix);
    digest.update(m_hash);
    digest.update(&*salt_field);
    digest
        .finalize_into_reset(&mut h[..h_len])
        .or(Err(Error::InvalidArgument))?;

    mgf1_xor(db, digest, h)?;
    zero_top_bits(&mut db[0], n_bits, em_len);

    trailer[0] = 0xBC;
    Ok(())
}

/// Generic-digest counterpart of [`apply`].
pub fn apply_digest<R, D>(
    rng: &mut R,
    m_hash: &[u8],
    n_bits: usize,
    salt: Option<&[u8]>,
    s_len: usize,
    em: &mut [u8],
) -> Result<()>
where
    R: CryptoRngCore + ?Sized,
    D: Digest + FixedOutputReset,
{
    let h_len = <D as Digest>::output_size();
    if m_hash.len() != h_len {
        return Err(Error::InvalidArgument);
    }
    if let Some(salt) = salt {
        if salt.len() != s_len {
            return Err(Error::InvalidArgument);
        }
    }

    let em_len = em_len(n_bits);
    if em_len < h_len + s_len + 2 || em.len() < em_len {
        return Err(Error::InvalidArgument);
    }

    let (lead, em) = em_prefix_mut(em, n_bits);
    ct::wipe(lead);

    let (db, h_and_trailer) = em.split_at_mut(em_len - h_len - 1);
    let (h, trailer) = h_and_trailer.split_at_mut(h_len);

    let zeros = em_len - s_len - h_len - 2;
    let (fixed, salt_field) = db.split_at_mut(db.len() - s_len);
    match salt {
        Some(salt) => salt_field.copy_from_slice(salt),
        None => rng.try_fill_bytes(salt_field)?,
    }
    for b in &mut fixed[..zeros] {
        *b = 0;
    }
    fixed[zeros] = 0x01;

    let mut hash = D::new();
    let prefix = [0u8; 8];
    Digest::update(&mut hash, &prefix);
    Digest::update(&mut hash, m_hash);
    Digest::update(&mut hash, &*salt_field);
    h.copy_from_slice(&Digest::finalize(hash));

    mgf1_xor_digest(db, &mut D::new(), h);
    zero_top_bits(&mut db[0], n_bits, em_len);

    trailer[0] = 0xBC;
    Ok(())
}

/// Zeroes the `8 * em_len - (n_bits - 1)` top bits of `byte`, the leading
/// byte of `maskedDB`/`DB`, per RFC 8017 step EMSA-PSS-ENCODE.9 /
/// EMSA-PSS-VERIFY.9.
fn zero_top_bits(byte: &mut u8, n_bits: usize, em_len: usize) {
    let em_bits = n_bits - 1;
    let shift = 8 * em_len - em_bits;
    if shift < 8 {
        *byte &= 0xFFu8 >> shift;
    } else {
        *byte = 0;
    }
}

/// Checks that the top bits of `byte` required to be zero by
/// [`zero_top_bits`] actually are, without mutating it.
fn top_bits_clear(byte: u8, n_bits: usize, em_len: usize) -> Choice {
    let em_bits = n_bits - 1;
    let shift = 8 * em_len - em_bits;
    let mask = if shift < 8 {
        0xFFu8.checked_shl(8 - shift as u32).unwrap_or(0)
    } else {
        0xFF
    };
    (byte & mask).ct_eq(&0)
}

/// Verifies `em` against `m_hash` under RSASSA-PSS.
///
/// `em` is consumed destructively (the mask is removed in place). `s_len` is
/// the expected salt length; callers that accept either a fixed or
/// recovered salt length should try the expected one here.
///
/// Mirrors the error taxonomy of [`crate::pkcs1v15::sign_check`] loosely,
/// but PSS has only one failure kind per spec: any structural or hash
/// mismatch is [`Error::InvalidArgument`].
pub fn verify(
    m_hash: &[u8],
    digest: &mut dyn DynDigest,
    n_bits: usize,
    s_len: usize,
    em: &mut [u8],
) -> Result<()> {
    let h_len = digest.output_size();
    if m_hash.len() != h_len {
        return Err(Error::InvalidArgument);
    }

    let em_len = em_len(n_bits);
    if em_len < h_len + s_len + 2 || em.len() < em_len {
        return Err(Error::InvalidArgument);
    }

    let (lead, em) = em_prefix_mut(em, n_bits);
    if lead.iter().any(|&b| b != 0) {
        return Err(Error::InvalidArgument);
    }

    if em[em_len - 1] != 0xBC {
        return Err(Error::InvalidArgument);
    }

    let (db, h) = em[..em_len - 1].split_at_mut(em_len - h_len - 1);
    if !bool::from(top_bits_clear(db[0], n_bits, em_len)) {
        return Err(Error::InvalidArgument);
    }

    mgf1_xor(db, digest, h)?;
    zero_top_bits(&mut db[0], n_bits, em_len);

    let zeros = em_len - s_len - h_len - 2;
    let salt_valid = ct::ct_all(db[..zeros].iter().map(|b| b.ct_eq(&0)))
        & db[zeros].ct_eq(&0x01);
    let salt = &db[db.len() - s_len..];

    let prefix = [0u8; 8];
    digest.update(&prefix);
    digest.update(m_hash);
    digest.update(salt);
    let mut h_prime = [0u8; MAX_DIGEST_LEN];
    digest
        .finalize_into_reset(&mut h_prime[..h_len])
        .or(Err(Error::InvalidArgument))?;

    if bool::from(salt_valid) && ct::ct_eq(&h_prime[..h_len], h) {
        Ok(())
    } else {
        Err(Error::InvalidArgument)
    }
}

/// Generic-digest counterpart of [`verify`].
pub fn verify_digest<D>(m_hash: &[u8], n_bits: usize, s_len: usize, em: &mut [u8]) -> Result<()>
where
    D: Digest + FixedOutputReset,
{
    let h_len = <D as Digest>::output_size();
    if m_hash.len() != h_len {
        return Err(Error::InvalidArgument);
    }

    let em_len = em_len(n_bits);
    if em_len < h_len + s_len + 2 || em.len() < em_len {
        return Err(Error::InvalidArgument);
    }

    let (lead, em) = em_prefix_mut(em, n_bits);
    if lead.iter().any(|&b| b != 0) {
        return Err(Error::InvalidArgument);
    }

    if em[em_len - 1] != 0xBC {
        return Err(Error::InvalidArgument);
    }

    let (db, h) = em[..em_len - 1].split_at_mut(em_len - h_len - 1);
    if !bool::from(top_bits_clear(db[0], n_bits, em_len)) {
        return Err(Error::InvalidArgument);
    }

    mgf1_xor_digest(db, &mut D::new(), h);
    zero_top_bits(&mut db[0], n_bits, em_len);

    let zeros = em_len - s_len - h_len - 2;
    let salt_valid = ct::ct_all(db[..zeros].iter().map(|b| b.ct_eq(&0)))
        & db[zeros].ct_eq(&0x01);
    let salt = &db[db.len() - s_len..];

    let mut hash = D::new();
    let prefix = [0u8; 8];
    Digest::update(&mut hash, &prefix);
    Digest::update(&mut hash, m_hash);
    Digest::update(&mut hash, salt);
    let h_prime = Digest::finalize(hash);

    if bool::from(salt_valid) && ct::ct_eq(&h_prime, h) {
        Ok(())
    } else {
        Err(Error::InvalidArgument)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
    use sha2::Sha256;

    // S3: SHA-256, n_bits=2048, mHash = 32 bytes of 0xAB, fixed salt = 32
    // bytes of 0xCD.
    #[test]
    fn apply_verify_roundtrip_and_trailer_tamper_detected() {
        let m_hash = [0xABu8; 32];
        let salt = [0xCDu8; 32];
        let n_bits = 2048;
        let mut em = vec![0u8; 256];
        let mut rng = ChaCha8Rng::from_seed([5; 32]);

        apply_digest::<_, Sha256>(&mut rng, &m_hash, n_bits, Some(&salt), 32, &mut em).unwrap();
        assert_eq!(*em.last().unwrap(), 0xBC);

        let mut em_ok = em.clone();
        verify_digest::<Sha256>(&m_hash, n_bits, 32, &mut em_ok).unwrap();

        let mut em_bad = em.clone();
        *em_bad.last_mut().unwrap() = 0xBD;
        assert_eq!(
            verify_digest::<Sha256>(&m_hash, n_bits, 32, &mut em_bad),
            Err(Error::InvalidArgument)
        );
    }

    // S6: n_bits = 1025 (n_bits % 8 == 1): k = 129, byte 0 must be 0x00.
    #[test]
    fn handles_top_byte_when_modulus_is_one_mod_eight() {
        let m_hash = [0x11u8; 32];
        let n_bits = 1025;
        let k = 129;
        assert_eq!(em_len(n_bits), 128);

        let mut em = vec![0u8; k];
        let mut rng = ChaCha8Rng::from_seed([6; 32]);
        apply_digest::<_, Sha256>(&mut rng, &m_hash, n_bits, None, 32, &mut em).unwrap();
        assert_eq!(em[0], 0x00);

        verify_digest::<Sha256>(&m_hash, n_bits, 32, &mut em.clone()).unwrap();

        let mut tampered = em.clone();
        tampered[0] = 0x01;
        assert_eq!(
            verify_digest::<Sha256>(&m_hash, n_bits, 32, &mut tampered),
            Err(Error::InvalidArgument)
        );
    }

    #[test]
    fn roundtrips_for_generated_salt_and_various_salt_lengths() {
        let mut rng = ChaCha8Rng::from_seed([11; 32]);
        let n_bits = 2048;
        for s_len in [0usize, 16, 32, 64] {
            let m_hash = [0x5Au8; 32];
            let mut em = vec![0u8; 256];
            apply_digest::<_, Sha256>(&mut rng, &m_hash, n_bits, None, s_len, &mut em).unwrap();
            verify_digest::<Sha256>(&m_hash, n_bits, s_len, &mut em.clone()).unwrap();
        }
    }

    #[test]
    fn apply_rejects_salt_too_long_for_modulus() {
        let mut rng = ChaCha8Rng::from_seed([12; 32]);
        let m_hash = [0u8; 32];
        let mut em = vec![0u8; 64]; // em_len=64, needs >= 32+sLen+2
        let huge_salt = vec![0u8; 64];
        assert_eq!(
            apply_digest::<_, Sha256>(&mut rng, &m_hash, 512, Some(&huge_salt), 64, &mut em),
            Err(Error::InvalidArgument)
        );
    }

    #[test]
    fn verify_rejects_wrong_hash_length() {
        let mut em = vec![0u8; 256];
        assert_eq!(
            verify_digest::<Sha256>(&[0u8; 20], 2048, 32, &mut em),
            Err(Error::InvalidArgument)
        );
    }
}
