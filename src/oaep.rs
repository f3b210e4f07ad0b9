//! RSAES-OAEP encryption padding.
//!
//! See [RFC 8017 §7.1](https://datatracker.ietf.org/doc/html/rfc8017#section-7.1).

use digest::{Digest, DynDigest, FixedOutputReset};
use rand_core::CryptoRngCore;

use crate::algorithms::ct;
use crate::algorithms::mgf::{mgf1_xor, mgf1_xor_digest, MAX_HASH_LEN};
use crate::errors::{Error, Result};

/// Label hashes longer than this don't fit the stack scratch this module
/// uses to recover them during [`remove`]/[`remove_digest`].
const MAX_HASH_LEN_OAEP: usize = MAX_HASH_LEN;

/// Applies OAEP encryption padding: `EM = 0x00 || maskedSeed || maskedDB`.
///
/// `em.len()` is `k`; `digest` hashes the label and `mgf_digest` drives
/// MGF1 (they need not be the same hash, matching e.g. Android Keystore's
/// SHA-1-for-MGF1 convention). `seed`, if given, must be no longer than
/// `digest`'s output length; a shorter seed is left-justified into the
/// `hLen`-byte seed field. If `seed` is `None`, one is drawn from `rng`.
#[allow(clippy::too_many_arguments)]
pub fn apply<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    msg: &[u8],
    digest: &mut dyn DynDigest,
    mgf_digest: &mut dyn DynDigest,
    label: &[u8],
    seed: Option<&[u8]>,
    em: &mut [u8],
) -> Result<()> {
    let h_len = digest.output_size();
    let k = em.len();
    if msg.len() + 2 * h_len + 2 > k {
        return Err(Error::InvalidArgument);
    }
    if let Some(seed) = seed {
        if seed.len() > h_len {
            return Err(Error::InvalidArgument);
        }
    }

    digest.update(label);
    let mut p_hash = [0u8; MAX_HASH_LEN_OAEP];
    digest
        .finalize_into_reset(&mut p_hash[..h_len])
        .or(Err(Error::InvalidArgument))?;

    em[0] = 0x00;
    let (seed_field, db) = em[1..].split_at_mut(h_len);
    ct::wipe(seed_field);
    match seed {
        Some(seed) => seed_field[..seed.len()].copy_from_slice(seed),
        None => rng.try_fill_bytes(seed_field)?,
    }

    // DB = lHash || PS || 0x01 || M
    let db_len = db.len();
    db[..h_len].copy_from_slice(&p_hash[..h_len]);
    for b in &mut db[h_len..db_len - msg.len() - 1] {
        *b = 0;
    }
    db[db_len - msg.len() - 1] = 0x01;
    db[db_len - msg.len()..].copy_from_slice(msg);

    mgf1_xor(db, mgf_digest, seed_field)?;
    mgf1_xor(seed_field, mgf_digest, db)?;
    Ok(())
}

/// Generic-digest counterpart of [`apply`], monomorphized over a
/// compile-time-known hash and MGF1 digest.
pub fn apply_digest<R, D, MGD>(
    rng: &mut R,
    msg: &[u8],
    label: &[u8],
    seed: Option<&[u8]>,
    em: &mut [u8],
) -> Result<()>
where
    R: CryptoRngCore + ?Sized,
    D: Digest,
    MGD: Digest + FixedOutputReset,
{
    let h_len = <D as Digest>::output_size();
    let k = em.len();
    if msg.len() + 2 * h_len + 2 > k {
        return Err(Error::InvalidArgument);
    }
    if let Some(seed) = seed {
        if seed.len() > h_len {
            return Err(Error::InvalidArgument);
        }
    }

    let p_hash = D::digest(label);

    em[0] = 0x00;
    let (seed_field, db) = em[1..].split_at_mut(h_len);
    ct::wipe(seed_field);
    match seed {
        Some(seed) => seed_field[..seed.len()].copy_from_slice(seed),
        None => rng.try_fill_bytes(seed_field)?,
    }

    let db_len = db.len();
    db[..h_len].copy_from_slice(&p_hash);
    for b in &mut db[h_len..db_len - msg.len() - 1] {
        *b = 0;
    }
    db[db_len - msg.len() - 1] = 0x01;
    db[db_len - msg.len()..].copy_from_slice(msg);

    mgf1_xor_digest(db, &mut MGD::new(), seed_field);
    mgf1_xor_digest(seed_field, &mut MGD::new(), db);
    Ok(())
}

/// Removes OAEP encryption padding from `em`, recovering the plaintext `M`.
///
/// Unlike [`apply`], this consumes `em` destructively: the seed and data
/// block are unmasked in place, the same in-place technique `apply` uses,
/// rather than copied into a separate scratch region.
///
/// Mirrors [`crate::pkcs1v15::encrypt_remove`]'s `out` convention:
/// `None` returns the required length, `Some` too-small returns
/// [`Error::BufferTooSmall`].
///
/// Not fully constant-time: a label-hash mismatch and a missing `0x01`
/// separator both return early, matching the documented behavior of the
/// scheme this is modeled on. Defending against a Manger-style oracle is a
/// protocol-level concern layered on top of this codec, not something a
/// branchless parse alone can provide.
pub fn remove(
    digest: &mut dyn DynDigest,
    mgf_digest: &mut dyn DynDigest,
    em: &mut [u8],
    label: &[u8],
    out: Option<&mut [u8]>,
) -> Result<usize> {
    let h_len = digest.output_size();
    let k = em.len();
    if k < 2 * h_len + 2 || em[0] != 0x00 {
        return Err(Error::InvalidArgument);
    }

    let (_, payload) = em.split_at_mut(1);
    let (seed, db) = payload.split_at_mut(h_len);

    mgf1_xor(seed, mgf_digest, db)?;
    mgf1_xor(db, mgf_digest, seed)?;

    digest.update(label);
    let mut l_hash = [0u8; MAX_HASH_LEN_OAEP];
    digest
        .finalize_into_reset(&mut l_hash[..h_len])
        .or(Err(Error::InvalidArgument))?;

    if !ct::ct_eq(&db[..h_len], &l_hash[..h_len]) {
        return Err(Error::InvalidArgument);
    }

    extract_message(&db[h_len..], out)
}

/// Generic-digest counterpart of [`remove`].
pub fn remove_digest<D, MGD>(em: &mut [u8], label: &[u8], out: Option<&mut [u8]>) -> Result<usize>
where
    D: Digest,
    MGD: Digest + FixedOutputReset,
{
    let h_len = <D as Digest>::output_size();
    let k = em.len();
    if k < 2 * h_len + 2 || em[0] != 0x00 {
        return Err(Error::InvalidArgument);
    }

    let (_, payload) = em.split_at_mut(1);
    let (seed, db) = payload.split_at_mut(h_len);

    mgf1_xor_digest(seed, &mut MGD::new(), db);
    mgf1_xor_digest(db, &mut MGD::new(), seed);

    let l_hash = D::digest(label);
    if !ct::ct_eq(&db[..h_len], &l_hash) {
        return Err(Error::InvalidArgument);
    }

    extract_message(&db[h_len..], out)
}

/// Scans `PS || 0x01 || M` for the `0x01` separator and hands back `M`,
/// honoring the same `out`-buffer contract as the other `remove`s.
fn extract_message(ps_and_message: &[u8], out: Option<&mut [u8]>) -> Result<usize> {
    let mut separator = None;
    for (i, &b) in ps_and_message.iter().enumerate() {
        match b {
            0x00 => continue,
            0x01 => {
                separator = Some(i);
                break;
            }
            _ => return Err(Error::InvalidArgument),
        }
    }
    let i = separator.ok_or(Error::InvalidArgument)?;
    let msg = &ps_and_message[i + 1..];

    match out {
        None => Ok(msg.len()),
        Some(out) => {
            if out.len() < msg.len() {
                return Err(Error::BufferTooSmall { needed: msg.len() });
            }
            out[..msg.len()].copy_from_slice(msg);
            Ok(msg.len())
        }
    }
}
