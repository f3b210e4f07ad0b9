//! PKCS#1 v1.5 encryption and signature padding.
//!
//! See [RFC 8017 §7.2](https://datatracker.ietf.org/doc/html/rfc8017#section-7.2)
//! (encryption) and [§8.2](https://datatracker.ietf.org/doc/html/rfc8017#section-8.2)
//! (signatures).

use const_oid::AssociatedOid;
use digest::Digest;
use rand_core::CryptoRngCore;
use subtle::{Choice, ConstantTimeEq};

use crate::algorithms::{ct, oid};
use crate::errors::{Error, Result};

// ---------------------------------------------------------------------
// Encryption: RFC 8017 §7.2
// ---------------------------------------------------------------------

/// Fills `data` with random bytes, none of which are zero.
///
/// Not constant-time: this runs on the encrypting (trusted) side, which
/// already knows the plaintext, so there is nothing to leak by retrying a
/// zero byte.
fn non_zero_random_bytes<R: CryptoRngCore + ?Sized>(rng: &mut R, data: &mut [u8]) -> Result<()> {
    rng.try_fill_bytes(data)?;
    for byte in data.iter_mut() {
        while *byte == 0 {
            let mut one = [0u8];
            rng.try_fill_bytes(&mut one)?;
            *byte = one[0];
        }
    }
    Ok(())
}

/// Applies PKCS#1 v1.5 encryption padding: `EM = 0x00 || 0x02 || PS || 0x00 || M`.
///
/// `em.len()` is `k`, the RSA modulus size in bytes. `msg.len() + 11` must
/// not exceed `k`.
pub fn encrypt_apply<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    msg: &[u8],
    em: &mut [u8],
) -> Result<()> {
    let k = em.len();
    if msg.len() + 11 > k {
        return Err(Error::InvalidArgument);
    }

    em[0] = 0x00;
    em[1] = 0x02;
    non_zero_random_bytes(rng, &mut em[2..k - msg.len() - 1])?;
    em[k - msg.len() - 1] = 0x00;
    em[k - msg.len()..].copy_from_slice(msg);
    Ok(())
}

/// Removes PKCS#1 v1.5 encryption padding from `em`, recovering the
/// plaintext `M`.
///
/// If `out` is `None`, returns the plaintext length without copying
/// anything (used by callers to size their own buffer first). If `out` is
/// `Some` but shorter than the recovered plaintext,
/// [`Error::BufferTooSmall`] is returned with the required length.
///
/// The format-byte checks (`EM[0] == 0x00`, `EM[1] == 0x02`, the "a zero
/// delimiter exists") are accumulated into one validity bit without early
/// return. The scan for the delimiter itself stops at the first zero byte
/// found, which is intentional: a fully branchless scan does not, by
/// itself, close a Bleichenbacher-style padding oracle — that requires
/// protocol-level mitigations, not a slower scan.
pub fn encrypt_remove(em: &[u8], out: Option<&mut [u8]>) -> Result<usize> {
    let k = em.len();
    if k < 2 {
        return Err(Error::InvalidArgument);
    }

    let mut ok = em[0].ct_eq(&0x00) & em[1].ct_eq(&0x02);

    let mut delimiter = None;
    for (i, &byte) in em.iter().enumerate().skip(2) {
        if byte == 0x00 {
            delimiter = Some(i);
            break;
        }
    }
    ok &= Choice::from(delimiter.is_some() as u8);

    if !bool::from(ok) {
        return Err(Error::InvalidArgument);
    }
    // `ok` guarantees `delimiter` is `Some` at this point.
    let i = delimiter.expect("validity bit guarantees a delimiter was found");
    let plaintext_len = k - i - 1;

    match out {
        None => Ok(plaintext_len),
        Some(out) => {
            if out.len() < plaintext_len {
                return Err(Error::BufferTooSmall {
                    needed: plaintext_len,
                });
            }
            out[..plaintext_len].copy_from_slice(&em[i + 1..]);
            Ok(plaintext_len)
        }
    }
}

// ---------------------------------------------------------------------
// Signatures: RFC 8017 §8.2 (EMSA-PKCS1-v1_5)
// ---------------------------------------------------------------------

/// Flags accepted by [`sign_apply`] and [`sign_check`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ApplyFlags(u32);

impl ApplyFlags {
    /// No flags set: wrap the digest in a DigestInfo (or the bare
    /// length-prefixed form if no OID is given).
    pub const NONE: Self = Self(0);
    /// Skip the DigestInfo/ASN.1 wrapping entirely; `T` is the digest bytes
    /// as-is.
    pub const NO_ASN1: Self = Self(1 << 0);

    fn contains(self, bit: Self) -> bool {
        self.0 & bit.0 == bit.0
    }

    fn is_valid(self) -> bool {
        self.0 & !Self::NO_ASN1.0 == 0
    }
}

impl core::ops::BitOr for ApplyFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Flags accepted by [`sign_verify`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VerifyFlags(u32);

impl VerifyFlags {
    /// No flags set.
    pub const NONE: Self = Self(0);
    /// If every OID in the set fails to verify (or the set is empty), retry
    /// once against the bare (non-ASN.1) encoding.
    pub const OPTIONAL_HASH_OID: Self = Self(1 << 0);

    fn contains(self, bit: Self) -> bool {
        self.0 & bit.0 == bit.0
    }

    fn is_valid(self) -> bool {
        self.0 & !Self::OPTIONAL_HASH_OID.0 == 0
    }
}

/// Upper bound on `T` (the DigestInfo or bare-digest payload) this crate
/// will construct: 6 header bytes, the largest OID table entry in
/// [`crate::algorithms::oid`], and SHA-512's 64-byte digest.
const MAX_T_LEN: usize = 6 + 32 + 64;

/// Builds `T` (the payload wrapped by `PS` in the signature EM) into
/// `t_buf`, returning the slice actually used.
fn build_t<'a>(
    hashed: &[u8],
    oid: Option<&[u8]>,
    flags: ApplyFlags,
    t_buf: &'a mut [u8; MAX_T_LEN],
) -> Result<&'a [u8]> {
    if flags.contains(ApplyFlags::NO_ASN1) {
        let t_len = hashed.len();
        t_buf[..t_len].copy_from_slice(hashed);
        return Ok(&t_buf[..t_len]);
    }

    match oid {
        Some(oid) if !oid.is_empty() => {
            let o_len = oid.len();
            let h_len = hashed.len();
            let t_len = 6 + o_len + h_len;
            if t_len > MAX_T_LEN || o_len > 0xFF || h_len > 0xFF {
                return Err(Error::InvalidArgument);
            }
            let buf = &mut t_buf[..t_len];
            buf[0] = 0x30;
            buf[1] = (t_len - 2) as u8;
            buf[2] = 0x30;
            buf[3] = o_len as u8;
            buf[4..4 + o_len].copy_from_slice(oid);
            buf[4 + o_len] = 0x04;
            buf[5 + o_len] = h_len as u8;
            buf[6 + o_len..].copy_from_slice(hashed);
            Ok(buf)
        }
        Some(_empty_oid) => Err(Error::InvalidArgument),
        None => {
            // Historical "MD5 special case": T = 0x04 <hLen> <hash>.
            let h_len = hashed.len();
            let t_len = 2 + h_len;
            let buf = &mut t_buf[..t_len];
            buf[0] = 0x04;
            buf[1] = h_len as u8;
            buf[2..].copy_from_slice(hashed);
            Ok(buf)
        }
    }
}

/// Applies PKCS#1 v1.5 signature padding:
/// `EM = 0x00 || 0x01 || PS || 0x00 || T`, `PS` all `0xFF`, `|PS| >= 8`.
///
/// `oid` is the DigestInfo `AlgorithmIdentifier` encoding (see
/// [`crate::algorithms::oid`]) already including its own tag/length prefix
/// and, for the "long form", its trailing `NULL` parameters. Pass `None`
/// to use the historical bare `0x04 <len> <hash>` form, or set
/// [`ApplyFlags::NO_ASN1`] to skip wrapping entirely.
pub fn sign_apply(hashed: &[u8], oid: Option<&[u8]>, flags: ApplyFlags, em: &mut [u8]) -> Result<()> {
    if !flags.is_valid() {
        return Err(Error::InvalidArgument);
    }

    let mut t_buf = [0u8; MAX_T_LEN];
    let t = build_t(hashed, oid, flags, &mut t_buf)?;
    let t_len = t.len();

    let k = em.len();
    if t_len > 0x80 || k < 3 + 8 + t_len {
        return Err(Error::InvalidArgument);
    }

    let ps_len = k - t_len - 3;
    em[0] = 0x00;
    em[1] = 0x01;
    em[2..2 + ps_len].fill(0xFF);
    em[2 + ps_len] = 0x00;
    em[3 + ps_len..].copy_from_slice(t);
    Ok(())
}

/// Generic-digest counterpart of [`sign_apply`], monomorphized over a
/// compile-time-known hash that carries its own OID via
/// [`const_oid::AssociatedOid`] (as the `sha1`/`sha2` crates' digest types
/// do), instead of taking the DigestInfo OID as a runtime `&[u8]`.
///
/// Builds the DigestInfo prefix via [`crate::algorithms::oid::build_prefix`]
/// rather than [`build_t`]'s runtime OID handling; the rest of the layout —
/// `EM = 0x00 || 0x01 || PS || 0x00 || T`, `PS` all `0xFF`, `|PS| >= 8` — is
/// identical. [`ApplyFlags::NO_ASN1`] still skips the wrapping entirely,
/// same as [`sign_apply`].
pub fn sign_apply_digest<D: Digest + AssociatedOid>(
    hashed: &[u8],
    flags: ApplyFlags,
    em: &mut [u8],
) -> Result<()> {
    if !flags.is_valid() {
        return Err(Error::InvalidArgument);
    }
    if hashed.len() != <D as Digest>::output_size() {
        return Err(Error::InvalidArgument);
    }

    let mut t_buf = [0u8; MAX_T_LEN];
    let t_len = if flags.contains(ApplyFlags::NO_ASN1) {
        t_buf[..hashed.len()].copy_from_slice(hashed);
        hashed.len()
    } else {
        let prefix = oid::build_prefix::<D>();
        let t_len = prefix.len() + hashed.len();
        if t_len > MAX_T_LEN {
            return Err(Error::InvalidArgument);
        }
        t_buf[..prefix.len()].copy_from_slice(&prefix);
        t_buf[prefix.len()..t_len].copy_from_slice(hashed);
        t_len
    };
    let t = &t_buf[..t_len];

    let k = em.len();
    if t_len > 0x80 || k < 3 + 8 + t_len {
        return Err(Error::InvalidArgument);
    }

    let ps_len = k - t_len - 3;
    em[0] = 0x00;
    em[1] = 0x01;
    em[2..2 + ps_len].fill(0xFF);
    em[2 + ps_len] = 0x00;
    em[3 + ps_len..].copy_from_slice(t);
    Ok(())
}

/// Checks `em` against the encoding PKCS#1 v1.5 signature padding would
/// have produced for `hashed`/`oid`/`flags`, in constant time.
///
/// `scratch` must be exactly `em.len()` bytes; it is used to rebuild the
/// expected encoding for comparison and is wiped before use.
pub fn sign_check(
    hashed: &[u8],
    oid: Option<&[u8]>,
    flags: ApplyFlags,
    em: &[u8],
    scratch: &mut [u8],
) -> Result<()> {
    if scratch.len() != em.len() {
        return Err(Error::InvalidArgument);
    }
    ct::wipe(scratch);
    sign_apply(hashed, oid, flags, scratch)?;

    if ct::ct_eq(scratch, em) {
        Ok(())
    } else {
        Err(Error::SignatureVerificationFailure)
    }
}

/// Verifies `em` against `hashed` for any OID in `oids`, in the order
/// given, stopping at the first match.
///
/// If `oids` is empty, or every entry fails and
/// [`VerifyFlags::OPTIONAL_HASH_OID`] is set, retries once against the
/// bare (`NO_ASN1`) encoding. The returned result is always that of the
/// last attempt made.
pub fn sign_verify(
    hashed: &[u8],
    oids: &[&[u8]],
    flags: VerifyFlags,
    em: &[u8],
    scratch: &mut [u8],
) -> Result<()> {
    if !flags.is_valid() {
        return Err(Error::InvalidArgument);
    }

    let mut last = Err(Error::SignatureVerificationFailure);
    for &oid in oids {
        last = sign_check(hashed, Some(oid), ApplyFlags::NONE, em, scratch);
        if last.is_ok() {
            return last;
        }
    }

    if oids.is_empty() || (last.is_err() && flags.contains(VerifyFlags::OPTIONAL_HASH_OID)) {
        last = sign_check(hashed, None, ApplyFlags::NO_ASN1, em, scratch);
    }
    last
}
