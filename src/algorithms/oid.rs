//! DigestInfo `AlgorithmIdentifier` encodings accepted by PKCS#1 v1.5
//! signature verification.
//!
//! Each supported digest has a "long" form (with an explicit DER NULL for
//! the absent parameters) and a "short" form (parameters omitted entirely).
//! Both forms are in real-world use and signature verification must accept
//! either.

use const_oid::AssociatedOid;
use digest::Digest;

/// MD5, long form: `SEQUENCE { OID 1.2.840.113549.2.5, NULL }`.
pub const MD5_LONG: &[u8] = &[
    0x06, 0x08, 0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x02, 0x05, 0x05, 0x00,
];
/// MD5, short form: parameters omitted.
pub const MD5_SHORT: &[u8] = &[0x06, 0x08, 0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x02, 0x05];

/// SHA-1, long form.
pub const SHA1_LONG: &[u8] = &[0x06, 0x05, 0x2B, 0x0E, 0x03, 0x02, 0x1A, 0x05, 0x00];
/// SHA-1, short form.
pub const SHA1_SHORT: &[u8] = &[0x06, 0x05, 0x2B, 0x0E, 0x03, 0x02, 0x1A];

/// SHA-256, long form.
pub const SHA256_LONG: &[u8] = &[
    0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x01, 0x05, 0x00,
];
/// SHA-256, short form.
pub const SHA256_SHORT: &[u8] = &[0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x01];

/// SHA-384, long form.
pub const SHA384_LONG: &[u8] = &[
    0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x02, 0x05, 0x00,
];
/// SHA-384, short form.
pub const SHA384_SHORT: &[u8] = &[0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x02];

/// SHA-512, long form.
pub const SHA512_LONG: &[u8] = &[
    0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x03, 0x05, 0x00,
];
/// SHA-512, short form.
pub const SHA512_SHORT: &[u8] = &[0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x03];

/// Both accepted encodings for a given digest, convenient for building an
/// OID set to pass to [`crate::pkcs1v15::sign_verify`].
pub const MD5_OIDS: [&[u8]; 2] = [MD5_LONG, MD5_SHORT];
pub const SHA1_OIDS: [&[u8]; 2] = [SHA1_LONG, SHA1_SHORT];
pub const SHA256_OIDS: [&[u8]; 2] = [SHA256_LONG, SHA256_SHORT];
pub const SHA384_OIDS: [&[u8]; 2] = [SHA384_LONG, SHA384_SHORT];
pub const SHA512_OIDS: [&[u8]; 2] = [SHA512_LONG, SHA512_SHORT];

/// Upper bound on a DigestInfo `SEQUENCE { SEQUENCE { OID, NULL }, OCTET
/// STRING }` prefix (everything before the digest bytes themselves), large
/// enough for any digest in [`SHA512_LONG`] and then some.
pub(crate) const MAX_PREFIX_LEN: usize = 32;

/// A stack-allocated DigestInfo prefix, built once per signing key type.
pub(crate) type Prefix = heapless::Vec<u8, MAX_PREFIX_LEN>;

/// Builds the long-form DigestInfo prefix (everything up to, but not
/// including, the digest bytes) for a compile-time-known digest type.
///
/// Mirrors the construction in [`crate::pkcs1v15::sign_apply`], specialized
/// to a digest that carries its own OID via [`AssociatedOid`].
pub(crate) fn build_prefix<D: Digest + AssociatedOid>() -> Prefix {
    let oid = D::OID.as_bytes();
    let oid_len = oid.len() as u8;
    let digest_len = <D as Digest>::output_size() as u8;

    let mut prefix = Prefix::new();
    // SEQUENCE { SEQUENCE { OID, NULL }, OCTET STRING <digest_len> }
    let _ = prefix.extend_from_slice(&[0x30, oid_len + 8 + digest_len, 0x30, oid_len + 4, 0x06, oid_len]);
    let _ = prefix.extend_from_slice(oid);
    let _ = prefix.extend_from_slice(&[0x05, 0x00, 0x04, digest_len]);
    prefix
}
