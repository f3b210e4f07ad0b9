#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

//! Bit-exact RSA message-encoding padding schemes.
//!
//! This crate converts between raw application payloads (plaintexts, message
//! digests) and fixed-width byte blocks sized to an RSA modulus, suitable to
//! feed into an external modular-exponentiation primitive. It does not
//! generate RSA keys or perform the exponentiation itself — both are the
//! caller's responsibility, matching the division of labor in
//! [RFC 8017](https://datatracker.ietf.org/doc/html/rfc8017) between the
//! encoding operations (EME-\*, EMSA-\*) and RSAEP/RSADP/RSASP1/RSAVP1.
//!
//! # Supported schemes
//!
//! - [`pkcs1v15`] — PKCS#1 v1.5 encryption padding (`encrypt_apply` /
//!   `encrypt_remove`) and signature padding (`sign_apply` / `sign_check` /
//!   `sign_verify`).
//! - [`oaep`] — RSAES-OAEP encryption padding (`apply` / `remove`).
//! - [`pss`] — RSASSA-PSS signature padding (`apply` / `verify`).
//!
//! Each scheme is available in two forms: a `dyn DynDigest`-based entry
//! point usable when the hash algorithm is chosen at runtime, and a
//! generic, monomorphized `_digest` entry point for a compile-time-known
//! [`digest::Digest`] type. Both drive the same [`algorithms::mgf`] mask
//! generator internally.
//!
//! This crate performs no heap allocation and has no dependency on an
//! allocator; every codec writes into caller-provided buffers sized to the
//! RSA modulus (`k` bytes, or `em_len(n_bits)`/`em_len(n_bits) + 1` for PSS,
//! see [`pss::em_len`]).

#[cfg(feature = "std")]
extern crate std;

mod algorithms;
pub mod errors;
pub mod oaep;
pub mod pkcs1v15;
pub mod pss;

pub use algorithms::oid;
pub use digest;
pub use rand_core;

pub use crate::errors::{Error, Result};
