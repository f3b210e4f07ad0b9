//! MGF1 mask generation function, shared by OAEP and PSS.
//!
//! See [RFC 8017 Appendix B.2.1](https://datatracker.ietf.org/doc/html/rfc8017#appendix-B.2.1).

use digest::{Digest, DynDigest, FixedOutputReset};

use crate::errors::{Error, Result};

/// Largest digest output length this crate supports (SHA-512's 64 bytes).
/// Bounds the stack buffer MGF1 reuses across counter iterations.
pub(crate) const MAX_HASH_LEN: usize = 64;

/// XORs `MGF1(seed, out.len())` into `out`, using a caller-selected
/// trait-object digest.
///
/// Resets `digest` between calls and leaves it reset on return. Fails with
/// [`Error::InvalidArgument`] if `digest` is a misbehaving `DynDigest` whose
/// `finalize_into_reset` rejects a buffer sized to its own
/// `output_size()` — this can only happen if the trait object's
/// implementation is inconsistent with itself, but since it's reachable
/// through a caller-supplied trait object rather than a type this crate
/// controls, it is reported rather than treated as an invariant.
pub(crate) fn mgf1_xor(out: &mut [u8], digest: &mut dyn DynDigest, seed: &[u8]) -> Result<()> {
    let h_len = digest.output_size();
    let mut block = [0u8; MAX_HASH_LEN];
    let mut counter: u32 = 0;
    let mut written = 0;

    while written < out.len() {
        digest.update(seed);
        digest.update(&counter.to_be_bytes());
        digest
            .finalize_into_reset(&mut block[..h_len])
            .or(Err(Error::InvalidArgument))?;

        let take = core::cmp::min(h_len, out.len() - written);
        for (o, m) in out[written..written + take].iter_mut().zip(&block[..take]) {
            *o ^= m;
        }
        written += take;
        counter += 1;
    }
    Ok(())
}

/// XORs `MGF1(seed, out.len())` into `out`, using a compile-time-known
/// digest type. Equivalent to [`mgf1_xor`] but monomorphized, avoiding the
/// vtable indirection when the hash is statically known.
pub(crate) fn mgf1_xor_digest<D: Digest + FixedOutputReset>(
    out: &mut [u8],
    digest: &mut D,
    seed: &[u8],
) {
    let h_len = <D as Digest>::output_size();
    let mut counter: u32 = 0;
    let mut written = 0;

    while written < out.len() {
        Digest::update(digest, seed);
        Digest::update(digest, &counter.to_be_bytes());
        let block = Digest::finalize_reset(digest);

        let take = core::cmp::min(h_len, out.len() - written);
        for (o, m) in out[written..written + take]
            .iter_mut()
            .zip(block.iter().take(take))
        {
            *o ^= m;
        }
        written += take;
        counter += 1;
    }
}
