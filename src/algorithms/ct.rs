//! Constant-time primitives used by the signature-checking paths.

use subtle::{Choice, ConstantTimeEq};
use zeroize::Zeroize;

/// Compares two byte slices without early return, processing every byte
/// regardless of where a mismatch occurs.
///
/// Unequal lengths are rejected up front (that comparison is on public
/// lengths, not secret data, so it is allowed to short-circuit).
#[inline]
pub(crate) fn ct_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    bool::from(a.ct_eq(b))
}

/// Folds a sequence of per-byte `Choice`s into one, without early return.
/// Used by the padding-format checks that must accumulate several
/// independent conditions before deciding validity.
#[inline]
pub(crate) fn ct_all(choices: impl Iterator<Item = Choice>) -> Choice {
    choices.fold(Choice::from(1u8), |acc, c| acc & c)
}

/// Wipes a buffer's contents, resistant to being optimized away.
#[inline]
pub(crate) fn wipe(buf: &mut [u8]) {
    buf.zeroize();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ct_eq_rejects_different_lengths() {
        assert!(!ct_eq(&[1, 2, 3], &[1, 2]));
    }

    #[test]
    fn ct_eq_compares_contents() {
        assert!(ct_eq(&[1, 2, 3], &[1, 2, 3]));
        assert!(!ct_eq(&[1, 2, 3], &[1, 2, 4]));
    }

    #[test]
    fn wipe_zeroes_buffer() {
        let mut buf = [1u8, 2, 3, 4];
        wipe(&mut buf);
        assert_eq!(buf, [0, 0, 0, 0]);
    }
}
