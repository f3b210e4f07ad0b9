//! Black-box integration tests against the literal scenarios and round-trip
//! laws enumerated in this crate's design notes (S1-S6), run through the
//! public API only.

use hex_literal::hex;
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
use rsa_padding_core::errors::Error;
use rsa_padding_core::{oaep, oid, pkcs1v15, pss};
use sha1::Sha1;
use sha2::Sha256;

// S1: PKCS#1 v1.5 encryption, k=16, M = 01 02 03 04 05, fixed random PS.
#[test]
fn s1_pkcs1_encrypt_literal_scenario() {
    struct FixedRng(&'static [u8]);
    impl rand_core::RngCore for FixedRng {
        fn next_u32(&mut self) -> u32 {
            unimplemented!()
        }
        fn next_u64(&mut self) -> u64 {
            unimplemented!()
        }
        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.copy_from_slice(&self.0[..dest.len()]);
            self.0 = &self.0[dest.len()..];
        }
        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }
    impl rand_core::CryptoRng for FixedRng {}

    let mut rng = FixedRng(&hex!("AABBCCDDEEFF1122"));
    let msg = hex!("0102030405");
    let mut em = [0u8; 16];
    pkcs1v15::encrypt_apply(&mut rng, &msg, &mut em).unwrap();
    assert_eq!(em, hex!("0002AABBCCDDEEFF1122000102030405"));

    let len = pkcs1v15::encrypt_remove(&em, None).unwrap();
    assert_eq!(len, msg.len());
}

// S2: PKCS#1 v1.5 signature, SHA-256, k=256, 32 zero-byte digest.
#[test]
fn s2_pkcs1_sign_literal_scenario() {
    let hashed = [0u8; 32];
    let mut em = [0u8; 256];
    pkcs1v15::sign_apply(
        &hashed,
        Some(oid::SHA256_LONG),
        pkcs1v15::ApplyFlags::NONE,
        &mut em,
    )
    .unwrap();

    assert_eq!(em[0], 0x00);
    assert_eq!(em[1], 0x01);
    let ps_len = em.iter().skip(2).take_while(|&&b| b == 0xFF).count();
    assert_eq!(ps_len, 202);
    assert_eq!(em.len(), 256);

    let mut scratch = [0u8; 256];
    pkcs1v15::sign_check(
        &hashed,
        Some(oid::SHA256_LONG),
        pkcs1v15::ApplyFlags::NONE,
        &em,
        &mut scratch,
    )
    .unwrap();
    pkcs1v15::sign_verify(
        &hashed,
        &oid::SHA256_OIDS,
        pkcs1v15::VerifyFlags::NONE,
        &em,
        &mut scratch,
    )
    .unwrap();
}

// S3: PSS, SHA-256, n_bits=2048, mHash/salt fixed; trailer tamper detected.
#[test]
fn s3_pss_literal_scenario() {
    let m_hash = [0xABu8; 32];
    let salt = [0xCDu8; 32];
    let mut em = [0u8; 256];
    let mut rng = ChaCha8Rng::from_seed([0; 32]);

    pss::apply_digest::<_, Sha256>(&mut rng, &m_hash, 2048, Some(&salt), 32, &mut em).unwrap();
    pss::verify_digest::<Sha256>(&m_hash, 2048, 32, &mut em.clone()).unwrap();

    let mut tampered = em;
    *tampered.last_mut().unwrap() = 0xBD;
    assert_eq!(
        pss::verify_digest::<Sha256>(&m_hash, 2048, 32, &mut tampered),
        Err(Error::InvalidArgument)
    );
}

// S4: OAEP, SHA-1, k=128, empty label, M = "Hello", fixed all-zero seed.
#[test]
fn s4_oaep_literal_scenario() {
    let seed = [0u8; 20];
    let msg = b"Hello";
    let mut em = [0u8; 128];
    let mut rng = ChaCha8Rng::from_seed([1; 32]);

    oaep::apply_digest::<_, Sha1, Sha1>(&mut rng, msg, b"", Some(&seed), &mut em).unwrap();
    assert_eq!(em[0], 0x00);

    let mut em_copy = em;
    let mut out = [0u8; 5];
    let len = oaep::remove_digest::<Sha1, Sha1>(&mut em, b"", Some(&mut out)).unwrap();
    assert_eq!(&out[..len], msg);

    assert_eq!(
        oaep::remove_digest::<Sha1, Sha1>(&mut em_copy, b"some other label", None),
        Err(Error::InvalidArgument)
    );
}

// S5: MGF1 is exercised directly in `algorithms::mgf`'s unit tests (private
// module); here it's exercised indirectly through an OAEP round-trip with a
// message exactly at the maximum length for k=128/hLen=20.
#[test]
fn s5_oaep_roundtrips_at_maximum_message_length() {
    let k = 128;
    let h_len = 20;
    let max_msg_len = k - 2 * h_len - 2;
    let msg = vec![0x42u8; max_msg_len];
    let mut em = vec![0u8; k];
    let mut rng = ChaCha8Rng::from_seed([2; 32]);

    oaep::apply_digest::<_, Sha1, Sha1>(&mut rng, &msg, b"", None, &mut em).unwrap();
    let mut out = vec![0u8; max_msg_len];
    let len = oaep::remove_digest::<Sha1, Sha1>(&mut em, b"", Some(&mut out)).unwrap();
    assert_eq!(len, max_msg_len);
    assert_eq!(out, msg);
}

// S6: PSS, n_bits = 1025 (n_bits % 8 == 1): k = 129, byte 0 must be 0x00.
#[test]
fn s6_pss_one_mod_eight_modulus() {
    let m_hash = [0x11u8; 32];
    let n_bits = 1025;
    assert_eq!(pss::em_len(n_bits), 128);

    let mut em = vec![0u8; 129];
    let mut rng = ChaCha8Rng::from_seed([3; 32]);
    pss::apply_digest::<_, Sha256>(&mut rng, &m_hash, n_bits, None, 32, &mut em).unwrap();
    assert_eq!(em[0], 0x00);

    pss::verify_digest::<Sha256>(&m_hash, n_bits, 32, &mut em.clone()).unwrap();

    let mut tampered = em;
    tampered[0] = 0xFF;
    assert_eq!(
        pss::verify_digest::<Sha256>(&m_hash, n_bits, 32, &mut tampered),
        Err(Error::InvalidArgument)
    );
}

#[test]
fn pkcs1_signature_accepts_short_and_long_oid_forms() {
    let hashed = [0x9Au8; 32];
    let mut em = vec![0u8; 256];
    let mut scratch = vec![0u8; 256];

    for &oid_bytes in &oid::SHA256_OIDS {
        pkcs1v15::sign_apply(
            &hashed,
            Some(oid_bytes),
            pkcs1v15::ApplyFlags::NONE,
            &mut em,
        )
        .unwrap();
        pkcs1v15::sign_verify(
            &hashed,
            &oid::SHA256_OIDS,
            pkcs1v15::VerifyFlags::NONE,
            &em,
            &mut scratch,
        )
        .unwrap();
    }
}

#[test]
fn pkcs1_signature_check_rejects_mismatched_oid() {
    let hashed = [0x01u8; 20];
    let mut em = vec![0u8; 128];
    let mut scratch = vec![0u8; 128];
    pkcs1v15::sign_apply(&hashed, Some(oid::SHA1_LONG), pkcs1v15::ApplyFlags::NONE, &mut em)
        .unwrap();

    assert_eq!(
        pkcs1v15::sign_check(
            &hashed,
            Some(oid::MD5_LONG),
            pkcs1v15::ApplyFlags::NONE,
            &em,
            &mut scratch,
        ),
        Err(Error::SignatureVerificationFailure)
    );
}
