//! Property-based tests for the privacy primitives
//!
//! These tests use proptest to check that the core laws hold for arbitrary inputs.
//! Properties tested:
//! - Stealth correctness: the recipient always recovers a key for P
//! - Unlinkability: two payments to one meta-address never share P or R
//! - Wrong recipient rejection: other key sets never match
//! - Commitment homomorphism and deterministic verification
//! - Threshold correctness: any t shares reconstruct, t-1 do not
//! - Encryption round-trip and tamper detection
//! - Meta-address string round-trip

#[cfg(test)]
mod property_tests {
    use proptest::prelude::*;

    use crate::commitment::{add_commitments, blinding_sum, commit, verify_opening, MAX_AMOUNT};
    use crate::curve::{hash_to_scalar, Curve, Scalar};
    use crate::error::{DecryptError, ThresholdError};
    use crate::secret::SecretScalar;
    use crate::stealth::{derive_stealth_address_with, recover_stealth_key, StealthKeys, StealthMetaAddress};
    use crate::viewing::{
        decrypt_with_viewing, encrypt_for_viewing, generate_viewing_keypair, reconstruct_key, split_key,
        EncryptedPayload,
    };

    fn any_curve() -> impl Strategy<Value = Curve> {
        prop_oneof![Just(Curve::Secp256k1), Just(Curve::Ed25519)]
    }

    // Uniform scalars come from hashing arbitrary seed bytes
    fn nonzero_scalar(curve: Curve) -> impl Strategy<Value = Scalar> {
        prop::array::uniform32(any::<u8>())
            .prop_map(move |seed| hash_to_scalar(curve, &seed))
            .prop_filter("non-zero scalar", |s| !s.is_zero())
    }

    fn curve_and_scalars() -> impl Strategy<Value = (Curve, Scalar, Scalar)> {
        any_curve().prop_flat_map(|curve| (Just(curve), nonzero_scalar(curve), nonzero_scalar(curve)))
    }

    fn keys_from(curve: Curve, spending: &Scalar, viewing: &Scalar) -> StealthKeys {
        StealthKeys::from_secrets(curve, &spending.to_bytes(), &viewing.to_bytes()).unwrap()
    }

    // (threshold, total, indices of a threshold-sized subset)
    fn threshold_params() -> impl Strategy<Value = (u8, u8, Vec<usize>)> {
        (1u8..=5, 0u8..=3).prop_flat_map(|(threshold, extra)| {
            let total = threshold + extra;
            let indices: Vec<usize> = (0..total as usize).collect();
            (
                Just(threshold),
                Just(total),
                prop::sample::subsequence(indices, threshold as usize).prop_shuffle(),
            )
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Property: Stealth Correctness
        /// The recipient recovers p with p·G = P for every ephemeral scalar.
        #[test]
        fn prop_stealth_correctness(
            (curve, spending, viewing) in curve_and_scalars(),
            seed in prop::array::uniform32(any::<u8>()),
        ) {
            let r = hash_to_scalar(curve, &seed);
            prop_assume!(!r.is_zero());

            let keys = keys_from(curve, &spending, &viewing);
            let meta = keys.meta_address("chain").unwrap();
            let stealth = derive_stealth_address_with(&meta, &r).unwrap();

            let p = recover_stealth_key(&keys, &stealth).unwrap();
            prop_assert!(p.is_some(), "Recipient should detect their payment");
            prop_assert_eq!(&p.unwrap().public_point(), stealth.stealth_public_key());
        }

        /// Property: Unlinkability
        /// Distinct ephemeral scalars give distinct stealth and ephemeral keys.
        #[test]
        fn prop_unlinkability(
            (curve, spending, viewing) in curve_and_scalars(),
            (r1, r2) in (prop::array::uniform32(any::<u8>()), prop::array::uniform32(any::<u8>())),
        ) {
            prop_assume!(r1 != r2);
            let r1 = hash_to_scalar(curve, &r1);
            let r2 = hash_to_scalar(curve, &r2);

            let meta = keys_from(curve, &spending, &viewing).meta_address("chain").unwrap();
            let a = derive_stealth_address_with(&meta, &r1).unwrap();
            let b = derive_stealth_address_with(&meta, &r2).unwrap();

            prop_assert_ne!(a.stealth_public_key(), b.stealth_public_key());
            prop_assert_ne!(a.ephemeral_public_key(), b.ephemeral_public_key());
        }

        /// Property: Wrong Recipient Rejection
        #[test]
        fn prop_wrong_recipient_rejection(
            (curve, spending, viewing) in curve_and_scalars(),
            seed in prop::array::uniform32(any::<u8>()),
        ) {
            let alice = keys_from(curve, &spending, &viewing);
            let bob = StealthKeys::generate(curve);
            let r = hash_to_scalar(curve, &seed);
            prop_assume!(!r.is_zero());

            let stealth = derive_stealth_address_with(&alice.meta_address("chain").unwrap(), &r).unwrap();
            prop_assert!(recover_stealth_key(&bob, &stealth).unwrap().is_none());
        }

        /// Property: Additive Homomorphism
        /// C(v1, r1) + C(v2, r2) = C(v1 + v2, r1 + r2)
        #[test]
        fn prop_commitment_homomorphism(
            (curve, r1, r2) in curve_and_scalars(),
            v1 in 0u128..=(MAX_AMOUNT / 2),
            v2 in 0u128..=(MAX_AMOUNT / 2),
        ) {
            let r_sum = blinding_sum(&r1, &r2).unwrap();
            prop_assume!(!r_sum.is_zero());

            let (c1, _) = commit(curve, v1, Some(&r1)).unwrap();
            let (c2, _) = commit(curve, v2, Some(&r2)).unwrap();
            let (c_sum, _) = commit(curve, v1 + v2, Some(&r_sum)).unwrap();

            prop_assert_eq!(add_commitments(&c1, &c2).unwrap(), c_sum);
            prop_assert!(verify_opening(&c_sum, v1 + v2, &r_sum));
        }

        /// Property: Verification Is Deterministic
        #[test]
        fn prop_verify_idempotent(
            (curve, r, other) in curve_and_scalars(),
            value in any::<u64>(),
        ) {
            let (c, _) = commit(curve, value as u128, Some(&r)).unwrap();
            for _ in 0..2 {
                prop_assert!(verify_opening(&c, value as u128, &r));
                prop_assert_eq!(verify_opening(&c, value as u128, &other), r == other);
            }
        }

        /// Property: Threshold Correctness
        /// Any t of n shares reconstruct the key; t-1 shares are insufficient.
        #[test]
        fn prop_threshold_any_subset(
            (curve, key, _) in curve_and_scalars(),
            (threshold, total, subset) in threshold_params(),
        ) {
            let key = SecretScalar::from_scalar(&key);
            let shares = split_key(&key, threshold, total).unwrap().into_shares();
            let chosen: Vec<_> = subset.iter().map(|&i| shares[i].clone()).collect();

            let recovered = reconstruct_key(&chosen).unwrap();
            prop_assert_eq!(&recovered, &key);
            prop_assert_eq!(recovered.curve(), curve);

            if threshold > 1 {
                let short = &chosen[..threshold as usize - 1];
                prop_assert_eq!(
                    reconstruct_key(short).unwrap_err(),
                    ThresholdError::InsufficientShares {
                        required: threshold,
                        provided: threshold as usize - 1,
                    }
                );
            }
        }

        /// Property: Encryption Round-Trip and Tamper Detection
        /// Flipping any single bit of the sealed body makes decryption fail.
        #[test]
        fn prop_encryption_roundtrip_and_tamper(
            curve in any_curve(),
            plaintext in prop::collection::vec(any::<u8>(), 0..512),
            flip in any::<prop::sample::Index>(),
            bit in 0u8..8,
        ) {
            let pair = generate_viewing_keypair(curve);
            let payload = encrypt_for_viewing(&plaintext, pair.public_key()).unwrap();

            let opened = decrypt_with_viewing(&payload, pair.private_key()).unwrap();
            prop_assert_eq!(opened.as_bytes(), &plaintext[..]);

            let mut body = payload.body_bytes();
            let i = flip.index(body.len());
            body[i] ^= 1 << bit;
            let tampered = EncryptedPayload::from_parts(*payload.ephemeral_public_key(), &body).unwrap();
            prop_assert_eq!(decrypt_with_viewing(&tampered, pair.private_key()).unwrap_err(), DecryptError);
        }

        /// Property: Meta-Address Roundtrip
        /// Display then FromStr preserves the keys and chain.
        #[test]
        fn prop_meta_address_roundtrip(
            (curve, spending, viewing) in curve_and_scalars(),
            chain in "[a-z0-9_-]{1,16}",
        ) {
            let meta = keys_from(curve, &spending, &viewing).meta_address(&chain).unwrap();
            let parsed: StealthMetaAddress = meta.to_string().parse().unwrap();

            prop_assert_eq!(&parsed, &meta);
            prop_assert_eq!(parsed.curve(), curve);
        }
    }

    /// Regression test: mnemonic derivation is deterministic
    #[test]
    fn test_mnemonic_determinism() {
        let phrase = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

        for curve in [Curve::Secp256k1, Curve::Ed25519] {
            let keys1 = StealthKeys::from_mnemonic(curve, phrase, "").unwrap();
            let keys2 = StealthKeys::from_mnemonic(curve, phrase, "").unwrap();

            assert_eq!(keys1.spending_key(), keys2.spending_key());
            assert_eq!(keys1.viewing_key(), keys2.viewing_key());
        }
    }

    /// Regression test: different passphrases produce different keys
    #[test]
    fn test_mnemonic_passphrase_sensitivity() {
        let phrase = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

        let keys1 = StealthKeys::from_mnemonic(Curve::Ed25519, phrase, "").unwrap();
        let keys2 = StealthKeys::from_mnemonic(Curve::Ed25519, phrase, "different").unwrap();

        assert_ne!(keys1.spending_key(), keys2.spending_key());
        assert_ne!(keys1.viewing_key(), keys2.viewing_key());
    }
}
