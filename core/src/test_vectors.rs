//! Fixed test vectors
//!
//! Expected values were computed independently from the curve definitions
//! (SEC 2 for secp256k1, RFC 8032 for ed25519) with plain big-integer
//! arithmetic, then pinned here. Any change to a domain separator, encoding
//! or reduction rule shows up as a mismatch.

#[cfg(test)]
#[allow(non_snake_case)] // Crypto notation uses G, H, R, P, etc.
mod fixed_vectors {
    use crate::commitment::{commit, generator_h, verify_opening, H_ED25519, H_SECP256K1};
    use crate::curve::{hash_to_scalar, Curve};
    use crate::stealth::{derive_stealth_address_with, recover_stealth_key, StealthKeys};

    fn scalar(curve: Curve, value: u128) -> crate::curve::Scalar {
        curve.scalar_from_u128(value)
    }

    /// Small-integer secret key in the curve's canonical byte order
    fn secret_bytes(curve: Curve, value: u128) -> [u8; 32] {
        scalar(curve, value).to_bytes()
    }

    // ==================== Curve Vectors ====================

    #[test]
    fn test_vector_small_multiples_secp256k1() {
        let curve = Curve::Secp256k1;
        let cases = [
            (3, "02f9308a019258c31049344f85f89d5229b531c845836f99b08601f113bce036f9"),
            (11, "03774ae7f858a9411e5ef4246b70c65aac5649980be5c17891bbec17895da008cb"),
            (13, "03f28773c2d975288bc7d1d205c3748651b075fbc6610e58cddeeddf8f19405aa8"),
        ];
        for (k, expected) in cases {
            assert_eq!(hex::encode(scalar(curve, k).mul_base().to_compressed()), expected, "{}·G", k);
        }
    }

    #[test]
    fn test_vector_small_multiples_ed25519() {
        let curve = Curve::Ed25519;
        let cases = [
            (3, "d4b4f5784868c3020403246717ec169ff79e26608ea126a1ab69ee77d1b16712"),
            (11, "1337036ac32d8f30d4589c3c1c595812ce0fff40e37c6f5a97ab213f318290ad"),
            (13, "801f40eaaee1ef8723279a28b2cf4037b889dad222604678748b53ed0db0db92"),
        ];
        for (k, expected) in cases {
            assert_eq!(hex::encode(scalar(curve, k).mul_base().to_compressed()), expected, "{}·G", k);
        }
    }

    #[test]
    fn test_vector_hash_to_scalar() {
        assert_eq!(
            hex::encode(hash_to_scalar(Curve::Secp256k1, b"payload").to_bytes()),
            "4a4fc287e8a2d6030f77237b8e169cd950def415f2ee46242881de0a2d618f78"
        );
        assert_eq!(
            hex::encode(hash_to_scalar(Curve::Ed25519, b"payload").to_bytes()),
            "72c6beb667b3087c7e1e2f7053d01a6fc3767674659d1074641478a9d150180d"
        );
    }

    // ==================== Commitment Vectors ====================

    #[test]
    fn test_vector_generator_h() {
        assert_eq!(
            hex::encode(H_SECP256K1),
            "028b9d9d9e2a694a2f9b549611aad92007374392b58e6dafbb3354e2e6f411449a"
        );
        assert_eq!(
            hex::encode(H_ED25519),
            "62243e682039e8e88b41ca3f13feb050bc12155582a5f0ca0b1a64f30f21b145"
        );
        assert_eq!(generator_h(Curve::Secp256k1).to_compressed(), H_SECP256K1.to_vec());
    }

    /// commit(1000, blinding = 7), then open with the right and wrong value
    #[test]
    fn test_vector_commit_1000_blinding_7() {
        let cases = [
            (Curve::Secp256k1, "0326d802417b106acbcd88ef693c9778d04bf7e012cf077ba95e872ce6c152ec4c"),
            (Curve::Ed25519, "e0f9b62175520c00114c007b3605b1468e39930353478c37792ee1e1b5bcfb59"),
        ];
        for (curve, expected) in cases {
            let seven = scalar(curve, 7);
            let (C, _) = commit(curve, 1000, Some(&seven)).unwrap();
            assert_eq!(hex::encode(C.to_bytes()), expected);

            assert!(verify_opening(&C, 1000, &seven));
            assert!(!verify_opening(&C, 999, &seven));
        }
    }

    // ==================== Stealth Vectors ====================

    /// sk = 11, vk = 13, r = 3
    ///
    /// S = r·VK = 39·G
    /// tweak = SHA-512("SIP-STEALTH-TWEAK-v1" || S) mod n
    /// P = SK + tweak·G, view_tag = SHA-256(S)[0]
    #[test]
    fn test_vector_stealth_secp256k1() {
        let curve = Curve::Secp256k1;
        let keys = StealthKeys::from_secrets(curve, &secret_bytes(curve, 11), &secret_bytes(curve, 13)).unwrap();
        let meta = keys.meta_address("ethereum").unwrap();

        let stealth = derive_stealth_address_with(&meta, &scalar(curve, 3)).unwrap();
        assert_eq!(
            hex::encode(stealth.ephemeral_public_key().to_compressed()),
            "02f9308a019258c31049344f85f89d5229b531c845836f99b08601f113bce036f9"
        );
        assert_eq!(
            hex::encode(stealth.stealth_public_key().to_compressed()),
            "03d5ef318a96df99319703de2d4d38534c2359fce51ddfb9ad3816ea778c2e4bc0"
        );
        assert_eq!(stealth.view_tag(), Some(189));

        let p = recover_stealth_key(&keys, &stealth).unwrap().unwrap();
        assert_eq!(
            hex::encode(p.expose_bytes()),
            "732c7cbe5189ef470bf230a1925bffc0864efee61ce95f8c6c70e9dfade312df"
        );
    }

    #[test]
    fn test_vector_stealth_ed25519() {
        let curve = Curve::Ed25519;
        let keys = StealthKeys::from_secrets(curve, &secret_bytes(curve, 11), &secret_bytes(curve, 13)).unwrap();
        let meta = keys.meta_address("solana").unwrap();

        let stealth = derive_stealth_address_with(&meta, &scalar(curve, 3)).unwrap();
        assert_eq!(
            hex::encode(stealth.stealth_public_key().to_compressed()),
            "0f7f3d25de5bf6714d51b20156ac43b2712d374ac02f978965bbd3eb99e396e1"
        );
        assert_eq!(stealth.view_tag(), Some(196));

        let p = recover_stealth_key(&keys, &stealth).unwrap().unwrap();
        assert_eq!(
            hex::encode(p.expose_bytes()),
            "699c509c872a1b8b7a04fee2bbf15f2035fdac2aa5d082e7ed66c9f65d9b200c"
        );
    }

    #[test]
    fn test_vector_meta_address_string() {
        let curve = Curve::Secp256k1;
        let keys = StealthKeys::from_secrets(curve, &secret_bytes(curve, 11), &secret_bytes(curve, 13)).unwrap();
        assert_eq!(
            keys.meta_address("ethereum").unwrap().to_string(),
            "sip:ethereum:\
             0x03774ae7f858a9411e5ef4246b70c65aac5649980be5c17891bbec17895da008cb:\
             0x03f28773c2d975288bc7d1d205c3748651b075fbc6610e58cddeeddf8f19405aa8"
        );
    }
}
