//! Quantified invariants over the public `phs` entry points (spec §8),
//! run against small but non-trivial password/salt spaces so each case
//! still walks a real Setup + Wandering pass.

use phs_kernels::schemes::{
    antcrypt, battcrypt, earworm, lyra2, makwa, omegacrypt, parallel, polypasshash, pufferfish,
    twocats, yescrypt,
};
use proptest::prelude::*;

fn small_bytes(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(any::<u8>(), 0..=max_len)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn parallel_deterministic(password in small_bytes(24), salt in small_bytes(16)) {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        parallel::phs(&mut a, &password, &salt, 1, 0).unwrap();
        parallel::phs(&mut b, &password, &salt, 1, 0).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn lyra2_deterministic(password in small_bytes(24), salt in small_bytes(16)) {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        lyra2::phs(&mut a, &password, &salt, 1, 3).unwrap();
        lyra2::phs(&mut b, &password, &salt, 1, 3).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn antcrypt_deterministic(password in small_bytes(24), salt in small_bytes(16)) {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        antcrypt::phs(&mut a, &password, &salt, 1, 0, None).unwrap();
        antcrypt::phs(&mut b, &password, &salt, 1, 0, None).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn battcrypt_deterministic(password in small_bytes(24), salt in small_bytes(16)) {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        battcrypt::phs(&mut a, &password, &salt, 0, 0).unwrap();
        battcrypt::phs(&mut b, &password, &salt, 0, 0).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn earworm_deterministic(password in small_bytes(24), salt in small_bytes(16)) {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        earworm::phs(&mut a, &password, &salt, 1, 0).unwrap();
        earworm::phs(&mut b, &password, &salt, 1, 0).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn makwa_deterministic(password in small_bytes(24), salt in small_bytes(16)) {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        makwa::phs(&mut a, &password, &salt, 1, 0).unwrap();
        makwa::phs(&mut b, &password, &salt, 1, 0).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn omegacrypt_deterministic(password in small_bytes(24), salt in small_bytes(16)) {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        omegacrypt::phs(&mut a, &password, &salt, 0, 0).unwrap();
        omegacrypt::phs(&mut b, &password, &salt, 0, 0).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn polypasshash_deterministic(password in small_bytes(24), salt in small_bytes(16)) {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        polypasshash::phs(&mut a, &password, &salt, 0, 0).unwrap();
        polypasshash::phs(&mut b, &password, &salt, 0, 0).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn pufferfish_deterministic(password in small_bytes(24), salt in small_bytes(16)) {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        pufferfish::phs(&mut a, &password, &salt, 0, 0).unwrap();
        pufferfish::phs(&mut b, &password, &salt, 0, 0).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn twocats_deterministic(password in small_bytes(24), salt in small_bytes(16)) {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        twocats::phs(&mut a, &password, &salt, 0, 0).unwrap();
        twocats::phs(&mut b, &password, &salt, 0, 0).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn yescrypt_deterministic(password in small_bytes(24), salt in small_bytes(16)) {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        yescrypt::phs(&mut a, &password, &salt, 1, 0).unwrap();
        yescrypt::phs(&mut b, &password, &salt, 1, 0).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn length_correctness_across_family(outlen in 1usize..=32, password in small_bytes(16), salt in small_bytes(16)) {
        let mut out = vec![0u8; outlen];
        parallel::phs(&mut out, &password, &salt, 1, 0).unwrap();
        prop_assert_eq!(out.len(), outlen);

        let mut out = vec![0u8; outlen];
        polypasshash::phs(&mut out, &password, &salt, 0, 0).unwrap();
        prop_assert_eq!(out.len(), outlen);
    }

    #[test]
    fn salt_sensitivity_parallel(password in small_bytes(16), salt_a in small_bytes(16), salt_b in small_bytes(16)) {
        prop_assume!(salt_a != salt_b);
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        parallel::phs(&mut a, &password, &salt_a, 1, 0).unwrap();
        parallel::phs(&mut b, &password, &salt_b, 1, 0).unwrap();
        prop_assert_ne!(a, b);
    }
}
