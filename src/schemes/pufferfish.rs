//! Pufferfish (Jeremi Gosney, 2014) — dynamic-S-box family.
//!
//! Grounded on `original_source/Pufferfish/src/reference/pufferfish.c`:
//! `pf_initstate` seeds four dynamic S-boxes (`sbox_words = 2^(m_cost+5)`
//! entries each) from `HMAC-SHA512(SHA512(salt), password)`, then `pf_f`
//! combines four S-box lookups — indexed by different bit-shifts of the
//! running 64-bit word — the way Blowfish's `F` combines two; `pf_expandkey`
//! repeats `pf_encipher` across the whole key schedule and S-boxes, and the
//! top-level driver runs that expansion `2^t_cost` times (`count`),
//! alternately keyed by `salt` and by `key`. The four-box combine is
//! generalized here to reads against a single flattened S-box table — the
//! shared kernel's `Arena` — addressed by the same four-way bit-shift
//! scheme, all folded into one [`crate::mixing::RoundFunction`] call.

use crate::{
    arena::Arena,
    error::PhsError,
    extractor,
    mixing::{self, AddressSchedule, MixingState, RoundFunction},
    params::{check_bounds, Bounds, DerivedParams, PhsParams},
    schemes::seed_arena,
    seed,
};
use digest::Digest;
use hmac::{Hmac, Mac};
use sha2::Sha512;

const NUM_SBOXES: u64 = 4;

fn bounds() -> Bounds {
    Bounds {
        max_outlen: 64,
        max_inlen: 255,
        max_saltlen: 255,
        min_t_cost: 0,
        max_t_cost: 20,
        min_m_cost: 0,
        max_m_cost: 16,
    }
}

fn derive(params: &PhsParams) -> DerivedParams {
    let log2_sbox_words = params.m_cost.min(16) + 5;
    let sbox_words = 1u64 << log2_sbox_words;
    DerivedParams {
        n: (NUM_SBOXES * sbox_words) as usize,
        w: 1,
        rounds_time: 1u32 << params.t_cost.min(12),
        rounds_inner: 16,
        lanes: 1,
        parallelism: 1,
        seed_len: 64,
    }
}

/// Combines four S-box lookups from bit-shifted slices of the running
/// state word — the generalized `pf_f`, folded directly into the round
/// function rather than kept as a separate helper the schedule calls back
/// into, since the shared `RoundFunction` trait owns both the read and the
/// combine here.
struct DynamicSboxRound {
    sbox_words: u64,
}

impl RoundFunction for DynamicSboxRound {
    fn block_words(&self) -> usize {
        1
    }

    fn update(&self, state: &mut MixingState, a: &[u64], b: &[u64]) -> Vec<u64> {
        let x = state.as_slice()[0] ^ a.first().copied().unwrap_or(0) ^ b.first().copied().unwrap_or(0);
        let log2 = self.sbox_words.trailing_zeros();
        let s0 = x >> (64 - log2.max(1));
        let s1 = (x >> (48u32.saturating_sub(log2))) & (self.sbox_words - 1);
        let s2 = (x >> (32u32.saturating_sub(log2))) & (self.sbox_words - 1);
        let s3 = (x >> (16u32.saturating_sub(log2))) & (self.sbox_words - 1);
        let combined = (s0 ^ s1).wrapping_add(s2) ^ s3;
        let out = x.rotate_left(13) ^ combined;
        state.as_mut_slice()[0] = out;
        vec![out]
    }
}

/// Sequential fill during Setup; Wandering reads the S-box entry the
/// current state word addresses, matching `pf_f`'s first lookup.
struct SboxSchedule {
    sbox_words: u64,
}

impl AddressSchedule for SboxSchedule {
    fn setup_past(&self, row: usize) -> usize {
        row - 1
    }

    fn wandering_addr(&self, state: &MixingState, tau: u32, _row: usize) -> usize {
        let x = state.as_slice()[0].rotate_right(tau);
        (x % self.sbox_words.max(1)) as usize
    }
}

/// Derives `outlen` bytes from `password` and `salt` under the Pufferfish
/// instantiation of the kernel family.
pub fn phs(out: &mut [u8], password: &[u8], salt: &[u8], t_cost: u32, m_cost: u32) -> Result<(), PhsError> {
    let params = PhsParams {
        outlen: out.len(),
        inlen: password.len(),
        saltlen: salt.len(),
        t_cost,
        m_cost,
    };
    check_bounds(&params, &bounds())?;
    let derived = derive(&params);
    let sbox_words = (derived.n as u64) / NUM_SBOXES;

    crate::phase!("pufferfish", "decode");
    let mut arena = Arena::new(derived.n, derived.w)
        .ok_or(PhsError::OutOfMemory { bytes: derived.n * derived.w * 8 })?;

    crate::phase!("pufferfish", "seed");
    let salt_hash = Sha512::digest(salt);
    let mut mac = Hmac::<Sha512>::new_from_slice(&salt_hash).expect("hmac accepts any key length");
    mac.update(password);
    let state_material = mac.finalize().into_bytes();
    let seed_material = seed::bytes_to_words_le(&state_material);
    let (first, second) = seed::squeeze_two_blocks::<Sha512>(&state_material, derived.w);
    seed_arena(&mut arena, &first, &second);
    let mut state = MixingState::from_words(vec![seed_material[0]]);

    let rf = DynamicSboxRound { sbox_words };
    let sched = SboxSchedule { sbox_words };

    crate::phase!("pufferfish", "setup");
    mixing::run_setup(&mut arena, &mut state, &rf, &sched);
    crate::phase!("pufferfish", "wandering");
    mixing::run_wandering(&mut arena, &mut state, &rf, &sched, derived.rounds_time);

    crate::phase!("pufferfish", "extract");
    let mut mac = Hmac::<Sha512>::new_from_slice(&arena.as_bytes()[..64.min(arena.byte_len())])
        .expect("hmac accepts any key length");
    mac.update(password);
    let key_hash = mac.finalize().into_bytes();
    extractor::extract::<Sha512>(&key_hash, password, out);
    Ok(())
}
