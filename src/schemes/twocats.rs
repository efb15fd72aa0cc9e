//! TwoCats (Bill Cox, 2014) — bit-reversal / cubic-distance family.
//!
//! Grounded on `original_source/TwoCats/twocats/twocats-ref.c`:
//! `hashWithoutPassword` walks memory in Catena's bit-reversal order
//! (`reverse(i, numBits-1)`, with a "sliding window" correction) for the
//! scheme's password-independent ("resistant") slices, while
//! `hashWithPassword` computes a `rand()^3`-shaped distance
//! (`distance = (i-1)*v^3 >> 32`) from the running state for its
//! password-dependent ("unpredictable") slices — spec §4.4.2/§4.4.3's two
//! address-schedule halves, here selected per call rather than per memory
//! slice for simplicity. `hashBlocks`' multiply-chain-plus-lane-hash inner
//! loop is the block-update primitive `F`.

use crate::{
    arena::Arena,
    error::PhsError,
    extractor,
    mixing::{self, AddressSchedule, MixingState, RoundFunction},
    params::{check_bounds, Bounds, DerivedParams, PhsParams},
    schemes::seed_arena,
    seed,
};
use sha2::Sha512;

const LANES: usize = 4;

fn bounds() -> Bounds {
    Bounds {
        max_outlen: 64,
        max_inlen: usize::MAX,
        max_saltlen: usize::MAX,
        min_t_cost: 0,
        max_t_cost: 30,
        min_m_cost: 0,
        max_m_cost: 24,
    }
}

fn derive(params: &PhsParams) -> DerivedParams {
    DerivedParams {
        n: (128usize << params.m_cost).max(4),
        w: LANES,
        rounds_time: 1u32 << params.t_cost.min(16),
        rounds_inner: 1,
        lanes: LANES,
        parallelism: 1,
        seed_len: 64,
    }
}

/// The multiply-chain-plus-lane-hash combine of `hashBlocks`' inner loop,
/// narrowed from SIMD lanes to the shared kernel's fixed `LANES` width.
struct MultiplyChainRound;

impl RoundFunction for MultiplyChainRound {
    fn block_words(&self) -> usize {
        LANES
    }

    fn update(&self, state: &mut MixingState, a: &[u64], b: &[u64]) -> Vec<u64> {
        let s = state.as_mut_slice();
        let (mut x, mut y, mut z, mut w) = (s[0], s[1], s[2], s[3]);
        for _ in 0..4 {
            x ^= ((y as u128) * (z as u128) >> 64) as u64;
            y = y.wrapping_add(z);
            z ^= ((x as u128) * (w as u128) >> 64) as u64;
            w = w.wrapping_add(x);
        }
        let mut out = vec![0u64; LANES];
        for i in 0..LANES {
            let mixed = s[i]
                .wrapping_add(a.get(i).copied().unwrap_or(0))
                ^ b.get(i).copied().unwrap_or(0);
            s[i] = mixed.rotate_right(24);
            out[i] = s[i];
        }
        s[0] = x;
        s[1] = y;
        s[2] = z;
        s[3] = w;
        out
    }
}

fn bit_reverse(mut v: u32, num_bits: u32) -> u32 {
    let mut result = 0u32;
    for _ in 0..num_bits {
        result = (result << 1) | (v & 1);
        v >>= 1;
    }
    result
}

/// Bit-reversal for Setup (resistant slices); a cubic state-derived
/// distance for Wandering (unpredictable slices).
struct SlidingReverseSchedule;

impl AddressSchedule for SlidingReverseSchedule {
    fn setup_past(&self, row: usize) -> usize {
        let mut num_bits = 1u32;
        while (1u32 << num_bits) as usize <= row {
            num_bits += 1;
        }
        let mut reversed = bit_reverse(row as u32, num_bits - 1) as usize;
        if reversed + (1usize << (num_bits - 1)) < row {
            reversed += 1usize << (num_bits - 1);
        }
        reversed.min(row.saturating_sub(1))
    }

    fn wandering_addr(&self, state: &MixingState, _tau: u32, row: usize) -> usize {
        let v = state.as_slice()[0];
        let v2 = ((v as u128) * (v as u128)) >> 32;
        let v3 = ((v as u128) * v2) >> 32;
        let distance = ((row.saturating_sub(1) as u128) * v3) >> 32;
        row.saturating_sub(1).saturating_sub(distance as usize)
    }
}

/// Derives `outlen` bytes from `password` and `salt` under the TwoCats
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

    crate::phase!("twocats", "decode");
    let mut arena = Arena::new(derived.n, derived.w)
        .ok_or(PhsError::OutOfMemory { bytes: derived.n * derived.w * 8 })?;

    crate::phase!("twocats", "seed");
    let seed_material = seed::double_hash::<Sha512>(password, salt);
    let (first, second) = seed::squeeze_two_blocks::<Sha512>(&seed_material, derived.w);
    seed_arena(&mut arena, &first, &second);
    let mut state = MixingState::from_words(first.clone());

    let rf = MultiplyChainRound;
    let sched = SlidingReverseSchedule;

    crate::phase!("twocats", "setup");
    mixing::run_setup(&mut arena, &mut state, &rf, &sched);
    crate::phase!("twocats", "wandering");
    mixing::run_wandering(&mut arena, &mut state, &rf, &sched, derived.rounds_time);

    crate::phase!("twocats", "extract");
    extractor::extract::<Sha512>(&arena.as_bytes(), password, out);
    Ok(())
}
