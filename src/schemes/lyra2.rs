//! Lyra2 (Lyra PHC team, 2014) — sponge-matrix family.
//!
//! Grounded on `original_source/Lyra2/src/Lyra2.c` and `Sponge.c`: a
//! Blake2b-derived sponge absorbs a `basil`-prefixed `pad10*1(password ||
//! salt)`, then Setup and Wandering walk an `nRows x nCols` matrix, visiting
//! `(row - 1) xor 1` during Setup (spec §4.4.2) and a state-derived row
//! during Wandering, XOR-feeding a rotated copy of each update back into the
//! row it read from (spec §4.4.1's feedback write). The sponge's 16-word
//! permutation *is* the Mixing Kernel's round function here — it is not a
//! black-box primitive, so it is implemented directly rather than pulled
//! from an upstream crate.

use crate::{
    arena::Arena,
    error::PhsError,
    extractor,
    mixing::{self, rotate_words_left, AddressSchedule, MixingState, RoundFunction},
    params::{check_bounds, Bounds, DerivedParams, PhsParams},
    schemes::seed_arena,
    seed,
};
use sha2::Sha512;

/// Sponge state width (Blake2b's 8 state words + 8 message words).
const LANES: usize = 16;
/// Row width in 64-bit words (12 columns, matching the PHC reference).
const ROW_WORDS: usize = 12;

fn bounds() -> Bounds {
    Bounds {
        max_outlen: usize::MAX,
        max_inlen: usize::MAX,
        max_saltlen: usize::MAX,
        min_t_cost: 1,
        max_t_cost: u32::MAX,
        min_m_cost: 3,
        max_m_cost: 24,
    }
}

fn derive(params: &PhsParams) -> DerivedParams {
    DerivedParams {
        n: (4usize << params.m_cost.min(24)).max(4),
        w: ROW_WORDS,
        rounds_time: params.t_cost,
        rounds_inner: 1,
        lanes: LANES,
        parallelism: 1,
        seed_len: 64,
    }
}

/// Blake2b's G mixing function, applied column- and diagonal-wise across
/// the 16-word sponge state — the textbook ARX quarter-round.
#[allow(clippy::too_many_arguments)]
fn g(v: &mut [u64; 16], a: usize, b: usize, c: usize, d: usize, x: u64, y: u64) {
    v[a] = v[a].wrapping_add(v[b]).wrapping_add(x);
    v[d] = (v[d] ^ v[a]).rotate_right(32);
    v[c] = v[c].wrapping_add(v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(24);
    v[a] = v[a].wrapping_add(v[b]).wrapping_add(y);
    v[d] = (v[d] ^ v[a]).rotate_right(16);
    v[c] = v[c].wrapping_add(v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(63);
}

/// One reduced-round Blake2b permutation over the 16-word sponge state,
/// absorbing `msg` (12 words: the row being mixed in) across the first 12
/// message slots.
fn blake2b_round(state: &mut [u64; 16], msg: &[u64]) {
    for (slot, m) in state.iter_mut().zip(msg.iter()).take(12.min(msg.len())) {
        *slot ^= *m;
    }
    g(state, 0, 4, 8, 12, state[1], state[5]);
    g(state, 1, 5, 9, 13, state[2], state[6]);
    g(state, 2, 6, 10, 14, state[3], state[7]);
    g(state, 3, 7, 11, 15, state[0], state[4]);
    g(state, 0, 5, 10, 15, state[6], state[11]);
    g(state, 1, 6, 11, 12, state[7], state[8]);
    g(state, 2, 7, 8, 13, state[4], state[9]);
    g(state, 3, 4, 9, 14, state[5], state[10]);
}

struct SpongeRound;

impl RoundFunction for SpongeRound {
    fn block_words(&self) -> usize {
        ROW_WORDS
    }

    fn update(&self, state: &mut MixingState, a: &[u64], b: &[u64]) -> Vec<u64> {
        let mut merged = vec![0u64; ROW_WORDS];
        for i in 0..ROW_WORDS {
            merged[i] = a.get(i).copied().unwrap_or(0) ^ b.get(i).copied().unwrap_or(0);
        }
        let raw: &mut [u64] = state.as_mut_slice();
        let mut v: [u64; 16] = raw.try_into().expect("sponge state is 16 words");
        blake2b_round(&mut v, &merged);
        raw.copy_from_slice(&v);
        v[..ROW_WORDS].to_vec()
    }
}

/// `(row - 1) xor 1` with the mandatory decrement wrap-around of spec
/// §4.4.2's Lyra2 entry.
struct Lyra2Schedule;

impl AddressSchedule for Lyra2Schedule {
    fn setup_past(&self, row: usize) -> usize {
        let candidate = (row - 1) ^ 1;
        if candidate >= row {
            candidate.saturating_sub(1)
        } else {
            candidate
        }
    }

    fn wandering_addr(&self, state: &MixingState, _tau: u32, _row: usize) -> usize {
        state.as_slice()[0] as usize
    }
}

/// Derives `outlen` bytes from `password` and `salt` under the Lyra2
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

    crate::phase!("lyra2", "decode");
    let basil = seed::lyra2_basil(
        out.len() as u64,
        password.len() as u64,
        salt.len() as u64,
        t_cost as u64,
        derived.n as u64,
        ROW_WORDS as u64,
    );
    let mut arena = Arena::new(derived.n, derived.w)
        .ok_or(PhsError::OutOfMemory { bytes: derived.n * derived.w * 8 })?;

    crate::phase!("lyra2", "seed");
    let padded = seed::padded_concat(password, salt, &basil, ROW_WORDS * 8);
    let (first, second) = seed::squeeze_two_blocks::<Sha512>(&padded, derived.w);
    seed_arena(&mut arena, &first, &second);

    let mut sponge_init = vec![0u64; LANES];
    sponge_init[..first.len().min(LANES)].copy_from_slice(&first[..first.len().min(LANES)]);
    let mut state = MixingState::from_words(sponge_init);

    let rf = SpongeRound;
    let sched = Lyra2Schedule;

    crate::phase!("lyra2", "setup");
    mixing::run_setup(&mut arena, &mut state, &rf, &sched);
    crate::phase!("lyra2", "wandering");
    mixing::run_wandering(&mut arena, &mut state, &rf, &sched, derived.rounds_time);

    crate::phase!("lyra2", "extract");
    let tail = rotate_words_left(state.as_slice(), 1);
    let mut arena_bytes = arena.as_bytes();
    for w in tail {
        arena_bytes.extend_from_slice(&w.to_le_bytes());
    }
    extractor::extract::<Sha512>(&arena_bytes, password, out);
    Ok(())
}
