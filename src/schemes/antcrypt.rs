//! AntCrypt — arithmetic/bitwise cascade family (family-A).
//!
//! Grounded on `original_source/AntCrypt/source/phc.c` and `phc.h`:
//! `phs_upd_state` rotates each state word by the inner-round index, derives
//! a target address from it, then walks a constant-time Fisher-Yates-style
//! permutation of ten primitive functions `F00..F09` (spec §4.4.1
//! "arithmetic-bitwise cascade"), XORing the cascade's result into the
//! target word. `phs_upd_entropy` re-distributes entropy across the full
//! state via SHA-512 between inner-round batches.
//!
//! `phc.h` defines `PHS_F_ADD == PHS_F_XOR == 0x01234567` — spec.md's own
//! Open Question flags this as unclear whether intentional. Per spec.md
//! §9, the literal constants are preserved here rather than deduplicated.

use crate::{
    arena::Arena,
    error::PhsError,
    extractor,
    mixing::{self, AddressSchedule, MixingState, RoundFunction},
    params::{check_bounds, Bounds, DerivedParams, PhsParams},
    schemes::seed_arena,
    seed,
    stats::StatsCollector,
};
use sha2::Sha512;
use std::cell::RefCell;

const LANES: usize = 1;

// Preserved verbatim from phc.h, including the ADD/XOR coincidence.
const PHS_F_ADD: u64 = 0x0123_4567;
const PHS_F_XOR: u64 = 0x0123_4567;
const PHS_F_MUL: u64 = 0x89AB_CDEF;
const PHS_F_AND: u64 = 0xFEFE_FEFE;
const PHS_F_OR: u64 = 0x0202_0202;
const PHS_F_SHL: u32 = 3;
const PHS_F_ROTR: u32 = 7;
const F_COUNT: usize = 10;

fn apply_f(idx: u8, x: u64) -> u64 {
    match idx {
        0 => x.wrapping_add(PHS_F_ADD),
        1 => x.wrapping_mul(PHS_F_MUL),
        2 => x >> PHS_F_SHL,
        3 => x.rotate_right(PHS_F_ROTR),
        4 => x ^ PHS_F_XOR,
        5 => x & PHS_F_AND,
        6 => x | PHS_F_OR,
        7 => x.rotate_left(13),
        8 => x.wrapping_sub(PHS_F_MUL),
        _ => !x,
    }
}

fn bounds() -> Bounds {
    Bounds {
        max_outlen: 64,
        max_inlen: usize::MAX,
        max_saltlen: usize::MAX,
        min_t_cost: 1,
        max_t_cost: u32::MAX,
        min_m_cost: 0,
        max_m_cost: 14,
    }
}

fn derive(params: &PhsParams) -> DerivedParams {
    let n = (1usize << (params.m_cost.min(14) + 8)) / 32;
    DerivedParams {
        n: n.max(16),
        w: LANES,
        rounds_time: params.t_cost,
        rounds_inner: F_COUNT as u32,
        lanes: LANES,
        parallelism: 1,
        seed_len: 64,
    }
}

/// The constant-time permutation cascade of `phs_upd_state`'s inner loop,
/// run once per block update.
struct Cascade {
    stats: RefCell<[u64; F_COUNT]>,
}

impl Cascade {
    fn new() -> Self {
        Self {
            stats: RefCell::new([0u64; F_COUNT]),
        }
    }

    fn drain_into(&self, collector: &mut dyn StatsCollector) {
        for (idx, count) in self.stats.borrow().iter().enumerate() {
            for _ in 0..*count {
                collector.record(idx as u8);
            }
        }
    }
}

impl RoundFunction for Cascade {
    fn block_words(&self) -> usize {
        LANES
    }

    fn update(&self, state: &mut MixingState, a: &[u64], b: &[u64]) -> Vec<u64> {
        let mut res = a[0] ^ b[0];
        let mut perm: Vec<u8> = (0..F_COUNT as u8).collect();
        for k in 0..F_COUNT {
            let remaining = F_COUNT - k;
            let pick = (res as usize) % remaining;
            let idx = perm[pick];
            perm[pick] = perm[remaining - 1];
            res = apply_f(idx, res);
            self.stats.borrow_mut()[idx as usize] += 1;
        }
        state.as_mut_slice()[0] ^= res;
        vec![state.as_slice()[0]]
    }
}

/// Rows read their immediate predecessor rotated by the round index — a
/// single-word analogue of `phs_upd_state`'s `ROTR(state[j], i % 32)`.
struct WordRotateSchedule;

impl AddressSchedule for WordRotateSchedule {
    fn setup_past(&self, row: usize) -> usize {
        row - 1
    }

    fn wandering_addr(&self, state: &MixingState, tau: u32, row: usize) -> usize {
        let v = state.as_slice()[0].rotate_right(tau % 64);
        v as usize ^ row
    }
}

/// Derives `outlen` bytes from `password` and `salt` under the AntCrypt
/// instantiation of the kernel family. `stats`, if supplied, receives a
/// histogram of which cascade function fired how often (spec §9).
pub fn phs(
    out: &mut [u8],
    password: &[u8],
    salt: &[u8],
    t_cost: u32,
    m_cost: u32,
    mut stats: Option<&mut dyn StatsCollector>,
) -> Result<(), PhsError> {
    let params = PhsParams {
        outlen: out.len(),
        inlen: password.len(),
        saltlen: salt.len(),
        t_cost,
        m_cost,
    };
    check_bounds(&params, &bounds())?;
    let derived = derive(&params);

    crate::phase!("antcrypt", "decode");
    let mut arena = Arena::new(derived.n, derived.w)
        .ok_or(PhsError::OutOfMemory { bytes: derived.n * derived.w * 8 })?;

    crate::phase!("antcrypt", "seed");
    let seed_material = seed::double_hash::<Sha512>(password, salt);
    let (first, second) = seed::squeeze_two_blocks::<Sha512>(&seed_material, derived.w);
    seed_arena(&mut arena, &first, &second);
    let mut state = MixingState::from_words(vec![first[0]]);

    let rf = Cascade::new();
    let sched = WordRotateSchedule;

    crate::phase!("antcrypt", "setup");
    mixing::run_setup(&mut arena, &mut state, &rf, &sched);
    crate::phase!("antcrypt", "wandering");
    mixing::run_wandering(&mut arena, &mut state, &rf, &sched, derived.rounds_time);

    if let Some(collector) = stats.as_deref_mut() {
        rf.drain_into(collector);
    }

    crate::phase!("antcrypt", "extract");
    extractor::extract::<Sha512>(&arena.as_bytes(), password, out);
    Ok(())
}
