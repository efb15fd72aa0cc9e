//! Parallel (Steve Thomas, 2014) — the simplest member of the family.
//!
//! Grounded on `original_source/Parallel/code/c++/parallel.cpp`: the
//! original builds its key as `SHA512(SHA512(salt) || password)` and then
//! XORs together many independent `SHA512(counter || key)` evaluations
//! ("parallel loops") per "sequential loop" driven by `t_cost`. The
//! reference implementation never actually uses `m_cost` to size any
//! buffer — a genuine oddity of the submission. This instantiation keeps
//! the XOR-hash cascade as the round function `F` but, to fit the shared
//! Arena/Mixing Kernel contract every family member exposes, lets `m_cost`
//! size the arena the cascade walks over (an extension beyond the literal
//! C source, noted in DESIGN.md).

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
use sha2::Sha512;

const LANES: usize = 8; // SHA-512 output as 8 u64 words

fn bounds() -> Bounds {
    Bounds {
        max_outlen: 64,
        max_inlen: usize::MAX,
        max_saltlen: usize::MAX,
        min_t_cost: 0,
        max_t_cost: 106,
        min_m_cost: 0,
        max_m_cost: 20,
    }
}

fn derive(params: &PhsParams) -> DerivedParams {
    DerivedParams {
        n: 64usize.saturating_mul(1usize << params.m_cost).max(2),
        w: LANES,
        rounds_time: params.t_cost.max(1),
        rounds_inner: 1,
        lanes: LANES,
        parallelism: 1,
        seed_len: 64,
    }
}

struct XorHashCascade;

impl RoundFunction for XorHashCascade {
    fn block_words(&self) -> usize {
        LANES
    }

    fn update(&self, state: &mut MixingState, a: &[u64], b: &[u64]) -> Vec<u64> {
        let mut hasher = Sha512::new();
        for w in state.as_slice() {
            hasher.update(w.to_le_bytes());
        }
        for w in a {
            hasher.update(w.to_le_bytes());
        }
        for w in b {
            hasher.update(w.to_le_bytes());
        }
        let digest = hasher.finalize();
        let words = seed::bytes_to_words_le(&digest);
        for (s, w) in state.as_mut_slice().iter_mut().zip(words.iter()) {
            *s ^= w;
        }
        state.as_slice().to_vec()
    }
}

/// Sequential scan: each row reads straight from its immediate predecessor.
struct SequentialSchedule;

impl AddressSchedule for SequentialSchedule {
    fn setup_past(&self, row: usize) -> usize {
        row - 1
    }

    fn wandering_addr(&self, state: &MixingState, tau: u32, row: usize) -> usize {
        let lane = state.as_slice()[row % state.as_slice().len()];
        (lane ^ tau as u64 ^ row as u64) as usize
    }
}

/// Derives `outlen` bytes from `password` and `salt` under the Parallel
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

    crate::phase!("parallel", "decode");
    let mut arena = Arena::new(derived.n, derived.w)
        .ok_or(PhsError::OutOfMemory { bytes: derived.n * derived.w * 8 })?;

    crate::phase!("parallel", "seed");
    let seed_material = seed::double_hash::<Sha512>(password, salt);
    let (first, second) = seed::squeeze_two_blocks::<Sha512>(&seed_material, derived.w);
    seed_arena(&mut arena, &first, &second);
    let mut state = MixingState::from_words(first.clone());

    let rf = XorHashCascade;
    let sched = SequentialSchedule;

    crate::phase!("parallel", "setup");
    mixing::run_setup(&mut arena, &mut state, &rf, &sched);
    crate::phase!("parallel", "wandering");
    mixing::run_wandering(&mut arena, &mut state, &rf, &sched, derived.rounds_time);

    crate::phase!("parallel", "extract");
    extractor::extract::<Sha512>(&arena.as_bytes(), password, out);
    Ok(())
}
