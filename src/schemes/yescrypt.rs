//! Yescrypt-excerpt (Alexander Peslyak, scrypt lineage) — ROMix family.
//!
//! Grounded on `original_source/Yescrypt/extra/sim-tmto.c`'s
//! `smix_classic`: the textbook scrypt ROMix — a sequential fill
//! `V[i] = X; X = H(X)` for `i` in `0..N` (spec §4.4.2's deterministic
//! Setup, row `i` reading only its immediate predecessor), followed by `N`
//! rounds of `j = X mod N; X = H(X xor V[j])` (spec §4.4.3's Wandering
//! phase, address drawn straight from the running state). This is the
//! "excerpt" spec.md names: yescrypt's own pwxform/ROM-sharing extensions
//! are out of scope, and what is left maps onto the shared kernel almost
//! without translation. `H` is generalized from the simulation's MD5 to a
//! full-width Blake2b compression over the block, matching the other
//! family members' width.

use crate::{
    arena::Arena,
    error::PhsError,
    extractor,
    mixing::{self, AddressSchedule, MixingState, RoundFunction},
    params::{check_bounds, Bounds, DerivedParams, PhsParams},
    schemes::seed_arena,
    seed,
};
use blake2::Blake2b512;
use digest::Digest;

const LANES: usize = 8; // Blake2b-512 output as 8 u64 words

fn bounds() -> Bounds {
    Bounds {
        max_outlen: 64,
        max_inlen: usize::MAX,
        max_saltlen: usize::MAX,
        min_t_cost: 1,
        max_t_cost: u32::MAX,
        min_m_cost: 0,
        max_m_cost: 20,
    }
}

fn derive(params: &PhsParams) -> DerivedParams {
    DerivedParams {
        n: (256usize << params.m_cost).max(4),
        w: LANES,
        rounds_time: params.t_cost,
        rounds_inner: 1,
        lanes: LANES,
        parallelism: 1,
        seed_len: 64,
    }
}

/// `H(X) = Blake2b512(state || a || b)`, the generalized ROMix hash step.
struct RomixHash;

impl RoundFunction for RomixHash {
    fn block_words(&self) -> usize {
        LANES
    }

    fn update(&self, state: &mut MixingState, a: &[u64], b: &[u64]) -> Vec<u64> {
        let mut hasher = Blake2b512::new();
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
        state.as_mut_slice().copy_from_slice(&words[..state.as_slice().len()]);
        words
    }
}

/// `j = X mod N` for Wandering; Setup never consults password-derived
/// state, only the previous row, matching `V[i] = X; X = H(X)`.
struct RomixSchedule {
    n: usize,
}

impl AddressSchedule for RomixSchedule {
    fn setup_past(&self, row: usize) -> usize {
        row - 1
    }

    fn wandering_addr(&self, state: &MixingState, _tau: u32, _row: usize) -> usize {
        (state.as_slice()[0] as usize) % self.n.max(1)
    }
}

/// Derives `outlen` bytes from `password` and `salt` under the
/// Yescrypt-excerpt instantiation of the kernel family.
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

    crate::phase!("yescrypt", "decode");
    let mut arena = Arena::new(derived.n, derived.w)
        .ok_or(PhsError::OutOfMemory { bytes: derived.n * derived.w * 8 })?;

    crate::phase!("yescrypt", "seed");
    let seed_material = seed::double_hash::<Blake2b512>(password, salt);
    let (first, second) = seed::squeeze_two_blocks::<Blake2b512>(&seed_material, derived.w);
    seed_arena(&mut arena, &first, &second);
    let mut state = MixingState::from_words(first.clone());

    let rf = RomixHash;
    let sched = RomixSchedule { n: derived.n };

    crate::phase!("yescrypt", "setup");
    mixing::run_setup(&mut arena, &mut state, &rf, &sched);
    crate::phase!("yescrypt", "wandering");
    mixing::run_wandering(&mut arena, &mut state, &rf, &sched, derived.rounds_time);

    crate::phase!("yescrypt", "extract");
    extractor::extract::<Blake2b512>(&arena.as_bytes(), password, out);
    Ok(())
}
