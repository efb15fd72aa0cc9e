//! PolyPassHash (Santiago Torres-Arias et al., 2014) — iterated-digest
//! family.
//!
//! Grounded on `original_source/PolyPassHash/polypasshash-c/src/libpolypasshash.c`:
//! `_calculate_digest(salted_password)` is a single SHA-256 evaluation over
//! `salt || password`, whose result is then split into Shamir secret-sharing
//! shares (`libgfshare`) and XORed against an AES-encrypted secret. The
//! threshold secret-sharing scheme and its AES-keyed vault are explicitly
//! out of scope (Non-goals: "threshold secret-sharing glue"); what remains
//! — the salted digest itself — has no iteration count or memory footprint
//! of its own in the original, since PolyPassHash's hardness comes entirely
//! from the withheld secret, not from the hash. To still expose a
//! meaningful `(t_cost, m_cost)` knob as the shared entry point requires,
//! this instantiation extends the single digest into a sequential
//! hash-chain over an arena sized by `m_cost` and iterated `t_cost` times
//! — the same kind of extension already applied to Parallel's `m_cost`
//! (see DESIGN.md).

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
use sha2::Sha256;

const LANES: usize = 4; // SHA-256 output as 4 u64 words

fn bounds() -> Bounds {
    Bounds {
        max_outlen: 32,
        max_inlen: 255,
        max_saltlen: 255,
        min_t_cost: 0,
        max_t_cost: 64,
        min_m_cost: 0,
        max_m_cost: 16,
    }
}

fn derive(params: &PhsParams) -> DerivedParams {
    DerivedParams {
        n: 8usize.saturating_mul(1usize << params.m_cost).max(2),
        w: LANES,
        rounds_time: params.t_cost + 1,
        rounds_inner: 1,
        lanes: LANES,
        parallelism: 1,
        seed_len: 32,
    }
}

/// `SHA256(state || salted_password_block)`, the generalized
/// `_calculate_digest` step.
struct SaltedDigest;

impl RoundFunction for SaltedDigest {
    fn block_words(&self) -> usize {
        LANES
    }

    fn update(&self, state: &mut MixingState, a: &[u64], b: &[u64]) -> Vec<u64> {
        let mut hasher = Sha256::new();
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

struct SequentialSchedule;

impl AddressSchedule for SequentialSchedule {
    fn setup_past(&self, row: usize) -> usize {
        row - 1
    }

    fn wandering_addr(&self, state: &MixingState, tau: u32, row: usize) -> usize {
        (state.as_slice()[0] ^ tau as u64 ^ row as u64) as usize
    }
}

/// Derives `outlen` bytes from `password` and `salt` under the
/// PolyPassHash instantiation of the kernel family.
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

    crate::phase!("polypasshash", "decode");
    let mut arena = Arena::new(derived.n, derived.w)
        .ok_or(PhsError::OutOfMemory { bytes: derived.n * derived.w * 8 })?;

    crate::phase!("polypasshash", "seed");
    let mut salted = Vec::with_capacity(salt.len() + password.len());
    salted.extend_from_slice(salt);
    salted.extend_from_slice(password);
    let seed_material = seed::double_hash::<Sha256>(&salted, salt);
    let (first, second) = seed::squeeze_two_blocks::<Sha256>(&seed_material, derived.w);
    seed_arena(&mut arena, &first, &second);
    let mut state = MixingState::from_words(first.clone());

    let rf = SaltedDigest;
    let sched = SequentialSchedule;

    crate::phase!("polypasshash", "setup");
    mixing::run_setup(&mut arena, &mut state, &rf, &sched);
    crate::phase!("polypasshash", "wandering");
    mixing::run_wandering(&mut arena, &mut state, &rf, &sched, derived.rounds_time);

    crate::phase!("polypasshash", "extract");
    extractor::extract::<Sha256>(&arena.as_bytes(), password, out);
    Ok(())
}
