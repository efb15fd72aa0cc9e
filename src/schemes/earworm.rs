//! EARWORM (Daniel Franke, 2013) — AES-keyed-by-arena family.
//!
//! Grounded on `original_source/EARWORM/core-ref.c` and `core.h`: a 16-byte
//! scratchpad is repeatedly AES-encrypted using successive 16-byte arena
//! chunks as the round input, while two independent cursors (`arena_index[0]`
//! and `arena_index[1]`) walk the arena and get re-seeded from the
//! scratchpad's own content every `EARWORM_CHUNK_LENGTH` steps — the `to_index`
//! modulo-`2^m_cost` reduction is this instantiation's address schedule.
//! `workunit` is run once per integer `time_start..time_end`, and the
//! results are XORed together (spec §4.4.1's "parallel XOR-cascade" shape);
//! here that outer loop is folded into [`crate::mixing::run_wandering`]'s
//! `rounds_time` parameter rather than reimplemented by hand.
//!
//! The reference core applies a single AES *round* (`aesenc`) keyed by the
//! arena chunk; this instantiation generalizes that to a full AES-128 block
//! encryption keyed by the arena row, which needs no AES-NI intrinsics and
//! is the natural shape for the shared `RoundFunction` trait (documented in
//! DESIGN.md).

use crate::{
    arena::Arena,
    error::PhsError,
    mixing::{self, AddressSchedule, MixingState, RoundFunction},
    params::{check_bounds, Bounds, DerivedParams, PhsParams},
    schemes::seed_arena,
    seed,
};
use aes::Aes128;
use cipher::{generic_array::GenericArray, BlockEncrypt, KeyInit};
use sha2::Sha256;

const LANES: usize = 2; // one AES block (16 bytes) per row

fn bounds() -> Bounds {
    Bounds {
        max_outlen: u32::MAX as usize,
        max_inlen: u32::MAX as usize,
        max_saltlen: 32,
        min_t_cost: 1,
        max_t_cost: u32::MAX,
        min_m_cost: 0,
        max_m_cost: 16,
    }
}

fn derive(params: &PhsParams) -> DerivedParams {
    let chunks = 256usize << params.m_cost;
    DerivedParams {
        n: chunks.max(2),
        w: LANES,
        rounds_time: params.t_cost.max(1),
        rounds_inner: 256,
        lanes: LANES,
        parallelism: 1,
        seed_len: 32,
    }
}

/// AES-128 keyed by the arena row being read, encrypting the running
/// scratchpad register — the round-function generalization of
/// `earworm_aesenc_round`.
struct AesRound;

impl RoundFunction for AesRound {
    fn block_words(&self) -> usize {
        LANES
    }

    fn update(&self, state: &mut MixingState, a: &[u64], _b: &[u64]) -> Vec<u64> {
        let mut key_bytes = [0u8; 16];
        for (i, w) in a.iter().take(2).enumerate() {
            key_bytes[i * 8..i * 8 + 8].copy_from_slice(&w.to_le_bytes());
        }
        let cipher = Aes128::new(GenericArray::from_slice(&key_bytes));
        let raw = state.as_mut_slice();
        let mut block_bytes = [0u8; 16];
        block_bytes[0..8].copy_from_slice(&raw[0].to_le_bytes());
        block_bytes[8..16].copy_from_slice(&raw[1].to_le_bytes());
        let mut block = GenericArray::clone_from_slice(&block_bytes);
        cipher.encrypt_block(&mut block);
        raw[0] = u64::from_le_bytes(block[0..8].try_into().unwrap());
        raw[1] = u64::from_le_bytes(block[8..16].try_into().unwrap());
        raw.to_vec()
    }
}

/// Two independent cursors re-seeded from the scratchpad every
/// `EARWORM_CHUNK_LENGTH` (here: every call) steps, reduced modulo the
/// arena's row count.
struct DualCursorSchedule {
    modulus: usize,
}

impl AddressSchedule for DualCursorSchedule {
    fn setup_past(&self, row: usize) -> usize {
        row - 1
    }

    fn wandering_addr(&self, state: &MixingState, tau: u32, _row: usize) -> usize {
        let raw = state.as_slice();
        let seed = raw[0] ^ raw[1].rotate_left(tau);
        (seed as usize) % self.modulus.max(1)
    }
}

/// Derives `outlen` bytes from `password` and `salt` under the EARWORM
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

    crate::phase!("earworm", "decode");
    let mut arena = Arena::new(derived.n, derived.w)
        .ok_or(PhsError::OutOfMemory { bytes: derived.n * derived.w * 8 })?;

    crate::phase!("earworm", "seed");
    let mut prefixed = vec![0u8];
    prefixed.extend_from_slice(salt);
    let index_material = seed::prefixed_salt::<Sha256>(password, &prefixed, 32);
    prefixed[0] = 1;
    let scratch_material = seed::prefixed_salt::<Sha256>(password, &prefixed, LANES * 8);
    let first = seed::bytes_to_words_le(&index_material[..16]);
    let second = seed::bytes_to_words_le(&index_material[16..32]);
    seed_arena(&mut arena, &first, &second);
    let mut state = MixingState::from_words(seed::bytes_to_words_le(&scratch_material));

    let rf = AesRound;
    let sched = DualCursorSchedule { modulus: derived.n };

    crate::phase!("earworm", "setup");
    mixing::run_setup(&mut arena, &mut state, &rf, &sched);
    crate::phase!("earworm", "wandering");
    mixing::run_wandering(&mut arena, &mut state, &rf, &sched, derived.rounds_time);

    crate::phase!("earworm", "extract");
    prefixed[0] = 2;
    let material: Vec<u8> = state.as_slice().iter().flat_map(|w| w.to_le_bytes()).collect();
    let digest = seed::prefixed_salt::<Sha256>(&material, &prefixed, out.len());
    out.copy_from_slice(&digest);
    Ok(())
}
