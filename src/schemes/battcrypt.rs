//! Battcrypt (Steve Thomas, 2014) — block-cipher-over-arena family
//! (family-B).
//!
//! Grounded on `original_source/Battcrypt/code/c++/battcrypt.cpp`: a
//! 2048-byte (256-word) `data` register is Blowfish-CBC-encrypted to fill
//! each arena block, then the Work loop XORs `data`, the current block, and
//! a block selected by the low bits of `data`'s last 64 bits together,
//! re-encrypts the result in place, and XORs it back into `data` — the
//! read-write feedback loop spec §4.4.3 generalizes as `rowa` feedback.
//! `m_cost <= 24` is the declared ceiling: at `4 << 24` blocks of 2048
//! bytes each the arena is already past 64 GiB, and `bounds()` tracks
//! `derive()`'s shift exactly so every accepted `m_cost` actually grows
//! the arena (spec.md §8's memory-footprint invariant).

use crate::{
    arena::Arena,
    error::PhsError,
    extractor,
    mixing::{self, AddressSchedule, MixingState, RoundFunction},
    params::{check_bounds, Bounds, DerivedParams, PhsParams},
    schemes::seed_arena,
    seed,
};
use blowfish::Blowfish;
use cipher::{generic_array::GenericArray, BlockEncrypt, KeyInit};
use sha2::Sha512;

const BLOCK_WORDS: usize = 256; // 2048 bytes

fn bounds() -> Bounds {
    Bounds {
        max_outlen: 64,
        max_inlen: usize::MAX,
        max_saltlen: usize::MAX,
        min_t_cost: 0,
        max_t_cost: 62,
        min_m_cost: 0,
        max_m_cost: 24,
    }
}

fn derive(params: &PhsParams) -> DerivedParams {
    DerivedParams {
        n: (4usize << params.m_cost).max(4),
        w: BLOCK_WORDS,
        rounds_time: 2 + params.t_cost,
        rounds_inner: 1,
        lanes: 8,
        parallelism: 1,
        seed_len: 64,
    }
}

/// Blowfish keyed by `state` (the running SHA-512 key), CBC-encrypting a
/// working register built from the XOR of the two source blocks.
struct BlowfishCbc {
    key: Vec<u8>,
}

impl RoundFunction for BlowfishCbc {
    fn block_words(&self) -> usize {
        BLOCK_WORDS
    }

    fn update(&self, state: &mut MixingState, a: &[u64], b: &[u64]) -> Vec<u64> {
        let cipher = Blowfish::new_from_slice(&self.key)
            .expect("blowfish accepts keys up to 56 bytes");
        let mut register: Vec<u64> = (0..BLOCK_WORDS)
            .map(|i| a.get(i).copied().unwrap_or(0) ^ b.get(i).copied().unwrap_or(0))
            .collect();

        // CBC over 8-byte Blowfish blocks, chained within the register.
        let mut prev = [0u8; 8];
        for pair in register.chunks_mut(1) {
            let mut bytes = pair[0].to_be_bytes();
            for (x, p) in bytes.iter_mut().zip(prev.iter()) {
                *x ^= p;
            }
            let mut block = GenericArray::clone_from_slice(&bytes);
            cipher.encrypt_block(&mut block);
            prev.copy_from_slice(block.as_slice());
            pair[0] = u64::from_be_bytes(prev);
        }

        for (s, r) in state.as_mut_slice().iter_mut().zip(register.iter()) {
            *s ^= r;
        }
        register
    }
}

/// Sequential fill during Setup; the Wandering source is the low bits of
/// the running register, matching `last64Bits(data) & memMask`.
struct LastWordSchedule;

impl AddressSchedule for LastWordSchedule {
    fn setup_past(&self, row: usize) -> usize {
        row - 1
    }

    fn wandering_addr(&self, state: &MixingState, _tau: u32, _row: usize) -> usize {
        *state.as_slice().last().unwrap_or(&0) as usize
    }
}

/// Derives `outlen` bytes from `password` and `salt` under the Battcrypt
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

    crate::phase!("battcrypt", "decode");
    let mut arena = Arena::new(derived.n, derived.w)
        .ok_or(PhsError::OutOfMemory { bytes: derived.n * derived.w * 8 })?;

    crate::phase!("battcrypt", "seed");
    let key_material = seed::double_hash::<Sha512>(password, salt);
    let (first, second) = seed::squeeze_two_blocks::<Sha512>(&key_material, derived.w);
    seed_arena(&mut arena, &first, &second);
    let mut state = MixingState::from_words(key_material[..8.min(key_material.len())].to_vec());

    let rf = BlowfishCbc {
        key: key_material[..56.min(key_material.len())].to_vec(),
    };
    let sched = LastWordSchedule;

    crate::phase!("battcrypt", "setup");
    mixing::run_setup(&mut arena, &mut state, &rf, &sched);
    crate::phase!("battcrypt", "wandering");
    mixing::run_wandering(&mut arena, &mut state, &rf, &sched, derived.rounds_time);

    crate::phase!("battcrypt", "extract");
    extractor::extract::<Sha512>(&arena.as_bytes(), password, out);
    Ok(())
}
