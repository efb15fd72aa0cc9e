//! OmegaCrypt (Brandon Enright, 2014) — keystream-branch family.
//!
//! Grounded on `original_source/OmegaCrypt/ocrypt.c`: a ChaCha20 keystream,
//! seeded from a CubeHash digest of the padded `(password, salt, key)`
//! parameter block, both fills a `2^(m_cost+17)`-word state array and then
//! drives `2^(t_cost+17)` iterations that each pick one of four
//! address/arithmetic branches to mutate the array, threading a running
//! `carry` word from iteration to iteration for data dependence. CubeHash
//! is substituted with SHA3-256 here (spec §1 treats the hash/cipher
//! primitives themselves as black-box collaborators, not bespoke code).
//!
//! The four-branch loop has no row-sweep structure — every address is
//! keystream-random, not a function of a sweep index — so unlike the other
//! family members this instantiation does not route through
//! [`crate::mixing::run_setup`] / [`crate::mixing::run_wandering`]; it
//! drives the [`crate::arena::Arena`] with its own loop instead, as the
//! nearest faithful shape for this scheme's actual Mixing Kernel.

use crate::{arena::Arena, error::PhsError, params::{check_bounds, Bounds, DerivedParams, PhsParams}};
use chacha20::{
    cipher::{generic_array::GenericArray, KeyIvInit, StreamCipher},
    ChaCha20,
};
use sha3::{Digest, Sha3_256};

const ALLOWED_OUTLENS: [usize; 6] = [16, 20, 28, 32, 48, 64];
const BASE_TCOST: u32 = 17;
const BASE_MCOST: u32 = 17;
const PARAMS_SIZE: usize = 256 * 3 + 3;

fn bounds() -> Bounds {
    Bounds {
        max_outlen: 64,
        max_inlen: 255,
        max_saltlen: 255,
        min_t_cost: 0,
        max_t_cost: 14,
        min_m_cost: 0,
        max_m_cost: 14,
    }
}

fn derive(params: &PhsParams) -> DerivedParams {
    DerivedParams {
        n: 1usize << (params.m_cost + BASE_MCOST).min(30),
        w: 1,
        rounds_time: 0,
        rounds_inner: 1,
        lanes: 1,
        parallelism: 1,
        seed_len: 32,
    }
}

/// Pulls bytes sequentially from a ChaCha20 keystream, generalizing
/// `o_chacha_getbytes`'s block-buffered reader into a single running
/// cursor over the same cipher.
struct KeystreamCursor {
    cipher: ChaCha20,
}

impl KeystreamCursor {
    fn new(key: &[u8; 32]) -> Self {
        let iv = [0u8; 12];
        Self {
            cipher: ChaCha20::new(GenericArray::from_slice(key), GenericArray::from_slice(&iv)),
        }
    }

    fn next_bytes(&mut self, n: usize) -> Vec<u8> {
        let mut buf = vec![0u8; n];
        self.cipher.apply_keystream(&mut buf);
        buf
    }

    fn next_u64(&mut self) -> u64 {
        let b = self.next_bytes(8);
        u64::from_le_bytes(b.try_into().unwrap())
    }

    fn next_u32(&mut self) -> u32 {
        let b = self.next_bytes(4);
        u32::from_le_bytes(b.try_into().unwrap())
    }

    fn next_u8(&mut self) -> u8 {
        self.next_bytes(1)[0]
    }
}

/// Derives `outlen` bytes from `password` and `salt` under the OmegaCrypt
/// instantiation of the kernel family. `outlen` must be one of the six
/// sizes the original enumerates (16/20/28/32/48/64 bytes).
pub fn phs(out: &mut [u8], password: &[u8], salt: &[u8], t_cost: u32, m_cost: u32) -> Result<(), PhsError> {
    if !ALLOWED_OUTLENS.contains(&out.len()) {
        return Err(PhsError::InvalidOutputLength { requested: out.len(), max: 64 });
    }
    let params = PhsParams {
        outlen: out.len(),
        inlen: password.len(),
        saltlen: salt.len(),
        t_cost,
        m_cost,
    };
    check_bounds(&params, &bounds())?;
    let derived = derive(&params);

    crate::phase!("omegacrypt", "decode");
    let mut packed = vec![0u8; PARAMS_SIZE];
    packed[..password.len()].copy_from_slice(password);
    packed[255] = password.len() as u8;
    packed[256..256 + salt.len()].copy_from_slice(salt);
    packed[256 + 255] = salt.len() as u8;
    // No personalization key in the shared entry point; that 256-byte
    // region stays zeroed, matching keylen == 0.
    packed[256 * 3] = out.len() as u8;
    packed[256 * 3 + 1] = t_cost.min(255) as u8;
    packed[256 * 3 + 2] = m_cost.min(255) as u8;

    crate::phase!("omegacrypt", "seed");
    let chacha_key: [u8; 32] = Sha3_256::digest(&packed).into();
    let mut stream = KeystreamCursor::new(&chacha_key);

    let mut arena = Arena::new(derived.n, 1)
        .ok_or(PhsError::OutOfMemory { bytes: derived.n * 8 })?;
    for (i, chunk) in packed.chunks(8).enumerate() {
        if i >= derived.n {
            break;
        }
        let mut buf = [0u8; 8];
        buf[..chunk.len()].copy_from_slice(chunk);
        arena.block_mut(i)[0] = u64::from_le_bytes(buf);
    }
    for i in 0..derived.n {
        let mask = stream.next_u64();
        arena.block_mut(i)[0] ^= mask;
    }

    crate::phase!("omegacrypt", "wandering");
    let mask = derived.n - 1;
    let mut carry = stream.next_u64();
    let t_iterations = 1u64 << (t_cost + BASE_TCOST).min(40);
    for _ in 0..t_iterations {
        let branch = stream.next_u8() & 3;
        match branch {
            0 => {
                let addr = (stream.next_u32() as usize) & mask;
                let val = stream.next_u64();
                arena.block_mut(addr)[0] = arena.block_mut(addr)[0].wrapping_add(carry);
                carry ^= val;
            }
            1 => {
                let addr = ((stream.next_u32() ^ 0x0a1b2c3d) as usize) & mask;
                let val = stream.next_u64();
                arena.block_mut(addr)[0] ^= carry;
                carry = carry.wrapping_add(val);
            }
            2 => {
                let addr_a = ((stream.next_u32() ^ 0xfedc0123) as usize) & mask;
                let addr_b = ((stream.next_u32() ^ 0xfedc0123) as usize) & mask;
                let val_a = stream.next_u64();
                let val_b = stream.next_u64();
                arena.block_mut(addr_a)[0] ^= val_a;
                arena.block_mut(addr_b)[0] = arena.block_mut(addr_b)[0].wrapping_add(val_b ^ carry);
                let probe = (carry as usize) & mask;
                carry ^= arena.block_mut(probe)[0];
            }
            _ => {
                let addr_a = ((stream.next_u32() ^ 0x76543210) as usize) & mask;
                let val_a = stream.next_u64();
                let val_b = stream.next_u64();
                let a_val = arena.block_mut(addr_a)[0];
                let target = (a_val as usize) & mask;
                arena.block_mut(target)[0] = arena.block_mut(target)[0].wrapping_add(carry ^ val_a);
                carry = carry.wrapping_add(a_val ^ val_b);
            }
        }
    }

    crate::phase!("omegacrypt", "extract");
    let mut state_bytes = Vec::with_capacity(derived.n * 8);
    for i in 0..derived.n {
        state_bytes.extend_from_slice(&arena.block_mut(i)[0].to_le_bytes());
    }
    let mut filled = 0;
    let mut counter: u32 = 0;
    while filled < out.len() {
        let mut hasher = Sha3_256::new();
        hasher.update(counter.to_le_bytes());
        hasher.update(&state_bytes);
        let digest = hasher.finalize();
        let take = (out.len() - filled).min(digest.len());
        out[filled..filled + take].copy_from_slice(&digest[..take]);
        filled += take;
        counter = counter.wrapping_add(1);
    }
    Ok(())
}
