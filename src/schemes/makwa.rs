//! Makwa (Thomas Pornin, 2014) — modular-squaring family.
//!
//! Grounded on `original_source/Makwa/c/makwa.c` (`makwa_hash`): the
//! password (optionally pre-hashed) is padded into a modulus-sized buffer
//! via a KDF expansion, decoded as an integer `x`, then squared modulo a
//! public RSA-like modulus `work_factor + 1` times. Key generation, the
//! escrow/delegation-server protocol, and the string-encoding format are
//! all explicitly out of scope (Non-goals); what remains — padding plus
//! repeated modular squaring — is the Mixing Kernel.
//!
//! `makwa_hash` works over an arbitrary-width RSA modulus produced by a
//! dedicated keygen tool. Generating (or trusting a caller-supplied)
//! modulus is explicitly excluded, so this instantiation fixes a
//! constant-width 1024-bit modulus at compile time (see [`MODULUS`]) purely
//! to exercise the squaring kernel; real deployments need their own
//! modulus from Makwa's keygen, not from this crate.
//!
//! The kernel has no spatial memory-hardness component in the original —
//! it is sequential-time-hard only — so this instantiation plugs into the
//! shared [`crate::mixing`] machinery with a single live row and a constant
//! address schedule, letting [`crate::mixing::run_wandering`]'s
//! `rounds_time` stand in for the squaring count.

use crate::{
    arena::Arena,
    error::PhsError,
    mixing::{self, AddressSchedule, MixingState, RoundFunction},
    params::{check_bounds, Bounds, DerivedParams, PhsParams},
    schemes::seed_arena,
    seed,
};
use sha2::Sha256;

const LIMBS: usize = 16; // 1024-bit modulus

/// A fixed 1024-bit odd modulus, little-endian limbs, used only to exercise
/// the squaring kernel. Not a validated RSA product — see module docs.
const MODULUS: [u64; LIMBS] = [
    0xFFFFFFFFFFFFFFC5,
    0xC90FDAA22168C234,
    0xC4C6628B80DC1CD1,
    0x29024E088A67CC74,
    0x020BBEA63B139B22,
    0x514A08798E3404DD,
    0xEF9519B3CD3A431B,
    0x302B0A6DF25F1437,
    0x4FE1356D6D51C245,
    0xE485B576625E7EC6,
    0xF44C42E9A637ED6B,
    0x0BFF5CB6F406B7ED,
    0xEE386BFB5A899FA5,
    0xAE9F24117C4B1FE6,
    0x49286651ECE45B3D,
    0xC208CA457A998A5D,
];

fn bounds() -> Bounds {
    Bounds {
        max_outlen: 4096,
        max_inlen: LIMBS * 8 - 32,
        max_saltlen: 255,
        min_t_cost: 0,
        max_t_cost: 1_000_000,
        min_m_cost: 0,
        max_m_cost: 0, // modulus width is fixed; m_cost is unused here
    }
}

fn derive(params: &PhsParams) -> DerivedParams {
    DerivedParams {
        n: 2,
        w: LIMBS,
        rounds_time: params.t_cost + 1,
        rounds_inner: 1,
        lanes: LIMBS,
        parallelism: 1,
        seed_len: LIMBS * 8,
    }
}

fn cmp_limbs(a: &[u64], b: &[u64]) -> std::cmp::Ordering {
    for i in (0..a.len()).rev() {
        match a[i].cmp(&b[i]) {
            std::cmp::Ordering::Equal => continue,
            other => return other,
        }
    }
    std::cmp::Ordering::Equal
}

fn sub_assign(a: &mut [u64], b: &[u64]) {
    let mut borrow = 0i128;
    for i in 0..a.len() {
        let diff = a[i] as i128 - b[i] as i128 - borrow;
        if diff < 0 {
            a[i] = (diff + (1i128 << 64)) as u64;
            borrow = 1;
        } else {
            a[i] = diff as u64;
            borrow = 0;
        }
    }
}

fn shr1(a: &mut [u64]) {
    let mut carry = 0u64;
    for limb in a.iter_mut().rev() {
        let new_carry = *limb & 1;
        *limb = (*limb >> 1) | (carry << 63);
        carry = new_carry;
    }
}

fn bit_len(a: &[u64]) -> u32 {
    for i in (0..a.len()).rev() {
        if a[i] != 0 {
            return (i as u32 + 1) * 64 - a[i].leading_zeros();
        }
    }
    0
}

/// Schoolbook widening multiply: `LIMBS x LIMBS -> 2*LIMBS` limbs.
fn mul_wide(a: &[u64], b: &[u64]) -> Vec<u64> {
    let mut acc = vec![0u128; 2 * LIMBS];
    for i in 0..LIMBS {
        let mut carry = 0u128;
        for j in 0..LIMBS {
            let prod = a[i] as u128 * b[j] as u128 + acc[i + j] + carry;
            acc[i + j] = prod & u64::MAX as u128;
            carry = prod >> 64;
        }
        acc[i + LIMBS] += carry;
    }
    acc.into_iter().map(|limb| limb as u64).collect()
}

/// Binary long division, keeping only the remainder: `product mod MODULUS`.
fn reduce_mod(product: &[u64]) -> [u64; LIMBS] {
    let mut rem = product.to_vec();
    let mut shifted = vec![0u64; 2 * LIMBS];
    shifted[..LIMBS].copy_from_slice(&MODULUS);

    let rem_bits = bit_len(&rem);
    let mod_bits = bit_len(&MODULUS);
    if rem_bits < mod_bits {
        let mut out = [0u64; LIMBS];
        out.copy_from_slice(&rem[..LIMBS]);
        return out;
    }
    let shift = rem_bits - mod_bits;
    for _ in 0..shift {
        // shifted <<= 1
        let mut carry = 0u64;
        for limb in shifted.iter_mut() {
            let new_carry = *limb >> 63;
            *limb = (*limb << 1) | carry;
            carry = new_carry;
        }
    }
    for _ in 0..=shift {
        if cmp_limbs(&rem, &shifted) != std::cmp::Ordering::Less {
            sub_assign(&mut rem, &shifted);
        }
        shr1(&mut shifted);
    }
    let mut out = [0u64; LIMBS];
    out.copy_from_slice(&rem[..LIMBS]);
    out
}

fn mod_square(a: &[u64]) -> [u64; LIMBS] {
    let wide = mul_wide(a, a);
    reduce_mod(&wide)
}

/// One modular squaring per call; `b` (the schedule's second source) is
/// unused since the kernel has no spatial component here.
struct SquaringRound;

impl RoundFunction for SquaringRound {
    fn block_words(&self) -> usize {
        LIMBS
    }

    fn update(&self, _state: &mut MixingState, a: &[u64], _b: &[u64]) -> Vec<u64> {
        mod_square(a).to_vec()
    }
}

/// Always reads back row 0 — the running squared value — and Setup never
/// runs (the arena has only two rows).
struct SelfSchedule;

impl AddressSchedule for SelfSchedule {
    fn setup_past(&self, row: usize) -> usize {
        row.saturating_sub(1)
    }

    fn wandering_addr(&self, _state: &MixingState, _tau: u32, _row: usize) -> usize {
        0
    }
}

/// Derives `outlen` bytes from `password` and `salt` under the Makwa
/// instantiation of the kernel family. `m_cost` is ignored — the modulus
/// width is fixed at compile time — and only `t_cost` (the squaring count)
/// drives the work performed.
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

    crate::phase!("makwa", "decode");
    let mut arena = Arena::new(derived.n, derived.w)
        .ok_or(PhsError::OutOfMemory { bytes: derived.n * derived.w * 8 })?;

    crate::phase!("makwa", "seed");
    // Pad password||salt||length tag into a modulus-width buffer via KDF
    // expansion, mirroring Xbuf's middle region in the original.
    let mut tagged = Vec::with_capacity(salt.len() + password.len() + 1);
    tagged.extend_from_slice(salt);
    tagged.extend_from_slice(password);
    tagged.push(password.len().min(255) as u8);
    let fill_len = (LIMBS * 8).saturating_sub(password.len() + 2);
    let filler = seed::prefixed_salt::<Sha256>(password, &tagged, fill_len);

    let mut xbuf = vec![0u8; LIMBS * 8];
    xbuf[0] = 0;
    xbuf[1..1 + filler.len()].copy_from_slice(&filler);
    let tail_start = xbuf.len() - password.len() - 1;
    xbuf[tail_start..tail_start + password.len()].copy_from_slice(password);
    *xbuf.last_mut().unwrap() = password.len().min(255) as u8;

    let first = seed::bytes_to_words_le(&xbuf);
    let second = vec![0u64; LIMBS];
    seed_arena(&mut arena, &first, &second);
    let mut state = MixingState::new(1);

    let rf = SquaringRound;
    let sched = SelfSchedule;

    crate::phase!("makwa", "setup");
    mixing::run_setup(&mut arena, &mut state, &rf, &sched);
    crate::phase!("makwa", "wandering");
    mixing::run_wandering(&mut arena, &mut state, &rf, &sched, derived.rounds_time);

    crate::phase!("makwa", "extract");
    // run_wandering alternates the row it writes the clean squared value
    // into; with two rows the last-written one depends on the parity of
    // the round count, since odd taus sweep descending (ending at row 0)
    // and even taus sweep ascending (ending at row 1).
    let final_row = if derived.rounds_time % 2 == 1 { 0 } else { 1 };
    let result_bytes: Vec<u8> = arena.read_block(final_row).iter().flat_map(|w| w.to_le_bytes()).collect();
    if out.len() == result_bytes.len() {
        out.copy_from_slice(&result_bytes);
    } else {
        let post = seed::prefixed_salt::<Sha256>(&result_bytes, salt, out.len());
        out.copy_from_slice(&post);
    }
    Ok(())
}
