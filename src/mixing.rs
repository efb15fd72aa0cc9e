//! The Mixing Kernel (spec §4.4) — the core of the whole family.
//!
//! Two phases, Setup and Wandering, run over the same [`Arena`]. Both are
//! expressed here exactly once, generic over a scheme-supplied
//! [`RoundFunction`] (the block-update primitive `F`, spec §4.4.1) and
//! [`AddressSchedule`] (the source-selection rule for Setup and Wandering,
//! spec §4.4.2/§4.4.3). Every scheme in `schemes/` is just one small impl of
//! each trait plugged into [`run_setup`] and [`run_wandering`].

use crate::arena::Arena;
use zeroize::Zeroize;

/// Register-resident mixing state, mutated only by the kernel.
///
/// Width (lane count) varies per scheme: 8 lanes for a Blake2b-style
/// sponge, 16 for AntCrypt's permutation state, and so on — callers size it
/// via [`MixingState::new`].
#[derive(Clone)]
pub struct MixingState(Vec<u64>);

impl MixingState {
    pub fn new(lanes: usize) -> Self {
        Self(vec![0u64; lanes])
    }

    pub fn from_words(words: Vec<u64>) -> Self {
        Self(words)
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }

    pub fn as_mut_slice(&mut self) -> &mut [u64] {
        &mut self.0
    }
}

impl Drop for MixingState {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// The block-update primitive `F` (spec §4.4.1):
///
/// ```text
/// read a = arena[src1]; b = arena[src2]
/// S <- F(S, a, b)
/// arena[dst] <- extract(S, arena[dst])
/// ```
///
/// Implementations absorb the two source blocks into `state` and return the
/// words to be written to the destination block. They must not branch on
/// the *contents* of `a`/`b`/`state` in a way that would leak timing
/// (spec §4.4.4): index derivation happens entirely outside `update`.
pub trait RoundFunction {
    /// Width, in words, of the blocks this round function consumes and
    /// produces. Must match the arena's block width `W`.
    fn block_words(&self) -> usize;

    fn update(&self, state: &mut MixingState, a: &[u64], b: &[u64]) -> Vec<u64>;
}

/// The address-selection rule for both kernel phases.
pub trait AddressSchedule {
    /// `deterministic_past(row)` for the Setup phase (spec §4.4.2).
    /// Must satisfy `setup_past(row) < row` for all `row >= 2`, and must not
    /// depend on password-derived state — only on `row` and public
    /// parameters.
    fn setup_past(&self, row: usize) -> usize;

    /// `pseudorandom_from_state(S)` for the Wandering phase (spec §4.4.3).
    fn wandering_addr(&self, state: &MixingState, tau: u32, row: usize) -> usize;
}

/// Runs the Setup phase: fills every block from row 2 onward in a
/// deterministic, password-independent schedule. Blocks 0 and 1 must
/// already hold the seed-derived state (the two initial "squeezes") before
/// this is called.
pub fn run_setup(arena: &mut Arena, state: &mut MixingState, rf: &dyn RoundFunction, sched: &dyn AddressSchedule) {
    debug_assert_eq!(rf.block_words(), arena.w());
    for row in 2..arena.n() {
        let src1 = row - 1;
        let src2 = sched.setup_past(row);
        let a = arena.read_block(src1);
        let b = arena.read_block(src2);
        let out = rf.update(state, &a, &b);
        arena.block_mut(row).copy_from_slice(&out);
    }
}

/// Runs the Wandering phase for `rounds_time` repetitions (spec §4.4.3),
/// alternating sweep direction on odd/even `tau` and feeding a rotated copy
/// of each update's output back into the secondary source block to
/// penalize time-memory tradeoffs.
pub fn run_wandering(
    arena: &mut Arena,
    state: &mut MixingState,
    rf: &dyn RoundFunction,
    sched: &dyn AddressSchedule,
    rounds_time: u32,
) {
    debug_assert_eq!(rf.block_words(), arena.w());
    let n = arena.n();
    for tau in 1..=rounds_time {
        let descending = tau % 2 == 1;
        let mut prev = if descending { 0 } else { n - 1 };
        let rows: Box<dyn Iterator<Item = usize>> = if descending {
            Box::new((0..n).rev())
        } else {
            Box::new(0..n)
        };
        for row in rows {
            let rowa = arena.reduce(sched.wandering_addr(state, tau, row));
            let a = arena.read_block(prev);
            let b = arena.read_block(rowa);
            let out = rf.update(state, &a, &b);
            arena.block_mut(row).copy_from_slice(&out);

            let fb = rotate_words_left(&out, 1);
            let rowa_block = arena.block_mut(rowa);
            for (slot, f) in rowa_block.iter_mut().zip(fb.iter()) {
                *slot ^= f;
            }
            prev = row;
        }
    }
}

/// Rotates a word vector left by `by` words — the `rotW` of spec §4.4.1's
/// feedback write.
pub fn rotate_words_left(words: &[u64], by: usize) -> Vec<u64> {
    if words.is_empty() {
        return Vec::new();
    }
    let by = by % words.len();
    let mut out = Vec::with_capacity(words.len());
    out.extend_from_slice(&words[by..]);
    out.extend_from_slice(&words[..by]);
    out
}
