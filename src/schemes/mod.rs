//! One module per PHC submission in the family (spec.md §1).
//!
//! Each module supplies only what is genuinely scheme-specific — its bound
//! table, its seed shape, its round function, and its address schedule —
//! and plugs those into the shared [`crate::arena`], [`crate::mixing`], and
//! [`crate::extractor`] machinery. See DESIGN.md for which `original_source`
//! file each one is grounded on.

use crate::arena::Arena;

pub mod antcrypt;
pub mod battcrypt;
pub mod earworm;
pub mod lyra2;
pub mod makwa;
pub mod omegacrypt;
pub mod parallel;
pub mod polypasshash;
pub mod pufferfish;
pub mod twocats;
pub mod yescrypt;

/// Writes the two seed-derived blocks into arena rows 0 and 1 (the
/// "squeeze twice" step of spec §4.4.2); rows 2.. are left zeroed for
/// [`crate::mixing::run_setup`] to fill.
pub(crate) fn seed_arena(arena: &mut Arena, first: &[u64], second: &[u64]) {
    arena.block_mut(0).copy_from_slice(first);
    arena.block_mut(1).copy_from_slice(second);
}
