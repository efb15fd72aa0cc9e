//! The Memory Arena (spec §4.3).
//!
//! A contiguous buffer of `M = N * W` bytes, logically organized as `N`
//! blocks of `W` 64-bit words. This is the entity that dominates resident
//! set size; everything else in one `phs` call is noise next to it.
//!
//! Addressing never fails: every index is reduced modulo `N`, either via a
//! bitmask (when `N` is a power of two, the common case) or a fixed modulo
//! otherwise. Allocation is the only fallible operation.

use zeroize::Zeroize;

/// `N` blocks of `W` 64-bit words, zeroed on drop through [`Zeroize`] so the
/// compiler cannot elide the wipe (spec §5 "Secure memory wipe").
pub struct Arena {
    words: Vec<u64>,
    n: usize,
    w: usize,
    mask: Option<usize>,
}

impl Arena {
    /// Allocates a zeroed arena of `n` blocks, each `w` words wide.
    ///
    /// Returns `None` if the allocation request overflows `usize` — the
    /// only way the Arena itself can fail (spec §4.3 "OutOfMemory").
    pub fn new(n: usize, w: usize) -> Option<Self> {
        let total = n.checked_mul(w)?;
        let mask = n.is_power_of_two().then_some(n - 1);
        Some(Self {
            words: vec![0u64; total],
            n,
            w,
            mask,
        })
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn w(&self) -> usize {
        self.w
    }

    /// Reduces `i` into `[0, N)`. Used by every address computation in the
    /// Mixing Kernel so that no index derivation can ever fail or branch on
    /// out-of-range input.
    #[inline]
    pub fn reduce(&self, i: usize) -> usize {
        match self.mask {
            Some(mask) => i & mask,
            None => i % self.n,
        }
    }

    /// Bounds-checked (in debug) view of block `i`.
    #[inline]
    pub fn block(&self, i: usize) -> &[u64] {
        let i = self.reduce(i);
        &self.words[i * self.w..(i + 1) * self.w]
    }

    #[inline]
    pub fn block_mut(&mut self, i: usize) -> &mut [u64] {
        let i = self.reduce(i);
        let w = self.w;
        &mut self.words[i * w..(i + 1) * w]
    }

    /// Copies the contents of block `src` into block `dst`; used by round
    /// functions that need a stable snapshot of a source block while also
    /// writing into the destination in place.
    pub fn read_block(&self, i: usize) -> Vec<u64> {
        self.block(i).to_vec()
    }

    /// Raw byte length of the arena, `M = N * W * 8`.
    pub fn byte_len(&self) -> usize {
        self.words.len() * 8
    }

    /// Full-extent byte view, in little-endian word order, for the Output
    /// Extractor's `H(arena)` / `H(counter || arena || password)` shapes.
    pub fn as_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.byte_len());
        for w in &self.words {
            out.extend_from_slice(&w.to_le_bytes());
        }
        out
    }
}

impl Drop for Arena {
    fn drop(&mut self) {
        self.words.zeroize();
    }
}
