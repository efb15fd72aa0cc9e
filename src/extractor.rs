//! Output Extractor (spec §4.5).
//!
//! Compresses the final arena (and, for some schemes, the password) into
//! exactly `outlen` bytes. Two shapes: a direct hash when `outlen` fits the
//! primitive's digest size, and a counter-prefixed stream otherwise.

use digest::Digest;

/// `H(arena)`, truncated to `out.len()` bytes. Valid only when
/// `out.len() <= primitive_hash_size`; callers are responsible for routing
/// to [`counter_stream`] otherwise.
pub fn full_hash_fits<D: Digest>(arena_bytes: &[u8], out: &mut [u8]) {
    let digest = D::digest(arena_bytes);
    out.copy_from_slice(&digest[..out.len()]);
}

/// Counter stream: `H(counter || arena || password)` for `counter = 1, 2,
/// ...` until `out` is filled, per spec §4.5.
pub fn counter_stream<D: Digest>(arena_bytes: &[u8], password: &[u8], out: &mut [u8]) {
    let mut counter: u64 = 1;
    let mut filled = 0;
    while filled < out.len() {
        let mut hasher = D::new();
        hasher.update(counter.to_le_bytes());
        hasher.update(arena_bytes);
        hasher.update(password);
        let digest = hasher.finalize();
        let take = (out.len() - filled).min(digest.len());
        out[filled..filled + take].copy_from_slice(&digest[..take]);
        filled += take;
        counter = counter.wrapping_add(1);
    }
}

/// Dispatches to [`full_hash_fits`] or [`counter_stream`] based on whether
/// `out` fits in one digest of `D`.
pub fn extract<D: Digest>(arena_bytes: &[u8], password: &[u8], out: &mut [u8]) {
    if out.len() <= <D as Digest>::output_size() {
        full_hash_fits::<D>(arena_bytes, out);
    } else {
        counter_stream::<D>(arena_bytes, password, out);
    }
}
