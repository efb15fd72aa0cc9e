//! Seed Derivation / Primitive Adapter (spec §4.2).
//!
//! Produces `seed_len` bytes of seed material from `(password, salt,
//! params)` using a scheme's PRF. The three shapes named in spec.md are
//! implemented here once each, generic over the hash primitive (itself
//! always an upstream crate — [`sha2`], [`sha3`], or [`blake2`] — never
//! reimplemented): double-hash, prefixed-salt (EARWORM), and padded
//! concatenation with a `basil` prefix (Lyra2).

use digest::Digest;
use zeroize::Zeroizing;

/// Seed material: entropy carried from password+salt into the kernel,
/// wiped on drop.
pub type SeedMaterial = Zeroizing<Vec<u8>>;

/// `seed = PRF(PRF(salt) || password)`.
pub fn double_hash<D: Digest>(password: &[u8], salt: &[u8]) -> SeedMaterial {
    let salt_digest = D::digest(salt);
    let mut hasher = D::new();
    hasher.update(&salt_digest);
    hasher.update(password);
    Zeroizing::new(hasher.finalize().to_vec())
}

/// EARWORM-style prefixed salt: for counter `i` starting at zero,
/// `block_i = PRF(BE32(i) || prefixed_salt || password)`, concatenated
/// until at least `out_len` bytes have been produced.
pub fn prefixed_salt<D: Digest>(password: &[u8], prefixed_salt: &[u8], out_len: usize) -> SeedMaterial {
    let mut out = Vec::with_capacity(out_len);
    let mut counter: u32 = 0;
    while out.len() < out_len {
        let mut hasher = D::new();
        hasher.update(counter.to_be_bytes());
        hasher.update(prefixed_salt);
        hasher.update(password);
        out.extend_from_slice(&hasher.finalize());
        counter = counter.wrapping_add(1);
    }
    out.truncate(out_len);
    Zeroizing::new(out)
}

/// Lyra2-style padded concatenation: `pad10*1(password || salt || basil)`,
/// where `basil` packs every numeric parameter in a fixed order. The C
/// reference encodes `basil` via `memcpy` of host `int`s, which makes its
/// test vectors endian-dependent; this crate fixes little-endian encoding
/// (see DESIGN.md) and pads to a multiple of `block_bytes`.
pub fn padded_concat(password: &[u8], salt: &[u8], basil: &[u8], block_bytes: usize) -> SeedMaterial {
    let mut buf = Vec::with_capacity(password.len() + salt.len() + basil.len() + block_bytes);
    buf.extend_from_slice(password);
    buf.extend_from_slice(salt);
    buf.extend_from_slice(basil);

    // pad10*1: append a single 1 bit (0x80 byte, byte-aligned here), then
    // zero bytes, then a final 1 bit, so the total length is a multiple of
    // `block_bytes` and at least one full pad byte is always present.
    buf.push(0x80);
    let rem = buf.len() % block_bytes;
    if rem != 0 {
        buf.resize(buf.len() + (block_bytes - rem), 0);
    } else {
        buf.resize(buf.len() + block_bytes, 0);
    }
    *buf.last_mut().unwrap() |= 0x01;

    Zeroizing::new(buf)
}

/// Packs `PhsParams`-derived integers into a fixed little-endian `basil`
/// prefix, in the order `kLen, pwdlen, saltlen, t_cost, n_rows, n_cols`.
pub fn lyra2_basil(k_len: u64, pwd_len: u64, salt_len: u64, t_cost: u64, n_rows: u64, n_cols: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(48);
    for v in [k_len, pwd_len, salt_len, t_cost, n_rows, n_cols] {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out
}

/// Expands `seed` into the two initial arena blocks (spec §4.4.2 "squeeze
/// twice"): `w`-word blocks are produced by hashing `seed` with an
/// incrementing counter until enough bytes exist, then split in half.
pub fn squeeze_two_blocks<D: Digest>(seed: &[u8], w: usize) -> (Vec<u64>, Vec<u64>) {
    let need_bytes = w * 8 * 2;
    let mut out = Vec::with_capacity(need_bytes);
    let mut counter: u32 = 0;
    while out.len() < need_bytes {
        let mut hasher = D::new();
        hasher.update(counter.to_le_bytes());
        hasher.update(seed);
        out.extend_from_slice(&hasher.finalize());
        counter = counter.wrapping_add(1);
    }
    out.truncate(need_bytes);
    let (first, second) = out.split_at(w * 8);
    (bytes_to_words_le(first), bytes_to_words_le(second))
}

/// Splits a byte buffer into `u64` words, little-endian, padding the final
/// partial word with zero bytes. Used to seed [`crate::mixing::MixingState`]
/// from raw seed material.
pub fn bytes_to_words_le(bytes: &[u8]) -> Vec<u64> {
    bytes
        .chunks(8)
        .map(|chunk| {
            let mut buf = [0u8; 8];
            buf[..chunk.len()].copy_from_slice(chunk);
            u64::from_le_bytes(buf)
        })
        .collect()
}
