//! Reference mixing kernels for a family of memory-hard password-hashing
//! schemes (AntCrypt, Battcrypt, EARWORM, Lyra2, Makwa, OmegaCrypt,
//! Parallel, PolyPassHash, Pufferfish, TwoCats, and an excerpt of
//! Yescrypt).
//!
//! Every scheme shares the same five-stage pipeline (spec §2): a
//! [`params`] Decoder validates the caller's cost parameters, [`seed`]
//! derives entropy from password and salt, an [`arena`] is allocated and
//! filled and re-read by the [`mixing`] kernel, and [`extractor`] compresses
//! the final state into the output buffer. Only the bound table, the seed
//! shape, the round function, and the address schedule differ between
//! schemes — see `schemes/*.rs`.
//!
//! CLI front-ends, credential-string codecs, delegation servers, and
//! threshold secret-sharing are out of scope; see spec.md §1 Non-goals.

#[cfg(test)]
mod test;

pub mod arena;
pub mod error;
pub mod extractor;
pub mod mixing;
pub mod params;
pub mod schemes;
pub mod seed;
pub mod stats;

pub use error::PhsError;
pub use params::{DerivedParams, PhsParams};

/// Emits a `tracing::debug!` span event when the `tracing` feature is
/// enabled; a no-op otherwise. Used at the Decoder -> Seed -> Setup ->
/// Wandering -> Extract phase boundaries so the hot loop never pays for
/// instrumentation unless asked.
#[cfg(feature = "tracing")]
macro_rules! phase {
    ($scheme:expr, $phase:expr) => {
        tracing::debug!(scheme = $scheme, phase = $phase, "phs phase");
    };
}
#[cfg(not(feature = "tracing"))]
macro_rules! phase {
    ($scheme:expr, $phase:expr) => {};
}
pub(crate) use phase;
