//! The error taxonomy of the kernel family.
//!
//! One variant per failure class in the component design: the Parameter
//! Decoder rejects out-of-range inputs before any allocation happens, the
//! Arena reports allocation failure, and Seed Derivation / the Output
//! Extractor report primitive failures. Every variant is detected before or
//! immediately after allocation; none are recoverable and `phs` never
//! retries.

use thiserror::Error;

/// Failure returned by [`crate::phs`] and the per-scheme entry points.
///
/// A non-`Ok` result means the output buffer was never written.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PhsError {
    /// `outlen` exceeds the scheme's maximum output length.
    #[error("requested output length {requested} exceeds the scheme maximum {max}")]
    InvalidOutputLength { requested: usize, max: usize },

    /// `saltlen` exceeds the scheme's maximum salt length.
    #[error("salt length {requested} exceeds the scheme maximum {max}")]
    InvalidSaltLength { requested: usize, max: usize },

    /// `inlen` exceeds the scheme's maximum password length.
    #[error("password length {requested} exceeds the scheme maximum {max}")]
    InvalidPasswordLength { requested: usize, max: usize },

    /// `t_cost` is outside the scheme's accepted range.
    #[error("time cost {requested} is outside the accepted range {min}..={max}")]
    InvalidTimeCost { requested: u32, min: u32, max: u32 },

    /// `m_cost` is outside the scheme's accepted range.
    #[error("memory cost {requested} is outside the accepted range {min}..={max}")]
    InvalidMemoryCost { requested: u32, min: u32, max: u32 },

    /// The arena allocation failed.
    #[error("failed to allocate the {bytes}-byte memory arena")]
    OutOfMemory { bytes: usize },

    /// The underlying hash/cipher primitive reported a failure.
    #[error("primitive failure: {reason}")]
    PrimitiveError { reason: &'static str },
}
