//! The Parameter Decoder (spec §4.1).
//!
//! Validates `(outlen, inlen, saltlen, t_cost, m_cost)` against a scheme's
//! bound table and derives the working dimensions the Mixing Kernel runs
//! over. Every scheme module owns its own bound table (the table in spec.md
//! is representative, not exhaustive) and calls [`decode`] to apply it
//! uniformly. Out-of-range inputs fail before any allocation.

use crate::error::PhsError;

/// Caller-supplied parameters to one `phs` call. Read-only to the kernel.
#[derive(Debug, Clone, Copy)]
pub struct PhsParams {
    pub outlen: usize,
    pub inlen: usize,
    pub saltlen: usize,
    pub t_cost: u32,
    pub m_cost: u32,
}

/// Per-scheme acceptance bounds, fed into [`decode`].
#[derive(Debug, Clone, Copy)]
pub struct Bounds {
    pub max_outlen: usize,
    pub max_inlen: usize,
    pub max_saltlen: usize,
    pub min_t_cost: u32,
    pub max_t_cost: u32,
    pub min_m_cost: u32,
    pub max_m_cost: u32,
}

/// Working dimensions derived from [`PhsParams`] once validated.
///
/// `n` and `w` are the arena's block count and block width in 64-bit words;
/// `rounds_time` is the Wandering phase repetition count `T`; `rounds_inner`
/// is the inner round count of the scheme's round function; `lanes` is the
/// width (in words) of the in-register [`MixingState`](crate::mixing::MixingState);
/// `parallelism` is the shard count (1 unless the scheme defines sharding).
#[derive(Debug, Clone, Copy)]
pub struct DerivedParams {
    pub n: usize,
    pub w: usize,
    pub rounds_time: u32,
    pub rounds_inner: u32,
    pub lanes: usize,
    pub parallelism: u32,
    pub seed_len: usize,
}

/// Validates `params` against `bounds`, failing with the matching
/// `PhsError` variant before any allocation takes place.
pub fn check_bounds(params: &PhsParams, bounds: &Bounds) -> Result<(), PhsError> {
    if params.outlen > bounds.max_outlen {
        return Err(PhsError::InvalidOutputLength {
            requested: params.outlen,
            max: bounds.max_outlen,
        });
    }
    if params.saltlen > bounds.max_saltlen {
        return Err(PhsError::InvalidSaltLength {
            requested: params.saltlen,
            max: bounds.max_saltlen,
        });
    }
    if params.inlen > bounds.max_inlen {
        return Err(PhsError::InvalidPasswordLength {
            requested: params.inlen,
            max: bounds.max_inlen,
        });
    }
    if params.t_cost < bounds.min_t_cost || params.t_cost > bounds.max_t_cost {
        return Err(PhsError::InvalidTimeCost {
            requested: params.t_cost,
            min: bounds.min_t_cost,
            max: bounds.max_t_cost,
        });
    }
    if params.m_cost < bounds.min_m_cost || params.m_cost > bounds.max_m_cost {
        return Err(PhsError::InvalidMemoryCost {
            requested: params.m_cost,
            min: bounds.min_m_cost,
            max: bounds.max_m_cost,
        });
    }
    Ok(())
}
