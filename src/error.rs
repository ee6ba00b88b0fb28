//! Errors reported by the checked wrapper layer.
//!
//! The kernels never fail; they panic on undersized buffers and otherwise
//! always return a value. These errors come from the entry points that
//! validate caller input before a kernel runs.

use crate::math::dot_product_i8::dispatch::Kernel;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DotProductError {
    #[error("vectors must have the same length (left: {left}, right: {right})")]
    LengthMismatch { left: usize, right: usize },

    #[error("unknown kernel '{0}' (expected scalar, fixed-width or scalable-width)")]
    UnknownKernel(String),

    #[error("kernel '{0}' is not supported by this CPU")]
    UnsupportedKernel(Kernel),

    #[error("corpus length {len} is not a multiple of the dimension {dim}")]
    RaggedCorpus { len: usize, dim: usize },

    #[error("vector dimension must be greater than zero")]
    ZeroDimension,

    #[error("score buffer holds {actual} entries, corpus has {expected} rows")]
    ScoreBufferLength { expected: usize, actual: usize },

    #[error("variant '{variant}' returned {actual} for length {len}, expected {expected}")]
    VariantMismatch {
        variant: &'static str,
        len: usize,
        expected: i32,
        actual: i32,
    },
}

pub type Result<T> = std::result::Result<T, DotProductError>;
