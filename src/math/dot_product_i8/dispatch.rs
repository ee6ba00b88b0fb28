//! Runtime kernel selection and the checked entry points.
//!
//! The vector kernels only confirm that their extension is present (a cached
//! flag load) before running. Choosing between them is done here: this module
//! probes the hardware once, picks one of a closed set of strategies and
//! hands out its function pointer. Selection can be forced through the
//! `VDOT8_KERNEL` environment variable, which is also the escape hatch on
//! machines that advertise an extension they do not actually implement.

use super::code::{self, lanes, DotProductI8Fn};
use crate::error::{DotProductError, Result};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::{debug, info, warn};

/// Environment variable overriding the probed kernel.
pub const KERNEL_ENV_VAR: &str = "VDOT8_KERNEL";

/// Hardware capability tier of a kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kernel {
    /// Plain scalar loop, runs everywhere.
    Scalar,
    /// Fixed 128-bit vectors (aarch64 NEON + dotprod).
    FixedWidth,
    /// Scalable vectors whose width is read at run time (aarch64 SVE).
    ScalableWidth,
}

impl Kernel {
    pub const ALL: [Kernel; 3] = [Kernel::Scalar, Kernel::FixedWidth, Kernel::ScalableWidth];

    pub fn name(self) -> &'static str {
        match self {
            Kernel::Scalar => "scalar",
            Kernel::FixedWidth => "fixed-width",
            Kernel::ScalableWidth => "scalable-width",
        }
    }

    /// Runtime probe: can this kernel execute on the current CPU?
    pub fn is_supported(self) -> bool {
        match self {
            Kernel::Scalar => true,
            #[cfg(target_arch = "aarch64")]
            Kernel::FixedWidth => code::aarch64_neon::is_available(),
            #[cfg(target_arch = "aarch64")]
            Kernel::ScalableWidth => code::aarch64_sve::is_available(),
            #[cfg(not(target_arch = "aarch64"))]
            Kernel::FixedWidth | Kernel::ScalableWidth => false,
        }
    }

    /// The kernel function, or `None` if the CPU cannot run it.
    pub fn function(self) -> Option<DotProductI8Fn> {
        if !self.is_supported() {
            return None;
        }
        match self {
            Kernel::Scalar => Some(code::dot8s as DotProductI8Fn),
            #[cfg(target_arch = "aarch64")]
            Kernel::FixedWidth => Some(code::vdot8s_neon as DotProductI8Fn),
            #[cfg(target_arch = "aarch64")]
            Kernel::ScalableWidth => Some(code::vdot8s_sve as DotProductI8Fn),
            #[cfg(not(target_arch = "aarch64"))]
            Kernel::FixedWidth | Kernel::ScalableWidth => None,
        }
    }

    /// Like [`Kernel::function`] but reports an unsupported kernel as an error.
    pub fn require(self) -> Result<DotProductI8Fn> {
        self.function()
            .ok_or(DotProductError::UnsupportedKernel(self))
    }

    /// Pick the best kernel for this CPU.
    ///
    /// Scalable-width wins when its vectors are wider than 128 bits. With
    /// 128-bit SVE both vector kernels do the same work per instruction, and
    /// fixed-width is preferred.
    pub fn probe() -> Kernel {
        let sve_bytes = scalable_vector_length();
        let fixed = Kernel::FixedWidth.is_supported();
        debug!(?sve_bytes, fixed_width = fixed, "probed vector extensions");

        match sve_bytes {
            Some(bytes) if bytes > lanes::FIXED_VECTOR_BYTES => Kernel::ScalableWidth,
            _ if fixed => Kernel::FixedWidth,
            Some(_) => Kernel::ScalableWidth,
            None => Kernel::Scalar,
        }
    }
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Kernel {
    type Err = DotProductError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scalar" | "original" => Ok(Kernel::Scalar),
            "fixed-width" | "fixed" | "neon" => Ok(Kernel::FixedWidth),
            "scalable-width" | "scalable" | "sve" => Ok(Kernel::ScalableWidth),
            _ => Err(DotProductError::UnknownKernel(s.to_string())),
        }
    }
}

/// Vector length in bytes of the scalable extension, if the CPU has it.
pub fn scalable_vector_length() -> Option<usize> {
    #[cfg(target_arch = "aarch64")]
    {
        code::sve_vector_length()
    }
    #[cfg(not(target_arch = "aarch64"))]
    {
        None
    }
}

/// Resolve the kernel to use from an optional override string.
///
/// Falls back to [`Kernel::probe`] when the override is absent, unknown or
/// not runnable on this CPU.
pub fn resolve(requested: Option<&str>) -> Kernel {
    let Some(requested) = requested else {
        return Kernel::probe();
    };

    match requested.parse::<Kernel>() {
        Ok(kernel) if kernel.is_supported() => kernel,
        Ok(kernel) => {
            let fallback = Kernel::probe();
            warn!(%kernel, %fallback, "requested kernel not supported by this CPU");
            fallback
        }
        Err(err) => {
            let fallback = Kernel::probe();
            warn!(%err, %fallback, "ignoring kernel override");
            fallback
        }
    }
}

static SELECTED: OnceLock<(Kernel, DotProductI8Fn)> = OnceLock::new();

fn selection() -> (Kernel, DotProductI8Fn) {
    *SELECTED.get_or_init(|| {
        let requested = std::env::var(KERNEL_ENV_VAR).ok();
        let kernel = resolve(requested.as_deref());
        info!(%kernel, "selected int8 dot product kernel");
        // resolve() only returns supported kernels; scalar is the floor.
        let function = kernel.function().unwrap_or(code::dot8s as DotProductI8Fn);
        (kernel, function)
    })
}

/// The kernel chosen for this process (probed once, then cached).
pub fn selected() -> Kernel {
    selection().0
}

/// Function pointer of the selected kernel.
pub fn selected_function() -> DotProductI8Fn {
    selection().1
}

/// Dot product of two equal-length vectors using the selected kernel.
///
/// # Panics
/// Panics if the vectors have different lengths.
///
/// # Example
/// ```
/// use vdot8::math::dot_product_i8::dot_product;
///
/// let a = [1i8, -2, 3];
/// let b = [4i8, 5, -6];
/// assert_eq!(dot_product(&a, &b), 4 - 10 - 18);
/// ```
pub fn dot_product(a: &[i8], b: &[i8]) -> i32 {
    assert_eq!(a.len(), b.len(), "Vectors must have the same length");
    (selected_function())(a, b, a.len())
}

/// Checked variant of [`dot_product`].
pub fn try_dot_product(a: &[i8], b: &[i8]) -> Result<i32> {
    if a.len() != b.len() {
        return Err(DotProductError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok((selected_function())(a, b, a.len()))
}

/// Score `query` against every `dim`-element row of a flattened corpus with
/// the selected kernel, writing one score per row.
pub fn score_batch(query: &[i8], corpus: &[i8], dim: usize, scores: &mut [i32]) -> Result<()> {
    score_batch_with(selected_function(), query, corpus, dim, scores)
}

/// [`score_batch`] with an explicit kernel.
pub fn score_batch_with(
    kernel: DotProductI8Fn,
    query: &[i8],
    corpus: &[i8],
    dim: usize,
    scores: &mut [i32],
) -> Result<()> {
    if dim == 0 {
        return Err(DotProductError::ZeroDimension);
    }
    if query.len() != dim {
        return Err(DotProductError::LengthMismatch {
            left: query.len(),
            right: dim,
        });
    }
    if corpus.len() % dim != 0 {
        return Err(DotProductError::RaggedCorpus {
            len: corpus.len(),
            dim,
        });
    }
    let rows = corpus.len() / dim;
    if scores.len() != rows {
        return Err(DotProductError::ScoreBufferLength {
            expected: rows,
            actual: scores.len(),
        });
    }

    for (row, score) in corpus.chunks_exact(dim).zip(scores.iter_mut()) {
        *score = kernel(query, row, dim);
    }
    Ok(())
}
