use crate::prelude::{FkError, FkResult};

/// Fallible allocation of per-call scratch buffers.
///
/// Buffers are plain vectors owned by the caller's stack frame, so every one
/// of them is released on every return path.
pub struct Scratch;

impl Scratch {
    /// Zero-initialised buffer of `len` elements, or `AllocationFailed`.
    pub fn checkout<T: Clone + Default>(what: &'static str, len: usize) -> FkResult<Vec<T>> {
        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(len)
            .map_err(|_| FkError::AllocationFailed { what, len })?;
        buffer.resize(len, T::default());
        Ok(buffer)
    }

    /// Product of `dims`, treating overflow as an allocation failure.
    pub fn element_count(what: &'static str, dims: &[usize]) -> FkResult<usize> {
        dims.iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d))
            .ok_or(FkError::AllocationFailed {
                what,
                len: usize::MAX,
            })
    }
}
