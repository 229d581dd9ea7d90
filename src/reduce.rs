//! Element-wise reduction and fallible vector allocation shared by the
//! collective algorithms, the reference collectives and the harnesses.

use crate::error::{Result, RingtreeError};
use crate::types::{Element, ReduceOp};

/// Fold `src` into `dst` element-wise: `dst[i] = op(dst[i], src[i])`.
///
/// Both slices must hold the same number of elements.
pub fn reduce_slice(dst: &mut [Element], src: &[Element], op: ReduceOp) -> Result<()> {
    if dst.len() != src.len() {
        return Err(RingtreeError::BufferSizeMismatch {
            expected: dst.len(),
            actual: src.len(),
        });
    }
    for (d, &s) in dst.iter_mut().zip(src) {
        *d = op.combine(*d, s);
    }
    Ok(())
}

/// Allocate a zeroed vector of `count` elements, reporting allocation
/// failure as an error instead of aborting the process.
pub fn alloc_vector(count: usize) -> Result<Vec<Element>> {
    let mut v = Vec::new();
    v.try_reserve_exact(count)
        .map_err(|_| RingtreeError::OutOfMemory { count })?;
    v.resize(count, 0);
    Ok(v)
}

/// Index of the first element where `got` and `expect` disagree. A length
/// difference counts as a mismatch at the end of the shorter slice.
pub fn first_mismatch(got: &[Element], expect: &[Element]) -> Option<usize> {
    got.iter()
        .zip(expect)
        .position(|(a, b)| a != b)
        .or_else(|| (got.len() != expect.len()).then(|| got.len().min(expect.len())))
}
