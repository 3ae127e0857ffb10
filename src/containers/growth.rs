//! Capacity growth policy.

/// Slots added on top of doubling, so an empty buffer jumps straight to two.
pub const GROWTH_PAD: usize = 2;

/// Capacity to reallocate to when `required` slots no longer fit in `current`.
///
/// Grows to `2 * current + 2`, or to `required` if that is larger.
#[inline]
pub fn next_capacity(current: usize, required: usize) -> usize {
    current
        .saturating_mul(2)
        .saturating_add(GROWTH_PAD)
        .max(required)
}
