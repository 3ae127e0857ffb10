//! Element-ops strategies
//!
//! A [`GrowVec`](super::GrowVec) is parameterized by how its elements are
//! copied and destroyed:
//!
//! - [`Constructing`] works for any `T`. Copies call `Clone::clone` once per
//!   element and vacated slots run the element's destructor.
//! - [`Trivial`] requires `T: Copy`. Copies are a single block copy and
//!   vacated slots are simply forgotten.
//!
//! Moving elements within a buffer is a bitwise copy for every Rust type, so
//! shifting and growth are shared by both strategies. The strategy is chosen
//! at compile time and is never observable through the container's API.

use std::mem;
use std::ptr;

/// Destruction side of a strategy.
pub trait ElementOps<T> {
    /// `true` when elements need no per-element work at all.
    const TRIVIAL: bool;

    /// Destroy `count` initialised elements starting at `base`.
    ///
    /// # Safety
    ///
    /// The range must hold initialised elements that are not used again.
    unsafe fn destroy(base: *mut T, count: usize);
}

/// Copy side of a strategy.
pub trait CloneOps<T>: ElementOps<T> {
    /// Produce an independent copy of one element.
    fn duplicate(value: &T) -> T;

    /// Write copies of every element of `src` into consecutive slots at `dst`.
    ///
    /// # Safety
    ///
    /// `dst` must be valid for `src.len()` writes, must not overlap `src`,
    /// and the slots must not hold live elements.
    unsafe fn copy_to(src: &[T], dst: *mut T);

    /// Write `count` copies of `value` into consecutive slots at `dst`.
    ///
    /// # Safety
    ///
    /// Same requirements as [`CloneOps::copy_to`].
    unsafe fn fill_to(dst: *mut T, count: usize, value: &T);
}

/// Per-element clone and drop, for arbitrary element types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Constructing;

/// Block copies and no destructors, for `Copy` element types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Trivial;

impl<T> ElementOps<T> for Constructing {
    const TRIVIAL: bool = false;

    #[inline]
    unsafe fn destroy(base: *mut T, count: usize) {
        if mem::needs_drop::<T>() && count > 0 {
            // SAFETY: guaranteed by the caller.
            unsafe { ptr::drop_in_place(ptr::slice_from_raw_parts_mut(base, count)) };
        }
    }
}

impl<T: Clone> CloneOps<T> for Constructing {
    #[inline]
    fn duplicate(value: &T) -> T {
        value.clone()
    }

    unsafe fn copy_to(src: &[T], dst: *mut T) {
        for (i, item) in src.iter().enumerate() {
            // SAFETY: `dst + i` is within the caller's writable range.
            unsafe { dst.add(i).write(item.clone()) };
        }
    }

    unsafe fn fill_to(dst: *mut T, count: usize, value: &T) {
        for i in 0..count {
            // SAFETY: `dst + i` is within the caller's writable range.
            unsafe { dst.add(i).write(value.clone()) };
        }
    }
}

impl<T: Copy> ElementOps<T> for Trivial {
    const TRIVIAL: bool = true;

    #[inline]
    unsafe fn destroy(_base: *mut T, _count: usize) {}
}

impl<T: Copy> CloneOps<T> for Trivial {
    #[inline]
    fn duplicate(value: &T) -> T {
        *value
    }

    #[inline]
    unsafe fn copy_to(src: &[T], dst: *mut T) {
        // SAFETY: guaranteed by the caller.
        unsafe { ptr::copy_nonoverlapping(src.as_ptr(), dst, src.len()) };
    }

    #[inline]
    unsafe fn fill_to(dst: *mut T, count: usize, value: &T) {
        for i in 0..count {
            // SAFETY: `dst + i` is within the caller's writable range.
            unsafe { dst.add(i).write(*value) };
        }
    }
}
