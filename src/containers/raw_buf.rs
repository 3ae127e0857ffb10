//! Raw allocation layer shared by every container
//!
//! `RawBuf` owns a block of `cap` slots and nothing else: it never reads,
//! writes, or drops elements. Growth goes through `realloc`, so the live
//! range is carried over in a single block move and often without copying
//! at all when the allocator can extend in place.

use std::alloc::{self, Layout};
use std::marker::PhantomData;
use std::mem;
use std::ptr::{self, NonNull};

pub(crate) struct RawBuf<T> {
    ptr: Option<NonNull<T>>,
    cap: usize,
    _marker: PhantomData<T>,
}

#[cold]
pub(crate) fn capacity_overflow() -> ! {
    panic!("capacity overflow");
}

impl<T> RawBuf<T> {
    const IS_ZST: bool = mem::size_of::<T>() == 0;

    #[inline]
    pub(crate) const fn new() -> Self {
        Self {
            ptr: None,
            cap: 0,
            _marker: PhantomData,
        }
    }

    pub(crate) fn with_capacity(cap: usize) -> Self {
        let mut buf = Self::new();
        buf.resize_to(cap);
        buf
    }

    /// Adopt an existing allocation.
    ///
    /// # Safety
    ///
    /// `ptr` must have been allocated by the global allocator with
    /// `Layout::array::<T>(cap)`, and `cap` must be non-zero for sized `T`.
    pub(crate) unsafe fn from_raw_parts(ptr: NonNull<T>, cap: usize) -> Self {
        debug_assert!(cap > 0 || Self::IS_ZST);
        Self {
            ptr: Some(ptr),
            cap,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.cap
    }

    #[inline]
    pub(crate) fn is_allocated(&self) -> bool {
        self.ptr.is_some()
    }

    /// Base pointer; dangling (never null) when nothing is allocated.
    #[inline]
    pub(crate) fn ptr(&self) -> *mut T {
        match self.ptr {
            Some(ptr) => ptr.as_ptr(),
            None => NonNull::dangling().as_ptr(),
        }
    }

    /// Reallocate to exactly `new_cap` slots.
    ///
    /// Slots `[0, min(old_cap, new_cap))` keep their bytes. A capacity of zero
    /// releases the block. Allocation failure is handed to the global
    /// allocation error hook.
    pub(crate) fn resize_to(&mut self, new_cap: usize) {
        if new_cap == self.cap {
            return;
        }

        if new_cap == 0 {
            self.free();
            return;
        }

        if Self::IS_ZST {
            self.ptr = Some(NonNull::dangling());
            self.cap = new_cap;
            return;
        }

        let new_layout = Self::layout_for(new_cap);
        let raw = match self.ptr {
            Some(ptr) => {
                let old_layout = Self::layout_for(self.cap);
                // SAFETY: `ptr` was allocated with `old_layout` and the new size is non-zero.
                unsafe { alloc::realloc(ptr.as_ptr().cast::<u8>(), old_layout, new_layout.size()) }
            }
            // SAFETY: `new_layout` has a non-zero size.
            None => unsafe { alloc::alloc(new_layout) },
        };

        let Some(ptr) = NonNull::new(raw.cast::<T>()) else {
            alloc::handle_alloc_error(new_layout)
        };

        self.ptr = Some(ptr);
        self.cap = new_cap;
    }

    /// Release the block. Live elements must already have been dropped.
    pub(crate) fn free(&mut self) {
        if let Some(ptr) = self.ptr.take() {
            if !Self::IS_ZST && self.cap > 0 {
                // SAFETY: the block was allocated with this exact layout.
                unsafe { alloc::dealloc(ptr.as_ptr().cast::<u8>(), Self::layout_for(self.cap)) };
            }
        }
        self.cap = 0;
    }

    #[inline]
    pub(crate) fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    fn layout_for(cap: usize) -> Layout {
        Layout::array::<T>(cap).unwrap_or_else(|_| capacity_overflow())
    }
}

impl<T> Drop for RawBuf<T> {
    fn drop(&mut self) {
        self.free();
    }
}

// Safety: RawBuf<T> owns its block exclusively, like Box<[T]>
unsafe impl<T: Send> Send for RawBuf<T> {}

// Safety: shared access to RawBuf<T> never mutates the block
unsafe impl<T: Sync> Sync for RawBuf<T> {}

/// Copy `count` slots between two possibly overlapping ranges of one block.
///
/// # Safety
///
/// Both ranges must lie within the same allocation.
#[inline]
pub(crate) unsafe fn shift<T>(base: *mut T, from: usize, to: usize, count: usize) {
    if count > 0 && from != to {
        // SAFETY: guaranteed by the caller.
        unsafe { ptr::copy(base.add(from), base.add(to), count) };
    }
}
