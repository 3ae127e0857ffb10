//! Intrusive retain counting
//!
//! Every container carries its own atomic retain count. [`Retained`] is the
//! shared handle that drives it: creating or cloning a handle retains, and
//! dropping the last handle destroys the container.

use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;
use std::ptr::NonNull;

/// Types that embed their own retain count.
///
/// Changing the count is `unsafe`: [`Retained`] frees the value and hands out
/// `&mut` access based on it, so a stray `release` through a shared handle
/// would free the value under the other handles.
///
/// ```compile_fail,E0133
/// use catvec::{PodVec, Retain, Retained};
///
/// let a = Retained::new(PodVec::<i32>::new());
/// let b = a.clone();
/// a.release();
/// ```
///
/// # Safety
///
/// `retain_count` must report exactly the number of `retain` calls minus the
/// number of `release` calls made on this instance.
pub unsafe trait Retain {
    /// Increment the retain count.
    ///
    /// # Safety
    ///
    /// Every call must be balanced by exactly one later [`Retain::release`]
    /// by the same owner.
    unsafe fn retain(&self);

    /// Decrement the retain count, returning `true` when it reached zero or
    /// below and the owner should destroy the value.
    ///
    /// # Safety
    ///
    /// The caller must hold a retain taken earlier, must not use it again,
    /// and must destroy the value when this returns `true`.
    unsafe fn release(&self) -> bool;

    /// Current retain count; zero for a value no handle has retained yet.
    fn retain_count(&self) -> i32;
}

/// Shared-ownership handle over a value with an intrusive retain count
///
/// # Examples
///
/// ```rust
/// use catvec::{PodVec, Retain, Retained};
///
/// let shared = Retained::new(PodVec::from_slice(&[1, 2, 3]));
/// let other = shared.clone();
/// assert_eq!(shared.retain_count(), 2);
/// drop(other);
/// assert_eq!(shared.retain_count(), 1);
/// assert_eq!(shared.len(), 3);
/// ```
pub struct Retained<V: Retain> {
    ptr: NonNull<V>,
    _marker: PhantomData<V>,
}

impl<V: Retain> Retained<V> {
    /// Move `value` to the heap and take the first retain on it.
    ///
    /// Any count the value carried in is discarded, so the new handle is
    /// always the sole owner.
    pub fn new(value: V) -> Self {
        let ptr = NonNull::from(Box::leak(Box::new(value)));
        let handle = Self {
            ptr,
            _marker: PhantomData,
        };
        // SAFETY: `value` was moved in, so nothing else can rely on its count.
        unsafe {
            while handle.retain_count() > 0 {
                handle.release();
            }
            while handle.retain_count() < 0 {
                handle.retain();
            }
            handle.retain();
        }
        handle
    }

    /// Whether two handles point at the same value.
    #[inline]
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        this.ptr == other.ptr
    }

    /// Mutable access, available only while this is the sole handle.
    pub fn get_mut(this: &mut Self) -> Option<&mut V> {
        if this.retain_count() == 1 {
            // SAFETY: no other handle exists, so this borrow is unique.
            Some(unsafe { this.ptr.as_mut() })
        } else {
            None
        }
    }
}

impl<V: Retain> Deref for Retained<V> {
    type Target = V;

    #[inline]
    fn deref(&self) -> &V {
        // SAFETY: the value lives until the last handle releases it.
        unsafe { self.ptr.as_ref() }
    }
}

impl<V: Retain> Clone for Retained<V> {
    fn clone(&self) -> Self {
        // SAFETY: released by the new handle's `drop`.
        unsafe { self.retain() };
        Self {
            ptr: self.ptr,
            _marker: PhantomData,
        }
    }
}

impl<V: Retain> Drop for Retained<V> {
    fn drop(&mut self) {
        // SAFETY: this handle took its retain in `new` or `clone`. The
        // allocation came from `Box::leak` in `new`, and this was the last
        // handle when `release` reports it.
        unsafe {
            if self.release() {
                drop(Box::from_raw(self.ptr.as_ptr()));
            }
        }
    }
}

impl<V: Retain + fmt::Debug> fmt::Debug for Retained<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

// Safety: the count is atomic and the value is only mutated through
// `get_mut` while unique, matching the requirements of `Arc`.
unsafe impl<V: Retain + Send + Sync> Send for Retained<V> {}
unsafe impl<V: Retain + Send + Sync> Sync for Retained<V> {}
