//! Pointer-element containers
//!
//! Two flavours, split by ownership:
//!
//! - [`RawPtrVec<T>`] holds borrowed handles (`Option<NonNull<T>>`). It is a
//!   plain [`PodVec`] and never frees what the handles point at.
//! - [`OwnedVec<T>`] owns boxed elements. Every slot is `Option<Box<T>>`, so
//!   erasing an element drops it while removing it hands the box back.

use super::grow_vec::{PodVec, ValueVec};
use super::retained::Retain;
use crate::diagnostics;
use crate::error::ContainerError;
use std::fmt;
use std::ptr::{self, NonNull};

/// Container of non-owning element handles; `None` is a null slot.
pub type RawPtrVec<T> = PodVec<Option<NonNull<T>>>;

/// Container that owns each element through a `Box`
///
/// # Examples
///
/// ```rust
/// use catvec::OwnedVec;
///
/// let mut names = OwnedVec::new();
/// names.push(String::from("alpha"));
/// names.push(String::from("beta"));
///
/// // Removing hands ownership back; erasing drops the element.
/// let alpha = names.take_at(0).unwrap();
/// assert_eq!(*alpha, "alpha");
/// assert!(names.erase_first());
/// assert!(names.is_empty());
/// ```
pub struct OwnedVec<T> {
    slots: ValueVec<Option<Box<T>>>,
}

impl<T> OwnedVec<T> {
    /// Create an empty container with no buffer
    pub fn new() -> Self {
        Self {
            slots: ValueVec::new(),
        }
    }

    /// Create an empty container with room for exactly `capacity` elements
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: ValueVec::with_capacity(capacity),
        }
    }

    /// Number of slots, including empty ones
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if the container has no slots
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Get the capacity of the container
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Take ownership of `value` and append it
    pub fn push(&mut self, value: T) {
        self.slots.push(Some(Box::new(value)));
    }

    /// Append an already boxed element
    pub fn push_boxed(&mut self, value: Box<T>) {
        self.slots.push(Some(value));
    }

    /// Take ownership of `value` and insert it at `index` (clamped to `len()`)
    pub fn insert(&mut self, index: usize, value: T) {
        self.slots.insert(index, Some(Box::new(value)));
    }

    /// Store `value` at `index`, dropping any element already there
    ///
    /// Writing past the end extends the container with empty slots.
    pub fn set(&mut self, index: usize, value: T) {
        self.slots.set(index, Some(Box::new(value)));
    }

    /// Element at `index`, or `None` for an empty slot or invalid index
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(Option::as_deref)
    }

    /// Mutable element at `index`, or `None` for an empty slot or invalid index
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index).and_then(Option::as_deref_mut)
    }

    /// Iterate over the slots in order
    pub fn iter(&self) -> impl Iterator<Item = Option<&T>> + '_ {
        self.slots.iter().map(Option::as_deref)
    }

    /// Index of the slot holding exactly `element` (compared by address)
    pub fn position_of(&self, element: &T) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.as_deref().map_or(false, |held| ptr::eq(held, element)))
    }

    /// Remove the slot at `index` and drop its element
    ///
    /// Returns `false` (and reports) when the index is invalid.
    pub fn erase_at(&mut self, index: usize) -> bool {
        let len = self.slots.len();
        self.erase_or_report("erase_at", index, ContainerError::out_of_bounds(index, len))
    }

    /// Remove the first slot and drop its element
    pub fn erase_first(&mut self) -> bool {
        self.erase_or_report("erase_first", 0, ContainerError::empty("erase_first"))
    }

    /// Remove the last slot and drop its element
    pub fn erase_last(&mut self) -> bool {
        let last = self.slots.len().wrapping_sub(1);
        self.erase_or_report("erase_last", last, ContainerError::empty("erase_last"))
    }

    fn erase_or_report(&mut self, operation: &'static str, index: usize, miss: ContainerError) -> bool {
        if index >= self.slots.len() {
            diagnostics::report(operation, miss);
            return false;
        }
        self.slots.remove_at(index)
    }

    /// Drop every element; the buffer is kept
    pub fn erase_all(&mut self) {
        self.slots.clear();
    }

    /// Drop every element and release the buffer
    pub fn free_ptr(&mut self) {
        self.slots.free();
    }

    /// Remove the slot at `index` and hand its element back
    ///
    /// Returns `None` for an empty slot, or (after reporting) an invalid index.
    pub fn take_at(&mut self, index: usize) -> Option<Box<T>> {
        if index >= self.slots.len() {
            diagnostics::report("take_at", ContainerError::out_of_bounds(index, self.slots.len()));
            return None;
        }
        self.slots.take_at(index)
    }

    /// Reallocate to an exactly-sized buffer
    pub fn compact(&mut self) {
        self.slots.compact();
    }

    /// Exchange contents with `other` in O(1)
    pub fn swap_with(&mut self, other: &mut Self) {
        self.slots.swap_with(&mut other.slots);
    }
}

impl<T> Default for OwnedVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

// Safety: delegates to the slot container's own count.
unsafe impl<T> Retain for OwnedVec<T> {
    unsafe fn retain(&self) {
        // SAFETY: forwarded from the caller.
        unsafe { self.slots.retain() };
    }

    unsafe fn release(&self) -> bool {
        // SAFETY: forwarded from the caller.
        unsafe { self.slots.release() }
    }

    fn retain_count(&self) -> i32 {
        self.slots.retain_count()
    }
}

impl<T> FromIterator<T> for OwnedVec<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            slots: iter.into_iter().map(|value| Some(Box::new(value))).collect(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for OwnedVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
