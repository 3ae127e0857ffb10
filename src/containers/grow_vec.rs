//! GrowVec: growable array with a compile-time element strategy
//!
//! One container type serves both element families:
//!
//! - [`ValueVec<T>`] (`GrowVec<T, Constructing>`) clones and drops element
//!   by element and accepts any `T`.
//! - [`PodVec<T>`] (`GrowVec<T, Trivial>`) block-copies `Copy` elements.
//!
//! Both grow to `2 * capacity + 2` when full and expose the same fail-soft
//! contract: invalid indices and empty-container operations are reported
//! through [`crate::diagnostics`] and answered with a sentinel, `false`, or a
//! no-op instead of a panic.

use super::element_ops::{CloneOps, Constructing, ElementOps, Trivial};
use super::growth::next_capacity;
use super::raw_buf::{capacity_overflow, shift, RawBuf};
use super::retained::Retain;
use crate::diagnostics;
use crate::error::{check_bounds, ContainerError, Result};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::mem::{self, ManuallyDrop};
use std::ops::{
    Add, AddAssign, Bound, Deref, DerefMut, Index, IndexMut, RangeBounds, Shl, ShlAssign,
};
use std::ptr::{self, NonNull};
use std::slice;
use std::sync::atomic::{AtomicI32, Ordering as AtomicOrdering};

/// Growable array parameterized by an element strategy
///
/// # Examples
///
/// ```rust
/// use catvec::ValueVec;
///
/// let mut vec = ValueVec::new();
/// vec <<= 1;
/// vec <<= 2;
/// vec <<= 3;
/// vec.insert(1, 99);
/// assert_eq!(vec, [1, 99, 2, 3]);
///
/// // Out-of-range reads return the sentinel instead of panicking
/// assert_eq!(*vec.at(10), 0);
/// ```
pub struct GrowVec<T, O: ElementOps<T> = Constructing> {
    buf: RawBuf<T>,
    len: usize,
    /// Returned by reads that miss
    sentinel: T,
    /// Handed out by `IndexMut` for writes that miss
    scratch: T,
    retains: AtomicI32,
    _ops: PhantomData<O>,
}

/// Container for arbitrary elements, cloned and dropped one at a time.
pub type ValueVec<T> = GrowVec<T, Constructing>;

/// Container for `Copy` elements, copied in blocks.
pub type PodVec<T> = GrowVec<T, Trivial>;

/// `len + additional`, panicking with "capacity overflow" on wrap-around.
#[inline]
fn checked_len(len: usize, additional: usize) -> usize {
    len.checked_add(additional).unwrap_or_else(|| capacity_overflow())
}

/// Total order over a `PartialOrd` type.
///
/// Values that do not compare equal to themselves (NaN) rank above every
/// other value and equal to each other.
fn total_order<T: PartialOrd>(a: &T, b: &T) -> Ordering {
    if let Some(order) = a.partial_cmp(b) {
        return order;
    }
    let a_unordered = a.partial_cmp(a).is_none();
    let b_unordered = b.partial_cmp(b).is_none();
    match (a_unordered, b_unordered) {
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

impl<T: Default, O: ElementOps<T>> GrowVec<T, O> {
    fn from_parts(buf: RawBuf<T>, len: usize) -> Self {
        Self {
            buf,
            len,
            sentinel: T::default(),
            scratch: T::default(),
            retains: AtomicI32::new(0),
            _ops: PhantomData,
        }
    }

    /// Create an empty container with no buffer
    #[inline]
    pub fn new() -> Self {
        Self::from_parts(RawBuf::new(), 0)
    }

    /// Create an empty container with room for exactly `capacity` elements
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_parts(RawBuf::with_capacity(capacity), 0)
    }

    /// Create a container of `size` default elements, with capacity `size`
    pub fn with_size(size: usize) -> Self {
        let mut vec = Self::with_capacity(size);
        vec.resize(size);
        vec
    }

    /// Adopt the buffer of a `Vec` without copying its elements
    pub fn from_vec(vec: Vec<T>) -> Self {
        let mut vec = ManuallyDrop::new(vec);
        let len = vec.len();

        if mem::size_of::<T>() == 0 {
            return Self::from_parts(RawBuf::with_capacity(len), len);
        }
        if vec.capacity() == 0 {
            return Self::new();
        }

        // SAFETY: Vec allocates its buffer with `Layout::array::<T>(capacity)`
        // from the global allocator, and we took ownership via ManuallyDrop.
        let buf = unsafe {
            RawBuf::from_raw_parts(NonNull::new_unchecked(vec.as_mut_ptr()), vec.capacity())
        };
        Self::from_parts(buf, len)
    }

    /// Remove and return the element at `index`
    ///
    /// An invalid index is reported and answered with the sentinel value.
    pub fn take_at(&mut self, index: usize) -> T {
        if index >= self.len {
            diagnostics::report("take_at", ContainerError::out_of_bounds(index, self.len));
            return T::default();
        }
        // SAFETY: index checked above.
        unsafe { self.remove_unchecked(index) }
    }

    /// Remove and return the first element, or the sentinel if empty
    pub fn take_first(&mut self) -> T {
        if self.len == 0 {
            diagnostics::report("take_first", ContainerError::empty("take_first"));
            return T::default();
        }
        // SAFETY: the container is not empty.
        unsafe { self.remove_unchecked(0) }
    }

    /// Remove and return the last element, or the sentinel if empty
    pub fn take_last(&mut self) -> T {
        if self.len == 0 {
            diagnostics::report("take_last", ContainerError::empty("take_last"));
            return T::default();
        }
        self.len -= 1;
        // SAFETY: slot `len` was live and is now outside the live range.
        unsafe { self.buf.ptr().add(self.len).read() }
    }

    /// Write `value` at `index`, extending the container if needed
    ///
    /// Writing past the end grows the buffer when `index` is beyond capacity,
    /// fills the gap with default values, and sets the length to `index + 1`.
    pub fn set(&mut self, index: usize, value: T) {
        if index < self.len {
            self.as_mut_slice()[index] = value;
            return;
        }

        let required = checked_len(index, 1);
        if index >= self.buf.capacity() {
            self.reallocate(next_capacity(index, required));
        }

        let base = self.buf.ptr();
        while self.len < index {
            // SAFETY: `len < index < capacity`, and the slot is dead.
            unsafe { base.add(self.len).write(T::default()) };
            self.len += 1;
        }
        // SAFETY: `index < capacity`, and the slot is dead.
        unsafe { base.add(index).write(value) };
        self.len = required;
    }

    /// Resize to `new_len` elements
    ///
    /// Growing appends default values (reallocating to exactly `new_len` when
    /// the buffer is too small). Shrinking destroys the vacated elements and
    /// keeps the capacity.
    pub fn resize(&mut self, new_len: usize) {
        if new_len <= self.len {
            self.truncate(new_len);
            return;
        }

        if new_len > self.buf.capacity() {
            self.reallocate(new_len);
        }

        let base = self.buf.ptr();
        while self.len < new_len {
            // SAFETY: `len < new_len <= capacity`, and the slot is dead.
            unsafe { base.add(self.len).write(T::default()) };
            self.len += 1;
        }
    }
}

impl<T, O: ElementOps<T>> GrowVec<T, O> {
    /// Get the number of elements in the container
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the container is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get the capacity of the container
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Get a pointer to the underlying data, null when no buffer is allocated
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        if self.buf.is_allocated() {
            self.buf.ptr()
        } else {
            ptr::null()
        }
    }

    /// Get the live elements as a slice
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: `[0, len)` is initialised; the pointer is never null.
        unsafe { slice::from_raw_parts(self.buf.ptr(), self.len) }
    }

    /// Get the live elements as a mutable slice
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: `[0, len)` is initialised; the pointer is never null.
        unsafe { slice::from_raw_parts_mut(self.buf.ptr(), self.len) }
    }

    /// Get a reference to the element at `index`, if it exists
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    /// Get a mutable reference to the element at `index`, if it exists
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.as_mut_slice().get_mut(index)
    }

    /// Get the element at `index` or an out-of-bounds error
    pub fn try_get(&self, index: usize) -> Result<&T> {
        check_bounds(index, self.len)?;
        Ok(&self.as_slice()[index])
    }

    /// Get the element at `index`, or the sentinel if the index is invalid
    #[inline]
    pub fn at(&self, index: usize) -> &T {
        self.read_or_sentinel("at", index)
    }

    /// Get the first element, or the sentinel if empty
    pub fn first(&self) -> &T {
        if self.len == 0 {
            diagnostics::report("first", ContainerError::empty("first"));
            return &self.sentinel;
        }
        &self.as_slice()[0]
    }

    /// Get the last element, or the sentinel if empty
    pub fn last(&self) -> &T {
        if self.len == 0 {
            diagnostics::report("last", ContainerError::empty("last"));
            return &self.sentinel;
        }
        &self.as_slice()[self.len - 1]
    }

    #[inline]
    fn read_or_sentinel(&self, operation: &'static str, index: usize) -> &T {
        match self.as_slice().get(index) {
            Some(value) => value,
            None => {
                diagnostics::report(operation, ContainerError::out_of_bounds(index, self.len));
                &self.sentinel
            }
        }
    }

    /// Index of the first element equal to `value`, scanning from `from`
    pub fn index_of(&self, value: &T, from: usize) -> Option<usize>
    where
        T: PartialEq,
    {
        if from >= self.len {
            return None;
        }
        self.as_slice()[from..]
            .iter()
            .position(|item| item == value)
            .map(|offset| from + offset)
    }

    /// Index of the last element equal to `value`, scanning backwards from
    /// `from` (or from the end when `None`)
    pub fn last_index_of(&self, value: &T, from: Option<usize>) -> Option<usize>
    where
        T: PartialEq,
    {
        if self.len == 0 {
            return None;
        }
        let start = from.map_or(self.len - 1, |from| from.min(self.len - 1));
        self.as_slice()[..=start].iter().rposition(|item| item == value)
    }

    /// Check whether any element equals `value`
    #[inline]
    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.index_of(value, 0).is_some()
    }

    /// Number of elements equal to `value`
    pub fn count_of(&self, value: &T) -> usize
    where
        T: PartialEq,
    {
        self.as_slice().iter().filter(|item| *item == value).count()
    }

    /// Check whether the first element equals `value`
    #[inline]
    pub fn starts_with(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.as_slice().first() == Some(value)
    }

    /// Check whether the last element equals `value`
    #[inline]
    pub fn ends_with(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.as_slice().last() == Some(value)
    }

    /// Exchange buffers with `other` in O(1)
    ///
    /// Elements are not touched. Retain counts stay with their instance.
    pub fn swap_with(&mut self, other: &mut Self) {
        self.buf.swap(&mut other.buf);
        mem::swap(&mut self.len, &mut other.len);
    }

    fn reallocate(&mut self, new_capacity: usize) {
        diagnostics::trace_realloc(
            std::any::type_name::<T>(),
            self.len,
            self.buf.capacity(),
            new_capacity,
        );
        self.buf.resize_to(new_capacity);
    }

    #[inline]
    fn grow_for(&mut self, required: usize) {
        if required > self.buf.capacity() {
            self.reallocate(next_capacity(self.buf.capacity(), required));
        }
    }

    /// Ensure the buffer holds at least `min_capacity` elements
    ///
    /// Reallocates to exactly `min_capacity` when it is larger than the
    /// current capacity.
    pub fn ensure_capacity(&mut self, min_capacity: usize) {
        if min_capacity > self.buf.capacity() {
            self.reallocate(min_capacity);
        }
    }

    /// Reserve space for at least `additional` more elements
    pub fn reserve(&mut self, additional: usize) {
        self.ensure_capacity(self.len.saturating_add(additional));
    }

    /// Append an element, growing the buffer when full
    #[inline]
    pub fn push(&mut self, value: T) {
        if self.len == self.buf.capacity() {
            self.grow_for(checked_len(self.len, 1));
        }
        // SAFETY: `len < capacity` after growth, and the slot is dead.
        unsafe { self.buf.ptr().add(self.len).write(value) };
        self.len += 1;
    }

    /// Insert an element at the front
    #[inline]
    pub fn prepend(&mut self, value: T) {
        self.insert(0, value);
    }

    /// Insert an element at `index`, shifting the tail right
    ///
    /// `index` is clamped to `len()`, so an oversized index appends.
    pub fn insert(&mut self, index: usize, value: T) {
        let index = index.min(self.len);
        self.grow_for(checked_len(self.len, 1));

        let base = self.buf.ptr();
        // SAFETY: `len + 1 <= capacity`; the tail moves into the dead slot
        // at `len` before the value is written.
        unsafe {
            shift(base, index, index + 1, self.len - index);
            base.add(index).write(value);
        }
        self.len += 1;
    }

    /// Move the element at `index` out and close the gap.
    ///
    /// # Safety
    ///
    /// `index < self.len`.
    unsafe fn remove_unchecked(&mut self, index: usize) -> T {
        let base = self.buf.ptr();
        // SAFETY: guaranteed by the caller.
        unsafe {
            let value = base.add(index).read();
            shift(base, index + 1, index, self.len - index - 1);
            self.len -= 1;
            value
        }
    }

    /// Remove the element at `index`
    ///
    /// Returns `false` (and reports) when the index is invalid.
    pub fn remove_at(&mut self, index: usize) -> bool {
        if index >= self.len {
            diagnostics::report("remove_at", ContainerError::out_of_bounds(index, self.len));
            return false;
        }
        // SAFETY: index checked above.
        drop(unsafe { self.remove_unchecked(index) });
        true
    }

    /// Remove the first element; a reported no-op when empty
    pub fn remove_first(&mut self) {
        if self.len == 0 {
            diagnostics::report("remove_first", ContainerError::empty("remove_first"));
            return;
        }
        // SAFETY: the container is not empty.
        drop(unsafe { self.remove_unchecked(0) });
    }

    /// Remove the last element; a reported no-op when empty
    pub fn remove_last(&mut self) {
        if self.len == 0 {
            diagnostics::report("remove_last", ContainerError::empty("remove_last"));
            return;
        }
        self.len -= 1;
        // SAFETY: slot `len` was live and is now outside the live range.
        unsafe { O::destroy(self.buf.ptr().add(self.len), 1) };
    }

    /// Remove the first element equal to `value`
    pub fn remove(&mut self, value: &T) -> bool
    where
        T: PartialEq,
    {
        match self.index_of(value, 0) {
            Some(index) => {
                // SAFETY: index_of only returns live indices.
                drop(unsafe { self.remove_unchecked(index) });
                true
            }
            None => false,
        }
    }

    /// Remove every element equal to `value` in a single compaction pass
    ///
    /// Returns the number of elements removed.
    pub fn remove_all(&mut self, value: &T) -> usize
    where
        T: PartialEq,
    {
        let original_len = self.len;
        let base = self.buf.ptr();
        // Leak instead of double-drop if a comparison or destructor panics.
        self.len = 0;

        let mut kept = 0;
        for i in 0..original_len {
            // SAFETY: every slot in `[i, original_len)` is still live, and
            // `kept <= i` so the compaction never overwrites unread slots.
            unsafe {
                let current = base.add(i);
                if *current == *value {
                    O::destroy(current, 1);
                } else {
                    if kept != i {
                        ptr::copy_nonoverlapping(current, base.add(kept), 1);
                    }
                    kept += 1;
                }
            }
        }

        self.len = kept;
        original_len - kept
    }

    /// Overwrite the element at `index`
    ///
    /// Returns `false` (and reports) when the index is invalid.
    pub fn replace_at(&mut self, index: usize, value: T) -> bool {
        match self.get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => {
                diagnostics::report("replace_at", ContainerError::out_of_bounds(index, self.len));
                false
            }
        }
    }

    /// Overwrite the first element equal to `old`
    pub fn replace(&mut self, old: &T, new: T) -> bool
    where
        T: PartialEq,
    {
        match self.index_of(old, 0) {
            Some(index) => {
                self.as_mut_slice()[index] = new;
                true
            }
            None => false,
        }
    }

    /// Shorten to `new_len` elements, destroying the rest; capacity is kept
    pub fn truncate(&mut self, new_len: usize) {
        if new_len >= self.len {
            return;
        }
        let old_len = self.len;
        self.len = new_len;
        // SAFETY: `[new_len, old_len)` was live and is now outside the live range.
        unsafe { O::destroy(self.buf.ptr().add(new_len), old_len - new_len) };
    }

    /// Destroy every element; the buffer is kept
    #[inline]
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Destroy every element and release the buffer
    pub fn free(&mut self) {
        self.clear();
        self.buf.free();
    }

    /// Reallocate to an exactly-sized buffer, dropping slack capacity
    ///
    /// An empty container releases its buffer entirely.
    pub fn compact(&mut self) {
        if self.len < self.buf.capacity() {
            self.reallocate(self.len);
        }
    }

    /// Sort ascending
    ///
    /// Values that are unordered even against themselves, such as NaN, sort
    /// after everything else.
    pub fn sort_asc(&mut self)
    where
        T: PartialOrd,
    {
        self.as_mut_slice().sort_unstable_by(total_order);
    }

    /// Sort descending, the exact reverse of [`sort_asc`](Self::sort_asc)
    pub fn sort_desc(&mut self)
    where
        T: PartialOrd,
    {
        self.as_mut_slice().sort_unstable_by(|a, b| total_order(b, a));
    }

    /// Sort with an external three-way comparator
    ///
    /// `compare` returns a negative number, zero, or a positive number when
    /// the first argument orders before, equal to, or after the second.
    /// A comparator that is not a total order may make the sort panic.
    pub fn sort_with(&mut self, compare: fn(&T, &T) -> i32) {
        self.as_mut_slice()
            .sort_unstable_by(|a, b| compare(a, b).cmp(&0));
    }

    /// Move the live elements into a `Vec`
    pub fn into_vec(mut self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.len);
        // SAFETY: the live range is moved bitwise, then forgotten here by
        // zeroing `len` so the drop below only releases the buffer.
        unsafe {
            ptr::copy_nonoverlapping(self.buf.ptr(), out.as_mut_ptr(), self.len);
            out.set_len(self.len);
        }
        self.len = 0;
        out
    }
}

impl<T, O: CloneOps<T>> GrowVec<T, O> {
    /// Copy of the element at `index`, or of the sentinel if invalid
    pub fn value(&self, index: usize) -> T {
        O::duplicate(self.read_or_sentinel("value", index))
    }

    /// Copy of the element at `index`, or `fallback` if invalid
    pub fn value_or(&self, index: usize, fallback: T) -> T {
        self.get(index).map_or(fallback, O::duplicate)
    }

    /// Insert `count` copies of `value` at `index`
    ///
    /// `index` is clamped to `len()`. Grows to `2 * capacity + 2` or to the
    /// exact requirement, whichever is larger.
    pub fn insert_n(&mut self, index: usize, value: T, count: usize) {
        if count == 0 {
            return;
        }
        let index = index.min(self.len);
        let old_len = self.len;
        let new_len = checked_len(old_len, count);
        self.grow_for(new_len);

        let base = self.buf.ptr();
        // SAFETY: `new_len <= capacity` and `index <= old_len`. The tail is moved past the
        // gap first; while the gap is being filled the live length is cut to
        // `index` so a panicking clone leaks rather than drops uninit slots.
        unsafe {
            shift(base, index, index + count, old_len - index);
            self.len = index;
            O::fill_to(base.add(index), count - 1, &value);
            base.add(index + count - 1).write(value);
        }
        self.len = new_len;
    }

    /// Overwrite every element equal to `old` with a copy of `new`
    pub fn replace_all(&mut self, old: &T, new: &T) -> usize
    where
        T: PartialEq,
    {
        let mut replaced = 0;
        for slot in self.as_mut_slice() {
            if *slot == *old {
                *slot = O::duplicate(new);
                replaced += 1;
            }
        }
        replaced
    }

    /// Overwrite every live element with `value`
    #[inline]
    pub fn fill(&mut self, value: T) {
        let len = self.len;
        self.fill_n(value, len);
    }

    /// Resize to `count` elements, all equal to `value`
    pub fn fill_n(&mut self, value: T, count: usize) {
        self.truncate(count);
        for slot in self.as_mut_slice() {
            *slot = O::duplicate(&value);
        }

        if count > self.len {
            self.ensure_capacity(count);
            // SAFETY: `[len, count)` is dead and within capacity.
            unsafe { O::fill_to(self.buf.ptr().add(self.len), count - self.len, &value) };
            self.len = count;
        }
    }

    /// Append copies of every element in `src`
    pub fn append_slice(&mut self, src: &[T]) {
        let count = src.len();
        if count == 0 {
            return;
        }
        self.grow_for(checked_len(self.len, count));
        // SAFETY: `[len, len + count)` is dead and within capacity; `src`
        // cannot alias `self` because `self` is borrowed mutably.
        unsafe { O::copy_to(src, self.buf.ptr().add(self.len)) };
        self.len += count;
    }

    /// Append copies of every element in `other`
    #[inline]
    pub fn append_vec(&mut self, other: &Self) {
        self.append_slice(other.as_slice());
    }

    /// Append a copy of the container to itself
    ///
    /// `{1, 2}` becomes `{1, 2, 1, 2}`.
    #[inline]
    pub fn append_self(&mut self) {
        let len = self.len;
        self.extend_from_within(0..len);
    }

    /// Append copies of the elements in `range` of this container
    ///
    /// The range length is fixed before the buffer grows. Returns `false`
    /// (and reports) when the range does not lie within the live elements.
    pub fn extend_from_within<R: RangeBounds<usize>>(&mut self, range: R) -> bool {
        let start = match range.start_bound() {
            Bound::Included(&start) => start,
            Bound::Excluded(&start) => start.saturating_add(1),
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&end) => end.saturating_add(1),
            Bound::Excluded(&end) => end,
            Bound::Unbounded => self.len,
        };
        if start > end || end > self.len {
            diagnostics::report(
                "extend_from_within",
                ContainerError::out_of_bounds(end.max(start), self.len),
            );
            return false;
        }

        let count = end - start;
        if count == 0 {
            return true;
        }
        self.grow_for(checked_len(self.len, count));

        let base = self.buf.ptr();
        // SAFETY: source `[start, end)` is live, destination
        // `[len, len + count)` is dead and within capacity; they are disjoint.
        unsafe {
            let src = slice::from_raw_parts(base.add(start), count);
            O::copy_to(src, base.add(self.len));
        }
        self.len += count;
        true
    }
}

impl<T: Default, O: CloneOps<T>> GrowVec<T, O> {
    /// Create a container of `size` copies of `value`, with capacity `size`
    pub fn with_fill(size: usize, value: T) -> Self {
        let mut vec = Self::with_capacity(size);
        vec.fill_n(value, size);
        vec
    }

    /// Create a container holding copies of `src`, with capacity `src.len()`
    pub fn from_slice(src: &[T]) -> Self {
        let mut vec = Self::with_capacity(src.len());
        vec.append_slice(src);
        vec
    }

    /// New container holding `self` followed by `other`
    ///
    /// The buffer is sized to exactly the combined length.
    pub fn concat(&self, other: &Self) -> Self {
        let mut out = Self::with_capacity(checked_len(self.len, other.len));
        out.append_slice(self.as_slice());
        out.append_slice(other.as_slice());
        out
    }
}

// Safety: the count lives in an atomic owned by this instance and is only
// changed through `retain`/`release`.
unsafe impl<T, O: ElementOps<T>> Retain for GrowVec<T, O> {
    #[inline]
    unsafe fn retain(&self) {
        self.retains.fetch_add(1, AtomicOrdering::AcqRel);
    }

    #[inline]
    unsafe fn release(&self) -> bool {
        self.retains.fetch_sub(1, AtomicOrdering::AcqRel) - 1 <= 0
    }

    #[inline]
    fn retain_count(&self) -> i32 {
        self.retains.load(AtomicOrdering::Acquire)
    }
}

impl<T: Default, O: ElementOps<T>> Default for GrowVec<T, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, O: ElementOps<T>> Drop for GrowVec<T, O> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T: Default, O: CloneOps<T>> Clone for GrowVec<T, O> {
    /// Deep copy of every live element; the capacity is preserved
    fn clone(&self) -> Self {
        let mut out = Self::with_capacity(self.buf.capacity());
        out.append_slice(self.as_slice());
        out
    }

    fn clone_from(&mut self, source: &Self) {
        let mut fresh = source.clone();
        self.swap_with(&mut fresh);
        // `fresh` now owns the previous buffer and releases it here.
    }
}

impl<T, O: ElementOps<T>> Deref for GrowVec<T, O> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T, O: ElementOps<T>> DerefMut for GrowVec<T, O> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<T, O: ElementOps<T>> Index<usize> for GrowVec<T, O> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        self.read_or_sentinel("index", index)
    }
}

impl<T: Default, O: ElementOps<T>> IndexMut<usize> for GrowVec<T, O> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        if index < self.len {
            return &mut self.as_mut_slice()[index];
        }
        diagnostics::report("index_mut", ContainerError::out_of_bounds(index, self.len));
        self.scratch = T::default();
        &mut self.scratch
    }
}

impl<T: Default, O: CloneOps<T>> Add<&GrowVec<T, O>> for &GrowVec<T, O> {
    type Output = GrowVec<T, O>;

    fn add(self, rhs: &GrowVec<T, O>) -> Self::Output {
        self.concat(rhs)
    }
}

impl<T, O: CloneOps<T>> Add<&GrowVec<T, O>> for GrowVec<T, O> {
    type Output = GrowVec<T, O>;

    fn add(mut self, rhs: &GrowVec<T, O>) -> Self::Output {
        self.append_vec(rhs);
        self
    }
}

impl<T, O: CloneOps<T>> AddAssign<&GrowVec<T, O>> for GrowVec<T, O> {
    fn add_assign(&mut self, rhs: &GrowVec<T, O>) {
        self.append_vec(rhs);
    }
}

impl<T, O: ElementOps<T>> ShlAssign<T> for GrowVec<T, O> {
    fn shl_assign(&mut self, value: T) {
        self.push(value);
    }
}

impl<T, O: ElementOps<T>> Shl<T> for GrowVec<T, O> {
    type Output = GrowVec<T, O>;

    fn shl(mut self, value: T) -> Self::Output {
        self.push(value);
        self
    }
}

impl<T, O: ElementOps<T>> Extend<T> for GrowVec<T, O> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for item in iter {
            self.push(item);
        }
    }
}

impl<T: Default, O: ElementOps<T>> FromIterator<T> for GrowVec<T, O> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<T: Default, O: ElementOps<T>> From<Vec<T>> for GrowVec<T, O> {
    fn from(vec: Vec<T>) -> Self {
        Self::from_vec(vec)
    }
}

impl<T: Default, O: CloneOps<T>> From<&[T]> for GrowVec<T, O> {
    fn from(src: &[T]) -> Self {
        Self::from_slice(src)
    }
}

impl<T, O: ElementOps<T>> IntoIterator for GrowVec<T, O> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

impl<'a, T, O: ElementOps<T>> IntoIterator for &'a GrowVec<T, O> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T, O: ElementOps<T>> IntoIterator for &'a mut GrowVec<T, O> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}

impl<T: fmt::Debug, O: ElementOps<T>> fmt::Debug for GrowVec<T, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T: PartialEq, O: ElementOps<T>> PartialEq for GrowVec<T, O> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, O: ElementOps<T>> Eq for GrowVec<T, O> {}

impl<T: PartialEq, O: ElementOps<T>> PartialEq<[T]> for GrowVec<T, O> {
    fn eq(&self, other: &[T]) -> bool {
        self.as_slice() == other
    }
}

impl<T: PartialEq, O: ElementOps<T>, const N: usize> PartialEq<[T; N]> for GrowVec<T, O> {
    fn eq(&self, other: &[T; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: PartialEq, O: ElementOps<T>> PartialEq<Vec<T>> for GrowVec<T, O> {
    fn eq(&self, other: &Vec<T>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Hash, O: ElementOps<T>> Hash for GrowVec<T, O> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{with_policy, DiagnosticPolicy};
    use std::cell::Cell;
    use std::rc::Rc;

    fn quietly<R>(f: impl FnOnce() -> R) -> R {
        with_policy(DiagnosticPolicy::Silent, f)
    }

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Point {
        x: f32,
        y: f32,
        z: f32,
    }

    impl Point {
        fn splat(v: f32) -> Self {
            Self { x: v, y: v, z: v }
        }
    }

    #[derive(Clone, Default)]
    struct DropCounter {
        drops: Option<Rc<Cell<usize>>>,
    }

    impl Drop for DropCounter {
        fn drop(&mut self) {
            if let Some(drops) = &self.drops {
                drops.set(drops.get() + 1);
            }
        }
    }

    #[test]
    fn test_new() {
        let vec: ValueVec<i32> = ValueVec::new();
        assert_eq!(vec.len(), 0);
        assert_eq!(vec.capacity(), 0);
        assert!(vec.is_empty());
        assert!(vec.as_ptr().is_null());
    }

    #[test]
    fn test_with_size_and_fill() {
        let vec: PodVec<i32> = PodVec::with_size(30);
        assert_eq!(vec.len(), 30);
        assert_eq!(vec.capacity(), 30);
        assert!(vec.iter().all(|&v| v == 0));

        let vec = PodVec::with_fill(3, 99);
        assert_eq!(vec.len(), 3);
        assert_eq!(vec.capacity(), 3);
        assert_eq!(vec, [99, 99, 99]);

        let points = ValueVec::with_fill(2, Point::splat(1.5));
        assert_eq!(points[1], Point::splat(1.5));
    }

    #[test]
    fn test_from_slice_copies() {
        let source = [1, 2, 3, 4];
        let mut vec: PodVec<i32> = PodVec::from_slice(&source);
        assert_eq!(vec.capacity(), 4);
        assert_ne!(vec.as_ptr(), source.as_ptr());
        vec[0] = 44;
        assert_eq!(source[0], 1);
        assert_eq!(vec, [44, 2, 3, 4]);
    }

    #[test]
    fn test_from_vec_adopts_buffer() {
        let mut source = Vec::with_capacity(8);
        source.extend([1u64, 2, 3]);
        let data = source.as_ptr();

        let vec: PodVec<u64> = PodVec::from_vec(source);
        assert_eq!(vec.as_ptr(), data);
        assert_eq!(vec.len(), 3);
        assert_eq!(vec.capacity(), 8);
        assert_eq!(vec.into_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn test_push_growth_sequence() {
        let mut vec: PodVec<u8> = PodVec::new();
        let mut capacities = Vec::new();
        for i in 0..15u8 {
            vec.push(i);
            if capacities.last() != Some(&vec.capacity()) {
                capacities.push(vec.capacity());
            }
        }
        assert_eq!(capacities, vec![2, 6, 14, 30]);
    }

    #[test]
    fn test_append_operator_and_insert() {
        let mut vec: ValueVec<i32> = ValueVec::new();
        vec <<= 1;
        vec <<= 2;
        vec <<= 3;
        vec.insert(1, 99);
        assert_eq!(vec, [1, 99, 2, 3]);
        assert_eq!(vec.len(), 4);

        let chained = PodVec::new() << 7 << 8;
        assert_eq!(chained, [7, 8]);
    }

    #[test]
    fn test_insert_clamps_index() {
        let mut vec: PodVec<i32> = PodVec::from_slice(&[1, 2]);
        vec.insert(100, 3);
        vec.insert(0, 0);
        assert_eq!(vec, [0, 1, 2, 3]);
        vec.prepend(-1);
        assert_eq!(vec.first(), &-1);
    }

    #[test]
    fn test_insert_n() {
        let mut vec: ValueVec<String> = ValueVec::new();
        vec.push("a".to_string());
        vec.push("d".to_string());
        vec.insert_n(1, "x".to_string(), 3);
        assert_eq!(vec, ["a", "x", "x", "x", "d"].map(String::from));

        vec.insert_n(2, "ignored".to_string(), 0);
        assert_eq!(vec.len(), 5);
    }

    #[test]
    fn test_insert_n_growth() {
        let mut vec: PodVec<i32> = PodVec::with_capacity(2);
        vec.push(1);
        vec.insert_n(0, 5, 10);
        assert_eq!(vec.capacity(), 11);
        assert_eq!(vec.count_of(&5), 10);
        assert!(vec.ends_with(&1));
    }

    #[test]
    fn test_remove_all_zeroes() {
        let mut vec: PodVec<i32> = PodVec::with_size(3);
        assert_eq!(vec.remove_all(&0), 3);
        assert_eq!(vec.len(), 0);
        assert_eq!(vec.capacity(), 3);
    }

    #[test]
    fn test_remove_all_preserves_order() {
        let mut vec: ValueVec<i32> = ValueVec::from_slice(&[1, 2, 1, 3, 1, 4]);
        assert_eq!(vec.remove_all(&1), 3);
        assert_eq!(vec, [2, 3, 4]);
        assert_eq!(vec.remove_all(&9), 0);
    }

    #[test]
    fn test_remove_variants() {
        let mut vec: PodVec<i32> = PodVec::from_slice(&[5, 6, 7, 6]);
        assert!(vec.remove(&6));
        assert_eq!(vec, [5, 7, 6]);
        assert!(!vec.remove(&42));

        assert!(vec.remove_at(1));
        assert_eq!(vec, [5, 6]);
        assert!(!quietly(|| vec.remove_at(2)));

        vec.remove_first();
        assert_eq!(vec, [6]);
        vec.remove_last();
        assert!(vec.is_empty());
        quietly(|| {
            vec.remove_last();
            vec.remove_first();
        });
        assert!(vec.is_empty());
    }

    #[test]
    fn test_take_round_trip() {
        let mut vec: ValueVec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let taken = vec.take_at(1);
        assert_eq!(taken, "b");
        assert_eq!(vec.len(), 2);
        assert_eq!(vec.take_first(), "a");
        assert_eq!(vec.take_last(), "c");
        assert!(vec.is_empty());

        quietly(|| {
            assert_eq!(vec.take_last(), "");
            assert_eq!(vec.take_first(), "");
            assert_eq!(vec.take_at(0), "");
        });
    }

    #[test]
    fn test_sentinel_reads() {
        let vec: ValueVec<Point> = ValueVec::from_slice(&[Point::splat(2.0)]);
        quietly(|| {
            assert_eq!(vec.at(5), &Point::default());
            assert_eq!(vec[5], Point::default());
            assert_eq!(vec.value(3), Point::default());
        });
        assert_eq!(vec.value_or(3, Point::splat(9.0)), Point::splat(9.0));
        assert_eq!(vec.value(0), Point::splat(2.0));
        assert!(vec.try_get(1).is_err());
        assert_eq!(vec.try_get(0).unwrap(), &Point::splat(2.0));

        let empty: PodVec<i32> = PodVec::new();
        quietly(|| {
            assert_eq!(*empty.first(), 0);
            assert_eq!(*empty.last(), 0);
        });
    }

    #[test]
    fn test_index_mut_out_of_range_is_discarded() {
        let mut vec: PodVec<i32> = PodVec::from_slice(&[1]);
        quietly(|| {
            vec[4] = 77;
            assert_eq!(*vec.at(4), 0);
        });
        assert_eq!(vec, [1]);
    }

    #[test]
    #[should_panic(expected = "Out of bounds")]
    fn test_strict_policy_panics() {
        let vec: PodVec<i32> = PodVec::new();
        with_policy(DiagnosticPolicy::Strict, || {
            let _ = vec.at(0);
        });
    }

    #[test]
    fn test_search() {
        let vec: PodVec<i32> = PodVec::from_slice(&[3, 1, 3, 2, 3]);
        assert_eq!(vec.index_of(&3, 0), Some(0));
        assert_eq!(vec.index_of(&3, 1), Some(2));
        assert_eq!(vec.index_of(&3, 5), None);
        assert_eq!(vec.index_of(&9, 0), None);
        assert_eq!(vec.last_index_of(&3, None), Some(4));
        assert_eq!(vec.last_index_of(&3, Some(3)), Some(2));
        assert_eq!(vec.last_index_of(&3, Some(100)), Some(4));
        assert_eq!(vec.last_index_of(&1, Some(0)), None);
        assert!(vec.contains(&2));
        assert!(!vec.contains(&7));
        assert_eq!(vec.count_of(&3), 3);
        assert!(vec.starts_with(&3));
        assert!(!PodVec::<i32>::new().ends_with(&0));
    }

    #[test]
    fn test_equality() {
        let a: PodVec<i32> = PodVec::from_slice(&[1, 2, 3]);
        let mut b: PodVec<i32> = PodVec::with_capacity(50);
        b.append_slice(&[1, 2, 3]);
        assert_eq!(a, b);
        b.push(4);
        assert_ne!(a, b);
        b.remove_last();
        b[2] = 9;
        assert_ne!(a, b);
    }

    #[test]
    fn test_swap_with() {
        let mut a: ValueVec<i32> = ValueVec::from_slice(&[1, 2]);
        let mut b: ValueVec<i32> = ValueVec::with_capacity(10);
        let a_ptr = a.as_ptr();
        // SAFETY: no handle owns either container.
        unsafe { a.retain() };

        a.swap_with(&mut b);
        assert!(a.is_empty());
        assert_eq!(a.capacity(), 10);
        assert_eq!(b, [1, 2]);
        assert_eq!(b.as_ptr(), a_ptr);
        assert_eq!(a.retain_count(), 1);
        assert_eq!(b.retain_count(), 0);
    }

    #[test]
    fn test_replace() {
        let mut vec: ValueVec<i32> = ValueVec::from_slice(&[1, 2, 1, 2]);
        assert!(vec.replace(&2, 5));
        assert_eq!(vec, [1, 5, 1, 2]);
        assert_eq!(vec.replace_all(&1, &0), 2);
        assert_eq!(vec, [0, 5, 0, 2]);
        assert!(vec.replace_at(3, 8));
        assert!(!quietly(|| vec.replace_at(4, 8)));
        assert_eq!(vec, [0, 5, 0, 8]);
    }

    #[test]
    fn test_set_extends() {
        let mut vec: PodVec<i32> = PodVec::new();
        vec.set(3, 7);
        assert_eq!(vec, [0, 0, 0, 7]);
        assert_eq!(vec.capacity(), 8);
        vec.set(1, 5);
        assert_eq!(vec, [0, 5, 0, 7]);
        vec.set(5, 1);
        assert_eq!(vec.len(), 6);
        assert_eq!(vec.capacity(), 8);
    }

    #[test]
    fn test_resize_and_fill() {
        let mut vec: ValueVec<String> = ValueVec::new();
        vec.resize(3);
        assert_eq!(vec.len(), 3);
        assert_eq!(vec.capacity(), 3);
        vec.fill("z".to_string());
        assert!(vec.iter().all(|s| s == "z"));

        vec.resize(1);
        assert_eq!(vec.len(), 1);
        assert_eq!(vec.capacity(), 3);

        vec.fill_n("q".to_string(), 5);
        assert_eq!(vec.len(), 5);
        assert!(vec.iter().all(|s| s == "q"));
        vec.fill_n("w".to_string(), 2);
        assert_eq!(vec, ["w", "w"].map(String::from));
    }

    #[test]
    fn test_compact_idempotent() {
        let mut vec: PodVec<i32> = PodVec::with_capacity(100);
        vec.append_slice(&[1, 2, 3]);
        vec.compact();
        assert_eq!(vec.capacity(), 3);
        let data = vec.as_ptr();
        vec.compact();
        assert_eq!(vec.capacity(), 3);
        assert_eq!(vec.as_ptr(), data);
        assert_eq!(vec, [1, 2, 3]);

        vec.clear();
        vec.compact();
        assert_eq!(vec.capacity(), 0);
        assert!(vec.as_ptr().is_null());
    }

    #[test]
    fn test_reserve_and_free() {
        let mut vec: ValueVec<i32> = ValueVec::new();
        vec.ensure_capacity(15);
        assert_eq!(vec.capacity(), 15);
        vec.ensure_capacity(10);
        assert_eq!(vec.capacity(), 15);
        vec.push(1);
        vec.reserve(20);
        assert_eq!(vec.capacity(), 21);
        vec.free();
        assert_eq!(vec.capacity(), 0);
        assert!(vec.is_empty());
    }

    #[test]
    fn test_concatenation() {
        let a: PodVec<i32> = PodVec::from_slice(&[1, 2]);
        let b: PodVec<i32> = PodVec::from_slice(&[3, 4, 5]);
        let c = &a + &b;
        assert_eq!(c, [1, 2, 3, 4, 5]);
        assert_eq!(c.capacity(), 5);
        assert_eq!(a.len(), 2);

        let mut d = a.clone();
        d += &b;
        assert_eq!(d, c);

        let e = a.clone() + &b;
        assert_eq!(e, c);

        let empty: PodVec<i32> = PodVec::new();
        let f = &empty + &empty;
        assert_eq!(f.capacity(), 0);
    }

    #[test]
    fn test_self_append() {
        let mut vec: ValueVec<i32> = ValueVec::from_slice(&[1, 2]);
        vec.append_self();
        assert_eq!(vec, [1, 2, 1, 2]);

        let mut pod: PodVec<i32> = PodVec::from_slice(&[1, 2]);
        pod.append_self();
        assert_eq!(pod, [1, 2, 1, 2]);

        let mut empty: PodVec<i32> = PodVec::new();
        empty.append_self();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_extend_from_within() {
        let mut vec: ValueVec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        assert!(vec.extend_from_within(1..));
        assert_eq!(vec, ["a", "b", "c", "b", "c"].map(String::from));
        assert!(vec.extend_from_within(..=0));
        assert_eq!(vec.len(), 6);
        assert!(!quietly(|| vec.extend_from_within(4..10)));
        assert_eq!(vec.len(), 6);
    }

    #[test]
    fn test_sorting() {
        let mut vec: PodVec<i32> = PodVec::from_slice(&[4, 1, 3, 2]);
        vec.sort_asc();
        assert_eq!(vec, [1, 2, 3, 4]);
        vec.sort_desc();
        assert_eq!(vec, [4, 3, 2, 1]);

        fn by_parity(a: &i32, b: &i32) -> i32 {
            (a % 2 - b % 2) * 10 + (a - b)
        }
        vec.sort_with(by_parity);
        assert_eq!(vec, [2, 4, 1, 3]);

        let mut floats: PodVec<f64> = PodVec::from_slice(&[2.5, -1.0, 0.5]);
        floats.sort_asc();
        assert_eq!(floats, [-1.0, 0.5, 2.5]);
    }

    #[test]
    fn test_sort_with_nan() {
        let mut vec: PodVec<f64> = (0..64)
            .map(|i| if i % 3 == 0 { f64::NAN } else { ((i * 37) % 64) as f64 - 32.0 })
            .collect();
        let nan_count = vec.iter().filter(|v| v.is_nan()).count();

        vec.sort_asc();
        let (numbers, nans) = vec.split_at(64 - nan_count);
        assert!(numbers.windows(2).all(|w| w[0] <= w[1]));
        assert!(nans.iter().all(|v| v.is_nan()));

        vec.sort_desc();
        let (nans, numbers) = vec.split_at(nan_count);
        assert!(nans.iter().all(|v| v.is_nan()));
        assert!(numbers.windows(2).all(|w| w[0] >= w[1]));
        assert!(!numbers.iter().any(|v| v.is_nan()));
    }

    #[test]
    #[should_panic(expected = "capacity overflow")]
    fn test_insert_n_overflow() {
        let mut vec: PodVec<u8> = PodVec::from_slice(&[1]);
        vec.insert_n(0, 7, usize::MAX);
    }

    #[test]
    #[should_panic(expected = "capacity overflow")]
    fn test_zero_sized_length_overflow() {
        let mut full: Vec<()> = Vec::new();
        // SAFETY: zero-sized elements need no storage.
        unsafe { full.set_len(usize::MAX) };
        let mut vec: PodVec<()> = PodVec::from_vec(full);
        assert_eq!(vec.len(), usize::MAX);
        vec.append_self();
    }

    #[test]
    #[should_panic(expected = "capacity overflow")]
    fn test_set_at_max_index() {
        let mut vec: PodVec<u8> = PodVec::new();
        vec.set(usize::MAX, 1);
    }

    #[test]
    fn test_clone_preserves_capacity() {
        let mut vec: ValueVec<String> = ValueVec::with_capacity(10);
        vec.push("x".to_string());
        let cloned = vec.clone();
        assert_eq!(cloned, vec);
        assert_eq!(cloned.capacity(), 10);
        assert_ne!(cloned.as_ptr(), vec.as_ptr());
    }

    #[test]
    fn test_clone_from_replaces() {
        let source: PodVec<i32> = PodVec::from_slice(&[9, 8]);
        let mut target: PodVec<i32> = PodVec::from_slice(&[1, 2, 3, 4]);
        target.clone_from(&source);
        assert_eq!(target, [9, 8]);
        assert_eq!(target.capacity(), 2);
    }

    #[test]
    fn test_move_leaves_source_empty() {
        let mut source: ValueVec<i32> = ValueVec::from_slice(&[1, 2, 3]);
        let moved = mem::take(&mut source);
        assert_eq!(moved, [1, 2, 3]);
        assert!(source.is_empty());
        assert_eq!(source.capacity(), 0);
    }

    #[test]
    fn test_drop_elements() {
        let drops = Rc::new(Cell::new(0));
        let counter = || DropCounter {
            drops: Some(drops.clone()),
        };

        {
            let mut vec: ValueVec<DropCounter> = ValueVec::new();
            for _ in 0..5 {
                vec.push(counter());
            }

            assert!(vec.remove_at(2));
            assert_eq!(drops.get(), 1);

            vec.resize(2);
            assert_eq!(drops.get(), 3);
            assert_eq!(vec.capacity(), 6);

            vec.remove_last();
            assert_eq!(drops.get(), 4);
        }

        assert_eq!(drops.get(), 5);
    }

    #[test]
    fn test_remove_all_drops_matches_once() {
        #[derive(Clone, Default)]
        struct Tagged {
            tag: u8,
            _counter: DropCounter,
        }
        impl PartialEq for Tagged {
            fn eq(&self, other: &Self) -> bool {
                self.tag == other.tag
            }
        }

        let drops = Rc::new(Cell::new(0));
        let make = |tag| Tagged {
            tag,
            _counter: DropCounter {
                drops: Some(drops.clone()),
            },
        };

        let mut vec: ValueVec<Tagged> = ValueVec::new();
        for tag in [1, 2, 1, 1, 3] {
            vec.push(make(tag));
        }
        let needle = Tagged::default();
        let needle = Tagged { tag: 1, ..needle };
        assert_eq!(vec.remove_all(&needle), 3);
        assert_eq!(drops.get(), 3);
        drop(vec);
        assert_eq!(drops.get(), 5);
    }

    #[test]
    fn test_iterators_and_collect() {
        let vec: PodVec<i32> = (1..=4).collect();
        let sum: i32 = vec.iter().sum();
        assert_eq!(sum, 10);

        let mut doubled = vec.clone();
        for item in &mut doubled {
            *item *= 2;
        }
        assert_eq!(doubled, [2, 4, 6, 8]);

        let mut extended: ValueVec<i32> = ValueVec::new();
        extended.extend(vec.iter().copied());
        assert_eq!(extended.into_iter().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_zero_sized_elements() {
        let mut vec: ValueVec<()> = ValueVec::new();
        for _ in 0..100 {
            vec.push(());
        }
        assert_eq!(vec.len(), 100);
        assert_eq!(vec.take_at(50), ());
        assert_eq!(vec.len(), 99);
        let adopted: ValueVec<()> = ValueVec::from_vec(vec![(); 7]);
        assert_eq!(adopted.len(), 7);
    }

    #[test]
    fn test_debug_and_hash() {
        use std::collections::hash_map::DefaultHasher;

        let a: PodVec<i32> = PodVec::from_slice(&[1, 2, 3]);
        assert_eq!(format!("{:?}", a), "[1, 2, 3]");

        let hash = |v: &PodVec<i32>| {
            let mut h = DefaultHasher::new();
            v.hash(&mut h);
            h.finish()
        };
        let mut b: PodVec<i32> = PodVec::with_capacity(99);
        b.append_slice(&[1, 2, 3]);
        assert_eq!(hash(&a), hash(&b));
    }

    #[test]
    fn test_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<ValueVec<String>>();
        assert_sync::<ValueVec<String>>();
        assert_send::<PodVec<u64>>();
        assert_sync::<PodVec<u64>>();
    }
}
