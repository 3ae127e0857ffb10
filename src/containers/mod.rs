//! Growable array containers
//!
//! ## Core Containers
//!
//! - **`GrowVec<T, O>`** - Growable array with a compile-time element strategy
//! - **`ValueVec<T>`** - `GrowVec` that clones and drops element by element
//! - **`PodVec<T>`** - `GrowVec` that block-copies `Copy` elements
//!
//! ## Pointer Containers
//!
//! - **`RawPtrVec<T>`** - Non-owning element handles, never freed
//! - **`OwnedVec<T>`** - Boxed elements owned by the container
//!
//! ## Shared Ownership
//!
//! - **`Retained<V>`** - Handle over any container's intrusive retain count

pub mod element_ops;
mod grow_vec;
mod growth;
mod ptr_vec;
pub(crate) mod raw_buf;
mod retained;

pub use element_ops::{CloneOps, Constructing, ElementOps, Trivial};
pub use grow_vec::{GrowVec, PodVec, ValueVec};
pub use growth::{next_capacity, GROWTH_PAD};
pub use ptr_vec::{OwnedVec, RawPtrVec};
pub use retained::{Retain, Retained};
