//! # Catvec: Growable Array Containers with Fail-Soft Access
//!
//! This crate provides a family of growable arrays that share one storage
//! engine and differ only in how they treat their elements.
//!
//! ## Key Features
//!
//! - **One Engine, Two Strategies**: `ValueVec<T>` clones and drops element by
//!   element, `PodVec<T>` block-copies `Copy` data; both are `GrowVec<T, O>`
//! - **Realloc Growth**: Buffers grow to `2 * capacity + 2` through `realloc`
//! - **Fail-Soft Access**: Bad indices and empty-container operations return a
//!   sentinel or `false` and are reported through the `log` facade
//! - **Strict Mode**: The same reports can panic instead, per process or per thread
//! - **Pointer Containers**: Non-owning handle arrays and boxed owning arrays
//! - **Intrusive Retain Counting**: Every container embeds an atomic retain count
//!
//! ## Quick Start
//!
//! ```rust
//! use catvec::{PodVec, ValueVec, OwnedVec, Retained, Retain};
//!
//! // Value semantics with per-element clone and drop
//! let mut words: ValueVec<String> = ValueVec::new();
//! words.push("hello".to_string());
//! words.append_self();
//! assert_eq!(words.len(), 2);
//!
//! // Trivially copyable data
//! let mut numbers = PodVec::from_slice(&[3, 1, 2]);
//! numbers.sort_asc();
//! assert_eq!(numbers, [1, 2, 3]);
//!
//! // Missing elements read as the default value
//! assert_eq!(*numbers.at(99), 0);
//!
//! // Owned boxed elements
//! let mut boxes = OwnedVec::new();
//! boxes.push(42u64);
//! assert_eq!(boxes.get(0), Some(&42));
//!
//! // Shared ownership through the embedded retain count
//! let shared = Retained::new(numbers);
//! let other = shared.clone();
//! assert_eq!(other.retain_count(), 2);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod config;
pub mod containers;
pub mod diagnostics;
pub mod error;

// Re-export core types
pub use containers::{
    Constructing, GrowVec, OwnedVec, PodVec, RawPtrVec, Retain, Retained, Trivial, ValueVec,
};
pub use diagnostics::DiagnosticPolicy;
pub use error::{ContainerError, Result};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library
///
/// Loads the process-wide configuration eagerly so that a malformed
/// environment is reported at startup rather than at the first anomaly.
pub fn init() {
    let config = config::global();
    log::debug!(
        "Initializing catvec v{} (diagnostic policy: {})",
        VERSION,
        config.diagnostic_policy
    );
}
