//! Anomaly reporting for fail-soft container operations
//!
//! Every accessor and mutator that rejects its input routes the rejection
//! through [`report`]. What happens next is decided by one
//! [`DiagnosticPolicy`]: log and fall back, panic, or fall back silently.
//!
//! The process default comes from [`crate::config::global`]. A thread can
//! override it, which is how tests opt into strict mode without affecting
//! tests running on other threads.

use crate::config;
use crate::error::ContainerError;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;
use std::str::FromStr;

/// How a rejected container operation is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticPolicy {
    /// Log the anomaly and return the documented fallback value
    #[default]
    Log,
    /// Panic with the anomaly's message
    Strict,
    /// Return the fallback value without logging
    Silent,
}

impl fmt::Display for DiagnosticPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Log => "log",
            Self::Strict => "strict",
            Self::Silent => "silent",
        };
        f.write_str(name)
    }
}

impl FromStr for DiagnosticPolicy {
    type Err = ContainerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "log" | "warn" => Ok(Self::Log),
            "strict" | "panic" => Ok(Self::Strict),
            "silent" | "off" => Ok(Self::Silent),
            other => Err(ContainerError::configuration(format!(
                "unknown diagnostic policy '{}', expected one of: log, strict, silent",
                other
            ))),
        }
    }
}

thread_local! {
    static THREAD_POLICY: Cell<Option<DiagnosticPolicy>> = const { Cell::new(None) };
}

/// The policy in effect on the current thread.
pub fn policy() -> DiagnosticPolicy {
    THREAD_POLICY
        .with(Cell::get)
        .unwrap_or_else(|| config::global().diagnostic_policy)
}

/// Override the policy for the current thread, returning the previous override.
///
/// Passing `None` removes the override so the process default applies again.
pub fn set_thread_policy(policy: Option<DiagnosticPolicy>) -> Option<DiagnosticPolicy> {
    THREAD_POLICY.with(|cell| cell.replace(policy))
}

/// Run `f` with `policy` in effect on the current thread.
///
/// The previous override is restored even if `f` panics.
pub fn with_policy<R>(policy: DiagnosticPolicy, f: impl FnOnce() -> R) -> R {
    struct Restore(Option<DiagnosticPolicy>);

    impl Drop for Restore {
        fn drop(&mut self) {
            THREAD_POLICY.with(|cell| cell.set(self.0));
        }
    }

    let _restore = Restore(set_thread_policy(Some(policy)));
    f()
}

/// Surface a rejected operation according to the current policy.
#[cold]
#[track_caller]
pub(crate) fn report(operation: &'static str, error: ContainerError) {
    match policy() {
        DiagnosticPolicy::Silent => {}
        DiagnosticPolicy::Log => match error {
            ContainerError::Empty { .. } => log::warn!("{}: {}", operation, error),
            _ => log::error!("{}: {}", operation, error),
        },
        DiagnosticPolicy::Strict => panic!("{}: {}", operation, error),
    }
}

/// Trace a buffer reallocation when growth logging is enabled.
#[inline]
pub(crate) fn trace_realloc(type_name: &str, len: usize, old_capacity: usize, new_capacity: usize) {
    if config::global().traces_growth_to(new_capacity) {
        log::debug!(
            "Resizing {}[{}] buffer ({} to {})",
            type_name,
            len,
            old_capacity,
            new_capacity
        );
    }
}
