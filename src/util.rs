//! Debug-check plumbing shared by all layers.
//!
//! Precondition checks only exist in debug builds. When one trips, the
//! failure is first reported through [`log`] so that embedders with a logger
//! installed get a structured record of the offending operation, and the
//! process then panics.

/// Checks a precondition in debug builds, reporting and panicking on failure.
///
/// Release builds compile this down to nothing.
#[inline]
#[cfg_attr(debug_assertions, track_caller)]
pub(crate) fn debug_precondition(condition: bool, operation: &str, what: &str) {
    if cfg!(debug_assertions) && !condition {
        precondition_failed(operation, what);
    }
}

#[cold]
#[cfg_attr(debug_assertions, track_caller)]
pub(crate) fn precondition_failed(operation: &str, what: &str) -> ! {
    log::error!("precondition violated in `{}`: {}", operation, what);
    panic!("precondition violated in `{}`: {}", operation, what);
}

/// Marks a code path which is statically known to never be taken as long as
/// the tree's structural invariants hold.
///
/// # Safety
/// Reaching this in a release build is *immediate* undefined behavior. Debug
/// builds panic instead, after reporting through the logging facade.
#[inline]
#[cfg_attr(debug_assertions, track_caller)]
pub(crate) unsafe fn unreachable_debugchecked(msg: &str) -> ! {
    #[cfg(debug_assertions)]
    {
        log::error!("tree corruption detected: {}", msg);
        panic!("tree corruption detected: {}", msg);
    }
    #[cfg(not(debug_assertions))]
    {
        let _ = msg;
        core::hint::unreachable_unchecked()
    }
}
