//! Logging macros for the CPM engine with verbosity level control.
//!
//! Each invocation carries its own verbosity (see [`crate::CpmConfig`]), so
//! callers can turn on diagnostics for a single recalculation without
//! touching the global subscriber. Messages are emitted through `tracing`;
//! the host application decides where they go.
//!
//! - 0: SILENT (nothing)
//! - 1: CHANGES (one summary line per invocation)
//! - 2: CHECKS (validation decisions, per-network finishes)
//! - 3: DEBUG (per-activity pass arithmetic)

pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_CHANGES: u8 = 1;
pub const VERBOSITY_CHECKS: u8 = 2;
pub const VERBOSITY_DEBUG: u8 = 3;

#[doc(hidden)]
pub use tracing as __tracing;

/// Log at CHANGES level (verbosity >= 1).
#[macro_export]
macro_rules! log_changes {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHANGES {
            $crate::logging::__tracing::info!($($arg)*);
        }
    };
}

/// Log at CHECKS level (verbosity >= 2).
#[macro_export]
macro_rules! log_checks {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHECKS {
            $crate::logging::__tracing::debug!($($arg)*);
        }
    };
}

/// Log at DEBUG level (verbosity >= 3).
///
/// Used for per-activity forward/backward pass values.
#[macro_export]
macro_rules! log_debug {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_DEBUG {
            $crate::logging::__tracing::trace!($($arg)*);
        }
    };
}
