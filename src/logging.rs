//! Diagnostics support.
//!
//! With the `tracing` feature the `tracing` event macros are re-exported for crate use as
//! `log_debug!`, `log_trace!` and `log_warn!`. Without it, no-op macros of the same names
//! are provided so call sites stay unchanged. The no-op versions still borrow every `%x` /
//! `?x` field so bindings that only feed diagnostics don't go unused.

#[cfg(feature = "tracing")]
pub(crate) use tracing::{debug as log_debug, trace as log_trace, warn as log_warn};

#[cfg(not(feature = "tracing"))]
mod noop_macros {
    macro_rules! swallow_fields {
        () => {
            ()
        };
        (% $field:ident $($rest:tt)*) => {{
            let _ = &$field;
            $crate::logging::swallow_fields!($($rest)*)
        }};
        (? $field:ident $($rest:tt)*) => {{
            let _ = &$field;
            $crate::logging::swallow_fields!($($rest)*)
        }};
        ($skip:tt $($rest:tt)*) => {
            $crate::logging::swallow_fields!($($rest)*)
        };
    }

    macro_rules! log_debug {
        ($($arg:tt)*) => {
            $crate::logging::swallow_fields!($($arg)*)
        };
    }

    macro_rules! log_trace {
        ($($arg:tt)*) => {
            $crate::logging::swallow_fields!($($arg)*)
        };
    }

    macro_rules! log_warn {
        ($($arg:tt)*) => {
            $crate::logging::swallow_fields!($($arg)*)
        };
    }

    pub(crate) use log_debug;
    pub(crate) use log_trace;
    pub(crate) use log_warn;
    pub(crate) use swallow_fields;
}

#[cfg(not(feature = "tracing"))]
pub(crate) use noop_macros::{log_debug, log_trace, log_warn, swallow_fields};
