// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Logging shim.
//!
//! With the `tracing` feature the macros are `tracing`'s own; without it they type-check their
//! format arguments and expand to nothing. The no-op macros are defined under other names and
//! re-exported as `debug`/`warn`, since a `macro_rules!` named `warn` cannot be imported next to
//! the builtin `#[warn]` attribute.

#[cfg(feature = "tracing")]
pub(crate) use tracing::{debug, warn};

#[cfg(not(feature = "tracing"))]
macro_rules! debug_event {
    ($($arg:tt)*) => {
        if false {
            let _ = ::core::format_args!($($arg)*);
        }
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! warn_event {
    ($($arg:tt)*) => {
        if false {
            let _ = ::core::format_args!($($arg)*);
        }
    };
}

#[cfg(not(feature = "tracing"))]
pub(crate) use {debug_event as debug, warn_event as warn};
