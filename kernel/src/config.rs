// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Data structure for storing compile-time configuration options in the kernel.
//!
//! Configuration lives in a typed `const` object rather than in `#[cfg]`
//! blocks scattered through the drivers. Every code path stays type-checked
//! whichever options are selected, and the compiler folds the constant so a
//! disabled option costs nothing in the resulting binary.

/// Data structure holding compile-time configuration options.
///
/// To change the configuration, enable the matching kernel crate feature
/// from the top-level firmware crate.
pub struct Config {
    /// Upper bound on the number of status register reads spent waiting for
    /// an oscillator, PLL, clock switch or divider change to settle before a
    /// controller gives up with `ErrorCode::BUSY`.
    ///
    /// Controllers accept a per-instance override; this is only the default.
    pub ready_poll_limit: u32,

    /// Whether every register write issued through a register bank is
    /// emitted as a `trace`-level log record.
    ///
    /// If enabled, the offset and the full written word are logged, which is
    /// handy when comparing a bring-up sequence against the reference manual.
    pub trace_register_writes: bool,
}

/// A unique instance of `Config` where compile-time configuration options are
/// defined. This is the only location in the kernel crate where `#[cfg(x)]`
/// is used to configure code based on Cargo features.
pub const CONFIG: Config = Config {
    ready_poll_limit: if cfg!(feature = "short_ready_polls") {
        64
    } else {
        1_000_000
    },
    trace_register_writes: cfg!(feature = "trace_register_writes"),
};
