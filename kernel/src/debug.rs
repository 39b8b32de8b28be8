// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Support for reporting unrecoverable clock errors.
//!
//! Controllers return every failure as an `Err` so that host tests can
//! observe it. Firmware that cannot continue on a broken clock tree funnels
//! the result through [`fatal_on_error`], which logs the error and halts.
//!
//! ```rust,ignore
//! use kernel::debug::fatal_on_error;
//!
//! fatal_on_error(controller.initialize(), "clock tree bring-up");
//! ```

use log::error;

use crate::ErrorCode;

/// Unwrap `result`, or log `context` with the error and panic.
///
/// With `panic = "abort"` the panic handler is the chip's halt routine.
#[track_caller]
pub fn fatal_on_error<T>(result: Result<T, ErrorCode>, context: &str) -> T {
    match result {
        Ok(value) => value,
        Err(code) => {
            if code.is_configuration_error() {
                error!("{}: rejected configuration ({})", context, code);
            } else {
                error!("{}: {}", context, code);
            }
            panic!("{}: {:?}", context, code);
        }
    }
}
