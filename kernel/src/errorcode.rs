// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Standard error enum for invoking operations

use core::fmt;

/// Standard errors in Tock.
///
/// Clock controllers report configuration problems with `INVAL`, `FAIL` and
/// `SIZE`, a source that never becomes ready with `BUSY`, and operations the
/// chip has no hardware for with `NOSUPPORT`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(usize)]
pub enum ErrorCode {
    /// Generic failure condition
    FAIL = 0,
    /// Underlying system is busy; retry
    BUSY = 1,
    /// The state requested is already set
    ALREADY = 2,
    /// The component is powered down
    OFF = 3,
    /// An invalid parameter was passed
    INVAL = 5,
    /// Parameter passed was too large
    SIZE = 6,
    /// Operation or command is unsupported
    NOSUPPORT = 9,
    /// Device does not exist
    NODEVICE = 10,
}

impl ErrorCode {
    /// Whether this error describes an unusable clock configuration rather
    /// than a hardware condition observed while applying it.
    pub fn is_configuration_error(self) -> bool {
        matches!(self, ErrorCode::FAIL | ErrorCode::INVAL | ErrorCode::SIZE)
    }
}

impl From<ErrorCode> for usize {
    fn from(err: ErrorCode) -> usize {
        err as usize
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self {
            ErrorCode::FAIL => "generic failure",
            ErrorCode::BUSY => "timed out waiting for hardware",
            ErrorCode::ALREADY => "already in the requested state",
            ErrorCode::OFF => "component is powered down",
            ErrorCode::INVAL => "invalid parameter",
            ErrorCode::SIZE => "value out of range",
            ErrorCode::NOSUPPORT => "unsupported operation",
            ErrorCode::NODEVICE => "no such device",
        };
        write!(f, "{} ({})", description, *self as usize)
    }
}
