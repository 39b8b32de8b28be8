// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Bounded busy-waiting on hardware status flags.

use crate::ErrorCode;

/// Evaluate `ready` up to `limit` times, returning as soon as it holds.
///
/// Returns `Err(ErrorCode::BUSY)` if the condition never held.
pub fn poll_until<F: FnMut() -> bool>(limit: u32, mut ready: F) -> Result<(), ErrorCode> {
    for _ in 0..limit {
        if ready() {
            return Ok(());
        }
    }

    Err(ErrorCode::BUSY)
}

#[cfg(test)]
mod tests {
    use super::poll_until;
    use crate::ErrorCode;
    use core::cell::Cell;

    #[test]
    fn stops_at_first_success() {
        let polls = Cell::new(0);
        let result = poll_until(10, || {
            polls.set(polls.get() + 1);
            polls.get() == 3
        });
        assert_eq!(result, Ok(()));
        assert_eq!(polls.get(), 3);
    }

    #[test]
    fn gives_up_after_limit() {
        let polls = Cell::new(0);
        let result = poll_until(5, || {
            polls.set(polls.get() + 1);
            false
        });
        assert_eq!(result, Err(ErrorCode::BUSY));
        assert_eq!(polls.get(), 5);
    }
}
