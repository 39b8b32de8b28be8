// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Utility functions and types provided by the kernel crate.

pub mod fake_registers;
pub mod polling;
pub mod registers;
