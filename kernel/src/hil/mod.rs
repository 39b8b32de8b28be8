// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Public traits for interfaces between chip crates and the firmware using
//! them.

pub mod system_controller;
