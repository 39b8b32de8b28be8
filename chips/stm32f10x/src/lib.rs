// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Clock control for the STM32F10x (connectivity, performance and value
//! lines).
//!
//! STM32F10x reference manual (RM0008):
//! <https://www.st.com/resource/en/reference_manual/rm0008.pdf>

#![no_std]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod clocks;
pub mod config;
pub mod flash;
pub mod peripherals;
pub mod pwr;
pub mod rcc;
pub mod system_controller;

pub use crate::system_controller::SystemController;
