// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Clock system support for the MSP432P401R.
//!
//! MSP432P4xx technical reference manual (SLAU356):
//! <https://www.ti.com/lit/ug/slau356i/slau356i.pdf>

#![no_std]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod clocks;
pub mod config;
pub mod cs;
pub mod dco;
pub mod flctl;
pub mod pcm;
pub mod peripherals;
pub mod system_controller;
pub mod tlv;

pub use crate::system_controller::SystemController;
