// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Core clock-control kernel.
//!
//! The kernel crate holds the code shared by every chip crate: the standard
//! error type, compile-time configuration, the Hardware Interface Layer (HIL)
//! trait for system clock controllers, and the register access utilities the
//! chip drivers are written against.
//!
//! Chip crates never touch memory-mapped registers directly. They are handed
//! a [`RegisterBank`](utilities::registers::RegisterBank) and perform every
//! read and write through it, which lets the same driver run against real
//! hardware or against a recording fake in host tests.

#![warn(unreachable_pub)]
#![no_std]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod config;
pub mod debug;
pub mod errorcode;
pub mod hil;
pub mod utilities;

pub use crate::errorcode::ErrorCode;
