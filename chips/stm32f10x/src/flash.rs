// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Flash access control
//!
//! Only the access control register is driven here: the number of wait
//! states flash reads need at a given system clock frequency, and the
//! prefetch buffer that hides them.

use fugit::HertzU32;
use kernel::utilities::registers::{register_bitfields, Register, RegisterBank};

pub const FLASH_BASE: usize = 0x4002_2000;

register_bitfields![u32,
    ACR [
        /// Prefetch buffer status
        PRFTBS OFFSET(5) NUMBITS(1) [],
        /// Prefetch buffer enable
        PRFTBE OFFSET(4) NUMBITS(1) [],
        /// Flash half cycle access enable
        HLFCYA OFFSET(3) NUMBITS(1) [],
        /// Latency
        LATENCY OFFSET(0) NUMBITS(3) []
    ]
];

pub(crate) const ACR: Register<ACR::Register> = Register::at(0x00);

/// Number of 32-bit words spanned by the flash interface up to ACR.
pub const FLASH_WORDS: usize = 1;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlashLatency {
    Latency0 = 0b000,
    Latency1 = 0b001,
    Latency2 = 0b010,
}

impl FlashLatency {
    /// Wait states required at `sys_clock_frequency`.
    pub fn for_frequency(sys_clock_frequency: HertzU32) -> FlashLatency {
        let hz = sys_clock_frequency.to_Hz();
        if hz <= 24_000_000 {
            FlashLatency::Latency0
        } else if hz <= 48_000_000 {
            FlashLatency::Latency1
        } else {
            FlashLatency::Latency2
        }
    }
}

pub struct Flash<'a, B: RegisterBank> {
    registers: &'a B,
}

impl<'a, B: RegisterBank> Flash<'a, B> {
    pub const fn new(registers: &'a B) -> Self {
        Self { registers }
    }

    pub fn get_latency(&self) -> u32 {
        self.registers.read(ACR, ACR::LATENCY)
    }

    // Must be raised before the system clock frequency goes up
    pub(crate) fn set_latency(&self, latency: FlashLatency) {
        self.registers
            .modify(ACR, ACR::LATENCY.val(latency as u32) + ACR::PRFTBE::SET);
    }
}
