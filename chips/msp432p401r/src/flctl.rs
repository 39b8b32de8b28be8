// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Flash Controller (FLCTL)

use fugit::HertzU32;
use kernel::utilities::registers::{register_bitfields, Register, RegisterBank};

pub const FLCTL_BASE: usize = 0x4001_1000;

register_bitfields![u32,
    FLCTL_BANK_RDCTL [
        /// Number of wait states for read
        WAIT OFFSET(12) NUMBITS(4) []
    ]
];

const BANK0_RDCTL: Register<FLCTL_BANK_RDCTL::Register> = Register::at(0x10);
const BANK1_RDCTL: Register<FLCTL_BANK_RDCTL::Register> = Register::at(0x14);

/// Number of 32-bit words spanned by the FLCTL block up to BANK1_RDCTL.
pub const FLCTL_WORDS: usize = 0x18 / 4;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum WaitStates {
    _0 = 0,
    _1 = 1,
}

impl WaitStates {
    /// Read wait states needed for MCLK running at `frequency`.
    pub fn for_frequency(frequency: HertzU32) -> WaitStates {
        if frequency.to_Hz() <= 16_000_000 {
            WaitStates::_0
        } else {
            WaitStates::_1
        }
    }
}

pub struct FlCtl<'a, B: RegisterBank> {
    registers: &'a B,
}

impl<'a, B: RegisterBank> FlCtl<'a, B> {
    pub const fn new(registers: &'a B) -> Self {
        FlCtl { registers }
    }

    pub(crate) fn set_waitstates(&self, ws: WaitStates) {
        self.registers
            .modify(BANK0_RDCTL, FLCTL_BANK_RDCTL::WAIT.val(ws as u32));
        self.registers
            .modify(BANK1_RDCTL, FLCTL_BANK_RDCTL::WAIT.val(ws as u32));
    }

    pub fn get_waitstates(&self) -> u32 {
        self.registers.read(BANK0_RDCTL, FLCTL_BANK_RDCTL::WAIT)
    }
}
