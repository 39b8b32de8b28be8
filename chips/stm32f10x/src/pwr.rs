// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Power control (PWR)

use kernel::utilities::registers::{register_bitfields, Register, RegisterBank};

pub const PWR_BASE: usize = 0x4000_7000;

register_bitfields![u32,
    CR [
        /// Disable backup domain write protection
        DBP OFFSET(8) NUMBITS(1) []
    ]
];

pub(crate) const CR: Register<CR::Register> = Register::at(0x00);

/// Number of 32-bit words spanned by the PWR block up to CR.
pub const PWR_WORDS: usize = 1;

pub struct Pwr<'a, B: RegisterBank> {
    registers: &'a B,
}

impl<'a, B: RegisterBank> Pwr<'a, B> {
    pub const fn new(registers: &'a B) -> Self {
        Self { registers }
    }

    // RCC_BDCR and the backup registers stay read-only until this is set
    pub(crate) fn enable_backup_domain_access(&self) {
        self.registers.modify(CR, CR::DBP::SET);
    }

    pub fn is_backup_domain_writable(&self) -> bool {
        self.registers.is_set(CR, CR::DBP)
    }
}
