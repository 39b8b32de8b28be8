// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Device descriptor table (TLV)
//!
//! Factory calibration data in flash. Only the DCO calibration for the
//! internal resistor is read here.

use kernel::utilities::registers::RegisterBank;

use crate::dco::DcoCalibration;

pub const TLV_BASE: usize = 0x0020_1000;

const DCOIR_FCAL_RSEL04: usize = 0x4C;
const DCOIR_FCAL_RSEL5: usize = 0x50;
const DCOIR_CONSTK_RSEL04: usize = 0x64;
const DCOIR_CONSTK_RSEL5: usize = 0x68;

/// Number of 32-bit words spanned by the TLV up to the DCO constants.
pub const TLV_WORDS: usize = DCOIR_CONSTK_RSEL5 / 4 + 1;

pub struct Tlv<'a, B: RegisterBank> {
    registers: &'a B,
}

impl<'a, B: RegisterBank> Tlv<'a, B> {
    pub const fn new(registers: &'a B) -> Self {
        Tlv { registers }
    }

    pub fn dco_calibration(&self) -> DcoCalibration {
        DcoCalibration {
            // The DCO constants are stored as IEEE-754 singles
            constant_rsel04: f32::from_bits(self.registers.read_word(DCOIR_CONSTK_RSEL04)),
            calibration_rsel04: self.registers.read_word(DCOIR_FCAL_RSEL04),
            constant_rsel5: f32::from_bits(self.registers.read_word(DCOIR_CONSTK_RSEL5)),
            calibration_rsel5: self.registers.read_word(DCOIR_FCAL_RSEL5),
        }
    }
}
