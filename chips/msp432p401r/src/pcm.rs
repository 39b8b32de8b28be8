// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Power Control Manager (PCM)

use kernel::utilities::registers::{register_bitfields, Register, RegisterBank};

pub const PCM_BASE: usize = 0x4001_0000;

const PCMKEY: u32 = 0x695A; // for unlocking PCMCTL0 and PCMCTL1

register_bitfields![u32,
    PCMCTL0 [
        // select an active mode
        AMR OFFSET(0) NUMBITS(4) [],
        // read current power mode
        CPM OFFSET(8) NUMBITS(6) [],
        // for changing AMR or CPM 0x695A has to be written to this field
        PCMKEY OFFSET(16) NUMBITS(16) []
    ],
    PCMCTL1 [
        PMR_BUSY OFFSET(8) NUMBITS(1) []
    ]
];

const CTL0: Register<PCMCTL0::Register> = Register::at(0x00);
const CTL1: Register<PCMCTL1::Register> = Register::at(0x04);

pub const PCM_WORDS: usize = 2;

/// Active power modes using the LDO. CPM reports the same codes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum ActiveMode {
    /// Core voltage level 0: MCLK and HSMCLK up to 24MHz, SMCLK up to 12MHz
    LdoVcore0 = 0,
    /// Core voltage level 1: MCLK and HSMCLK up to 48MHz, SMCLK up to 24MHz
    LdoVcore1 = 1,
}

const VCORE0_MCLK_MAX_HZ: u32 = 24_000_000;
const VCORE0_HSMCLK_MAX_HZ: u32 = 24_000_000;
const VCORE0_SMCLK_MAX_HZ: u32 = 12_000_000;

impl ActiveMode {
    /// Lowest core voltage that supports all three high speed clocks.
    pub fn for_rates(mclk_hz: u32, hsmclk_hz: u32, smclk_hz: u32) -> ActiveMode {
        if mclk_hz > VCORE0_MCLK_MAX_HZ
            || hsmclk_hz > VCORE0_HSMCLK_MAX_HZ
            || smclk_hz > VCORE0_SMCLK_MAX_HZ
        {
            ActiveMode::LdoVcore1
        } else {
            ActiveMode::LdoVcore0
        }
    }
}

pub struct Pcm<'a, B: RegisterBank> {
    registers: &'a B,
}

impl<'a, B: RegisterBank> Pcm<'a, B> {
    pub const fn new(registers: &'a B) -> Self {
        Pcm { registers }
    }

    pub(crate) fn request_active_mode(&self, mode: ActiveMode) {
        self.registers.modify(
            CTL0,
            PCMCTL0::PCMKEY.val(PCMKEY) + PCMCTL0::AMR.val(mode as u32),
        );
    }

    /// Whether a requested mode transition has completed.
    pub fn is_in_mode(&self, mode: ActiveMode) -> bool {
        !self.registers.is_set(CTL1, PCMCTL1::PMR_BUSY)
            && self.registers.read(CTL0, PCMCTL0::CPM) == mode as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::utilities::fake_registers::FakeRegisterBank;

    #[test]
    fn request_carries_the_key() {
        let bank = FakeRegisterBank::<PCM_WORDS>::new();
        let pcm = Pcm::new(&bank);

        pcm.request_active_mode(ActiveMode::LdoVcore1);
        assert_eq!(bank.peek(0x00), (0x695A << 16) | 1);
        assert!(!pcm.is_in_mode(ActiveMode::LdoVcore1));

        bank.poke(0x00, 1 << 8);
        assert!(pcm.is_in_mode(ActiveMode::LdoVcore1));
        bank.poke(0x04, 1 << 8);
        assert!(!pcm.is_in_mode(ActiveMode::LdoVcore1));
    }

    #[test]
    fn core_voltage_by_frequency() {
        const MHZ: u32 = 1_000_000;
        assert_eq!(ActiveMode::for_rates(24 * MHZ, 24 * MHZ, 12 * MHZ), ActiveMode::LdoVcore0);
        assert_eq!(ActiveMode::for_rates(48 * MHZ, 3 * MHZ, 3 * MHZ), ActiveMode::LdoVcore1);
        assert_eq!(ActiveMode::for_rates(3 * MHZ, 48 * MHZ, 3 * MHZ), ActiveMode::LdoVcore1);
        assert_eq!(ActiveMode::for_rates(3 * MHZ, 3 * MHZ, 20 * MHZ), ActiveMode::LdoVcore1);
    }
}
