// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Clock System (CS)

use kernel::utilities::registers::{
    register_bitfields, KeyProtection, ProtectedBank, Register, RegisterBank,
};

use crate::config::{ClockDivider, Oscillator};

pub const CS_BASE: usize = 0x4001_0400;

const KEY: u32 = 0x695A;

register_bitfields! [u32,
    CSKEY [
        /// For accessing any other register, it must be unlocked using this key-register
        KEY OFFSET(0) NUMBITS(16) []
    ],
    CSCTL0 [
        /// For calibrating the DCO frequency
        DCOTUNE OFFSET(0) NUMBITS(10) [],
        /// DCO frequency range select
        DCORSEL OFFSET(16) NUMBITS(3) [],
        /// Enable/disable DCO external resistor mode
        DCORES OFFSET(22) NUMBITS(1) [],
        /// Enable DCO
        DCOEN OFFSET(23) NUMBITS(1) []
    ],
    CSCTL1 [
        /// Select MCLK source
        SELM OFFSET(0) NUMBITS(3) [],
        /// Select SMCLK and HSMCLK source
        SELS OFFSET(4) NUMBITS(3) [],
        /// Select ACLK source
        SELA OFFSET(8) NUMBITS(3) [],
        /// Select BCLK source
        SELB OFFSET(12) NUMBITS(1) [],
        /// MCLK source divider
        DIVM OFFSET(16) NUMBITS(3) [],
        /// HSMCLK source divider
        DIVHS OFFSET(20) NUMBITS(3) [],
        /// ACLK source divider
        DIVA OFFSET(24) NUMBITS(3) [],
        /// SMCLK divider
        DIVS OFFSET(28) NUMBITS(3) []
    ],
    CSCTL2 [
        /// Turn on LFXT oscillator
        LFXT_EN OFFSET(8) NUMBITS(1) [],
        /// LFXT bypass select
        LFXTBYPASS OFFSET(9) NUMBITS(1) [],
        /// HFXT frequency selection
        HFXTFREQ OFFSET(20) NUMBITS(3) [],
        /// Turn on HFXT oscillator
        HFXT_EN OFFSET(24) NUMBITS(1) [],
        /// HFXT bypass select
        HFXTBYPASS OFFSET(25) NUMBITS(1) []
    ],
    CSCLKEN [
        /// Select REFO nominal frequency: 0 = 32.768kHz, 1=128kHz
        REFOFSEL OFFSET(15) NUMBITS(1) []
    ],
    /// Status of the different clock-sources
    CSSTAT [
        /// DCO status, 1=active, 0=inactive
        DCO_ON OFFSET(0) NUMBITS(1) [],
        /// ACLK ready status
        ACLK_READY OFFSET(24) NUMBITS(1) [],
        /// MCLK ready status
        MCLK_READY OFFSET(25) NUMBITS(1) [],
        /// HSMCLK ready status
        HSMCLK_READY OFFSET(26) NUMBITS(1) [],
        /// SMCLK ready status
        SMCLK_READY OFFSET(27) NUMBITS(1) [],
        /// BCLK ready status
        BCLK_READY OFFSET(28) NUMBITS(1) []
    ],
    /// Interrupt flag register
    CSIFG [
        /// LFXT oscillator fault flag
        LFXTIFG OFFSET(0) NUMBITS(1) [],
        /// HFXT oscillator fault flag
        HFXTIFG OFFSET(1) NUMBITS(1) [],
        /// LFXT start fault counter
        FCNTLFIFG OFFSET(8) NUMBITS(1) [],
        /// HFXT start fault counter
        FCNTHFIFG OFFSET(9) NUMBITS(1) []
    ],
    /// Interrupt clear register
    CSCLRIFG [
        /// LFXT oscillator fault flag
        LFXTIFG OFFSET(0) NUMBITS(1) [],
        /// HFXT oscillator fault flag
        HFXTIFG OFFSET(1) NUMBITS(1) [],
        /// LFXT start fault counter
        FCNTLFIFG OFFSET(8) NUMBITS(1) [],
        /// HFXT start fault counter
        FCNTHFIFG OFFSET(9) NUMBITS(1) []
    ]
];

pub(crate) const CSKEY_REG: Register<CSKEY::Register> = Register::at(0x00);
pub(crate) const CSCTL0_REG: Register<CSCTL0::Register> = Register::at(0x04);
pub(crate) const CSCTL1_REG: Register<CSCTL1::Register> = Register::at(0x08);
pub(crate) const CSCTL2_REG: Register<CSCTL2::Register> = Register::at(0x0C);
pub(crate) const CSCLKEN_REG: Register<CSCLKEN::Register> = Register::at(0x30);
pub(crate) const CSSTAT_REG: Register<CSSTAT::Register> = Register::at(0x34);
pub(crate) const CSIFG_REG: Register<CSIFG::Register> = Register::at(0x48);
pub(crate) const CSCLRIFG_REG: Register<CSCLRIFG::Register> = Register::at(0x50);

/// Number of 32-bit words spanned by the CS block.
pub const CS_WORDS: usize = 0x68 / 4;

/// The five primary clocks, each with its own ready flag.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PrimaryClock {
    Auxiliary,
    Master,
    SubsystemMaster,
    LowSpeedSubsystemMaster,
    Backup,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Crystal {
    LowFrequency,
    HighFrequency,
}

type CsProtection = KeyProtection<CSKEY::Register>;

pub struct ClockSystem<'a, B: RegisterBank> {
    registers: ProtectedBank<'a, B, CsProtection>,
}

impl<'a, B: RegisterBank> ClockSystem<'a, B> {
    pub fn new(registers: &'a B) -> ClockSystem<'a, B> {
        // Writing the key unlocks the other registers, any other value
        // written to the key register locks them again
        let protection = KeyProtection::new(CSKEY_REG, CSKEY::KEY.val(KEY), CSKEY::KEY.val(0));
        ClockSystem {
            registers: ProtectedBank::new(registers, protection),
        }
    }

    /* Primary clocks */

    pub(crate) fn set_source(&self, clock: PrimaryClock, source: Oscillator) {
        let select = source as u32;
        match clock {
            PrimaryClock::Auxiliary => self.registers.modify(CSCTL1_REG, CSCTL1::SELA.val(select)),
            PrimaryClock::Master => self.registers.modify(CSCTL1_REG, CSCTL1::SELM.val(select)),
            // HSMCLK and SMCLK share SELS
            PrimaryClock::SubsystemMaster | PrimaryClock::LowSpeedSubsystemMaster => {
                self.registers.modify(CSCTL1_REG, CSCTL1::SELS.val(select))
            }
            // SELB is a single bit, oscillators that cannot drive BCLK are
            // rejected before this point
            PrimaryClock::Backup => {
                if let Some(select) = source.backup_select() {
                    self.registers.modify(CSCTL1_REG, CSCTL1::SELB.val(select));
                }
            }
        }
    }

    pub(crate) fn set_divider(&self, clock: PrimaryClock, divider: ClockDivider) {
        let code = divider as u32;
        match clock {
            PrimaryClock::Auxiliary => self.registers.modify(CSCTL1_REG, CSCTL1::DIVA.val(code)),
            PrimaryClock::Master => self.registers.modify(CSCTL1_REG, CSCTL1::DIVM.val(code)),
            PrimaryClock::SubsystemMaster => {
                self.registers.modify(CSCTL1_REG, CSCTL1::DIVHS.val(code))
            }
            PrimaryClock::LowSpeedSubsystemMaster => {
                self.registers.modify(CSCTL1_REG, CSCTL1::DIVS.val(code))
            }
            // BCLK is never divided
            PrimaryClock::Backup => {}
        }
    }

    /// Indicates whether a primary clock is stable after a source or divider
    /// change.
    pub fn is_ready(&self, clock: PrimaryClock) -> bool {
        let field = match clock {
            PrimaryClock::Auxiliary => CSSTAT::ACLK_READY,
            PrimaryClock::Master => CSSTAT::MCLK_READY,
            PrimaryClock::SubsystemMaster => CSSTAT::HSMCLK_READY,
            PrimaryClock::LowSpeedSubsystemMaster => CSSTAT::SMCLK_READY,
            PrimaryClock::Backup => CSSTAT::BCLK_READY,
        };
        self.registers.is_set(CSSTAT_REG, field)
    }

    /* Crystals */

    pub(crate) fn disable_crystals(&self) {
        self.registers
            .modify(CSCTL2_REG, CSCTL2::LFXT_EN::CLEAR + CSCTL2::HFXT_EN::CLEAR);
    }

    pub(crate) fn enable_low_frequency_crystal(&self, bypass: bool) {
        self.registers.modify(
            CSCTL2_REG,
            CSCTL2::LFXTBYPASS.val(bypass as u32) + CSCTL2::LFXT_EN::SET,
        );
    }

    // `frequency_range` is the HFXTFREQ code for the crystal
    pub(crate) fn enable_high_frequency_crystal(&self, frequency_range: u32, bypass: bool) {
        self.registers.modify(
            CSCTL2_REG,
            CSCTL2::HFXTFREQ.val(frequency_range)
                + CSCTL2::HFXTBYPASS.val(bypass as u32)
                + CSCTL2::HFXT_EN::SET,
        );
    }

    /// The fault flag of a crystal stays set until it oscillates.
    pub fn is_faulted(&self, crystal: Crystal) -> bool {
        match crystal {
            Crystal::LowFrequency => self.registers.is_set(CSIFG_REG, CSIFG::LFXTIFG),
            Crystal::HighFrequency => self.registers.is_set(CSIFG_REG, CSIFG::HFXTIFG),
        }
    }

    pub(crate) fn clear_fault(&self, crystal: Crystal) {
        match crystal {
            Crystal::LowFrequency => self.registers.write(
                CSCLRIFG_REG,
                CSCLRIFG::LFXTIFG::SET + CSCLRIFG::FCNTLFIFG::SET,
            ),
            Crystal::HighFrequency => self.registers.write(
                CSCLRIFG_REG,
                CSCLRIFG::HFXTIFG::SET + CSCLRIFG::FCNTHFIFG::SET,
            ),
        }
    }

    /* DCO */

    // `tuning` is the signed DCOTUNE value, stored as 10-bit two's complement
    pub(crate) fn configure_dco(&self, range_select: u32, tuning: i16) {
        let tune = (tuning as u32) & 0x3FF;
        self.registers.modify(
            CSCTL0_REG,
            CSCTL0::DCOTUNE.val(tune)
                + CSCTL0::DCORSEL.val(range_select)
                + CSCTL0::DCORES::CLEAR
                + CSCTL0::DCOEN::SET,
        );
    }

    pub(crate) fn disable_dco(&self) {
        self.registers.modify(CSCTL0_REG, CSCTL0::DCOEN::CLEAR);
    }

    pub fn is_dco_on(&self) -> bool {
        self.registers.is_set(CSSTAT_REG, CSSTAT::DCO_ON)
    }

    /* REFO */

    pub(crate) fn set_reference_frequency(&self, select: u32) {
        self.registers.modify(CSCLKEN_REG, CSCLKEN::REFOFSEL.val(select));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::utilities::fake_registers::{FakeRegisterBank, RecordedWrite};
    use std::vec::Vec;

    fn unlock() -> RecordedWrite {
        RecordedWrite {
            offset: 0x00,
            value: KEY,
        }
    }

    fn lock() -> RecordedWrite {
        RecordedWrite {
            offset: 0x00,
            value: 0,
        }
    }

    #[test]
    fn every_write_is_bracketed_by_the_key() {
        let bank = FakeRegisterBank::<CS_WORDS>::new();
        let cs = ClockSystem::new(&bank);

        cs.set_source(PrimaryClock::Master, Oscillator::Module);
        cs.set_divider(PrimaryClock::Auxiliary, ClockDivider::DivideBy4);

        let journal: Vec<RecordedWrite> = bank.journal().collect();
        assert_eq!(journal.len(), 6);
        assert_eq!(journal[0], unlock());
        assert_eq!(journal[1].offset, 0x08);
        assert_eq!(journal[2], lock());
        assert_eq!(journal[3], unlock());
        assert_eq!(journal[4].offset, 0x08);
        assert_eq!(journal[5], lock());
        assert_eq!(bank.peek(0x08), 0b100 | (0b010 << 24));
    }

    #[test]
    fn subsystem_clocks_share_a_source_select() {
        let bank = FakeRegisterBank::<CS_WORDS>::new();
        let cs = ClockSystem::new(&bank);

        cs.set_source(PrimaryClock::LowSpeedSubsystemMaster, Oscillator::HighFrequency);
        assert_eq!((bank.peek(0x08) >> 4) & 0b111, 0b101);

        cs.set_divider(PrimaryClock::SubsystemMaster, ClockDivider::DivideBy2);
        cs.set_divider(PrimaryClock::LowSpeedSubsystemMaster, ClockDivider::DivideBy128);
        assert_eq!((bank.peek(0x08) >> 20) & 0b111, 0b001);
        assert_eq!((bank.peek(0x08) >> 28) & 0b111, 0b111);
    }

    #[test]
    fn negative_tuning_is_stored_as_ten_bits() {
        let bank = FakeRegisterBank::<CS_WORDS>::new();
        let cs = ClockSystem::new(&bank);

        cs.configure_dco(5, -200);
        let ctl0 = bank.peek(0x04);
        assert_eq!(ctl0 & 0x3FF, 1024 - 200);
        assert_eq!((ctl0 >> 16) & 0b111, 5);
        assert_ne!(ctl0 & (1 << 23), 0);
    }

    #[test]
    fn disabling_the_dco_keeps_its_tuning() {
        let bank = FakeRegisterBank::<CS_WORDS>::new();
        let cs = ClockSystem::new(&bank);

        cs.configure_dco(3, 17);
        cs.disable_dco();
        let ctl0 = bank.peek(0x04);
        assert_eq!(ctl0 & (1 << 23), 0);
        assert_eq!(ctl0 & 0x3FF, 17);
        assert_eq!((ctl0 >> 16) & 0b111, 3);
    }

    #[test]
    fn clearing_a_fault_writes_only_the_clear_register() {
        let bank = FakeRegisterBank::<CS_WORDS>::new();
        let cs = ClockSystem::new(&bank);

        cs.clear_fault(Crystal::HighFrequency);
        let writes: Vec<u32> = bank.writes_to(0x50).collect();
        assert_eq!(writes, [(1 << 1) | (1 << 9)]);
    }
}
