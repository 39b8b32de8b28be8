// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Reset and clock control (RCC)

use kernel::utilities::registers::{register_bitfields, Register, RegisterBank};

use crate::config::{
    AdcDivider, AhbDivider, ApbDivider, McoSource, PllMultiply, PllSource, RtcSource,
    SystemClockSelect, UsbDivider,
};

pub const RCC_BASE: usize = 0x4002_1000;

register_bitfields![u32,
    CR [
        /// PLL clock ready flag
        PLLRDY OFFSET(25) NUMBITS(1) [],
        /// PLL enable
        PLLON OFFSET(24) NUMBITS(1) [],
        /// External high-speed clock bypass
        HSEBYP OFFSET(18) NUMBITS(1) [],
        /// External high-speed clock ready flag
        HSERDY OFFSET(17) NUMBITS(1) [],
        /// HSE clock enable
        HSEON OFFSET(16) NUMBITS(1) [],
        /// Internal high-speed clock ready flag
        HSIRDY OFFSET(1) NUMBITS(1) [],
        /// Internal high-speed clock enable
        HSION OFFSET(0) NUMBITS(1) []
    ],
    CFGR [
        /// Microcontroller clock output
        MCO OFFSET(24) NUMBITS(3) [],
        /// USB prescaler
        USBPRE OFFSET(22) NUMBITS(1) [],
        /// PLL multiplication factor
        PLLMUL OFFSET(18) NUMBITS(4) [],
        /// HSE divider for PLL entry
        PLLXTPRE OFFSET(17) NUMBITS(1) [],
        /// PLL entry clock source
        PLLSRC OFFSET(16) NUMBITS(1) [],
        /// ADC prescaler
        ADCPRE OFFSET(14) NUMBITS(2) [],
        /// APB high-speed prescaler (APB2)
        PPRE2 OFFSET(11) NUMBITS(3) [],
        /// APB low-speed prescaler (APB1)
        PPRE1 OFFSET(8) NUMBITS(3) [],
        /// AHB prescaler
        HPRE OFFSET(4) NUMBITS(4) [],
        /// System clock switch status
        SWS OFFSET(2) NUMBITS(2) [],
        /// System clock switch
        SW OFFSET(0) NUMBITS(2) []
    ],
    APB1ENR [
        /// Power interface clock enable
        PWREN OFFSET(28) NUMBITS(1) [],
        /// Backup interface clock enable
        BKPEN OFFSET(27) NUMBITS(1) []
    ],
    BDCR [
        /// Backup domain software reset
        BDRST OFFSET(16) NUMBITS(1) [],
        /// RTC clock enable
        RTCEN OFFSET(15) NUMBITS(1) [],
        /// RTC clock source selection
        RTCSEL OFFSET(8) NUMBITS(2) [],
        /// External low-speed oscillator bypass
        LSEBYP OFFSET(2) NUMBITS(1) [],
        /// External low-speed oscillator ready
        LSERDY OFFSET(1) NUMBITS(1) [],
        /// External low-speed oscillator enable
        LSEON OFFSET(0) NUMBITS(1) []
    ],
    CSR [
        /// Internal low-speed oscillator ready
        LSIRDY OFFSET(1) NUMBITS(1) [],
        /// Internal low-speed oscillator enable
        LSION OFFSET(0) NUMBITS(1) []
    ]
];

pub(crate) const CR: Register<CR::Register> = Register::at(0x00);
pub(crate) const CFGR: Register<CFGR::Register> = Register::at(0x04);
pub(crate) const AHBENR_OFFSET: usize = 0x14;
pub(crate) const APB2ENR_OFFSET: usize = 0x18;
pub(crate) const APB1ENR_OFFSET: usize = 0x1C;
pub(crate) const APB1ENR: Register<APB1ENR::Register> = Register::at(APB1ENR_OFFSET);
pub(crate) const BDCR: Register<BDCR::Register> = Register::at(0x20);
pub(crate) const CSR: Register<CSR::Register> = Register::at(0x24);

/// Enable register offset of each identity group, in group order.
pub(crate) const ENABLE_REGISTERS: [usize; 3] = [AHBENR_OFFSET, APB1ENR_OFFSET, APB2ENR_OFFSET];

/// Number of 32-bit words spanned by the RCC block up to CSR.
pub const RCC_WORDS: usize = 10;

pub struct Rcc<'a, B: RegisterBank> {
    registers: &'a B,
}

impl<'a, B: RegisterBank> Rcc<'a, B> {
    pub const fn new(registers: &'a B) -> Self {
        Self { registers }
    }

    /* System clock */

    // The source must be running before it is selected
    pub(crate) fn set_sys_clock_source(&self, source: SystemClockSelect) {
        self.registers.modify(CFGR, CFGR::SW.val(source as u32));
    }

    pub(crate) fn get_sys_clock_status(&self) -> u32 {
        self.registers.read(CFGR, CFGR::SWS)
    }

    /* HSE clock */

    pub(crate) fn disable_hse_clock(&self) {
        self.registers.modify(CR, CR::HSEON::CLEAR);
    }

    pub(crate) fn enable_hse_clock(&self) {
        self.registers.modify(CR, CR::HSEON::SET);
    }

    // Indicates whether the HSE oscillator is stable
    pub(crate) fn is_ready_hse_clock(&self) -> bool {
        self.registers.is_set(CR, CR::HSERDY)
    }

    /* PLL clock */

    // The PLL must not be the system clock while it is disabled
    pub(crate) fn disable_pll_clock(&self) {
        self.registers.modify(CR, CR::PLLON::CLEAR);
    }

    pub(crate) fn enable_pll_clock(&self) {
        self.registers.modify(CR, CR::PLLON::SET);
    }

    // The PLL clock is locked when its signal is stable
    pub(crate) fn is_locked_pll_clock(&self) -> bool {
        self.registers.is_set(CR, CR::PLLRDY)
    }

    // Only allowed while the PLL is off
    pub(crate) fn set_pll_source(&self, source: PllSource) {
        self.registers.modify(
            CFGR,
            CFGR::PLLSRC.val(source.source_bit()) + CFGR::PLLXTPRE.val(source.predivider_bit()),
        );
    }

    pub(crate) fn set_pll_multiplier(&self, multiply: PllMultiply) {
        self.registers.modify(CFGR, CFGR::PLLMUL.val(multiply as u32));
    }

    /* Prescalers */

    pub(crate) fn set_usb_prescaler(&self, divider: UsbDivider) {
        self.registers.modify(CFGR, CFGR::USBPRE.val(divider as u32));
    }

    pub(crate) fn set_ahb_prescaler(&self, divider: AhbDivider) {
        self.registers.modify(CFGR, CFGR::HPRE.val(divider as u32));
    }

    pub(crate) fn set_apb1_prescaler(&self, divider: ApbDivider) {
        self.registers.modify(CFGR, CFGR::PPRE1.val(divider as u32));
    }

    pub(crate) fn set_apb2_prescaler(&self, divider: ApbDivider) {
        self.registers.modify(CFGR, CFGR::PPRE2.val(divider as u32));
    }

    pub(crate) fn set_adc_prescaler(&self, divider: AdcDivider) {
        self.registers.modify(CFGR, CFGR::ADCPRE.val(divider as u32));
    }

    pub(crate) fn set_mco_source(&self, source: McoSource) {
        self.registers.modify(CFGR, CFGR::MCO.val(source as u32));
    }

    /* LSI clock */

    pub(crate) fn enable_lsi_clock(&self) {
        self.registers.modify(CSR, CSR::LSION::SET);
    }

    pub(crate) fn is_ready_lsi_clock(&self) -> bool {
        self.registers.is_set(CSR, CSR::LSIRDY)
    }

    /* Backup domain */

    // The PWR and BKP interfaces must be clocked before PWR_CR.DBP can open
    // the backup domain for writing
    pub(crate) fn enable_backup_interface_clocks(&self) {
        self.registers
            .modify(APB1ENR, APB1ENR::PWREN::SET + APB1ENR::BKPEN::SET);
    }

    pub(crate) fn reset_backup_domain(&self) {
        self.registers.modify(BDCR, BDCR::BDRST::SET);
        self.registers.modify(BDCR, BDCR::BDRST::CLEAR);
    }

    pub(crate) fn enable_lse_clock(&self) {
        self.registers.modify(BDCR, BDCR::LSEON::SET);
    }

    pub(crate) fn is_ready_lse_clock(&self) -> bool {
        self.registers.is_set(BDCR, BDCR::LSERDY)
    }

    // The RTC source can only be changed again after a backup domain reset
    pub(crate) fn set_rtc_clock_source(&self, source: RtcSource) {
        self.registers.modify(BDCR, BDCR::RTCSEL.val(source as u32));
    }

    pub(crate) fn set_rtc_enabled(&self, enable: bool) {
        if enable {
            self.registers.modify(BDCR, BDCR::RTCEN::SET);
        } else {
            self.registers.modify(BDCR, BDCR::RTCEN::CLEAR);
        }
    }
}
