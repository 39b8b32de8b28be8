// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Clock configuration for the MSP432P401R.
//!
//! The default value is the state of the clock system after reset: MCLK,
//! HSMCLK and SMCLK on a 3MHz DCO, ACLK and BCLK on the 32.768kHz REFO and
//! no crystals fitted.

use fugit::HertzU32;

/// Oscillators that can drive a primary clock. The discriminant is the
/// CSCTL1 source-select code.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum Oscillator {
    /// LFXT crystal, up to 32.768kHz
    LowFrequency = 0b000,
    /// VLO, about 9.4kHz
    VeryLowFrequency = 0b001,
    /// REFO, 32.768kHz or 128kHz
    Reference = 0b010,
    /// DCO, 1MHz to 48MHz
    DigitallyControlled = 0b011,
    /// MODOSC, 25MHz
    Module = 0b100,
    /// HFXT crystal, 1MHz to 48MHz
    HighFrequency = 0b101,
}

impl Oscillator {
    /// ACLK can only run from the low frequency oscillators.
    pub fn can_drive_auxiliary(self) -> bool {
        matches!(
            self,
            Oscillator::LowFrequency | Oscillator::VeryLowFrequency | Oscillator::Reference
        )
    }

    /// CSCTL1.SELB encoding, `None` if the oscillator cannot drive BCLK.
    pub fn backup_select(self) -> Option<u32> {
        match self {
            Oscillator::LowFrequency => Some(0),
            Oscillator::Reference => Some(1),
            _ => None,
        }
    }
}

/// Primary clock divider. The hardware divides by `1 << code`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum ClockDivider {
    DivideBy1 = 0b000,
    DivideBy2 = 0b001,
    DivideBy4 = 0b010,
    DivideBy8 = 0b011,
    DivideBy16 = 0b100,
    DivideBy32 = 0b101,
    DivideBy64 = 0b110,
    DivideBy128 = 0b111,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AuxiliaryConfiguration {
    pub clock_source: Oscillator,
    pub divider: ClockDivider,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MasterConfiguration {
    pub clock_source: Oscillator,
    pub divider: ClockDivider,
}

/// HSMCLK and SMCLK share one source but have their own dividers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SubsystemMasterConfiguration {
    pub clock_source: Oscillator,
    pub divider: ClockDivider,
    pub low_speed_divider: ClockDivider,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BackupConfiguration {
    pub clock_source: Oscillator,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ReferenceConfiguration {
    /// 0 selects 32.768kHz, 1 selects 128kHz
    pub frequency_select: u8,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DcoConfiguration {
    /// Clear this when nothing runs from the DCO.
    pub enabled: bool,
    pub frequency: HertzU32,
}

/// Crystals fitted on the board. Zero means not fitted.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ExternalConfiguration {
    pub low_frequency: HertzU32,
    pub high_frequency: HertzU32,
    /// Both inputs are driven by an external square wave instead of a crystal
    pub bypass: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ClockConfiguration {
    pub auxiliary: AuxiliaryConfiguration,
    pub master: MasterConfiguration,
    pub subsystem_master: SubsystemMasterConfiguration,
    pub backup: BackupConfiguration,
    pub reference: ReferenceConfiguration,
    pub dco: DcoConfiguration,
    pub external: ExternalConfiguration,
}

impl ClockConfiguration {
    pub const fn reset() -> ClockConfiguration {
        ClockConfiguration {
            auxiliary: AuxiliaryConfiguration {
                clock_source: Oscillator::Reference,
                divider: ClockDivider::DivideBy1,
            },
            master: MasterConfiguration {
                clock_source: Oscillator::DigitallyControlled,
                divider: ClockDivider::DivideBy1,
            },
            subsystem_master: SubsystemMasterConfiguration {
                clock_source: Oscillator::DigitallyControlled,
                divider: ClockDivider::DivideBy1,
                low_speed_divider: ClockDivider::DivideBy1,
            },
            backup: BackupConfiguration {
                clock_source: Oscillator::Reference,
            },
            reference: ReferenceConfiguration {
                frequency_select: 0,
            },
            dco: DcoConfiguration {
                enabled: true,
                frequency: HertzU32::MHz(3),
            },
            external: ExternalConfiguration {
                low_frequency: HertzU32::from_raw(0),
                high_frequency: HertzU32::from_raw(0),
                bypass: false,
            },
        }
    }
}

impl Default for ClockConfiguration {
    fn default() -> Self {
        ClockConfiguration::reset()
    }
}
