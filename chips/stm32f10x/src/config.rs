// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Clock tree configuration for the STM32F10x.
//!
//! A board describes the clock tree it wants as a static
//! [`ClockConfiguration`] and hands a reference to the system controller.
//! The default value describes the reset state: everything runs from the
//! 8MHz internal oscillator with every prescaler at its lowest setting.
//!
//! ```rust,ignore
//! static CLOCKS: ClockConfiguration = {
//!     let mut config = ClockConfiguration::reset();
//!     config.high_speed_external = HertzU32::MHz(8);
//!     config.pll.enable = true;
//!     config.pll.source = PllSource::HighSpeedExternal;
//!     config.pll.multiply = PllMultiply::MultiplyBy9;
//!     config.system_clock = SystemClockSelect::Pll;
//!     config.ahb.apb1.divider = ApbDivider::DivideBy2;
//!     config
//! };
//! ```
//!
//! Every selector enum carries the raw register encoding as its
//! discriminant.

use fugit::HertzU32;

/// Source selection for the system clock (CFGR.SW).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum SystemClockSelect {
    HighSpeedInternal = 0b00,
    HighSpeedExternal = 0b01,
    Pll = 0b10,
}

/// PLL entry clock.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PllSource {
    /// HSI divided by two
    HighSpeedInternal,
    HighSpeedExternal,
    HighSpeedExternalDividedBy2,
}

impl PllSource {
    /// CFGR.PLLSRC encoding
    pub(crate) fn source_bit(self) -> u32 {
        match self {
            PllSource::HighSpeedInternal => 0,
            PllSource::HighSpeedExternal | PllSource::HighSpeedExternalDividedBy2 => 1,
        }
    }

    /// CFGR.PLLXTPRE encoding
    pub(crate) fn predivider_bit(self) -> u32 {
        match self {
            PllSource::HighSpeedExternalDividedBy2 => 1,
            _ => 0,
        }
    }
}

/// PLL multiplication factor. The register stores the factor minus two.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum PllMultiply {
    MultiplyBy2 = 0b0000,
    MultiplyBy3 = 0b0001,
    MultiplyBy4 = 0b0010,
    MultiplyBy5 = 0b0011,
    MultiplyBy6 = 0b0100,
    MultiplyBy7 = 0b0101,
    MultiplyBy8 = 0b0110,
    MultiplyBy9 = 0b0111,
    MultiplyBy10 = 0b1000,
    MultiplyBy11 = 0b1001,
    MultiplyBy12 = 0b1010,
    MultiplyBy13 = 0b1011,
    MultiplyBy14 = 0b1100,
    MultiplyBy15 = 0b1101,
    MultiplyBy16 = 0b1110,
}

impl PllMultiply {
    pub fn multiplier(self) -> u32 {
        self as u32 + 2
    }
}

/// USB prescaler applied to the PLL output.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum UsbDivider {
    DivideBy1Point5 = 0,
    DivideBy1 = 1,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum AhbDivider {
    DivideBy1 = 0b0000,
    DivideBy2 = 0b1000,
    DivideBy4 = 0b1001,
    DivideBy8 = 0b1010,
    DivideBy16 = 0b1011,
    DivideBy64 = 0b1100,
    DivideBy128 = 0b1101,
    DivideBy256 = 0b1110,
    DivideBy512 = 0b1111,
}

impl From<AhbDivider> for u32 {
    fn from(item: AhbDivider) -> u32 {
        match item {
            AhbDivider::DivideBy1 => 1,
            AhbDivider::DivideBy2 => 2,
            AhbDivider::DivideBy4 => 4,
            AhbDivider::DivideBy8 => 8,
            AhbDivider::DivideBy16 => 16,
            AhbDivider::DivideBy64 => 64,
            AhbDivider::DivideBy128 => 128,
            AhbDivider::DivideBy256 => 256,
            AhbDivider::DivideBy512 => 512,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum ApbDivider {
    DivideBy1 = 0b000, // No division
    DivideBy2 = 0b100,
    DivideBy4 = 0b101,
    DivideBy8 = 0b110,
    DivideBy16 = 0b111,
}

impl From<ApbDivider> for u32 {
    fn from(item: ApbDivider) -> u32 {
        match item {
            ApbDivider::DivideBy1 => 1,
            ApbDivider::DivideBy2 => 2,
            ApbDivider::DivideBy4 => 4,
            ApbDivider::DivideBy8 => 8,
            ApbDivider::DivideBy16 => 16,
        }
    }
}

/// ADC prescaler applied to PCLK2.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum AdcDivider {
    DivideBy2 = 0b00,
    DivideBy4 = 0b01,
    DivideBy6 = 0b10,
    DivideBy8 = 0b11,
}

impl From<AdcDivider> for u32 {
    fn from(item: AdcDivider) -> u32 {
        (item as u32 + 1) * 2
    }
}

/// RTC clock source (BDCR.RTCSEL).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum RtcSource {
    NoClock = 0b00,
    LowSpeedInternal = 0b01,
    LowSpeedExternal = 0b10,
    HighSpeedExternalDividedBy128 = 0b11,
}

/// Clock routed to the MCO pin.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum McoSource {
    NoClock = 0b000,
    SystemClock = 0b100,
    HighSpeedInternal = 0b101,
    HighSpeedExternal = 0b110,
    PllDividedBy2 = 0b111,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UsbConfiguration {
    pub divider: UsbDivider,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PllConfiguration {
    pub enable: bool,
    pub source: PllSource,
    pub multiply: PllMultiply,
    pub usb: UsbConfiguration,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RtcConfiguration {
    pub enable: bool,
    pub source: RtcSource,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AdcConfiguration {
    pub divider: AdcDivider,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Apb1Configuration {
    pub divider: ApbDivider,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Apb2Configuration {
    pub divider: ApbDivider,
    pub adc: AdcConfiguration,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AhbConfiguration {
    pub divider: AhbDivider,
    pub apb1: Apb1Configuration,
    pub apb2: Apb2Configuration,
}

/// The complete clock tree of an STM32F10x.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ClockConfiguration {
    /// Crystal or external clock on OSC_IN, zero when not fitted.
    pub high_speed_external: HertzU32,
    /// Crystal on OSC32_IN, zero when not fitted.
    pub low_speed_external: HertzU32,
    pub pll: PllConfiguration,
    pub system_clock: SystemClockSelect,
    pub rtc: RtcConfiguration,
    pub ahb: AhbConfiguration,
    pub mco: McoSource,
}

impl ClockConfiguration {
    /// The clock tree as it is out of reset. Usable in `static` initializers.
    pub const fn reset() -> ClockConfiguration {
        ClockConfiguration {
            high_speed_external: HertzU32::from_raw(0),
            low_speed_external: HertzU32::from_raw(0),
            pll: PllConfiguration {
                enable: false,
                source: PllSource::HighSpeedInternal,
                multiply: PllMultiply::MultiplyBy2,
                usb: UsbConfiguration {
                    divider: UsbDivider::DivideBy1Point5,
                },
            },
            system_clock: SystemClockSelect::HighSpeedInternal,
            rtc: RtcConfiguration {
                enable: false,
                source: RtcSource::NoClock,
            },
            ahb: AhbConfiguration {
                divider: AhbDivider::DivideBy1,
                apb1: Apb1Configuration {
                    divider: ApbDivider::DivideBy1,
                },
                apb2: Apb2Configuration {
                    divider: ApbDivider::DivideBy1,
                    adc: AdcConfiguration {
                        divider: AdcDivider::DivideBy2,
                    },
                },
            },
            mco: McoSource::NoClock,
        }
    }
}

impl Default for ClockConfiguration {
    fn default() -> Self {
        ClockConfiguration::reset()
    }
}
