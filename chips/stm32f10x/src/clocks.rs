// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! STM32F10x clock tree arithmetic.
//!
//! Everything here is pure: it looks at a [`ClockConfiguration`] and works
//! out what the hardware will run at, without touching a register. The
//! system controller calls [`validate`] before it mutates anything and
//! [`derive_rates`] to fill its rate table.
//!
//! # Hardware limits
//!
//! | Clock         | Limit        |
//! |---------------|--------------|
//! | HSE           | 4MHz..=16MHz |
//! | LSE           | <= 1MHz      |
//! | PLL output    | <= 72MHz     |
//! | SYSCLK / HCLK | <= 72MHz     |
//! | PCLK1         | <= 36MHz     |
//! | ADCCLK        | <= 14MHz     |

use fugit::HertzU32;
use kernel::hil::system_controller::RateTable;
use kernel::ErrorCode;

use crate::config::{
    ApbDivider, ClockConfiguration, McoSource, PllSource, RtcSource, SystemClockSelect, UsbDivider,
};
use crate::peripherals::{Domain, DOMAIN_COUNT};

/// Internal 8MHz RC oscillator.
pub const HIGH_SPEED_INTERNAL: HertzU32 = HertzU32::MHz(8);
/// Internal low-speed RC oscillator, nominal value from the datasheet. Older
/// drivers for this family assume 20kHz; 40kHz is what the part runs at.
pub const LOW_SPEED_INTERNAL: HertzU32 = HertzU32::kHz(40);

const HSE_MIN_HZ: u32 = 4_000_000;
const HSE_MAX_HZ: u32 = 16_000_000;
const LSE_MAX_HZ: u32 = 1_000_000;
const SYS_CLOCK_LIMIT_HZ: u32 = 72_000_000;
const APB1_LIMIT_HZ: u32 = 36_000_000;
const ADC_LIMIT_HZ: u32 = 14_000_000;

fn divide(rate: HertzU32, divider: u32) -> HertzU32 {
    HertzU32::from_raw(rate.to_Hz() / divider)
}

/// PLL output, zero if the PLL is disabled.
pub fn pll_rate(config: &ClockConfiguration) -> HertzU32 {
    if !config.pll.enable {
        return HertzU32::from_raw(0);
    }

    let input = match config.pll.source {
        PllSource::HighSpeedInternal => divide(HIGH_SPEED_INTERNAL, 2),
        PllSource::HighSpeedExternal => config.high_speed_external,
        PllSource::HighSpeedExternalDividedBy2 => divide(config.high_speed_external, 2),
    };

    HertzU32::from_raw(input.to_Hz() * config.pll.multiply.multiplier())
}

/// SYSCLK for the configured selection.
pub fn system_clock_rate(config: &ClockConfiguration) -> HertzU32 {
    match config.system_clock {
        SystemClockSelect::HighSpeedInternal => HIGH_SPEED_INTERNAL,
        SystemClockSelect::HighSpeedExternal => config.high_speed_external,
        SystemClockSelect::Pll => pll_rate(config),
    }
}

// Timer kernels run at twice PCLK unless the APB prescaler is 1
fn timer_rate(bus: HertzU32, divider: ApbDivider) -> HertzU32 {
    match divider {
        ApbDivider::DivideBy1 => bus,
        _ => HertzU32::from_raw(bus.to_Hz() * 2),
    }
}

fn rtc_rate(config: &ClockConfiguration) -> HertzU32 {
    if !config.rtc.enable {
        return HertzU32::from_raw(0);
    }

    match config.rtc.source {
        RtcSource::NoClock => HertzU32::from_raw(0),
        RtcSource::LowSpeedInternal => LOW_SPEED_INTERNAL,
        RtcSource::LowSpeedExternal => config.low_speed_external,
        RtcSource::HighSpeedExternalDividedBy128 => divide(config.high_speed_external, 128),
    }
}

/// Frequency of every clock domain that `config` produces.
pub fn derive_rates(config: &ClockConfiguration) -> RateTable<DOMAIN_COUNT> {
    let pll = pll_rate(config);
    let ahb = divide(system_clock_rate(config), config.ahb.divider.into());
    let apb1 = divide(ahb, config.ahb.apb1.divider.into());
    let apb2 = divide(ahb, config.ahb.apb2.divider.into());

    let usb = match config.pll.usb.divider {
        UsbDivider::DivideBy1 => pll,
        UsbDivider::DivideBy1Point5 => HertzU32::from_raw(pll.to_Hz() * 2 / 3),
    };

    let mut rates = RateTable::new();
    rates.set(Domain::Ahb as usize, ahb);
    rates.set(Domain::Apb1 as usize, apb1);
    rates.set(Domain::Apb2 as usize, apb2);
    rates.set(
        Domain::Apb1Timers as usize,
        timer_rate(apb1, config.ahb.apb1.divider),
    );
    rates.set(
        Domain::Apb2Timers as usize,
        timer_rate(apb2, config.ahb.apb2.divider),
    );
    rates.set(
        Domain::Adc as usize,
        divide(apb2, config.ahb.apb2.adc.divider.into()),
    );
    rates.set(Domain::Usb as usize, usb);
    rates.set(Domain::Pll as usize, pll);
    rates.set(Domain::Rtc as usize, rtc_rate(config));
    rates.set(Domain::FlashInterface as usize, HIGH_SPEED_INTERNAL);
    rates.set(Domain::Watchdog as usize, LOW_SPEED_INTERNAL);
    rates
}

/// Reject a configuration the hardware cannot run.
///
/// # Errors:
///
/// + [Err]\([ErrorCode::SIZE]\) if a crystal is outside its range or a bus
/// exceeds its frequency limit.
/// + [Err]\([ErrorCode::FAIL]\) if a clock selects an oscillator or PLL that
/// is not enabled.
pub fn validate(config: &ClockConfiguration) -> Result<(), ErrorCode> {
    let hse = config.high_speed_external.to_Hz();
    let hse_present = hse != 0;
    let lse_present = config.low_speed_external.to_Hz() != 0;

    if hse_present && !(HSE_MIN_HZ..=HSE_MAX_HZ).contains(&hse) {
        return Err(ErrorCode::SIZE);
    }
    if config.low_speed_external.to_Hz() > LSE_MAX_HZ {
        return Err(ErrorCode::SIZE);
    }

    // Ensure every selected source will be running
    let pll_from_hse = config.pll.source != PllSource::HighSpeedInternal;
    if config.pll.enable && pll_from_hse && !hse_present {
        return Err(ErrorCode::FAIL);
    }
    let system_clock_running = match config.system_clock {
        SystemClockSelect::HighSpeedInternal => true,
        SystemClockSelect::HighSpeedExternal => hse_present,
        SystemClockSelect::Pll => config.pll.enable,
    };
    if !system_clock_running {
        return Err(ErrorCode::FAIL);
    }
    let rtc_clock_running = match config.rtc.source {
        RtcSource::NoClock | RtcSource::LowSpeedInternal => true,
        RtcSource::LowSpeedExternal => lse_present,
        RtcSource::HighSpeedExternalDividedBy128 => hse_present,
    };
    if config.rtc.enable && !rtc_clock_running {
        return Err(ErrorCode::FAIL);
    }
    let mco_running = match config.mco {
        McoSource::NoClock | McoSource::SystemClock | McoSource::HighSpeedInternal => true,
        McoSource::HighSpeedExternal => hse_present,
        McoSource::PllDividedBy2 => config.pll.enable,
    };
    if !mco_running {
        return Err(ErrorCode::FAIL);
    }

    // Frequency limits
    if pll_rate(config).to_Hz() > SYS_CLOCK_LIMIT_HZ
        || system_clock_rate(config).to_Hz() > SYS_CLOCK_LIMIT_HZ
    {
        return Err(ErrorCode::SIZE);
    }
    let rates = derive_rates(config);
    if rates.get(Domain::Apb1 as usize).to_Hz() > APB1_LIMIT_HZ {
        return Err(ErrorCode::SIZE);
    }
    if rates.get(Domain::Adc as usize).to_Hz() > ADC_LIMIT_HZ {
        return Err(ErrorCode::SIZE);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AdcDivider, AhbDivider, PllMultiply};

    fn hz(rates: &RateTable<DOMAIN_COUNT>, domain: Domain) -> u32 {
        rates.get(domain as usize).to_Hz()
    }

    fn seventy_two_mhz() -> ClockConfiguration {
        let mut config = ClockConfiguration::reset();
        config.high_speed_external = HertzU32::MHz(8);
        config.pll.enable = true;
        config.pll.source = PllSource::HighSpeedExternal;
        config.pll.multiply = PllMultiply::MultiplyBy9;
        config.system_clock = SystemClockSelect::Pll;
        config.ahb.apb1.divider = ApbDivider::DivideBy2;
        config.ahb.apb2.adc.divider = AdcDivider::DivideBy6;
        config
    }

    #[test]
    fn reset_tree_runs_from_hsi() {
        let config = ClockConfiguration::reset();
        let rates = derive_rates(&config);
        assert_eq!(validate(&config), Ok(()));
        assert_eq!(hz(&rates, Domain::Ahb), 8_000_000);
        assert_eq!(hz(&rates, Domain::Apb1), 8_000_000);
        assert_eq!(hz(&rates, Domain::Apb2Timers), 8_000_000);
        assert_eq!(hz(&rates, Domain::Adc), 4_000_000);
        assert_eq!(hz(&rates, Domain::Pll), 0);
        assert_eq!(hz(&rates, Domain::Usb), 0);
        assert_eq!(hz(&rates, Domain::Rtc), 0);
    }

    #[test]
    fn full_speed_tree() {
        let config = seventy_two_mhz();
        let rates = derive_rates(&config);
        assert_eq!(validate(&config), Ok(()));
        assert_eq!(hz(&rates, Domain::Pll), 72_000_000);
        assert_eq!(hz(&rates, Domain::Ahb), 72_000_000);
        assert_eq!(hz(&rates, Domain::Apb1), 36_000_000);
        assert_eq!(hz(&rates, Domain::Apb1Timers), 72_000_000);
        assert_eq!(hz(&rates, Domain::Apb2), 72_000_000);
        assert_eq!(hz(&rates, Domain::Apb2Timers), 72_000_000);
        assert_eq!(hz(&rates, Domain::Adc), 12_000_000);
        assert_eq!(hz(&rates, Domain::Usb), 48_000_000);
    }

    #[test]
    fn pll_from_halved_hsi() {
        let mut config = ClockConfiguration::reset();
        config.pll.enable = true;
        config.pll.multiply = PllMultiply::MultiplyBy16;
        assert_eq!(pll_rate(&config).to_Hz(), 64_000_000);

        config.pll.usb.divider = UsbDivider::DivideBy1;
        assert_eq!(hz(&derive_rates(&config), Domain::Usb), 64_000_000);
    }

    #[test]
    fn hse_over_128_feeds_rtc() {
        let mut config = ClockConfiguration::reset();
        config.high_speed_external = HertzU32::MHz(12);
        config.rtc.enable = true;
        config.rtc.source = RtcSource::HighSpeedExternalDividedBy128;
        assert_eq!(validate(&config), Ok(()));
        assert_eq!(hz(&derive_rates(&config), Domain::Rtc), 93_750);
    }

    #[test]
    fn derivation_is_repeatable() {
        let config = seventy_two_mhz();
        let first = derive_rates(&config);
        let second = derive_rates(&config);
        for domain in 0..DOMAIN_COUNT {
            assert_eq!(first.get(domain).to_Hz(), second.get(domain).to_Hz());
        }
    }

    #[test]
    fn rejects_disabled_sources() {
        let mut config = ClockConfiguration::reset();
        config.system_clock = SystemClockSelect::Pll;
        assert_eq!(validate(&config), Err(ErrorCode::FAIL));

        let mut config = ClockConfiguration::reset();
        config.system_clock = SystemClockSelect::HighSpeedExternal;
        assert_eq!(validate(&config), Err(ErrorCode::FAIL));

        let mut config = ClockConfiguration::reset();
        config.rtc.enable = true;
        config.rtc.source = RtcSource::LowSpeedExternal;
        assert_eq!(validate(&config), Err(ErrorCode::FAIL));

        let mut config = ClockConfiguration::reset();
        config.mco = McoSource::PllDividedBy2;
        assert_eq!(validate(&config), Err(ErrorCode::FAIL));

        let mut config = ClockConfiguration::reset();
        config.mco = McoSource::HighSpeedExternal;
        assert_eq!(validate(&config), Err(ErrorCode::FAIL));
    }

    #[test]
    fn disabled_rtc_source_is_not_checked() {
        let mut config = ClockConfiguration::reset();
        config.rtc.source = RtcSource::LowSpeedExternal;
        assert_eq!(validate(&config), Ok(()));

        config.rtc.enable = true;
        assert_eq!(validate(&config), Err(ErrorCode::FAIL));

        config.low_speed_external = HertzU32::Hz(32_768);
        assert_eq!(validate(&config), Ok(()));
    }

    #[test]
    fn rejects_out_of_range_frequencies() {
        let mut config = seventy_two_mhz();
        config.ahb.apb1.divider = ApbDivider::DivideBy1;
        assert_eq!(validate(&config), Err(ErrorCode::SIZE));

        let mut config = seventy_two_mhz();
        config.ahb.apb2.adc.divider = AdcDivider::DivideBy2;
        assert_eq!(validate(&config), Err(ErrorCode::SIZE));

        let mut config = seventy_two_mhz();
        config.pll.multiply = PllMultiply::MultiplyBy10;
        assert_eq!(validate(&config), Err(ErrorCode::SIZE));

        let mut config = ClockConfiguration::reset();
        config.high_speed_external = HertzU32::MHz(25);
        assert_eq!(validate(&config), Err(ErrorCode::SIZE));

        // Slowing HCLK brings the buses back into range
        let mut config = seventy_two_mhz();
        config.ahb.divider = AhbDivider::DivideBy2;
        config.ahb.apb1.divider = ApbDivider::DivideBy1;
        assert_eq!(validate(&config), Ok(()));
    }
}
