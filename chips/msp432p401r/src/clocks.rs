// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! MSP432P401R clock tree arithmetic.
//!
//! The primary clocks divide one of six oscillators by a power of two.
//! [`source_rates`] works out what each oscillator runs at for a given
//! configuration, [`validate`] checks the resulting tree against the
//! hardware limits and [`derive_rates`] fills the rate table.

use fugit::HertzU32;
use kernel::hil::system_controller::RateTable;
use kernel::ErrorCode;

use crate::config::{ClockConfiguration, ClockDivider, Oscillator};
use crate::peripherals::{Clock, CLOCK_COUNT};

/// VLO, typical frequency
pub const VERY_LOW_FREQUENCY: HertzU32 = HertzU32::Hz(9_400);
/// MODOSC
pub const MODULE: HertzU32 = HertzU32::MHz(25);
/// SYSOSC
pub const SYSTEM: HertzU32 = HertzU32::MHz(5);
/// REFO, indexed by CSCLKEN.REFOFSEL
pub const REFERENCE: [HertzU32; 2] = [HertzU32::Hz(32_768), HertzU32::kHz(128)];

const LFXT_MAX_HZ: u32 = 32_768;
const HFXT_MIN_HZ: u32 = 1_000_000;
const HFXT_MAX_HZ: u32 = 48_000_000;
const MCLK_LIMIT_HZ: u32 = 48_000_000;
const HSMCLK_LIMIT_HZ: u32 = 48_000_000;
const SMCLK_LIMIT_HZ: u32 = 24_000_000;
const BCLK_LIMIT_HZ: u32 = 32_768;

/// Output of every oscillator, zero for one that is not running.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SourceRates {
    pub low_frequency: HertzU32,
    pub very_low_frequency: HertzU32,
    pub reference: HertzU32,
    pub digitally_controlled: HertzU32,
    pub module: HertzU32,
    pub high_frequency: HertzU32,
}

impl SourceRates {
    pub fn rate(&self, oscillator: Oscillator) -> HertzU32 {
        match oscillator {
            Oscillator::LowFrequency => self.low_frequency,
            Oscillator::VeryLowFrequency => self.very_low_frequency,
            Oscillator::Reference => self.reference,
            Oscillator::DigitallyControlled => self.digitally_controlled,
            Oscillator::Module => self.module,
            Oscillator::HighFrequency => self.high_frequency,
        }
    }

    fn is_running(&self, oscillator: Oscillator) -> bool {
        self.rate(oscillator).to_Hz() != 0
    }
}

/// REFO output for the configured frequency select.
///
/// # Errors:
///
/// - `INVAL` if the select code is neither 0 nor 1
pub fn reference_rate(config: &ClockConfiguration) -> Result<HertzU32, ErrorCode> {
    REFERENCE
        .get(usize::from(config.reference.frequency_select))
        .copied()
        .ok_or(ErrorCode::INVAL)
}

/// Oscillator outputs for `config`, with `dco` being what the DCO was tuned
/// to.
pub fn source_rates(
    config: &ClockConfiguration,
    dco: HertzU32,
) -> Result<SourceRates, ErrorCode> {
    Ok(SourceRates {
        low_frequency: config.external.low_frequency,
        very_low_frequency: VERY_LOW_FREQUENCY,
        reference: reference_rate(config)?,
        digitally_controlled: if config.dco.enabled {
            dco
        } else {
            HertzU32::from_raw(0)
        },
        module: MODULE,
        high_frequency: config.external.high_frequency,
    })
}

fn divide(rate: HertzU32, divider: ClockDivider) -> HertzU32 {
    HertzU32::from_raw(rate.to_Hz() >> divider as u32)
}

/// HFXTFREQ code for a crystal of `frequency`.
pub fn hfxt_frequency_range(frequency: HertzU32) -> u32 {
    match frequency.to_Hz() {
        0..=4_000_000 => 0,
        4_000_001..=8_000_000 => 1,
        8_000_001..=16_000_000 => 2,
        16_000_001..=24_000_000 => 3,
        24_000_001..=32_000_000 => 4,
        32_000_001..=40_000_000 => 5,
        _ => 6,
    }
}

/// The frequency MCLK will run at.
pub fn master_clock_rate(config: &ClockConfiguration, sources: &SourceRates) -> HertzU32 {
    divide(sources.rate(config.master.clock_source), config.master.divider)
}

/// Rate of every clock in the tree.
pub fn derive_rates(config: &ClockConfiguration, sources: &SourceRates) -> RateTable<CLOCK_COUNT> {
    let mut rates = RateTable::new();
    let subsystem = sources.rate(config.subsystem_master.clock_source);

    rates.set(
        Clock::Auxiliary as usize,
        divide(sources.rate(config.auxiliary.clock_source), config.auxiliary.divider),
    );
    rates.set(Clock::Master as usize, master_clock_rate(config, sources));
    rates.set(
        Clock::SubsystemMaster as usize,
        divide(subsystem, config.subsystem_master.divider),
    );
    rates.set(
        Clock::LowSpeedSubsystemMaster as usize,
        divide(subsystem, config.subsystem_master.low_speed_divider),
    );
    rates.set(
        Clock::Backup as usize,
        sources.rate(config.backup.clock_source),
    );

    rates.set(Clock::LowFrequency as usize, sources.low_frequency);
    rates.set(Clock::VeryLowFrequency as usize, sources.very_low_frequency);
    rates.set(Clock::Reference as usize, sources.reference);
    rates.set(Clock::Module as usize, sources.module);
    rates.set(Clock::System as usize, SYSTEM);
    rates.set(
        Clock::DigitallyControlled as usize,
        sources.digitally_controlled,
    );
    rates.set(Clock::HighFrequency as usize, sources.high_frequency);

    rates
}

/// Check the tree `config` describes before any of it is applied.
///
/// # Errors:
///
/// - `INVAL` if ACLK or BCLK select an oscillator they cannot use
/// - `FAIL` if a primary clock selects an oscillator that is not running
/// - `SIZE` if a crystal or a primary clock is outside its frequency range
pub fn validate(config: &ClockConfiguration, sources: &SourceRates) -> Result<(), ErrorCode> {
    if !config.auxiliary.clock_source.can_drive_auxiliary() {
        return Err(ErrorCode::INVAL);
    }
    if config.backup.clock_source.backup_select().is_none() {
        return Err(ErrorCode::INVAL);
    }

    let lfxt = config.external.low_frequency.to_Hz();
    if lfxt > LFXT_MAX_HZ {
        return Err(ErrorCode::SIZE);
    }
    let hfxt = config.external.high_frequency.to_Hz();
    if hfxt != 0 && !(HFXT_MIN_HZ..=HFXT_MAX_HZ).contains(&hfxt) {
        return Err(ErrorCode::SIZE);
    }

    for source in [
        config.auxiliary.clock_source,
        config.master.clock_source,
        config.subsystem_master.clock_source,
        config.backup.clock_source,
    ] {
        if !sources.is_running(source) {
            return Err(ErrorCode::FAIL);
        }
    }

    let rates = derive_rates(config, sources);
    let limits = [
        (Clock::Master, MCLK_LIMIT_HZ),
        (Clock::SubsystemMaster, HSMCLK_LIMIT_HZ),
        (Clock::LowSpeedSubsystemMaster, SMCLK_LIMIT_HZ),
        (Clock::Backup, BCLK_LIMIT_HZ),
    ];
    for (clock, limit) in limits {
        if rates.get(clock as usize).to_Hz() > limit {
            return Err(ErrorCode::SIZE);
        }
    }

    Ok(())
}
