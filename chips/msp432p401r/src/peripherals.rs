// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Peripheral identities of the MSP432P401R.
//!
//! The clock system has no per-peripheral gates, so identities name clocks
//! rather than peripherals. A driver asks for the rate of the clock it was
//! wired to, e.g. `SMCLK` for an eUSCI running from SMCLK.

use kernel::hil::system_controller::{self, Family};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Msp432p401r {}

impl Family for Msp432p401r {
    const NAME: &'static str = "msp432p401r";
}

pub type PeripheralId = system_controller::PeripheralId<Msp432p401r>;

pub const ACLK: PeripheralId = PeripheralId::define(0);
pub const MCLK: PeripheralId = PeripheralId::define(1);
pub const HSMCLK: PeripheralId = PeripheralId::define(2);
pub const SMCLK: PeripheralId = PeripheralId::define(3);
pub const BCLK: PeripheralId = PeripheralId::define(4);
pub const LFXTCLK: PeripheralId = PeripheralId::define(5);
pub const VLOCLK: PeripheralId = PeripheralId::define(6);
pub const REFOCLK: PeripheralId = PeripheralId::define(7);
pub const MODCLK: PeripheralId = PeripheralId::define(8);
pub const SYSCLK: PeripheralId = PeripheralId::define(9);
pub const DCOCLK: PeripheralId = PeripheralId::define(10);
pub const HFXTCLK: PeripheralId = PeripheralId::define(11);

/// Clocks of the MSP432P401R clock system. The discriminant equals the
/// identity and indexes the controller's rate table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Clock {
    Auxiliary,
    Master,
    SubsystemMaster,
    LowSpeedSubsystemMaster,
    Backup,
    LowFrequency,
    VeryLowFrequency,
    Reference,
    Module,
    System,
    DigitallyControlled,
    HighFrequency,
}

pub const CLOCK_COUNT: usize = 12;

pub const PERIPHERALS: [(PeripheralId, Clock); CLOCK_COUNT] = [
    (ACLK, Clock::Auxiliary),
    (MCLK, Clock::Master),
    (HSMCLK, Clock::SubsystemMaster),
    (SMCLK, Clock::LowSpeedSubsystemMaster),
    (BCLK, Clock::Backup),
    (LFXTCLK, Clock::LowFrequency),
    (VLOCLK, Clock::VeryLowFrequency),
    (REFOCLK, Clock::Reference),
    (MODCLK, Clock::Module),
    (SYSCLK, Clock::System),
    (DCOCLK, Clock::DigitallyControlled),
    (HFXTCLK, Clock::HighFrequency),
];

/// Clock named by `id`, `None` past the last clock.
pub fn clock_of(id: PeripheralId) -> Option<Clock> {
    PERIPHERALS
        .get(id.device_id() as usize)
        .map(|&(_, clock)| clock)
}
