// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! MSP432P401R system controller.
//!
//! Programs the clock system (CS) from a [`ClockConfiguration`] and reports
//! the rate of each clock afterwards. The CS has no per-peripheral gates:
//! power gating requests are answered with `NOSUPPORT`.
//!
//! Every CS write goes through a [`ClockSystem`], which unlocks the block
//! with the CS key right before the write and locks it right after.
//!
//! ```rust,ignore
//! let cs = unsafe { MmioRegisterBank::new(msp432p401r::cs::CS_BASE) };
//! let tlv = unsafe { MmioRegisterBank::new(msp432p401r::tlv::TLV_BASE) };
//! let flctl = unsafe { MmioRegisterBank::new(msp432p401r::flctl::FLCTL_BASE) };
//! let pcm = unsafe { MmioRegisterBank::new(msp432p401r::pcm::PCM_BASE) };
//!
//! let controller = SystemController::new(&cs, &tlv, &flctl, &pcm, &CLOCKS);
//! fatal_on_error(controller.initialize(), "clock system");
//! let uart_clock = controller.get_clock_rate(peripherals::SMCLK);
//! ```

use core::cell::Cell;

use fugit::HertzU32;
use kernel::config::CONFIG;
use kernel::hil::system_controller::{self, RateTable};
use kernel::utilities::polling::poll_until;
use kernel::utilities::registers::RegisterBank;
use kernel::ErrorCode;
use log::{debug, warn};

use crate::clocks;
use crate::config::{ClockConfiguration, Oscillator};
use crate::cs::{ClockSystem, Crystal, PrimaryClock};
use crate::dco;
use crate::flctl::{FlCtl, WaitStates};
use crate::pcm::{ActiveMode, Pcm};
use crate::peripherals::{self, Clock, PeripheralId, CLOCK_COUNT};
use crate::tlv::Tlv;

pub struct SystemController<'a, B: RegisterBank> {
    cs: ClockSystem<'a, B>,
    tlv: Tlv<'a, B>,
    flctl: FlCtl<'a, B>,
    pcm: Pcm<'a, B>,
    config: &'a ClockConfiguration,
    rates: Cell<RateTable<CLOCK_COUNT>>,
    ready_poll_limit: u32,
}

impl<'a, B: RegisterBank> SystemController<'a, B> {
    pub fn new(
        cs: &'a B,
        tlv: &'a B,
        flctl: &'a B,
        pcm: &'a B,
        config: &'a ClockConfiguration,
    ) -> SystemController<'a, B> {
        SystemController {
            cs: ClockSystem::new(cs),
            tlv: Tlv::new(tlv),
            flctl: FlCtl::new(flctl),
            pcm: Pcm::new(pcm),
            config,
            rates: Cell::new(RateTable::new()),
            ready_poll_limit: CONFIG.ready_poll_limit,
        }
    }

    pub fn with_ready_timeout(mut self, polls: u32) -> SystemController<'a, B> {
        self.ready_poll_limit = polls;
        self
    }

    fn wait_until<F: FnMut() -> bool>(&self, what: &str, ready: F) -> Result<(), ErrorCode> {
        poll_until(self.ready_poll_limit, ready).map_err(|code| {
            warn!("msp432p401r: {} not ready after {} polls", what, self.ready_poll_limit);
            code
        })
    }

    fn wait_for_clock(&self, clock: PrimaryClock) -> Result<(), ErrorCode> {
        self.wait_until("primary clock", || self.cs.is_ready(clock))
    }

    // The fault flag is set while the crystal starts up and has to be
    // cleared until it stays clear
    fn wait_for_crystal(&self, crystal: Crystal) -> Result<(), ErrorCode> {
        self.wait_until("crystal", || {
            if self.cs.is_faulted(crystal) {
                self.cs.clear_fault(crystal);
                false
            } else {
                true
            }
        })
    }
}

impl<'a, B: RegisterBank> system_controller::SystemController for SystemController<'a, B> {
    type Peripheral = PeripheralId;
    type Configuration = &'a ClockConfiguration;

    fn initialize(&self) -> Result<(), ErrorCode> {
        let config = self.config;

        let dco = if config.dco.enabled {
            Some(dco::settings_for(
                config.dco.frequency,
                &self.tlv.dco_calibration(),
            )?)
        } else {
            None
        };
        let dco_rate = dco.map_or(HertzU32::from_raw(0), |settings| settings.frequency);
        let sources = clocks::source_rates(config, dco_rate)?;
        clocks::validate(config, &sources)?;
        let rates = clocks::derive_rates(config, &sources);
        let mclk = clocks::master_clock_rate(config, &sources);
        let mode = ActiveMode::for_rates(
            mclk.to_Hz(),
            rates.get(Clock::SubsystemMaster as usize).to_Hz(),
            rates.get(Clock::LowSpeedSubsystemMaster as usize).to_Hz(),
        );

        debug!("msp432p401r: parking primary clocks on REFO");
        for clock in [
            PrimaryClock::Master,
            PrimaryClock::SubsystemMaster,
            PrimaryClock::Auxiliary,
            PrimaryClock::Backup,
        ] {
            self.cs.set_source(clock, Oscillator::Reference);
        }
        for clock in [
            PrimaryClock::Master,
            PrimaryClock::SubsystemMaster,
            PrimaryClock::LowSpeedSubsystemMaster,
            PrimaryClock::Auxiliary,
            PrimaryClock::Backup,
        ] {
            self.wait_for_clock(clock)?;
        }

        self.cs.disable_crystals();

        let external = config.external;
        if external.low_frequency.to_Hz() != 0 {
            debug!("msp432p401r: starting LFXT at {}Hz", external.low_frequency.to_Hz());
            self.cs.enable_low_frequency_crystal(external.bypass);
            self.wait_for_crystal(Crystal::LowFrequency)?;
        }
        if external.high_frequency.to_Hz() != 0 {
            debug!("msp432p401r: starting HFXT at {}Hz", external.high_frequency.to_Hz());
            self.cs.enable_high_frequency_crystal(
                clocks::hfxt_frequency_range(external.high_frequency),
                external.bypass,
            );
            self.wait_for_crystal(Crystal::HighFrequency)?;
        }

        if let Some(settings) = dco {
            debug!(
                "msp432p401r: DCO range {} tune {} for {}Hz",
                settings.range_select,
                settings.tuning,
                settings.frequency.to_Hz()
            );
            self.cs.configure_dco(settings.range_select, settings.tuning);
            self.wait_until("DCO", || self.cs.is_dco_on())?;
        } else {
            self.cs.disable_dco();
        }
        self.cs
            .set_reference_frequency(u32::from(config.reference.frequency_select));

        // Still running from REFO, so both only ever need to cover the target
        if mode == ActiveMode::LdoVcore1 {
            debug!("msp432p401r: raising core voltage");
            self.pcm.request_active_mode(mode);
            self.wait_until("core voltage", || self.pcm.is_in_mode(mode))?;
        }
        self.flctl.set_waitstates(WaitStates::for_frequency(mclk));

        for (clock, divider) in [
            (PrimaryClock::Auxiliary, config.auxiliary.divider),
            (PrimaryClock::Master, config.master.divider),
            (PrimaryClock::SubsystemMaster, config.subsystem_master.divider),
            (
                PrimaryClock::LowSpeedSubsystemMaster,
                config.subsystem_master.low_speed_divider,
            ),
        ] {
            self.cs.set_divider(clock, divider);
            self.wait_for_clock(clock)?;
        }

        self.cs
            .set_source(PrimaryClock::Auxiliary, config.auxiliary.clock_source);
        self.wait_for_clock(PrimaryClock::Auxiliary)?;
        self.cs
            .set_source(PrimaryClock::Master, config.master.clock_source);
        self.wait_for_clock(PrimaryClock::Master)?;
        self.cs.set_source(
            PrimaryClock::SubsystemMaster,
            config.subsystem_master.clock_source,
        );
        self.wait_for_clock(PrimaryClock::SubsystemMaster)?;
        self.wait_for_clock(PrimaryClock::LowSpeedSubsystemMaster)?;
        debug!(
            "msp432p401r: MCLK {:?} at {}Hz",
            config.master.clock_source,
            mclk.to_Hz()
        );

        self.cs
            .set_source(PrimaryClock::Backup, config.backup.clock_source);
        self.wait_for_clock(PrimaryClock::Backup)?;

        self.rates.set(rates);
        Ok(())
    }

    fn clock_configuration(&self) -> &'a ClockConfiguration {
        self.config
    }

    fn get_clock_rate(&self, peripheral: PeripheralId) -> HertzU32 {
        match peripherals::clock_of(peripheral) {
            Some(clock) => self.rates.get().get(clock as usize),
            None => HertzU32::from_raw(0),
        }
    }

    fn is_peripheral_powered_up(&self, _peripheral: PeripheralId) -> bool {
        false
    }

    fn power_up_peripheral(&self, peripheral: PeripheralId) -> Result<(), ErrorCode> {
        peripherals::clock_of(peripheral).ok_or(ErrorCode::INVAL)?;
        Err(ErrorCode::NOSUPPORT)
    }

    fn power_down_peripheral(&self, peripheral: PeripheralId) -> Result<(), ErrorCode> {
        peripherals::clock_of(peripheral).ok_or(ErrorCode::INVAL)?;
        Err(ErrorCode::NOSUPPORT)
    }
}

impl<B: RegisterBank> SystemController<'_, B> {
    /// Rate of a clock by name rather than identity.
    pub fn get_rate(&self, clock: Clock) -> HertzU32 {
        self.rates.get().get(clock as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClockDivider;
    use crate::peripherals::*;
    use kernel::hil::system_controller::SystemController as _;
    use kernel::utilities::fake_registers::{FakeRegisterBank, RecordedWrite};
    use std::vec::Vec;

    type Bank = FakeRegisterBank<32>;

    const CSKEY: usize = 0x00;
    const CSCTL0: usize = 0x04;
    const CSCTL1: usize = 0x08;
    const CSCTL2: usize = 0x0C;
    const CSSTAT: usize = 0x34;
    const CSIFG: usize = 0x48;
    const CSCLRIFG: usize = 0x50;

    const DCOEN: u32 = 1 << 23;
    const LFXT_EN: u32 = 1 << 8;
    const HFXT_EN: u32 = 1 << 24;
    const LFXTIFG: u32 = 1 << 0;
    const HFXTIFG: u32 = 1 << 1;
    const DCO_ON: u32 = 1 << 0;
    const ALL_READY: u32 = 0b11111 << 24;

    // Crystals report a fault at start-up that clears on the first request,
    // the DCO turns on with DCOEN and every primary clock settles at once.
    fn cs_model(bank: &Bank, offset: usize, value: u32) {
        match offset {
            CSCTL0 if value & DCOEN != 0 => bank.poke(CSSTAT, bank.peek(CSSTAT) | DCO_ON),
            CSCTL1 => bank.poke(CSSTAT, bank.peek(CSSTAT) | ALL_READY),
            CSCTL2 => {
                let mut ifg = bank.peek(CSIFG);
                if value & LFXT_EN != 0 {
                    ifg |= LFXTIFG;
                }
                if value & HFXT_EN != 0 {
                    ifg |= HFXTIFG;
                }
                bank.poke(CSIFG, ifg);
            }
            CSCLRIFG => bank.poke(CSIFG, bank.peek(CSIFG) & !value),
            _ => {}
        }
    }

    // An HFXT that never stops faulting.
    fn cs_model_dead_hfxt(bank: &Bank, offset: usize, value: u32) {
        cs_model(bank, offset, value);
        if bank.peek(CSCTL2) & HFXT_EN != 0 {
            bank.poke(CSIFG, bank.peek(CSIFG) | HFXTIFG);
        }
    }

    // CPM follows AMR at once.
    fn pcm_model(bank: &Bank, offset: usize, value: u32) {
        if offset == 0x00 {
            let amr = value & 0xF;
            bank.poke(0x00, amr | (amr << 8));
        }
    }

    struct Board {
        cs: Bank,
        tlv: Bank,
        flctl: Bank,
        pcm: Bank,
    }

    impl Board {
        fn with_cs_model(model: fn(&Bank, usize, u32)) -> Board {
            let tlv = Bank::new();
            // K = 1/1024 with FCAL at its nominal point
            tlv.poke(0x4C, 768);
            tlv.poke(0x50, 768);
            tlv.poke(0x64, (1.0f32 / 1024.0).to_bits());
            tlv.poke(0x68, (1.0f32 / 1024.0).to_bits());
            Board {
                cs: Bank::with_hook(model),
                tlv,
                flctl: Bank::new(),
                pcm: Bank::with_hook(pcm_model),
            }
        }

        fn new() -> Board {
            Board::with_cs_model(cs_model)
        }

        fn controller<'a>(&'a self, config: &'a ClockConfiguration) -> SystemController<'a, Bank> {
            SystemController::new(&self.cs, &self.tlv, &self.flctl, &self.pcm, config)
                .with_ready_timeout(16)
        }

        fn total_writes(&self) -> usize {
            self.cs.write_count()
                + self.tlv.write_count()
                + self.flctl.write_count()
                + self.pcm.write_count()
        }
    }

    fn within(actual: HertzU32, target: HertzU32, parts_per_thousand: u32) -> bool {
        let (actual, target) = (actual.to_Hz(), target.to_Hz());
        actual.abs_diff(target) <= target / 1000 * parts_per_thousand
    }

    #[test]
    fn reset_configuration() {
        let board = Board::new();
        let config = ClockConfiguration::reset();
        let controller = board.controller(&config);

        assert_eq!(controller.initialize(), Ok(()));
        assert_eq!(controller.get_clock_rate(MCLK).to_Hz(), 3_000_000);
        assert_eq!(controller.get_clock_rate(HSMCLK).to_Hz(), 3_000_000);
        assert_eq!(controller.get_clock_rate(SMCLK).to_Hz(), 3_000_000);
        assert_eq!(controller.get_clock_rate(ACLK).to_Hz(), 32_768);
        assert_eq!(controller.get_clock_rate(BCLK).to_Hz(), 32_768);
        assert_eq!(controller.get_clock_rate(REFOCLK).to_Hz(), 32_768);
        assert_eq!(controller.get_clock_rate(VLOCLK).to_Hz(), 9_400);
        assert_eq!(controller.get_clock_rate(MODCLK).to_Hz(), 25_000_000);
        assert_eq!(controller.get_clock_rate(SYSCLK).to_Hz(), 5_000_000);
        assert_eq!(controller.get_clock_rate(DCOCLK).to_Hz(), 3_000_000);
        assert_eq!(controller.get_clock_rate(LFXTCLK).to_Hz(), 0);
        assert_eq!(controller.get_clock_rate(HFXTCLK).to_Hz(), 0);

        let ctl1 = board.cs.peek(CSCTL1);
        assert_eq!(ctl1 & 0b111, 0b011, "MCLK on DCO");
        assert_eq!((ctl1 >> 8) & 0b111, 0b010, "ACLK on REFO");
        assert_eq!((ctl1 >> 12) & 1, 1, "BCLK on REFO");
        assert_eq!(board.pcm.write_count(), 0);
    }

    #[test]
    fn dco_at_24mhz() {
        let board = Board::new();
        let mut config = ClockConfiguration::reset();
        config.dco.frequency = HertzU32::MHz(24);
        config.subsystem_master.low_speed_divider = ClockDivider::DivideBy2;
        let controller = board.controller(&config);

        assert_eq!(controller.initialize(), Ok(()));
        assert!(within(controller.get_clock_rate(MCLK), HertzU32::MHz(24), 1));
        assert_eq!(
            controller.get_clock_rate(MCLK),
            controller.get_clock_rate(DCOCLK)
        );
        assert_eq!(controller.get_clock_rate(SMCLK).to_Hz(), 12_000_000);
        assert_eq!((board.cs.peek(CSCTL0) >> 16) & 0b111, 4);
        assert_eq!(board.pcm.write_count(), 0, "24MHz with 12MHz SMCLK runs at VCORE0");
        assert_eq!((board.flctl.peek(0x10) >> 12) & 0xF, 1);
        assert_eq!((board.flctl.peek(0x14) >> 12) & 0xF, 1);
    }

    #[test]
    fn fast_smclk_raises_core_voltage() {
        let board = Board::new();
        let mut config = ClockConfiguration::reset();
        config.dco.frequency = HertzU32::MHz(20);
        let controller = board.controller(&config);

        assert_eq!(controller.initialize(), Ok(()));
        assert!(controller.get_clock_rate(SMCLK).to_Hz() > 12_000_000);
        let requests: Vec<u32> = board.pcm.writes_to(0x00).collect();
        assert_eq!(requests, [(0x695A << 16) | 1]);
    }

    #[test]
    fn fast_hsmclk_raises_core_voltage() {
        let board = Board::new();
        let mut config = ClockConfiguration::reset();
        config.external.high_frequency = HertzU32::MHz(48);
        config.subsystem_master.clock_source = Oscillator::HighFrequency;
        config.subsystem_master.low_speed_divider = ClockDivider::DivideBy4;
        let controller = board.controller(&config);

        assert_eq!(controller.initialize(), Ok(()));
        assert_eq!(controller.get_clock_rate(MCLK).to_Hz(), 3_000_000);
        assert_eq!(controller.get_clock_rate(HSMCLK).to_Hz(), 48_000_000);
        assert_eq!(controller.get_clock_rate(SMCLK).to_Hz(), 12_000_000);

        let requests: Vec<u32> = board.pcm.writes_to(0x00).collect();
        assert_eq!(requests, [(0x695A << 16) | 1]);
        // Flash runs from MCLK
        assert_eq!((board.flctl.peek(0x10) >> 12) & 0xF, 0);
    }

    #[test]
    fn disabled_dco_is_switched_off() {
        let board = Board::new();
        let config = ClockConfiguration::reset();
        assert_eq!(board.controller(&config).initialize(), Ok(()));
        assert_ne!(board.cs.peek(CSCTL0) & DCOEN, 0);

        let mut config = ClockConfiguration::reset();
        config.dco.enabled = false;
        config.master.clock_source = Oscillator::Module;
        config.subsystem_master.clock_source = Oscillator::Reference;
        let controller = board.controller(&config);

        assert_eq!(controller.initialize(), Ok(()));
        assert_eq!(board.cs.peek(CSCTL0) & DCOEN, 0);
        assert_eq!(controller.get_clock_rate(DCOCLK).to_Hz(), 0);
        assert_eq!(controller.get_clock_rate(MCLK).to_Hz(), 25_000_000);
    }

    #[test]
    fn dco_at_40mhz_raises_core_voltage() {
        let board = Board::new();
        let mut config = ClockConfiguration::reset();
        config.dco.frequency = HertzU32::MHz(40);
        config.subsystem_master.low_speed_divider = ClockDivider::DivideBy2;
        let controller = board.controller(&config);

        assert_eq!(controller.initialize(), Ok(()));
        let mclk = controller.get_clock_rate(MCLK);
        assert!(within(mclk, HertzU32::MHz(40), 1));
        assert_eq!(controller.get_clock_rate(SMCLK).to_Hz(), mclk.to_Hz() / 2);

        let requests: Vec<u32> = board.pcm.writes_to(0x00).collect();
        assert_eq!(requests, [(0x695A << 16) | 1]);
        assert_eq!((board.flctl.peek(0x10) >> 12) & 0xF, 1);
    }

    #[test]
    fn every_cs_mutation_is_bracketed_by_the_key() {
        let board = Board::new();
        let mut config = ClockConfiguration::reset();
        config.external.low_frequency = HertzU32::Hz(32_768);
        config.external.high_frequency = HertzU32::MHz(48);
        config.master.clock_source = Oscillator::HighFrequency;
        config.subsystem_master.low_speed_divider = ClockDivider::DivideBy2;
        let controller = board.controller(&config);
        assert_eq!(controller.initialize(), Ok(()));

        let journal: Vec<RecordedWrite> = board.cs.journal().collect();
        assert_eq!(journal.len(), board.cs.write_count());
        let unlock = RecordedWrite {
            offset: CSKEY,
            value: 0x695A,
        };
        let lock = RecordedWrite {
            offset: CSKEY,
            value: 0,
        };
        assert_eq!(journal.len() % 3, 0);
        for triple in journal.chunks(3) {
            assert_eq!(triple[0], unlock);
            assert_ne!(triple[1].offset, CSKEY);
            assert_eq!(triple[2], lock);
        }
    }

    #[test]
    fn crystals_drive_the_primary_clocks() {
        let board = Board::new();
        let mut config = ClockConfiguration::reset();
        config.external.low_frequency = HertzU32::Hz(32_768);
        config.external.high_frequency = HertzU32::MHz(48);
        config.master.clock_source = Oscillator::HighFrequency;
        config.auxiliary.clock_source = Oscillator::LowFrequency;
        config.backup.clock_source = Oscillator::LowFrequency;
        config.dco.enabled = false;
        config.subsystem_master.clock_source = Oscillator::Module;
        config.subsystem_master.low_speed_divider = ClockDivider::DivideBy2;
        let controller = board.controller(&config);

        assert_eq!(controller.initialize(), Ok(()));
        assert_eq!(controller.get_clock_rate(MCLK).to_Hz(), 48_000_000);
        assert_eq!(controller.get_clock_rate(HSMCLK).to_Hz(), 25_000_000);
        assert_eq!(controller.get_clock_rate(ACLK).to_Hz(), 32_768);
        assert_eq!(controller.get_clock_rate(BCLK).to_Hz(), 32_768);
        assert_eq!(controller.get_clock_rate(DCOCLK).to_Hz(), 0);
        assert_eq!(controller.get_clock_rate(HFXTCLK).to_Hz(), 48_000_000);

        let ctl1 = board.cs.peek(CSCTL1);
        assert_eq!(ctl1 & 0b111, 0b101);
        assert_eq!((ctl1 >> 4) & 0b111, 0b100);
        assert_eq!((ctl1 >> 8) & 0b111, 0b000);
        assert_eq!((ctl1 >> 12) & 1, 0);
        assert_eq!((board.cs.peek(CSCTL2) >> 20) & 0b111, 6, "HFXTFREQ 40-48MHz");
        assert_eq!(board.cs.peek(CSCTL0) & DCOEN, 0);
        let clears: Vec<u32> = board.cs.writes_to(CSCLRIFG).collect();
        assert_eq!(clears, [LFXTIFG | 1 << 8, HFXTIFG | 1 << 9]);
        assert_eq!(controller.get_clock_rate(SMCLK).to_Hz(), 12_500_000);
    }

    #[test]
    fn dead_crystal_times_out() {
        let board = Board::with_cs_model(cs_model_dead_hfxt);
        let mut config = ClockConfiguration::reset();
        config.external.high_frequency = HertzU32::MHz(48);
        config.master.clock_source = Oscillator::HighFrequency;
        let controller = board.controller(&config);

        assert_eq!(controller.initialize(), Err(ErrorCode::BUSY));
        assert_eq!(board.cs.peek(CSCTL1) & 0b111, 0b010, "MCLK left on REFO");
        assert_eq!(controller.get_clock_rate(MCLK).to_Hz(), 0);
    }

    #[test]
    fn illegal_sources_are_rejected_before_any_write() {
        let board = Board::new();

        let mut config = ClockConfiguration::reset();
        config.auxiliary.clock_source = Oscillator::Module;
        assert_eq!(board.controller(&config).initialize(), Err(ErrorCode::INVAL));

        let mut config = ClockConfiguration::reset();
        config.backup.clock_source = Oscillator::HighFrequency;
        assert_eq!(board.controller(&config).initialize(), Err(ErrorCode::INVAL));

        let mut config = ClockConfiguration::reset();
        config.reference.frequency_select = 3;
        assert_eq!(board.controller(&config).initialize(), Err(ErrorCode::INVAL));

        let mut config = ClockConfiguration::reset();
        config.master.clock_source = Oscillator::LowFrequency;
        assert_eq!(board.controller(&config).initialize(), Err(ErrorCode::FAIL));

        assert_eq!(board.total_writes(), 0);
    }

    #[test]
    fn dco_out_of_range_is_rejected_before_any_write() {
        let board = Board::new();
        let mut config = ClockConfiguration::reset();
        config.dco.frequency = HertzU32::MHz(60);

        assert_eq!(board.controller(&config).initialize(), Err(ErrorCode::SIZE));
        assert_eq!(board.total_writes(), 0);
    }

    #[test]
    fn rates_are_zero_before_initialize_and_stable_after() {
        let board = Board::new();
        let mut config = ClockConfiguration::reset();
        config.dco.frequency = HertzU32::MHz(12);
        let controller = board.controller(&config);

        assert!(PERIPHERALS
            .iter()
            .all(|&(id, _)| controller.get_clock_rate(id).to_Hz() == 0));

        assert_eq!(controller.initialize(), Ok(()));
        let first: Vec<u32> = PERIPHERALS
            .iter()
            .map(|&(id, _)| controller.get_clock_rate(id).to_Hz())
            .collect();
        assert_eq!(controller.initialize(), Ok(()));
        let second: Vec<u32> = PERIPHERALS
            .iter()
            .map(|&(id, _)| controller.get_clock_rate(id).to_Hz())
            .collect();
        assert_eq!(first, second);
        assert_eq!(controller.get_rate(Clock::Master).to_Hz(), first[1]);
    }

    #[test]
    fn no_power_gating() {
        let board = Board::new();
        let config = ClockConfiguration::reset();
        let controller = board.controller(&config);

        assert!(!controller.is_peripheral_powered_up(SMCLK));
        assert_eq!(
            controller.power_up_peripheral(SMCLK),
            Err(ErrorCode::NOSUPPORT)
        );
        assert_eq!(
            controller.power_down_peripheral(SMCLK),
            Err(ErrorCode::NOSUPPORT)
        );
        assert_eq!(board.cs.read_count() + board.cs.write_count(), 0);
    }

    #[test]
    fn identity_past_the_end() {
        let board = Board::new();
        let config = ClockConfiguration::reset();
        let controller = board.controller(&config);
        assert_eq!(controller.initialize(), Ok(()));
        board.cs.clear_journal();

        let past_the_end = PeripheralId::define(CLOCK_COUNT as u32);
        assert_eq!(controller.get_clock_rate(past_the_end).to_Hz(), 0);
        assert!(!controller.is_peripheral_powered_up(past_the_end));
        assert_eq!(
            controller.power_up_peripheral(past_the_end),
            Err(ErrorCode::INVAL)
        );
        assert_eq!(board.cs.read_count() + board.cs.write_count(), 0);
    }
}
