// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! STM32F10x system controller.
//!
//! Brings the RCC from its reset state to a [`ClockConfiguration`] and then
//! answers clock-rate and clock-gating queries for the other drivers.
//!
//! # Usage
//!
//! ```rust,ignore
//! static CLOCKS: ClockConfiguration = ClockConfiguration::reset();
//!
//! let rcc = unsafe { MmioRegisterBank::new(stm32f10x::rcc::RCC_BASE) };
//! let flash = unsafe { MmioRegisterBank::new(stm32f10x::flash::FLASH_BASE) };
//! let pwr = unsafe { MmioRegisterBank::new(stm32f10x::pwr::PWR_BASE) };
//!
//! let controller = SystemController::new(&rcc, &flash, &pwr, &CLOCKS);
//! fatal_on_error(controller.initialize(), "clock tree");
//!
//! controller.power_up_peripheral(peripherals::USART1)?;
//! let baud_clock = controller.get_clock_rate(peripherals::USART1);
//! ```
//!
//! # Sequence
//!
//! `initialize` checks the whole configuration with [`clocks::validate`]
//! before it writes anything. It then parks SYSCLK on the HSI, opens and
//! resets the backup domain, restarts the requested oscillators and the PLL,
//! raises the flash latency for the target frequency, programs the
//! prescalers, switches SYSCLK and finally selects the RTC clock.

use core::cell::Cell;

use fugit::HertzU32;
use kernel::config::CONFIG;
use kernel::hil::system_controller::{self, PowerGates, RateTable};
use kernel::utilities::polling::poll_until;
use kernel::utilities::registers::RegisterBank;
use kernel::ErrorCode;
use log::{debug, warn};

use crate::clocks;
use crate::config::{ClockConfiguration, RtcSource, SystemClockSelect};
use crate::flash::{Flash, FlashLatency};
use crate::peripherals::{self, Domain, PeripheralId, DOMAIN_COUNT, GATED_GROUPS};
use crate::pwr::Pwr;
use crate::rcc::{self, Rcc};

pub struct SystemController<'a, B: RegisterBank> {
    rcc: Rcc<'a, B>,
    flash: Flash<'a, B>,
    pwr: Pwr<'a, B>,
    power_gates: PowerGates<'a, B, GATED_GROUPS>,
    config: &'a ClockConfiguration,
    rates: Cell<RateTable<DOMAIN_COUNT>>,
    ready_poll_limit: u32,
}

impl<'a, B: RegisterBank> SystemController<'a, B> {
    pub fn new(
        rcc: &'a B,
        flash: &'a B,
        pwr: &'a B,
        config: &'a ClockConfiguration,
    ) -> SystemController<'a, B> {
        SystemController {
            rcc: Rcc::new(rcc),
            flash: Flash::new(flash),
            pwr: Pwr::new(pwr),
            power_gates: PowerGates::new(rcc, rcc::ENABLE_REGISTERS),
            config,
            rates: Cell::new(RateTable::new()),
            ready_poll_limit: CONFIG.ready_poll_limit,
        }
    }

    /// Give up on a ready flag after `polls` status reads instead of the
    /// kernel-wide default.
    pub fn with_ready_timeout(mut self, polls: u32) -> SystemController<'a, B> {
        self.ready_poll_limit = polls;
        self
    }

    /// Frequency of a whole clock domain.
    pub fn get_domain_rate(&self, domain: Domain) -> HertzU32 {
        self.rates.get().get(domain as usize)
    }

    fn wait_until<F: FnMut() -> bool>(&self, what: &str, ready: F) -> Result<(), ErrorCode> {
        poll_until(self.ready_poll_limit, ready).map_err(|code| {
            warn!("stm32f10x: {} not ready after {} polls", what, self.ready_poll_limit);
            code
        })
    }

    fn switch_sys_clock(&self, source: SystemClockSelect) -> Result<(), ErrorCode> {
        self.rcc.set_sys_clock_source(source);
        self.wait_until("system clock switch", || {
            self.rcc.get_sys_clock_status() == source as u32
        })
    }
}

impl<'a, B: RegisterBank> system_controller::SystemController for SystemController<'a, B> {
    type Peripheral = PeripheralId;
    type Configuration = &'a ClockConfiguration;

    fn initialize(&self) -> Result<(), ErrorCode> {
        let config = self.config;

        clocks::validate(config)?;
        let rates = clocks::derive_rates(config);
        let sys_clock = clocks::system_clock_rate(config);

        debug!("stm32f10x: parking system clock on HSI");
        self.switch_sys_clock(SystemClockSelect::HighSpeedInternal)?;
        self.rcc.enable_backup_interface_clocks();
        self.pwr.enable_backup_domain_access();
        self.wait_until("backup domain access", || self.pwr.is_backup_domain_writable())?;
        self.rcc.reset_backup_domain();

        debug!("stm32f10x: stopping PLL and HSE");
        self.rcc.disable_pll_clock();
        self.rcc.disable_hse_clock();

        if config.high_speed_external.to_Hz() != 0 {
            debug!("stm32f10x: starting HSE at {}Hz", config.high_speed_external.to_Hz());
            self.rcc.enable_hse_clock();
            self.wait_until("HSE", || self.rcc.is_ready_hse_clock())?;
        }
        if config.low_speed_external.to_Hz() != 0 {
            debug!("stm32f10x: starting LSE at {}Hz", config.low_speed_external.to_Hz());
            self.rcc.enable_lse_clock();
            self.wait_until("LSE", || self.rcc.is_ready_lse_clock())?;
        }
        if config.rtc.enable && config.rtc.source == RtcSource::LowSpeedInternal {
            self.rcc.enable_lsi_clock();
            self.wait_until("LSI", || self.rcc.is_ready_lsi_clock())?;
        }

        self.rcc.set_pll_source(config.pll.source);
        if config.pll.enable {
            debug!(
                "stm32f10x: locking PLL at {}Hz",
                rates.get(Domain::Pll as usize).to_Hz()
            );
            self.rcc.set_pll_multiplier(config.pll.multiply);
            self.rcc.enable_pll_clock();
            self.wait_until("PLL", || self.rcc.is_locked_pll_clock())?;
        }

        // Latency for the target frequency is also enough for the HSI
        self.flash.set_latency(FlashLatency::for_frequency(sys_clock));

        self.rcc.set_usb_prescaler(config.pll.usb.divider);
        self.rcc.set_ahb_prescaler(config.ahb.divider);
        self.rcc.set_apb1_prescaler(config.ahb.apb1.divider);
        self.rcc.set_apb2_prescaler(config.ahb.apb2.divider);
        self.rcc.set_adc_prescaler(config.ahb.apb2.adc.divider);
        self.rcc.set_mco_source(config.mco);

        debug!(
            "stm32f10x: system clock {:?} at {}Hz",
            config.system_clock,
            sys_clock.to_Hz()
        );
        self.switch_sys_clock(config.system_clock)?;

        self.rcc.set_rtc_clock_source(config.rtc.source);
        self.rcc.set_rtc_enabled(config.rtc.enable);

        self.rates.set(rates);
        Ok(())
    }

    fn clock_configuration(&self) -> &'a ClockConfiguration {
        self.config
    }

    fn get_clock_rate(&self, peripheral: PeripheralId) -> HertzU32 {
        match peripherals::domain_of(peripheral) {
            Some(domain) => self.get_domain_rate(domain),
            None => HertzU32::from_raw(0),
        }
    }

    fn is_peripheral_powered_up(&self, peripheral: PeripheralId) -> bool {
        peripherals::is_gated(peripheral) && self.power_gates.is_enabled(peripheral)
    }

    fn power_up_peripheral(&self, peripheral: PeripheralId) -> Result<(), ErrorCode> {
        if !peripherals::is_gated(peripheral) {
            return Err(ErrorCode::INVAL);
        }
        self.power_gates.enable(peripheral)
    }

    fn power_down_peripheral(&self, peripheral: PeripheralId) -> Result<(), ErrorCode> {
        if !peripherals::is_gated(peripheral) {
            return Err(ErrorCode::INVAL);
        }
        self.power_gates.disable(peripheral)
    }
}
