// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Family-tagged system controller.
//!
//! Boards that are built for more than one microcontroller family select
//! the controller at run time. [`Controller`] wraps the controller of each
//! supported family behind the common
//! [`SystemController`](kernel::hil::system_controller::SystemController)
//! interface. Identities and configurations carry the same tag, and an
//! identity of one family handed to the controller of the other is treated
//! like any unknown identity.
//!
//! ```rust,ignore
//! let controller = mcu::Controller::Stm32f10x(stm32f10x::SystemController::new(
//!     &rcc, &flash, &pwr, &CLOCKS,
//! ));
//! fatal_on_error(controller.initialize(), "clocks");
//! let usart = mcu::Peripheral::from(stm32f10x::peripherals::USART1);
//! controller.power_up_peripheral(usart)?;
//! ```

#![no_std]

#[cfg(test)]
#[macro_use]
extern crate std;

use fugit::HertzU32;
use kernel::hil::system_controller::{Family, SystemController};
use kernel::utilities::registers::RegisterBank;
use kernel::ErrorCode;
use log::warn;

pub use msp432p401r;
pub use stm32f10x;

use msp432p401r::peripherals::Msp432p401r;
use stm32f10x::peripherals::Stm32f10x;

/// A peripheral or clock identity tagged with its family.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Peripheral {
    Stm32f10x(stm32f10x::peripherals::PeripheralId),
    Msp432p401r(msp432p401r::peripherals::PeripheralId),
}

impl Peripheral {
    pub fn family(self) -> &'static str {
        match self {
            Peripheral::Stm32f10x(_) => Stm32f10x::NAME,
            Peripheral::Msp432p401r(_) => Msp432p401r::NAME,
        }
    }
}

impl From<stm32f10x::peripherals::PeripheralId> for Peripheral {
    fn from(id: stm32f10x::peripherals::PeripheralId) -> Self {
        Peripheral::Stm32f10x(id)
    }
}

impl From<msp432p401r::peripherals::PeripheralId> for Peripheral {
    fn from(id: msp432p401r::peripherals::PeripheralId) -> Self {
        Peripheral::Msp432p401r(id)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Configuration<'a> {
    Stm32f10x(&'a stm32f10x::config::ClockConfiguration),
    Msp432p401r(&'a msp432p401r::config::ClockConfiguration),
}

pub enum Controller<'a, B: RegisterBank> {
    Stm32f10x(stm32f10x::SystemController<'a, B>),
    Msp432p401r(msp432p401r::SystemController<'a, B>),
}

impl<B: RegisterBank> Controller<'_, B> {
    pub fn family(&self) -> &'static str {
        match self {
            Controller::Stm32f10x(_) => Stm32f10x::NAME,
            Controller::Msp432p401r(_) => Msp432p401r::NAME,
        }
    }

    fn reject(&self, peripheral: Peripheral) -> ErrorCode {
        warn!(
            "{}: ignoring {} identity {:?}",
            self.family(),
            peripheral.family(),
            peripheral
        );
        ErrorCode::INVAL
    }
}

impl<'a, B: RegisterBank> SystemController for Controller<'a, B> {
    type Peripheral = Peripheral;
    type Configuration = Configuration<'a>;

    fn initialize(&self) -> Result<(), ErrorCode> {
        match self {
            Controller::Stm32f10x(controller) => controller.initialize(),
            Controller::Msp432p401r(controller) => controller.initialize(),
        }
    }

    fn clock_configuration(&self) -> Configuration<'a> {
        match self {
            Controller::Stm32f10x(controller) => {
                Configuration::Stm32f10x(controller.clock_configuration())
            }
            Controller::Msp432p401r(controller) => {
                Configuration::Msp432p401r(controller.clock_configuration())
            }
        }
    }

    fn get_clock_rate(&self, peripheral: Peripheral) -> HertzU32 {
        match (self, peripheral) {
            (Controller::Stm32f10x(controller), Peripheral::Stm32f10x(id)) => {
                controller.get_clock_rate(id)
            }
            (Controller::Msp432p401r(controller), Peripheral::Msp432p401r(id)) => {
                controller.get_clock_rate(id)
            }
            _ => HertzU32::from_raw(0),
        }
    }

    fn is_peripheral_powered_up(&self, peripheral: Peripheral) -> bool {
        match (self, peripheral) {
            (Controller::Stm32f10x(controller), Peripheral::Stm32f10x(id)) => {
                controller.is_peripheral_powered_up(id)
            }
            (Controller::Msp432p401r(controller), Peripheral::Msp432p401r(id)) => {
                controller.is_peripheral_powered_up(id)
            }
            _ => false,
        }
    }

    fn power_up_peripheral(&self, peripheral: Peripheral) -> Result<(), ErrorCode> {
        match (self, peripheral) {
            (Controller::Stm32f10x(controller), Peripheral::Stm32f10x(id)) => {
                controller.power_up_peripheral(id)
            }
            (Controller::Msp432p401r(controller), Peripheral::Msp432p401r(id)) => {
                controller.power_up_peripheral(id)
            }
            _ => Err(self.reject(peripheral)),
        }
    }

    fn power_down_peripheral(&self, peripheral: Peripheral) -> Result<(), ErrorCode> {
        match (self, peripheral) {
            (Controller::Stm32f10x(controller), Peripheral::Stm32f10x(id)) => {
                controller.power_down_peripheral(id)
            }
            (Controller::Msp432p401r(controller), Peripheral::Msp432p401r(id)) => {
                controller.power_down_peripheral(id)
            }
            _ => Err(self.reject(peripheral)),
        }
    }
}
