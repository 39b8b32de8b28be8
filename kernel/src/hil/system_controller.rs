// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Interface for system clock controllers.
//!
//! A system controller owns the clock tree of a microcontroller. Firmware
//! hands it a static clock configuration once at boot, after which any
//! driver can ask for the frequency feeding a peripheral and switch that
//! peripheral's clock gate on or off.
//!
//! Peripherals are named by a [`PeripheralId`]: a dense small integer whose
//! `device_id / 32` selects an enable-register group and whose
//! `device_id % 32` selects the bit within it. Identities carry their chip
//! family as a type parameter, so an identity of one family cannot be
//! passed to the controller of another.
//!
//! ```rust,ignore
//! use kernel::hil::system_controller::SystemController;
//!
//! fatal_on_error(controller.initialize(), "clocks");
//! let uart_hz = controller.get_clock_rate(stm32f10x::peripherals::USART1);
//! controller.power_up_peripheral(stm32f10x::peripherals::USART1)?;
//! ```

use core::fmt;
use core::marker::PhantomData;

use fugit::HertzU32;

use crate::utilities::registers::RegisterBank;
use crate::ErrorCode;

/// Number of identities in one enable-register group.
pub const GROUP_WIDTH: u32 = 32;

/// Marker trait for a chip family.
pub trait Family: Copy + fmt::Debug + PartialEq + Eq + 'static {
    /// Short family name used in log records.
    const NAME: &'static str;
}

/// Identity of a peripheral or clock domain within the family `F`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PeripheralId<F: Family> {
    device_id: u32,
    family: PhantomData<F>,
}

impl<F: Family> PeripheralId<F> {
    /// Name the identity `device_id`. Only chip crates should call this when
    /// building their identity tables.
    pub const fn define(device_id: u32) -> PeripheralId<F> {
        PeripheralId {
            device_id,
            family: PhantomData,
        }
    }

    pub const fn device_id(self) -> u32 {
        self.device_id
    }

    /// Enable-register group this identity belongs to.
    pub const fn group(self) -> usize {
        (self.device_id / GROUP_WIDTH) as usize
    }

    /// Bit position inside the group's enable register.
    pub const fn bit(self) -> u32 {
        self.device_id % GROUP_WIDTH
    }
}

impl<F: Family> fmt::Display for PeripheralId<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", F::NAME, self.device_id)
    }
}

/// Frequencies of every clock domain, indexed by domain number.
///
/// Domains that are not running read as zero.
#[derive(Clone, Copy, Debug)]
pub struct RateTable<const N: usize> {
    rates: [HertzU32; N],
}

impl<const N: usize> RateTable<N> {
    pub const fn new() -> RateTable<N> {
        RateTable {
            rates: [HertzU32::from_raw(0); N],
        }
    }

    /// Frequency of `domain`, zero for a domain outside the table.
    pub fn get(&self, domain: usize) -> HertzU32 {
        self.rates
            .get(domain)
            .copied()
            .unwrap_or(HertzU32::from_raw(0))
    }

    pub fn set(&mut self, domain: usize, rate: HertzU32) {
        if let Some(slot) = self.rates.get_mut(domain) {
            *slot = rate;
        }
    }
}

/// Peripheral clock gates laid out as one enable register per group.
///
/// The caller is responsible for rejecting identities the chip does not
/// list; this only maps a group onto its register and a bit onto its mask.
pub struct PowerGates<'a, B: RegisterBank, const GROUPS: usize> {
    registers: &'a B,
    enable_offsets: [usize; GROUPS],
}

impl<'a, B: RegisterBank, const GROUPS: usize> PowerGates<'a, B, GROUPS> {
    /// `enable_offsets[g]` is the byte offset of group `g`'s enable register.
    pub const fn new(registers: &'a B, enable_offsets: [usize; GROUPS]) -> Self {
        PowerGates {
            registers,
            enable_offsets,
        }
    }

    fn locate<F: Family>(&self, id: PeripheralId<F>) -> Option<(usize, u32)> {
        self.enable_offsets
            .get(id.group())
            .map(|&offset| (offset, 1 << id.bit()))
    }

    pub fn is_enabled<F: Family>(&self, id: PeripheralId<F>) -> bool {
        match self.locate(id) {
            Some((offset, mask)) => self.registers.read_word(offset) & mask != 0,
            None => false,
        }
    }

    pub fn enable<F: Family>(&self, id: PeripheralId<F>) -> Result<(), ErrorCode> {
        let (offset, mask) = self.locate(id).ok_or(ErrorCode::INVAL)?;
        let word = self.registers.read_word(offset);
        self.registers.write_word(offset, word | mask);
        Ok(())
    }

    pub fn disable<F: Family>(&self, id: PeripheralId<F>) -> Result<(), ErrorCode> {
        let (offset, mask) = self.locate(id).ok_or(ErrorCode::INVAL)?;
        let word = self.registers.read_word(offset);
        self.registers.write_word(offset, word & !mask);
        Ok(())
    }
}

/// A chip's system clock controller.
///
/// The controller is constructed with a reference to a static clock
/// configuration and a register bank, then [`initialize`] is called exactly
/// once. After that the rate and power-gating queries may be called from any
/// driver; they never fail for a valid identity.
///
/// [`initialize`]: SystemController::initialize
pub trait SystemController {
    /// Identity type accepted by this controller.
    type Peripheral: Copy;
    /// Configuration type this controller applies, usually a reference.
    type Configuration: Copy;

    /// Bring the clock tree from reset state into the configured state.
    ///
    /// Every configuration problem is detected before any register is
    /// written. Hardware that does not settle in time yields
    /// `Err(ErrorCode::BUSY)`; the partially applied state is then
    /// unspecified.
    fn initialize(&self) -> Result<(), ErrorCode>;

    /// The configuration handed over at construction.
    fn clock_configuration(&self) -> Self::Configuration;

    /// Frequency driving `peripheral`, zero for an unknown identity or a
    /// domain whose source is off.
    fn get_clock_rate(&self, peripheral: Self::Peripheral) -> HertzU32;

    /// Whether `peripheral`'s clock gate is open. Unknown identities and
    /// identities without a gate read `false`.
    fn is_peripheral_powered_up(&self, peripheral: Self::Peripheral) -> bool;

    /// Open `peripheral`'s clock gate.
    ///
    /// Returns `Err(ErrorCode::INVAL)` for an identity without a gate and
    /// `Err(ErrorCode::NOSUPPORT)` on chips with no gating at all.
    fn power_up_peripheral(&self, peripheral: Self::Peripheral) -> Result<(), ErrorCode>;

    /// Close `peripheral`'s clock gate. Errors as for `power_up_peripheral`.
    fn power_down_peripheral(&self, peripheral: Self::Peripheral) -> Result<(), ErrorCode>;
}
