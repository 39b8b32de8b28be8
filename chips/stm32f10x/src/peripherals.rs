// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Peripheral identities of the STM32F10x.
//!
//! The identity of a peripheral is its enable-bit position offset by 32 for
//! every enable register before it:
//!
//! | Group | Register | Identities |
//! |-------|----------|------------|
//! | 0     | AHBENR   | 0..=31     |
//! | 1     | APB1ENR  | 32..=63    |
//! | 2     | APB2ENR  | 64..=95    |
//! | 3     | none     | 96..       |
//!
//! Group 3 holds clock consumers that sit beyond any bus and cannot be gated.

use kernel::hil::system_controller::{self, Family};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stm32f10x {}

impl Family for Stm32f10x {
    const NAME: &'static str = "stm32f10x";
}

pub type PeripheralId = system_controller::PeripheralId<Stm32f10x>;

const AHB: u32 = 0;
const APB1: u32 = 32;
const APB2: u32 = 64;
const BEYOND: u32 = 96;

/// Number of gated identity groups.
pub const GATED_GROUPS: usize = 3;

// AHB
pub const DMA1: PeripheralId = PeripheralId::define(AHB + 0);
pub const DMA2: PeripheralId = PeripheralId::define(AHB + 1);
pub const SRAM: PeripheralId = PeripheralId::define(AHB + 2);
pub const FLITF: PeripheralId = PeripheralId::define(AHB + 4);
pub const CRC: PeripheralId = PeripheralId::define(AHB + 6);
pub const FSMC: PeripheralId = PeripheralId::define(AHB + 8);
pub const SDIO: PeripheralId = PeripheralId::define(AHB + 10);

// APB1
pub const TIM2: PeripheralId = PeripheralId::define(APB1 + 0);
pub const TIM3: PeripheralId = PeripheralId::define(APB1 + 1);
pub const TIM4: PeripheralId = PeripheralId::define(APB1 + 2);
pub const TIM5: PeripheralId = PeripheralId::define(APB1 + 3);
pub const TIM6: PeripheralId = PeripheralId::define(APB1 + 4);
pub const TIM7: PeripheralId = PeripheralId::define(APB1 + 5);
pub const TIM12: PeripheralId = PeripheralId::define(APB1 + 6);
pub const TIM13: PeripheralId = PeripheralId::define(APB1 + 7);
pub const TIM14: PeripheralId = PeripheralId::define(APB1 + 8);
pub const WWDG: PeripheralId = PeripheralId::define(APB1 + 11);
pub const SPI2: PeripheralId = PeripheralId::define(APB1 + 14);
pub const SPI3: PeripheralId = PeripheralId::define(APB1 + 15);
pub const USART2: PeripheralId = PeripheralId::define(APB1 + 17);
pub const USART3: PeripheralId = PeripheralId::define(APB1 + 18);
pub const UART4: PeripheralId = PeripheralId::define(APB1 + 19);
pub const UART5: PeripheralId = PeripheralId::define(APB1 + 20);
pub const I2C1: PeripheralId = PeripheralId::define(APB1 + 21);
pub const I2C2: PeripheralId = PeripheralId::define(APB1 + 22);
pub const USB: PeripheralId = PeripheralId::define(APB1 + 23);
pub const CAN1: PeripheralId = PeripheralId::define(APB1 + 25);
pub const BKP: PeripheralId = PeripheralId::define(APB1 + 27);
pub const PWR: PeripheralId = PeripheralId::define(APB1 + 28);
pub const DAC: PeripheralId = PeripheralId::define(APB1 + 29);

// APB2
pub const AFIO: PeripheralId = PeripheralId::define(APB2 + 0);
pub const GPIOA: PeripheralId = PeripheralId::define(APB2 + 2);
pub const GPIOB: PeripheralId = PeripheralId::define(APB2 + 3);
pub const GPIOC: PeripheralId = PeripheralId::define(APB2 + 4);
pub const GPIOD: PeripheralId = PeripheralId::define(APB2 + 5);
pub const GPIOE: PeripheralId = PeripheralId::define(APB2 + 6);
pub const GPIOF: PeripheralId = PeripheralId::define(APB2 + 7);
pub const GPIOG: PeripheralId = PeripheralId::define(APB2 + 8);
pub const ADC1: PeripheralId = PeripheralId::define(APB2 + 9);
pub const ADC2: PeripheralId = PeripheralId::define(APB2 + 10);
pub const TIM1: PeripheralId = PeripheralId::define(APB2 + 11);
pub const SPI1: PeripheralId = PeripheralId::define(APB2 + 12);
pub const TIM8: PeripheralId = PeripheralId::define(APB2 + 13);
pub const USART1: PeripheralId = PeripheralId::define(APB2 + 14);
pub const ADC3: PeripheralId = PeripheralId::define(APB2 + 15);
pub const TIM9: PeripheralId = PeripheralId::define(APB2 + 19);
pub const TIM10: PeripheralId = PeripheralId::define(APB2 + 20);
pub const TIM11: PeripheralId = PeripheralId::define(APB2 + 21);

// Beyond any bus
pub const CPU: PeripheralId = PeripheralId::define(BEYOND + 0);
pub const SYSTICK: PeripheralId = PeripheralId::define(BEYOND + 1);
pub const I2S: PeripheralId = PeripheralId::define(BEYOND + 2);
pub const RTC: PeripheralId = PeripheralId::define(BEYOND + 3);
pub const IWDG: PeripheralId = PeripheralId::define(BEYOND + 4);

/// Clock domains of the STM32F10x tree. The discriminant indexes the
/// controller's rate table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Domain {
    /// HCLK: AHB bus, core and SysTick
    Ahb,
    /// PCLK1
    Apb1,
    /// PCLK2
    Apb2,
    /// TIMXCLK for the APB1 timers
    Apb1Timers,
    /// TIMXCLK for the APB2 timers
    Apb2Timers,
    Adc,
    Usb,
    Pll,
    Rtc,
    /// Flash programming interface, always on HSI
    FlashInterface,
    /// Independent watchdog, always on LSI
    Watchdog,
}

pub const DOMAIN_COUNT: usize = 11;

/// Every valid identity with the domain clocking it.
pub const PERIPHERALS: [(PeripheralId, Domain); 53] = [
    (DMA1, Domain::Ahb),
    (DMA2, Domain::Ahb),
    (SRAM, Domain::Ahb),
    (FLITF, Domain::FlashInterface),
    (CRC, Domain::Ahb),
    (FSMC, Domain::Ahb),
    (SDIO, Domain::Ahb),
    (TIM2, Domain::Apb1Timers),
    (TIM3, Domain::Apb1Timers),
    (TIM4, Domain::Apb1Timers),
    (TIM5, Domain::Apb1Timers),
    (TIM6, Domain::Apb1Timers),
    (TIM7, Domain::Apb1Timers),
    (TIM12, Domain::Apb1Timers),
    (TIM13, Domain::Apb1Timers),
    (TIM14, Domain::Apb1Timers),
    (WWDG, Domain::Apb1),
    (SPI2, Domain::Apb1),
    (SPI3, Domain::Apb1),
    (USART2, Domain::Apb1),
    (USART3, Domain::Apb1),
    (UART4, Domain::Apb1),
    (UART5, Domain::Apb1),
    (I2C1, Domain::Apb1),
    (I2C2, Domain::Apb1),
    (USB, Domain::Usb),
    (CAN1, Domain::Apb1),
    (BKP, Domain::Apb1),
    (PWR, Domain::Apb1),
    (DAC, Domain::Apb1),
    (AFIO, Domain::Apb2),
    (GPIOA, Domain::Apb2),
    (GPIOB, Domain::Apb2),
    (GPIOC, Domain::Apb2),
    (GPIOD, Domain::Apb2),
    (GPIOE, Domain::Apb2),
    (GPIOF, Domain::Apb2),
    (GPIOG, Domain::Apb2),
    (ADC1, Domain::Adc),
    (ADC2, Domain::Adc),
    (TIM1, Domain::Apb2Timers),
    (SPI1, Domain::Apb2),
    (TIM8, Domain::Apb2Timers),
    (USART1, Domain::Apb2),
    (ADC3, Domain::Adc),
    (TIM9, Domain::Apb2Timers),
    (TIM10, Domain::Apb2Timers),
    (TIM11, Domain::Apb2Timers),
    (CPU, Domain::Ahb),
    (SYSTICK, Domain::Ahb),
    (I2S, Domain::Pll),
    (RTC, Domain::Rtc),
    (IWDG, Domain::Watchdog),
];

const IDENTITY_COUNT: usize = (BEYOND + 5) as usize;

const fn build_domain_table() -> [Option<Domain>; IDENTITY_COUNT] {
    let mut table = [None; IDENTITY_COUNT];
    let mut i = 0;
    while i < PERIPHERALS.len() {
        let (id, domain) = PERIPHERALS[i];
        let index = id.device_id() as usize;
        if index < IDENTITY_COUNT {
            assert!(table[index].is_none(), "two peripherals share an enable bit");
            table[index] = Some(domain);
        }
        i += 1;
    }
    table
}

static DOMAINS: [Option<Domain>; IDENTITY_COUNT] = build_domain_table();

/// Domain clocking `id`, `None` for an identity the chip does not have.
pub fn domain_of(id: PeripheralId) -> Option<Domain> {
    DOMAINS.get(id.device_id() as usize).copied().flatten()
}

/// Whether `id` names a peripheral with a clock-enable bit.
pub fn is_gated(id: PeripheralId) -> bool {
    id.group() < GATED_GROUPS && domain_of(id).is_some()
}
