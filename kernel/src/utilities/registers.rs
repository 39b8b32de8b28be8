// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Register access for clock drivers.
//!
//! Bitfield layouts come from the Tock Register Interface, re-exported here
//! so that chip crates only depend on the kernel:
//!
//! ```rust,ignore
//! use kernel::utilities::registers::{register_bitfields, Register, RegisterBank};
//!
//! register_bitfields![u32,
//!     CR [
//!         HSEON OFFSET(16) NUMBITS(1) []
//!     ]
//! ];
//!
//! const CR: Register<CR::Register> = Register::at(0x00);
//!
//! bank.modify(CR, CR::HSEON::SET);
//! ```
//!
//! Unlike `register_structs!`, registers here are plain byte offsets into a
//! [`RegisterBank`]. Drivers receive the bank by reference, so the same code
//! drives a [`MmioRegisterBank`] on the target and a recording fake on the
//! host.

use core::marker::PhantomData;

use crate::config::CONFIG;

pub use tock_registers::fields::{Field, FieldValue};
pub use tock_registers::{register_bitfields, LocalRegisterCopy, RegisterLongName};

/// A 32-bit register at a byte offset within a bank, typed by its bitfield
/// layout `R`.
pub struct Register<R: RegisterLongName> {
    offset: usize,
    layout: PhantomData<R>,
}

impl<R: RegisterLongName> Clone for Register<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: RegisterLongName> Copy for Register<R> {}

impl<R: RegisterLongName> Register<R> {
    pub const fn at(offset: usize) -> Register<R> {
        Register {
            offset,
            layout: PhantomData,
        }
    }

    pub const fn offset(self) -> usize {
        self.offset
    }
}

/// Word-granular access to a block of peripheral registers.
///
/// Implementors supply `read_word` and `write_word`; the typed accessors are
/// provided on top of them.
pub trait RegisterBank {
    /// Read the 32-bit word at byte `offset`.
    fn read_word(&self, offset: usize) -> u32;

    /// Write the 32-bit word at byte `offset`.
    fn write_word(&self, offset: usize, value: u32);

    /// Snapshot of a whole register, for reading several fields at once.
    fn get<R: RegisterLongName>(&self, register: Register<R>) -> LocalRegisterCopy<u32, R> {
        LocalRegisterCopy::new(self.read_word(register.offset()))
    }

    fn read<R: RegisterLongName>(&self, register: Register<R>, field: Field<u32, R>) -> u32 {
        field.read(self.read_word(register.offset()))
    }

    fn is_set<R: RegisterLongName>(&self, register: Register<R>, field: Field<u32, R>) -> bool {
        field.is_set(self.read_word(register.offset()))
    }

    /// Overwrite the register; fields not named in `value` become zero.
    fn write<R: RegisterLongName>(&self, register: Register<R>, value: FieldValue<u32, R>) {
        self.write_word(register.offset(), value.value);
    }

    /// Read-modify-write of the fields named in `value`.
    fn modify<R: RegisterLongName>(&self, register: Register<R>, value: FieldValue<u32, R>) {
        let word = self.read_word(register.offset());
        self.write_word(register.offset(), value.modify(word));
    }
}

pub(crate) fn trace_write(address: usize, value: u32) {
    if CONFIG.trace_register_writes {
        log::trace!("register {:#010x} <= {:#010x}", address, value);
    }
}

/// Registers accessed through volatile loads and stores at a fixed base
/// address.
pub struct MmioRegisterBank {
    base: usize,
}

impl MmioRegisterBank {
    /// # Safety
    ///
    /// `base` must be the address of a memory-mapped register block that is
    /// valid for 32-bit volatile access at every offset a driver uses, and
    /// nothing else may drive that block concurrently.
    pub const unsafe fn new(base: usize) -> MmioRegisterBank {
        MmioRegisterBank { base }
    }
}

impl RegisterBank for MmioRegisterBank {
    fn read_word(&self, offset: usize) -> u32 {
        // SAFETY: `new` requires the block to be valid for volatile access.
        unsafe { core::ptr::read_volatile((self.base + offset) as *const u32) }
    }

    fn write_word(&self, offset: usize, value: u32) {
        trace_write(self.base + offset, value);
        // SAFETY: `new` requires the block to be valid for volatile access.
        unsafe { core::ptr::write_volatile((self.base + offset) as *mut u32, value) }
    }
}

/// A write-protection scheme guarding a register block.
pub trait WriteProtection {
    fn unlock<B: RegisterBank>(&self, bank: &B);
    fn lock<B: RegisterBank>(&self, bank: &B);
}

/// Protection through a key register: writing the key opens the block,
/// writing anything else closes it again.
pub struct KeyProtection<R: RegisterLongName> {
    key: Register<R>,
    unlock: u32,
    lock: u32,
}

impl<R: RegisterLongName> KeyProtection<R> {
    pub const fn new(
        key: Register<R>,
        unlock: FieldValue<u32, R>,
        lock: FieldValue<u32, R>,
    ) -> KeyProtection<R> {
        KeyProtection {
            key,
            unlock: unlock.value,
            lock: lock.value,
        }
    }
}

impl<R: RegisterLongName> WriteProtection for KeyProtection<R> {
    fn unlock<B: RegisterBank>(&self, bank: &B) {
        bank.write_word(self.key.offset(), self.unlock);
    }

    fn lock<B: RegisterBank>(&self, bank: &B) {
        bank.write_word(self.key.offset(), self.lock);
    }
}

/// A register bank whose every write is bracketed by an unlock and a lock.
///
/// Reads pass straight through. A read-modify-write therefore reads while
/// locked and only opens the block for the write itself.
pub struct ProtectedBank<'a, B: RegisterBank, P: WriteProtection> {
    bank: &'a B,
    protection: P,
}

impl<'a, B: RegisterBank, P: WriteProtection> ProtectedBank<'a, B, P> {
    pub const fn new(bank: &'a B, protection: P) -> Self {
        ProtectedBank { bank, protection }
    }
}

impl<B: RegisterBank, P: WriteProtection> RegisterBank for ProtectedBank<'_, B, P> {
    fn read_word(&self, offset: usize) -> u32 {
        self.bank.read_word(offset)
    }

    fn write_word(&self, offset: usize, value: u32) {
        self.protection.unlock(self.bank);
        self.bank.write_word(offset, value);
        self.protection.lock(self.bank);
    }
}
