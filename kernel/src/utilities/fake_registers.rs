// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! In-memory register bank for exercising drivers off target.
//!
//! `FakeRegisterBank` stores `WORDS` 32-bit registers, journals every write
//! a driver issues and counts every read. A chip's tests can attach a write
//! hook that models the hardware's reaction, for example raising a ready
//! flag when an oscillator is switched on:
//!
//! ```rust,ignore
//! fn rcc_model(bank: &FakeRegisterBank<10>, offset: usize, value: u32) {
//!     if offset == CR_OFFSET && value & HSEON != 0 {
//!         bank.poke(CR_OFFSET, value | HSERDY);
//!     }
//! }
//!
//! let rcc = FakeRegisterBank::with_hook(rcc_model);
//! ```
//!
//! Hooks and tests use `poke` and `peek`, which neither journal nor count.

use core::cell::Cell;

use super::registers::{trace_write, RegisterBank};

/// Number of writes the journal retains. Later writes still reach the
/// registers and are counted, but are not journaled.
pub const JOURNAL_DEPTH: usize = 256;

/// Hardware model invoked after each driver write with the offset and value.
pub type WriteHook<const WORDS: usize> = fn(&FakeRegisterBank<WORDS>, usize, u32);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RecordedWrite {
    pub offset: usize,
    pub value: u32,
}

pub struct FakeRegisterBank<const WORDS: usize> {
    words: [Cell<u32>; WORDS],
    hook: Option<WriteHook<WORDS>>,
    journal: [Cell<RecordedWrite>; JOURNAL_DEPTH],
    writes: Cell<usize>,
    reads: Cell<usize>,
}

impl<const WORDS: usize> FakeRegisterBank<WORDS> {
    /// A bank of zeroed registers that react to nothing.
    pub fn new() -> FakeRegisterBank<WORDS> {
        FakeRegisterBank {
            words: core::array::from_fn(|_| Cell::new(0)),
            hook: None,
            journal: core::array::from_fn(|_| Cell::new(RecordedWrite::default())),
            writes: Cell::new(0),
            reads: Cell::new(0),
        }
    }

    /// A bank of zeroed registers modelled by `hook`.
    pub fn with_hook(hook: WriteHook<WORDS>) -> FakeRegisterBank<WORDS> {
        let mut bank = FakeRegisterBank::new();
        bank.hook = Some(hook);
        bank
    }

    fn slot(&self, offset: usize) -> &Cell<u32> {
        assert!(offset % 4 == 0, "unaligned register offset {:#x}", offset);
        &self.words[offset / 4]
    }

    /// Set a register without journaling or invoking the hook.
    pub fn poke(&self, offset: usize, value: u32) {
        self.slot(offset).set(value);
    }

    /// Read a register without counting the access.
    pub fn peek(&self, offset: usize) -> u32 {
        self.slot(offset).get()
    }

    /// Number of driver writes, journaled or not.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    /// Number of driver reads.
    pub fn read_count(&self) -> usize {
        self.reads.get()
    }

    /// Journaled writes in the order they were issued.
    pub fn journal(&self) -> impl Iterator<Item = RecordedWrite> + '_ {
        let recorded = self.writes.get().min(JOURNAL_DEPTH);
        self.journal[..recorded].iter().map(Cell::get)
    }

    /// Journaled writes to the register at `offset`.
    pub fn writes_to(&self, offset: usize) -> impl Iterator<Item = u32> + '_ {
        self.journal()
            .filter(move |write| write.offset == offset)
            .map(|write| write.value)
    }

    /// Forget all journaled writes and reset both counters.
    pub fn clear_journal(&self) {
        self.writes.set(0);
        self.reads.set(0);
    }
}

impl<const WORDS: usize> RegisterBank for FakeRegisterBank<WORDS> {
    fn read_word(&self, offset: usize) -> u32 {
        self.reads.set(self.reads.get() + 1);
        self.peek(offset)
    }

    fn write_word(&self, offset: usize, value: u32) {
        trace_write(offset, value);
        self.poke(offset, value);

        let index = self.writes.get();
        if let Some(entry) = self.journal.get(index) {
            entry.set(RecordedWrite { offset, value });
        }
        self.writes.set(index + 1);

        if let Some(hook) = self.hook {
            hook(self, offset, value);
        }
    }
}
