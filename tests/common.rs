#![allow(dead_code)]

// filename according to https://doc.rust-lang.org/book/ch11-03-test-organization.html
use embedded_hal::i2c::{self, ErrorType, I2c, Operation};
use nt3h2x11::platform::Monotonic;
use std::cell::Cell;
use std::rc::Rc;

pub const PAGE_SIZE: usize = 16;
pub const FLAT_LEN: usize = 256 * PAGE_SIZE;
pub const ADDRESS: u8 = 0x55;

/// Virtual microseconds consumed by one bus transaction.
pub const TRANSFER_US: u64 = 400;
/// Virtual microseconds consumed by one `yield_now`.
pub const YIELD_US: u64 = 250;

/// A virtual clock shared between the mock bus and the driver, so every bus
/// operation can be stamped with the time the driver issued it.
#[derive(Clone, Default)]
pub struct SharedClock {
    now_us: Rc<Cell<u64>>,
    yields: Rc<Cell<usize>>,
}

impl SharedClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.now_us.get()
    }

    pub fn advance(&self, us: u64) {
        self.now_us.set(self.now_us.get() + us);
    }

    pub fn yields(&self) -> usize {
        self.yields.get()
    }
}

impl Monotonic for SharedClock {
    fn now_micros(&mut self) -> u64 {
        self.now_us.get()
    }

    fn yield_now(&mut self) {
        self.yields.set(self.yields.get() + 1);
        self.advance(YIELD_US);
    }
}

/// Mock tag: 256 pages of backing memory behind the register-indexed I2C
/// protocol the driver speaks, with an operation log and fault injection.
pub struct Bus {
    pub mem: Vec<u8>,
    pub operations: Vec<BusOp>,
    pub fail_after_operation: usize,
    clock: SharedClock,
}

#[derive(Debug, PartialEq, Clone)]
pub enum BusOp {
    ReadPage { page: u8, at_us: u64 },
    WritePage { page: u8, at_us: u64 },
}

impl Bus {
    pub fn new(clock: SharedClock) -> Self {
        Self {
            mem: vec![0u8; FLAT_LEN],
            operations: Vec::new(),
            fail_after_operation: usize::MAX,
            clock,
        }
    }

    pub fn new_with_fault(clock: SharedClock, fail_after_operation: usize) -> Self {
        Self {
            fail_after_operation,
            ..Self::new(clock)
        }
    }

    pub fn page(&self, page: u8) -> &[u8] {
        let base = usize::from(page) * PAGE_SIZE;
        &self.mem[base..base + PAGE_SIZE]
    }

    pub fn writes(&self) -> usize {
        self.operations
            .iter()
            .filter(|op| matches!(op, BusOp::WritePage { .. }))
            .count()
    }

    pub fn dump_operations(&self) {
        println!("Operations:");
        for op in &self.operations {
            println!("  {:?}", op);
        }
    }
}

/// Flattens the log to (kind, page) pairs for sequence assertions.
pub fn trace(ops: &[BusOp]) -> Vec<(char, u8)> {
    ops.iter()
        .map(|op| match op {
            BusOp::ReadPage { page, .. } => ('r', *page),
            BusOp::WritePage { page, .. } => ('w', *page),
        })
        .collect()
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct BusError;

impl i2c::Error for BusError {
    fn kind(&self) -> i2c::ErrorKind {
        i2c::ErrorKind::Other
    }
}

impl ErrorType for Bus {
    type Error = BusError;
}

impl I2c for Bus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        assert_eq!(address, ADDRESS);
        let at_us = self.clock.now();

        if self.operations.len() >= self.fail_after_operation {
            println!("    bus: FAULT #{:>2}", self.operations.len());
            return Err(BusError);
        }

        match operations {
            // write_read([page], buf) - a page read
            [Operation::Write(reg), Operation::Read(buf)] => {
                assert_eq!(reg.len(), 1);
                assert_eq!(buf.len(), PAGE_SIZE);
                let page = reg[0];
                println!("    bus: read  page {page:>3} #{:>2}", self.operations.len());
                buf.copy_from_slice(self.page(page));
                self.operations.push(BusOp::ReadPage { page, at_us });
            }
            // write([page, d0..d15]) - a page write
            [Operation::Write(frame)] => {
                assert_eq!(frame.len(), 1 + PAGE_SIZE);
                let page = frame[0];
                println!("    bus: write page {page:>3} #{:>2}", self.operations.len());
                let base = usize::from(page) * PAGE_SIZE;
                self.mem[base..base + PAGE_SIZE].copy_from_slice(&frame[1..]);
                self.operations.push(BusOp::WritePage { page, at_us });
            }
            other => panic!("unexpected transaction shape: {} operations", other.len()),
        }

        self.clock.advance(TRANSFER_US);
        Ok(())
    }
}
