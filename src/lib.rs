#![doc = include_str!("../README.md")]
#![no_std]

pub mod error;
mod ndef;
pub mod platform;
mod raw;
mod regions;

extern crate alloc;

use crate::error::Error;
use crate::platform::Monotonic;
use crate::raw::SettleGate;
use embedded_hal::i2c::I2c;

/// Size of one EEPROM page, the atomic unit of bus transfer.
pub const PAGE_SIZE: usize = 16;
/// Byte size of the user memory region (page 1 onward).
pub const USER_DATA_LEN: usize = 884;
/// Byte size of the pass-through SRAM region (page 248 onward).
pub const SRAM_LEN: usize = 64;
/// Factory-default I2C address of the tag.
pub const DEFAULT_ADDRESS: u8 = 0x55;
/// Minimum delay after an EEPROM page write before the tag accepts the next
/// page access, in microseconds.
pub const SETTLE_INTERVAL_US: u64 = 5_000;

// The flat address space is 256 pages; the regions below are byte offsets
// into it.
pub(crate) const FLAT_LEN: usize = 256 * PAGE_SIZE;
pub(crate) const USER_BASE_OFFSET: u16 = PAGE_SIZE as u16;
pub(crate) const SRAM_BASE_OFFSET: u16 = 248 * PAGE_SIZE as u16;
const SERIAL_OFFSET: u16 = 1;
const CC_OFFSET: u16 = 12;

/// Driver for an NT3H2x11 NTAG I2C tag.
///
/// The driver owns the bus and a [`Monotonic`] clock; the clock paces page
/// accesses around the EEPROM programming cycle (see [`SETTLE_INTERVAL_US`]).
/// Because the bus is owned, the settle bookkeeping is per bus as well, so
/// tags on independent buses are never serialized against each other.
///
/// The driver holds no other state: all reads and writes go straight to the
/// tag, and dropping the driver has no device-side effect.
pub struct Nt3h2x11<I2C, CLK> {
    i2c: I2C,
    address: u8,
    clock: CLK,
    gate: SettleGate,
}

impl<I2C: I2c, CLK: Monotonic> Nt3h2x11<I2C, CLK> {
    /// Creates a driver for the tag at `address` (7-bit, usually
    /// [`DEFAULT_ADDRESS`]) on the given bus.
    pub fn new(i2c: I2C, address: u8, clock: CLK) -> Self {
        Self {
            i2c,
            address,
            clock,
            gate: SettleGate::new(),
        }
    }

    /// Consumes the driver and hands back the bus and clock. The tag needs no
    /// teardown.
    pub fn release(self) -> (I2C, CLK) {
        (self.i2c, self.clock)
    }

    /// Reads the factory-programmed serial number, a 48-bit little-endian
    /// value at byte 1 of the flat space.
    pub fn serial(&mut self) -> Result<u64, Error<I2C::Error>> {
        let mut raw = [0u8; 6];
        self.read_raw(SERIAL_OFFSET, &mut raw)?;
        let [a, b, c, d, e, f] = raw;
        Ok(u64::from_le_bytes([a, b, c, d, e, f, 0, 0]))
    }

    /// Reads the NFC Forum capability container at byte 12 of the flat space.
    pub fn capability_container(&mut self) -> Result<u32, Error<I2C::Error>> {
        let mut raw = [0u8; 4];
        self.read_raw(CC_OFFSET, &mut raw)?;
        Ok(u32::from_le_bytes(raw))
    }

    /// Writes the NFC Forum capability container.
    pub fn set_capability_container(&mut self, cc: u32) -> Result<(), Error<I2C::Error>> {
        self.write_raw(CC_OFFSET, &cc.to_le_bytes())
    }
}
