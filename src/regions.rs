//! Bounds-checked views over the two logical memory regions.
//!
//! Offsets here are region-relative; both accessors translate into the flat
//! page space and forward to the unaligned engine. Out-of-range requests are
//! rejected before any bus access, except that a zero-length request always
//! succeeds, whatever its offset.

use crate::error::Error;
use crate::platform::Monotonic;
use crate::{Nt3h2x11, SRAM_BASE_OFFSET, SRAM_LEN, USER_BASE_OFFSET, USER_DATA_LEN};
use embedded_hal::i2c::I2c;

impl<I2C: I2c, CLK: Monotonic> Nt3h2x11<I2C, CLK> {
    /// Reads from the user data EEPROM region.
    pub fn read_user(&mut self, offset: u16, buf: &mut [u8]) -> Result<(), Error<I2C::Error>> {
        if buf.is_empty() {
            return Ok(());
        }
        if usize::from(offset) + buf.len() > USER_DATA_LEN {
            return Err(Error::OutOfBounds);
        }
        self.read_raw(USER_BASE_OFFSET + offset, buf)
    }

    /// Writes to the user data EEPROM region.
    pub fn write_user(&mut self, offset: u16, data: &[u8]) -> Result<(), Error<I2C::Error>> {
        if data.is_empty() {
            return Ok(());
        }
        if usize::from(offset) + data.len() > USER_DATA_LEN {
            return Err(Error::OutOfBounds);
        }
        self.write_raw(USER_BASE_OFFSET + offset, data)
    }

    /// Reads from the pass-through SRAM region. Volatile; contents are lost
    /// on power cycle.
    pub fn read_sram(&mut self, offset: u16, buf: &mut [u8]) -> Result<(), Error<I2C::Error>> {
        if buf.is_empty() {
            return Ok(());
        }
        if usize::from(offset) + buf.len() > SRAM_LEN {
            return Err(Error::OutOfBounds);
        }
        self.read_raw(SRAM_BASE_OFFSET + offset, buf)
    }

    /// Writes to the pass-through SRAM region.
    pub fn write_sram(&mut self, offset: u16, data: &[u8]) -> Result<(), Error<I2C::Error>> {
        if data.is_empty() {
            return Ok(());
        }
        if usize::from(offset) + data.len() > SRAM_LEN {
            return Err(Error::OutOfBounds);
        }
        self.write_raw(SRAM_BASE_OFFSET + offset, data)
    }
}
