//! Minimal NDEF TLV envelope at the start of the user data region.
//!
//! Layout: a tag byte 0x03, a length field (one byte, or 0xFF followed by a
//! big-endian u16 for payloads of 0xFF bytes and more), the payload, and a
//! 0xFE terminator. Only the envelope is handled here; the payload itself is
//! opaque.

use crate::error::Error;
use crate::platform::Monotonic;
use crate::{Nt3h2x11, USER_DATA_LEN};
use alloc::vec::Vec;
use embedded_hal::i2c::I2c;

/// TLV tag marking an NDEF message.
const NDEF_TAG: u8 = 0x03;
/// Length byte announcing a 2-byte big-endian length.
const LONG_LENGTH: u8 = 0xFF;
/// TLV terminator written after the payload.
const TERMINATOR: u8 = 0xFE;

// First page of the user region, where the envelope header lives.
const HEADER_PAGE: u8 = 1;

impl<I2C: I2c, CLK: Monotonic> Nt3h2x11<I2C, CLK> {
    /// Reads the NDEF payload stored on the tag.
    ///
    /// Returns [`Error::NoEnvelope`] if the user memory does not start with
    /// the NDEF tag byte, which is how a blank or non-NDEF tag presents.
    pub fn read_ndef(&mut self) -> Result<Vec<u8>, Error<I2C::Error>> {
        let header = self.read_page(HEADER_PAGE)?;
        if header[0] != NDEF_TAG {
            return Err(Error::NoEnvelope);
        }
        let (len, payload_offset) = if header[1] == LONG_LENGTH {
            (usize::from(u16::from_be_bytes([header[2], header[3]])), 4u16)
        } else {
            (usize::from(header[1]), 2u16)
        };

        let mut payload = Vec::new();
        payload
            .try_reserve_exact(len)
            .map_err(|_| Error::OutOfMemory)?;
        payload.resize(len, 0);
        self.read_user(payload_offset, &mut payload)?;
        Ok(payload)
    }

    /// Writes `payload` as an NDEF message, replacing whatever envelope the
    /// tag held before.
    ///
    /// The payload must leave room for the 4-byte worst-case header and the
    /// terminator within the user region, otherwise [`Error::OutOfBounds`] is
    /// returned before anything is written. Header, payload and terminator
    /// are three separate region writes; a failure in any of them aborts the
    /// operation with the envelope in an indeterminate state.
    pub fn write_ndef(&mut self, payload: &[u8]) -> Result<(), Error<I2C::Error>> {
        if payload.len() >= USER_DATA_LEN - 4 {
            return Err(Error::OutOfBounds);
        }
        let payload_offset = if payload.len() >= usize::from(LONG_LENGTH) {
            let [hi, lo] = (payload.len() as u16).to_be_bytes();
            self.write_user(0, &[NDEF_TAG, LONG_LENGTH, hi, lo])?;
            4u16
        } else {
            self.write_user(0, &[NDEF_TAG, payload.len() as u8])?;
            2u16
        };

        self.write_user(payload_offset, payload)?;
        self.write_user(payload_offset + payload.len() as u16, &[TERMINATOR])
    }
}
