//! Page I/O and the unaligned access engine.
//!
//! The tag only transfers whole 16-byte pages: the register index of a bus
//! transaction is the page index, and every transaction moves exactly one
//! page. Arbitrary byte ranges are realized here as a leading partial page,
//! a run of full pages, and a trailing partial page; partial pages are
//! read-modify-written so the untouched bytes survive.

use crate::error::Error;
use crate::platform::Monotonic;
use crate::{FLAT_LEN, Nt3h2x11, PAGE_SIZE, SETTLE_INTERVAL_US};
#[cfg(feature = "defmt")]
use defmt::trace;
use embedded_hal::i2c::I2c;

/// Tracks the most recent EEPROM page write so subsequent accesses can wait
/// out the programming cycle. One gate per driver; the driver owns the bus,
/// so this also serializes per bus.
pub(crate) struct SettleGate {
    last_write_us: Option<u64>,
}

impl SettleGate {
    pub(crate) const fn new() -> Self {
        Self { last_write_us: None }
    }

    /// Busy-yields until the settle interval since the last recorded write
    /// has elapsed. Relies on the clock advancing; see [`Monotonic`].
    fn wait<C: Monotonic>(&self, clock: &mut C) {
        let Some(last) = self.last_write_us else {
            return;
        };
        let deadline = last.saturating_add(SETTLE_INTERVAL_US);
        while clock.now_micros() < deadline {
            clock.yield_now();
        }
    }

    fn record<C: Monotonic>(&mut self, clock: &mut C) {
        self.last_write_us = Some(clock.now_micros());
    }
}

impl<I2C: I2c, CLK: Monotonic> Nt3h2x11<I2C, CLK> {
    /// Reads one page. Waits out a pending settle interval first.
    pub fn read_page(&mut self, page: u8) -> Result<[u8; PAGE_SIZE], Error<I2C::Error>> {
        let mut buf = [0u8; PAGE_SIZE];
        self.page_read(page, &mut buf)?;
        Ok(buf)
    }

    /// Writes one page and starts the settle interval. Waits out a pending
    /// one first.
    pub fn write_page(&mut self, page: u8, data: &[u8; PAGE_SIZE]) -> Result<(), Error<I2C::Error>> {
        self.page_write(page, data)
    }

    // `out` is always exactly one page long.
    fn page_read(&mut self, page: u8, out: &mut [u8]) -> Result<(), Error<I2C::Error>> {
        self.gate.wait(&mut self.clock);
        #[cfg(feature = "defmt")]
        trace!("page read {=u8}", page);
        self.i2c
            .write_read(self.address, &[page], out)
            .map_err(Error::Bus)
    }

    fn page_write(&mut self, page: u8, data: &[u8]) -> Result<(), Error<I2C::Error>> {
        self.gate.wait(&mut self.clock);
        #[cfg(feature = "defmt")]
        trace!("page write {=u8}", page);
        let mut frame = [0u8; 1 + PAGE_SIZE];
        frame[0] = page;
        frame[1..].copy_from_slice(data);
        let res = self.i2c.write(self.address, &frame).map_err(Error::Bus);
        // The programming cycle starts once the frame has been clocked out,
        // whether or not the transfer was acknowledged.
        self.gate.record(&mut self.clock);
        res
    }

    /// Reads `buf.len()` bytes starting at `offset` in the flat page space.
    ///
    /// A zero-length read succeeds without touching the bus. A failing page
    /// read aborts the operation immediately.
    pub fn read_raw(&mut self, offset: u16, buf: &mut [u8]) -> Result<(), Error<I2C::Error>> {
        if buf.is_empty() {
            return Ok(());
        }
        let mut offset = usize::from(offset);
        if offset + buf.len() > FLAT_LEN {
            return Err(Error::OutOfBounds);
        }
        let mut buf = &mut buf[..];
        let mut page_buf = [0u8; PAGE_SIZE];

        let misalign = offset % PAGE_SIZE;
        if misalign != 0 {
            let take = (PAGE_SIZE - misalign).min(buf.len());
            self.page_read((offset / PAGE_SIZE) as u8, &mut page_buf)?;
            buf[..take].copy_from_slice(&page_buf[misalign..misalign + take]);
            buf = &mut buf[take..];
            offset += take;
        }

        while buf.len() >= PAGE_SIZE {
            let (head, rest) = buf.split_at_mut(PAGE_SIZE);
            self.page_read((offset / PAGE_SIZE) as u8, head)?;
            buf = rest;
            offset += PAGE_SIZE;
        }

        if !buf.is_empty() {
            self.page_read((offset / PAGE_SIZE) as u8, &mut page_buf)?;
            let len = buf.len();
            buf.copy_from_slice(&page_buf[..len]);
        }

        Ok(())
    }

    /// Writes `data` starting at `offset` in the flat page space.
    ///
    /// Partial boundary pages are read back first so the bytes outside the
    /// requested range are preserved. The operation is not atomic: if a page
    /// write fails partway, the pages before it have already been programmed
    /// and the caller must re-read to learn the device state.
    pub fn write_raw(&mut self, offset: u16, data: &[u8]) -> Result<(), Error<I2C::Error>> {
        if data.is_empty() {
            return Ok(());
        }
        let mut offset = usize::from(offset);
        if offset + data.len() > FLAT_LEN {
            return Err(Error::OutOfBounds);
        }
        let mut data = data;
        let mut page_buf = [0u8; PAGE_SIZE];

        let misalign = offset % PAGE_SIZE;
        if misalign != 0 {
            let take = (PAGE_SIZE - misalign).min(data.len());
            let page = (offset / PAGE_SIZE) as u8;
            self.page_read(page, &mut page_buf)?;
            page_buf[misalign..misalign + take].copy_from_slice(&data[..take]);
            self.page_write(page, &page_buf)?;
            data = &data[take..];
            offset += take;
        }

        while data.len() >= PAGE_SIZE {
            self.page_write((offset / PAGE_SIZE) as u8, &data[..PAGE_SIZE])?;
            data = &data[PAGE_SIZE..];
            offset += PAGE_SIZE;
        }

        if !data.is_empty() {
            let page = (offset / PAGE_SIZE) as u8;
            self.page_read(page, &mut page_buf)?;
            page_buf[..data.len()].copy_from_slice(data);
            self.page_write(page, &page_buf)?;
        }

        Ok(())
    }
}
