//! Clock collaborator. The bus side of the platform is plain
//! [`embedded_hal::i2c::I2c`]; the tag additionally needs a monotonic time
//! source to pace accesses around the EEPROM programming cycle.

/// A microsecond-resolution, monotonically increasing time source.
///
/// The driver polls `now_micros` while waiting out the settle interval after
/// an EEPROM write and calls `yield_now` between polls, so other cooperative
/// work can run during the wait. The wait only terminates once the clock has
/// advanced past the deadline; a clock that never advances blocks the driver
/// forever.
pub trait Monotonic {
    fn now_micros(&mut self) -> u64;

    /// Suspension hook invoked on every iteration of the settle wait loop.
    /// Map this to the scheduler's yield primitive; the default spins.
    fn yield_now(&mut self) {}
}

impl<T: Monotonic> Monotonic for &mut T {
    fn now_micros(&mut self) -> u64 {
        T::now_micros(self)
    }

    fn yield_now(&mut self) {
        T::yield_now(self)
    }
}
