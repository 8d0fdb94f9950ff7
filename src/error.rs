use thiserror::Error;

/// Errors that can occur while talking to the tag. The enum is generic over the
/// bus error type so that transport failures are propagated verbatim; this
/// layer never retries. Marked as non-exhaustive to allow for future additions
/// without breaking the API.
#[derive(Error, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error<E> {
    /// The underlying I2C transfer did not complete. The inner value is the
    /// bus implementation's own error, unchanged.
    #[error("bus transfer failed")]
    Bus(E),

    /// The requested offset plus length does not fit the addressed region
    /// (or the 256-page flat address space). Rejected before any bus access.
    #[error("offset and length exceed the region")]
    OutOfBounds,

    /// The first byte of the user memory is not the NDEF TLV tag (0x03).
    /// Either the tag was never written or it holds non-NDEF data. This is an
    /// expected outcome, not a fault.
    #[error("no NDEF message present")]
    NoEnvelope,

    /// The buffer for an NDEF payload could not be allocated.
    #[error("payload allocation failed")]
    OutOfMemory,
}
