//! Caller-side retry policy for [`Dht::read_with_retry`](crate::Dht::read_with_retry).
//!
//! A plain [`Dht::read`](crate::Dht::read) never retries. Bad reads are
//! common on hosts that cannot guarantee timing, so this module offers the
//! usual remedy as an explicit opt-in.

use crate::error::DhtError;

/// How often to retry a failed read, and how long to wait in between.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of read attempts. `0` is treated as `1`.
    pub attempts: u8,
    /// Pause after the sensor did not answer, in ms.
    pub no_response_delay_ms: u32,
    /// Pause after an incomplete frame or a bad checksum, in ms.
    pub corrupted_delay_ms: u32,
}

impl RetryPolicy {
    /// Returns the default policy: 10 attempts, 400 ms after a missing
    /// response, no pause after a corrupted frame.
    pub const fn new() -> Self {
        RetryPolicy {
            attempts: 10,
            no_response_delay_ms: 400,
            corrupted_delay_ms: 0,
        }
    }

    /// Pause to observe after `error`, in ms.
    pub fn pause_after<E>(&self, error: &DhtError<E>) -> u32 {
        match error {
            DhtError::NoResponse => self.no_response_delay_ms,
            DhtError::IncompleteFrame { .. } | DhtError::BadChecksum { .. } => {
                self.corrupted_delay_ms
            }
            DhtError::PinError(_) => 0,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}
