use core::fmt;

/// Possible errors from a DHT read.
#[derive(Debug, PartialEq, Eq)]
pub enum DhtError<E> {
    /// The sensor never pulled the line low after the start signal.
    ///
    /// Usually means no sensor is attached, it is miswired, or it has not
    /// settled after power-on.
    NoResponse,
    /// A pulse exceeded the spin budget before 40 bits were collected.
    IncompleteFrame {
        /// Number of bits classified before sampling stopped.
        bits: u8,
    },
    /// All 40 bits arrived but the checksum byte does not match the data.
    BadChecksum {
        /// Low 8 bits of the sum of the four data bytes.
        computed: u8,
        /// Checksum byte sent by the sensor.
        received: u8,
    },
    /// Error from the GPIO pin (input/output/direction).
    PinError(E),
}

impl<E> From<E> for DhtError<E> {
    fn from(value: E) -> Self {
        Self::PinError(value)
    }
}

impl<E> DhtError<E> {
    /// Stable numeric code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            DhtError::NoResponse => ErrorCode::NoResponse,
            DhtError::IncompleteFrame { .. } => ErrorCode::CorruptedRead,
            DhtError::BadChecksum { .. } => ErrorCode::BadChecksum,
            DhtError::PinError(_) => ErrorCode::DriverSetupFailed,
        }
    }

    /// Whether a later attempt may succeed.
    ///
    /// Missing acknowledges and corrupted frames are transient. Pin errors come
    /// from the platform and will not go away by asking again.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, DhtError::PinError(_))
    }
}

impl<E: fmt::Debug> fmt::Display for DhtError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DhtError::NoResponse => f.write_str("no response from sensor"),
            DhtError::IncompleteFrame { bits } => {
                write!(f, "incomplete frame: {bits} of 40 bits received")
            }
            DhtError::BadChecksum { computed, received } => write!(
                f,
                "bad checksum: computed {computed:#04x}, received {received:#04x}"
            ),
            DhtError::PinError(e) => write!(f, "pin error: {e:?}"),
        }
    }
}

/// Errors raised while preparing the platform, before any read is attempted.
///
/// The decoder never produces these itself. They belong to whatever sets up
/// GPIO access for it, and are listed here so both kinds of failure share one
/// code table.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetupError {
    /// The process lacks the privileges needed to access GPIO.
    NoRootPermission,
    /// The GPIO library could not be set up.
    DriverSetupFailed,
    /// Privileges could not be dropped after GPIO setup.
    PrivilegeDropFailed,
    /// The GPIO library failed to initialise.
    DriverInitFailed,
}

impl SetupError {
    /// Stable numeric code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            SetupError::NoRootPermission => ErrorCode::NoRootPermission,
            SetupError::DriverSetupFailed => ErrorCode::DriverSetupFailed,
            SetupError::PrivilegeDropFailed => ErrorCode::PrivilegeDropFailed,
            SetupError::DriverInitFailed => ErrorCode::DriverInitFailed,
        }
    }
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SetupError::NoRootPermission => "root permission required for GPIO access",
            SetupError::DriverSetupFailed => "GPIO driver setup failed",
            SetupError::PrivilegeDropFailed => "could not drop privileges",
            SetupError::DriverInitFailed => "GPIO driver initialisation failed",
        })
    }
}

/// Numeric error codes for callers behind a C-style interface.
///
/// Values are negative so that `0` can mean success.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ErrorCode {
    NoRootPermission = -1,
    DriverSetupFailed = -2,
    PrivilegeDropFailed = -3,
    BadChecksum = -4,
    CorruptedRead = -5,
    NoResponse = -6,
    DriverInitFailed = -7,
}

impl ErrorCode {
    /// Returns the raw integer value.
    pub const fn as_raw(self) -> i32 {
        self as i32
    }

    /// Looks up the code for a raw integer value.
    pub const fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            -1 => Some(ErrorCode::NoRootPermission),
            -2 => Some(ErrorCode::DriverSetupFailed),
            -3 => Some(ErrorCode::PrivilegeDropFailed),
            -4 => Some(ErrorCode::BadChecksum),
            -5 => Some(ErrorCode::CorruptedRead),
            -6 => Some(ErrorCode::NoResponse),
            -7 => Some(ErrorCode::DriverInitFailed),
            _ => None,
        }
    }
}
