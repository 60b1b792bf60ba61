//! DHT11/DHT22 Single-Wire Protocol Decoder for Embedded Rust
//!
//! This crate reads the Aosong DHT11 and DHT22 (AM2302) temperature and
//! humidity sensors over their single-wire timing protocol, built on top of
//! the [`embedded-hal`] traits.
//!
//! The host sends a start signal, releases the line, and then times the
//! pulses the sensor answers with. Each data bit is a fixed-width low pulse
//! followed by a high pulse whose width encodes the bit. Forty bits make a
//! frame of two humidity bytes, two temperature bytes and a checksum.
//!
//! # Features
//! - Blocking synchronous API using `embedded-hal` traits
//! - Designed for `no_std` environments
//! - DHT11 and DHT22 calibration
//! - Tunable spin budgets for hosts with different read latencies
//! - Optional logging of per-pulse diagnostics via `defmt` or `log`
//!
//! # Dependencies
//! This driver depends on the following `embedded-hal` traits:
//! - [`InputPin`] and [`OutputPin`] for GPIO access
//! - [`DelayNs`] for accurate timing
//!
//! The pin must also implement [`Line`] so the driver can hand the line
//! over to the sensor. [`OpenDrainLine`] does this for open-drain pins.
//!
//! # Optional Features
//! - `defmt`: Implements `defmt::Format` and logs through `defmt`
//! - `log`: Logs through the `log` facade
//!
//! The two logging features are mutually exclusive.
//!
//! # Example
//!
//! ```ignore
//! use dht_line_decoder::{Dht, OpenDrainLine, SensorType};
//!
//! let mut dht = Dht::new(SensorType::Dht22, OpenDrainLine::new(pin), delay);
//! match dht.read() {
//!     Ok(reading) => info!("{} C, {} %", reading.temperature, reading.humidity),
//!     Err(e) => warn!("read failed: {}", e.code().as_raw()),
//! }
//! ```
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal
//! [`InputPin`]: embedded_hal::digital::InputPin
//! [`OutputPin`]: embedded_hal::digital::OutputPin
//! [`DelayNs`]: embedded_hal::delay::DelayNs

#![cfg_attr(not(test), no_std)]

#[cfg(all(feature = "defmt", feature = "log"))]
compile_error!("Features \"defmt\" and \"log\" are mutually exclusive and cannot be enabled together");

#[macro_use]
mod fmt;

pub mod dht;
pub mod error;
pub mod frame;
pub mod line;
pub mod retry;
pub mod timing;

#[cfg(test)]
mod sim;

pub use dht::{Dht, read};
pub use error::{DhtError, ErrorCode, SetupError};
pub use frame::{RawFrame, Reading, SensorType};
pub use line::{Direction, Line, OpenDrainLine};
pub use retry::RetryPolicy;
pub use timing::Timing;
