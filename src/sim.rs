//! A simulated sensor for tests.
//!
//! The line and the delay share a clock that only the delay advances, so a
//! pulse of `n` time units is seen as `n` spin iterations by the decoder.
//! Every switch to input starts the next recorded pulse train, like a sensor
//! answering a fresh start signal. The last train repeats once all have been
//! played.

use std::cell::Cell;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use crate::line::{Direction, Line};

/// High-pulse width of a `0` bit, in counts.
pub const ZERO_HIGH: u32 = 10;
/// High-pulse width of a `1` bit, in counts.
pub const ONE_HIGH: u32 = 40;

#[derive(Clone, Default)]
pub struct Clock(Rc<Cell<u64>>);

impl Clock {
    pub fn now(&self) -> u64 {
        self.0.get()
    }

    fn advance(&self, us: u64) {
        self.0.set(self.0.get() + us);
    }
}

pub struct SimDelay {
    clock: Clock,
}

impl SimDelay {
    pub fn clock(&self) -> Clock {
        self.clock.clone()
    }
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.clock.advance(u64::from(ns.div_ceil(1000)));
    }

    fn delay_us(&mut self, us: u32) {
        self.clock.advance(u64::from(us));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.clock.advance(u64::from(ms) * 1000);
    }
}

pub struct SimLine {
    clock: Clock,
    trains: Vec<Vec<(bool, u32)>>,
    direction: Direction,
    driven: bool,
    input_since: u64,
    starts: u32,
}

impl SimLine {
    /// Number of start signals the line has seen.
    pub fn starts(&self) -> u32 {
        self.starts
    }

    fn level(&self) -> bool {
        if self.direction == Direction::Output {
            return self.driven;
        }
        let Some(last) = self.trains.len().checked_sub(1) else {
            return true;
        };
        let train = &self.trains[(self.starts.max(1) as usize - 1).min(last)];
        let mut elapsed = self.clock.now() - self.input_since;
        for &(level, width) in train {
            if elapsed < u64::from(width) {
                return level;
            }
            elapsed -= u64::from(width);
        }
        // Idle line is held high by the pull-up.
        true
    }
}

impl ErrorType for SimLine {
    type Error = Infallible;
}

impl InputPin for SimLine {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.level())
    }
}

impl OutputPin for SimLine {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.driven = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.driven = true;
        Ok(())
    }
}

impl Line for SimLine {
    fn set_direction(&mut self, direction: Direction) -> Result<(), Self::Error> {
        if direction == Direction::Input && self.direction == Direction::Output {
            self.input_since = self.clock.now();
            self.starts += 1;
        }
        self.direction = direction;
        Ok(())
    }
}

/// Builds a line and delay pair that plays back `train` after each start signal.
pub fn sensor(train: Vec<(bool, u32)>) -> (SimLine, SimDelay) {
    sensor_sequence(vec![train])
}

/// Like [`sensor`], with a different train for each successive start signal.
pub fn sensor_sequence(trains: Vec<Vec<(bool, u32)>>) -> (SimLine, SimDelay) {
    let clock = Clock::default();
    let line = SimLine {
        clock: clock.clone(),
        trains,
        direction: Direction::Input,
        driven: true,
        input_since: 0,
        starts: 0,
    };
    (line, SimDelay { clock })
}

/// The sensor's answer: a short wait, the acknowledge, then `bits` MSB first.
pub fn response(bytes: &[u8], bits: usize) -> Vec<(bool, u32)> {
    let mut train = vec![(true, 10), (false, 80), (true, 80)];
    for i in 0..bits {
        let bit = (bytes[i / 8] >> (7 - i % 8)) & 1;
        train.push((false, 50));
        train.push((true, if bit == 1 { ONE_HIGH } else { ZERO_HIGH }));
    }
    if bits == bytes.len() * 8 {
        train.push((false, 50));
    }
    train
}

/// A complete, well-formed answer for `bytes`.
pub fn frame(bytes: [u8; 5]) -> Vec<(bool, u32)> {
    response(&bytes, 40)
}
