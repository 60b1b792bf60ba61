use embedded_hal::{delay::DelayNs, digital::PinState};

use crate::error::DhtError;
use crate::frame::{FRAME_BITS, RawFrame, Reading, SensorType};
use crate::line::{Direction, Line};
use crate::retry::RetryPolicy;
use crate::timing::Timing;

/// Transitions seen before the first data bit.
///
/// The rest of the host's release pulse, the sensor's 80us low and 80us high
/// acknowledge, and the low separator of the first bit-cell.
const LEADING_TRANSITIONS: u8 = 4;

/// Driver for the DHT11 and DHT22 temperature and humidity sensors.
pub struct Dht<LINE, D> {
    line: LINE,
    delay: D,
    sensor: SensorType,
    timing: Timing,
}

/// State of one read attempt.
///
/// Lives on the stack of [`Dht::read_frame`] and is dropped with it, so
/// nothing carries over from one attempt to the next.
struct Session {
    /// Level the line is expected to hold during the pulse being measured.
    level: PinState,
    /// Number of bits classified so far.
    bits: u8,
    frame: RawFrame,
}

impl Session {
    fn new() -> Self {
        Session {
            // The host released the line high before listening.
            level: PinState::High,
            bits: 0,
            frame: RawFrame::default(),
        }
    }

    fn push_bit(&mut self, bit: bool) {
        if let Some(byte) = self.frame.0.get_mut(usize::from(self.bits / 8)) {
            *byte = (*byte << 1) | u8::from(bit);
            self.bits += 1;
        }
    }

    fn is_complete(&self) -> bool {
        self.bits >= FRAME_BITS
    }

    fn finish<E>(self) -> Result<RawFrame, DhtError<E>> {
        if !self.is_complete() {
            warn!("incomplete frame: {} bits", self.bits);
            return Err(DhtError::IncompleteFrame { bits: self.bits });
        }

        let [b0, b1, b2, b3, b4] = self.frame.0;
        debug!("frame: {} {} {} {} {}", b0, b1, b2, b3, b4);

        if let Err(e) = self.frame.validate() {
            warn!("checksum mismatch: computed {}, received {}", self.frame.checksum(), b4);
            return Err(e);
        }
        Ok(self.frame)
    }
}

impl<LINE, DELAY, E> Dht<LINE, DELAY>
where
    LINE: Line<Error = E>,
    DELAY: DelayNs,
{
    /// Creates a new instance of the driver with the default [`Timing`].
    ///
    /// # Arguments
    ///
    /// * `sensor` - Which sensor family is attached. Selects the calibration.
    /// * `line` - The GPIO line connected to the sensor's data pin.
    /// * `delay` - A delay provider implementing the `DelayNs` trait.
    pub fn new(sensor: SensorType, line: LINE, delay: DELAY) -> Self {
        Dht {
            line,
            delay,
            sensor,
            timing: Timing::new(),
        }
    }

    /// Replaces the timing parameters.
    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    /// The sensor family this driver decodes for.
    pub fn sensor_type(&self) -> SensorType {
        self.sensor
    }

    /// The timing parameters in use.
    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    /// Gives back the line and the delay provider.
    pub fn release(self) -> (LINE, DELAY) {
        (self.line, self.delay)
    }

    /// Reads a temperature and humidity measurement from the sensor.
    ///
    /// This method performs the complete communication sequence:
    /// sending the start signal, waiting for the sensor's acknowledge,
    /// sampling 40 bits, validating the checksum, and calibrating the result.
    ///
    /// Timing matters here. The caller should keep the thread from being
    /// preempted for the ~25 ms this takes, and give the sensor time between
    /// reads (at least 1 s for a DHT11, 2 s for a DHT22).
    ///
    /// # Returns
    ///
    /// * `Ok(Reading)` if the read is successful and the checksum is valid.
    /// * `Err(DhtError)` if a communication or checksum error occurs.
    pub fn read(&mut self) -> Result<Reading, DhtError<E>> {
        let frame = self.read_frame()?;
        Ok(frame.calibrate(self.sensor))
    }

    /// Like [`Dht::read`], but returns the validated frame without calibrating it.
    pub fn read_frame(&mut self) -> Result<RawFrame, DhtError<E>> {
        self.start()?;
        self.wait_for_ack()?;

        let session = self.sample()?;
        session.finish()
    }

    /// Calls [`Dht::read`] until it succeeds, pausing between attempts.
    ///
    /// Pin errors are returned at once. Otherwise the error of the last
    /// attempt is returned when all attempts fail.
    pub fn read_with_retry(&mut self, policy: &RetryPolicy) -> Result<Reading, DhtError<E>> {
        let attempts = policy.attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.read() {
                Ok(reading) => return Ok(reading),
                Err(e) if !e.is_retryable() || attempt >= attempts => return Err(e),
                Err(e) => {
                    let pause = policy.pause_after(&e);
                    debug!("attempt {} failed, retrying in {} ms", attempt, pause);
                    if pause > 0 {
                        self.delay.delay_ms(pause);
                    }
                    attempt += 1;
                }
            }
        }
    }

    /// Sends the start signal and releases the line to the sensor.
    ///
    /// The line is held high to settle the bus, pulled low long enough for
    /// the sensor to notice, then driven high briefly and switched to input.
    fn start(&mut self) -> Result<(), DhtError<E>> {
        self.line.set_direction(Direction::Output)?;
        self.line.set_high()?;
        self.delay.delay_us(self.timing.settle_us);

        // MCU sends start request
        self.line.set_low()?;
        self.delay.delay_ms(self.timing.start_low_ms);
        self.line.set_high()?;
        self.delay.delay_us(self.timing.release_us);

        self.line.set_direction(Direction::Input)?;
        Ok(())
    }

    /// Waits for the sensor to pull the line low.
    ///
    /// # Errors
    ///
    /// Returns `DhtError::NoResponse` if the ack budget runs out first.
    fn wait_for_ack(&mut self) -> Result<(), DhtError<E>> {
        for _ in 0..self.timing.ack_budget {
            if self.line.is_low()? {
                return Ok(());
            }
            self.delay.delay_us(1);
        }
        warn!("no response after {} polls", self.timing.ack_budget);
        Err(DhtError::NoResponse)
    }

    /// Samples level transitions and classifies the data bits.
    ///
    /// Stops after the last bit, after `max_transitions`, or at the first
    /// pulse that outlasts `max_pulse_count`. The returned session holds
    /// however many bits were collected.
    fn sample(&mut self) -> Result<Session, DhtError<E>> {
        let mut session = Session::new();

        for transition in 0..self.timing.max_transitions {
            let Some(count) = self.measure_pulse(session.level)? else {
                warn!(
                    "pulse {} exceeded {} counts after {} bits",
                    transition, self.timing.max_pulse_count, session.bits
                );
                break;
            };
            session.level = !session.level;

            // Data lives in the high half of each bit-cell.
            if transition >= LEADING_TRANSITIONS && (transition - LEADING_TRANSITIONS) % 2 == 0 {
                let bit = count > self.timing.bit_threshold;
                trace!("bit {}: {} counts -> {}", session.bits, count, u8::from(bit));
                session.push_bit(bit);
                if session.is_complete() {
                    break;
                }
            } else {
                trace!("pulse {}: {} counts", transition, count);
            }
        }

        Ok(session)
    }

    /// Counts how long the line stays at `level`.
    ///
    /// Returns `None` once the count reaches `max_pulse_count`, so the
    /// largest count ever returned is `max_pulse_count - 1`.
    fn measure_pulse(&mut self, level: PinState) -> Result<Option<u32>, DhtError<E>> {
        let mut count = 0;
        while PinState::from(self.line.is_high()?) == level {
            count += 1;
            self.delay.delay_us(1);
            if count >= self.timing.max_pulse_count {
                return Ok(None);
            }
        }
        Ok(Some(count))
    }
}

/// Performs a single read on `line` with the default timing.
///
/// Shorthand for `Dht::new(sensor, line, delay).read()`.
pub fn read<LINE, DELAY, E>(
    line: LINE,
    delay: DELAY,
    sensor: SensorType,
) -> Result<Reading, DhtError<E>>
where
    LINE: Line<Error = E>,
    DELAY: DelayNs,
{
    Dht::new(sensor, line, delay).read()
}
