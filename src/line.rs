//! The single-wire data line.
//!
//! `embedded-hal` has traits for reading and driving a pin, but none for
//! switching a pin between input and output at run time. The DHT protocol
//! needs exactly that: the host drives the start signal, then lets go of the
//! line so the sensor can answer on it. [`Line`] fills that gap.

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

/// Direction of the data line.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// The host listens and the sensor drives the line.
    Input,
    /// The host drives the line.
    Output,
}

/// A bidirectional GPIO line.
pub trait Line: InputPin + OutputPin {
    /// Reconfigures the pin for the given direction.
    fn set_direction(&mut self, direction: Direction) -> Result<(), Self::Error>;
}

impl<T: Line + ?Sized> Line for &mut T {
    #[inline]
    fn set_direction(&mut self, direction: Direction) -> Result<(), Self::Error> {
        T::set_direction(self, direction)
    }
}

/// Adapter for a pin configured as open-drain output with a pull-up.
///
/// An open-drain pin never needs reconfiguring: driving it high releases the
/// line, and the pull-up keeps it high until the sensor pulls it low. Its
/// level can be read back at any time. Most MCU HALs hand out pins like this,
/// e.g. `Flex` or `OutputOpenDrain` pins.
#[derive(Debug)]
pub struct OpenDrainLine<P> {
    pin: P,
}

impl<P> OpenDrainLine<P>
where
    P: InputPin + OutputPin,
{
    /// Wraps an open-drain pin.
    pub fn new(pin: P) -> Self {
        OpenDrainLine { pin }
    }

    /// Borrows the wrapped pin.
    pub fn inner(&mut self) -> &mut P {
        &mut self.pin
    }

    /// Gives the wrapped pin back.
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: ErrorType> ErrorType for OpenDrainLine<P> {
    type Error = P::Error;
}

impl<P: InputPin> InputPin for OpenDrainLine<P> {
    #[inline]
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.pin.is_high()
    }

    #[inline]
    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.pin.is_low()
    }
}

impl<P: OutputPin> OutputPin for OpenDrainLine<P> {
    #[inline]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.pin.set_low()
    }

    #[inline]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.pin.set_high()
    }
}

impl<P> Line for OpenDrainLine<P>
where
    P: InputPin + OutputPin,
{
    fn set_direction(&mut self, direction: Direction) -> Result<(), Self::Error> {
        match direction {
            // Release the line to the pull-up.
            Direction::Input => self.pin.set_high(),
            Direction::Output => Ok(()),
        }
    }
}
