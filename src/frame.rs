//! The 40-bit data frame and its calibration into a [`Reading`].

use crate::error::DhtError;

/// Number of bits in a frame.
pub const FRAME_BITS: u8 = 40;

/// The supported sensor families.
///
/// Both send the same frame layout but encode the values differently.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SensorType {
    /// DHT11: whole percent and whole degrees.
    Dht11,
    /// DHT22: tenths of a percent and tenths of a degree, signed temperature.
    Dht22,
}

impl SensorType {
    /// The AM2302 is a DHT22 in a wired housing.
    pub const AM2302: SensorType = SensorType::Dht22;

    /// Looks up a sensor by its model number (11 or 22).
    pub const fn from_model(model: u8) -> Option<Self> {
        match model {
            11 => Some(SensorType::Dht11),
            22 => Some(SensorType::Dht22),
            _ => None,
        }
    }

    /// Returns the model number.
    pub const fn model(self) -> u8 {
        match self {
            SensorType::Dht11 => 11,
            SensorType::Dht22 => 22,
        }
    }
}

/// The five bytes sent by the sensor:
/// `[humidity_high, humidity_low, temp_high, temp_low, checksum]`.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RawFrame(pub [u8; 5]);

impl RawFrame {
    /// Low 8 bits of the sum of the four data bytes.
    pub fn checksum(&self) -> u8 {
        self.0[..4].iter().fold(0u8, |sum, v| sum.wrapping_add(*v))
    }

    /// Checks the checksum byte against the data.
    pub fn validate<E>(&self) -> Result<(), DhtError<E>> {
        let computed = self.checksum();
        let received = self.0[4];
        if computed == received {
            Ok(())
        } else {
            Err(DhtError::BadChecksum { computed, received })
        }
    }

    /// Converts the frame into a reading for the given sensor type.
    ///
    /// The checksum is not looked at; see [`RawFrame::validate`].
    pub fn calibrate(&self, sensor: SensorType) -> Reading {
        let [hum_hi, hum_lo, temp_hi, temp_lo, _] = self.0;

        match sensor {
            SensorType::Dht11 => Reading {
                humidity: f32::from(hum_hi),
                temperature: f32::from(temp_hi),
            },
            SensorType::Dht22 => {
                let joined_humidity = u16::from_be_bytes([hum_hi, hum_lo]);
                let humidity = f32::from(joined_humidity) / 10.0;

                let is_temp_negative = (temp_hi >> 7) != 0;
                let joined_temp = u16::from_be_bytes([temp_hi & 0b0111_1111, temp_lo]);
                let mut temperature = f32::from(joined_temp) / 10.0;
                if is_temp_negative {
                    temperature = -temperature;
                }

                Reading {
                    humidity,
                    temperature,
                }
            }
        }
    }
}

/// Reading returned by the sensor.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reading {
    /// Relative humidity in percent.
    pub humidity: f32,
    /// Temperature in degrees Celsius.
    pub temperature: f32,
}

impl Reading {
    /// Temperature in degrees Fahrenheit.
    pub fn temperature_fahrenheit(&self) -> f32 {
        self.temperature * 1.8 + 32.0
    }
}
