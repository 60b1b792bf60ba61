//! Timing and spin budgets of the read sequence.
//!
//! Pulse widths are not measured with a clock. The decoder spins on the line
//! and counts iterations, where one iteration is one pin read followed by a
//! `delay_us(1)`. A count is therefore at least one microsecond, plus however
//! long the host takes to read the pin. The budgets below are in those counts
//! and may need tuning for slow hosts or noisy schedulers.

/// Timing parameters for one read.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timing {
    /// How long the line is held high before the start signal, in µs.
    pub settle_us: u32,
    /// How long the start signal holds the line low, in ms.
    ///
    /// The datasheets ask for at least 18 ms.
    pub start_low_ms: u32,
    /// How long the host drives the line high before releasing it, in µs.
    pub release_us: u32,
    /// Number of 1 µs polls to wait for the sensor to acknowledge.
    pub ack_budget: u32,
    /// Maximum number of level transitions sampled per read.
    ///
    /// 4 leading transitions plus 2 per data bit need 84.
    pub max_transitions: u8,
    /// Count at which a pulse is considered stuck and sampling gives up.
    ///
    /// Reaching the cap stops sampling, so the largest usable pulse count is
    /// one less than this.
    pub max_pulse_count: u32,
    /// A high pulse counting more than this is a `1` bit.
    pub bit_threshold: u32,
}

impl Timing {
    /// Returns the default timing.
    pub const fn new() -> Self {
        Timing {
            settle_us: 500,
            start_low_ms: 20,
            release_us: 40,
            ack_budget: 50,
            max_transitions: 85,
            max_pulse_count: 255,
            bit_threshold: 20,
        }
    }

    /// Sets the number of polls allowed for the acknowledge.
    pub const fn with_ack_budget(mut self, polls: u32) -> Self {
        self.ack_budget = polls;
        self
    }

    /// Sets the per-pulse spin cap.
    pub const fn with_max_pulse_count(mut self, count: u32) -> Self {
        self.max_pulse_count = count;
        self
    }

    /// Sets the `0`/`1` classification threshold.
    pub const fn with_bit_threshold(mut self, count: u32) -> Self {
        self.bit_threshold = count;
        self
    }

    /// Sets the transition bound of the sampling loop.
    pub const fn with_max_transitions(mut self, transitions: u8) -> Self {
        self.max_transitions = transitions;
        self
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_budgets() {
        let timing = Timing::default();
        assert_eq!(timing, Timing::new());
        assert_eq!(timing.ack_budget, 50);
        assert_eq!(timing.max_transitions, 85);
        assert_eq!(timing.max_pulse_count, 255);
        assert_eq!(timing.bit_threshold, 20);
        // Room for the leading transitions and two per bit.
        assert!(usize::from(timing.max_transitions) >= 4 + 2 * 40);
    }

    #[test]
    fn test_builders() {
        let timing = Timing::new()
            .with_ack_budget(10)
            .with_max_pulse_count(1000)
            .with_bit_threshold(200)
            .with_max_transitions(100);

        assert_eq!(timing.ack_budget, 10);
        assert_eq!(timing.max_pulse_count, 1000);
        assert_eq!(timing.bit_threshold, 200);
        assert_eq!(timing.max_transitions, 100);
        assert_eq!(timing.start_low_ms, 20);
    }
}
