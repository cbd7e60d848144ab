/*!
    Time bases and timestamps.
*/

use std::fmt;
use std::time::Duration;

/**
    A rational number, used for stream time bases and frame rates.

    A time base of `1/90000` means one timestamp tick is 1/90000th of a second.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rational {
    pub num: i32,
    pub den: i32,
}

impl Rational {
    pub const fn new(num: i32, den: i32) -> Self {
        Self { num, den }
    }

    /**
        Returns true if both terms are non-zero, i.e. the value can be used
        as a time base.
    */
    pub const fn is_valid(self) -> bool {
        self.num != 0 && self.den != 0
    }

    pub const fn invert(self) -> Self {
        Self {
            num: self.den,
            den: self.num,
        }
    }

    pub fn to_f64(self) -> f64 {
        self.num as f64 / self.den as f64
    }

    /**
        Rescale a timestamp from the `from` time base to the `to` time base.

        Rounds to the nearest tick, with exact halves rounded away from zero,
        and clamps to the `i64` range instead of overflowing. A degenerate
        time base on either side leaves the timestamp unchanged.
    */
    pub fn rescale(ts: i64, from: Rational, to: Rational) -> i64 {
        if from == to || !from.is_valid() || !to.is_valid() {
            return ts;
        }

        let mut num = ts as i128 * from.num as i128 * to.den as i128;
        let mut den = from.den as i128 * to.num as i128;
        if den < 0 {
            num = -num;
            den = -den;
        }

        let magnitude = (num.abs() + den / 2) / den;
        let rounded = if num < 0 { -magnitude } else { magnitude };
        rounded.clamp(i64::MIN as i128, i64::MAX as i128) as i64
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

/**
    A presentation or decode timestamp, in stream time base ticks.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pts(pub i64);

impl Pts {
    /**
        Convert to wall-clock time. Returns `None` for negative timestamps.
    */
    pub fn to_duration(self, time_base: Rational) -> Option<Duration> {
        let micros = Rational::rescale(self.0, time_base, Rational::new(1, 1_000_000));
        u64::try_from(micros).ok().map(Duration::from_micros)
    }

    pub fn rescale(self, from: Rational, to: Rational) -> Self {
        Self(Rational::rescale(self.0, from, to))
    }
}

/**
    A duration in stream time base ticks.
*/
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MediaDuration(pub i64);

impl MediaDuration {
    pub fn rescale(self, from: Rational, to: Rational) -> Self {
        Self(Rational::rescale(self.0, from, to))
    }
}
