/// Q32.32 fixed-point time duration in microseconds.
///
/// Storage: `u64` with 32 integer bits + 32 fractional bits.
/// Base unit: microseconds (1 second = 1,000,000 us).
/// Range: 0 to ~4294 seconds with sub-microsecond precision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Micros(u64);

impl Micros {
    const FRAC_BITS: u32 = 32;
    const MICROS_PER_SEC: u64 = 1_000_000;

    /// Sentinel used for a duration that never elapses (`game_speed == 0`, §4.3).
    pub const MAX: Self = Self(u64::MAX);

    pub const ZERO: Self = Self(0);

    /// Create from whole seconds.
    pub const fn from_secs(secs: u32) -> Self {
        Self((secs as u64 * Self::MICROS_PER_SEC) << Self::FRAC_BITS)
    }

    /// Create from whole milliseconds.
    pub const fn from_millis(millis: u32) -> Self {
        Self((millis as u64 * 1_000) << Self::FRAC_BITS)
    }

    /// Create from whole microseconds.
    pub const fn from_micros(micros: u32) -> Self {
        Self((micros as u64) << Self::FRAC_BITS)
    }

    /// Build a duration from a base number of seconds scaled by `1 / game_speed`
    /// (the `ts = 1/game_speed` rule of §4.3). `game_speed == 0` yields `MAX`.
    pub fn scaled_secs(base_secs: f64, game_speed: u32) -> Self {
        if game_speed == 0 {
            return Self::MAX;
        }
        let secs = base_secs / game_speed as f64;
        let micros = (secs * Self::MICROS_PER_SEC as f64).max(0.0);
        Self(((micros as u64) << Self::FRAC_BITS).min(u64::MAX))
    }

    /// Convert to tick count at the given tick rate.
    ///
    /// Formula: ticks = (micros * tick_hz) / MICROS_PER_SEC, using a 128-bit
    /// intermediate to avoid overflow.
    pub const fn to_ticks(self, tick_hz: u32) -> u64 {
        if self.0 == u64::MAX {
            return u64::MAX;
        }
        let numer = self.0 as u128 * tick_hz as u128;
        let denom = Self::MICROS_PER_SEC << Self::FRAC_BITS;
        (numer / denom as u128) as u64
    }

    /// Returns the raw Q32.32 value.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl core::ops::Add for Micros {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl core::ops::Sub for Micros {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}
