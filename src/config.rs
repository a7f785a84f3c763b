//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Engine-level configuration. Loading tick size / symbol configuration
// from an external source (env vars, a config file, a service) is out
// of scope for the core — this module only defines the value itself
// and how it derives a rounding precision.
//--------------------------------------------------------------------------------------------------

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Engine configuration. Currently just the tick size, but kept as its
/// own struct so a caller's front-end can grow it (symbol, lot size, ...)
/// without touching `OrderBook`'s constructor signature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Minimum price increment. Input prices are rounded to this
    /// granularity on entry.
    pub tick_size: Decimal,
}

impl Config {
    pub fn new(tick_size: Decimal) -> Self {
        assert!(tick_size > Decimal::ZERO, "tick_size must be positive");
        Self { tick_size }
    }

    /// Rounding precision `n = floor(log10(1 / tick_size))`, the number
    /// of decimal places an input price is rounded to.
    pub fn precision(&self) -> u32 {
        // tick_size is always a power of ten fraction in practice
        // (0.1, 0.01, 0.0001, ...); scale_for_tick derives the exponent
        // without a floating-point log10 call.
        let mut scale = self.tick_size.normalize().scale();
        // A tick_size >= 1 (e.g. `1`) rounds to whole numbers.
        if self.tick_size >= Decimal::ONE {
            scale = 0;
        }
        scale
    }

    pub fn round_price(&self, price: Decimal) -> Decimal {
        price.round_dp(self.precision())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(dec!(0.0001))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tick_size_rounds_to_four_places() {
        let config = Config::default();
        assert_eq!(config.precision(), 4);
        assert_eq!(config.round_price(dec!(100.123456)), dec!(100.1235));
    }

    #[test]
    fn coarser_tick_size_rounds_accordingly() {
        let config = Config::new(dec!(0.01));
        assert_eq!(config.precision(), 2);
        assert_eq!(config.round_price(dec!(100.129)), dec!(100.13));
    }

    #[test]
    #[should_panic(expected = "tick_size must be positive")]
    fn zero_tick_size_panics() {
        Config::new(Decimal::ZERO);
    }
}
