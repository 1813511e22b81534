use serde::{Serialize, Serializer};
use vodca::{AsRefln, Fromln};

/// Price in cents. Stored as `NUMERIC(10, 2)`, so it never passes through a
/// binary float on its way to or from the store.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Fromln, AsRefln)]
pub struct BookPrice(i64);

impl BookPrice {
    /// Largest value `NUMERIC(10, 2)` can hold.
    pub const MAX_CENTS: i64 = 99_999_999_99;

    pub fn from_cents(cents: impl Into<i64>) -> Self {
        Self(cents.into())
    }

    /// Rounds `value` to two decimal places.
    pub fn from_decimal(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let cents = (value * 100.0).round();
        if cents.abs() > Self::MAX_CENTS as f64 {
            return None;
        }
        Some(Self(cents as i64))
    }

    pub fn cents(&self) -> i64 {
        self.0
    }

    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl Serialize for BookPrice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_decimal().serialize(serializer)
    }
}

#[cfg(test)]
mod test {
    use super::BookPrice;

    #[test]
    fn decimal_round_trip_is_exact() {
        let price = BookPrice::from_decimal(69.99).unwrap();
        assert_eq!(price.cents(), 6999);
        assert_eq!(price.to_decimal(), 69.99);

        let price = BookPrice::from_decimal(0.1 + 0.2).unwrap();
        assert_eq!(price.cents(), 30);
        assert_eq!(price.to_decimal(), 0.3);
    }

    #[test]
    fn rounds_to_two_places() {
        assert_eq!(BookPrice::from_decimal(1.005).unwrap().cents(), 100);
        assert_eq!(BookPrice::from_decimal(1.006).unwrap().cents(), 101);
        assert_eq!(BookPrice::from_decimal(69.0).unwrap().cents(), 6900);
    }

    #[test]
    fn rejects_values_the_store_cannot_hold() {
        assert!(BookPrice::from_decimal(f64::NAN).is_none());
        assert!(BookPrice::from_decimal(f64::INFINITY).is_none());
        assert!(BookPrice::from_decimal(1e12).is_none());
    }

    #[test]
    fn serializes_as_number() {
        let json = serde_json::to_string(&BookPrice::from_cents(6999)).unwrap();
        assert_eq!(json, "69.99");
        let json = serde_json::to_string(&BookPrice::from_cents(6900)).unwrap();
        assert_eq!(json, "69.0");
    }
}
