//! Implied fundamental value derivation
//!
//! Backs the fundamental out of a price and a valuation multiple, e.g.
//! implied EPS = Price / (P/E) or implied revenue-per-share = Price / (P/S).

/// Implied fundamental value from a price and a valuation multiple.
///
/// Defined only when both inputs are strictly positive and finite;
/// absence is represented as `None`, never signaled as an error. A
/// non-positive multiple (e.g. a P/E from negative earnings) has no
/// meaningful implied fundamental.
pub fn implied_value(price: f64, multiple: f64) -> Option<f64> {
    if price > 0.0 && multiple > 0.0 && price.is_finite() && multiple.is_finite() {
        Some(price / multiple)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_implied_value_positive_inputs() {
        assert_eq!(implied_value(100.0, 10.0), Some(10.0));
        assert_eq!(implied_value(150.0, 12.0), Some(12.5));
    }

    #[test]
    fn test_implied_value_non_positive_inputs() {
        assert_eq!(implied_value(0.0, 10.0), None);
        assert_eq!(implied_value(-5.0, 10.0), None);
        assert_eq!(implied_value(100.0, 0.0), None);
        assert_eq!(implied_value(100.0, -20.0), None);
    }

    #[test]
    fn test_implied_value_non_finite_inputs() {
        assert_eq!(implied_value(f64::NAN, 10.0), None);
        assert_eq!(implied_value(100.0, f64::NAN), None);
        assert_eq!(implied_value(f64::INFINITY, 10.0), None);
        assert_eq!(implied_value(100.0, f64::INFINITY), None);
    }
}
