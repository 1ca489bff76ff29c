use rust_decimal::{Decimal, RoundingStrategy};

/// Billed amount for `units` at `unit_rate`, rounded up to the cent and
/// always carrying two decimal places.
///
/// Rounding is toward positive infinity, never to nearest: 10.005 bills as
/// 10.01 and 10.001 bills as 10.01 as well.
pub fn compute_billed_amount(unit_rate: Decimal, units: Decimal) -> Decimal {
    let mut amount =
        (unit_rate * units).round_dp_with_strategy(2, RoundingStrategy::ToPositiveInfinity);
    amount.rescale(2);
    amount
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn exact_cents_are_kept() {
        assert_eq!(compute_billed_amount(dec("12.335"), dec("2")), dec("24.67"));
        assert_eq!(compute_billed_amount(dec("12.50"), dec("4")), dec("50"));
    }

    #[test]
    fn fractions_of_a_cent_round_up() {
        assert_eq!(compute_billed_amount(dec("10.005"), dec("1")), dec("10.01"));
        assert_eq!(compute_billed_amount(dec("10.001"), dec("1")), dec("10.01"));
        assert_eq!(compute_billed_amount(dec("7.33"), dec("0.25")), dec("1.84"));
    }

    #[test]
    fn amounts_print_with_cents() {
        assert_eq!(compute_billed_amount(dec("12"), dec("4")).to_string(), "48.00");
        assert_eq!(compute_billed_amount(dec("12.335"), dec("2")).to_string(), "24.67");
    }

    #[test]
    fn zero_units_bill_nothing() {
        assert_eq!(compute_billed_amount(dec("12.50"), Decimal::ZERO), Decimal::ZERO);
    }
}
