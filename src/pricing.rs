use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Tax owed on a price given a country tax rate expressed in percent.
pub fn tax_amount(price: Decimal, tax_rate_percent: Decimal) -> Decimal {
    (price * tax_rate_percent / Decimal::ONE_HUNDRED).round_dp(2)
}

/// Discount owed on a line total given a coupon percentage.
pub fn discount_amount(total: Decimal, discount_percent: Decimal) -> Decimal {
    (total * discount_percent / Decimal::ONE_HUNDRED).round_dp(2)
}

/// Human-facing order code handed to clients instead of the raw uuid.
pub fn build_order_oid(order_id: Uuid) -> String {
    let date = Utc::now().format("%Y%m%d");
    let suffix = order_id.to_string();
    let short = &suffix[..8];
    format!("ORD-{date}-{short}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn tax_for_ten_percent_country() {
        let tax = tax_amount(dec("100"), dec("10"));
        assert_eq!(tax, dec("10.00"));
        assert_eq!(dec("100") + tax, dec("110.00"));
    }

    #[test]
    fn tax_for_unknown_country_is_zero() {
        assert_eq!(tax_amount(dec("49.99"), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn twenty_percent_discount_on_taxed_total() {
        let discount = discount_amount(dec("110.00"), dec("20"));
        assert_eq!(discount, dec("22.00"));
        assert_eq!(dec("110.00") - discount, dec("88.00"));
    }

    #[test]
    fn discount_rounds_to_cents() {
        assert_eq!(discount_amount(dec("33.33"), dec("15")), dec("5.00"));
    }

    #[test]
    fn order_oid_shape() {
        let id = Uuid::new_v4();
        let oid = build_order_oid(id);
        assert!(oid.starts_with("ORD-"));
        assert!(oid.ends_with(&id.to_string()[..8]));
    }
}
