//! Display formatting: Indian-rupee amounts, `d/m/yyyy` dates, wallet labels.

use chrono::{DateTime, Datelike, TimeZone};
use rust_decimal::RoundingStrategy;

use crate::domain::Decimal;

/// Formats `amount` as rupees with Indian digit grouping, e.g. `₹12,34,567.80`.
pub fn format_currency(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    rounded.set_sign_positive(true);
    rounded.rescale(2);

    let text = rounded.to_string();
    let (integer, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!(
        "{}₹{}.{}",
        if negative { "-" } else { "" },
        group_indian(integer),
        fraction
    )
}

/// Last three digits form a group, every two digits before that another one.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (mut head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = vec![tail];
    while head.len() > 2 {
        let (rest, group) = head.split_at(head.len() - 2);
        groups.push(group);
        head = rest;
    }
    groups.push(head);
    groups.reverse();
    groups.join(",")
}

/// Day/month/year without padding, in the timestamp's own time zone.
pub fn format_date<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> String {
    format!(
        "{}/{}/{}",
        timestamp.day(),
        timestamp.month(),
        timestamp.year()
    )
}

/// `0x1234567890abcdef` -> `0x1234...cdef`
pub fn truncate_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

pub fn format_ether(balance: Decimal) -> String {
    let mut rounded = balance.round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(4);
    format!("{rounded} ETH")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_currency_groups_indian_style() {
        assert_eq!(format_currency(dec!(0)), "₹0.00");
        assert_eq!(format_currency(dec!(100)), "₹100.00");
        assert_eq!(format_currency(dec!(1000)), "₹1,000.00");
        assert_eq!(format_currency(dec!(100000)), "₹1,00,000.00");
        assert_eq!(format_currency(dec!(12345678.9)), "₹1,23,45,678.90");
    }

    #[test]
    fn test_format_currency_negative_and_rounding() {
        assert_eq!(format_currency(dec!(-100)), "-₹100.00");
        assert_eq!(format_currency(dec!(-1500.5)), "-₹1,500.50");
        assert_eq!(format_currency(dec!(2.345)), "₹2.35");
        assert_eq!(format_currency(dec!(-0.001)), "₹0.00");
    }

    #[test]
    fn test_format_date_is_day_month_year() {
        let timestamp = Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap();
        assert_eq!(format_date(&timestamp), "5/3/2024");
    }

    #[test]
    fn test_format_date_uses_given_zone() {
        let timestamp = Utc.with_ymd_and_hms(2024, 12, 31, 20, 0, 0).unwrap();
        let india = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        assert_eq!(format_date(&timestamp.with_timezone(&india)), "1/1/2025");
    }

    #[test]
    fn test_truncate_address() {
        assert_eq!(
            truncate_address("0x1234567890abcdef1234567890abcdef12345678"),
            "0x1234...5678"
        );
        assert_eq!(truncate_address("0xabc"), "0xabc");
    }

    #[test]
    fn test_format_ether() {
        assert_eq!(format_ether(dec!(1.5)), "1.5000 ETH");
        assert_eq!(format_ether(dec!(0.123456)), "0.1235 ETH");
        assert_eq!(format_ether(dec!(0)), "0.0000 ETH");
    }
}
