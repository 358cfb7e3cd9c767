//! Display formatting for prices, counts and dates.
//!
//! Monetary values render with two fixed decimals. Large counts (volume,
//! market cap) switch to lakh (`L`, 10^5) and crore (`Cr`, 10^7) units and
//! otherwise use en-IN digit grouping (`12,34,567`).

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

const LAKH: Decimal = Decimal::from_parts(100_000, 0, 0, false, 0);
const CRORE: Decimal = Decimal::from_parts(10_000_000, 0, 0, false, 0);

/// Two-decimal fixed point, rounding half away from zero.
pub fn format_fixed(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

pub fn format_currency(value: Decimal) -> String {
    format!("₹{}", format_fixed(value))
}

pub fn format_percent(value: Decimal) -> String {
    format!("{}%", format_fixed(value))
}

/// Abbreviates counts of a lakh or more, grouping digits en-IN style below that.
pub fn format_large_number(value: Decimal) -> String {
    if value >= CRORE {
        format!("{} Cr", format_fixed(value / CRORE))
    } else if value >= LAKH {
        format!("{} L", format_fixed(value / LAKH))
    } else {
        format_grouped(value)
    }
}

/// en-IN grouping with at most three fraction digits, trailing zeros trimmed.
pub fn format_grouped(value: Decimal) -> String {
    let rounded = value
        .round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let text = rounded.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (text.as_str(), None),
    };

    let mut grouped = group_indian(int_part);
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    if rounded.is_sign_negative() && !rounded.is_zero() {
        grouped.insert(0, '-');
    }
    grouped
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// Chart tick label, e.g. `05 Jan`.
pub fn format_axis_date(date: DateTime<Utc>) -> String {
    date.format("%d %b").to_string()
}

/// News card date, e.g. `Jan 5, 2024`.
pub fn format_news_date(date: DateTime<Utc>) -> String {
    date.format("%b %-d, %Y").to_string()
}
