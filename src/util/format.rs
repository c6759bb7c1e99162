//! Display formatting for dashboard values.

#[cfg(test)]
#[path = "format_test.rs"]
mod format_test;

use time::{Date, Month};

pub const RUPEE: char = '₹';

/// Format an amount with Indian digit grouping, e.g. `₹1,25,000` or
/// `₹12,34,567.5`. At most two fraction digits are kept.
#[must_use]
pub fn format_inr(amount: f64) -> String {
    if !amount.is_finite() {
        return format!("{RUPEE}0");
    }
    let rounded = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');
    let negative = amount < 0.0 && (int_part != "0" || !frac.is_empty());

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push(RUPEE);
    out.push_str(&group_indian(int_part));
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Insert separators: last three digits, then groups of two.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_owned();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (left, right) = rest.split_at(rest.len() - 2);
        groups.push(right);
        rest = left;
    }
    if !rest.is_empty() {
        groups.push(rest);
    }
    groups.reverse();
    format!("{},{tail}", groups.join(","))
}

/// `"Oct 2026"` style month and year.
#[must_use]
pub fn month_year(date: Date) -> String {
    format!("{} {}", month_abbrev(date.month()), date.year())
}

fn month_abbrev(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}

/// Avatar letter: the first character, uppercased.
#[must_use]
pub fn initial(username: &str) -> String {
    username.chars().next().map(|c| c.to_uppercase().collect()).unwrap_or_default()
}
