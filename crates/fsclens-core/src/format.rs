//! Display formatting for fine amounts.
//!
//! The backend stores fines in won. The UI shows them in units of 만원
//! (10,000 won) with thousands separators, so `7413000000` reads as
//! `741,300`.
//!
//! # Rules
//!
//! - `None` and `Some(0)` both render as [`NO_AMOUNT`].
//! - The integer part is grouped in threes with `,`.
//! - A remainder below one 만원 is shown with at most three fractional
//!   digits, rounded half-up, trailing zeros trimmed.

/// Placeholder for a missing or zero amount.
pub const NO_AMOUNT: &str = "—";

/// Won per display unit (만원).
pub const WON_PER_UNIT: u64 = 10_000;

/// Format a fine amount in won for display in 만원.
pub fn format_fine_amount(amount: Option<u64>) -> String {
    match amount {
        None | Some(0) => NO_AMOUNT.to_string(),
        Some(won) => format_units(won),
    }
}

/// Format a fine amount followed by the 만원 suffix, or [`NO_AMOUNT`].
pub fn format_fine_amount_with_unit(amount: Option<u64>) -> String {
    match amount {
        None | Some(0) => NO_AMOUNT.to_string(),
        Some(won) => format!("{}만원", format_units(won)),
    }
}

fn format_units(won: u64) -> String {
    let mut whole = won / WON_PER_UNIT;
    // Four remainder digits, rounded to three.
    let mut frac = (won % WON_PER_UNIT + 5) / 10;
    if frac == 1000 {
        whole += 1;
        frac = 0;
    }

    let mut out = group_thousands(whole);
    if frac > 0 {
        let digits = format!("{frac:03}");
        out.push('.');
        out.push_str(digits.trim_end_matches('0'));
    }
    out
}

/// Insert `,` every three digits from the right.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn large_fine_in_man_won() {
        assert_eq!(format_fine_amount(Some(7_413_000_000)), "741,300");
    }

    #[test]
    fn zero_and_absent_render_dash() {
        assert_eq!(format_fine_amount(Some(0)), "—");
        assert_eq!(format_fine_amount(None), "—");
        assert_eq!(format_fine_amount_with_unit(None), "—");
    }

    #[test]
    fn small_amounts_keep_fraction() {
        assert_eq!(format_fine_amount(Some(5_000)), "0.5");
        assert_eq!(format_fine_amount(Some(12_345)), "1.235");
        assert_eq!(format_fine_amount(Some(12_300)), "1.23");
    }

    #[test]
    fn rounding_carries_into_whole_part() {
        assert_eq!(format_fine_amount(Some(19_999)), "2");
    }

    #[test]
    fn unit_suffix() {
        assert_eq!(format_fine_amount_with_unit(Some(50_000_000)), "5,000만원");
    }

    #[test]
    fn grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }
}
