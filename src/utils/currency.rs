//! LKR display formatting
//!
//! One fixed convention: "LKR" prefix, comma-grouped thousands, zero
//! decimal places. Formatting is presentation only and never feeds back
//! into the cost math.

/// Format an LKR amount for display, rounding to whole rupees.
///
/// `format_lkr(6_288_000.0)` → `"LKR 6,288,000"`; negative amounts keep
/// a leading minus: `"-LKR 1,500"`.
pub fn format_lkr(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}LKR {grouped}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands_with_no_decimals() {
        assert_eq!(format_lkr(6_288_000.0), "LKR 6,288,000");
        assert_eq!(format_lkr(104.8), "LKR 105");
        assert_eq!(format_lkr(0.0), "LKR 0");
        assert_eq!(format_lkr(999.0), "LKR 999");
        assert_eq!(format_lkr(1_000.0), "LKR 1,000");
    }

    #[test]
    fn negative_amounts_keep_the_sign() {
        assert_eq!(format_lkr(-1_500.0), "-LKR 1,500");
    }
}
