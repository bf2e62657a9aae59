//! Price formatting. Storefront prices are integer minor units (cents).

/// `$1,234.56` style formatting with a currency symbol prefix.
#[must_use]
pub fn format_money(cents: u64, symbol: &str) -> String {
    let whole = group_thousands(cents / 100);
    format!("{symbol}{whole}.{:02}", cents % 100)
}

/// Plain two-decimal amount, no symbol or grouping: `1234.56`.
#[must_use]
pub fn format_decimal(cents: u64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
#[path = "money_test.rs"]
mod tests;
