//! Prices
//!
//! Prices are whole numbers in the smallest currency unit. Totals are sums of
//! at most one price per category.

/// Price in the smallest currency unit
pub type Price = u64;

/// Format a price with thousands separators: `1234567` → `"1,234,567"`
pub fn format_price(price: Price) -> String {
    let digits = price.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
