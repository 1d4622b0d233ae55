//! Input limits
//!
//! Enforced by the application layer before anything reaches the store.
//! Violations return `Error::InvalidInput`.

use crate::error::{Error, Result};
use crate::category::Category;
use crate::price::Price;

/// Largest accepted product price
///
/// With one price per category the largest possible brand total is
/// `MAX_PRICE * Category::ALL.len()`, well inside `u64`.
pub const MAX_PRICE: Price = 1_000_000_000_000;

/// Longest accepted brand name, in characters
pub const MAX_BRAND_NAME_CHARS: usize = 64;

// Keeps the sum of one price per category from overflowing.
const _: () = assert!(MAX_PRICE.checked_mul(Category::ALL.len() as u64).is_some());

/// Validate a product price
pub fn validate_price(price: Price) -> Result<()> {
    if price > MAX_PRICE {
        return Err(Error::invalid_input(format!(
            "price must be between 0 and {}, got {}",
            MAX_PRICE, price
        )));
    }
    Ok(())
}

/// Validate and normalize a brand name
///
/// Returns the trimmed name.
pub fn validate_brand_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_input("brand name must not be blank"));
    }
    let chars = trimmed.chars().count();
    if chars > MAX_BRAND_NAME_CHARS {
        return Err(Error::invalid_input(format!(
            "brand name must be at most {} characters, got {}",
            MAX_BRAND_NAME_CHARS, chars
        )));
    }
    Ok(trimmed.to_string())
}
