use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use validator::ValidationError;

use crate::error::{Result, StoreError};

pub(crate) fn not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Prices must be non-negative and survive the REAL price columns unchanged.
pub(crate) fn check_price(price: Decimal) -> Result<()> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(StoreError::validation(format!(
            "price must not be negative, got {price}"
        )));
    }
    let stored = price.to_f64().and_then(|f| Decimal::try_from(f).ok());
    if stored != Some(price) {
        return Err(StoreError::validation(format!(
            "price {price} has more precision than can be stored"
        )));
    }
    Ok(())
}

pub(crate) fn positive_quantity(quantity: i32) -> Result<()> {
    if quantity <= 0 {
        return Err(StoreError::validation(format!(
            "quantity must be greater than 0, got {quantity}"
        )));
    }
    Ok(())
}

pub(crate) fn trimmed(value: String) -> String {
    value.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_strings_are_rejected() {
        assert!(not_blank("").is_err());
        assert!(not_blank("   ").is_err());
        assert!(not_blank("Books").is_ok());
    }

    #[test]
    fn zero_price_is_allowed() {
        assert!(check_price(Decimal::ZERO).is_ok());
        assert!(check_price(Decimal::new(1999, 2)).is_ok());
        assert!(matches!(
            check_price(Decimal::new(-1, 2)),
            Err(StoreError::Validation(_))
        ));
    }

    #[test]
    fn price_must_fit_storage_precision() {
        assert!(check_price(Decimal::new(10, 2)).is_ok());
        assert!(check_price(Decimal::new(123456789, 2)).is_ok());
        assert!(matches!(
            check_price(Decimal::new(1234567890123456789, 2)),
            Err(StoreError::Validation(_))
        ));
    }

    #[test]
    fn quantity_must_be_positive() {
        assert!(positive_quantity(1).is_ok());
        assert!(positive_quantity(0).is_err());
        assert!(positive_quantity(-3).is_err());
    }

    #[test]
    fn trimmed_strips_surrounding_whitespace() {
        assert_eq!(trimmed("  Shirt ".to_string()), "Shirt");
        assert_eq!(trimmed("Hammer".to_string()), "Hammer");
    }
}
