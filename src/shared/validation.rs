//! Validation Utilities

use std::borrow::Cow;

use rust_decimal::Decimal;
use validator::{ValidationError, ValidationErrors};

use super::error::{AppError, FieldError};

/// Convert validation errors to AppError
pub fn validation_error(errors: ValidationErrors) -> AppError {
    let mut field_errors: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| FieldError {
                field: field.to_string(),
                message: e
                    .message
                    .clone()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string()),
            })
        })
        .collect();

    // field_errors() is backed by a HashMap
    field_errors.sort_by(|a, b| a.field.cmp(&b.field));

    AppError::Validation(field_errors)
}

/// Rejects strings made only of whitespace.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Largest magnitude a `NUMERIC(12, 2)` column holds is just below this.
const MONEY_LIMIT: i64 = 10_000_000_000;

fn money_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Accepts non-negative amounts that fit `NUMERIC(12, 2)` without rounding.
pub fn money_amount(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(money_error("negative", "Сумма не может быть отрицательной"));
    }
    if value.normalize().scale() > 2 {
        return Err(money_error(
            "scale",
            "Сумма может содержать не более двух знаков после запятой",
        ));
    }
    if *value >= Decimal::from(MONEY_LIMIT) {
        return Err(money_error("too_large", "Сумма должна быть меньше 10 000 000 000"));
    }
    Ok(())
}
