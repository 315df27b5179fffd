//! Coercion and validation of submitted invoice forms.
//!
//! Every field is checked on each call so the form can be re-rendered with
//! all of its problems at once.

use std::str::FromStr;

use bigdecimal::{BigDecimal, RoundingMode, ToPrimitive};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::invoice::InvoiceStatus;

pub const CUSTOMER_REQUIRED: &str = "Please select a customer.";
pub const AMOUNT_BLANK: &str = "Amount field cannot be blank.";
pub const AMOUNT_NOT_POSITIVE: &str = "Please enter an amount greater than $0.";
pub const STATUS_INVALID: &str = "Please select an invoice status.";

/// Largest accepted number of digits before the decimal point.
const MAX_INTEGER_DIGITS: i64 = 12;
/// Largest accepted number of digits after the decimal point.
const MAX_FRACTION_DIGITS: i64 = 12;

/// Raw invoice form fields as submitted by the browser.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceForm {
    pub customer_id: Option<String>,
    pub amount: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceField {
    CustomerId,
    Amount,
    Status,
}

/// Validation messages keyed by field, in the order they were produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Vec<String>>,
}

impl FieldErrors {
    pub fn push(&mut self, field: InvoiceField, message: impl Into<String>) {
        let slot = match field {
            InvoiceField::CustomerId => &mut self.customer_id,
            InvoiceField::Amount => &mut self.amount,
            InvoiceField::Status => &mut self.status,
        };
        slot.get_or_insert_with(Vec::new).push(message.into());
    }

    pub fn get(&self, field: InvoiceField) -> &[String] {
        let slot = match field {
            InvoiceField::CustomerId => &self.customer_id,
            InvoiceField::Amount => &self.amount,
            InvoiceField::Status => &self.status,
        };
        slot.as_deref().unwrap_or_default()
    }
}

/// A form that passed validation, with its fields coerced.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedInvoice {
    pub customer_id: String,
    pub amount: BigDecimal,
    pub status: InvoiceStatus,
}

impl ValidatedInvoice {
    /// `round(amount * 100)`, half away from zero. `None` when the result does
    /// not fit in an `i64`, which the digit bounds on coercion rule out for
    /// validated amounts.
    pub fn amount_in_cents(&self) -> Option<i64> {
        (&self.amount * BigDecimal::from(100))
            .with_scale_round(0, RoundingMode::HalfUp)
            .to_i64()
    }
}

pub fn validate_invoice(form: &InvoiceForm) -> Result<ValidatedInvoice, FieldErrors> {
    let mut errors = FieldErrors::default();

    let customer_id = match form.customer_id.as_deref() {
        Some(id) if !id.is_empty() => Some(id.to_string()),
        _ => {
            errors.push(InvoiceField::CustomerId, CUSTOMER_REQUIRED);
            None
        }
    };

    let amount = match coerce_amount(form.amount.as_deref()) {
        Some(amount) if amount > BigDecimal::from(0) => Some(amount),
        Some(_) => {
            errors.push(InvoiceField::Amount, AMOUNT_NOT_POSITIVE);
            None
        }
        None => {
            errors.push(InvoiceField::Amount, AMOUNT_BLANK);
            None
        }
    };

    let status = match form.status.as_deref().map(InvoiceStatus::from_str) {
        Some(Ok(status)) => Some(status),
        _ => {
            errors.push(InvoiceField::Status, STATUS_INVALID);
            None
        }
    };

    match (customer_id, amount, status) {
        (Some(customer_id), Some(amount), Some(status)) => Ok(ValidatedInvoice {
            customer_id,
            amount,
            status,
        }),
        _ => Err(errors),
    }
}

fn coerce_amount(raw: Option<&str>) -> Option<BigDecimal> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        return None;
    }
    BigDecimal::from_str(trimmed).ok().filter(within_bounds)
}

/// Rejects exponents that would make scaling to cents arbitrarily expensive,
/// e.g. `1e100000000`, before any arithmetic touches the value.
fn within_bounds(amount: &BigDecimal) -> bool {
    let (_, scale) = amount.as_bigint_and_exponent();
    let integer_digits = amount.digits() as i64 - scale;
    scale <= MAX_FRACTION_DIGITS && integer_digits <= MAX_INTEGER_DIGITS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(customer_id: Option<&str>, amount: Option<&str>, status: Option<&str>) -> InvoiceForm {
        InvoiceForm {
            customer_id: customer_id.map(str::to_string),
            amount: amount.map(str::to_string),
            status: status.map(str::to_string),
        }
    }

    #[test]
    fn accepts_a_complete_form() {
        let valid = validate_invoice(&form(Some("c1"), Some("49.99"), Some("paid")))
            .expect("form should validate");
        assert_eq!(valid.customer_id, "c1");
        assert_eq!(valid.status, InvoiceStatus::Paid);
        assert_eq!(valid.amount_in_cents(), Some(4999));
    }

    #[test]
    fn zero_amount_is_not_positive() {
        let errors = validate_invoice(&form(Some("c1"), Some("0"), Some("paid"))).unwrap_err();
        assert_eq!(errors.get(InvoiceField::Amount), [AMOUNT_NOT_POSITIVE]);
        assert!(errors.customer_id.is_none());
        assert!(errors.status.is_none());
    }

    #[test]
    fn negative_amount_is_not_positive() {
        let errors = validate_invoice(&form(Some("c1"), Some("-12.50"), Some("pending"))).unwrap_err();
        assert_eq!(errors.get(InvoiceField::Amount), [AMOUNT_NOT_POSITIVE]);
    }

    #[test]
    fn missing_blank_or_garbage_amount_reports_blank() {
        for raw in [None, Some(""), Some("   "), Some("abc"), Some("12abc"), Some("NaN")] {
            let errors = validate_invoice(&form(Some("c1"), raw, Some("paid"))).unwrap_err();
            assert_eq!(errors.get(InvoiceField::Amount), [AMOUNT_BLANK], "amount {raw:?}");
        }
    }

    #[test]
    fn amount_is_trimmed_before_parsing() {
        let valid = validate_invoice(&form(Some("c1"), Some(" 10.5 "), Some("pending"))).unwrap();
        assert_eq!(valid.amount_in_cents(), Some(1050));
    }

    #[test]
    fn missing_or_empty_customer_is_rejected() {
        for raw in [None, Some("")] {
            let errors = validate_invoice(&form(raw, Some("1"), Some("paid"))).unwrap_err();
            assert_eq!(errors.get(InvoiceField::CustomerId), [CUSTOMER_REQUIRED]);
        }
    }

    #[test]
    fn status_outside_enumeration_is_rejected() {
        for raw in [None, Some(""), Some("overdue"), Some("Paid")] {
            let errors = validate_invoice(&form(Some("c1"), Some("1"), raw)).unwrap_err();
            assert_eq!(errors.get(InvoiceField::Status), [STATUS_INVALID], "status {raw:?}");
        }
    }

    #[test]
    fn reports_every_failing_field() {
        let errors = validate_invoice(&InvoiceForm::default()).unwrap_err();
        assert_eq!(errors.get(InvoiceField::CustomerId), [CUSTOMER_REQUIRED]);
        assert_eq!(errors.get(InvoiceField::Amount), [AMOUNT_BLANK]);
        assert_eq!(errors.get(InvoiceField::Status), [STATUS_INVALID]);
    }

    #[test]
    fn cents_round_to_nearest() {
        let cases = [("0.01", 1), ("19.999", 2000), ("1.004", 100), ("1.005", 101), ("100", 10000)];
        for (raw, cents) in cases {
            let valid = validate_invoice(&form(Some("c1"), Some(raw), Some("paid"))).unwrap();
            assert_eq!(valid.amount_in_cents(), Some(cents), "amount {raw}");
        }
    }

    #[test]
    fn out_of_range_exponents_report_blank() {
        for raw in ["1e100000000", "1e-100000000", "1e30", "0.0000000000001", "1000000000000"] {
            let errors = validate_invoice(&form(Some("c1"), Some(raw), Some("paid"))).unwrap_err();
            assert_eq!(errors.get(InvoiceField::Amount), [AMOUNT_BLANK], "amount {raw}");
        }
    }

    #[test]
    fn amounts_at_the_digit_bounds_are_accepted() {
        let valid = validate_invoice(&form(Some("c1"), Some("999999999999"), Some("paid"))).unwrap();
        assert_eq!(valid.amount_in_cents(), Some(99_999_999_999_900));

        let valid = validate_invoice(&form(Some("c1"), Some("1e3"), Some("paid"))).unwrap();
        assert_eq!(valid.amount_in_cents(), Some(100_000));

        let valid = validate_invoice(&form(Some("c1"), Some("0.000000000001"), Some("paid"))).unwrap();
        assert_eq!(valid.amount_in_cents(), Some(0));
    }

    #[test]
    fn field_errors_serialize_only_present_fields() {
        let mut errors = FieldErrors::default();
        errors.push(InvoiceField::Amount, AMOUNT_BLANK);
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            serde_json::json!({ "amount": [AMOUNT_BLANK] })
        );
    }
}
