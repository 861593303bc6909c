use crate::domain::validators;
use serde::Serialize;
use std::collections::BTreeMap;

/// The validated fields of the payment form, in declared validation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    CardNumber,
    CardHolder,
    Cvv,
    ExpirationMonth,
    ExpirationYear,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::CardNumber,
        Field::CardHolder,
        Field::Cvv,
        Field::ExpirationMonth,
        Field::ExpirationYear,
    ];

    /// Element id of the field's input control.
    pub fn input_id(&self) -> &'static str {
        match self {
            Field::CardNumber => "card-number",
            Field::CardHolder => "card-holder",
            Field::Cvv => "cvv",
            Field::ExpirationMonth => "expiration-month",
            Field::ExpirationYear => "expiration-year",
        }
    }

    /// Element id of the field's inline error slot.
    pub fn error_id(&self) -> &'static str {
        match self {
            Field::CardNumber => "card-number-error",
            Field::CardHolder => "card-holder-error",
            Field::Cvv => "cvv-error",
            Field::ExpirationMonth => "expiration-month-error",
            Field::ExpirationYear => "expiration-year-error",
        }
    }

    /// Sanitizes a raw keystroke value into the value shown to the user.
    ///
    /// Card numbers are regrouped into blocks of 4 digits; CVVs are
    /// stripped to at most 3 digits. Other fields pass through as typed.
    pub fn sanitize(&self, raw: &str) -> String {
        match self {
            Field::CardNumber => validators::format_card_number(raw),
            Field::Cvv => validators::sanitize_cvv(raw),
            _ => raw.to_string(),
        }
    }

    /// Runs the field's validator against a sanitized value.
    ///
    /// Returns `None` when valid, otherwise the fixed message for the
    /// failing rule.
    pub fn validate(&self, value: &str) -> Option<&'static str> {
        let valid = match self {
            Field::CardNumber => validators::card_number(&validators::digits_only(value)),
            Field::Cvv => validators::cvv(value),
            Field::CardHolder | Field::ExpirationMonth | Field::ExpirationYear => {
                validators::required(value)
            }
        };
        if valid { None } else { Some(self.message()) }
    }

    fn message(&self) -> &'static str {
        match self {
            Field::CardNumber => validators::CARD_NUMBER_MESSAGE,
            Field::Cvv => validators::CVV_MESSAGE,
            Field::CardHolder | Field::ExpirationMonth | Field::ExpirationYear => {
                validators::REQUIRED_MESSAGE
            }
        }
    }
}

/// Per-field state: the sanitized value and its validation result.
///
/// Invariant: `error_text` is non-empty iff `is_valid` is false. The
/// invariant holds by construction because the only way to build or
/// update a `FormFieldState` is [`FormFieldState::evaluate`].
#[derive(Debug, Clone, PartialEq)]
pub struct FormFieldState {
    pub raw_value: String,
    pub is_valid: bool,
    pub error_text: String,
}

impl FormFieldState {
    /// Sanitizes `raw` for `field` and validates the result.
    pub fn evaluate(field: Field, raw: &str) -> Self {
        let raw_value = field.sanitize(raw);
        match field.validate(&raw_value) {
            None => Self {
                raw_value,
                is_valid: true,
                error_text: String::new(),
            },
            Some(message) => Self {
                raw_value,
                is_valid: false,
                error_text: message.to_string(),
            },
        }
    }
}

/// The first failing field of a validation pass and its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRejection {
    pub field: Field,
    pub message: &'static str,
}

/// Immutable capture of the form values taken at the moment of submission.
///
/// The card number is stripped of its display separators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentFormSnapshot {
    pub card_number: String,
    pub card_holder: String,
    pub expiration_month: String,
    pub expiration_year: String,
    pub cvv: String,
}

/// Opaque acknowledgement returned by a payment gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Receipt {
    pub reference: String,
}

/// State of the one-shot asynchronous submission flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    Failed,
}

/// The form's field states, keyed by [`Field`] in validation order.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentFormState {
    fields: BTreeMap<Field, FormFieldState>,
}

impl Default for PaymentFormState {
    fn default() -> Self {
        Self::new()
    }
}

impl PaymentFormState {
    pub fn new() -> Self {
        let fields = Field::ALL
            .into_iter()
            .map(|field| (field, FormFieldState::evaluate(field, "")))
            .collect();
        Self { fields }
    }

    pub fn field(&self, field: Field) -> &FormFieldState {
        &self.fields[&field]
    }

    /// Applies a keystroke to `field`: sanitize, store, re-validate.
    pub fn apply_input(&mut self, field: Field, raw: &str) -> &FormFieldState {
        let state = FormFieldState::evaluate(field, raw);
        self.fields.insert(field, state);
        &self.fields[&field]
    }

    /// Fail-fast validation pass over all fields in declared order.
    ///
    /// Returns the snapshot on success, or the first failing field; the
    /// remaining fields are not evaluated.
    pub fn validate(&self) -> Result<PaymentFormSnapshot, FieldRejection> {
        for field in Field::ALL {
            if let Some(message) = field.validate(&self.fields[&field].raw_value) {
                return Err(FieldRejection { field, message });
            }
        }
        Ok(self.snapshot())
    }

    fn snapshot(&self) -> PaymentFormSnapshot {
        PaymentFormSnapshot {
            card_number: validators::digits_only(&self.fields[&Field::CardNumber].raw_value),
            card_holder: self.fields[&Field::CardHolder].raw_value.clone(),
            expiration_month: self.fields[&Field::ExpirationMonth].raw_value.clone(),
            expiration_year: self.fields[&Field::ExpirationYear].raw_value.clone(),
            cvv: self.fields[&Field::Cvv].raw_value.clone(),
        }
    }
}
