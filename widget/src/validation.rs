//! Field rules for the two checkout phases.
//!
//! Every rule is a pure function returning the first [`FieldError`] that
//! applies. Phase validators collect them into a [`ValidationErrors`] map that
//! replaces the previous map for that phase wholesale.

use crate::order::PaymentSelection;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

#[allow(clippy::expect_used)] // Literal pattern
static ADDRESS_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Zа-яА-ЯёЁ0-9\s/.,\-]+$").expect("address pattern compiles")
});

#[allow(clippy::expect_used)] // Literal pattern
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_.-]+@([A-Za-z0-9_-]+\.)+[A-Za-z0-9_-]{2,4}$")
        .expect("email pattern compiles")
});

#[allow(clippy::expect_used)] // Literal pattern
static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\+7)?[0-9]{10}$").expect("phone pattern compiles"));

/// Order fields that can carry a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    /// Delivery address
    Address,
    /// Payment method
    Payment,
    /// Contact email
    Email,
    /// Contact phone
    Phone,
    /// Order total
    Total,
    /// Ordered product ids
    Items,
}

impl Field {
    /// Stable key for renderers
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Address => "address",
            Self::Payment => "payment",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Total => "total",
            Self::Items => "items",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Why a field is invalid. `Display` is the message shown next to the field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// No delivery address
    #[error("Delivery address is required")]
    AddressRequired,

    /// Characters outside letters, digits, whitespace and `. , - /`
    #[error("Address may only contain letters, digits, spaces and . , - /")]
    AddressDisallowedCharacters,

    /// Fewer characters than the configured minimum
    #[error("Address must be at least {min} characters long")]
    AddressTooShort {
        /// Configured minimum
        min: usize,
    },

    /// No payment method chosen
    #[error("Choose a payment method")]
    PaymentRequired,

    /// Payment method string not recognised
    #[error("Unknown payment method '{value}'")]
    PaymentUnknown {
        /// What was selected
        value: String,
    },

    /// No email
    #[error("Email is required")]
    EmailRequired,

    /// Email not in `local@domain.tld` form
    #[error("Enter a valid email address")]
    EmailInvalid,

    /// No phone
    #[error("Phone number is required")]
    PhoneRequired,

    /// Phone not 10 digits after an optional +7 / 8 prefix
    #[error("Enter a valid phone number (10 digits after +7 or 8)")]
    PhoneInvalid,

    /// Order total missing
    #[error("Order total is missing")]
    TotalMissing,

    /// Nothing purchasable in the order
    #[error("The order has no purchasable items")]
    NoItems,
}

/// Field errors of one validation run. An absent key means the field is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<Field, FieldError>);

impl ValidationErrors {
    /// No errors
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Record an error, replacing any previous one for the field
    pub fn insert(&mut self, field: Field, error: FieldError) {
        self.0.insert(field, error);
    }

    /// Record the error of a rule result, if any
    pub fn check<T>(&mut self, field: Field, result: Result<T, FieldError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.insert(field, error);
                None
            },
        }
    }

    /// The error for a field
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&FieldError> {
        self.0.get(&field)
    }

    /// Whether the field has an error
    #[must_use]
    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    /// `true` when every field is valid
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of invalid fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Invalid fields and their errors, in field order
    pub fn iter(&self) -> impl Iterator<Item = (Field, &FieldError)> {
        self.0.iter().map(|(field, error)| (*field, error))
    }

    /// Union of two maps; entries of `other` win on conflict
    #[must_use]
    pub fn merged(mut self, other: &Self) -> Self {
        for (field, error) in other.iter() {
            self.insert(field, error.clone());
        }
        self
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, error) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {error}")?;
            first = false;
        }
        Ok(())
    }
}

/// Delivery address rule: required, then charset, then minimum length.
///
/// # Errors
///
/// Returns the first rule the address breaks.
pub fn validate_address(address: &str, min_chars: usize) -> Result<(), FieldError> {
    if address.trim().is_empty() {
        return Err(FieldError::AddressRequired);
    }
    if !ADDRESS_CHARSET.is_match(address) {
        return Err(FieldError::AddressDisallowedCharacters);
    }
    if address.chars().count() < min_chars {
        return Err(FieldError::AddressTooShort { min: min_chars });
    }
    Ok(())
}

/// Email rule
///
/// # Errors
///
/// [`FieldError::EmailRequired`] for blank input, [`FieldError::EmailInvalid`]
/// when the shape is wrong.
pub fn validate_email(email: &str) -> Result<(), FieldError> {
    if email.trim().is_empty() {
        return Err(FieldError::EmailRequired);
    }
    if !EMAIL.is_match(email) {
        return Err(FieldError::EmailInvalid);
    }
    Ok(())
}

/// Strip everything but digits and a leading `+`, then rewrite a leading `8`
/// as `+7`.
///
/// ```
/// use storefront_widget::validation::normalize_phone;
///
/// assert_eq!(normalize_phone("8 (999) 123-45-67"), "+79991234567");
/// assert_eq!(normalize_phone("+7 999 123 45 67"), "+79991234567");
/// ```
#[must_use]
pub fn normalize_phone(raw: &str) -> String {
    let mut digits = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c.is_ascii_digit() || (c == '+' && digits.is_empty()) {
            digits.push(c);
        }
    }
    match digits.strip_prefix('8') {
        Some(rest) => format!("+7{rest}"),
        None => digits,
    }
}

/// Phone rule. Returns the normalized number on success.
///
/// # Errors
///
/// [`FieldError::PhoneRequired`] for blank input, [`FieldError::PhoneInvalid`]
/// when the normalized number is not 10 digits after an optional `+7`.
pub fn validate_phone(raw: &str) -> Result<String, FieldError> {
    if raw.trim().is_empty() {
        return Err(FieldError::PhoneRequired);
    }
    let normalized = normalize_phone(raw);
    if PHONE.is_match(&normalized) {
        Ok(normalized)
    } else {
        Err(FieldError::PhoneInvalid)
    }
}

/// Payment rule
///
/// # Errors
///
/// Returns the error matching an unset or unrecognised selection.
pub fn validate_payment(payment: &PaymentSelection) -> Result<(), FieldError> {
    payment.method().map(|_| ())
}

/// Address phase: delivery address and payment method
#[must_use]
pub fn address_phase(
    address: &str,
    payment: &PaymentSelection,
    min_chars: usize,
) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.check(Field::Address, validate_address(address, min_chars));
    errors.check(Field::Payment, validate_payment(payment));
    errors
}

/// Contact phase: email and phone
#[must_use]
pub fn contact_phase(email: &str, phone: &str) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.check(Field::Email, validate_email(email));
    errors.check(Field::Phone, validate_phone(phone));
    errors
}
