//! Form and input validation.
//!
//! Validation runs before anything is submitted. Each failure carries the
//! text shown next to the offending field.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ErrorCode;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9]\d{0,15}$").expect("phone pattern is valid"));

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("This field is required")]
    Required { field: String },

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Please enter a valid phone number")]
    InvalidPhone,

    #[error("Please enter a password")]
    EmptyPassword,

    #[error("Please enter a search term")]
    EmptySearch,

    #[error("Please select at least one item")]
    EmptySelection,

    #[error("Quantity must be between {min} and {max}")]
    QuantityOutOfRange { value: i64, min: u32, max: u32 },
}

impl ErrorCode for ValidationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Required { .. } => "E_REQUIRED",
            Self::InvalidEmail => "E_INVALID_EMAIL",
            Self::InvalidPhone => "E_INVALID_PHONE",
            Self::EmptyPassword => "E_EMPTY_PASSWORD",
            Self::EmptySearch => "E_EMPTY_SEARCH",
            Self::EmptySelection => "E_EMPTY_SELECTION",
            Self::QuantityOutOfRange { .. } => "E_QUANTITY_RANGE",
        }
    }
}

// =============================================================================
// SINGLE VALUES
// =============================================================================

#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    EMAIL.is_match(value.trim())
}

/// Digits with an optional leading `+`, no leading zero, whitespace ignored.
#[must_use]
pub fn is_valid_phone(value: &str) -> bool {
    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    PHONE.is_match(&compact)
}

/// Trimmed password, or an error when blank.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyPassword`] for blank input.
pub fn validate_password(value: &str) -> Result<&str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyPassword);
    }
    Ok(trimmed)
}

/// Trimmed search term, or an error when blank.
///
/// # Errors
///
/// Returns [`ValidationError::EmptySearch`] for blank input.
pub fn validate_search_term(value: &str) -> Result<&str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptySearch);
    }
    Ok(trimmed)
}

// =============================================================================
// FORM FIELDS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldKind {
    #[default]
    Text,
    Email,
    Tel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
    pub value: String,
}

impl Field {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: FieldKind, required: bool) -> Self {
        Self { name: name.into(), kind, required, value: String::new() }
    }

    /// Check the trimmed value: presence first, then format.
    ///
    /// # Errors
    ///
    /// Returns the first rule the value breaks.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let value = self.value.trim();
        if value.is_empty() {
            if self.required {
                return Err(ValidationError::Required { field: self.name.clone() });
            }
            return Ok(());
        }
        match self.kind {
            FieldKind::Email if !is_valid_email(value) => Err(ValidationError::InvalidEmail),
            FieldKind::Tel if !is_valid_phone(value) => Err(ValidationError::InvalidPhone),
            _ => Ok(()),
        }
    }
}

/// Gift recipient details, validated only while the toggle is on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipientForm {
    enabled: bool,
    fields: Vec<Field>,
}

impl RecipientForm {
    #[must_use]
    pub fn new(fields: Vec<Field>) -> Self {
        Self { enabled: false, fields }
    }

    /// Name, email and message fields; name and email required.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(vec![
            Field::new("name", FieldKind::Text, true),
            Field::new("email", FieldKind::Email, true),
            Field::new("message", FieldKind::Text, false),
        ])
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turning the form off clears every value.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            for field in &mut self.fields {
                field.value.clear();
            }
        }
    }

    /// Set a field's value. Returns `false` for unknown names.
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(field) => {
                field.value = value.into();
                true
            }
            None => false,
        }
    }

    /// Every failing field with its error. Always passes while disabled.
    ///
    /// # Errors
    ///
    /// Returns `(field name, error)` pairs for each invalid field.
    pub fn validate(&self) -> Result<(), Vec<(String, ValidationError)>> {
        if !self.enabled {
            return Ok(());
        }
        let errors: Vec<(String, ValidationError)> = self
            .fields
            .iter()
            .filter_map(|f| f.validate().err().map(|e| (f.name.clone(), e)))
            .collect();
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Trimmed values by field name, or `None` while disabled.
    #[must_use]
    pub fn data(&self) -> Option<BTreeMap<String, String>> {
        self.enabled.then(|| {
            self.fields
                .iter()
                .map(|f| (f.name.clone(), f.value.trim().to_owned()))
                .collect()
        })
    }
}

// =============================================================================
// QUANTITY
// =============================================================================

pub const DEFAULT_MIN_QUANTITY: u32 = 1;
pub const DEFAULT_MAX_QUANTITY: u32 = 999;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityBounds {
    pub min: u32,
    pub max: u32,
}

impl Default for QuantityBounds {
    fn default() -> Self {
        Self { min: DEFAULT_MIN_QUANTITY, max: DEFAULT_MAX_QUANTITY }
    }
}

impl QuantityBounds {
    #[must_use]
    pub fn clamp(&self, value: i64) -> u32 {
        let clamped = value.clamp(i64::from(self.min), i64::from(self.max));
        u32::try_from(clamped).unwrap_or(self.min)
    }

    /// Parse user input; unparsable input becomes `min`.
    #[must_use]
    pub fn parse(&self, input: &str) -> u32 {
        input
            .trim()
            .parse::<i64>()
            .map_or(self.min, |value| self.clamp(value))
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::QuantityOutOfRange`] outside `min..=max`.
    pub fn check(&self, value: i64) -> Result<u32, ValidationError> {
        if value < i64::from(self.min) || value > i64::from(self.max) {
            return Err(ValidationError::QuantityOutOfRange { value, min: self.min, max: self.max });
        }
        Ok(self.clamp(value))
    }

    #[must_use]
    pub fn increase(&self, current: u32) -> u32 {
        self.clamp(i64::from(current) + 1)
    }

    #[must_use]
    pub fn decrease(&self, current: u32) -> u32 {
        self.clamp(i64::from(current) - 1)
    }
}

/// Price of one unit when `total` covers `quantity` units.
#[must_use]
pub fn price_per_item(total: u64, quantity: u32) -> u64 {
    if quantity == 0 {
        return total;
    }
    total / u64::from(quantity)
}

#[must_use]
pub fn line_total(unit_price: u64, quantity: u32) -> u64 {
    unit_price.saturating_mul(u64::from(quantity))
}

#[cfg(test)]
#[path = "validation_test.rs"]
mod tests;
