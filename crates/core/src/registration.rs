//! Validation of point registration requests.
//!
//! The registration form arrives as untyped multipart text fields. This
//! module turns it into a [`Registration`] with typed coordinates, a
//! normalized state code, and a parsed item-id set, so that nothing
//! malformed ever reaches the database transaction.

use std::collections::BTreeSet;

use validator::ValidateEmail;

use crate::error::CoreError;
use crate::item_ids::parse_item_ids;
use crate::types::DbId;

/// Length of a state (UF) code.
pub const STATE_CODE_LEN: usize = 2;

/// Minimum number of digits in a WhatsApp number.
pub const MIN_PHONE_DIGITS: usize = 8;

/// Maximum number of digits in a WhatsApp number (E.164).
pub const MAX_PHONE_DIGITS: usize = 15;

/// Maximum length of free-text fields (name, city, email).
pub const MAX_TEXT_LEN: usize = 255;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Raw registration fields as received from the client.
///
/// Every field is optional here so a missing field produces a precise
/// validation message.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub whatsapp: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub city: Option<String>,
    pub uf: Option<String>,
    pub items: Option<String>,
}

/// Validated point fields, ready to be persisted alongside an image filename.
#[derive(Debug, Clone, PartialEq)]
pub struct PointDetails {
    pub name: String,
    pub email: String,
    pub whatsapp: String,
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub state: String,
}

/// A fully validated registration request.
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub details: PointDetails,
    pub item_ids: BTreeSet<DbId>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

impl RegistrationForm {
    /// Validate every field and produce a [`Registration`].
    ///
    /// Fails with [`CoreError::Validation`] on the first invalid field.
    pub fn validate(self) -> Result<Registration, CoreError> {
        let name = require_text("name", self.name)?;
        let email = require_text("email", self.email)?;
        if !email.validate_email() {
            return Err(CoreError::Validation(format!(
                "Invalid email address '{email}'"
            )));
        }
        let whatsapp = validate_whatsapp(&require_text("whatsapp", self.whatsapp)?)?;
        let latitude = parse_coordinate("latitude", self.latitude, 90.0)?;
        let longitude = parse_coordinate("longitude", self.longitude, 180.0)?;
        let city = require_text("city", self.city)?;
        let state = normalize_state(&require_text("uf", self.uf)?)?;
        let item_ids = parse_item_ids(&require_text("items", self.items)?)?;

        Ok(Registration {
            details: PointDetails {
                name,
                email,
                whatsapp,
                latitude,
                longitude,
                city,
                state,
            },
            item_ids,
        })
    }
}

/// Normalize a state code to upper case, requiring exactly two ASCII letters.
pub fn normalize_state(raw: &str) -> Result<String, CoreError> {
    let code = raw.trim();
    if code.len() != STATE_CODE_LEN || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(CoreError::Validation(format!(
            "State must be a {STATE_CODE_LEN}-letter code, got '{code}'"
        )));
    }
    Ok(code.to_ascii_uppercase())
}

/// Require a present, non-blank text field of bounded length. Returns it trimmed.
fn require_text(field: &str, value: Option<String>) -> Result<String, CoreError> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| CoreError::Validation(format!("Field '{field}' is required")))?;

    if value.chars().count() > MAX_TEXT_LEN {
        return Err(CoreError::Validation(format!(
            "Field '{field}' must be at most {MAX_TEXT_LEN} characters"
        )));
    }
    Ok(value)
}

fn parse_coordinate(field: &str, value: Option<String>, bound: f64) -> Result<f64, CoreError> {
    let raw = require_text(field, value)?;
    let parsed: f64 = raw
        .parse()
        .map_err(|_| CoreError::Validation(format!("Field '{field}' must be a number")))?;

    if !parsed.is_finite() || parsed.abs() > bound {
        return Err(CoreError::Validation(format!(
            "Field '{field}' must be between -{bound} and {bound}"
        )));
    }
    Ok(parsed)
}

/// Accept digits plus common phone punctuation; count digits only.
fn validate_whatsapp(raw: &str) -> Result<String, CoreError> {
    let allowed = |c: char| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '(' | ')');
    if !raw.chars().all(allowed) {
        return Err(CoreError::Validation(format!(
            "Invalid whatsapp number '{raw}'"
        )));
    }

    let digits = raw.chars().filter(char::is_ascii_digit).count();
    if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits) {
        return Err(CoreError::Validation(format!(
            "Whatsapp number must have between {MIN_PHONE_DIGITS} and {MAX_PHONE_DIGITS} digits"
        )));
    }
    Ok(raw.to_string())
}
