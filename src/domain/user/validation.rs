//! Input schemas for user create and update payloads
//!
//! Validation works on the raw JSON body so that every field is checked
//! (wrong types included) and all problems are reported together.

use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fmt;
use validator::{ValidateLength, ValidationError};

use super::value_objects::Email;

/// Minimum length, in characters, of `firstName` and `lastName`
pub const MIN_NAME_LENGTH: u64 = 2;

/// Validated payload for creating a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUser {
    pub email: Email,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Validated partial update
///
/// `None` leaves a column untouched. For the nullable name columns
/// `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateUser {
    pub email: Option<Email>,
    pub first_name: Option<Option<String>>,
    pub last_name: Option<Option<String>>,
    pub is_active: Option<bool>,
    pub is_email_verified: Option<bool>,
}

impl UpdateUser {
    /// True when the payload carries no field to change
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.is_active.is_none()
            && self.is_email_verified.is_none()
    }
}

/// Key under which violations of the body as a whole are recorded
pub const BODY_FIELD: &str = "__all__";

/// All rule violations found in one payload
///
/// Wraps [`validator::ValidationErrors`] and remembers the order in which
/// fields were reported, so the rendered message follows field order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    inner: validator::ValidationErrors,
    order: Vec<&'static str>,
}

impl ValidationErrors {
    fn add(&mut self, field: &'static str, code: &'static str, message: impl Into<String>) {
        let error = ValidationError::new(code).with_message(Cow::Owned(message.into()));
        self.inner.add(field, error);
        if !self.order.contains(&field) {
            self.order.push(field);
        }
    }

    /// True when no rule was violated
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns true if any violation names `field`
    pub fn has_field(&self, field: &str) -> bool {
        self.order.iter().any(|f| *f == field)
    }

    /// The underlying `validator` errors, keyed by JSON field name
    pub fn as_validator(&self) -> &validator::ValidationErrors {
        &self.inner
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let by_field = self.inner.field_errors();
        let mut parts = Vec::new();

        for field in &self.order {
            let Some(errors) = by_field.get(*field) else {
                continue;
            };
            for error in errors.iter() {
                let message = error.message.as_deref().unwrap_or(&error.code);
                if *field == BODY_FIELD {
                    parts.push(message.to_string());
                } else {
                    parts.push(format!("{}: {}", field, message));
                }
            }
        }

        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Validates a create payload
///
/// # Rules
/// - `email`: required string, valid email
/// - `firstName`, `lastName`: required key, `null` or a string of at least
///   [`MIN_NAME_LENGTH`] characters
pub fn validate_create(body: &Value) -> Result<CreateUser, ValidationErrors> {
    let mut reader = FieldReader::new(body)?;

    let email = reader.email("email", Requirement::Required);
    let first_name = reader.name("firstName", Requirement::Required);
    let last_name = reader.name("lastName", Requirement::Required);

    match (email, first_name, last_name) {
        (Some(email), Some(first_name), Some(last_name)) if reader.errors.is_empty() => {
            Ok(CreateUser {
                email,
                first_name,
                last_name,
            })
        }
        _ => Err(reader.errors),
    }
}

/// Validates a partial update payload
///
/// Every field is optional. Present fields follow the create rules;
/// `isActive` and `isEmailVerified` must be booleans.
pub fn validate_update(body: &Value) -> Result<UpdateUser, ValidationErrors> {
    let mut reader = FieldReader::new(body)?;

    let update = UpdateUser {
        email: reader.email("email", Requirement::Optional),
        first_name: reader.name("firstName", Requirement::Optional),
        last_name: reader.name("lastName", Requirement::Optional),
        is_active: reader.flag("isActive"),
        is_email_verified: reader.flag("isEmailVerified"),
    };

    reader.finish()?;
    Ok(update)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Requirement {
    Required,
    Optional,
}

/// Reads fields out of a JSON object, collecting every violation
struct FieldReader<'a> {
    object: &'a Map<String, Value>,
    errors: ValidationErrors,
}

impl<'a> FieldReader<'a> {
    fn new(body: &'a Value) -> Result<Self, ValidationErrors> {
        match body {
            Value::Object(object) => Ok(Self {
                object,
                errors: ValidationErrors::default(),
            }),
            other => {
                let mut errors = ValidationErrors::default();
                errors.add(BODY_FIELD, "type", expected("object", other));
                Err(errors)
            }
        }
    }

    fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }

    fn missing(&mut self, field: &'static str, requirement: Requirement) {
        if requirement == Requirement::Required {
            self.errors.add(field, "required", "Required");
        }
    }

    fn email(&mut self, field: &'static str, requirement: Requirement) -> Option<Email> {
        match self.object.get(field) {
            None => {
                self.missing(field, requirement);
                None
            }
            Some(Value::String(raw)) => match Email::new(raw.as_str()) {
                Ok(email) => Some(email),
                Err(_) => {
                    self.errors.add(field, "email", "Invalid email");
                    None
                }
            },
            Some(other) => {
                self.errors.add(field, "type", expected("string", other));
                None
            }
        }
    }

    /// Nullable name field. The outer `Option` is `None` when the key is
    /// absent or invalid.
    fn name(&mut self, field: &'static str, requirement: Requirement) -> Option<Option<String>> {
        match self.object.get(field) {
            None => {
                self.missing(field, requirement);
                None
            }
            Some(Value::Null) => Some(None),
            Some(Value::String(raw))
                if !raw.validate_length(Some(MIN_NAME_LENGTH), None, None) =>
            {
                self.errors.add(
                    field,
                    "length",
                    format!(
                        "String must contain at least {} character(s)",
                        MIN_NAME_LENGTH
                    ),
                );
                None
            }
            Some(Value::String(raw)) => Some(Some(raw.clone())),
            Some(other) => {
                self.errors.add(field, "type", expected("string", other));
                None
            }
        }
    }

    fn flag(&mut self, field: &'static str) -> Option<bool> {
        match self.object.get(field) {
            None => None,
            Some(Value::Bool(flag)) => Some(*flag),
            Some(other) => {
                self.errors.add(field, "type", expected("boolean", other));
                None
            }
        }
    }
}

fn expected(wanted: &str, received: &Value) -> String {
    format!("Expected {}, received {}", wanted, json_type(received))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
