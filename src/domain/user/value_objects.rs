use serde::{Deserialize, Serialize};
use std::fmt;
use validator::ValidateEmail;

/// Email value object representing a valid email address
///
/// # Invariants
/// - Passes the `validator` crate's email check (local part, `@`, domain)
/// - Domain is dotted and ends in an alphabetic label of 2+ characters
/// - Is immutable after construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Creates a new Email value object
    ///
    /// # Returns
    /// * `Ok(Email)` - If email is valid
    /// * `Err(String)` - If email is invalid
    ///
    /// # Example
    /// ```
    /// use user_admin_api::domain::user::value_objects::Email;
    ///
    /// let email = Email::new("test@example.com").expect("valid email");
    /// assert_eq!(email.as_str(), "test@example.com");
    /// ```
    pub fn new(email: impl Into<String>) -> Result<Self, String> {
        let email: String = email.into();
        if email.validate_email() && has_top_level_domain(&email) {
            Ok(Email(email))
        } else {
            Err(format!("Invalid email: {}", email))
        }
    }

    /// Returns the email as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the value object, returning the inner string
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Rejects single-label (`user@localhost`) and IP-literal domains
fn has_top_level_domain(email: &str) -> bool {
    email
        .rsplit_once('@')
        .and_then(|(_, domain)| domain.rsplit_once('.'))
        .map(|(_, tld)| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()))
        .unwrap_or(false)
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
