use std::fmt::{self, Display, Formatter};

use serde::Deserialize;
use validator::ValidateEmail;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerEmail(String);

impl CustomerEmail {
    /// Returns an instance of `CustomerEmail` if all conditions are met.
    pub fn parse(s: String) -> Result<Self, String> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err("Invalid email: email cannot be empty.".to_string());
        }

        // RFC 5321: 64 local + 1 @ + 255 domain = 320 characters
        if trimmed.len() > 320 {
            return Err("Invalid email: cannot be longer than 320 characters.".to_string());
        }

        if !trimmed.validate_email() {
            return Err(format!(
                "Invalid email: '{trimmed}' does not match the required format."
            ));
        }

        Ok(Self(trimmed.to_string()))
    }
}

impl AsRef<str> for CustomerEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CustomerEmail {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Read-only projection of the buyer, taken from the payment record and handed to
/// the provider unmodified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerInfo {
    pub user_id: Option<i64>,
    pub email: CustomerEmail,
    pub first_name: String,
    pub last_name: String,
}

impl CustomerInfo {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct CustomerPayload {
    #[serde(default)]
    pub user_id: Option<i64>,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl TryFrom<CustomerPayload> for CustomerInfo {
    type Error = String;

    fn try_from(payload: CustomerPayload) -> Result<Self, Self::Error> {
        Ok(Self {
            // guest checkouts are reported with a non-positive user id
            user_id: payload.user_id.filter(|id| *id > 0),
            email: CustomerEmail::parse(payload.email)?,
            first_name: payload.first_name.trim().to_string(),
            last_name: payload.last_name.trim().to_string(),
        })
    }
}
