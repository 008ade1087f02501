use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct ProviderId(String);

impl ProviderId {
    const MAX_LENGTH: usize = 64;

    /// Returns an instance of `ProviderId` if all conditions are met.
    ///
    /// The id namespaces every metadata key, option key and form field derived from
    /// it, so it is restricted to characters that are safe in all of those places.
    pub fn parse(s: String) -> Result<Self, String> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err("Invalid provider id: cannot be empty.".to_string());
        }

        if trimmed.len() > Self::MAX_LENGTH {
            return Err(format!(
                "Invalid provider id: cannot be longer than {} characters.",
                Self::MAX_LENGTH
            ));
        }

        let allowed = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-';
        if let Some(c) = trimmed.chars().find(|c| !allowed(*c)) {
            return Err(format!(
                "Invalid provider id: '{trimmed}' contains the forbidden character '{c}'."
            ));
        }

        Ok(Self(trimmed.to_string()))
    }
}

impl TryFrom<String> for ProviderId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl AsRef<str> for ProviderId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique key and display name of a marketing provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderIdentity {
    id: ProviderId,
    label: String,
}

impl ProviderIdentity {
    pub fn new(id: ProviderId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }

    pub fn id(&self) -> &ProviderId {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Payment meta key recording that the buyer ticked the checkout box.
    pub fn signup_intent_key(&self) -> String {
        format!("_edd_{}_signup", self.id)
    }

    /// Product meta key holding the lists buyers of that product are added to.
    pub fn product_lists_key(&self) -> String {
        format!("_edd_{}", self.id)
    }

    pub fn option_key(&self, name: &str) -> String {
        format!("edd_{}_{name}", self.id)
    }

    /// HTML id shared by the checkout fieldset and the product metabox.
    pub fn element_id(&self) -> String {
        format!("edd_{}", self.id)
    }

    pub fn checkout_field_name(&self) -> String {
        format!("edd_{}_signup", self.id)
    }
}

impl Default for ProviderIdentity {
    fn default() -> Self {
        Self {
            id: ProviderId("newsletter".to_string()),
            label: "Newsletter".to_string(),
        }
    }
}
