use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ListId(String);

impl ListId {
    const MAX_LENGTH: usize = 255;
    // Ids become one path segment of provider URLs.
    const FORBIDDEN_CHARACTERS: [char; 5] = ['/', '\\', '?', '#', '%'];

    pub fn parse(s: String) -> Result<Self, String> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err("Invalid list id: cannot be empty.".to_string());
        }

        if trimmed.len() > Self::MAX_LENGTH {
            return Err(format!(
                "Invalid list id: cannot be longer than {} characters.",
                Self::MAX_LENGTH
            ));
        }

        if matches!(trimmed, "." | "..") {
            return Err(format!("Invalid list id: `{trimmed}` is not a usable id."));
        }

        if trimmed
            .chars()
            .any(|c| c.is_control() || Self::FORBIDDEN_CHARACTERS.contains(&c))
        {
            return Err(format!(
                "Invalid list id: `{trimmed}` cannot contain control characters or any of {:?}.",
                Self::FORBIDDEN_CHARACTERS
            ));
        }

        Ok(Self(trimmed.to_string()))
    }
}

impl TryFrom<String> for ListId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ListId> for String {
    fn from(value: ListId) -> Self {
        value.0
    }
}

impl AsRef<str> for ListId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for ListId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A remote mailing list as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailingList {
    pub list_id: ListId,
    pub list_name: String,
}

/// The provider's lists, keyed by id, in the order the provider returned them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ListCatalog(Vec<MailingList>);

impl ListCatalog {
    pub fn new(lists: Vec<MailingList>) -> Self {
        lists.into_iter().collect()
    }

    /// Adds a list; an id already in the catalog keeps its first name.
    pub fn insert(&mut self, list: MailingList) {
        if self.get(&list.list_id).is_none() {
            self.0.push(list);
        }
    }

    pub fn get(&self, list_id: &ListId) -> Option<&str> {
        self.0
            .iter()
            .find(|list| &list.list_id == list_id)
            .map(|list| list.list_name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &MailingList> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<MailingList> for ListCatalog {
    fn from_iter<T: IntoIterator<Item = MailingList>>(iter: T) -> Self {
        let mut catalog = Self::default();
        for list in iter {
            catalog.insert(list);
        }
        catalog
    }
}

/// Lists a product's buyers are subscribed to, in stored order and without repeats.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ProductListSelection(Vec<ListId>);

impl ProductListSelection {
    pub fn new(list_ids: impl IntoIterator<Item = ListId>) -> Self {
        let mut selected: Vec<ListId> = Vec::new();
        for list_id in list_ids {
            if !selected.contains(&list_id) {
                selected.push(list_id);
            }
        }
        Self(selected)
    }

    /// Reads a stored selection back from the metadata store.
    ///
    /// Providers such as AWeber use numeric list ids, so numbers are accepted
    /// alongside strings.
    pub fn from_value(value: Value) -> Result<Self, String> {
        let items = match value {
            Value::Array(items) => items,
            other => {
                return Err(format!(
                    "Invalid list selection: expected an array, found {other}."
                ));
            }
        };

        let list_ids = items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => ListId::parse(s),
                Value::Number(n) => ListId::parse(n.to_string()),
                other => Err(format!("Invalid list selection entry: {other}.")),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(list_ids))
    }

    pub fn to_value(&self) -> Value {
        Value::Array(
            self.0
                .iter()
                .map(|list_id| Value::String(list_id.to_string()))
                .collect(),
        )
    }

    pub fn contains(&self, list_id: &ListId) -> bool {
        self.0.contains(list_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ListId> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
