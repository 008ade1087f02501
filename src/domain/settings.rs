use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum SettingKind {
    Header,
    Text { default: Option<String> },
    Checkbox,
    Select { options: Vec<(String, String)> },
}

impl SettingKind {
    fn type_name(&self) -> &'static str {
        match self {
            SettingKind::Header => "header",
            SettingKind::Text { .. } => "text",
            SettingKind::Checkbox => "checkbox",
            SettingKind::Select { .. } => "select",
        }
    }
}

/// A field a provider adds to the host's extension settings screen.
///
/// The host's own settings are carried as raw JSON so that fields this crate knows
/// nothing about pass through untouched. `into_value` renders a field in the same
/// shape.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingField {
    pub id: String,
    pub name: String,
    pub desc: Option<String>,
    pub kind: SettingKind,
}

impl SettingField {
    fn new(id: impl Into<String>, name: impl Into<String>, kind: SettingKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            desc: None,
            kind,
        }
    }

    pub fn header(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, SettingKind::Header)
    }

    pub fn text(id: impl Into<String>, name: impl Into<String>, default: Option<String>) -> Self {
        Self::new(id, name, SettingKind::Text { default })
    }

    pub fn checkbox(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, SettingKind::Checkbox)
    }

    pub fn select(
        id: impl Into<String>,
        name: impl Into<String>,
        options: Vec<(String, String)>,
    ) -> Self {
        Self::new(id, name, SettingKind::Select { options })
    }

    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = Some(desc.into());
        self
    }

    pub fn into_value(self) -> Value {
        let mut field = Map::new();
        field.insert("id".to_string(), Value::String(self.id));
        field.insert("name".to_string(), Value::String(self.name));
        field.insert(
            "type".to_string(),
            Value::String(self.kind.type_name().to_string()),
        );
        if let Some(desc) = self.desc {
            field.insert("desc".to_string(), Value::String(desc));
        }

        match self.kind {
            SettingKind::Text { default: Some(std) } => {
                field.insert("std".to_string(), Value::String(std));
            }
            SettingKind::Select { options } => {
                let options = options
                    .into_iter()
                    .map(|(value, label)| (value, Value::String(label)))
                    .collect::<Map<_, _>>();
                field.insert("options".to_string(), Value::Object(options));
            }
            _ => {}
        }

        Value::Object(field)
    }
}
